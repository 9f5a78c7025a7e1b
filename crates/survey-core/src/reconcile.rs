//! Question-list reconciliation.
//!
//! Diffs a survey's stored question ids against an edited incoming list and
//! produces three disjoint action sets:
//!
//! ```text
//! delete = existing − incoming
//! create = incoming with no id, or an id not in existing
//! update = incoming with an id in existing ∩ incoming
//! ```
//!
//! Every created or updated record is validated before the plan is returned,
//! so a plan either exists in full or not at all. Applying it is the store's
//! job (inside one transaction).

use std::collections::{HashMap, HashSet};

use crate::errors::ReconcileError;
use crate::validate::{QuestionInput, ValidQuestion, validate_question};

/// An in-place edit of a stored question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionChange {
    pub id: String,
    pub question: ValidQuestion,
}

/// The create / update / delete sets for one survey edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// New questions, in submission order.
    pub create: Vec<ValidQuestion>,
    /// Edits to stored questions, in stored order.
    pub update: Vec<QuestionChange>,
    /// Stored question ids to remove, in stored order.
    pub delete: Vec<String>,
}

impl ReconcilePlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.update.is_empty() && self.delete.is_empty()
    }
}

/// Compute the reconcile plan for `incoming` against `existing_ids`.
///
/// Duplicate ids in `incoming` are not rejected: the last occurrence wins for
/// updates, and every occurrence of an unknown id is created. An empty
/// `incoming` list deletes every stored question.
///
/// # Errors
///
/// Returns `ReconcileError::ValidationFailed` for the first record (in
/// submission order) that fails validation.
pub fn reconcile(
    existing_ids: &[String],
    incoming: &[QuestionInput],
) -> Result<ReconcilePlan, ReconcileError> {
    let existing: HashSet<&str> = existing_ids.iter().map(String::as_str).collect();

    let mut create = Vec::new();
    let mut updates: HashMap<&str, ValidQuestion> = HashMap::new();

    for (index, input) in incoming.iter().enumerate() {
        let valid = validate_question(input).map_err(|source| ReconcileError::ValidationFailed {
            index,
            id: input.id.clone(),
            source,
        })?;

        match input.id.as_deref() {
            Some(id) if existing.contains(id) => {
                updates.insert(id, valid);
            }
            _ => create.push(valid),
        }
    }

    let mut update = Vec::with_capacity(updates.len());
    let mut delete = Vec::new();
    for id in existing_ids {
        if let Some(question) = updates.remove(id.as_str()) {
            update.push(QuestionChange {
                id: id.clone(),
                question,
            });
        } else {
            delete.push(id.clone());
        }
    }

    Ok(ReconcilePlan {
        create,
        update,
        delete,
    })
}
