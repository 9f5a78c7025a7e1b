//! Per-question answer tallies.

use std::collections::HashMap;

use crate::entities::Question;
use crate::responses::{AnswerTally, QuestionAnswerSummary};

/// Tally the stored answers given for one question.
///
/// For multi-value questions each stored JSON array is exploded into its
/// elements; a stored value that is not an array counts as itself.
#[must_use]
pub fn tally_answers(question: &Question, stored_answers: &[String]) -> QuestionAnswerSummary {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for stored in stored_answers {
        let values = if question.question_type.is_multi_value() {
            serde_json::from_str::<Vec<String>>(stored).unwrap_or_else(|_| vec![stored.clone()])
        } else {
            vec![stored.clone()]
        };
        for value in values {
            *counts.entry(value).or_default() += 1;
        }
    }

    let config = question.config();
    let mut tallies: Vec<AnswerTally> = config
        .options()
        .iter()
        .map(|option| AnswerTally {
            value: option.clone(),
            count: counts.remove(option).unwrap_or(0),
        })
        .collect();

    let mut others: Vec<AnswerTally> = counts
        .into_iter()
        .map(|(value, count)| AnswerTally { value, count })
        .collect();
    others.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    tallies.extend(others);

    QuestionAnswerSummary {
        question_id: question.id.clone(),
        question: question.question.clone(),
        question_type: question.question_type,
        total_answers: stored_answers.len() as u64,
        tallies,
    }
}
