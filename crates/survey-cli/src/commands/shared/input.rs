use std::io::Read;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use survey_core::validate::AnswerSubmission;

/// Read a JSON document from `path`, or from stdin when `path` is `-`.
pub fn read_json<T: DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let raw = if path == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read JSON from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?
    };
    parse_json(&raw).with_context(|| format!("invalid JSON in {path}"))
}

fn parse_json<T: DeserializeOwned>(raw: &str) -> anyhow::Result<T> {
    Ok(serde_json::from_str(raw)?)
}

/// Accept either `{"answers": {...}}` or a bare `{question_id: value}` map.
pub fn answer_submission(document: Value) -> anyhow::Result<AnswerSubmission> {
    let Value::Object(mut map) = document else {
        anyhow::bail!("answers must be a JSON object keyed by question id");
    };
    let answers = match map.remove("answers") {
        Some(Value::Object(inner)) if map.is_empty() => inner,
        Some(other) => {
            map.insert("answers".to_string(), other);
            map
        }
        None => map,
    };
    Ok(AnswerSubmission {
        answers: answers.into_iter().collect(),
    })
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn timestamp(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .with_context(|| format!("invalid timestamp '{raw}', expected RFC 3339"))
}
