//! ID prefixes. IDs are `<prefix>-<16 hex chars>`, generated in SQL.

pub const PREFIX_SURVEY: &str = "svy";
pub const PREFIX_QUESTION: &str = "qst";
pub const PREFIX_ANSWER_SESSION: &str = "ans";
pub const PREFIX_QUESTION_ANSWER: &str = "qan";

pub const ALL_PREFIXES: [&str; 4] = [
    PREFIX_SURVEY,
    PREFIX_QUESTION,
    PREFIX_ANSWER_SESSION,
    PREFIX_QUESTION_ANSWER,
];
