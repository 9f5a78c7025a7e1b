//! Entity structs for all survey domain objects.
//!
//! Each entity maps to a table in the libSQL database. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip and schema
//! validation.

mod answer;
mod question;
mod survey;

pub use answer::{AnswerSession, QuestionAnswer};
pub use question::{Question, QuestionConfig};
pub use survey::Survey;
