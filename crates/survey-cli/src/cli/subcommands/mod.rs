mod answer;
mod dashboard;
mod survey;

pub use answer::AnswerCommands;
pub use dashboard::DashboardCommands;
pub use survey::SurveyCommands;
