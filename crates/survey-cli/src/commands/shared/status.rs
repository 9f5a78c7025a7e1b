use survey_db::error::SurveyError;

/// Attach the HTTP-equivalent status code to a service error.
pub fn with_status(error: SurveyError) -> anyhow::Error {
    let code = error.status_code();
    anyhow::Error::new(error).context(format!("request failed ({code})"))
}
