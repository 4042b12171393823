use std::sync::Arc;

use ledger::{Mission, RecordStore, mission};
use tokio::task::spawn_blocking;

use crate::{
    error::AppError::{self, MalformedPayload},
    state::AppState,
};

#[derive(Debug, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub checks: Vec<String>,
}

/// Reads `name` and every repeated `checks` field of a submission form.
pub fn get_submission_from_body(missions: &[Mission], body: &[u8]) -> Result<Submission, AppError> {
    let mut name = String::new();
    let mut checks: Vec<String> = Vec::new();

    for (key, value) in form_urlencoded::parse(body) {
        match key.as_ref() {
            "name" => name = value.trim().to_string(),
            "checks" => {
                if mission::find(missions, &value).is_none() {
                    return Err(MalformedPayload(format!("Unknown mission {value}")));
                }

                if !checks.iter().any(|check| *check == value) {
                    checks.push(value.into_owned());
                }
            }
            _ => {}
        }
    }

    if name.is_empty() {
        return Err(MalformedPayload("Name is required".to_string()));
    }

    Ok(Submission { name, checks })
}

/// Missing `name` reads as blank, which the store treats as a no-op.
pub fn get_name_from_body(body: &[u8]) -> String {
    form_urlencoded::parse(body)
        .find(|(key, _)| key == "name")
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

/// Runs blocking store work off the async workers.
pub async fn with_store<T, F>(state: Arc<AppState>, f: F) -> Result<T, AppError>
where
    F: FnOnce(&RecordStore) -> ledger::Result<T> + Send + 'static,
    T: Send + 'static,
{
    spawn_blocking(move || f(&state.store))
        .await
        .map_err(|e| AppError::InternalError(Box::new(e)))?
        .map_err(AppError::from)
}
