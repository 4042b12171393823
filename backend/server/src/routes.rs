use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{Html, IntoResponse, Redirect, Response},
};
use ledger::{Selection, SortMode, export_table};
use serde::Deserialize;
use tracing::info;

use crate::{
    error::AppError,
    pages,
    state::AppState,
    utils::{get_name_from_body, get_submission_from_body, with_store},
};

pub const EXPORT_FILE_NAME: &str = "missions.csv";

#[derive(Debug, Default, Deserialize)]
pub struct ViewParams {
    q: Option<String>,
    date: Option<String>,
    sort: Option<String>,
}

impl ViewParams {
    fn selection(&self) -> Selection {
        Selection::new(
            self.q.as_deref(),
            self.date.as_deref(),
            SortMode::from_param(self.sort.as_deref()),
        )
    }
}

pub async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(pages::index(&state.missions))
}

pub async fn result_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Html<String>, AppError> {
    let submission = get_submission_from_body(&state.missions, &body)?;

    let record = with_store(state.clone(), move |store| {
        store.append(&submission.name, submission.checks)
    })
    .await?;

    Ok(Html(pages::result(&record, &state.missions)))
}

pub async fn admin_handler() -> Html<String> {
    Html(pages::admin())
}

pub async fn summary_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ViewParams>,
) -> Result<Html<String>, AppError> {
    let records = with_store(state.clone(), |store| store.load_all()).await?;

    let selection = params.selection();
    let entries = selection.apply(&records);

    Ok(Html(pages::summary(&entries, &state.missions, &selection)))
}

pub async fn edit_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    body: Bytes,
) -> Result<Redirect, AppError> {
    let name = get_name_from_body(&body);

    with_store(state, move |store| store.edit_name(index, &name)).await?;

    Ok(Redirect::to("/admin/summary"))
}

pub async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Redirect, AppError> {
    with_store(state, move |store| store.delete(index)).await?;

    Ok(Redirect::to("/admin/summary"))
}

pub async fn export_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ViewParams>,
) -> Result<Response, AppError> {
    let records = with_store(state.clone(), |store| store.load_all()).await?;

    let entries = params.selection().apply(&records);
    let csv = export_table(&entries, &state.missions).to_csv();

    info!("Exporting {} records as {}", entries.len(), state.encoding.name());

    Ok((
        [
            (
                CONTENT_TYPE,
                format!("text/csv; charset={}", state.encoding.name()),
            ),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        state.encoding.encode(&csv),
    )
        .into_response())
}
