use axum::{extract::rejection::JsonRejection, extract::State, Json};
use ecosense_analysis::PageTypeRequest;
use ecosense_core::PageTypeResult;

use super::{ApiError, AppState, Success};

/// `POST /check-page-type`: decide from the URL whether this is a product page.
pub(super) async fn check_page_type(
    State(state): State<AppState>,
    payload: Result<Json<PageTypeRequest>, JsonRejection>,
) -> Result<Json<Success<PageTypeResult>>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::from_rejection(&e))?;
    let result = state.analyzer.check_page_type(request).await?;
    Ok(Json(Success::new(result)))
}
