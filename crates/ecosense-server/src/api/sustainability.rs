use axum::{extract::rejection::JsonRejection, extract::State, Json};
use ecosense_analysis::SustainabilityRequest;
use ecosense_core::SustainabilityData;
use serde::Serialize;

use super::{ApiError, AppState, Success};

#[derive(Debug, Serialize)]
pub(super) struct DataBody {
    data: SustainabilityData,
}

/// `POST /analyze-sustainability`: assess a product known by title and brand.
///
/// "No sources found" comes back as HTTP 200 with `success: false`.
pub(super) async fn analyze_sustainability(
    State(state): State<AppState>,
    payload: Result<Json<SustainabilityRequest>, JsonRejection>,
) -> Result<Json<Success<DataBody>>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::from_rejection(&e))?;
    let data = state.analyzer.analyze_sustainability(request).await?;
    Ok(Json(Success::new(DataBody { data })))
}
