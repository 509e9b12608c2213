use axum::{extract::rejection::JsonRejection, extract::State, Json};
use ecosense_analysis::ProductPageRequest;
use ecosense_core::PageAnalysis;

use super::{ApiError, AppState, Success};

/// `POST /analyze-product-page`: classify the page and assess its product.
pub(super) async fn analyze_product_page(
    State(state): State<AppState>,
    payload: Result<Json<ProductPageRequest>, JsonRejection>,
) -> Result<Json<Success<PageAnalysis>>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::from_rejection(&e))?;
    let analysis = state.analyzer.analyze_product_page(request).await?;
    Ok(Json(Success::new(analysis)))
}
