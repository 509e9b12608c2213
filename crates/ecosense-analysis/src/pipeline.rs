//! The single prompt → model → parse → normalize pipeline shared by all
//! three endpoints.

use std::sync::Arc;

use ecosense_core::{PageAnalysis, PageTypeResult, SustainabilityData};
use ecosense_llm::{ModelInvoker, Schema};

use crate::error::{AnalysisError, Malformed};
use crate::normalize::{self, Object};
use crate::prompt;
use crate::request::{
    PageTypeRequest, ProductPageRequest, SustainabilityRequest, ValidPageType, ValidProductPage,
    ValidSustainability,
};
use crate::search::{self, QueryResults, SearchProvider};

/// Output schemas, built once and reused for every request.
#[derive(Debug, Clone)]
pub struct Schemas {
    pub product_page: Schema,
    pub page_type: Schema,
    pub sustainability: Schema,
}

impl Default for Schemas {
    fn default() -> Self {
        Self {
            product_page: prompt::product_page_schema(),
            page_type: prompt::page_type_schema(),
            sustainability: prompt::sustainability_schema(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AnalyzerOptions {
    pub html_max_chars: usize,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            html_max_chars: 100_000,
        }
    }
}

impl From<&ecosense_core::AppConfig> for AnalyzerOptions {
    fn from(config: &ecosense_core::AppConfig) -> Self {
        Self {
            html_max_chars: config.prompt_html_max_chars,
        }
    }
}

/// One endpoint's template, schema, and normalizer.
pub trait AnalysisTask {
    type Output;

    /// Endpoint name used in log fields.
    const NAME: &'static str;

    fn prompt(&self, options: &AnalyzerOptions) -> String;

    fn schema<'s>(&self, schemas: &'s Schemas) -> &'s Schema;

    /// # Errors
    ///
    /// Returns [`Malformed::Contract`] when the reply violates the endpoint's contract.
    fn normalize(&self, reply: &Object) -> Result<Self::Output, Malformed>;
}

impl AnalysisTask for ValidProductPage {
    type Output = PageAnalysis;
    const NAME: &'static str = "analyze-product-page";

    fn prompt(&self, options: &AnalyzerOptions) -> String {
        prompt::product_page_prompt(&self.url, &self.html_content, options.html_max_chars)
    }

    fn schema<'s>(&self, schemas: &'s Schemas) -> &'s Schema {
        &schemas.product_page
    }

    fn normalize(&self, reply: &Object) -> Result<PageAnalysis, Malformed> {
        normalize::page_analysis(reply)
    }
}

impl AnalysisTask for ValidPageType {
    type Output = PageTypeResult;
    const NAME: &'static str = "check-page-type";

    fn prompt(&self, _options: &AnalyzerOptions) -> String {
        prompt::page_type_prompt(&self.product_url)
    }

    fn schema<'s>(&self, schemas: &'s Schemas) -> &'s Schema {
        &schemas.page_type
    }

    fn normalize(&self, reply: &Object) -> Result<PageTypeResult, Malformed> {
        normalize::page_type(reply, &self.product_url)
    }
}

/// Sustainability request joined with the sources found for it.
struct SourcedSustainability {
    request: ValidSustainability,
    sources: Vec<QueryResults>,
}

impl AnalysisTask for SourcedSustainability {
    type Output = SustainabilityData;
    const NAME: &'static str = "analyze-sustainability";

    fn prompt(&self, _options: &AnalyzerOptions) -> String {
        prompt::sustainability_prompt(
            &self.request.product_title,
            self.request.brand_name.as_deref(),
            self.request.product_url.as_deref(),
            &self.sources,
        )
    }

    fn schema<'s>(&self, schemas: &'s Schemas) -> &'s Schema {
        &schemas.sustainability
    }

    fn normalize(&self, reply: &Object) -> Result<SustainabilityData, Malformed> {
        normalize::sustainability(reply)
    }
}

/// Drives the analysis endpoints. Holds no per-request state, so one
/// instance is shared across all concurrent requests.
pub struct Analyzer {
    invoker: Arc<dyn ModelInvoker>,
    search: Arc<dyn SearchProvider>,
    schemas: Schemas,
    options: AnalyzerOptions,
}

impl Analyzer {
    #[must_use]
    pub fn new(
        invoker: Arc<dyn ModelInvoker>,
        search: Arc<dyn SearchProvider>,
        options: AnalyzerOptions,
    ) -> Self {
        Self {
            invoker,
            search,
            schemas: Schemas::default(),
            options,
        }
    }

    /// Classifies a page and, for single-product pages, assesses the product.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::InvalidInput`] when `url` or `htmlContent` is missing.
    /// - [`AnalysisError::ModelInvocation`] when the model call fails.
    /// - [`AnalysisError::MalformedModelOutput`] when the reply is unusable.
    pub async fn analyze_product_page(
        &self,
        request: ProductPageRequest,
    ) -> Result<PageAnalysis, AnalysisError> {
        let task = request.validate()?;
        tracing::info!(endpoint = ValidProductPage::NAME, url = %task.url, "analyzing product page");
        let analysis = self.run(&task).await?;
        tracing::info!(
            endpoint = ValidProductPage::NAME,
            has_main_product = analysis.has_main_product(),
            "analysis complete"
        );
        Ok(analysis)
    }

    /// Decides from the URL alone whether it is a product detail page.
    ///
    /// # Errors
    ///
    /// Same as [`Analyzer::analyze_product_page`], with `productUrl` as the
    /// required field.
    pub async fn check_page_type(
        &self,
        request: PageTypeRequest,
    ) -> Result<PageTypeResult, AnalysisError> {
        let task = request.validate()?;
        tracing::info!(endpoint = ValidPageType::NAME, url = %task.product_url, "checking page type");
        let result = self.run(&task).await?;
        tracing::info!(
            endpoint = ValidPageType::NAME,
            is_ecommerce_page = result.is_ecommerce_page(),
            "page type check complete"
        );
        Ok(result)
    }

    /// Assesses a product by title/brand, grounded on looked-up sources.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::InvalidInput`] when `productTitle` is missing.
    /// - [`AnalysisError::NoDataFound`] when the search provider finds nothing.
    /// - [`AnalysisError::ModelInvocation`] / [`AnalysisError::MalformedModelOutput`]
    ///   as for the other endpoints.
    pub async fn analyze_sustainability(
        &self,
        request: SustainabilityRequest,
    ) -> Result<SustainabilityData, AnalysisError> {
        let request = request.validate()?;
        tracing::info!(
            endpoint = SourcedSustainability::NAME,
            title = %request.product_title,
            "analyzing sustainability"
        );

        let queries = search::build_queries(&request.product_title, request.brand_name.as_deref());
        let sources = self.search.search(&queries).await;
        let source_count: usize = sources.iter().map(|q| q.results.len()).sum();
        if source_count == 0 {
            tracing::info!(endpoint = SourcedSustainability::NAME, "no sources found");
            return Err(AnalysisError::NoDataFound(
                "No sustainability sources were found for this product.".to_string(),
            ));
        }
        tracing::debug!(source_count, "sources found");

        self.run(&SourcedSustainability { request, sources }).await
    }

    async fn run<T: AnalysisTask>(&self, task: &T) -> Result<T::Output, AnalysisError> {
        let prompt = task.prompt(&self.options);
        let raw = self
            .invoker
            .invoke(&prompt, task.schema(&self.schemas))
            .await
            .map_err(|e| {
                tracing::error!(endpoint = T::NAME, error = %e, "model invocation failed");
                AnalysisError::ModelInvocation(e)
            })?;
        tracing::debug!(endpoint = T::NAME, raw = %raw, "model reply");

        normalize::parse_model_json(&raw)
            .and_then(|reply| task.normalize(&reply))
            .map_err(|detail| {
                tracing::error!(
                    endpoint = T::NAME,
                    error = %detail,
                    raw = %raw,
                    "model reply rejected"
                );
                AnalysisError::MalformedModelOutput { detail, raw }
            })
    }
}
