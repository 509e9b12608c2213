//! Caller request bodies and their precondition checks.
//!
//! Fields are optional at the deserialization layer so a missing field turns
//! into [`AnalysisError::InvalidInput`] with a readable message instead of a
//! serde rejection. Blank strings count as missing.

use serde::Deserialize;

use crate::error::AnalysisError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPageRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, alias = "html_content")]
    pub html_content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTypeRequest {
    #[serde(default, alias = "product_url")]
    pub product_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SustainabilityRequest {
    #[serde(default, alias = "product_title")]
    pub product_title: Option<String>,
    #[serde(default, alias = "brand_name")]
    pub brand_name: Option<String>,
    #[serde(default, alias = "product_url")]
    pub product_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidProductPage {
    pub url: String,
    pub html_content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPageType {
    pub product_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSustainability {
    pub product_title: String,
    pub brand_name: Option<String>,
    pub product_url: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ProductPageRequest {
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidInput`] unless both `url` and
    /// `htmlContent` are non-blank.
    pub fn validate(self) -> Result<ValidProductPage, AnalysisError> {
        match (present(self.url), present(self.html_content)) {
            (Some(url), Some(html_content)) => Ok(ValidProductPage {
                url: url.trim().to_string(),
                html_content,
            }),
            _ => Err(AnalysisError::InvalidInput(
                "URL and HTML content are required.".to_string(),
            )),
        }
    }
}

impl PageTypeRequest {
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidInput`] when `productUrl` is missing or blank.
    pub fn validate(self) -> Result<ValidPageType, AnalysisError> {
        present(self.product_url)
            .map(|url| ValidPageType {
                product_url: url.trim().to_string(),
            })
            .ok_or_else(|| AnalysisError::InvalidInput("Product URL is required.".to_string()))
    }
}

impl SustainabilityRequest {
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidInput`] when `productTitle` is missing or blank.
    pub fn validate(self) -> Result<ValidSustainability, AnalysisError> {
        let product_title = present(self.product_title).ok_or_else(|| {
            AnalysisError::InvalidInput("Product title is required.".to_string())
        })?;
        Ok(ValidSustainability {
            product_title: product_title.trim().to_string(),
            brand_name: present(self.brand_name).map(|b| b.trim().to_string()),
            product_url: present(self.product_url).map(|u| u.trim().to_string()),
        })
    }
}
