//! Outward-facing assessment types.
//!
//! Every value here is built fresh from one model reply and dropped once the
//! response is written. Field names serialize in camelCase to match the
//! browser extension's contract.

use std::collections::BTreeMap;

use serde::Serialize;

/// Lowest score any assessment may carry.
pub const SCORE_MIN: u8 = 0;
/// Highest score any assessment may carry. All scores share the 0-10 scale.
pub const SCORE_MAX: u8 = 10;

/// One of the six fixed environmental-impact dimensions.
///
/// Declaration order is the serialization order of pillar maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Pillar {
    CarbonFootprint,
    WaterUsage,
    WasteGenerationCircularity,
    ResourceDepletion,
    BiodiversityEcosystemImpact,
    Pollution,
}

impl Pillar {
    pub const ALL: [Pillar; 6] = [
        Pillar::CarbonFootprint,
        Pillar::WaterUsage,
        Pillar::WasteGenerationCircularity,
        Pillar::ResourceDepletion,
        Pillar::BiodiversityEcosystemImpact,
        Pillar::Pollution,
    ];

    /// Canonical camelCase key used on the wire.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Pillar::CarbonFootprint => "carbonFootprint",
            Pillar::WaterUsage => "waterUsage",
            Pillar::WasteGenerationCircularity => "wasteGenerationCircularity",
            Pillar::ResourceDepletion => "resourceDepletion",
            Pillar::BiodiversityEcosystemImpact => "biodiversityEcosystemImpact",
            Pillar::Pollution => "pollution",
        }
    }

    /// Human-readable label, as used in prompt prose.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Pillar::CarbonFootprint => "Carbon Footprint",
            Pillar::WaterUsage => "Water Usage",
            Pillar::WasteGenerationCircularity => "Waste Generation & Circularity",
            Pillar::ResourceDepletion => "Resource Depletion",
            Pillar::BiodiversityEcosystemImpact => "Biodiversity & Ecosystem Impact",
            Pillar::Pollution => "Pollution",
        }
    }

    /// Resolves either the canonical key or the display name, ignoring ASCII case.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|p| {
            p.key().eq_ignore_ascii_case(label) || p.display_name().eq_ignore_ascii_case(label)
        })
    }
}

pub type PillarScores = BTreeMap<Pillar, u8>;
pub type PillarExplanations = BTreeMap<Pillar, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JustifyingLink {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlternativeProduct {
    pub name: String,
    pub score: u8,
    pub reason: String,
}

/// Full assessment of a single-product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAssessment {
    pub product_title: String,
    pub brand_name: String,
    pub overall_score: u8,
    pub overall_explanation: String,
    pub pillar_scores: PillarScores,
    pub pillar_explanations: PillarExplanations,
    pub justifying_links: Vec<JustifyingLink>,
    pub alternative_products: Vec<AlternativeProduct>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NonProductResult {
    pub message: String,
}

/// Result of the full-page analysis. Serializes with a `hasMainProduct`
/// discriminator derived from the variant, so exactly one shape is emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAnalysis {
    Product(ProductAssessment),
    NotProduct(NonProductResult),
}

impl PageAnalysis {
    #[must_use]
    pub fn has_main_product(&self) -> bool {
        matches!(self, PageAnalysis::Product(_))
    }
}

impl Serialize for PageAnalysis {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Tagged<'a, T: Serialize> {
            has_main_product: bool,
            #[serde(flatten)]
            body: &'a T,
        }

        match self {
            PageAnalysis::Product(body) => Tagged {
                has_main_product: true,
                body,
            }
            .serialize(serializer),
            PageAnalysis::NotProduct(body) => Tagged {
                has_main_product: false,
                body,
            }
            .serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInfo {
    pub product_title: String,
    pub brand_name: String,
    pub product_url: String,
}

/// Result of the page-type check, discriminated by `isEcommercePage`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTypeResult {
    Ecommerce(ProductInfo),
    NotEcommerce(NonProductResult),
}

impl PageTypeResult {
    #[must_use]
    pub fn is_ecommerce_page(&self) -> bool {
        matches!(self, PageTypeResult::Ecommerce(_))
    }
}

impl Serialize for PageTypeResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Ecommerce<'a> {
            is_ecommerce_page: bool,
            product_info: &'a ProductInfo,
        }

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct NotEcommerce<'a> {
            is_ecommerce_page: bool,
            message: &'a str,
        }

        match self {
            PageTypeResult::Ecommerce(info) => Ecommerce {
                is_ecommerce_page: true,
                product_info: info,
            }
            .serialize(serializer),
            PageTypeResult::NotEcommerce(result) => NotEcommerce {
                is_ecommerce_page: false,
                message: &result.message,
            }
            .serialize(serializer),
        }
    }
}

/// Sustainability-only assessment for a product identified by title/brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SustainabilityData {
    pub overall_score: u8,
    pub overall_explanation: String,
    pub pillar_scores: PillarScores,
    pub pillar_explanations: PillarExplanations,
    pub alternative_products: Vec<AlternativeProduct>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_assessment() -> ProductAssessment {
        ProductAssessment {
            product_title: "EcoBottle".to_string(),
            brand_name: "EcoCo".to_string(),
            overall_score: 8,
            overall_explanation: "Durable steel.".to_string(),
            pillar_scores: PillarScores::from([(Pillar::Pollution, 7), (Pillar::CarbonFootprint, 6)]),
            pillar_explanations: PillarExplanations::new(),
            justifying_links: vec![],
            alternative_products: vec![],
        }
    }

    #[test]
    fn pillar_resolves_keys_and_display_names() {
        assert_eq!(Pillar::from_label("waterUsage"), Some(Pillar::WaterUsage));
        assert_eq!(
            Pillar::from_label("Waste Generation & Circularity"),
            Some(Pillar::WasteGenerationCircularity)
        );
        assert_eq!(Pillar::from_label(" POLLUTION "), Some(Pillar::Pollution));
        assert_eq!(Pillar::from_label("noise"), None);
    }

    #[test]
    fn product_analysis_serializes_with_true_discriminator() {
        let json = serde_json::to_value(PageAnalysis::Product(sample_assessment())).unwrap();
        assert_eq!(json["hasMainProduct"], true);
        assert_eq!(json["productTitle"], "EcoBottle");
        assert_eq!(json["overallScore"], 8);
        assert!(json.get("message").is_none());
    }

    #[test]
    fn pillar_maps_serialize_in_declaration_order() {
        let json = serde_json::to_string(&sample_assessment().pillar_scores).unwrap();
        assert_eq!(json, r#"{"carbonFootprint":6,"pollution":7}"#);
    }

    #[test]
    fn non_product_serializes_with_false_discriminator() {
        let analysis = PageAnalysis::NotProduct(NonProductResult {
            message: "category page".to_string(),
        });
        assert!(!analysis.has_main_product());
        let json = serde_json::to_value(analysis).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"hasMainProduct": false, "message": "category page"})
        );
    }

    #[test]
    fn page_type_result_nests_product_info() {
        let result = PageTypeResult::Ecommerce(ProductInfo {
            product_title: "Trail Runner".to_string(),
            brand_name: "Nike".to_string(),
            product_url: "https://shop.example/p/1".to_string(),
        });
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["isEcommercePage"], true);
        assert_eq!(json["productInfo"]["brandName"], "Nike");
        assert_eq!(json["productInfo"]["productUrl"], "https://shop.example/p/1");
    }
}
