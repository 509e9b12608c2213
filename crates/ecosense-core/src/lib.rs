//! Shared configuration and request-scoped domain types for the Eco-Sense relay.

pub mod app_config;
pub mod config;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use types::{
    AlternativeProduct, JustifyingLink, NonProductResult, PageAnalysis, PageTypeResult, Pillar,
    PillarExplanations, PillarScores, ProductAssessment, ProductInfo, SustainabilityData,
    SCORE_MAX, SCORE_MIN,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
