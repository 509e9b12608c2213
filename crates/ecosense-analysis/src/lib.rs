//! Request validation, prompt construction, and reply normalization for the
//! three analysis endpoints.
//!
//! All three run through one pipeline ([`Analyzer`]): render a fixed prompt,
//! call the model once, parse its JSON, and reshape it into the outward
//! contract types from `ecosense_core`.

pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod prompt;
pub mod request;
pub mod search;

pub use error::{AnalysisError, Malformed};
pub use pipeline::{AnalysisTask, Analyzer, AnalyzerOptions, Schemas};
pub use request::{PageTypeRequest, ProductPageRequest, SustainabilityRequest};
pub use search::{QueryResults, SearchProvider, SearchResult, StubSearch};
