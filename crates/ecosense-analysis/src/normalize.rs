//! Maps raw model replies onto the outward contract.
//!
//! Omitted strings become `""`, omitted maps `{}`, omitted lists `[]`. Scores
//! are the exception: every score must be an integer within
//! [`SCORE_MIN`]..=[`SCORE_MAX`], and a missing `overallScore` on a positive
//! reply is a contract violation.

use ecosense_core::{
    AlternativeProduct, JustifyingLink, NonProductResult, PageAnalysis, PageTypeResult, Pillar,
    PillarExplanations, PillarScores, ProductAssessment, ProductInfo, SustainabilityData,
    SCORE_MAX, SCORE_MIN,
};
use serde_json::{Map, Value};

use crate::error::Malformed;

pub type Object = Map<String, Value>;

const PRODUCT_TITLE_MAX_CHARS: usize = 100;
const BRAND_NAME_MAX_CHARS: usize = 50;

pub const DEFAULT_NO_PRODUCT_MESSAGE: &str = "No main product identified on this page.";
pub const DEFAULT_NOT_ECOMMERCE_MESSAGE: &str =
    "This does not appear to be a single-product e-commerce page.";

/// Parses reply text and requires a top-level JSON object.
///
/// # Errors
///
/// [`Malformed::InvalidJson`] when the text does not parse,
/// [`Malformed::Contract`] when it parses to something other than an object.
pub fn parse_model_json(raw: &str) -> Result<Object, Malformed> {
    match serde_json::from_str::<Value>(raw.trim()).map_err(Malformed::InvalidJson)? {
        Value::Object(object) => Ok(object),
        other => Err(Malformed::Contract(format!(
            "expected a JSON object, got {}",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Trims, collapses whitespace runs to one space, and caps the length.
#[must_use]
pub fn clean_text(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.char_indices().nth(max_chars) {
        Some((idx, _)) => collapsed[..idx].trim_end().to_string(),
        None => collapsed,
    }
}

fn discriminator(object: &Object, field: &str) -> Result<bool, Malformed> {
    match object.get(field) {
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(other) => Err(Malformed::Contract(format!(
            "{field} must be a boolean, got {}",
            json_type(other)
        ))),
        None => Err(Malformed::Contract(format!("{field} is missing"))),
    }
}

fn string_field(object: &Object, field: &str) -> String {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

fn message_or(object: &Object, default: &str) -> String {
    let message = string_field(object, "message");
    if message.is_empty() {
        default.to_string()
    } else {
        message
    }
}

/// Reads one score, accepting integral floats such as `7.0`.
///
/// Out-of-range values are reported as the model wrote them.
fn score_value(value: &Value, field: &str) -> Result<u8, Malformed> {
    let out_of_range =
        || Malformed::Contract(format!("{field} = {value} is outside {SCORE_MIN}-{SCORE_MAX}"));
    let in_range = |n: &u8| (SCORE_MIN..=SCORE_MAX).contains(n);

    if let Some(n) = value.as_u64() {
        return u8::try_from(n).ok().filter(in_range).ok_or_else(out_of_range);
    }
    if value.is_i64() {
        return Err(out_of_range());
    }

    match value.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => {
            if f < f64::from(SCORE_MIN) || f > f64::from(SCORE_MAX) {
                return Err(out_of_range());
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let score = f as u8;
            Ok(score)
        }
        _ => Err(Malformed::Contract(format!(
            "{field} must be an integer, got {}",
            json_type(value)
        ))),
    }
}

fn required_score(object: &Object, field: &str) -> Result<u8, Malformed> {
    match object.get(field) {
        Some(Value::Null) | None => Err(Malformed::Contract(format!("{field} is missing"))),
        Some(value) => score_value(value, field),
    }
}

/// Returns the named field as an object, or `None` when absent or null.
fn optional_object<'a>(object: &'a Object, field: &str) -> Result<Option<&'a Object>, Malformed> {
    match object.get(field) {
        Some(Value::Object(inner)) => Ok(Some(inner)),
        Some(Value::Null) | None => Ok(None),
        Some(other) => Err(Malformed::Contract(format!(
            "{field} must be an object, got {}",
            json_type(other)
        ))),
    }
}

fn optional_array<'a>(object: &'a Object, field: &str) -> Result<&'a [Value], Malformed> {
    match object.get(field) {
        Some(Value::Array(items)) => Ok(items),
        Some(Value::Null) | None => Ok(&[]),
        Some(other) => Err(Malformed::Contract(format!(
            "{field} must be an array, got {}",
            json_type(other)
        ))),
    }
}

fn pillar_scores(object: &Object) -> Result<PillarScores, Malformed> {
    let mut scores = PillarScores::new();
    let Some(raw) = optional_object(object, "pillarScores")? else {
        return Ok(scores);
    };
    for (label, value) in raw {
        let Some(pillar) = Pillar::from_label(label) else {
            tracing::warn!(key = %label, "dropping unknown pillar score");
            continue;
        };
        if value.is_null() {
            continue;
        }
        let score = score_value(value, &format!("pillarScores.{}", pillar.key()))?;
        if let Some(previous) = scores.insert(pillar, score) {
            if previous != score {
                return Err(Malformed::Contract(format!(
                    "pillarScores.{} given twice with different values ({previous} and {score})",
                    pillar.key()
                )));
            }
            tracing::warn!(key = %label, pillar = pillar.key(), "duplicate pillar score label");
        }
    }
    Ok(scores)
}

fn pillar_explanations(object: &Object) -> Result<PillarExplanations, Malformed> {
    let mut explanations = PillarExplanations::new();
    let Some(raw) = optional_object(object, "pillarExplanations")? else {
        return Ok(explanations);
    };
    for (label, value) in raw {
        let Some(pillar) = Pillar::from_label(label) else {
            tracing::warn!(key = %label, "dropping unknown pillar explanation");
            continue;
        };
        let Some(text) = value.as_str() else {
            continue;
        };
        if explanations.contains_key(&pillar) {
            tracing::warn!(key = %label, pillar = pillar.key(), "dropping duplicate pillar explanation");
            continue;
        }
        explanations.insert(pillar, text.trim().to_string());
    }
    Ok(explanations)
}

fn is_web_url(raw: &str) -> bool {
    url::Url::parse(raw).is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
}

fn justifying_links(object: &Object) -> Result<Vec<JustifyingLink>, Malformed> {
    let links = optional_array(object, "justifyingLinks")?
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|link| {
            let url = string_field(link, "url");
            if is_web_url(&url) {
                Some(JustifyingLink {
                    title: string_field(link, "title"),
                    url,
                })
            } else {
                tracing::warn!(%url, "dropping justifying link without a usable http(s) URL");
                None
            }
        })
        .collect();
    Ok(links)
}

fn alternative_products(object: &Object) -> Result<Vec<AlternativeProduct>, Malformed> {
    optional_array(object, "alternativeProducts")?
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| match item.as_object() {
            Some(alt) => Some((idx, alt)),
            None => {
                tracing::warn!(index = idx, "dropping alternative product that is not an object");
                None
            }
        })
        .map(|(idx, alt)| {
            let field = format!("alternativeProducts[{idx}].score");
            let score = match alt.get("score").or_else(|| alt.get("estimatedScore")) {
                Some(Value::Null) | None => {
                    return Err(Malformed::Contract(format!("{field} is missing")))
                }
                Some(value) => score_value(value, &field)?,
            };
            Ok(AlternativeProduct {
                name: clean_text(&string_field(alt, "name"), PRODUCT_TITLE_MAX_CHARS),
                score,
                reason: string_field(alt, "reason"),
            })
        })
        .collect()
}

/// Normalizes a full-page analysis reply, branching on `hasMainProduct`.
///
/// # Errors
///
/// [`Malformed::Contract`] when the discriminator is missing or not a boolean,
/// or when any score is missing, non-integer, or out of range.
pub fn page_analysis(object: &Object) -> Result<PageAnalysis, Malformed> {
    if !discriminator(object, "hasMainProduct")? {
        return Ok(PageAnalysis::NotProduct(NonProductResult {
            message: message_or(object, DEFAULT_NO_PRODUCT_MESSAGE),
        }));
    }

    Ok(PageAnalysis::Product(ProductAssessment {
        product_title: clean_text(&string_field(object, "productTitle"), PRODUCT_TITLE_MAX_CHARS),
        brand_name: clean_text(&string_field(object, "brandName"), BRAND_NAME_MAX_CHARS),
        overall_score: required_score(object, "overallScore")?,
        overall_explanation: string_field(object, "overallExplanation"),
        pillar_scores: pillar_scores(object)?,
        pillar_explanations: pillar_explanations(object)?,
        justifying_links: justifying_links(object)?,
        alternative_products: alternative_products(object)?,
    }))
}

/// Normalizes a page-type reply, branching on `isEcommercePage`.
///
/// `product_url` is echoed from the request rather than trusted from the model.
///
/// # Errors
///
/// [`Malformed::Contract`] when the discriminator is missing or not a boolean.
pub fn page_type(object: &Object, product_url: &str) -> Result<PageTypeResult, Malformed> {
    if !discriminator(object, "isEcommercePage")? {
        return Ok(PageTypeResult::NotEcommerce(NonProductResult {
            message: message_or(object, DEFAULT_NOT_ECOMMERCE_MESSAGE),
        }));
    }

    Ok(PageTypeResult::Ecommerce(ProductInfo {
        product_title: clean_text(&string_field(object, "productTitle"), PRODUCT_TITLE_MAX_CHARS),
        brand_name: clean_text(&string_field(object, "brandName"), BRAND_NAME_MAX_CHARS),
        product_url: product_url.to_string(),
    }))
}

/// Normalizes a sustainability-only reply.
///
/// # Errors
///
/// [`Malformed::Contract`] when any score is missing, non-integer, or out of range.
pub fn sustainability(object: &Object) -> Result<SustainabilityData, Malformed> {
    Ok(SustainabilityData {
        overall_score: required_score(object, "overallScore")?,
        overall_explanation: string_field(object, "overallExplanation"),
        pillar_scores: pillar_scores(object)?,
        pillar_explanations: pillar_explanations(object)?,
        alternative_products: alternative_products(object)?,
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
