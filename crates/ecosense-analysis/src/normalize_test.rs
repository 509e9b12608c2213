use super::*;
use serde_json::json;

fn object(value: Value) -> Object {
    match value {
        Value::Object(map) => map,
        _ => panic!("test fixture must be an object"),
    }
}

#[test]
fn parse_rejects_non_json() {
    assert!(matches!(
        parse_model_json("not json"),
        Err(Malformed::InvalidJson(_))
    ));
}

#[test]
fn parse_rejects_non_object() {
    let err = parse_model_json("[1,2]").unwrap_err();
    assert!(matches!(err, Malformed::Contract(ref r) if r.contains("an array")));
}

#[test]
fn clean_text_collapses_and_caps() {
    assert_eq!(clean_text("  LG   Monitor\n\t27\" ", 100), "LG Monitor 27\"");
    assert_eq!(clean_text("abcdef", 3), "abc");
    assert_eq!(clean_text("ab cd", 3), "ab");
}

#[test]
fn positive_reply_fills_defaults() {
    let reply = object(json!({
        "hasMainProduct": true,
        "productTitle": "EcoBottle",
        "overallScore": 8
    }));
    let PageAnalysis::Product(assessment) = page_analysis(&reply).unwrap() else {
        panic!("expected product branch");
    };
    assert_eq!(assessment.product_title, "EcoBottle");
    assert_eq!(assessment.brand_name, "");
    assert_eq!(assessment.overall_explanation, "");
    assert!(assessment.pillar_scores.is_empty());
    assert!(assessment.pillar_explanations.is_empty());
    assert!(assessment.justifying_links.is_empty());
    assert!(assessment.alternative_products.is_empty());
}

#[test]
fn negative_reply_uses_default_message() {
    let reply = object(json!({"hasMainProduct": false}));
    assert_eq!(
        page_analysis(&reply).unwrap(),
        PageAnalysis::NotProduct(NonProductResult {
            message: DEFAULT_NO_PRODUCT_MESSAGE.to_string()
        })
    );
}

#[test]
fn missing_discriminator_is_a_contract_violation() {
    let reply = object(json!({"productTitle": "EcoBottle"}));
    let err = page_analysis(&reply).unwrap_err();
    assert!(matches!(err, Malformed::Contract(ref r) if r == "hasMainProduct is missing"));
}

#[test]
fn string_discriminator_is_rejected() {
    let reply = object(json!({"hasMainProduct": "true", "overallScore": 5}));
    assert!(page_analysis(&reply).is_err());
}

#[test]
fn out_of_range_overall_score_is_rejected() {
    let reply = object(json!({"hasMainProduct": true, "overallScore": 42}));
    let err = page_analysis(&reply).unwrap_err();
    assert!(matches!(err, Malformed::Contract(ref r) if r.contains("overallScore = 42")));
}

#[test]
fn negative_and_fractional_scores_are_rejected() {
    let reply = object(json!({"hasMainProduct": true, "overallScore": -1}));
    assert!(page_analysis(&reply).is_err());
    let reply = object(json!({"hasMainProduct": true, "overallScore": 7.5}));
    assert!(page_analysis(&reply).is_err());
}

#[test]
fn integral_float_scores_are_accepted() {
    let reply = object(json!({"hasMainProduct": true, "overallScore": 7.0}));
    let PageAnalysis::Product(assessment) = page_analysis(&reply).unwrap() else {
        panic!("expected product branch");
    };
    assert_eq!(assessment.overall_score, 7);
}

#[test]
fn missing_overall_score_is_rejected() {
    let reply = object(json!({"hasMainProduct": true}));
    assert!(page_analysis(&reply).is_err());
}

#[test]
fn pillar_display_names_map_to_canonical_keys() {
    let reply = object(json!({
        "hasMainProduct": true,
        "overallScore": 6,
        "pillarScores": {"Carbon Footprint": 4, "waterUsage": 7, "Noise": 3},
        "pillarExplanations": {"Biodiversity & Ecosystem Impact": " Minimal land use. "}
    }));
    let PageAnalysis::Product(assessment) = page_analysis(&reply).unwrap() else {
        panic!("expected product branch");
    };
    assert_eq!(
        assessment.pillar_scores,
        PillarScores::from([(Pillar::CarbonFootprint, 4), (Pillar::WaterUsage, 7)])
    );
    assert_eq!(
        assessment.pillar_explanations[&Pillar::BiodiversityEcosystemImpact],
        "Minimal land use."
    );
}

#[test]
fn out_of_range_pillar_score_names_the_pillar() {
    let reply = object(json!({
        "hasMainProduct": true,
        "overallScore": 6,
        "pillarScores": {"pollution": 11}
    }));
    let err = page_analysis(&reply).unwrap_err();
    assert!(matches!(err, Malformed::Contract(ref r) if r.contains("pillarScores.pollution")));
}

#[test]
fn links_without_web_urls_are_dropped() {
    let reply = object(json!({
        "hasMainProduct": true,
        "overallScore": 6,
        "justifyingLinks": [
            {"title": "Good", "url": "https://news.example/a"},
            {"title": "Relative", "url": "/a"},
            {"title": "Script", "url": "javascript:alert(1)"},
            "not an object"
        ]
    }));
    let PageAnalysis::Product(assessment) = page_analysis(&reply).unwrap() else {
        panic!("expected product branch");
    };
    assert_eq!(
        assessment.justifying_links,
        vec![JustifyingLink {
            title: "Good".to_string(),
            url: "https://news.example/a".to_string()
        }]
    );
}

#[test]
fn alternatives_accept_estimated_score_alias() {
    let reply = object(json!({
        "overallScore": 5,
        "alternativeProducts": [
            {"name": "Klean Kanteen", "estimatedScore": 8, "reason": "Recycled steel."},
            {"name": "Hydro Flask", "score": 7}
        ]
    }));
    let data = sustainability(&reply).unwrap();
    assert_eq!(data.alternative_products.len(), 2);
    assert_eq!(data.alternative_products[0].score, 8);
    assert_eq!(data.alternative_products[1].reason, "");
}

#[test]
fn alternative_without_score_is_rejected() {
    let reply = object(json!({
        "overallScore": 5,
        "alternativeProducts": [{"name": "Mystery"}]
    }));
    let err = sustainability(&reply).unwrap_err();
    assert!(
        matches!(err, Malformed::Contract(ref r) if r == "alternativeProducts[0].score is missing")
    );
}

#[test]
fn wrongly_typed_collections_are_rejected() {
    let reply = object(json!({"overallScore": 5, "pillarScores": [1, 2]}));
    assert!(sustainability(&reply).is_err());
}

#[test]
fn page_type_echoes_request_url() {
    let reply = object(json!({
        "isEcommercePage": true,
        "productTitle": "  Trail   Runner ",
        "brandName": "Nike",
        "productUrl": "https://elsewhere.example"
    }));
    let result = page_type(&reply, "https://shop.example/p/1").unwrap();
    assert_eq!(
        result,
        PageTypeResult::Ecommerce(ProductInfo {
            product_title: "Trail Runner".to_string(),
            brand_name: "Nike".to_string(),
            product_url: "https://shop.example/p/1".to_string(),
        })
    );
}

#[test]
fn page_type_negative_keeps_model_message() {
    let reply = object(json!({"isEcommercePage": false, "message": "homepage"}));
    let result = page_type(&reply, "https://shop.example").unwrap();
    assert!(!result.is_ecommerce_page());
    assert_eq!(
        result,
        PageTypeResult::NotEcommerce(NonProductResult {
            message: "homepage".to_string()
        })
    );
}

#[test]
fn oversized_score_is_reported_as_written() {
    let reply = object(json!({"hasMainProduct": true, "overallScore": u64::MAX}));
    let err = page_analysis(&reply).unwrap_err();
    assert!(
        matches!(err, Malformed::Contract(ref r) if r == "overallScore = 18446744073709551615 is outside 0-10"),
        "unexpected error: {err}"
    );
}

#[test]
fn negative_score_is_reported_as_written() {
    let reply = object(json!({"overallScore": -3}));
    let err = sustainability(&reply).unwrap_err();
    assert!(matches!(err, Malformed::Contract(ref r) if r == "overallScore = -3 is outside 0-10"));
}

#[test]
fn conflicting_pillar_labels_are_rejected() {
    let reply = object(json!({
        "hasMainProduct": true,
        "overallScore": 6,
        "pillarScores": {"Carbon Footprint": 9, "carbonFootprint": 2}
    }));
    let err = page_analysis(&reply).unwrap_err();
    assert!(
        matches!(err, Malformed::Contract(ref r) if r.contains("pillarScores.carbonFootprint given twice"))
    );
}

#[test]
fn agreeing_pillar_labels_collapse_to_one_entry() {
    let reply = object(json!({
        "overallScore": 6,
        "pillarScores": {"Water Usage": 4, "waterUsage": 4},
        "pillarExplanations": {"Water Usage": "First.", "waterUsage": "Second."}
    }));
    let data = sustainability(&reply).unwrap();
    assert_eq!(data.pillar_scores, PillarScores::from([(Pillar::WaterUsage, 4)]));
    assert_eq!(data.pillar_explanations.len(), 1);
    assert_eq!(data.pillar_explanations[&Pillar::WaterUsage], "First.");
}
