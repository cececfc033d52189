// tests/translate_tests.rs

use esfluent::TranslateError;
use serde_json::{json, Value};

fn translate(doc: Value) -> String {
    esfluent::translate(&doc).unwrap()
}

// ============================================================================
// Entry shapes
// ============================================================================

#[test]
fn test_query_entry_shape() {
    let code = translate(json!({"query": {"term": {"status": "active"}}}));
    assert_eq!(code, "es.NewQuery(\n\tes.Term(\"status\", \"active\"),\n)");
}

#[test]
fn test_empty_document_renders_bare_entry() {
    let code = translate(json!({}));
    assert_eq!(code, "es.NewQuery()");
}

#[test]
fn test_aggregation_only_document_selects_aggs_entry() {
    let code = translate(json!({"aggs": {"a": {"avg": {"field": "x"}}}}));
    assert_eq!(code, "es.NewAggs(\n\tes.Agg(\"a\", es.AvgAgg(\"x\")),\n)");
}

#[test]
fn test_aggregations_key_spelling_is_accepted() {
    let code = translate(json!({"aggregations": {"a": {"avg": {"field": "x"}}}}));
    assert!(code.starts_with("es.NewAggs("));
}

#[test]
fn test_query_with_aggregations_trails_an_aggs_block() {
    let code = translate(json!({
        "query": {"match_all": {}},
        "aggs": {"genres": {"terms": {"field": "genre", "size": 10}}}
    }));
    let expected = [
        "es.NewQuery(",
        "\tes.MatchAll(),",
        ").",
        "\tAggs(",
        "\t\tes.Agg(\"genres\", es.TermsAgg(\"genre\").Size(10)),",
        "\t)",
    ]
    .join("\n");
    assert_eq!(code, expected);
}

#[test]
fn test_aggregation_only_entry_enumerates_every_aggregation() {
    let code = translate(json!({
        "aggs": {
            "min_year": {"min": {"field": "year"}},
            "max_year": {"max": {"field": "year"}}
        }
    }));
    let expected = [
        "es.NewAggs(",
        "\tes.Agg(\"min_year\", es.MinAgg(\"year\")),",
        "\tes.Agg(\"max_year\", es.MaxAgg(\"year\")),",
        ")",
    ]
    .join("\n");
    assert_eq!(code, expected);
}

// ============================================================================
// Top-level parameters
// ============================================================================

#[test]
fn test_presence_not_truthiness() {
    let code = translate(json!({
        "query": {"match_all": {}},
        "size": 0,
        "track_total_hits": false
    }));
    let expected = [
        "es.NewQuery(",
        "\tes.MatchAll(),",
        ").",
        "\tSize(0).",
        "\tTrackTotalHits(false)",
    ]
    .join("\n");
    assert_eq!(code, expected);
}

#[test]
fn test_parameter_order_is_fixed_regardless_of_document_order() {
    let code = translate(json!({
        "min_score": 0.5,
        "from": 40,
        "size": 20,
        "query": {"match_all": {}}
    }));
    let expected = [
        "es.NewQuery(",
        "\tes.MatchAll(),",
        ").",
        "\tSize(20).",
        "\tFrom(40).",
        "\tMinScore(0.5)",
    ]
    .join("\n");
    assert_eq!(code, expected);
}

#[test]
fn test_sort_block_layout() {
    let code = translate(json!({
        "query": {"match_all": {}},
        "sort": [
            {"published_at": {"order": "desc", "mode": "min"}},
            "title"
        ]
    }));
    let expected = [
        "es.NewQuery(",
        "\tes.MatchAll(),",
        ").",
        "\tSort(",
        "\t\tes.Sort(\"published_at\").Order(Order.Desc).Mode(Mode.Min),",
        "\t\tes.Sort(\"title\"),",
        "\t)",
    ]
    .join("\n");
    assert_eq!(code, expected);
}

#[test]
fn test_sort_direction_shorthand() {
    let code = translate(json!({
        "query": {"match_all": {}},
        "sort": [{"year": "asc"}]
    }));
    assert!(code.contains("es.Sort(\"year\").Order(Order.Asc)"));
}

#[test]
fn test_source_array_form() {
    let code = translate(json!({
        "query": {"match_all": {}},
        "_source": ["title", "author"]
    }));
    assert!(code.contains("\tSourceIncludes(\"title\", \"author\")"));
}

#[test]
fn test_source_boolean_forms() {
    let on = translate(json!({"query": {"match_all": {}}, "_source": true}));
    assert!(on.contains("\tSourceTrue()"));

    let off = translate(json!({"query": {"match_all": {}}, "_source": false}));
    assert!(off.contains("\tSourceFalse()"));
}

#[test]
fn test_source_object_form() {
    let code = translate(json!({
        "query": {"match_all": {}},
        "_source": {"includes": ["title"], "excludes": ["raw"]}
    }));
    let expected = [
        "es.NewQuery(",
        "\tes.MatchAll(),",
        ").",
        "\tSourceIncludes(\"title\").",
        "\tSourceExcludes(\"raw\")",
    ]
    .join("\n");
    assert_eq!(code, expected);
}

#[test]
fn test_track_total_hits_integer_form() {
    let code = translate(json!({"query": {"match_all": {}}, "track_total_hits": 10000}));
    assert!(code.contains("\tTrackTotalHits(10000)"));
}

// ============================================================================
// Whole-document translation
// ============================================================================

#[test]
fn test_full_document() {
    let doc = json!({
        "query": {
            "bool": {
                "must": [
                    {"match": {"title": {"query": "dune", "operator": "and"}}}
                ],
                "filter": [
                    {"range": {"year": {"gte": 1960, "lte": 1970}}}
                ],
                "must_not": [
                    {"exists": {"field": "deleted_at"}}
                ],
                "minimum_should_match": 1
            }
        },
        "sort": [{"year": {"order": "desc"}}],
        "aggs": {
            "by_author": {
                "terms": {"field": "author", "size": 5},
                "aggs": {"avg_year": {"avg": {"field": "year"}}}
            }
        },
        "_source": {"includes": ["title", "author"], "excludes": ["raw"]},
        "size": 20,
        "from": 40,
        "track_total_hits": true,
        "min_score": 0.5
    });

    let expected = [
        "es.NewQuery(",
        "\tes.Bool().Must(",
        "\t\tes.Match(\"title\", \"dune\").Operator(Operator.And),",
        "\t).Filter(",
        "\t\tes.Range(\"year\").GreaterThanOrEqual(1960).LessThanOrEqual(1970),",
        "\t).MustNot(",
        "\t\tes.Exists(\"deleted_at\"),",
        "\t).MinimumShouldMatch(1),",
        ").",
        "\tSort(",
        "\t\tes.Sort(\"year\").Order(Order.Desc),",
        "\t).",
        "\tAggs(",
        "\t\tes.Agg(\"by_author\", es.TermsAgg(\"author\").Size(5).Aggs(",
        "\t\t\tes.Agg(\"avg_year\", es.AvgAgg(\"year\")),",
        "\t\t)),",
        "\t).",
        "\tSourceIncludes(\"title\", \"author\").",
        "\tSourceExcludes(\"raw\").",
        "\tSize(20).",
        "\tFrom(40).",
        "\tTrackTotalHits(true).",
        "\tMinScore(0.5)",
    ]
    .join("\n");
    assert_eq!(translate(doc), expected);
}

#[test]
fn test_translation_is_deterministic() {
    let doc = json!({
        "query": {
            "bool": {
                "should": [
                    {"match_phrase": {"title": "the spice"}},
                    {"terms": {"genre": ["fiction", "sci-fi"]}}
                ],
                "minimum_should_match": "50%"
            }
        },
        "aggs": {"years": {"terms": {"field": "year", "order": {"_key": "asc"}}}},
        "size": 10
    });
    let first = esfluent::translate(&doc).unwrap();
    let second = esfluent::translate(&doc).unwrap();
    assert_eq!(first, second);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_errors_carry_translation_failed_context() {
    let err = esfluent::translate(&json!({"query": {"fuzzy": {"f": "v"}}})).unwrap_err();
    assert!(err.to_string().starts_with("translation failed: "));
    assert!(matches!(err, TranslateError::Failed(_)));
}

#[test]
fn test_root_cause_unwraps_the_context() {
    let err = esfluent::translate(&json!({"query": {"fuzzy": {"f": "v"}}})).unwrap_err();
    assert!(matches!(
        err.root_cause(),
        TranslateError::UnsupportedClauseType(_)
    ));
}

#[test]
fn test_non_object_document_is_malformed() {
    let err = esfluent::translate(&json!([1, 2, 3])).unwrap_err();
    assert!(matches!(
        err.root_cause(),
        TranslateError::MalformedPayload { .. }
    ));
}

#[test]
fn test_object_parameter_value_is_malformed() {
    let err = esfluent::translate(&json!({
        "query": {"match_all": {}},
        "size": {"x": 1}
    }))
    .unwrap_err();
    assert!(matches!(
        err.root_cause(),
        TranslateError::MalformedPayload { .. }
    ));
}

#[test]
fn test_malformed_sort_is_rejected() {
    let err = esfluent::translate(&json!({
        "query": {"match_all": {}},
        "sort": "year"
    }))
    .unwrap_err();
    assert!(matches!(
        err.root_cause(),
        TranslateError::MalformedPayload { .. }
    ));
}
