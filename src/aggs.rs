//! Aggregation dispatch and translation.
//!
//! Mirrors the query dispatcher over the aggregation grammar: an AggNode
//! is tagged by exactly one recognized variant key, with an optional
//! sibling `aggs`/`aggregations` mapping on the bucket variants that nest.
//! Metric aggregations render as `es.<Kind>Agg(field)` plus fixed-order
//! modifiers; bucket aggregations additionally carry sizing, inclusion,
//! ordering, and sub-aggregation blocks.

use serde_json::{Map, Value};

use crate::{
    emit::Emitter,
    literal,
    query::{enumerated, push_modifiers, scalar, strings, Mod},
    script::script_expr,
    translate::TranslateError,
};

/// The closed set of supported aggregation variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggKind {
    Terms,
    MultiTerms,
    Nested,
    Stats,
    ExtendedStats,
    Min,
    Max,
    Avg,
    Sum,
    Cardinality,
}

impl AggKind {
    /// Whether the variant is a bucket aggregation that may carry a
    /// sibling sub-aggregation mapping.
    fn nests(self) -> bool {
        matches!(self, AggKind::Terms | AggKind::MultiTerms | AggKind::Nested)
    }
}

/// Recognized aggregation keys in precedence order.
const AGGREGATIONS: [(&str, AggKind); 10] = [
    ("terms", AggKind::Terms),
    ("multi_terms", AggKind::MultiTerms),
    ("nested", AggKind::Nested),
    ("stats", AggKind::Stats),
    ("extended_stats", AggKind::ExtendedStats),
    ("min", AggKind::Min),
    ("max", AggKind::Max),
    ("avg", AggKind::Avg),
    ("sum", AggKind::Sum),
    ("cardinality", AggKind::Cardinality),
];

/// Bucket modifiers preceding the script slot.
const BUCKET_SIZING_MODS: &[Mod] = &[
    scalar("size", "Size"),
    scalar("shard_size", "ShardSize"),
    scalar("min_doc_count", "MinDocCount"),
    scalar("shard_min_doc_count", "ShardMinDocCount"),
    scalar("show_term_doc_count_error", "ShowTermDocCountError"),
    scalar("missing", "Missing"),
];

/// Bucket modifiers following the script slot.
const BUCKET_FILTER_MODS: &[Mod] = &[
    scalar("format", "Format"),
    strings("include", "Include"),
    strings("exclude", "Exclude"),
    enumerated("execution_hint", "ExecutionHint", "ExecutionHint"),
    enumerated("collect_mode", "CollectMode", "CollectMode"),
];

/// Resolves an aggregation object's recognized variant key, with the same
/// zero/many handling as the clause dispatcher.
pub fn resolve_agg(node: &Map<String, Value>) -> Result<(AggKind, &Value), TranslateError> {
    let mut found: Vec<(&'static str, AggKind, &Value)> = Vec::new();
    for (key, kind) in AGGREGATIONS {
        if let Some(payload) = node.get(key) {
            found.push((key, kind, payload));
        }
    }
    match found.as_slice() {
        [] => {
            let keys: Vec<&str> = node.keys().map(String::as_str).collect();
            Err(TranslateError::UnsupportedAggregationType(keys.join(", ")))
        }
        [(_, kind, payload)] => Ok((*kind, *payload)),
        many => Err(TranslateError::AmbiguousAggregation(
            many.iter().map(|(key, _, _)| key.to_string()).collect(),
        )),
    }
}

/// Translates one aggregation node onto the emitter's current line.
pub fn translate_agg_node(e: &mut Emitter, node: &Value) -> Result<(), TranslateError> {
    let obj = node
        .as_object()
        .ok_or_else(|| TranslateError::malformed("aggregation", "expected an object"))?;
    let (kind, payload) = resolve_agg(obj)?;

    match kind {
        AggKind::Avg => metric(e, "avg", "es.AvgAgg", payload, false)?,
        AggKind::Sum => metric(e, "sum", "es.SumAgg", payload, false)?,
        AggKind::Min => metric(e, "min", "es.MinAgg", payload, false)?,
        AggKind::Max => metric(e, "max", "es.MaxAgg", payload, false)?,
        AggKind::Stats => metric(e, "stats", "es.StatsAgg", payload, false)?,
        AggKind::ExtendedStats => metric(e, "extended_stats", "es.ExtendedStatsAgg", payload, false)?,
        AggKind::Cardinality => metric(e, "cardinality", "es.CardinalityAgg", payload, true)?,
        AggKind::Terms => {
            let body = payload_object("terms", payload)?;
            let field = required_str(body, "terms", "field")?;
            e.push(&format!("es.TermsAgg({})", literal::quoted(field)));
            bucket_modifiers(e, "terms", body)?;
        }
        AggKind::MultiTerms => translate_multi_terms(e, payload)?,
        AggKind::Nested => {
            let body = payload_object("nested", payload)?;
            let path = required_str(body, "nested", "path")?;
            e.push(&format!("es.NestedAgg({})", literal::quoted(path)));
        }
    }

    // Sub-aggregations nest on bucket variants only; a metric aggregation
    // computes a single summary and has nowhere for children to go.
    match sub_aggregations(obj)? {
        Some(subs) if !subs.is_empty() => {
            if !kind.nests() {
                return Err(TranslateError::malformed(
                    "aggregation",
                    "sub-aggregations are only valid under bucket aggregations",
                ));
            }
            e.push(".Aggs(");
            e.nested(|e| agg_entries(e, subs))?;
            e.line();
            e.push(")");
        }
        _ => {}
    }
    Ok(())
}

/// Emits one `es.Agg(name, …)` line per mapping entry, in mapping order,
/// each on its own line with a trailing comma. Callers own the enclosing
/// `Aggs(`/`NewAggs(` block and its indentation scope.
pub fn agg_entries(e: &mut Emitter, aggs: &Map<String, Value>) -> Result<(), TranslateError> {
    for (name, node) in aggs {
        e.line();
        e.push(&format!("es.Agg({}, ", literal::quoted(name)));
        translate_agg_node(e, node)?;
        e.push("),");
    }
    Ok(())
}

fn metric(
    e: &mut Emitter,
    clause: &str,
    head: &str,
    payload: &Value,
    precision: bool,
) -> Result<(), TranslateError> {
    let body = payload_object(clause, payload)?;
    let field = required_str(body, clause, "field")?;
    e.push(&format!("{}({})", head, literal::quoted(field)));
    if let Some(missing) = body.get("missing") {
        e.push(&format!(".Missing({})", literal::scalar(missing)?));
    }
    if let Some(script) = body.get("script") {
        e.push(&format!(".Script({})", script_expr(script)?));
    }
    if let Some(format) = body.get("format") {
        e.push(&format!(".Format({})", literal::scalar(format)?));
    }
    if precision {
        if let Some(threshold) = body.get("precision_threshold") {
            e.push(&format!(".PrecisionThreshold({})", literal::scalar(threshold)?));
        }
    }
    meta_entries(e, body)
}

fn translate_multi_terms(e: &mut Emitter, payload: &Value) -> Result<(), TranslateError> {
    let body = payload_object("multi_terms", payload)?;
    let terms = body
        .get("terms")
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::malformed("multi_terms", "missing `terms` array"))?;
    let heads = terms
        .iter()
        .map(|term| {
            let field = term
                .as_object()
                .and_then(|t| t.get("field"))
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    TranslateError::malformed("multi_terms", "each term needs a `field`")
                })?;
            Ok(format!("es.TermAgg({})", literal::quoted(field)))
        })
        .collect::<Result<Vec<_>, TranslateError>>()?;
    e.push(&format!("es.MultiTermsAgg({})", heads.join(", ")));
    bucket_modifiers(e, "multi_terms", body)
}

fn bucket_modifiers(
    e: &mut Emitter,
    clause: &str,
    body: &Map<String, Value>,
) -> Result<(), TranslateError> {
    push_modifiers(e, clause, body, BUCKET_SIZING_MODS)?;
    if let Some(script) = body.get("script") {
        e.push(&format!(".Script({})", script_expr(script)?));
    }
    push_modifiers(e, clause, body, BUCKET_FILTER_MODS)?;
    meta_entries(e, body)?;
    order_entries(e, clause, body)
}

/// One `.Meta(key, value)` per `meta` entry, in mapping order.
fn meta_entries(e: &mut Emitter, body: &Map<String, Value>) -> Result<(), TranslateError> {
    if let Some(meta) = body.get("meta").and_then(Value::as_object) {
        for (key, value) in meta {
            e.push(&format!(".Meta({}, {})", literal::quoted(key), literal::scalar(value)?));
        }
    }
    Ok(())
}

/// One `.Order(field, Order.X)` per order pair, in mapping order. The
/// payload form is either a single object or an array of them.
fn order_entries(
    e: &mut Emitter,
    clause: &str,
    body: &Map<String, Value>,
) -> Result<(), TranslateError> {
    let Some(order) = body.get("order") else {
        return Ok(());
    };
    match order {
        Value::Object(pairs) => order_pairs(e, clause, pairs),
        Value::Array(items) => {
            for item in items {
                let pairs = item.as_object().ok_or_else(|| {
                    TranslateError::malformed(clause, "`order` entries must be objects")
                })?;
                order_pairs(e, clause, pairs)?;
            }
            Ok(())
        }
        _ => Err(TranslateError::malformed(clause, "`order` must be an object or array")),
    }
}

fn order_pairs(
    e: &mut Emitter,
    clause: &str,
    pairs: &Map<String, Value>,
) -> Result<(), TranslateError> {
    for (field, direction) in pairs {
        let raw = direction.as_str().ok_or_else(|| {
            TranslateError::malformed(clause, "`order` direction must be a string")
        })?;
        e.push(&format!(
            ".Order({}, {})",
            literal::quoted(field),
            literal::enumerant("Order", raw)
        ));
    }
    Ok(())
}

fn payload_object<'a>(clause: &str, payload: &'a Value) -> Result<&'a Map<String, Value>, TranslateError> {
    payload
        .as_object()
        .ok_or_else(|| TranslateError::malformed(clause, "expected an object payload"))
}

fn required_str<'a>(
    body: &'a Map<String, Value>,
    clause: &str,
    key: &str,
) -> Result<&'a str, TranslateError> {
    body.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| TranslateError::malformed(clause, format!("missing `{}`", key)))
}

/// Resolves an AggNode's sibling `aggs`/`aggregations` mapping, if any.
fn sub_aggregations(
    node: &Map<String, Value>,
) -> Result<Option<&Map<String, Value>>, TranslateError> {
    let subs = match node.get("aggs").or_else(|| node.get("aggregations")) {
        Some(subs) => subs,
        None => return Ok(None),
    };
    subs.as_object().map(Some).ok_or_else(|| {
        TranslateError::malformed("aggregation", "`aggs` must be an object of name/aggregation pairs")
    })
}
