//! Top-level execution parameter translation.
//!
//! After the entry point, the document's execution parameters render as
//! trailing chained calls, one per line at depth one, in a fixed order:
//! sort, aggregations (when they were not the entry shape), source
//! filtering, pagination, result tracking, score floor. Presence decides
//! emission, not truthiness: `"size": 0` and `"track_total_hits": false`
//! still render their calls.

use serde_json::{Map, Value};

use crate::{aggs::agg_entries, emit::Emitter, literal, translate::TranslateError};

/// Appends the document's trailing parameter calls to the emitter.
///
/// `trailing_aggs` is the aggregation mapping to append as a `.Aggs(`
/// block; `None` when the document has no aggregations or they already
/// formed the entry point.
pub fn append_params(
    e: &mut Emitter,
    doc: &Map<String, Value>,
    trailing_aggs: Option<&Map<String, Value>>,
) -> Result<(), TranslateError> {
    if let Some(sort) = doc.get("sort") {
        let items = sort
            .as_array()
            .ok_or_else(|| TranslateError::malformed("sort", "expected an array of sort items"))?;
        e.push(".");
        e.nested(|e| {
            e.line();
            e.push("Sort(");
            e.nested(|e| {
                for item in items {
                    e.line();
                    e.push(&sort_expr(item)?);
                    e.push(",");
                }
                Ok::<_, TranslateError>(())
            })?;
            e.line();
            e.push(")");
            Ok(())
        })?;
    }

    if let Some(aggs) = trailing_aggs {
        if !aggs.is_empty() {
            e.push(".");
            e.nested(|e| {
                e.line();
                e.push("Aggs(");
                e.nested(|e| agg_entries(e, aggs))?;
                e.line();
                e.push(")");
                Ok::<_, TranslateError>(())
            })?;
        }
    }

    if let Some(source) = doc.get("_source") {
        append_source(e, source)?;
    }

    for (key, method) in [
        ("size", "Size"),
        ("from", "From"),
        ("track_total_hits", "TrackTotalHits"),
        ("min_score", "MinScore"),
    ] {
        if let Some(value) = doc.get(key) {
            chained(e, &format!("{}({})", method, literal::scalar(value)?))?;
        }
    }

    Ok(())
}

fn append_source(e: &mut Emitter, source: &Value) -> Result<(), TranslateError> {
    match source {
        Value::Array(fields) => {
            chained(e, &format!("SourceIncludes({})", literal::variadic_strings(fields)?))
        }
        Value::Bool(true) => chained(e, "SourceTrue()"),
        Value::Bool(false) => chained(e, "SourceFalse()"),
        Value::Object(obj) => {
            for (key, method) in [("includes", "SourceIncludes"), ("excludes", "SourceExcludes")] {
                if let Some(value) = obj.get(key) {
                    let fields = value.as_array().ok_or_else(|| {
                        TranslateError::malformed("_source", format!("`{}` must be an array", key))
                    })?;
                    chained(e, &format!("{}({})", method, literal::variadic_strings(fields)?))?;
                }
            }
            Ok(())
        }
        _ => Err(TranslateError::malformed(
            "_source",
            "expected a boolean, an array of fields, or an includes/excludes object",
        )),
    }
}

/// Renders one sort item as an inline `es.Sort(field)` chain.
///
/// Accepts the bare-string field shorthand, a field mapped to a direction
/// string, or a field mapped to an `{order, mode}` object.
pub(crate) fn sort_expr(item: &Value) -> Result<String, TranslateError> {
    if let Some(field) = item.as_str() {
        return Ok(format!("es.Sort({})", literal::quoted(field)));
    }
    let obj = item
        .as_object()
        .ok_or_else(|| TranslateError::malformed("sort", "expected a field/options object"))?;
    let (field, options) = obj
        .iter()
        .next()
        .ok_or_else(|| TranslateError::malformed("sort", "expected a field entry"))?;

    let mut code = format!("es.Sort({})", literal::quoted(field));
    match options {
        Value::String(direction) => {
            code.push_str(&format!(".Order({})", literal::enumerant("Order", direction)));
        }
        Value::Object(opts) => {
            if let Some(order) = opts.get("order") {
                let raw = order.as_str().ok_or_else(|| {
                    TranslateError::malformed("sort", "`order` must be a string")
                })?;
                code.push_str(&format!(".Order({})", literal::enumerant("Order", raw)));
            }
            if let Some(mode) = opts.get("mode") {
                let raw = mode.as_str().ok_or_else(|| {
                    TranslateError::malformed("sort", "`mode` must be a string")
                })?;
                code.push_str(&format!(".Mode({})", literal::enumerant("Mode", raw)));
            }
        }
        _ => {
            return Err(TranslateError::malformed(
                "sort",
                "options must be a direction string or an object",
            ));
        }
    }
    Ok(code)
}

/// Appends a single chained call on its own line at depth one.
fn chained(e: &mut Emitter, call: &str) -> Result<(), TranslateError> {
    e.push(".");
    e.nested(|e| {
        e.line();
        e.push(call);
        Ok(())
    })
}
