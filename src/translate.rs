//! Translation entry point and error taxonomy.
//!
//! [`translate`] takes a parsed Elasticsearch query document and returns
//! the equivalent fluent builder code. The document selects one of two
//! entry shapes: a query entry (`es.NewQuery(...)`, with aggregations
//! appended as a trailing parameter block when present) or an
//! aggregation-only entry (`es.NewAggs(...)`) when the document carries
//! aggregations but no `query`.
//!
//! No partial output is ever returned: any unsupported or malformed node
//! aborts the whole translation. Inner errors propagate unmodified; the
//! outermost call wraps them in [`TranslateError::Failed`] so callers
//! always see the "translation failed" context.

use serde_json::{Map, Value};

use crate::{
    aggs::agg_entries,
    emit::Emitter,
    params::append_params,
    query::translate_query_node,
};

/// Errors that can occur during translation.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslateError {
    /// The clause dispatcher saw no recognized key
    UnsupportedClauseType(String),

    /// The aggregation dispatcher saw no recognized key
    UnsupportedAggregationType(String),

    /// A clause object carried more than one recognized key
    AmbiguousClause(Vec<String>),

    /// An aggregation object carried more than one recognized key
    AmbiguousAggregation(Vec<String>),

    /// A script payload had neither `source` nor `id`, or both
    MalformedScript,

    /// A payload did not have the shape its clause requires
    MalformedPayload {
        /// The clause or aggregation being translated
        clause: String,
        /// What was wrong with it
        reason: String,
    },

    /// Top-level wrapper added by [`translate`] around any inner failure
    Failed(Box<TranslateError>),
}

impl TranslateError {
    pub(crate) fn malformed(clause: &str, reason: impl Into<String>) -> Self {
        TranslateError::MalformedPayload {
            clause: clause.to_string(),
            reason: reason.into(),
        }
    }

    /// Unwraps [`TranslateError::Failed`] layers down to the error that
    /// actually stopped the translation.
    pub fn root_cause(&self) -> &TranslateError {
        match self {
            TranslateError::Failed(inner) => inner.root_cause(),
            other => other,
        }
    }
}

impl std::fmt::Display for TranslateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslateError::UnsupportedClauseType(keys) => {
                write!(f, "unsupported query clause: {}", keys)
            }
            TranslateError::UnsupportedAggregationType(keys) => {
                write!(f, "unsupported aggregation type: {}", keys)
            }
            TranslateError::AmbiguousClause(keys) => {
                write!(f, "ambiguous query clause, multiple recognized keys: {}", keys.join(", "))
            }
            TranslateError::AmbiguousAggregation(keys) => {
                write!(f, "ambiguous aggregation, multiple recognized keys: {}", keys.join(", "))
            }
            TranslateError::MalformedScript => {
                write!(f, "malformed script: exactly one of \"source\" or \"id\" is required")
            }
            TranslateError::MalformedPayload { clause, reason } => {
                write!(f, "malformed {} payload: {}", clause, reason)
            }
            TranslateError::Failed(inner) => write!(f, "translation failed: {}", inner),
        }
    }
}

impl std::error::Error for TranslateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TranslateError::Failed(inner) => Some(inner),
            _ => None,
        }
    }
}

/// Translates a query document into fluent builder code.
///
/// The input is the JSON-shaped in-memory document (parsing raw JSON text
/// is the caller's responsibility). Output uses one `\t` per nesting level
/// and `\n` between chained top-level segments.
///
/// # Examples
///
/// ```
/// use serde_json::json;
///
/// let doc = json!({"query": {"term": {"status": "active"}}});
/// let code = esfluent::translate(&doc).unwrap();
/// assert_eq!(code, "es.NewQuery(\n\tes.Term(\"status\", \"active\"),\n)");
/// ```
pub fn translate(document: &Value) -> Result<String, TranslateError> {
    translate_document(document).map_err(|e| TranslateError::Failed(Box::new(e)))
}

fn translate_document(document: &Value) -> Result<String, TranslateError> {
    let doc = document
        .as_object()
        .ok_or_else(|| TranslateError::malformed("document", "expected a JSON object"))?;

    let aggregations = aggregations_of(doc)?;
    let query = doc.get("query");

    let mut e = Emitter::new();
    match (query, aggregations) {
        // Aggregation-only shape: every aggregation enumerated by name.
        (None, Some(aggs)) if !aggs.is_empty() => {
            e.push("es.NewAggs(");
            e.nested(|e| agg_entries(e, aggs))?;
            e.line();
            e.push(")");
            append_params(&mut e, doc, None)?;
        }
        (query, aggregations) => {
            match query {
                Some(node) => {
                    e.push("es.NewQuery(");
                    e.nested(|e| {
                        e.line();
                        translate_query_node(e, node)?;
                        e.push(",");
                        Ok::<_, TranslateError>(())
                    })?;
                    e.line();
                    e.push(")");
                }
                None => e.push("es.NewQuery()"),
            }
            append_params(&mut e, doc, aggregations)?;
        }
    }

    Ok(e.finish())
}

/// Resolves the document's `aggs`/`aggregations` mapping, if any.
pub(crate) fn aggregations_of(
    doc: &Map<String, Value>,
) -> Result<Option<&Map<String, Value>>, TranslateError> {
    let node = match doc.get("aggs").or_else(|| doc.get("aggregations")) {
        Some(node) => node,
        None => return Ok(None),
    };
    node.as_object()
        .map(Some)
        .ok_or_else(|| TranslateError::malformed("aggregations", "expected an object of name/aggregation pairs"))
}
