//! Query clause dispatch and translation.
//!
//! A clause is a JSON object tagged by exactly one recognized key. The
//! dispatcher resolves that key to a [`ClauseKind`] and hands the payload
//! to the matching translator; translation is an exhaustive match over the
//! closed kind set, so adding a variant forces every arm to be handled.
//!
//! Leaf payloads come in two shapes, handled uniformly: a bare scalar
//! shorthand (`{"match": {"title": "dune"}}`) or an object carrying the
//! value plus modifiers. Every modifier present appends exactly one
//! `.Name(value)` segment in a fixed per-clause order; modifier emission
//! is table-driven so each clause is one ordered table plus a head.

use serde_json::{Map, Value};

use crate::{
    emit::Emitter,
    literal,
    params::sort_expr,
    translate::TranslateError,
};

/// The closed set of supported query clause variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseKind {
    Bool,
    Term,
    Terms,
    Match,
    MatchPhrase,
    MatchPhrasePrefix,
    MatchBoolPrefix,
    MultiMatch,
    MatchAll,
    MatchNone,
    Range,
    Exists,
    Nested,
    QueryString,
    SimpleQueryString,
}

/// Recognized clause keys in precedence order.
const CLAUSES: [(&str, ClauseKind); 15] = [
    ("bool", ClauseKind::Bool),
    ("term", ClauseKind::Term),
    ("terms", ClauseKind::Terms),
    ("match", ClauseKind::Match),
    ("match_phrase", ClauseKind::MatchPhrase),
    ("match_phrase_prefix", ClauseKind::MatchPhrasePrefix),
    ("match_bool_prefix", ClauseKind::MatchBoolPrefix),
    ("multi_match", ClauseKind::MultiMatch),
    ("match_all", ClauseKind::MatchAll),
    ("match_none", ClauseKind::MatchNone),
    ("range", ClauseKind::Range),
    ("exists", ClauseKind::Exists),
    ("nested", ClauseKind::Nested),
    ("query_string", ClauseKind::QueryString),
    ("simple_query_string", ClauseKind::SimpleQueryString),
];

/// How a modifier value is rendered.
pub(crate) enum ModKind {
    /// Bare scalar literal (strings quoted, numbers/booleans bare)
    Scalar,
    /// Enumerant in the named namespace (`Operator.And`)
    Enum(&'static str),
    /// Variadic quoted string list (`"a", "b"`)
    Strings,
}

/// One entry of a clause's ordered modifier table.
pub(crate) struct Mod {
    key: &'static str,
    method: &'static str,
    kind: ModKind,
}

pub(crate) const fn scalar(key: &'static str, method: &'static str) -> Mod {
    Mod { key, method, kind: ModKind::Scalar }
}

pub(crate) const fn enumerated(key: &'static str, method: &'static str, namespace: &'static str) -> Mod {
    Mod { key, method, kind: ModKind::Enum(namespace) }
}

pub(crate) const fn strings(key: &'static str, method: &'static str) -> Mod {
    Mod { key, method, kind: ModKind::Strings }
}

const TERM_MODS: &[Mod] = &[
    scalar("boost", "Boost"),
    scalar("case_insensitive", "CaseInsensitive"),
];

const MATCH_MODS: &[Mod] = &[
    enumerated("operator", "Operator", "Operator"),
    scalar("boost", "Boost"),
    scalar("fuzziness", "Fuzziness"),
    scalar("fuzzy_rewrite", "FuzzyRewrite"),
    scalar("fuzzy_transpositions", "FuzzyTranspositions"),
    scalar("lenient", "Lenient"),
    scalar("max_expansions", "MaxExpansions"),
    scalar("prefix_length", "PrefixLength"),
    scalar("cutoff_frequency", "CutoffFrequency"),
    scalar("auto_generate_synonyms_phrase_query", "AutoGenerateSynonymsPhraseQuery"),
    enumerated("zero_terms_query", "ZeroTermsQuery", "ZeroTermsQuery"),
];

const MATCH_PHRASE_MODS: &[Mod] = &[
    scalar("analyzer", "Analyzer"),
    scalar("boost", "Boost"),
    scalar("slop", "Slop"),
    enumerated("zero_terms_query", "ZeroTermsQuery", "ZeroTermsQuery"),
];

const MATCH_PHRASE_PREFIX_MODS: &[Mod] = &[
    scalar("analyzer", "Analyzer"),
    scalar("boost", "Boost"),
    scalar("max_expansions", "MaxExpansions"),
    scalar("slop", "Slop"),
    enumerated("zero_terms_query", "ZeroTermsQuery", "ZeroTermsQuery"),
];

const MATCH_BOOL_PREFIX_MODS: &[Mod] = &[
    scalar("analyzer", "Analyzer"),
    enumerated("operator", "Operator", "Operator"),
    scalar("minimum_should_match", "MinimumShouldMatch"),
    scalar("boost", "Boost"),
    scalar("fuzziness", "Fuzziness"),
    scalar("fuzzy_rewrite", "FuzzyRewrite"),
    scalar("fuzzy_transpositions", "FuzzyTranspositions"),
    scalar("max_expansions", "MaxExpansions"),
    scalar("prefix_length", "PrefixLength"),
];

const MULTI_MATCH_MODS: &[Mod] = &[
    strings("fields", "Fields"),
    enumerated("type", "Type", "TextQueryType"),
    enumerated("operator", "Operator", "Operator"),
    scalar("analyzer", "Analyzer"),
    scalar("boost", "Boost"),
    scalar("fuzziness", "Fuzziness"),
    scalar("fuzzy_rewrite", "FuzzyRewrite"),
    scalar("fuzzy_transpositions", "FuzzyTranspositions"),
    scalar("lenient", "Lenient"),
    scalar("max_expansions", "MaxExpansions"),
    scalar("minimum_should_match", "MinimumShouldMatch"),
    scalar("prefix_length", "PrefixLength"),
    scalar("slop", "Slop"),
    scalar("tie_breaker", "TieBreaker"),
    scalar("cutoff_frequency", "CutoffFrequency"),
    scalar("auto_generate_synonyms_phrase_query", "AutoGenerateSynonymsPhraseQuery"),
    enumerated("zero_terms_query", "ZeroTermsQuery", "ZeroTermsQuery"),
];

const MATCH_NONE_MODS: &[Mod] = &[
    enumerated("operator", "Operator", "Operator"),
    scalar("boost", "Boost"),
];

const RANGE_MODS: &[Mod] = &[
    scalar("gt", "GreaterThan"),
    scalar("gte", "GreaterThanOrEqual"),
    scalar("lt", "LessThan"),
    scalar("lte", "LessThanOrEqual"),
    scalar("boost", "Boost"),
    enumerated("relation", "Relation", "RangeRelation"),
    scalar("time_zone", "TimeZone"),
    scalar("format", "Format"),
];

const QUERY_STRING_MODS: &[Mod] = &[
    strings("fields", "Fields"),
    scalar("default_field", "DefaultField"),
    enumerated("default_operator", "DefaultOperator", "Operator"),
    scalar("analyzer", "Analyzer"),
    scalar("allow_leading_wildcard", "AllowLeadingWildcard"),
    scalar("analyze_wildcard", "AnalyzeWildcard"),
    scalar("boost", "Boost"),
    scalar("fuzziness", "Fuzziness"),
    scalar("lenient", "Lenient"),
    scalar("minimum_should_match", "MinimumShouldMatch"),
    scalar("phrase_slop", "PhraseSlop"),
    scalar("quote_analyzer", "QuoteAnalyzer"),
    scalar("quote_field_suffix", "QuoteFieldSuffix"),
    scalar("rewrite", "Rewrite"),
    scalar("time_zone", "TimeZone"),
];

const SIMPLE_QUERY_STRING_MODS: &[Mod] = &[
    strings("fields", "Fields"),
    enumerated("default_operator", "DefaultOperator", "Operator"),
    scalar("analyzer", "Analyzer"),
    scalar("analyze_wildcard", "AnalyzeWildcard"),
    scalar("auto_generate_synonyms_phrase_query", "AutoGenerateSynonymsPhraseQuery"),
    scalar("flags", "Flags"),
    scalar("fuzzy_max_expansions", "FuzzyMaxExpansions"),
    scalar("fuzzy_prefix_length", "FuzzyPrefixLength"),
    scalar("fuzzy_transpositions", "FuzzyTranspositions"),
    scalar("lenient", "Lenient"),
    scalar("minimum_should_match", "MinimumShouldMatch"),
    scalar("quote_field_suffix", "QuoteFieldSuffix"),
];

const BOOL_MODS: &[Mod] = &[
    scalar("minimum_should_match", "MinimumShouldMatch"),
    scalar("boost", "Boost"),
];

/// Resolves a clause object's recognized key.
///
/// Zero recognized keys is a translation error naming the key set the
/// node actually carried; more than one is rejected as ambiguous, naming
/// every recognized key found (in precedence order, deterministically).
pub fn resolve_clause(node: &Map<String, Value>) -> Result<(ClauseKind, &Value), TranslateError> {
    let mut found: Vec<(&'static str, ClauseKind, &Value)> = Vec::new();
    for (key, kind) in CLAUSES {
        if let Some(payload) = node.get(key) {
            found.push((key, kind, payload));
        }
    }
    match found.as_slice() {
        [] => {
            let keys: Vec<&str> = node.keys().map(String::as_str).collect();
            Err(TranslateError::UnsupportedClauseType(keys.join(", ")))
        }
        [(_, kind, payload)] => Ok((*kind, *payload)),
        many => Err(TranslateError::AmbiguousClause(
            many.iter().map(|(key, _, _)| key.to_string()).collect(),
        )),
    }
}

/// Translates one query clause onto the emitter's current line.
///
/// Compound clauses (`bool`, `nested`) open nested indentation scopes for
/// their children; leaves render inline.
pub fn translate_query_node(e: &mut Emitter, node: &Value) -> Result<(), TranslateError> {
    let obj = node
        .as_object()
        .ok_or_else(|| TranslateError::malformed("query", "expected a clause object"))?;
    let (kind, payload) = resolve_clause(obj)?;

    match kind {
        ClauseKind::Bool => translate_bool(e, payload),
        ClauseKind::Term => translate_term(e, payload),
        ClauseKind::Terms => translate_terms(e, payload),
        ClauseKind::Match => field_query_clause(e, "match", "es.Match", payload, MATCH_MODS),
        ClauseKind::MatchPhrase => {
            field_query_clause(e, "match_phrase", "es.MatchPhrase", payload, MATCH_PHRASE_MODS)
        }
        ClauseKind::MatchPhrasePrefix => field_query_clause(
            e,
            "match_phrase_prefix",
            "es.MatchPhrasePrefix",
            payload,
            MATCH_PHRASE_PREFIX_MODS,
        ),
        ClauseKind::MatchBoolPrefix => field_query_clause(
            e,
            "match_bool_prefix",
            "es.MatchBoolPrefix",
            payload,
            MATCH_BOOL_PREFIX_MODS,
        ),
        ClauseKind::MultiMatch => translate_multi_match(e, payload),
        ClauseKind::MatchAll => translate_match_all(e, payload),
        ClauseKind::MatchNone => translate_match_none(e, payload),
        ClauseKind::Range => translate_range(e, payload),
        ClauseKind::Exists => translate_exists(e, payload),
        ClauseKind::Nested => translate_nested(e, payload),
        ClauseKind::QueryString => {
            unkeyed_query_clause(e, "query_string", "es.QueryString", payload, QUERY_STRING_MODS)
        }
        ClauseKind::SimpleQueryString => unkeyed_query_clause(
            e,
            "simple_query_string",
            "es.SimpleQueryString",
            payload,
            SIMPLE_QUERY_STRING_MODS,
        ),
    }
}

pub(crate) fn push_modifiers(
    e: &mut Emitter,
    clause: &str,
    payload: &Map<String, Value>,
    mods: &[Mod],
) -> Result<(), TranslateError> {
    for m in mods {
        let Some(value) = payload.get(m.key) else {
            continue;
        };
        match m.kind {
            ModKind::Scalar => {
                e.push(&format!(".{}({})", m.method, literal::scalar(value)?));
            }
            ModKind::Enum(namespace) => {
                let raw = value.as_str().ok_or_else(|| {
                    TranslateError::malformed(clause, format!("`{}` must be a string", m.key))
                })?;
                e.push(&format!(".{}({})", m.method, literal::enumerant(namespace, raw)));
            }
            ModKind::Strings => {
                let list = match value {
                    Value::Array(items) => literal::variadic_strings(items)?,
                    other => literal::scalar(other)?,
                };
                e.push(&format!(".{}({})", m.method, list));
            }
        }
    }
    Ok(())
}

fn payload_object<'a>(clause: &str, payload: &'a Value) -> Result<&'a Map<String, Value>, TranslateError> {
    payload
        .as_object()
        .ok_or_else(|| TranslateError::malformed(clause, "expected an object payload"))
}

/// Extracts the field name and value of a field-keyed payload, skipping
/// sibling modifier keys (`boost` on `terms` sits next to the field).
fn field_entry<'a>(
    clause: &str,
    payload: &'a Map<String, Value>,
    siblings: &[&str],
) -> Result<(&'a str, &'a Value), TranslateError> {
    payload
        .iter()
        .find(|(key, _)| !siblings.contains(&key.as_str()))
        .map(|(key, value)| (key.as_str(), value))
        .ok_or_else(|| TranslateError::malformed(clause, "expected a field entry"))
}

fn translate_bool(e: &mut Emitter, payload: &Value) -> Result<(), TranslateError> {
    let obj = payload_object("bool", payload)?;
    e.push("es.Bool()");

    for (key, method) in [
        ("must", "Must"),
        ("should", "Should"),
        ("filter", "Filter"),
        ("must_not", "MustNot"),
    ] {
        let Some(value) = obj.get(key) else {
            continue;
        };
        let items = value.as_array().ok_or_else(|| {
            TranslateError::malformed("bool", format!("`{}` must be an array", key))
        })?;
        // A declared-but-empty list still renders, as an empty call.
        if items.is_empty() {
            e.push(&format!(".{}()", method));
            continue;
        }
        e.push(&format!(".{}(", method));
        e.nested(|e| {
            for item in items {
                e.line();
                translate_query_node(e, item)?;
                e.push(",");
            }
            Ok::<_, TranslateError>(())
        })?;
        e.line();
        e.push(")");
    }

    push_modifiers(e, "bool", obj, BOOL_MODS)
}

fn translate_term(e: &mut Emitter, payload: &Value) -> Result<(), TranslateError> {
    let obj = payload_object("term", payload)?;
    let (field, value) = field_entry("term", obj, &[])?;
    match value {
        Value::Object(body) => {
            let v = body
                .get("value")
                .ok_or_else(|| TranslateError::malformed("term", "missing `value`"))?;
            e.push(&format!("es.Term({}, {})", literal::quoted(field), literal::scalar(v)?));
            push_modifiers(e, "term", body, TERM_MODS)
        }
        shorthand => {
            e.push(&format!(
                "es.Term({}, {})",
                literal::quoted(field),
                literal::scalar(shorthand)?
            ));
            Ok(())
        }
    }
}

fn translate_terms(e: &mut Emitter, payload: &Value) -> Result<(), TranslateError> {
    let obj = payload_object("terms", payload)?;
    let (field, values) = field_entry("terms", obj, &["boost"])?;
    // An array renders as a variadic argument list, never an array literal.
    let args = match values {
        Value::Array(items) => literal::variadic(items)?,
        single => literal::scalar(single)?,
    };
    e.push(&format!("es.Terms({}, {})", literal::quoted(field), args));
    if let Some(boost) = obj.get("boost") {
        e.push(&format!(".Boost({})", literal::scalar(boost)?));
    }
    Ok(())
}

/// Shared shape of the match family: `Head(field, query)` plus modifiers.
fn field_query_clause(
    e: &mut Emitter,
    clause: &str,
    head: &str,
    payload: &Value,
    mods: &[Mod],
) -> Result<(), TranslateError> {
    let obj = payload_object(clause, payload)?;
    let (field, value) = field_entry(clause, obj, &[])?;
    match value {
        Value::Object(body) => {
            let query = body
                .get("query")
                .ok_or_else(|| TranslateError::malformed(clause, "missing `query`"))?;
            e.push(&format!("{}({}, {})", head, literal::quoted(field), literal::scalar(query)?));
            push_modifiers(e, clause, body, mods)
        }
        shorthand => {
            e.push(&format!(
                "{}({}, {})",
                head,
                literal::quoted(field),
                literal::scalar(shorthand)?
            ));
            Ok(())
        }
    }
}

/// Shared shape of query_string/simple_query_string: the payload is not
/// field-keyed, it carries `query` directly.
fn unkeyed_query_clause(
    e: &mut Emitter,
    clause: &str,
    head: &str,
    payload: &Value,
    mods: &[Mod],
) -> Result<(), TranslateError> {
    let obj = payload_object(clause, payload)?;
    let query = obj
        .get("query")
        .ok_or_else(|| TranslateError::malformed(clause, "missing `query`"))?;
    e.push(&format!("{}({})", head, literal::scalar(query)?));
    push_modifiers(e, clause, obj, mods)
}

fn translate_multi_match(e: &mut Emitter, payload: &Value) -> Result<(), TranslateError> {
    unkeyed_query_clause(e, "multi_match", "es.MultiMatch", payload, MULTI_MATCH_MODS)
}

fn translate_match_all(e: &mut Emitter, payload: &Value) -> Result<(), TranslateError> {
    e.push("es.MatchAll()");
    if let Some(obj) = payload.as_object() {
        if let Some(boost) = obj.get("boost") {
            e.push(&format!(".Boost({})", literal::scalar(boost)?));
        }
    }
    Ok(())
}

/// `match_none` with an empty payload is a zero-argument call; with a
/// field payload it is a two-argument call. The asymmetry is part of the
/// builder grammar, not something to normalize away.
fn translate_match_none(e: &mut Emitter, payload: &Value) -> Result<(), TranslateError> {
    let empty = match payload {
        Value::Null => true,
        Value::Object(obj) => obj.is_empty(),
        _ => false,
    };
    if empty {
        e.push("es.MatchNone()");
        return Ok(());
    }
    let obj = payload_object("match_none", payload)?;
    let (field, value) = field_entry("match_none", obj, &[])?;
    match value {
        Value::Object(body) => {
            let query = body
                .get("query")
                .ok_or_else(|| TranslateError::malformed("match_none", "missing `query`"))?;
            e.push(&format!(
                "es.MatchNone({}, {})",
                literal::quoted(field),
                literal::scalar(query)?
            ));
            push_modifiers(e, "match_none", body, MATCH_NONE_MODS)
        }
        shorthand => {
            e.push(&format!(
                "es.MatchNone({}, {})",
                literal::quoted(field),
                literal::scalar(shorthand)?
            ));
            Ok(())
        }
    }
}

fn translate_range(e: &mut Emitter, payload: &Value) -> Result<(), TranslateError> {
    let obj = payload_object("range", payload)?;
    let (field, conditions) = field_entry("range", obj, &[])?;
    let body = conditions
        .as_object()
        .ok_or_else(|| TranslateError::malformed("range", "expected an object of bounds"))?;
    e.push(&format!("es.Range({})", literal::quoted(field)));
    push_modifiers(e, "range", body, RANGE_MODS)
}

fn translate_exists(e: &mut Emitter, payload: &Value) -> Result<(), TranslateError> {
    let obj = payload_object("exists", payload)?;
    let field = obj
        .get("field")
        .and_then(Value::as_str)
        .ok_or_else(|| TranslateError::malformed("exists", "missing `field`"))?;
    e.push(&format!("es.Exists({})", literal::quoted(field)));
    if let Some(boost) = obj.get("boost") {
        e.push(&format!(".Boost({})", literal::scalar(boost)?));
    }
    Ok(())
}

fn translate_nested(e: &mut Emitter, payload: &Value) -> Result<(), TranslateError> {
    let obj = payload_object("nested", payload)?;
    let path = obj
        .get("path")
        .and_then(Value::as_str)
        .ok_or_else(|| TranslateError::malformed("nested", "missing `path`"))?;
    let inner = obj
        .get("query")
        .ok_or_else(|| TranslateError::malformed("nested", "missing `query`"))?;

    e.push(&format!("es.Nested({},", literal::quoted(path)));
    e.nested(|e| {
        e.line();
        translate_query_node(e, inner)?;
        e.push(",");
        Ok::<_, TranslateError>(())
    })?;
    e.line();
    e.push(")");

    if let Some(mode) = obj.get("score_mode") {
        let raw = mode.as_str().ok_or_else(|| {
            TranslateError::malformed("nested", "`score_mode` must be a string")
        })?;
        e.push(&format!(".ScoreMode({})", literal::enumerant("ScoreMode", raw)));
    }
    if let Some(ignore) = obj.get("ignore_unmapped") {
        e.push(&format!(".IgnoreUnmapped({})", literal::scalar(ignore)?));
    }
    if let Some(inner_hits) = obj.get("inner_hits") {
        e.push(&format!(".InnerHits({})", inner_hits_expr(inner_hits)?));
    }
    Ok(())
}

/// Renders an inner-hits payload as an inline `es.InnerHits()` chain with
/// fixed-order `from`, `size`, `name`, then sort items.
fn inner_hits_expr(payload: &Value) -> Result<String, TranslateError> {
    let obj = payload_object("inner_hits", payload)?;
    let mut code = String::from("es.InnerHits()");
    for (key, method) in [("from", "From"), ("size", "Size"), ("name", "Name")] {
        if let Some(value) = obj.get(key) {
            code.push_str(&format!(".{}({})", method, literal::scalar(value)?));
        }
    }
    if let Some(sort) = obj.get("sort") {
        let items = sort.as_array().ok_or_else(|| {
            TranslateError::malformed("inner_hits", "`sort` must be an array")
        })?;
        let sorts = items
            .iter()
            .map(sort_expr)
            .collect::<Result<Vec<_>, _>>()?
            .join(", ");
        code.push_str(&format!(".Sort({})", sorts));
    }
    Ok(code)
}
