//! Literal formatting for generated builder arguments.
//!
//! Maps JSON scalars onto the textual literal forms the builder grammar
//! expects: strings quoted and escaped, numbers and booleans bare, `null`
//! as `nil`. Arrays become variadic argument lists, never array literals.
//! Objects have no literal form in the grammar; one reaching a scalar
//! position is a malformed payload, never a fallback spelling.

use serde_json::Value;

use crate::translate::TranslateError;

/// Renders a single JSON value as a builder argument literal.
///
/// The integer/float distinction of the input is preserved (`10` stays
/// `10`, `1.5` stays `1.5`).
pub fn scalar(value: &Value) -> Result<String, TranslateError> {
    match value {
        Value::Null => Ok("nil".to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(quoted(s)),
        Value::Array(items) => variadic(items),
        Value::Object(_) => Err(TranslateError::malformed(
            "value",
            "objects have no literal form",
        )),
    }
}

/// Renders a string as a quoted, escaped literal.
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", escape(s))
}

/// Renders a sequence of values as a comma-separated variadic argument
/// list, each element individually formatted.
pub fn variadic(values: &[Value]) -> Result<String, TranslateError> {
    Ok(values
        .iter()
        .map(scalar)
        .collect::<Result<Vec<_>, _>>()?
        .join(", "))
}

/// Renders a variadic list of quoted strings. Non-string elements keep
/// their scalar form.
pub fn variadic_strings(values: &[Value]) -> Result<String, TranslateError> {
    Ok(values
        .iter()
        .map(|v| match v {
            Value::String(s) => Ok(quoted(s)),
            other => scalar(other),
        })
        .collect::<Result<Vec<_>, _>>()?
        .join(", "))
}

/// Renders an enumerant reference: `namespace.Variant`, with the variant
/// derived by capitalizing each `_`-separated segment of the raw value
/// (`breadth_first` becomes `BreadthFirst`).
///
/// `TextQueryType` is the one namespace spelled differently: its variants
/// flatten to a single capitalized word (`best_fields` becomes
/// `Bestfields`, `phrase_prefix` becomes `Phraseprefix`).
pub fn enumerant(namespace: &str, raw: &str) -> String {
    let variant: String = if namespace == "TextQueryType" {
        capitalize(&raw.split('_').collect::<String>())
    } else {
        raw.split('_').map(capitalize).collect()
    };
    format!("{}.{}", namespace, variant)
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

fn escape(s: &str) -> String {
    s.chars()
        .flat_map(|c| match c {
            '"' => vec!['\\', '"'],
            '\\' => vec!['\\', '\\'],
            '\n' => vec!['\\', 'n'],
            '\r' => vec!['\\', 'r'],
            '\t' => vec!['\\', 't'],
            c if c.is_control() => format!("\\u{:04x}", c as u32).chars().collect(),
            c => vec![c],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_are_quoted_and_escaped() {
        assert_eq!(scalar(&json!("plain")).unwrap(), "\"plain\"");
        assert_eq!(scalar(&json!("say \"hi\"")).unwrap(), "\"say \\\"hi\\\"\"");
        assert_eq!(scalar(&json!("tab\there")).unwrap(), "\"tab\\there\"");
    }

    #[test]
    fn numbers_and_booleans_are_bare() {
        assert_eq!(scalar(&json!(42)).unwrap(), "42");
        assert_eq!(scalar(&json!(1.5)).unwrap(), "1.5");
        assert_eq!(scalar(&json!(false)).unwrap(), "false");
        assert_eq!(scalar(&json!(null)).unwrap(), "nil");
    }

    #[test]
    fn arrays_render_as_variadic_lists() {
        assert_eq!(scalar(&json!(["a", "b"])).unwrap(), "\"a\", \"b\"");
        assert_eq!(scalar(&json!([1, 2, 3])).unwrap(), "1, 2, 3");
    }

    #[test]
    fn objects_have_no_literal_form() {
        assert!(matches!(
            scalar(&json!({"a": 1})),
            Err(TranslateError::MalformedPayload { .. })
        ));
        assert!(matches!(
            variadic(&[json!(1), json!({"a": 1})]),
            Err(TranslateError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn enumerants_capitalize_each_segment() {
        assert_eq!(enumerant("Order", "desc"), "Order.Desc");
        assert_eq!(enumerant("CollectMode", "breadth_first"), "CollectMode.BreadthFirst");
        assert_eq!(enumerant("ExecutionHint", "global_ordinals"), "ExecutionHint.GlobalOrdinals");
    }

    #[test]
    fn text_query_type_flattens_to_one_word() {
        assert_eq!(enumerant("TextQueryType", "best_fields"), "TextQueryType.Bestfields");
        assert_eq!(enumerant("TextQueryType", "phrase_prefix"), "TextQueryType.Phraseprefix");
        assert_eq!(enumerant("TextQueryType", "phrase"), "TextQueryType.Phrase");
    }
}
