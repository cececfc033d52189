//! Script payload translation.
//!
//! Aggregations accept scripts in two shapes: a bare string (source form,
//! default language) or an object with `source` XOR `id`, an optional
//! `lang`, and optional `params`. Both forms render inline as
//! `es.ScriptSource(...)`/`es.ScriptID(...)` with one `.Parameter(k, v)`
//! per params entry in mapping order.

use serde_json::Value;

use crate::{literal, translate::TranslateError};

const DEFAULT_LANGUAGE: &str = "painless";

/// Renders a script payload as an inline builder expression.
pub fn script_expr(payload: &Value) -> Result<String, TranslateError> {
    if let Some(source) = payload.as_str() {
        return Ok(format!(
            "es.ScriptSource({}, {})",
            literal::quoted(source),
            language(DEFAULT_LANGUAGE)
        ));
    }

    let obj = payload
        .as_object()
        .ok_or_else(|| TranslateError::malformed("script", "expected a string or an object"))?;

    let lang = obj
        .get("lang")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_LANGUAGE);

    // `source` and `id` are mutually exclusive; one of them is required.
    let head = match (obj.get("source"), obj.get("id")) {
        (Some(source), None) => {
            format!("es.ScriptSource({}, {})", literal::scalar(source)?, language(lang))
        }
        (None, Some(id)) => {
            format!("es.ScriptID({}, {})", literal::scalar(id)?, language(lang))
        }
        _ => return Err(TranslateError::MalformedScript),
    };

    let mut code = head;
    if let Some(params) = obj.get("params").and_then(Value::as_object) {
        for (key, value) in params {
            code.push_str(&format!(
                ".Parameter({}, {})",
                literal::quoted(key),
                literal::scalar(value)?
            ));
        }
    }
    Ok(code)
}

fn language(lang: &str) -> String {
    literal::enumerant("ScriptLanguage", lang)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_string_is_source_form() {
        let code = script_expr(&json!("doc['price'].value * 2")).unwrap();
        assert_eq!(
            code,
            "es.ScriptSource(\"doc['price'].value * 2\", ScriptLanguage.Painless)"
        );
    }

    #[test]
    fn id_form_with_params() {
        let code = script_expr(&json!({
            "id": "calc-price",
            "lang": "expression",
            "params": {"factor": 2, "label": "x"}
        }))
        .unwrap();
        assert_eq!(
            code,
            "es.ScriptID(\"calc-price\", ScriptLanguage.Expression)\
             .Parameter(\"factor\", 2).Parameter(\"label\", \"x\")"
        );
    }

    #[test]
    fn source_and_id_are_mutually_exclusive() {
        let err = script_expr(&json!({"source": "1 + 1", "id": "one"})).unwrap_err();
        assert_eq!(err, TranslateError::MalformedScript);
    }

    #[test]
    fn missing_source_and_id_is_malformed() {
        let err = script_expr(&json!({"lang": "painless"})).unwrap_err();
        assert_eq!(err, TranslateError::MalformedScript);
    }
}
