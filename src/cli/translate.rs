//! Execute translations over JSON input

use super::CliError;
use crate::translate;

/// Options for the translate command
#[derive(Debug, Clone, Default)]
pub struct TranslateOptions {
    /// Query document JSON string
    pub input: Option<String>,
}

/// Execute a translation over the given options
pub fn execute_translate(options: &TranslateOptions) -> Result<String, CliError> {
    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;

    let document: serde_json::Value = serde_json::from_str(json_str).map_err(CliError::Json)?;

    let code = translate(&document).map_err(CliError::Translate)?;
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_inline_input() {
        let options = TranslateOptions {
            input: Some(r#"{"query": {"match_all": {}}}"#.to_string()),
        };
        let code = execute_translate(&options).unwrap();
        assert_eq!(code, "es.NewQuery(\n\tes.MatchAll(),\n)");
    }

    #[test]
    fn missing_input_is_reported() {
        let options = TranslateOptions::default();
        assert!(matches!(execute_translate(&options), Err(CliError::NoInput)));
    }

    #[test]
    fn invalid_json_is_reported() {
        let options = TranslateOptions {
            input: Some("{not json".to_string()),
        };
        assert!(matches!(execute_translate(&options), Err(CliError::Json(_))));
    }
}
