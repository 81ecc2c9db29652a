use serde::{Deserialize, Serialize};

/// A request to explain a single code snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationRequest {
    /// The code to explain, embedded verbatim in the prompt.
    pub code: String,
    /// Free-form language label (e.g. "python"), also used as the fence tag.
    pub language: String,
}

impl ExplanationRequest {
    pub fn new(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
        }
    }

    /// Caller-side validation. The execution wrapper itself never rejects a request.
    pub fn validate(&self) -> Result<(), InvalidRequest> {
        if self.code.trim().is_empty() {
            return Err(InvalidRequest::EmptyCode);
        }

        if self.language.trim().is_empty() {
            return Err(InvalidRequest::EmptyLanguage);
        }

        Ok(())
    }
}

/// Output of a single explanation round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationResult {
    pub explanation_text: String,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidRequest {
    #[error("Code must not be empty")]
    EmptyCode,

    #[error("Language must not be empty")]
    EmptyLanguage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_well_formed_request() {
        let request = ExplanationRequest::new("const x = 1;", "javascript");
        assert_eq!(request.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_blank_code() {
        assert_eq!(
            ExplanationRequest::new("", "python").validate(),
            Err(InvalidRequest::EmptyCode)
        );
        assert_eq!(
            ExplanationRequest::new("  \n\t", "python").validate(),
            Err(InvalidRequest::EmptyCode)
        );
    }

    #[test]
    fn test_validate_rejects_blank_language() {
        assert_eq!(
            ExplanationRequest::new("print(1)", " ").validate(),
            Err(InvalidRequest::EmptyLanguage)
        );
    }

    #[test]
    fn test_result_serializes_single_field() {
        let result = ExplanationResult {
            explanation_text: "Declares a constant.".to_string(),
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "explanationText": "Declares a constant." })
        );
    }
}
