use crate::prelude::{eprintln, *};
use explainer_core::config::ConfigError;
use explainer_core::explain::ExplanationRequest;
use serde::Deserialize;

use super::{parse_arguments, text_result, JsonRpcError, INTERNAL_ERROR, INVALID_PARAMS};

pub async fn handle_explain_code(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct ExplainCodeArgs {
        code: String,
        language: String,
        model: Option<String>,
    }

    let args: ExplainCodeArgs = parse_arguments(arguments)?;

    let request = ExplanationRequest::new(args.code, args.language);
    request
        .validate()
        .map_err(|e| JsonRpcError::new(INVALID_PARAMS, f!("Invalid arguments: {e}")))?;

    let model = match args.model {
        Some(model) if model.trim().is_empty() => {
            return Err(JsonRpcError::new(
                INVALID_PARAMS,
                f!("Invalid arguments: {}", ConfigError::Empty("model")),
            ));
        }
        model => model.map(|model| model.trim().to_string()),
    };

    let mut settings = crate::settings::load(global)
        .map_err(|e| JsonRpcError::new(INTERNAL_ERROR, f!("Configuration error: {e}")))?;
    if let Some(model) = model {
        settings.model = model;
    }

    if global.verbose {
        eprintln!(
            "Calling explain_code: language={}, code={} chars, model={}",
            request.language,
            request.code.len(),
            settings.model
        );
    }

    let result = crate::explain::explain_data(request, &settings)
        .await
        .map_err(|e| JsonRpcError::new(INTERNAL_ERROR, f!("Tool execution error: {e}")))?;

    text_result(result.explanation_text)
}
