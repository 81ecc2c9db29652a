use crate::prelude::{eprintln, *};

use super::{text_result, JsonRpcError, INTERNAL_ERROR};

pub async fn handle_list_models(
    _arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    let settings = crate::settings::load(global)
        .map_err(|e| JsonRpcError::new(INTERNAL_ERROR, f!("Configuration error: {e}")))?;

    if global.verbose {
        eprintln!("Calling list_models: endpoint={}", settings.ollama_url);
    }

    let output = crate::models::list_models_data(&settings)
        .await
        .map_err(|e| JsonRpcError::new(INTERNAL_ERROR, f!("Tool execution error: {e}")))?;

    let json_string = serde_json::to_string_pretty(&output)
        .map_err(|e| JsonRpcError::new(INTERNAL_ERROR, f!("Serialization error: {e}")))?;

    text_result(json_string)
}
