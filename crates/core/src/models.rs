use serde::{Deserialize, Serialize};

/// Ollama `GET /api/tags` response
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaTagsResponse {
    #[serde(default)]
    pub models: Vec<OllamaModel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaModel {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    pub modified_at: Option<String>,
    pub details: Option<OllamaModelDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaModelDetails {
    pub family: Option<String>,
    pub parameter_size: Option<String>,
    pub quantization_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSummary {
    pub name: String,
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
    /// Whether this is the model the explainer is configured to use.
    pub configured: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelsOutput {
    pub endpoint: String,
    pub configured_model: String,
    /// False when the configured model is not installed on the endpoint.
    pub configured_available: bool,
    pub models: Vec<ModelSummary>,
}

/// Format a byte count with binary units (e.g. "4.3 GiB").
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Ollama treats "llama3" and "llama3:latest" as the same model.
fn same_model(installed: &str, configured: &str) -> bool {
    let normalize = |name: &str| {
        if name.contains(':') {
            name.to_string()
        } else {
            format!("{name}:latest")
        }
    };

    normalize(installed) == normalize(configured)
}

/// Transform the tags response into a sorted model list.
pub fn transform_models(
    response: OllamaTagsResponse,
    endpoint: &str,
    configured_model: &str,
) -> ModelsOutput {
    let mut models: Vec<ModelSummary> = response
        .models
        .into_iter()
        .map(|model| {
            let details = model.details.unwrap_or(OllamaModelDetails {
                family: None,
                parameter_size: None,
                quantization_level: None,
            });

            ModelSummary {
                configured: same_model(&model.name, configured_model),
                size: format_size(model.size),
                name: model.name,
                family: details.family,
                parameters: details.parameter_size,
                quantization: details.quantization_level,
                modified_at: model.modified_at,
            }
        })
        .collect();

    models.sort_by(|a, b| a.name.cmp(&b.name));

    ModelsOutput {
        endpoint: endpoint.to_string(),
        configured_model: configured_model.to_string(),
        configured_available: models.iter().any(|m| m.configured),
        models,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> OllamaTagsResponse {
        serde_json::from_str(
            r#"{
                "models": [
                    {
                        "name": "mistral:7b",
                        "model": "mistral:7b",
                        "modified_at": "2024-05-02T10:00:00Z",
                        "size": 4109865159,
                        "digest": "abc",
                        "details": {
                            "format": "gguf",
                            "family": "llama",
                            "parameter_size": "7.2B",
                            "quantization_level": "Q4_0"
                        }
                    },
                    {
                        "name": "llama3:8b",
                        "size": 4661224676
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_transform_sorts_and_marks_configured() {
        let output = transform_models(fixture(), "http://localhost:11434", "llama3:8b");

        assert_eq!(output.models.len(), 2);
        assert_eq!(output.models[0].name, "llama3:8b");
        assert!(output.models[0].configured);
        assert!(!output.models[1].configured);
        assert!(output.configured_available);
        assert_eq!(output.models[1].family.as_deref(), Some("llama"));
        assert_eq!(output.models[1].parameters.as_deref(), Some("7.2B"));
    }

    #[test]
    fn test_transform_reports_missing_configured_model() {
        let output = transform_models(fixture(), "http://localhost:11434", "codellama");
        assert!(!output.configured_available);
        assert!(output.models.iter().all(|m| !m.configured));
    }

    #[test]
    fn test_latest_tag_matches_bare_name() {
        let response: OllamaTagsResponse =
            serde_json::from_str(r#"{"models":[{"name":"llama3:latest","size":1}]}"#).unwrap();
        let output = transform_models(response, "http://localhost:11434", "llama3");
        assert!(output.configured_available);
    }

    #[test]
    fn test_empty_response() {
        let response: OllamaTagsResponse = serde_json::from_str("{}").unwrap();
        let output = transform_models(response, "http://localhost:11434", "llama3:8b");
        assert!(output.models.is_empty());
        assert!(!output.configured_available);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(4661224676), "4.3 GiB");
    }
}
