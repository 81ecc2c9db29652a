use crate::prelude::{eprintln, println, *};
use explainer_core::config::Settings;
use explainer_core::models::{transform_models, ModelsOutput, OllamaTagsResponse};

#[derive(Debug, clap::Parser)]
#[command(name = "models")]
#[command(about = "List the models installed on the Ollama endpoint")]
pub struct App {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let settings = crate::settings::load(&global)?;
    let output = list_models_data(&settings).await?;

    if app.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("\nModels on {}\n", output.endpoint);

    let mut table = new_table();
    table.add_row(prettytable::row![
        "", "Name", "Size", "Family", "Parameters", "Quantization"
    ]);

    for model in &output.models {
        let marker = if model.configured { "*" } else { "" };
        table.add_row(prettytable::row![
            marker,
            model.name,
            model.size,
            model.family.as_deref().unwrap_or("-"),
            model.parameters.as_deref().unwrap_or("-"),
            model.quantization.as_deref().unwrap_or("-")
        ]);
    }

    table.printstd();

    if !output.configured_available {
        eprintln!(
            "\nConfigured model '{}' is not installed. Run `ollama pull {}` first.",
            output.configured_model, output.configured_model
        );
    }

    Ok(())
}

/// Fetch the installed models from Ollama (for MCP reuse).
pub async fn list_models_data(settings: &Settings) -> Result<ModelsOutput> {
    let url = f!("{}/api/tags", settings.ollama_url);

    let client = reqwest::Client::builder()
        .timeout(settings.timeout)
        .build()
        .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| eyre!("Failed to reach Ollama at {}: {}", settings.ollama_url, e))?;

    if !response.status().is_success() {
        return Err(eyre!("Failed to list models: HTTP {}", response.status()));
    }

    let tags: OllamaTagsResponse = response
        .json()
        .await
        .map_err(|e| eyre!("Failed to parse model list: {}", e))?;

    Ok(transform_models(tags, &settings.ollama_url, &settings.model))
}
