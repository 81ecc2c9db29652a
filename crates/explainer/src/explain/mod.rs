use crate::completion::OllamaCompletion;
use crate::prelude::{eprintln, println, *};
use explainer_core::config::Settings;
use explainer_core::explain::{language_for_extension, ExplanationRequest, ExplanationResult};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

pub mod explainer;

pub use explainer::Explainer;

#[derive(Debug, clap::Parser)]
#[command(name = "explain")]
#[command(about = "Explain a code snippet using a local Ollama model")]
pub struct App {
    /// Code to explain. Read from --file or stdin when omitted.
    #[clap(conflicts_with = "file")]
    pub code: Option<String>,

    /// Language of the snippet (e.g. python). Inferred from --file when omitted.
    #[clap(long, short)]
    pub language: Option<String>,

    /// Read the code from a file
    #[clap(long, short)]
    pub file: Option<PathBuf>,

    /// Output the result as JSON
    #[clap(long)]
    pub json: bool,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let settings = crate::settings::load(&global)?;
    let language = resolve_language(app.language.as_deref(), app.file.as_deref())?;

    let code = match (app.code, &app.file) {
        (Some(code), _) => code,
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| eyre!("Failed to read file '{}': {}", path.display(), e))?,
        (None, None) => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("Failed to read code from stdin")?;
            buffer
        }
    };

    let request = ExplanationRequest::new(code, language);
    request.validate().map_err(|e| eyre!("{e}"))?;

    if global.verbose {
        eprintln!(
            "Explaining {} chars of {}",
            request.code.len(),
            request.language
        );
    }

    let spinner = new_spinner(f!("{} is thinking...", settings.model));
    let outcome = explain_data(request, &settings).await;
    spinner.finish_and_clear();
    let result = outcome?;

    if app.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.explanation_text);
    }

    Ok(())
}

/// Explain a validated request and return the result (for MCP reuse).
pub async fn explain_data(
    request: ExplanationRequest,
    settings: &Settings,
) -> Result<ExplanationResult> {
    let explainer = Explainer::new(OllamaCompletion::new(settings)?);
    Ok(explainer.run(&request).await?)
}

/// An explicit language wins; otherwise infer it from the file extension.
fn resolve_language(language: Option<&str>, file: Option<&Path>) -> Result<String> {
    if let Some(language) = language {
        return Ok(language.to_string());
    }

    file.and_then(|path| path.extension())
        .and_then(|ext| ext.to_str())
        .and_then(language_for_extension)
        .map(str::to_string)
        .ok_or_eyre("--language is required when it cannot be inferred from --file")
}
