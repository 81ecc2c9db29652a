use crate::completion::{Completion, OllamaCompletion};
use crate::explain::Explainer;
use crate::prelude::{eprintln, *};
use explainer_core::panel::{parse_request, reply_for, PanelError, PanelReply};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

#[derive(Debug, clap::Parser)]
#[command(name = "panel")]
#[command(about = "Editor panel bridge: JSON messages over stdin/stdout, one per line")]
pub struct App {}

pub async fn run(_app: App, global: crate::Global) -> Result<()> {
    let settings = crate::settings::load(&global)?;
    let explainer = Explainer::new(OllamaCompletion::new(&settings)?);

    if global.verbose {
        eprintln!("Starting panel bridge on stdio...");
        eprintln!();
    }

    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();

    serve(&explainer, reader, writer, global.verbose).await
}

/// Answer panel messages until EOF, one request at a time.
///
/// Every non-blank line gets exactly one reply line. Invalid messages, lines
/// that are not UTF-8 and model failures become `error` replies; only I/O
/// errors end the loop.
pub async fn serve<C, R, W>(
    explainer: &Explainer<C>,
    mut reader: R,
    mut writer: W,
    verbose: bool,
) -> Result<()>
where
    C: Completion,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        let bytes_read = reader.read_until(b'\n', &mut buffer).await?;

        if bytes_read == 0 {
            break; // EOF
        }

        let reply = match std::str::from_utf8(&buffer) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handle_message(explainer, line.trim()).await,
            Err(e) => {
                log::warn!("Rejected panel message: {e}");
                PanelReply::Error {
                    error: PanelError::Malformed(e.to_string()).to_string(),
                }
            }
        };

        if verbose {
            eprintln!("Panel: {}", reply.display_text());
        }

        let reply_json = serde_json::to_string(&reply)?;
        writer.write_all(reply_json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    Ok(())
}

async fn handle_message<C: Completion>(explainer: &Explainer<C>, message: &str) -> PanelReply {
    let request = match parse_request(message) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("Rejected panel message: {e}");
            return PanelReply::Error {
                error: e.to_string(),
            };
        }
    };

    log::info!(
        "Panel asked to explain {} chars of {}",
        request.code.len(),
        request.language
    );

    reply_for(explainer.run(&request).await)
}
