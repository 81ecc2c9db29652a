use crate::error::CompletionError;
use explainer_core::config::Settings;
use rig::client::{CompletionClient, Nothing};
use rig::completion::Prompt;
use rig::providers::ollama;
use std::future::Future;
use std::time::Duration;

/// A single-shot chat completion: one system message, one human message, one reply.
pub trait Completion {
    fn complete(
        &self,
        system: &str,
        human: &str,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send;
}

/// Completion client backed by a local Ollama server.
///
/// Model, temperature and timeout are fixed at construction and shared by
/// every call made through this client.
pub struct OllamaCompletion {
    client: ollama::Client,
    model: String,
    temperature: f64,
    timeout: Duration,
}

impl OllamaCompletion {
    pub fn new(settings: &Settings) -> Result<Self, CompletionError> {
        let client = ollama::Client::builder()
            .api_key(Nothing)
            .base_url(&settings.ollama_url)
            .build()
            .map_err(|e| CompletionError::Client(e.to_string()))?;

        Ok(Self {
            client,
            model: settings.model.clone(),
            temperature: settings.temperature,
            timeout: settings.timeout,
        })
    }
}

impl Completion for OllamaCompletion {
    async fn complete(&self, system: &str, human: &str) -> Result<String, CompletionError> {
        log::info!(
            "Requesting explanation from '{}' (temperature {})",
            self.model,
            self.temperature
        );
        log::debug!(
            "Prompt sizes: system={} chars, human={} chars",
            system.len(),
            human.len()
        );

        let agent = self
            .client
            .agent(&self.model)
            .preamble(system)
            .temperature(self.temperature)
            .build();

        let response = tokio::time::timeout(self.timeout, agent.prompt(human))
            .await
            .map_err(|_| CompletionError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| CompletionError::Request(e.to_string()))?;

        if response.trim().is_empty() {
            return Err(CompletionError::EmptyResponse);
        }

        log::info!("Generated explanation ({} chars)", response.len());

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use explainer_core::explain::SYSTEM_INSTRUCTION;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn settings_for(listener: &TcpListener, timeout: Duration) -> Settings {
        Settings {
            ollama_url: format!("http://{}", listener.local_addr().unwrap()),
            timeout,
            ..Settings::default()
        }
    }

    /// Answers a single `/api/chat` request with `reply` and hands back the request body.
    fn serve_chat_once(listener: TcpListener, reply: serde_json::Value) -> JoinHandle<String> {
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            let (head_len, body_len) = loop {
                let n = stream.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before the request was complete");
                request.extend_from_slice(&chunk[..n]);

                if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&request[..pos]).to_lowercase();
                    let body_len = head
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .map(|value| value.trim().parse::<usize>().unwrap())
                        .unwrap_or(0);
                    break (pos + 4, body_len);
                }
            };
            while request.len() < head_len + body_len {
                let n = stream.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before the body was complete");
                request.extend_from_slice(&chunk[..n]);
            }

            let body = reply.to_string();
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();

            String::from_utf8(request[head_len..head_len + body_len].to_vec()).unwrap()
        })
    }

    fn chat_reply(content: &str) -> serde_json::Value {
        serde_json::json!({
            "model": "llama3:8b",
            "created_at": "2024-01-01T00:00:00Z",
            "message": { "role": "assistant", "content": content },
            "done": true,
            "done_reason": "stop",
            "total_duration": 1,
            "load_duration": 1,
            "prompt_eval_count": 1,
            "prompt_eval_duration": 1,
            "eval_count": 1,
            "eval_duration": 1
        })
    }

    #[test]
    fn test_client_keeps_settings() {
        let settings = Settings {
            ollama_url: "http://127.0.0.1:11434".to_string(),
            model: "llama3:8b".to_string(),
            temperature: 0.8,
            timeout: Duration::from_secs(5),
        };

        let completion = OllamaCompletion::new(&settings).unwrap();
        assert_eq!(completion.model, "llama3:8b");
        assert_eq!(completion.temperature, 0.8);
        assert_eq!(completion.timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_fails_with_request_error() {
        // Port 9 (discard) on loopback is not an Ollama server.
        let settings = Settings {
            ollama_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(5),
            ..Settings::default()
        };

        let completion = OllamaCompletion::new(&settings).unwrap();
        let err = completion
            .complete("system", "human")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CompletionError::Request(_) | CompletionError::Timeout(_)
        ));
    }

    #[tokio::test]
    async fn test_silent_server_fails_with_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let settings = settings_for(&listener, Duration::from_secs(1));

        // Accept the connection and never answer.
        let _server = tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let completion = OllamaCompletion::new(&settings).unwrap();
        let outcome = completion.complete("system", "human").await;

        assert_eq!(outcome, Err(CompletionError::Timeout(1)));
    }

    #[tokio::test]
    async fn test_whitespace_reply_fails_with_empty_response() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let settings = settings_for(&listener, Duration::from_secs(10));
        let server = serve_chat_once(listener, chat_reply("   "));

        let completion = OllamaCompletion::new(&settings).unwrap();
        let outcome = completion
            .complete(SYSTEM_INSTRUCTION, "Please explain the following go code")
            .await;

        assert_eq!(outcome, Err(CompletionError::EmptyResponse));

        let body: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert_eq!(body["model"], "llama3:8b");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_INSTRUCTION);
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(
            body["messages"][1]["content"],
            "Please explain the following go code"
        );
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
        assert_eq!(body["options"]["temperature"], 0.8);
    }

    #[tokio::test]
    async fn test_reply_text_is_returned() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let settings = settings_for(&listener, Duration::from_secs(10));
        let server = serve_chat_once(listener, chat_reply("Declares a constant."));

        let completion = OllamaCompletion::new(&settings).unwrap();
        let outcome = completion.complete("system", "human").await;

        assert_eq!(outcome, Ok("Declares a constant.".to_string()));
        server.await.unwrap();
    }
}
