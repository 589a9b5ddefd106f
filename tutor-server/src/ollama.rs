use futures_util::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tutor_shared::ChatMessage;

use crate::error::RelayError;

const DEFAULT_HOST: &str = "ollama";
const DEFAULT_PORT: &str = "11434";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Payload for `POST /api/chat` on the Ollama API.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

/// One line of the newline-delimited JSON response stream. Parsed per
/// line, consumed immediately, never stored.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamChunk {
    #[serde(default)]
    pub message: Option<ChunkMessage>,
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkMessage {
    pub content: String,
}

pub struct OllamaClient {
    http: Client,
    chat_url: String,
}

impl OllamaClient {
    /// Builds a client from `OLLAMA_HOST`, `OLLAMA_PORT` and
    /// `OLLAMA_TIMEOUT_SECS`, with defaults for all three.
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("OLLAMA_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = std::env::var("OLLAMA_PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
        let timeout = std::env::var("OLLAMA_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self::new(format!("http://{host}:{port}"), Duration::from_secs(timeout))
    }

    /// The timeout bounds the whole downstream interaction, connect and
    /// body read included.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        let chat_url = format!("{}/api/chat", base_url.into());
        info!("Ollama chat endpoint: {}", chat_url);
        Ok(Self { http, chat_url })
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    /// Opens one streaming chat call and returns a receiver of parsed
    /// chunks. The reader task stops at the first `done: true` chunk and
    /// drops the connection; a transport failure mid-stream arrives on the
    /// channel as an `Err` item.
    pub async fn stream_chat(
        &self,
        model: String,
        messages: Vec<ChatMessage>,
    ) -> Result<mpsc::UnboundedReceiver<Result<StreamChunk, RelayError>>, RelayError> {
        let request = ChatRequest {
            model,
            messages,
            stream: true,
        };

        let response = self.http.post(&self.chat_url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::Downstream {
                status: status.as_u16(),
                body,
            });
        }

        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            let mut buf: Vec<u8> = Vec::new();

            while let Some(next) = stream.next().await {
                let bytes = match next {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        let _ = tx.send(Err(RelayError::from(e)));
                        return;
                    }
                };
                buf.extend_from_slice(&bytes);

                while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
                    let line: Vec<u8> = buf.drain(..=pos).collect();
                    match parse_line(&line) {
                        Some(chunk) => {
                            let done = chunk.done;
                            if tx.send(Ok(chunk)).is_err() {
                                // Caller went away; stop reading.
                                return;
                            }
                            if done {
                                debug!("done flag observed, dropping stream");
                                return;
                            }
                        }
                        None => continue,
                    }
                }
            }

            // A final line may arrive without a trailing newline.
            if let Some(chunk) = parse_line(&buf) {
                let _ = tx.send(Ok(chunk));
            }
        });

        Ok(rx)
    }
}

/// Parses one stream line. Empty lines and lines that are not valid JSON
/// are framing artifacts, not errors; they yield `None` and the stream
/// goes on.
fn parse_line(line: &[u8]) -> Option<StreamChunk> {
    let line = String::from_utf8_lossy(line);
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    serde_json::from_str(line).ok()
}
