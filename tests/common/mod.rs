//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use precis::{CompletionModel, ContentExtractor, ExtractError, InferenceError, ModelId, PageContent};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Extractor returning queued results in order; `None` is a fetch failure.
#[derive(Clone, Default)]
pub struct ScriptedExtractor {
    results: Arc<Mutex<VecDeque<Option<String>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedExtractor {
    pub fn new(results: impl IntoIterator<Item = Option<&'static str>>) -> Self {
        Self {
            results: Arc::new(Mutex::new(
                results.into_iter().map(|r| r.map(str::to_string)).collect(),
            )),
            calls: Arc::default(),
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentExtractor for ScriptedExtractor {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn extract(&self, url: &str) -> Result<PageContent, ExtractError> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.results.lock().unwrap().pop_front().flatten() {
            Some(text) => Ok(PageContent::new(url, Some("Test page".to_string()), text)),
            None => Err(ExtractError::ParseError("connection refused".to_string())),
        }
    }
}

/// Model that records every prompt and answers with a fixed reply
#[derive(Clone)]
pub struct RecordingModel {
    reply: String,
    prompts: Arc<Mutex<Vec<(ModelId, String)>>>,
}

impl RecordingModel {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Arc::default(),
        }
    }

    pub fn prompts(&self) -> Vec<(ModelId, String)> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionModel for RecordingModel {
    async fn complete(&self, model: ModelId, prompt: &str) -> Result<String, InferenceError> {
        self.prompts.lock().unwrap().push((model, prompt.to_string()));
        Ok(self.reply.clone())
    }
}

/// Serve one canned HTTP response on a loopback port.
///
/// Returns the base URL and a handle resolving to the raw request text.
pub async fn serve_once(
    status: &'static str,
    content_type: &'static str,
    body: String,
) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });

    (format!("http://{addr}"), handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
