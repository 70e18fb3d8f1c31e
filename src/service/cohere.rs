use super::CompletionService;
use super::base_client::BaseApiClient;
use crate::core::error::HeartTalkError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    text: String,
}

/// Client for Cohere's single-message chat endpoint.
#[derive(Clone)]
pub struct CohereClient {
    client: BaseApiClient,
}

impl CohereClient {
    pub fn new(endpoint: &str, api_key: &str, timeout: Duration) -> Result<Self, HeartTalkError> {
        Ok(Self {
            client: BaseApiClient::new(endpoint, api_key, timeout)?,
        })
    }
}

#[async_trait]
impl CompletionService for CohereClient {
    async fn complete(&self, message: &str) -> Result<String, HeartTalkError> {
        info!(chars = message.chars().count(), "requesting completion");
        let response = self.client.post_json(&ChatRequest { message }).await?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.client.classify(e))?;
        if !status.is_success() {
            return Err(HeartTalkError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body)?;
        let text = parsed.text.trim();
        if text.is_empty() {
            return Err(HeartTalkError::MalformedResponse(
                "Empty `text` in API response".to_string(),
            ));
        }

        debug!(chars = text.chars().count(), "completion received");
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves exactly one HTTP response and hands back the raw request.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind local test server");
        let addr = listener.local_addr().expect("local addr");

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept connection");
            let request = read_request(&mut socket).await;

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket
                .write_all(response.as_bytes())
                .await
                .expect("write response");
            request
        });

        (format!("http://{}/v1/chat", addr), server)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut raw = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.expect("read request");
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&raw).to_string();
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
                if raw.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&raw).to_string()
    }

    fn client(url: &str) -> CohereClient {
        CohereClient::new(url, "test-key", Duration::from_secs(5)).expect("client builds")
    }

    #[tokio::test]
    async fn posts_message_with_bearer_token() {
        let (url, server) =
            serve_once("200 OK", r#"{"text":"  Hi there!  ","generation_id":"g1"}"#).await;

        let reply = client(&url).complete("hello").await.expect("completion succeeds");
        assert_eq!(reply, "Hi there!");

        let request = server.await.expect("server task completes");
        let lower = request.to_lowercase();
        assert!(request.starts_with("POST /v1/chat "));
        assert!(lower.contains("authorization: bearer test-key"));
        assert!(lower.contains("content-type: application/json"));
        assert!(request.ends_with(r#"{"message":"hello"}"#));
    }

    #[tokio::test]
    async fn missing_text_field_is_malformed() {
        let (url, server) = serve_once("200 OK", r#"{"message":"wrong shape"}"#).await;

        let err = client(&url).complete("hello").await.unwrap_err();
        assert!(matches!(err, HeartTalkError::MalformedResponse(_)));
        server.await.expect("server task completes");
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let (url, server) = serve_once("200 OK", "<html>oops</html>").await;

        let err = client(&url).complete("hello").await.unwrap_err();
        assert!(matches!(err, HeartTalkError::MalformedResponse(_)));
        server.await.expect("server task completes");
    }

    #[tokio::test]
    async fn empty_text_is_malformed() {
        let (url, server) = serve_once("200 OK", r#"{"text":"   "}"#).await;

        let err = client(&url).complete("hello").await.unwrap_err();
        assert!(matches!(err, HeartTalkError::MalformedResponse(_)));
        server.await.expect("server task completes");
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let (url, server) =
            serve_once("401 Unauthorized", r#"{"message":"invalid api token"}"#).await;

        let err = client(&url).complete("hello").await.unwrap_err();
        match err {
            HeartTalkError::Api { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("invalid api token"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        server.await.expect("server task completes");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}/v1/chat", addr))
            .complete("hello")
            .await
            .unwrap_err();
        assert!(err.is_remote_failure());
        assert!(matches!(err, HeartTalkError::Transport(_)));
    }

    #[tokio::test]
    async fn slow_endpoint_reports_a_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind local test server");
        let addr = listener.local_addr().expect("local addr");
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept connection");
            read_request(&mut socket).await;
            // Hold the connection open without answering.
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let slow = CohereClient::new(
            &format!("http://{}/v1/chat", addr),
            "test-key",
            Duration::from_millis(200),
        )
        .expect("client builds");
        let err = slow.complete("hello").await.unwrap_err();

        match err {
            HeartTalkError::Timeout(limit) => assert_eq!(limit, Duration::from_millis(200)),
            other => panic!("expected a timeout, got {other:?}"),
        }
        server.abort();
    }
}
