//! HTTP transport seam. The client only ever talks to the network through
//! [`HttpTransport`].

use async_trait::async_trait;
use std::fmt;

use crate::error::Result;
use crate::response::Response;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Whether request data travels in a form body rather than the query string.
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully built (and signed) outbound request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends the request. Any HTTP status is a successful send.
    async fn send(&self, request: HttpRequest) -> Result<Response>;
}

#[cfg(feature = "reqwest")]
pub use self::reqwest_transport::ReqwestTransport;

#[cfg(feature = "reqwest")]
mod reqwest_transport {
    use super::*;
    use crate::config::TransportConfig;
    use crate::error::{Error, TransportError};
    use std::time::Duration;

    pub struct ReqwestTransport {
        client: reqwest::Client,
        timeout: Duration,
    }

    impl ReqwestTransport {
        pub fn new(config: &TransportConfig) -> Result<Self> {
            let client = reqwest::Client::builder()
                .connect_timeout(config.connect_timeout())
                .timeout(config.timeout())
                .build()
                .map_err(|e| Error::Config(format!("cannot build http client: {}", e)))?;
            Ok(ReqwestTransport {
                client,
                timeout: config.timeout(),
            })
        }
    }

    #[async_trait]
    impl HttpTransport for ReqwestTransport {
        async fn send(&self, request: HttpRequest) -> Result<Response> {
            let mut builder = match request.method {
                HttpMethod::Get => self.client.get(&request.url),
                HttpMethod::Post => self.client.post(&request.url),
                HttpMethod::Put => self.client.put(&request.url),
                HttpMethod::Delete => self.client.delete(&request.url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(|e| self.map_error(e))?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(|e| self.map_error(e))?;
            Ok(Response { status, body })
        }
    }

    impl ReqwestTransport {
        fn map_error(&self, e: reqwest::Error) -> Error {
            if e.is_timeout() {
                TransportError::Timeout(self.timeout).into()
            } else {
                TransportError::Connection(e.to_string()).into()
            }
        }
    }
}

#[cfg(any(test, feature = "test-util"))]
pub use mock::MockTransport;

#[cfg(any(test, feature = "test-util"))]
mod mock {
    use super::*;
    use crate::error::TransportError;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// In-memory transport: replays queued responses in order and records every request.
    #[derive(Default)]
    pub struct MockTransport {
        responses: Mutex<VecDeque<Response>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_response(&self, response: Response) -> &Self {
            self.responses
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push_back(response);
            self
        }

        pub fn respond(&self, status: u16, body: impl Into<String>) -> &Self {
            self.push_response(Response::new(status, body))
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone()
        }

        pub fn last_request(&self) -> Option<HttpRequest> {
            self.requests().pop()
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn send(&self, request: HttpRequest) -> Result<Response> {
            self.requests
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(request);
            let next = self
                .responses
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .pop_front();
            next.ok_or_else(|| TransportError::Connection("no mock response queued".into()).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(url: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: url.into(),
            headers: vec![("Authorization".into(), "OAuth x".into())],
            body: None,
        }
    }

    #[tokio::test]
    async fn test_mock_transport_replays_in_order() {
        let transport = MockTransport::new();
        transport.respond(200, "first").respond(500, "second");

        let r = transport.send(get("https://a.test/1")).await.unwrap();
        assert_eq!(r, Response::new(200, "first"));
        let r = transport.send(get("https://a.test/2")).await.unwrap();
        assert_eq!(r.status, 500);
        let err = transport.send(get("https://a.test/3")).await.unwrap_err();
        assert!(err.is_transport());

        let history = transport.requests();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].url, "https://a.test/1");
        assert_eq!(transport.last_request().unwrap().url, "https://a.test/3");
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let r = get("https://a.test");
        assert_eq!(r.header("authorization"), Some("OAuth x"));
        assert_eq!(r.header("Content-Type"), None);
    }

    #[test]
    fn test_http_method() {
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
        assert!(HttpMethod::Put.has_body());
        assert!(!HttpMethod::Get.has_body());
    }
}
