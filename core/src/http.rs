//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network; whoever owns the I/O (the mobile host over FFI, or
//! a `Transport` implementation) executes the round-trip.
//!
//! All fields use owned types so values can cross the FFI boundary and move
//! between the UI thread and a worker thread without lifetime concerns.

use crate::error::FetchError;

/// HTTP method for a request. The feed endpoints are read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes an `HttpRequest` and hands back the response as data.
///
/// Implementations must return non-2xx responses as `Ok`; only failures that
/// produce no response at all map to `FetchError::Transport`. Implementations
/// are called from worker threads, hence `Send + Sync`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, FetchError>;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, FetchError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by `ureq`.
#[cfg(feature = "blocking")]
pub mod blocking {
    use std::time::Duration;

    use super::{HttpMethod, HttpRequest, HttpResponse, Transport};
    use crate::error::FetchError;

    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl UreqTransport {
        pub fn new(timeout: Duration) -> Self {
            // Status codes are interpreted by the client, not by ureq.
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .timeout_global(Some(timeout))
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, FetchError> {
            let mut response = match request.method {
                HttpMethod::Get => {
                    let mut builder = self.agent.get(&request.path);
                    for (key, value) in &request.headers {
                        builder = builder.header(key, value);
                    }
                    builder.call()
                }
            }
            .map_err(|e| FetchError::transport(e.to_string()))?;

            let status = response.status().as_u16();
            let body = response
                .body_mut()
                .read_to_string()
                .map_err(|e| FetchError::transport(e.to_string()))?;
            Ok(HttpResponse::new(status, body))
        }
    }
}
