//! Stateless request builder and response parser for the feed endpoints.
//!
//! # Design
//! `FeedClient` holds only a `base_url` and carries no mutable state between
//! calls. Each fetch is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! `FeedFetcher` pairs the client with a `Transport` for callers that want
//! the round-trip done in Rust.

use serde::de::DeserializeOwned;

use crate::error::FetchError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::types::{Todo, User};

pub const USERS_PATH: &str = "/users";
pub const TODOS_PATH: &str = "/todos";

/// Synchronous, stateless client for the `/users` and `/todos` collections.
#[derive(Debug, Clone)]
pub struct FeedClient {
    base_url: String,
}

impl FeedClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_list_users(&self) -> HttpRequest {
        self.get(USERS_PATH)
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        self.get(TODOS_PATH)
    }

    pub fn parse_list_users(&self, response: HttpResponse) -> Result<Vec<User>, FetchError> {
        decode_array(response)
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, FetchError> {
        decode_array(response)
    }

    fn get(&self, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{path}", self.base_url),
            headers: vec![("accept".to_string(), "application/json".to_string())],
            body: None,
        }
    }
}

/// Map non-2xx responses to `HttpError`, then decode the JSON array body.
fn decode_array<T: DeserializeOwned>(response: HttpResponse) -> Result<Vec<T>, FetchError> {
    if !response.is_success() {
        return Err(FetchError::HttpError {
            status: response.status,
            body: response.body,
        });
    }
    serde_json::from_str(&response.body).map_err(|e| FetchError::decode(e.to_string()))
}

/// A `FeedClient` bound to a `Transport`.
///
/// Each call performs exactly one request and never retries.
pub struct FeedFetcher<T> {
    client: FeedClient,
    transport: T,
}

impl<T: Transport> FeedFetcher<T> {
    pub fn new(client: FeedClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn fetch_users(&self) -> Result<Vec<User>, FetchError> {
        let request = self.client.build_list_users();
        tracing::debug!(url = %request.path, "fetching users");
        let response = self.transport.execute(&request)?;
        let users = self.client.parse_list_users(response)?;
        tracing::debug!(count = users.len(), "decoded users");
        Ok(users)
    }

    pub fn fetch_todos(&self) -> Result<Vec<Todo>, FetchError> {
        let request = self.client.build_list_todos();
        tracing::debug!(url = %request.path, "fetching todos");
        let response = self.transport.execute(&request)?;
        let todos = self.client.parse_list_todos(response)?;
        tracing::debug!(count = todos.len(), "decoded todos");
        Ok(todos)
    }
}

#[cfg(feature = "blocking")]
impl FeedFetcher<crate::http::blocking::UreqTransport> {
    /// Fetcher over a real network connection, configured from `config`.
    pub fn from_config(config: &crate::config::ClientConfig) -> Self {
        Self::new(
            FeedClient::new(&config.base_url),
            crate::http::blocking::UreqTransport::new(config.timeout()),
        )
    }
}
