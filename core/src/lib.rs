//! Data pipeline behind the todo list screen.
//!
//! # Overview
//! Fetches `/users` and `/todos`, joins each todo to its owner, exposes a
//! growing page window over the joined list and filters it by a search
//! query. Rendering is left to the host; this crate provides the rows.
//!
//! # Design
//! - `FeedClient` is stateless and never touches the network: `build_*`
//!   produces an `HttpRequest`, `parse_*` consumes an `HttpResponse`
//!   (host-does-IO). `FeedFetcher` pairs it with a `Transport` when the
//!   round-trip should happen in Rust.
//! - `join`, `pagination` and `search` are pure functions over slices.
//! - `TodoListSession` owns all mutable screen state; `SharedSession` puts it
//!   behind a lock for hosts that complete fetches on worker threads. Load
//!   tickets make late completions harmless.
//! - Types use owned `String` / `Vec` fields to simplify FFI mapping.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod join;
pub mod pagination;
pub mod search;
pub mod session;
pub mod types;

pub use client::{FeedClient, FeedFetcher};
pub use config::ClientConfig;
pub use error::{ConfigError, FetchError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use join::join;
pub use pagination::{initial_page, next_page, PaginationWindow};
pub use search::filter;
pub use session::{LoadStep, LoadTicket, ScreenSnapshot, ScreenState, SharedSession, TodoListSession, ViewMode};
pub use types::{DisplayRow, JoinedTodo, Todo, TodoDetail, User, UserLink};
