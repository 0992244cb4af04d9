//! End-to-end load against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives a `SharedSession`
//! through the ureq-backed `UreqTransport`. Validates that
//! request building, decoding, the users-before-todos ordering and the join
//! work over real HTTP.

use mock_server::{app_with, Fixtures, Hits, StatusCode};
use todolist_core::config::{ENV_BASE_URL, ENV_PAGE_SIZE};
use todolist_core::http::blocking::UreqTransport;
use todolist_core::{ClientConfig, FeedFetcher, FetchError, LoadStep, ScreenState, SharedSession, ViewMode};

/// Serve `fixtures` on a random port from a background runtime.
fn start_server(fixtures: Fixtures) -> (String, Hits) {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();
    let (router, hits) = app_with(fixtures);

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with(listener, router).await
        })
        .unwrap();
    });

    (format!("http://{addr}"), hits)
}

fn config(base_url: &str) -> ClientConfig {
    ClientConfig::default()
        .with_overrides(|key| match key {
            ENV_BASE_URL => Some(base_url.to_string()),
            ENV_PAGE_SIZE => Some("20".to_string()),
            _ => None,
        })
        .unwrap()
}

fn fetcher(base_url: &str) -> FeedFetcher<UreqTransport> {
    FeedFetcher::from_config(&ClientConfig {
        timeout_secs: 5,
        ..config(base_url)
    })
}

#[test]
fn load_page_search_lifecycle() {
    let (base_url, hits) = start_server(Fixtures::seeded());
    let session = SharedSession::from_config(&config(&base_url));

    // Step 1: load users, then todos.
    assert_eq!(session.load(&fetcher(&base_url)), LoadStep::Loaded);
    assert_eq!(hits.users(), 1);
    assert_eq!(hits.todos(), 1);

    // Step 2: first page, joined.
    let snapshot = session.snapshot();
    assert_eq!(snapshot.state, ScreenState::Loaded);
    assert_eq!(snapshot.total, 45);
    assert_eq!(snapshot.row_count(), 20);
    let first = snapshot.row_at(0).unwrap();
    assert_eq!(first.title, "todo number 1");
    assert_eq!(first.user_name, "Leanne Graham");
    // Todo 4 belongs to user 4, which the server does not know.
    assert_eq!(snapshot.row_at(3).unwrap().user_name, "Unknown");

    // Step 3: load more.
    assert!(session.on_load_more_requested());
    assert_eq!(session.snapshot().row_count(), 40);

    // Step 4: search by user name across the whole collection.
    session.on_query_changed("ERVIN");
    let snapshot = session.snapshot();
    assert_eq!(snapshot.mode, ViewMode::Filtering);
    // User 2 owns todos 2, 6, 10, ..., 42.
    assert_eq!(snapshot.row_count(), 11);
    assert!(snapshot.rows.iter().all(|j| j.todo.user_id == 2));

    // Step 5: clearing the query restores the 40-row window.
    session.on_query_changed("");
    assert_eq!(session.snapshot().row_count(), 40);

    // Search never re-fetches.
    assert_eq!(hits.users(), 1);
    assert_eq!(hits.todos(), 1);
}

#[test]
fn users_failure_never_fetches_todos() {
    let (base_url, hits) =
        start_server(Fixtures::seeded().failing_users(StatusCode::INTERNAL_SERVER_ERROR));
    let session = SharedSession::from_config(&config(&base_url));

    let step = session.load(&fetcher(&base_url));

    assert!(matches!(step, LoadStep::Failed(FetchError::HttpError { status: 500, .. })));
    assert_eq!(session.snapshot().state, ScreenState::Failed);
    assert_eq!(hits.users(), 1);
    assert_eq!(hits.todos(), 0);
}

#[test]
fn todos_failure_fails_the_screen() {
    let (base_url, hits) = start_server(Fixtures::seeded().failing_todos(StatusCode::BAD_GATEWAY));
    let session = SharedSession::from_config(&config(&base_url));

    let step = session.load(&fetcher(&base_url));

    assert!(matches!(step, LoadStep::Failed(FetchError::HttpError { status: 502, .. })));
    assert_eq!(session.snapshot().row_count(), 0);
    assert_eq!(hits.todos(), 1);
}

#[test]
fn unreachable_host_is_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let fetcher = fetcher(&format!("http://127.0.0.1:{port}"));

    let err = fetcher.fetch_users().unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)));
}
