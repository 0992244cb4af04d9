use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use axum::http::StatusCode;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub id: i64,
    pub title: String,
    pub completed: bool,
}

/// What the server hands out, and which endpoints should fail.
#[derive(Clone, Debug, Default)]
pub struct Fixtures {
    pub users: Vec<User>,
    pub todos: Vec<Todo>,
    pub users_status: Option<StatusCode>,
    pub todos_status: Option<StatusCode>,
}

impl Fixtures {
    /// Three users and 45 todos. Todos owned by user 4 have no matching
    /// user record.
    pub fn seeded() -> Self {
        let users = ["Leanne Graham", "Ervin Howell", "Clementine Bauch"]
            .iter()
            .zip(1..)
            .map(|(&name, id)| User {
                id,
                name: name.to_string(),
                username: name.split(' ').next().unwrap_or(name).to_lowercase(),
            })
            .collect();
        let todos = (1..=45)
            .map(|id| Todo {
                user_id: (id - 1) % 4 + 1,
                id,
                title: format!("todo number {id}"),
                completed: id % 3 == 0,
            })
            .collect();
        Self {
            users,
            todos,
            ..Self::default()
        }
    }

    pub fn failing_users(mut self, status: StatusCode) -> Self {
        self.users_status = Some(status);
        self
    }

    pub fn failing_todos(mut self, status: StatusCode) -> Self {
        self.todos_status = Some(status);
        self
    }
}

/// Per-endpoint request counters.
#[derive(Clone, Debug, Default)]
pub struct Hits {
    users: Arc<AtomicUsize>,
    todos: Arc<AtomicUsize>,
}

impl Hits {
    pub fn users(&self) -> usize {
        self.users.load(Ordering::SeqCst)
    }

    pub fn todos(&self) -> usize {
        self.todos.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct AppState {
    fixtures: Arc<Fixtures>,
    hits: Hits,
}

pub fn app() -> Router {
    app_with(Fixtures::seeded()).0
}

pub fn app_with(fixtures: Fixtures) -> (Router, Hits) {
    let hits = Hits::default();
    let state = AppState {
        fixtures: Arc::new(fixtures),
        hits: hits.clone(),
    };
    let router = Router::new()
        .route("/users", get(list_users))
        .route("/todos", get(list_todos))
        .layer(TraceLayer::new_for_http())
        .with_state(state);
    (router, hits)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, StatusCode> {
    state.hits.users.fetch_add(1, Ordering::SeqCst);
    if let Some(status) = state.fixtures.users_status {
        tracing::debug!(%status, "failing /users on request");
        return Err(status);
    }
    Ok(Json(state.fixtures.users.clone()))
}

async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, StatusCode> {
    state.hits.todos.fetch_add(1, Ordering::SeqCst);
    if let Some(status) = state.fixtures.todos_status {
        tracing::debug!(%status, "failing /todos on request");
        return Err(status);
    }
    Ok(Json(state.fixtures.todos.clone()))
}
