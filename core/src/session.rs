//! Screen model for the todo list.
//!
//! # Design
//! `TodoListSession` is the single owner of the fetched users, the joined
//! collection, the pagination window and the active query. Every mutation
//! goes through one of its `&mut self` entry points, so the only way to share
//! it across threads is a lock around the whole struct (`SharedSession`).
//!
//! Loads are identified by a `LoadTicket` carrying a generation number. A
//! fetch completion presents its ticket; if a newer load has started or the
//! screen was torn down in the meantime, the completion is dropped without
//! touching state.
//!
//! The load order is fixed: users first, then todos. `apply_todos` is only
//! accepted after `apply_users` succeeded for the same ticket, so the join
//! always sees the complete user collection.

use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::Mutex;

use crate::client::FeedFetcher;
use crate::config::ClientConfig;
use crate::error::FetchError;
use crate::http::Transport;
use crate::join::join;
use crate::pagination::PaginationWindow;
use crate::search::filter;
use crate::types::{DisplayRow, JoinedTodo, Todo, TodoDetail, User};

/// Identifies one load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }

    pub fn from_generation(generation: u64) -> Self {
        Self(generation)
    }
}

/// Externally visible screen state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    Loading,
    Loaded,
    Failed,
}

/// What the loaded screen is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Paging,
    Filtering,
}

/// Outcome of feeding a fetch completion into the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStep {
    /// Users stored; the caller should now fetch todos.
    FetchTodos,
    /// Todos joined; the screen is loaded.
    Loaded,
    /// The fetch failed; the screen is in its terminal error state.
    Failed(FetchError),
    /// The ticket is not the active load (superseded, torn down, or out of
    /// order). Nothing changed.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    AwaitingUsers,
    AwaitingTodos,
    Settled,
}

/// Immutable view of the session handed to renderers.
#[derive(Debug, Clone)]
pub struct ScreenSnapshot {
    pub generation: u64,
    pub state: ScreenState,
    pub mode: ViewMode,
    pub query: String,
    pub pages_loaded: usize,
    pub total: usize,
    pub rows: Arc<Vec<JoinedTodo>>,
}

impl ScreenSnapshot {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row_at(&self, index: usize) -> Option<DisplayRow> {
        self.rows.get(index).map(JoinedTodo::display_row)
    }
}

#[derive(Debug)]
pub struct TodoListSession {
    generation: u64,
    stage: Stage,
    state: ScreenState,
    closed: bool,
    error: Option<FetchError>,
    users: Vec<User>,
    joined: Vec<JoinedTodo>,
    pagination: PaginationWindow,
    query: String,
    visible: Arc<Vec<JoinedTodo>>,
}

impl TodoListSession {
    pub fn new(page_size: usize) -> Self {
        Self {
            generation: 0,
            stage: Stage::AwaitingUsers,
            state: ScreenState::Loading,
            closed: false,
            error: None,
            users: Vec::new(),
            joined: Vec::new(),
            pagination: PaginationWindow::new(page_size),
            query: String::new(),
            visible: Arc::new(Vec::new()),
        }
    }

    /// Session paged by `config.page_size`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.page_size)
    }

    /// Start a fresh load, invalidating any load still in flight.
    ///
    /// Clears fetched data and resets pagination. The active query is kept.
    /// A torn-down session is left untouched and hands out a ticket that is
    /// never current.
    pub fn begin_load(&mut self) -> LoadTicket {
        if self.closed {
            tracing::debug!(generation = self.generation, "load requested after teardown");
            return LoadTicket(self.generation);
        }
        self.generation += 1;
        self.stage = Stage::AwaitingUsers;
        self.state = ScreenState::Loading;
        self.error = None;
        self.users.clear();
        self.joined.clear();
        self.pagination.reset();
        self.visible = Arc::new(Vec::new());
        tracing::info!(generation = self.generation, "load started");
        LoadTicket(self.generation)
    }

    pub fn apply_users(&mut self, ticket: LoadTicket, result: Result<Vec<User>, FetchError>) -> LoadStep {
        if !self.accepts(ticket, Stage::AwaitingUsers) {
            tracing::debug!(ticket = ticket.0, generation = self.generation, "dropping stale users completion");
            return LoadStep::Stale;
        }
        match result {
            Ok(users) => {
                tracing::debug!(count = users.len(), "users stored");
                self.users = users;
                self.stage = Stage::AwaitingTodos;
                LoadStep::FetchTodos
            }
            Err(err) => self.fail(err),
        }
    }

    pub fn apply_todos(&mut self, ticket: LoadTicket, result: Result<Vec<Todo>, FetchError>) -> LoadStep {
        if !self.accepts(ticket, Stage::AwaitingTodos) {
            tracing::debug!(ticket = ticket.0, generation = self.generation, "dropping stale todos completion");
            return LoadStep::Stale;
        }
        match result {
            Ok(todos) => {
                self.joined = join(&todos, &self.users);
                self.stage = Stage::Settled;
                self.state = ScreenState::Loaded;
                self.refresh_visible();
                tracing::info!(
                    generation = self.generation,
                    todos = self.joined.len(),
                    users = self.users.len(),
                    "load finished"
                );
                LoadStep::Loaded
            }
            Err(err) => self.fail(err),
        }
    }

    /// Drop the screen. Every outstanding ticket becomes stale.
    pub fn teardown(&mut self) {
        self.closed = true;
        self.generation += 1;
        tracing::debug!(generation = self.generation, "session torn down");
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        !self.closed && ticket.0 == self.generation
    }

    pub fn on_query_changed(&mut self, text: &str) {
        if self.query == text {
            return;
        }
        self.query = text.to_string();
        if self.state == ScreenState::Loaded {
            self.refresh_visible();
        }
    }

    /// Grow the pagination window by one page.
    ///
    /// Ignored while a non-empty query is active: searching suspends
    /// pagination, so clearing the query shows the window as it was.
    /// Returns whether the visible rows changed.
    pub fn on_load_more_requested(&mut self) -> bool {
        if self.state != ScreenState::Loaded || !self.query.is_empty() {
            return false;
        }
        if !self.pagination.advance(self.joined.len()) {
            return false;
        }
        tracing::debug!(pages = self.pagination.pages_loaded(), "page loaded");
        self.refresh_visible();
        true
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn mode(&self) -> ViewMode {
        if self.query.is_empty() {
            ViewMode::Paging
        } else {
            ViewMode::Filtering
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn pagination(&self) -> &PaginationWindow {
        &self.pagination
    }

    pub fn joined(&self) -> &[JoinedTodo] {
        &self.joined
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn row_count(&self) -> usize {
        self.visible.len()
    }

    pub fn row_at(&self, index: usize) -> Option<DisplayRow> {
        self.visible.get(index).map(JoinedTodo::display_row)
    }

    pub fn on_select(&self, index: usize) -> Option<JoinedTodo> {
        self.visible.get(index).cloned()
    }

    pub fn detail_at(&self, index: usize) -> Option<TodoDetail> {
        self.visible.get(index).map(JoinedTodo::detail)
    }

    pub fn snapshot(&self) -> ScreenSnapshot {
        ScreenSnapshot {
            generation: self.generation,
            state: self.state,
            mode: self.mode(),
            query: self.query.clone(),
            pages_loaded: self.pagination.pages_loaded(),
            total: self.joined.len(),
            rows: Arc::clone(&self.visible),
        }
    }

    fn accepts(&self, ticket: LoadTicket, stage: Stage) -> bool {
        self.is_current(ticket) && self.stage == stage
    }

    fn fail(&mut self, err: FetchError) -> LoadStep {
        tracing::warn!(generation = self.generation, error = %err, "load failed");
        self.stage = Stage::Settled;
        self.state = ScreenState::Failed;
        self.error = Some(err.clone());
        LoadStep::Failed(err)
    }

    fn refresh_visible(&mut self) {
        self.visible = Arc::new(filter(&self.joined, &self.pagination, &self.query));
    }
}

/// A `TodoListSession` behind a lock, shareable between the UI thread and
/// fetch workers.
#[derive(Debug, Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<TodoListSession>>,
}

impl SharedSession {
    pub fn new(page_size: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TodoListSession::new(page_size))),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TodoListSession::from_config(config))),
        }
    }

    /// Run `f` with exclusive access to the session.
    pub fn with<R>(&self, f: impl FnOnce(&mut TodoListSession) -> R) -> R {
        f(&mut *self.inner.lock())
    }

    /// Fetch users, then todos, applying each completion under the lock.
    ///
    /// The lock is not held during network calls. If the users fetch fails
    /// or the load is superseded, todos are never requested. A torn-down
    /// session returns `Stale` without touching the network.
    pub fn load<T: Transport>(&self, fetcher: &FeedFetcher<T>) -> LoadStep {
        let ticket = self.with(|s| {
            let ticket = s.begin_load();
            s.is_current(ticket).then_some(ticket)
        });
        let Some(ticket) = ticket else {
            return LoadStep::Stale;
        };

        let users = fetcher.fetch_users();
        match self.with(|s| s.apply_users(ticket, users)) {
            LoadStep::FetchTodos => {}
            other => return other,
        }

        let todos = fetcher.fetch_todos();
        self.with(|s| s.apply_todos(ticket, todos))
    }

    /// Run `load` on a worker thread and hand the outcome to `on_complete`.
    pub fn spawn_load<T, F>(&self, fetcher: Arc<FeedFetcher<T>>, on_complete: F) -> JoinHandle<()>
    where
        T: Transport + 'static,
        F: FnOnce(LoadStep) + Send + 'static,
    {
        let session = self.clone();
        std::thread::spawn(move || {
            let step = session.load(&fetcher);
            on_complete(step);
        })
    }

    pub fn on_query_changed(&self, text: &str) {
        self.with(|s| s.on_query_changed(text));
    }

    pub fn on_load_more_requested(&self) -> bool {
        self.with(TodoListSession::on_load_more_requested)
    }

    pub fn teardown(&self) {
        self.with(TodoListSession::teardown);
    }

    pub fn snapshot(&self) -> ScreenSnapshot {
        self.with(|s| s.snapshot())
    }
}
