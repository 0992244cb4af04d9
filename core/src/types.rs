//! Domain records for the todo list pipeline.
//!
//! # Design
//! `User` and `Todo` mirror the wire schema of `/users` and `/todos` but are
//! defined independently from the mock-server crate; integration tests catch
//! schema drift. Unknown JSON fields are ignored so the full upstream user
//! objects (address, company, ...) decode without ceremony.
//!
//! The user association on `JoinedTodo` is a sum type rather than an
//! `Option<User>` field named like the wire one, so "no owner was fetched" is a
//! checked state at every use site.

use serde::{Deserialize, Serialize};

/// Label shown for a todo whose owner was not part of the fetched users.
pub const UNKNOWN_USER: &str = "Unknown";

/// A user record returned by `GET /users`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
}

/// A todo record returned by `GET /todos`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    #[serde(rename = "userId")]
    pub user_id: i64,
}

/// Result of resolving `Todo::user_id` against the fetched users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLink {
    Absent,
    Present(User),
}

impl UserLink {
    pub fn user(&self) -> Option<&User> {
        match self {
            UserLink::Absent => None,
            UserLink::Present(user) => Some(user),
        }
    }

    /// Name used for display; `UNKNOWN_USER` when absent.
    pub fn display_name(&self) -> &str {
        match self {
            UserLink::Absent => UNKNOWN_USER,
            UserLink::Present(user) => &user.name,
        }
    }
}

/// A todo enriched with its resolved owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedTodo {
    pub todo: Todo,
    pub user: UserLink,
}

impl JoinedTodo {
    pub fn id(&self) -> i64 {
        self.todo.id
    }

    pub fn title(&self) -> &str {
        &self.todo.title
    }

    pub fn display_row(&self) -> DisplayRow {
        DisplayRow {
            title: self.todo.title.clone(),
            user_name: self.user.display_name().to_string(),
        }
    }

    pub fn detail(&self) -> TodoDetail {
        TodoDetail {
            id: self.todo.id,
            title: self.todo.title.clone(),
            user_name: self.user.display_name().to_string(),
            completed: self.todo.completed,
        }
    }
}

/// One list row as the presentation layer renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub title: String,
    pub user_name: String,
}

/// Contents of the detail page for a selected todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDetail {
    pub id: i64,
    pub title: String,
    pub user_name: String,
    pub completed: bool,
}
