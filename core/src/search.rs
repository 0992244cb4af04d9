//! Incremental search over the joined collection.
//!
//! An empty query shows the pagination window; any other query scans the
//! full joined collection. Matching is case-insensitive substring containment
//! on the title and on the owner's name, in source order, with no ranking.

use crate::pagination::PaginationWindow;
use crate::types::JoinedTodo;

/// Visible rows for `query`. Pure in `(source, window, query)`.
pub fn filter(source: &[JoinedTodo], window: &PaginationWindow, query: &str) -> Vec<JoinedTodo> {
    if query.is_empty() {
        return window.window(source).to_vec();
    }
    let needle = query.to_lowercase();
    source
        .iter()
        .filter(|joined| matches(joined, &needle))
        .cloned()
        .collect()
}

/// `needle` must already be lowercase.
pub fn matches(joined: &JoinedTodo, needle: &str) -> bool {
    if joined.title().to_lowercase().contains(needle) {
        return true;
    }
    joined
        .user
        .user()
        .is_some_and(|user| user.name.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::join::join;
    use crate::types::{Todo, User};

    fn todo(id: i64, title: &str, user_id: i64) -> Todo {
        Todo { id, title: title.to_string(), completed: false, user_id }
    }

    fn scenario() -> Vec<JoinedTodo> {
        let users = vec![User { id: 1, name: "Alice".to_string() }];
        let todos = vec![todo(10, "Clean", 1), todo(11, "Cook", 2)];
        join(&todos, &users)
    }

    fn ids(rows: &[JoinedTodo]) -> Vec<i64> {
        rows.iter().map(JoinedTodo::id).collect()
    }

    #[test]
    fn matches_user_name_case_insensitively() {
        let joined = scenario();
        let window = PaginationWindow::new(20);
        assert_eq!(ids(&filter(&joined, &window, "alice")), vec![10]);
    }

    #[test]
    fn matches_title_case_insensitively() {
        let joined = scenario();
        let window = PaginationWindow::new(20);
        assert_eq!(ids(&filter(&joined, &window, "cook")), vec![11]);
    }

    #[test]
    fn buy_milk_matches_any_case() {
        let joined = join(&[todo(1, "Buy Milk", 1)], &[]);
        let window = PaginationWindow::new(20);
        assert_eq!(filter(&joined, &window, "milk").len(), 1);
        assert_eq!(filter(&joined, &window, "MILK").len(), 1);
        assert_eq!(filter(&joined, &window, "bUy mI").len(), 1);
    }

    #[test]
    fn absent_user_never_matches_on_name() {
        let joined = scenario();
        let window = PaginationWindow::new(20);
        // "Unknown" is only a display label, not a searchable name.
        assert!(filter(&joined, &window, "unknown").is_empty());
    }

    #[test]
    fn empty_query_returns_pagination_window() {
        let todos: Vec<Todo> = (0..50).map(|id| todo(id, "task", 1)).collect();
        let joined = join(&todos, &[]);
        let mut window = PaginationWindow::new(20);
        window.advance(joined.len());

        let rows = filter(&joined, &window, "");

        assert_eq!(rows, window.window(&joined).to_vec());
        assert_eq!(rows.len(), 40);
    }

    #[test]
    fn non_empty_query_searches_beyond_the_window() {
        let mut todos: Vec<Todo> = (0..30).map(|id| todo(id, "task", 1)).collect();
        todos.push(todo(99, "needle", 1));
        let joined = join(&todos, &[]);
        let window = PaginationWindow::new(20);

        assert_eq!(ids(&filter(&joined, &window, "needle")), vec![99]);
    }

    #[test]
    fn results_follow_source_order() {
        let todos = vec![todo(3, "b milk", 1), todo(1, "a milk", 1), todo(2, "tea", 1)];
        let joined = join(&todos, &[]);
        let window = PaginationWindow::new(20);
        assert_eq!(ids(&filter(&joined, &window, "milk")), vec![3, 1]);
    }

    #[test]
    fn filter_is_pure_function_of_inputs() {
        let joined = scenario();
        let window = PaginationWindow::new(20);
        let first = filter(&joined, &window, "c");
        let second = filter(&joined, &window, "c");
        assert_eq!(first, second);
        assert_eq!(joined, scenario());
    }

    #[test]
    fn whitespace_query_is_not_empty() {
        let joined = join(&[todo(1, "Buy Milk", 1), todo(2, "Tea", 1)], &[]);
        let window = PaginationWindow::new(20);
        assert_eq!(ids(&filter(&joined, &window, " ")), vec![1]);
    }
}
