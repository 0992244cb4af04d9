//! Todo/user join by foreign key.

use std::collections::HashMap;

use crate::types::{JoinedTodo, Todo, User, UserLink};

/// Attach to every todo the first user whose id equals `todo.user_id`.
///
/// Output order equals the order of `todos`. A missing owner yields
/// `UserLink::Absent`, never an error.
pub fn join(todos: &[Todo], users: &[User]) -> Vec<JoinedTodo> {
    let mut by_id: HashMap<i64, &User> = HashMap::with_capacity(users.len());
    for user in users {
        // First occurrence wins on duplicate ids.
        by_id.entry(user.id).or_insert(user);
    }

    todos
        .iter()
        .map(|todo| JoinedTodo {
            todo: todo.clone(),
            user: match by_id.get(&todo.user_id) {
                Some(user) => UserLink::Present((*user).clone()),
                None => UserLink::Absent,
            },
        })
        .collect()
}
