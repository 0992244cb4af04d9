//! Growing prefix window over the joined collection.

use crate::types::JoinedTodo;

/// First `page_size` elements, or fewer when `joined` is shorter.
pub fn initial_page(joined: &[JoinedTodo], page_size: usize) -> &[JoinedTodo] {
    next_page(joined, page_size, 0)
}

/// First `page_size * (page_index + 1)` elements, clamped to `joined.len()`.
pub fn next_page(joined: &[JoinedTodo], page_size: usize, page_index: usize) -> &[JoinedTodo] {
    let end = page_size
        .saturating_mul(page_index.saturating_add(1))
        .min(joined.len());
    &joined[..end]
}

/// Pagination state: the page size plus the index of the last loaded page.
///
/// The index only moves forward; `reset` is reserved for a fresh fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationWindow {
    page_size: usize,
    page_index: usize,
}

impl PaginationWindow {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page_index: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn pages_loaded(&self) -> usize {
        self.page_index + 1
    }

    /// Number of elements the window exposes over a collection of `total`.
    pub fn visible_len(&self, total: usize) -> usize {
        self.page_size
            .saturating_mul(self.pages_loaded())
            .min(total)
    }

    pub fn window<'a>(&self, joined: &'a [JoinedTodo]) -> &'a [JoinedTodo] {
        next_page(joined, self.page_size, self.page_index)
    }

    /// Advance by one page. Returns `false` once the window already covers
    /// all `total` elements, leaving the state unchanged.
    pub fn advance(&mut self, total: usize) -> bool {
        if self.visible_len(total) >= total {
            return false;
        }
        self.page_index += 1;
        true
    }

    pub fn reset(&mut self) {
        self.page_index = 0;
    }
}
