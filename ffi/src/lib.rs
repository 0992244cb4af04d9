//! C-ABI wrapper around `todolist-core`.
//!
//! # Overview
//! Exposes the todo list screen model through `extern "C"` functions so a
//! mobile host (Swift, Kotlin via JNI, ...) can drive it without linking to
//! serde or any Rust runtime. The host performs the HTTP I/O.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - A load is driven by the host: `todolist_session_begin_load` returns a
//!   ticket, the host executes `todolist_build_users_request`, feeds the
//!   response to `todolist_apply_users_response`, and only fetches todos
//!   when told `FetchTodos`. Completions with an outdated ticket are ignored.
//! - The session is not internally synchronized. The host must call into a
//!   session from one thread at a time (the UI thread, typically).
//! - The caller owns all returned pointers and must call the matching
//!   `todolist_free_*` function to release them.

pub mod types;

use std::borrow::Cow;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use todolist_core::{FeedClient, FetchError, HttpResponse, LoadTicket, TodoListSession};

use types::*;

/// Borrow a C string as text. Invalid UTF-8 sequences become U+FFFD.
///
/// # Safety
/// `ptr` must be non-null and point to a NUL-terminated string that lives
/// for the duration of the call.
unsafe fn borrow_str<'a>(ptr: *const c_char) -> Cow<'a, str> {
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy()
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

/// Create a session bound to `base_url` with `page_size` rows per page.
///
/// Returns null if `base_url` is null or if an internal panic occurs. A
/// `page_size` of 0 is treated as 1.
/// The caller must free the returned pointer with `todolist_session_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_session_new(base_url: *const c_char, page_size: u32) -> *mut FfiSession {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let url = unsafe { borrow_str(base_url) };
        Box::into_raw(Box::new(FfiSession {
            client: FeedClient::new(&url),
            inner: TodoListSession::new(page_size as usize),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a session created by `todolist_session_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_session_free(session: *mut FfiSession) {
    if !session.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(session) });
        }));
    }
}

/// Start a fresh load and return its ticket. Returns 0 if `session` is null.
///
/// Any ticket handed out earlier becomes stale. After
/// `todolist_session_teardown` the session is left as is and the returned
/// ticket is already stale.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_session_begin_load(session: *mut FfiSession) -> u64 {
    catch_unwind(AssertUnwindSafe(|| {
        if session.is_null() {
            return 0;
        }
        let session = unsafe { &mut *session };
        session.inner.begin_load().generation()
    }))
    .unwrap_or(0)
}

/// Mark the screen as gone. Every outstanding ticket becomes stale; the
/// session must still be released with `todolist_session_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_session_teardown(session: *mut FfiSession) {
    if session.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let session = unsafe { &mut *session };
        session.inner.teardown();
    }));
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build the `GET /users` request.
///
/// Returns null if `session` is null.
/// The caller must free the returned pointer with `todolist_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_build_users_request(session: *const FfiSession) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if session.is_null() {
            return std::ptr::null_mut();
        }
        let session = unsafe { &*session };
        FfiHttpRequest::from_core(session.client.build_list_users())
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Build the `GET /todos` request.
///
/// Returns null if `session` is null.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_build_todos_request(session: *const FfiSession) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if session.is_null() {
            return std::ptr::null_mut();
        }
        let session = unsafe { &*session };
        FfiHttpRequest::from_core(session.client.build_list_todos())
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Apply completions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body is
/// treated as empty.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { borrow_str(resp.body) }.into_owned()
    };
    HttpResponse::new(resp.status, body)
}

/// Feed the `/users` response for `ticket` into the session.
///
/// Returns `step = FetchTodos` when the host should now request todos.
/// The caller must free the result with `todolist_free_load_result`.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_apply_users_response(
    session: *mut FfiSession,
    ticket: u64,
    response: *const FfiHttpResponse,
) -> *mut FfiLoadResult {
    catch_unwind(AssertUnwindSafe(|| {
        if session.is_null() {
            return FfiLoadResult::null_arg("session");
        }
        if response.is_null() {
            return FfiLoadResult::null_arg("response");
        }
        let session = unsafe { &mut *session };
        let resp = ffi_response_to_core(unsafe { &*response });
        let users = session.client.parse_list_users(resp);
        FfiLoadResult::from_step(session.inner.apply_users(LoadTicket::from_generation(ticket), users))
    }))
    .unwrap_or_else(|_| FfiLoadResult::panic("panic in todolist_apply_users_response"))
}

/// Feed the `/todos` response for `ticket` into the session.
///
/// Returns `step = Loaded` once the rows are ready.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_apply_todos_response(
    session: *mut FfiSession,
    ticket: u64,
    response: *const FfiHttpResponse,
) -> *mut FfiLoadResult {
    catch_unwind(AssertUnwindSafe(|| {
        if session.is_null() {
            return FfiLoadResult::null_arg("session");
        }
        if response.is_null() {
            return FfiLoadResult::null_arg("response");
        }
        let session = unsafe { &mut *session };
        let resp = ffi_response_to_core(unsafe { &*response });
        let todos = session.client.parse_list_todos(resp);
        FfiLoadResult::from_step(session.inner.apply_todos(LoadTicket::from_generation(ticket), todos))
    }))
    .unwrap_or_else(|_| FfiLoadResult::panic("panic in todolist_apply_todos_response"))
}

/// Report that the request for `endpoint` produced no response at all
/// (offline, timeout, ...). `message` may be null.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_apply_transport_error(
    session: *mut FfiSession,
    ticket: u64,
    endpoint: FfiEndpoint,
    message: *const c_char,
) -> *mut FfiLoadResult {
    catch_unwind(AssertUnwindSafe(|| {
        if session.is_null() {
            return FfiLoadResult::null_arg("session");
        }
        let session = unsafe { &mut *session };
        let message = if message.is_null() {
            Cow::Borrowed("transport error")
        } else {
            unsafe { borrow_str(message) }
        };
        let err = FetchError::transport(message);
        let ticket = LoadTicket::from_generation(ticket);
        let step = match endpoint {
            FfiEndpoint::Users => session.inner.apply_users(ticket, Err(err)),
            FfiEndpoint::Todos => session.inner.apply_todos(ticket, Err(err)),
        };
        FfiLoadResult::from_step(step)
    }))
    .unwrap_or_else(|_| FfiLoadResult::panic("panic in todolist_apply_transport_error"))
}

// ---------------------------------------------------------------------------
// User events
// ---------------------------------------------------------------------------

/// Update the search query. Null is treated as the empty query.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_session_query_changed(session: *mut FfiSession, text: *const c_char) {
    if session.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let session = unsafe { &mut *session };
        let text = if text.is_null() {
            Cow::Borrowed("")
        } else {
            unsafe { borrow_str(text) }
        };
        session.inner.on_query_changed(&text);
    }));
}

/// Grow the page window. Returns true when the visible rows changed.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_session_load_more(session: *mut FfiSession) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if session.is_null() {
            return false;
        }
        let session = unsafe { &mut *session };
        session.inner.on_load_more_requested()
    }))
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Rendering accessors
// ---------------------------------------------------------------------------

/// Current screen state. A null session reports `Failed`.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_session_state(session: *const FfiSession) -> FfiScreenState {
    catch_unwind(AssertUnwindSafe(|| {
        if session.is_null() {
            return FfiScreenState::Failed;
        }
        let session = unsafe { &*session };
        session.inner.state().into()
    }))
    .unwrap_or(FfiScreenState::Failed)
}

/// Number of visible rows. Returns 0 for a null session.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_session_row_count(session: *const FfiSession) -> u32 {
    catch_unwind(AssertUnwindSafe(|| {
        if session.is_null() {
            return 0;
        }
        let session = unsafe { &*session };
        u32::try_from(session.inner.row_count()).unwrap_or(u32::MAX)
    }))
    .unwrap_or(0)
}

/// Row at `index`, or null if out of range.
/// The caller must free the returned pointer with `todolist_free_row`.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_session_row_at(session: *const FfiSession, index: u32) -> *mut FfiDisplayRow {
    catch_unwind(AssertUnwindSafe(|| {
        if session.is_null() {
            return std::ptr::null_mut();
        }
        let session = unsafe { &*session };
        match session.inner.row_at(index as usize) {
            Some(row) => FfiDisplayRow::from_core(row),
            None => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Detail page for the row at `index`, or null if out of range.
/// The caller must free the returned pointer with `todolist_free_detail`.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_session_select(session: *const FfiSession, index: u32) -> *mut FfiTodoDetail {
    catch_unwind(AssertUnwindSafe(|| {
        if session.is_null() {
            return std::ptr::null_mut();
        }
        let session = unsafe { &*session };
        match session.inner.detail_at(index as usize) {
            Some(detail) => FfiTodoDetail::from_core(detail),
            None => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `todolist_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.path);
        free_c_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    });
}

/// Free an `FfiLoadResult`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_free_load_result(result: *mut FfiLoadResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
    });
}

/// Free an `FfiDisplayRow`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_free_row(row: *mut FfiDisplayRow) {
    if row.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let row = unsafe { Box::from_raw(row) };
        free_c_string(row.title);
        free_c_string(row.user_name);
    });
}

/// Free an `FfiTodoDetail`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_free_detail(detail: *mut FfiTodoDetail) {
    if detail.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let detail = unsafe { Box::from_raw(detail) };
        free_c_string(detail.title);
        free_c_string(detail.user_name);
    });
}

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
