//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use todolist_core::{
    DisplayRow, FeedClient, FetchError, HttpMethod, LoadStep, ScreenState, TodoDetail,
    TodoListSession,
};

/// Opaque handle to a screen session. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiSession {
    pub(crate) client: FeedClient,
    pub(crate) inner: TodoListSession,
}

/// Copy `s` into a heap C string. Interior NULs are dropped.
pub(crate) fn c_string(s: String) -> *mut c_char {
    let s = if s.contains('\0') { s.replace('\0', "") } else { s };
    CString::new(s).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `todolist_build_*_request`. The host executes the request and
/// passes the response back through `todolist_apply_*_response`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: todolist_core::HttpRequest) -> *mut Self {
        let path = c_string(req.path);
        let body = match req.body {
            Some(b) => c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            // Boxed slice so the free path can rebuild it from `headers_len`.
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The host constructs this on the stack after executing a request. The FFI
/// layer reads but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

/// Which fetch a transport failure belongs to.
#[repr(C)]
#[derive(Clone, Copy)]
pub enum FfiEndpoint {
    Users = 0,
    Todos = 1,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiLoadResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Transport = 1,
    Http = 2,
    Decode = 3,
    Panic = 4,
    NullArg = 5,
}

/// What the host should do after applying a response.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiLoadStep {
    /// Execute the todos request next.
    FetchTodos = 0,
    /// Reload the table.
    Loaded = 1,
    /// Show the error state.
    Failed = 2,
    /// The ticket is no longer active; ignore.
    Stale = 3,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiScreenState {
    Loading = 0,
    Loaded = 1,
    Failed = 2,
}

impl From<ScreenState> for FfiScreenState {
    fn from(state: ScreenState) -> Self {
        match state {
            ScreenState::Loading => FfiScreenState::Loading,
            ScreenState::Loaded => FfiScreenState::Loaded,
            ScreenState::Failed => FfiScreenState::Failed,
        }
    }
}

/// Result envelope for `todolist_apply_*`.
///
/// On success `error_code` is `Ok` and `error_message` is null. On failure
/// `step` is `Failed` (or `Stale` for a null argument / panic),
/// `error_code` describes the category and `error_message` is a
/// human-readable C string.
#[repr(C)]
pub struct FfiLoadResult {
    pub step: FfiLoadStep,
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
}

impl FfiLoadResult {
    pub(crate) fn from_step(step: LoadStep) -> *mut Self {
        let result = match step {
            LoadStep::FetchTodos => Self::ok(FfiLoadStep::FetchTodos),
            LoadStep::Loaded => Self::ok(FfiLoadStep::Loaded),
            LoadStep::Stale => Self::ok(FfiLoadStep::Stale),
            LoadStep::Failed(err) => {
                let (error_code, http_status) = match &err {
                    FetchError::Transport(_) => (FfiErrorCode::Transport, 0),
                    FetchError::HttpError { status, .. } => (FfiErrorCode::Http, *status),
                    FetchError::Decode(_) => (FfiErrorCode::Decode, 0),
                };
                FfiLoadResult {
                    step: FfiLoadStep::Failed,
                    error_code,
                    error_message: c_string(err.to_string()),
                    http_status,
                }
            }
        };
        Box::into_raw(Box::new(result))
    }

    fn ok(step: FfiLoadStep) -> Self {
        FfiLoadResult {
            step,
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
        }
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiLoadResult {
            step: FfiLoadStep::Stale,
            error_code: FfiErrorCode::NullArg,
            error_message: c_string(format!("null argument: {name}")),
            http_status: 0,
        }))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiLoadResult {
            step: FfiLoadStep::Stale,
            error_code: FfiErrorCode::Panic,
            error_message: c_string(msg.to_string()),
            http_status: 0,
        }))
    }
}

/// One list row.
#[repr(C)]
pub struct FfiDisplayRow {
    pub title: *mut c_char,
    pub user_name: *mut c_char,
}

impl FfiDisplayRow {
    pub(crate) fn from_core(row: DisplayRow) -> *mut Self {
        Box::into_raw(Box::new(FfiDisplayRow {
            title: c_string(row.title),
            user_name: c_string(row.user_name),
        }))
    }
}

/// Detail page contents for a selected row.
#[repr(C)]
pub struct FfiTodoDetail {
    pub id: i64,
    pub title: *mut c_char,
    pub user_name: *mut c_char,
    pub completed: bool,
}

impl FfiTodoDetail {
    pub(crate) fn from_core(detail: TodoDetail) -> *mut Self {
        Box::into_raw(Box::new(FfiTodoDetail {
            id: detail.id,
            title: c_string(detail.title),
            user_name: c_string(detail.user_name),
            completed: detail.completed,
        }))
    }
}
