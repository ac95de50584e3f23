//! C-ABI wrapper around `authfetch-core`.
//!
//! # Overview
//! Exposes request building and outcome classification through `extern "C"`
//! functions so any language with a C FFI can shape authorized requests and
//! normalize results while doing the HTTP round-trip itself.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Bodies arrive as JSON documents; the core encodes them as JSON or form
//!   data exactly as it does for typed Rust values.
//! - A single `FfiResult` envelope with `FfiDataTag` + `void* data`
//!   conveys built requests, response payloads and errors uniformly.
//! - The C caller owns all returned pointers and must release them with
//!   `authfetch_free_result` / `authfetch_free_string`.
//! - Token acquisition stays with the host: it passes the token it obtained
//!   as bearer credentials.

pub mod types;

use std::ffi::CString;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use authfetch_core::{
    build_body_request, build_plain_request, parse_response, validate_endpoint, ContentType,
    HttpResponse, RequestError, Response, TransportError,
};

use types::*;

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build a request without a body.
///
/// `query` may be null (with `query_len` 0); `credentials` may be null.
/// On success the result has `data_tag = Request`; on failure it carries the
/// error response (e.g. "Invalid URL").
#[unsafe(no_mangle)]
pub extern "C" fn authfetch_build_plain_request(
    endpoint: *const c_char,
    method: FfiHttpMethod,
    query: *const FfiQueryParam,
    query_len: usize,
    credentials: *const FfiCredentials,
) -> *mut FfiResult {
    catch_unwind(|| {
        if endpoint.is_null() {
            return FfiResult::null_arg("endpoint");
        }
        let Some(endpoint) = (unsafe { str_arg(endpoint) }) else {
            return FfiResult::response(RequestError::InvalidUrl.into());
        };
        let query = unsafe { query_arg(query, query_len) };
        let credentials = unsafe { credentials_arg(credentials) };
        match build_plain_request(endpoint, method.into(), query.as_ref(), credentials.as_ref()) {
            Ok(req) => FfiResult::request(req),
            Err(e) => FfiResult::response(e.into()),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in authfetch_build_plain_request"))
}

/// Build a request whose body is `body_json` encoded as `content_type`.
///
/// `body_json` must be a JSON document; for form encoding it must be a flat
/// object. Unparseable JSON is reported as an encoding failure.
#[unsafe(no_mangle)]
pub extern "C" fn authfetch_build_body_request(
    endpoint: *const c_char,
    body_json: *const c_char,
    content_type: FfiContentType,
    method: FfiHttpMethod,
    query: *const FfiQueryParam,
    query_len: usize,
    credentials: *const FfiCredentials,
) -> *mut FfiResult {
    catch_unwind(|| {
        if endpoint.is_null() {
            return FfiResult::null_arg("endpoint");
        }
        if body_json.is_null() {
            return FfiResult::null_arg("body_json");
        }
        let Some(endpoint) = (unsafe { str_arg(endpoint) }) else {
            return FfiResult::response(RequestError::InvalidUrl.into());
        };
        // Same order as the core: the endpoint is checked before the body.
        if let Err(e) = validate_endpoint(endpoint) {
            return FfiResult::response(e.into());
        }
        let content_type = ContentType::from(content_type);
        let parsed = unsafe { str_arg(body_json) }
            .map(|text| serde_json::from_str::<serde_json::Value>(text));
        let body = match parsed {
            Some(Ok(body)) => body,
            _ => return FfiResult::response(encode_failure(content_type)),
        };
        let query = unsafe { query_arg(query, query_len) };
        let credentials = unsafe { credentials_arg(credentials) };
        match build_body_request(
            endpoint,
            &body,
            content_type,
            method.into(),
            query.as_ref(),
            credentials.as_ref(),
        ) {
            Ok(req) => FfiResult::request(req),
            Err(e) => FfiResult::response(e.into()),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in authfetch_build_body_request"))
}

fn encode_failure(content_type: ContentType) -> Response {
    let message = match content_type {
        ContentType::Json => "Failed to encode JSON",
        ContentType::Form => "Failed to encode form data",
    };
    Response::error(0, message)
}

// ---------------------------------------------------------------------------
// Parse response
// ---------------------------------------------------------------------------

/// Normalize the host's round-trip outcome into a response envelope.
///
/// Success results carry the payload as `data_tag = Bytes` (possibly with a
/// null pointer and zero length for an empty body).
#[unsafe(no_mangle)]
pub extern "C" fn authfetch_parse_response(outcome: *const FfiTransportOutcome) -> *mut FfiResult {
    catch_unwind(|| {
        if outcome.is_null() {
            return FfiResult::null_arg("outcome");
        }
        let outcome = unsafe { &*outcome };
        FfiResult::response(parse_response(outcome_to_core(outcome)))
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in authfetch_parse_response"))
}

fn outcome_to_core(outcome: &FfiTransportOutcome) -> Result<HttpResponse, TransportError> {
    let body = if outcome.body.is_null() || outcome.body_len == 0 {
        Vec::new()
    } else {
        unsafe { std::slice::from_raw_parts(outcome.body, outcome.body_len) }.to_vec()
    };
    let response = HttpResponse {
        status: outcome.status,
        headers: Vec::new(),
        body,
    };
    if outcome.succeeded {
        Ok(response)
    } else if outcome.status != 0 {
        Err(TransportError::status(response))
    } else {
        let message = unsafe { str_arg(outcome.error) }.unwrap_or("unknown error");
        Err(TransportError::connection(message))
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiResult` returned by any `authfetch_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn authfetch_free_result(result: *mut FfiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.message.is_null() {
            drop(unsafe { CString::from_raw(result.message) });
        }
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::Request => {
                let req = unsafe { Box::from_raw(result.data as *mut FfiHttpRequest) };
                free_request_fields(&req);
            }
            FfiDataTag::Bytes => {
                let bytes = unsafe { Box::from_raw(result.data as *mut FfiBytes) };
                unsafe { free_bytes(bytes.data, bytes.len) };
            }
            FfiDataTag::None => {}
        }
    });
}

/// Free the heap fields of an `FfiHttpRequest` (but not the struct itself).
fn free_request_fields(req: &FfiHttpRequest) {
    if !req.url.is_null() {
        drop(unsafe { CString::from_raw(req.url) });
    }
    if !req.headers.is_null() && req.headers_len > 0 {
        let headers = unsafe {
            Box::from_raw(std::ptr::slice_from_raw_parts_mut(req.headers, req.headers_len))
        };
        for h in headers.iter() {
            authfetch_free_string(h.key);
            authfetch_free_string(h.value);
        }
    }
    unsafe { free_bytes(req.body, req.body_len) };
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn authfetch_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
