//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*const c_char` / `*mut c_char` instead of `String`, pointer + length
//! instead of `Vec`, and enums with explicit discriminants. Conversion
//! functions live here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;

use authfetch_core::{
    ContentType, Credentials, HttpMethod, HttpRequest, QueryParams, Response, ResponseStatus,
};

// ---------------------------------------------------------------------------
// Inputs (caller-owned, read but never freed by us)
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Patch = 3,
    Delete = 4,
    Head = 5,
}

impl From<FfiHttpMethod> for HttpMethod {
    fn from(m: FfiHttpMethod) -> Self {
        match m {
            FfiHttpMethod::Get => HttpMethod::Get,
            FfiHttpMethod::Post => HttpMethod::Post,
            FfiHttpMethod::Put => HttpMethod::Put,
            FfiHttpMethod::Patch => HttpMethod::Patch,
            FfiHttpMethod::Delete => HttpMethod::Delete,
            FfiHttpMethod::Head => HttpMethod::Head,
        }
    }
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Patch => FfiHttpMethod::Patch,
            HttpMethod::Delete => FfiHttpMethod::Delete,
            HttpMethod::Head => FfiHttpMethod::Head,
        }
    }
}

/// Body encoding as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiContentType {
    Json = 0,
    Form = 1,
}

impl From<FfiContentType> for ContentType {
    fn from(c: FfiContentType) -> Self {
        match c {
            FfiContentType::Json => ContentType::Json,
            FfiContentType::Form => ContentType::Form,
        }
    }
}

/// One query-string parameter.
#[repr(C)]
pub struct FfiQueryParam {
    pub key: *const c_char,
    pub value: *const c_char,
}

/// Optional credentials. Any field may be null.
#[repr(C)]
pub struct FfiCredentials {
    pub token: *const c_char,
    pub username: *const c_char,
    pub password: *const c_char,
}

/// What the host's HTTP round-trip produced.
///
/// - `succeeded = true`: `status` and `body` describe the accepted response.
/// - `succeeded = false`, `status != 0`: the server answered with a rejected
///   status; `body` holds whatever it sent.
/// - `succeeded = false`, `status == 0`: no response; `error` describes why.
#[repr(C)]
pub struct FfiTransportOutcome {
    pub succeeded: bool,
    pub status: u16,
    pub body: *const u8,
    pub body_len: usize,
    pub error: *const c_char,
}

// ---------------------------------------------------------------------------
// Outputs (allocated here, released with `authfetch_free_result`)
// ---------------------------------------------------------------------------

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request for the host to execute.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: usize,
    pub body: *mut u8,
    pub body_len: usize,
}

/// A byte payload.
#[repr(C)]
pub struct FfiBytes {
    pub data: *mut u8,
    pub len: usize,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiStatus {
    Ok = 0,
    Error = 1,
}

/// Tag that tells `authfetch_free_result` what `FfiResult::data` points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    Request = 1,
    Bytes = 2,
}

/// Result envelope for every entry point.
///
/// `status`, `code` and `message` mirror the core `Response`. Build functions
/// attach an `FfiHttpRequest` on success; `authfetch_parse_response` attaches
/// the response payload as `FfiBytes`.
#[repr(C)]
pub struct FfiResult {
    pub status: FfiStatus,
    pub code: u16,
    pub message: *mut c_char,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

impl FfiResult {
    fn boxed(
        status: FfiStatus,
        code: u16,
        message: &str,
        data_tag: FfiDataTag,
        data: *mut c_void,
    ) -> *mut Self {
        Box::into_raw(Box::new(FfiResult {
            status,
            code,
            message: to_c_string(message),
            data_tag,
            data,
        }))
    }

    /// A built request ready for the host.
    pub(crate) fn request(req: HttpRequest) -> *mut Self {
        let data = Box::into_raw(Box::new(FfiHttpRequest::from_core(req))) as *mut c_void;
        Self::boxed(FfiStatus::Ok, 0, "Request built", FfiDataTag::Request, data)
    }

    /// Mirror of a core `Response`, payload included.
    pub(crate) fn response(response: Response) -> *mut Self {
        let status = match response.status {
            ResponseStatus::Ok => FfiStatus::Ok,
            ResponseStatus::Error => FfiStatus::Error,
        };
        let (data_tag, data) = match response.data {
            Some(bytes) => {
                let (data, len) = leak_bytes(bytes);
                let payload = Box::into_raw(Box::new(FfiBytes { data, len }));
                (FfiDataTag::Bytes, payload as *mut c_void)
            }
            None => (FfiDataTag::None, std::ptr::null_mut()),
        };
        Self::boxed(status, response.code, &response.message, data_tag, data)
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(
            FfiStatus::Error,
            0,
            &format!("null argument: {name}"),
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiStatus::Error, 0, msg, FfiDataTag::None, std::ptr::null_mut())
    }
}

impl FfiHttpRequest {
    fn from_core(req: HttpRequest) -> Self {
        let headers: Vec<FfiHeader> = req
            .headers
            .into_iter()
            .map(|(k, v)| FfiHeader {
                key: to_c_string(&k),
                value: to_c_string(&v),
            })
            .collect();
        let headers_len = headers.len();
        let headers = if headers.is_empty() {
            std::ptr::null_mut()
        } else {
            Box::into_raw(headers.into_boxed_slice()) as *mut FfiHeader
        };
        let (body, body_len) = match req.body {
            Some(bytes) => leak_bytes(bytes),
            None => (std::ptr::null_mut(), 0),
        };
        FfiHttpRequest {
            method: req.method.into(),
            url: to_c_string(&req.url),
            headers,
            headers_len,
            body,
            body_len,
        }
    }
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Interior NULs cannot cross the boundary; they are dropped.
pub(crate) fn to_c_string(s: &str) -> *mut c_char {
    CString::new(s.replace('\0', ""))
        .unwrap_or_default()
        .into_raw()
}

/// Hand ownership of `bytes` to C as pointer + length. Empty yields null.
fn leak_bytes(bytes: Vec<u8>) -> (*mut u8, usize) {
    if bytes.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let len = bytes.len();
    (Box::into_raw(bytes.into_boxed_slice()) as *mut u8, len)
}

/// Reclaim a pointer + length produced by `leak_bytes`.
///
/// # Safety
/// `data`/`len` must come from `leak_bytes` and not have been freed.
pub(crate) unsafe fn free_bytes(data: *mut u8, len: usize) {
    if !data.is_null() && len > 0 {
        drop(Box::from_raw(std::ptr::slice_from_raw_parts_mut(data, len)));
    }
}

/// Borrow a C string as `&str`. Null or invalid UTF-8 yields `None`.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
pub(crate) unsafe fn str_arg<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

/// Copy `len` query parameters into a `QueryParams`. Entries with a null or
/// non-UTF-8 key are skipped; a null value becomes an empty string.
///
/// # Safety
/// `params` must be null or point to `len` valid `FfiQueryParam`s.
pub(crate) unsafe fn query_arg(params: *const FfiQueryParam, len: usize) -> Option<QueryParams> {
    if params.is_null() || len == 0 {
        return None;
    }
    let query = std::slice::from_raw_parts(params, len)
        .iter()
        .filter_map(|p| {
            let key = str_arg(p.key)?;
            let value = str_arg(p.value).unwrap_or("");
            Some((key.to_string(), value.to_string()))
        })
        .collect();
    Some(query)
}

/// # Safety
/// `creds` must be null or point to a valid `FfiCredentials`.
pub(crate) unsafe fn credentials_arg(creds: *const FfiCredentials) -> Option<Credentials> {
    if creds.is_null() {
        return None;
    }
    let creds = &*creds;
    let field = |ptr| str_arg(ptr).map(str::to_string);
    Some(Credentials {
        token: field(creds.token),
        username: field(creds.username),
        password: field(creds.password),
    })
}
