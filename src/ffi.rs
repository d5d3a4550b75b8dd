//! FFI (Foreign Function Interface) layer for C integration
//!
//! This module exposes the sanitizer to C hosts (web servers, mail filters,
//! template engines) through a handle-based API.
//!
//! # FFI Boundary Contract
//!
//! ## String Representation
//!
//! **All strings use UTF-8 bytes + length (NOT NUL-terminated C strings).**
//! Length fields hold the exact byte count and never include a terminator;
//! C code must not call `strlen()` on any pointer returned from Rust.
//!
//! ## Memory Management
//!
//! - Rust allocates all output memory as `Box<[u8]>`
//! - C must call `striptags_result_free()` exactly once per result
//! - C must call `striptags_sanitizer_free()` exactly once per handle
//! - Never pass Rust-allocated pointers to C `free()`
//!
//! **Allocation Strategy (runnable Rust example):**
//! ```rust
//! use striptags::ffi::{striptags_result_free, StripTagsResult};
//! use std::ptr;
//!
//! let html = String::from("<p>clean</p>");
//! let html_len = html.len();
//! let html_ptr = Box::into_raw(html.into_bytes().into_boxed_slice()) as *mut u8;
//!
//! let mut result = StripTagsResult {
//!     html: html_ptr,
//!     html_len,
//!     error_code: 0,
//!     error_message: ptr::null_mut(),
//!     error_len: 0,
//! };
//!
//! unsafe { striptags_result_free(&mut result) };
//! assert!(result.html.is_null());
//! assert_eq!(result.html_len, 0);
//! ```
//!
//! ## Error Handling Contract
//!
//! - Success: `error_code = 0`, `error_message = NULL`, `html` holds the
//!   sanitized output (NULL with `html_len = 0` when the output is empty)
//! - Error: `error_code != 0`, `error_message` holds a UTF-8 description,
//!   `html` is NULL
//! - Panics are caught with `catch_unwind` and reported as `ERROR_INTERNAL`
//!
//! ## Thread Safety
//!
//! A handle may be used from one thread at a time. Separate handles can be
//! used concurrently.

use std::panic;
use std::ptr;
use std::slice;

use crate::config::SanitizerConfig;
use crate::error::SanitizeError;
use crate::policy::Policy;
use crate::sanitizer::Sanitizer;

// ============================================================================
// Error Code Constants
// ============================================================================

/// Success - no error occurred
pub const ERROR_SUCCESS: u32 = 0;

/// Token source failed
pub const ERROR_TOKENIZE: u32 = 1;

/// Character encoding error (invalid UTF-8, unsupported charset)
pub const ERROR_ENCODING: u32 = 2;

/// Output could not be written
pub const ERROR_WRITE: u32 = 3;

/// Input exceeds `max_input_size`
pub const ERROR_INPUT_TOO_LARGE: u32 = 4;

/// Invalid input data (NULL pointers, invalid parameters)
pub const ERROR_INVALID_INPUT: u32 = 5;

/// Policy could not be loaded
pub const ERROR_CONFIG: u32 = 6;

/// Internal error (panic caught)
pub const ERROR_INTERNAL: u32 = 99;

// ============================================================================
// FFI Data Structures
// ============================================================================

/// Sanitizer options passed from C to Rust when creating a handle
///
/// # Field Descriptions
///
/// - `escape_invalid_tags`: 0 = drop invalid tags, 1 = render them as text
/// - `trim_whitespace`: 0 = keep text whitespace, 1 = trim each text node
/// - `keep_raw_text_content`: 0 = drop `script`/`style` content along with
///   the dropped tag, 1 = keep it as text
/// - `max_input_size`: byte cap on input, 0 = unlimited
/// - `policy_json` / `policy_json_len`: optional JSON policy (see
///   [`crate::policy`]); NULL with length 0 selects the built-in rules.
///   Flags set in the policy override the flag fields above.
///
/// # Example Usage (C)
///
/// ```c
/// striptags_options_t options = {
///     .escape_invalid_tags = 0,
///     .trim_whitespace = 1,
///     .keep_raw_text_content = 0,
///     .max_input_size = 1 << 20,
///     .policy_json = NULL,
///     .policy_json_len = 0
/// };
/// striptags_sanitizer_t *sanitizer = striptags_sanitizer_new(&options);
/// ```
#[repr(C)]
pub struct StripTagsOptions {
    /// Escape invalid tags: 0=no, 1=yes
    pub escape_invalid_tags: u8,
    /// Trim text node whitespace: 0=no, 1=yes
    pub trim_whitespace: u8,
    /// Keep content of dropped raw-text elements: 0=no, 1=yes
    pub keep_raw_text_content: u8,
    /// Maximum input size in bytes (0=unlimited)
    pub max_input_size: usize,
    /// JSON policy document (UTF-8 bytes, can be NULL)
    pub policy_json: *const u8,
    /// Length of policy_json in bytes (0 if NULL)
    pub policy_json_len: usize,
}

/// Sanitize result returned from Rust to C
///
/// # State Invariants
///
/// **Success (error_code == 0):** `html`/`html_len` hold the output,
/// `error_message` is NULL and `error_len` is 0.
///
/// **Error (error_code != 0):** `html` is NULL, `html_len` is 0,
/// `error_message` points to `error_len` bytes of UTF-8.
#[repr(C)]
pub struct StripTagsResult {
    /// Sanitized HTML (UTF-8 bytes, NOT NUL-terminated)
    pub html: *mut u8,
    /// Length of html in bytes
    pub html_len: usize,
    /// Error code: 0=success, non-zero=error (see ERROR_* constants)
    pub error_code: u32,
    /// Error message (UTF-8 bytes, NULL on success)
    pub error_message: *mut u8,
    /// Length of error message in bytes
    pub error_len: usize,
}

/// Opaque handle owning one sanitizer configuration
pub struct StripTagsHandle {
    sanitizer: Sanitizer,
}

fn reset_result(result: &mut StripTagsResult) {
    result.html = ptr::null_mut();
    result.html_len = 0;
    result.error_code = ERROR_SUCCESS;
    result.error_message = ptr::null_mut();
    result.error_len = 0;
}

fn set_error_result(result: &mut StripTagsResult, error_code: u32, error_message: String) {
    let error_bytes = error_message.into_bytes().into_boxed_slice();
    result.error_code = error_code;
    result.error_len = error_bytes.len();
    result.error_message = Box::into_raw(error_bytes) as *mut u8;
}

fn set_success_result(result: &mut StripTagsResult, html: String) {
    if html.is_empty() {
        return;
    }
    let html_bytes = html.into_bytes().into_boxed_slice();
    result.html_len = html_bytes.len();
    result.html = Box::into_raw(html_bytes) as *mut u8;
}

fn required_bytes<'a>(ptr: *const u8, len: usize, name: &str) -> Result<&'a [u8], SanitizeError> {
    if len == 0 {
        return Ok(&[]);
    }

    if ptr.is_null() {
        return Err(SanitizeError::InvalidInput(format!(
            "{name} pointer is NULL"
        )));
    }

    // SAFETY: Pointer was validated as non-NULL above; caller guarantees `len`
    // bytes are valid and readable for the duration of this call.
    Ok(unsafe { slice::from_raw_parts(ptr, len) })
}

fn optional_utf8<'a>(
    ptr: *const u8,
    len: usize,
    field_name: &str,
) -> Result<Option<&'a str>, SanitizeError> {
    let bytes = required_bytes(ptr, len, field_name)?;
    if bytes.is_empty() {
        return Ok(None);
    }
    std::str::from_utf8(bytes)
        .map(Some)
        .map_err(|e| SanitizeError::InvalidInput(format!("{field_name} is not UTF-8: {e}")))
}

fn build_config(options: Option<&StripTagsOptions>) -> Result<SanitizerConfig, SanitizeError> {
    let Some(options) = options else {
        return Ok(SanitizerConfig::default());
    };

    let policy = match optional_utf8(options.policy_json, options.policy_json_len, "policy_json")? {
        Some(json) => Policy::from_json(json)?,
        None => Policy::default(),
    };

    Policy {
        escape_invalid_tags: policy
            .escape_invalid_tags
            .or(Some(options.escape_invalid_tags != 0)),
        trim_whitespace: policy
            .trim_whitespace
            .or(Some(options.trim_whitespace != 0)),
        drop_raw_text_content: policy
            .drop_raw_text_content
            .or(Some(options.keep_raw_text_content == 0)),
        max_input_size: policy
            .max_input_size
            .or((options.max_input_size > 0).then_some(options.max_input_size)),
        ..policy
    }
    .into_config()
}

// ============================================================================
// FFI Functions
// ============================================================================

/// Create a new sanitizer handle
///
/// `options` may be NULL to use the built-in defaults.
///
/// # Returns
///
/// - Non-NULL handle on success
/// - NULL if the options are invalid (bad policy JSON, invalid regex) or on
///   panic
///
/// # Safety
///
/// `options`, when non-NULL, must point to a valid `StripTagsOptions` whose
/// `policy_json` points to at least `policy_json_len` readable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn striptags_sanitizer_new(
    options: *const StripTagsOptions,
) -> *mut StripTagsHandle {
    let result = panic::catch_unwind(|| {
        // SAFETY: Caller guarantees a non-NULL `options` points to a valid value.
        let options_ref = unsafe { options.as_ref() };
        build_config(options_ref)
    });

    match result {
        Ok(Ok(config)) => Box::into_raw(Box::new(StripTagsHandle {
            sanitizer: Sanitizer::with_config(config),
        })),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Rejecting sanitizer options");
            ptr::null_mut()
        }
        Err(_) => ptr::null_mut(),
    }
}

/// Sanitize an HTML document
///
/// # Parameters
///
/// - `handle`: handle from `striptags_sanitizer_new()`, must be non-NULL
/// - `html` / `html_len`: input bytes; may be NULL when `html_len == 0`
/// - `content_type` / `content_type_len`: optional Content-Type header value
///   used for charset detection; NULL with length 0 when unavailable
/// - `result`: result structure to populate; previous contents are
///   overwritten without being freed
///
/// # Error Codes
///
/// - `ERROR_INVALID_INPUT` (5): NULL pointer or invalid parameter
/// - `ERROR_ENCODING` (2): input bytes invalid for the detected charset
/// - `ERROR_INPUT_TOO_LARGE` (4): input exceeds the configured cap
/// - `ERROR_INTERNAL` (99): panic caught
///
/// # Safety
///
/// All non-NULL pointers must be valid for the given lengths. The handle must
/// not be used concurrently from multiple threads.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn striptags_sanitize(
    handle: *const StripTagsHandle,
    html: *const u8,
    html_len: usize,
    content_type: *const u8,
    content_type_len: usize,
    result: *mut StripTagsResult,
) {
    // Validate result pointer first so we can report errors.
    if result.is_null() {
        return;
    }

    // SAFETY: `result` was validated as non-NULL above.
    let result_ref = unsafe { &mut *result };
    reset_result(result_ref);

    // Predicates inside the config are not `RefUnwindSafe`; a panic leaves no
    // state behind that later calls could observe.
    let panic_result = panic::catch_unwind(panic::AssertUnwindSafe(|| -> Result<String, SanitizeError> {
        // SAFETY: Caller guarantees a non-NULL handle came from `striptags_sanitizer_new`.
        let handle_ref = unsafe { handle.as_ref() }
            .ok_or_else(|| SanitizeError::InvalidInput("Sanitizer handle pointer is NULL".into()))?;
        let html_slice = required_bytes(html, html_len, "HTML")?;
        let content_type = optional_utf8(content_type, content_type_len, "content_type")?;
        handle_ref.sanitizer.sanitize_bytes(html_slice, content_type)
    }));

    match panic_result {
        Ok(Ok(output)) => set_success_result(result_ref, output),
        Ok(Err(e)) => set_error_result(result_ref, e.code(), e.to_string()),
        Err(_) => set_error_result(
            result_ref,
            ERROR_INTERNAL,
            "Internal panic during sanitize".to_string(),
        ),
    }
}

fn free_buffer(ptr_field: &mut *mut u8, len_field: &mut usize) {
    if (*ptr_field).is_null() {
        return;
    }

    let raw = ptr::slice_from_raw_parts_mut(*ptr_field, *len_field);
    // SAFETY: `raw` was allocated by `Box<[u8]>` via `Box::into_raw`.
    let _ = unsafe { Box::from_raw(raw) };
    *ptr_field = ptr::null_mut();
    *len_field = 0;
}

/// Free memory held by a result
///
/// Safe to call more than once; after the first call all pointers are NULL.
///
/// # Safety
///
/// `result` must be NULL or point to a result populated by
/// `striptags_sanitize()`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn striptags_result_free(result: *mut StripTagsResult) {
    if result.is_null() {
        return;
    }

    // SAFETY: `result` was validated as non-NULL above.
    let result_ref = unsafe { &mut *result };
    free_buffer(&mut result_ref.html, &mut result_ref.html_len);
    free_buffer(&mut result_ref.error_message, &mut result_ref.error_len);
    result_ref.error_code = ERROR_SUCCESS;
}

/// Destroy a sanitizer handle
///
/// # Safety
///
/// `handle` must be NULL or a handle from `striptags_sanitizer_new()` that has
/// not been freed and is not in use.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn striptags_sanitizer_free(handle: *mut StripTagsHandle) {
    if handle.is_null() {
        return;
    }

    // SAFETY: `handle` is non-NULL and was created by `Box::into_raw` in
    // `striptags_sanitizer_new`.
    unsafe { drop(Box::from_raw(handle)) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_match_error_type() {
        assert_eq!(SanitizeError::Tokenize(String::new()).code(), ERROR_TOKENIZE);
        assert_eq!(SanitizeError::Encoding(String::new()).code(), ERROR_ENCODING);
        assert_eq!(SanitizeError::Write(std::fmt::Error).code(), ERROR_WRITE);
        assert_eq!(
            SanitizeError::InputTooLarge { size: 1, limit: 0 }.code(),
            ERROR_INPUT_TOO_LARGE
        );
        assert_eq!(SanitizeError::InvalidInput(String::new()).code(), ERROR_INVALID_INPUT);
        assert_eq!(SanitizeError::Config(String::new()).code(), ERROR_CONFIG);
    }

    #[test]
    fn test_build_config_flags() {
        let options = StripTagsOptions {
            escape_invalid_tags: 1,
            trim_whitespace: 1,
            keep_raw_text_content: 1,
            max_input_size: 64,
            policy_json: ptr::null(),
            policy_json_len: 0,
        };
        let config = build_config(Some(&options)).unwrap();
        assert!(config.escape_invalid_tags);
        assert!(config.trim_whitespace);
        assert!(!config.drop_raw_text_content);
        assert_eq!(config.max_input_size, Some(64));
    }

    #[test]
    fn test_policy_overrides_flags() {
        let json = br#"{ "escape_invalid_tags": false, "valid_tags": { "p": true } }"#;
        let options = StripTagsOptions {
            escape_invalid_tags: 1,
            trim_whitespace: 0,
            keep_raw_text_content: 0,
            max_input_size: 0,
            policy_json: json.as_ptr(),
            policy_json_len: json.len(),
        };
        let config = build_config(Some(&options)).unwrap();
        assert!(!config.escape_invalid_tags);
        assert_eq!(config.max_input_size, None);
        assert_eq!(config.rules.valid_tags.len(), 1);
    }

    #[test]
    fn test_null_options_use_defaults() {
        let config = build_config(None).unwrap();
        assert!(config.rules.is_valid_tag("p"));
        assert!(config.drop_raw_text_content);
    }
}
