//! Purpose: Safe boundary around the native libssh engine.
//! Exports: `sys` (raw externs), `ensure_init`, `NativeString`, C-string helpers.
//! Role: Every FFI interaction in the crate goes through this module + `sys`.
//! Invariants: Engine-allocated strings are released on every exit path.
//! Invariants: Interior NULs are rejected before any pointer crosses the boundary.
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_void};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::sync::Once;

use crate::core::error::{Error, ErrorKind};

pub mod sys;

static ENGINE_INIT: Once = Once::new();

/// One-time process-wide engine initialization. Idempotent; must run before
/// the first engine call when the library is linked statically.
pub fn ensure_init() {
    ENGINE_INIT.call_once(|| {
        let rc = unsafe { sys::ssh_init() };
        if rc != sys::SSH_OK {
            tracing::warn!(rc, "libssh global init returned nonzero");
        }
    });
}

/// Owned wrapper over an engine-allocated C string, released through the
/// engine's own free routine when dropped.
pub struct NativeString {
    ptr: *mut c_char,
}

impl NativeString {
    /// Takes ownership of `ptr`. Returns `None` for a null pointer.
    ///
    /// # Safety
    /// `ptr` must be a string allocated by the engine and not freed elsewhere.
    pub unsafe fn from_raw(ptr: *mut c_char) -> Option<Self> {
        if ptr.is_null() { None } else { Some(Self { ptr }) }
    }

    pub fn to_string_lossy(&self) -> String {
        unsafe { CStr::from_ptr(self.ptr) }
            .to_string_lossy()
            .into_owned()
    }
}

impl Drop for NativeString {
    fn drop(&mut self) {
        unsafe {
            sys::ssh_string_free_char(self.ptr);
        }
    }
}

/// Converts a string argument into a scoped C-string temporary. An interior
/// NUL cannot cross the boundary and is a usage error, raised before any
/// native call.
pub fn c_arg(value: &str, what: &str) -> Result<CString, Error> {
    CString::new(value).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message(format!("{what} contains an interior NUL byte"))
            .with_source(err)
    })
}

/// Same as [`c_arg`] for filesystem paths.
pub fn c_path(path: &Path) -> Result<CString, Error> {
    CString::new(path.as_os_str().as_bytes()).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("path contains an interior NUL byte")
            .with_path(path)
            .with_source(err)
    })
}

/// Copies the engine's last error string for `handle`. The engine owns the
/// underlying buffer; it is borrowed, never freed here.
pub fn engine_error(handle: *mut c_void) -> String {
    let ptr = unsafe { sys::ssh_get_error(handle) };
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}
