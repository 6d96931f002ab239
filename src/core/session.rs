//! Purpose: Session wrapper owning the native session handle.
//! Exports: `Session` plus the crate-internal `SessionCore` ownership root.
//! Role: Root of the borrow graph; keys and SFTP sessions derived from a
//! session hold non-owning back-references to its core.
//! Invariants: `SessionCore` frees session-owned key handles before the
//! session handle itself, exactly once, in its `Drop`.
use std::cell::RefCell;
use std::os::raw::{c_int, c_uint, c_void};
use std::rc::{Rc, Weak};

use crate::core::error::{Error, ErrorKind};
use crate::core::libssh::{self, sys};

/// Exclusive owner of one native session handle plus the registry of native
/// key handles whose lifetime is bound to it.
pub(crate) struct SessionCore {
    raw: sys::ssh_session,
    owned_keys: RefCell<Vec<sys::ssh_key>>,
}

impl SessionCore {
    pub(crate) fn raw(&self) -> sys::ssh_session {
        self.raw
    }

    /// Registers a native key handle to be freed together with this session.
    pub(crate) fn adopt_key(&self, key: sys::ssh_key) {
        self.owned_keys.borrow_mut().push(key);
    }

    pub(crate) fn is_connected(&self) -> bool {
        unsafe { sys::ssh_is_connected(self.raw) != 0 }
    }

    pub(crate) fn last_error(&self) -> String {
        libssh::engine_error(self.raw as *mut c_void)
    }
}

impl Drop for SessionCore {
    fn drop(&mut self) {
        // Session-owned keys go first; the wrappers that borrowed them have
        // no-op finalizers for these handles.
        for key in self.owned_keys.borrow_mut().drain(..) {
            unsafe { sys::ssh_key_free(key) };
        }
        unsafe {
            if sys::ssh_is_connected(self.raw) != 0 {
                sys::ssh_disconnect(self.raw);
            }
            sys::ssh_free(self.raw);
        }
    }
}

/// A connected-or-connecting SSH session. Cloning yields another handle to
/// the same underlying native session.
#[derive(Clone)]
pub struct Session {
    core: Rc<SessionCore>,
}

impl Session {
    /// Allocates a fresh, unconnected session.
    pub fn new() -> Result<Self, Error> {
        libssh::ensure_init();
        let raw = unsafe { sys::ssh_new() };
        if raw.is_null() {
            return Err(
                Error::new(ErrorKind::Native).with_message("engine could not allocate a session")
            );
        }
        Ok(Self {
            core: Rc::new(SessionCore {
                raw,
                owned_keys: RefCell::new(Vec::new()),
            }),
        })
    }

    pub fn set_host(&self, host: &str) -> Result<(), Error> {
        let host = libssh::c_arg(host, "host")?;
        self.set_option(sys::SSH_OPTIONS_HOST, host.as_ptr() as *const c_void)
    }

    pub fn set_port(&self, port: u16) -> Result<(), Error> {
        let port = c_uint::from(port);
        self.set_option(
            sys::SSH_OPTIONS_PORT,
            &port as *const c_uint as *const c_void,
        )
    }

    pub fn set_user(&self, user: &str) -> Result<(), Error> {
        let user = libssh::c_arg(user, "user")?;
        self.set_option(sys::SSH_OPTIONS_USER, user.as_ptr() as *const c_void)
    }

    fn set_option(&self, option: c_int, value: *const c_void) -> Result<(), Error> {
        let rc = unsafe { sys::ssh_options_set(self.core.raw, option, value) };
        if rc != sys::SSH_OK {
            return Err(Error::new(ErrorKind::Native)
                .with_message("could not set a session option")
                .with_detail(self.core.last_error()));
        }
        Ok(())
    }

    /// Performs the transport handshake.
    pub fn connect(&self) -> Result<(), Error> {
        tracing::debug!("connecting session");
        let rc = unsafe { sys::ssh_connect(self.core.raw) };
        if rc != sys::SSH_OK {
            return Err(Error::new(ErrorKind::Native)
                .with_message("could not connect the session")
                .with_detail(self.core.last_error()));
        }
        Ok(())
    }

    pub fn disconnect(&self) {
        if self.core.is_connected() {
            unsafe { sys::ssh_disconnect(self.core.raw) };
        }
    }

    pub fn is_connected(&self) -> bool {
        self.core.is_connected()
    }

    /// The engine's last error string for this session, for diagnostics.
    pub fn last_error_message(&self) -> String {
        self.core.last_error()
    }

    pub(crate) fn core(&self) -> &Rc<SessionCore> {
        &self.core
    }

    pub(crate) fn from_core(core: Rc<SessionCore>) -> Self {
        Self { core }
    }

    pub(crate) fn downgrade(&self) -> Weak<SessionCore> {
        Rc::downgrade(&self.core)
    }
}

#[cfg(test)]
mod tests {
    use super::Session;

    #[test]
    fn allocate_configure_and_drop() {
        let session = Session::new().expect("allocate session");
        session.set_host("localhost").expect("set host");
        session.set_port(2222).expect("set port");
        session.set_user("fixture").expect("set user");
        assert!(!session.is_connected());
    }

    #[test]
    fn back_references_do_not_keep_the_core_alive() {
        let session = Session::new().expect("allocate session");
        let weak = session.downgrade();
        assert!(weak.upgrade().is_some());
        drop(session);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn clones_share_one_native_handle() {
        let session = Session::new().expect("allocate session");
        let other = session.clone();
        assert_eq!(session.core().raw(), other.core().raw());
    }
}
