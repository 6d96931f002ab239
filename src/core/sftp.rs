//! Purpose: SFTP subsystem handle bound to a parent session.
//! Exports: `SftpSession`.
//! Invariants: Construction requires a completed transport handshake on the
//! parent; the SFTP handle is freed independently of the parent handle.
use std::rc::Weak;

use libc::mode_t;

use crate::core::consts;
use crate::core::error::{Error, ErrorKind};
use crate::core::libssh::{self, sys};
use crate::core::session::{Session, SessionCore};

pub struct SftpSession {
    raw: sys::sftp_session,
    session: Weak<SessionCore>,
}

impl SftpSession {
    /// Allocates the SFTP subsystem handle on top of a connected session.
    pub fn new(session: &Session) -> Result<Self, Error> {
        if !session.is_connected() {
            return Err(
                Error::new(ErrorKind::Usage).with_message("session transport is not connected")
            );
        }
        let raw = unsafe { sys::sftp_new(session.core().raw()) };
        if raw.is_null() {
            return Err(Error::new(ErrorKind::Native)
                .with_message("could not allocate the SFTP session")
                .with_detail(session.last_error_message()));
        }
        Ok(Self {
            raw,
            session: session.downgrade(),
        })
    }

    /// Performs the SFTP protocol handshake. On failure the handle is left
    /// unusable and must be re-initialized or discarded.
    pub fn init(&self) -> Result<(), Error> {
        tracing::debug!("initializing sftp session");
        let rc = unsafe { sys::sftp_init(self.raw) };
        if rc != 0 {
            return Err(Error::new(ErrorKind::Native)
                .with_message("could not initialize the SFTP session")
                .with_detail(self.parent_error()));
        }
        Ok(())
    }

    /// The parent session behind the non-owning back-reference. Does not
    /// extend the parent's lifetime while unused.
    pub fn session(&self) -> Result<Session, Error> {
        self.session
            .upgrade()
            .map(Session::from_core)
            .ok_or_else(|| {
                Error::new(ErrorKind::Usage).with_message("parent session has been dropped")
            })
    }

    /// Creates `dirname` on the remote side with the given permission mask.
    pub fn mkdir(&self, dirname: &str, mode: u32) -> Result<(), Error> {
        let c_dirname = libssh::c_arg(dirname, "dirname")?;
        let rc = unsafe { sys::sftp_mkdir(self.raw, c_dirname.as_ptr(), mode as mode_t) };
        if rc != 0 {
            return Err(Error::new(ErrorKind::Native)
                .with_message("could not create a directory")
                .with_path(dirname)
                .with_mode(mode)
                .with_detail(self.parent_error()));
        }
        Ok(())
    }

    /// The last protocol-level status recorded on this handle, as a symbol.
    pub fn last_error(&self) -> Result<&'static str, Error> {
        let rc = unsafe { sys::sftp_get_error(self.raw) };
        translate_status(rc)
    }

    fn parent_error(&self) -> String {
        self.session
            .upgrade()
            .map(|core| core.last_error())
            .unwrap_or_default()
    }
}

impl Drop for SftpSession {
    fn drop(&mut self) {
        unsafe { sys::sftp_free(self.raw) };
    }
}

/// Translates a raw last-error query result. Negative means the handle has
/// no error state to report, which is distinct from every legitimate code;
/// a non-negative code without a table entry is an unknown code, never
/// coerced to a default symbol.
fn translate_status(rc: i32) -> Result<&'static str, Error> {
    if rc < 0 {
        return Err(Error::new(ErrorKind::Unavailable)
            .with_message("could not get an error code")
            .with_code(rc));
    }
    consts::sftp_status_name(rc).ok_or_else(|| {
        Error::new(ErrorKind::UnknownCode)
            .with_message("engine reported an unmapped status code")
            .with_code(rc)
    })
}

#[cfg(test)]
mod tests {
    use super::{SftpSession, translate_status};
    use crate::core::error::ErrorKind;
    use crate::core::session::Session;

    #[test]
    fn construction_requires_a_connected_transport() {
        let session = Session::new().expect("allocate session");
        let err = SftpSession::new(&session).expect_err("must refuse unconnected session");
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn negative_query_means_no_error_state() {
        let err = translate_status(-1).expect_err("negative is unavailable");
        assert_eq!(err.kind(), ErrorKind::Unavailable);
        assert_eq!(err.code(), Some(-1));
    }

    #[test]
    fn known_codes_translate_to_symbols() {
        assert_eq!(translate_status(0).expect("ok"), "ok");
        assert_eq!(translate_status(3).expect("mapped"), "permission-denied");
        assert_eq!(translate_status(7).expect("mapped"), "connection-lost");
    }

    #[test]
    fn unmapped_codes_are_never_defaulted() {
        let err = translate_status(99).expect_err("unmapped code");
        assert_eq!(err.kind(), ErrorKind::UnknownCode);
        assert_eq!(err.code(), Some(99));
    }
}
