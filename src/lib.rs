//! Purpose: Safe lifecycle layer binding native SSH session, key, and SFTP
//! handles to Rust values.
//! Exports: `core` (sessions, keys, SFTP sessions, constant tables, errors).
//! Role: Bindings library over the system libssh engine; the engine itself
//! (handshake, crypto, wire I/O) is consumed, never reimplemented.
//! Invariants: Every native handle is freed exactly once, regardless of the
//! order in which wrappers are dropped.
pub mod core;

pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::key::Key;
pub use crate::core::session::Session;
pub use crate::core::sftp::SftpSession;
