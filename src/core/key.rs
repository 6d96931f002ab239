//! Purpose: Key lifecycle across the three key representations.
//! Exports: `Key` (private / derived public / encoded public).
//! Role: Decides, per representation, who frees the native handle: the
//! owning session's registry, this wrapper's own finalizer, or nobody.
//! Invariants: Loading and derivation failures return the `Ok(None)`
//! sentinel; wrong-tag arguments raise before any native call.
//! Invariants: Both serialization paths yield byte-identical base64 for
//! equivalent key material.
use std::fmt;
use std::os::raw::{c_char, c_int};
use std::path::Path;
use std::ptr;
use std::rc::Weak;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bstr::ByteSlice;

use crate::core::consts;
use crate::core::error::{Error, ErrorKind};
use crate::core::libssh::{self, NativeString, sys};
use crate::core::session::{Session, SessionCore};

enum KeyRepr {
    /// Parsed private key. The native handle is registered with the owning
    /// session and freed there; this wrapper's finalizer must not touch it.
    Private {
        raw: sys::ssh_key,
        session: Weak<SessionCore>,
    },
    /// Public key derived from a private key. Owned here; freed exactly once
    /// by this wrapper's finalizer, independent of any session.
    PublicDerived { raw: sys::ssh_key },
    /// Public key read straight from a `.pub` file: decoded blob plus the
    /// engine's keytype code. No native object exists for it.
    PublicEncoded {
        blob: Vec<u8>,
        type_code: c_int,
        session: Weak<SessionCore>,
    },
}

pub struct Key {
    repr: KeyRepr,
}

impl Key {
    /// Reads a private key from `path`, relative to `session` for ownership
    /// purposes. A `None` passphrase means try-unencrypted, deferring any
    /// prompting policy to the engine.
    ///
    /// Parse failure (bad format, wrong passphrase, missing file) is an
    /// expected outcome and returns `Ok(None)`.
    pub fn private_from_file(
        session: &Session,
        path: impl AsRef<Path>,
        passphrase: Option<&str>,
    ) -> Result<Option<Self>, Error> {
        let path = path.as_ref();
        let c_filename = libssh::c_path(path)?;
        let c_passphrase = match passphrase {
            Some(value) => Some(libssh::c_arg(value, "passphrase")?),
            None => None,
        };

        let mut raw: sys::ssh_key = ptr::null_mut();
        let rc = unsafe {
            sys::ssh_pki_import_privkey_file(
                c_filename.as_ptr(),
                c_passphrase
                    .as_ref()
                    .map_or(ptr::null(), |value| value.as_ptr()),
                None,
                ptr::null_mut(),
                &mut raw,
            )
        };
        if rc != sys::SSH_OK || raw.is_null() {
            tracing::debug!(path = %path.display(), rc, "private key import failed");
            return Ok(None);
        }

        session.core().adopt_key(raw);
        Ok(Some(Self {
            repr: KeyRepr::Private {
                raw,
                session: session.downgrade(),
            },
        }))
    }

    /// Derives the public half of a private key. The result owns its native
    /// handle and outlives both the source key and the session.
    pub fn to_public(&self) -> Result<Option<Self>, Error> {
        let KeyRepr::Private { raw, session } = &self.repr else {
            return Err(Error::new(ErrorKind::Usage).with_message("expected a private key"));
        };
        // The private handle dies with its session; refuse to dereference
        // it once the session is gone.
        let _core = session.upgrade().ok_or_else(|| {
            Error::new(ErrorKind::Usage).with_message("owning session has been dropped")
        })?;

        let mut public: sys::ssh_key = ptr::null_mut();
        let rc = unsafe { sys::ssh_pki_export_privkey_to_pubkey(*raw, &mut public) };
        if rc != sys::SSH_OK || public.is_null() {
            tracing::debug!(rc, "public key derivation failed");
            return Ok(None);
        }
        Ok(Some(Self {
            repr: KeyRepr::PublicDerived { raw: public },
        }))
    }

    /// Reads a public key from an OpenSSH `.pub` file without constructing a
    /// native key object. Unreadable, garbled, or unrecognized input returns
    /// `Ok(None)`.
    pub fn public_from_file(
        session: &Session,
        path: impl AsRef<Path>,
    ) -> Result<Option<Self>, Error> {
        let path = path.as_ref();
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "public key file unreadable");
                return Ok(None);
            }
        };
        let Some((type_code, blob)) = parse_public_key_line(&bytes) else {
            return Ok(None);
        };
        Ok(Some(Self {
            repr: KeyRepr::PublicEncoded {
                blob,
                type_code,
                session: session.downgrade(),
            },
        }))
    }

    /// Canonical textual form of a public key: base64 of the wire-format
    /// blob, identical for both public representations of the same material.
    pub fn to_base64(&self) -> Result<String, Error> {
        match &self.repr {
            KeyRepr::PublicDerived { raw } => {
                let mut out: *mut c_char = ptr::null_mut();
                let rc = unsafe { sys::ssh_pki_export_pubkey_base64(*raw, &mut out) };
                // The engine string must be released on every path,
                // including rc failures.
                let native = unsafe { NativeString::from_raw(out) };
                if rc != sys::SSH_OK {
                    return Err(Error::new(ErrorKind::Native)
                        .with_message("could not serialize the public key"));
                }
                let native = native.ok_or_else(|| {
                    Error::new(ErrorKind::Native)
                        .with_message("engine returned no serialized key data")
                })?;
                Ok(native.to_string_lossy())
            }
            KeyRepr::PublicEncoded { blob, .. } => Ok(BASE64.encode(blob)),
            KeyRepr::Private { .. } => {
                Err(Error::new(ErrorKind::Usage).with_message("expected a public key"))
            }
        }
    }

    /// Key algorithm family as a symbol (`"rsa"`, `"ed25519"`, ...).
    pub fn type_name(&self) -> Result<&'static str, Error> {
        let code = match &self.repr {
            KeyRepr::Private { raw, session } => {
                let _core = session.upgrade().ok_or_else(|| {
                    Error::new(ErrorKind::Usage).with_message("owning session has been dropped")
                })?;
                unsafe { sys::ssh_key_type(*raw) }
            }
            KeyRepr::PublicDerived { raw } => unsafe { sys::ssh_key_type(*raw) },
            KeyRepr::PublicEncoded { type_code, .. } => *type_code,
        };
        consts::key_type_name(code).ok_or_else(|| {
            Error::new(ErrorKind::UnknownCode)
                .with_message("engine reported an unmapped key type")
                .with_code(code)
        })
    }

    pub fn is_private(&self) -> bool {
        matches!(self.repr, KeyRepr::Private { .. })
    }

    pub fn is_public(&self) -> bool {
        !self.is_private()
    }

    /// The session this key was loaded relative to, if it was loaded from a
    /// file and the session is still alive. Derived keys are independent and
    /// return `None`.
    pub fn session(&self) -> Option<Session> {
        match &self.repr {
            KeyRepr::Private { session, .. } | KeyRepr::PublicEncoded { session, .. } => {
                session.upgrade().map(Session::from_core)
            }
            KeyRepr::PublicDerived { .. } => None,
        }
    }
}

impl Drop for Key {
    fn drop(&mut self) {
        match &self.repr {
            // Freed by the owning session's registry, never here.
            KeyRepr::Private { .. } => {}
            KeyRepr::PublicDerived { raw } => unsafe { sys::ssh_key_free(*raw) },
            // Plain Rust memory; nothing native to release.
            KeyRepr::PublicEncoded { .. } => {}
        }
    }
}

/// Keys are equal when they are the same underlying object: handle identity
/// for native representations, content equality for encoded ones.
impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        match (&self.repr, &other.repr) {
            (KeyRepr::Private { raw: a, .. }, KeyRepr::Private { raw: b, .. }) => a == b,
            (KeyRepr::PublicDerived { raw: a }, KeyRepr::PublicDerived { raw: b }) => a == b,
            (
                KeyRepr::PublicEncoded {
                    blob: a,
                    type_code: ta,
                    ..
                },
                KeyRepr::PublicEncoded {
                    blob: b,
                    type_code: tb,
                    ..
                },
            ) => ta == tb && a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = if self.is_private() { "private" } else { "public" };
        let family = self.type_name().unwrap_or("unknown");
        match &self.repr {
            KeyRepr::Private { raw, .. } => write!(f, "#<{tag} {family} key {:p}>", *raw),
            KeyRepr::PublicDerived { raw } => write!(f, "#<{tag} {family} key {:p}>", *raw),
            KeyRepr::PublicEncoded { blob, .. } => {
                write!(f, "#<{tag} {family} key {:p}>", blob.as_ptr())
            }
        }
    }
}

/// Parses one OpenSSH public-key line: `algo base64-blob [comment]`. Any
/// deviation yields `None`; the caller treats that as the load sentinel.
fn parse_public_key_line(bytes: &[u8]) -> Option<(c_int, Vec<u8>)> {
    let mut fields = bytes.fields();
    let algo = fields.next()?.to_str().ok()?;
    let blob64 = fields.next()?.to_str().ok()?;
    let type_code = consts::key_type_for_wire_name(algo)?;
    let blob = BASE64.decode(blob64).ok()?;
    Some((type_code, blob))
}

#[cfg(test)]
mod tests {
    use super::parse_public_key_line;
    use crate::core::libssh::sys;

    const FIXTURE_LINE: &[u8] =
        b"ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIIihhVQBs/PC3BzRymO5zHF0hjYKO1EVxjrCV+UtIqRZ fixture@test\n";

    #[test]
    fn parses_algorithm_blob_and_ignores_comment() {
        let (code, blob) = parse_public_key_line(FIXTURE_LINE).expect("parse fixture line");
        assert_eq!(code, sys::SSH_KEYTYPE_ED25519);
        // Wire blobs start with a length-prefixed algorithm name.
        assert_eq!(&blob[4..15], &b"ssh-ed25519"[..]);
    }

    #[test]
    fn comment_is_optional() {
        let line = b"ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIIihhVQBs/PC3BzRymO5zHF0hjYKO1EVxjrCV+UtIqRZ";
        assert!(parse_public_key_line(line).is_some());
    }

    #[test]
    fn garbled_input_is_rejected() {
        assert!(parse_public_key_line(b"").is_none());
        assert!(parse_public_key_line(b"ssh-ed25519").is_none());
        assert!(parse_public_key_line(b"ssh-ed25519 not!base64!").is_none());
        assert!(parse_public_key_line(b"no-such-algo AAAAC3NzaC1lZDI1NTE5").is_none());
    }
}
