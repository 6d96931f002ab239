//! Purpose: Bidirectional symbol/code tables for the engine's constant spaces.
//! Exports: `SFTP_STATUS`, `KEY_TYPES`, `PUBKEY_WIRE_NAMES` and their lookups.
//! Invariants: Tables are read-only process-wide state; a lookup miss is
//! `None`, never coerced to a default entry.
use crate::core::libssh::sys;

/// An ordered association table between symbolic names and engine codes.
pub type SymbolTable = [(&'static str, i32)];

/// SFTP protocol status space (the SSH_FX codes).
pub static SFTP_STATUS: &SymbolTable = &[
    ("ok", sys::SSH_FX_OK),
    ("eof", sys::SSH_FX_EOF),
    ("no-such-file", sys::SSH_FX_NO_SUCH_FILE),
    ("permission-denied", sys::SSH_FX_PERMISSION_DENIED),
    ("failure", sys::SSH_FX_FAILURE),
    ("bad-message", sys::SSH_FX_BAD_MESSAGE),
    ("no-connection", sys::SSH_FX_NO_CONNECTION),
    ("connection-lost", sys::SSH_FX_CONNECTION_LOST),
    ("op-unsupported", sys::SSH_FX_OP_UNSUPPORTED),
    ("invalid-handle", sys::SSH_FX_INVALID_HANDLE),
    ("no-such-path", sys::SSH_FX_NO_SUCH_PATH),
    ("file-already-exists", sys::SSH_FX_FILE_ALREADY_EXISTS),
    ("write-protect", sys::SSH_FX_WRITE_PROTECT),
    ("no-media", sys::SSH_FX_NO_MEDIA),
];

/// Key algorithm families against the engine's keytype enum. The NIST
/// curves report distinct engine codes; all of them translate to the
/// `ecdsa` family, and the family name translates back to the generic code.
pub static KEY_TYPES: &SymbolTable = &[
    ("unknown", sys::SSH_KEYTYPE_UNKNOWN),
    ("dss", sys::SSH_KEYTYPE_DSS),
    ("rsa", sys::SSH_KEYTYPE_RSA),
    ("rsa1", sys::SSH_KEYTYPE_RSA1),
    ("ecdsa", sys::SSH_KEYTYPE_ECDSA),
    ("ed25519", sys::SSH_KEYTYPE_ED25519),
    ("ecdsa", sys::SSH_KEYTYPE_ECDSA_P256),
    ("ecdsa", sys::SSH_KEYTYPE_ECDSA_P384),
    ("ecdsa", sys::SSH_KEYTYPE_ECDSA_P521),
];

/// OpenSSH wire algorithm names as they appear in the first field of a
/// `.pub` file, mapped to engine keytype codes.
pub static PUBKEY_WIRE_NAMES: &SymbolTable = &[
    ("ssh-rsa", sys::SSH_KEYTYPE_RSA),
    ("ssh-dss", sys::SSH_KEYTYPE_DSS),
    ("ssh-ed25519", sys::SSH_KEYTYPE_ED25519),
    ("ecdsa-sha2-nistp256", sys::SSH_KEYTYPE_ECDSA_P256),
    ("ecdsa-sha2-nistp384", sys::SSH_KEYTYPE_ECDSA_P384),
    ("ecdsa-sha2-nistp521", sys::SSH_KEYTYPE_ECDSA_P521),
];

/// Linear scan, first match wins.
pub fn name_for_code(table: &'static SymbolTable, code: i32) -> Option<&'static str> {
    table
        .iter()
        .find(|(_, entry)| *entry == code)
        .map(|(name, _)| *name)
}

pub fn code_for_name(table: &'static SymbolTable, name: &str) -> Option<i32> {
    table
        .iter()
        .find(|(entry, _)| *entry == name)
        .map(|(_, code)| *code)
}

pub fn sftp_status_name(code: i32) -> Option<&'static str> {
    name_for_code(SFTP_STATUS, code)
}

pub fn sftp_status_code(name: &str) -> Option<i32> {
    code_for_name(SFTP_STATUS, name)
}

pub fn key_type_name(code: i32) -> Option<&'static str> {
    name_for_code(KEY_TYPES, code)
}

pub fn key_type_for_wire_name(name: &str) -> Option<i32> {
    code_for_name(PUBKEY_WIRE_NAMES, name)
}

#[cfg(test)]
mod tests {
    use super::{
        SFTP_STATUS, code_for_name, key_type_for_wire_name, key_type_name, name_for_code,
        sftp_status_code, sftp_status_name,
    };

    #[test]
    fn sftp_status_round_trips_both_directions() {
        for (name, code) in SFTP_STATUS {
            assert_eq!(sftp_status_name(*code), Some(*name));
            assert_eq!(sftp_status_code(name), Some(*code));
        }
    }

    #[test]
    fn a_miss_is_distinct_from_any_legitimate_code() {
        assert_eq!(sftp_status_name(14), None);
        assert_eq!(sftp_status_name(-3), None);
        assert_eq!(sftp_status_code("fx-ok"), None);
    }

    #[test]
    fn nist_curve_codes_translate_to_the_ecdsa_family() {
        assert_eq!(key_type_name(8), Some("ecdsa"));
        assert_eq!(key_type_name(9), Some("ecdsa"));
        assert_eq!(key_type_name(10), Some("ecdsa"));
        // The family name translates back to the generic code.
        assert_eq!(code_for_name(super::KEY_TYPES, "ecdsa"), Some(4));
    }

    #[test]
    fn wire_names_cover_the_fixture_algorithms() {
        assert_eq!(key_type_for_wire_name("ssh-ed25519"), Some(5));
        assert_eq!(key_type_for_wire_name("ssh-rsa"), Some(2));
        assert_eq!(key_type_for_wire_name("ssh-ecdsa"), None);
    }

    #[test]
    fn first_match_wins_on_duplicate_names() {
        assert_eq!(name_for_code(super::KEY_TYPES, 4), Some("ecdsa"));
    }
}
