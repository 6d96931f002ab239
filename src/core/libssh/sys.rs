// Raw FFI bindings to the native libssh engine.
use libc::mode_t;
use std::os::raw::{c_char, c_int, c_void};

// Generic return codes shared by most engine calls.
pub const SSH_OK: c_int = 0;
pub const SSH_ERROR: c_int = -1;
pub const SSH_AGAIN: c_int = -2;
pub const SSH_EOF: c_int = -127;

// enum ssh_options_e, the subset this crate sets.
pub const SSH_OPTIONS_HOST: c_int = 0;
pub const SSH_OPTIONS_PORT: c_int = 1;
pub const SSH_OPTIONS_USER: c_int = 4;

// enum ssh_keytypes_e.
pub const SSH_KEYTYPE_UNKNOWN: c_int = 0;
pub const SSH_KEYTYPE_DSS: c_int = 1;
pub const SSH_KEYTYPE_RSA: c_int = 2;
pub const SSH_KEYTYPE_RSA1: c_int = 3;
pub const SSH_KEYTYPE_ECDSA: c_int = 4;
pub const SSH_KEYTYPE_ED25519: c_int = 5;
pub const SSH_KEYTYPE_ECDSA_P256: c_int = 8;
pub const SSH_KEYTYPE_ECDSA_P384: c_int = 9;
pub const SSH_KEYTYPE_ECDSA_P521: c_int = 10;

// SFTP protocol status codes (SSH_FX_*).
pub const SSH_FX_OK: c_int = 0;
pub const SSH_FX_EOF: c_int = 1;
pub const SSH_FX_NO_SUCH_FILE: c_int = 2;
pub const SSH_FX_PERMISSION_DENIED: c_int = 3;
pub const SSH_FX_FAILURE: c_int = 4;
pub const SSH_FX_BAD_MESSAGE: c_int = 5;
pub const SSH_FX_NO_CONNECTION: c_int = 6;
pub const SSH_FX_CONNECTION_LOST: c_int = 7;
pub const SSH_FX_OP_UNSUPPORTED: c_int = 8;
pub const SSH_FX_INVALID_HANDLE: c_int = 9;
pub const SSH_FX_NO_SUCH_PATH: c_int = 10;
pub const SSH_FX_FILE_ALREADY_EXISTS: c_int = 11;
pub const SSH_FX_WRITE_PROTECT: c_int = 12;
pub const SSH_FX_NO_MEDIA: c_int = 13;

#[repr(C)]
pub struct ssh_session_struct {
    _opaque: [u8; 0],
}

#[repr(C)]
pub struct ssh_key_struct {
    _opaque: [u8; 0],
}

#[repr(C)]
pub struct sftp_session_struct {
    _opaque: [u8; 0],
}

pub type ssh_session = *mut ssh_session_struct;
pub type ssh_key = *mut ssh_key_struct;
pub type sftp_session = *mut sftp_session_struct;

pub type ssh_auth_callback = Option<
    unsafe extern "C" fn(
        prompt: *const c_char,
        buf: *mut c_char,
        len: usize,
        echo: c_int,
        verify: c_int,
        userdata: *mut c_void,
    ) -> c_int,
>;

unsafe extern "C" {
    pub fn ssh_init() -> c_int;

    pub fn ssh_new() -> ssh_session;

    pub fn ssh_free(session: ssh_session);

    pub fn ssh_options_set(session: ssh_session, option: c_int, value: *const c_void) -> c_int;

    pub fn ssh_connect(session: ssh_session) -> c_int;

    pub fn ssh_disconnect(session: ssh_session);

    pub fn ssh_is_connected(session: ssh_session) -> c_int;

    // Accepts any error-carrying engine handle (session, bind, ...).
    pub fn ssh_get_error(error: *mut c_void) -> *const c_char;

    pub fn ssh_pki_import_privkey_file(
        filename: *const c_char,
        passphrase: *const c_char,
        auth_fn: ssh_auth_callback,
        auth_data: *mut c_void,
        pkey: *mut ssh_key,
    ) -> c_int;

    pub fn ssh_pki_export_privkey_to_pubkey(privkey: ssh_key, pkey: *mut ssh_key) -> c_int;

    pub fn ssh_pki_export_pubkey_base64(key: ssh_key, b64_key: *mut *mut c_char) -> c_int;

    pub fn ssh_key_type(key: ssh_key) -> c_int;

    pub fn ssh_key_free(key: ssh_key);

    pub fn ssh_string_free_char(s: *mut c_char);

    pub fn sftp_new(session: ssh_session) -> sftp_session;

    pub fn sftp_free(sftp: sftp_session);

    pub fn sftp_init(sftp: sftp_session) -> c_int;

    pub fn sftp_get_error(sftp: sftp_session) -> c_int;

    pub fn sftp_mkdir(sftp: sftp_session, directory: *const c_char, mode: mode_t) -> c_int;
}
