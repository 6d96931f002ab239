// Core modules implementing handle lifecycle, constant mapping, and error modeling.
pub mod consts;
pub mod error;
pub mod key;
pub mod libssh;
pub mod session;
pub mod sftp;
