//! legacy exit status codes for system programs.
//! reference: [SYSEXITS](https://man.freebsd.org/cgi/man.cgi?query=sysexits&apropos=0&sektion=0&manpath=FreeBSD+11.2-stable&arch=default&format=html)

use crate::error::Error;

/// value: 1 <br>
/// Catchall for general errors.
pub const EX_FAILURE: i32 = 1;

/// value: 66 <br>
/// An input file (not a system file) did not exist or was not readable.
pub const EX_NOINPUT: i32 = 66;

/// value: 73 <br>
/// A (user specified) output file cannot be created.
pub const EX_CANTCREAT: i32 = 73;

/// value: 78 <br>
/// Something was found in an unconfigured or misconfigured state.
pub const EX_CONFIG: i32 = 78;

/// Maps an error that ended a run to its exit status.
pub fn exit_code(error: &Error) -> i32 {
    match error {
        Error::InvalidRoot { .. } => EX_NOINPUT,
        Error::Create { .. } | Error::Finalize { .. } => EX_CANTCREAT,
        Error::ReadConfig { .. } | Error::ParseConfig { .. } => EX_CONFIG,
        Error::InvalidState(_) => EX_FAILURE,
    }
}
