//! Return codes and runtime limits.
//!
//! Codes at this level are plain integers, the way the native standard
//! reports them. Classifying a code as recoverable or fatal is a decision
//! for the layers above - no interpretation happens here.

/// Native return code.
pub type Rc = i32;

/// The operation completed.
pub const RC_SUCCESS: Rc = 0;
/// An argument was illegal (empty command, non-positive count, ...).
pub const RC_ERR_ARG: Rc = 1;
/// The info handle was null, stale, or a sentinel where one is not allowed.
pub const RC_ERR_INFO: Rc = 2;
/// The info key was empty or too long.
pub const RC_ERR_INFO_KEY: Rc = 3;
/// The info value was empty or too long.
pub const RC_ERR_INFO_VALUE: Rc = 4;
/// The info key was not present.
pub const RC_ERR_INFO_NOKEY: Rc = 5;
/// The communicator handle was null, stale, or of the wrong kind.
pub const RC_ERR_COMM: Rc = 6;
/// The root rank was outside the communicator.
pub const RC_ERR_ROOT: Rc = 7;
/// A process could not be launched.
pub const RC_ERR_SPAWN: Rc = 8;
/// Anything else (calls after finalize, ...).
pub const RC_ERR_OTHER: Rc = 9;

/// Maximum info key length. Legal key lengths are `1..MAX_INFO_KEY` bytes.
pub const MAX_INFO_KEY: usize = 256;

/// Maximum info value length. Legal value lengths are `1..MAX_INFO_VAL` bytes.
pub const MAX_INFO_VAL: usize = 1024;

/// Human-readable name for a return code.
pub fn rc_string(rc: Rc) -> &'static str {
    match rc {
        RC_SUCCESS => "success",
        RC_ERR_ARG => "illegal argument",
        RC_ERR_INFO => "invalid info handle",
        RC_ERR_INFO_KEY => "illegal info key",
        RC_ERR_INFO_VALUE => "illegal info value",
        RC_ERR_INFO_NOKEY => "no such info key",
        RC_ERR_COMM => "invalid communicator",
        RC_ERR_ROOT => "invalid root rank",
        RC_ERR_SPAWN => "spawn failed",
        RC_ERR_OTHER => "other error",
        _ => "unknown return code",
    }
}
