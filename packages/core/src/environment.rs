//! The runtime window: initialization, finalization, and the queries that
//! are only meaningful between them.

use mpix_ll_runtime as ll;

use crate::error::{expect_rc, Error, SourceLocation};
use crate::thread_support::ThreadSupport;

/// Initialize the runtime, requiring at least `required` thread support.
///
/// Returns the level actually granted. When the runtime grants less than
/// `required`, the error carries both levels and the call site.
#[track_caller]
pub fn init(required: ThreadSupport) -> Result<ThreadSupport, Error> {
    let mut provided_native = 0;
    expect_rc(
        ll::init_thread(required.to_native(), &mut provided_native),
        "init_thread",
    );
    let provided = ThreadSupport::from_native(provided_native);
    if provided < required {
        return Err(Error::ThreadSupportNotSatisfied {
            required,
            provided,
            location: SourceLocation::capture(),
        });
    }
    Ok(provided)
}

/// Whether the runtime has been initialized.
pub fn initialized() -> bool {
    let mut flag = false;
    ll::initialized(&mut flag);
    flag
}

/// Whether the runtime has been finalized.
pub fn finalized() -> bool {
    let mut flag = false;
    ll::finalized(&mut flag);
    flag
}

/// Close the runtime window. Fatal when called twice.
#[track_caller]
pub fn finalize() {
    expect_rc(ll::finalize(), "finalize");
}

/// The universe size attribute, when the runtime knows it.
#[track_caller]
pub fn universe_size() -> Option<usize> {
    let mut size = 0;
    let mut flag = false;
    expect_rc(ll::universe_size(&mut size, &mut flag), "universe_size");
    flag.then_some(size)
}

/// Name of the processor this process runs on.
#[track_caller]
pub fn processor_name() -> String {
    let mut name = String::new();
    expect_rc(ll::processor_name(&mut name), "processor_name");
    name
}

/// Seconds on the runtime's monotonic clock.
pub fn wtime() -> f64 {
    ll::wtime()
}

/// Resolution of [`wtime`] in seconds.
pub fn wtick() -> f64 {
    ll::wtick()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_single_is_always_satisfied() {
        let provided = init(ThreadSupport::Single).unwrap();
        assert!(provided >= ThreadSupport::Single);
        assert!(initialized());
    }

    #[test]
    fn clock_advances() {
        let a = wtime();
        let b = wtime();
        assert!(b >= a);
        assert!(wtick() > 0.0);
    }

    #[test]
    fn processor_name_is_nonempty() {
        assert!(!processor_name().is_empty());
    }
}
