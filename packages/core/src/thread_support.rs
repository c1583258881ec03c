//! The four-level thread-support enumeration.

use std::fmt;
use std::str::FromStr;

use mpix_ll_runtime as ll;

use crate::error::{Error, SourceLocation};

/// How much threading the runtime tolerates around its calls.
///
/// Levels are totally ordered: `Single < Funneled < Serialized < Multiple`.
/// A runtime granting some level also satisfies every lower one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ThreadSupport {
    /// Only one thread exists in the process.
    Single,
    /// Multiple threads exist; only the initializing thread calls the runtime.
    Funneled,
    /// Any thread may call the runtime, but never concurrently.
    Serialized,
    /// No restrictions.
    Multiple,
}

impl ThreadSupport {
    /// All levels, lowest first.
    pub const ALL: [ThreadSupport; 4] = [
        ThreadSupport::Single,
        ThreadSupport::Funneled,
        ThreadSupport::Serialized,
        ThreadSupport::Multiple,
    ];

    /// The canonical standard name.
    pub fn as_str(self) -> &'static str {
        match self {
            ThreadSupport::Single => "MPI_THREAD_SINGLE",
            ThreadSupport::Funneled => "MPI_THREAD_FUNNELED",
            ThreadSupport::Serialized => "MPI_THREAD_SERIALIZED",
            ThreadSupport::Multiple => "MPI_THREAD_MULTIPLE",
        }
    }

    pub(crate) fn to_native(self) -> i32 {
        match self {
            ThreadSupport::Single => ll::THREAD_SINGLE,
            ThreadSupport::Funneled => ll::THREAD_FUNNELED,
            ThreadSupport::Serialized => ll::THREAD_SERIALIZED,
            ThreadSupport::Multiple => ll::THREAD_MULTIPLE,
        }
    }

    pub(crate) fn from_native(level: i32) -> ThreadSupport {
        match level {
            x if x == ll::THREAD_SINGLE => ThreadSupport::Single,
            x if x == ll::THREAD_FUNNELED => ThreadSupport::Funneled,
            x if x == ll::THREAD_SERIALIZED => ThreadSupport::Serialized,
            x if x == ll::THREAD_MULTIPLE => ThreadSupport::Multiple,
            other => panic!("runtime reported unknown thread-support level {}", other),
        }
    }
}

impl fmt::Display for ThreadSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThreadSupport {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThreadSupport::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| Error::InvalidArgument {
                target: "ThreadSupport",
                value: s.to_string(),
                location: SourceLocation::capture(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered() {
        assert!(ThreadSupport::Single < ThreadSupport::Funneled);
        assert!(ThreadSupport::Funneled < ThreadSupport::Serialized);
        assert!(ThreadSupport::Serialized < ThreadSupport::Multiple);
    }

    #[test]
    fn round_trips_through_canonical_names() {
        for level in ThreadSupport::ALL {
            assert_eq!(level.as_str().parse::<ThreadSupport>().unwrap(), level);
        }
    }

    #[test]
    fn round_trips_through_native_levels() {
        for level in ThreadSupport::ALL {
            assert_eq!(ThreadSupport::from_native(level.to_native()), level);
        }
    }

    #[test]
    fn unknown_name_is_invalid_argument() {
        let err = "INVALID_VALUE".parse::<ThreadSupport>().unwrap_err();
        match &err {
            Error::InvalidArgument { target, value, .. } => {
                assert_eq!(*target, "ThreadSupport");
                assert_eq!(value, "INVALID_VALUE");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        let message = format!("{}", err);
        assert!(message.contains("INVALID_VALUE"));
        assert!(message.contains("ThreadSupport"));
    }

    #[test]
    fn lowercase_name_is_rejected() {
        assert!("single".parse::<ThreadSupport>().is_err());
    }
}
