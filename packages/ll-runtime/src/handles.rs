//! Opaque handle types, predefined sentinels, and thread-support levels.

use std::fmt;

/// Opaque handle to a native info (attribute) object.
///
/// Handles are plain identifiers: copying one does not copy the object it
/// refers to, and dropping one releases nothing. Ownership is a concern of
/// the layers above.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct InfoHandle(pub(crate) u64);

impl InfoHandle {
    /// Whether this handle is the null sentinel.
    pub fn is_null(self) -> bool {
        self == INFO_NULL
    }
}

impl fmt::Debug for InfoHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            INFO_NULL => write!(f, "InfoHandle(NULL)"),
            INFO_ENV => write!(f, "InfoHandle(ENV)"),
            InfoHandle(id) => write!(f, "InfoHandle({})", id),
        }
    }
}

/// Opaque handle to a native communicator.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommHandle(pub(crate) u64);

impl CommHandle {
    /// Whether this handle is the null sentinel.
    pub fn is_null(self) -> bool {
        self == COMM_NULL
    }
}

impl fmt::Debug for CommHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            COMM_NULL => write!(f, "CommHandle(NULL)"),
            COMM_WORLD => write!(f, "CommHandle(WORLD)"),
            COMM_SELF => write!(f, "CommHandle(SELF)"),
            CommHandle(id) => write!(f, "CommHandle({})", id),
        }
    }
}

/// The null info sentinel. Never refers to an object; never freed.
pub const INFO_NULL: InfoHandle = InfoHandle(0);

/// The environment info sentinel. Pre-populated at initialization with
/// launch parameters; never freed.
pub const INFO_ENV: InfoHandle = InfoHandle(1);

/// The null communicator sentinel.
pub const COMM_NULL: CommHandle = CommHandle(0);

/// The world communicator: every process of this launch group.
pub const COMM_WORLD: CommHandle = CommHandle(1);

/// The self communicator: this process alone.
pub const COMM_SELF: CommHandle = CommHandle(2);

// Dynamic handle ids start above the sentinel range.
pub(crate) const FIRST_DYNAMIC_HANDLE: u64 = 16;

/// Only the main thread makes runtime calls.
pub const THREAD_SINGLE: i32 = 0;
/// Multiple threads exist, only the one that initialized calls the runtime.
pub const THREAD_FUNNELED: i32 = 1;
/// Any thread may call the runtime, one at a time.
pub const THREAD_SERIALIZED: i32 = 2;
/// Any thread may call the runtime at any time.
pub const THREAD_MULTIPLE: i32 = 3;
