//! Communicator views.

use mpix_ll_runtime as ll;

use crate::error::expect_rc;

/// A non-owning view of a native intracommunicator.
///
/// Views are cheap to copy and never release the communicator. The
/// predefined world communicator is obtained with [`Communicator::world`].
/// Every query is fatal on a null or stale handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Communicator {
    handle: ll::CommHandle,
}

impl Communicator {
    /// The world communicator: every process of this launch group.
    pub fn world() -> Communicator {
        Communicator {
            handle: ll::COMM_WORLD,
        }
    }

    /// View an existing native handle.
    #[track_caller]
    pub fn from_handle(handle: ll::CommHandle) -> Communicator {
        if handle.is_null() {
            panic!("cannot view the null communicator");
        }
        Communicator { handle }
    }

    /// Number of processes in the local group.
    #[track_caller]
    pub fn size(&self) -> i32 {
        let mut size = 0;
        expect_rc(ll::comm_size(self.handle, &mut size), "comm_size");
        size
    }

    /// Rank of the calling process.
    #[track_caller]
    pub fn rank(&self) -> i32 {
        let mut rank = 0;
        expect_rc(ll::comm_rank(self.handle, &mut rank), "comm_rank");
        rank
    }

    /// Whether this is an intercommunicator.
    #[track_caller]
    pub fn is_inter(&self) -> bool {
        let mut flag = false;
        expect_rc(ll::comm_test_inter(self.handle, &mut flag), "comm_test_inter");
        flag
    }

    /// The underlying native handle.
    pub fn handle(&self) -> ll::CommHandle {
        self.handle
    }
}

impl Default for Communicator {
    fn default() -> Self {
        Communicator::world()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_is_an_intracommunicator() {
        let world = Communicator::world();
        assert!(!world.is_inter());
        assert!(world.size() >= 1);
        assert!(world.rank() >= 0);
    }

    #[test]
    fn default_is_world() {
        assert_eq!(Communicator::default(), Communicator::world());
    }

    #[test]
    #[should_panic(expected = "null communicator")]
    fn viewing_null_is_fatal() {
        let _ = Communicator::from_handle(ll::COMM_NULL);
    }
}
