//! Communicator primitives.

use crate::env::ensure_init;
use crate::handles::{CommHandle, COMM_NULL};
use crate::rc::{Rc, RC_ERR_COMM, RC_ERR_OTHER, RC_SUCCESS};
use crate::registry::{lock, CommObject, COMM_REGISTRY};

/// Number of processes in the communicator's local group.
pub fn comm_size(handle: CommHandle, size: &mut i32) -> Rc {
    if !ensure_init() {
        return RC_ERR_OTHER;
    }
    match lock(&COMM_REGISTRY).get(&handle.0) {
        Some(CommObject::Intra { size: n, .. }) => {
            *size = *n;
            RC_SUCCESS
        }
        // The local group of an intercommunicator here is this process alone.
        Some(CommObject::Inter { .. }) => {
            *size = 1;
            RC_SUCCESS
        }
        None => RC_ERR_COMM,
    }
}

/// Rank of the calling process within the communicator.
pub fn comm_rank(handle: CommHandle, rank: &mut i32) -> Rc {
    if !ensure_init() {
        return RC_ERR_OTHER;
    }
    match lock(&COMM_REGISTRY).get(&handle.0) {
        Some(CommObject::Intra { rank: r, .. }) => {
            *rank = *r;
            RC_SUCCESS
        }
        Some(CommObject::Inter { .. }) => {
            *rank = 0;
            RC_SUCCESS
        }
        None => RC_ERR_COMM,
    }
}

/// Whether the communicator is an intercommunicator.
pub fn comm_test_inter(handle: CommHandle, flag: &mut bool) -> Rc {
    if !ensure_init() {
        return RC_ERR_OTHER;
    }
    match lock(&COMM_REGISTRY).get(&handle.0) {
        Some(obj) => {
            *flag = matches!(obj, CommObject::Inter { .. });
            RC_SUCCESS
        }
        None => RC_ERR_COMM,
    }
}

/// Size of the remote group of an intercommunicator.
pub fn comm_remote_size(handle: CommHandle, size: &mut i32) -> Rc {
    if !ensure_init() {
        return RC_ERR_OTHER;
    }
    match lock(&COMM_REGISTRY).get(&handle.0) {
        Some(CommObject::Inter { remote_size, .. }) => {
            *size = *remote_size;
            RC_SUCCESS
        }
        Some(CommObject::Intra { .. }) => RC_ERR_COMM,
        None => RC_ERR_COMM,
    }
}

/// Release a communicator and reset the handle to [`COMM_NULL`].
///
/// Freeing an intercommunicator reaps the spawned children it bridges to
/// (best-effort wait). The predefined communicators are not freeable.
pub fn comm_free(handle: &mut CommHandle) -> Rc {
    if !ensure_init() {
        return RC_ERR_OTHER;
    }
    if handle.0 < crate::handles::FIRST_DYNAMIC_HANDLE {
        return RC_ERR_COMM;
    }
    let removed = lock(&COMM_REGISTRY).remove(&handle.0);
    match removed {
        Some(CommObject::Inter { mut children, .. }) => {
            for child in &mut children {
                if let Err(e) = child.wait() {
                    log::warn!("failed to reap spawned child: {}", e);
                }
            }
            log::debug!("comm_free {:?}: reaped {} children", handle, children.len());
            *handle = COMM_NULL;
            RC_SUCCESS
        }
        Some(CommObject::Intra { .. }) => {
            *handle = COMM_NULL;
            RC_SUCCESS
        }
        None => RC_ERR_COMM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handles::{COMM_SELF, COMM_WORLD};

    #[test]
    fn world_has_size_and_rank() {
        let mut size = 0;
        assert_eq!(comm_size(COMM_WORLD, &mut size), RC_SUCCESS);
        assert!(size >= 1);

        let mut rank = -1;
        assert_eq!(comm_rank(COMM_WORLD, &mut rank), RC_SUCCESS);
        assert!(rank >= 0 && rank < size);
    }

    #[test]
    fn self_is_size_one() {
        let mut size = 0;
        assert_eq!(comm_size(COMM_SELF, &mut size), RC_SUCCESS);
        assert_eq!(size, 1);
    }

    #[test]
    fn world_is_intracommunicator() {
        let mut flag = true;
        assert_eq!(comm_test_inter(COMM_WORLD, &mut flag), RC_SUCCESS);
        assert!(!flag);
    }

    #[test]
    fn remote_size_needs_intercommunicator() {
        let mut size = 0;
        assert_eq!(comm_remote_size(COMM_WORLD, &mut size), RC_ERR_COMM);
    }

    #[test]
    fn null_comm_is_rejected() {
        let mut size = 0;
        assert_eq!(comm_size(COMM_NULL, &mut size), RC_ERR_COMM);
    }

    #[test]
    fn predefined_comms_are_not_freeable() {
        let mut h = COMM_WORLD;
        assert_eq!(comm_free(&mut h), RC_ERR_COMM);
        assert_eq!(h, COMM_WORLD);
    }
}
