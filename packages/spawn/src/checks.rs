//! Shared launch-parameter checks. All of these guard contract
//! preconditions and panic at the caller's location.

use mpix_core::{environment, Communicator};
use mpix_ll_runtime as ll;

#[track_caller]
pub(crate) fn expect_rc(rc: ll::Rc, op: &str) {
    if rc != ll::RC_SUCCESS {
        panic!("{} failed: {}", op, ll::rc_string(rc));
    }
}

#[track_caller]
pub(crate) fn check_command(command: &str) {
    if command.is_empty() {
        panic!("spawn commands must be non-empty");
    }
}

#[track_caller]
pub(crate) fn check_maxprocs(maxprocs: i32) {
    if maxprocs <= 0 || maxprocs == i32::MAX {
        panic!("maxprocs must be in (0, {}), got {}", i32::MAX, maxprocs);
    }
}

/// Sum of all requested processes must stay representable and, when the
/// runtime publishes a universe size, within it.
#[track_caller]
pub(crate) fn check_total_maxprocs(total: i64) {
    if total > i32::MAX as i64 {
        panic!("total maxprocs {} exceeds the representable range", total);
    }
    if let Some(universe) = environment::universe_size() {
        if total as u128 > universe as u128 {
            panic!(
                "total maxprocs {} exceeds the universe size {}",
                total, universe
            );
        }
    }
}

#[track_caller]
pub(crate) fn check_root(root: i32, comm: &Communicator) {
    let size = comm.size();
    if root < 0 || root >= size {
        panic!(
            "root rank {} is outside the communicator (size {})",
            root, size
        );
    }
}

#[track_caller]
pub(crate) fn check_intracomm(comm: &Communicator) {
    if comm.is_inter() {
        panic!("spawns must be driven by an intracommunicator");
    }
}
