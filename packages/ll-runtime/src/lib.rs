//! LLRuntime: Low-Level MPIX Runtime Primitives
//!
//! This is the narrow waist of the MPIX stack. Everything at this level speaks
//! the native runtime's dialect: opaque handles, integer return codes, and
//! out-parameters - no value types, no ownership, no exceptions.
//!
//! Use this layer for:
//! - The exact call shapes the message-passing standard defines
//! - Interop code that must hold raw handles across a boundary
//! - The facade layers above, which convert this protocol into value types
//!
//! Handles issued here are process-wide. The predefined sentinels
//! ([`INFO_NULL`], [`INFO_ENV`], [`COMM_WORLD`], ...) are valid from the
//! first runtime call until [`finalize`] and must never be freed.
//!
//! # Example
//!
//! ```rust
//! use mpix_ll_runtime::{self as ll, INFO_NULL, RC_SUCCESS};
//!
//! let mut handle = INFO_NULL;
//! assert_eq!(ll::info_create(&mut handle), RC_SUCCESS);
//! assert_eq!(ll::info_set(handle, "host", "node0"), RC_SUCCESS);
//!
//! let mut value = String::new();
//! let mut flag = false;
//! assert_eq!(ll::info_get(handle, "host", &mut value, &mut flag), RC_SUCCESS);
//! assert!(flag);
//! assert_eq!(value, "node0");
//!
//! assert_eq!(ll::info_free(&mut handle), RC_SUCCESS);
//! assert_eq!(handle, INFO_NULL);
//! ```

mod comm;
mod env;
mod handles;
mod info;
mod rc;
mod registry;
mod spawn;

pub use comm::{comm_free, comm_rank, comm_remote_size, comm_size, comm_test_inter};
pub use env::{
    finalize, finalized, init_thread, initialized, processor_name, universe_size, wtick, wtime,
};
pub use handles::{
    CommHandle, InfoHandle, COMM_NULL, COMM_SELF, COMM_WORLD, INFO_ENV, INFO_NULL,
    THREAD_FUNNELED, THREAD_MULTIPLE, THREAD_SERIALIZED, THREAD_SINGLE,
};
pub use info::{
    info_create, info_delete, info_dup, info_free, info_get, info_get_nkeys, info_get_nthkey,
    info_get_valuelen, info_set,
};
pub use rc::{
    rc_string, Rc, MAX_INFO_KEY, MAX_INFO_VAL, RC_ERR_ARG, RC_ERR_COMM, RC_ERR_INFO,
    RC_ERR_INFO_KEY, RC_ERR_INFO_NOKEY, RC_ERR_INFO_VALUE, RC_ERR_OTHER, RC_ERR_ROOT,
    RC_ERR_SPAWN, RC_SUCCESS,
};
pub use spawn::{comm_spawn, comm_spawn_multiple};
