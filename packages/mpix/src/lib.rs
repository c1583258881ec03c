//! MPIX: a type-safe facade over a message-passing runtime.
//!
//! The native interface underneath is a C-level standard: opaque handles,
//! out-parameter calls, sentinel-based errors. MPIX converts it into value
//! types with deterministic lifetimes - attribute maps that free their
//! handle exactly when they should, spawners that validate before they
//! launch, and typed errors that carry their source location.
//!
//! The layers, bottom up:
//! - [`ll`]: the native call shapes (re-exported from `mpix-ll-runtime`)
//! - info maps, thread support, communicators (from `mpix-core`)
//! - spawners and spawn results (from `mpix-spawn`)
//!
//! # Example
//!
//! ```rust,no_run
//! use mpix::{info_map, MultiSpawner, SingleSpawner, ThreadSupport};
//!
//! let provided = mpix::environment::init(ThreadSupport::Single)?;
//! assert!(provided >= ThreadSupport::Single);
//!
//! let mut workers = SingleSpawner::new("worker", 4);
//! workers
//!     .add_argv(("-threads", 2))
//!     .set_spawn_info(info_map! { "wdir" => "/tmp" });
//!
//! let monitor = SingleSpawner::new("monitor", 1);
//! let result = MultiSpawner::from_spawners([workers, monitor]).spawn_with_errcodes();
//! if !result.maxprocs_processes_spawned() {
//!     result.print_errors_to(&mut std::io::stderr())?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use mpix_core::{
    environment, Communicator, Error, HandleOwner, InfoMap, Iter, IterMut, NativeResource, Proxy,
    SourceLocation, ThreadSupport,
};
pub use mpix_spawn::{ArgvPair, Intercommunicator, MultiSpawner, SingleSpawner, SpawnResult};

// The `info_map!` macro is exported at the `mpix_core` crate root; make it
// reachable here as well.
pub use mpix_core::info_map;

/// The low-level runtime surface, for interop that needs raw handles.
pub mod ll {
    pub use mpix_ll_runtime::*;
}
