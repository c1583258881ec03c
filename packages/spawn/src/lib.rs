//! MPIX Spawn: Process Launching
//!
//! Configuration objects for asking the runtime to start new processes:
//! - [`SingleSpawner`]: one executable across `maxprocs` ranks
//! - [`MultiSpawner`]: `K` executables in one collective launch
//! - [`SpawnResult`] / [`Intercommunicator`]: the post-launch surface
//!
//! Spawners validate every setter immediately and re-assert the aggregate
//! invariants at launch. `spawn` consumes the spawner; everything a launch
//! produced lives on the [`SpawnResult`].
//!
//! # Example
//!
//! ```rust,no_run
//! use mpix_spawn::{MultiSpawner, SingleSpawner};
//!
//! let mut workers = SingleSpawner::new("worker", 4);
//! workers.add_argv(("-threads", 2));
//!
//! let monitor = SingleSpawner::new("monitor", 1);
//! let result = MultiSpawner::from_spawners([workers, monitor]).spawn_with_errcodes();
//!
//! assert_eq!(result.errcodes().unwrap().len(), 5);
//! ```

mod argv;
mod checks;
mod multi;
mod result;
mod single;

pub use argv::ArgvPair;
pub use multi::MultiSpawner;
pub use result::{Intercommunicator, SpawnResult};
pub use single::SingleSpawner;
