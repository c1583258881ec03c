//! Runtime lifecycle: initialization window, clocks, identity queries.
//!
//! The runtime auto-initializes on first use (the singleton launch model:
//! world size 1, rank 0) unless the process was started by a spawner, in
//! which case `MPIX_RANK` / `MPIX_WORLD_SIZE` describe its place in the
//! spawned group. `MPIX_UNIVERSE_SIZE` publishes the universe size
//! attribute; unset means unknown. `MPIX_THREAD_LEVEL` names the
//! thread-support level the runtime grants (default `MPI_THREAD_MULTIPLE`).

use std::sync::Mutex;
use std::time::Instant;

use lazy_static::lazy_static;

use crate::handles::{COMM_SELF, COMM_WORLD, THREAD_MULTIPLE, THREAD_SINGLE};
use crate::rc::{Rc, RC_ERR_ARG, RC_ERR_OTHER, RC_SUCCESS};
use crate::registry::{lock, CommObject, InfoObject, COMM_REGISTRY, INFO_REGISTRY};

#[derive(Default)]
struct EnvState {
    initialized: bool,
    finalized: bool,
    provided: i32,
    universe: Option<usize>,
    start: Option<Instant>,
}

lazy_static! {
    static ref ENV: Mutex<EnvState> = Mutex::new(EnvState::default());
}

fn parse_thread_level(name: &str) -> Option<i32> {
    match name {
        "MPI_THREAD_SINGLE" => Some(crate::handles::THREAD_SINGLE),
        "MPI_THREAD_FUNNELED" => Some(crate::handles::THREAD_FUNNELED),
        "MPI_THREAD_SERIALIZED" => Some(crate::handles::THREAD_SERIALIZED),
        "MPI_THREAD_MULTIPLE" => Some(THREAD_MULTIPLE),
        _ => None,
    }
}

fn thread_level_name(level: i32) -> &'static str {
    match level {
        crate::handles::THREAD_SINGLE => "MPI_THREAD_SINGLE",
        crate::handles::THREAD_FUNNELED => "MPI_THREAD_FUNNELED",
        crate::handles::THREAD_SERIALIZED => "MPI_THREAD_SERIALIZED",
        _ => "MPI_THREAD_MULTIPLE",
    }
}

/// Initialize on first use. Returns `false` once the runtime is finalized.
pub(crate) fn ensure_init() -> bool {
    let mut env = lock(&ENV);
    if env.finalized {
        return false;
    }
    if env.initialized {
        return true;
    }

    let rank: i32 = std::env::var("MPIX_RANK")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let world_size: i32 = std::env::var("MPIX_WORLD_SIZE")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|&n| n > 0)
        .unwrap_or(1);
    let universe: Option<usize> = std::env::var("MPIX_UNIVERSE_SIZE")
        .ok()
        .and_then(|v| v.parse().ok());
    let provided = std::env::var("MPIX_THREAD_LEVEL")
        .ok()
        .and_then(|v| parse_thread_level(&v))
        .unwrap_or(THREAD_MULTIPLE);

    {
        let mut comms = lock(&COMM_REGISTRY);
        comms.insert(
            COMM_WORLD.0,
            CommObject::Intra {
                size: world_size,
                rank,
            },
        );
        comms.insert(COMM_SELF.0, CommObject::Intra { size: 1, rank: 0 });
    }

    {
        let command = std::env::current_exe()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "unknown".to_string());
        let mut info_env = InfoObject::default();
        info_env.set("command", &command);
        info_env.set("maxprocs", &world_size.to_string());
        info_env.set("thread_level", thread_level_name(provided));
        lock(&INFO_REGISTRY).insert(crate::handles::INFO_ENV.0, info_env);
    }

    env.initialized = true;
    env.provided = provided;
    env.universe = universe;
    env.start = Some(Instant::now());

    log::debug!(
        "runtime initialized: rank {}/{}, thread level {}",
        rank,
        world_size,
        thread_level_name(provided)
    );
    true
}

/// Initialize with a required thread-support level.
///
/// `provided` receives the level the runtime actually grants, which may be
/// lower than `required`. Deciding whether that is acceptable belongs to
/// the caller.
pub fn init_thread(required: i32, provided: &mut i32) -> Rc {
    if !(THREAD_SINGLE..=THREAD_MULTIPLE).contains(&required) {
        return RC_ERR_ARG;
    }
    if !ensure_init() {
        return RC_ERR_OTHER;
    }
    *provided = lock(&ENV).provided;
    RC_SUCCESS
}

/// Whether the runtime has been initialized.
pub fn initialized(flag: &mut bool) -> Rc {
    *flag = lock(&ENV).initialized;
    RC_SUCCESS
}

/// Whether the runtime has been finalized.
pub fn finalized(flag: &mut bool) -> Rc {
    *flag = lock(&ENV).finalized;
    RC_SUCCESS
}

/// Close the runtime window: reap spawned children, drop every object.
///
/// Any call other than [`finalized`] / [`initialized`] after this returns
/// `RC_ERR_OTHER`.
pub fn finalize() -> Rc {
    let mut env = lock(&ENV);
    if env.finalized {
        return RC_ERR_OTHER;
    }

    let mut comms = lock(&COMM_REGISTRY);
    for (_, comm) in comms.drain() {
        if let CommObject::Inter { mut children, .. } = comm {
            for child in &mut children {
                if let Err(e) = child.wait() {
                    log::warn!("failed to reap child at finalize: {}", e);
                }
            }
        }
    }
    drop(comms);
    lock(&INFO_REGISTRY).clear();

    env.finalized = true;
    log::debug!("runtime finalized");
    RC_SUCCESS
}

/// Universe size attribute. `flag` is `false` when the runtime does not
/// know it (the attribute is then undefined).
pub fn universe_size(size: &mut usize, flag: &mut bool) -> Rc {
    if !ensure_init() {
        return RC_ERR_OTHER;
    }
    match lock(&ENV).universe {
        Some(n) => {
            *size = n;
            *flag = true;
        }
        None => *flag = false,
    }
    RC_SUCCESS
}

/// Seconds elapsed on the runtime's monotonic clock.
pub fn wtime() -> f64 {
    if !ensure_init() {
        return 0.0;
    }
    match lock(&ENV).start {
        Some(start) => start.elapsed().as_secs_f64(),
        None => 0.0,
    }
}

/// Resolution of [`wtime`] in seconds.
pub fn wtick() -> f64 {
    1e-9
}

/// Name of the processor this rank runs on.
pub fn processor_name(name: &mut String) -> Rc {
    if !ensure_init() {
        return RC_ERR_OTHER;
    }
    *name = std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
    RC_SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_thread_grants_a_level() {
        let mut provided = -1;
        assert_eq!(init_thread(THREAD_SINGLE, &mut provided), RC_SUCCESS);
        assert!((THREAD_SINGLE..=THREAD_MULTIPLE).contains(&provided));
    }

    #[test]
    fn init_thread_rejects_bogus_level() {
        let mut provided = -1;
        assert_eq!(init_thread(42, &mut provided), RC_ERR_ARG);
    }

    #[test]
    fn initialized_after_first_use() {
        let mut provided = -1;
        init_thread(THREAD_SINGLE, &mut provided);
        let mut flag = false;
        assert_eq!(initialized(&mut flag), RC_SUCCESS);
        assert!(flag);
    }

    #[test]
    fn wtime_is_monotonic() {
        let a = wtime();
        let b = wtime();
        assert!(b >= a);
        assert!(wtick() > 0.0);
    }

    #[test]
    fn processor_name_is_nonempty() {
        let mut name = String::new();
        assert_eq!(processor_name(&mut name), RC_SUCCESS);
        assert!(!name.is_empty());
    }
}
