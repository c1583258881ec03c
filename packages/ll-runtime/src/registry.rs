//! Process-wide object registries behind opaque handles.
//!
//! Every native object lives here, keyed by its handle id. Handle
//! generation uses atomic increment; registry access goes through a mutex.
//! A poisoned mutex is recovered - the data is still valid, the panicking
//! thread just never got to finish its call.

use std::collections::HashMap;
use std::process::Child;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use lazy_static::lazy_static;

use crate::handles::{CommHandle, InfoHandle, FIRST_DYNAMIC_HANDLE};

static INFO_COUNTER: AtomicU64 = AtomicU64::new(FIRST_DYNAMIC_HANDLE);
static COMM_COUNTER: AtomicU64 = AtomicU64::new(FIRST_DYNAMIC_HANDLE);

lazy_static! {
    pub(crate) static ref INFO_REGISTRY: Mutex<HashMap<u64, InfoObject>> =
        Mutex::new(HashMap::new());
    pub(crate) static ref COMM_REGISTRY: Mutex<HashMap<u64, CommObject>> =
        Mutex::new(HashMap::new());
}

/// A native info object: insertion-ordered key/value pairs.
#[derive(Debug, Default, Clone)]
pub(crate) struct InfoObject {
    pub entries: Vec<(String, String)>,
}

impl InfoObject {
    pub fn find(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Insert-or-assign preserving insertion order.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.find(key) {
            Some(i) => self.entries[i].1 = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }
}

/// A native communicator object.
#[derive(Debug)]
pub(crate) enum CommObject {
    /// A process group this process belongs to.
    Intra { size: i32, rank: i32 },
    /// A bridge between this group and a spawned child group. Children are
    /// reaped when the communicator is freed.
    Inter {
        remote_size: i32,
        children: Vec<Child>,
    },
}

pub(crate) fn next_info_handle() -> InfoHandle {
    InfoHandle(INFO_COUNTER.fetch_add(1, Ordering::SeqCst))
}

pub(crate) fn next_comm_handle() -> CommHandle {
    CommHandle(COMM_COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// Lock a registry, recovering from poison.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
