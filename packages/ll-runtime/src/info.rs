//! Info object primitives.
//!
//! The native call shapes: status comes back as a return code, data comes
//! back through out-parameters, and absence is reported through a flag
//! rather than an error. Keys and values are validated here exactly as the
//! standard prescribes - non-empty and under the runtime maxima - but no
//! further meaning is attached to them.

use crate::env::ensure_init;
use crate::handles::{InfoHandle, INFO_NULL};
use crate::rc::{
    Rc, MAX_INFO_KEY, MAX_INFO_VAL, RC_ERR_INFO, RC_ERR_INFO_KEY, RC_ERR_INFO_NOKEY,
    RC_ERR_INFO_VALUE, RC_ERR_OTHER, RC_SUCCESS,
};
use crate::registry::{lock, next_info_handle, InfoObject, INFO_REGISTRY};

fn key_ok(key: &str) -> bool {
    !key.is_empty() && key.len() < MAX_INFO_KEY
}

fn value_ok(value: &str) -> bool {
    !value.is_empty() && value.len() < MAX_INFO_VAL
}

/// Create a fresh, empty info object.
pub fn info_create(handle: &mut InfoHandle) -> Rc {
    if !ensure_init() {
        return RC_ERR_OTHER;
    }
    let h = next_info_handle();
    lock(&INFO_REGISTRY).insert(h.0, InfoObject::default());
    log::debug!("info_create -> {:?}", h);
    *handle = h;
    RC_SUCCESS
}

/// Duplicate an info object, entries and order included.
pub fn info_dup(source: InfoHandle, dest: &mut InfoHandle) -> Rc {
    if !ensure_init() {
        return RC_ERR_OTHER;
    }
    let mut registry = lock(&INFO_REGISTRY);
    let copy = match registry.get(&source.0) {
        Some(obj) => obj.clone(),
        None => return RC_ERR_INFO,
    };
    let h = next_info_handle();
    registry.insert(h.0, copy);
    log::debug!("info_dup {:?} -> {:?}", source, h);
    *dest = h;
    RC_SUCCESS
}

/// Release an info object and reset the handle to [`INFO_NULL`].
///
/// The sentinels are not freeable.
pub fn info_free(handle: &mut InfoHandle) -> Rc {
    if !ensure_init() {
        return RC_ERR_OTHER;
    }
    if handle.0 < crate::handles::FIRST_DYNAMIC_HANDLE {
        return RC_ERR_INFO;
    }
    if lock(&INFO_REGISTRY).remove(&handle.0).is_none() {
        return RC_ERR_INFO;
    }
    log::debug!("info_free {:?}", handle);
    *handle = INFO_NULL;
    RC_SUCCESS
}

/// Store `value` under `key`, overwriting in place if the key exists.
pub fn info_set(handle: InfoHandle, key: &str, value: &str) -> Rc {
    if !ensure_init() {
        return RC_ERR_OTHER;
    }
    if !key_ok(key) {
        return RC_ERR_INFO_KEY;
    }
    if !value_ok(value) {
        return RC_ERR_INFO_VALUE;
    }
    match lock(&INFO_REGISTRY).get_mut(&handle.0) {
        Some(obj) => {
            obj.set(key, value);
            RC_SUCCESS
        }
        None => RC_ERR_INFO,
    }
}

/// Remove `key`. `RC_ERR_INFO_NOKEY` if it is not present.
pub fn info_delete(handle: InfoHandle, key: &str) -> Rc {
    if !ensure_init() {
        return RC_ERR_OTHER;
    }
    if !key_ok(key) {
        return RC_ERR_INFO_KEY;
    }
    match lock(&INFO_REGISTRY).get_mut(&handle.0) {
        Some(obj) => match obj.find(key) {
            Some(i) => {
                obj.entries.remove(i);
                RC_SUCCESS
            }
            None => RC_ERR_INFO_NOKEY,
        },
        None => RC_ERR_INFO,
    }
}

/// Fetch the value stored under `key`.
///
/// `flag` reports presence; when `false`, `value` is left untouched.
pub fn info_get(handle: InfoHandle, key: &str, value: &mut String, flag: &mut bool) -> Rc {
    if !ensure_init() {
        return RC_ERR_OTHER;
    }
    if !key_ok(key) {
        return RC_ERR_INFO_KEY;
    }
    match lock(&INFO_REGISTRY).get(&handle.0) {
        Some(obj) => {
            match obj.find(key) {
                Some(i) => {
                    *value = obj.entries[i].1.clone();
                    *flag = true;
                }
                None => *flag = false,
            }
            RC_SUCCESS
        }
        None => RC_ERR_INFO,
    }
}

/// Fetch the length of the value stored under `key`.
///
/// `flag` reports presence; when `false`, `valuelen` is left untouched.
pub fn info_get_valuelen(
    handle: InfoHandle,
    key: &str,
    valuelen: &mut usize,
    flag: &mut bool,
) -> Rc {
    if !ensure_init() {
        return RC_ERR_OTHER;
    }
    if !key_ok(key) {
        return RC_ERR_INFO_KEY;
    }
    match lock(&INFO_REGISTRY).get(&handle.0) {
        Some(obj) => {
            match obj.find(key) {
                Some(i) => {
                    *valuelen = obj.entries[i].1.len();
                    *flag = true;
                }
                None => *flag = false,
            }
            RC_SUCCESS
        }
        None => RC_ERR_INFO,
    }
}

/// Number of keys currently stored.
pub fn info_get_nkeys(handle: InfoHandle, nkeys: &mut usize) -> Rc {
    if !ensure_init() {
        return RC_ERR_OTHER;
    }
    match lock(&INFO_REGISTRY).get(&handle.0) {
        Some(obj) => {
            *nkeys = obj.entries.len();
            RC_SUCCESS
        }
        None => RC_ERR_INFO,
    }
}

/// The `n`th key in insertion order. `RC_ERR_INFO_NOKEY` past the end.
pub fn info_get_nthkey(handle: InfoHandle, n: usize, key: &mut String) -> Rc {
    if !ensure_init() {
        return RC_ERR_OTHER;
    }
    match lock(&INFO_REGISTRY).get(&handle.0) {
        Some(obj) => match obj.entries.get(n) {
            Some((k, _)) => {
                *key = k.clone();
                RC_SUCCESS
            }
            None => RC_ERR_INFO_NOKEY,
        },
        None => RC_ERR_INFO,
    }
}
