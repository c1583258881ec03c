//! Process-spawn primitives.
//!
//! The conforming runtime launches real OS processes. Children are told
//! where they sit in the spawned group through `MPIX_RANK`,
//! `MPIX_WORLD_SIZE`, and `MPIX_PARENT_PID`; ranks are numbered globally
//! across the executable blocks of a multiple-spawn, in block order.
//!
//! A failed launch is a per-rank event: the slot's errcode becomes
//! `RC_ERR_SPAWN` and the call keeps going. The call itself only fails
//! when an argument or handle was illegal.

use std::process::Command;

use crate::env::ensure_init;
use crate::handles::{CommHandle, InfoHandle};
use crate::rc::{Rc, RC_ERR_ARG, RC_ERR_COMM, RC_ERR_INFO, RC_ERR_OTHER, RC_ERR_ROOT, RC_ERR_SPAWN, RC_SUCCESS};
use crate::registry::{lock, next_comm_handle, CommObject, COMM_REGISTRY, INFO_REGISTRY};

/// The reserved info key naming the child working directory.
const WDIR_KEY: &str = "wdir";

/// Launch `maxprocs` copies of one executable.
///
/// `errcodes`, when requested, receives one code per spawned rank.
/// `intercomm` receives the handle bridging to the child group.
#[allow(clippy::too_many_arguments)]
pub fn comm_spawn(
    command: &str,
    argv: &[String],
    maxprocs: i32,
    info: InfoHandle,
    root: i32,
    comm: CommHandle,
    intercomm: &mut CommHandle,
    errcodes: Option<&mut Vec<Rc>>,
) -> Rc {
    let commands = [command.to_string()];
    let argvs = [argv.to_vec()];
    comm_spawn_multiple(
        &commands,
        &argvs,
        &[maxprocs],
        &[info],
        root,
        comm,
        intercomm,
        errcodes,
    )
}

/// Launch several executables at once, `maxprocs[i]` copies of the `i`th.
///
/// All parallel arrays must have the same non-zero length. Ranks are
/// numbered globally across blocks; `errcodes`, when requested, has
/// `sum(maxprocs)` entries in that order.
#[allow(clippy::too_many_arguments)]
pub fn comm_spawn_multiple(
    commands: &[String],
    argvs: &[Vec<String>],
    maxprocs: &[i32],
    infos: &[InfoHandle],
    root: i32,
    comm: CommHandle,
    intercomm: &mut CommHandle,
    errcodes: Option<&mut Vec<Rc>>,
) -> Rc {
    if !ensure_init() {
        return RC_ERR_OTHER;
    }

    let count = commands.len();
    if count == 0
        || argvs.len() != count
        || maxprocs.len() != count
        || infos.len() != count
    {
        return RC_ERR_ARG;
    }
    if commands.iter().any(|c| c.is_empty()) {
        return RC_ERR_ARG;
    }
    if maxprocs.iter().any(|&n| n <= 0) {
        return RC_ERR_ARG;
    }
    let total: i64 = maxprocs.iter().map(|&n| n as i64).sum();
    if total > i32::MAX as i64 {
        return RC_ERR_ARG;
    }
    let total = total as i32;

    // Root must be a rank of the (intra)communicator driving the spawn.
    {
        let comms = lock(&COMM_REGISTRY);
        match comms.get(&comm.0) {
            Some(CommObject::Intra { size, .. }) => {
                if root < 0 || root >= *size {
                    return RC_ERR_ROOT;
                }
            }
            Some(CommObject::Inter { .. }) => return RC_ERR_COMM,
            None => return RC_ERR_COMM,
        }
    }

    // Resolve per-block working directories up front so handle errors
    // surface before anything launches.
    let mut wdirs: Vec<Option<String>> = Vec::with_capacity(count);
    {
        let registry = lock(&INFO_REGISTRY);
        for info in infos {
            if info.is_null() {
                wdirs.push(None);
                continue;
            }
            match registry.get(&info.0) {
                Some(obj) => {
                    let wdir = obj
                        .find(WDIR_KEY)
                        .map(|i| obj.entries[i].1.clone());
                    wdirs.push(wdir);
                }
                None => return RC_ERR_INFO,
            }
        }
    }

    let parent_pid = std::process::id();
    let mut children = Vec::with_capacity(total as usize);
    let mut codes = Vec::with_capacity(total as usize);
    let mut grank: i32 = 0;

    for (i, command) in commands.iter().enumerate() {
        for _ in 0..maxprocs[i] {
            let mut cmd = Command::new(command);
            cmd.args(&argvs[i])
                .env("MPIX_RANK", grank.to_string())
                .env("MPIX_WORLD_SIZE", total.to_string())
                .env("MPIX_PARENT_PID", parent_pid.to_string());
            if let Some(wdir) = &wdirs[i] {
                cmd.current_dir(wdir);
            }
            match cmd.spawn() {
                Ok(child) => {
                    children.push(child);
                    codes.push(RC_SUCCESS);
                }
                Err(e) => {
                    log::warn!("failed to spawn rank {} ({}): {}", grank, command, e);
                    codes.push(RC_ERR_SPAWN);
                }
            }
            grank += 1;
        }
    }

    log::debug!(
        "spawned {}/{} processes across {} executables",
        children.len(),
        total,
        count
    );

    let h = next_comm_handle();
    lock(&COMM_REGISTRY).insert(
        h.0,
        CommObject::Inter {
            remote_size: total,
            children,
        },
    );
    *intercomm = h;

    if let Some(out) = errcodes {
        out.clear();
        out.extend_from_slice(&codes);
    }
    RC_SUCCESS
}
