//! The post-launch surface: intercommunicator ownership and per-rank
//! error codes.

use std::io;

use mpix_ll_runtime as ll;

/// The communicator bridging this process group and a spawned child
/// group. Owns its handle; releasing it reaps the children.
#[derive(Debug)]
pub struct Intercommunicator {
    handle: ll::CommHandle,
}

impl Intercommunicator {
    #[track_caller]
    pub(crate) fn from_handle(handle: ll::CommHandle) -> Intercommunicator {
        if handle.is_null() {
            panic!("spawn produced a null intercommunicator");
        }
        Intercommunicator { handle }
    }

    /// The underlying native handle.
    pub fn handle(&self) -> ll::CommHandle {
        self.handle
    }

    /// Size of the spawned (remote) group.
    #[track_caller]
    pub fn remote_size(&self) -> i32 {
        let mut size = 0;
        let rc = ll::comm_remote_size(self.handle, &mut size);
        if rc != ll::RC_SUCCESS {
            panic!("comm_remote_size failed: {}", ll::rc_string(rc));
        }
        size
    }
}

impl Drop for Intercommunicator {
    fn drop(&mut self) {
        // Best-effort: a failure here means the window already closed.
        let _ = ll::comm_free(&mut self.handle);
    }
}

/// What a launch produced. Read-only.
#[derive(Debug)]
pub struct SpawnResult {
    intercomm: Intercommunicator,
    errcodes: Option<Vec<ll::Rc>>,
    requested: i32,
}

impl SpawnResult {
    pub(crate) fn new(
        intercomm: Intercommunicator,
        errcodes: Option<Vec<ll::Rc>>,
        requested: i32,
    ) -> SpawnResult {
        SpawnResult {
            intercomm,
            errcodes,
            requested,
        }
    }

    /// The communicator bridging to the spawned group.
    pub fn intercommunicator(&self) -> &Intercommunicator {
        &self.intercomm
    }

    /// Per-rank error codes, when the launch requested them.
    pub fn errcodes(&self) -> Option<&[ll::Rc]> {
        self.errcodes.as_deref()
    }

    /// How many processes actually started.
    ///
    /// Counted from the error codes when present; otherwise derived from
    /// the intercommunicator's remote group.
    pub fn number_of_spawned_processes(&self) -> i32 {
        match &self.errcodes {
            Some(codes) => codes.iter().filter(|&&code| code == ll::RC_SUCCESS).count() as i32,
            None => self.intercomm.remote_size(),
        }
    }

    /// Whether every requested process started.
    pub fn maxprocs_processes_spawned(&self) -> bool {
        self.number_of_spawned_processes() == self.requested
    }

    /// Write one line per failed rank to `sink`.
    pub fn print_errors_to(&self, sink: &mut impl io::Write) -> io::Result<()> {
        match &self.errcodes {
            None => writeln!(sink, "error codes were not requested at spawn"),
            Some(codes) => {
                for (rank, &code) in codes.iter().enumerate() {
                    if code != ll::RC_SUCCESS {
                        writeln!(sink, "rank {}: error {} ({})", rank, code, ll::rc_string(code))?;
                    }
                }
                Ok(())
            }
        }
    }
}
