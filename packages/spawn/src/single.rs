//! Launching one executable across several ranks.

use mpix_core::{Communicator, InfoMap};
use mpix_ll_runtime as ll;

use crate::argv::{marshal, ArgvPair};
use crate::checks::{
    check_command, check_intracomm, check_maxprocs, check_root, check_total_maxprocs, expect_rc,
};
use crate::result::{Intercommunicator, SpawnResult};

/// Configuration for launching `maxprocs` copies of one executable.
///
/// Setters validate immediately and chain; [`spawn`] consumes the
/// configuration, so result queries only exist on [`SpawnResult`] - there
/// is no way to ask a launch for its result before it happened.
///
/// # Example
///
/// ```rust,no_run
/// use mpix_spawn::SingleSpawner;
///
/// let mut spawner = SingleSpawner::new("worker", 4);
/// spawner.add_argv("-verbose").add_argv(("-n", 4));
/// let result = spawner.spawn_with_errcodes();
/// assert!(result.maxprocs_processes_spawned());
/// ```
///
/// [`spawn`]: SingleSpawner::spawn
#[derive(Debug, Clone)]
pub struct SingleSpawner {
    command: String,
    maxprocs: i32,
    root: i32,
    comm: Communicator,
    info: InfoMap,
    argv: Vec<ArgvPair>,
}

impl SingleSpawner {
    /// Configure a launch of `maxprocs` copies of `command`.
    ///
    /// Root defaults to rank 0 of the world communicator; the spawn info
    /// defaults to the null map.
    #[track_caller]
    pub fn new(command: impl Into<String>, maxprocs: i32) -> SingleSpawner {
        let command = command.into();
        check_command(&command);
        check_maxprocs(maxprocs);
        check_total_maxprocs(maxprocs as i64);
        SingleSpawner {
            command,
            maxprocs,
            root: 0,
            comm: Communicator::world(),
            info: InfoMap::null(),
            argv: Vec::new(),
        }
    }

    #[track_caller]
    pub fn set_command(&mut self, command: impl Into<String>) -> &mut Self {
        let command = command.into();
        check_command(&command);
        self.command = command;
        self
    }

    #[track_caller]
    pub fn set_maxprocs(&mut self, maxprocs: i32) -> &mut Self {
        check_maxprocs(maxprocs);
        check_total_maxprocs(maxprocs as i64);
        self.maxprocs = maxprocs;
        self
    }

    /// Set the rank that drives the collective spawn call.
    #[track_caller]
    pub fn set_root(&mut self, root: i32) -> &mut Self {
        check_root(root, &self.comm);
        self.root = root;
        self
    }

    /// Set the intracommunicator whose processes take part in the spawn.
    #[track_caller]
    pub fn set_communicator(&mut self, comm: Communicator) -> &mut Self {
        check_intracomm(&comm);
        check_root(self.root, &comm);
        self.comm = comm;
        self
    }

    /// Attach an info map of launch attributes.
    pub fn set_spawn_info(&mut self, info: InfoMap) -> &mut Self {
        self.info = info;
        self
    }

    /// Append one argument: a bare token or a `(key, value)` pair.
    #[track_caller]
    pub fn add_argv(&mut self, token: impl Into<ArgvPair>) -> &mut Self {
        self.argv.push(token.into());
        self
    }

    /// Append a sequence of arguments.
    #[track_caller]
    pub fn extend_argv<I>(&mut self, tokens: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<ArgvPair>,
    {
        self.argv.extend(tokens.into_iter().map(Into::into));
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn maxprocs(&self) -> i32 {
        self.maxprocs
    }

    pub fn root(&self) -> i32 {
        self.root
    }

    pub fn communicator(&self) -> Communicator {
        self.comm
    }

    pub fn spawn_info(&self) -> &InfoMap {
        &self.info
    }

    pub fn argv(&self) -> &[ArgvPair] {
        &self.argv
    }

    /// Launch, discarding per-rank error codes.
    #[track_caller]
    pub fn spawn(self) -> SpawnResult {
        self.launch(false)
    }

    /// Launch, collecting one error code per spawned rank.
    #[track_caller]
    pub fn spawn_with_errcodes(self) -> SpawnResult {
        self.launch(true)
    }

    #[track_caller]
    fn launch(self, want_errcodes: bool) -> SpawnResult {
        // Setters validate individually; re-assert the cross-field
        // invariants as they stand at launch.
        check_command(&self.command);
        check_maxprocs(self.maxprocs);
        check_total_maxprocs(self.maxprocs as i64);
        check_intracomm(&self.comm);
        check_root(self.root, &self.comm);

        let argv = marshal(&self.argv);
        log::debug!(
            "spawning {} x {} (argv: {:?})",
            self.maxprocs,
            self.command,
            argv
        );

        let mut intercomm = ll::COMM_NULL;
        let mut errcodes = Vec::new();
        let rc = ll::comm_spawn(
            &self.command,
            &argv,
            self.maxprocs,
            self.info.handle(),
            self.root,
            self.comm.handle(),
            &mut intercomm,
            want_errcodes.then_some(&mut errcodes),
        );
        expect_rc(rc, "comm_spawn");

        SpawnResult::new(
            Intercommunicator::from_handle(intercomm),
            want_errcodes.then_some(errcodes),
            self.maxprocs,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let spawner = SingleSpawner::new("worker", 4);
        assert_eq!(spawner.command(), "worker");
        assert_eq!(spawner.maxprocs(), 4);
        assert_eq!(spawner.root(), 0);
        assert_eq!(spawner.communicator(), Communicator::world());
        assert!(spawner.spawn_info().is_null());
        assert!(spawner.argv().is_empty());
    }

    #[test]
    fn setters_chain() {
        let mut spawner = SingleSpawner::new("worker", 4);
        spawner
            .set_command("other")
            .set_maxprocs(2)
            .set_root(0)
            .add_argv("-verbose")
            .add_argv(("-n", 2));
        assert_eq!(spawner.command(), "other");
        assert_eq!(spawner.maxprocs(), 2);
        assert_eq!(spawner.argv().len(), 2);
        assert_eq!(spawner.argv()[1].value(), "2");
    }

    #[test]
    fn extend_argv_accepts_mixed_tokens() {
        let mut spawner = SingleSpawner::new("worker", 1);
        spawner.extend_argv(["-a", "-b"]);
        spawner.extend_argv([("-n", 1), ("-m", 2)]);
        assert_eq!(spawner.argv().len(), 4);
        assert!(spawner.argv()[0].is_bare());
        assert!(!spawner.argv()[2].is_bare());
    }

    #[test]
    fn spawn_info_is_carried() {
        let mut spawner = SingleSpawner::new("worker", 1);
        let info = mpix_core::info_map! { "wdir" => "/tmp" };
        spawner.set_spawn_info(info);
        assert_eq!(spawner.spawn_info().get("wdir").unwrap(), "/tmp");
    }

    #[test]
    fn spawn_with_errcodes_reports_failures() {
        let result = SingleSpawner::new("mpix-no-such-executable", 2).spawn_with_errcodes();
        assert_eq!(result.errcodes().unwrap(), [ll::RC_ERR_SPAWN, ll::RC_ERR_SPAWN]);
        assert_eq!(result.number_of_spawned_processes(), 0);
        assert!(!result.maxprocs_processes_spawned());
    }

    #[test]
    #[should_panic(expected = "non-empty")]
    fn empty_command_is_fatal() {
        let _ = SingleSpawner::new("", 1);
    }

    #[test]
    #[should_panic(expected = "maxprocs")]
    fn zero_maxprocs_is_fatal() {
        let _ = SingleSpawner::new("worker", 0);
    }

    #[test]
    #[should_panic(expected = "maxprocs")]
    fn negative_maxprocs_is_fatal() {
        let _ = SingleSpawner::new("worker", -3);
    }

    #[test]
    #[should_panic(expected = "root rank")]
    fn out_of_communicator_root_is_fatal() {
        let mut spawner = SingleSpawner::new("worker", 1);
        spawner.set_root(999);
    }
}
