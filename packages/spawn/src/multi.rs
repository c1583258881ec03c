//! Launching several executables in one collective spawn.

use mpix_core::{Communicator, Error, InfoMap, SourceLocation};
use mpix_ll_runtime as ll;

use crate::argv::{marshal, ArgvPair};
use crate::checks::{
    check_command, check_intracomm, check_maxprocs, check_root, check_total_maxprocs, expect_rc,
};
use crate::result::{Intercommunicator, SpawnResult};
use crate::single::SingleSpawner;

/// Configuration for launching `K >= 1` executables at once.
///
/// The per-executable sequences (commands, process counts, argv blocks,
/// info maps) stay parallel at all times. Bulk setters take exactly `K`
/// elements and treat a size mismatch as a violated precondition; the
/// `*_at` accessors are range-checked and return [`Error::OutOfRange`]
/// carrying both the offending index and the current size.
///
/// # Example
///
/// ```rust,no_run
/// use mpix_spawn::MultiSpawner;
///
/// let mut spawner = MultiSpawner::new([("a.out", 4), ("b.out", 2)]);
/// spawner.add_argvs([["-foo"], ["-bar"]]);
/// assert_eq!(spawner.total_maxprocs(), 6);
/// let result = spawner.spawn_with_errcodes();
/// ```
#[derive(Debug, Clone)]
pub struct MultiSpawner {
    commands: Vec<String>,
    maxprocs: Vec<i32>,
    argvs: Vec<Vec<ArgvPair>>,
    infos: Vec<InfoMap>,
    root: i32,
    comm: Communicator,
}

impl MultiSpawner {
    /// Configure a launch from `(command, maxprocs)` pairs.
    #[track_caller]
    pub fn new<I, C>(pairs: I) -> MultiSpawner
    where
        I: IntoIterator<Item = (C, i32)>,
        C: Into<String>,
    {
        let mut commands = Vec::new();
        let mut maxprocs = Vec::new();
        for (command, procs) in pairs {
            let command = command.into();
            check_command(&command);
            check_maxprocs(procs);
            commands.push(command);
            maxprocs.push(procs);
        }
        if commands.is_empty() {
            panic!("a multi spawner needs at least one executable");
        }
        check_total_maxprocs(maxprocs.iter().map(|&n| n as i64).sum());

        let count = commands.len();
        MultiSpawner {
            commands,
            maxprocs,
            argvs: vec![Vec::new(); count],
            infos: std::iter::repeat_with(InfoMap::null).take(count).collect(),
            root: 0,
            comm: Communicator::world(),
        }
    }

    /// Flatten existing spawners, in order, into one launch.
    ///
    /// All contributing spawners must agree on root and communicator.
    #[track_caller]
    pub fn from_spawners<I>(spawners: I) -> MultiSpawner
    where
        I: IntoIterator,
        I::Item: Into<MultiSpawner>,
    {
        let parts: Vec<MultiSpawner> = spawners.into_iter().map(Into::into).collect();
        let first = match parts.first() {
            Some(first) => (first.root, first.comm),
            None => panic!("a multi spawner needs at least one executable"),
        };
        if parts
            .iter()
            .any(|part| (part.root, part.comm) != first)
        {
            panic!("all contributing spawners must agree on root and communicator");
        }

        let mut merged = MultiSpawner {
            commands: Vec::new(),
            maxprocs: Vec::new(),
            argvs: Vec::new(),
            infos: Vec::new(),
            root: first.0,
            comm: first.1,
        };
        for part in parts {
            merged.commands.extend(part.commands);
            merged.maxprocs.extend(part.maxprocs);
            merged.argvs.extend(part.argvs);
            merged.infos.extend(part.infos);
        }
        check_total_maxprocs(merged.maxprocs.iter().map(|&n| n as i64).sum());
        merged
    }

    /// Number of executables, `K`.
    pub fn count(&self) -> usize {
        self.commands.len()
    }

    /// Sum of the per-executable process counts.
    pub fn total_maxprocs(&self) -> i32 {
        let total: i64 = self.maxprocs.iter().map(|&n| n as i64).sum();
        // Kept representable by every setter.
        total as i32
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn maxprocs(&self) -> &[i32] {
        &self.maxprocs
    }

    pub fn spawn_infos(&self) -> &[InfoMap] {
        &self.infos
    }

    pub fn root(&self) -> i32 {
        self.root
    }

    pub fn communicator(&self) -> Communicator {
        self.comm
    }

    #[track_caller]
    fn check_index(&self, index: usize) -> Result<(), Error> {
        if index >= self.count() {
            return Err(Error::OutOfRange {
                index,
                size: self.count(),
                location: SourceLocation::capture(),
            });
        }
        Ok(())
    }

    /// The command of executable `index`.
    #[track_caller]
    pub fn command_at(&self, index: usize) -> Result<&str, Error> {
        self.check_index(index)?;
        Ok(&self.commands[index])
    }

    /// The process count of executable `index`.
    #[track_caller]
    pub fn maxprocs_at(&self, index: usize) -> Result<i32, Error> {
        self.check_index(index)?;
        Ok(self.maxprocs[index])
    }

    /// The spawn info of executable `index`.
    #[track_caller]
    pub fn spawn_info_at(&self, index: usize) -> Result<&InfoMap, Error> {
        self.check_index(index)?;
        Ok(&self.infos[index])
    }

    /// The argv block of executable `index`.
    #[track_caller]
    pub fn argv_at(&self, index: usize) -> Result<&[ArgvPair], Error> {
        self.check_index(index)?;
        Ok(&self.argvs[index])
    }

    /// Replace the command of executable `index`.
    #[track_caller]
    pub fn set_command_at(
        &mut self,
        index: usize,
        command: impl Into<String>,
    ) -> Result<&mut Self, Error> {
        self.check_index(index)?;
        let command = command.into();
        check_command(&command);
        self.commands[index] = command;
        Ok(self)
    }

    /// Replace the process count of executable `index`.
    #[track_caller]
    pub fn set_maxprocs_at(&mut self, index: usize, maxprocs: i32) -> Result<&mut Self, Error> {
        self.check_index(index)?;
        check_maxprocs(maxprocs);
        let total: i64 = self
            .maxprocs
            .iter()
            .enumerate()
            .map(|(i, &n)| if i == index { maxprocs as i64 } else { n as i64 })
            .sum();
        check_total_maxprocs(total);
        self.maxprocs[index] = maxprocs;
        Ok(self)
    }

    /// Replace the spawn info of executable `index`.
    #[track_caller]
    pub fn set_spawn_info_at(&mut self, index: usize, info: InfoMap) -> Result<&mut Self, Error> {
        self.check_index(index)?;
        self.infos[index] = info;
        Ok(self)
    }

    /// Append one argument to the argv block of executable `index`.
    #[track_caller]
    pub fn add_argv_at(
        &mut self,
        index: usize,
        token: impl Into<ArgvPair>,
    ) -> Result<&mut Self, Error> {
        self.check_index(index)?;
        self.argvs[index].push(token.into());
        Ok(self)
    }

    /// Append a sequence of arguments to the argv block of executable
    /// `index`.
    #[track_caller]
    pub fn extend_argv_at<I>(&mut self, index: usize, tokens: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator,
        I::Item: Into<ArgvPair>,
    {
        self.check_index(index)?;
        self.argvs[index].extend(tokens.into_iter().map(Into::into));
        Ok(self)
    }

    /// Replace every command. Takes exactly `K` elements.
    #[track_caller]
    pub fn set_commands<I, C>(&mut self, commands: I) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        let commands: Vec<String> = commands.into_iter().map(Into::into).collect();
        self.check_bulk_len(commands.len(), "commands");
        for command in &commands {
            check_command(command);
        }
        self.commands = commands;
        self
    }

    /// Replace every process count. Takes exactly `K` elements.
    #[track_caller]
    pub fn set_maxprocs<I>(&mut self, maxprocs: I) -> &mut Self
    where
        I: IntoIterator<Item = i32>,
    {
        let maxprocs: Vec<i32> = maxprocs.into_iter().collect();
        self.check_bulk_len(maxprocs.len(), "maxprocs");
        for &procs in &maxprocs {
            check_maxprocs(procs);
        }
        check_total_maxprocs(maxprocs.iter().map(|&n| n as i64).sum());
        self.maxprocs = maxprocs;
        self
    }

    /// Replace every spawn info. Takes exactly `K` elements.
    #[track_caller]
    pub fn set_spawn_infos<I>(&mut self, infos: I) -> &mut Self
    where
        I: IntoIterator<Item = InfoMap>,
    {
        let infos: Vec<InfoMap> = infos.into_iter().collect();
        self.check_bulk_len(infos.len(), "spawn infos");
        self.infos = infos;
        self
    }

    /// Append one argv block per executable. Takes exactly `K` blocks.
    #[track_caller]
    pub fn add_argvs<I>(&mut self, blocks: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: IntoIterator,
        <I::Item as IntoIterator>::Item: Into<ArgvPair>,
    {
        let blocks: Vec<Vec<ArgvPair>> = blocks
            .into_iter()
            .map(|block| block.into_iter().map(Into::into).collect())
            .collect();
        self.check_bulk_len(blocks.len(), "argv blocks");
        for (argv, block) in self.argvs.iter_mut().zip(blocks) {
            argv.extend(block);
        }
        self
    }

    #[track_caller]
    fn check_bulk_len(&self, got: usize, what: &str) {
        if got != self.count() {
            panic!(
                "bulk setter expects exactly {} {}, got {}",
                self.count(),
                what,
                got
            );
        }
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

    /// Launch, discarding per-rank error codes.
    #[track_caller]
    pub fn spawn(self) -> SpawnResult {
        self.launch(false)
    }

    /// Launch, collecting `sum(maxprocs)` error codes in global rank
    /// order.
    #[track_caller]
    pub fn spawn_with_errcodes(self) -> SpawnResult {
        self.launch(true)
    }

    #[track_caller]
    fn launch(self, want_errcodes: bool) -> SpawnResult {
        for command in &self.commands {
            check_command(command);
        }
        for &procs in &self.maxprocs {
            check_maxprocs(procs);
        }
        check_total_maxprocs(self.maxprocs.iter().map(|&n| n as i64).sum());
        check_intracomm(&self.comm);
        check_root(self.root, &self.comm);

        let argvs: Vec<Vec<String>> = self.argvs.iter().map(|argv| marshal(argv)).collect();
        let infos: Vec<ll::InfoHandle> = self.infos.iter().map(InfoMap::handle).collect();
        let total = self.total_maxprocs();
        log::debug!(
            "spawning {} executables, {} processes total",
            self.count(),
            total
        );

        let mut intercomm = ll::COMM_NULL;
        let mut errcodes = Vec::new();
        let rc = ll::comm_spawn_multiple(
            &self.commands,
            &argvs,
            &self.maxprocs,
            &infos,
            self.root,
            self.comm.handle(),
            &mut intercomm,
            want_errcodes.then_some(&mut errcodes),
        );
        expect_rc(rc, "comm_spawn_multiple");

        SpawnResult::new(
            Intercommunicator::from_handle(intercomm),
            want_errcodes.then_some(errcodes),
            total,
        )
    }
}

impl From<SingleSpawner> for MultiSpawner {
    /// A single spawner is a multi spawner with one executable block.
    fn from(single: SingleSpawner) -> MultiSpawner {
        let mut multi = MultiSpawner::new([(single.command().to_string(), single.maxprocs())]);
        multi.root = single.root();
        multi.comm = single.communicator();
        multi.argvs[0] = single.argv().to_vec();
        multi.infos[0] = single.spawn_info().clone();
        multi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_block_spawner() -> MultiSpawner {
        MultiSpawner::new([("a.out", 4), ("b.out", 2)])
    }

    #[test]
    fn construction_from_pairs() {
        let spawner = two_block_spawner();
        assert_eq!(spawner.count(), 2);
        assert_eq!(spawner.commands(), ["a.out", "b.out"]);
        assert_eq!(spawner.maxprocs(), [4, 2]);
        assert_eq!(spawner.total_maxprocs(), 6);
        assert!(spawner.spawn_infos().iter().all(InfoMap::is_null));
    }

    #[test]
    fn total_is_the_sum() {
        let spawner = two_block_spawner();
        let sum: i32 = spawner.maxprocs().iter().sum();
        assert_eq!(sum, spawner.total_maxprocs());
    }

    #[test]
    fn bulk_argv_blocks_land_per_executable() {
        let mut spawner = two_block_spawner();
        spawner.add_argvs([
            vec!["-foo", "bar", "--baz"],
            vec!["-bar", "1", "-qux"],
        ]);

        let first = spawner.argv_at(0).unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first[0], ArgvPair::bare("-foo"));
        assert_eq!(first[1], ArgvPair::bare("bar"));
        assert_eq!(first[2], ArgvPair::bare("--baz"));

        let second = spawner.argv_at(1).unwrap();
        assert_eq!(second.len(), 3);
        assert_eq!(second[0], ArgvPair::bare("-bar"));
        assert_eq!(spawner.total_maxprocs(), 6);
    }

    #[test]
    fn indexed_setters_round_trip() {
        let mut spawner = two_block_spawner();
        spawner.set_command_at(1, "c.out").unwrap();
        assert_eq!(spawner.command_at(1).unwrap(), "c.out");

        spawner.set_maxprocs_at(0, 1).unwrap();
        assert_eq!(spawner.maxprocs_at(0).unwrap(), 1);
        assert_eq!(spawner.total_maxprocs(), 3);

        let info = mpix_core::info_map! { "wdir" => "/tmp" };
        spawner.set_spawn_info_at(0, info).unwrap();
        assert!(!spawner.spawn_info_at(0).unwrap().is_null());
        assert!(spawner.spawn_info_at(1).unwrap().is_null());

        spawner.add_argv_at(0, "-v").unwrap();
        spawner.extend_argv_at(0, [("-n", 1)]).unwrap();
        assert_eq!(spawner.argv_at(0).unwrap().len(), 2);
    }

    #[test]
    fn out_of_range_carries_index_and_size() {
        let mut spawner = two_block_spawner();
        let err = spawner.set_command_at(2, "x").unwrap_err();
        match &err {
            Error::OutOfRange { index, size, .. } => {
                assert_eq!(*index, 2);
                assert_eq!(*size, 2);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        let message = format!("{}", err);
        assert!(message.contains("index 2"));
        assert!(message.contains("size 2"));
    }

    #[test]
    fn wrapped_index_is_out_of_range() {
        let mut spawner = two_block_spawner();
        let huge = usize::MAX;
        let err = spawner.set_command_at(huge, "x").unwrap_err();
        let message = format!("{}", err);
        assert!(message.contains(&huge.to_string()));
        assert!(message.contains("size 2"));
    }

    #[test]
    fn every_indexed_accessor_is_checked() {
        let mut spawner = two_block_spawner();
        assert!(spawner.command_at(2).is_err());
        assert!(spawner.maxprocs_at(2).is_err());
        assert!(spawner.spawn_info_at(2).is_err());
        assert!(spawner.argv_at(2).is_err());
        assert!(spawner.set_maxprocs_at(2, 1).is_err());
        assert!(spawner.set_spawn_info_at(2, InfoMap::null()).is_err());
        assert!(spawner.add_argv_at(2, "-v").is_err());
        assert!(spawner.extend_argv_at(2, ["-v"]).is_err());
    }

    #[test]
    fn bulk_setters_replace_everything() {
        let mut spawner = two_block_spawner();
        spawner
            .set_commands(["x.out", "y.out"])
            .set_maxprocs([1, 1])
            .set_spawn_infos([InfoMap::null(), InfoMap::null()]);
        assert_eq!(spawner.commands(), ["x.out", "y.out"]);
        assert_eq!(spawner.total_maxprocs(), 2);
    }

    #[test]
    fn flattening_preserves_block_order() {
        let mut a = SingleSpawner::new("a.out", 2);
        a.add_argv("-a");
        let b = SingleSpawner::new("b.out", 3);

        let merged = MultiSpawner::from_spawners([a, b]);
        assert_eq!(merged.commands(), ["a.out", "b.out"]);
        assert_eq!(merged.maxprocs(), [2, 3]);
        assert_eq!(merged.argv_at(0).unwrap().len(), 1);
        assert!(merged.argv_at(1).unwrap().is_empty());
    }

    #[test]
    fn flattening_multis_concatenates() {
        let first = two_block_spawner();
        let second = MultiSpawner::new([("c.out", 1)]);
        let merged = MultiSpawner::from_spawners([first, second]);
        assert_eq!(merged.count(), 3);
        assert_eq!(merged.total_maxprocs(), 7);
    }

    #[test]
    fn spawn_with_errcodes_covers_every_rank() {
        let spawner = MultiSpawner::new([
            ("mpix-no-such-executable", 2),
            ("mpix-no-such-executable-either", 1),
        ]);
        let result = spawner.spawn_with_errcodes();
        assert_eq!(result.errcodes().unwrap().len(), 3);
        assert_eq!(result.number_of_spawned_processes(), 0);
        assert!(!result.maxprocs_processes_spawned());
    }

    #[test]
    #[should_panic(expected = "at least one executable")]
    fn empty_construction_is_fatal() {
        let _ = MultiSpawner::new(Vec::<(String, i32)>::new());
    }

    #[test]
    #[should_panic(expected = "at least one executable")]
    fn empty_flattening_is_fatal() {
        let _ = MultiSpawner::from_spawners(Vec::<MultiSpawner>::new());
    }

    #[test]
    #[should_panic(expected = "agree on root and communicator")]
    fn disagreeing_spawners_do_not_flatten() {
        let mut a = MultiSpawner::new([("a.out", 1)]);
        a.root = 0;
        let mut b = MultiSpawner::new([("b.out", 1)]);
        b.root = 1; // bypasses the setter check on purpose
        let _ = MultiSpawner::from_spawners([a, b]);
    }

    #[test]
    #[should_panic(expected = "non-empty")]
    fn empty_command_in_pairs_is_fatal() {
        let _ = MultiSpawner::new([("", 1)]);
    }

    #[test]
    #[should_panic(expected = "maxprocs")]
    fn nonpositive_maxprocs_is_fatal() {
        let _ = MultiSpawner::new([("a.out", 0)]);
    }

    #[test]
    #[should_panic(expected = "exactly 2")]
    fn bulk_size_mismatch_is_fatal() {
        let mut spawner = two_block_spawner();
        spawner.set_maxprocs([1]);
    }

    #[test]
    #[should_panic(expected = "exactly 2")]
    fn bulk_argv_size_mismatch_is_fatal() {
        let mut spawner = two_block_spawner();
        spawner.add_argvs([vec!["-a"]]);
    }
}
