use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::StatError;
use super::line::{Classified, Counter, MAX_CORE_ID, classify};
use super::load::LoadRecord;

pub const DEFAULT_STAT_PATH: &str = "/proc/stat";

/// In-memory model of the last `/proc/stat` read.
///
/// `cores` is indexed by core id. Slots stay `None` until their `cpuN` line
/// has been seen and are never removed once allocated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CpuSnapshot {
    pub package: Option<LoadRecord>,
    pub cores: Vec<Option<LoadRecord>>,
    pub interrupts: u64,
    pub context_switches: u64,
    pub boot_time: Option<DateTime<Utc>>,
    pub processes: u64,
    pub procs_running: u64,
    pub procs_blocked: u64,
}

impl CpuSnapshot {
    /// Writes one classified line into the model.
    pub fn apply(&mut self, classified: Classified) {
        match classified {
            Classified::Package(load) => self.package = Some(load),
            Classified::Core { id, .. } if id > MAX_CORE_ID => {}
            Classified::Core { id, load } => {
                if id >= self.cores.len() {
                    self.cores.resize(id + 1, None);
                }
                self.cores[id] = Some(load);
            }
            Classified::Counter(counter, value) => match counter {
                Counter::Interrupts => self.interrupts = value,
                Counter::ContextSwitches => self.context_switches = value,
                Counter::Processes => self.processes = value,
                Counter::ProcsRunning => self.procs_running = value,
                Counter::ProcsBlocked => self.procs_blocked = value,
            },
            Classified::BootTime(boot) => self.boot_time = Some(boot),
            Classified::SkippedCpu | Classified::Unrecognized => {}
        }
    }

    /// Populated cores with their ids, in id order.
    pub fn populated_cores(&self) -> impl Iterator<Item = (usize, &LoadRecord)> {
        self.cores
            .iter()
            .enumerate()
            .filter_map(|(id, load)| load.as_ref().map(|load| (id, load)))
    }
}

impl fmt::Display for CpuSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.package {
            Some(load) => write!(f, "package: {load}")?,
            None => write!(f, "package: -")?,
        }
        write!(f, ", cores: [")?;
        for (idx, core) in self.cores.iter().enumerate() {
            if idx > 0 {
                write!(f, " ")?;
            }
            match core {
                Some(load) => write!(f, "{load}")?,
                None => write!(f, "-")?,
            }
        }
        write!(
            f,
            "], interrupts: {}, context switches: {}, boot time: ",
            self.interrupts, self.context_switches
        )?;
        match &self.boot_time {
            Some(boot) => write!(f, "{}", boot.format("%Y-%m-%d %H:%M:%S UTC"))?,
            None => write!(f, "-")?,
        }
        write!(
            f,
            ", processes: {}, processes running: {}, processes blocked: {}",
            self.processes, self.procs_running, self.procs_blocked
        )
    }
}

/// Long-lived handle on a statistics source that is rewound and re-parsed on
/// every [`update`](StatSampler::update).
pub struct StatSampler<R> {
    reader: BufReader<R>,
    label: String,
    line: Vec<u8>,
    snapshot: CpuSnapshot,
}

impl StatSampler<File> {
    /// Opens the statistics file. The first read happens on the first `update`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StatError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| StatError::SourceUnavailable {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "opened stat source");
        Ok(Self::from_reader(file, path.display().to_string()))
    }
}

impl<R: Read + Seek> StatSampler<R> {
    /// Wraps any rewindable source; `label` names it in errors and logs.
    pub fn from_reader(reader: R, label: impl Into<String>) -> Self {
        StatSampler {
            reader: BufReader::new(reader),
            label: label.into(),
            line: Vec::new(),
            snapshot: CpuSnapshot::default(),
        }
    }

    /// Rewinds the source and re-parses it into the snapshot in place.
    ///
    /// Stops at the first fatal line. Lines before it have already been
    /// applied, everything after keeps the previous cycle's values.
    pub fn update(&mut self) -> Result<(), StatError> {
        let _span = tracing::debug_span!("stat.update", source = %self.label).entered();

        self.reader
            .seek(SeekFrom::Start(0))
            .map_err(|source| self.unavailable(source))?;

        let mut lines = 0usize;
        let mut skipped = 0usize;
        loop {
            self.line.clear();
            let read = self
                .reader
                .read_until(b'\n', &mut self.line)
                .map_err(|source| StatError::SourceUnavailable {
                    path: self.label.clone(),
                    source,
                })?;
            if read == 0 {
                break;
            }
            lines += 1;

            // Invalid UTF-8 is replaced, so a stray byte only affects the line it is on.
            let line = String::from_utf8_lossy(&self.line);
            let line = line.trim_end_matches(['\n', '\r']);
            let classified = classify(line)?;
            if classified == Classified::SkippedCpu {
                skipped += 1;
                tracing::trace!(line, "skipping cpu line");
            }
            self.snapshot.apply(classified);
        }

        tracing::debug!(
            lines,
            skipped,
            cores = self.snapshot.cores.len(),
            "stat cycle complete"
        );
        Ok(())
    }

    fn unavailable(&self, source: std::io::Error) -> StatError {
        StatError::SourceUnavailable {
            path: self.label.clone(),
            source,
        }
    }

    /// Releases the underlying handle.
    pub fn close(self) {
        tracing::debug!(source = %self.label, "closing stat source");
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    #[cfg(test)]
    fn get_mut(&mut self) -> &mut R {
        self.reader.get_mut()
    }

    pub fn snapshot(&self) -> &CpuSnapshot {
        &self.snapshot
    }

    pub fn package(&self) -> Option<&LoadRecord> {
        self.snapshot.package.as_ref()
    }

    pub fn cores(&self) -> &[Option<LoadRecord>] {
        &self.snapshot.cores
    }

    pub fn interrupts(&self) -> u64 {
        self.snapshot.interrupts
    }

    pub fn context_switches(&self) -> u64 {
        self.snapshot.context_switches
    }

    pub fn boot_time(&self) -> Option<DateTime<Utc>> {
        self.snapshot.boot_time
    }

    pub fn processes(&self) -> u64 {
        self.snapshot.processes
    }

    pub fn procs_running(&self) -> u64 {
        self.snapshot.procs_running
    }

    pub fn procs_blocked(&self) -> u64 {
        self.snapshot.procs_blocked
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn sampler(input: &str) -> StatSampler<Cursor<Vec<u8>>> {
        StatSampler::from_reader(Cursor::new(input.as_bytes().to_vec()), "test")
    }

    fn replace_input(sampler: &mut StatSampler<Cursor<Vec<u8>>>, input: &str) {
        *sampler.get_mut().get_mut() = input.as_bytes().to_vec();
    }

    fn load(values: [u64; 7]) -> LoadRecord {
        let [user, nice, system, idle, iowait, irq, softirq] = values;
        LoadRecord {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
        }
    }

    #[test]
    fn package_only() {
        let mut s = sampler("cpu 100 200 300 400 500 600 700");
        s.update().unwrap();
        assert_eq!(s.package(), Some(&load([100, 200, 300, 400, 500, 600, 700])));
        assert!(s.cores().is_empty());
    }

    #[test]
    fn sparse_core_ids() {
        let mut s = sampler("cpu0 1 2 3 4 5 6 7\ncpu2 10 20 30 40 50 60 70");
        s.update().unwrap();
        assert!(s.cores().len() >= 3);
        assert_eq!(s.cores()[0], Some(load([1, 2, 3, 4, 5, 6, 7])));
        assert_eq!(s.cores()[1], None);
        assert_eq!(s.cores()[2], Some(load([10, 20, 30, 40, 50, 60, 70])));
        assert!(s.package().is_none());
    }

    #[test]
    fn growth_resizes_to_exact_id() {
        let mut s = sampler("cpu12 1 1 1 1 1 1 1");
        s.update().unwrap();
        assert_eq!(s.cores().len(), 13);
        assert!(s.cores()[..12].iter().all(Option::is_none));
    }

    #[test]
    fn repeated_core_id_later_line_wins() {
        let mut s = sampler("cpu1 1 1 1 1 1 1 1\ncpu1 2 2 2 2 2 2 2\n");
        s.update().unwrap();
        assert_eq!(s.cores()[1], Some(load([2; 7])));
    }

    #[test]
    fn crlf_line_endings() {
        let mut s = sampler("cpu 1 2 3 4 5 6 7\r\nctxt 9\r\n");
        s.update().unwrap();
        assert_eq!(s.context_switches(), 9);
        assert!(s.package().is_some());
    }

    #[test]
    fn rewinds_each_cycle() {
        let mut s = sampler("cpu 1 1 1 1 1 1 1\nctxt 10\n");
        s.update().unwrap();
        replace_input(&mut s, "cpu 2 2 2 2 2 2 2\nctxt 20\n");
        s.update().unwrap();
        assert_eq!(s.package(), Some(&load([2; 7])));
        assert_eq!(s.context_switches(), 20);
    }

    #[test]
    fn absent_lines_keep_previous_values() {
        let mut s = sampler("cpu0 1 1 1 1 1 1 1\ncpu1 1 1 1 1 1 1 1\nprocesses 50\n");
        s.update().unwrap();
        replace_input(&mut s, "cpu0 5 5 5 5 5 5 5\n");
        s.update().unwrap();
        assert_eq!(s.cores()[0], Some(load([5; 7])));
        assert_eq!(s.cores()[1], Some(load([1; 7])));
        assert_eq!(s.processes(), 50);
    }

    #[test]
    fn skipped_cpu_line_does_not_abort() {
        let mut s = sampler("cpufreq 9 9\ncpu 1 2 3 4 5 6 7\nprocs_running 2\n");
        s.update().unwrap();
        assert!(s.package().is_some());
        assert_eq!(s.procs_running(), 2);
    }

    #[test]
    fn malformed_load_line_fails_update() {
        let mut s = sampler("cpu 1 2 3\nctxt 5\n");
        let err = s.update().unwrap_err();
        assert!(matches!(err, StatError::MalformedLoadLine { .. }));
        assert!(!err.is_fatal_to_loop());
        assert_eq!(s.context_switches(), 0);
    }

    #[test]
    fn open_missing_file_is_source_unavailable() {
        let err = StatSampler::open("/nonexistent/ptop/stat").err().unwrap();
        assert!(matches!(err, StatError::SourceUnavailable { .. }));
        assert!(err.is_fatal_to_loop());
        assert!(err.to_string().contains("/nonexistent/ptop/stat"));
    }

    #[test]
    fn summary_of_empty_snapshot() {
        insta::assert_snapshot!(
            CpuSnapshot::default().to_string(),
            @"package: -, cores: [], interrupts: 0, context switches: 0, boot time: -, processes: 0, processes running: 0, processes blocked: 0"
        );
    }

    #[test]
    fn summary_lists_package_cores_and_counters() {
        let mut s = sampler(
            "cpu 8 0 4 100 1 0 0\ncpu1 4 0 2 50 0 0 0\nintr 77 1 2\nctxt 88\nbtime 1609459200\nprocesses 99\nprocs_running 2\nprocs_blocked 1\n",
        );
        s.update().unwrap();
        insta::assert_snapshot!(
            s.snapshot().to_string(),
            @"package: {8 0 4 100 1 0 0}, cores: [- {4 0 2 50 0 0 0}], interrupts: 77, context switches: 88, boot time: 2021-01-01 00:00:00 UTC, processes: 99, processes running: 2, processes blocked: 1"
        );
    }

    #[test]
    fn unallocatable_core_ids_are_skipped() {
        let mut s = sampler(&format!(
            "cpu{} 1 2 3 4 5 6 7\ncpu4000000000 1 2 3 4 5 6 7\ncpu1 1 1 1 1 1 1 1\nctxt 3\n",
            usize::MAX
        ));
        s.update().unwrap();
        assert_eq!(s.cores().len(), 2);
        assert_eq!(s.cores()[1], Some(load([1; 7])));
        assert_eq!(s.context_switches(), 3);
    }

    #[test]
    fn apply_ignores_core_ids_beyond_limit() {
        let mut snapshot = CpuSnapshot::default();
        snapshot.apply(Classified::Core {
            id: usize::MAX,
            load: load([1; 7]),
        });
        assert!(snapshot.cores.is_empty());
    }

    #[test]
    fn invalid_utf8_spoils_only_its_line() {
        let mut input = b"cpu 1 2 3 4 5 6 7\nname \xff\xfe\nctxt 4\n".to_vec();
        let mut s = StatSampler::from_reader(Cursor::new(input.clone()), "test");
        s.update().unwrap();
        assert_eq!(s.context_switches(), 4);

        input = b"cpu 1 2 3 4 5 6 7\nctxt 4\xff\n".to_vec();
        *s.get_mut().get_mut() = input;
        let err = s.update().unwrap_err();
        assert!(matches!(err, StatError::MalformedScalarLine { key: "ctxt", .. }));
        assert!(!err.is_fatal_to_loop());
    }

    #[test]
    fn populated_cores_skips_holes() {
        let mut s = sampler("cpu0 1 1 1 1 1 1 1\ncpu3 3 3 3 3 3 3 3\n");
        s.update().unwrap();
        let ids: Vec<usize> = s.snapshot().populated_cores().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![0, 3]);
    }
}
