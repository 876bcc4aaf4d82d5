use chrono::{DateTime, Utc};

use super::error::StatError;
use super::load::LoadRecord;

const CPU_PREFIX: &str = "cpu";

/// Highest core id given a slot; `cpuN` lines above it are skipped.
pub const MAX_CORE_ID: usize = 1 << 16;

/// Single-value counter lines of `/proc/stat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Interrupts,
    ContextSwitches,
    Processes,
    ProcsRunning,
    ProcsBlocked,
}

/// Prefixes of the scalar lines, longest first so the longest applicable
/// prefix wins.
const SCALAR_PREFIXES: [(&str, Scalar); 6] = [
    ("procs_running", Scalar::Counter(Counter::ProcsRunning)),
    ("procs_blocked", Scalar::Counter(Counter::ProcsBlocked)),
    ("processes", Scalar::Counter(Counter::Processes)),
    ("btime", Scalar::BootTime),
    ("intr", Scalar::Counter(Counter::Interrupts)),
    ("ctxt", Scalar::Counter(Counter::ContextSwitches)),
];

#[derive(Debug, Clone, Copy)]
enum Scalar {
    Counter(Counter),
    BootTime,
}

/// Outcome of classifying one line.
///
/// Fatal lines are reported as `Err` by [`classify`]; everything in here lets
/// the update cycle carry on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// The aggregate `cpu` line.
    Package(LoadRecord),
    /// A `cpuN` line.
    Core { id: usize, load: LoadRecord },
    Counter(Counter, u64),
    BootTime(DateTime<Utc>),
    /// `cpu`-prefixed, but not `cpu` + optional digits + counters.
    SkippedCpu,
    Unrecognized,
}

/// Classifies a raw line by its prefix and parses its payload.
pub fn classify(line: &str) -> Result<Classified, StatError> {
    if let Some(rest) = line.strip_prefix(CPU_PREFIX) {
        return classify_cpu(rest);
    }

    for (prefix, scalar) in SCALAR_PREFIXES {
        if let Some(rest) = line.strip_prefix(prefix) {
            return classify_scalar(line, prefix, scalar, rest);
        }
    }

    Ok(Classified::Unrecognized)
}

fn classify_cpu(rest: &str) -> Result<Classified, StatError> {
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let (digits, fields) = rest.split_at(digits_end);

    if !fields.is_empty() && !fields.starts_with(|c: char| c.is_ascii_whitespace()) {
        return Ok(Classified::SkippedCpu);
    }

    if digits.is_empty() {
        return LoadRecord::parse(fields).map(Classified::Package);
    }

    let id = match digits.parse::<usize>() {
        Ok(id) if id <= MAX_CORE_ID => id,
        _ => return Ok(Classified::SkippedCpu),
    };
    let load = LoadRecord::parse(fields)?;
    Ok(Classified::Core { id, load })
}

fn classify_scalar(
    line: &str,
    key: &'static str,
    scalar: Scalar,
    rest: &str,
) -> Result<Classified, StatError> {
    let malformed = || StatError::MalformedScalarLine {
        key,
        line: line.to_string(),
    };

    if !rest.starts_with(|c: char| c.is_ascii_whitespace()) {
        return Err(malformed());
    }
    // `intr` carries per-IRQ counts after the total; only the first value counts.
    let token = rest.split_ascii_whitespace().next().ok_or_else(malformed)?;

    match scalar {
        Scalar::Counter(counter) => {
            let value = token.parse::<u64>().map_err(|_| malformed())?;
            Ok(Classified::Counter(counter, value))
        }
        Scalar::BootTime => {
            let secs = token.parse::<i64>().map_err(|_| malformed())?;
            let boot = DateTime::from_timestamp(secs, 0).ok_or_else(malformed)?;
            Ok(Classified::BootTime(boot))
        }
    }
}
