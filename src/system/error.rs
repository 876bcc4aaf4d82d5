use std::io;

use thiserror::Error;

/// Errors surfaced by [`StatSampler`](super::stat::StatSampler).
///
/// A `cpu` line with an unrecognized identifier is not an error; it is
/// reported as [`Classified::SkippedCpu`](super::line::Classified::SkippedCpu)
/// and never leaves the parser.
#[derive(Debug, Error)]
pub enum StatError {
    /// Opening, rewinding or reading the statistics source failed.
    #[error("failed to read {path}: {source}")]
    SourceUnavailable {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A `cpu`/`cpuN` line did not carry seven valid load counters.
    #[error("malformed load line `{line}`: {detail}")]
    MalformedLoadLine { line: String, detail: String },

    /// A recognized counter line (`intr`, `ctxt`, `btime`, ...) had no valid value.
    #[error("malformed `{key}` line: `{line}`")]
    MalformedScalarLine { key: &'static str, line: String },
}

impl StatError {
    /// Source failures end the polling loop; parse failures only spoil one cycle.
    pub fn is_fatal_to_loop(&self) -> bool {
        matches!(self, StatError::SourceUnavailable { .. })
    }
}
