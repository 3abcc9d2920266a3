//! CLI-facing error type. Wraps [`mmu_core::SimError`] alongside the
//! argument, I/O, and trace-parsing failures that only make sense at the
//! process boundary.

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("usage: mmu-sim -p <RR|LRU> -f <trace-file> -l <log-file|stdout>")]
    Usage,

    #[error("unknown replacement policy '{0}' (expected RR or LRU)")]
    UnknownPolicy(String),

    #[error("missing value for option '{0}'")]
    MissingValue(String),

    #[error("unrecognized option '{0}'")]
    UnknownOption(String),

    #[error("failed to open '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed trace at line {line}: {reason}")]
    TraceParse { line: usize, reason: String },

    #[error(transparent)]
    Sim(#[from] mmu_core::SimError),
}
