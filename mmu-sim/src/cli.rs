//! Manual command-line argument parsing (C11).
//!
//! Three mandatory flags, no argument-parsing crate: `-p <RR|LRU>` selects
//! the replacement policy, `-f <path>` is the input trace, `-l <path>` is
//! the log destination (the literal value `stdout` routes to standard
//! output instead of a file).

use crate::error::CliError;
use mmu_core::Policy;
use std::env;

pub struct Args {
    pub policy: Policy,
    pub trace_path: String,
    pub log_path: String,
}

pub fn parse() -> Result<Args, CliError> {
    let mut policy = None;
    let mut trace_path = None;
    let mut log_path = None;

    let mut args = env::args().skip(1);
    while let Some(flag) = args.next() {
        match flag.as_str() {
            "-p" => {
                let value = args.next().ok_or_else(|| CliError::MissingValue(flag))?;
                policy = Some(
                    value
                        .parse::<Policy>()
                        .map_err(|()| CliError::UnknownPolicy(value))?,
                );
            }
            "-f" => {
                trace_path = Some(args.next().ok_or_else(|| CliError::MissingValue(flag))?);
            }
            "-l" => {
                log_path = Some(args.next().ok_or_else(|| CliError::MissingValue(flag))?);
            }
            other => return Err(CliError::UnknownOption(other.to_string())),
        }
    }

    let args = Args {
        policy: policy.ok_or(CliError::Usage)?,
        trace_path: trace_path.ok_or(CliError::Usage)?,
        log_path: log_path.ok_or(CliError::Usage)?,
    };
    log::debug!(
        "parsed arguments: policy={:?} trace={} log={}",
        args.policy,
        args.trace_path,
        args.log_path
    );
    Ok(args)
}
