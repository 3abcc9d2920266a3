//! Command-line driver (C11) for the `mmu-core` address-translation engine:
//! parses the replacement policy and the trace/log paths, then feeds every
//! virtual address in the trace through a [`mmu_core::Simulator`].

mod cli;
mod error;
mod sink;
mod trace;

use error::CliError;
use mmu_core::Simulator;
use sink::LogSink;
use std::fs::File;
use std::io::BufReader;
use std::process::ExitCode;
use trace::TraceReader;

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("mmu-sim: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), CliError> {
    let args = cli::parse()?;

    let trace_file = File::open(&args.trace_path).map_err(|source| CliError::Io {
        path: args.trace_path.clone(),
        source,
    })?;
    let mut trace = TraceReader::open(BufReader::new(trace_file))?;

    let mut log = LogSink::open(&args.log_path)?;
    let mut sim = Simulator::new(args.policy);

    let mut accesses = 0u64;
    loop {
        let Some(result) = trace.next() else {
            break;
        };
        match result {
            Ok(va) => {
                sim.translate(va, &mut log)?;
                accesses += 1;
            }
            Err(err) => {
                // A malformed trace stops further reading but keeps every
                // event already written for addresses read before it (§7);
                // the log destination was flushed incrementally, so nothing
                // already emitted is lost even though we exit non-zero.
                log::warn!("trace reading stopped after {accesses} access(es): {err}");
                return Err(err);
            }
        }
    }

    log::debug!("processed {accesses} access(es) to completion");
    Ok(())
}
