//! Event log sink (C13): renders [`mmu_core::Event`]s using the exact
//! strings and zero-padded hex mandated for the run log, to either a file
//! or standard output.

use crate::error::CliError;
use mmu_core::{Event, EventSink};
use std::fs::File;
use std::io::{self, BufWriter, Write};

pub struct LogSink {
    out: Box<dyn Write>,
}

impl LogSink {
    /// Opens `path` for writing, unless `path` is the literal string
    /// `"stdout"`, in which case events are written to the process's
    /// standard output instead and no file is ever opened.
    pub fn open(path: &str) -> Result<Self, CliError> {
        let out: Box<dyn Write> = if path == "stdout" {
            Box::new(BufWriter::new(io::stdout()))
        } else {
            let file = File::create(path).map_err(|source| CliError::Io {
                path: path.to_string(),
                source,
            })?;
            Box::new(BufWriter::new(file))
        };
        Ok(Self { out })
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: Event) {
        // Errors writing to the log destination are not part of the
        // mandated error taxonomy (§7 only covers argument/I/O-open/parse/
        // internal failures); a write failure here is treated the same way
        // the reference tool treats a failed fprintf: silently best-effort.
        let _ = match event {
            Event::AccessVa { va } => writeln!(self.out, "Access VA: 0x{va:03x}"),
            Event::TlbHit { vpn, pfn } => {
                writeln!(self.out, "TLB Hit: VPN 0x{vpn:03x} -> PFN 0x{pfn:03x}")
            }
            Event::TlbMiss { vpn } => writeln!(self.out, "TLB Miss: VPN 0x{vpn:03x}"),
            Event::PageTableHit { vpn, pfn } => writeln!(
                self.out,
                "Page Table Hit: VPN 0x{vpn:03x} -> PFN 0x{pfn:03x}"
            ),
            Event::PageTableMiss { vpn } => {
                writeln!(self.out, "Page Table Miss: VPN 0x{vpn:03x}")
            }
            Event::PageTableUpdate { vpn, pfn } => writeln!(
                self.out,
                "Page Table Update: VPN 0x{vpn:03x} -> PFN 0x{pfn:03x}"
            ),
            Event::TlbUpdate { vpn, pfn } => {
                writeln!(self.out, "TLB Update: VPN 0x{vpn:03x} -> PFN 0x{pfn:03x}")
            }
            Event::Pa { pa } => writeln!(self.out, "PA: 0x{pa:03x}\n"),
        };
    }
}
