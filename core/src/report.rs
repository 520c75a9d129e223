//! Line protocol emitted on standard output.
//!
//! External tooling correlates these lines against the host runtime's own
//! GC/heap telemetry, so the field labels and ordering are part of the
//! contract: one `uptime=... ops=... bag=... leak=...` line per progress
//! report and exactly one `DONE ops=... leak=...` line per run.

use std::io::{self, Write};
use std::time::Duration;

pub fn report_line(uptime: Duration, ops: u64, bag: usize, leak: usize) -> String {
    format!("uptime={:.1}s ops={ops} bag={bag} leak={leak}", uptime.as_secs_f64())
}

pub fn completion_line(ops: u64, leak: usize) -> String {
    format!("DONE ops={ops} leak={leak}")
}

pub fn write_report<W: Write>(sink: &mut W, uptime: Duration, ops: u64, bag: usize, leak: usize) -> io::Result<()> {
    writeln!(sink, "{}", report_line(uptime, ops, bag, leak))
}

pub fn write_completion<W: Write>(sink: &mut W, ops: u64, leak: usize) -> io::Result<()> {
    writeln!(sink, "{}", completion_line(ops, leak))
}
