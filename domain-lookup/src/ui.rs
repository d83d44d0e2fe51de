//! Output rendering for the CLI.
//!
//! Results go to stdout as `domain,message` lines with no header and no
//! summary; downstream tools parse that format. Everything else (errors,
//! usage) goes to stderr.

use console::Style;
use domain_lookup_lib::LookupOutcome;
use std::fmt::Display;
use std::io::{self, BufWriter, Write};

/// Line-oriented result writer.
pub struct ResultSink<W: Write> {
    writer: BufWriter<W>,
    written: usize,
}

impl<W: Write> ResultSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            written: 0,
        }
    }

    /// Write one outcome as `domain,message\n`.
    pub fn write(&mut self, outcome: &LookupOutcome) -> io::Result<()> {
        writeln!(self.writer, "{},{}", outcome.domain, outcome.message)?;
        self.written += 1;
        Ok(())
    }

    /// Flush buffered lines and return how many were written.
    pub fn finish(mut self) -> io::Result<usize> {
        self.writer.flush()?;
        Ok(self.written)
    }
}

/// Print a fatal error to stderr.
pub fn print_error(err: &dyn Display) {
    let prefix = Style::new().red().bold().for_stderr();
    eprintln!("{} {}", prefix.apply_to("Error:"), err);
}

/// Print an argument error followed by the usage line.
pub fn print_usage_error(message: &str, usage: &str) {
    print_error(&message);
    eprintln!();
    eprintln!("{}", usage);
    eprintln!();
    eprintln!("For more information, try '--help'.");
}
