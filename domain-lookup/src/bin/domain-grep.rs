//! domain-grep: extract domain names from comma-separated text.
//!
//! Prints the first domain-looking field of every line of the input file,
//! producing a list suitable for `domain-lookup -f`.

use clap::{CommandFactory, Parser};
use console::Style;
use domain_lookup_lib::extract::find_domain;
use domain_lookup_lib::LookupError;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

/// CLI arguments for domain-grep
#[derive(Parser, Debug)]
#[command(name = "domain-grep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Print the first domain found on each line of a comma-separated file")]
struct Args {
    /// File containing domains, one record per line
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    file: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let Some(path) = args.file else {
        eprintln!("{}", Args::command().render_help());
        process::exit(1);
    };

    if let Err(e) = grep_file(&path) {
        let prefix = Style::new().red().bold().for_stderr();
        eprintln!("{} {}", prefix.apply_to("Error:"), e);
        process::exit(1);
    }
}

fn grep_file(path: &Path) -> Result<(), LookupError> {
    let file = File::open(path).map_err(|e| {
        LookupError::file_error(path.to_string_lossy(), format!("Failed to open file: {}", e))
    })?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    grep_lines(BufReader::new(file), &mut out).map_err(|e| {
        LookupError::file_error(path.to_string_lossy(), format!("Failed to read file: {}", e))
    })?;
    out.flush()?;
    Ok(())
}

/// Write the domain found on each line of `reader` to `out`.
fn grep_lines<R: BufRead, W: Write>(reader: R, out: &mut W) -> io::Result<usize> {
    let mut found = 0;
    for line in reader.split(b'\n') {
        let line = line?;
        let line = line.strip_suffix(b"\r").unwrap_or(&line[..]);
        if let Some(domain) = find_domain(&String::from_utf8_lossy(line)) {
            writeln!(out, "{}", domain)?;
            found += 1;
        }
    }
    Ok(found)
}
