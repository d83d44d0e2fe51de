//! Domain Lookup CLI Application
//!
//! Bulk-checks whether domains are registered by querying the RDAP server of
//! each domain's registry. Prints one `domain,message` line per domain in
//! completion order.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{CommandFactory, Parser};
use domain_lookup_lib::{
    load_env_config, resolve_config, work_queue, ConfigManager, Dispatcher, DomainChecker,
    LookupConfig, LookupError, RegistryDirectory,
};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domain-lookup
#[derive(Parser, Debug)]
#[command(name = "domain-lookup")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bulk check whether domains are registered using RDAP")]
#[command(
    long_about = "Bulk check whether domains are registered using RDAP.\n\nRDAP servers are discovered from the IANA bootstrap file. Results are printed as 'domain,message' lines in completion order."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Domain to check (repeatable)
    #[arg(short = 'd', long = "domain", value_name = "DOMAIN", action = clap::ArgAction::Append, help_heading = "Domain Selection")]
    pub domains: Vec<String>,

    /// Domains file to check, one domain per line
    #[arg(
        short = 'f',
        long = "file",
        value_name = "FILE",
        help_heading = "Domain Selection"
    )]
    pub file: Option<PathBuf>,

    /// Max concurrent RDAP lookups (default: 256)
    #[arg(short = 'c', long = "concurrency", help_heading = "Performance")]
    pub concurrency: Option<usize>,

    /// URL of the RDAP bootstrap file
    #[arg(long = "bootstrap-url", value_name = "URL", help_heading = "Configuration")]
    pub bootstrap_url: Option<String>,

    /// Use a specific config file instead of discovered ones
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<PathBuf>,

    /// Log progress to stderr
    #[arg(short = 'v', long = "verbose", help_heading = "Debugging")]
    pub verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_tracing(args.verbose);

    if let Err(e) = validate_args(&args) {
        ui::print_usage_error(&e, &Args::command().render_usage().to_string());
        process::exit(1);
    }

    if let Err(e) = run_lookup(args).await {
        ui::print_error(&e);
        process::exit(1);
    }
}

/// Install the stderr log subscriber. `RUST_LOG` takes precedence.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,domain_lookup={0},domain_lookup_lib={0}",
            level
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if args.domains.is_empty() && args.file.is_none() {
        return Err(
            "You must specify domains with -d/--domain or a file with -f/--file".to_string(),
        );
    }

    if args.concurrency == Some(0) {
        return Err("Concurrency must be at least 1".to_string());
    }

    Ok(())
}

/// Build the effective configuration.
///
/// Precedence order (highest to lowest): CLI arguments, `DL_*` environment
/// variables, config files, built-in defaults.
fn build_config(args: &Args) -> Result<LookupConfig, LookupError> {
    let manager = ConfigManager::new(args.verbose);
    let file_config = match &args.config {
        Some(path) => manager.load_file(path)?,
        None => manager.discover_and_load()?,
    };

    let mut config = resolve_config(&file_config, &load_env_config());

    if let Some(concurrency) = args.concurrency {
        config = config.with_concurrency(concurrency);
    }
    if let Some(url) = &args.bootstrap_url {
        config = config.with_bootstrap_url(url.clone());
    }

    Ok(config)
}

/// Main lookup flow: bootstrap, feed, dispatch, print.
async fn run_lookup(args: Args) -> Result<(), LookupError> {
    let config = build_config(&args)?;

    // Open the file before anything hits the network so a bad path fails fast.
    let domain_file = match &args.file {
        Some(path) => Some(open_domain_file(path).await?),
        None => None,
    };

    let directory =
        RegistryDirectory::fetch(&config.bootstrap_url, config.bootstrap_timeout).await?;
    tracing::info!(
        labels = directory.len(),
        concurrency = config.concurrency,
        "Starting lookups"
    );

    let checker = DomainChecker::new(Arc::new(directory))?;
    let dispatcher = Dispatcher::new(checker, config.concurrency);

    let (work_tx, work_rx) = work_queue(config.concurrency);
    let mut results = dispatcher.spawn(work_rx);
    let feeder = tokio::spawn(feed_domains(args.domains, domain_file, work_tx));

    let stdout = std::io::stdout();
    let mut sink = ui::ResultSink::new(stdout.lock());
    while let Some(outcome) = results.recv().await {
        sink.write(&outcome)?;
    }
    let written = sink.finish()?;
    tracing::info!(written, "All lookups finished");

    match feeder.await {
        Ok(result) => result.map(|_| ()),
        Err(e) => Err(LookupError::internal(format!("Domain feeder failed: {}", e))),
    }
}

/// An opened domain list together with its path for error messages.
struct DomainFile {
    path: PathBuf,
    file: tokio::fs::File,
}

async fn open_domain_file(path: &Path) -> Result<DomainFile, LookupError> {
    let file = tokio::fs::File::open(path).await.map_err(|e| {
        LookupError::file_error(path.to_string_lossy(), format!("Failed to open file: {}", e))
    })?;

    Ok(DomainFile {
        path: path.to_path_buf(),
        file,
    })
}

/// Push argument domains, then file lines, into the work queue.
///
/// Lines are fed verbatim apart from their line terminator. Dropping the
/// sender on return closes the queue. Returns the number of domains fed.
async fn feed_domains(
    domains: Vec<String>,
    domain_file: Option<DomainFile>,
    work_tx: mpsc::Sender<String>,
) -> Result<usize, LookupError> {
    let mut fed = 0usize;

    for domain in domains {
        if work_tx.send(domain).await.is_err() {
            return Ok(fed);
        }
        fed += 1;
    }

    if let Some(DomainFile { path, file }) = domain_file {
        let mut lines = BufReader::new(file).split(b'\n');
        while let Some(line) = lines.next_segment().await.map_err(|e| {
            LookupError::file_error(path.to_string_lossy(), format!("Failed to read file: {}", e))
        })? {
            if work_tx.send(decode_line(&line)).await.is_err() {
                return Ok(fed);
            }
            fed += 1;
        }
    }

    tracing::debug!(fed, "Domain feed exhausted");
    Ok(fed)
}

/// Strip a trailing `\r` and decode lossily; invalid UTF-8 still yields a domain.
fn decode_line(line: &[u8]) -> String {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_args() -> Args {
        Args {
            domains: vec![],
            file: None,
            concurrency: None,
            bootstrap_url: None,
            config: None,
            verbose: false,
        }
    }

    #[test]
    fn test_validate_args_requires_input() {
        let args = create_test_args();
        assert!(validate_args(&args).is_err());

        let mut args = create_test_args();
        args.domains = vec!["example.com".to_string()];
        assert!(validate_args(&args).is_ok());

        let mut args = create_test_args();
        args.file = Some(PathBuf::from("domains.txt"));
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_rejects_zero_concurrency() {
        let mut args = create_test_args();
        args.domains = vec!["example.com".to_string()];
        args.concurrency = Some(0);
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_args_parse_repeated_domains() {
        let args =
            Args::try_parse_from(["domain-lookup", "-d", "a.com", "-d", "b.net", "-c", "8"])
                .unwrap();
        assert_eq!(args.domains, vec!["a.com", "b.net"]);
        assert_eq!(args.concurrency, Some(8));
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let mut config_file = NamedTempFile::new().unwrap();
        write!(
            config_file,
            "[defaults]\nconcurrency = 12\nbootstrap_url = \"http://file\"\n"
        )
        .unwrap();

        let mut args = create_test_args();
        args.config = Some(config_file.path().to_path_buf());
        args.concurrency = Some(3);

        let config = build_config(&args).unwrap();
        assert_eq!(config.concurrency, 3);
    }

    #[tokio::test]
    async fn test_feed_domains_args_then_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"c.org\r\n\n Mixed.Case.COM\nlast.net").unwrap();
        file.flush().unwrap();

        let domain_file = open_domain_file(file.path()).await.unwrap();
        let (tx, mut rx) = mpsc::channel(16);
        let fed = feed_domains(
            vec!["a.com".to_string(), "b.xx".to_string()],
            Some(domain_file),
            tx,
        )
        .await
        .unwrap();

        let mut received = Vec::new();
        while let Some(domain) = rx.recv().await {
            received.push(domain);
        }

        assert_eq!(fed, 6);
        assert_eq!(
            received,
            vec!["a.com", "b.xx", "c.org", "", " Mixed.Case.COM", "last.net"]
        );
    }

    #[tokio::test]
    async fn test_feed_domains_invalid_utf8_line() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"a.com\ncaf\xe9.com\nb.com\n").unwrap();
        file.flush().unwrap();

        let domain_file = open_domain_file(file.path()).await.unwrap();
        let (tx, mut rx) = mpsc::channel(16);
        let fed = feed_domains(vec![], Some(domain_file), tx).await.unwrap();

        let mut received = Vec::new();
        while let Some(domain) = rx.recv().await {
            received.push(domain);
        }

        assert_eq!(fed, 3);
        assert_eq!(received, vec!["a.com", "caf\u{FFFD}.com", "b.com"]);
    }

    #[tokio::test]
    async fn test_open_missing_domain_file() {
        let err = open_domain_file(Path::new("/nonexistent/domains.txt"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, LookupError::File { .. }));
    }
}
