use clap::Parser;
use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use env_logger::Env;
use log::{debug, info};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use ip_summary::TrafficSummary;

/// Attribute the bytes of a traffic log to the customers owning the addresses
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Customer registry with one `customer_id subnet` pair per line (`-` for stdin)
    customers: PathBuf,

    /// Traffic log with one `address bytes` pair per line (`-` for stdin)
    #[arg(default_value = "-")]
    ip_log: PathBuf,

    /// Where to write the summary (`-` for stdout)
    #[arg(default_value = "-")]
    output: PathBuf,

    /// Check the trie structure after loading and the report totals after replaying
    #[arg(long)]
    self_test: bool,
}

fn is_stdio(path: &Path) -> bool {
    path == Path::new("-")
}

fn open(path: &Path) -> Result<Box<dyn BufRead>> {
    if is_stdio(path) {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path).wrap_err_with(|| format!("Failed to open '{}'", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

fn create(path: &Path) -> Result<Box<dyn Write>> {
    if is_stdio(path) {
        return Ok(Box::new(io::stdout().lock()));
    }
    let file =
        File::create(path).wrap_err_with(|| format!("Failed to create '{}'", path.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if is_stdio(&args.customers) && is_stdio(&args.ip_log) {
        bail!("the customer registry and the traffic log cannot both be read from stdin");
    }
    debug!("{args:?}");

    let mut summary = TrafficSummary::new();
    summary
        .load(open(&args.customers)?)
        .wrap_err_with(|| format!("Failed to load '{}'", args.customers.display()))?;

    if args.self_test {
        summary.self_test().wrap_err("Trie self test failed")?;
        info!("trie self test passed");
    }

    summary
        .replay(open(&args.ip_log)?)
        .wrap_err_with(|| format!("Failed to replay '{}'", args.ip_log.display()))?;

    let report = summary.report();
    if args.self_test {
        summary
            .check_totals(&report)
            .wrap_err("Report self test failed")?;
        info!("report accounts for all {} bytes", report.total());
    }

    let mut output = create(&args.output)?;
    report
        .write_to(&mut output)
        .and_then(|_| output.flush())
        .wrap_err_with(|| format!("Failed to write '{}'", args.output.display()))?;
    Ok(())
}
