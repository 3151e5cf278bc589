use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;

use feed_dump::fetch;
use feed_dump::logger::ErrorLog;
use feed_dump::output;

#[derive(Debug, Parser)]
#[command(version, about = "Packet dump client: bulk fetch with gap recovery")]
struct Args {
    /// Server host
    #[arg(long, env = "FEED_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(long, env = "FEED_PORT", default_value_t = 3000)]
    port: u16,

    /// Directory for JSON output files
    #[arg(long, env = "OUT_DIR", default_value = "output")]
    out_dir: PathBuf,

    /// Directory for the error log
    #[arg(long, env = "LOG_DIR", default_value = "error_log")]
    log_dir: PathBuf,
}

/// Fetch, recover, and persist. Returns the output path, or `None` when
/// there was nothing to save. Fetch and persistence failures both come
/// out of here so the operator-facing handling is uniform.
fn run_and_save(args: &Args, log: &ErrorLog) -> Result<Option<PathBuf>> {
    let packets = fetch::run(&args.host, args.port, log)?;
    if packets.is_empty() {
        return Ok(None);
    }
    let path = output::save_packets(&args.out_dir, &packets)?;
    Ok(Some(path))
}

fn main() -> Result<()> {
    // Load environment variables from .env if present
    let _ = dotenv();
    let args = Args::parse();
    let log = ErrorLog::new(&args.log_dir);

    match run_and_save(&args, &log) {
        Ok(Some(path)) => println!("Data saved to: {}", path.display()),
        Ok(None) => println!("No packets found, nothing to save."),
        Err(e) => {
            log.error(format!("client run failed: {e:#}"));
            println!("An error occurred. Please check the error log for details.");
            std::process::exit(1);
        }
    }
    Ok(())
}
