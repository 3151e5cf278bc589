//! JSON persistence for assembled packet dumps.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use time::macros::format_description;

use crate::logger;
use crate::wire::Packet;

/// Write the packets as pretty-printed JSON into `dir`, named after the
/// current local time (`output_YYYYMMDD_HHMMSS.json`). Creates the
/// directory if needed and returns the path written.
pub fn save_packets(dir: &Path, packets: &[Packet]) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create output dir {}", dir.display()))?;

    let stamp_fmt = format_description!("[year][month][day]_[hour][minute][second]");
    let stamp = logger::local_now()
        .format(stamp_fmt)
        .context("format output timestamp")?;
    let path = dir.join(format!("output_{stamp}.json"));

    let json = serde_json::to_string_pretty(packets).context("serialize packets")?;
    fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}
