//! Recombination of manifest pieces.
//!
//! Combining is an ordered concatenation of finished pieces, nothing is deduplicated or reordered.
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::Error;
use crate::processing::manifest::{self, EntryReader, EntryWriter};

/// Pieces `dir/<stem>.*.jsonl.gz`, sorted by name (hence by index).
pub fn pieces(dir: &Path, stem: &str) -> Result<Vec<PathBuf>, Error> {
    let dir = dir
        .to_str()
        .ok_or_else(|| Error::Custom(format!("invalid piece directory: {:?}", dir)))?;
    let pattern = format!(
        "{}/{}.*{}",
        glob::Pattern::escape(dir),
        glob::Pattern::escape(stem),
        manifest::EXTENSION
    );
    debug!("looking for pieces matching {}", pattern);

    let mut paths = glob::glob(&pattern)?.collect::<Result<Vec<_>, _>>()?;
    paths.sort();
    Ok(paths)
}

/// Concatenate `pieces` into `dst`. Returns the number of combined entries.
pub fn combine(pieces: &[PathBuf], dst: &Path) -> Result<usize, Error> {
    info!("combining {} pieces into {:?}", pieces.len(), dst);
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = EntryWriter::create(dst)?;
    for piece in pieces {
        for entry in EntryReader::open(piece)? {
            writer.write(&entry?)?;
        }
    }
    writer.finish()
}
