/*! splitting

Offline manifest splitting.

A manifest of `n` entries is split into `num_splits` contiguous pieces whose sizes differ by at most one,
the first `n % num_splits` pieces holding the extra entry. Manifests are streamed twice (count, then write)
so that the `L` subset never has to fit in memory.
!*/
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::Error;
use crate::processing::manifest::{self, EntryReader, EntryWriter};

/// Sizes of the pieces a manifest of `nb_entries` entries is split into.
pub fn piece_sizes(nb_entries: usize, num_splits: usize) -> Result<Vec<usize>, Error> {
    if num_splits == 0 {
        return Err(Error::Split("number of splits has to be positive".to_string()));
    }
    if num_splits > nb_entries {
        return Err(Error::Split(format!(
            "can't split {} entries into {} pieces",
            nb_entries, num_splits
        )));
    }
    let base = nb_entries / num_splits;
    let rem = nb_entries % num_splits;
    Ok((0..num_splits)
        .map(|idx| if idx < rem { base + 1 } else { base })
        .collect())
}

/// Split `src` into `num_splits` pieces in `dst`, returning the piece paths in order.
pub fn split(src: &Path, num_splits: usize, dst: &Path) -> Result<Vec<PathBuf>, Error> {
    let stem = manifest::stem(src)?;
    let nb_entries = manifest::count_entries(src)?;
    let sizes = piece_sizes(nb_entries, num_splits)?;
    info!(
        "splitting {:?} ({} entries) into {} pieces",
        src, nb_entries, num_splits
    );

    std::fs::create_dir_all(dst)?;
    let mut entries = EntryReader::open(src)?;
    let mut paths = Vec::with_capacity(num_splits);

    for (idx, size) in sizes.into_iter().enumerate() {
        let path = dst.join(manifest::piece_name(&stem, idx + 1));
        let mut writer = EntryWriter::create(&path)?;
        for _ in 0..size {
            let entry = entries.next().ok_or_else(|| {
                Error::Split(format!("{:?} changed while being split", src))
            })??;
            writer.write(&entry)?;
        }
        writer.finish()?;
        debug!("wrote {:?} ({} entries)", path, size);
        paths.push(path);
    }

    Ok(paths)
}
