//! Filesystem access used by completion predicates and the runner.
//!
//! Predicates only look at the filesystem through [FileSystem], so they can be evaluated
//! against [MemoryFs] in tests without touching the disk.
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::Error;

pub trait FileSystem {
    /// true if `path` exists (file or directory).
    fn exists(&self, path: &Path) -> bool;

    /// Create an empty file at `path`, creating parent directories if needed.
    fn touch(&self, path: &Path) -> Result<(), Error>;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn touch(&self, path: &Path) -> Result<(), Error> {
        (**self).touch(path)
    }
}

/// The actual filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn touch(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        File::create(path)?;
        Ok(())
    }
}

/// `<path>.tmp`, where a file is written before being moved to `path`.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Move the temporary file of `path` into place.
pub fn commit(path: &Path) -> Result<(), Error> {
    std::fs::rename(tmp_path(path), path)?;
    Ok(())
}

/// Write `path` through its temporary file, so that `path` is either absent, untouched or
/// complete. The temporary file is removed if `write` fails.
pub fn write_atomically<T, F>(path: &Path, write: F) -> Result<T, Error>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<T, Error>,
{
    let tmp = tmp_path(path);
    let mut w = BufWriter::new(File::create(&tmp)?);
    let written = write(&mut w).and_then(|t| {
        w.flush()?;
        Ok(t)
    });
    drop(w);
    match written {
        Ok(t) => {
            commit(path)?;
            Ok(t)
        }
        Err(e) => {
            if let Err(rm) = std::fs::remove_file(&tmp) {
                warn!("could not remove {:?}: {}", tmp, rm);
            }
            Err(e)
        }
    }
}

/// In-memory set of existing paths.
#[derive(Debug, Default)]
pub struct MemoryFs {
    paths: RefCell<HashSet<PathBuf>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let fs = Self::new();
        for path in paths {
            fs.insert(path);
        }
        fs
    }

    pub fn insert<P: Into<PathBuf>>(&self, path: P) {
        self.paths.borrow_mut().insert(path.into());
    }

    pub fn len(&self) -> usize {
        self.paths.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.borrow().is_empty()
    }
}

impl FileSystem for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.paths.borrow().contains(path)
    }

    fn touch(&self, path: &Path) -> Result<(), Error> {
        self.insert(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::Path;

    use super::{tmp_path, write_atomically, FileSystem, LocalFs, MemoryFs};
    use crate::error::Error;

    #[test]
    fn memory_touch() {
        let fs = MemoryFs::new();
        let marker = Path::new("data/fbank/.preprocess_complete");
        assert!(!fs.exists(marker));
        fs.touch(marker).unwrap();
        assert!(fs.exists(marker));
        assert_eq!(fs.len(), 1);
    }

    #[test]
    fn local_touch_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("data/fbank/L_split_4/.split_completed");
        LocalFs.touch(&marker).unwrap();
        assert!(LocalFs.exists(&marker));
        assert_eq!(std::fs::metadata(&marker).unwrap().len(), 0);
    }

    #[test]
    fn atomic_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("text");
        let lines = write_atomically(&path, |w| {
            w.write_all(b"ni hao\n")?;
            Ok(1)
        })
        .unwrap();
        assert_eq!(lines, 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "ni hao\n");
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn failed_write_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        let res: Result<(), Error> = write_atomically(&path, |w| {
            w.write_all(b"<eps> 0\n")?;
            Err(Error::ReservedSymbol("<s>".to_string()))
        });
        assert!(matches!(res, Err(Error::ReservedSymbol(_))));
        assert!(!path.exists());
        assert!(!tmp_path(&path).exists());
    }
}
