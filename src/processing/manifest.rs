/*! Gzip'd JSON-lines manifests

Manifests (`*.jsonl.gz`) hold one JSON object per line. Pieces of a split manifest are named
`<stem>.<idx>.jsonl.gz`, `idx` being 1-based and zero padded to [PIECE_DIGITS] digits.
!*/
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::{read::MultiGzDecoder, write::GzEncoder, Compression};

use crate::error::Error;
use crate::fs;

pub const EXTENSION: &str = ".jsonl.gz";

/// width of piece indices.
pub const PIECE_DIGITS: usize = 8;

/// `cuts_L_raw` for `data/fbank/cuts_L_raw.jsonl.gz`.
pub fn stem(path: &Path) -> Result<String, Error> {
    path.file_name()
        .and_then(|f| f.to_str())
        .and_then(|f| f.strip_suffix(EXTENSION))
        .map(String::from)
        .ok_or_else(|| Error::Custom(format!("{:?} is not a {} manifest", path, EXTENSION)))
}

/// file name of the `idx`-th piece (1-based).
pub fn piece_name(stem: &str, idx: usize) -> String {
    format!("{}.{:0width$}{}", stem, idx, EXTENSION, width = PIECE_DIGITS)
}

/// Iterator over the non-blank lines of a manifest.
pub struct EntryReader {
    lines: std::io::Lines<BufReader<MultiGzDecoder<File>>>,
}

impl EntryReader {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let f = File::open(path)?;
        Ok(Self {
            lines: BufReader::new(MultiGzDecoder::new(f)).lines(),
        })
    }
}

impl Iterator for EntryReader {
    type Item = Result<String, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            match line {
                Ok(l) if l.trim().is_empty() => continue,
                Ok(l) => return Some(Ok(l)),
                Err(e) => return Some(Err(Error::Io(e))),
            }
        }
        None
    }
}

/// Writes entries to `<path>.tmp`, renamed to `path` on [EntryWriter::finish].
///
/// Dropping the writer without finishing leaves only the temporary file.
pub struct EntryWriter {
    path: PathBuf,
    encoder: GzEncoder<BufWriter<File>>,
    count: usize,
}

impl EntryWriter {
    pub fn create(path: &Path) -> Result<Self, Error> {
        let f = File::create(fs::tmp_path(path))?;
        Ok(Self {
            path: path.to_path_buf(),
            encoder: GzEncoder::new(BufWriter::new(f), Compression::default()),
            count: 0,
        })
    }

    pub fn write(&mut self, entry: &str) -> Result<(), Error> {
        self.encoder.write_all(entry.as_bytes())?;
        self.encoder.write_all(b"\n")?;
        self.count += 1;
        Ok(())
    }

    /// Flush and move into place. Returns the number of written entries.
    pub fn finish(self) -> Result<usize, Error> {
        let mut inner = self.encoder.finish()?;
        inner.flush()?;
        drop(inner);
        fs::commit(&self.path)?;
        Ok(self.count)
    }
}

/// Number of entries of a manifest.
pub fn count_entries(path: &Path) -> Result<usize, Error> {
    let mut count = 0;
    for entry in EntryReader::open(path)? {
        entry?;
        count += 1;
    }
    Ok(count)
}
