//! Transcript extraction from supervision manifests.
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Deserialize;

use crate::error::Error;
use crate::processing::manifest::EntryReader;

/// The only part of a supervision segment we care about.
#[derive(Debug, Deserialize)]
struct Supervision {
    text: Option<String>,
}

/// parse a supervision line, returning its transcript on a single line with double quotes removed.
fn transcript(line: &str) -> Result<Option<String>, Error> {
    let supervision: Supervision = serde_json::from_str(line)?;
    Ok(supervision
        .text
        .map(|t| t.replace('"', "").replace(|c: char| c == '\n' || c == '\r', " ")))
}

/// Transcripts of every supervision of a manifest, in manifest order, read lazily.
///
/// Supervisions without a `text` field are skipped.
pub struct TranscriptReader {
    path: PathBuf,
    entries: EntryReader,
    read: usize,
    skipped: usize,
    done: bool,
}

impl TranscriptReader {
    pub fn open(path: &Path) -> Result<Self, Error> {
        Ok(Self {
            path: path.to_path_buf(),
            entries: EntryReader::open(path)?,
            read: 0,
            skipped: 0,
            done: false,
        })
    }

    fn report(&mut self) {
        self.done = true;
        if self.skipped > 0 {
            warn!("{:?}: {} supervisions have no text", self.path, self.skipped);
        }
        debug!("{:?}: read {} transcripts", self.path, self.read);
    }
}

impl Iterator for TranscriptReader {
    type Item = Result<String, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let entry = match self.entries.next() {
                Some(Ok(entry)) => entry,
                Some(Err(e)) => return Some(Err(e)),
                None => {
                    self.report();
                    return None;
                }
            };
            match transcript(&entry) {
                Ok(Some(t)) => {
                    self.read += 1;
                    return Some(Ok(t));
                }
                Ok(None) => self.skipped += 1,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::manifest::EntryWriter;

    #[test]
    fn quotes_removed() {
        let line = r#"{"id": "Y0000000000_--5llN02F84_S00000", "recording_id": "Y0000000000_--5llN02F84", "start": 0.0, "duration": 2.4, "channel": 0, "text": "怎么样\"好\"吗", "language": "Chinese"}"#;
        assert_eq!(transcript(line).unwrap(), Some("怎么样好吗".to_string()));
    }

    #[test]
    fn line_breaks_flattened() {
        assert_eq!(
            transcript(r#"{"text": "ni\nhao\r\nma"}"#).unwrap(),
            Some("ni hao  ma".to_string())
        );
    }

    #[test]
    fn missing_text() {
        assert_eq!(transcript(r#"{"id": "x"}"#).unwrap(), None);
        assert_eq!(transcript(r#"{"id": "x", "text": null}"#).unwrap(), None);
    }

    #[test]
    fn malformed_line() {
        assert!(matches!(transcript("{\"text\": "), Err(Error::Serde(_))));
    }

    #[test]
    fn read_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wenetspeech_supervisions_L.jsonl.gz");
        let mut w = EntryWriter::create(&path).unwrap();
        w.write(r#"{"id": "a", "text": "你好"}"#).unwrap();
        w.write(r#"{"id": "b"}"#).unwrap();
        w.write(r#"{"id": "c", "text": "世界"}"#).unwrap();
        w.finish().unwrap();

        let mut reader = TranscriptReader::open(&path).unwrap();
        assert_eq!(reader.next().unwrap().unwrap(), "你好");
        assert_eq!(reader.next().unwrap().unwrap(), "世界");
        assert!(reader.next().is_none());
        assert!(reader.next().is_none());
        assert_eq!(reader.skipped, 1);
    }
}
