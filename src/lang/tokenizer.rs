//! Transcript tokenizers.
//!
//! The three lexicon variants only differ in the [Tokenize] implementation applied to the same transcripts.
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use unicode_segmentation::UnicodeSegmentation;

use crate::error::Error;
use crate::process::{Lines, ToolCommand};

pub trait Tokenize {
    /// Tokenize `transcripts` into `out`, one line of space separated tokens per transcript.
    /// Returns the number of written lines.
    fn tokenize(&self, transcripts: Lines, out: &mut dyn Write) -> Result<usize, Error>;
}

/// Counts the lines going through a writer.
struct LineCounter<'a> {
    inner: &'a mut dyn Write,
    lines: usize,
}

impl Write for LineCounter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.lines += buf[..n].iter().filter(|&&b| b == b'\n').count();
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Pipes transcripts through a tokenization script (`text2token.py -t <mode>`).
pub struct ExternalTokenizer {
    command: ToolCommand,
    cwd: PathBuf,
}

impl ExternalTokenizer {
    pub fn new(command: ToolCommand, cwd: &Path) -> Self {
        Self {
            command,
            cwd: cwd.to_path_buf(),
        }
    }
}

impl Tokenize for ExternalTokenizer {
    fn tokenize(&self, transcripts: Lines, out: &mut dyn Write) -> Result<usize, Error> {
        let mut counter = LineCounter {
            inner: out,
            lines: 0,
        };
        let fed = self.command.run_piped(&self.cwd, transcripts, &mut counter)?;
        if counter.lines != fed {
            return Err(Error::Custom(format!(
                "`{}` gave {} lines for {} transcripts",
                self.command.rendered(),
                counter.lines,
                fed
            )));
        }
        Ok(fed)
    }
}

/// Splits transcripts into grapheme clusters. Whitespace is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct CharTokenizer;

impl CharTokenizer {
    fn tokenize_line(line: &str) -> String {
        line.graphemes(true)
            .filter(|g| !g.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Tokenize for CharTokenizer {
    fn tokenize(&self, transcripts: Lines, out: &mut dyn Write) -> Result<usize, Error> {
        let mut lines = 0;
        for t in transcripts {
            writeln!(out, "{}", Self::tokenize_line(&t?))?;
            lines += 1;
        }
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::{CharTokenizer, ExternalTokenizer, Tokenize};
    use crate::error::Error;
    use crate::process::{Lines, ToolCommand};

    fn lines(transcripts: &[&str]) -> Lines {
        let owned: Vec<Result<String, Error>> =
            transcripts.iter().map(|t| Ok(t.to_string())).collect();
        Box::new(owned.into_iter())
    }

    fn tokenize(tok: &dyn Tokenize, transcripts: &[&str]) -> Result<(usize, String), Error> {
        let mut out = Vec::new();
        let n = tok.tokenize(lines(transcripts), &mut out)?;
        Ok((n, String::from_utf8(out).unwrap()))
    }

    #[test]
    fn chars() {
        let (n, out) = tokenize(&CharTokenizer, &["今天 天气好", "OK吗"]).unwrap();
        assert_eq!(n, 2);
        assert_eq!(out, "今 天 天 气 好\nO K 吗\n");
    }

    #[test]
    fn chars_empty() {
        assert_eq!(tokenize(&CharTokenizer, &[]).unwrap(), (0, String::new()));
    }

    #[cfg(unix)]
    #[test]
    fn external() {
        let dir = tempfile::tempdir().unwrap();
        let tok = ExternalTokenizer::new(
            ToolCommand::new("tr").arg("a-z").arg("A-Z"),
            dir.path(),
        );
        let (n, out) = tokenize(&tok, &["ni hao", "zai jian"]).unwrap();
        assert_eq!(n, 2);
        assert_eq!(out, "NI HAO\nZAI JIAN\n");
    }

    #[cfg(unix)]
    #[test]
    fn external_line_count_is_checked() {
        let dir = tempfile::tempdir().unwrap();
        // turns each space into a line break
        let tok = ExternalTokenizer::new(
            ToolCommand::new("tr").arg(" ").arg("\n"),
            dir.path(),
        );
        assert!(matches!(
            tokenize(&tok, &["ni hao", "zai jian"]),
            Err(Error::Custom(_))
        ));
    }
}
