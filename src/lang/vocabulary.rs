/*! Vocabulary (word symbol table) construction.

A table is written as one `<symbol> <index>` line per symbol, indices ascending:

```text
<eps> 0
<SIL> 1
<SPOKEN_NOISE> 2
<UNK> 3
...corpus tokens, byte-wise sorted...
#0 N+1
<s> N+2
</s> N+3
```

Sorting is byte-wise on UTF-8 (same as `LC_ALL=C sort -u`), so output does not depend on the host locale.
!*/
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::Path;

use itertools::Itertools;
use log::{debug, warn};

use crate::error::Error;
use crate::fs;

pub const EPSILON: &str = "<eps>";
pub const DISAMBIG: &str = "#0";
pub const SENTENCE_START: &str = "<s>";
pub const SENTENCE_END: &str = "</s>";

/// Always present in the table, even when the corpus doesn't have them.
pub const PLACEHOLDERS: [&str; 3] = ["<SIL>", "<SPOKEN_NOISE>", "<UNK>"];

/// Symbols synthesized at the end of the table. Having them in the corpus is an error.
pub const FORBIDDEN: [&str; 2] = [SENTENCE_START, SENTENCE_END];

/// Symbols with a fixed position that can't appear twice.
const FIXED: [&str; 2] = [EPSILON, DISAMBIG];

/// Symbol table, the index of a symbol being its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: Vec<String>,
}

/// Build a table from `tokens` and `placeholders`.
///
/// Empty tokens are ignored and duplicates collapse. Fails with [Error::ReservedSymbol]
/// as soon as `<s>` or `</s>` is met.
pub fn build_vocabulary<I, S>(tokens: I, placeholders: &[&str]) -> Result<SymbolTable, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let sorted = tokens
        .into_iter()
        .filter(|t| !t.as_ref().is_empty())
        .map(|t| t.as_ref().to_string())
        .chain(placeholders.iter().map(|p| p.to_string()))
        .sorted()
        .dedup();

    let mut symbols = vec![EPSILON.to_string()];
    for symbol in sorted {
        if FORBIDDEN.contains(&symbol.as_str()) {
            return Err(Error::ReservedSymbol(symbol));
        }
        if FIXED.contains(&symbol.as_str()) {
            warn!("dropping {} from the vocabulary: it has a fixed index", symbol);
            continue;
        }
        symbols.push(symbol);
    }

    symbols.extend(
        [DISAMBIG, SENTENCE_START, SENTENCE_END]
            .iter()
            .map(|s| s.to_string()),
    );
    debug!("built vocabulary of {} symbols", symbols.len());
    Ok(SymbolTable { symbols })
}

impl SymbolTable {
    /// Build from tokens, with the default [PLACEHOLDERS].
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        build_vocabulary(tokens, &PLACEHOLDERS)
    }

    /// Build from whitespace separated tokenized text (one utterance per line).
    pub fn from_text(text: &str) -> Result<Self, Error> {
        Self::from_tokens(text.split_whitespace())
    }

    /// Same as [SymbolTable::from_text], reading line by line and only keeping distinct tokens around.
    pub fn from_lines<R: BufRead>(r: R) -> Result<Self, Error> {
        let mut tokens: HashSet<String> = HashSet::new();
        for line in r.lines() {
            let line = line?;
            for token in line.split_whitespace() {
                if !tokens.contains(token) {
                    tokens.insert(token.to_string());
                }
            }
        }
        Self::from_tokens(tokens)
    }

    /// Number of symbols, `<eps>` included.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn index_of(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    pub fn symbol(&self, index: usize) -> Option<&str> {
        self.symbols.get(index).map(String::as_str)
    }

    /// `(symbol, index)` pairs, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(idx, s)| (s.as_str(), idx))
    }

    pub fn write<W: Write>(&self, mut w: W) -> io::Result<()> {
        for (symbol, idx) in self.iter() {
            writeln!(w, "{} {}", symbol, idx)?;
        }
        w.flush()
    }

    /// Write to `path`, which is either left absent, untouched or complete.
    pub fn write_to_path(&self, path: &Path) -> Result<(), Error> {
        fs::write_atomically(path, |w| self.write(w).map_err(Error::from))
    }

    /// Parse a `words.txt` table and check that it is well formed.
    pub fn read<R: BufRead>(r: R) -> Result<Self, Error> {
        let mut symbols: Vec<String> = Vec::new();
        for (nb, line) in r.lines().enumerate() {
            let line = line?;
            let lineno = nb + 1;
            let invalid = |reason: String| Error::InvalidTable {
                line: lineno,
                reason,
            };

            let (symbol, idx) = line
                .split_whitespace()
                .collect_tuple::<(&str, &str)>()
                .ok_or_else(|| invalid(format!("expected `<symbol> <index>`, got {:?}", line)))?;
            let idx: usize = idx
                .parse()
                .map_err(|_| invalid(format!("bad index {:?}", idx)))?;

            if idx != symbols.len() {
                return Err(invalid(format!(
                    "index {} where {} was expected",
                    idx,
                    symbols.len()
                )));
            }
            if symbols.iter().any(|s| s == symbol) {
                return Err(invalid(format!("duplicate symbol {}", symbol)));
            }
            symbols.push(symbol.to_string());
        }

        let table = SymbolTable { symbols };
        table.check_fixed_symbols()?;
        Ok(table)
    }

    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let f = File::open(path)?;
        Self::read(io::BufReader::new(f))
    }

    fn check_fixed_symbols(&self) -> Result<(), Error> {
        let n = self.symbols.len();
        if self.symbol(0) != Some(EPSILON) {
            return Err(Error::InvalidTable {
                line: 1,
                reason: format!("table has to start with {} 0", EPSILON),
            });
        }
        if n < 4 || self.symbols[n - 3..] != [DISAMBIG, SENTENCE_START, SENTENCE_END] {
            return Err(Error::InvalidTable {
                line: n,
                reason: format!(
                    "table has to end with {}, {}, {}",
                    DISAMBIG, SENTENCE_START, SENTENCE_END
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(table: &SymbolTable) -> Vec<String> {
        let mut out = Vec::new();
        table.write(&mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    #[test]
    fn placeholders_and_tokens() {
        let table = SymbolTable::from_tokens(["a", "b", "c"]).unwrap();
        assert_eq!(
            lines(&table),
            vec![
                "<eps> 0",
                "<SIL> 1",
                "<SPOKEN_NOISE> 2",
                "<UNK> 3",
                "a 4",
                "b 5",
                "c 6",
                "#0 7",
                "<s> 8",
                "</s> 9",
            ]
        );
    }

    #[test]
    fn duplicates_collapse() {
        let with_dup = SymbolTable::from_tokens(["a", "b", "a", "c"]).unwrap();
        let without = SymbolTable::from_tokens(["c", "b", "a"]).unwrap();
        assert_eq!(with_dup, without);
        assert_eq!(with_dup.len(), 10);
    }

    #[test]
    fn placeholders_in_corpus() {
        let table = SymbolTable::from_tokens(["<UNK>", "x", "<SIL>"]).unwrap();
        assert_eq!(table.index_of("<UNK>"), Some(3));
        assert_eq!(table.index_of("x"), Some(4));
        assert_eq!(table.len(), 8);
    }

    #[test]
    fn byte_wise_order() {
        // digits < '<' < uppercase < lowercase < CJK
        let table = SymbolTable::from_tokens(["好", "b", "B", "1"]).unwrap();
        let symbols: Vec<&str> = table.iter().map(|(s, _)| s).collect();
        assert_eq!(
            symbols,
            vec![
                "<eps>",
                "1",
                "<SIL>",
                "<SPOKEN_NOISE>",
                "<UNK>",
                "B",
                "b",
                "好",
                "#0",
                "<s>",
                "</s>"
            ]
        );
    }

    #[test]
    fn sentence_symbols_rejected() {
        for forbidden in FORBIDDEN {
            match SymbolTable::from_tokens(["a", forbidden, "b"]) {
                Err(Error::ReservedSymbol(s)) => assert_eq!(s, forbidden),
                other => panic!("expected reserved symbol error, got {:?}", other),
            }
        }
    }

    #[test]
    fn fixed_symbols_not_duplicated() {
        let table = SymbolTable::from_tokens(["#0", "a", "<eps>"]).unwrap();
        assert_eq!(table.index_of("<eps>"), Some(0));
        assert_eq!(table.index_of("#0"), Some(5));
        assert_eq!(table.len(), 8);
    }

    #[test]
    fn empty_corpus() {
        let table = SymbolTable::from_text("\n  \n").unwrap();
        assert_eq!(table.len(), 7);
        assert_eq!(table.symbol(4), Some("#0"));
    }

    #[test]
    fn custom_placeholders() {
        let table = build_vocabulary(["z"], &["<UNK>"]).unwrap();
        assert_eq!(table.symbol(1), Some("<UNK>"));
        assert_eq!(table.symbol(2), Some("z"));
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn from_text_splits_whitespace() {
        let table = SymbolTable::from_text("你 好\n世 界  你\n").unwrap();
        assert_eq!(table.len(), 11);
        assert!(table.index_of("世").is_some());
    }

    #[test]
    fn from_lines_matches_from_text() {
        let text = "b a\nc a b\n\n好 a\n";
        assert_eq!(
            SymbolTable::from_lines(text.as_bytes()).unwrap(),
            SymbolTable::from_text(text).unwrap()
        );
    }

    #[test]
    fn read_back() {
        let table = SymbolTable::from_text("ni hao\nshi jie").unwrap();
        let mut out = Vec::new();
        table.write(&mut out).unwrap();
        assert_eq!(SymbolTable::read(out.as_slice()).unwrap(), table);
    }

    #[test]
    fn read_rejects_gaps() {
        let text = "<eps> 0\na 1\nb 3\n#0 4\n<s> 5\n</s> 6\n";
        match SymbolTable::read(text.as_bytes()) {
            Err(Error::InvalidTable { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn read_rejects_missing_tail() {
        let text = "<eps> 0\na 1\nb 2\n";
        assert!(matches!(
            SymbolTable::read(text.as_bytes()),
            Err(Error::InvalidTable { .. })
        ));
    }

    #[test]
    fn write_to_path_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        SymbolTable::from_tokens(["a"]).unwrap().write_to_path(&path).unwrap();
        assert!(path.exists());
        assert!(!dir.path().join("words.txt.tmp").exists());
        assert_eq!(SymbolTable::from_path(&path).unwrap().len(), 8);
    }
}
