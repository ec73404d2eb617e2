use std::fmt;

/// Tokenization unit a lang directory is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Char,
    Pinyin,
    LazyPinyin,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Char, Variant::Pinyin, Variant::LazyPinyin];

    /// value of `text2token.py -t`, also used in directory names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Char => "char",
            Variant::Pinyin => "pinyin",
            Variant::LazyPinyin => "lazy_pinyin",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
