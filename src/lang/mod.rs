/*! Lang directories

A lang directory (`data/lang_<variant>`) holds the tokenized transcripts (`text`),
the word symbol table (`words.txt`) and the lexicon FST (`L_disambig.pt`, built by a collaborator).
!*/
pub mod tokenizer;
mod variant;
pub mod vocabulary;

pub use tokenizer::{CharTokenizer, ExternalTokenizer, Tokenize};
pub use variant::Variant;
pub use vocabulary::{build_vocabulary, SymbolTable};

pub const TEXT: &str = "text";
pub const WORDS: &str = "words.txt";
pub const LEXICON: &str = "L_disambig.pt";
