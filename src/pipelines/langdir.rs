/*! Lang directory preparation (stages 9 to 12)

For a [Variant], `data/lang_<variant>` gets:

- `text`: the `L` transcripts, tokenized. Built once.
- `words.txt`: the symbol table of the tokens of `text`. Rebuilt on each run.
- `L_disambig.pt`: built once by `prepare_lang_wenetspeech.py`.
!*/
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::{error, info};
use rayon::prelude::*;

use crate::config::PrepConfig;
use crate::error::Error;
use crate::fs;
use crate::lang::{self, CharTokenizer, ExternalTokenizer, SymbolTable, Tokenize, Variant};
use crate::process::ToolCommand;
use crate::processing::TranscriptReader;

/// Supervisions the transcripts are taken from.
pub fn supervisions_path(config: &PrepConfig) -> PathBuf {
    config
        .manifests_dir()
        .join("wenetspeech_supervisions_L.jsonl.gz")
}

/// `text2token.py -t <variant>`, or the builtin char tokenizer if asked for.
pub fn tokenizer(config: &PrepConfig, variant: Variant) -> Box<dyn Tokenize> {
    if variant == Variant::Char && config.builtin_char_tokenizer() {
        return Box::new(CharTokenizer);
    }
    let command = ToolCommand::new(config.python())
        .arg(config.script("text2token.py"))
        .arg("-t")
        .arg(variant.as_str());
    Box::new(ExternalTokenizer::new(command, config.work_dir()))
}

/// Write `text` from the supervision manifest.
pub fn prepare_text(
    config: &PrepConfig,
    tokenizer: &dyn Tokenize,
    text: &Path,
) -> Result<(), Error> {
    let supervisions = supervisions_path(config);
    if !supervisions.exists() {
        return Err(Error::MissingPrerequisite {
            path: supervisions,
            hint: "Run stage 1 to prepare the WenetSpeech manifests.".to_string(),
        });
    }
    info!("tokenizing transcripts of {:?} into {:?}", supervisions, text);
    let transcripts = TranscriptReader::open(&supervisions)?;
    let lines = fs::write_atomically(text, |w| tokenizer.tokenize(Box::new(transcripts), w))?;
    info!("wrote {} lines to {:?}", lines, text);
    Ok(())
}

/// Build `words.txt` from `text`.
pub fn prepare_words(text: &Path, words: &Path) -> Result<SymbolTable, Error> {
    let table = SymbolTable::from_lines(BufReader::new(File::open(text)?))?;
    table.write_to_path(words)?;
    info!("wrote {} symbols to {:?}", table.len(), words);
    Ok(table)
}

/// Build every missing file of the lang directory of `variant`, using `tokenizer` for `text`.
pub fn prepare_with(
    config: &PrepConfig,
    variant: Variant,
    tokenizer: &dyn Tokenize,
) -> Result<(), Error> {
    let dir = config.lang_dir(variant);
    std::fs::create_dir_all(&dir)?;

    let text = dir.join(lang::TEXT);
    if text.exists() {
        info!("[{}] reusing {:?}", variant, text);
    } else {
        prepare_text(config, tokenizer, &text)?;
    }

    prepare_words(&text, &dir.join(lang::WORDS))?;

    let lexicon = dir.join(lang::LEXICON);
    if lexicon.exists() {
        info!("[{}] {:?} exists, not rebuilding it", variant, lexicon);
    } else {
        ToolCommand::new(config.python())
            .arg(config.script("prepare_lang_wenetspeech.py"))
            .arg("--lang-dir")
            .arg(&dir)
            .run(config.work_dir())?;
    }
    Ok(())
}

pub fn prepare(config: &PrepConfig, variant: Variant) -> Result<(), Error> {
    let tokenizer = tokenizer(config, variant);
    prepare_with(config, variant, tokenizer.as_ref())
}

/// Check that the lang directory of `variant` is complete and that its `words.txt` is well formed.
pub fn validate(config: &PrepConfig, variant: Variant) -> Result<(), Error> {
    let dir = config.lang_dir(variant);
    let words = dir.join(lang::WORDS);
    let table = SymbolTable::from_path(&words).map_err(|e| match e {
        Error::Io(io) if io.kind() == std::io::ErrorKind::NotFound => Error::MissingPrerequisite {
            path: words.clone(),
            hint: format!("Run the {} lang stage first.", variant),
        },
        e => e,
    })?;

    let lexicon = dir.join(lang::LEXICON);
    if !lexicon.exists() {
        return Err(Error::MissingPrerequisite {
            path: lexicon,
            hint: format!("Run the {} lang stage first.", variant),
        });
    }
    info!("[{}] {} symbols, lexicon present", variant, table.len());
    Ok(())
}

/// Validate every variant, reporting every failure before returning.
pub fn validate_all(config: &PrepConfig) -> Result<(), Error> {
    let failures: Vec<(Variant, Error)> = Variant::ALL
        .into_par_iter()
        .filter_map(|variant| validate(config, variant).err().map(|e| (variant, e)))
        .collect();

    if failures.is_empty() {
        return Ok(());
    }
    for (variant, e) in &failures {
        error!("[{}] {}", variant, e);
    }
    Err(Error::Custom(format!(
        "{} lang directories are incomplete: see previous messages.",
        failures.len()
    )))
}
