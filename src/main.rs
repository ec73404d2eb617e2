//! # wenetspeech-prep
//!
//! Staged preparation of the WenetSpeech and MUSAN corpora for ASR training:
//! manifests, features, split/combine of the `L` subset and char/pinyin/lazy_pinyin lang directories.
//!
//! ## Getting started
//!
//! ```sh
//! # everything
//! wenetspeech-prep --dl-dir /corpora
//!
//! # only the lang directories
//! wenetspeech-prep --stage 9 --stop-stage 11
//! ```
//!
//! Logs go to stderr, `RUST_LOG=debug` for more.
use env_logger::Env;
use structopt::StructOpt;

use wenetspeech_prep::cli::Prepare;
use wenetspeech_prep::config::PrepConfig;
use wenetspeech_prep::error::Error;
use wenetspeech_prep::pipelines::{Pipeline, WenetSpeechPrep};

#[macro_use]
extern crate log;

fn run(opt: Prepare) -> Result<(), Error> {
    let config = PrepConfig::try_from(opt)?;
    debug!("config\n{:#?}", config);

    let report = WenetSpeechPrep::new(config).run()?;
    info!(
        "done: {} stages run, {} already complete",
        report.executed.len(),
        report.skipped.len()
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let opt = Prepare::from_args();
    debug!("cli args\n{:#?}", opt);

    if let Err(e) = run(opt) {
        error!("{}", e);
        std::process::exit(e.exit_code());
    }
}
