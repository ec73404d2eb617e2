//! WenetSpeech preparation pipeline
//!
//! Thirteen stages, from raw corpora to lang directories:
//!
//! | stage | work |
//! |---|---|
//! | 0 | check WenetSpeech, download MUSAN |
//! | 1, 2 | lhotse manifests |
//! | 3 | manifest preprocessing |
//! | 4 | DEV/TEST features |
//! | 5, 6, 7 | split L, extract features by piece, combine |
//! | 8 | MUSAN features |
//! | 9, 10, 11 | char, pinyin and lazy_pinyin lang directories |
//! | 12 | lang directories validation |
//!
//! Feature extraction and lexicon construction are done by the recipe scripts in `local/`.
use std::path::PathBuf;

use log::info;

use crate::config::{PrepConfig, SPLIT_SUBSET};
use crate::error::Error;
use crate::fs::LocalFs;
use crate::lang::Variant;
use crate::pipelines::langdir;
use crate::pipelines::pipeline::Pipeline;
use crate::pipelines::runner::{RunReport, Runner};
use crate::pipelines::stage::{Completion, Prerequisite, Stage};
use crate::process::ToolCommand;
use crate::processing::{self, manifest};

/// Subsets extracted together at stage 4.
const DEV_TEST_SUBSETS: [&str; 3] = ["DEV", "TEST_NET", "TEST_MEETING"];
const MUSAN_PARTS: [&str; 3] = ["music", "speech", "noise"];

const WENETSPEECH_HINT: &str = "WenetSpeech needs credentials and has to be downloaded by hand \
(see https://github.com/wenet-e2e/WenetSpeech), then placed in the download directory.";

fn python_script(config: &PrepConfig, script: &str) -> ToolCommand {
    ToolCommand::new(config.python()).arg(config.script(script))
}

/// manifests produced by `lhotse prepare wenet-speech` that later stages read.
fn wenetspeech_manifests(config: &PrepConfig) -> Vec<PathBuf> {
    let dir = config.manifests_dir();
    [SPLIT_SUBSET]
        .iter()
        .chain(DEV_TEST_SUBSETS.iter())
        .flat_map(|subset| {
            [
                dir.join(format!("wenetspeech_recordings_{}.jsonl.gz", subset)),
                dir.join(format!("wenetspeech_supervisions_{}.jsonl.gz", subset)),
            ]
        })
        .collect()
}

fn musan_manifests(config: &PrepConfig) -> Vec<PathBuf> {
    MUSAN_PARTS
        .iter()
        .map(|part| {
            config
                .manifests_dir()
                .join(format!("musan_recordings_{}.jsonl.gz", part))
        })
        .collect()
}

fn raw_cuts(config: &PrepConfig) -> PathBuf {
    config
        .fbank_dir()
        .join(format!("cuts_{}_raw{}", SPLIT_SUBSET, manifest::EXTENSION))
}

fn combined_cuts(config: &PrepConfig) -> PathBuf {
    config
        .fbank_dir()
        .join(format!("cuts_{}{}", SPLIT_SUBSET, manifest::EXTENSION))
}

/// WenetSpeech is checked on every run, MUSAN is only downloaded when absent.
fn download_data(config: &PrepConfig) -> Result<(), Error> {
    Prerequisite {
        path: config.wenetspeech_dir(),
        hint: WENETSPEECH_HINT.to_string(),
    }
    .check(&LocalFs)?;
    if config.musan_dir().exists() {
        info!("{:?} exists, not downloading MUSAN", config.musan_dir());
        return Ok(());
    }
    std::fs::create_dir_all(config.dl_dir())?;
    ToolCommand::new(config.lhotse())
        .arg("download")
        .arg("musan")
        .arg(config.dl_dir())
        .run(config.work_dir())
}

fn prepare_wenetspeech_manifests(config: &PrepConfig) -> Result<(), Error> {
    std::fs::create_dir_all(config.manifests_dir())?;
    ToolCommand::new(config.lhotse())
        .arg("prepare")
        .arg("wenet-speech")
        .arg(config.wenetspeech_dir())
        .arg(config.manifests_dir())
        .arg("-j")
        .arg(config.num_jobs().to_string())
        .run(config.work_dir())
}

fn prepare_musan_manifests(config: &PrepConfig) -> Result<(), Error> {
    std::fs::create_dir_all(config.manifests_dir())?;
    ToolCommand::new(config.lhotse())
        .arg("prepare")
        .arg("musan")
        .arg(config.musan_dir())
        .arg(config.manifests_dir())
        .run(config.work_dir())
}

fn split_subset(config: &PrepConfig) -> Result<(), Error> {
    let pieces = processing::split(&raw_cuts(config), config.num_splits(), &config.split_dir())?;
    info!("wrote {} pieces to {:?}", pieces.len(), config.split_dir());
    Ok(())
}

fn compute_subset_features(config: &PrepConfig) -> Result<(), Error> {
    python_script(config, "compute_fbank_wenetspeech_splits.py")
        .arg("--training-subset")
        .arg(SPLIT_SUBSET)
        .arg("--num-workers")
        .arg(config.num_jobs().to_string())
        .arg("--batch-duration")
        .arg("600")
        .arg("--start")
        .arg("0")
        .arg("--num-splits")
        .arg(config.num_splits().to_string())
        .run(config.work_dir())
}

fn combine_subset(config: &PrepConfig) -> Result<(), Error> {
    let stem = format!("cuts_{}", SPLIT_SUBSET);
    let pieces = processing::pieces(&config.split_dir(), &stem)?;
    if pieces.len() != config.num_splits() {
        return Err(Error::Split(format!(
            "found {} of {} processed pieces in {:?}",
            pieces.len(),
            config.num_splits(),
            config.split_dir()
        )));
    }
    let nb_entries = processing::combine(&pieces, &combined_cuts(config))?;
    info!("combined {} cuts into {:?}", nb_entries, combined_cuts(config));
    Ok(())
}

/// Every stage of the recipe.
pub fn stages(config: &PrepConfig) -> Vec<Stage<'_>> {
    let fbank = config.fbank_dir();

    let mut stages = vec![
        Stage::new(0, "Download data", move || download_data(config)),
        Stage::new(1, "Prepare WenetSpeech manifest", move || {
            prepare_wenetspeech_manifests(config)
        })
        .requires(config.wenetspeech_dir(), WENETSPEECH_HINT)
        .complete_when(Completion::AllOf(wenetspeech_manifests(config))),
        Stage::new(2, "Prepare musan manifest", move || {
            prepare_musan_manifests(config)
        })
        .requires(config.musan_dir(), "Run stage 0 to download MUSAN.")
        .complete_when(Completion::AllOf(musan_manifests(config))),
        Stage::new(3, "Preprocess WenetSpeech manifest", move || {
            std::fs::create_dir_all(config.fbank_dir())?;
            python_script(config, "preprocess_wenetspeech.py").run(config.work_dir())
        })
        .complete_when(Completion::Marker(fbank.join(".preprocess_complete"))),
        Stage::new(4, "Compute features for DEV and TEST subsets", move || {
            python_script(config, "compute_fbank_wenetspeech_dev_test.py").run(config.work_dir())
        })
        .complete_when(Completion::AllOf(
            DEV_TEST_SUBSETS
                .iter()
                .map(|s| fbank.join(format!("cuts_{}{}", s, manifest::EXTENSION)))
                .collect(),
        )),
        Stage::new(
            5,
            &format!(
                "Split {} subset into {} pieces",
                SPLIT_SUBSET,
                config.num_splits()
            ),
            move || split_subset(config),
        )
        .requires(raw_cuts(config), "Run stage 3 to preprocess the manifests.")
        .complete_when(Completion::Marker(
            config.split_dir().join(".split_completed"),
        )),
        Stage::new(
            6,
            &format!("Compute features for {}", SPLIT_SUBSET),
            move || compute_subset_features(config),
        )
        .requires(config.split_dir(), "Run stage 5 to split the subset."),
        Stage::new(
            7,
            &format!("Combine features for {}", SPLIT_SUBSET),
            move || combine_subset(config),
        )
        .requires(config.split_dir(), "Run stage 5 to split the subset.")
        .complete_when(Completion::Artifact(combined_cuts(config))),
        Stage::new(8, "Compute features for musan", move || {
            python_script(config, "compute_fbank_musan.py").run(config.work_dir())
        })
        .complete_when(Completion::Artifact(fbank.join("musan_cuts.jsonl.gz"))),
    ];

    for (index, variant) in (9..).zip(Variant::ALL) {
        stages.push(Stage::new(
            index,
            &format!("Prepare {} based lang", variant),
            move || langdir::prepare(config, variant),
        ));
    }

    stages.push(
        Stage::new(12, "Validate lang directories", move || {
            langdir::validate_all(config)
        })
        .complete_when(Completion::Marker(config.data_dir().join(".lang_complete"))),
    );

    stages
}

/// The whole recipe, run against the local filesystem.
pub struct WenetSpeechPrep {
    config: PrepConfig,
}

impl WenetSpeechPrep {
    pub fn new(config: PrepConfig) -> Self {
        Self { config }
    }
}

impl Pipeline<RunReport> for WenetSpeechPrep {
    fn run(&self) -> Result<RunReport, Error> {
        info!(
            "running stages {} to {} in {:?}",
            self.config.stage(),
            self.config.stop_stage(),
            self.config.work_dir()
        );
        let runner = Runner::new(&self.config, stages(&self.config), LocalFs)?;
        runner.run()
    }
}
