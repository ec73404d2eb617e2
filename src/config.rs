//! Run configuration.
//!
//! A [PrepConfig] is built once from the command line and only ever handed out by reference.
//! Every path it returns is absolute, so that collaborators can be spawned from `work_dir`
//! and still agree with the paths we check on our side.
use std::path::{Path, PathBuf};

use crate::cli::Prepare;
use crate::error::Error;
use crate::lang::Variant;

/// Subset that gets split into pieces for feature extraction.
pub const SPLIT_SUBSET: &str = "L";

#[derive(Debug, Clone)]
pub struct PrepConfig {
    stage: i32,
    stop_stage: i32,
    num_splits: usize,
    num_jobs: usize,
    dl_dir: PathBuf,
    work_dir: PathBuf,
    local_dir: PathBuf,
    python: String,
    lhotse: String,
    builtin_char_tokenizer: bool,
}

impl PrepConfig {
    /// Configuration with the recipe defaults. `work_dir` and `dl_dir` have to be absolute.
    pub fn new(work_dir: PathBuf, dl_dir: PathBuf) -> Self {
        let local_dir = work_dir.join("local");
        Self {
            stage: 0,
            stop_stage: 100,
            num_splits: 1000,
            num_jobs: 15,
            dl_dir,
            work_dir,
            local_dir,
            python: "python3".to_string(),
            lhotse: "lhotse".to_string(),
            builtin_char_tokenizer: false,
        }
    }

    pub fn with_stages(mut self, stage: i32, stop_stage: i32) -> Self {
        self.stage = stage;
        self.stop_stage = stop_stage;
        self
    }

    pub fn with_num_splits(mut self, num_splits: usize) -> Self {
        self.num_splits = num_splits;
        self
    }

    pub fn with_num_jobs(mut self, num_jobs: usize) -> Self {
        self.num_jobs = num_jobs;
        self
    }

    pub fn with_programs(mut self, python: &str, lhotse: &str) -> Self {
        self.python = python.to_string();
        self.lhotse = lhotse.to_string();
        self
    }

    pub fn with_local_dir(mut self, local_dir: &Path) -> Self {
        self.local_dir = self.work_dir.join(local_dir);
        self
    }

    pub fn with_builtin_char_tokenizer(mut self, enabled: bool) -> Self {
        self.builtin_char_tokenizer = enabled;
        self
    }

    pub fn stage(&self) -> i32 {
        self.stage
    }

    pub fn stop_stage(&self) -> i32 {
        self.stop_stage
    }

    /// true if `index` lies in `[stage, stop_stage]`.
    pub fn in_range(&self, index: i32) -> bool {
        self.stage <= index && index <= self.stop_stage
    }

    pub fn num_splits(&self) -> usize {
        self.num_splits
    }

    pub fn num_jobs(&self) -> usize {
        self.num_jobs
    }

    pub fn python(&self) -> &str {
        &self.python
    }

    pub fn lhotse(&self) -> &str {
        &self.lhotse
    }

    pub fn builtin_char_tokenizer(&self) -> bool {
        self.builtin_char_tokenizer
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn dl_dir(&self) -> &Path {
        &self.dl_dir
    }

    pub fn wenetspeech_dir(&self) -> PathBuf {
        self.dl_dir.join("WenetSpeech")
    }

    pub fn musan_dir(&self) -> PathBuf {
        self.dl_dir.join("musan")
    }

    /// path to a recipe script in `local/`.
    pub fn script(&self, name: &str) -> PathBuf {
        self.local_dir.join(name)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.work_dir.join("data")
    }

    pub fn manifests_dir(&self) -> PathBuf {
        self.data_dir().join("manifests")
    }

    pub fn fbank_dir(&self) -> PathBuf {
        self.data_dir().join("fbank")
    }

    /// `data/fbank/L_split_<num_splits>`
    pub fn split_dir(&self) -> PathBuf {
        self.fbank_dir()
            .join(format!("{}_split_{}", SPLIT_SUBSET, self.num_splits))
    }

    /// `data/lang_<variant>`
    pub fn lang_dir(&self, variant: Variant) -> PathBuf {
        self.data_dir().join(format!("lang_{}", variant))
    }
}

impl TryFrom<Prepare> for PrepConfig {
    type Error = Error;

    fn try_from(opt: Prepare) -> Result<Self, Error> {
        let cwd = std::env::current_dir()?;
        let work_dir = cwd.join(&opt.work_dir);
        let dl_dir = match opt.dl_dir {
            Some(dl_dir) => cwd.join(dl_dir),
            None => cwd.join("download"),
        };

        Ok(PrepConfig::new(work_dir, dl_dir)
            .with_stages(opt.stage, opt.stop_stage)
            .with_num_splits(opt.num_splits)
            .with_num_jobs(opt.num_jobs)
            .with_programs(&opt.python, &opt.lhotse)
            .with_local_dir(&opt.local_dir)
            .with_builtin_char_tokenizer(opt.builtin_char_tokenizer))
    }
}
