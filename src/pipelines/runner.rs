/*! Staged pipeline runner

Runs the stages whose index lies in `[stage, stop_stage]`, in ascending order:

1. log the stage,
2. skip it if its completion predicate holds,
3. check its prerequisites,
4. run its action, stopping the whole run on the first error,
5. write its marker, if it has one.

Stages out of range have no side effect.
!*/
use log::{debug, info};

use crate::config::PrepConfig;
use crate::error::Error;
use crate::fs::FileSystem;
use crate::pipelines::pipeline::Pipeline;
use crate::pipelines::stage::Stage;

/// What happened to the stages of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Stages whose action ran.
    pub executed: Vec<i32>,
    /// Stages found already complete.
    pub skipped: Vec<i32>,
}

pub struct Runner<'a, F: FileSystem> {
    config: &'a PrepConfig,
    stages: Vec<Stage<'a>>,
    fs: F,
}

impl<'a, F: FileSystem> Runner<'a, F> {
    /// Stages are reordered by index. Two stages sharing an index is an error.
    pub fn new(config: &'a PrepConfig, mut stages: Vec<Stage<'a>>, fs: F) -> Result<Self, Error> {
        stages.sort_by_key(Stage::index);
        if let Some(w) = stages.windows(2).find(|w| w[0].index() == w[1].index()) {
            return Err(Error::Custom(format!(
                "stages {:?} and {:?} share index {}",
                w[0].description(),
                w[1].description(),
                w[0].index()
            )));
        }
        Ok(Self { config, stages, fs })
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    fn run_stage(&self, stage: &Stage<'a>, report: &mut RunReport) -> Result<(), Error> {
        info!("Stage {}: {}", stage.index(), stage.description());
        if stage.completion().is_satisfied(&self.fs) {
            info!("Stage {}: already done, skipping", stage.index());
            report.skipped.push(stage.index());
            return Ok(());
        }

        stage.check_prerequisites(&self.fs)?;
        stage.run_action()?;
        if let Some(marker) = stage.completion().marker() {
            debug!("Stage {}: writing marker {:?}", stage.index(), marker);
            self.fs.touch(marker)?;
        }
        report.executed.push(stage.index());
        Ok(())
    }
}

impl<F: FileSystem> Pipeline<RunReport> for Runner<'_, F> {
    fn run(&self) -> Result<RunReport, Error> {
        let mut report = RunReport::default();
        for stage in &self.stages {
            if !self.config.in_range(stage.index()) {
                debug!("Stage {} out of range", stage.index());
                continue;
            }
            self.run_stage(stage, &mut report)?;
        }
        Ok(report)
    }
}
