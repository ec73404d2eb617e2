//! Stages and their completion predicates.
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::fs::FileSystem;

/// Work done by a stage.
pub type Action<'a> = Box<dyn Fn() -> Result<(), Error> + 'a>;

/// Tells whether a stage's work is already done, by looking at the filesystem only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Always run.
    None,
    /// Zero-byte file written by the runner once the action succeeded.
    Marker(PathBuf),
    /// File produced by the action itself.
    Artifact(PathBuf),
    /// Every listed artifact exists.
    AllOf(Vec<PathBuf>),
}

impl Completion {
    pub fn is_satisfied(&self, fs: &dyn FileSystem) -> bool {
        match self {
            Completion::None => false,
            Completion::Marker(p) | Completion::Artifact(p) => fs.exists(p),
            // an empty list would make the stage a no-op forever
            Completion::AllOf(paths) => !paths.is_empty() && paths.iter().all(|p| fs.exists(p)),
        }
    }

    /// Marker to write after a successful run, if any.
    pub fn marker(&self) -> Option<&Path> {
        match self {
            Completion::Marker(p) => Some(p.as_path()),
            _ => None,
        }
    }
}

/// A directory or file that has to exist before a stage's action runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prerequisite {
    pub path: PathBuf,
    pub hint: String,
}

impl Prerequisite {
    pub fn check(&self, fs: &dyn FileSystem) -> Result<(), Error> {
        if fs.exists(&self.path) {
            Ok(())
        } else {
            Err(Error::MissingPrerequisite {
                path: self.path.clone(),
                hint: self.hint.clone(),
            })
        }
    }
}

pub struct Stage<'a> {
    index: i32,
    description: String,
    prerequisites: Vec<Prerequisite>,
    completion: Completion,
    action: Action<'a>,
}

impl<'a> Stage<'a> {
    pub fn new<F>(index: i32, description: &str, action: F) -> Self
    where
        F: Fn() -> Result<(), Error> + 'a,
    {
        Self {
            index,
            description: description.to_string(),
            prerequisites: Vec::new(),
            completion: Completion::None,
            action: Box::new(action),
        }
    }

    pub fn requires(mut self, path: PathBuf, hint: &str) -> Self {
        self.prerequisites.push(Prerequisite {
            path,
            hint: hint.to_string(),
        });
        self
    }

    pub fn complete_when(mut self, completion: Completion) -> Self {
        self.completion = completion;
        self
    }

    pub fn index(&self) -> i32 {
        self.index
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn completion(&self) -> &Completion {
        &self.completion
    }

    pub fn check_prerequisites(&self, fs: &dyn FileSystem) -> Result<(), Error> {
        self.prerequisites.iter().try_for_each(|p| p.check(fs))
    }

    pub fn run_action(&self) -> Result<(), Error> {
        (self.action)()
    }
}

impl fmt::Debug for Stage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("index", &self.index)
            .field("description", &self.description)
            .field("prerequisites", &self.prerequisites)
            .field("completion", &self.completion)
            .finish()
    }
}
