pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod lang;
pub mod pipelines;
pub mod process;
pub mod processing;
