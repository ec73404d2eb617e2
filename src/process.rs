//! Invocation of external collaborators (`lhotse`, recipe python scripts).
//!
//! Collaborators inherit stderr so that their own diagnostics reach the user unchanged.
//! A non-zero exit becomes [Error::ToolFailure] carrying the exit status.
use std::ffi::{OsStr, OsString};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use log::{debug, info};

use crate::error::Error;

/// Lines fed to a collaborator's stdin.
pub type Lines = Box<dyn Iterator<Item = Result<String, Error>> + Send>;

#[must_use]
pub fn command_exists(program: &str) -> bool {
    which::which(program).is_ok()
}

/// A command line to run, built argument by argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<OsString>,
}

impl ToolCommand {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
        }
    }

    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// shell-like rendering, used in logs and errors.
    pub fn rendered(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().map(|a| a.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command(&self, cwd: &Path) -> Result<Command, Error> {
        if !command_exists(&self.program) {
            return Err(Error::CommandMissing(self.program.clone()));
        }
        let mut command = Command::new(&self.program);
        command.args(&self.args).current_dir(cwd);
        Ok(command)
    }

    fn check(&self, status: ExitStatus) -> Result<(), Error> {
        if status.success() {
            Ok(())
        } else {
            Err(Error::ToolFailure {
                command: self.rendered(),
                code: status.code(),
            })
        }
    }

    /// Run to completion from `cwd`, with inherited stdio.
    pub fn run(&self, cwd: &Path) -> Result<(), Error> {
        info!("running {}", self.rendered());
        let status = self.command(cwd)?.status()?;
        self.check(status)
    }

    /// Run from `cwd`, writing the lines of `input` to its stdin as they come and copying its
    /// stdout to `out`. Returns the number of lines fed.
    pub fn run_piped(&self, cwd: &Path, input: Lines, out: &mut dyn Write) -> Result<usize, Error> {
        info!("running {} (piped)", self.rendered());
        let mut child = self
            .command(cwd)?
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Custom(format!("no stdin for {}", self.program)))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Custom(format!("no stdout for {}", self.program)))?;

        // stdin is fed from another thread so that a full stdout pipe can't block us.
        let feeder = thread::spawn(move || -> Result<usize, Error> {
            let mut stdin = BufWriter::new(stdin);
            let mut fed = 0;
            for line in input {
                stdin.write_all(line?.as_bytes())?;
                stdin.write_all(b"\n")?;
                fed += 1;
            }
            stdin.flush()?;
            Ok(fed)
        });

        let copied = io::copy(&mut stdout, out);
        drop(stdout);
        let status = child.wait()?;
        let fed = feeder.join().map_err(|_| {
            Error::Custom(format!("stdin writer for {} panicked", self.program))
        })?;

        let copied = copied?;
        let fed = match fed {
            // the child closed stdin early; its exit status tells the rest.
            Err(Error::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
                debug!("{} closed stdin early", self.program);
                self.check(status)?;
                return Err(Error::Io(e));
            }
            fed => fed?,
        };
        self.check(status)?;
        debug!("{}: {} lines in, {} bytes out", self.program, fed, copied);
        Ok(fed)
    }
}
