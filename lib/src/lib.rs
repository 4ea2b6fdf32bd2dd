pub mod certs;
pub mod distribute;
pub mod error;
pub mod info;
pub mod provision;
pub mod types;

use execute::Execute;
use log::{info, LevelFilter};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::{env, fmt};

pub use error::{Error, Result};

/// Console logging for both binaries. `RUST_LOG` wins when set, otherwise
/// every external command is shown at `info`.
pub fn init_logger() {
    let mut builder = pretty_env_logger::formatted_timed_builder();
    match env::var("RUST_LOG") {
        Ok(filters) => builder.parse_filters(&filters),
        Err(_) => builder.filter_level(LevelFilter::Info),
    };
    builder.init();
}

/// A single external program call: program, argument vector, working
/// directory and optional standard input. Never passed through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    dir: Option<PathBuf>,
    input: Option<Vec<u8>>,
    log: bool,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Invocation {
        Invocation {
            program: program.into(),
            args: Vec::new(),
            dir: None,
            input: None,
            log: true,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Invocation {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Invocation {
        self.dir = Some(dir.into());
        self
    }

    pub fn stdin(mut self, input: impl Into<Vec<u8>>) -> Invocation {
        self.input = Some(input.into());
        self
    }

    /// Don't log the command line before running it.
    pub fn quiet(mut self) -> Invocation {
        self.log = false;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn input(&self) -> Option<&[u8]> {
        self.input.as_deref()
    }

    pub fn logged(&self) -> bool {
        self.log
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.dir {
            command.current_dir(dir);
        }
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());
        command
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

pub trait Runner {
    /// Run the invocation to completion and return its standard output.
    fn run(&mut self, invocation: &Invocation) -> Result<String>;

    fn lines(&mut self, invocation: &Invocation) -> Result<Vec<String>> {
        Ok(self.run(invocation)?.lines().map(str::to_string).collect())
    }

    /// `producer | consumer`, as two sequential runs.
    fn pipe(&mut self, producer: &Invocation, consumer: Invocation) -> Result<String> {
        let output = self.run(producer)?;
        self.run(&consumer.stdin(output))
    }
}

/// Runs invocations as real child processes, failing on any non-zero exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct System;

impl Runner for System {
    fn run(&mut self, invocation: &Invocation) -> Result<String> {
        if invocation.logged() {
            info!("run: {}", invocation);
        }

        let mut command = invocation.command();
        let result = match invocation.input() {
            Some(input) => command.execute_input_output(input),
            None => command.execute_output(),
        };

        let failed = |details: String| Error::CommandFailed {
            command: invocation.to_string(),
            details,
        };

        match result {
            Ok(output) => match output.status.code() {
                Some(0) => Ok(String::from_utf8_lossy(&output.stdout).to_string()),
                Some(exit_code) => Err(failed(format!(
                    "exit status {}: {}",
                    exit_code,
                    String::from_utf8_lossy(&output.stderr).trim()
                ))),
                None => Err(failed("interrupted".to_string())),
            },
            Err(e) => Err(failed(e.to_string())),
        }
    }
}
