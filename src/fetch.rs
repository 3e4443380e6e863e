//! Dependency fetching through the package manager
//!
//! The fetch is an opaque subprocess: depstash only looks at its exit
//! status and at the dependency home it leaves behind.

use crate::error::{StashError, StashResult};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Something that fills the dependency home with a project's dependencies
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch dependencies into `home`
    async fn fetch(&self, home: &Path) -> StashResult<()>;

    /// Human-readable description for output
    fn describe(&self) -> String;
}

/// Runs the package manager as a child process
#[derive(Debug, Clone)]
pub struct CommandFetcher {
    program: String,
    args: Vec<String>,
    home_env: String,
}

impl CommandFetcher {
    /// Build a fetcher from a command line; `None` if the command is empty
    ///
    /// The resolved home is exported to the child as `home_env`.
    pub fn new(command: &[String], home_env: impl Into<String>) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
            home_env: home_env.into(),
        })
    }
}

#[async_trait]
impl Fetcher for CommandFetcher {
    async fn fetch(&self, home: &Path) -> StashResult<()> {
        let command = self.describe();
        info!("Fetching dependencies: {}", command);
        debug!("Exporting {}={}", self.home_env, home.display());

        let status = Command::new(&self.program)
            .args(&self.args)
            .env(&self.home_env, home)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| StashError::fetch_spawn(command.clone(), e))?;

        if status.success() {
            Ok(())
        } else {
            Err(StashError::FetchFailed {
                command,
                code: status.code(),
            })
        }
    }

    fn describe(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
