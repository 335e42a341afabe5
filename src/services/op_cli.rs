//! 1Password CLI client - spawns `op` and parses its JSON output.

use std::path::PathBuf;
use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::config::Config;
use crate::models::{Item, NOTES_FIELD_ID};
use crate::services::store::{Lookup, SecureNoteStore, StoreError};

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// How much CLI stderr to carry into error messages.
const STDERR_EXCERPT_LEN: usize = 300;

/// Client for the `op` command-line tool.
///
/// Constructed once at startup and passed by reference into the save flow;
/// there is no process-wide handle.
pub struct OpCli {
    bin: PathBuf,
    vault: Option<String>,
    timeout: Duration,
}

impl OpCli {
    /// Build a client from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            bin: config.op_path(),
            vault: config.onepassword.vault.clone(),
            timeout: Duration::from_secs(config.onepassword.timeout_secs),
        }
    }

    /// Verify the CLI is reachable. Run once at startup so a missing or
    /// broken `op` install is reported before the first capture.
    pub async fn preflight(&self) -> Result<(), StoreError> {
        let output = self.run(&["--version".to_string()]).await?;
        ensure_success(output)?;
        Ok(())
    }

    /// Spawn `op` with the given arguments, killing it on timeout.
    async fn run(&self, args: &[String]) -> Result<Output, StoreError> {
        debug!(bin = %self.bin.display(), op = args.first().map(String::as_str), "spawning op");

        let mut cmd = Command::new(&self.bin);
        cmd.args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        #[cfg(windows)]
        cmd.creation_flags(CREATE_NO_WINDOW);

        let timeout_secs = self.timeout.as_secs();
        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| StoreError::Timeout(timeout_secs))??;

        Ok(output)
    }

    fn with_vault(&self, mut args: Vec<String>) -> Vec<String> {
        if let Some(vault) = &self.vault {
            args.push("--vault".to_string());
            args.push(vault.clone());
        }
        args
    }

    fn get_args(&self, title: &str) -> Vec<String> {
        self.with_vault(vec![
            "item".to_string(),
            "get".to_string(),
            title.to_string(),
            "--format".to_string(),
            "json".to_string(),
        ])
    }

    fn create_args(&self, title: &str, text: &str) -> Vec<String> {
        self.with_vault(vec![
            "item".to_string(),
            "create".to_string(),
            "--category".to_string(),
            "Secure Note".to_string(),
            "--title".to_string(),
            title.to_string(),
            format!("{NOTES_FIELD_ID}={text}"),
        ])
    }

    fn edit_args(&self, title: &str, target: &str, text: &str) -> Vec<String> {
        self.with_vault(vec![
            "item".to_string(),
            "edit".to_string(),
            title.to_string(),
            format!("{target}={text}"),
        ])
    }
}

#[async_trait]
impl SecureNoteStore for OpCli {
    async fn lookup(&self, title: &str) -> Result<Lookup, StoreError> {
        let output = self.run(&self.get_args(title)).await?;

        if output.status.success() {
            let item: Item = serde_json::from_slice(&output.stdout)?;
            debug!(fields = item.fields.len(), "capture item found");
            return Ok(Lookup::Found(item));
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if indicates_missing_item(&stderr) {
            debug!("capture item does not exist yet");
            return Ok(Lookup::NotFound);
        }

        Err(command_failed(output.status, &stderr))
    }

    async fn create(&self, title: &str, text: &str) -> Result<(), StoreError> {
        debug!(chars = text.chars().count(), "creating secure note");
        let output = self.run(&self.create_args(title, text)).await?;
        ensure_success(output)?;
        Ok(())
    }

    async fn update(&self, item: &Item, text: &str) -> Result<(), StoreError> {
        let target = item
            .notes_field()
            .map(|f| f.edit_target().to_string())
            .unwrap_or_else(|| NOTES_FIELD_ID.to_string());

        debug!(chars = text.chars().count(), field = %target, "updating secure note");
        let output = self.run(&self.edit_args(&item.title, &target, text)).await?;
        ensure_success(output)?;
        Ok(())
    }
}

/// Whether CLI stderr positively reports that the requested item is absent.
///
/// Anything else (auth prompts, connection errors, unknown messages) must be
/// treated as a failed lookup, not as absence.
fn indicates_missing_item(stderr: &str) -> bool {
    let stderr = stderr.to_lowercase();
    stderr.contains("isn't an item")
        || stderr.contains("not found")
        || stderr.contains("no item")
}

fn ensure_success(output: Output) -> Result<Output, StoreError> {
    if output.status.success() {
        return Ok(output);
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(command_failed(output.status, &stderr))
}

fn command_failed(status: std::process::ExitStatus, stderr: &str) -> StoreError {
    let mut excerpt: String = stderr.trim().chars().take(STDERR_EXCERPT_LEN).collect();
    if stderr.trim().chars().count() > STDERR_EXCERPT_LEN {
        excerpt.push_str("...");
    }
    StoreError::CommandFailed {
        status,
        stderr: excerpt,
    }
}
