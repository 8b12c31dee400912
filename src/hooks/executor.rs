use crate::error::{ReleaseError, Result};
use crate::hooks::HookContext;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Executes release hook scripts
pub struct HookExecutor;

impl HookExecutor {
    /// Execute a hook script with the given context
    ///
    /// The script is executed with environment variables set from the context.
    /// Exit code 0 is success; anything else is a failure.
    ///
    /// # Returns
    /// * `Ok(())` if hook succeeds (exit code 0)
    /// * `Err` if script not found, cannot be started, or returns non-zero exit code
    pub fn execute(script_path: &str, context: &HookContext<'_>) -> Result<()> {
        let path = Path::new(script_path);

        if !path.exists() {
            return Err(ReleaseError::hook(format!(
                "Hook script not found: {}",
                script_path
            )));
        }

        if !path.is_file() {
            return Err(ReleaseError::hook(format!(
                "Hook path is not a file: {}",
                script_path
            )));
        }

        let output = Command::new(path)
            .envs(context.to_env_vars())
            .output()
            .map_err(|e| {
                ReleaseError::hook(format!("Failed to execute hook {}: {}", script_path, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(ReleaseError::hook(format!(
                "Hook {} failed with exit code {}\nStdout: {}\nStderr: {}",
                script_path,
                output.status.code().unwrap_or(-1),
                stdout,
                stderr
            )));
        }

        info!(
            hook = context.hook_type.name(),
            script = script_path,
            "hook succeeded"
        );
        Ok(())
    }

    /// Try to execute a hook, logging errors but not failing
    ///
    /// Used for post-push hooks where the tag is already published and a
    /// hook failure must not retroactively fail the release.
    ///
    /// Returns the error message when the hook failed.
    pub fn execute_permissive(script_path: &str, context: &HookContext<'_>) -> Option<String> {
        match Self::execute(script_path, context) {
            Ok(()) => None,
            Err(e) => {
                debug!(hook = context.hook_type.name(), error = %e, "hook failed");
                Some(e.to_string())
            }
        }
    }
}
