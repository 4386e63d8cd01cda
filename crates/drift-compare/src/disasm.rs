//! External disassembly capability.
//!
//! The comparison core only needs "path in, lines out, or a failure kind".
//! [`ProcessDisassembler`] provides that by running an external executable;
//! [`UnavailableDisassembler`] stands in where no tool is installed.

use std::io;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::config::DisassemblerConfig;
use crate::error::DisassemblyError;

const INPUT_PLACEHOLDER: &str = "{input}";

/// Leading stdout lines searched for refusal messages when the tool exits 0.
const BANNER_LINES: usize = 8;

/// Converts a compiled module into a comparable sequence of text lines.
#[async_trait]
pub trait Disassembler: Send + Sync {
    /// Name of the underlying tool, for warnings.
    fn program(&self) -> &str;

    /// Disassemble the module at `path`.
    async fn disassemble(&self, path: &Path) -> Result<Vec<String>, DisassemblyError>;
}

// ---------------------------------------------------------------------------
// ProcessDisassembler
// ---------------------------------------------------------------------------

/// Runs an external disassembler executable, one process per module.
///
/// At most `max_concurrent` processes run at once, independently of any
/// other pool in the run. Each process is killed if it outlives the timeout.
pub struct ProcessDisassembler {
    config: DisassemblerConfig,
    refusal_patterns: Vec<String>,
    permits: Arc<Semaphore>,
}

impl ProcessDisassembler {
    /// Create a disassembler from its configuration.
    pub fn new(config: DisassemblerConfig) -> Self {
        let refusal_patterns = config
            .refusal_patterns
            .iter()
            .map(|p| p.to_lowercase())
            .collect();
        let permits = Arc::new(Semaphore::new(config.max_concurrent.max(1)));
        Self {
            config,
            refusal_patterns,
            permits,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &DisassemblerConfig {
        &self.config
    }

    fn command_for(&self, path: &Path) -> Command {
        let input = path.to_string_lossy();
        let mut command = Command::new(&self.config.program);
        let mut saw_placeholder = false;
        for arg in &self.config.args {
            if arg.contains(INPUT_PLACEHOLDER) {
                saw_placeholder = true;
                command.arg(arg.replace(INPUT_PLACEHOLDER, &input));
            } else {
                command.arg(arg);
            }
        }
        if !saw_placeholder {
            command.arg(path);
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    /// The first output line matching a refusal pattern, if any.
    fn refusal_in(&self, output: &str) -> Option<String> {
        output
            .lines()
            .find(|line| {
                let line = line.to_lowercase();
                self.refusal_patterns.iter().any(|p| line.contains(p.as_str()))
            })
            .map(|line| line.trim().to_string())
    }

    fn refused(path: &Path, reason: impl Into<String>) -> DisassemblyError {
        DisassemblyError::Refused {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Disassembler for ProcessDisassembler {
    fn program(&self) -> &str {
        &self.config.program
    }

    async fn disassemble(&self, path: &Path) -> Result<Vec<String>, DisassemblyError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| Self::refused(path, e.to_string()))?;

        let child = match self.command_for(path).spawn() {
            Ok(child) => child,
            Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied) => {
                return Err(DisassemblyError::ToolUnavailable {
                    program: self.config.program.clone(),
                });
            }
            Err(e) => return Err(Self::refused(path, format!("failed to start: {e}"))),
        };

        let timeout = self.config.timeout();
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(Self::refused(path, e.to_string())),
            Err(_) => return Err(Self::refused(path, format!("timed out after {timeout:?}"))),
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        // A successful listing can quote refusal text in its body (string
        // literals, resources), so only its banner is checked.
        let stdout_scope: &str = if output.status.success() {
            banner(&stdout)
        } else {
            &stdout
        };
        if let Some(reason) = self.refusal_in(&stderr).or_else(|| self.refusal_in(stdout_scope)) {
            return Err(Self::refused(path, reason));
        }
        if !output.status.success() {
            let detail = stderr.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
            return Err(Self::refused(
                path,
                format!("exited with {}: {detail}", output.status),
            ));
        }

        let lines: Vec<String> = stdout.lines().map(String::from).collect();
        debug!(path = %path.display(), lines = lines.len(), "disassembled module");
        Ok(lines)
    }
}

/// The first [`BANNER_LINES`] lines of `output`.
fn banner(output: &str) -> &str {
    match output.match_indices('\n').nth(BANNER_LINES - 1) {
        Some((end, _)) => &output[..end],
        None => output,
    }
}

// ---------------------------------------------------------------------------
// UnavailableDisassembler
// ---------------------------------------------------------------------------

/// A disassembler that is never installed.
#[derive(Clone, Debug)]
pub struct UnavailableDisassembler {
    program: String,
}

impl UnavailableDisassembler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for UnavailableDisassembler {
    fn default() -> Self {
        Self::new("disassembler")
    }
}

#[async_trait]
impl Disassembler for UnavailableDisassembler {
    fn program(&self) -> &str {
        &self.program
    }

    async fn disassemble(&self, _path: &Path) -> Result<Vec<String>, DisassemblyError> {
        Err(DisassemblyError::ToolUnavailable {
            program: self.program.clone(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(script: &str, timeout_secs: u64) -> ProcessDisassembler {
        ProcessDisassembler::new(DisassemblerConfig {
            program: "sh".into(),
            args: vec!["-c".into(), script.into(), "disasm".into(), "{input}".into()],
            timeout_secs,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn captures_stdout_lines() {
        let dir = tempfile::tempdir().unwrap();
        let module = dir.path().join("App.dll");
        std::fs::write(&module, ".assembly App\r\n.module App.dll\n").unwrap();

        let lines = shell("cat \"$1\"", 10).disassemble(&module).await.unwrap();
        assert_eq!(lines, vec![".assembly App", ".module App.dll"]);
    }

    #[tokio::test]
    async fn appends_path_without_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let module = dir.path().join("App.dll");
        std::fs::write(&module, "body\n").unwrap();

        let disassembler = ProcessDisassembler::new(DisassemblerConfig {
            program: "cat".into(),
            args: Vec::new(),
            ..Default::default()
        });
        assert_eq!(disassembler.disassemble(&module).await.unwrap(), vec!["body"]);
    }

    #[tokio::test]
    async fn missing_program_is_unavailable() {
        let disassembler = ProcessDisassembler::new(DisassemblerConfig {
            program: "drift-test-no-such-disassembler".into(),
            ..Default::default()
        });
        let err = disassembler.disassemble(Path::new("/tmp/App.dll")).await.unwrap_err();
        assert_eq!(
            err,
            DisassemblyError::ToolUnavailable {
                program: "drift-test-no-such-disassembler".into()
            }
        );
    }

    #[tokio::test]
    async fn refusal_message_is_refused_even_on_success() {
        let err = shell("echo 'Protected module -- cannot disassemble'", 10)
            .disassemble(Path::new("/tmp/App.dll"))
            .await
            .unwrap_err();
        match err {
            DisassemblyError::Refused { reason, .. } => {
                assert_eq!(reason, "Protected module -- cannot disassemble")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn refusal_text_inside_listing_is_not_a_refusal() {
        let dir = tempfile::tempdir().unwrap();
        let module = dir.path().join("App.dll");
        let mut listing: Vec<String> = (0..20).map(|i| format!("// header {i}")).collect();
        listing.push("IL_0001: ldstr \"Access is denied.\"".into());
        std::fs::write(&module, listing.join("\n")).unwrap();

        let lines = shell("cat \"$1\"", 10).disassemble(&module).await.unwrap();
        assert_eq!(lines.len(), 21);
        assert_eq!(lines[20], "IL_0001: ldstr \"Access is denied.\"");
    }

    #[tokio::test]
    async fn refusal_text_in_failed_output_is_reported() {
        let script = "i=0; while [ $i -lt 20 ]; do echo line; i=$((i+1)); done; echo 'access is denied'; exit 1";
        let err = shell(script, 10)
            .disassemble(Path::new("/tmp/App.dll"))
            .await
            .unwrap_err();
        match err {
            DisassemblyError::Refused { reason, .. } => assert_eq!(reason, "access is denied"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn banner_is_leading_lines() {
        let text: String = (0..12).map(|i| format!("{i}\n")).collect();
        assert_eq!(banner(&text).lines().count(), BANNER_LINES);
        assert_eq!(banner("a\nb"), "a\nb");
    }

    #[tokio::test]
    async fn refusal_patterns_are_case_insensitive() {
        let err = shell("echo 'ERROR: Access Is Denied' >&2; exit 0", 10)
            .disassemble(Path::new("/tmp/App.dll"))
            .await
            .unwrap_err();
        assert!(matches!(err, DisassemblyError::Refused { .. }));
    }

    #[tokio::test]
    async fn non_zero_exit_is_refused() {
        let err = shell("echo 'bad image format' >&2; exit 3", 10)
            .disassemble(Path::new("/tmp/App.dll"))
            .await
            .unwrap_err();
        match err {
            DisassemblyError::Refused { reason, .. } => assert!(reason.contains("bad image format")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn timeout_is_refused() {
        let err = shell("sleep 30", 1)
            .disassemble(Path::new("/tmp/App.dll"))
            .await
            .unwrap_err();
        match err {
            DisassemblyError::Refused { reason, .. } => assert!(reason.contains("timed out")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn unavailable_stub_always_fails() {
        let stub = UnavailableDisassembler::new("ildasm");
        assert_eq!(stub.program(), "ildasm");
        assert!(matches!(
            stub.disassemble(Path::new("x.dll")).await,
            Err(DisassemblyError::ToolUnavailable { .. })
        ));
    }
}
