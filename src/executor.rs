use crate::config::GeneralConfig;
use crate::error::{UnicharError, UnicharResult};
use log::debug;
use std::io::Write;
use std::process::{Command, Stdio};

/// Hand `text` to the configured clipboard command on its stdin.
pub fn copy_to_clipboard(text: &str, config: &GeneralConfig) -> UnicharResult<()> {
    let mut parts = config.clipboard.split_whitespace();
    let Some(program) = parts.next() else {
        return Err(UnicharError::Clipboard("no clipboard command configured".to_string()));
    };

    debug!("Copying {:?} with {}", text, config.clipboard);
    let mut child = Command::new(program)
        .args(parts)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| UnicharError::Clipboard(format!("{}: {}", program, e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .map_err(|e| UnicharError::Clipboard(e.to_string()))?;
    }

    let status = child.wait().map_err(|e| UnicharError::Clipboard(e.to_string()))?;
    if !status.success() {
        return Err(UnicharError::Clipboard(format!("{} exited with {}", program, status)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_command(clipboard: &str) -> GeneralConfig {
        GeneralConfig {
            clipboard: clipboard.to_string(),
            ..GeneralConfig::default()
        }
    }

    #[test]
    fn test_empty_command() {
        assert!(matches!(copy_to_clipboard("a", &with_command("  ")), Err(UnicharError::Clipboard(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_receives_text() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("clip.txt");
        let config = with_command(&format!("tee {}", out.display()));
        copy_to_clipboard("€", &config).unwrap();
        assert_eq!(std::fs::read_to_string(out).unwrap(), "€");
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command() {
        assert!(copy_to_clipboard("a", &with_command("false")).is_err());
    }

    #[test]
    fn test_missing_program() {
        assert!(copy_to_clipboard("a", &with_command("definitely-not-a-clipboard-tool")).is_err());
    }
}
