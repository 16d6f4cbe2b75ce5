//! `odolog config show|validate`.

use anyhow::{bail, Context, Result};
use odolog_config::{redact_config, validate, ConfigValidationError};

use crate::config::LoadedConfig;
use crate::terminal_output::{note_error, note_success, note_warn, render_table};

/// Effective config with secrets masked, as YAML.
pub fn render_show(loaded: &LoadedConfig) -> Result<String> {
    let yaml = serde_yaml::to_string(&redact_config(&loaded.config))
        .context("Failed to render config")?;
    Ok(format!("# {}\n{yaml}", loaded.path.display()))
}

pub fn show(loaded: &LoadedConfig) -> Result<()> {
    print!("{}", render_show(loaded)?);
    Ok(())
}

fn issue_rows(issues: &[ConfigValidationError]) -> Vec<Vec<String>> {
    issues
        .iter()
        .map(|i| vec![i.path.clone(), i.message.clone()])
        .collect()
}

pub fn validate_cmd(loaded: &LoadedConfig) -> Result<()> {
    let report = validate(&loaded.config);

    if !report.warnings.is_empty() {
        note_warn(&format!("{} warning(s)", report.warnings.len()));
        print!("{}", render_table(&["Path", "Warning"], &issue_rows(&report.warnings)));
    }
    if !report.is_valid() {
        note_error(&format!("{} error(s) in {}", report.errors.len(), loaded.path.display()));
        eprint!("{}", render_table(&["Path", "Error"], &issue_rows(&report.errors)));
        bail!("configuration is invalid");
    }

    note_success(&format!("Configuration is valid ({})", loaded.path.display()));
    Ok(())
}
