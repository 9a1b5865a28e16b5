//! Fixture file runs

use clap::Args;
use ember_fixtures::FixtureRunner;
use std::path::PathBuf;

use crate::{config::CliConfig, output::Output, CliError};

/// Arguments for `ember run`
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Fixture file (JSON array)
    pub file: PathBuf,
    /// Only run fixtures whose name contains this string
    #[arg(long)]
    pub filter: Option<String>,
    /// Stop at the first failing fixture
    #[arg(long)]
    pub fail_fast: bool,
    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    /// Run the file and print a summary; returns whether every fixture passed
    pub fn execute(&self, config: &CliConfig) -> Result<bool, CliError> {
        let runner = FixtureRunner::new(true)
            .with_config(config.evm.clone())
            .with_fail_fast(self.fail_fast || config.fail_fast);
        let report = runner.run_file(&self.file, self.filter.as_deref())?;

        let failed: Vec<serde_json::Value> = report
            .failed
            .iter()
            .map(|(name, reason)| serde_json::json!({ "name": name, "reason": reason }))
            .collect();

        Output::new(self.json)
            .field("file", &report.file)
            .field_value("passed", report.passed.len().into())
            .field_value("failed", serde_json::Value::Array(failed))
            .field_value("success", report.is_success().into())
            .message(&report.to_string())
            .print();

        Ok(report.is_success())
    }
}
