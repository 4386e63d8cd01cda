use anyhow::Context;
use colored::Colorize;
use drift_engine::{Drift, DriftConfig, Report};

use crate::cli::Cli;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let drift = Drift::new(config);
    let outcome = drift.compare(&cli.old, &cli.new).await.with_context(|| {
        format!("cannot compare {} with {}", cli.old.display(), cli.new.display())
    })?;

    let format = cli.format.into();
    match &cli.output {
        Some(path) => outcome.report.write_to(path, format)?,
        None => print!("{}", outcome.report.render(format)?),
    }
    print_summary(&outcome.report);
    Ok(())
}

/// Load the configuration file, if any, and apply command-line overrides.
pub fn load_config(cli: &Cli) -> anyhow::Result<DriftConfig> {
    let mut config = match &cli.config {
        Some(path) => DriftConfig::load(path)
            .with_context(|| format!("cannot load configuration {}", path.display()))?,
        None => DriftConfig::default(),
    };
    apply_overrides(&mut config, cli);
    Ok(config)
}

fn apply_overrides(config: &mut DriftConfig, cli: &Cli) {
    if cli.include_unchanged {
        config.include_unchanged = true;
    }
    if cli.detailed_diff {
        config.compare.detailed_diff = true;
    }
    if let Some(jobs) = cli.jobs {
        config.compare_jobs = jobs;
    }
    if let Some(tool) = &cli.tool {
        config.compare.disassembler.program = tool.clone();
    }
    if let Some(secs) = cli.tool_timeout {
        config.compare.disassembler.timeout_secs = secs;
    }
}

fn print_summary(report: &Report) {
    let s = &report.summary;
    if s.is_identical() {
        eprintln!(
            "{} Trees are identical ({} files)",
            "✓".green().bold(),
            s.unchanged.to_string().bold()
        );
    } else {
        eprintln!(
            "{} added, {} removed, {} modified, {} unchanged",
            s.added.to_string().green(),
            s.removed.to_string().red(),
            s.modified.to_string().yellow(),
            s.unchanged
        );
    }
    if !report.warnings.is_empty() {
        eprintln!("{} {} warning(s)", "!".yellow().bold(), report.warnings.len());
    }
}
