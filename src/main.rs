use anyhow::{bail, Result};
use clap::Parser;
use makeready::cli::{Cli, Commands};
use makeready::config::ReportConfig;
use makeready::io;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Report {
            structural,
            survey,
            format,
            output,
            config,
        } => handle_report(&structural, &survey, format, output, config.as_deref()),
        Commands::Validate {
            structural,
            survey,
            format,
        } => handle_validate(&structural, &survey, format),
    }
}

fn handle_report(
    structural_path: &Path,
    survey_path: &Path,
    format: makeready::cli::OutputFormat,
    output: Option<PathBuf>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = ReportConfig::load(config_path)?;
    let structural = io::read_json(structural_path)?;
    let survey = io::read_json(survey_path)?;

    let report = makeready::build_report(&structural, &survey, &config)?;
    log::info!(
        "built report: {} rows, {} merge regions",
        report.rows.len(),
        report.merges.len()
    );

    let mut writer = io::create_writer(format.into(), output.as_deref())?;
    writer.write_report(&report)
}

fn handle_validate(
    structural_path: &Path,
    survey_path: &Path,
    format: makeready::cli::OutputFormat,
) -> Result<()> {
    let structural = io::read_json(structural_path)?;
    let survey = io::read_json(survey_path)?;

    let structural_check = makeready::check_structural(&structural);
    let survey_check = makeready::check_survey(&survey);

    let mut writer = io::create_writer(format.into(), None)?;
    writer.write_validation(&structural_check, &survey_check)?;

    if !structural_check.is_valid() || !survey_check.is_valid() {
        bail!("input validation failed");
    }
    Ok(())
}
