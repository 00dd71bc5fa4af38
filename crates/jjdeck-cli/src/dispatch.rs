use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::{Cell, ContentArrangement, Table};
use jjdeck_app::App;
use jjdeck_core::command_runner::SystemCommandRunner;
use jjdeck_core::config::resolve_config_path;
use jjdeck_core::doctor::{DoctorReport, run_doctor};
use tracing::info;

use crate::cli::{Cli, Command};

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Command::Doctor) => run_doctor_command(),
        None => run_dashboard(cli.path),
    }
}

fn run_dashboard(path: Option<PathBuf>) -> Result<()> {
    let workspace = match path {
        Some(path) => path,
        None => std::env::current_dir().context("failed to determine current directory")?,
    };
    let config_path = resolve_config_path().context("failed to resolve jjdeck config path")?;
    info!(
        workspace = %workspace.display(),
        config = %config_path.display(),
        "opening dashboard"
    );

    let app = App::open(Arc::new(SystemCommandRunner::new()), workspace, config_path)?;
    jjdeck_tui::run(Arc::new(app))
}

fn run_doctor_command() -> Result<()> {
    let report = run_doctor();
    print_doctor_report(&report);
    Ok(())
}

fn print_doctor_report(report: &DoctorReport) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Check", "Status", "Details"]);

    for check in &report.checks {
        table.add_row(vec![
            Cell::new(check.name.as_str()),
            Cell::new(check.state.to_string()),
            Cell::new(check.details.as_str()),
        ]);
    }

    println!("{table}");
    println!("{}", report.summary());
}
