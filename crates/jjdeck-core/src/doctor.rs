use std::env;
use std::fmt;
use std::path::Path;

use crate::command_runner::{CommandRunner, SystemCommandRunner};
use crate::config::{ConfigError, JjdeckConfig, TicketProviderKind, load_config, resolve_config_path};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Pass,
    Fail,
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorCheck {
    pub name: String,
    pub state: CheckState,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    pub checks: Vec<DoctorCheck>,
}

impl DoctorReport {
    pub fn summary(&self) -> String {
        let passed = self
            .checks
            .iter()
            .filter(|check| check.state == CheckState::Pass)
            .count();
        let failed = self.checks.len().saturating_sub(passed);
        format!("{passed} passed, {failed} failed")
    }
}

pub fn run_doctor() -> DoctorReport {
    let runner = SystemCommandRunner::new();
    run_doctor_with(&runner, resolve_config_path())
}

pub fn run_doctor_with(
    runner: &dyn CommandRunner,
    config_path: Result<impl AsRef<Path>, ConfigError>,
) -> DoctorReport {
    let mut checks = Vec::new();

    checks.push(match env::consts::OS {
        "macos" => pass_check("os is supported", "detected macOS"),
        "linux" => pass_check("os is supported", "detected Linux"),
        detected => fail_check(
            "os is supported",
            format!("detected {detected}, expected macOS or Linux"),
        ),
    });

    checks.push(check_version(runner, "jj is installed", "jj"));
    checks.push(check_version(runner, "gh is installed", "gh"));

    let config = match config_path {
        Ok(path) => check_config(path.as_ref(), &mut checks),
        Err(error) => {
            checks.push(fail_check("config path resolves", error.to_string()));
            None
        }
    };

    match config {
        Some(config) => {
            checks.push(check_github_auth(runner, &config));
            checks.push(pass_check(
                "ticket provider configured",
                format!("provider is {}", provider_label(config.tickets.provider)),
            ));
        }
        None => push_skipped_checks(
            &mut checks,
            &["github authentication", "ticket provider configured"],
            "config could not be loaded",
        ),
    }

    DoctorReport { checks }
}

fn check_config(path: &Path, checks: &mut Vec<DoctorCheck>) -> Option<JjdeckConfig> {
    if !path.exists() {
        checks.push(pass_check(
            "config parses and validates",
            format!("no file at {}, using defaults", path.display()),
        ));
        return Some(JjdeckConfig::default());
    }

    match load_config(path) {
        Ok(config) => {
            checks.push(pass_check(
                "config parses and validates",
                format!("loaded {}", path.display()),
            ));
            Some(config)
        }
        Err(error) => {
            checks.push(fail_check("config parses and validates", error.to_string()));
            None
        }
    }
}

fn check_version(runner: &dyn CommandRunner, name: &str, program: &str) -> DoctorCheck {
    if !is_executable_in_path(program) {
        return fail_check(name, format!("{program} executable not found in PATH"));
    }

    match runner.run(program, &["--version"], None) {
        Ok(output) if output.status_code == 0 => {
            let first_line = output.stdout.lines().next().unwrap_or_default().trim();
            pass_check(name, first_line.to_string())
        }
        Ok(output) => fail_check(
            name,
            format!(
                "{program} returned exit code {} with output: {}",
                output.status_code,
                output.stderr.trim()
            ),
        ),
        Err(error) => fail_check(name, format!("failed to execute {program}: {error}")),
    }
}

fn check_github_auth(runner: &dyn CommandRunner, config: &JjdeckConfig) -> DoctorCheck {
    const NAME: &str = "github authentication";

    if !config.github.token.trim().is_empty() {
        return pass_check(NAME, "token stored in config");
    }

    match runner.run("gh", &["auth", "status"], None) {
        Ok(output) if output.status_code == 0 => pass_check(NAME, "gh is logged in"),
        Ok(_) => fail_check(NAME, "gh is not logged in and no token is configured"),
        Err(error) => fail_check(NAME, format!("failed to execute gh auth status: {error}")),
    }
}

fn provider_label(kind: TicketProviderKind) -> &'static str {
    match kind {
        TicketProviderKind::None => "disabled",
        TicketProviderKind::Jira => "Jira",
        TicketProviderKind::Github => "GitHub Issues",
    }
}

fn pass_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Pass,
        details: details.into(),
    }
}

fn fail_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Fail,
        details: details.into(),
    }
}

fn push_skipped_checks(checks: &mut Vec<DoctorCheck>, names: &[&str], reason: &str) {
    checks.extend(
        names
            .iter()
            .map(|name| fail_check(name, format!("skipped because {reason}"))),
    );
}

fn is_executable_in_path(program: &str) -> bool {
    let Some(path_value) = env::var_os("PATH") else {
        return false;
    };

    env::split_paths(&path_value)
        .map(|directory| directory.join(program))
        .any(|candidate| is_executable_file(&candidate))
}

fn is_executable_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        path.metadata()
            .is_ok_and(|metadata| metadata.permissions().mode() & 0o111 != 0)
    }

    #[cfg(not(unix))]
    {
        true
    }
}
