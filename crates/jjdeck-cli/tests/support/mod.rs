use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Throwaway `$HOME` whose XDG config root holds jjdeck's files.
pub struct TempHome {
    dir: TempDir,
}

impl TempHome {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("temp home"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn jjdeck_dir(&self) -> PathBuf {
        self.path().join(".config").join("jjdeck")
    }

    /// `jjdeck` with HOME and XDG_CONFIG_HOME pointed at this directory.
    pub fn jjdeck(&self) -> Command {
        let mut command = Command::new(assert_cmd::cargo::cargo_bin!("jjdeck"));
        command
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"));
        command
    }

    pub fn write_config(&self, contents: &str) {
        let dir = self.jjdeck_dir();
        fs::create_dir_all(&dir).expect("create config dir");
        fs::write(dir.join("config.toml"), contents).expect("write config");
    }

    /// Every file under `diagnostics/`, asserting each is named `<epoch-ms>.log`.
    pub fn diagnostics_logs(&self) -> Vec<PathBuf> {
        let logs: Vec<PathBuf> = fs::read_dir(self.jjdeck_dir().join("diagnostics"))
            .expect("diagnostics dir")
            .map(|entry| entry.expect("diagnostics entry").path())
            .collect();
        assert!(!logs.is_empty(), "expected at least one diagnostics log");
        for log in &logs {
            let stem = log
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_suffix(".log"))
                .unwrap_or_else(|| panic!("not a .log file: {}", log.display()));
            assert!(
                !stem.is_empty() && stem.bytes().all(|byte| byte.is_ascii_digit()),
                "diagnostics log must be named <epoch-ms>.log, got {}",
                log.display()
            );
        }
        logs
    }
}
