use std::backtrace::Backtrace;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, Once, OnceLock, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};
use tracing::Level;

#[derive(Default)]
struct DiagnosticsLog {
    path: Option<PathBuf>,
    file: Option<File>,
}

static HOOK_ONCE: Once = Once::new();
static LOG: OnceLock<Mutex<DiagnosticsLog>> = OnceLock::new();

fn diagnostics_log() -> &'static Mutex<DiagnosticsLog> {
    LOG.get_or_init(|| Mutex::new(DiagnosticsLog::default()))
}

/// Opt-in log file for a single run.
///
/// The dashboard owns the terminal, so tracing output and panic reports go
/// to `<config dir>/diagnostics/<epoch-ms>.log` instead of stderr.
pub struct DiagnosticsSession {
    path: Option<PathBuf>,
}

impl DiagnosticsSession {
    pub fn initialize(enabled: bool) -> Result<Self> {
        install_panic_hook();
        if !enabled {
            return Ok(Self { path: None });
        }

        let path = create_log_path()?;
        let mut file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&path)
            .with_context(|| format!("failed to create diagnostics log at {}", path.display()))?;
        writeln!(
            file,
            "jjdeck diagnostics start\nversion={}\nstart_epoch_ms={}\npid={}\nargv={:?}",
            env!("CARGO_PKG_VERSION"),
            epoch_ms(),
            std::process::id(),
            std::env::args().collect::<Vec<String>>()
        )
        .with_context(|| format!("failed to write diagnostics header to {}", path.display()))?;

        let writer = file
            .try_clone()
            .with_context(|| format!("failed to share diagnostics log {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(Level::DEBUG)
            .with_writer(Mutex::new(writer))
            .try_init()
            .map_err(|error| anyhow!("failed to install diagnostics logger: {error}"))?;

        let mut log = diagnostics_log()
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        log.path = Some(path.clone());
        log.file = Some(file);

        Ok(Self { path: Some(path) })
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }
}

fn install_panic_hook() {
    HOOK_ONCE.call_once(|| {
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let Some(path) = append_panic(panic_info) else {
                default_hook(panic_info);
                eprintln!("Run `jjdeck --diagnostics` to capture a diagnostics log.");
                return;
            };
            eprintln!("Fatal internal error in jjdeck.");
            eprintln!("Diagnostics written to {}", path.display());
        }));
    });
}

/// Records the panic in the open log and returns its path.
fn append_panic(panic_info: &std::panic::PanicHookInfo<'_>) -> Option<PathBuf> {
    let location = panic_info
        .location()
        .map(|value| format!("{}:{}:{}", value.file(), value.line(), value.column()))
        .unwrap_or_else(|| "unknown".to_string());
    let backtrace = Backtrace::force_capture();

    let mut log = diagnostics_log()
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    let path = log.path.clone()?;
    let file = log.file.as_mut()?;

    let now = epoch_ms();
    let _ = writeln!(file, "[{now}] panic captured");
    let _ = writeln!(file, "[{now}] panic_message={}", panic_payload(panic_info));
    let _ = writeln!(file, "[{now}] panic_location={location}");
    let _ = writeln!(file, "[{now}] panic_backtrace={backtrace}");
    let _ = file.flush();
    Some(path)
}

fn panic_payload(panic_info: &std::panic::PanicHookInfo<'_>) -> String {
    if let Some(payload) = panic_info.payload().downcast_ref::<&str>() {
        return (*payload).to_string();
    }
    if let Some(payload) = panic_info.payload().downcast_ref::<String>() {
        return payload.clone();
    }
    "unknown panic payload".to_string()
}

fn epoch_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

fn create_log_path() -> Result<PathBuf> {
    let config_dir = jjdeck_core::config::resolve_config_dir()
        .context("failed to resolve jjdeck config directory for diagnostics")?;
    let diagnostics_dir = config_dir.join("diagnostics");
    fs::create_dir_all(&diagnostics_dir).with_context(|| {
        format!(
            "failed to create diagnostics directory {}",
            diagnostics_dir.display()
        )
    })?;

    Ok(diagnostics_dir.join(format!("{}.log", epoch_ms())))
}
