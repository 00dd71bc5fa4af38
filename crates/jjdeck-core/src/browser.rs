use crate::command_adapter;
use crate::command_runner::CommandRunner;

pub fn opener_program() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

pub fn open_url(runner: &dyn CommandRunner, url: &str) -> anyhow::Result<()> {
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        anyhow::bail!("refusing to open non-http url '{url}'");
    }

    let program = opener_program();
    let output = command_adapter::run_program(runner, program, &[url], None, &[])
        .map_err(anyhow::Error::msg)?;
    command_adapter::ensure_success(&[url], output).map_err(|failure| {
        anyhow::anyhow!(
            "{program} exited with {}: {}",
            failure.status,
            failure.stderr
        )
    })?;
    Ok(())
}
