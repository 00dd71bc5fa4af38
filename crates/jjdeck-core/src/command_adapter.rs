use std::path::Path;

use crate::command_runner::{CommandOutput, CommandRunner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommandFailure {
    pub(crate) command: String,
    pub(crate) status: i32,
    pub(crate) stderr: String,
}

pub(crate) fn run_program(
    runner: &dyn CommandRunner,
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
    env: &[(&str, &str)],
) -> Result<CommandOutput, String> {
    runner
        .run_with_env(program, args, cwd, env)
        .map_err(|error| format!("{program}: {error}"))
}

pub(crate) fn ensure_success(
    args: &[&str],
    output: CommandOutput,
) -> Result<CommandOutput, CommandFailure> {
    if output.status_code == 0 {
        return Ok(output);
    }

    let stderr = output.stderr.trim();
    Err(CommandFailure {
        command: args.join(" "),
        status: output.status_code,
        stderr: if stderr.is_empty() {
            output.stdout.trim().to_string()
        } else {
            stderr.to_string()
        },
    })
}
