use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::command_adapter;
use crate::command_runner::{CommandOutput, CommandRunner};
use crate::model::{ChangeGraph, ChangeSet, ChangedFile, FileStatus, Repository};
use crate::vcs::{Mutation, VcsError, VcsService};

const FIELD_SEPARATOR: char = '\u{1f}';
const RECORD_SEPARATOR: char = '\u{1e}';
const LOG_FIELD_COUNT: usize = 13;

const LOG_TEMPLATE: &str = r#"commit_id ++ "\x1f" ++ commit_id.short(8) ++ "\x1f" ++ change_id.short(12) ++ "\x1f" ++ author.name() ++ "\x1f" ++ author.email() ++ "\x1f" ++ author.timestamp().format("%Y-%m-%dT%H:%M:%S%:z") ++ "\x1f" ++ description.first_line() ++ "\x1f" ++ description ++ "\x1f" ++ parents.map(|p| p.commit_id()).join(",") ++ "\x1f" ++ local_bookmarks.map(|b| b.name()).join(",") ++ "\x1f" ++ if(current_working_copy, "1", "0") ++ "\x1f" ++ if(conflict, "1", "0") ++ "\x1f" ++ if(immutable, "1", "0") ++ "\x1e""#;

pub struct JjCli {
    runner: Arc<dyn CommandRunner>,
    workspace: PathBuf,
    revset: Option<String>,
}

impl JjCli {
    pub fn new(runner: Arc<dyn CommandRunner>, workspace: PathBuf) -> Self {
        Self {
            runner,
            workspace,
            revset: None,
        }
    }

    pub fn with_revset(mut self, revset: &str) -> Self {
        let revset = revset.trim();
        self.revset = (!revset.is_empty()).then(|| revset.to_string());
        self
    }

    fn repo_root(&self) -> Result<PathBuf, VcsError> {
        let args = ["root"];
        let output = run_jj(self.runner.as_ref(), &args, &self.workspace)?;
        if output.status_code != 0 {
            if looks_like_missing_repository(&output.stderr) {
                return Err(VcsError::NoRepository {
                    path: self.workspace.clone(),
                });
            }
            return Err(command_failed(&args, output));
        }

        let root = output
            .stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or_else(|| VcsError::Parse("jj root returned an empty path".to_string()))?;
        Ok(PathBuf::from(root))
    }

    fn run_checked(&self, args: &[&str]) -> Result<CommandOutput, VcsError> {
        let output = run_jj(self.runner.as_ref(), args, &self.workspace)?;
        if output.status_code != 0 {
            if looks_like_missing_repository(&output.stderr) {
                return Err(VcsError::NoRepository {
                    path: self.workspace.clone(),
                });
            }
            return Err(command_failed(args, output));
        }
        Ok(output)
    }
}

impl VcsService for JjCli {
    fn load_repository(&self) -> Result<Repository, VcsError> {
        let root = self.repo_root()?;

        let mut args = vec!["log", "--no-graph", "--color", "never", "-T", LOG_TEMPLATE];
        if let Some(revset) = self.revset.as_deref() {
            args.extend(["-r", revset]);
        }
        let output = self.run_checked(&args)?;
        let changes = parse_log(&output.stdout)?;
        debug!(count = changes.len(), root = %root.display(), "loaded change-sets");

        Ok(Repository::new(root, ChangeGraph::new(changes), Vec::new()))
    }

    fn mutate(&self, mutation: &Mutation) -> Result<String, VcsError> {
        let args = mutation_args(mutation);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        debug!(%mutation, "running jj mutation");

        let output = self.run_checked(&args)?;
        Ok(combined_output(&output))
    }

    fn fetch_description(&self, id: &str) -> Result<String, VcsError> {
        let output = self.run_checked(&[
            "log",
            "--no-graph",
            "--color",
            "never",
            "-r",
            id,
            "-T",
            "description",
        ])?;
        Ok(output.stdout.trim_end().to_string())
    }

    fn changed_files(&self, id: &str) -> Result<Vec<ChangedFile>, VcsError> {
        let output = self.run_checked(&["diff", "--summary", "--color", "never", "-r", id])?;
        Ok(parse_diff_summary(&output.stdout))
    }

    fn init_repository(&self) -> Result<(), VcsError> {
        self.run_checked(&["git", "init", "--colocate"])?;
        Ok(())
    }
}

pub fn mutation_args(mutation: &Mutation) -> Vec<String> {
    let parts: Vec<&str> = match mutation {
        Mutation::NewChange { parent } => vec!["new", parent],
        Mutation::Checkout { id } => vec!["edit", id],
        Mutation::Squash { id } => vec!["squash", "-r", id],
        Mutation::Abandon { id } => vec!["abandon", id],
        Mutation::Rebase {
            source,
            destination,
        } => vec!["rebase", "-s", source, "-d", destination],
        Mutation::Describe { id, text } => vec!["describe", id, "-m", text],
        Mutation::CreateBookmark { name, id } => vec!["bookmark", "create", name, "-r", id],
        Mutation::MoveBookmark { name, id } => {
            vec!["bookmark", "set", name, "-r", id, "--allow-backwards"]
        }
        Mutation::DeleteBookmark { name } => vec!["bookmark", "delete", name],
        Mutation::Push { bookmark } => vec!["git", "push", "--bookmark", bookmark, "--allow-new"],
    };
    parts.into_iter().map(str::to_string).collect()
}

pub fn parse_log(stdout: &str) -> Result<Vec<ChangeSet>, VcsError> {
    let mut changes = Vec::new();

    for record in stdout.split(RECORD_SEPARATOR) {
        let record = record.trim_start_matches(['\n', '\r']);
        if record.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = record.split(FIELD_SEPARATOR).collect();
        if fields.len() != LOG_FIELD_COUNT {
            return Err(VcsError::Parse(format!(
                "expected {LOG_FIELD_COUNT} fields per change-set, found {}",
                fields.len()
            )));
        }

        changes.push(ChangeSet {
            id: fields[0].to_string(),
            short_id: fields[1].to_string(),
            change_id: fields[2].to_string(),
            author: fields[3].to_string(),
            email: fields[4].to_string(),
            date: fields[5].to_string(),
            summary: fields[6].to_string(),
            description: fields[7].to_string(),
            parents: split_list(fields[8]),
            bookmarks: split_list(fields[9]),
            is_working_copy: parse_flag(fields[10])?,
            has_conflicts: parse_flag(fields[11])?,
            is_immutable: parse_flag(fields[12])?,
        });
    }

    Ok(changes)
}

pub fn parse_diff_summary(stdout: &str) -> Vec<ChangedFile> {
    stdout
        .lines()
        .filter_map(|line| {
            let mut characters = line.chars();
            let status = FileStatus::from_code(characters.next()?)?;
            let path = characters.as_str().trim();
            if path.is_empty() {
                return None;
            }
            Some(ChangedFile {
                status,
                path: path.to_string(),
            })
        })
        .collect()
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(value: &str) -> Result<bool, VcsError> {
    match value.trim() {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Err(VcsError::Parse(format!("unexpected flag value '{other}'"))),
    }
}

fn combined_output(output: &CommandOutput) -> String {
    [output.stdout.trim(), output.stderr.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn looks_like_missing_repository(stderr: &str) -> bool {
    let lowered = stderr.to_ascii_lowercase();
    lowered.contains("no jj repo") || lowered.contains("not a jj repo")
}

fn run_jj(
    runner: &dyn CommandRunner,
    args: &[&str],
    workspace: &Path,
) -> Result<CommandOutput, VcsError> {
    command_adapter::run_program(runner, "jj", args, Some(workspace), &[]).map_err(VcsError::Execute)
}

fn command_failed(args: &[&str], output: CommandOutput) -> VcsError {
    match command_adapter::ensure_success(args, output) {
        Ok(_) => VcsError::Execute(format!("jj {} reported failure", args.join(" "))),
        Err(failure) => VcsError::CommandFailed {
            command: failure.command,
            status: failure.status,
            stderr: failure.stderr,
        },
    }
}
