use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::graph::{self, GraphFacts};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    pub id: String,
    pub short_id: String,
    pub change_id: String,
    pub author: String,
    pub email: String,
    pub date: String,
    pub summary: String,
    pub description: String,
    pub parents: Vec<String>,
    pub bookmarks: Vec<String>,
    pub is_working_copy: bool,
    pub has_conflicts: bool,
    pub is_immutable: bool,
}

impl ChangeSet {
    pub fn display_summary(&self) -> &str {
        if self.summary.trim().is_empty() {
            "(no description set)"
        } else {
            self.summary.as_str()
        }
    }
}

/// Change-sets in log order (newest first) plus a parent index.
///
/// Parent ids that do not resolve to a change-set in the same snapshot are
/// kept on the `ChangeSet` but left out of the index, so walks never follow them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeGraph {
    changes: Vec<ChangeSet>,
    positions: HashMap<String, usize>,
    parents: Vec<Vec<usize>>,
}

impl ChangeGraph {
    pub fn new(changes: Vec<ChangeSet>) -> Self {
        let positions: HashMap<String, usize> = changes
            .iter()
            .enumerate()
            .map(|(index, change)| (change.id.clone(), index))
            .collect();

        let parents = changes
            .iter()
            .map(|change| {
                change
                    .parents
                    .iter()
                    .filter_map(|parent| positions.get(parent).copied())
                    .collect()
            })
            .collect();

        Self {
            changes,
            positions,
            parents,
        }
    }

    pub fn changes(&self) -> &[ChangeSet] {
        &self.changes
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ChangeSet> {
        self.changes.get(index)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn position_by_change_id(&self, change_id: &str) -> Option<usize> {
        self.changes
            .iter()
            .position(|change| change.change_id == change_id)
    }

    pub fn parents_of(&self, index: usize) -> &[usize] {
        self.parents
            .get(index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn working_copy_index(&self) -> Option<usize> {
        self.changes
            .iter()
            .position(|change| change.is_working_copy)
    }

    pub fn bookmark_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .changes
            .iter()
            .flat_map(|change| change.bookmarks.iter().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PullRequestState {
    Open,
    Closed,
    Merged,
}

impl fmt::Display for PullRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Merged => write!(f, "merged"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    Pending,
    Passing,
    Failing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewStatus {
    Approved,
    ChangesRequested,
    ReviewRequired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub body: String,
    pub url: String,
    pub state: PullRequestState,
    pub base_branch: String,
    pub head_branch: String,
    pub checks: Option<CheckStatus>,
    pub review: Option<ReviewStatus>,
}

impl PullRequest {
    pub fn is_open(&self) -> bool {
        self.state == PullRequestState::Open
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub key: String,
    pub display_key: String,
    pub summary: String,
    pub status: String,
    pub kind: String,
    pub priority: String,
    pub description: String,
    pub web_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
}

impl FileStatus {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'A' => Some(Self::Added),
            'M' => Some(Self::Modified),
            'D' => Some(Self::Deleted),
            'R' => Some(Self::Renamed),
            'C' => Some(Self::Copied),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Self::Added => 'A',
            Self::Modified => 'M',
            Self::Deleted => 'D',
            Self::Renamed => 'R',
            Self::Copied => 'C',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    pub status: FileStatus,
    pub path: String,
}

/// One consistent view of the repository handed to the dashboard.
///
/// `facts` is always derived from `graph` and `pull_requests`; every
/// constructor and mutator recomputes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub root: PathBuf,
    graph: ChangeGraph,
    pull_requests: Vec<PullRequest>,
    facts: GraphFacts,
}

impl Repository {
    pub fn new(root: PathBuf, graph: ChangeGraph, pull_requests: Vec<PullRequest>) -> Self {
        let facts = graph::infer_facts(&graph, &pull_requests);
        Self {
            root,
            graph,
            pull_requests,
            facts,
        }
    }

    pub fn graph(&self) -> &ChangeGraph {
        &self.graph
    }

    pub fn pull_requests(&self) -> &[PullRequest] {
        &self.pull_requests
    }

    pub fn facts(&self) -> &GraphFacts {
        &self.facts
    }

    pub fn replace_pull_requests(&mut self, pull_requests: Vec<PullRequest>) {
        self.pull_requests = pull_requests;
        self.facts = graph::infer_facts(&self.graph, &self.pull_requests);
    }

    pub fn open_pull_request_for(&self, branch: &str) -> Option<&PullRequest> {
        self.pull_requests
            .iter()
            .find(|pr| pr.is_open() && pr.head_branch == branch)
    }
}
