//! Derived facts over a `ChangeGraph`.
//!
//! Everything here is pure: the same graph and pull requests always produce
//! the same facts, and dangling parent references are never followed.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::model::{ChangeGraph, PullRequest};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphFacts {
    bookmark: Vec<Option<String>>,
    pull_request_branch: Vec<Option<String>>,
}

impl GraphFacts {
    /// Bookmark attached to the change-set or inherited from its nearest bookmarked ancestor.
    pub fn bookmark(&self, index: usize) -> Option<&str> {
        self.bookmark.get(index)?.as_deref()
    }

    /// Open-PR branch attached to the change-set or inherited from an ancestor.
    pub fn pull_request_branch(&self, index: usize) -> Option<&str> {
        self.pull_request_branch.get(index)?.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inheritance {
    pub assigned: Vec<Option<String>>,
    pub scans: usize,
}

pub fn infer_facts(graph: &ChangeGraph, pull_requests: &[PullRequest]) -> GraphFacts {
    let bookmark = inherit_assignments(graph, bookmark_seeds(graph)).assigned;
    let pull_request_branch =
        inherit_assignments(graph, pull_request_seeds(graph, pull_requests)).assigned;

    GraphFacts {
        bookmark,
        pull_request_branch,
    }
}

/// Breadth-first walk from `start` along parent edges.
///
/// The start node is checked first, so a change-set with its own bookmark
/// returns that bookmark.
pub fn nearest_ancestor_bookmark(graph: &ChangeGraph, start: usize) -> Option<&str> {
    graph.get(start)?;

    let mut queue = VecDeque::from([start]);
    let mut visited = HashSet::from([start]);

    while let Some(index) = queue.pop_front() {
        let Some(change) = graph.get(index) else {
            continue;
        };
        if let Some(bookmark) = change.bookmarks.first() {
            return Some(bookmark.as_str());
        }

        for &parent in graph.parents_of(index) {
            if visited.insert(parent) {
                queue.push_back(parent);
            }
        }
    }

    None
}

pub fn bookmark_seeds(graph: &ChangeGraph) -> Vec<Option<String>> {
    graph
        .changes()
        .iter()
        .map(|change| {
            if change.is_immutable {
                return None;
            }
            change.bookmarks.first().cloned()
        })
        .collect()
}

pub fn pull_request_seeds(
    graph: &ChangeGraph,
    pull_requests: &[PullRequest],
) -> Vec<Option<String>> {
    graph
        .changes()
        .iter()
        .map(|change| {
            if change.is_immutable {
                return None;
            }
            change
                .bookmarks
                .iter()
                .find(|bookmark| {
                    pull_requests
                        .iter()
                        .any(|pr| pr.is_open() && &pr.head_branch == *bookmark)
                })
                .cloned()
        })
        .collect()
}

/// Copies assignments from parents to unassigned children until a full scan
/// changes nothing.
///
/// Assignments are never removed, so every productive scan assigns at least
/// one more index and the loop ends after at most `graph.len()` scans.
pub fn inherit_assignments(graph: &ChangeGraph, seeds: Vec<Option<String>>) -> Inheritance {
    let mut assigned = seeds;
    assigned.resize(graph.len(), None);

    if graph.is_empty() {
        return Inheritance {
            assigned,
            scans: 0,
        };
    }

    let mut scans = 0;
    loop {
        scans += 1;
        let mut changed = false;

        // Log order is newest first, so walking backwards visits parents first.
        for index in (0..graph.len()).rev() {
            if assigned[index].is_some() {
                continue;
            }

            let inherited = graph
                .parents_of(index)
                .iter()
                .find_map(|&parent| assigned[parent].clone());
            if inherited.is_some() {
                assigned[index] = inherited;
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }

    debug!(changes = graph.len(), scans, "inheritance reached fixed point");
    Inheritance { assigned, scans }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestAction {
    Continue {
        branch: String,
        number: u64,
        attached: bool,
    },
    Create {
        branch: String,
        attached: bool,
    },
    NeedsBookmark,
}

pub fn pull_request_action(
    graph: &ChangeGraph,
    facts: &GraphFacts,
    pull_requests: &[PullRequest],
    index: usize,
) -> PullRequestAction {
    let Some(change) = graph.get(index) else {
        return PullRequestAction::NeedsBookmark;
    };
    let attached = |branch: &str| change.bookmarks.iter().any(|name| name == branch);

    if let Some(branch) = facts.pull_request_branch(index)
        && let Some(pr) = pull_requests
            .iter()
            .find(|pr| pr.is_open() && pr.head_branch == branch)
    {
        return PullRequestAction::Continue {
            branch: branch.to_string(),
            number: pr.number,
            attached: attached(branch),
        };
    }

    if let Some(own) = change.bookmarks.first() {
        return PullRequestAction::Create {
            branch: own.clone(),
            attached: true,
        };
    }

    match facts.bookmark(index) {
        Some(branch) => PullRequestAction::Create {
            branch: branch.to_string(),
            attached: false,
        },
        None => PullRequestAction::NeedsBookmark,
    }
}
