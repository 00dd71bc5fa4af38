use jjdeck_core::model::ChangeGraph;
use jjdeck_core::vcs::Mutation;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum RebaseState {
    #[default]
    Normal,
    PickingDestination {
        source: usize,
        source_id: String,
        destination: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RebaseOutcome {
    Rebase(Mutation),
    OntoItself,
}

impl RebaseState {
    /// Starts picking with the cursor on the source's first parent when it is listed.
    pub(crate) fn start(graph: &ChangeGraph, source: usize) -> Option<Self> {
        let change = graph.get(source)?;
        let destination = graph.parents_of(source).first().copied().unwrap_or(source);
        Some(Self::PickingDestination {
            source,
            source_id: change.id.clone(),
            destination,
        })
    }

    pub(crate) fn is_picking(&self) -> bool {
        matches!(self, Self::PickingDestination { .. })
    }

    pub(crate) fn source(&self) -> Option<usize> {
        match self {
            Self::PickingDestination { source, .. } => Some(*source),
            Self::Normal => None,
        }
    }

    pub(crate) fn destination(&self) -> Option<usize> {
        match self {
            Self::PickingDestination { destination, .. } => Some(*destination),
            Self::Normal => None,
        }
    }

    pub(crate) fn move_up(&mut self) {
        if let Self::PickingDestination { destination, .. } = self {
            *destination = destination.saturating_sub(1);
        }
    }

    pub(crate) fn move_down(&mut self, len: usize) {
        if let Self::PickingDestination { destination, .. } = self
            && *destination + 1 < len
        {
            *destination += 1;
        }
    }

    pub(crate) fn move_to(&mut self, index: usize) {
        if let Self::PickingDestination { destination, .. } = self {
            *destination = index;
        }
    }

    pub(crate) fn cancel(&mut self) {
        *self = Self::Normal;
    }

    /// Leaves picking mode and reports what the chosen destination means.
    pub(crate) fn confirm(&mut self, graph: &ChangeGraph) -> Option<RebaseOutcome> {
        let Self::PickingDestination {
            source,
            source_id,
            destination,
        } = std::mem::take(self)
        else {
            return None;
        };

        if destination == source {
            return Some(RebaseOutcome::OntoItself);
        }
        let target = graph.get(destination)?;
        Some(RebaseOutcome::Rebase(Mutation::Rebase {
            source: source_id,
            destination: target.id.clone(),
        }))
    }

    /// Re-resolves both ends against a reloaded graph by change id.
    ///
    /// The destination keeps pointing at the same change-set when it survived
    /// the reload and is clamped otherwise. Returns false and drops back to
    /// `Normal` when the source is gone.
    pub(crate) fn reconcile(&mut self, previous: &ChangeGraph, graph: &ChangeGraph) -> bool {
        let Self::PickingDestination {
            source,
            source_id,
            destination,
        } = self
        else {
            return true;
        };

        let Some(position) = graph.position(source_id) else {
            *self = Self::Normal;
            return false;
        };
        *source = position;
        *destination = previous
            .get(*destination)
            .and_then(|change| graph.position(&change.id))
            .unwrap_or_else(|| (*destination).min(graph.len().saturating_sub(1)));
        true
    }
}
