use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Scope of the next redraw pass, ordered from cheapest to most expensive.
///
/// Each state does a superset of the work of the states before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum RenderState {
    #[default]
    Clean,
    RangeUpdateOnly,
    IncrementalUpdate,
    FullRedraw,
}

impl RenderState {
    #[must_use]
    pub const fn max(self, other: Self) -> Self {
        if self as u8 >= other as u8 {
            self
        } else {
            other
        }
    }
}

/// Work consumed from the state machine by one redraw pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderPass {
    pub state: RenderState,
    pub dirty: IndexSet<String>,
    pub range_update: bool,
}

impl RenderPass {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.state == RenderState::Clean
    }
}

/// Dirty-series bookkeeping that decides how much of a viewport to redraw.
///
/// Requests only ever escalate the pending state; a forced full redraw stays
/// forced until the pass is taken.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderStateMachine {
    requested: RenderState,
    dirty: IndexSet<String>,
    range_update_needed: bool,
}

impl RenderStateMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective state a pass taken now would run.
    #[must_use]
    pub fn pending_state(&self) -> RenderState {
        if self.requested == RenderState::FullRedraw {
            return RenderState::FullRedraw;
        }
        if !self.dirty.is_empty() {
            return RenderState::IncrementalUpdate;
        }
        if self.range_update_needed {
            return RenderState::RangeUpdateOnly;
        }
        RenderState::Clean
    }

    #[must_use]
    pub fn dirty(&self) -> &IndexSet<String> {
        &self.dirty
    }

    #[must_use]
    pub fn is_dirty(&self, name: &str) -> bool {
        self.dirty.contains(name)
    }

    #[must_use]
    pub fn range_update_needed(&self) -> bool {
        self.range_update_needed
    }

    pub fn request_range_update(&mut self) {
        self.range_update_needed = true;
        self.escalate(RenderState::RangeUpdateOnly);
    }

    pub fn mark_series_dirty(&mut self, name: &str) {
        if !self.dirty.contains(name) {
            self.dirty.insert(name.to_owned());
        }
        self.escalate(RenderState::IncrementalUpdate);
    }

    pub fn mark_all_dirty<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            self.mark_series_dirty(name);
        }
    }

    /// Samples were appended to an existing series.
    pub fn note_samples_appended(&mut self, name: &str) {
        self.mark_series_dirty(name);
        self.request_range_update();
    }

    /// Schedules a full rebuild; every listed series becomes dirty.
    pub fn force_full_redraw<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        self.mark_all_dirty(names);
        self.range_update_needed = true;
        self.escalate(RenderState::FullRedraw);
    }

    /// Consumes pending work and resets to `Clean`.
    pub fn take_pass(&mut self) -> RenderPass {
        let pass = RenderPass {
            state: self.pending_state(),
            dirty: std::mem::take(&mut self.dirty),
            range_update: self.range_update_needed,
        };
        self.requested = RenderState::Clean;
        self.range_update_needed = false;
        trace!(state = ?pass.state, dirty = pass.dirty.len(), "took render pass");
        pass
    }

    fn escalate(&mut self, state: RenderState) {
        self.requested = self.requested.max(state);
    }
}
