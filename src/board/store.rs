use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::fallback::sample_targets;
use super::filter::{apply_filters, FilterCriteria};
use super::model::Target;
use super::sort::sort_view;
use super::stats::{statistics, Statistics};
use super::validate::TargetForm;
use crate::api::{ActionReply, TargetApi};
use crate::effects::Effects;
use crate::error::BoardError;
use crate::output::report::{self, RenderOptions};
use crate::prompt::Confirm;

pub const ACTIVE_STATUS: &str = "active";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Where the current collection came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataSource {
    Empty,
    Live,
    Fallback,
}

/// Token of one load request; only the newest ticket may apply its result.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Live(usize),
    Fallback,
    Failed,
    /// A newer load was issued after this one; its result was dropped.
    Stale,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationKind {
    Remove,
    Complete,
}

impl MutationKind {
    fn prompt(self) -> &'static str {
        match self {
            MutationKind::Remove => "Are you sure you want to delete this target?",
            MutationKind::Complete => "Mark this target as completed?",
        }
    }

    fn success_message(self) -> &'static str {
        match self {
            MutationKind::Remove => "Target deleted!",
            MutationKind::Complete => "Target marked as completed!",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            MutationKind::Remove => "Failed to delete target",
            MutationKind::Complete => "Failed to mark target as completed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationState {
    Pending,
    Confirmed,
    Reverted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mutation {
    pub kind: MutationKind,
    pub state: MutationState,
}

/// Handle for an optimistic mutation between `begin_mutation` and `finish_mutation`.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MutationTicket {
    pub id: u64,
    pub kind: MutationKind,
}

/// Owns the target collection, its filtered view and the optimistic
/// mutation markers for one board page.
pub struct TargetStore<A, C, E> {
    api: A,
    confirm: C,
    effects: E,
    targets: Vec<Target>,
    view: Vec<Target>,
    criteria: FilterCriteria,
    source: DataSource,
    loading: bool,
    issued_loads: u64,
    fallback_on_error: bool,
    mutations: BTreeMap<u64, Mutation>,
    notices: Vec<Notice>,
}

impl<A, C, E> TargetStore<A, C, E>
where
    A: TargetApi,
    C: Confirm,
    E: Effects,
{
    pub fn new(api: A, confirm: C, effects: E) -> Self {
        Self {
            api,
            confirm,
            effects,
            targets: Vec::new(),
            view: Vec::new(),
            criteria: FilterCriteria::default(),
            source: DataSource::Empty,
            loading: false,
            issued_loads: 0,
            fallback_on_error: true,
            mutations: BTreeMap::new(),
            notices: Vec::new(),
        }
    }

    /// Disables the sample-data fallback; failed loads keep the old collection.
    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback_on_error = enabled;
        self
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn view(&self) -> &[Target] {
        &self.view
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    pub fn mutation(&self, id: u64) -> Option<Mutation> {
        self.mutations.get(&id).copied()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub async fn load(&mut self) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = self.api.list_targets(ACTIVE_STATUS).await;
        self.finish_load(ticket, result)
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued_loads += 1;
        self.loading = true;
        LoadTicket(self.issued_loads)
    }

    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Target>, BoardError>,
    ) -> LoadOutcome {
        if ticket.0 != self.issued_loads {
            debug!(
                ticket = ticket.0,
                latest = self.issued_loads,
                "dropping stale load response"
            );
            return LoadOutcome::Stale;
        }
        self.loading = false;
        match result {
            Ok(targets) => {
                info!(count = targets.len(), "loaded targets");
                let count = targets.len();
                self.replace(targets, DataSource::Live);
                LoadOutcome::Live(count)
            }
            Err(e) if self.fallback_on_error => {
                warn!(error = %e, "failed to load targets, showing sample data");
                self.replace(sample_targets(Utc::now()), DataSource::Fallback);
                self.notify(
                    NoticeLevel::Info,
                    "Live targets unavailable, showing sample data".to_string(),
                );
                LoadOutcome::Fallback
            }
            Err(e) => {
                warn!(error = %e, "failed to load targets");
                self.notify(NoticeLevel::Error, e.user_message("Failed to load targets"));
                LoadOutcome::Failed
            }
        }
    }

    fn replace(&mut self, targets: Vec<Target>, source: DataSource) {
        self.targets = targets;
        self.source = source;
        // Resolved markers are superseded by the fresh collection.
        self.mutations.retain(|_, m| m.state == MutationState::Pending);
        self.refresh_view();
    }

    /// Replaces the criteria and recomputes the view from the full collection.
    pub fn apply_filters(&mut self, criteria: FilterCriteria) -> &[Target] {
        self.criteria = criteria;
        self.refresh_view();
        &self.view
    }

    fn refresh_view(&mut self) {
        let mut view = apply_filters(&self.targets, &self.criteria);
        sort_view(&mut view);
        self.view = view;
    }

    pub fn statistics(&self) -> Statistics {
        statistics(&self.targets)
    }

    pub fn pending_ids(&self) -> BTreeSet<u64> {
        self.mutations
            .iter()
            .filter(|(_, m)| m.state == MutationState::Pending)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn render(&self, options: &RenderOptions) -> String {
        report::render_board(&self.view, &self.pending_ids(), options)
    }

    pub async fn create(&mut self, form: &TargetForm) -> Result<(), BoardError> {
        let request = match form.validate() {
            Ok(request) => request,
            Err(e) => {
                debug!(field = e.field(), "rejected target form");
                self.notify(NoticeLevel::Error, e.to_string());
                return Err(e.into());
            }
        };
        match self.api.create_target(&request).await {
            Ok(reply) => {
                self.notify(
                    NoticeLevel::Success,
                    reply
                        .message
                        .unwrap_or_else(|| "Target added!".to_string()),
                );
                self.effects.success_burst();
                self.load().await;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to create target");
                self.notify(NoticeLevel::Error, e.user_message("Failed to add target"));
                Err(e)
            }
        }
    }

    pub async fn remove(&mut self, id: u64) -> Result<MutationState, BoardError> {
        self.mutate(id, MutationKind::Remove).await
    }

    pub async fn complete(&mut self, id: u64) -> Result<MutationState, BoardError> {
        self.mutate(id, MutationKind::Complete).await
    }

    async fn mutate(&mut self, id: u64, kind: MutationKind) -> Result<MutationState, BoardError> {
        let ticket = self.begin_mutation(id, kind)?;
        let result = match kind {
            MutationKind::Remove => self.api.delete_target(id).await,
            MutationKind::Complete => self.api.complete_target(id).await,
        };
        let state = self.finish_mutation(ticket, &result);
        result?;
        self.load().await;
        Ok(state)
    }

    /// Asks for confirmation and marks the card as pending.
    pub fn begin_mutation(
        &mut self,
        id: u64,
        kind: MutationKind,
    ) -> Result<MutationTicket, BoardError> {
        if !self.confirm.confirm(kind.prompt()) {
            debug!(id, ?kind, "mutation declined");
            return Err(BoardError::Declined);
        }
        self.mutations.insert(
            id,
            Mutation {
                kind,
                state: MutationState::Pending,
            },
        );
        if kind == MutationKind::Remove {
            self.effects.removal_started(id);
        }
        Ok(MutationTicket { id, kind })
    }

    /// Settles a pending mutation: `Confirmed` on success, `Reverted` on failure.
    ///
    /// Does not resynchronize; callers follow a confirmed mutation with `load`.
    pub fn finish_mutation(
        &mut self,
        ticket: MutationTicket,
        result: &Result<ActionReply, BoardError>,
    ) -> MutationState {
        let state = match result {
            Ok(reply) => {
                let message = reply
                    .message
                    .clone()
                    .unwrap_or_else(|| ticket.kind.success_message().to_string());
                self.notify(NoticeLevel::Success, message);
                if ticket.kind == MutationKind::Complete {
                    self.effects.success_burst();
                }
                MutationState::Confirmed
            }
            Err(e) => {
                warn!(id = ticket.id, error = %e, "target mutation failed");
                self.notify(
                    NoticeLevel::Error,
                    e.user_message(ticket.kind.failure_message()),
                );
                MutationState::Reverted
            }
        };
        self.mutations.insert(
            ticket.id,
            Mutation {
                kind: ticket.kind,
                state,
            },
        );
        state
    }

    fn notify(&mut self, level: NoticeLevel, message: String) {
        self.notices.push(Notice { level, message });
    }
}
