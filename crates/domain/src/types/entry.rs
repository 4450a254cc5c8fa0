//! Time entries and their lifecycle state

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{EntryId, ProjectId, UserId};
use crate::utils::serde::{duration_millis, duration_seconds};
use crate::{Result, TallyError};

/// Classification used for per-category totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Work,
    Personal,
}

crate::impl_domain_status_conversions!(Category {
    Work => "work",
    Personal => "personal",
});

impl Category {
    pub const ALL: [Self; 2] = [Self::Work, Self::Personal];
}

/// How an entry came into existence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryOrigin {
    #[default]
    Timer,
    Manual,
}

crate::impl_domain_status_conversions!(EntryOrigin {
    Timer => "timer",
    Manual => "manual",
});

/// Where an entry sits in the timer state machine.
///
/// An entry is created `Running` (or directly `Closed` for manual entries),
/// moves between `Running` and `Paused` any number of times, and ends in
/// `Closed`. `since` is the instant the current pause began.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryState {
    Running,
    Paused { since: DateTime<Utc> },
    Closed { end_time: DateTime<Utc> },
}

impl EntryState {
    #[must_use]
    pub const fn end_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Closed { end_time } => Some(*end_time),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_paused(&self) -> bool {
        matches!(self, Self::Paused { .. })
    }

    #[must_use]
    pub const fn last_pause_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Paused { since } => Some(*since),
            _ => None,
        }
    }

    /// True until the entry is closed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Closed { .. })
    }

    /// Rebuild the state from its flat column representation.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::Database`] for combinations the state machine
    /// cannot produce, such as a closed entry that is still paused.
    pub fn from_parts(
        end_time: Option<DateTime<Utc>>,
        is_paused: bool,
        last_pause_time: Option<DateTime<Utc>>,
    ) -> Result<Self> {
        match (end_time, is_paused, last_pause_time) {
            (None, false, None) => Ok(Self::Running),
            (None, true, Some(since)) => Ok(Self::Paused { since }),
            (Some(end_time), false, None) => Ok(Self::Closed { end_time }),
            (end, paused, since) => Err(TallyError::Database(format!(
                "inconsistent entry state: end_time={end:?}, is_paused={paused}, \
                 last_pause_time={since:?}"
            ))),
        }
    }
}

/// A single tracked work session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub project_id: Option<ProjectId>,
    pub title: String,
    pub description: String,
    pub notes: String,
    pub category: Category,
    pub start_time: DateTime<Utc>,
    pub state: EntryState,
    #[serde(with = "duration_millis")]
    pub paused_duration: TimeDelta,
    pub origin: EntryOrigin,
    /// Set only when a person overrides the timestamps after the fact.
    pub was_edited: bool,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimeEntry {
    /// A freshly started timer entry.
    #[must_use]
    pub fn start(
        user_id: UserId,
        title: String,
        project_id: Option<ProjectId>,
        category: Category,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EntryId::new(),
            user_id,
            project_id,
            title,
            description: String::new(),
            notes: String::new(),
            category,
            start_time: now,
            state: EntryState::Running,
            paused_duration: TimeDelta::zero(),
            origin: EntryOrigin::Timer,
            was_edited: false,
            is_archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub const fn end_time(&self) -> Option<DateTime<Utc>> {
        self.state.end_time()
    }

    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    #[must_use]
    pub const fn last_pause_time(&self) -> Option<DateTime<Utc>> {
        self.state.last_pause_time()
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// `end_time - start_time` for closed entries.
    #[must_use]
    pub fn gross_duration(&self) -> Option<TimeDelta> {
        self.end_time().map(|end| end - self.start_time)
    }

    /// Check the temporal invariants of the entry.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::InvalidInput`] if the pause accumulator is
    /// negative, if a closed entry does not end strictly after it starts, or
    /// if it has been paused for longer than it existed.
    pub fn validate(&self) -> Result<()> {
        if self.paused_duration < TimeDelta::zero() {
            return Err(TallyError::InvalidInput("paused duration cannot be negative".into()));
        }
        if let Some(gross) = self.gross_duration() {
            if gross <= TimeDelta::zero() {
                return Err(TallyError::InvalidInput("end time must be after start time".into()));
            }
            if self.paused_duration > gross {
                return Err(TallyError::InvalidInput(
                    "paused duration cannot exceed the total duration".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Snapshot of a user's timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TimerStatus {
    Idle,
    Running {
        entry: Box<TimeEntry>,
        #[serde(with = "duration_seconds")]
        elapsed: TimeDelta,
    },
    Paused {
        entry: Box<TimeEntry>,
        #[serde(with = "duration_seconds")]
        elapsed: TimeDelta,
    },
}

impl TimerStatus {
    #[must_use]
    pub fn entry(&self) -> Option<&TimeEntry> {
        match self {
            Self::Idle => None,
            Self::Running { entry, .. } | Self::Paused { entry, .. } => Some(entry),
        }
    }
}

/// A closed entry recorded after the fact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualEntry {
    pub title: String,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    #[serde(default)]
    pub category: Option<Category>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default, with = "duration_seconds")]
    pub paused_duration: TimeDelta,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: String,
}

/// Partial update of an existing entry; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub category: Option<Category>,
    pub project_id: Option<ProjectId>,
    /// Detach the entry from its project. Wins over `project_id`.
    pub clear_project: bool,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub paused_seconds: Option<i64>,
}

impl EntryEdit {
    /// Whether the edit overrides any timestamp or the pause accumulator.
    #[must_use]
    pub const fn touches_times(&self) -> bool {
        self.start_time.is_some() || self.end_time.is_some() || self.paused_seconds.is_some()
    }
}

/// An entry enriched for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDetails {
    pub entry: TimeEntry,
    pub project_name: String,
    pub worked_seconds: Option<i64>,
    pub formatted_duration: String,
    pub formatted_paused: String,
}

/// Caller-facing listing filter. Dates are local calendar days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryListQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub project_id: Option<ProjectId>,
    pub category: Option<Category>,
    pub include_archived: bool,
    pub limit: Option<usize>,
}

/// Ordering of store query results by `start_time`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Store-level entry selection.
///
/// `from`/`to` select entries that overlap the half-open window
/// `[from, to)`; a running entry overlaps every window that ends after it
/// started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryQuery {
    pub user_id: UserId,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub project_id: Option<ProjectId>,
    pub category: Option<Category>,
    pub include_archived: bool,
    pub closed_only: bool,
    pub order: SortOrder,
    pub limit: Option<usize>,
}

impl EntryQuery {
    /// Every non-archived entry of the user, oldest first.
    #[must_use]
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            from: None,
            to: None,
            project_id: None,
            category: None,
            include_archived: false,
            closed_only: false,
            order: SortOrder::Ascending,
            limit: None,
        }
    }

    #[must_use]
    pub fn between(mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    #[must_use]
    pub fn project(mut self, project_id: Option<ProjectId>) -> Self {
        self.project_id = project_id;
        self
    }

    #[must_use]
    pub fn category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn include_archived(mut self, include: bool) -> Self {
        self.include_archived = include;
        self
    }

    #[must_use]
    pub fn closed_only(mut self) -> Self {
        self.closed_only = true;
        self
    }

    #[must_use]
    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Apply every filter to a single entry. Store adapters that cannot push
    /// a predicate down use this to stay consistent with SQL-backed stores.
    #[must_use]
    pub fn matches(&self, entry: &TimeEntry) -> bool {
        if entry.user_id != self.user_id {
            return false;
        }
        if !self.include_archived && entry.is_archived {
            return false;
        }
        if self.closed_only && entry.is_active() {
            return false;
        }
        if self.project_id.is_some() && entry.project_id != self.project_id {
            return false;
        }
        if self.category.is_some_and(|c| entry.category != c) {
            return false;
        }
        if self.to.is_some_and(|to| entry.start_time >= to) {
            return false;
        }
        if let (Some(from), Some(end)) = (self.from, entry.end_time()) {
            if end <= from {
                return false;
            }
        }
        true
    }
}
