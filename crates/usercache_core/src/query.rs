//! Query builder.
//!
//! A [`Filter`] is a conjunction of [`Clause`]s. Set clauses (keys, types) are
//! disjunctive over their members. An empty filter matches every entry.
//!
//! Builders are pure functions so they can be tested without a store:
//!
//! ```rust
//! use serde_json::json;
//! use usercache_core::{key_filter, type_filter, Entry, MessageKind, RecordType, TenantId};
//!
//! let user = TenantId::new();
//! let entry = Entry::message(user, MessageKind::Message, "a", json!(null), 10.0);
//!
//! let filter = key_filter(&["a".to_string(), "c".to_string()])
//!     .and(type_filter(&[RecordType::Message]));
//! assert!(filter.matches(&entry));
//! ```

use crate::entry::{Entry, RecordType, TenantId};
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Which timestamp a time window applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeField {
    /// `metadata.write_ts`
    #[serde(rename = "write_ts")]
    WriteTs,
    /// `metadata.read_ts`
    #[serde(rename = "read_ts")]
    ReadTs,
}

impl TimeField {
    /// Returns the metadata field name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            TimeField::WriteTs => "write_ts",
            TimeField::ReadTs => "read_ts",
        }
    }
}

impl fmt::Display for TimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "write_ts" => Ok(TimeField::WriteTs),
            "read_ts" => Ok(TimeField::ReadTs),
            other => Err(CoreError::UnknownTimeField(other.to_string())),
        }
    }
}

/// A half-open time window `[start_ts, end_ts)` over one time field.
///
/// The upper bound is required; "everything up to now" is expressed by passing
/// the current time. The lower bound is optional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeQuery")]
pub struct TimeQuery {
    field: TimeField,
    start_ts: Option<f64>,
    end_ts: f64,
}

/// Unchecked wire shape of a [`TimeQuery`].
#[derive(Deserialize)]
struct RawTimeQuery {
    field: TimeField,
    #[serde(default)]
    start_ts: Option<f64>,
    end_ts: f64,
}

impl TryFrom<RawTimeQuery> for TimeQuery {
    type Error = CoreError;

    fn try_from(raw: RawTimeQuery) -> CoreResult<Self> {
        TimeQuery::new(raw.field, raw.start_ts, raw.end_ts)
    }
}

impl TimeQuery {
    /// Creates a validated time window.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MalformedFilter`] if either bound is not finite or
    /// if `start_ts > end_ts`.
    pub fn new(field: TimeField, start_ts: Option<f64>, end_ts: f64) -> CoreResult<Self> {
        if !end_ts.is_finite() {
            return Err(CoreError::malformed_filter(format!(
                "end_ts must be finite, got {end_ts}"
            )));
        }
        if let Some(start) = start_ts {
            if !start.is_finite() {
                return Err(CoreError::malformed_filter(format!(
                    "start_ts must be finite, got {start}"
                )));
            }
            if start > end_ts {
                return Err(CoreError::malformed_filter(format!(
                    "start_ts {start} is after end_ts {end_ts}"
                )));
            }
        }
        Ok(Self {
            field,
            start_ts,
            end_ts,
        })
    }

    /// Creates an unbounded-below window ending at `end_ts`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MalformedFilter`] if `end_ts` is not finite.
    pub fn until(field: TimeField, end_ts: f64) -> CoreResult<Self> {
        Self::new(field, None, end_ts)
    }

    /// Returns the time field.
    #[must_use]
    pub fn field(&self) -> TimeField {
        self.field
    }

    /// Returns the inclusive lower bound.
    #[must_use]
    pub fn start_ts(&self) -> Option<f64> {
        self.start_ts
    }

    /// Returns the exclusive upper bound.
    #[must_use]
    pub fn end_ts(&self) -> f64 {
        self.end_ts
    }

    /// Returns true if `ts` falls inside the window.
    #[must_use]
    pub fn contains(&self, ts: f64) -> bool {
        ts < self.end_ts && self.start_ts.map_or(true, |start| ts >= start)
    }
}

/// One conjunct of a [`Filter`].
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// `user_id == tenant`
    Tenant(TenantId),
    /// `metadata.type` is one of the set. An empty set matches nothing.
    Types(BTreeSet<RecordType>),
    /// `metadata.key` is one of the set.
    Keys(BTreeSet<String>),
    /// The window's time field falls inside the window.
    Time(TimeQuery),
}

impl Clause {
    /// Evaluates this clause against an entry.
    #[must_use]
    pub fn matches(&self, entry: &Entry) -> bool {
        match self {
            Clause::Tenant(user) => entry.user_id == *user,
            Clause::Types(types) => types.contains(&entry.metadata.record_type),
            Clause::Keys(keys) => keys.contains(&entry.metadata.key),
            // An unset read_ts never satisfies a read_ts window.
            Clause::Time(window) => entry
                .metadata
                .time(window.field())
                .map_or(false, |ts| window.contains(ts)),
        }
    }
}

/// A conjunctive predicate over entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    /// Creates a filter that matches everything.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Creates a filter from a single clause.
    #[must_use]
    pub fn from_clause(clause: Clause) -> Self {
        Self {
            clauses: vec![clause],
        }
    }

    /// Combines two filters conjunctively.
    #[must_use]
    pub fn and(mut self, other: Filter) -> Self {
        self.clauses.extend(other.clauses);
        self
    }

    /// Returns the clauses of this filter.
    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Returns true if the filter has no clauses.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Returns the tenant this filter is scoped to, if any.
    #[must_use]
    pub fn tenant(&self) -> Option<TenantId> {
        self.clauses.iter().find_map(|clause| match clause {
            Clause::Tenant(user) => Some(*user),
            _ => None,
        })
    }

    /// Evaluates the filter against an entry.
    #[must_use]
    pub fn matches(&self, entry: &Entry) -> bool {
        self.clauses.iter().all(|clause| clause.matches(entry))
    }
}

/// Matches entries whose key is in `keys`.
///
/// An empty key list places no restriction.
#[must_use]
pub fn key_filter(keys: &[String]) -> Filter {
    if keys.is_empty() {
        return Filter::all();
    }
    Filter::from_clause(Clause::Keys(keys.iter().cloned().collect()))
}

/// Matches entries whose type is in `types`.
#[must_use]
pub fn type_filter(types: &[RecordType]) -> Filter {
    Filter::from_clause(Clause::Types(types.iter().copied().collect()))
}

/// Matches entries inside the time window.
#[must_use]
pub fn time_filter(window: &TimeQuery) -> Filter {
    Filter::from_clause(Clause::Time(*window))
}

/// Matches entries owned by `user`.
#[must_use]
pub fn tenant_filter(user: TenantId) -> Filter {
    Filter::from_clause(Clause::Tenant(user))
}

/// Selects the single document slot for `(user, key)`.
#[must_use]
pub fn document_filter(user: TenantId, key: &str) -> Filter {
    tenant_filter(user)
        .and(type_filter(&[RecordType::Document]))
        .and(Filter::from_clause(Clause::Keys(BTreeSet::from([
            key.to_string()
        ]))))
}

/// Selects message-class entries for `user`, optionally narrowed by keys and time.
#[must_use]
pub fn message_filter(user: TenantId, keys: &[String], time: Option<&TimeQuery>) -> Filter {
    let mut filter = tenant_filter(user)
        .and(type_filter(&RecordType::MESSAGE_CLASSES))
        .and(key_filter(keys));
    if let Some(window) = time {
        filter = filter.and(time_filter(window));
    }
    filter
}
