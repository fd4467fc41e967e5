//! Smart element factory: typed settings per widget kind and the pure
//! function that turns them into an initial payload.
//!
//! DESIGN
//! ======
//! Tool panels hand over a flat, string-keyed settings map. That map is
//! parsed once, at the boundary, into one settings struct per kind
//! (`SmartSettings::from_flat`), and every later step works on the typed
//! value. `build_initial_payload` is pure: same settings, same payload.
//!
//! Mind maps are the exception. A mind map is not a widget payload but a
//! standalone `mindmap_node` element flagged `is_root`, created directly by
//! the engine. `from_flat` rejects `SmartKind::MindMap` with
//! `SettingsError::NotFactoryBuilt` so the branch cannot be taken by accident.

#[cfg(test)]
#[path = "smart_test.rs"]
mod smart_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::consts::{CHECKLIST_SIZE, KANBAN_SIZE, MAX_GENERATED_ITEMS, MINDMAP_NODE_SIZE, TIMELINE_SIZE, VOTING_SIZE};
use crate::geom::Size;

// =============================================================================
// TYPES
// =============================================================================

/// Sub-kind of a smart widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmartKind {
    Kanban,
    Voting,
    Timeline,
    Checklist,
    MindMap,
}

impl SmartKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kanban => "kanban",
            Self::Voting => "voting",
            Self::Timeline => "timeline",
            Self::Checklist => "checklist",
            Self::MindMap => "mind_map",
        }
    }

    /// Footprint a freshly created widget of this kind occupies.
    #[must_use]
    pub fn default_size(self) -> Size {
        match self {
            Self::Kanban => KANBAN_SIZE.into(),
            Self::Voting => VOTING_SIZE.into(),
            Self::Timeline => TIMELINE_SIZE.into(),
            Self::Checklist => CHECKLIST_SIZE.into(),
            Self::MindMap => MINDMAP_NODE_SIZE.into(),
        }
    }
}

impl fmt::Display for SmartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from parsing smart-element settings or generated payloads.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("{0} elements are created directly, not through the smart element factory")]
    NotFactoryBuilt(SmartKind),
    #[error("settings field `{0}` must not be empty")]
    EmptyField(&'static str),
    #[error("settings field `{field}` is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("settings field `{field}` = {value} is outside {min}..={max}")]
    OutOfRange { field: &'static str, value: u64, min: u64, max: u64 },
    #[error("payload is for {found}, expected {expected}")]
    KindMismatch { expected: SmartKind, found: SmartKind },
    #[error("payload does not match the {kind} schema: {source}")]
    InvalidPayload {
        kind: SmartKind,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanbanSettings {
    pub title: String,
    /// Comma-separated column names, in display order.
    pub columns: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingSettings {
    pub question: String,
    pub options_count: u32,
    pub max_votes_per_user: u32,
    pub allow_multiple_votes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSettings {
    pub title: String,
    pub milestones_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistSettings {
    pub title: String,
    pub items_count: u32,
}

/// Validated settings for one factory-built widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SmartSettings {
    Kanban(KanbanSettings),
    Voting(VotingSettings),
    Timeline(TimelineSettings),
    Checklist(ChecklistSettings),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanbanCard {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanbanColumn {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub cards: Vec<KanbanCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanbanBoard {
    pub title: String,
    pub columns: Vec<KanbanColumn>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOption {
    pub id: String,
    pub label: String,
    /// Ids of the users who voted for this option.
    #[serde(default)]
    pub votes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingPoll {
    pub question: String,
    pub options: Vec<VoteOption>,
    pub max_votes_per_user: u32,
    pub allow_multiple_votes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub title: String,
    pub milestones: Vec<Milestone>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    pub title: String,
    pub items: Vec<ChecklistItem>,
}

/// Content of a `smart` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SmartPayload {
    Kanban(KanbanBoard),
    Voting(VotingPoll),
    Timeline(Timeline),
    Checklist(Checklist),
}

impl SmartPayload {
    #[must_use]
    pub fn kind(&self) -> SmartKind {
        match self {
            Self::Kanban(_) => SmartKind::Kanban,
            Self::Voting(_) => SmartKind::Voting,
            Self::Timeline(_) => SmartKind::Timeline,
            Self::Checklist(_) => SmartKind::Checklist,
        }
    }

    /// Accept generated `data` for a widget of `kind`.
    ///
    /// `data` may be a complete payload (the `kind` tag is optional) or a
    /// flat settings map, in which case the payload is built by the factory.
    ///
    /// # Errors
    ///
    /// `NotFactoryBuilt` for mind maps, `KindMismatch` when a tagged payload
    /// names a different kind, otherwise the settings error from the
    /// flat-map fallback.
    pub fn from_data(kind: SmartKind, data: &Value) -> Result<Self, SettingsError> {
        if kind == SmartKind::MindMap {
            return Err(SettingsError::NotFactoryBuilt(kind));
        }
        let Some(map) = data.as_object() else {
            return Err(SettingsError::InvalidField { field: "data", reason: "expected a JSON object".into() });
        };

        let mut tagged = map.clone();
        tagged.entry("kind").or_insert_with(|| Value::String(kind.as_str().into()));
        match serde_json::from_value::<Self>(Value::Object(tagged)) {
            Ok(payload) if payload.kind() == kind => Ok(payload),
            Ok(payload) => Err(SettingsError::KindMismatch { expected: kind, found: payload.kind() }),
            Err(payload_err) => match SmartSettings::from_flat(kind, map) {
                Ok(settings) => Ok(build_initial_payload(&settings)),
                Err(SettingsError::EmptyField(_) | SettingsError::InvalidField { .. }) => {
                    Err(SettingsError::InvalidPayload { kind, source: payload_err })
                }
                Err(e) => Err(e),
            },
        }
    }
}

// =============================================================================
// SETTINGS PARSING
// =============================================================================

impl SmartSettings {
    #[must_use]
    pub fn kind(&self) -> SmartKind {
        match self {
            Self::Kanban(_) => SmartKind::Kanban,
            Self::Voting(_) => SmartKind::Voting,
            Self::Timeline(_) => SmartKind::Timeline,
            Self::Checklist(_) => SmartKind::Checklist,
        }
    }

    /// Parse and validate the flat settings map a tool panel submits.
    ///
    /// Keys are accepted in both `camelCase` (as panels send them) and
    /// `snake_case`. Numbers may arrive as JSON numbers or numeric strings.
    ///
    /// # Errors
    ///
    /// Returns `NotFactoryBuilt` for `MindMap`, and a field error for any
    /// missing, malformed, or out-of-range value.
    pub fn from_flat(kind: SmartKind, map: &Map<String, Value>) -> Result<Self, SettingsError> {
        let settings = match kind {
            SmartKind::Kanban => Self::Kanban(KanbanSettings {
                title: text(map, &["title"], "Kanban Board")?,
                columns: text(map, &["columns", "columnNames", "column_names"], "To Do, In Progress, Done")?,
            }),
            SmartKind::Voting => Self::Voting(VotingSettings {
                question: text(map, &["question", "title"], "What should we do next?")?,
                options_count: count(map, "options_count", &["optionsCount", "options_count"], 3)?,
                max_votes_per_user: count(map, "max_votes_per_user", &["maxVotesPerUser", "max_votes_per_user"], 1)?,
                allow_multiple_votes: flag(map, &["allowMultipleVotes", "allow_multiple_votes"], false)?,
            }),
            SmartKind::Timeline => Self::Timeline(TimelineSettings {
                title: text(map, &["title"], "Timeline")?,
                milestones_count: count(map, "milestones_count", &["milestonesCount", "milestones_count"], 4)?,
            }),
            SmartKind::Checklist => Self::Checklist(ChecklistSettings {
                title: text(map, &["title"], "Checklist")?,
                items_count: count(map, "items_count", &["itemsCount", "items_count"], 3)?,
            }),
            SmartKind::MindMap => return Err(SettingsError::NotFactoryBuilt(kind)),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Check the invariants each kind's payload builder relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated field constraint.
    pub fn validate(&self) -> Result<(), SettingsError> {
        match self {
            Self::Kanban(s) => {
                if column_names(&s.columns).next().is_none() {
                    return Err(SettingsError::EmptyField("columns"));
                }
                Ok(())
            }
            Self::Voting(s) => {
                in_range("options_count", s.options_count, 2, MAX_GENERATED_ITEMS)?;
                in_range("max_votes_per_user", s.max_votes_per_user, 1, s.options_count)
            }
            Self::Timeline(s) => in_range("milestones_count", s.milestones_count, 1, MAX_GENERATED_ITEMS),
            Self::Checklist(s) => in_range("items_count", s.items_count, 1, MAX_GENERATED_ITEMS),
        }
    }
}

fn lookup<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| map.get(*k)).filter(|v| !v.is_null())
}

fn text(map: &Map<String, Value>, keys: &[&'static str], default: &str) -> Result<String, SettingsError> {
    match lookup(map, keys) {
        None => Ok(default.to_string()),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(other) => Err(SettingsError::InvalidField { field: keys[0], reason: format!("expected text, got {other}") }),
    }
}

fn count(map: &Map<String, Value>, field: &'static str, keys: &[&str], default: u32) -> Result<u32, SettingsError> {
    let invalid = |reason: String| SettingsError::InvalidField { field, reason };
    let value = match lookup(map, keys) {
        None => return Ok(default),
        Some(Value::Number(n)) => n.as_u64().ok_or_else(|| invalid(format!("expected a non-negative integer, got {n}")))?,
        Some(Value::String(s)) => {
            s.trim().parse::<u64>().map_err(|e| invalid(format!("expected a non-negative integer, got {s:?}: {e}")))?
        }
        Some(other) => return Err(invalid(format!("expected a non-negative integer, got {other}"))),
    };
    u32::try_from(value).map_err(|_| SettingsError::OutOfRange { field, value, min: 0, max: u64::from(u32::MAX) })
}

fn flag(map: &Map<String, Value>, keys: &[&'static str], default: bool) -> Result<bool, SettingsError> {
    match lookup(map, keys) {
        None => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) if s == "true" => Ok(true),
        Some(Value::String(s)) if s == "false" => Ok(false),
        Some(other) => Err(SettingsError::InvalidField { field: keys[0], reason: format!("expected a boolean, got {other}") }),
    }
}

fn in_range(field: &'static str, value: u32, min: u32, max: u32) -> Result<(), SettingsError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::OutOfRange { field, value: value.into(), min: min.into(), max: max.into() })
    }
}

fn column_names(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|name| !name.is_empty())
}

// =============================================================================
// FACTORY
// =============================================================================

/// Build the canonical initial payload for a widget. Generated item counts
/// are capped at `MAX_GENERATED_ITEMS` even for settings that skipped
/// [`SmartSettings::validate`].
#[must_use]
pub fn build_initial_payload(settings: &SmartSettings) -> SmartPayload {
    match settings {
        SmartSettings::Kanban(s) => SmartPayload::Kanban(KanbanBoard {
            title: s.title.clone(),
            columns: column_names(&s.columns)
                .enumerate()
                .map(|(i, name)| KanbanColumn { id: format!("column-{}", i + 1), title: name.to_string(), cards: Vec::new() })
                .collect(),
        }),
        SmartSettings::Voting(s) => SmartPayload::Voting(VotingPoll {
            question: s.question.clone(),
            options: (1..=s.options_count.min(MAX_GENERATED_ITEMS))
                .map(|n| VoteOption { id: format!("option-{n}"), label: format!("Option {n}"), votes: Vec::new() })
                .collect(),
            max_votes_per_user: s.max_votes_per_user,
            allow_multiple_votes: s.allow_multiple_votes,
        }),
        SmartSettings::Timeline(s) => SmartPayload::Timeline(Timeline {
            title: s.title.clone(),
            milestones: (1..=s.milestones_count.min(MAX_GENERATED_ITEMS))
                .map(|n| Milestone { id: format!("milestone-{n}"), label: format!("Milestone {n}"), date: None, done: false })
                .collect(),
        }),
        SmartSettings::Checklist(s) => SmartPayload::Checklist(Checklist {
            title: s.title.clone(),
            items: (1..=s.items_count.min(MAX_GENERATED_ITEMS))
                .map(|n| ChecklistItem { id: format!("item-{n}"), text: String::new(), checked: false })
                .collect(),
        }),
    }
}
