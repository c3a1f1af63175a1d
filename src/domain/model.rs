use serde::{Deserialize, Serialize};
use std::fmt;

/// 群組成員；由列表分頁或批次查詢建立，建立後不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: Option<String>,
    pub location: Option<String>,
}

impl Member {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            location: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Access token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Opaque continuation token. The listing endpoint hands back a full URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(next: impl Into<String>) -> Self {
        Self(next.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    First { group_id: String, limit: usize },
    Next(Cursor),
}

#[derive(Debug, Clone, Default)]
pub struct MemberPage {
    pub members: Vec<Member>,
    pub next: Option<Cursor>,
}

/// Raw status of a delete call; non-2xx responses are data here, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResponse {
    pub status: u16,
    pub body: String,
}

impl DeleteResponse {
    pub fn accepted(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalTask {
    pub group_id: String,
    pub member_id: String,
}

impl RemovalTask {
    pub fn new(group_id: impl Into<String>, member_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            member_id: member_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    Success { member_id: String },
    Failure { member_id: String, reason: String },
}

impl RemovalOutcome {
    pub fn member_id(&self) -> &str {
        match self {
            RemovalOutcome::Success { member_id } | RemovalOutcome::Failure { member_id, .. } => {
                member_id
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RemovalOutcome::Success { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failed_ids: Vec<String>,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: &[RemovalOutcome]) -> Self {
        let mut summary = Self {
            attempted: outcomes.len(),
            ..Self::default()
        };

        for outcome in outcomes {
            match outcome {
                RemovalOutcome::Success { .. } => summary.succeeded += 1,
                RemovalOutcome::Failure { member_id, .. } => {
                    summary.failed += 1;
                    summary.failed_ids.push(member_id.clone());
                }
            }
        }

        summary
    }
}

/// `PruneEngine::run` 的執行結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub fetched: usize,
    pub enriched: usize,
    pub matched: usize,
    pub selected: usize,
    pub removal: Option<RunSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationMatch {
    #[default]
    CaseInsensitive,
    Exact,
}

/// What the paginator hands back when a page fails mid-walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialPolicy {
    #[default]
    KeepPartial,
    Discard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Error,
    Warning,
}

impl fmt::Display for EventLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventLevel::Error => f.write_str("ERROR"),
            EventLevel::Warning => f.write_str("WARNING"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorEvent {
    pub timestamp: chrono::DateTime<chrono::Local>,
    pub level: EventLevel,
    pub message: String,
}

impl ErrorEvent {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Local::now(),
            level: EventLevel::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Local::now(),
            level: EventLevel::Warning,
            message: message.into(),
        }
    }
}
