//! Tickets: the only business entity the application tracks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Workflow state of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 3] = [Self::Open, Self::InProgress, Self::Closed];

    /// Form/wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Closed => "closed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Closed => "Closed",
        }
    }
}

impl FromStr for TicketStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::InvalidStatus(s.to_string()))
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How urgent a ticket is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Self::Low, Self::Medium, Self::High];

    /// Form/wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl FromStr for Priority {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| CoreError::InvalidPriority(s.to_string()))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single tracked unit of work, owned by one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: Priority,
}

/// Validated input for a new ticket, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: Priority,
}

/// Field changes applied to an existing ticket.
///
/// `status` and `priority` are `None` when the submitted value was not one
/// of the allowed variants; the ticket keeps its previous value then.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketUpdate {
    pub title: String,
    pub description: String,
    pub status: Option<TicketStatus>,
    pub priority: Option<Priority>,
}

impl Ticket {
    /// Builds a ticket from `draft` with a freshly generated id.
    pub fn from_draft(draft: TicketDraft) -> Self {
        Self {
            id: new_ticket_id(),
            title: draft.title,
            description: draft.description,
            status: draft.status,
            priority: draft.priority,
        }
    }

    pub fn apply(&mut self, update: TicketUpdate) {
        self.title = update.title;
        self.description = update.description;
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
    }
}

/// Generates a ticket id.
///
/// UUID v4 in simple form, so ids contain no `/` and never collide with the
/// numeric ids of the demo tickets.
pub fn new_ticket_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// The demo tickets every new session starts with.
pub fn demo_tickets() -> Vec<Ticket> {
    let seed = [
        (
            "1",
            "Fix login bug",
            "Users are unable to login with their credentials",
            TicketStatus::Open,
            Priority::High,
        ),
        (
            "2",
            "Update dashboard UI",
            "Refresh the dashboard with new design system",
            TicketStatus::InProgress,
            Priority::Medium,
        ),
        (
            "3",
            "Add export feature",
            "Allow users to export reports as PDF",
            TicketStatus::Closed,
            Priority::Low,
        ),
    ];

    seed.into_iter()
        .map(|(id, title, description, status, priority)| Ticket {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            status,
            priority,
        })
        .collect()
}

/// Ticket counts per status, shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TicketStats {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub closed: usize,
}

impl TicketStats {
    pub fn from_tickets(tickets: &[Ticket]) -> Self {
        tickets.iter().fold(
            Self {
                total: tickets.len(),
                ..Self::default()
            },
            |mut stats, ticket| {
                match ticket.status {
                    TicketStatus::Open => stats.open += 1,
                    TicketStatus::InProgress => stats.in_progress += 1,
                    TicketStatus::Closed => stats.closed += 1,
                }
                stats
            },
        )
    }
}
