//! Per-session state: the signed-in user, their tickets and a one-shot flash.

use serde::{Deserialize, Serialize};

use crate::ticket::{demo_tickets, Ticket, TicketDraft, TicketStats, TicketUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A notification shown on exactly one subsequent render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub text: String,
}

impl Flash {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            text: text.into(),
        }
    }
}

/// Server-side state of one browsing session.
///
/// A session is either anonymous (`user` is `None`) or authenticated.
/// The ticket collection is ordered most-recent-first and ticket ids are
/// unique within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user: Option<String>,
    tickets: Vec<Ticket>,
    flash: Option<Flash>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates an anonymous session seeded with the demo tickets.
    pub fn new() -> Self {
        Self {
            user: None,
            tickets: demo_tickets(),
            flash: None,
        }
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn login(&mut self, email: impl Into<String>) {
        self.user = Some(email.into());
    }

    pub fn logout(&mut self) {
        self.user = None;
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn stats(&self) -> TicketStats {
        TicketStats::from_tickets(&self.tickets)
    }

    pub fn flash(&self) -> Option<&Flash> {
        self.flash.as_ref()
    }

    /// Replaces any pending flash.
    pub fn set_flash(&mut self, flash: Flash) {
        self.flash = Some(flash);
    }

    /// Returns the pending flash and clears it.
    pub fn take_flash(&mut self) -> Option<Flash> {
        self.flash.take()
    }

    pub fn find_ticket(&self, id: &str) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    /// Inserts a new ticket at the front of the collection.
    pub fn create_ticket(&mut self, draft: TicketDraft) -> &Ticket {
        let mut ticket = Ticket::from_draft(draft);
        while self.find_ticket(&ticket.id).is_some() {
            ticket.id = crate::ticket::new_ticket_id();
        }
        self.tickets.insert(0, ticket);
        &self.tickets[0]
    }

    /// Applies `update` to the ticket with `id` in place.
    ///
    /// Returns `false` if no such ticket exists.
    pub fn update_ticket(&mut self, id: &str, update: TicketUpdate) -> bool {
        match self.tickets.iter_mut().find(|t| t.id == id) {
            Some(ticket) => {
                ticket.apply(update);
                true
            }
            None => false,
        }
    }

    /// Removes the ticket with `id`, preserving the order of the rest.
    ///
    /// Returns `false` if no such ticket exists.
    pub fn delete_ticket(&mut self, id: &str) -> bool {
        let before = self.tickets.len();
        self.tickets.retain(|t| t.id != id);
        self.tickets.len() != before
    }
}
