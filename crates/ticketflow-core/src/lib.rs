//! TicketFlow core library: HTTP-agnostic ticket tracking logic.
//!
//! `ticketflow-core` owns the data model and the request dispatcher. It does
//! no I/O: the web frontend (`ticketflow-web`) loads a [`Session`], hands it
//! to [`dispatch`] together with the decoded request, stores the returned
//! session and renders the resulting [`Page`] with a [`Renderer`].
//!
//! # Modules
//!
//! - [`ticket`] — [`Ticket`], its status/priority enums, id generation and demo data.
//! - [`session`] — per-session state ([`Session`]) and the one-shot [`Flash`].
//! - [`form`] — decoded form fields ([`FormFields`]).
//! - [`validate`] — signup/login/ticket form checks producing [`FieldErrors`].
//! - [`dispatch`] — route matching, the auth guard and the handlers.
//! - [`error`] — error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod dispatch;
pub mod error;
pub mod form;
pub mod session;
pub mod ticket;
pub mod validate;

pub use dispatch::{dispatch, Method, Outcome, Page, PageStatus, Renderer, Request, View};
pub use error::{CoreError, CoreResult};
pub use form::FormFields;
pub use session::{Flash, FlashKind, Session};
pub use ticket::{
    demo_tickets, Priority, Ticket, TicketDraft, TicketStats, TicketStatus, TicketUpdate,
};
pub use validate::{FieldErrors, LoginForm, SignupForm, TicketForm};
