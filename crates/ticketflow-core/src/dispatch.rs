//! The request dispatcher.
//!
//! [`dispatch`] maps one `(method, path, form)` request plus the caller's
//! [`Session`] to an [`Outcome`] and the mutated session. It performs no
//! I/O: loading and storing the session and turning a [`Page`] into HTML
//! (see [`Renderer`]) are the caller's job.
//!
//! | Path                   | Method | Login |
//! |------------------------|--------|-------|
//! | `/`, `/home`           | GET    | no    |
//! | `/auth/signup`         | GET/POST | no  |
//! | `/auth/login`          | GET/POST | no  |
//! | `/auth/logout`         | POST   | no    |
//! | `/dashboard`           | GET    | yes   |
//! | `/tickets`             | GET/POST | yes |
//! | `/tickets/{id}/update` | POST   | yes   |
//! | `/tickets/{id}/delete` | POST   | yes   |
//!
//! Anything else renders the not-found page with a 404 status.

use crate::form::FormFields;
use crate::session::{Flash, Session};
use crate::ticket::{Ticket, TicketStats};
use crate::validate::{
    validate_login, validate_signup, validate_ticket_title, FieldErrors, LoginForm, SignupForm,
    TicketForm,
};

pub const LOGIN_PATH: &str = "/auth/login";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const TICKETS_PATH: &str = "/tickets";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    /// Any other HTTP method. Never matches a route.
    Other,
}

impl Method {
    /// `HEAD` is treated as `GET`; the server drops the body.
    pub fn parse(method: &str) -> Self {
        match method {
            "GET" | "HEAD" => Self::Get,
            "POST" => Self::Post,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub form: FormFields,
}

impl Request {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            form: FormFields::new(),
        }
    }

    pub fn post(path: impl Into<String>, form: FormFields) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            form,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    Ok,
    NotFound,
}

impl PageStatus {
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::NotFound => 404,
        }
    }
}

/// What a page shows, one variant per template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Landing,
    Signup {
        email: String,
        errors: FieldErrors,
    },
    Login {
        email: String,
        errors: FieldErrors,
    },
    Dashboard {
        tickets: Vec<Ticket>,
        stats: TicketStats,
    },
    Tickets {
        tickets: Vec<Ticket>,
        /// Values to re-populate the create form with after a failed submit.
        form: Option<TicketForm>,
        errors: FieldErrors,
    },
    NotFound,
}

impl View {
    pub fn template_name(&self) -> &'static str {
        match self {
            Self::Landing => "landing.html",
            Self::Signup { .. } => "auth/signup.html",
            Self::Login { .. } => "auth/login.html",
            Self::Dashboard { .. } => "dashboard.html",
            Self::Tickets { .. } => "tickets/index.html",
            Self::NotFound => "404.html",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Landing => "TicketFlow",
            Self::Signup { .. } => "Sign Up",
            Self::Login { .. } => "Login",
            Self::Dashboard { .. } => "Dashboard",
            Self::Tickets { .. } => "Tickets",
            Self::NotFound => "Not Found",
        }
    }
}

/// Everything a template renderer receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub status: PageStatus,
    pub view: View,
    /// The flash consumed by this render.
    pub flash: Option<Flash>,
    pub user: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Page(Page),
    Redirect(String),
}

impl Outcome {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Page(page) => page.status.code(),
            Self::Redirect(_) => 303,
        }
    }
}

/// Turns a [`Page`] into an HTML document.
pub trait Renderer {
    fn render(&self, page: &Page) -> String;
}

/// A route resolved from the request method and path.
#[derive(Debug, PartialEq, Eq)]
enum Route<'a> {
    Landing,
    SignupForm,
    Signup,
    LoginForm,
    Login,
    Logout,
    Dashboard,
    TicketList,
    TicketCreate,
    TicketUpdate(&'a str),
    TicketDelete(&'a str),
    NotFound,
}

impl Route<'_> {
    fn requires_login(&self) -> bool {
        matches!(
            self,
            Self::Dashboard
                | Self::TicketList
                | Self::TicketCreate
                | Self::TicketUpdate(_)
                | Self::TicketDelete(_)
        )
    }
}

fn route(method: Method, path: &str) -> Route<'_> {
    use Method::{Get, Post};

    match (method, path) {
        (Get, "/" | "/home") => Route::Landing,
        (Get, "/auth/signup") => Route::SignupForm,
        (Post, "/auth/signup") => Route::Signup,
        (Get, "/auth/login") => Route::LoginForm,
        (Post, "/auth/login") => Route::Login,
        (Post, "/auth/logout") => Route::Logout,
        (Get, "/dashboard") => Route::Dashboard,
        (Get, "/tickets") => Route::TicketList,
        (Post, "/tickets") => Route::TicketCreate,
        (Post, _) => ticket_action(path).unwrap_or(Route::NotFound),
        _ => Route::NotFound,
    }
}

/// Matches `/tickets/{id}/update` and `/tickets/{id}/delete`.
fn ticket_action(path: &str) -> Option<Route<'_>> {
    let rest = path.strip_prefix("/tickets/")?;
    let (id, action) = rest.split_once('/')?;
    if id.is_empty() {
        return None;
    }
    match action {
        "update" => Some(Route::TicketUpdate(id)),
        "delete" => Some(Route::TicketDelete(id)),
        _ => None,
    }
}

/// Handles one request against `session`, returning the outcome and the
/// session to store back.
pub fn dispatch(request: &Request, mut session: Session) -> (Outcome, Session) {
    let route = route(request.method, &request.path);
    tracing::debug!(
        "Dispatch: {:?} {} -> {:?}",
        request.method,
        request.path,
        route
    );

    if route.requires_login() && !session.is_authenticated() {
        tracing::debug!("Anonymous access to {}, redirecting to login", request.path);
        return (redirect(LOGIN_PATH), session);
    }

    let form = &request.form;
    let outcome = match route {
        Route::Landing => page(&mut session, View::Landing),
        Route::SignupForm => page(
            &mut session,
            View::Signup {
                email: String::new(),
                errors: FieldErrors::new(),
            },
        ),
        Route::Signup => signup(&mut session, SignupForm::from_fields(form)),
        Route::LoginForm => page(
            &mut session,
            View::Login {
                email: String::new(),
                errors: FieldErrors::new(),
            },
        ),
        Route::Login => login(&mut session, LoginForm::from_fields(form)),
        Route::Logout => {
            if let Some(user) = session.user() {
                tracing::info!("User logged out: {user}");
            }
            session.logout();
            session.set_flash(Flash::success("You have been logged out."));
            redirect(LOGIN_PATH)
        }
        Route::Dashboard => {
            let view = View::Dashboard {
                tickets: session.tickets().to_vec(),
                stats: session.stats(),
            };
            page(&mut session, view)
        }
        Route::TicketList => {
            let view = View::Tickets {
                tickets: session.tickets().to_vec(),
                form: None,
                errors: FieldErrors::new(),
            };
            page(&mut session, view)
        }
        Route::TicketCreate => create_ticket(&mut session, TicketForm::from_fields(form)),
        Route::TicketUpdate(id) => update_ticket(&mut session, id, TicketForm::from_fields(form)),
        Route::TicketDelete(id) => {
            if session.delete_ticket(id) {
                tracing::info!("Ticket deleted: id={id}");
            } else {
                tracing::debug!("Delete of unknown ticket ignored: id={id}");
            }
            session.set_flash(Flash::success("Ticket deleted successfully!"));
            redirect(TICKETS_PATH)
        }
        Route::NotFound => {
            tracing::debug!("No route for {:?} {}", request.method, request.path);
            let flash = session.take_flash();
            Outcome::Page(Page {
                status: PageStatus::NotFound,
                view: View::NotFound,
                flash,
                user: session.user().map(str::to_string),
            })
        }
    };

    (outcome, session)
}

fn page(session: &mut Session, view: View) -> Outcome {
    Outcome::Page(Page {
        status: PageStatus::Ok,
        view,
        flash: session.take_flash(),
        user: session.user().map(str::to_string),
    })
}

fn redirect(to: &str) -> Outcome {
    Outcome::Redirect(to.to_string())
}

fn signup(session: &mut Session, form: SignupForm) -> Outcome {
    let errors = validate_signup(&form);
    if !errors.is_empty() {
        tracing::debug!("Signup rejected: {} field error(s)", errors.len());
        return page(
            session,
            View::Signup {
                email: form.email,
                errors,
            },
        );
    }

    tracing::info!("Account created: {}", form.email);
    session.set_flash(Flash::success(
        "Account created successfully! Please log in.",
    ));
    redirect(LOGIN_PATH)
}

fn login(session: &mut Session, form: LoginForm) -> Outcome {
    let errors = validate_login(&form);
    if !errors.is_empty() {
        tracing::warn!("Failed login attempt: {} field error(s)", errors.len());
        return page(
            session,
            View::Login {
                email: form.email,
                errors,
            },
        );
    }

    tracing::info!("User logged in: {}", form.email);
    session.login(form.email);
    session.set_flash(Flash::success("Welcome back!"));
    redirect(DASHBOARD_PATH)
}

fn create_ticket(session: &mut Session, form: TicketForm) -> Outcome {
    let errors = validate_ticket_title(&form.title);
    if !errors.is_empty() {
        let view = View::Tickets {
            tickets: session.tickets().to_vec(),
            form: Some(form),
            errors,
        };
        return page(session, view);
    }

    let ticket = session.create_ticket(form.to_draft());
    tracing::info!("Ticket created: id={}, title={}", ticket.id, ticket.title);
    session.set_flash(Flash::success("Ticket created successfully!"));
    redirect(TICKETS_PATH)
}

fn update_ticket(session: &mut Session, id: &str, form: TicketForm) -> Outcome {
    if !validate_ticket_title(&form.title).is_empty() {
        session.set_flash(Flash::error("Title is required"));
        return redirect(TICKETS_PATH);
    }

    if session.update_ticket(id, form.to_update()) {
        tracing::info!("Ticket updated: id={id}");
    } else {
        tracing::debug!("Update of unknown ticket ignored: id={id}");
    }
    session.set_flash(Flash::success("Ticket updated successfully!"));
    redirect(TICKETS_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::FlashKind;
    use crate::ticket::{Priority, TicketStatus};
    use std::collections::HashSet;

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        pairs.iter().copied().collect()
    }

    fn logged_in() -> Session {
        let mut session = Session::new();
        session.login("user@example.com");
        session
    }

    fn expect_page(outcome: Outcome) -> Page {
        match outcome {
            Outcome::Page(page) => page,
            Outcome::Redirect(to) => panic!("expected page, got redirect to {to}"),
        }
    }

    fn expect_redirect(outcome: Outcome) -> String {
        match outcome {
            Outcome::Redirect(to) => to,
            Outcome::Page(page) => panic!("expected redirect, got {:?}", page.view),
        }
    }

    fn create(session: Session, title: &str, priority: &str) -> Session {
        let request = Request::post(
            "/tickets",
            fields(&[("title", title), ("priority", priority)]),
        );
        let (outcome, session) = dispatch(&request, session);
        assert_eq!(expect_redirect(outcome), "/tickets");
        session
    }

    #[test]
    fn landing_and_home_render() {
        for path in ["/", "/home"] {
            let (outcome, _) = dispatch(&Request::get(path), Session::new());
            let page = expect_page(outcome);
            assert_eq!(page.status, PageStatus::Ok);
            assert_eq!(page.view, View::Landing);
        }
    }

    #[test]
    fn unmatched_path_is_not_found() {
        let (outcome, _) = dispatch(&Request::get("/nonexistent"), Session::new());
        assert_eq!(outcome.status_code(), 404);
        assert_eq!(expect_page(outcome).view, View::NotFound);
    }

    #[test]
    fn wrong_method_is_not_found() {
        let (outcome, _) = dispatch(&Request::post("/dashboard", FormFields::new()), logged_in());
        assert_eq!(outcome.status_code(), 404);

        let (outcome, _) = dispatch(&Request::get("/auth/logout"), logged_in());
        assert_eq!(outcome.status_code(), 404);

        let request = Request {
            method: Method::Other,
            path: "/".to_string(),
            form: FormFields::new(),
        };
        assert_eq!(dispatch(&request, Session::new()).0.status_code(), 404);
    }

    #[test]
    fn malformed_ticket_paths_are_not_found() {
        for path in [
            "/tickets//update",
            "/tickets/1/archive",
            "/tickets/1/update/extra",
            "/tickets/1",
        ] {
            let (outcome, _) = dispatch(&Request::post(path, FormFields::new()), logged_in());
            assert_eq!(outcome.status_code(), 404, "{path}");
        }
    }

    #[test]
    fn signup_with_empty_email_reports_required() {
        let request = Request::post(
            "/auth/signup",
            fields(&[
                ("email", ""),
                ("password", "secret1"),
                ("confirmPassword", "secret1"),
            ]),
        );
        let (outcome, session) = dispatch(&request, Session::new());
        let page = expect_page(outcome);
        match page.view {
            View::Signup { errors, .. } => {
                assert_eq!(errors.get("email"), Some("Email is required"));
            }
            other => panic!("unexpected view {other:?}"),
        }
        assert!(session.user().is_none());
    }

    #[test]
    fn signup_failure_echoes_email() {
        let request = Request::post(
            "/auth/signup",
            fields(&[("email", "a@b.co"), ("password", "123")]),
        );
        let (outcome, _) = dispatch(&request, Session::new());
        match expect_page(outcome).view {
            View::Signup { email, errors } => {
                assert_eq!(email, "a@b.co");
                assert!(errors.get("password").is_some());
                assert!(errors.get("confirmPassword").is_some());
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn signup_success_redirects_to_login_without_logging_in() {
        let request = Request::post(
            "/auth/signup",
            fields(&[
                ("email", "new@example.com"),
                ("password", "secret1"),
                ("confirmPassword", "secret1"),
            ]),
        );
        let (outcome, session) = dispatch(&request, Session::new());
        assert_eq!(expect_redirect(outcome), "/auth/login");
        assert!(session.user().is_none());
        assert_eq!(session.flash().map(|f| f.kind), Some(FlashKind::Success));
    }

    #[test]
    fn login_then_dashboard_succeeds() {
        let request = Request::post(
            "/auth/login",
            fields(&[("email", "fresh@example.com"), ("password", "secret1")]),
        );
        let (outcome, session) = dispatch(&request, Session::new());
        assert_eq!(expect_redirect(outcome), "/dashboard");
        assert_eq!(session.user(), Some("fresh@example.com"));

        let (outcome, session) = dispatch(&Request::get("/dashboard"), session);
        let page = expect_page(outcome);
        assert_eq!(page.status, PageStatus::Ok);
        assert_eq!(page.flash, Some(Flash::success("Welcome back!")));
        assert_eq!(page.user.as_deref(), Some("fresh@example.com"));
        match page.view {
            View::Dashboard { tickets, stats } => {
                assert_eq!(tickets.len(), 3);
                assert_eq!(stats.total, 3);
            }
            other => panic!("unexpected view {other:?}"),
        }
        // The flash was consumed by the dashboard render.
        assert!(session.flash().is_none());
    }

    #[test]
    fn login_failure_rerenders_without_user() {
        let request = Request::post(
            "/auth/login",
            fields(&[("email", "fresh@example.com"), ("password", "short")]),
        );
        let (outcome, session) = dispatch(&request, Session::new());
        match expect_page(outcome).view {
            View::Login { email, errors } => {
                assert_eq!(email, "fresh@example.com");
                assert!(errors.get("password").is_some());
            }
            other => panic!("unexpected view {other:?}"),
        }
        assert!(!session.is_authenticated());
    }

    #[test]
    fn logout_clears_user_and_keeps_tickets() {
        let session = create(logged_in(), "Mine", "low");
        let logout = Request::post("/auth/logout", FormFields::new());
        let (outcome, session) = dispatch(&logout, session);
        assert_eq!(expect_redirect(outcome), "/auth/login");
        assert!(!session.is_authenticated());
        assert_eq!(session.tickets().len(), 4);

        let (outcome, _) = dispatch(&Request::get("/dashboard"), session);
        assert_eq!(expect_redirect(outcome), "/auth/login");
    }

    #[test]
    fn guarded_routes_redirect_anonymous_without_mutation() {
        let requests = [
            Request::get("/dashboard"),
            Request::get("/tickets"),
            Request::post("/tickets", fields(&[("title", "Sneaky")])),
            Request::post("/tickets/1/update", fields(&[("title", "Changed")])),
            Request::post("/tickets/1/delete", FormFields::new()),
        ];
        for request in requests {
            let before = Session::new();
            let (outcome, after) = dispatch(&request, before.clone());
            assert_eq!(expect_redirect(outcome), "/auth/login", "{}", request.path);
            assert_eq!(after, before);
        }
    }

    #[test]
    fn guard_does_not_consume_flash() {
        let mut session = Session::new();
        session.set_flash(Flash::success("keep me"));
        let (_, session) = dispatch(&Request::get("/tickets"), session);
        assert_eq!(session.flash(), Some(&Flash::success("keep me")));
    }

    #[test]
    fn created_tickets_are_most_recent_first() {
        let session = create(logged_in(), "T1", "low");
        let session = create(session, "T2", "high");

        let titles: Vec<&str> = session.tickets().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "T2",
                "T1",
                "Fix login bug",
                "Update dashboard UI",
                "Add export feature"
            ]
        );
    }

    #[test]
    fn create_round_trip_shows_new_ticket() {
        let before: HashSet<String> = logged_in().tickets().iter().map(|t| t.id.clone()).collect();
        let session = create(logged_in(), "A", "high");

        let (outcome, _) = dispatch(&Request::get("/tickets"), session);
        let page = expect_page(outcome);
        assert_eq!(page.flash, Some(Flash::success("Ticket created successfully!")));
        let View::Tickets { tickets, form, errors } = page.view else {
            panic!("expected tickets view");
        };
        assert!(form.is_none());
        assert!(errors.is_empty());

        let new: Vec<&Ticket> = tickets.iter().filter(|t| !before.contains(&t.id)).collect();
        assert_eq!(new.len(), 1);
        assert_eq!(new[0].title, "A");
        assert_eq!(new[0].priority, Priority::High);
        assert_eq!(new[0].status, TicketStatus::Open);
    }

    #[test]
    fn create_with_invalid_enums_uses_defaults() {
        let request = Request::post(
            "/tickets",
            fields(&[("title", "X"), ("status", "bogus"), ("priority", "urgent")]),
        );
        let (_, session) = dispatch(&request, logged_in());
        let ticket = &session.tickets()[0];
        assert_eq!(ticket.status, TicketStatus::Open);
        assert_eq!(ticket.priority, Priority::Medium);
    }

    #[test]
    fn create_without_title_rerenders_with_form_values() {
        let request = Request::post(
            "/tickets",
            fields(&[
                ("title", "   "),
                ("description", "details"),
                ("priority", "high"),
            ]),
        );
        let (outcome, session) = dispatch(&request, logged_in());
        let page = expect_page(outcome);
        assert_eq!(page.status, PageStatus::Ok);
        let View::Tickets { form, errors, tickets } = page.view else {
            panic!("expected tickets view");
        };
        assert_eq!(errors.get("title"), Some("Title is required"));
        let form = form.expect("form values echoed");
        assert_eq!(form.description, "details");
        assert_eq!(form.priority, "high");
        assert_eq!(tickets.len(), 3);
        assert_eq!(session.tickets().len(), 3);
    }

    #[test]
    fn update_with_invalid_status_keeps_previous_status() {
        let request = Request::post(
            "/tickets/2/update",
            fields(&[
                ("title", "Redesign"),
                ("description", "New copy"),
                ("status", "bogus"),
                ("priority", "high"),
            ]),
        );
        let (outcome, session) = dispatch(&request, logged_in());
        assert_eq!(expect_redirect(outcome), "/tickets");

        let ticket = session.find_ticket("2").unwrap();
        assert_eq!(ticket.title, "Redesign");
        assert_eq!(ticket.description, "New copy");
        assert_eq!(ticket.status, TicketStatus::InProgress);
        assert_eq!(ticket.priority, Priority::High);
        assert_eq!(
            session.flash(),
            Some(&Flash::success("Ticket updated successfully!"))
        );
    }

    #[test]
    fn update_with_empty_title_sets_error_flash_without_mutation() {
        let before = logged_in();
        let request = Request::post(
            "/tickets/1/update",
            fields(&[("title", ""), ("status", "closed")]),
        );
        let (outcome, after) = dispatch(&request, before.clone());
        assert_eq!(expect_redirect(outcome), "/tickets");
        assert_eq!(after.tickets(), before.tickets());
        assert_eq!(after.flash(), Some(&Flash::error("Title is required")));
    }

    #[test]
    fn delete_removes_ticket() {
        let (outcome, session) = dispatch(
            &Request::post("/tickets/1/delete", FormFields::new()),
            logged_in(),
        );
        assert_eq!(expect_redirect(outcome), "/tickets");
        assert!(session.find_ticket("1").is_none());
        assert_eq!(session.tickets().len(), 2);
    }

    #[test]
    fn delete_unknown_id_is_noop_with_success_flash() {
        let before = logged_in();
        let (outcome, after) = dispatch(
            &Request::post("/tickets/999/delete", FormFields::new()),
            before.clone(),
        );
        assert_eq!(expect_redirect(outcome), "/tickets");
        assert_eq!(after.tickets(), before.tickets());
        assert_eq!(
            after.flash(),
            Some(&Flash::success("Ticket deleted successfully!"))
        );
    }

    #[test]
    fn not_found_page_consumes_flash() {
        let mut session = Session::new();
        session.set_flash(Flash::error("oops"));
        let (outcome, session) = dispatch(&Request::get("/missing"), session);
        assert_eq!(expect_page(outcome).flash, Some(Flash::error("oops")));
        assert!(session.flash().is_none());
    }

    #[test]
    fn view_metadata() {
        assert_eq!(View::NotFound.template_name(), "404.html");
        assert_eq!(View::Landing.title(), "TicketFlow");
    }

    #[test]
    fn method_parse() {
        assert_eq!(Method::parse("GET"), Method::Get);
        assert_eq!(Method::parse("HEAD"), Method::Get);
        assert_eq!(Method::parse("POST"), Method::Post);
        assert_eq!(Method::parse("DELETE"), Method::Other);
    }
}
