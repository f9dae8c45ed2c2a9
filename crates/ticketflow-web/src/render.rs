//! Server-side HTML for every [`View`].

use std::fmt::Write;

use ticketflow_core::{
    FieldErrors, Flash, Page, PageStatus, Priority, Renderer, Ticket, TicketForm, TicketStats,
    TicketStatus, View,
};

const APP_NAME: &str = "TicketFlow";

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, page: &Page) -> String {
        tracing::trace!("Rendering {}", page.view.template_name());
        let body = match &page.view {
            View::Landing => landing(page.user.is_some()),
            View::Signup { email, errors } => signup(email, errors),
            View::Login { email, errors } => login(email, errors),
            View::Dashboard { tickets, stats } => {
                dashboard(page.user.as_deref().unwrap_or_default(), tickets, stats)
            }
            View::Tickets {
                tickets,
                form,
                errors,
            } => tickets_index(tickets, form.as_ref(), errors),
            View::NotFound => not_found(),
        };
        layout(page.view.title(), page.user.as_deref(), page.flash.as_ref(), &body)
    }
}

/// Page for an unexpected server failure. Never includes the cause.
pub fn internal_error_page() -> String {
    layout(
        "Something went wrong",
        None,
        None,
        r#"<section class="card center">
<h1>Something went wrong</h1>
<p>Please try again in a moment.</p>
<a class="btn" href="/">Back to home</a>
</section>"#,
    )
}

/// The not-found page outside the dispatcher (e.g. unknown static assets).
pub fn not_found_page() -> String {
    HtmlRenderer.render(&Page {
        status: PageStatus::NotFound,
        view: View::NotFound,
        flash: None,
        user: None,
    })
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, user: Option<&str>, flash: Option<&Flash>, body: &str) -> String {
    let full_title = if title == APP_NAME {
        APP_NAME.to_string()
    } else {
        format!("{} · {APP_NAME}", escape(title))
    };
    let nav = match user {
        Some(user) => format!(
            r#"<a href="/dashboard">Dashboard</a>
<a href="/tickets">Tickets</a>
<span class="user">{}</span>
<form method="post" action="/auth/logout" class="inline"><button type="submit" class="btn btn-link">Logout</button></form>"#,
            escape(user)
        ),
        None => r#"<a href="/auth/login">Login</a>
<a href="/auth/signup" class="btn">Get Started</a>"#
            .to_string(),
    };
    let flash = flash.map(flash_banner).unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{full_title}</title>
<link rel="stylesheet" href="/assets/style.css">
</head>
<body>
<header class="topbar">
<a href="/" class="brand">{APP_NAME}</a>
<nav>
{nav}
</nav>
</header>
<main class="container">
{flash}{body}
</main>
<footer class="footer">&copy; {APP_NAME}</footer>
</body>
</html>
"#
    )
}

fn flash_banner(flash: &Flash) -> String {
    format!(
        "<div class=\"flash flash-{}\" role=\"status\">{}</div>\n",
        flash.kind.as_str(),
        escape(&flash.text)
    )
}

fn field_error(errors: &FieldErrors, field: &str) -> String {
    errors
        .get(field)
        .map(|msg| format!(r#"<p class="field-error">{}</p>"#, escape(msg)))
        .unwrap_or_default()
}

fn landing(signed_in: bool) -> String {
    let actions = if signed_in {
        r#"<a class="btn" href="/dashboard">Go to dashboard</a>"#
    } else {
        r#"<a class="btn" href="/auth/signup">Get Started</a>
<a class="btn btn-outline" href="/auth/login">Login</a>"#
    };
    format!(
        r#"<section class="hero">
<h1>Track every ticket from open to closed</h1>
<p>{APP_NAME} keeps your support requests organised, prioritised and moving.</p>
<div class="actions">
{actions}
</div>
</section>
<section class="features">
<div class="card"><h3>Create</h3><p>Log issues in seconds with a title, description and priority.</p></div>
<div class="card"><h3>Track</h3><p>Move tickets through open, in progress and closed.</p></div>
<div class="card"><h3>Resolve</h3><p>See what needs attention at a glance on your dashboard.</p></div>
</section>"#
    )
}

fn signup(email: &str, errors: &FieldErrors) -> String {
    format!(
        r#"<section class="card auth">
<h1>Create your account</h1>
<form method="post" action="/auth/signup" novalidate>
<label for="email">Email</label>
<input id="email" name="email" type="email" value="{email}">
{email_error}
<label for="password">Password</label>
<input id="password" name="password" type="password">
{password_error}
<label for="confirmPassword">Confirm password</label>
<input id="confirmPassword" name="confirmPassword" type="password">
{confirm_error}
<button type="submit" class="btn">Sign Up</button>
</form>
<p>Already have an account? <a href="/auth/login">Log in</a></p>
</section>"#,
        email = escape(email),
        email_error = field_error(errors, "email"),
        password_error = field_error(errors, "password"),
        confirm_error = field_error(errors, "confirmPassword"),
    )
}

fn login(email: &str, errors: &FieldErrors) -> String {
    format!(
        r#"<section class="card auth">
<h1>Welcome back</h1>
<form method="post" action="/auth/login" novalidate>
<label for="email">Email</label>
<input id="email" name="email" type="email" value="{email}">
{email_error}
<label for="password">Password</label>
<input id="password" name="password" type="password">
{password_error}
<button type="submit" class="btn">Login</button>
</form>
<p>No account yet? <a href="/auth/signup">Sign up</a></p>
</section>"#,
        email = escape(email),
        email_error = field_error(errors, "email"),
        password_error = field_error(errors, "password"),
    )
}

fn dashboard(user: &str, tickets: &[Ticket], stats: &TicketStats) -> String {
    let mut recent = String::new();
    for ticket in tickets.iter().take(5) {
        let _ = writeln!(
            recent,
            r#"<li><span class="ticket-title">{}</span> {} {}</li>"#,
            escape(&ticket.title),
            status_badge(ticket.status),
            priority_badge(ticket.priority),
        );
    }
    if recent.is_empty() {
        recent.push_str("<li class=\"empty\">No tickets yet.</li>\n");
    }

    format!(
        r#"<section>
<h1>Dashboard</h1>
<p>Signed in as {user}</p>
<div class="stats">
<div class="card stat"><span class="stat-value">{total}</span><span>Total</span></div>
<div class="card stat"><span class="stat-value">{open}</span><span>Open</span></div>
<div class="card stat"><span class="stat-value">{in_progress}</span><span>In Progress</span></div>
<div class="card stat"><span class="stat-value">{closed}</span><span>Closed</span></div>
</div>
<h2>Recent tickets</h2>
<ul class="ticket-summary">
{recent}</ul>
<a class="btn" href="/tickets">Manage tickets</a>
</section>"#,
        user = escape(user),
        total = stats.total,
        open = stats.open,
        in_progress = stats.in_progress,
        closed = stats.closed,
    )
}

fn tickets_index(tickets: &[Ticket], form: Option<&TicketForm>, errors: &FieldErrors) -> String {
    let blank = TicketForm::default();
    let form = form.unwrap_or(&blank);
    let status = if form.status.is_empty() {
        TicketStatus::default().as_str()
    } else {
        form.status.as_str()
    };
    let priority = if form.priority.is_empty() {
        Priority::default().as_str()
    } else {
        form.priority.as_str()
    };

    let mut list = String::new();
    for ticket in tickets {
        list.push_str(&ticket_card(ticket));
    }
    if list.is_empty() {
        list.push_str("<p class=\"empty\">No tickets yet. Create one above.</p>\n");
    }

    format!(
        r#"<section class="card">
<h1>Tickets</h1>
<form method="post" action="/tickets" class="ticket-form" novalidate>
<label for="title">Title</label>
<input id="title" name="title" value="{title}">
{title_error}
<label for="description">Description</label>
<textarea id="description" name="description">{description}</textarea>
<label for="status">Status</label>
<select id="status" name="status">
{status_options}</select>
<label for="priority">Priority</label>
<select id="priority" name="priority">
{priority_options}</select>
<button type="submit" class="btn">Create ticket</button>
</form>
</section>
<section class="ticket-list">
{list}</section>"#,
        title = escape(&form.title),
        title_error = field_error(errors, "title"),
        description = escape(&form.description),
        status_options = status_options(status),
        priority_options = priority_options(priority),
    )
}

fn ticket_card(ticket: &Ticket) -> String {
    let id = escape(&ticket.id);
    format!(
        r#"<article class="card ticket" id="ticket-{id}">
<header><h3>{title}</h3> {status} {priority}</header>
<p>{description}</p>
<details>
<summary>Edit</summary>
<form method="post" action="/tickets/{id}/update">
<input name="title" value="{title}" aria-label="Title">
<textarea name="description" aria-label="Description">{description}</textarea>
<select name="status" aria-label="Status">
{status_options}</select>
<select name="priority" aria-label="Priority">
{priority_options}</select>
<button type="submit" class="btn">Save</button>
</form>
</details>
<form method="post" action="/tickets/{id}/delete" class="inline">
<button type="submit" class="btn btn-danger">Delete</button>
</form>
</article>
"#,
        title = escape(&ticket.title),
        description = escape(&ticket.description),
        status = status_badge(ticket.status),
        priority = priority_badge(ticket.priority),
        status_options = status_options(ticket.status.as_str()),
        priority_options = priority_options(ticket.priority.as_str()),
    )
}

fn status_badge(status: TicketStatus) -> String {
    format!(
        r#"<span class="badge status-{}">{}</span>"#,
        status.as_str(),
        status.label()
    )
}

fn priority_badge(priority: Priority) -> String {
    format!(
        r#"<span class="badge priority-{}">{}</span>"#,
        priority.as_str(),
        priority.label()
    )
}

fn status_options(selected: &str) -> String {
    options(
        TicketStatus::ALL.map(|s| (s.as_str(), s.label())),
        selected,
    )
}

fn priority_options(selected: &str) -> String {
    options(Priority::ALL.map(|p| (p.as_str(), p.label())), selected)
}

fn options(choices: [(&str, &str); 3], selected: &str) -> String {
    let mut out = String::new();
    for (value, label) in choices {
        let marker = if value == selected { " selected" } else { "" };
        let _ = writeln!(out, r#"<option value="{value}"{marker}>{label}</option>"#);
    }
    out
}

fn not_found() -> String {
    r#"<section class="card center">
<h1>404</h1>
<p>The page you are looking for does not exist.</p>
<a class="btn" href="/">Back to home</a>
</section>"#
        .to_string()
}
