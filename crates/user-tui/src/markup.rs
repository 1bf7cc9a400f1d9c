//! Safe rendering of user-supplied text.
//!
//! Stored names and emails are arbitrary strings. HTML output escapes the five
//! markup-significant characters; terminal output drops control characters so
//! a stored value cannot smuggle escape sequences onto the user's screen.

use user_shared::User;

const PLACEHOLDER: &str = "—";

pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn sanitize_terminal(s: &str) -> String {
    s.chars()
        .filter_map(|c| match c {
            '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

/// Value to display for a field, with a placeholder for empty text.
pub fn display_or_placeholder(s: &str) -> &str {
    if s.trim().is_empty() {
        PLACEHOLDER
    } else {
        s
    }
}

/// The list fragment: one row per user with edit and delete buttons.
pub fn render_user_rows(users: &[User]) -> String {
    if users.is_empty() {
        return r#"<p class="muted">No users yet.</p>"#.to_string();
    }

    users
        .iter()
        .map(|u| {
            let id = escape_html(&u.id.to_string());
            format!(
                r#"<div class="user-row">
  <div>
    <div class="user-name">{name}</div>
    <div class="muted">{email}</div>
  </div>
  <div class="actions">
    <button class="btn" data-action="edit" data-id="{id}">Edit</button>
    <button class="btn" data-action="delete" data-id="{id}">Delete</button>
  </div>
</div>"#,
                name = escape_html(display_or_placeholder(&u.name)),
                email = escape_html(display_or_placeholder(&u.email)),
                id = id,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A standalone HTML page listing `users`.
pub fn render_users_page(users: &[User]) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Users</title>
<style>
body {{ font-family: sans-serif; max-width: 40rem; margin: 2rem auto; }}
.user-row {{ display: flex; align-items: center; justify-content: space-between; padding: 8px 0; border-bottom: 1px solid rgba(0,0,0,0.04); }}
.user-name {{ font-weight: 600; }}
.muted {{ color: #6b7280; font-size: 0.9rem; }}
.actions {{ display: flex; gap: 8px; }}
</style>
</head>
<body>
<h1>Users</h1>
<div id="usersList">
{rows}
</div>
</body>
</html>
"#,
        rows = render_user_rows(users)
    )
}
