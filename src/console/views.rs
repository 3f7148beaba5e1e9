//! Console Views
//!
//! Pure rendering: a session and its pending notices in, a full HTML page out.
//! The login view is shown until the session is authenticated; afterwards the
//! sidebar plus the page selected by `Session::page`.

use super::form::render_meta_boxes;
use super::html::{action_button, escape, path_segment};
use crate::session::{Notice, NoticeLevel, Page, Session};
use crate::wp::EntryStatus;

const APP_TITLE: &str = "WordPress CPT Manager";

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; display: flex; min-height: 100vh; color: #1d2327; }
aside { width: 240px; background: #1d2327; color: #f0f0f1; padding: 1rem; }
aside button { width: 100%; margin: 0.2rem 0; }
main { flex: 1; padding: 1.5rem 2rem; max-width: 960px; }
form.inline { display: inline; }
label { display: block; margin: 0.6rem 0; }
label input[type=text], label input[type=number], label input[type=password], label textarea, label select { display: block; width: 100%; padding: 0.3rem; }
label.check input { display: inline; width: auto; }
.notice { padding: 0.6rem 1rem; margin-bottom: 1rem; border-left: 4px solid; }
.notice.success { border-color: #00a32a; background: #edfaef; }
.notice.error { border-color: #d63638; background: #fcf0f1; }
.notice.info { border-color: #72aee6; background: #f0f6fc; }
.primary { background: #2271b1; color: #fff; border: 0; padding: 0.4rem 0.8rem; }
.danger { color: #d63638; }
table { border-collapse: collapse; width: 100%; }
td, th { border-bottom: 1px solid #dcdcde; padding: 0.5rem; text-align: left; }
fieldset.meta-box { margin: 1rem 0; }
"#;

/// Render the page for a session
pub fn render(session: &Session, notices: &[Notice]) -> String {
    if !session.is_authenticated() {
        return layout(APP_TITLE, "", &format!("{}{}", render_notices(notices), login()));
    }

    let body = match session.page {
        Page::Dashboard => dashboard(session),
        Page::List => entry_list(session),
        Page::Edit => entry_editor(session),
    };
    layout(
        APP_TITLE,
        &sidebar(session),
        &format!("{}{}", render_notices(notices), body),
    )
}

fn layout(title: &str, sidebar: &str, main: &str) -> String {
    let aside = if sidebar.is_empty() {
        String::new()
    } else {
        format!("<aside>{}</aside>", sidebar)
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
<style>{}</style>
</head>
<body>{}<main>{}</main></body>
</html>"#,
        escape(title),
        STYLE,
        aside,
        main
    )
}

fn render_notices(notices: &[Notice]) -> String {
    notices
        .iter()
        .map(|n| {
            let class = match n.level {
                NoticeLevel::Success => "success",
                NoticeLevel::Error => "error",
            };
            format!(r#"<div class="notice {}">{}</div>"#, class, escape(&n.text))
        })
        .collect()
}

fn login() -> String {
    format!(
        r#"<h1>{}</h1>
<h2>Login with WordPress credentials</h2>
<form method="post" action="/login">
<label>WordPress Site URL<input type="text" name="site_url" placeholder="https://example.com"></label>
<label>Username<input type="text" name="username" autocomplete="username"></label>
<label>Password<input type="password" name="password" autocomplete="current-password"></label>
<button type="submit" class="primary">Login</button>
</form>
<div class="notice info">
<h3>Authentication Help</h3>
<p>This console uses WordPress REST API authentication.</p>
<ol>
<li><strong>Application Password</strong> (recommended): in WordPress admin open Users, Profile,
then &quot;Application Passwords&quot;, create one for &quot;CPT Manager&quot; and use it instead of your regular password.</li>
<li><strong>Basic Authentication</strong>: if the site has Basic Auth enabled, your regular credentials also work.
This is less secure and not available on every installation.</li>
</ol>
</div>"#,
        escape(APP_TITLE)
    )
}

fn sidebar(session: &Session) -> String {
    let mut out = String::from("<h2>Navigation</h2>");
    if let Some(user) = &session.current_user {
        out.push_str(&format!(
            "<p>Logged in as: {}</p><p>Site: {}</p>",
            escape(user.display_name()),
            escape(session.site_url())
        ));
    }
    out.push_str(&action_button("/dashboard", "Dashboard", ""));
    out.push_str("<h3>Content Types</h3>");
    for (key, content_type) in &session.content_types {
        out.push_str(&action_button(
            &format!("/types/{}", path_segment(key)),
            &content_type.name,
            "",
        ));
    }
    out.push_str("<hr>");
    out.push_str(&action_button("/logout", "Logout", "primary"));
    out
}

fn dashboard(session: &Session) -> String {
    let names: String = session
        .content_types
        .values()
        .map(|t| format!("<li>{}</li>", escape(&t.name)))
        .collect();
    let actions: String = session
        .content_types
        .iter()
        .map(|(key, t)| {
            format!(
                "<p>{}</p>",
                action_button(
                    &format!("/types/{}/new", path_segment(key)),
                    &format!("Create new {}", t.name),
                    "",
                )
            )
        })
        .collect();

    format!(
        "<h1>Dashboard</h1><p>Welcome to the WordPress CPT Manager for {}</p>\
         <h2>Content Types</h2><ul>{}</ul><h2>Quick Actions</h2>{}",
        escape(session.site_url()),
        names,
        actions
    )
}

fn entry_list(session: &Session) -> String {
    let type_key = session.current_type.as_deref().unwrap_or_default();
    let name = session.type_name(type_key);

    let mut out = format!(
        "<h1>{} List</h1>{}",
        escape(name),
        action_button("/entries/new", &format!("Add New {}", name), "primary")
    );

    if session.entries.is_empty() {
        out.push_str(&format!(
            r#"<div class="notice info">No {} found</div>"#,
            escape(name)
        ));
        return out;
    }

    out.push_str("<table><thead><tr><th>Title</th><th>Date</th><th>Status</th><th></th></tr></thead><tbody>");
    for entry in &session.entries {
        let title = if entry.title.is_empty() {
            "Untitled"
        } else {
            entry.title.as_str()
        };
        let actions = match entry.id {
            Some(id) => format!(
                "{} {}",
                action_button(&format!("/entries/{}/edit", id), "Edit", ""),
                action_button(&format!("/entries/{}/delete", id), "Delete", "danger")
            ),
            None => String::new(),
        };
        out.push_str(&format!(
            "<tr><td><strong>{}</strong></td><td>{}</td><td>Status: {}</td><td>{}</td></tr>",
            escape(title),
            escape(&entry.formatted_date()),
            escape(entry.status.as_str()),
            actions
        ));
    }
    out.push_str("</tbody></table>");
    out
}

fn entry_editor(session: &Session) -> String {
    let type_key = session.current_type.as_deref().unwrap_or_default();
    let name = session.type_name(type_key);
    let entry = session.current_entry.as_ref();

    let heading = match entry {
        Some(_) => format!("Edit {}", name),
        None => format!("Add New {}", name),
    };
    let title = entry.map(|e| e.title.as_str()).unwrap_or("");
    let content = entry.map(|e| e.content.as_str()).unwrap_or("");
    let current_status = entry
        .map(|e| e.status.clone())
        .filter(EntryStatus::is_selectable)
        .unwrap_or_default();

    let status_options: String = EntryStatus::SELECTABLE
        .iter()
        .map(|s| {
            format!(
                r#"<option value="{0}"{1}>{0}</option>"#,
                s.as_str(),
                if *s == current_status { " selected" } else { "" }
            )
        })
        .collect();

    let custom_fields = entry
        .map(|e| render_meta_boxes(&e.meta_boxes))
        .unwrap_or_default();

    format!(
        r#"<h1>{}</h1>
<form method="post" action="/editor/save">
<label>Title<input type="text" name="title" value="{}"></label>
<label>Content<textarea name="content" rows="10">{}</textarea></label>
<label>Status<select name="status">{}</select></label>
<h2>Custom Fields</h2>
{}
<button type="submit" class="primary">Save</button>
</form>
{}"#,
        escape(&heading),
        escape(title),
        escape(content),
        status_options,
        custom_fields,
        action_button("/editor/cancel", "Cancel", "")
    )
}
