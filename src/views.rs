//! Server-rendered admin pages.

use std::fmt::Write as _;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use time::OffsetDateTime;

use crate::announcements::repo_types::Announcement;
use crate::auth::{services::MIN_PASSWORD_LEN, CurrentAdmin};
use crate::classes::repo_types::SchoolClass;
use crate::dashboard::services::Overview;
use crate::error::GENERIC_FAILURE;
use crate::flash::{Flash, FlashKind};
use crate::forms::input_datetime;
use crate::quizzes::repo_types::{Quiz, ScheduleMode};
use crate::settings::{repo_types::Theme, services::DesignSettings};
use crate::totals::services::TotalsOverview;

const NAV: [(&str, &str); 7] = [
    ("/admin/dashboard", "Dashboard"),
    ("/admin/quizzes", "Quizzes"),
    ("/admin/totals", "Totals"),
    ("/admin/classes", "Classes"),
    ("/admin/announcements", "Announcements"),
    ("/admin/design", "Design"),
    ("/admin/account", "Account"),
];

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:0;background:#f6f3fa;color:#222}\
header{background:#4b2a6b;color:#fff;padding:.75rem 1.5rem;display:flex;gap:1rem;align-items:center;flex-wrap:wrap}\
header a{color:#fff;text-decoration:none}main{max-width:960px;margin:1.5rem auto;padding:0 1rem}\
.card{background:#fff;border-radius:8px;padding:1rem 1.25rem;margin-bottom:1rem;box-shadow:0 1px 3px #0002}\
.flash{padding:.75rem 1rem;border-radius:6px;margin-bottom:1rem}.flash.success{background:#dff3e4}\
.flash.error{background:#f8dcdc}label{display:block;margin:.5rem 0 .2rem}input,select,textarea{width:100%;\
box-sizing:border-box;padding:.4rem}input[type=checkbox]{width:auto}table{width:100%;border-collapse:collapse}\
td,th{padding:.4rem;border-bottom:1px solid #eee;text-align:left}.muted{color:#777}";

const RENAME_SCRIPT: &str = r#"<script>
document.querySelectorAll('[data-rename]').forEach(function (btn) {
  btn.addEventListener('click', async function () {
    var id = btn.dataset.rename;
    var cell = document.getElementById('class-name-' + id);
    var name = prompt('New class name', cell.textContent);
    if (name === null) return;
    var res = await fetch('/admin/classes/' + id + '/edit', {
      method: 'POST',
      headers: {'Content-Type': 'application/json'},
      body: JSON.stringify({name: name})
    });
    var body = await res.json();
    if (body.success) { cell.textContent = body.name; } else { alert(body.error); }
  });
});
</script>"#;

/// Escapes text for element content and quoted attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

fn money(value: f64) -> String {
    format!("${value:.2}")
}

fn shown_at(value: Option<OffsetDateTime>) -> String {
    match value {
        Some(at) => input_datetime(Some(at)).replace('T', " ") + " UTC",
        None => "not set".into(),
    }
}

fn checked(on: bool) -> &'static str {
    if on {
        " checked"
    } else {
        ""
    }
}

fn flash_block(flash: Option<&Flash>) -> String {
    match flash {
        Some(f) => {
            let kind = match f.kind {
                FlashKind::Success => "success",
                FlashKind::Error => "error",
            };
            format!(r#"<div class="flash {kind}">{}</div>"#, escape(&f.message))
        }
        None => String::new(),
    }
}

fn layout(title: &str, admin: Option<&CurrentAdmin>, flash: Option<&Flash>, body: &str) -> Html<String> {
    let mut header = String::from("<header><strong>Rice Bowl Admin</strong>");
    if let Some(admin) = admin {
        for (href, label) in NAV {
            let _ = write!(header, r#"<a href="{href}">{label}</a>"#);
        }
        let _ = write!(
            header,
            r#"<span class="muted">{}</span><a href="/admin/logout">Log out</a>"#,
            escape(&admin.username)
        );
    }
    header.push_str("</header>");

    Html(format!(
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{title} | Rice Bowl Admin</title><style>{STYLE}</style></head>\
         <body>{header}<main>{flash}<h1>{title}</h1>{body}</main></body></html>",
        title = escape(title),
        flash = flash_block(flash),
    ))
}

/// Generic 500 page for failed reads.
pub fn failure() -> Response {
    let body = format!(r#"<p>{GENERIC_FAILURE}</p><p><a href="/admin/dashboard">Back to the dashboard</a></p>"#);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        layout("Error", None, None, &body),
    )
        .into_response()
}

pub fn login(flash: Option<&Flash>, username: &str, next: Option<&str>) -> Html<String> {
    let action = match next {
        Some(n) => format!(
            "/admin/login?{}",
            serde_urlencoded::to_string([("next", n)]).unwrap_or_default()
        ),
        None => "/admin/login".into(),
    };
    let body = format!(
        r#"<form class="card" method="post" action="{action}">
<label for="username">Username</label>
<input id="username" name="username" value="{username}" autocomplete="username" required>
<label for="password">Password</label>
<input id="password" name="password" type="password" autocomplete="current-password" required>
<p><button type="submit">Log in</button></p>
</form>"#,
        action = escape(&action),
        username = escape(username),
    );
    layout("Log in", None, flash, &body)
}

fn quiz_summary(label: &str, quiz: Option<&Quiz>) -> String {
    match quiz {
        Some(q) => format!(
            r#"<div class="card"><h2>{label}</h2><p>Week {}: {}</p><p class="muted">Opens {} / closes {}</p></div>"#,
            q.week_number,
            escape(&q.country_name),
            shown_at(q.opens_at),
            shown_at(q.closes_at),
        ),
        None => format!(r#"<div class="card"><h2>{label}</h2><p class="muted">None</p></div>"#),
    }
}

pub fn dashboard(admin: &CurrentAdmin, flash: Option<&Flash>, overview: &Overview) -> Html<String> {
    let mut body = quiz_summary("Current quiz", overview.current_quiz.as_ref());
    body.push_str(&quiz_summary("Next quiz", overview.next_quiz.as_ref()));
    let _ = write!(
        body,
        r#"<div class="card"><h2>Totals</h2><table>
<tr><th>Online</th><td>{}</td></tr>
<tr><th>Rice bowls</th><td>{}</td></tr>
<tr><th>Grand total</th><td>{}</td></tr>
</table><p class="muted">{} classes, {} active announcements</p></div>"#,
        money(overview.totals.online_total),
        money(overview.totals.rice_bowl_total),
        money(overview.totals.grand_total),
        overview.class_count,
        overview.active_announcements,
    );
    layout("Dashboard", Some(admin), flash, &body)
}

fn quiz_form(quiz: &Quiz) -> String {
    let week = quiz.week_number;
    let text = |v: &Option<String>| escape(v.as_deref().unwrap_or_default());
    let mode_options: String = [ScheduleMode::Manual, ScheduleMode::Scheduled]
        .iter()
        .map(|m| {
            let selected = if *m == quiz.schedule_mode { " selected" } else { "" };
            format!(r#"<option value="{0}"{selected}>{0}</option>"#, m.as_str())
        })
        .collect();
    let winners: String = quiz
        .winners
        .iter()
        .enumerate()
        .map(|(i, w)| {
            format!(
                r#"<label>Winner {n}</label><input name="winner_{n}" value="{}">"#,
                text(w),
                n = i + 1
            )
        })
        .collect();

    format!(
        r#"<form class="card" method="post" action="/admin/quizzes/{week}">
<h2>Week {week}</h2>
<label>Country</label><input name="country_name" value="{country}">
<label>Description</label><textarea name="description" rows="2">{description}</textarea>
<label>Form link</label><input name="forms_link" type="url" value="{link}">
<label>Schedule mode</label><select name="schedule_mode">{mode_options}</select>
<label><input type="checkbox" name="manual_visible"{visible}> Visible (manual mode)</label>
<label>Opens at (UTC)</label><input type="datetime-local" name="opens_at" value="{opens}">
<label>Closes at (UTC)</label><input type="datetime-local" name="closes_at" value="{closes}">
<label>Participant count</label><input name="participant_count" inputmode="numeric" value="{count}">
<label>Participants (one per line)</label><textarea name="participants_text" rows="4">{participants}</textarea>
{winners}
<p><button type="submit">Save week {week}</button></p>
</form>"#,
        country = escape(&quiz.country_name),
        description = text(&quiz.description),
        link = text(&quiz.forms_link),
        visible = checked(quiz.manual_visible),
        opens = input_datetime(quiz.opens_at),
        closes = input_datetime(quiz.closes_at),
        count = quiz.participant_count,
        participants = text(&quiz.participants_text),
    )
}

pub fn quizzes(admin: &CurrentAdmin, flash: Option<&Flash>, quizzes: &[Quiz]) -> Html<String> {
    let body: String = quizzes.iter().map(quiz_form).collect();
    layout("Quizzes", Some(admin), flash, &body)
}

pub fn totals(admin: &CurrentAdmin, flash: Option<&Flash>, view: &TotalsOverview) -> Html<String> {
    let mut body = format!(
        r#"<form class="card" method="post" action="/admin/totals">
<label>CRS donation link</label><input name="crs_donation_link" type="url" value="{link}">
<label>Online total</label><input name="online_total" inputmode="decimal" value="{online:.2}">
<label><input type="checkbox" name="show_grand_total"{show}> Show grand total on the public page</label>
<p><button type="submit">Save totals</button></p>
</form>
<div class="card"><h2>Rice bowls by class</h2><table>"#,
        link = escape(&view.crs_donation_link),
        online = view.totals.online_total,
        show = checked(view.show_grand_total),
    );
    for class in &view.classes {
        let _ = write!(
            body,
            r#"<tr><td>{name}</td><td><form method="post" action="/admin/totals/class/{id}">
<input name="rice_bowl_amount" inputmode="decimal" value="{amount:.2}"> <button type="submit">Update</button>
</form></td></tr>"#,
            name = escape(&class.name),
            id = class.id,
            amount = class.rice_bowl_amount,
        );
    }
    let _ = write!(
        body,
        r#"</table><p>Rice bowl total: <strong>{}</strong></p><p>Grand total: <strong>{}</strong></p></div>"#,
        money(view.totals.rice_bowl_total),
        money(view.totals.grand_total),
    );
    layout("Totals", Some(admin), flash, &body)
}

pub fn classes(admin: &CurrentAdmin, flash: Option<&Flash>, classes: &[SchoolClass]) -> Html<String> {
    let mut body = String::from(
        r#"<form class="card" method="post" action="/admin/classes">
<h2>Add class</h2>
<label>Name</label><input name="name" required>
<label>Initial amount</label><input name="rice_bowl_amount" inputmode="decimal" placeholder="0.00">
<p><button type="submit">Add class</button></p>
</form>
<div class="card"><table><tr><th>Class</th><th>Amount</th><th></th></tr>"#,
    );
    if classes.is_empty() {
        body.push_str(r#"<tr><td colspan="3" class="muted">No classes yet.</td></tr>"#);
    }
    for class in classes {
        let _ = write!(
            body,
            r#"<tr><td id="class-name-{id}">{name}</td><td>{amount}</td><td>
<form method="post" action="/admin/classes/{id}">
<input name="name" placeholder="New name"> <input name="rice_bowl_amount" inputmode="decimal" placeholder="New amount">
<button type="submit">Save</button></form>
<button type="button" data-rename="{id}">Rename</button>
<form method="post" action="/admin/classes/{id}/delete" onsubmit="return confirm('Delete this class?')">
<button type="submit">Delete</button></form>
</td></tr>"#,
            id = class.id,
            name = escape(&class.name),
            amount = money(class.rice_bowl_amount),
        );
    }
    body.push_str("</table></div>");
    body.push_str(RENAME_SCRIPT);
    layout("Classes", Some(admin), flash, &body)
}

fn announcement_fields(a: Option<&Announcement>) -> String {
    format!(
        r#"<label>Text</label><textarea name="text" rows="2" required>{text}</textarea>
<label>Start (UTC, optional)</label><input type="datetime-local" name="start_at" value="{start}">
<label>End (UTC, optional)</label><input type="datetime-local" name="end_at" value="{end}">
<label><input type="checkbox" name="enabled"{enabled}> Enabled</label>"#,
        text = a.map(|a| escape(&a.text)).unwrap_or_default(),
        start = input_datetime(a.and_then(|a| a.start_at)),
        end = input_datetime(a.and_then(|a| a.end_at)),
        enabled = checked(a.map_or(true, |a| a.enabled)),
    )
}

pub fn announcements(
    admin: &CurrentAdmin,
    flash: Option<&Flash>,
    list: &[Announcement],
    now: OffsetDateTime,
) -> Html<String> {
    let mut body = format!(
        r#"<form class="card" method="post" action="/admin/announcements">
<h2>New announcement</h2>{}
<p><button type="submit">Add announcement</button></p>
</form>"#,
        announcement_fields(None)
    );
    for a in list {
        let status = if a.is_active(now) { "Active" } else { "Inactive" };
        let _ = write!(
            body,
            r#"<div class="card"><p class="muted">{status}</p>
<form method="post" action="/admin/announcements/{id}">{fields}
<p><button type="submit">Save</button></p></form>
<form method="post" action="/admin/announcements/{id}/delete" onsubmit="return confirm('Delete this announcement?')">
<button type="submit">Delete</button></form></div>"#,
            id = a.id,
            fields = announcement_fields(Some(a)),
        );
    }
    layout("Announcements", Some(admin), flash, &body)
}

pub fn design(admin: &CurrentAdmin, flash: Option<&Flash>, design: &DesignSettings) -> Html<String> {
    let options: String = Theme::ALL
        .iter()
        .map(|t| {
            let selected = if *t == design.theme { " selected" } else { "" };
            format!(r#"<option value="{}"{selected}>{}</option>"#, t.as_str(), t.label())
        })
        .collect();
    let body = format!(
        r#"<form class="card" method="post" action="/admin/design">
<label>Theme</label><select name="theme">{options}</select>
<label>School logo URL</label><input name="school_logo_url" type="url" value="{logo}">
<label><input type="checkbox" name="enable_crs_imagery"{imagery}> Show CRS imagery</label>
<p><button type="submit">Save design</button></p>
</form>"#,
        logo = escape(&design.school_logo_url),
        imagery = checked(design.enable_crs_imagery),
    );
    layout("Design", Some(admin), flash, &body)
}

pub fn account(admin: &CurrentAdmin, flash: Option<&Flash>) -> Html<String> {
    let body = format!(
        r#"<form class="card" method="post" action="/admin/account">
<p>Signed in as <strong>{username}</strong>.</p>
<label>Current password</label><input name="current_password" type="password" autocomplete="current-password">
<label>New password (at least {MIN_PASSWORD_LEN} characters)</label><input name="new_password" type="password" autocomplete="new-password">
<label>Confirm new password</label><input name="confirm_password" type="password" autocomplete="new-password">
<p><button type="submit">Change password</button></p>
</form>"#,
        username = escape(&admin.username),
    );
    layout("Account", Some(admin), flash, &body)
}
