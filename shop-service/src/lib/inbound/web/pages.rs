use auth::AuthClaims;

use crate::domain::user::models::Page;
use crate::domain::user::models::User;

/// Escape text for HTML element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, user: Option<&AuthClaims>, body: &str) -> String {
    let account = match user {
        Some(claims) => format!(
            r#"<span>Signed in as <strong>{}</strong> ({})</span>
      <form method="post" action="/account/logout"><button type="submit">Sign out</button></form>"#,
            escape(&claims.username),
            claims.role,
        ),
        None => r#"<a href="/account/login">Sign in</a>"#.to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>{title} - MyShop</title>
  </head>
  <body>
    <nav>
      <a href="/">Home</a>
      <a href="/users">Users</a>
      {account}
    </nav>
    <main>
{body}
    </main>
  </body>
</html>
"#,
        title = escape(title),
        account = account,
        body = body,
    )
}

pub fn home(user: Option<&AuthClaims>) -> String {
    let greeting = match user {
        Some(claims) => format!("<h1>Welcome back, {}</h1>", escape(&claims.username)),
        None => "<h1>Welcome to MyShop</h1>".to_string(),
    };

    layout("Home", user, &greeting)
}

/// Sign-in form, optionally with an error from a failed attempt.
pub fn login(error: Option<&str>, username: &str, return_url: Option<&str>) -> String {
    let error = error
        .map(|message| format!(r#"<p class="error">{}</p>"#, escape(message)))
        .unwrap_or_default();

    let body = format!(
        r#"<h1>Sign in</h1>
{error}
<form method="post" action="/account/login">
  <input type="hidden" name="return_url" value="{return_url}">
  <label>Username <input type="text" name="username" value="{username}" required></label>
  <label>Password <input type="password" name="password" required></label>
  <label><input type="checkbox" name="remember_me" value="true"> Remember me</label>
  <button type="submit">Sign in</button>
</form>"#,
        error = error,
        return_url = escape(return_url.unwrap_or_default()),
        username = escape(username),
    );

    layout("Sign in", None, &body)
}

pub fn access_denied(user: Option<&AuthClaims>) -> String {
    layout(
        "Access denied",
        user,
        "<h1>Access denied</h1>\n<p>You do not have permission to view this page.</p>",
    )
}

pub fn users(user: &AuthClaims, page: &Page<User>) -> String {
    let rows: String = page
        .items
        .iter()
        .map(|u| {
            let actions = if user.is_admin() {
                format!(
                    r#"<form method="post" action="/users/{}/delete"><button type="submit">Delete</button></form>"#,
                    u.id
                )
            } else {
                String::new()
            };

            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape(u.username.as_str()),
                escape(u.email.as_str()),
                u.role,
                if u.is_active { "Active" } else { "Inactive" },
                actions,
            )
        })
        .collect();

    let mut pager = String::new();
    if page.has_previous_page() {
        pager.push_str(&format!(
            r#"<a href="/users?page_number={}&amp;page_size={}">Previous</a> "#,
            page.page_number - 1,
            page.page_size
        ));
    }
    if page.has_next_page() {
        pager.push_str(&format!(
            r#"<a href="/users?page_number={}&amp;page_size={}">Next</a>"#,
            page.page_number + 1,
            page.page_size
        ));
    }

    let body = format!(
        r#"<h1>Users</h1>
<table>
  <thead><tr><th>Username</th><th>Email</th><th>Role</th><th>Status</th><th></th></tr></thead>
  <tbody>
{rows}  </tbody>
</table>
<p>Page {page_number} of {total_pages} ({total_items} users)</p>
<nav>{pager}</nav>"#,
        rows = rows,
        page_number = page.page_number,
        total_pages = page.total_pages().max(1),
        total_items = page.total_items,
        pager = pager,
    );

    layout("Users", Some(user), &body)
}

pub fn error(user: Option<&AuthClaims>, message: &str) -> String {
    layout(
        "Error",
        user,
        &format!("<h1>Something went wrong</h1>\n<p>{}</p>", escape(message)),
    )
}
