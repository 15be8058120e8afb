// src/presentation/http/views.rs
use crate::application::commands::authorization::ValidatedAuthorizeRequest;

/// Login page for the authorize leg. The validated request is echoed back
/// as hidden fields so the form post carries the PKCE binding.
pub fn login_page(request: &ValidatedAuthorizeRequest) -> String {
    let hidden = [
        ("client_id", request.client_id.as_str()),
        ("redirect_uri", request.redirect_uri.as_str()),
        ("code_challenge", request.code_challenge.as_str()),
        (
            "code_challenge_method",
            request.code_challenge_method.as_str(),
        ),
        ("state", request.state.as_deref().unwrap_or("")),
    ]
    .iter()
    .map(|(name, value)| {
        format!(
            r#"            <input type="hidden" name="{name}" value="{}">"#,
            escape_html(value)
        )
    })
    .collect::<Vec<_>>()
    .join("\n");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Sign in - eshop</title>
</head>
<body>
    <main>
        <h1>Sign in to E-Shop</h1>
        <p>Use your account to authorize <strong>{client}</strong>.</p>
        <form method="post" action="/auth/authorize">
{hidden}
            <label for="email">Email</label>
            <input id="email" name="email" type="email" autocomplete="email" required>
            <label for="password">Password</label>
            <input id="password" name="password" type="password" autocomplete="current-password" required>
            <button type="submit">Sign in</button>
        </form>
    </main>
</body>
</html>
"#,
        client = escape_html(&request.client_id),
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}
