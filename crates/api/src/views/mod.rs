//! HTML rendering.
//!
//! Pages are plain `format!` templates with HTMX attributes. A request carrying
//! `HX-Request` gets only the inner fragment.

mod category;
mod login;
mod transaction;
mod upload;
mod user;

pub use category::{category_form, subcategory_form, subcategory_options};
pub use login::login_page;
pub use transaction::{index_content, shortcuts, transaction_form};
pub use upload::upload_form;
pub use user::{USER_DELETED_MESSAGE, user_delete_form, user_deleted_page};

use axum::http::HeaderMap;
use trantrac_core::transaction::Choice;

/// Placeholder of an empty `<select>`.
pub const EMPTY_CHOICE: &str = "---------";

/// Base HTML template.
#[must_use]
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="it">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - TranTrac</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/tailwindcss@2.2.19/dist/tailwind.min.css">
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    <main id="main" class="max-w-xl mx-auto p-4">{content}</main>
    <div id="modal"></div>
</body>
</html>"#,
        title = escape(title),
    )
}

/// True when the request was issued by HTMX.
#[must_use]
pub fn is_htmx_request(headers: &HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Full page, or only `content` for HTMX requests.
#[must_use]
pub fn page_response(headers: &HeaderMap, title: &str, content: &str) -> String {
    if is_htmx_request(headers) {
        content.to_string()
    } else {
        base_html(title, content)
    }
}

/// Escapes text for HTML bodies and quoted attributes.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// A dismissable error banner.
#[must_use]
pub fn alert(message: &str) -> String {
    format!(
        r#"<div class="alert bg-red-100 border border-red-300 text-red-800 rounded p-3 mb-4" role="alert">{}</div>"#,
        escape(message)
    )
}

/// Standalone error page.
#[must_use]
pub fn error_page(status: u16, message: &str) -> String {
    base_html(
        "Errore",
        &format!(
            r#"<h1 class="text-2xl font-bold mb-4">Errore {status}</h1>
{}
<a href="/" class="text-indigo-600">Torna alla home</a>"#,
            alert(message)
        ),
    )
}

/// `<option>` elements with a leading placeholder.
#[must_use]
pub fn options(choices: &[Choice], selected: &str) -> String {
    let mut html = format!(r#"<option value="">{EMPTY_CHOICE}</option>"#);
    for choice in choices {
        let id = choice.id.to_string();
        let marker = if id == selected { " selected" } else { "" };
        html.push_str(&format!(
            r#"<option value="{id}"{marker}>{}</option>"#,
            escape(&choice.name)
        ));
    }
    html
}

/// Wraps an input with its label and optional error.
fn field(name: &str, label: &str, input: &str, error: Option<&str>) -> String {
    let error = error
        .map(|message| {
            format!(
                r#"<p class="errorlist text-sm text-red-600" id="error_{name}">{}</p>"#,
                escape(message)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<div class="mb-3">
    <label for="id_{name}" class="block text-sm font-medium">{label}</label>
    {input}
    {error}
</div>"#
    )
}
