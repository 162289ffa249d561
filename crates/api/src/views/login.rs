//! Login page.

use super::{alert, base_html, escape};

/// Full login page; `next` is carried in a hidden field.
#[must_use]
pub fn login_page(email: &str, next: &str, error: Option<&str>) -> String {
    let banner = error.map(alert).unwrap_or_default();

    base_html(
        "Accedi",
        &format!(
            r#"<h1 class="text-xl font-bold mb-4">Accedi</h1>
{banner}
<form method="post" action="/accounts/login/" class="bg-white rounded shadow p-4">
    <input type="hidden" name="next" value="{next}">
    <div class="mb-3">
        <label for="id_email" class="block text-sm font-medium">Email</label>
        <input type="email" name="email" id="id_email" value="{email}" required autofocus class="w-full border rounded p-2">
    </div>
    <div class="mb-3">
        <label for="id_password" class="block text-sm font-medium">Password</label>
        <input type="password" name="password" id="id_password" required class="w-full border rounded p-2">
    </div>
    <button type="submit" class="w-full bg-indigo-600 text-white rounded p-2">Accedi</button>
</form>"#,
            next = escape(next),
            email = escape(email),
        ),
    )
}
