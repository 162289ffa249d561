//! Account deletion pages.

use super::{base_html, escape};

/// Shown once the account is gone.
pub const USER_DELETED_MESSAGE: &str = "Utente cancellato con successo";

/// Confirmation form for deleting the logged-in account.
#[must_use]
pub fn user_delete_form(display_name: &str, email: &str) -> String {
    format!(
        r#"<form method="post" action="/users/delete/" class="bg-white rounded shadow p-4">
    <h1 class="text-xl font-bold mb-4">Elimina account</h1>
    <p class="mb-4">Vuoi davvero eliminare l'account di <strong>{}</strong> ({})? L'operazione non si può annullare.</p>
    <div class="flex items-center gap-3">
        <button type="submit" class="bg-red-600 text-white rounded px-4 py-2">Elimina</button>
        <a href="/" class="text-sm text-indigo-600">Annulla</a>
    </div>
</form>"#,
        escape(display_name),
        escape(email)
    )
}

/// Full page confirming the deletion.
#[must_use]
pub fn user_deleted_page() -> String {
    base_html(
        "Account eliminato",
        &format!(
            r#"<div class="bg-green-100 border border-green-300 text-green-800 rounded p-3 mb-4" role="status">{USER_DELETED_MESSAGE}</div>
<a href="/accounts/login/" class="text-indigo-600">Accedi</a>"#
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_form_escapes_user() {
        let html = user_delete_form("<Mario>", "mario@example.com");
        assert!(html.contains("&lt;Mario&gt;"));
        assert!(html.contains(r#"action="/users/delete/""#));
    }
}
