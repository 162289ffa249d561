//! Home page: shortcuts and the expense form.

use trantrac_core::transaction::{FormChoices, FormField, TransactionForm, TransactionFormError};
use trantrac_db::Shortcut;

use super::{alert, escape, field, options};

/// The expense form, swapped in place on submit.
#[must_use]
pub fn transaction_form(
    form: &TransactionForm,
    choices: &FormChoices,
    errors: &TransactionFormError,
    message: Option<&str>,
) -> String {
    let error = |f: FormField| errors.field(f);
    let banner = message.map(alert).unwrap_or_default();

    let amount = field(
        "amount",
        "Importo",
        &format!(
            r#"<input type="text" inputmode="decimal" name="amount" id="id_amount" value="{}" required class="w-full border rounded p-2">"#,
            escape(&form.amount)
        ),
        error(FormField::Amount),
    );
    let date = field(
        "date",
        "Data",
        &format!(
            r#"<input type="date" name="date" id="id_date" value="{}" required class="w-full border rounded p-2">"#,
            escape(&form.date)
        ),
        error(FormField::Date),
    );
    let description = field(
        "description",
        "Descrizione",
        &format!(
            r#"<input type="text" name="description" id="id_description" maxlength="200" value="{}" required class="w-full border rounded p-2">"#,
            escape(&form.description)
        ),
        error(FormField::Description),
    );
    let category = field(
        "category",
        "Categoria",
        &format!(
            r##"<select name="category" id="id_category" required class="w-full border rounded p-2"
        hx-get="/load_subcategory/" hx-target="#id_subcategory" hx-trigger="change">{}</select>"##,
            options(&choices.categories, form.category.trim())
        ),
        error(FormField::Category),
    );
    let subcategory = field(
        "subcategory",
        "Sottocategoria",
        &format!(
            r#"<select name="subcategory" id="id_subcategory" required class="w-full border rounded p-2">{}</select>"#,
            options(&choices.subcategories, form.subcategory.trim())
        ),
        error(FormField::Subcategory),
    );
    let account = field(
        "bank_account",
        "Conto",
        &format!(
            r#"<select name="bank_account" id="id_bank_account" required class="w-full border rounded p-2">{}</select>"#,
            options(&choices.accounts, form.bank_account.trim())
        ),
        error(FormField::BankAccount),
    );

    format!(
        r##"<form id="transaction-form" hx-post="/" hx-target="this" hx-swap="outerHTML" class="bg-white rounded shadow p-4">
    {banner}
    {amount}
    {date}
    {description}
    {category}
    {subcategory}
    {account}
    <div class="flex gap-2 text-sm mb-3">
        <a href="/add_category/" hx-get="/add_category/" hx-target="#modal">+ Categoria</a>
        <a href="/add-subcategory/" hx-get="/add-subcategory/" hx-include="#id_category" hx-target="#modal">+ Sottocategoria</a>
    </div>
    <button type="submit" class="w-full bg-indigo-600 text-white rounded p-2">Salva</button>
</form>"##
    )
}

/// One list of shortcut links.
#[must_use]
pub fn shortcuts(title: &str, items: &[Shortcut]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let links: String = items
        .iter()
        .map(|shortcut| {
            let href = format!(
                "/?category={}&amp;subcategory={}",
                shortcut.category_id, shortcut.subcategory_id
            );
            format!(
                r##"<a href="{href}" hx-get="{href}" hx-target="#transaction-form" hx-swap="outerHTML" class="inline-block bg-gray-200 rounded px-2 py-1 m-1 text-sm">{} › {}</a>"##,
                escape(&shortcut.category_name),
                escape(&shortcut.subcategory_name)
            )
        })
        .collect();

    format!(
        r#"<section class="mb-4">
    <h2 class="text-sm font-semibold text-gray-600">{}</h2>
    <div>{links}</div>
</section>"#,
        escape(title)
    )
}

/// Body of the full home page.
#[must_use]
pub fn index_content(display_name: &str, recent: &str, most_used: &str, form: &str) -> String {
    format!(
        r##"<header class="flex items-center justify-between mb-4">
    <h1 class="text-xl font-bold">Ciao {}</h1>
    <nav class="flex gap-3 text-sm">
        <a href="/upload_csv/" hx-get="/upload_csv/" hx-target="#main" hx-push-url="true">Importa CSV</a>
        <a href="/refresh-categories/" hx-get="/refresh-categories/" hx-target="#alerts">Aggiorna categorie</a>
        <a href="/users/delete/" hx-get="/users/delete/" hx-target="#main" hx-push-url="true">Elimina account</a>
        <form method="post" action="/accounts/logout/"><button type="submit">Esci</button></form>
    </nav>
</header>
<div id="alerts"></div>
{recent}
{most_used}
{form}"##,
        escape(display_name)
    )
}
