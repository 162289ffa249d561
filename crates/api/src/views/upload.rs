//! CSV upload form.

use super::{alert, field};

/// Upload form; `error` belongs to the file field, `message` is the import result.
#[must_use]
pub fn upload_form(error: Option<&str>, message: Option<&str>) -> String {
    let banner = message.map(alert).unwrap_or_default();
    let input = field(
        "csv_file",
        "File CSV della banca",
        r#"<input type="file" name="csv_file" id="id_csv_file" accept=".csv" required class="w-full">"#,
        error,
    );

    format!(
        r#"<form id="upload-form" hx-post="/upload_csv/" hx-encoding="multipart/form-data" hx-target="this" hx-swap="outerHTML" class="bg-white rounded shadow p-4">
    <h1 class="text-xl font-bold mb-4">Importa transazioni</h1>
    {banner}
    {input}
    <div class="flex items-center gap-3">
        <button type="submit" class="bg-indigo-600 text-white rounded px-4 py-2">Importa</button>
        <span class="htmx-indicator text-sm text-gray-500">Importazione in corso...</span>
        <a href="/" class="text-sm text-indigo-600">Annulla</a>
    </div>
</form>"#
    )
}
