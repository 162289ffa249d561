//! Category and subcategory modals.

use trantrac_core::transaction::Choice;

use super::{escape, field, options};

/// Modal form creating a category.
#[must_use]
pub fn category_form(name: &str, error: Option<&str>) -> String {
    let input = field(
        "name",
        "Nome",
        &format!(
            r#"<input type="text" name="name" id="id_name" maxlength="100" value="{}" required class="w-full border rounded p-2">"#,
            escape(name)
        ),
        error,
    );

    format!(
        r#"<form id="category-form" hx-post="/add_category/" hx-target="this" hx-swap="outerHTML" class="bg-white rounded shadow p-4">
    <h2 class="text-lg font-semibold mb-3">Nuova categoria</h2>
    {input}
    <button type="submit" class="bg-indigo-600 text-white rounded px-4 py-2">Crea</button>
</form>"#
    )
}

/// Modal form creating a subcategory under a chosen category.
#[must_use]
pub fn subcategory_form(
    categories: &[Choice],
    category: &str,
    name: &str,
    category_error: Option<&str>,
    name_error: Option<&str>,
) -> String {
    let category = field(
        "category",
        "Categoria",
        &format!(
            r#"<select name="category" id="id_category" required class="w-full border rounded p-2">{}</select>"#,
            options(categories, category)
        ),
        category_error,
    );
    let name = field(
        "name",
        "Nome",
        &format!(
            r#"<input type="text" name="name" id="id_name" maxlength="100" value="{}" required class="w-full border rounded p-2">"#,
            escape(name)
        ),
        name_error,
    );

    format!(
        r#"<form id="subcategory-form" hx-post="/add-subcategory/" hx-target="this" hx-swap="outerHTML" class="bg-white rounded shadow p-4">
    <h2 class="text-lg font-semibold mb-3">Nuova sottocategoria</h2>
    {category}
    {name}
    <button type="submit" class="bg-indigo-600 text-white rounded px-4 py-2">Crea</button>
</form>"#
    )
}

/// Option list for the subcategory select.
#[must_use]
pub fn subcategory_options(subcategories: &[Choice]) -> String {
    options(subcategories, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_subcategory_form_preselects_category() {
        let food = Choice::new(Uuid::new_v4(), "Food");
        let html = subcategory_form(
            std::slice::from_ref(&food),
            &food.id.to_string(),
            "",
            None,
            Some("Questo campo è obbligatorio."),
        );

        assert!(html.contains(&format!(r#"value="{}" selected"#, food.id)));
        assert!(html.contains(r#"id="error_name""#));
        assert!(!html.contains(r#"id="error_category""#));
    }

    #[test]
    fn test_empty_options_has_only_placeholder() {
        assert_eq!(subcategory_options(&[]), r#"<option value="">---------</option>"#);
    }
}
