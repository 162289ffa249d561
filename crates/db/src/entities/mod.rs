//! `SeaORM` entity definitions.

pub mod accounts;
pub mod categories;
pub mod category_usages;
pub mod subcategories;
pub mod users;
