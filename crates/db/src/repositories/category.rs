//! Category and subcategory repository.
//!
//! Names are not unique in storage: every get-or-create here looks up by name
//! first and takes the first match.

use std::collections::{HashMap, HashSet};

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use trantrac_core::import::CategoryPair;
use uuid::Uuid;

use crate::entities::{categories, subcategories};

/// Rows created by a refresh from the categories sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Categories created.
    pub categories_created: usize,
    /// Subcategories created.
    pub subcategories_created: usize,
}

/// Category repository.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<categories::Model>, DbErr> {
        categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds a category by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<categories::Model>, DbErr> {
        categories::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds the first category with the given name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<categories::Model>, DbErr> {
        categories::Entity::find()
            .filter(categories::Column::Name.eq(name))
            .one(&self.db)
            .await
    }

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, name: &str) -> Result<categories::Model, DbErr> {
        categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&self.db)
        .await
    }

    /// Returns the category named `name`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn get_or_create(&self, name: &str) -> Result<(categories::Model, bool), DbErr> {
        if let Some(category) = self.find_by_name(name).await? {
            return Ok((category, false));
        }
        Ok((self.create(name).await?, true))
    }

    /// Subcategories of a category ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn subcategories_for(
        &self,
        category_id: Uuid,
    ) -> Result<Vec<subcategories::Model>, DbErr> {
        subcategories::Entity::find()
            .filter(subcategories::Column::CategoryId.eq(category_id))
            .order_by_asc(subcategories::Column::Name)
            .all(&self.db)
            .await
    }

    /// Creates a subcategory.
    ///
    /// `skip_sheet_save` records whether the caller takes care of the sheet.
    ///
    /// # Errors
    ///
    /// Returns an error if the category does not exist or the insert fails.
    pub async fn create_subcategory(
        &self,
        category_id: Uuid,
        name: &str,
        skip_sheet_save: bool,
    ) -> Result<subcategories::Model, DbErr> {
        subcategories::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            category_id: Set(category_id),
            skip_sheet_save: Set(skip_sheet_save),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&self.db)
        .await
    }

    /// Returns the subcategory `name` of a category, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn get_or_create_subcategory(
        &self,
        category_id: Uuid,
        name: &str,
        skip_sheet_save: bool,
    ) -> Result<(subcategories::Model, bool), DbErr> {
        let existing = subcategories::Entity::find()
            .filter(subcategories::Column::CategoryId.eq(category_id))
            .filter(subcategories::Column::Name.eq(name))
            .one(&self.db)
            .await?;

        match existing {
            Some(subcategory) => Ok((subcategory, false)),
            None => Ok((
                self.create_subcategory(category_id, name, skip_sheet_save)
                    .await?,
                true,
            )),
        }
    }

    /// Creates the categories and subcategories referenced by an import.
    ///
    /// Pairs with an empty category are ignored; an empty subcategory creates
    /// only the category. New subcategories are flagged `skip_sheet_save`, and
    /// their `[category, subcategory]` rows are returned for one bulk sync.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails. Rows written before the
    /// failure are kept.
    pub async fn materialize_pairs(
        &self,
        pairs: &[CategoryPair],
    ) -> Result<Vec<Vec<String>>, DbErr> {
        let pairs: Vec<&CategoryPair> = pairs
            .iter()
            .filter(|pair| !pair.category.is_empty())
            .collect();
        if pairs.is_empty() {
            return Ok(vec![]);
        }

        let names: Vec<String> = pairs
            .iter()
            .map(|pair| pair.category.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let mut category_ids: HashMap<String, Uuid> = HashMap::new();
        for category in categories::Entity::find()
            .filter(categories::Column::Name.is_in(names))
            .order_by_asc(categories::Column::CreatedAt)
            .all(&self.db)
            .await?
        {
            category_ids.entry(category.name).or_insert(category.id);
        }

        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let mut new_categories = Vec::new();
        for pair in &pairs {
            if !category_ids.contains_key(&pair.category) {
                let id = Uuid::new_v4();
                category_ids.insert(pair.category.clone(), id);
                new_categories.push(categories::ActiveModel {
                    id: Set(id),
                    name: Set(pair.category.clone()),
                    created_at: Set(now),
                });
            }
        }
        if !new_categories.is_empty() {
            tracing::debug!(count = new_categories.len(), "Creating imported categories");
            categories::Entity::insert_many(new_categories)
                .exec_without_returning(&self.db)
                .await?;
        }

        let existing: HashSet<(Uuid, String)> = subcategories::Entity::find()
            .filter(subcategories::Column::CategoryId.is_in(category_ids.values().copied()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|subcategory| (subcategory.category_id, subcategory.name))
            .collect();

        let mut new_subcategories = Vec::new();
        let mut sheet_rows = Vec::new();
        let mut created = HashSet::new();
        for pair in &pairs {
            if pair.subcategory.is_empty() {
                continue;
            }
            let Some(&category_id) = category_ids.get(&pair.category) else {
                continue;
            };

            let key = (category_id, pair.subcategory.clone());
            if existing.contains(&key) || !created.insert(key) {
                continue;
            }

            new_subcategories.push(subcategories::ActiveModel {
                id: Set(Uuid::new_v4()),
                name: Set(pair.subcategory.clone()),
                category_id: Set(category_id),
                skip_sheet_save: Set(true),
                created_at: Set(now),
            });
            sheet_rows.push(vec![pair.category.clone(), pair.subcategory.clone()]);
        }
        if !new_subcategories.is_empty() {
            tracing::debug!(count = new_subcategories.len(), "Creating imported subcategories");
            subcategories::Entity::insert_many(new_subcategories)
                .exec_without_returning(&self.db)
                .await?;
        }

        Ok(sheet_rows)
    }

    /// Mirrors rows read from the categories sheet into local storage.
    ///
    /// Each row is `[category, subcategory?]`; rows without a category name are
    /// skipped. Created subcategories are flagged `skip_sheet_save`. Running it
    /// twice on the same rows creates nothing the second time.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn refresh_from_rows(&self, rows: &[Vec<String>]) -> Result<RefreshSummary, DbErr> {
        let mut summary = RefreshSummary::default();

        for row in rows {
            let Some(category_name) = row.first().map(|name| name.trim()) else {
                continue;
            };
            if category_name.is_empty() {
                continue;
            }

            let (category, created) = self.get_or_create(category_name).await?;
            if created {
                summary.categories_created += 1;
            }

            let subcategory_name = row.get(1).map_or("", |name| name.trim());
            if subcategory_name.is_empty() {
                continue;
            }

            let (_, created) = self
                .get_or_create_subcategory(category.id, subcategory_name, true)
                .await?;
            if created {
                summary.subcategories_created += 1;
            }
        }

        Ok(summary)
    }
}
