//! Category usage ledger.
//!
//! One immutable row per successful transaction; read back only to rank
//! shortcut pairs.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, QueryFilter,
    QueryOrder, QuerySelect, Set, sea_query::Expr,
};
use uuid::Uuid;

use crate::entities::{categories, category_usages, subcategories};

/// Number of shortcuts shown by default.
pub const DEFAULT_SHORTCUT_LIMIT: u64 = 6;

/// A ranked category/subcategory pair with its names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    /// Category ID.
    pub category_id: Uuid,
    /// Category name.
    pub category_name: String,
    /// Subcategory ID.
    pub subcategory_id: Uuid,
    /// Subcategory name.
    pub subcategory_name: String,
}

/// Usage ledger repository.
#[derive(Debug, Clone)]
pub struct UsageRepository {
    db: DatabaseConnection,
}

impl UsageRepository {
    /// Creates a new usage repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a usage now.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails or a referenced row is missing.
    pub async fn record(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        subcategory_id: Uuid,
    ) -> Result<category_usages::Model, DbErr> {
        self.record_at(user_id, category_id, subcategory_id, Utc::now())
            .await
    }

    /// Records a usage at a given instant.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails or a referenced row is missing.
    pub async fn record_at(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        subcategory_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<category_usages::Model, DbErr> {
        category_usages::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            category_id: Set(category_id),
            subcategory_id: Set(subcategory_id),
            created_at: Set(at.into()),
        }
        .insert(&self.db)
        .await
    }

    /// Distinct pairs, most recently used first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn recent(&self, limit: u64) -> Result<Vec<Shortcut>, DbErr> {
        let pairs: Vec<(Uuid, Uuid)> = category_usages::Entity::find()
            .select_only()
            .column(category_usages::Column::CategoryId)
            .column(category_usages::Column::SubcategoryId)
            .group_by(category_usages::Column::CategoryId)
            .group_by(category_usages::Column::SubcategoryId)
            .order_by(
                Expr::col(category_usages::Column::CreatedAt).max(),
                Order::Desc,
            )
            .limit(limit)
            .into_tuple()
            .all(&self.db)
            .await?;

        self.resolve(pairs).await
    }

    /// Pairs ordered by usage count, highest first.
    ///
    /// Ties come back in the store's natural order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn most_used(&self, limit: u64) -> Result<Vec<Shortcut>, DbErr> {
        let pairs: Vec<(Uuid, Uuid)> = category_usages::Entity::find()
            .select_only()
            .column(category_usages::Column::CategoryId)
            .column(category_usages::Column::SubcategoryId)
            .group_by(category_usages::Column::CategoryId)
            .group_by(category_usages::Column::SubcategoryId)
            .order_by(Expr::col(category_usages::Column::Id).count(), Order::Desc)
            .limit(limit)
            .into_tuple()
            .all(&self.db)
            .await?;

        self.resolve(pairs).await
    }

    /// Attaches names to ranked id pairs, keeping the ranking order.
    async fn resolve(&self, pairs: Vec<(Uuid, Uuid)>) -> Result<Vec<Shortcut>, DbErr> {
        if pairs.is_empty() {
            return Ok(vec![]);
        }

        let category_names: HashMap<Uuid, String> = categories::Entity::find()
            .filter(categories::Column::Id.is_in(pairs.iter().map(|(category, _)| *category)))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|category| (category.id, category.name))
            .collect();
        let subcategory_names: HashMap<Uuid, String> = subcategories::Entity::find()
            .filter(subcategories::Column::Id.is_in(pairs.iter().map(|(_, sub)| *sub)))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|subcategory| (subcategory.id, subcategory.name))
            .collect();

        Ok(pairs
            .into_iter()
            .filter_map(|(category_id, subcategory_id)| {
                Some(Shortcut {
                    category_id,
                    category_name: category_names.get(&category_id)?.clone(),
                    subcategory_id,
                    subcategory_name: subcategory_names.get(&subcategory_id)?.clone(),
                })
            })
            .collect())
    }
}
