//! User repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{category_usages, users};

/// Input for creating a user.
#[derive(Debug, Clone, Default)]
pub struct CreateUserInput {
    /// Login email.
    pub email: String,
    /// Argon2id PHC hash.
    pub password_hash: String,
    /// Greeting name, also matched against account names.
    pub display_name: String,
    /// Staff flag.
    pub is_staff: bool,
    /// Superuser flag.
    pub is_superuser: bool,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a new active user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails (e.g. duplicate email).
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            display_name: Set(input.display_name),
            is_active: Set(true),
            is_staff: Set(input.is_staff),
            is_superuser: Set(input.is_superuser),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await
    }

    /// Sets the active flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the update fails.
    pub async fn set_active(&self, id: Uuid, is_active: bool) -> Result<users::Model, DbErr> {
        let user = users::ActiveModel {
            id: Set(id),
            is_active: Set(is_active),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        user.update(&self.db).await
    }

    /// Deletes a user together with their usage facts.
    ///
    /// Returns `false` when no user had this ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let txn = self.db.begin().await?;

        category_usages::Entity::delete_many()
            .filter(category_usages::Column::UserId.eq(id))
            .exec(&txn)
            .await?;
        let result = users::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    /// Emails of every staff or superuser account, one per user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn admin_emails(&self) -> Result<Vec<String>, DbErr> {
        users::Entity::find()
            .filter(
                Condition::any()
                    .add(users::Column::IsStaff.eq(true))
                    .add(users::Column::IsSuperuser.eq(true)),
            )
            .order_by_asc(users::Column::Email)
            .select_only()
            .column(users::Column::Email)
            .into_tuple()
            .all(&self.db)
            .await
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}
