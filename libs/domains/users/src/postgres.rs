use async_trait::async_trait;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IsolationLevel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    changeset::{ChangeSet, UserField},
    entity,
    error::{UserError, UserResult},
    filter::NormalizedFilters,
    models::User,
    repository::{UserPage, UserRepository},
};

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn filtered(filters: &NormalizedFilters) -> Select<entity::Entity> {
        let mut query = entity::Entity::find();

        if let Some(first_name) = &filters.first_name {
            query = query.filter(Expr::cust_with_values(
                "LOWER(TRIM(first_name)) LIKE $1",
                [first_name.like_pattern()],
            ));
        }

        if let Some(last_name) = &filters.last_name {
            query = query.filter(Expr::cust_with_values(
                "LOWER(TRIM(last_name)) LIKE $1",
                [last_name.like_pattern()],
            ));
        }

        query
    }

    async fn fetch_window<C: ConnectionTrait>(
        conn: &C,
        filters: &NormalizedFilters,
        offset: u64,
        limit: u64,
    ) -> UserResult<Vec<User>> {
        let models = Self::filtered(filters)
            .order_by_desc(entity::Column::CreatedAt)
            .order_by_desc(entity::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(conn)
            .await
            .map_err(UserError::retrieval)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn count_matching<C: ConnectionTrait>(
        conn: &C,
        filters: &NormalizedFilters,
    ) -> UserResult<u64> {
        Self::filtered(filters)
            .count(conn)
            .await
            .map_err(UserError::retrieval)
    }
}

fn column(field: UserField) -> entity::Column {
    match field {
        UserField::FirstName => entity::Column::FirstName,
        UserField::LastName => entity::Column::LastName,
        UserField::Email => entity::Column::Email,
        UserField::Phone => entity::Column::Phone,
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let active_model: entity::ActiveModel = (&user).into();

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(UserError::persistence)?;

        tracing::info!(user_id = %model.id, "Created user");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(UserError::retrieval)?;

        Ok(model.map(Into::into))
    }

    async fn list(
        &self,
        filters: &NormalizedFilters,
        offset: u64,
        limit: u64,
    ) -> UserResult<Vec<User>> {
        Self::fetch_window(&self.db, filters, offset, limit).await
    }

    async fn count(&self, filters: &NormalizedFilters) -> UserResult<u64> {
        Self::count_matching(&self.db, filters).await
    }

    async fn list_page(
        &self,
        filters: &NormalizedFilters,
        offset: u64,
        limit: u64,
    ) -> UserResult<UserPage> {
        // both statements read one snapshot
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::RepeatableRead),
                Some(AccessMode::ReadOnly),
            )
            .await
            .map_err(UserError::retrieval)?;

        let total_count = Self::count_matching(&txn, filters).await?;
        let users = if offset >= total_count {
            Vec::new()
        } else {
            Self::fetch_window(&txn, filters, offset, limit).await?
        };

        txn.commit().await.map_err(UserError::retrieval)?;

        Ok(UserPage { users, total_count })
    }

    async fn update(&self, id: Uuid, changes: &ChangeSet) -> UserResult<User> {
        if changes.is_empty() {
            return self.get_by_id(id).await?.ok_or(UserError::NotFound(id));
        }

        let txn = self.db.begin().await.map_err(UserError::persistence)?;

        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let mut update = entity::Entity::update_many()
            .col_expr(entity::Column::UpdatedAt, Expr::value(now))
            .filter(entity::Column::Id.eq(id));
        for (field, value) in changes.iter() {
            update = update.col_expr(column(field), Expr::value(value.to_string()));
        }

        let result = update.exec(&txn).await.map_err(UserError::persistence)?;
        if result.rows_affected == 0 {
            // dropping the transaction rolls it back
            return Err(UserError::NotFound(id));
        }

        let model = entity::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(UserError::persistence)?
            .ok_or(UserError::NotFound(id))?;

        txn.commit().await.map_err(UserError::persistence)?;

        tracing::info!(user_id = %id, fields = changes.len(), "Updated user");
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let result = entity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(UserError::persistence)?;

        if result.rows_affected > 0 {
            tracing::info!(user_id = %id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
