use prenoto_core::{
    models::{CreateTagRequest, CustomerTag},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const TAG_COLUMNS: &str = "id, business_id, name, emoji, color, created_at";

/// Repository for customer tags and their assignments.
#[derive(Clone)]
pub struct TagRepository {
    pool: PgPool,
}

impl TagRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, request), fields(db.table = "customer_tags", db.operation = "insert"))]
    pub async fn create(
        &self,
        business_id: Uuid,
        request: &CreateTagRequest,
    ) -> Result<CustomerTag, AppError> {
        let tag = sqlx::query_as::<Postgres, CustomerTag>(&format!(
            r#"
            INSERT INTO customer_tags (business_id, name, emoji, color)
            VALUES ($1, $2, $3, $4)
            RETURNING {TAG_COLUMNS}
            "#,
        ))
        .bind(business_id)
        .bind(request.name.trim())
        .bind(request.emoji.as_deref())
        .bind(request.color)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("Tag '{}' already exists", request.name.trim()))
            }
            _ => AppError::from(e),
        })?;

        Ok(tag)
    }

    #[tracing::instrument(skip(self), fields(db.table = "customer_tags", db.operation = "select"))]
    pub async fn list(&self, business_id: Uuid) -> Result<Vec<CustomerTag>, AppError> {
        let tags = sqlx::query_as::<Postgres, CustomerTag>(&format!(
            "SELECT {TAG_COLUMNS} FROM customer_tags WHERE business_id = $1 ORDER BY name ASC",
        ))
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    #[tracing::instrument(skip(self), fields(db.table = "customer_tags", db.operation = "delete", db.record_id = %id))]
    pub async fn delete(&self, business_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        // Assignments go with the tag (ON DELETE CASCADE).
        let rows_affected =
            sqlx::query("DELETE FROM customer_tags WHERE business_id = $1 AND id = $2")
                .bind(business_id)
                .bind(id)
                .execute(&self.pool)
                .await?
                .rows_affected();

        Ok(rows_affected > 0)
    }

    /// Assign a tag to a customer. Both must belong to the business;
    /// re-assigning is a no-op.
    #[tracing::instrument(skip(self), fields(db.table = "customer_tag_assignments", db.operation = "insert"))]
    pub async fn assign(
        &self,
        business_id: Uuid,
        customer_id: Uuid,
        tag_id: Uuid,
    ) -> Result<(), AppError> {
        let rows_affected = sqlx::query(
            r#"
            INSERT INTO customer_tag_assignments (customer_id, tag_id)
            SELECT c.id, t.id
            FROM customers c, customer_tags t
            WHERE c.id = $2 AND c.business_id = $1
              AND t.id = $3 AND t.business_id = $1
            ON CONFLICT (customer_id, tag_id) DO NOTHING
            "#,
        )
        .bind(business_id)
        .bind(customer_id)
        .bind(tag_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        // Zero rows on re-assignment is fine; zero rows because either side
        // is missing (or foreign) is not.
        if rows_affected == 0 {
            let exists: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM customer_tag_assignments WHERE customer_id = $1 AND tag_id = $2)",
            )
            .bind(customer_id)
            .bind(tag_id)
            .fetch_one(&self.pool)
            .await?;
            if !exists {
                return Err(AppError::NotFound("Customer or tag not found".to_string()));
            }
        }

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "customer_tag_assignments", db.operation = "delete"))]
    pub async fn unassign(
        &self,
        business_id: Uuid,
        customer_id: Uuid,
        tag_id: Uuid,
    ) -> Result<bool, AppError> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM customer_tag_assignments a
            USING customers c
            WHERE a.customer_id = c.id
              AND c.business_id = $1
              AND a.customer_id = $2
              AND a.tag_id = $3
            "#,
        )
        .bind(business_id)
        .bind(customer_id)
        .bind(tag_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows_affected > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "customer_tags", db.operation = "select"))]
    pub async fn list_for_customer(
        &self,
        business_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Vec<CustomerTag>, AppError> {
        let tags = sqlx::query_as::<Postgres, CustomerTag>(&format!(
            r#"
            SELECT {TAG_COLUMNS} FROM customer_tags t
            JOIN customer_tag_assignments a ON a.tag_id = t.id
            WHERE t.business_id = $1 AND a.customer_id = $2
            ORDER BY t.name ASC
            "#,
        ))
        .bind(business_id)
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }
}
