use prenoto_core::{
    models::{CreateServiceRequest, Service, UpdateServiceRequest},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const SERVICE_COLUMNS: &str =
    "id, business_id, name, description, duration_minutes, price, is_active, created_at, updated_at";

/// Repository for the service catalog.
#[derive(Clone)]
pub struct ServiceRepository {
    pool: PgPool,
}

impl ServiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, request), fields(db.table = "services", db.operation = "insert"))]
    pub async fn create(
        &self,
        business_id: Uuid,
        request: &CreateServiceRequest,
    ) -> Result<Service, AppError> {
        let service = sqlx::query_as::<Postgres, Service>(&format!(
            r#"
            INSERT INTO services (business_id, name, description, duration_minutes, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {SERVICE_COLUMNS}
            "#,
        ))
        .bind(business_id)
        .bind(&request.name)
        .bind(request.description.as_deref())
        .bind(request.duration_minutes)
        .bind(request.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(service)
    }

    #[tracing::instrument(skip(self), fields(db.table = "services", db.operation = "select", db.record_id = %id))]
    pub async fn get(&self, business_id: Uuid, id: Uuid) -> Result<Option<Service>, AppError> {
        let service = sqlx::query_as::<Postgres, Service>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services WHERE business_id = $1 AND id = $2",
        ))
        .bind(business_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(service)
    }

    /// Active services for the public page, cheapest first (the way the
    /// booking page lists them); the dashboard sees everything by name.
    #[tracing::instrument(skip(self), fields(db.table = "services", db.operation = "select"))]
    pub async fn list(
        &self,
        business_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<Service>, AppError> {
        let services = if active_only {
            sqlx::query_as::<Postgres, Service>(&format!(
                "SELECT {SERVICE_COLUMNS} FROM services \
                 WHERE business_id = $1 AND is_active ORDER BY price ASC, name ASC",
            ))
            .bind(business_id)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<Postgres, Service>(&format!(
                "SELECT {SERVICE_COLUMNS} FROM services WHERE business_id = $1 ORDER BY name ASC",
            ))
            .bind(business_id)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(services)
    }

    #[tracing::instrument(skip(self, request), fields(db.table = "services", db.operation = "update", db.record_id = %id))]
    pub async fn update(
        &self,
        business_id: Uuid,
        id: Uuid,
        request: &UpdateServiceRequest,
    ) -> Result<Service, AppError> {
        let service = sqlx::query_as::<Postgres, Service>(&format!(
            r#"
            UPDATE services SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                duration_minutes = COALESCE($5, duration_minutes),
                price = COALESCE($6, price),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE business_id = $1 AND id = $2
            RETURNING {SERVICE_COLUMNS}
            "#,
        ))
        .bind(business_id)
        .bind(id)
        .bind(request.name.as_deref())
        .bind(request.description.as_deref())
        .bind(request.duration_minutes)
        .bind(request.price)
        .bind(request.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;

        Ok(service)
    }

    /// Soft delete: bookings keep their reference, the public page stops
    /// offering it.
    #[tracing::instrument(skip(self), fields(db.table = "services", db.operation = "update", db.record_id = %id))]
    pub async fn deactivate(&self, business_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let rows_affected = sqlx::query(
            "UPDATE services SET is_active = FALSE, updated_at = NOW() \
             WHERE business_id = $1 AND id = $2",
        )
        .bind(business_id)
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows_affected > 0)
    }
}
