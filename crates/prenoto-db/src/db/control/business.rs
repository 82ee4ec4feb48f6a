use prenoto_core::{
    models::{Business, UpdateBusinessRequest},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const BUSINESS_COLUMNS: &str = "id, owner_user_id, name, slug, business_type, description, email, \
     phone, address, city, zip_code, is_active, created_at, updated_at";

/// Repository for business (tenant) rows.
#[derive(Clone)]
pub struct BusinessRepository {
    pool: PgPool,
}

impl BusinessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new business with its default settings, atomically.
    ///
    /// One business per identity-provider subject; a second registration for
    /// the same owner, or a slug collision, surfaces as a conflict.
    #[tracing::instrument(skip(self), fields(db.table = "businesses", db.operation = "insert"))]
    pub async fn register(
        &self,
        owner_user_id: Uuid,
        name: &str,
        slug: &str,
        business_type: &str,
        phone: Option<&str>,
        city: Option<&str>,
    ) -> Result<Business, AppError> {
        let mut tx = self.pool.begin().await?;

        let business = sqlx::query_as::<Postgres, Business>(&format!(
            r#"
            INSERT INTO businesses (owner_user_id, name, slug, business_type, phone, city)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {BUSINESS_COLUMNS}
            "#,
        ))
        .bind(owner_user_id)
        .bind(name)
        .bind(slug)
        .bind(business_type)
        .bind(phone)
        .bind(city)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("A business with this slug or owner already exists".to_string())
            }
            _ => AppError::from(e),
        })?;

        sqlx::query("INSERT INTO business_settings (business_id) VALUES ($1)")
            .bind(business.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(business)
    }

    /// Resolve a public booking slug to an active business.
    #[tracing::instrument(skip(self), fields(db.table = "businesses", db.operation = "select"))]
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Business>, AppError> {
        let business = sqlx::query_as::<Postgres, Business>(&format!(
            "SELECT {BUSINESS_COLUMNS} FROM businesses WHERE slug = $1 AND is_active",
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(business)
    }

    /// Resolve an authenticated user to their business.
    #[tracing::instrument(skip(self), fields(db.table = "businesses", db.operation = "select"))]
    pub async fn find_by_owner(&self, owner_user_id: Uuid) -> Result<Option<Business>, AppError> {
        let business = sqlx::query_as::<Postgres, Business>(&format!(
            "SELECT {BUSINESS_COLUMNS} FROM businesses WHERE owner_user_id = $1",
        ))
        .bind(owner_user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(business)
    }

    /// Update profile fields. Absent fields are left unchanged; the slug is
    /// immutable (it lives in shared links).
    #[tracing::instrument(skip(self, request), fields(db.table = "businesses", db.operation = "update", db.record_id = %business_id))]
    pub async fn update_profile(
        &self,
        business_id: Uuid,
        request: &UpdateBusinessRequest,
    ) -> Result<Business, AppError> {
        let business = sqlx::query_as::<Postgres, Business>(&format!(
            r#"
            UPDATE businesses SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                address = COALESCE($6, address),
                city = COALESCE($7, city),
                zip_code = COALESCE($8, zip_code),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BUSINESS_COLUMNS}
            "#,
        ))
        .bind(business_id)
        .bind(request.name.as_deref())
        .bind(request.description.as_deref())
        .bind(request.email.as_deref())
        .bind(request.phone.as_deref())
        .bind(request.address.as_deref())
        .bind(request.city.as_deref())
        .bind(request.zip_code.as_deref())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Business not found".to_string()))?;

        Ok(business)
    }
}
