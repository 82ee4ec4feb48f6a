use prenoto_core::{
    models::{CreateStaffRequest, StaffMember, UpdateStaffRequest},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const STAFF_COLUMNS: &str = "id, business_id, name, email, phone, is_active, created_at, updated_at";

/// Repository for staff members.
#[derive(Clone)]
pub struct StaffRepository {
    pool: PgPool,
}

impl StaffRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, request), fields(db.table = "staff", db.operation = "insert"))]
    pub async fn create(
        &self,
        business_id: Uuid,
        request: &CreateStaffRequest,
    ) -> Result<StaffMember, AppError> {
        let member = sqlx::query_as::<Postgres, StaffMember>(&format!(
            r#"
            INSERT INTO staff (business_id, name, email, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING {STAFF_COLUMNS}
            "#,
        ))
        .bind(business_id)
        .bind(&request.name)
        .bind(request.email.as_deref())
        .bind(request.phone.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(member)
    }

    #[tracing::instrument(skip(self), fields(db.table = "staff", db.operation = "select", db.record_id = %id))]
    pub async fn get(&self, business_id: Uuid, id: Uuid) -> Result<Option<StaffMember>, AppError> {
        let member = sqlx::query_as::<Postgres, StaffMember>(&format!(
            "SELECT {STAFF_COLUMNS} FROM staff WHERE business_id = $1 AND id = $2",
        ))
        .bind(business_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    #[tracing::instrument(skip(self), fields(db.table = "staff", db.operation = "select"))]
    pub async fn list(
        &self,
        business_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<StaffMember>, AppError> {
        let members = if active_only {
            sqlx::query_as::<Postgres, StaffMember>(&format!(
                "SELECT {STAFF_COLUMNS} FROM staff WHERE business_id = $1 AND is_active ORDER BY name ASC",
            ))
            .bind(business_id)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<Postgres, StaffMember>(&format!(
                "SELECT {STAFF_COLUMNS} FROM staff WHERE business_id = $1 ORDER BY name ASC",
            ))
            .bind(business_id)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(members)
    }

    #[tracing::instrument(skip(self, request), fields(db.table = "staff", db.operation = "update", db.record_id = %id))]
    pub async fn update(
        &self,
        business_id: Uuid,
        id: Uuid,
        request: &UpdateStaffRequest,
    ) -> Result<StaffMember, AppError> {
        let member = sqlx::query_as::<Postgres, StaffMember>(&format!(
            r#"
            UPDATE staff SET
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
            WHERE business_id = $1 AND id = $2
            RETURNING {STAFF_COLUMNS}
            "#,
        ))
        .bind(business_id)
        .bind(id)
        .bind(request.name.as_deref())
        .bind(request.email.as_deref())
        .bind(request.phone.as_deref())
        .bind(request.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Staff member not found".to_string()))?;

        Ok(member)
    }

    #[tracing::instrument(skip(self), fields(db.table = "staff", db.operation = "update", db.record_id = %id))]
    pub async fn deactivate(&self, business_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let rows_affected = sqlx::query(
            "UPDATE staff SET is_active = FALSE, updated_at = NOW() \
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
