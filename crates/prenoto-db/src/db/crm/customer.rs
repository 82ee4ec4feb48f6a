use prenoto_core::{
    models::{CreateCustomerRequest, Customer, UpdateCustomerRequest},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const CUSTOMER_COLUMNS: &str =
    "id, business_id, name, phone, email, notes, created_at, updated_at";

/// Repository for customer records.
#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find-or-create a customer by the exact `(business_id, phone)` pair.
    ///
    /// Identity is the raw phone string as entered; no normalization is
    /// applied before lookup or storage. The upsert is a single conditional
    /// insert, so two near-simultaneous submissions of the same new phone
    /// resolve to one row. An existing row keeps its stored name/email —
    /// the booking form is not allowed to silently rename a known customer.
    #[tracing::instrument(skip(self, name, email), fields(db.table = "customers", db.operation = "upsert"))]
    pub async fn resolve_by_phone(
        &self,
        business_id: Uuid,
        phone: &str,
        name: &str,
        email: Option<&str>,
    ) -> Result<Uuid, AppError> {
        // The no-op DO UPDATE makes RETURNING yield the surviving row on
        // conflict as well as on insert.
        let customer_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO customers (business_id, name, phone, email)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (business_id, phone)
            DO UPDATE SET updated_at = customers.updated_at
            RETURNING id
            "#,
        )
        .bind(business_id)
        .bind(name)
        .bind(phone)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(customer_id)
    }

    /// Explicit creation from the dashboard; duplicate phone is an error
    /// here, not a silent merge.
    #[tracing::instrument(skip(self, request), fields(db.table = "customers", db.operation = "insert"))]
    pub async fn create(
        &self,
        business_id: Uuid,
        request: &CreateCustomerRequest,
    ) -> Result<Customer, AppError> {
        let customer = sqlx::query_as::<Postgres, Customer>(&format!(
            r#"
            INSERT INTO customers (business_id, name, phone, email, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CUSTOMER_COLUMNS}
            "#,
        ))
        .bind(business_id)
        .bind(&request.name)
        .bind(&request.phone)
        .bind(request.email.as_deref())
        .bind(request.notes.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(format!(
                "A customer with phone {} already exists",
                request.phone
            )),
            _ => AppError::from(e),
        })?;

        Ok(customer)
    }

    #[tracing::instrument(skip(self), fields(db.table = "customers", db.operation = "select", db.record_id = %id))]
    pub async fn get(&self, business_id: Uuid, id: Uuid) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<Postgres, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE business_id = $1 AND id = $2",
        ))
        .bind(business_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// List customers, optionally filtered by a case-insensitive name match
    /// or phone substring.
    #[tracing::instrument(skip(self), fields(db.table = "customers", db.operation = "select"))]
    pub async fn list(
        &self,
        business_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<Customer>, AppError> {
        let customers = match search {
            Some(query) if !query.is_empty() => {
                let pattern = format!("%{}%", query);
                sqlx::query_as::<Postgres, Customer>(&format!(
                    "SELECT {CUSTOMER_COLUMNS} FROM customers \
                     WHERE business_id = $1 AND (name ILIKE $2 OR phone LIKE $2) \
                     ORDER BY name ASC",
                ))
                .bind(business_id)
                .bind(pattern)
                .fetch_all(&self.pool)
                .await?
            }
            _ => {
                sqlx::query_as::<Postgres, Customer>(&format!(
                    "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE business_id = $1 ORDER BY name ASC",
                ))
                .bind(business_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(customers)
    }

    /// Customers carrying a given tag, for campaign recipient selection.
    #[tracing::instrument(skip(self), fields(db.table = "customers", db.operation = "select"))]
    pub async fn list_by_tag(
        &self,
        business_id: Uuid,
        tag_id: Uuid,
    ) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<Postgres, Customer>(&format!(
            r#"
            SELECT {CUSTOMER_COLUMNS} FROM customers c
            WHERE c.business_id = $1
              AND EXISTS (
                  SELECT 1 FROM customer_tag_assignments a
                  WHERE a.customer_id = c.id AND a.tag_id = $2
              )
            ORDER BY c.name ASC
            "#,
        ))
        .bind(business_id)
        .bind(tag_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Update name/email/notes; the phone is the identity key and is not
    /// editable here.
    #[tracing::instrument(skip(self, request), fields(db.table = "customers", db.operation = "update", db.record_id = %id))]
    pub async fn update(
        &self,
        business_id: Uuid,
        id: Uuid,
        request: &UpdateCustomerRequest,
    ) -> Result<Customer, AppError> {
        let customer = sqlx::query_as::<Postgres, Customer>(&format!(
            r#"
            UPDATE customers SET
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                notes = COALESCE($5, notes),
                updated_at = NOW()
            WHERE business_id = $1 AND id = $2
            RETURNING {CUSTOMER_COLUMNS}
            "#,
        ))
        .bind(business_id)
        .bind(id)
        .bind(request.name.as_deref())
        .bind(request.email.as_deref())
        .bind(request.notes.as_deref())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;

        Ok(customer)
    }

    #[tracing::instrument(skip(self), fields(db.table = "customers", db.operation = "delete", db.record_id = %id))]
    pub async fn delete(&self, business_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let rows_affected = sqlx::query("DELETE FROM customers WHERE business_id = $1 AND id = $2")
            .bind(business_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => AppError::Conflict(
                    "Customer has bookings or quotes and cannot be deleted".to_string(),
                ),
                _ => AppError::from(e),
            })?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "customers", db.operation = "select"))]
    pub async fn count(&self, business_id: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE business_id = $1")
            .bind(business_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
