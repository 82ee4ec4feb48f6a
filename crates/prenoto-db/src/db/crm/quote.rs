use chrono::{Datelike, NaiveDate};
use prenoto_core::{
    models::{CreateQuoteRequest, Quote, QuoteItem, QuoteStatus},
    AppError,
};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const QUOTE_COLUMNS: &str = "id, business_id, customer_id, quote_number, status, issue_date, \
     expiry_date, notes, subtotal, tax_rate, tax_amount, total, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, quote_id, description, quantity, unit_price, total, sort_order";

/// Repository for quotes and their line items.
#[derive(Clone)]
pub struct QuoteRepository {
    pool: PgPool,
}

impl QuoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a quote with its ordered items in one transaction.
    ///
    /// Totals are computed here, once, from the line items; the stored
    /// aggregate is never re-derived later. The quote number is sequential
    /// per business and year (`Q-2026-0042`); the unique index backstops a
    /// numbering race with a conflict error.
    #[tracing::instrument(skip(self, request), fields(db.table = "quotes", db.operation = "insert"))]
    pub async fn create_with_items(
        &self,
        business_id: Uuid,
        issue_date: NaiveDate,
        request: &CreateQuoteRequest,
    ) -> Result<Quote, AppError> {
        let customer_exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1 AND business_id = $2)",
        )
        .bind(request.customer_id)
        .bind(business_id)
        .fetch_one(&self.pool)
        .await?;
        if !customer_exists {
            return Err(AppError::NotFound("Customer not found".to_string()));
        }

        let subtotal = request.subtotal();
        let tax_rate = Decimal::ZERO;
        let tax_amount = Decimal::ZERO;
        let total = subtotal + tax_amount;
        let expiry_date = issue_date + chrono::Duration::days(request.expiry_days);

        let mut tx = self.pool.begin().await?;

        let sequence: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) + 1 FROM quotes \
             WHERE business_id = $1 AND EXTRACT(YEAR FROM issue_date) = $2",
        )
        .bind(business_id)
        .bind(issue_date.year() as i64)
        .fetch_one(&mut *tx)
        .await?;
        let quote_number = format!("Q-{}-{:04}", issue_date.year(), sequence);

        let quote = sqlx::query_as::<Postgres, Quote>(&format!(
            r#"
            INSERT INTO quotes (business_id, customer_id, quote_number, status, issue_date,
                                expiry_date, notes, subtotal, tax_rate, tax_amount, total)
            VALUES ($1, $2, $3, 'draft', $4, $5, $6, $7, $8, $9, $10)
            RETURNING {QUOTE_COLUMNS}
            "#,
        ))
        .bind(business_id)
        .bind(request.customer_id)
        .bind(&quote_number)
        .bind(issue_date)
        .bind(expiry_date)
        .bind(request.notes.as_deref())
        .bind(subtotal)
        .bind(tax_rate)
        .bind(tax_amount)
        .bind(total)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("Quote number collision, retry".to_string())
            }
            _ => AppError::from(e),
        })?;

        for (index, item) in request.items.iter().enumerate() {
            sqlx::query(
                "INSERT INTO quote_items (quote_id, description, quantity, unit_price, total, sort_order) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(quote.id)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.line_total())
            .bind(index as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(quote)
    }

    #[tracing::instrument(skip(self), fields(db.table = "quotes", db.operation = "select"))]
    pub async fn list(
        &self,
        business_id: Uuid,
        status: Option<QuoteStatus>,
    ) -> Result<Vec<Quote>, AppError> {
        let quotes = match status {
            Some(status) => {
                sqlx::query_as::<Postgres, Quote>(&format!(
                    "SELECT {QUOTE_COLUMNS} FROM quotes \
                     WHERE business_id = $1 AND status = $2 ORDER BY created_at DESC",
                ))
                .bind(business_id)
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<Postgres, Quote>(&format!(
                    "SELECT {QUOTE_COLUMNS} FROM quotes WHERE business_id = $1 ORDER BY created_at DESC",
                ))
                .bind(business_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(quotes)
    }

    #[tracing::instrument(skip(self), fields(db.table = "quotes", db.operation = "select", db.record_id = %id))]
    pub async fn get(&self, business_id: Uuid, id: Uuid) -> Result<Option<Quote>, AppError> {
        let quote = sqlx::query_as::<Postgres, Quote>(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes WHERE business_id = $1 AND id = $2",
        ))
        .bind(business_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quote)
    }

    #[tracing::instrument(skip(self), fields(db.table = "quote_items", db.operation = "select"))]
    pub async fn items(&self, quote_id: Uuid) -> Result<Vec<QuoteItem>, AppError> {
        let items = sqlx::query_as::<Postgres, QuoteItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM quote_items WHERE quote_id = $1 ORDER BY sort_order ASC",
        ))
        .bind(quote_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Guarded status write: only applies when the stored status still is
    /// `from`, so two dashboard tabs cannot both advance the same quote.
    #[tracing::instrument(skip(self), fields(db.table = "quotes", db.operation = "update", db.record_id = %id))]
    pub async fn update_status(
        &self,
        business_id: Uuid,
        id: Uuid,
        from: QuoteStatus,
        to: QuoteStatus,
    ) -> Result<Quote, AppError> {
        let quote = sqlx::query_as::<Postgres, Quote>(&format!(
            r#"
            UPDATE quotes SET status = $4, updated_at = NOW()
            WHERE business_id = $1 AND id = $2 AND status = $3
            RETURNING {QUOTE_COLUMNS}
            "#,
        ))
        .bind(business_id)
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Conflict("Quote status changed concurrently".to_string()))?;

        Ok(quote)
    }

    /// Drafts can be discarded; anything sent is kept for the record.
    #[tracing::instrument(skip(self), fields(db.table = "quotes", db.operation = "delete", db.record_id = %id))]
    pub async fn delete_draft(&self, business_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let rows_affected = sqlx::query(
            "DELETE FROM quotes WHERE business_id = $1 AND id = $2 AND status = 'draft'",
        )
        .bind(business_id)
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows_affected > 0)
    }

    /// Sum of accepted-quote totals in a date window, for the statistics
    /// summary.
    #[tracing::instrument(skip(self), fields(db.table = "quotes", db.operation = "select"))]
    pub async fn accepted_revenue(
        &self,
        business_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Decimal, AppError> {
        let revenue: Option<Decimal> = sqlx::query_scalar(
            "SELECT SUM(total) FROM quotes \
             WHERE business_id = $1 AND status = 'accepted' AND issue_date BETWEEN $2 AND $3",
        )
        .bind(business_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(revenue.unwrap_or(Decimal::ZERO))
    }
}
