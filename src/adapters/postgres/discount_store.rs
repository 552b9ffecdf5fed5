//! PostgreSQL implementation of the PlanStore and ProductPriceStore ports.
//!
//! Lifecycle commits run as sqlx transactions so the status flip and the
//! product discount writes land together or not at all. The status guard
//! in the UPDATE (`WHERE status = 'scheduled'` / `'active'`) doubles as a
//! concurrency check: a plan already moved by another process makes the
//! flip affect zero rows and the commit is rejected without side effects.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, ErrorCode, PlanId, ProductId, StoreId, Timestamp, UserId,
};
use crate::domain::plans::{
    Discount, DiscountPlan, DiscountType, PlanStatus, ProductDiscount, ProductPricing,
};
use crate::ports::{PlanStore, ProductPriceStore};

/// PostgreSQL implementation of the discount plan stores.
///
/// Uses sqlx for type-safe database operations with connection pooling.
pub struct PostgresDiscountStore {
    pool: PgPool,
}

impl PostgresDiscountStore {
    /// Creates a new PostgresDiscountStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a discount plan.
#[derive(Debug, sqlx::FromRow)]
struct PlanRow {
    id: Uuid,
    store_id: Uuid,
    name: String,
    discount_type: String,
    discount_value: i64,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    status: String,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PlanRow> for DiscountPlan {
    type Error = DomainError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        let kind = parse_discount_type(&row.discount_type)?;
        let status = parse_status(&row.status)?;
        let discount = Discount::new(kind, row.discount_value).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid stored discount: {}", e),
            )
        })?;

        Ok(DiscountPlan {
            id: PlanId::from_uuid(row.id),
            store_id: StoreId::from_uuid(row.store_id),
            name: row.name,
            discount,
            start_date: Timestamp::from_datetime(row.start_date),
            end_date: Timestamp::from_datetime(row.end_date),
            status,
            created_by: UserId::from_uuid(row.created_by),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

/// Database row representation of the product pricing view.
#[derive(Debug, sqlx::FromRow)]
struct PricingRow {
    id: Uuid,
    price: i64,
    discounted_price: Option<i64>,
    discount_plan_id: Option<Uuid>,
}

impl From<PricingRow> for ProductPricing {
    fn from(row: PricingRow) -> Self {
        ProductPricing {
            product_id: ProductId::from_uuid(row.id),
            price: row.price,
            discounted_price: row.discounted_price,
            plan_id: row.discount_plan_id.map(PlanId::from_uuid),
        }
    }
}

fn parse_discount_type(s: &str) -> Result<DiscountType, DomainError> {
    match s.to_lowercase().as_str() {
        "percentage" => Ok(DiscountType::Percentage),
        "fixed" => Ok(DiscountType::Fixed),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid discount type value: {}", s),
        )),
    }
}

fn parse_status(s: &str) -> Result<PlanStatus, DomainError> {
    match s.to_lowercase().as_str() {
        "scheduled" => Ok(PlanStatus::Scheduled),
        "active" => Ok(PlanStatus::Active),
        "expired" => Ok(PlanStatus::Expired),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid status value: {}", s),
        )),
    }
}

fn discount_type_to_string(kind: DiscountType) -> &'static str {
    match kind {
        DiscountType::Percentage => "percentage",
        DiscountType::Fixed => "fixed",
    }
}

fn status_to_string(status: PlanStatus) -> &'static str {
    match status {
        PlanStatus::Scheduled => "scheduled",
        PlanStatus::Active => "active",
        PlanStatus::Expired => "expired",
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

const PLAN_COLUMNS: &str = "id, store_id, name, discount_type, discount_value, \
     start_date, end_date, status, created_by, created_at, updated_at";

#[async_trait]
impl PlanStore for PostgresDiscountStore {
    async fn insert(&self, plan: &DiscountPlan) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO discount_plans (
                id, store_id, name, discount_type, discount_value,
                start_date, end_date, status, created_by, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(plan.id.as_uuid())
        .bind(plan.store_id.as_uuid())
        .bind(&plan.name)
        .bind(discount_type_to_string(plan.discount.kind()))
        .bind(plan.discount.value())
        .bind(plan.start_date.as_datetime())
        .bind(plan.end_date.as_datetime())
        .bind(status_to_string(plan.status))
        .bind(plan.created_by.as_uuid())
        .bind(plan.created_at.as_datetime())
        .bind(plan.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert plan", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: PlanId) -> Result<Option<DiscountPlan>, DomainError> {
        let row: Option<PlanRow> = sqlx::query_as(&format!(
            "SELECT {} FROM discount_plans WHERE id = $1",
            PLAN_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find plan", e))?;

        row.map(DiscountPlan::try_from).transpose()
    }

    async fn due_for_activation(&self, now: Timestamp) -> Result<Vec<DiscountPlan>, DomainError> {
        let rows: Vec<PlanRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM discount_plans
            WHERE status = 'scheduled' AND start_date <= $1
            ORDER BY start_date ASC, id ASC
            "#,
            PLAN_COLUMNS
        ))
        .bind(now.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list plans due for activation", e))?;

        rows.into_iter().map(DiscountPlan::try_from).collect()
    }

    async fn due_for_expiry(&self, now: Timestamp) -> Result<Vec<DiscountPlan>, DomainError> {
        let rows: Vec<PlanRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM discount_plans
            WHERE status = 'active' AND end_date < $1
            ORDER BY end_date ASC, id ASC
            "#,
            PLAN_COLUMNS
        ))
        .bind(now.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list plans due for expiry", e))?;

        rows.into_iter().map(DiscountPlan::try_from).collect()
    }

    async fn member_product_ids(&self, plan_id: PlanId) -> Result<Vec<ProductId>, DomainError> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT product_id FROM plan_products WHERE plan_id = $1 ORDER BY product_id",
        )
        .bind(plan_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list plan products", e))?;

        Ok(ids.into_iter().map(ProductId::from_uuid).collect())
    }

    async fn commit_activation(
        &self,
        plan_id: PlanId,
        discounts: &[ProductDiscount],
        now: Timestamp,
    ) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let flipped = sqlx::query(
            r#"
            UPDATE discount_plans
            SET status = 'active', updated_at = $2
            WHERE id = $1 AND status = 'scheduled'
            "#,
        )
        .bind(plan_id.as_uuid())
        .bind(now.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to activate plan", e))?;

        if flipped.rows_affected() == 0 {
            drop(tx);
            return Err(self.rejection_reason(plan_id).await);
        }

        for discount in discounts {
            sqlx::query(
                r#"
                UPDATE products
                SET discounted_price = $2, discount_plan_id = $3
                WHERE id = $1
                "#,
            )
            .bind(discount.product_id.as_uuid())
            .bind(discount.discounted_price)
            .bind(plan_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to apply discount", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit activation", e))
    }

    async fn commit_expiry(
        &self,
        plan_id: PlanId,
        members: &[ProductId],
        now: Timestamp,
    ) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let flipped = sqlx::query(
            r#"
            UPDATE discount_plans
            SET status = 'expired', updated_at = $2
            WHERE id = $1 AND status = 'active'
            "#,
        )
        .bind(plan_id.as_uuid())
        .bind(now.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to expire plan", e))?;

        if flipped.rows_affected() == 0 {
            drop(tx);
            return Err(self.rejection_reason(plan_id).await);
        }

        let member_uuids: Vec<Uuid> = members.iter().map(|p| *p.as_uuid()).collect();

        // Ownership guard: only rows this plan still owns are cleared.
        sqlx::query(
            r#"
            UPDATE products
            SET discounted_price = NULL, discount_plan_id = NULL
            WHERE id = ANY($1) AND discount_plan_id = $2
            "#,
        )
        .bind(&member_uuids)
        .bind(plan_id.as_uuid())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to clear discounts", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit expiry", e))
    }

    async fn attach_product(
        &self,
        plan_id: PlanId,
        product_id: ProductId,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO plan_products (plan_id, product_id)
            VALUES ($1, $2)
            ON CONFLICT (plan_id, product_id) DO NOTHING
            "#,
        )
        .bind(plan_id.as_uuid())
        .bind(product_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to attach product", e))?;

        Ok(())
    }

    async fn detach_product(
        &self,
        plan_id: PlanId,
        product_id: ProductId,
    ) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM plan_products WHERE plan_id = $1 AND product_id = $2")
            .bind(plan_id.as_uuid())
            .bind(product_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to detach product", e))?;

        Ok(())
    }

    async fn delete(&self, plan_id: PlanId) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        sqlx::query("DELETE FROM plan_products WHERE plan_id = $1")
            .bind(plan_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to delete plan products", e))?;

        let result = sqlx::query("DELETE FROM discount_plans WHERE id = $1")
            .bind(plan_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to delete plan", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::PlanNotFound, "Plan not found"));
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit delete", e))
    }
}

impl PostgresDiscountStore {
    /// Distinguish a missing plan from a plan in the wrong state after a
    /// guarded status flip matched zero rows.
    async fn rejection_reason(&self, plan_id: PlanId) -> DomainError {
        let status: Result<Option<String>, _> =
            sqlx::query_scalar("SELECT status FROM discount_plans WHERE id = $1")
                .bind(plan_id.as_uuid())
                .fetch_optional(&self.pool)
                .await;

        match status {
            Ok(Some(current)) => DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Plan {} is {}, not eligible for transition", plan_id, current),
            ),
            Ok(None) => DomainError::new(ErrorCode::PlanNotFound, "Plan not found"),
            Err(e) => db_error("Failed to read plan status", e),
        }
    }
}

#[async_trait]
impl ProductPriceStore for PostgresDiscountStore {
    async fn price_of(&self, product_id: ProductId) -> Result<Option<i64>, DomainError> {
        sqlx::query_scalar("SELECT price FROM products WHERE id = $1")
            .bind(product_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to read product price", e))
    }

    async fn pricing_of(
        &self,
        product_id: ProductId,
    ) -> Result<Option<ProductPricing>, DomainError> {
        let row: Option<PricingRow> = sqlx::query_as(
            "SELECT id, price, discounted_price, discount_plan_id FROM products WHERE id = $1",
        )
        .bind(product_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to read product pricing", e))?;

        Ok(row.map(ProductPricing::from))
    }

    async fn set_discount(
        &self,
        product_id: ProductId,
        discounted_price: i64,
        owner: PlanId,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET discounted_price = $2, discount_plan_id = $3
            WHERE id = $1
            "#,
        )
        .bind(product_id.as_uuid())
        .bind(discounted_price)
        .bind(owner.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to set discount", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ProductNotFound,
                "Product not found",
            ));
        }

        Ok(())
    }

    async fn clear_discount_if_owned_by(
        &self,
        product_id: ProductId,
        plan: PlanId,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET discounted_price = NULL, discount_plan_id = NULL
            WHERE id = $1 AND discount_plan_id = $2
            "#,
        )
        .bind(product_id.as_uuid())
        .bind(plan.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to clear discount", e))?;

        Ok(result.rows_affected() > 0)
    }
}
