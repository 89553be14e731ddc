//! PostgreSQL implementation of PurchaseRepository.
//!
//! Owns the two multi-row units of work in the payment lifecycle:
//! purchase creation (listing hold + transaction + payment) and webhook
//! reconciliation (status overwrites + listing action). Each runs in a
//! single database transaction so partial writes never become visible.

use crate::domain::foundation::{
    DomainError, ErrorCode, ListingId, Timestamp, TransactionId, UniversityId, UserId,
};
use crate::domain::marketplace::{
    Listing, ListingAction, ListingCategory, ListingCondition, ListingStatus, OrderId, Payment,
    PaymentMethod, StatusOutcome, Transaction,
};
use crate::ports::{AppliedReconciliation, PurchaseRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the PurchaseRepository port.
///
/// Uses sqlx for type-safe database operations with connection pooling.
pub struct PostgresPurchaseRepository {
    pool: PgPool,
}

impl PostgresPurchaseRepository {
    /// Creates a new PostgresPurchaseRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a listing.
#[derive(Debug, sqlx::FromRow)]
struct ListingRow {
    id: Uuid,
    seller_id: String,
    university_id: Uuid,
    title: String,
    description: String,
    price: i64,
    category: String,
    condition: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ListingRow> for Listing {
    type Error = DomainError;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        let category = parse_category(&row.category)?;
        let condition = parse_condition(&row.condition)?;
        let status = parse_listing_status(&row.status)?;

        Ok(Listing {
            id: ListingId::from_uuid(row.id),
            seller_id: UserId::new(row.seller_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid seller_id: {}", e))
            })?,
            university_id: UniversityId::from_uuid(row.university_id),
            title: row.title,
            description: row.description,
            price: row.price,
            category,
            condition,
            status,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

/// Row locating the payment and transaction behind an order id.
#[derive(Debug, sqlx::FromRow)]
struct OrderLookupRow {
    payment_id: Uuid,
    transaction_id: Uuid,
    listing_id: Uuid,
}

fn parse_category(s: &str) -> Result<ListingCategory, DomainError> {
    match s {
        "BOOKS" => Ok(ListingCategory::Books),
        "ELECTRONICS" => Ok(ListingCategory::Electronics),
        "CLOTHING" => Ok(ListingCategory::Clothing),
        "FURNITURE" => Ok(ListingCategory::Furniture),
        "SUPPLIES" => Ok(ListingCategory::Supplies),
        "TICKETS" => Ok(ListingCategory::Tickets),
        "OTHER" => Ok(ListingCategory::Other),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid category value: {}", s),
        )),
    }
}

fn parse_condition(s: &str) -> Result<ListingCondition, DomainError> {
    match s {
        "NEW" => Ok(ListingCondition::New),
        "LIKE_NEW" => Ok(ListingCondition::LikeNew),
        "GOOD" => Ok(ListingCondition::Good),
        "FAIR" => Ok(ListingCondition::Fair),
        "WORN" => Ok(ListingCondition::Worn),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid condition value: {}", s),
        )),
    }
}

fn parse_listing_status(s: &str) -> Result<ListingStatus, DomainError> {
    match s {
        "DRAFT" => Ok(ListingStatus::Draft),
        "ACTIVE" => Ok(ListingStatus::Active),
        "ON_HOLD" => Ok(ListingStatus::OnHold),
        "SOLD" => Ok(ListingStatus::Sold),
        "DELETED" => Ok(ListingStatus::Deleted),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid listing status value: {}", s),
        )),
    }
}

fn method_to_string(method: &PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Direct => "DIRECT",
        PaymentMethod::Gateway => "GATEWAY",
    }
}

#[async_trait]
impl PurchaseRepository for PostgresPurchaseRepository {
    async fn find_listing(&self, id: &ListingId) -> Result<Option<Listing>, DomainError> {
        let row: Option<ListingRow> = sqlx::query_as(
            r#"
            SELECT id, seller_id, university_id, title, description, price,
                   category, condition, status, created_at, updated_at
            FROM listings
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find listing: {}", e))
        })?;

        row.map(Listing::try_from).transpose()
    }

    async fn create_purchase(
        &self,
        transaction: &Transaction,
        payment: &Payment,
    ) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to begin transaction: {}", e))
        })?;

        // Gateway purchases hold the listing for the checkout window.
        // The guard doubles as the lost-race check: a second buyer's
        // hold finds the row no longer ACTIVE and aborts the whole unit.
        if transaction.payment_method.holds_listing() {
            hold_listing(&mut tx, &transaction.listing_id).await?;
        }

        insert_transaction(&mut tx, transaction).await?;
        insert_payment(&mut tx, payment).await?;

        tx.commit().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to commit purchase: {}", e))
        })?;

        Ok(())
    }

    async fn apply_outcome(
        &self,
        order_id: &OrderId,
        outcome: &StatusOutcome,
    ) -> Result<Option<AppliedReconciliation>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to begin transaction: {}", e))
        })?;

        let row: Option<OrderLookupRow> = sqlx::query_as(
            r#"
            SELECT p.id AS payment_id, p.transaction_id, t.listing_id
            FROM payments p
            JOIN transactions t ON t.id = p.transaction_id
            WHERE p.external_order_id = $1
            "#,
        )
        .bind(order_id.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find order: {}", e))
        })?;

        let Some(row) = row else {
            return Ok(None);
        };

        let now = Utc::now();

        // Plain overwrites: the gateway's view wins, whatever was there
        sqlx::query("UPDATE payments SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(row.payment_id)
            .bind(outcome.payment_status.as_str())
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Failed to update payment: {}", e))
            })?;

        sqlx::query("UPDATE transactions SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(row.transaction_id)
            .bind(outcome.transaction_status.as_str())
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to update transaction: {}", e),
                )
            })?;

        let listing_action = outcome.listing_action();
        let listing_id = ListingId::from_uuid(row.listing_id);
        match listing_action {
            ListingAction::MarkSold => mark_listing_sold(&mut tx, &listing_id).await?,
            ListingAction::ReleaseHold => release_listing_hold(&mut tx, &listing_id).await?,
            ListingAction::NoChange => {}
        }

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit reconciliation: {}", e),
            )
        })?;

        Ok(Some(AppliedReconciliation {
            transaction_id: TransactionId::from_uuid(row.transaction_id),
            payment_status: outcome.payment_status,
            transaction_status: outcome.transaction_status,
            listing_action,
        }))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Helper Functions
// ════════════════════════════════════════════════════════════════════════════════

/// Place a checkout hold on a listing.
///
/// Guarded: only an ACTIVE listing can be held. Zero affected rows
/// means the listing was sold, held, or removed since the precondition
/// check, and the purchase must abort.
async fn hold_listing(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    listing_id: &ListingId,
) -> Result<(), DomainError> {
    let result = sqlx::query(
        r#"
        UPDATE listings SET status = 'ON_HOLD', updated_at = $2
        WHERE id = $1 AND status = 'ACTIVE'
        "#,
    )
    .bind(listing_id.as_uuid())
    .bind(Utc::now())
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to hold listing: {}", e))
    })?;

    if result.rows_affected() == 0 {
        return Err(DomainError::new(
            ErrorCode::InvalidStateTransition,
            "Listing is not available for purchase",
        ));
    }

    Ok(())
}

async fn insert_transaction(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    transaction: &Transaction,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO transactions (
            id, buyer_id, seller_id, listing_id, amount, status,
            payment_method, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(transaction.id.as_uuid())
    .bind(transaction.buyer_id.as_str())
    .bind(transaction.seller_id.as_str())
    .bind(transaction.listing_id.as_uuid())
    .bind(transaction.amount)
    .bind(transaction.status.as_str())
    .bind(method_to_string(&transaction.payment_method))
    .bind(transaction.created_at.as_datetime())
    .bind(transaction.updated_at.as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to insert transaction: {}", e))
    })?;

    Ok(())
}

async fn insert_payment(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    payment: &Payment,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO payments (
            id, transaction_id, amount, status, external_order_id,
            gateway_token, redirect_url, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(payment.id.as_uuid())
    .bind(payment.transaction_id.as_uuid())
    .bind(payment.amount)
    .bind(payment.status.as_str())
    .bind(payment.external_order_id.as_str())
    .bind(&payment.gateway_token)
    .bind(&payment.redirect_url)
    .bind(payment.created_at.as_datetime())
    .bind(payment.updated_at.as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to insert payment: {}", e))
    })?;

    Ok(())
}

/// Mark a listing sold after a settled payment.
///
/// Guarded: applies from ACTIVE or ON_HOLD. Zero affected rows is not
/// an error; a redelivered settlement finds the listing already SOLD.
async fn mark_listing_sold(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    listing_id: &ListingId,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        UPDATE listings SET status = 'SOLD', updated_at = $2
        WHERE id = $1 AND status IN ('ACTIVE', 'ON_HOLD')
        "#,
    )
    .bind(listing_id.as_uuid())
    .bind(Utc::now())
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to mark listing sold: {}", e))
    })?;

    Ok(())
}

/// Release a checkout hold after a cancel-class outcome.
///
/// Guarded: only ON_HOLD goes back to ACTIVE. SOLD and DELETED rows are
/// never touched, and direct-route listings were never held.
async fn release_listing_hold(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    listing_id: &ListingId,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        UPDATE listings SET status = 'ACTIVE', updated_at = $2
        WHERE id = $1 AND status = 'ON_HOLD'
        "#,
    )
    .bind(listing_id.as_uuid())
    .bind(Utc::now())
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to release listing hold: {}", e))
    })?;

    Ok(())
}
