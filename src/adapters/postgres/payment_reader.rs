//! PostgreSQL implementation of PaymentReader.
//!
//! Provides the read-optimized payment status query that backs the
//! polling endpoint.

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, TransactionId};
use crate::domain::marketplace::{OrderId, PaymentStatus, TransactionStatus};
use crate::ports::{PaymentReader, PaymentStatusView};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the PaymentReader port.
pub struct PostgresPaymentReader {
    pool: PgPool,
}

impl PostgresPaymentReader {
    /// Creates a new PostgresPaymentReader with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Row for payment status queries.
#[derive(Debug, sqlx::FromRow)]
struct PaymentStatusRow {
    transaction_id: Uuid,
    external_order_id: String,
    payment_status: String,
    transaction_status: String,
    amount: i64,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PaymentStatusRow> for PaymentStatusView {
    type Error = DomainError;

    fn try_from(row: PaymentStatusRow) -> Result<Self, Self::Error> {
        Ok(PaymentStatusView {
            transaction_id: TransactionId::from_uuid(row.transaction_id),
            order_id: OrderId::from_string(row.external_order_id),
            payment_status: parse_payment_status(&row.payment_status)?,
            transaction_status: parse_transaction_status(&row.transaction_status)?,
            amount: row.amount,
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn parse_payment_status(s: &str) -> Result<PaymentStatus, DomainError> {
    match s {
        "PENDING" => Ok(PaymentStatus::Pending),
        "SUCCESS" => Ok(PaymentStatus::Success),
        "FAILED" => Ok(PaymentStatus::Failed),
        "EXPIRED" => Ok(PaymentStatus::Expired),
        "REFUNDED" => Ok(PaymentStatus::Refunded),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid payment status value: {}", s),
        )),
    }
}

fn parse_transaction_status(s: &str) -> Result<TransactionStatus, DomainError> {
    match s {
        "PENDING" => Ok(TransactionStatus::Pending),
        "PAID" => Ok(TransactionStatus::Paid),
        "SHIPPED" => Ok(TransactionStatus::Shipped),
        "COMPLETED" => Ok(TransactionStatus::Completed),
        "CANCELLED" => Ok(TransactionStatus::Cancelled),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid transaction status value: {}", s),
        )),
    }
}

#[async_trait]
impl PaymentReader for PostgresPaymentReader {
    async fn find_by_transaction(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<Option<PaymentStatusView>, DomainError> {
        let row: Option<PaymentStatusRow> = sqlx::query_as(
            r#"
            SELECT p.transaction_id, p.external_order_id,
                   p.status AS payment_status, t.status AS transaction_status,
                   p.amount, p.updated_at
            FROM payments p
            JOIN transactions t ON t.id = p.transaction_id
            WHERE p.transaction_id = $1
            "#,
        )
        .bind(transaction_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find payment: {}", e))
        })?;

        row.map(PaymentStatusView::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_payment_status_works_for_all_values() {
        assert_eq!(parse_payment_status("PENDING").unwrap(), PaymentStatus::Pending);
        assert_eq!(parse_payment_status("SUCCESS").unwrap(), PaymentStatus::Success);
        assert_eq!(parse_payment_status("FAILED").unwrap(), PaymentStatus::Failed);
        assert_eq!(parse_payment_status("EXPIRED").unwrap(), PaymentStatus::Expired);
        assert_eq!(parse_payment_status("REFUNDED").unwrap(), PaymentStatus::Refunded);
    }

    #[test]
    fn parse_payment_status_rejects_invalid_values() {
        assert!(parse_payment_status("settlement").is_err());
        assert!(parse_payment_status("").is_err());
    }

    #[test]
    fn parse_transaction_status_works_for_all_values() {
        assert_eq!(parse_transaction_status("PENDING").unwrap(), TransactionStatus::Pending);
        assert_eq!(parse_transaction_status("PAID").unwrap(), TransactionStatus::Paid);
        assert_eq!(parse_transaction_status("SHIPPED").unwrap(), TransactionStatus::Shipped);
        assert_eq!(parse_transaction_status("COMPLETED").unwrap(), TransactionStatus::Completed);
        assert_eq!(parse_transaction_status("CANCELLED").unwrap(), TransactionStatus::Cancelled);
    }

    #[test]
    fn status_strings_match_domain_form() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Success,
            PaymentStatus::Failed,
            PaymentStatus::Expired,
            PaymentStatus::Refunded,
        ] {
            assert_eq!(parse_payment_status(status.as_str()).unwrap(), status);
        }

        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Paid,
            TransactionStatus::Shipped,
            TransactionStatus::Completed,
            TransactionStatus::Cancelled,
        ] {
            assert_eq!(parse_transaction_status(status.as_str()).unwrap(), status);
        }
    }
}
