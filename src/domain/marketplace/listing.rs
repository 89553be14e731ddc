//! Listing aggregate entity.
//!
//! A Listing is an item offered for sale within a university community.
//! Listings are created and edited by seller actions outside the payment
//! core; this service reads them and mutates their status during the
//! payment lifecycle.
//!
//! # Design Decisions
//!
//! - **Money in smallest currency unit**: prices stored as i64 (no floats)
//! - **ON_HOLD**: a gateway-routed purchase places a guarded hold on the
//!   listing so two buyers never both receive live checkout sessions
//! - **SOLD is reconciliation-only**: only a successful payment
//!   notification marks a listing sold

use crate::domain::foundation::{
    DomainError, ErrorCode, ListingId, StateMachine, Timestamp, UniversityId, UserId,
    ValidationError,
};
use serde::{Deserialize, Serialize};

/// Upper bound for a listing price in the smallest currency unit.
pub const MAX_LISTING_PRICE: i64 = 999_999_999;

/// What a listing is, per campus taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingCategory {
    Books,
    Electronics,
    Clothing,
    Furniture,
    Supplies,
    Tickets,
    Other,
}

/// Physical condition declared by the seller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingCondition {
    New,
    LikeNew,
    Good,
    Fair,
    Worn,
}

/// Listing lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    /// Seller is still editing; not visible to buyers.
    Draft,

    /// Visible and available for purchase.
    Active,

    /// A gateway checkout session is open for this listing.
    /// Released back to Active if the payment does not complete.
    OnHold,

    /// A payment settled; the item is no longer for sale.
    Sold,

    /// Removed by the seller or an admin.
    Deleted,
}

impl ListingStatus {
    /// Returns true if a purchase may be initiated against this status.
    pub fn is_purchasable(&self) -> bool {
        matches!(self, ListingStatus::Active)
    }

    /// Canonical string form, matching the stored column value.
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Draft => "DRAFT",
            ListingStatus::Active => "ACTIVE",
            ListingStatus::OnHold => "ON_HOLD",
            ListingStatus::Sold => "SOLD",
            ListingStatus::Deleted => "DELETED",
        }
    }
}

impl StateMachine for ListingStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ListingStatus::*;
        matches!(
            (self, target),
            // From DRAFT
            (Draft, Active)
                | (Draft, Deleted)
            // From ACTIVE
                | (Active, OnHold)
                | (Active, Sold)
                | (Active, Deleted)
            // From ON_HOLD
                | (OnHold, Active) // hold released
                | (OnHold, Sold)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ListingStatus::*;
        match self {
            Draft => vec![Active, Deleted],
            Active => vec![OnHold, Sold, Deleted],
            OnHold => vec![Active, Sold],
            Sold => vec![],
            Deleted => vec![],
        }
    }
}

/// Listing aggregate - an item offered for sale.
///
/// # Invariants
///
/// - `price` is positive and at most [`MAX_LISTING_PRICE`]
/// - At most one Transaction ever transitions a Listing to Sold
/// - Sold and Deleted are terminal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Unique identifier for this listing.
    pub id: ListingId,

    /// Seller offering the item.
    pub seller_id: UserId,

    /// University community the listing belongs to.
    pub university_id: UniversityId,

    /// Short item title.
    pub title: String,

    /// Free-form item description.
    pub description: String,

    /// Price in the smallest currency unit.
    pub price: i64,

    /// Item category.
    pub category: ListingCategory,

    /// Declared physical condition.
    pub condition: ListingCondition,

    /// Current lifecycle status.
    pub status: ListingStatus,

    /// When the listing was created.
    pub created_at: Timestamp,

    /// When the listing was last updated.
    pub updated_at: Timestamp,
}

impl Listing {
    /// Create a new active listing.
    ///
    /// # Errors
    ///
    /// Returns error if the title is empty or the price is out of range.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ListingId,
        seller_id: UserId,
        university_id: UniversityId,
        title: impl Into<String>,
        description: impl Into<String>,
        price: i64,
        category: ListingCategory,
        condition: ListingCondition,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        if price < 1 || price > MAX_LISTING_PRICE {
            return Err(ValidationError::out_of_range(
                "price",
                1,
                MAX_LISTING_PRICE,
                price,
            ));
        }

        let now = Timestamp::now();
        Ok(Self {
            id,
            seller_id,
            university_id,
            title,
            description: description.into(),
            price,
            category,
            condition,
            status: ListingStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns true if a purchase may be initiated against this listing.
    pub fn is_purchasable(&self) -> bool {
        self.status.is_purchasable()
    }

    /// Returns true if the given user is the seller.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.seller_id == user_id
    }

    /// Place a checkout hold on this listing.
    ///
    /// # Errors
    ///
    /// Returns error unless the listing is currently Active.
    pub fn hold(&mut self) -> Result<(), DomainError> {
        self.transition_to(ListingStatus::OnHold)
    }

    /// Release a checkout hold, making the listing purchasable again.
    ///
    /// # Errors
    ///
    /// Returns error unless the listing is currently OnHold.
    pub fn release_hold(&mut self) -> Result<(), DomainError> {
        self.transition_to(ListingStatus::Active)
    }

    /// Mark this listing sold after a settled payment.
    ///
    /// # Errors
    ///
    /// Returns error unless the listing is currently Active or OnHold.
    pub fn mark_sold(&mut self) -> Result<(), DomainError> {
        self.transition_to(ListingStatus::Sold)
    }

    fn transition_to(&mut self, target: ListingStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Cannot transition listing from {:?} to {:?}",
                    self.status, target
                ),
            )
        })?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
