//! Lifecycle transition rules shared by the status enums.

use super::ValidationError;

/// Implemented by status enums whose values form a transition graph.
///
/// An implementor lists its legal edges once and gets checked transitions
/// and terminal-state detection from the defaults. Listing, transaction
/// and payment statuses all go through this trait so an illegal jump is
/// caught in one place instead of ad hoc per entity.
///
/// ```ignore
/// impl StateMachine for ListingStatus {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!((self, target), (Active, OnHold) | (OnHold, Active) | /* ... */)
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Active => vec![OnHold, Sold, Deleted],
///             /* ... */
///         }
///     }
/// }
///
/// let next = listing.status.transition_to(ListingStatus::Sold)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Whether the edge `self -> target` exists in the graph.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Every state reachable from `self` in one step.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Checked transition; the only sanctioned way to change a status.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("No transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// A state with no outgoing edges can never change again.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
