use crate::models::Item;

pub const MIN_QUANTITY: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RuleViolation {
    #[error("Name must not be empty")]
    EmptyName,

    #[error("Quantity must be >= 1")]
    QuantityBelowMinimum,
}

/// Checks the name rule, then the quantity rule; only the first failure is returned.
pub fn check_business_rules(item: &Item) -> Result<(), RuleViolation> {
    if item.name.trim().is_empty() {
        return Err(RuleViolation::EmptyName);
    }
    if item.quantity < MIN_QUANTITY {
        return Err(RuleViolation::QuantityBelowMinimum);
    }
    Ok(())
}
