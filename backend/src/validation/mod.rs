//! Payload validation in two stages: structural decoding into typed records,
//! then the business rules a decoded record must satisfy before it is stored.

mod rules;
mod structural;

pub use rules::{check_business_rules, RuleViolation};
pub use structural::{parse_body, parse_path_integer, FieldError, FieldErrorKind, FromPayload};
