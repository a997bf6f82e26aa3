//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Billing ledger commands
pub mod billing;

/// General utility commands
pub mod general;

// Export commands
pub use billing::*;
pub use general::*;
