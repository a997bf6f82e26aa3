//! Discord interaction handlers - autocomplete and confirmation prompts.

/// Autocomplete suggestions for free-text billing fields
pub mod autocomplete;
/// Yes/no confirmation before destructive actions
pub mod confirm;
