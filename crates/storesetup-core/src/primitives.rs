//! # Primitives
//!
//! Fixed runtime constants for the store-setup core.
//!
//! These are compiled into the binary and are immutable at runtime.

// =============================================================================
// DEFAULT WIZARD
// =============================================================================

/// Number of steps in the default store-setup wizard.
pub const DEFAULT_STEP_COUNT: usize = 4;

/// Upper bound on steps a single plan may declare.
///
/// Every evaluation queries each step, so the plan must stay bounded.
pub const MAX_STEPS: usize = 64;

// =============================================================================
// CONFIGURATION FLAGS
// =============================================================================

/// Configuration values (compared case-insensitively) that mark a flag as set.
pub const TRUTHY_VALUES: &[&str] = &["1", "true", "yes", "on"];

/// Check whether a configuration value counts as "set".
#[must_use]
pub fn is_truthy(value: &str) -> bool {
    let trimmed = value.trim();
    TRUTHY_VALUES
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(trimmed))
}

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for product and carrier names.
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum length for configuration keys.
pub const MAX_CONFIG_KEY_LENGTH: usize = 128;

/// Maximum length for configuration values.
pub const MAX_CONFIG_VALUE_LENGTH: usize = 4096;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_values() {
        assert!(is_truthy("true"));
        assert!(is_truthy(" YES "));
        assert!(is_truthy("1"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy(""));
        assert!(!is_truthy("enabled"));
    }
}
