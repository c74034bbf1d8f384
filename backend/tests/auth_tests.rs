//! Authentication and validation tests
//!
//! Covers the account validation rules and role handling the auth service
//! builds on.

use proptest::prelude::*;

use shared::models::Role;
use shared::validation::{validate_email, validate_password, validate_username};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_password_rules() {
        assert!(validate_password("Sup3r_secret").is_ok());
        assert!(validate_password("short1A!").is_ok());

        assert!(validate_password("Tiny1!").is_err()); // too short
        assert!(validate_password("nouppercase1!").is_err());
        assert!(validate_password("NOLOWERCASE1!").is_err());
        assert!(validate_password("NoDigitsHere!").is_err());
        assert!(validate_password("NoSpecial123").is_err());
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("j.doe_42").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"x".repeat(31)).is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email("nope").is_err());
    }

    #[test]
    fn test_role_serde_uses_lowercase_tags() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"coordinator\"").unwrap(),
            Role::Coordinator
        );
        assert!(serde_json::from_str::<Role>("\"root\"").is_err());
    }

    #[test]
    fn test_role_string_round_trip() {
        for role in [Role::Admin, Role::Staff, Role::Coordinator, Role::User] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Any password built from the required character classes passes.
    #[test]
    fn prop_well_formed_passwords_accepted(
        lower in "[a-z]{3,10}",
        upper in "[A-Z]{2,5}",
        digits in "[0-9]{1,4}",
    ) {
        let password = format!("{lower}{upper}{digits}!");
        prop_assert!(validate_password(&password).is_ok());
    }

    /// Usernames within bounds built from the allowed alphabet pass.
    #[test]
    fn prop_well_formed_usernames_accepted(name in "[a-zA-Z0-9_.]{3,30}") {
        prop_assert!(validate_username(&name).is_ok());
    }

    /// Usernames containing a character outside the alphabet fail.
    #[test]
    fn prop_bad_character_rejected(
        prefix in "[a-z]{2,10}",
        bad in "[ !@#$%^&*()+=-]",
    ) {
        let name = format!("{prefix}{bad}a");
        prop_assert!(validate_username(&name).is_err());
    }
}
