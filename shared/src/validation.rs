//! Validation utilities for the Stock Management Platform

// ============================================================================
// Account Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate username format (3-30 chars, alphanumeric plus `_` and `.`)
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.len() < 3 {
        return Err("Username must be at least 3 characters");
    }
    if username.len() > 30 {
        return Err("Username must be at most 30 characters");
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        return Err("Username may contain only letters, digits, '_' and '.'");
    }
    Ok(())
}

/// Validate password complexity: at least 8 characters with one lowercase,
/// one uppercase, one digit, and one special character.
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("Password must contain a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password must contain an uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain a digit");
    }
    if !password.chars().any(|c| "@$!%*?&_.-".contains(c)) {
        return Err("Password must contain a special character (@$!%*?&_.-)");
    }
    Ok(())
}

// ============================================================================
// Inventory Validations
// ============================================================================

/// Validate a traded quantity is strictly positive
pub fn validate_quantity(quantity: i64) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate a display name for catalog entities (non-empty, trimmed, bounded)
pub fn validate_entity_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name must not be empty");
    }
    if trimmed.len() > 100 {
        return Err("Name must be at most 100 characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name@domain.co").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("no@domain").is_err());
        assert!(validate_email("@.").is_err());
    }

    #[test]
    fn test_validate_username_valid() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("bob_42").is_ok());
        assert!(validate_username("j.doe").is_ok());
    }

    #[test]
    fn test_validate_username_invalid() {
        assert!(validate_username("ab").is_err()); // Too short
        assert!(validate_username(&"a".repeat(31)).is_err()); // Too long
        assert!(validate_username("bad name").is_err()); // Space
        assert!(validate_username("bad-name!").is_err()); // Special char
    }

    #[test]
    fn test_validate_password_valid() {
        assert!(validate_password("Passw0rd!").is_ok());
        assert!(validate_password("S3cure_pass").is_ok());
    }

    #[test]
    fn test_validate_password_invalid() {
        assert!(validate_password("Sh0rt!").is_err()); // Too short
        assert!(validate_password("alllower1!").is_err()); // No uppercase
        assert!(validate_password("ALLUPPER1!").is_err()); // No lowercase
        assert!(validate_password("NoDigits!!").is_err()); // No digit
        assert!(validate_password("NoSpecial1").is_err()); // No special char
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(10_000).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-5).is_err());
    }

    #[test]
    fn test_validate_entity_name() {
        assert!(validate_entity_name("Electronics").is_ok());
        assert!(validate_entity_name("  Office Supplies  ").is_ok());
        assert!(validate_entity_name("").is_err());
        assert!(validate_entity_name("   ").is_err());
        assert!(validate_entity_name(&"x".repeat(101)).is_err());
    }
}
