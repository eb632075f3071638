//! Validation utilities for AutoShop Manager
//!
//! Includes Sri Lanka-specific validations (phone numbers, vehicle
//! registration plates) since the shop bills in LKR.

use rust_decimal::Decimal;

// ============================================================================
// Financial Validations
// ============================================================================

/// Validate that a monetary amount is strictly positive
pub fn validate_positive_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount <= Decimal::ZERO {
        return Err("Amount must be positive");
    }
    Ok(())
}

/// Validate that a monetary amount is not negative (charges and reductions
/// carry non-negative amounts; the kind decides the sign)
pub fn validate_non_negative_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative");
    }
    Ok(())
}

/// Validate that a quantity is strictly positive
pub fn validate_positive_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity <= Decimal::ZERO {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate invoice number format: INV-YYYY-NNNN
pub fn validate_invoice_no(invoice_no: &str) -> Result<(), &'static str> {
    let parts: Vec<&str> = invoice_no.split('-').collect();

    if parts.len() != 3 || parts[0] != "INV" {
        return Err("Invoice number must be in format INV-YYYY-NNNN");
    }
    if parts[1].len() != 4 || !parts[1].chars().all(|c| c.is_ascii_digit()) {
        return Err("Invalid year in invoice number");
    }
    if parts[2].len() != 4 || !parts[2].chars().all(|c| c.is_ascii_digit()) {
        return Err("Invalid sequence number in invoice number");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate a required name field is non-blank
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Name cannot be empty");
    }
    if name.len() > 200 {
        return Err("Name is too long");
    }
    Ok(())
}

// ============================================================================
// Sri Lanka-Specific Validations
// ============================================================================

/// Validate Sri Lankan phone number format
/// Accepts: 0712345678, 071-234-5678, +94712345678
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    // Domestic format: 10 digits starting with 0 (e.g. 0712345678)
    if digits.len() == 10 && digits.starts_with('0') {
        return Ok(());
    }
    // Without leading zero: 9 digits
    if digits.len() == 9 && !digits.starts_with('0') {
        return Ok(());
    }
    // International format with country code: 11 digits starting with 94
    if digits.len() == 11 && digits.starts_with("94") {
        return Ok(());
    }

    Err("Invalid Sri Lankan phone number format")
}

/// Validate Sri Lankan vehicle registration plate
/// Accepts modern format with optional province prefix:
/// CAB-1234, KS-5678, WP CAB-1234
pub fn validate_plate_no(plate: &str) -> Result<(), &'static str> {
    let plate = plate.trim();

    // Strip an optional two-letter province prefix (e.g. "WP ")
    let body = match plate.split_once(' ') {
        Some((prefix, rest))
            if prefix.len() == 2 && prefix.chars().all(|c| c.is_ascii_uppercase()) =>
        {
            rest
        }
        _ => plate,
    };

    let parts: Vec<&str> = body.split('-').collect();
    if parts.len() != 2 {
        return Err("Plate must be in format LLL-NNNN");
    }

    let letters = parts[0];
    if !(2..=3).contains(&letters.len())
        || !letters.chars().all(|c| c.is_ascii_uppercase())
    {
        return Err("Plate letters must be 2-3 uppercase characters");
    }

    let digits = parts[1];
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err("Plate number must be 4 digits");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    // ========================================================================
    // Financial Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_positive_amount() {
        assert!(validate_positive_amount(dec("100.50")).is_ok());
        assert!(validate_positive_amount(dec("0")).is_err());
        assert!(validate_positive_amount(dec("-5")).is_err());
    }

    #[test]
    fn test_validate_non_negative_amount() {
        assert!(validate_non_negative_amount(dec("0")).is_ok());
        assert!(validate_non_negative_amount(dec("250")).is_ok());
        assert!(validate_non_negative_amount(dec("-0.01")).is_err());
    }

    #[test]
    fn test_validate_positive_quantity() {
        assert!(validate_positive_quantity(dec("3")).is_ok());
        assert!(validate_positive_quantity(dec("0.5")).is_ok());
        assert!(validate_positive_quantity(dec("0")).is_err());
        assert!(validate_positive_quantity(dec("-1")).is_err());
    }

    #[test]
    fn test_validate_invoice_no_valid() {
        assert!(validate_invoice_no("INV-2025-0001").is_ok());
        assert!(validate_invoice_no("INV-2024-9999").is_ok());
    }

    #[test]
    fn test_validate_invoice_no_invalid() {
        assert!(validate_invoice_no("INV-25-0001").is_err());
        assert!(validate_invoice_no("BILL-2025-0001").is_err());
        assert!(validate_invoice_no("INV-2025-1").is_err());
        assert!(validate_invoice_no("INV20250001").is_err());
    }

    // ========================================================================
    // General Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name@domain.lk").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("no@domain").is_err());
        assert!(validate_email("@.").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Nimal Perera").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
    }

    // ========================================================================
    // Sri Lanka-Specific Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_phone_valid() {
        // Standard mobile
        assert!(validate_phone("0712345678").is_ok());
        // With dashes
        assert!(validate_phone("071-234-5678").is_ok());
        // Without leading zero
        assert!(validate_phone("712345678").is_ok());
        // International format
        assert!(validate_phone("+94712345678").is_ok());
        assert!(validate_phone("94712345678").is_ok());
    }

    #[test]
    fn test_validate_phone_invalid() {
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("123456789012").is_err());
        assert!(validate_phone("abcdefghij").is_err());
    }

    #[test]
    fn test_validate_plate_no_valid() {
        assert!(validate_plate_no("CAB-1234").is_ok());
        assert!(validate_plate_no("KS-5678").is_ok());
        assert!(validate_plate_no("WP CAB-1234").is_ok());
    }

    #[test]
    fn test_validate_plate_no_invalid() {
        assert!(validate_plate_no("CAB1234").is_err());
        assert!(validate_plate_no("C-1234").is_err());
        assert!(validate_plate_no("CAB-12").is_err());
        assert!(validate_plate_no("cab-1234").is_err());
    }
}
