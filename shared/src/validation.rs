//! Validation utilities for the Estoque inventory management system
//!
//! Includes Brazil-specific validations for company registration data.

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

// ============================================================================
// Brazil-Specific Validations
// ============================================================================

/// Strip formatting from a CNPJ, keeping only digits.
/// `12.345.678/0001-95` and `12345678000195` normalize identically.
pub fn normalize_cnpj(cnpj: &str) -> String {
    cnpj.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Validate a Brazilian company tax id (CNPJ)
///
/// 14-digit number with two check digits computed by the modulo 11
/// algorithm. Formatting characters are ignored.
pub fn validate_cnpj(cnpj: &str) -> Result<(), &'static str> {
    let digits = normalize_cnpj(cnpj);

    if digits.len() != 14 {
        return Err("CNPJ must be 14 digits");
    }

    let chars: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();
    if chars.iter().all(|&d| d == chars[0]) {
        return Err("Invalid CNPJ");
    }

    let check = |len: usize| -> u32 {
        // Weights run 2..=9 from the rightmost digit leftwards
        let sum: u32 = chars[..len]
            .iter()
            .rev()
            .zip((2u32..=9).cycle())
            .map(|(&d, w)| d * w)
            .sum();
        match sum % 11 {
            0 | 1 => 0,
            r => 11 - r,
        }
    };

    if check(12) != chars[12] || check(13) != chars[13] {
        return Err("Invalid CNPJ checksum");
    }

    Ok(())
}

/// Validate a Brazilian phone number
/// Accepts: 1133334444, (11) 93333-4444, +55 11 93333-4444
pub fn validate_brazilian_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    // Landline: area code + 8 digits; mobile: area code + 9 digits
    if digits.len() == 10 || digits.len() == 11 {
        return Ok(());
    }
    // With country code 55
    if (digits.len() == 12 || digits.len() == 13) && digits.starts_with("55") {
        return Ok(());
    }

    Err("Invalid Brazilian phone number format")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name@domain.com.br").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("no@domain").is_err());
        assert!(validate_email("@.").is_err());
    }

    #[test]
    fn test_normalize_cnpj() {
        assert_eq!(normalize_cnpj("11.222.333/0001-81"), "11222333000181");
        assert_eq!(normalize_cnpj("11222333000181"), "11222333000181");
    }

    #[test]
    fn test_validate_cnpj_valid() {
        assert!(validate_cnpj("11222333000181").is_ok());
        assert!(validate_cnpj("11.222.333/0001-81").is_ok());
    }

    #[test]
    fn test_validate_cnpj_invalid() {
        // Wrong length
        assert!(validate_cnpj("123456789").is_err());
        // Repeated digits
        assert!(validate_cnpj("00000000000000").is_err());
        // Bad checksum
        assert!(validate_cnpj("11222333000182").is_err());
    }

    #[test]
    fn test_validate_brazilian_phone_valid() {
        assert!(validate_brazilian_phone("1133334444").is_ok());
        assert!(validate_brazilian_phone("11933334444").is_ok());
        assert!(validate_brazilian_phone("(11) 93333-4444").is_ok());
        assert!(validate_brazilian_phone("+55 11 93333-4444").is_ok());
    }

    #[test]
    fn test_validate_brazilian_phone_invalid() {
        assert!(validate_brazilian_phone("12345").is_err());
        assert!(validate_brazilian_phone("123456789012345").is_err());
        assert!(validate_brazilian_phone("abcdefghij").is_err());
    }
}
