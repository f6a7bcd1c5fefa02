//! Client-side checks run before a form is submitted. Errors are label
//! strings ready for display.

use crate::labels::label;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const OTP_LEN: usize = 6;

fn message(key: &str) -> String {
    label(&format!("messages.validation.{}", key), &[])
}

pub fn required(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(message("required"))
    } else {
        Ok(())
    }
}

pub fn email(value: &str) -> Result<(), String> {
    required(value)?;
    let value = value.trim();
    let valid = value
        .split_once('@')
        .map(|(local, domain)| {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        })
        .unwrap_or(false);
    if valid {
        Ok(())
    } else {
        Err(message("email"))
    }
}

pub fn password(value: &str) -> Result<(), String> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        Err(message("password"))
    } else {
        Ok(())
    }
}

pub fn password_match(password: &str, confirmation: &str) -> Result<(), String> {
    if password == confirmation {
        Ok(())
    } else {
        Err(message("passwordMatch"))
    }
}

/// Accepts exactly six digits, ignoring surrounding whitespace.
pub fn otp(value: &str) -> Result<String, String> {
    let code = value.trim();
    if code.chars().count() != OTP_LEN {
        return Err(message("otpLength"));
    }
    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(message("otpValid"));
    }
    Ok(code.to_string())
}

pub fn receiver_id(value: &str) -> Result<i64, String> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| message("receiverIdValid"))
}

/// Normalizes a positive amount to two decimal places.
pub fn amount(value: &str) -> Result<String, String> {
    let parsed = value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| message("amountPositive"))?;
    Ok(format!("{:.2}", parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn email_requires_local_part_and_domain() {
        assert!(email("alice@example.com").is_ok());
        assert_eq!(email("   ").unwrap_err(), "This field is required");
        for bad in ["alice", "@example.com", "alice@example", "a b@example.com", "a@.com"] {
            assert_eq!(email(bad).unwrap_err(), "Please enter a valid email address", "{}", bad);
        }
    }

    #[wasm_bindgen_test]
    fn passwords_need_length_and_match() {
        assert!(password("12345678").is_ok());
        assert!(password("1234567").is_err());
        assert!(password_match("secret123", "secret123").is_ok());
        assert_eq!(
            password_match("secret123", "secret124").unwrap_err(),
            "Passwords do not match"
        );
    }

    #[wasm_bindgen_test]
    fn otp_is_six_digits() {
        assert_eq!(otp(" 123456 ").unwrap(), "123456");
        assert_eq!(otp("12345").unwrap_err(), "Please enter all 6 digits");
        assert_eq!(otp("12a456").unwrap_err(), "Please enter a valid 6-digit code");
    }

    #[wasm_bindgen_test]
    fn transfer_fields() {
        assert_eq!(receiver_id(" 42 ").unwrap(), 42);
        assert!(receiver_id("0").is_err());
        assert!(receiver_id("abc").is_err());
        assert_eq!(amount("10").unwrap(), "10.00");
        assert_eq!(amount("0.5").unwrap(), "0.50");
        assert_eq!(amount("0").unwrap_err(), "Amount must be greater than 0");
        assert!(amount("-3").is_err());
        assert!(amount("NaN").is_err());
    }
}
