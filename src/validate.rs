//! Client-side form validation.
//!
//! Mirrors the portal's pre-submission checks. A validation failure is
//! raised before any request is built, so it never reaches the network.

use crate::api::types::SignupRequest;
use crate::error::PortalError;

/// Minimal email shape check: `local@domain.tld`, no whitespace.
fn email_ok(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}

fn all_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.chars().all(|c| c.is_ascii_digit())
}

fn fail(message: &str) -> PortalError {
    PortalError::Validation(message.to_string())
}

pub fn validate_login(email: &str, password: &str) -> Result<(), PortalError> {
    if email.trim().is_empty() {
        return Err(fail("Email is required"));
    }
    if !email_ok(email) {
        return Err(fail("Please enter a valid email address"));
    }
    if password.is_empty() {
        return Err(fail("Password is required"));
    }
    if password.len() < 6 {
        return Err(fail("Password must be at least 6 characters"));
    }
    Ok(())
}

pub fn validate_signup(profile: &SignupRequest) -> Result<(), PortalError> {
    if profile.name.trim().is_empty() {
        return Err(fail("Full name is required"));
    }
    validate_login(&profile.email, &profile.password)?;
    if !all_digits(&profile.phone, 10) {
        return Err(fail("Please enter a valid 10-digit phone number"));
    }
    for (value, label) in [
        (&profile.city, "City"),
        (&profile.state, "State"),
        (&profile.country, "Country"),
    ] {
        if value.trim().is_empty() {
            return Err(PortalError::Validation(format!("{} is required", label)));
        }
    }
    if !all_digits(&profile.pincode, 6) {
        return Err(fail("Please enter a valid 6-digit pincode"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> SignupRequest {
        SignupRequest {
            name: "Pat Kumar".into(),
            email: "pat@example.com".into(),
            password: "secret1".into(),
            phone: "9876543210".into(),
            city: "Pune".into(),
            state: "MH".into(),
            country: "India".into(),
            pincode: "411001".into(),
        }
    }

    #[test]
    fn test_login_validation() {
        assert!(validate_login("a@b.com", "secret1").is_ok());
        assert!(validate_login("", "secret1").is_err());
        assert!(validate_login("not-an-email", "secret1").is_err());
        assert!(validate_login("a b@c.com", "secret1").is_err());
        assert!(validate_login("a@b.com", "").is_err());
        assert!(validate_login("a@b.com", "short").is_err());
    }

    #[test]
    fn test_signup_validation_accepts_complete_profile() {
        assert!(validate_signup(&profile()).is_ok());
    }

    #[test]
    fn test_signup_validation_rejects_bad_fields() {
        let mut p = profile();
        p.name = "  ".into();
        assert!(validate_signup(&p).is_err());

        let mut p = profile();
        p.phone = "12345".into();
        assert!(validate_signup(&p).is_err());

        let mut p = profile();
        p.phone = "98765432ab".into();
        assert!(validate_signup(&p).is_err());

        let mut p = profile();
        p.pincode = "4110".into();
        assert!(validate_signup(&p).is_err());

        let mut p = profile();
        p.country = "".into();
        assert!(validate_signup(&p).is_err());
    }

    #[test]
    fn test_validation_never_touches_the_network() {
        // A failing check must be raised from pure string inspection;
        // there is no client or URL anywhere in this module.
        let err = validate_login("broken", "secret1").unwrap_err();
        assert!(matches!(err, PortalError::Validation(_)));
    }
}
