//! Staff invitation rules.

use crate::error::CoreError;
use crate::types::Timestamp;

/// Lowercased, trimmed email as stored on invitations.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Domain part of an email address, lowercased. `None` without an `@`.
///
/// ```
/// use opvang_core::invitation::email_domain;
///
/// assert_eq!(email_domain("Staff@Center.BE").as_deref(), Some("center.be"));
/// assert_eq!(email_domain("nobody"), None);
/// ```
pub fn email_domain(email: &str) -> Option<String> {
    let (_, domain) = email.trim().rsplit_once('@')?;
    if domain.is_empty() {
        return None;
    }
    Some(domain.to_lowercase())
}

/// Check an active invitation, in order: expiry, prior use, email domain.
pub fn check_invitation(
    expires_at: Timestamp,
    used_at: Option<Timestamp>,
    now: Timestamp,
    domain: &str,
    domain_allowed: bool,
) -> Result<(), CoreError> {
    if expires_at < now {
        return Err(CoreError::Gone("Invitation has expired".into()));
    }
    if used_at.is_some() {
        return Err(CoreError::Conflict("Invitation has already been used".into()));
    }
    if !domain_allowed {
        return Err(CoreError::Forbidden(format!(
            "Email domain @{domain} is not authorized. Please use your official center email."
        )));
    }
    Ok(())
}
