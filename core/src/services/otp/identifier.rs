//! Identifier validation and normalization

use mp_shared::phone;
use mp_shared::IdentifierPolicy;

use crate::errors::{OtpError, OtpResult};

/// Longest accepted identifier under the permissive policy
const MAX_IDENTIFIER_LEN: usize = 128;

/// Canonical form of `raw` under `policy`, used for every store key
///
/// Phone numbers come out in E.164 so that `0712345678` and
/// `+254712345678` address the same challenge.
pub fn normalize_identifier(policy: IdentifierPolicy, raw: &str) -> OtpResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(OtpError::InvalidIdentifier {
            reason: "identifier must not be empty".to_string(),
        });
    }

    match policy {
        IdentifierPolicy::PhoneNumber => {
            phone::to_e164(trimmed).ok_or_else(|| OtpError::InvalidIdentifier {
                reason: "not a valid mobile phone number".to_string(),
            })
        }
        IdentifierPolicy::AnyNonEmpty => {
            if trimmed.len() > MAX_IDENTIFIER_LEN {
                return Err(OtpError::InvalidIdentifier {
                    reason: format!("identifier longer than {} bytes", MAX_IDENTIFIER_LEN),
                });
            }
            if trimmed.chars().any(char::is_control) {
                return Err(OtpError::InvalidIdentifier {
                    reason: "identifier contains control characters".to_string(),
                });
            }
            Ok(trimmed.to_string())
        }
    }
}
