use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use crate::domain::caller::Caller;
use crate::domain::errors::IdentityError;
use crate::ports::IdentityProvider;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCredential {
    msp_id: Option<String>,
    #[serde(default)]
    attrs: HashMap<String, String>,
}

/// Caller identity parsed from a JSON credential document.
///
/// ```json
/// {"mspId": "StudentMSP", "attrs": {"username": "U1"}}
/// ```
#[derive(Debug, Clone)]
pub struct CredentialClaims {
    document: Vec<u8>,
    identity_attribute: String,
}

impl CredentialClaims {
    /// Wrap a raw credential; `identity_attribute` names the attr holding the
    /// caller's username.
    pub fn new(document: impl Into<Vec<u8>>, identity_attribute: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            identity_attribute: identity_attribute.into(),
        }
    }
}

impl IdentityProvider for CredentialClaims {
    fn resolve_caller(&self) -> Result<Caller, IdentityError> {
        let mut raw: RawCredential = serde_json::from_slice(&self.document)
            .map_err(|e| IdentityError::Authentication(format!("malformed credential: {}", e)))?;

        let organization_id = raw
            .msp_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| IdentityError::Authentication("credential has no mspId".to_string()))?;
        let attribute = raw.attrs.remove(&self.identity_attribute);

        debug!("[ac-02] Resolved caller {} ({:?})", organization_id, attribute);
        Ok(Caller::new(organization_id, attribute))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_org_and_attribute() {
        let claims = CredentialClaims::new(
            r#"{"mspId":"StudentMSP","attrs":{"username":"U1","hf.Type":"client"}}"#,
            "username",
        );
        assert_eq!(
            claims.resolve_caller().unwrap(),
            Caller::with_attribute("StudentMSP", "U1")
        );
    }

    #[test]
    fn test_attribute_is_optional() {
        let claims = CredentialClaims::new(r#"{"mspId":"AcademyMSP"}"#, "username");
        assert_eq!(claims.resolve_caller().unwrap(), Caller::new("AcademyMSP", None));

        let claims = CredentialClaims::new(r#"{"mspId":"AcademyMSP","attrs":{"username":"T1"}}"#, "uid");
        assert_eq!(claims.resolve_caller().unwrap().attribute, None);
    }

    #[test]
    fn test_malformed_or_missing_org_fails_authentication() {
        for doc in ["not json", "{}", r#"{"mspId":""}"#, r#"{"mspId":7}"#] {
            let err = CredentialClaims::new(doc, "username").resolve_caller().unwrap_err();
            assert!(matches!(err, IdentityError::Authentication(_)), "{doc}");
        }
    }
}
