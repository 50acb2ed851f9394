//! Library credentials for the metadata API.
//!
//! The credential store is a flat key/value mapping. The keys keep the names
//! used by the service (`principalID`, `instSymbol`, ...) so a store written
//! by hand matches the API documentation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, WcMetaError};

/// Every key a complete credential store must carry, in display order.
pub const CREDENTIAL_KEYS: [&str; 7] = [
    "key",
    "secret",
    "principalID",
    "principalDNS",
    "schema",
    "holdingLibraryCode",
    "instSymbol",
];

/// Validated credentials for one session.
///
/// Construct through [`Credentials::from_map`] so that missing and
/// placeholder values are rejected up front.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// WSKey client id
    pub key: String,
    /// WSKey secret used for HMAC signing
    pub secret: String,
    /// Principal identifier of the acting user
    #[serde(rename = "principalID")]
    pub principal_id: String,
    /// Namespace of the principal identifier
    #[serde(rename = "principalDNS")]
    pub principal_idns: String,
    /// Classification scheme sent with bib requests
    pub schema: String,
    /// Holding library code of the institution
    #[serde(rename = "holdingLibraryCode")]
    pub holding_library_code: String,
    /// Institution symbol, e.g. `OCWMS`
    #[serde(rename = "instSymbol")]
    pub institution_symbol: String,
}

impl Credentials {
    /// Build credentials from a raw key/value store.
    ///
    /// # Errors
    /// Returns `WcMetaError::Config` naming every key that is absent, blank,
    /// or still holds a bracketed placeholder such as `[your key]`.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self> {
        let missing: Vec<&str> = CREDENTIAL_KEYS
            .iter()
            .copied()
            .filter(|key| map.get(*key).map_or(true, |value| is_placeholder(value)))
            .collect();

        if !missing.is_empty() {
            return Err(WcMetaError::Config(format!(
                "Some API credentials appear not to be set. Please set the values of: {} using \
                 the config command",
                missing.join(", ")
            )));
        }

        let get = |key: &str| map.get(key).map(|v| v.trim().to_string()).unwrap_or_default();

        Ok(Self {
            key: get("key"),
            secret: get("secret"),
            principal_id: get("principalID"),
            principal_idns: get("principalDNS"),
            schema: get("schema"),
            holding_library_code: get("holdingLibraryCode"),
            institution_symbol: get("instSymbol"),
        })
    }

    /// Flatten back into the store representation.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, String> {
        [
            ("key", &self.key),
            ("secret", &self.secret),
            ("principalID", &self.principal_id),
            ("principalDNS", &self.principal_idns),
            ("schema", &self.schema),
            ("holdingLibraryCode", &self.holding_library_code),
            ("instSymbol", &self.institution_symbol),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .field("principal_id", &self.principal_id)
            .field("principal_idns", &self.principal_idns)
            .field("schema", &self.schema)
            .field("holding_library_code", &self.holding_library_code)
            .field("institution_symbol", &self.institution_symbol)
            .finish()
    }
}

/// Blank values and bracketed templates count as unset.
fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || (trimmed.starts_with('[') && trimmed.ends_with(']'))
        || (trimmed.starts_with('<') && trimmed.ends_with('>'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_map() -> BTreeMap<String, String> {
        [
            ("key", "wskey"),
            ("secret", "s3cret"),
            ("principalID", "8eaa-11e1"),
            ("principalDNS", "urn:oclc:wms:da"),
            ("schema", "LibraryOfCongress"),
            ("holdingLibraryCode", "MAIN"),
            ("instSymbol", "OCWMS"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn builds_from_complete_map() {
        let creds = Credentials::from_map(&complete_map()).unwrap();
        assert_eq!(creds.key, "wskey");
        assert_eq!(creds.principal_idns, "urn:oclc:wms:da");
        assert_eq!(creds.institution_symbol, "OCWMS");
        assert_eq!(creds.to_map(), complete_map());
    }

    #[test]
    fn names_every_missing_or_placeholder_key() {
        let mut map = complete_map();
        map.remove("secret");
        map.insert("instSymbol".into(), "[your institution symbol]".into());
        map.insert("schema".into(), "   ".into());

        let err = Credentials::from_map(&map).unwrap_err();
        match err {
            WcMetaError::Config(message) => {
                assert!(message.contains("secret, schema, instSymbol"), "{message}");
                assert!(message.contains("config command"));
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn debug_output_hides_secret() {
        let creds = Credentials::from_map(&complete_map()).unwrap();
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
    }
}
