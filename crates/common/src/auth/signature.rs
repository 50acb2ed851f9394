//! HMAC request signing
//!
//! The signature covers a canonical string built from the client key, a
//! timestamp, a nonce, the HTTP method, the fixed signing scope of the
//! authorization server and the request's sorted query parameters:
//!
//! ```text
//! <key>\n<timestamp>\n<nonce>\n\n<METHOD>\nwww.oclc.org\n443\n/wskey\n
//! [<name>=<value>\n ...]
//! ```
//!
//! The signing scope is the audience the server verifies against, so it
//! does not change with the host of the request being signed.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use url::Url;

use super::error::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Scheme identifier that prefixes the `Authorization` header value
pub const AUTH_SCHEME: &str = "http://www.worldcat.org/wskey/v2/hmac/v1";

const SIGNED_HOST: &str = "www.oclc.org";
const SIGNED_PORT: &str = "443";
const SIGNED_PATH: &str = "/wskey";
const NONCE_DIGITS: usize = 30;

/// User identity appended to a signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub idns: String,
}

impl Principal {
    /// Pair an id with its namespace
    #[must_use]
    pub fn new(id: impl Into<String>, idns: impl Into<String>) -> Self {
        Self { id: id.into(), idns: idns.into() }
    }
}

/// Inputs for signing one outbound request.
///
/// Built fresh for every call: [`SigningContext::new`] draws a new timestamp
/// and nonce. Tests pin both with the `with_*` overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningContext {
    method: String,
    url: Url,
    timestamp: i64,
    nonce: String,
    principal: Option<Principal>,
}

impl SigningContext {
    /// Context for `method` on `url` with the current time and a random nonce.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidUrl`] when `url` does not parse.
    pub fn new(method: &str, url: &str) -> Result<Self, AuthError> {
        let url = Url::parse(url).map_err(|e| AuthError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            method: method.to_ascii_uppercase(),
            url,
            timestamp: chrono::Utc::now().timestamp(),
            nonce: generate_nonce(),
            principal: None,
        })
    }

    /// Pin the POSIX timestamp
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Pin the nonce
    #[must_use]
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = nonce.into();
        self
    }

    /// Claim a principal identity in the header
    #[must_use]
    pub fn with_principal(mut self, principal: Option<Principal>) -> Self {
        self.principal = principal;
        self
    }

    /// Upper-case HTTP method
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Target URL
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// POSIX timestamp
    #[must_use]
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Nonce
    #[must_use]
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    fn url_names_principal(&self) -> bool {
        self.url.query_pairs().any(|(name, _)| name == "principalID")
    }
}

/// Random 30-digit decimal string, left-padded with zeros.
#[must_use]
pub fn generate_nonce() -> String {
    let bound = 10u128.pow(NONCE_DIGITS as u32);
    let value = rand::thread_rng().gen_range(0..bound);
    format!("{value:0width$}", width = NONCE_DIGITS)
}

/// Build the exact string that gets HMAC-signed.
#[must_use]
pub fn canonical_string(key: &str, context: &SigningContext) -> String {
    let timestamp = context.timestamp.to_string();
    let mut base = [
        key,
        timestamp.as_str(),
        context.nonce.as_str(),
        "",
        context.method.as_str(),
        SIGNED_HOST,
        SIGNED_PORT,
        SIGNED_PATH,
    ]
    .join("\n");

    let params = normalized_query(&context.url);
    if !params.is_empty() {
        base.push('\n');
        base.push_str(&params.join("\n"));
    }

    base.push('\n');
    base
}

/// Sign a request and return the full `Authorization` header value.
///
/// # Errors
/// Returns [`AuthError::Signing`] if the HMAC cannot be keyed.
pub fn sign(secret: &str, key: &str, context: &SigningContext) -> Result<String, AuthError> {
    let base = canonical_string(key, context);
    let signature = hmac_base64(secret, &base)?;

    let mut header = format!(
        "{AUTH_SCHEME} clientId=\"{key}\", timestamp=\"{}\", nonce=\"{}\", signature=\"{signature}\"",
        context.timestamp, context.nonce
    );

    if let Some(principal) = &context.principal {
        if !context.url_names_principal() {
            header.push_str(&format!(
                ", principalID=\"{}\", principalIDNS=\"{}\"",
                principal.id, principal.idns
            ));
        }
    }

    Ok(header)
}

fn hmac_base64(secret: &str, base: &str) -> Result<String, AuthError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AuthError::Signing(e.to_string()))?;
    mac.update(base.as_bytes());
    let digest = mac.finalize().into_bytes();
    Ok(BASE64.encode(digest).replace('\n', ""))
}

/// Sorted `name=value` lines; values are decoded then re-encoded with `%20`
/// for spaces.
fn normalized_query(url: &Url) -> Vec<String> {
    let mut params: Vec<String> = url
        .query_pairs()
        .map(|(name, value)| format!("{name}={}", urlencoding::encode(&value)))
        .collect();
    params.sort();
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "CancdeDMjFO9vnzkDrB6WJg1UnyTnkn8lLupLKygr0U1KJLiaAittuVjGRywCDdrsxahv2sbjgKq6hLM";
    const SECRET: &str = "YeZfIJdGYUeatxQOjekRZw==";

    fn context(url: &str) -> SigningContext {
        SigningContext::new("post", url)
            .unwrap()
            .with_timestamp(1_361_408_273)
            .with_nonce("981333313")
    }

    #[test]
    fn canonical_string_without_query_has_no_parameter_block() {
        let ctx = context("https://worldcat.org/bib/data");
        let base = canonical_string(KEY, &ctx);
        assert_eq!(
            base,
            format!("{KEY}\n1361408273\n981333313\n\nPOST\nwww.oclc.org\n443\n/wskey\n")
        );
    }

    #[test]
    fn canonical_string_sorts_and_reencodes_parameters() {
        let ctx = context("https://worldcat.org/bib/data?schema=LibraryOfCongress&inst=128807&name=a+b%2Fc");
        let base = canonical_string(KEY, &ctx);
        assert!(base.ends_with(
            "/wskey\ninst=128807\nname=a%20b%2Fc\nschema=LibraryOfCongress\n"
        ));
    }

    #[test]
    fn signature_is_independent_of_query_order() {
        let a = sign(SECRET, KEY, &context("https://worldcat.org/x?b=2&a=1&c=3")).unwrap();
        let b = sign(SECRET, KEY, &context("https://worldcat.org/x?c=3&a=1&b=2")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn signing_is_deterministic_for_pinned_inputs() {
        let ctx = context("https://worldcat.org/bib/data/823520553?classificationScheme=LibraryOfCongress");
        assert_eq!(sign(SECRET, KEY, &ctx).unwrap(), sign(SECRET, KEY, &ctx).unwrap());
    }

    #[test]
    fn header_carries_scheme_and_fields() {
        let header = sign(SECRET, KEY, &context("https://worldcat.org/bib/data")).unwrap();
        assert!(header.starts_with(&format!("{AUTH_SCHEME} clientId=\"{KEY}\", ")));
        assert!(header.contains("timestamp=\"1361408273\""));
        assert!(header.contains("nonce=\"981333313\""));
        assert!(header.contains("signature=\""));
        assert!(!header.contains("principalID"));
    }

    #[test]
    fn method_is_uppercased_and_changes_signature() {
        let post = sign(SECRET, KEY, &context("https://worldcat.org/bib/data")).unwrap();
        let get_ctx = SigningContext::new("get", "https://worldcat.org/bib/data")
            .unwrap()
            .with_timestamp(1_361_408_273)
            .with_nonce("981333313");
        assert_eq!(get_ctx.method(), "GET");
        assert_ne!(post, sign(SECRET, KEY, &get_ctx).unwrap());
    }

    #[test]
    fn principal_is_appended_only_when_query_lacks_it() {
        let principal = Some(Principal::new("8eaa", "urn:oclc:wms:da"));

        let ctx = context("https://worldcat.org/bib/data?inst=1").with_principal(principal.clone());
        let header = sign(SECRET, KEY, &ctx).unwrap();
        assert!(header.ends_with(", principalID=\"8eaa\", principalIDNS=\"urn:oclc:wms:da\""));

        let ctx = context("https://worldcat.org/bib/data?principalID=8eaa&principalIDNS=urn")
            .with_principal(principal);
        let header = sign(SECRET, KEY, &ctx).unwrap();
        assert!(!header.contains(", principalID="));
    }

    #[test]
    fn nonce_is_thirty_digits() {
        for _ in 0..32 {
            let nonce = generate_nonce();
            assert_eq!(nonce.len(), 30);
            assert!(nonce.chars().all(|c| c.is_ascii_digit()));
        }
        assert_ne!(generate_nonce(), generate_nonce());
    }

    #[test]
    fn fresh_contexts_differ() {
        let a = SigningContext::new("GET", "https://worldcat.org/").unwrap();
        let b = SigningContext::new("GET", "https://worldcat.org/").unwrap();
        assert_ne!(a.nonce(), b.nonce());
    }

    #[test]
    fn invalid_url_is_rejected() {
        let err = SigningContext::new("GET", "not a url").unwrap_err();
        assert!(matches!(err, AuthError::InvalidUrl { .. }));
    }
}
