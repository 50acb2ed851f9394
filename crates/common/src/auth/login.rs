//! Browser login URL for the explicit authorization code flow.

use super::error::AuthError;
use super::wskey::WsKey;

/// Production authorization endpoint
pub const PRODUCTION_AUTHORIZE_URL: &str = "https://authn.sd00.worldcat.org/oauth2/authorizeCode";

/// Registry ids of the institutions involved in a token request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstitutionContext {
    /// Institution that logs the user in
    pub authenticating_institution_id: String,
    /// Institution whose data is accessed
    pub context_institution_id: String,
}

impl InstitutionContext {
    /// Both ids
    #[must_use]
    pub fn new(authenticating: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            authenticating_institution_id: authenticating.into(),
            context_institution_id: context.into(),
        }
    }
}

/// URL the user's browser is sent to in order to obtain an authorization code.
///
/// # Arguments
/// * `wskey` - key with a redirect URI and at least one service
/// * `authorize_url` - authorization endpoint, normally
///   [`PRODUCTION_AUTHORIZE_URL`]
/// * `institutions` - authenticating and context institution ids
///
/// # Errors
/// Returns [`AuthError::NoServices`] or [`AuthError::MissingRedirectUri`]
/// before anything is built.
pub fn login_url(
    wskey: &WsKey,
    authorize_url: &str,
    institutions: &InstitutionContext,
) -> Result<String, AuthError> {
    let scope = wskey.scope("request an auth code")?;
    let redirect_uri = wskey.redirect_uri().ok_or(AuthError::MissingRedirectUri)?;

    let query = sorted_query(&[
        ("client_id", wskey.key()),
        ("authenticatingInstitutionId", &institutions.authenticating_institution_id),
        ("contextInstitutionId", &institutions.context_institution_id),
        ("redirect_uri", redirect_uri),
        ("response_type", "code"),
        ("scope", &scope),
    ]);

    Ok(format!("{authorize_url}?{query}"))
}

/// Form-encode each pair (space as `+`), sort, and join with `&`.
pub(crate) fn sorted_query(params: &[(&str, &str)]) -> String {
    let mut pairs: Vec<String> =
        params.iter().map(|(name, value)| format!("{}={}", form_escape(name), form_escape(value))).collect();
    pairs.sort();
    pairs.join("&")
}

fn form_escape(value: &str) -> String {
    urlencoding::encode(value).replace("%20", "+")
}
