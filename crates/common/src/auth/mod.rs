//! WSKey authentication
//!
//! Every call to the metadata service carries an `Authorization` header that
//! is either an HMAC signature computed per request, or a bearer token
//! obtained from the authorization server.
//!
//! # Module Organization
//!
//! - **[`signature`]**: canonical signing string and HMAC header
//! - **[`wskey`]**: the client key, its secret and scoped services
//! - **[`token`]**: authorization code and client credentials exchanges
//! - **[`login`]**: browser login URL for the explicit flow

pub mod error;
pub mod login;
pub mod signature;
#[cfg(feature = "runtime")]
pub mod token;
pub mod wskey;

pub use error::AuthError;
pub use login::{login_url, InstitutionContext, PRODUCTION_AUTHORIZE_URL};
pub use signature::{
    canonical_string, generate_nonce, sign, Principal, SigningContext, AUTH_SCHEME,
};
#[cfg(feature = "runtime")]
pub use token::{AuthServerUrls, TokenClient, PRODUCTION_TOKEN_URL};
pub use wskey::WsKey;
