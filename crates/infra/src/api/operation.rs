//! Remote operations and how each maps onto an HTTP request

use std::fmt;

use reqwest::Method;
use wcmeta_domain::Credentials;

use super::endpoints::Endpoints;

/// Accept header for reads: an Atom entry wrapping MARCXML
pub const ACCEPT_ATOM_MARCXML: &str = "application/atom+xml;content=\"application/vnd.oclc.marc21+xml\"";
/// Accept header for write responses
pub const ACCEPT_ATOM: &str = "application/atom+xml";
/// Accept header for the control number check
pub const ACCEPT_ATOM_JSON: &str = "application/atom+json";
/// Content type of MARCXML request bodies
pub const CONTENT_MARCXML: &str = "application/vnd.oclc.marc21+xml";
/// Content type of holdings requests, which carry no body
pub const CONTENT_ATOM: &str = "application/atom+xml";

/// Institution values sent as query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryContext {
    pub institution_symbol: String,
    pub schema: String,
    pub holding_library_code: String,
}

impl From<&Credentials> for LibraryContext {
    fn from(credentials: &Credentials) -> Self {
        Self {
            institution_symbol: credentials.institution_symbol.clone(),
            schema: credentials.schema.clone(),
            holding_library_code: credentials.holding_library_code.clone(),
        }
    }
}

/// Which validation endpoint to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    #[default]
    Full,
    Add,
    Replace,
}

/// One remote capability. Record variants carry MARCXML, the others an OCLC
/// number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiOperation<'a> {
    ReadBib(&'a str),
    CreateBib(&'a str),
    UpdateBib(&'a str),
    Validate(ValidationMode, &'a str),
    AddHolding(&'a str),
    DeleteHolding(&'a str),
    CheckControlNumber(&'a str),
    HoldingCodes,
    ReadLocalBib(&'a str),
    SearchLocalBib(&'a str),
    CreateLocalBib(&'a str),
    UpdateLocalBib(&'a str),
    DeleteLocalBib(&'a str),
}

/// Everything needed to send one request, before signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPlan {
    pub method: Method,
    pub url: String,
    pub accept: &'static str,
    pub content_type: Option<&'static str>,
    pub body: Option<String>,
}

impl RequestPlan {
    /// `METHOD URL`, as written to debug logs
    #[must_use]
    pub fn trace(&self) -> String {
        format!("{} {}", self.method, self.url)
    }
}

impl ApiOperation<'_> {
    /// Build the request for this operation.
    #[must_use]
    pub fn plan(&self, endpoints: &Endpoints, library: &LibraryContext) -> RequestPlan {
        let bib_params = [
            ("instSymbol", library.institution_symbol.as_str()),
            ("classificationScheme", library.schema.as_str()),
            ("holdingLibraryCode", library.holding_library_code.as_str()),
        ];
        let local_params = [
            ("classificationScheme", library.schema.as_str()),
            ("holdingLibraryCode", library.holding_library_code.as_str()),
        ];

        match *self {
            Self::ReadBib(number) => read(format!(
                "{}/{}?{}",
                endpoints.bib_data,
                urlencoding::encode(number),
                query(&bib_params)
            )),
            Self::CreateBib(record) => {
                with_record(Method::POST, format!("{}?{}", endpoints.bib_data, query(&bib_params)), record)
            }
            Self::UpdateBib(record) => {
                with_record(Method::PUT, format!("{}?{}", endpoints.bib_data, query(&bib_params)), record)
            }
            Self::Validate(mode, record) => {
                let base = match mode {
                    ValidationMode::Full => &endpoints.validate_full,
                    ValidationMode::Add => &endpoints.validate_add,
                    ValidationMode::Replace => &endpoints.validate_replace,
                };
                with_record(Method::POST, base.clone(), record)
            }
            Self::AddHolding(number) => holding(Method::POST, endpoints, &bib_params, number, &[]),
            Self::DeleteHolding(number) => {
                holding(Method::DELETE, endpoints, &bib_params, number, &[("cascade", "1")])
            }
            Self::CheckControlNumber(number) => RequestPlan {
                method: Method::GET,
                url: format!(
                    "{}?{}",
                    endpoints.check_control_numbers,
                    query(&[("oclcNumbers", number)])
                ),
                accept: ACCEPT_ATOM_JSON,
                content_type: None,
                body: None,
            },
            Self::HoldingCodes => read(format!(
                "{}?{}",
                endpoints.holding_codes,
                query(&[("instSymbol", library.institution_symbol.as_str())])
            )),
            Self::ReadLocalBib(number) => read(format!(
                "{}/{}?{}",
                endpoints.local_bib_data,
                urlencoding::encode(number),
                query(&local_params)
            )),
            Self::SearchLocalBib(number) => {
                let mut params: Vec<(&str, &str)> = vec![("oclcNumber", number)];
                params.extend_from_slice(&local_params);
                read(format!("{}?{}", endpoints.local_bib_search, query(&params)))
            }
            Self::CreateLocalBib(record) => with_record(
                Method::POST,
                format!("{}?{}", endpoints.local_bib_data, query(&bib_params)),
                record,
            ),
            Self::UpdateLocalBib(record) => with_record(
                Method::PUT,
                format!("{}?{}", endpoints.local_bib_data, query(&bib_params)),
                record,
            ),
            Self::DeleteLocalBib(record) => with_record(
                Method::DELETE,
                format!("{}?{}", endpoints.local_bib_data, query(&bib_params)),
                record,
            ),
        }
    }
}

impl fmt::Display for ApiOperation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ReadBib(_) => "read bib",
            Self::CreateBib(_) => "create bib",
            Self::UpdateBib(_) => "update bib",
            Self::Validate(..) => "validate bib",
            Self::AddHolding(_) => "add holding",
            Self::DeleteHolding(_) => "delete holding",
            Self::CheckControlNumber(_) => "check control number",
            Self::HoldingCodes => "holding codes",
            Self::ReadLocalBib(_) => "read local bib",
            Self::SearchLocalBib(_) => "search local bib",
            Self::CreateLocalBib(_) => "create local bib",
            Self::UpdateLocalBib(_) => "update local bib",
            Self::DeleteLocalBib(_) => "delete local bib",
        };
        f.write_str(name)
    }
}

fn read(url: String) -> RequestPlan {
    RequestPlan { method: Method::GET, url, accept: ACCEPT_ATOM_MARCXML, content_type: None, body: None }
}

fn with_record(method: Method, url: String, record: &str) -> RequestPlan {
    RequestPlan {
        method,
        url,
        accept: ACCEPT_ATOM,
        content_type: Some(CONTENT_MARCXML),
        body: Some(record.to_string()),
    }
}

fn holding(
    method: Method,
    endpoints: &Endpoints,
    bib_params: &[(&str, &str)],
    number: &str,
    extra: &[(&str, &str)],
) -> RequestPlan {
    let mut params: Vec<(&str, &str)> = bib_params.to_vec();
    params.push(("oclcNumber", number));
    params.extend_from_slice(extra);
    RequestPlan {
        method,
        url: format!("{}?{}", endpoints.holdings_data, query(&params)),
        accept: ACCEPT_ATOM,
        content_type: Some(CONTENT_ATOM),
        body: None,
    }
}

/// Query string with percent-encoded values, in the given order.
fn query(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}
