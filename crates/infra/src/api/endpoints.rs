//! Base URLs of the metadata service

/// Every base URL the client talks to.
///
/// Defaults to production; tests point them at a mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub bib_data: String,
    pub holdings_data: String,
    pub holding_codes: String,
    pub local_bib_data: String,
    pub local_bib_search: String,
    pub validate_full: String,
    pub validate_add: String,
    pub validate_replace: String,
    pub check_control_numbers: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::with_base("https://worldcat.org")
    }
}

impl Endpoints {
    /// All endpoints under one origin, keeping the production paths.
    #[must_use]
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            bib_data: format!("{base}/bib/data"),
            holdings_data: format!("{base}/ih/data"),
            holding_codes: format!("{base}/bib/holdinglibraries"),
            local_bib_data: format!("{base}/lbd/data"),
            local_bib_search: format!("{base}/lbd/search"),
            validate_full: format!("{base}/bib/validateFull"),
            validate_add: format!("{base}/bib/validateAdd"),
            validate_replace: format!("{base}/bib/validateReplace"),
            check_control_numbers: format!("{base}/bib/checkcontrolnumbers"),
        }
    }
}
