//! Control number check classification
//!
//! The check endpoint answers with JSON rather than MARCXML:
//!
//! ```json
//! {"entries":[{"content":{"found":true,"merged":false,
//!   "currentOclcNumber":"42","detail":null}}]}
//! ```

use serde::Deserialize;
use wcmeta_domain::ApiResponse;

/// How a queried control number stands upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Found, and still the current number
    Matched,
    /// Found, but the service reports a different current number
    Mismatch { current: String },
    /// Merged into another record, which now carries `current`
    Merged { current: String },
    /// Upstream diagnostic, verbatim
    Detail(String),
    /// Neither found nor merged, and no diagnostic
    NotFound,
    /// Non-2xx status or a body that is not a check response
    Unreadable(String),
}

impl CheckOutcome {
    /// Matched and merged numbers still resolve to a record.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self, Self::Matched | Self::Merged { .. })
    }

    /// Status word for a success, diagnostic for a failure.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Matched => "matched".to_string(),
            Self::Merged { current } => format!("merged into {current}"),
            Self::Mismatch { current } => format!("current number is {current}"),
            Self::Detail(detail) => detail.clone(),
            Self::NotFound => "check failed".to_string(),
            Self::Unreadable(body) => body.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    entries: Vec<CheckEntry>,
}

#[derive(Debug, Deserialize)]
struct CheckEntry {
    #[serde(default)]
    content: CheckContent,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckContent {
    #[serde(default)]
    found: bool,
    #[serde(default)]
    merged: bool,
    current_oclc_number: Option<serde_json::Value>,
    detail: Option<String>,
}

/// Classify the check response for `queried`.
#[must_use]
pub fn classify_check(queried: &str, response: &ApiResponse) -> CheckOutcome {
    if !response.is_success() {
        return CheckOutcome::Unreadable(response.body.clone());
    }

    let Ok(parsed) = serde_json::from_str::<CheckResponse>(&response.body) else {
        return CheckOutcome::Unreadable(response.body.clone());
    };
    let Some(entry) = parsed.entries.into_iter().next() else {
        return CheckOutcome::Unreadable(response.body.clone());
    };

    let content = entry.content;
    let current = content.current_oclc_number.as_ref().map(number_text).unwrap_or_default();

    if content.found {
        if same_number(&current, queried) {
            return CheckOutcome::Matched;
        }
        return CheckOutcome::Mismatch { current };
    }
    if content.merged {
        return CheckOutcome::Merged { current };
    }
    match content.detail {
        Some(detail) if !detail.trim().is_empty() => CheckOutcome::Detail(detail),
        _ => CheckOutcome::NotFound,
    }
}

fn number_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Leading zeros are not significant in control numbers.
fn same_number(a: &str, b: &str) -> bool {
    let a = a.trim().trim_start_matches('0');
    let b = b.trim().trim_start_matches('0');
    !a.is_empty() && a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(body: &str) -> ApiResponse {
        ApiResponse::new(200, body)
    }

    const FOUND_42: &str = r#"{"entries":[{"content":{"found":true,"merged":false,"currentOclcNumber":"42","detail":null}}]}"#;

    #[test]
    fn found_and_equal_is_matched() {
        let outcome = classify_check("42", &ok(FOUND_42));
        assert_eq!(outcome, CheckOutcome::Matched);
        assert!(outcome.succeeded());
    }

    #[test]
    fn found_but_different_number_is_a_failure() {
        let outcome = classify_check("99", &ok(FOUND_42));
        assert_eq!(outcome, CheckOutcome::Mismatch { current: "42".into() });
        assert!(!outcome.succeeded());
    }

    #[test]
    fn merged_reports_superseding_number() {
        let body = r#"{"entries":[{"content":{"found":false,"merged":true,"currentOclcNumber":1234}}]}"#;
        let outcome = classify_check("99", &ok(body));
        assert_eq!(outcome, CheckOutcome::Merged { current: "1234".into() });
        assert_eq!(outcome.describe(), "merged into 1234");
        assert!(outcome.succeeded());
    }

    #[test]
    fn detail_is_passed_through_verbatim() {
        let body = r#"{"entries":[{"content":{"found":false,"merged":false,"detail":"Record is deleted"}}]}"#;
        assert_eq!(classify_check("7", &ok(body)), CheckOutcome::Detail("Record is deleted".into()));
    }

    #[test]
    fn nothing_found_is_a_generic_failure() {
        let body = r#"{"entries":[{"content":{"found":false,"merged":false}}]}"#;
        let outcome = classify_check("7", &ok(body));
        assert_eq!(outcome, CheckOutcome::NotFound);
        assert_eq!(outcome.describe(), "check failed");
    }

    #[test]
    fn error_status_and_bad_bodies_are_unreadable() {
        let denied = ApiResponse::new(401, "denied");
        assert_eq!(classify_check("42", &denied), CheckOutcome::Unreadable("denied".into()));
        assert!(matches!(classify_check("42", &ok("<xml/>")), CheckOutcome::Unreadable(_)));
        assert!(matches!(classify_check("42", &ok(r#"{"entries":[]}"#)), CheckOutcome::Unreadable(_)));
    }

    #[test]
    fn leading_zeros_do_not_matter() {
        assert_eq!(classify_check("0042", &ok(FOUND_42)), CheckOutcome::Matched);
    }
}
