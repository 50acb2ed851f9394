//! Integration tests for the metadata client
//!
//! Runs the client, and the batch executor on top of it, against a local
//! mock of the metadata service.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use wcmeta_common::auth::AUTH_SCHEME;
use wcmeta_core::{BatchExecutor, MetadataApi};
use wcmeta_domain::{AccessToken, BatchItem, BatchOperation, Credentials, GrantType, WcMetaError};
use wcmeta_infra::api::operation::{ACCEPT_ATOM_MARCXML, CONTENT_MARCXML};
use wcmeta_infra::{
    ApiError, ApiOperation, Endpoints, MetadataClient, MetadataClientConfig, RequestAuth,
};
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NS: &str = "http://www.loc.gov/MARC21/slim";

fn credentials() -> Credentials {
    let map: BTreeMap<String, String> = [
        ("key", "test-key"),
        ("secret", "test-secret"),
        ("principalID", "pid-1"),
        ("principalDNS", "urn:oclc:wms:da"),
        ("schema", "LibraryOfCongress"),
        ("holdingLibraryCode", "MAIN"),
        ("instSymbol", "OCWMS"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    Credentials::from_map(&map).expect("complete credentials")
}

fn config_for(server: &MockServer) -> MetadataClientConfig {
    MetadataClientConfig {
        endpoints: Endpoints::with_base(&server.uri()),
        timeout: Duration::from_secs(5),
        base_backoff: Duration::from_millis(5),
        ..MetadataClientConfig::default()
    }
}

fn client_for(server: &MockServer) -> MetadataClient {
    MetadataClient::from_credentials(&credentials(), config_for(server)).expect("client")
}

fn atom_entry(number: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?><entry xmlns=\"http://www.w3.org/2005/Atom\"><content>\
         <response><record xmlns=\"{NS}\"><controlfield tag=\"001\">{number}</controlfield></record></response>\
         </content><id>http://worldcat.org/oclc/{number}</id></entry>"
    )
}

fn authorization_of(request: &wiremock::Request) -> String {
    request
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .expect("authorization header")
        .to_string()
}

/// Validates a signed bib read.
///
/// Assertions:
/// - The request is a GET on `/bib/data/{oclc}` with the institution query.
/// - It asks for Atom-wrapped MARCXML and carries the HMAC header.
/// - The exchange keeps status, body and a `METHOD URL` trace.
#[tokio::test]
async fn read_bib_is_signed_and_returned_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bib/data/12345"))
        .and(query_param("instSymbol", "OCWMS"))
        .and(query_param("classificationScheme", "LibraryOfCongress"))
        .and(query_param("holdingLibraryCode", "MAIN"))
        .and(header("accept", ACCEPT_ATOM_MARCXML))
        .respond_with(ResponseTemplate::new(200).set_body_string(atom_entry("12345")))
        .expect(1)
        .mount(&server)
        .await;

    let exchange = client_for(&server).read_bib("12345").await.expect("exchange");

    assert_eq!(exchange.response.status, 200);
    assert_eq!(exchange.response.body, atom_entry("12345"));
    assert!(exchange.trace.starts_with(&format!("GET {}/bib/data/12345?", server.uri())));

    let requests = server.received_requests().await.expect("recorded requests");
    let authorization = authorization_of(&requests[0]);
    assert!(authorization.starts_with(AUTH_SCHEME));
    assert!(authorization.contains("clientId=\"test-key\""));
    assert!(authorization.ends_with("principalIDNS=\"urn:oclc:wms:da\""));
}

#[tokio::test]
async fn error_statuses_come_back_as_responses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<error>Record not found</error>"))
        .mount(&server)
        .await;

    let exchange = client_for(&server).read_bib("67890").await.expect("exchange");

    assert_eq!(exchange.response.status, 404);
    assert!(!exchange.response.is_success());
    assert_eq!(exchange.response.body, "<error>Record not found</error>");
}

#[tokio::test]
async fn create_posts_marcxml_once_even_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bib/data"))
        .and(header("content-type", CONTENT_MARCXML))
        .and(body_string("<record/>"))
        .respond_with(ResponseTemplate::new(500).set_body_string("try later"))
        .expect(1)
        .mount(&server)
        .await;

    let exchange = client_for(&server).create_bib("<record/>").await.expect("exchange");

    assert_eq!(exchange.response.status, 500);
}

#[tokio::test]
async fn reads_are_retried_with_a_fresh_signature() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let exchange = client_for(&server).read_bib("1").await.expect("exchange");
    assert_eq!(exchange.response.status, 503);

    let requests = server.received_requests().await.expect("recorded requests");
    let first = authorization_of(&requests[0]);
    let second = authorization_of(&requests[1]);
    assert_ne!(first, second, "each attempt carries its own nonce");
}

#[tokio::test]
async fn delete_holding_cascades() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/ih/data"))
        .and(query_param("oclcNumber", "42"))
        .and(query_param("cascade", "1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let exchange = client_for(&server).delete_holding("42").await.expect("exchange");
    assert!(exchange.response.is_success());
}

#[tokio::test]
async fn holding_codes_and_local_bib_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bib/holdinglibraries"))
        .and(query_param("instSymbol", "OCWMS"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<holdingLibraries/>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/lbd/search"))
        .and(query_param("oclcNumber", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<feed/>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.holding_codes().await.expect("codes").response.body, "<holdingLibraries/>");
    let search = client.execute(ApiOperation::SearchLocalBib("7")).await.expect("search");
    assert_eq!(search.response.body, "<feed/>");
}

#[tokio::test]
async fn expired_bearer_token_never_reaches_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let expired = AccessToken {
        value: "tk_old".into(),
        expires_at: Utc::now() - chrono::Duration::seconds(1),
        principal_id: None,
        principal_idns: None,
        grant_type: GrantType::ClientCredentials,
        scope: "WorldCatMetadataAPI".into(),
    };
    let client = MetadataClient::new(
        config_for(&server),
        RequestAuth::Bearer(expired),
        (&credentials()).into(),
    )
    .expect("client");

    let err = client.execute(ApiOperation::ReadBib("1")).await.unwrap_err();
    assert!(matches!(err, ApiError::Auth(_)), "got {err:?}");

    let domain: WcMetaError = client.read_bib("1").await.unwrap_err();
    assert!(matches!(domain, WcMetaError::Auth(_)));
}

/// Validates the 12345/67890 read batch over real HTTP.
///
/// Assertions:
/// - One success and one failure.
/// - Exactly one merged record, the one for 12345.
#[tokio::test]
async fn read_batch_against_mock_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bib/data/12345"))
        .respond_with(ResponseTemplate::new(200).set_body_string(atom_entry("12345")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bib/data/67890"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<error>not found</error>"))
        .mount(&server)
        .await;

    let executor = BatchExecutor::new(Arc::new(client_for(&server)));
    let items = vec![BatchItem::Number("12345".into()), BatchItem::Number("67890".into())];
    let outcome = executor.run(BatchOperation::Read, items).await.expect("outcome");

    assert_eq!(outcome.success_count, 1);
    assert_eq!(outcome.failure_count, 1);
    assert_eq!(outcome.merged_records.len(), 1);
    assert!(outcome.merged_records[0].contains(">12345<"));
    assert_eq!(outcome.status_log[1].headline(), "67890: failed");
}

#[tokio::test]
async fn create_batch_sets_holdings_on_returned_number() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bib/data"))
        .respond_with(ResponseTemplate::new(201).set_body_string(atom_entry("555")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ih/data"))
        .and(query_param("oclcNumber", "555"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let executor = BatchExecutor::new(Arc::new(client_for(&server)));
    let items = vec![BatchItem::Record { id: "0".into(), xml: format!("<record xmlns=\"{NS}\"/>") }];
    let outcome = executor.run(BatchOperation::Create, items).await.expect("outcome");

    assert_eq!(outcome.success_count, 1);
    assert_eq!(outcome.holdings.set, 1);
    assert_eq!(outcome.status_log[1].headline(), "555: holding set");
}
