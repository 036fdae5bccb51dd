//! REST client tests against a local wiremock server
//!
//! Each test mounts the endpoints it needs and checks request shape,
//! authorization headers and the step-specific error on failure.

mod common;

use common::{api_responses, ctx, TOKEN, US_MARKETPLACE};
use listings_feed::{FeedError, FeedsApi, FeedsRestClient, GetFeedsParams, ProcessingStatus};
use serde_json::json;
use wiremock::matchers::{body_json, body_string, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, FeedsRestClient) {
    let server = MockServer::start().await;
    let client = FeedsRestClient::new(&server.uri()).expect("Failed to create REST client");
    (server, client)
}

#[tokio::test]
async fn test_create_feed_document() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/feeds/2021-06-30/documents"))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .and(header("x-amz-access-token", TOKEN))
        .and(body_json(json!({"contentType": "application/json"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "feedDocumentId": "amzn1.tortuga.doc",
            "url": "https://tortuga-prod-na.s3.amazonaws.com/doc"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let document = client.create_feed_document(&ctx(), "application/json").await.unwrap();
    assert_eq!(document.document_id, "amzn1.tortuga.doc");
    assert_eq!(document.upload_url, "https://tortuga-prod-na.s3.amazonaws.com/doc");
}

#[tokio::test]
async fn test_create_feed_document_without_destination() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/feeds/2021-06-30/documents"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"feedDocumentId": "doc"})))
        .mount(&server)
        .await;

    let result = client.create_feed_document(&ctx(), "application/json").await;
    assert!(matches!(result, Err(FeedError::DocumentCreation(_))));
}

#[tokio::test]
async fn test_create_feed_document_error_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/feeds/2021-06-30/documents"))
        .respond_with(ResponseTemplate::new(403).set_body_string(api_responses::ERROR_LIST))
        .mount(&server)
        .await;

    match client.create_feed_document(&ctx(), "application/json").await {
        Err(FeedError::DocumentCreation(message)) => {
            assert!(message.contains("403"), "{}", message);
            assert!(message.contains("InvalidInput"), "{}", message);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_upload_puts_raw_content() {
    let (server, client) = setup().await;

    // Upload goes to a pre-signed URL without API credentials
    Mock::given(method("PUT"))
        .and(header_exists("x-amz-access-token"))
        .respond_with(ResponseTemplate::new(400))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/upload/doc-1"))
        .and(header("content-type", "application/json"))
        .and(body_string("{\"messages\":[]}"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/upload/doc-1", server.uri());
    client
        .upload_feed_data(&url, "application/json", b"{\"messages\":[]}".to_vec())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_upload_non_success_status() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500).set_body_string("SlowDown"))
        .mount(&server)
        .await;

    let url = format!("{}/upload/doc-1", server.uri());
    let result = client.upload_feed_data(&url, "application/json", vec![1, 2, 3]).await;
    assert!(matches!(result, Err(FeedError::Upload(_))));
}

#[tokio::test]
async fn test_create_feed() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/feeds/2021-06-30/feeds"))
        .and(header("x-amz-access-token", TOKEN))
        .and(body_json(json!({
            "feedType": "JSON_LISTINGS_FEED",
            "marketplaceIds": [US_MARKETPLACE],
            "inputFeedDocument": "doc-1"
        })))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"feedId": "50014019726"})))
        .expect(1)
        .mount(&server)
        .await;

    let submission = client
        .create_feed(&ctx(), "JSON_LISTINGS_FEED", &[US_MARKETPLACE.to_string()], "doc-1")
        .await
        .unwrap();
    assert_eq!(submission.feed_id, "50014019726");
}

#[tokio::test]
async fn test_create_feed_without_feed_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/feeds/2021-06-30/feeds"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({})))
        .mount(&server)
        .await;

    let result = client
        .create_feed(&ctx(), "JSON_LISTINGS_FEED", &[US_MARKETPLACE.to_string()], "doc-1")
        .await;
    assert!(matches!(result, Err(FeedError::FeedCreation(_))));
}

#[tokio::test]
async fn test_get_feed() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/feeds/2021-06-30/feeds/50014019726"))
        .respond_with(ResponseTemplate::new(200).set_body_string(api_responses::FEED_DONE))
        .mount(&server)
        .await;

    let feed = client.get_feed(&ctx(), "50014019726").await.unwrap();
    assert_eq!(feed.processing_status, ProcessingStatus::Done);
    assert_eq!(feed.marketplace_ids, vec![US_MARKETPLACE.to_string()]);
    assert_eq!(feed.result_feed_document_id.as_deref(), Some("amzn1.tortuga.4.na.report"));
    assert!(feed.processing_end_time.is_some());
}

#[tokio::test]
async fn test_get_feed_without_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/feeds/2021-06-30/feeds/F1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"feedId": "F1"})))
        .mount(&server)
        .await;

    let result = client.get_feed(&ctx(), "F1").await;
    assert!(matches!(result, Err(FeedError::StatusPoll(_))));
}

#[tokio::test]
async fn test_get_feed_keeps_unknown_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/feeds/2021-06-30/feeds/F1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"processingStatus": "ON_HOLD"})),
        )
        .mount(&server)
        .await;

    let feed = client.get_feed(&ctx(), "F1").await.unwrap();
    assert_eq!(feed.feed_id, "F1");
    assert_eq!(feed.processing_status, ProcessingStatus::Other("ON_HOLD".to_string()));
}

#[tokio::test]
async fn test_cancel_feed() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/feeds/2021-06-30/feeds/F1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/feeds/2021-06-30/feeds/F2"))
        .respond_with(ResponseTemplate::new(400).set_body_string(api_responses::ERROR_LIST))
        .mount(&server)
        .await;

    client.cancel_feed(&ctx(), "F1").await.unwrap();
    let result = client.cancel_feed(&ctx(), "F2").await;
    assert!(matches!(result, Err(FeedError::FeedCancellation(_))));
}

#[tokio::test]
async fn test_get_feed_document() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/feeds/2021-06-30/documents/report-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "feedDocumentId": "report-1",
            "url": "https://tortuga-prod-na.s3.amazonaws.com/report-1",
            "compressionAlgorithm": "GZIP"
        })))
        .mount(&server)
        .await;

    let document = client.get_feed_document(&ctx(), "report-1").await.unwrap();
    assert_eq!(document.compression_algorithm.as_deref(), Some("GZIP"));
}

#[tokio::test]
async fn test_get_feeds_with_filters() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/feeds/2021-06-30/feeds"))
        .and(query_param("feedTypes", "JSON_LISTINGS_FEED"))
        .and(query_param("processingStatuses", "IN_QUEUE,IN_PROGRESS"))
        .and(query_param("pageSize", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"{{"feeds": [{}], "nextToken": "page-2"}}"#,
            api_responses::FEED_IN_PROGRESS
        )))
        .expect(1)
        .mount(&server)
        .await;

    let params = GetFeedsParams {
        feed_types: vec!["JSON_LISTINGS_FEED".to_string()],
        processing_statuses: vec![ProcessingStatus::InQueue, ProcessingStatus::InProgress],
        page_size: Some(5),
        ..Default::default()
    };
    let list = client.get_feeds(&ctx(), &params).await.unwrap();

    assert_eq!(list.feeds.len(), 1);
    assert_eq!(list.feeds[0].processing_status, ProcessingStatus::InProgress);
    assert_eq!(list.next_token.as_deref(), Some("page-2"));
}
