// Integration tests for `WpClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cpt_console::wp::{
    AuthToken, Credentials, EntryDraft, EntryStatus, FieldValue, MetaUpdate, WpClient,
    WpClientConfig, WpError,
};

// ── Helpers ─────────────────────────────────────────────────────────

const AUTH: &str = "Basic YWRtaW46YWJjZC0xMjM0LWVmZ2gtNTY3OA==";

async fn setup() -> (MockServer, WpClient, Credentials) {
    let server = MockServer::start().await;
    let client = WpClient::with_client(reqwest::Client::new());
    let credentials = Credentials::new(
        &server.uri(),
        AuthToken::basic("admin", "abcd-1234-efgh-5678"),
    );
    (server, client, credentials)
}

fn product_json(id: u64, sku: &str) -> serde_json::Value {
    json!({
        "id": id,
        "date": "2024-06-01T09:30:00",
        "status": "draft",
        "title": {"raw": "Widget", "rendered": "Widget"},
        "content": {"raw": "", "rendered": ""},
        "acpt": {"meta": [{
            "meta_box": "details",
            "meta_fields": [{"name": "sku", "type": "Text", "value": sku}]
        }]}
    })
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_authenticate_success() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/users/me"))
        .and(header("Authorization", AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "name": "Site Admin", "slug": "admin"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let site = format!("{}/", server.uri());
    let (credentials, user) = client
        .authenticate(&site, "admin", "abcd-1234-efgh-5678")
        .await
        .unwrap();

    assert_eq!(credentials.site_url, server.uri());
    assert_eq!(credentials.token.header_value(), AUTH);
    assert_eq!(user.display_name(), "Site Admin");
}

#[tokio::test]
async fn test_authenticate_failure_carries_status_and_message() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/users/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "incorrect_password",
            "message": "The password you entered is incorrect.",
            "data": {"status": 401}
        })))
        .mount(&server)
        .await;

    let err = client
        .authenticate(&server.uri(), "admin", "wrong")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.message(), Some("The password you entered is incorrect."));
}

#[tokio::test]
async fn test_authenticate_non_200_success_is_rejected() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/users/me"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let err = client
        .authenticate(&server.uri(), "admin", "pw")
        .await
        .unwrap_err();
    assert!(matches!(err, WpError::Api { status: 204, message: None }));
}

#[tokio::test]
async fn test_connection_error_is_distinct() {
    let client = WpClient::new(WpClientConfig {
        request_timeout_ms: 2_000,
        ..Default::default()
    })
    .unwrap();

    // Nothing listens on port 9 (discard) locally.
    let err = client
        .authenticate("http://127.0.0.1:9", "admin", "pw")
        .await
        .unwrap_err();

    assert!(err.is_connection(), "expected connection error, got: {err:?}");
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_invalid_site_url() {
    let client = WpClient::new(WpClientConfig::default()).unwrap();
    let err = client
        .authenticate("example.com", "admin", "pw")
        .await
        .unwrap_err();
    assert!(matches!(err, WpError::InvalidSiteUrl(_)));
}

// ── Content type tests ──────────────────────────────────────────────

#[tokio::test]
async fn test_list_content_types_filters_internal_types() {
    let (server, client, credentials) = setup().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/types"))
        .and(header("Authorization", AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "attachment": {"name": "Media", "rest_base": "media"},
            "nav_menu_item": {"name": "Navigation Menu Items", "rest_base": "menu-items"},
            "wp_block": {"name": "Patterns", "rest_base": "blocks"},
            "wp_template": {"name": "Templates", "rest_base": "templates"},
            "product": {"name": "Products", "rest_base": "product"},
            "event": {"name": "Events", "rest_base": "event"}
        })))
        .mount(&server)
        .await;

    let types = client.list_content_types(&credentials).await.unwrap();
    let keys: Vec<&str> = types.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["event", "product"]);
    assert_eq!(types["product"].name, "Products");
}

#[tokio::test]
async fn test_list_content_types_error() {
    let (server, client, credentials) = setup().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/types"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let err = client.list_content_types(&credentials).await.unwrap_err();
    assert!(matches!(err, WpError::Api { status: 500, message: None }));
}

// ── Entry tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_entries() {
    let (server, client, credentials) = setup().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/product"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            product_json(1, "W-1"),
            {"id": 2, "title": {"rendered": "Gadget"}, "status": "publish"}
        ])))
        .mount(&server)
        .await;

    let entries = client.list_entries(&credentials, "product").await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].title, "Gadget");
    assert_eq!(entries[1].status, EntryStatus::Publish);
}

#[tokio::test]
async fn test_list_entries_bad_body_is_decode_error() {
    let (server, client, credentials) = setup().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/product"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client.list_entries(&credentials, "product").await.unwrap_err();
    assert!(matches!(err, WpError::Decode(_)), "got: {err:?}");
}

#[tokio::test]
async fn test_get_entry_extracts_meta_boxes() {
    let (server, client, credentials) = setup().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/product/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json(7, "W-7")))
        .mount(&server)
        .await;

    let entry = client.get_entry(&credentials, "product", 7).await.unwrap();
    assert_eq!(entry.id, Some(7));
    assert_eq!(entry.meta_boxes.len(), 1);
    assert_eq!(entry.meta_boxes[0].fields[0].value, json!("W-7"));
}

#[tokio::test]
async fn test_create_entry_posts_draft_with_meta() {
    let (server, client, credentials) = setup().await;

    let draft = EntryDraft {
        title: "Widget".into(),
        content: String::new(),
        status: EntryStatus::Draft,
        meta: vec![MetaUpdate {
            box_name: "details".into(),
            field: "sku".into(),
            value: FieldValue::Text("W-100".into()),
        }],
    };

    Mock::given(method("POST"))
        .and(path("/wp-json/wp/v2/product"))
        .and(header("Authorization", AUTH))
        .and(body_json(json!({
            "title": "Widget",
            "content": "",
            "status": "draft",
            "acpt": {"meta": [{"box": "details", "field": "sku", "value": "W-100"}]}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(product_json(101, "W-100")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/product/101"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json(101, "W-100")))
        .mount(&server)
        .await;

    let saved = client
        .save_entry(&credentials, "product", &draft, None)
        .await
        .unwrap();
    assert_eq!(saved.id, Some(101));

    let loaded = client
        .get_entry(&credentials, "product", 101)
        .await
        .unwrap();
    assert_eq!(loaded.title, draft.title);
    assert_eq!(loaded.content, draft.content);
    assert_eq!(loaded.status, draft.status);
    assert_eq!(loaded.meta_boxes[0].fields[0].value, json!("W-100"));
}

#[tokio::test]
async fn test_update_entry_posts_to_id() {
    let (server, client, credentials) = setup().await;

    Mock::given(method("POST"))
        .and(path("/wp-json/wp/v2/product/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json(5, "W-5")))
        .expect(1)
        .mount(&server)
        .await;

    let draft = EntryDraft {
        title: "Widget".into(),
        content: String::new(),
        status: EntryStatus::Publish,
        meta: Vec::new(),
    };
    let saved = client
        .save_entry(&credentials, "product", &draft, Some(5))
        .await
        .unwrap();
    assert_eq!(saved.id, Some(5));
}

#[tokio::test]
async fn test_save_entry_validation_error() {
    let (server, client, credentials) = setup().await;

    Mock::given(method("POST"))
        .and(path("/wp-json/wp/v2/product"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "rest_invalid_param",
            "message": "Invalid parameter(s): status"
        })))
        .mount(&server)
        .await;

    let draft = EntryDraft {
        title: "Widget".into(),
        content: String::new(),
        status: EntryStatus::Draft,
        meta: Vec::new(),
    };
    let err = client
        .save_entry(&credentials, "product", &draft, None)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Invalid parameter(s): status");
}

#[tokio::test]
async fn test_delete_entry_forces() {
    let (server, client, credentials) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/wp-json/wp/v2/product/3"))
        .and(query_param("force", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": true})))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.delete_entry(&credentials, "product", 3).await.unwrap());
}

#[tokio::test]
async fn test_delete_missing_entry_is_4xx() {
    let (server, client, credentials) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/wp-json/wp/v2/product/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "rest_post_invalid_id",
            "message": "Invalid post ID."
        })))
        .mount(&server)
        .await;

    let err = client
        .delete_entry(&credentials, "product", 404)
        .await
        .unwrap_err();
    let status = err.status().unwrap();
    assert!((400..500).contains(&status));
}
