mod common;

use blog_client::{
    ClientError,
    api::TAG_IN_USE_MESSAGE,
    models::{CreateTagRequest, UpdateTagRequest},
};
use common::MockBackend;
use serde_json::json;

#[tokio::test]
async fn test_create_top_level_tag_sends_null_parent() {
    let backend = MockBackend::spawn().await;
    backend.stub_json(
        "POST",
        "/api/admin/tags",
        201,
        json!({ "id": 10, "name": "Tech", "parent_id": null }),
    );
    let client = backend.logged_in_client();

    let tag = client
        .create_tag(&CreateTagRequest {
            name: "Tech".to_string(),
            parent_id: None,
        })
        .await
        .unwrap();

    assert_eq!(tag.id, 10);
    assert!(tag.is_top_level());

    let request = &backend.requests()[0];
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.header("authorization"), Some("Bearer test-token"));
    let sent: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(sent, json!({ "name": "Tech", "parent_id": null }));
}

#[tokio::test]
async fn test_create_sub_tag_with_unknown_parent_reports_server_error() {
    let backend = MockBackend::spawn().await;
    backend.stub_json(
        "POST",
        "/api/admin/tags",
        400,
        json!({ "error": "父标签不存在" }),
    );
    let client = backend.logged_in_client();

    let err = client
        .create_tag(&CreateTagRequest {
            name: "Rust".to_string(),
            parent_id: Some(999),
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "父标签不存在");
    let sent: serde_json::Value = serde_json::from_slice(&backend.requests()[0].body).unwrap();
    assert_eq!(sent["parent_id"], 999);
}

#[tokio::test]
async fn test_create_tag_unparsable_error_uses_fallback() {
    let backend = MockBackend::spawn().await;
    backend.stub_raw("POST", "/api/admin/tags", 500, "Internal Server Error");
    let client = backend.logged_in_client();

    let err = client
        .create_tag(&CreateTagRequest {
            name: "x".to_string(),
            parent_id: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "创建标签失败");
}

#[tokio::test]
async fn test_update_tag_renames_only() {
    let backend = MockBackend::spawn().await;
    backend.stub_json(
        "PUT",
        "/api/admin/tags/4",
        200,
        json!({ "id": 4, "name": "Rustlang", "parent_id": 1 }),
    );
    let client = backend.logged_in_client();

    let tag = client
        .update_tag(
            4,
            &UpdateTagRequest {
                name: "Rustlang".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(tag.name, "Rustlang");
    let sent: serde_json::Value = serde_json::from_slice(&backend.requests()[0].body).unwrap();
    assert_eq!(sent, json!({ "name": "Rustlang" }));
}

#[tokio::test]
async fn test_update_tag_fallback_message() {
    let backend = MockBackend::spawn().await;
    backend.stub_empty("PUT", "/api/admin/tags/4", 500);
    let client = backend.logged_in_client();

    let err = client
        .update_tag(4, &UpdateTagRequest { name: "x".to_string() })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "更新标签失败");
}

#[tokio::test]
async fn test_delete_tag_204_is_success() {
    let backend = MockBackend::spawn().await;
    backend.stub_empty("DELETE", "/api/admin/tags/5", 204);
    let client = backend.logged_in_client();

    client.delete_tag(5).await.unwrap();
}

#[tokio::test]
async fn test_delete_tag_in_use_is_conflict() {
    let backend = MockBackend::spawn().await;
    backend.stub_empty("DELETE", "/api/admin/tags/5", 409);
    let client = backend.logged_in_client();

    let err = client.delete_tag(5).await.unwrap_err();

    match &err {
        ClientError::Conflict { message } => assert_eq!(message, TAG_IN_USE_MESSAGE),
        other => panic!("expected conflict, got {other:?}"),
    }
    assert_eq!(err.status().map(|s| s.as_u16()), Some(409));
}

#[tokio::test]
async fn test_delete_tag_conflict_prefers_server_message() {
    let backend = MockBackend::spawn().await;
    backend.stub_json(
        "DELETE",
        "/api/admin/tags/1",
        409,
        json!({ "error": "该标签下还有子标签" }),
    );
    let client = backend.logged_in_client();

    let err = client.delete_tag(1).await.unwrap_err();

    assert!(matches!(err, ClientError::Conflict { .. }));
    assert_eq!(err.to_string(), "该标签下还有子标签");
}

#[tokio::test]
async fn test_delete_tag_generic_failure_differs_from_conflict() {
    let backend = MockBackend::spawn().await;
    backend.stub_empty("DELETE", "/api/admin/tags/5", 500);
    let client = backend.logged_in_client();

    let err = client.delete_tag(5).await.unwrap_err();

    assert!(matches!(err, ClientError::RequestFailed { .. }));
    assert_eq!(err.to_string(), "删除标签失败");
    assert_ne!(err.to_string(), TAG_IN_USE_MESSAGE);
}

#[tokio::test]
async fn test_tag_admin_without_token_sends_nothing() {
    let backend = MockBackend::spawn().await;
    let client = backend.anonymous_client();

    let create = client
        .create_tag(&CreateTagRequest {
            name: "x".to_string(),
            parent_id: None,
        })
        .await;
    let update = client
        .update_tag(1, &UpdateTagRequest { name: "y".to_string() })
        .await;
    let delete = client.delete_tag(1).await;

    assert!(matches!(create, Err(ClientError::AuthenticationRequired)));
    assert!(matches!(update, Err(ClientError::AuthenticationRequired)));
    assert!(matches!(delete, Err(ClientError::AuthenticationRequired)));
    assert!(backend.requests().is_empty());
}
