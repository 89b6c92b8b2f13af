//! Resource screen, settings, seeding, upload, and generation endpoint tests

mod common;

use axum::http::StatusCode;
use common::app;
use serde_json::json;

// ===========================================================================
// Plain resources
// ===========================================================================

#[tokio::test]
async fn list_campaigns_forwards_paging() {
    let app = app().await;
    app.upstream.respond(
        "GET",
        "campaigns",
        200,
        json!({ "items": [{ "id": 1, "name": "Spring" }], "total": 1 }),
    );

    let resp = app.get("/v1/campaigns?page=2&search=%20spr%20").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["items"][0]["name"], "Spring");
    assert_eq!(resp.json()["total"], 1);

    let query = app.upstream.requests_to("GET", "campaigns")[0].query();
    assert!(query.contains("page=2"));
    assert!(query.contains("limit=2"));
    assert!(query.contains("search=spr"));
}

#[tokio::test]
async fn list_limit_is_capped() {
    let app = app().await;
    app.upstream
        .respond("GET", "labels", 200, json!({ "items": [] }));

    let resp = app.get("/v1/labels?limit=500").await;

    assert_eq!(resp.status, StatusCode::OK);
    let query = app.upstream.requests_to("GET", "labels")[0].query();
    assert!(query.contains("limit=100"));
}

#[tokio::test]
async fn create_hashtag_validates_name() {
    let app = app().await;
    app.upstream.permission(1, false, &[]);

    let resp = app
        .post_json("/v1/hashtags", json!({ "name": "two words" }))
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "hashtag must not contain spaces");
    assert!(app.upstream.requests_to("POST", "hashtags").is_empty());
}

#[tokio::test]
async fn create_idea_returns_created() {
    let app = app().await;
    app.upstream.permission(1, false, &[]);
    app.upstream.respond(
        "POST",
        "ideas",
        200,
        json!({ "id": 7, "title": "Behind the scenes", "labelIds": [2] }),
    );

    let resp = app
        .post_json(
            "/v1/ideas",
            json!({ "title": "Behind the scenes", "labelIds": [2] }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.json()["id"], 7);
    assert_eq!(
        app.upstream.requests_to("POST", "ideas")[0].json()["labelIds"],
        json!([2])
    );
}

#[tokio::test]
async fn role_zero_cannot_manage_resources() {
    let app = app().await;
    app.upstream.permission(0, false, &[]);

    let resp = app
        .post_json("/v1/campaigns", json!({ "name": "Spring" }))
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    assert_eq!(resp.error_message(), "not allowed to manage campaigns");

    let resp = app.delete("/v1/products/3").await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    assert_eq!(resp.error_message(), "not allowed to manage products");
}

#[tokio::test]
async fn update_label_checks_color() {
    let app = app().await;
    app.upstream.permission(2, false, &[]);

    let resp = app
        .put_json("/v1/labels/4", json!({ "name": "Promo", "color": "red" }))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "color must be a #rrggbb value");

    app.upstream.respond(
        "PUT",
        "labels/4",
        200,
        json!({ "id": 4, "name": "Promo", "color": "#ff8800" }),
    );
    let resp = app
        .put_json("/v1/labels/4", json!({ "name": "Promo", "color": "#ff8800" }))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["color"], "#ff8800");
}

#[tokio::test]
async fn product_price_must_not_be_negative() {
    let app = app().await;
    app.upstream.permission(2, false, &[]);

    let resp = app
        .post_json("/v1/products", json!({ "name": "Mug", "price": -1.0 }))
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "price must be a non-negative number");
}

#[tokio::test]
async fn delete_channel_passes_through() {
    let app = app().await;
    app.upstream.permission(2, false, &[]);
    app.upstream.respond("DELETE", "channels/5", 200, json!({}));

    let resp = app.delete("/v1/channels/5").await;

    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    assert_eq!(app.upstream.requests_to("DELETE", "channels/5").len(), 1);
}

#[tokio::test]
async fn connect_channel_requires_full_access() {
    let app = app().await;
    app.upstream.permission(1, false, &[]);

    let resp = app
        .post_json(
            "/v1/channels/connect",
            json!({ "pageId": "123", "pageName": "Shop", "accessToken": "page-token" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    assert_eq!(
        resp.error_message(),
        "settings require full access to the organization"
    );
}

#[tokio::test]
async fn connect_channel_refreshes_permissions() {
    let app = app().await;
    app.upstream.permission(2, false, &[]);
    app.upstream.respond(
        "POST",
        "channels/connect",
        200,
        json!({ "id": 9, "name": "Shop", "pageId": "123" }),
    );

    let resp = app
        .post_json(
            "/v1/channels/connect",
            json!({ "pageId": "123", "pageName": "Shop", "accessToken": "page-token" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.json()["id"], 9);

    app.get("/v1/permissions").await;
    assert_eq!(app.upstream.requests_to("GET", "permissions/check").len(), 2);
}

// ===========================================================================
// Sync settings
// ===========================================================================

#[tokio::test]
async fn sync_interval_has_a_floor() {
    let app = app().await;
    app.upstream.permission(2, false, &[]);

    let resp = app
        .post_json(
            "/v1/sync-configs",
            json!({ "channelId": 5, "enabled": true, "intervalMinutes": 3 }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.error_message(),
        "sync interval must be at least 5 minutes"
    );
}

#[tokio::test]
async fn sync_permission_check_reports_missing_scopes() {
    let app = app().await;
    app.upstream.permission(3, false, &[]);
    app.upstream.respond(
        "POST",
        "sync-configs/2/check-permission",
        200,
        json!({ "ok": false, "missingPermissions": ["pages_read_engagement"] }),
    );

    let resp = app.post_empty("/v1/sync-configs/2/check-permission").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["ok"], false);
    assert_eq!(
        resp.json()["missingPermissions"][0],
        "pages_read_engagement"
    );
}

#[tokio::test]
async fn sync_configs_list_for_any_member() {
    let app = app().await;
    app.upstream.respond(
        "GET",
        "sync-configs",
        200,
        json!([{ "id": 2, "channelId": 5, "enabled": true, "intervalMinutes": 30 }]),
    );

    let resp = app.get("/v1/sync-configs").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()[0]["intervalMinutes"], 30);
}

// ===========================================================================
// Seeding
// ===========================================================================

#[tokio::test]
async fn seeding_campaign_is_created() {
    let app = app().await;
    app.upstream.permission(2, false, &[5]);
    app.upstream.respond(
        "POST",
        "seeding-campaigns",
        200,
        json!({ "id": 11, "name": "Buzz", "channelId": 5, "targetPostId": "1_2" }),
    );

    let resp = app
        .post_json(
            "/v1/seeding",
            json!({
                "name": " Buzz ",
                "channelId": 5,
                "targetPostId": "1_2",
                "comments": ["Great!", ""],
                "startTime": "2099-01-01T09:00:00Z",
                "intervalMinutes": 15
            }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.json()["id"], 11);

    let sent = app.upstream.requests_to("POST", "seeding-campaigns")[0].json();
    assert_eq!(sent["name"], "Buzz");
    assert_eq!(sent["comments"], json!(["Great!"]));
}

#[tokio::test]
async fn seeding_in_the_past_is_rejected() {
    let app = app().await;
    app.upstream.permission(2, false, &[5]);

    let resp = app
        .post_json(
            "/v1/seeding",
            json!({
                "name": "Buzz",
                "channelId": 5,
                "targetPostId": "1_2",
                "comments": ["Great!"],
                "startTime": "2001-01-01T09:00:00Z",
                "intervalMinutes": 15
            }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "start time must be in the future");
}

#[tokio::test]
async fn limited_role_cannot_seed() {
    let app = app().await;
    app.upstream.permission(1, false, &[5]);

    let resp = app
        .post_json(
            "/v1/seeding",
            json!({
                "name": "Buzz",
                "channelId": 5,
                "targetPostId": "1_2",
                "comments": ["Great!"],
                "startTime": "2099-01-01T09:00:00Z",
                "intervalMinutes": 15
            }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    assert_eq!(resp.error_message(), "not allowed to schedule posts");
}

#[tokio::test]
async fn seeding_detail_and_stats() {
    let app = app().await;
    app.upstream.respond(
        "GET",
        "seeding-campaigns/11",
        200,
        json!({
            "id": 11,
            "name": "Buzz",
            "channelId": 5,
            "targetPostId": "1_2",
            "comments": [{ "id": 1, "message": "Great!", "status": 1 }]
        }),
    );
    app.upstream.respond(
        "GET",
        "seeding-campaigns/11/stats",
        200,
        json!({ "total": 3, "posted": 1, "failed": 1, "pending": 1 }),
    );

    let resp = app.get("/v1/seeding/11").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["name"], "Buzz");
    assert_eq!(resp.json()["comments"][0]["message"], "Great!");

    let resp = app.get("/v1/seeding/11/stats").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["posted"], 1);
}

fn campaign_on_channel(id: i64, channel_id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Buzz",
        "channelId": channel_id,
        "targetPostId": "1_2",
        "comments": []
    })
}

#[tokio::test]
async fn seeding_delete_checks_campaign_channel() {
    let app = app().await;
    app.upstream.permission(2, false, &[5]);
    app.upstream
        .respond("GET", "seeding-campaigns/4", 200, campaign_on_channel(4, 9));
    app.upstream
        .respond("DELETE", "seeding-campaigns/4", 200, json!({}));

    let resp = app.delete("/v1/seeding/4").await;

    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    assert_eq!(resp.error_message(), "not allowed to delete posts");
    assert!(app
        .upstream
        .requests_to("DELETE", "seeding-campaigns/4")
        .is_empty());
}

#[tokio::test]
async fn seeding_delete_on_own_channel_succeeds() {
    let app = app().await;
    app.upstream.permission(2, false, &[5]);
    app.upstream
        .respond("GET", "seeding-campaigns/4", 200, campaign_on_channel(4, 5));
    app.upstream
        .respond("DELETE", "seeding-campaigns/4", 200, json!({}));

    let resp = app.delete("/v1/seeding/4").await;

    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    assert_eq!(
        app.upstream.requests_to("DELETE", "seeding-campaigns/4").len(),
        1
    );
}

#[tokio::test]
async fn seeding_update_cannot_move_foreign_campaign() {
    let app = app().await;
    app.upstream.permission(2, false, &[5]);
    app.upstream
        .respond("GET", "seeding-campaigns/4", 200, campaign_on_channel(4, 9));
    app.upstream
        .respond("PUT", "seeding-campaigns/4", 200, campaign_on_channel(4, 5));

    let resp = app
        .put_json(
            "/v1/seeding/4",
            json!({
                "name": "Buzz",
                "channelId": 5,
                "targetPostId": "1_2",
                "comments": ["Great!"],
                "startTime": "2099-01-01T09:00:00Z",
                "intervalMinutes": 15
            }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    assert!(app.upstream.requests_to("PUT", "seeding-campaigns/4").is_empty());
}

#[tokio::test]
async fn seeding_update_on_own_channel_is_forwarded() {
    let app = app().await;
    app.upstream.permission(2, false, &[5]);
    app.upstream
        .respond("GET", "seeding-campaigns/4", 200, campaign_on_channel(4, 5));
    app.upstream
        .respond("PUT", "seeding-campaigns/4", 200, campaign_on_channel(4, 5));

    let resp = app
        .put_json(
            "/v1/seeding/4",
            json!({
                "name": "Buzz",
                "channelId": 5,
                "targetPostId": "1_2",
                "comments": ["Great!"],
                "startTime": "2099-01-01T09:00:00Z",
                "intervalMinutes": 15
            }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["channelId"], 5);
}

// ===========================================================================
// Uploads and generation
// ===========================================================================

#[tokio::test]
async fn upload_forwards_file_as_multipart() {
    let app = app().await;
    app.upstream.permission(1, false, &[]);
    app.upstream.respond(
        "POST",
        "uploads",
        200,
        json!({ "url": "https://cdn.example.com/u/1.png" }),
    );

    let resp = app
        .post_bytes("/v1/uploads?filename=photo.png", "image/png", vec![1, 2, 3])
        .await;

    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.json()["url"], "https://cdn.example.com/u/1.png");

    let sent = &app.upstream.requests_to("POST", "uploads")[0];
    assert!(sent
        .content_type
        .as_deref()
        .unwrap_or_default()
        .starts_with("multipart/form-data"));
}

#[tokio::test]
async fn upload_rejects_unsupported_type() {
    let app = app().await;
    app.upstream.permission(1, false, &[]);

    let resp = app
        .post_bytes("/v1/uploads?filename=notes.txt", "text/plain", vec![1])
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "unsupported content type: text/plain");
}

#[tokio::test]
async fn upload_rejects_oversized_body() {
    let app = app().await;
    app.upstream.permission(1, false, &[]);

    let resp = app
        .post_bytes(
            "/v1/uploads?filename=big.png",
            "image/png",
            vec![0; common::UPLOAD_MAX_BYTES + 1],
        )
        .await;

    assert_eq!(resp.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.upstream.requests_to("POST", "uploads").is_empty());
}

#[tokio::test]
async fn generate_requires_prompt() {
    let app = app().await;
    app.upstream.permission(1, false, &[]);

    let resp = app
        .post_json("/v1/generate", json!({ "prompt": "  " }))
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "prompt is required");
}

#[tokio::test]
async fn generate_returns_content() {
    let app = app().await;
    app.upstream.permission(2, false, &[]);
    app.upstream.respond(
        "POST",
        "ai/generate",
        200,
        json!({ "title": "Spring", "content": "Fresh picks", "hashtags": ["#spring"] }),
    );

    let resp = app
        .post_json(
            "/v1/generate",
            json!({ "prompt": "spring sale post", "tone": "friendly" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["hashtags"][0], "#spring");
    assert_eq!(
        app.upstream.requests_to("POST", "ai/generate")[0].json()["tone"],
        "friendly"
    );
}
