//! Mocks for the asset platform's GraphQL endpoint and its storage host.

use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};

pub const GRAPHQL_PATH: &str = "/admin/api/2024-10/graphql.json";
pub const STORAGE_PATH: &str = "/storage/upload";

async fn graphql_mock(
    server: &mut ServerGuard,
    operation: &str,
    body: Value,
    hits: usize,
) -> Mock {
    server
        .mock("POST", GRAPHQL_PATH)
        .match_header("x-shopify-access-token", "shpat_test")
        .match_body(Matcher::Regex(format!("(query|mutation) {}", operation)))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(hits)
        .create_async()
        .await
}

/// Staging succeeds with a target pointing at [`STORAGE_PATH`].
pub async fn mock_stage_ok(server: &mut ServerGuard) -> Mock {
    let url = format!("{}{}", server.url(), STORAGE_PATH);
    graphql_mock(
        server,
        "stagedUploadsCreate",
        json!({ "data": { "stagedUploadsCreate": {
            "stagedTargets": [{
                "url": url,
                "resourceUrl": "https://storage.example/tmp/abc/cat.png",
                "parameters": [
                    { "name": "key", "value": "tmp/abc/cat.png" },
                    { "name": "policy", "value": "p0l1cy" }
                ]
            }],
            "userErrors": []
        }}}),
        1,
    )
    .await
}

pub async fn mock_stage_rejected(server: &mut ServerGuard, user_errors: Value) -> Mock {
    graphql_mock(
        server,
        "stagedUploadsCreate",
        json!({ "data": { "stagedUploadsCreate": {
            "stagedTargets": [],
            "userErrors": user_errors
        }}}),
        1,
    )
    .await
}

pub async fn mock_storage(server: &mut ServerGuard, status: usize, body: &str) -> Mock {
    server
        .mock("POST", STORAGE_PATH)
        .match_body(Matcher::Regex("cat.png".to_string()))
        .with_status(status)
        .with_body(body)
        .expect(1)
        .create_async()
        .await
}

pub async fn mock_register(server: &mut ServerGuard, typename: &str, hits: usize) -> Mock {
    graphql_mock(
        server,
        "fileCreate",
        json!({ "data": { "fileCreate": {
            "files": [{ "__typename": typename, "id": "gid://shopify/MediaImage/1" }],
            "userErrors": []
        }}}),
        hits,
    )
    .await
}

/// One image status reading, served `hits` times.
pub async fn mock_image_status(
    server: &mut ServerGuard,
    status: &str,
    url: Option<&str>,
    hits: usize,
) -> Mock {
    graphql_mock(
        server,
        "fileStatus",
        json!({ "data": { "node": {
            "__typename": "MediaImage",
            "fileStatus": status,
            "image": url.map(|u| json!({ "url": u }))
        }}}),
        hits,
    )
    .await
}
