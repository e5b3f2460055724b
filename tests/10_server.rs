mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn root_describes_the_api() -> Result<()> {
    let server = common::TestServer::start().await?;

    let res = reqwest::get(server.url("/")).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["status"], "online");
    assert_eq!(body["endpoints"]["auth"]["login"]["path"], "/login");
    assert!(body["serverTime"].is_string());
    Ok(())
}

#[tokio::test]
async fn health_reports_seeded_collections() -> Result<()> {
    let server = common::TestServer::start().await?;

    let body: Value = reqwest::get(server.url("/health")).await?.json().await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["users"], 1);
    assert_eq!(body["records"], 5);
    Ok(())
}

#[tokio::test]
async fn login_with_seed_credentials() -> Result<()> {
    let server = common::TestServer::start().await?;

    let res = reqwest::Client::new()
        .post(server.url("/login"))
        .json(&json!({ "email": common::EMAIL, "password": common::PASSWORD }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert!(body["accessToken"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["email"], common::EMAIL);
    assert_eq!(body["user"]["name"], "Nuevo Usuario");
    assert!(body["user"].get("password").is_none(), "password hash leaked: {}", body);
    Ok(())
}

#[tokio::test]
async fn login_rejects_bad_credentials_with_400() -> Result<()> {
    let server = common::TestServer::start().await?;
    let client = reqwest::Client::new();

    for payload in [
        json!({ "email": common::EMAIL, "password": "wrong-password" }),
        json!({ "email": "nobody@test.com", "password": common::PASSWORD }),
    ] {
        let res = client.post(server.url("/login")).json(&payload).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: Value = res.json().await?;
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], "Incorrect email or password");
    }

    let res = client
        .post(server.url("/login"))
        .json(&json!({ "email": common::EMAIL }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn malformed_login_bodies_get_json_errors() -> Result<()> {
    let server = common::TestServer::start().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/login"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "INVALID_JSON");

    // Wrong field type and missing content type
    let res = client
        .post(server.url("/login"))
        .json(&json!({ "email": 5, "password": "x" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["code"], "INVALID_JSON");

    let res = client.post(server.url("/login")).body("{}").send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["error"], true);
    Ok(())
}

#[tokio::test]
async fn cors_preflight_allows_dev_origin() -> Result<()> {
    let server = common::TestServer::start().await?;

    let res = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, server.url("/records"))
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "authorization,content-type")
        .send()
        .await?;

    assert!(res.status().is_success(), "preflight failed: {}", res.status());
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:5173")
    );
    assert_eq!(
        res.headers()
            .get("access-control-allow-credentials")
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );
    Ok(())
}
