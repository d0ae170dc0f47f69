mod common;

use anyhow::Result;
use axum::http::StatusCode;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;

#[tokio::test]
async fn missing_authorization_header_is_401() -> Result<()> {
    let res = common::send(common::get("/drinks-detail")).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = common::body_json(res).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!(401));
    assert_eq!(body["code"], json!("authorization_header_missing"));
    assert_eq!(body["message"], json!("Authorization header is expected."));
    Ok(())
}

#[tokio::test]
async fn wrong_scheme_is_invalid_header() -> Result<()> {
    let res = common::send(common::get_with_auth("/drinks-detail", "Token abc")).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = common::body_json(res).await;
    assert_eq!(body["code"], json!("invalid_header"));
    Ok(())
}

#[tokio::test]
async fn extra_header_segments_are_invalid_header() -> Result<()> {
    let res = common::send(common::get_with_auth("/drinks-detail", "Bearer abc def")).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = common::body_json(res).await;
    assert_eq!(body["code"], json!("invalid_header"));
    assert_eq!(
        body["message"],
        json!("Authorization header must be a bearer token.")
    );
    Ok(())
}

#[tokio::test]
async fn unparseable_token_is_400() -> Result<()> {
    let res = common::send(common::get_with_auth("/drinks-detail", "Bearer abc")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(res).await;
    assert_eq!(body["error"], json!(400));
    assert_eq!(body["code"], json!("invalid_header"));
    Ok(())
}

#[tokio::test]
async fn unknown_signing_key_is_rejected() -> Result<()> {
    // Signed with a key the server has never seen.
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some("no-such-key".to_string());
    let token = encode(
        &header,
        &json!({"sub": "x", "exp": 4102444800i64}),
        &EncodingKey::from_secret(b"secret"),
    )?;

    let res = common::send(common::get_with_auth(
        "/drinks-detail",
        &common::bearer(&token),
    ))
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = common::body_json(res).await;
    assert_eq!(body["code"], json!("invalid_header"));
    assert_eq!(body["message"], json!("Unable to find the appropriate key."));
    Ok(())
}

#[tokio::test]
async fn expired_token_is_401() -> Result<()> {
    let token = common::expired_token(&["get:drinks-detail"]);
    let res = common::send(common::get_with_auth(
        "/drinks-detail",
        &common::bearer(&token),
    ))
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = common::body_json(res).await;
    assert_eq!(body["code"], json!("token_expired"));
    assert_eq!(body["message"], json!("Token expired."));
    Ok(())
}

#[tokio::test]
async fn wrong_audience_is_invalid_claims() -> Result<()> {
    let now = chrono::Utc::now().timestamp();
    let token = common::token_with_claims(json!({
        "iss": common::ISSUER,
        "sub": "auth0|tester",
        "aud": "some-other-api",
        "iat": now,
        "exp": now + 3600,
        "permissions": ["get:drinks-detail"],
    }));

    let res = common::send(common::get_with_auth(
        "/drinks-detail",
        &common::bearer(&token),
    ))
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = common::body_json(res).await;
    assert_eq!(body["code"], json!("invalid_claims"));
    Ok(())
}

#[tokio::test]
async fn wrong_issuer_is_invalid_claims() -> Result<()> {
    let now = chrono::Utc::now().timestamp();
    let token = common::token_with_claims(json!({
        "iss": "https://evil.example.com/",
        "sub": "auth0|tester",
        "aud": common::AUDIENCE,
        "iat": now,
        "exp": now + 3600,
        "permissions": ["get:drinks-detail"],
    }));

    let res = common::send(common::get_with_auth(
        "/drinks-detail",
        &common::bearer(&token),
    ))
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = common::body_json(res).await;
    assert_eq!(body["code"], json!("invalid_claims"));
    Ok(())
}

#[tokio::test]
async fn token_without_permissions_claim_is_400() -> Result<()> {
    let now = chrono::Utc::now().timestamp();
    let token = common::token_with_claims(json!({
        "iss": common::ISSUER,
        "sub": "auth0|tester",
        "aud": common::AUDIENCE,
        "iat": now,
        "exp": now + 3600,
    }));

    let res = common::send(common::get_with_auth(
        "/drinks-detail",
        &common::bearer(&token),
    ))
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(res).await;
    assert_eq!(body["code"], json!("invalid_claims"));
    assert_eq!(body["message"], json!("Permissions not included in JWT."));
    Ok(())
}

#[tokio::test]
async fn missing_permission_is_403() -> Result<()> {
    let token = common::token(&["post:drinks"]);
    let res = common::send(common::get_with_auth(
        "/drinks-detail",
        &common::bearer(&token),
    ))
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let body = common::body_json(res).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!(403));
    assert_eq!(body["message"], json!("Permission not found."));
    Ok(())
}

#[tokio::test]
async fn each_mutation_requires_its_own_permission() -> Result<()> {
    // A read permission does not grant delete.
    let token = common::token(&["get:drinks-detail"]);
    let res = common::send(common::json_request(
        "DELETE",
        "/drinks/1",
        &common::bearer(&token),
        json!({}),
    ))
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // And delete does not grant patch.
    let token = common::token(&["delete:drinks"]);
    let res = common::send(common::json_request(
        "PATCH",
        "/drinks/1",
        &common::bearer(&token),
        json!({"title": "new"}),
    ))
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}
