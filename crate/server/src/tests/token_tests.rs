use actix_web::http::StatusCode;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jwt_issuer_crypto::{issue, load_private_key};
use serde_json::{Value, json};

use crate::{
    core::GeneratedToken,
    result::IssuerResult,
    routes::token::VerifyReply,
    tests::test_utils::{
        get_json_with_uri, key_path, post_json_with_uri, post_with_uri, test_app,
        test_clap_config,
    },
};

const KID: &str = "6386cb4d-c0de-4629-a412-8dcf6f50f805";

fn partner_claims() -> Value {
    json!({"partnerId": "8b5773b4-adea-487c-bcec-f362e8b285bf", "scope": "issue verify"})
}

#[tokio::test]
async fn generate_then_verify() -> IssuerResult<()> {
    let app = test_app(None).await;

    let generated: GeneratedToken = get_json_with_uri(&app, "/generate-valid-jwt").await?;
    assert_eq!(generated.kid, KID);
    assert_eq!(generated.algorithm, "RS256");
    assert_eq!(Value::Object(generated.payload.clone()), partner_claims());

    let header: Value = serde_json::from_slice(
        &URL_SAFE_NO_PAD
            .decode(generated.jwt.split('.').next().unwrap_or_default())
            .map_err(|e| crate::issuer_error!(e))?,
    )?;
    assert_eq!(header, json!({"alg": "RS256", "typ": "JWT", "kid": KID}));

    let reply: VerifyReply =
        post_json_with_uri(&app, json!({"token": generated.jwt}), "/verify-jwt").await?;
    assert!(reply.valid);
    assert_eq!(reply.payload, Some(generated.payload));
    assert!(reply.message.is_some());
    assert_eq!(reply.error, None);
    assert_eq!(reply.reason, None);
    Ok(())
}

#[tokio::test]
async fn generate_with_lifetime() -> IssuerResult<()> {
    let mut clap_config = test_clap_config();
    clap_config.token.token_lifetime = Some(600);
    let app = test_app(Some(clap_config)).await;

    let generated: GeneratedToken = get_json_with_uri(&app, "/generate-valid-jwt").await?;
    let iat = generated.payload["iat"].as_i64().unwrap_or_default();
    let exp = generated.payload["exp"].as_i64().unwrap_or_default();
    assert!(iat > 0);
    assert_eq!(exp, iat + 600);

    let reply: VerifyReply =
        post_json_with_uri(&app, json!({"token": generated.jwt}), "/verify-jwt").await?;
    assert!(reply.valid);
    Ok(())
}

#[tokio::test]
async fn verify_missing_token() {
    let app = test_app(None).await;

    for body in [
        json!({"token": ""}),
        json!({}),
        json!({"token": null}),
        json!({"token": 12}),
        json!(["a.b.c"]),
    ] {
        let (status, body) = post_with_uri(&app, &body, "/verify-jwt").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let reply: VerifyReply = serde_json::from_str(&body).unwrap_or_else(|e| panic!("{e}: {body}"));
        assert!(!reply.valid);
        assert_eq!(reply.reason.as_deref(), Some("missing_token"));
        assert!(reply.error.is_some());
        assert_eq!(reply.payload, None);
    }
}

#[tokio::test]
async fn verify_oversized_body() {
    let app = test_app(None).await;

    // larger than the default payload limit of 256 KiB
    let token = "a".repeat(300_000);
    let (status, body) = post_with_uri(&app, json!({"token": token}), "/verify-jwt").await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    let reply: VerifyReply = serde_json::from_str(&body).unwrap_or_else(|e| panic!("{e}: {body}"));
    assert!(!reply.valid);
    assert_eq!(reply.reason.as_deref(), Some("missing_token"));
    assert!(reply.error.is_some());
}

#[tokio::test]
async fn verify_token_signed_by_unrelated_key() -> IssuerResult<()> {
    let app = test_app(None).await;

    let unrelated = load_private_key(&std::fs::read(key_path("unrelated_private.key"))?)?;
    let token = issue(&partner_claims(), KID, &unrelated)?;

    let (status, body) = post_with_uri(&app, json!({"token": token}), "/verify-jwt").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let reply: VerifyReply = serde_json::from_str(&body)?;
    assert!(!reply.valid);
    assert_eq!(reply.reason.as_deref(), Some("invalid_signature"));
    Ok(())
}

#[tokio::test]
async fn verify_failures_are_tagged() -> IssuerResult<()> {
    let app = test_app(None).await;
    let partner = load_private_key(&std::fs::read(key_path("partner_private.key"))?)?;

    let other_kid = issue(&partner_claims(), "another-kid", &partner)?;
    let expired = issue(&json!({"scope": "issue verify", "exp": 1}), KID, &partner)?;
    let cases = [
        ("not a token".to_owned(), "malformed_token"),
        ("a.b.c".to_owned(), "malformed_token"),
        (other_kid, "kid_mismatch"),
        (expired, "expired_token"),
    ];
    for (token, reason) in cases {
        let (status, body) = post_with_uri(&app, json!({"token": token}), "/verify-jwt").await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        let reply: VerifyReply = serde_json::from_str(&body)?;
        assert!(!reply.valid);
        assert_eq!(reply.reason.as_deref(), Some(reason), "{body}");
    }
    Ok(())
}

#[tokio::test]
async fn verify_tampered_token() -> IssuerResult<()> {
    let app = test_app(None).await;

    let generated: GeneratedToken = get_json_with_uri(&app, "/generate-valid-jwt").await?;
    let segments: Vec<&str> = generated.jwt.split('.').collect();
    let forged_payload =
        URL_SAFE_NO_PAD.encode(br#"{"partnerId":"someone else","scope":"issue verify"}"#);
    let forged = format!("{}.{forged_payload}.{}", segments[0], segments[2]);

    let (status, body) = post_with_uri(&app, json!({"token": forged}), "/verify-jwt").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let reply: VerifyReply = serde_json::from_str(&body)?;
    assert_eq!(reply.reason.as_deref(), Some("invalid_signature"));
    Ok(())
}
