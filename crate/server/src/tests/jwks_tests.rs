use jwt_issuer_crypto::{Jwks, load_public_key, unpadded_base64url_to_int};
use serde_json::Value;

use crate::{
    config::{ClapConfig, KeysConfig},
    result::IssuerResult,
    routes::ServiceIndex,
    tests::test_utils::{get_json_with_uri, key_path, test_app, test_clap_config},
};

#[tokio::test]
async fn jwks_publishes_the_loaded_key() -> IssuerResult<()> {
    let app = test_app(None).await;

    let jwks: Jwks = get_json_with_uri(&app, "/jwks").await?;
    assert_eq!(jwks.keys.len(), 1);
    let jwk = &jwks.keys[0];
    assert_eq!(jwk.kty, "RSA");
    assert_eq!(jwk.alg, "RS256");
    assert_eq!(jwk.key_use, "sig");
    assert_eq!(jwk.kid, "6386cb4d-c0de-4629-a412-8dcf6f50f805");

    // n and e decode back to the key numbers
    let public_key = load_public_key(&std::fs::read(key_path("partner_public.pem"))?)?;
    assert_eq!(&*unpadded_base64url_to_int(&jwk.n)?, public_key.n());
    assert_eq!(&*unpadded_base64url_to_int(&jwk.e)?, public_key.e());

    // and match the checked-in set exactly
    let expected: Jwks = serde_json::from_slice(&std::fs::read(key_path("partner_jwks.json"))?)?;
    assert_eq!(jwks, expected);
    Ok(())
}

#[tokio::test]
async fn jwks_is_stable_across_requests() -> IssuerResult<()> {
    let app = test_app(None).await;
    let first: Value = get_json_with_uri(&app, "/jwks").await?;
    let second: Value = get_json_with_uri(&app, "/jwks").await?;
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn jwks_follows_configured_key_and_kid() -> IssuerResult<()> {
    let mut clap_config = ClapConfig {
        keys: KeysConfig {
            public_key_file: key_path("unrelated_public.pem"),
            private_key_file: key_path("unrelated_private.key"),
        },
        ..test_clap_config()
    };
    clap_config.token.kid = "unrelated".to_owned();
    let app = test_app(Some(clap_config)).await;

    let jwks: Jwks = get_json_with_uri(&app, "/jwks").await?;
    let public_key = load_public_key(&std::fs::read(key_path("unrelated_public.pem"))?)?;
    assert_eq!(jwks.keys[0].kid, "unrelated");
    assert_eq!(&*unpadded_base64url_to_int(&jwks.keys[0].n)?, public_key.n());
    Ok(())
}

#[tokio::test]
async fn index_and_version() -> IssuerResult<()> {
    let app = test_app(None).await;

    let index: ServiceIndex = get_json_with_uri(&app, "/").await?;
    assert_eq!(index.status, "running");
    assert!(index.endpoints.iter().any(|e| e == "GET /jwks"));

    let version: String = get_json_with_uri(&app, "/version").await?;
    assert!(version.starts_with(env!("CARGO_PKG_VERSION")), "{version}");
    Ok(())
}
