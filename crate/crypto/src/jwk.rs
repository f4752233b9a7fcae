//! JSON Web Key derivation (RFC 7517 / RFC 7518 §6.3)

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use openssl::bn::{BigNum, BigNumRef};
use serde::{Deserialize, Serialize};

use crate::{
    RS256, crypto_ensure,
    error::{CryptoError, result::CryptoResult},
    key_material::RsaPublicKey,
};

/// An RSA public key in JSON Web Key form.
///
/// Field order is the serialization order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    pub kty: String,
    pub alg: String,
    #[serde(rename = "use")]
    pub key_use: String,
    pub kid: String,
    /// base64url of the modulus, unpadded
    pub n: String,
    /// base64url of the public exponent, unpadded
    pub e: String,
}

/// A JSON Web Key Set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwks {
    pub keys: Vec<Jwk>,
}

/// Encode a non-negative integer the way JWK numeric members are encoded:
/// big-endian bytes of minimal length, base64url, no `=` padding.
///
/// Zero has no bytes and encodes to the empty string.
#[must_use]
pub fn int_to_unpadded_base64url(n: &BigNumRef) -> String {
    URL_SAFE_NO_PAD.encode(n.to_vec())
}

/// Decode a JWK numeric member back into an integer.
///
/// # Errors
///
/// Fails if `s` is not unpadded base64url or carries a leading zero byte,
/// which a minimal encoding never produces.
pub fn unpadded_base64url_to_int(s: &str) -> CryptoResult<BigNum> {
    let bytes = URL_SAFE_NO_PAD.decode(s)?;
    crypto_ensure!(
        bytes.first() != Some(&0),
        CryptoError::Conversion(format!("`{s}` is not a minimal big-endian encoding"))
    );
    Ok(BigNum::from_slice(&bytes)?)
}

/// Derive the JWK of `public_key`, tagged with `kid`.
#[must_use]
pub fn build_jwk(public_key: &RsaPublicKey, kid: &str) -> Jwk {
    Jwk {
        kty: "RSA".to_owned(),
        alg: RS256.to_owned(),
        key_use: "sig".to_owned(),
        kid: kid.to_owned(),
        n: int_to_unpadded_base64url(public_key.n()),
        e: int_to_unpadded_base64url(public_key.e()),
    }
}

/// Wrap a single JWK in a key set.
#[must_use]
pub fn build_jwks(jwk: Jwk) -> Jwks {
    Jwks { keys: vec![jwk] }
}
