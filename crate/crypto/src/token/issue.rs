use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use openssl::{hash::MessageDigest, rsa::Padding, sign::Signer};
use serde::Serialize;

use super::JwtHeader;
use crate::{
    RS256,
    error::{CryptoError, result::CryptoResult},
    key_material::RsaPrivateKey,
};

/// Sign `claims` into a compact RS256 JWT whose header carries `kid`.
///
/// # Errors
///
/// Returns [`CryptoError::Signing`] if the claims cannot be serialized or
/// the signature cannot be produced.
pub fn issue<C: Serialize + ?Sized>(
    claims: &C,
    kid: &str,
    private_key: &RsaPrivateKey,
) -> CryptoResult<String> {
    let header = JwtHeader {
        alg: RS256.to_owned(),
        typ: "JWT".to_owned(),
        kid: kid.to_owned(),
    };
    encode_and_sign(&header, claims, private_key)
}

/// `base64url(header).base64url(payload).base64url(signature)`
pub(crate) fn encode_and_sign<H: Serialize + ?Sized, C: Serialize + ?Sized>(
    header: &H,
    claims: &C,
    private_key: &RsaPrivateKey,
) -> CryptoResult<String> {
    let header = serde_json::to_vec(header)
        .map_err(|e| CryptoError::Signing(format!("cannot serialize the header: {e}")))?;
    let payload = serde_json::to_vec(claims)
        .map_err(|e| CryptoError::Signing(format!("cannot serialize the claims: {e}")))?;
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header),
        URL_SAFE_NO_PAD.encode(payload)
    );
    let signature = rs256_sign(signing_input.as_bytes(), private_key)
        .map_err(|e| CryptoError::Signing(e.to_string()))?;
    Ok(format!(
        "{signing_input}.{}",
        URL_SAFE_NO_PAD.encode(signature)
    ))
}

/// RSASSA-PKCS1-v1_5 with SHA-256
fn rs256_sign(
    data: &[u8],
    private_key: &RsaPrivateKey,
) -> Result<Vec<u8>, openssl::error::ErrorStack> {
    let mut signer = Signer::new(MessageDigest::sha256(), private_key.pkey())?;
    signer.set_rsa_padding(Padding::PKCS1)?;
    signer.update(data)?;
    signer.sign_to_vec()
}
