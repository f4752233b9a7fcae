use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use openssl::{hash::MessageDigest, rsa::Padding, sign::Verifier};
use serde_json::{Map, Value};
use tracing::debug;

use super::{VerificationError, now};
use crate::{RS256, key_material::RsaPublicKey};

/// Verify a compact RS256 JWT against `public_key` and the expected `kid`,
/// at the current time.
///
/// # Errors
///
/// Returns the first [`VerificationError`] found.
pub fn verify(
    token: &str,
    kid: &str,
    public_key: &RsaPublicKey,
) -> Result<Map<String, Value>, VerificationError> {
    verify_at(token, kid, public_key, now())
}

/// Verify a compact RS256 JWT as if the current time were `now`
/// (seconds since epoch).
///
/// Checks run in order: structure, algorithm, signature, key identifier,
/// payload, expiry. The payload is only decoded once the signature holds.
///
/// # Errors
///
/// Returns the first [`VerificationError`] found.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn verify_at(
    token: &str,
    kid: &str,
    public_key: &RsaPublicKey,
    now: i64,
) -> Result<Map<String, Value>, VerificationError> {
    let parts = split(token)?;
    let header = decode_object(parts.header, "header")?;
    let signature = URL_SAFE_NO_PAD.decode(parts.signature).map_err(|e| {
        VerificationError::MalformedToken(format!("the signature is not base64url: {e}"))
    })?;

    let alg = header.get("alg").and_then(Value::as_str);
    if alg != Some(RS256) {
        return Err(VerificationError::AlgorithmMismatch(
            alg.unwrap_or("none").to_owned(),
        ));
    }

    if !rs256_verify(parts.signing_input.as_bytes(), &signature, public_key) {
        debug!("token signature rejected");
        return Err(VerificationError::InvalidSignature);
    }

    match header.get("kid").and_then(Value::as_str) {
        Some(found) if found == kid => {}
        found => {
            return Err(VerificationError::KidMismatch {
                expected: kid.to_owned(),
                found: found.unwrap_or("none").to_owned(),
            });
        }
    }

    let payload = decode_object(parts.payload, "payload")?;

    if let Some(exp) = payload.get("exp") {
        let exp = exp.as_f64().ok_or_else(|| {
            VerificationError::MalformedToken("the exp claim is not numeric".to_owned())
        })?;
        if exp <= now as f64 {
            return Err(VerificationError::ExpiredToken { exp: exp as i64 });
        }
    }

    Ok(payload)
}

struct Parts<'a> {
    header: &'a str,
    payload: &'a str,
    signature: &'a str,
    signing_input: &'a str,
}

fn split(token: &str) -> Result<Parts<'_>, VerificationError> {
    let segments: Vec<&str> = token.split('.').collect();
    let [header, payload, signature] = segments[..] else {
        return Err(VerificationError::MalformedToken(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    };
    if header.is_empty() || payload.is_empty() || signature.is_empty() {
        return Err(VerificationError::MalformedToken(
            "empty token segment".to_owned(),
        ));
    }
    Ok(Parts {
        header,
        payload,
        signature,
        // the signature covers the segments as sent, not a re-encoding
        signing_input: &token[..header.len() + 1 + payload.len()],
    })
}

fn decode_object(segment: &str, name: &str) -> Result<Map<String, Value>, VerificationError> {
    let bytes = URL_SAFE_NO_PAD.decode(segment).map_err(|e| {
        VerificationError::MalformedToken(format!("the {name} is not base64url: {e}"))
    })?;
    match serde_json::from_slice(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(VerificationError::MalformedToken(format!(
            "the {name} is not a JSON object"
        ))),
        Err(e) => Err(VerificationError::MalformedToken(format!(
            "the {name} is not valid JSON: {e}"
        ))),
    }
}

fn rs256_verify(data: &[u8], signature: &[u8], public_key: &RsaPublicKey) -> bool {
    let verify = || -> Result<bool, openssl::error::ErrorStack> {
        let mut verifier = Verifier::new(MessageDigest::sha256(), public_key.pkey())?;
        verifier.set_rsa_padding(Padding::PKCS1)?;
        verifier.update(data)?;
        verifier.verify(signature)
    };
    // OpenSSL reports some malformed signatures as errors rather than `false`
    verify().unwrap_or(false)
}
