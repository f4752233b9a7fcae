pub use error::{CryptoError, result::CryptoResult, result::CryptoResultHelper};
pub use jwk::{
    Jwk, Jwks, build_jwk, build_jwks, int_to_unpadded_base64url, unpadded_base64url_to_int,
};
pub use key_material::{
    KeyMaterial, RsaPrivateKey, RsaPublicKey, load_private_key, load_public_key, read_key_source,
};
pub use token::{
    ClaimSet, IssuedToken, TokenConfig, TokenService, VerificationError, issue, verify, verify_at,
};

mod error;
pub mod jwk;
pub mod key_material;
pub mod token;

/// The only signing algorithm issued and accepted
pub const RS256: &str = "RS256";
