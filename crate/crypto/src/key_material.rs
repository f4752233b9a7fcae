//! RSA key material used to sign and verify tokens.
//!
//! Keys are parsed once from PEM and never mutated afterwards, so a
//! [`KeyMaterial`] can be shared between threads behind an `Arc`.

use std::{fmt, path::Path};

use openssl::{
    bn::BigNumRef,
    pkey::{Id, PKey, Private, Public},
    rsa::Rsa,
};
use tracing::debug;

use crate::{crypto_ensure, error::CryptoError, error::result::CryptoResult};

/// An RSA public key, kept both as a generic `PKey` for signature
/// verification and as an `Rsa` for access to the modulus and exponent.
pub struct RsaPublicKey {
    pkey: PKey<Public>,
    rsa: Rsa<Public>,
}

impl RsaPublicKey {
    /// The modulus `n`
    #[must_use]
    pub fn n(&self) -> &BigNumRef {
        self.rsa.n()
    }

    /// The public exponent `e`
    #[must_use]
    pub fn e(&self) -> &BigNumRef {
        self.rsa.e()
    }

    #[must_use]
    pub fn bits(&self) -> u32 {
        self.pkey.bits()
    }

    pub(crate) fn pkey(&self) -> &PKey<Public> {
        &self.pkey
    }
}

impl TryFrom<PKey<Public>> for RsaPublicKey {
    type Error = CryptoError;

    fn try_from(pkey: PKey<Public>) -> CryptoResult<Self> {
        crypto_ensure!(
            pkey.id() == Id::RSA,
            CryptoError::KeyLoad("the public key is not an RSA key".to_owned())
        );
        let rsa = pkey
            .rsa()
            .map_err(|e| CryptoError::KeyLoad(format!("invalid RSA public key: {e}")))?;
        Ok(Self { pkey, rsa })
    }
}

impl fmt::Debug for RsaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPublicKey")
            .field("bits", &self.bits())
            .field("e", &self.e().to_dec_str().map(|e| e.to_string()).ok())
            .finish()
    }
}

/// An RSA private key. Its `Debug` output never includes key material.
pub struct RsaPrivateKey {
    pkey: PKey<Private>,
}

impl RsaPrivateKey {
    #[must_use]
    pub fn bits(&self) -> u32 {
        self.pkey.bits()
    }

    /// Whether this private key is the counterpart of `public_key`
    #[must_use]
    pub fn matches(&self, public_key: &RsaPublicKey) -> bool {
        self.pkey.public_eq(public_key.pkey())
    }

    pub(crate) fn pkey(&self) -> &PKey<Private> {
        &self.pkey
    }
}

impl TryFrom<PKey<Private>> for RsaPrivateKey {
    type Error = CryptoError;

    fn try_from(pkey: PKey<Private>) -> CryptoResult<Self> {
        crypto_ensure!(
            pkey.id() == Id::RSA,
            CryptoError::KeyLoad("the private key is not an RSA key".to_owned())
        );
        let rsa = pkey
            .rsa()
            .map_err(|e| CryptoError::KeyLoad(format!("invalid RSA private key: {e}")))?;
        let consistent = rsa.check_key().map_err(|e| {
            CryptoError::KeyLoad(format!("RSA private key consistency check failed: {e}"))
        })?;
        crypto_ensure!(
            consistent,
            CryptoError::KeyLoad("RSA private key consistency check failed".to_owned())
        );
        Ok(Self { pkey })
    }
}

impl fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("bits", &self.bits())
            .field("material", &"[****]")
            .finish()
    }
}

/// Parse a PEM encoded RSA public key.
///
/// Both `SubjectPublicKeyInfo` (`BEGIN PUBLIC KEY`) and PKCS#1
/// (`BEGIN RSA PUBLIC KEY`) encodings are accepted.
///
/// # Errors
///
/// Returns [`CryptoError::KeyLoad`] if the PEM cannot be parsed or does not
/// hold an RSA public key.
pub fn load_public_key(pem: &[u8]) -> CryptoResult<RsaPublicKey> {
    let pkey = match PKey::public_key_from_pem(pem) {
        Ok(pkey) => pkey,
        Err(spki_error) => {
            let rsa = Rsa::public_key_from_pem_pkcs1(pem).map_err(|_| {
                CryptoError::KeyLoad(format!(
                    "not a valid PEM encoded RSA public key: {spki_error}"
                ))
            })?;
            PKey::from_rsa(rsa).map_err(|e| CryptoError::KeyLoad(e.to_string()))?
        }
    };
    let public_key = RsaPublicKey::try_from(pkey)?;
    debug!("loaded RSA public key ({} bits)", public_key.bits());
    Ok(public_key)
}

/// Parse a PEM encoded RSA private key, PKCS#8 (`BEGIN PRIVATE KEY`)
/// or PKCS#1 (`BEGIN RSA PRIVATE KEY`).
///
/// # Errors
///
/// Returns [`CryptoError::KeyLoad`] if the PEM cannot be parsed or does not
/// hold a consistent RSA private key.
pub fn load_private_key(pem: &[u8]) -> CryptoResult<RsaPrivateKey> {
    let pkey = PKey::private_key_from_pem(pem).map_err(|e| {
        CryptoError::KeyLoad(format!("not a valid PEM encoded RSA private key: {e}"))
    })?;
    let private_key = RsaPrivateKey::try_from(pkey)?;
    debug!("loaded RSA private key ({} bits)", private_key.bits());
    Ok(private_key)
}

/// Read the raw bytes of a key source.
///
/// # Errors
///
/// Returns [`CryptoError::KeyLoad`] naming the path if the file cannot be read.
pub fn read_key_source(path: &Path) -> CryptoResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        CryptoError::KeyLoad(format!("cannot read key file {}: {e}", path.display()))
    })
}

/// The RSA key pair of the issuer: the public key published in the JWKS and
/// used for verification, and the private key used for signing.
#[derive(Debug)]
pub struct KeyMaterial {
    public_key: RsaPublicKey,
    private_key: RsaPrivateKey,
}

impl KeyMaterial {
    /// Assemble the key pair.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::KeyLoad`] if the private key does not belong to
    /// the public key.
    pub fn new(public_key: RsaPublicKey, private_key: RsaPrivateKey) -> CryptoResult<Self> {
        crypto_ensure!(
            private_key.matches(&public_key),
            CryptoError::KeyLoad(
                "the private key does not correspond to the public key".to_owned()
            )
        );
        Ok(Self {
            public_key,
            private_key,
        })
    }

    /// Parse both keys from their PEM encodings.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::KeyLoad`] if either key is invalid or the keys do
    /// not form a pair.
    pub fn from_pem(public_pem: &[u8], private_pem: &[u8]) -> CryptoResult<Self> {
        Self::new(load_public_key(public_pem)?, load_private_key(private_pem)?)
    }

    /// Read and parse both keys from PEM files.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::KeyLoad`] if a file is unreadable, a key is
    /// invalid or the keys do not form a pair.
    pub fn from_files(public_key_path: &Path, private_key_path: &Path) -> CryptoResult<Self> {
        let public_key = load_public_key(&read_key_source(public_key_path)?).map_err(|e| {
            CryptoError::KeyLoad(format!("{}: {e}", public_key_path.display()))
        })?;
        let private_key = load_private_key(&read_key_source(private_key_path)?).map_err(|e| {
            CryptoError::KeyLoad(format!("{}: {e}", private_key_path.display()))
        })?;
        Self::new(public_key, private_key)
    }

    #[must_use]
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    #[must_use]
    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }
}
