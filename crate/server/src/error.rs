use jwt_issuer_crypto::CryptoError;
use thiserror::Error;

// Each error type must have a corresponding HTTP status code (see `routes/mod.rs`)
#[derive(Error, Debug, Clone)]
pub enum IssuerError {
    // The key files are unreadable, invalid or do not form a pair
    #[error("Key load error: {0}")]
    KeyLoad(String),

    // The private key could not produce a signature
    #[error("Signing error: {0}")]
    Signing(String),

    // Missing or malformed arguments in the request
    #[error("Invalid Request: {0}")]
    InvalidRequest(String),

    // When a conversion from/to bytes fails
    #[error("Conversion Error: {0}")]
    ConversionError(String),

    // Any errors related to a bad behavior of the server but not related to the user input
    #[error("Unexpected server error: {0}")]
    ServerError(String),

    // A failure originating from one of the cryptographic primitives
    #[error("Cryptographic error: {0}")]
    Crypto(String),
}

impl From<CryptoError> for IssuerError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::KeyLoad(s) => Self::KeyLoad(s),
            CryptoError::Signing(s) => Self::Signing(s),
            CryptoError::Conversion(s) => Self::ConversionError(s),
            e => Self::Crypto(e.to_string()),
        }
    }
}

impl From<std::io::Error> for IssuerError {
    fn from(e: std::io::Error) -> Self {
        Self::ServerError(e.to_string())
    }
}

impl From<serde_json::Error> for IssuerError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidRequest(e.to_string())
    }
}

impl From<toml::de::Error> for IssuerError {
    fn from(e: toml::de::Error) -> Self {
        Self::ServerError(format!("invalid configuration: {e}"))
    }
}

impl From<tracing::dispatcher::SetGlobalDefaultError> for IssuerError {
    fn from(e: tracing::dispatcher::SetGlobalDefaultError) -> Self {
        Self::ServerError(e.to_string())
    }
}

impl From<tracing_subscriber::filter::ParseError> for IssuerError {
    fn from(e: tracing_subscriber::filter::ParseError) -> Self {
        Self::ServerError(format!("invalid log filter: {e}"))
    }
}

/// Return early with an error if a condition is not satisfied.
///
/// This macro is equivalent to `if !$cond { return Err(From::from($err)); }`.
#[macro_export]
macro_rules! issuer_ensure {
    ($cond:expr, $msg:literal $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err($crate::issuer_error!($msg));
        }
    };
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return ::core::result::Result::Err($crate::issuer_error!($fmt, $($arg)*));
        }
    };
}

/// Construct a server error from a string.
#[macro_export]
macro_rules! issuer_error {
    ($msg:literal) => {
        $crate::error::IssuerError::ServerError(::core::format_args!($msg).to_string())
    };
    ($err:expr $(,)?) => ({
        $crate::error::IssuerError::ServerError($err.to_string())
    });
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::IssuerError::ServerError(::core::format_args!($fmt, $($arg)*).to_string())
    };
}

/// Return early with an error if a condition is not satisfied.
#[macro_export]
macro_rules! issuer_bail {
    ($msg:literal) => {
        return ::core::result::Result::Err($crate::issuer_error!($msg))
    };
    ($err:expr $(,)?) => {
        return ::core::result::Result::Err($err)
    };
    ($fmt:expr, $($arg:tt)*) => {
        return ::core::result::Result::Err($crate::issuer_error!($fmt, $($arg)*))
    };
}

#[allow(clippy::expect_used, clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use jwt_issuer_crypto::CryptoError;

    use super::IssuerError;

    #[test]
    fn test_issuer_error_interpolation() {
        let var = 42;
        let err = issuer_error!("interpolate {var}");
        assert_eq!("Unexpected server error: interpolate 42", err.to_string());

        let err = bail();
        assert_eq!(
            "Unexpected server error: interpolate 43",
            err.unwrap_err().to_string()
        );

        let err = ensure();
        assert_eq!(
            "Unexpected server error: interpolate 44",
            err.unwrap_err().to_string()
        );
    }

    #[test]
    fn crypto_errors_keep_their_kind() {
        assert!(matches!(
            IssuerError::from(CryptoError::KeyLoad("k".to_owned())),
            IssuerError::KeyLoad(s) if s == "k"
        ));
        assert!(matches!(
            IssuerError::from(CryptoError::Signing("s".to_owned())),
            IssuerError::Signing(_)
        ));
        assert!(matches!(
            IssuerError::from(CryptoError::OpenSSL("o".to_owned())),
            IssuerError::Crypto(_)
        ));
    }

    fn bail() -> Result<(), IssuerError> {
        let var = 43;
        issuer_bail!("interpolate {var}");
    }

    fn ensure() -> Result<(), IssuerError> {
        let var = 44;
        issuer_ensure!(false, "interpolate {var}");
        Ok(())
    }
}
