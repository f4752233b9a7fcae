use thiserror::Error;

pub(crate) mod result;

#[derive(Error, Debug)]
pub enum CryptoError {
    /// The key source is unreadable or does not hold a valid RSA key
    #[error("Key load error: {0}")]
    KeyLoad(String),

    /// Signing failed, which only happens with a structurally broken private key
    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Conversion Error: {0}")]
    Conversion(String),

    #[error("{0}")]
    Default(String),

    #[error("OpenSSL Error: {0}")]
    OpenSSL(String),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl From<openssl::error::ErrorStack> for CryptoError {
    fn from(e: openssl::error::ErrorStack) -> Self {
        Self::OpenSSL(format!("Error: {e}. Details: {e:?}"))
    }
}

impl From<base64::DecodeError> for CryptoError {
    fn from(e: base64::DecodeError) -> Self {
        Self::Conversion(e.to_string())
    }
}

/// Return early with an error if a condition is not satisfied.
///
/// This macro is equivalent to `if !$cond { return Err(From::from($err)); }`.
#[macro_export]
macro_rules! crypto_ensure {
    ($cond:expr, $msg:literal $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err($crate::crypto_error!($msg));
        }
    };
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return ::core::result::Result::Err($crate::crypto_error!($fmt, $($arg)*));
        }
    };
}

/// Construct a default crypto error from a string.
#[macro_export]
macro_rules! crypto_error {
    ($msg:literal) => {
        $crate::CryptoError::Default(::core::format_args!($msg).to_string())
    };
    ($err:expr $(,)?) => ({
        $crate::CryptoError::Default($err.to_string())
    });
    ($fmt:expr, $($arg:tt)*) => {
        $crate::CryptoError::Default(::core::format_args!($fmt, $($arg)*).to_string())
    };
}
