use crate::error::CryptoError;

pub type CryptoResult<R> = Result<R, CryptoError>;

/// Turn a missing value into a [`CryptoError::Default`] carrying `context`
pub trait CryptoResultHelper<T> {
    fn context(self, context: &str) -> CryptoResult<T>;
}

impl<T> CryptoResultHelper<T> for Option<T> {
    fn context(self, context: &str) -> CryptoResult<T> {
        self.ok_or_else(|| CryptoError::Default(context.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::CryptoResultHelper;

    #[test]
    fn option_context() {
        assert_eq!(Some(3).context("unused").ok(), Some(3));
        let err = None::<u8>.context("no value").err().map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("no value"));
    }
}
