use crate::error::IssuerError;

pub type IssuerResult<R> = Result<R, IssuerError>;

/// A helper trait for `IssuerResult` that provides additional methods for error handling.
pub trait IssuerResultHelper<T> {
    /// Sets the context for the error.
    ///
    /// # Errors
    ///
    /// Returns an `IssuerResult` with the specified context if the original result is an error.
    fn context(self, context: &str) -> IssuerResult<T>;

    /// Sets the context for the error using a closure.
    ///
    /// # Errors
    ///
    /// Returns an `IssuerResult` with the context returned by the closure if the original result is an error.
    fn with_context<O>(self, op: O) -> IssuerResult<T>
    where
        O: FnOnce() -> String;
}

impl<T, E> IssuerResultHelper<T> for Result<T, E>
where
    E: std::error::Error,
{
    fn context(self, context: &str) -> IssuerResult<T> {
        self.map_err(|e| IssuerError::ServerError(format!("{context}: {e}")))
    }

    fn with_context<O>(self, op: O) -> IssuerResult<T>
    where
        O: FnOnce() -> String,
    {
        self.map_err(|e| IssuerError::ServerError(format!("{}: {e}", op())))
    }
}

impl<T> IssuerResultHelper<T> for Option<T> {
    fn context(self, context: &str) -> IssuerResult<T> {
        self.ok_or_else(|| IssuerError::ServerError(context.to_owned()))
    }

    fn with_context<O>(self, op: O) -> IssuerResult<T>
    where
        O: FnOnce() -> String,
    {
        self.ok_or_else(|| IssuerError::ServerError(op()))
    }
}
