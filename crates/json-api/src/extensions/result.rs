//! Result helper extensions for HTTP handlers.

use std::fmt::Display;

use salvo::prelude::StatusError;
use tracing::error;

/// Map errors to HTTP errors.
pub(crate) trait ResultExt<T> {
    /// Log the error and respond with 500, keeping its message as the detail.
    fn or_500(self, context: &str) -> Result<T, StatusError>;

    /// Respond with 400, describing the problem with the error's message.
    fn or_400(self) -> Result<T, StatusError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Display,
{
    fn or_500(self, context: &str) -> Result<T, StatusError> {
        self.map_err(|error| {
            error!("{context}: {error}");

            StatusError::internal_server_error().detail(format!("{context}: {error}"))
        })
    }

    fn or_400(self) -> Result<T, StatusError> {
        self.map_err(|error| StatusError::bad_request().brief(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn internal_errors_keep_their_message() {
        let result: Result<(), &str> = Err("pool timed out");

        let error = result.or_500("listing orders").err();

        assert_eq!(
            error.as_ref().map(|error| error.code),
            Some(StatusCode::INTERNAL_SERVER_ERROR)
        );
        assert_eq!(
            error.and_then(|error| error.detail),
            Some("listing orders: pool timed out".to_string())
        );
    }
}
