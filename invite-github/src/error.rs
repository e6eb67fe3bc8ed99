use invite_core::ApiError;

/// Translate a ureq failure into the core error sum type.
///
/// Status responses keep their body for [`ApiError::from_response`]; anything
/// that never produced a response is a [`ApiError::NetworkFailure`].
pub fn api_error(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Status(status, response) => {
            let body = response.into_string().unwrap_or_default();
            ApiError::from_response(status, &body)
        }
        ureq::Error::Transport(transport) => ApiError::NetworkFailure(transport.to_string()),
    }
}

/// A 2xx response whose body could not be read or decoded.
pub(crate) fn body_err(err: std::io::Error) -> ApiError {
    ApiError::NetworkFailure(format!("invalid response body: {err}"))
}
