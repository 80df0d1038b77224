use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use shared::error::{ApiError, ErrorCode};

/// A fully rendered error page. Built by `AppState::error_page`.
#[derive(Debug)]
pub(crate) struct PageError {
    pub(crate) status: StatusCode,
    pub(crate) body: Html<String>,
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        (self.status, self.body).into_response()
    }
}

pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// What the visitor gets to read. Internal details stay in the logs.
pub(crate) fn public_message(err: &ApiError) -> &str {
    match err.code {
        ErrorCode::Internal => "Something went wrong while talking to the database.",
        _ => &err.message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_details_are_not_shown_to_visitors() {
        let err = ApiError::new(ErrorCode::Internal, "database error: pool timed out");
        assert!(!public_message(&err).contains("pool"));
        assert_eq!(status_for(err.code), StatusCode::INTERNAL_SERVER_ERROR);

        let err = ApiError::not_found("article not found");
        assert_eq!(public_message(&err), "article not found");
        assert_eq!(status_for(err.code), StatusCode::NOT_FOUND);
    }
}
