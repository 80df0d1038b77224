use axum::{http::StatusCode, response::Html};
use serde::Serialize;
use server_api::ApiContext;
use shared::error::{ApiError, ErrorCode};
use tracing::error;

use crate::{
    error::{public_message, status_for, PageError},
    views::{ErrorPage, Views},
};

pub(crate) struct AppState {
    pub(crate) api: ApiContext,
    pub(crate) views: Views,
}

impl AppState {
    pub(crate) fn render(&self, template: &str, page: &impl Serialize) -> Result<Html<String>, PageError> {
        self.views.render(template, page).map_err(|err| {
            error!(template, error = ?err, "failed to render template");
            self.error_page(&ApiError::new(ErrorCode::Internal, err.to_string()))
        })
    }

    pub(crate) fn error_page(&self, err: &ApiError) -> PageError {
        self.error_page_with_status(status_for(err.code), err)
    }

    /// For failures whose status is decided outside [`ErrorCode`], such as
    /// extractor rejections.
    pub(crate) fn error_page_with_status(&self, status: StatusCode, err: &ApiError) -> PageError {
        let page = ErrorPage {
            title: status.canonical_reason().unwrap_or("Error"),
            notice: None,
            status: status.as_u16(),
            message: public_message(err),
        };
        let body = self.views.render("error.html", &page).unwrap_or_else(|render_err| {
            error!(error = ?render_err, "failed to render error page");
            Html(format!("<h1>{}</h1>", status.as_u16()))
        });
        PageError { status, body }
    }
}
