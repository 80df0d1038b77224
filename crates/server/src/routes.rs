use std::sync::Arc;

use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use shared::{
    domain::{Article, ArticleId},
    error::{ApiError, ErrorCode},
    protocol::{ArticleForm, Notice},
    validation::FieldError,
};
use tracing::{debug, info, warn};
use url::form_urlencoded;

use crate::{
    app_state::AppState,
    error::PageError,
    views::{ArticlePage, FormPage, IndexPage},
};

const NOTICE_LEVEL_HEADER: &str = "x-notice-level";
const NOTICE_MESSAGE_HEADER: &str = "x-notice-message";

#[derive(Debug, Deserialize)]
pub(crate) struct NoticeQuery {
    notice: Option<String>,
    message: Option<String>,
}

enum FormKind {
    Add,
    Edit(ArticleId),
}

impl FormKind {
    fn template(&self) -> &'static str {
        match self {
            Self::Add => "add_article.html",
            Self::Edit(_) => "edit_article.html",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Self::Add => "Add Article",
            Self::Edit(_) => "Edit Article",
        }
    }

    fn action(&self) -> String {
        match self {
            Self::Add => "/articles/add".to_string(),
            Self::Edit(article_id) => format!("/articles/edit/{article_id}"),
        }
    }
}

pub(crate) async fn healthz(State(state): State<Arc<AppState>>) -> Result<&'static str, StatusCode> {
    server_api::health(&state.api)
        .await
        .map(|()| "ok")
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)
}

pub(crate) async fn list_articles(
    State(state): State<Arc<AppState>>,
    query: Result<Query<NoticeQuery>, QueryRejection>,
) -> Result<Html<String>, PageError> {
    let notice = match query {
        Ok(Query(q)) => Notice::from_parts(q.notice.as_deref(), q.message.as_deref()),
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "ignoring unreadable notice parameters");
            None
        }
    };
    let articles = server_api::list_articles(&state.api)
        .await
        .map_err(|e| state.error_page(&e))?;
    state.render(
        "index.html",
        &IndexPage {
            title: "Articles",
            notice: notice.as_ref(),
            articles: &articles,
        },
    )
}

pub(crate) async fn show_article(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, PageError> {
    let article_id = parse_article_id(&raw_id).map_err(|e| state.error_page(&e))?;
    let article = server_api::get_article(&state.api, article_id)
        .await
        .map_err(|e| state.error_page(&e))?;
    state.render(
        "article.html",
        &ArticlePage {
            title: "Article",
            notice: None,
            article: &article,
        },
    )
}

pub(crate) async fn new_article_form(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, PageError> {
    render_form(&state, &FormKind::Add, &ArticleForm::default(), &[])
}

pub(crate) async fn create_article(
    State(state): State<Arc<AppState>>,
    form: Result<Form<ArticleForm>, FormRejection>,
) -> Result<Response, PageError> {
    let Form(form) = form.map_err(|rejection| form_rejected(&state, rejection))?;
    match server_api::create_article(&state.api, &form).await {
        Ok(_) => Ok(redirect_with_notice("/", &Notice::success("Article Added"))),
        Err(err) => form_failure(&state, &FormKind::Add, &form, err),
    }
}

pub(crate) async fn edit_article_form(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, PageError> {
    let article_id = parse_article_id(&raw_id).map_err(|e| state.error_page(&e))?;
    let article = server_api::get_article(&state.api, article_id)
        .await
        .map_err(|e| state.error_page(&e))?;
    render_form(
        &state,
        &FormKind::Edit(article_id),
        &form_values(article),
        &[],
    )
}

pub(crate) async fn update_article(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    form: Result<Form<ArticleForm>, FormRejection>,
) -> Result<Response, PageError> {
    let article_id = parse_article_id(&raw_id).map_err(|e| state.error_page(&e))?;
    let Form(form) = form.map_err(|rejection| form_rejected(&state, rejection))?;
    match server_api::update_article(&state.api, article_id, &form).await {
        Ok(_) => Ok(redirect_with_notice("/", &Notice::success("Article Updated"))),
        Err(err) => form_failure(&state, &FormKind::Edit(article_id), &form, err),
    }
}

/// Answers `Success` whether or not anything was removed.
pub(crate) async fn delete_article(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Response, PageError> {
    match raw_id.parse::<ArticleId>() {
        Ok(article_id) => {
            server_api::delete_article(&state.api, article_id)
                .await
                .map_err(|e| state.error_page(&e))?;
        }
        Err(_) => info!(%raw_id, "delete ignored malformed article id"),
    }
    let notice = Notice::danger("Article Deleted");
    Ok((notice_headers(&notice), "Success").into_response())
}

pub(crate) async fn not_found(State(state): State<Arc<AppState>>) -> PageError {
    state.error_page(&ApiError::not_found("page not found"))
}

fn parse_article_id(raw_id: &str) -> Result<ArticleId, ApiError> {
    raw_id.parse().map_err(|_| {
        warn!(%raw_id, "malformed article id");
        ApiError::not_found("article not found")
    })
}

/// Undecodable bodies (including unknown fields) are a plain 400 so that 422
/// stays reserved for validation. Other rejections keep their own status,
/// such as 413 for oversized bodies and 415 for the wrong content type.
fn form_rejected(state: &AppState, rejection: FormRejection) -> PageError {
    let status = match rejection {
        FormRejection::FailedToDeserializeForm(_)
        | FormRejection::FailedToDeserializeFormBody(_) => StatusCode::BAD_REQUEST,
        ref other => other.status(),
    };
    warn!(%status, error = %rejection.body_text(), "rejected article form");
    state.error_page_with_status(
        status,
        &ApiError::new(ErrorCode::BadRequest, rejection.body_text()),
    )
}

fn form_values(article: Article) -> ArticleForm {
    ArticleForm {
        title: article.title,
        author: article.author,
        body: article.body,
    }
}

fn render_form(
    state: &AppState,
    kind: &FormKind,
    values: &ArticleForm,
    errors: &[FieldError],
) -> Result<Html<String>, PageError> {
    let action = kind.action();
    state.render(
        kind.template(),
        &FormPage {
            title: kind.title(),
            notice: None,
            action: &action,
            submit_label: "Submit",
            values,
            errors,
        },
    )
}

/// Validation failures re-render the form with what was submitted; anything
/// else becomes an error page.
fn form_failure(
    state: &AppState,
    kind: &FormKind,
    form: &ArticleForm,
    err: ApiError,
) -> Result<Response, PageError> {
    if err.code != ErrorCode::Validation {
        return Err(state.error_page(&err));
    }
    let page = render_form(state, kind, form, &err.fields)?;
    Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
}

fn notice_location(path: &str, notice: &Notice) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("notice", notice.level.as_str())
        .append_pair("message", &notice.message)
        .finish();
    format!("{path}?{query}")
}

fn redirect_with_notice(path: &str, notice: &Notice) -> Response {
    Redirect::to(&notice_location(path, notice)).into_response()
}

fn notice_headers(notice: &Notice) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        NOTICE_LEVEL_HEADER,
        HeaderValue::from_static(notice.level.as_str()),
    );
    if let Ok(value) = HeaderValue::from_str(&notice.message) {
        headers.insert(NOTICE_MESSAGE_HEADER, value);
    }
    headers
}
