use std::sync::Arc;

use shared::{
    domain::{Article, ArticleId},
    error::{ApiError, ErrorCode},
    protocol::ArticleForm,
};
use storage::{ArticleStore, StoreError};
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<dyn ArticleStore>,
}

impl ApiContext {
    pub fn new(store: impl ArticleStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

pub async fn list_articles(ctx: &ApiContext) -> Result<Vec<Article>, ApiError> {
    ctx.store.list_articles().await.map_err(internal)
}

pub async fn get_article(ctx: &ApiContext, article_id: ArticleId) -> Result<Article, ApiError> {
    ctx.store
        .find_article(article_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| {
            warn!(%article_id, "article not found");
            ApiError::not_found("article not found")
        })
}

pub async fn create_article(ctx: &ApiContext, form: &ArticleForm) -> Result<Article, ApiError> {
    let article = form.validate().map_err(ApiError::validation)?;
    let article_id = ctx
        .store
        .create_article(&article)
        .await
        .map_err(internal)?;
    info!(%article_id, title = %article.title, "article created");
    Ok(article.into_article(article_id))
}

/// Edits go through the same rules as additions, but only once the target
/// is known to exist: an unknown id is `NotFound` whatever was submitted.
pub async fn update_article(
    ctx: &ApiContext,
    article_id: ArticleId,
    form: &ArticleForm,
) -> Result<Article, ApiError> {
    get_article(ctx, article_id).await?;
    let article = form.validate().map_err(ApiError::validation)?;
    // The article can still vanish between the lookup and the write.
    let matched = ctx
        .store
        .update_article(article_id, &article)
        .await
        .map_err(internal)?;
    if !matched {
        warn!(%article_id, "update targeted a missing article");
        return Err(ApiError::not_found("article not found"));
    }
    info!(%article_id, "article updated");
    Ok(article.into_article(article_id))
}

/// Returns whether a record was removed. A miss is not an error.
pub async fn delete_article(ctx: &ApiContext, article_id: ArticleId) -> Result<bool, ApiError> {
    let removed = ctx
        .store
        .delete_article(article_id)
        .await
        .map_err(internal)?;
    if removed {
        info!(%article_id, "article deleted");
    } else {
        info!(%article_id, "delete matched no article");
    }
    Ok(removed)
}

pub async fn health(ctx: &ApiContext) -> Result<(), ApiError> {
    ctx.store.health_check().await.map_err(internal)
}

fn internal(err: StoreError) -> ApiError {
    error!(error = %err, "article store failure");
    ApiError::new(ErrorCode::Internal, err.to_string())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
