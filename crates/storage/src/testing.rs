//! Store doubles for exercising error paths in crates built on [`ArticleStore`].

use async_trait::async_trait;
use shared::domain::{Article, ArticleId, NewArticle};

use crate::{ArticleStore, Result, StoreError};

/// Fails every call as if the connection pool had been closed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStore;

fn pool_closed() -> StoreError {
    StoreError::Database(sqlx::Error::PoolClosed)
}

#[async_trait]
impl ArticleStore for FailingStore {
    async fn create_article(&self, _: &NewArticle) -> Result<ArticleId> {
        Err(pool_closed())
    }

    async fn list_articles(&self) -> Result<Vec<Article>> {
        Err(pool_closed())
    }

    async fn find_article(&self, _: ArticleId) -> Result<Option<Article>> {
        Err(pool_closed())
    }

    async fn update_article(&self, _: ArticleId, _: &NewArticle) -> Result<bool> {
        Err(pool_closed())
    }

    async fn delete_article(&self, _: ArticleId) -> Result<bool> {
        Err(pool_closed())
    }

    async fn health_check(&self) -> Result<()> {
        Err(pool_closed())
    }
}
