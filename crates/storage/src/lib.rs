use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;
use tracing::debug;

use shared::domain::{Article, ArticleId, NewArticle};

pub use sqlx;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to apply migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("failed to create parent directory '{}' for database url '{database_url}': {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        database_url: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Persistence for articles. Every call either yields its value or a
/// [`StoreError`]; "no such article" is a value (`None` / `false`), not an
/// error.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    async fn create_article(&self, article: &NewArticle) -> Result<ArticleId>;

    /// All articles in insertion order.
    async fn list_articles(&self) -> Result<Vec<Article>>;

    async fn find_article(&self, id: ArticleId) -> Result<Option<Article>>;

    /// Overwrites title, author and body. Returns `false` when `id` matched
    /// nothing.
    async fn update_article(&self, id: ArticleId, article: &NewArticle) -> Result<bool>;

    /// Returns `false` when `id` matched nothing.
    async fn delete_article(&self, id: ArticleId) -> Result<bool>;

    async fn health_check(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        debug!(%database_url, "article store ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl ArticleStore for Storage {
    async fn create_article(&self, article: &NewArticle) -> Result<ArticleId> {
        let rec =
            sqlx::query("INSERT INTO articles (title, author, body) VALUES (?, ?, ?) RETURNING id")
                .bind(&article.title)
                .bind(&article.author)
                .bind(&article.body)
                .fetch_one(&self.pool)
                .await?;
        Ok(ArticleId(rec.try_get::<i64, _>(0)?))
    }

    async fn list_articles(&self) -> Result<Vec<Article>> {
        let rows = sqlx::query("SELECT id, title, author, body FROM articles ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(article_from_row).collect()
    }

    async fn find_article(&self, id: ArticleId) -> Result<Option<Article>> {
        let row = sqlx::query("SELECT id, title, author, body FROM articles WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(article_from_row).transpose()
    }

    async fn update_article(&self, id: ArticleId, article: &NewArticle) -> Result<bool> {
        let affected = sqlx::query("UPDATE articles SET title = ?, author = ?, body = ? WHERE id = ?")
            .bind(&article.title)
            .bind(&article.author)
            .bind(&article.body)
            .bind(id.0)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn delete_article(&self, id: ArticleId) -> Result<bool> {
        let affected = sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

fn article_from_row(row: &SqliteRow) -> Result<Article> {
    Ok(Article {
        id: ArticleId(row.try_get("id")?),
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        body: row.try_get("body")?,
    })
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
        path: parent.to_path_buf(),
        database_url: database_url.to_string(),
        source,
    })
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() || path == ":memory:" {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
