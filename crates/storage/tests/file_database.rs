use shared::domain::NewArticle;
use storage::{ArticleStore, Storage};

#[tokio::test]
async fn articles_survive_reopening_file_database() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("nodekb.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    let id = storage
        .create_article(&NewArticle {
            title: "Persistent".into(),
            author: "Disk".into(),
            body: "Still here".into(),
        })
        .await
        .expect("create");
    storage.pool().close().await;
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    let reopened = Storage::new(&database_url).await.expect("reopen");
    let article = reopened
        .find_article(id)
        .await
        .expect("find")
        .expect("article persisted");
    assert_eq!(article.title, "Persistent");
}
