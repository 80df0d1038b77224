use storage::{testing::FailingStore, Storage};

use super::*;

async fn setup() -> ApiContext {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    ApiContext::new(storage)
}

fn form(title: &str, author: &str, body: &str) -> ArticleForm {
    ArticleForm {
        title: title.into(),
        author: author.into(),
        body: body.into(),
    }
}

#[tokio::test]
async fn well_formed_submission_creates_exactly_one_article() {
    let ctx = setup().await;
    let created = create_article(&ctx, &form("A", "B", "C"))
        .await
        .expect("create");

    let articles = list_articles(&ctx).await.expect("list");
    assert_eq!(articles, vec![created]);
}

#[tokio::test]
async fn empty_fields_create_nothing_and_report_each_field() {
    let ctx = setup().await;
    let err = create_article(&ctx, &form("", "B", ""))
        .await
        .expect_err("should fail validation");
    assert_eq!(err.code, ErrorCode::Validation);
    let fields: Vec<_> = err.fields.iter().map(|f| f.field.as_str()).collect();
    assert_eq!(fields, ["title", "body"]);

    assert!(list_articles(&ctx).await.expect("list").is_empty());
}

#[tokio::test]
async fn update_overwrites_fields_and_keeps_identifier() {
    let ctx = setup().await;
    let created = create_article(&ctx, &form("old", "old", "old"))
        .await
        .expect("create");

    let updated = update_article(&ctx, created.id, &form("new", "newer", "newest"))
        .await
        .expect("update");
    assert_eq!(updated.id, created.id);

    let stored = get_article(&ctx, created.id).await.expect("get");
    assert_eq!(stored.title, "new");
    assert_eq!(stored.author, "newer");
    assert_eq!(stored.body, "newest");
}

#[tokio::test]
async fn update_is_validated_like_create() {
    let ctx = setup().await;
    let created = create_article(&ctx, &form("keep", "me", "intact"))
        .await
        .expect("create");

    let err = update_article(&ctx, created.id, &form("", "", "x"))
        .await
        .expect_err("should fail validation");
    assert_eq!(err.code, ErrorCode::Validation);
    assert_eq!(err.fields.len(), 2);

    let stored = get_article(&ctx, created.id).await.expect("get");
    assert_eq!(stored, created);
}

#[tokio::test]
async fn update_of_unknown_article_is_not_found() {
    let ctx = setup().await;
    let err = update_article(&ctx, ArticleId(77), &form("a", "b", "c"))
        .await
        .expect_err("missing");
    assert_eq!(err.code, ErrorCode::NotFound);
    assert!(list_articles(&ctx).await.expect("list").is_empty());
}

#[tokio::test]
async fn invalid_update_of_unknown_article_is_still_not_found() {
    let ctx = setup().await;
    let err = update_article(&ctx, ArticleId(77), &form("", "b", "c"))
        .await
        .expect_err("missing");
    assert_eq!(err.code, ErrorCode::NotFound);
    assert!(err.fields.is_empty());
}

#[tokio::test]
async fn deleted_article_is_no_longer_found() {
    let ctx = setup().await;
    let created = create_article(&ctx, &form("a", "b", "c"))
        .await
        .expect("create");

    assert!(delete_article(&ctx, created.id).await.expect("delete"));
    let err = get_article(&ctx, created.id).await.expect_err("gone");
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn deleting_unknown_article_changes_nothing() {
    let ctx = setup().await;
    create_article(&ctx, &form("a", "b", "c"))
        .await
        .expect("create");

    assert!(!delete_article(&ctx, ArticleId(12345)).await.expect("delete"));
    assert_eq!(list_articles(&ctx).await.expect("list").len(), 1);
}

#[tokio::test]
async fn store_failures_surface_as_internal_errors() {
    let ctx = ApiContext::new(FailingStore);

    let err = list_articles(&ctx).await.expect_err("list");
    assert_eq!(err.code, ErrorCode::Internal);

    let err = create_article(&ctx, &form("a", "b", "c"))
        .await
        .expect_err("create");
    assert_eq!(err.code, ErrorCode::Internal);

    let err = delete_article(&ctx, ArticleId(1)).await.expect_err("delete");
    assert_eq!(err.code, ErrorCode::Internal);

    assert!(health(&ctx).await.is_err());
}

#[tokio::test]
async fn invalid_submission_is_rejected_before_touching_the_store() {
    let ctx = ApiContext::new(FailingStore);
    let err = create_article(&ctx, &form("", "b", "c"))
        .await
        .expect_err("validation first");
    assert_eq!(err.code, ErrorCode::Validation);
}
