//! Page rendering. Templates are compiled into the binary and parsed once at
//! startup; each page gets a typed context struct.

use axum::response::Html;
use serde::Serialize;
use shared::{
    domain::Article,
    protocol::{ArticleForm, Notice},
    validation::FieldError,
};
use tera::{Context, Tera};

const TEMPLATES: [(&str, &str); 7] = [
    ("layout.html", include_str!("../templates/layout.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("article.html", include_str!("../templates/article.html")),
    ("article_form.html", include_str!("../templates/article_form.html")),
    ("add_article.html", include_str!("../templates/add_article.html")),
    ("edit_article.html", include_str!("../templates/edit_article.html")),
    ("error.html", include_str!("../templates/error.html")),
];

pub(crate) struct Views {
    tera: Tera,
}

#[derive(Serialize)]
pub(crate) struct IndexPage<'a> {
    pub title: &'a str,
    pub notice: Option<&'a Notice>,
    pub articles: &'a [Article],
}

#[derive(Serialize)]
pub(crate) struct ArticlePage<'a> {
    pub title: &'a str,
    pub notice: Option<&'a Notice>,
    pub article: &'a Article,
}

#[derive(Serialize)]
pub(crate) struct FormPage<'a> {
    pub title: &'a str,
    pub notice: Option<&'a Notice>,
    pub action: &'a str,
    pub submit_label: &'a str,
    pub values: &'a ArticleForm,
    pub errors: &'a [FieldError],
}

#[derive(Serialize)]
pub(crate) struct ErrorPage<'a> {
    pub title: &'a str,
    pub notice: Option<&'a Notice>,
    pub status: u16,
    pub message: &'a str,
}

impl Views {
    pub(crate) fn new() -> tera::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Self { tera })
    }

    pub(crate) fn render(&self, template: &str, page: &impl Serialize) -> tera::Result<Html<String>> {
        let context = Context::from_serialize(page)?;
        self.tera.render(template, &context).map(Html)
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::ArticleId;

    use super::*;

    #[test]
    fn every_template_parses() {
        Views::new().expect("templates");
    }

    #[test]
    fn article_fields_are_escaped() {
        let views = Views::new().expect("templates");
        let article = Article {
            id: ArticleId(3),
            title: "<script>alert(1)</script>".into(),
            author: "Mallory & co".into(),
            body: "plain".into(),
        };
        let html = views
            .render(
                "article.html",
                &ArticlePage {
                    title: "Article",
                    notice: None,
                    article: &article,
                },
            )
            .expect("render");
        assert!(!html.0.contains("<script>alert(1)</script>"));
        assert!(html.0.contains("&lt;script&gt;"));
        assert!(html.0.contains("Written by Mallory &amp; co"));
    }

    #[test]
    fn notice_banner_uses_level_as_alert_class() {
        let views = Views::new().expect("templates");
        let notice = Notice::success("Article Added");
        let html = views
            .render(
                "index.html",
                &IndexPage {
                    title: "Articles",
                    notice: Some(&notice),
                    articles: &[],
                },
            )
            .expect("render");
        assert!(html.0.contains(r#"class="alert alert-success""#));
        assert!(html.0.contains("Article Added"));
        assert!(html.0.contains("No articles yet."));
    }
}
