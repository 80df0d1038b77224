use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    domain::NewArticle,
    validation::{validate, FieldError, FieldRule, FieldSource},
};

pub const ARTICLE_RULES: [FieldRule; 3] = [
    FieldRule::not_empty("title", "Title is required"),
    FieldRule::not_empty("author", "Author is required"),
    FieldRule::not_empty("body", "Body is required"),
];

/// Submitted add/edit form. Missing fields decode as empty strings so that
/// validation, not deserialization, reports them; unknown fields are refused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArticleForm {
    pub title: String,
    pub author: String,
    pub body: String,
}

impl ArticleForm {
    pub fn validate(&self) -> Result<NewArticle, Vec<FieldError>> {
        let errors = validate(&ARTICLE_RULES, self);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(NewArticle {
            title: self.title.clone(),
            author: self.author.clone(),
            body: self.body.clone(),
        })
    }
}

impl FieldSource for ArticleForm {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "title" => Some(&self.title),
            "author" => Some(&self.author),
            "body" => Some(&self.body),
            _ => None,
        }
    }
}

impl From<NewArticle> for ArticleForm {
    fn from(article: NewArticle) -> Self {
        Self {
            title: article.title,
            author: article.author,
            body: article.body,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Danger,
}

impl NoticeLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoticeLevel {
    type Err = UnknownNoticeLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "danger" => Ok(Self::Danger),
            other => Err(UnknownNoticeLevel(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown notice level '{0}'")]
pub struct UnknownNoticeLevel(pub String);

/// One-shot message shown to the user after an action. It travels with the
/// response that produced it rather than living in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Danger, message)
    }

    /// Rebuilds a notice from loose request parameters. Anything incomplete
    /// or unrecognized yields no notice instead of an error.
    pub fn from_parts(level: Option<&str>, message: Option<&str>) -> Option<Self> {
        let level = level?.parse().ok()?;
        let message = message.map(str::trim).filter(|m| !m.is_empty())?;
        Some(Self::new(level, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_form_becomes_new_article() {
        let form = ArticleForm {
            title: "A".into(),
            author: "B".into(),
            body: "C".into(),
        };
        let article = form.validate().expect("valid");
        assert_eq!(article.title, "A");
        assert_eq!(article.author, "B");
        assert_eq!(article.body, "C");
    }

    #[test]
    fn each_empty_field_reports_one_error() {
        let form = ArticleForm {
            title: String::new(),
            author: "B".into(),
            body: " ".into(),
        };
        let errors = form.validate().expect_err("invalid");
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["title", "body"]);
        assert_eq!(errors[0].message, "Title is required");
    }

    #[test]
    fn form_rejects_unknown_fields_and_defaults_missing_ones() {
        let partial: ArticleForm =
            serde_json::from_str(r#"{"title":"only"}"#).expect("partial form");
        assert_eq!(partial.author, "");

        let unknown = serde_json::from_str::<ArticleForm>(r#"{"title":"t","_id":"x"}"#);
        assert!(unknown.is_err());
    }

    #[test]
    fn notice_from_parts_ignores_garbage() {
        assert_eq!(
            Notice::from_parts(Some("success"), Some("Article Added")),
            Some(Notice::success("Article Added"))
        );
        assert_eq!(Notice::from_parts(Some("loud"), Some("hi")), None);
        assert_eq!(Notice::from_parts(Some("danger"), Some("  ")), None);
        assert_eq!(Notice::from_parts(None, Some("hi")), None);
    }
}
