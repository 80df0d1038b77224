use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }
    };
}

id_newtype!(ArticleId);

/// A persisted article. Only the store hands these out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub author: String,
    pub body: String,
}

/// Field values for an article that has not been written yet, or that will
/// overwrite an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub author: String,
    pub body: String,
}

impl NewArticle {
    pub fn into_article(self, id: ArticleId) -> Article {
        Article {
            id,
            title: self.title,
            author: self.author,
            body: self.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_id_parses_from_path_segment() {
        assert_eq!("42".parse::<ArticleId>().expect("id"), ArticleId(42));
        assert!("not-an-id".parse::<ArticleId>().is_err());
        assert!("".parse::<ArticleId>().is_err());
    }

    #[test]
    fn article_id_serializes_as_bare_number() {
        let json = serde_json::to_string(&ArticleId(7)).expect("json");
        assert_eq!(json, "7");
    }
}
