// src/ingest/types.rs
use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize};

/// Upstream a record came from. Serialized as the lowercase tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Arxiv,
    News,
    Github,
}

impl Source {
    /// Canonical fetch order.
    pub const ALL: [Source; 3] = [Source::Arxiv, Source::News, Source::Github];

    pub fn as_str(self) -> &'static str {
        match self {
            Source::Arxiv => "arxiv",
            Source::News => "news",
            Source::Github => "github",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(name))
    }

    /// Sources followed by a fixed courtesy pause.
    pub fn is_rate_limited(self) -> bool {
        matches!(self, Source::Arxiv | Source::News)
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized item from one upstream source.
///
/// Every string key is always emitted, even when empty; absent or `null`
/// input keys read as `""`. Keys this type does not know about are kept in
/// `extra` so later stages re-emit them untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultRecord {
    pub source: Source,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    /// Abstract, seen-date or description depending on `source`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    /// Carried through verbatim, never parsed.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub published: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_summary: Option<String>,
}

impl ResultRecord {
    pub fn new(
        source: Source,
        title: impl Into<String>,
        summary: impl Into<String>,
        url: impl Into<String>,
        published: impl Into<String>,
    ) -> Self {
        Self {
            source,
            title: title.into(),
            summary: summary.into(),
            url: url.into(),
            published: published.into(),
            extra: serde_json::Map::new(),
            llm_summary: None,
        }
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    /// Run one search against the upstream and map every hit to a record.
    async fn fetch(&self, query: &str, limit: u32) -> Result<Vec<ResultRecord>>;
    fn source(&self) -> Source;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_strings_read_as_empty() {
        let rec: ResultRecord = serde_json::from_str(
            r#"{"source":"github","title":"a/b","summary":null,"url":"http://x","published":null}"#,
        )
        .unwrap();
        assert_eq!(rec.summary, "");
        assert_eq!(rec.published, "");
        assert_eq!(rec.title, "a/b");
    }

    #[test]
    fn non_string_title_is_rejected() {
        assert!(serde_json::from_str::<ResultRecord>(r#"{"source":"news","title":7}"#).is_err());
    }
}
