use chrono::DateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Play counts keyed by zone id, as served by the popularity endpoint.
pub type PopularityMap = HashMap<String, u64>;

/// One catalog entry after load: the wire record plus back-filled popularity.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub author: Option<String>,
    pub author_url: Option<String>,
    pub url: String,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub popularity: u64,
    /// Explicit creation order, when the catalog provides one.
    pub added: Option<i64>,
}

impl Zone {
    /// Key used by the "newest" sort: `added` if present, else the id as an integer.
    pub fn recency_key(&self) -> Option<i64> {
        self.added.or_else(|| self.id.trim().parse::<i64>().ok())
    }

    pub fn author_label(&self) -> &str {
        match self.author.as_deref() {
            Some(a) if !a.trim().is_empty() => a,
            _ => "Unknown",
        }
    }

    pub fn author_link(&self) -> &str {
        match self.author_url.as_deref() {
            Some(u) if !u.trim().is_empty() => u,
            _ => "#",
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Zone record exactly as the catalog endpoint serves it.
///
/// Every field but `id` is read leniently: a missing or wrongly typed value
/// becomes its default, so one odd record never aborts a whole refresh.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawZone {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_opt_text")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_text")]
    pub author_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_opt_text")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Option<Vec<String>>,
    #[serde(
        default,
        alias = "created",
        alias = "createdAt",
        deserialize_with = "lenient_timestamp"
    )]
    pub added: Option<i64>,
}

impl RawZone {
    /// Merge in the popularity count (0 when absent) and default the tag list.
    pub fn into_zone(self, popularity: &PopularityMap) -> Zone {
        let plays = popularity.get(&self.id).copied().unwrap_or(0);
        Zone {
            popularity: plays,
            tags: self.tags.unwrap_or_default(),
            id: self.id,
            name: self.name,
            author: self.author,
            author_url: self.author_url,
            url: self.url,
            image: self.image.filter(|i| !i.trim().is_empty()),
            added: self.added,
        }
    }
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Int(n) => n.to_string(),
        IdRepr::Float(f) => f.to_string(),
        IdRepr::Text(s) => s,
    })
}

fn lenient_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_text(deserializer)?.unwrap_or_default())
}

/// Non-string entries are dropped; a non-array value means no tags.
fn lenient_tags<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(tag) => Some(tag),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

/// Integer, numeric string, or RFC 3339 timestamp (as Unix seconds).
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|t| t.timestamp())
            })
        }
        _ => None,
    })
}

/// Gallery ordering chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortMode {
    #[default]
    NameAsc,
    NameDesc,
    Popularity,
    Newest,
}

impl SortMode {
    pub fn next(self) -> Self {
        match self {
            Self::NameAsc => Self::NameDesc,
            Self::NameDesc => Self::Popularity,
            Self::Popularity => Self::Newest,
            Self::Newest => Self::NameAsc,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::NameAsc => Self::Newest,
            Self::NameDesc => Self::NameAsc,
            Self::Popularity => Self::NameDesc,
            Self::Newest => Self::Popularity,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::Popularity => "popularity",
            Self::Newest => "newest",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "name-asc" => Some(Self::NameAsc),
            "name-desc" => Some(Self::NameDesc),
            "popularity" => Some(Self::Popularity),
            "newest" => Some(Self::Newest),
            _ => None,
        }
    }
}
