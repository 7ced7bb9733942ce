use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned optimistic-concurrency token.
///
/// The backend uses the note's `updated_at` timestamp; the client never
/// interprets it, it only echoes the last observed value back on save.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(transparent)]
pub(crate) struct VersionToken(pub String);

impl VersionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Which category a note belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub(crate) enum CategoryRef {
    Assigned(String),
    #[default]
    Unassigned,
}

impl CategoryRef {
    pub fn id(&self) -> Option<&str> {
        match self {
            CategoryRef::Assigned(id) => Some(id.as_str()),
            CategoryRef::Unassigned => None,
        }
    }
}

impl From<Option<String>> for CategoryRef {
    fn from(id: Option<String>) -> Self {
        match id {
            Some(id) if !id.trim().is_empty() => CategoryRef::Assigned(id),
            _ => CategoryRef::Unassigned,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Category {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_count: Option<u32>,
}

/// Nested category object as embedded in a note payload.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct CategorySummary {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Note {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// The backend nulls this out when the category is deleted.
    #[serde(default)]
    pub category: Option<CategorySummary>,
    pub updated_at: VersionToken,
}

impl Note {
    pub fn category_ref(&self) -> CategoryRef {
        self.category.as_ref().map(|c| c.id.clone()).into()
    }
}

/// Ids come back as JSON integers from the backend; keep them opaque strings.
pub(crate) fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Str(String),
        Int(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Str(s) => s,
        RawId::Int(n) => n.to_string(),
    })
}
