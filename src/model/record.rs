use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A tag entry as the external record source emits it: a bare name, a
/// `{id, name}` descriptor, or something malformed (silently dropped
/// during normalization).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagRef {
    Name(String),
    Descriptor {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
    Other(Value),
}

impl TagRef {
    /// The display name carried by this entry, if it has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            TagRef::Name(name) => Some(name.as_str()),
            TagRef::Descriptor { name, .. } => name.as_deref(),
            TagRef::Other(_) => None,
        }
    }
}

/// A parent reference: a bare task identifier or an `{id, name}`
/// descriptor.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ParentRef {
    Id(String),
    Descriptor {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
    Other(Value),
}

impl ParentRef {
    /// The referenced identifier, if this entry carries one.
    pub fn id(&self) -> Option<&str> {
        match self {
            ParentRef::Id(id) => Some(id.as_str()),
            ParentRef::Descriptor { id, .. } => id.as_deref(),
            ParentRef::Other(_) => None,
        }
    }
}

/// A task record as fetched from the external source. Every field beyond
/// the identifier is optional or loosely typed; a field of the wrong JSON
/// type degrades to its default instead of failing the record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskRecord {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(deserialize_with = "lenient_id")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub note: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub completed: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub dropped: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub flagged: bool,
    #[serde(deserialize_with = "lenient_string")]
    pub due_date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub defer_date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub planned_date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub completion_date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub creation_date: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub estimated_minutes: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub project: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub project_name: Option<String>,
    pub parent: Option<ParentRef>,
    pub parent_task_info: Option<ParentRef>,
    #[serde(deserialize_with = "lenient_tags")]
    pub tags: Vec<TagRef>,
    #[serde(deserialize_with = "lenient_bool")]
    pub in_inbox: bool,
}

impl TaskRecord {
    /// The declared parent identifier. The record's own `parent` reference
    /// wins over the embedded descriptor; blank identifiers count as
    /// absent.
    pub fn parent_id(&self) -> Option<&str> {
        for parent in [&self.parent, &self.parent_task_info] {
            if let Some(id) = parent.as_ref().and_then(|p| p.id()) {
                let id = id.trim();
                if !id.is_empty() {
                    return Some(id);
                }
            }
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Lenient field deserializers
// ---------------------------------------------------------------------------

fn lenient_id<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(de: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Bool(b) => b,
        _ => false,
    })
}

fn lenient_number<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Number(n) => n.as_f64(),
        _ => None,
    })
}

fn lenient_tags<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<TagRef>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or(TagRef::Other(Value::Null)))
            .collect(),
        _ => Vec::new(),
    })
}
