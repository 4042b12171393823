use serde::{Deserialize, Deserializer, Serialize};

/// One participant's submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,

    /// Always persisted as an array, accepted as a string or an array.
    #[serde(default, deserialize_with = "normalized_checks")]
    pub checks: Vec<String>,

    /// `YYYY-MM-DD HH:MM:SS` in the store's civil-time offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl Record {
    pub fn new(name: impl Into<String>, checks: impl Into<Checks>, time: Option<String>) -> Self {
        Self {
            name: name.into(),
            checks: checks.into().into_labels(),
            time,
        }
    }

    pub fn has_check(&self, label: &str) -> bool {
        self.checks.iter().any(|check| check == label)
    }
}

/// Selected mission labels as they arrive: a lone label or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Checks {
    One(String),
    Many(Vec<String>),
}

impl Checks {
    pub fn into_labels(self) -> Vec<String> {
        match self {
            Checks::One(label) => vec![label],
            Checks::Many(labels) => labels,
        }
    }
}

impl From<String> for Checks {
    fn from(label: String) -> Self {
        Checks::One(label)
    }
}

impl From<&str> for Checks {
    fn from(label: &str) -> Self {
        Checks::One(label.to_string())
    }
}

impl From<Vec<String>> for Checks {
    fn from(labels: Vec<String>) -> Self {
        Checks::Many(labels)
    }
}

impl From<Vec<&str>> for Checks {
    fn from(labels: Vec<&str>) -> Self {
        Checks::Many(labels.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Checks {
    fn from(labels: [&str; N]) -> Self {
        Checks::Many(labels.into_iter().map(str::to_string).collect())
    }
}

fn normalized_checks<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Checks>::deserialize(deserializer)?
        .map(Checks::into_labels)
        .unwrap_or_default())
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
