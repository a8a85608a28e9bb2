use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Room {
    pub id: i64,
    pub name: String,
    #[serde(rename = "beschreibung", default)]
    pub description: Option<String>,
}
