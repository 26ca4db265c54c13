// Campaign domain types. Field names follow the JSON interchange format used
// by the export/import bundles and the HTTP API (camelCase on the wire).
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

// A named in-world location that scopes quests, leads and NPCs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hub {
    pub id: String,
    #[serde(default)]
    pub campaign_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_location_name: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EntityStatus {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityStatus::Open => write!(f, "Open"),
            EntityStatus::InProgress => write!(f, "In Progress"),
            EntityStatus::Resolved => write!(f, "Resolved"),
        }
    }
}

impl EntityStatus {
    /// Open and In Progress items are the ones still worth suggesting.
    pub fn is_active(&self) -> bool {
        matches!(self, EntityStatus::Open | EntityStatus::InProgress)
    }
}

// An open narrative thread with a manually assigned importance (1-5).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    #[serde(default)]
    pub campaign_id: String,
    #[serde(default)]
    pub hub_id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub status: EntityStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<u8>, // 1-5, higher = more urgent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_npc_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_quest_ids: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    #[serde(default)]
    pub campaign_id: String,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hub_id: Option<String>, // Optional link to a hub.
    #[serde(default)]
    pub status: EntityStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Npc {
    pub id: String,
    #[serde(default)]
    pub campaign_id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hub_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessIdea {
    pub id: String,
    #[serde(default)]
    pub campaign_id: String,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionNote {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionMode {
    #[default]
    Default,
    InterrogateNpc,
    InvestigateLead,
    BusinessPlanning,
    CombatSpells,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionMode::Default => write!(f, "default"),
            SessionMode::InterrogateNpc => write!(f, "interrogate-npc"),
            SessionMode::InvestigateLead => write!(f, "investigate-lead"),
            SessionMode::BusinessPlanning => write!(f, "business-planning"),
            SessionMode::CombatSpells => write!(f, "combat-spells"),
        }
    }
}

// A timestamped log entry of player-reported narrative text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEvent {
    pub id: String,
    #[serde(default)]
    pub campaign_id: String,
    #[serde(default)]
    pub created_at: String, // ISO-8601 timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hub_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(default)]
    pub mode: SessionMode,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_quest_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_lead_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_npc_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterProfile {
    pub id: String,
    #[serde(default)]
    pub campaign_id: String,
    pub name: String,
    #[serde(default)]
    pub class_and_level: String, // e.g. "Paladin 5".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>, // Free text: key spells, features, fighting style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dnd_beyond_url: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionSource {
    Llm,
    RulesFallback,
}

impl fmt::Display for OptionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionSource::Llm => write!(f, "llm"),
            OptionSource::RulesFallback => write!(f, "rules-fallback"),
        }
    }
}

/// One actionable suggestion for what the player could do next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextOption {
    pub id: String,
    pub title: String,
    pub bullets: Vec<String>, // 2-4 short strings expanding on the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<OptionSource>,
}

/// Deserialize an array field leniently: a missing or wrong-typed field and
/// entries that do not fit the entity shape all collapse to "not there"
/// instead of failing the whole request.
pub(crate) fn lenient_vec<T: DeserializeOwned>(value: Option<&Value>) -> Vec<T> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect(),
        _ => Vec::new(),
    }
}
