// Session context normalization: turns an arbitrary inbound JSON object into
// a well-formed SessionContext the engine and providers can rely on.
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::campaign::{
    lenient_vec, CharacterProfile, Lead, Npc, Quest, SessionEvent, SessionMode,
};
use crate::error::AppError;

/// How many recent events the context keeps, most-recent-first.
pub const RECENT_EVENTS_WINDOW: usize = 10;

/// Snapshot of campaign state around one "what just happened?" request.
/// Constructed per request and discarded after producing options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_hub_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_location_name: Option<String>,
    #[serde(default)]
    pub mode: SessionMode,
    #[serde(default)]
    pub recent_events: Vec<SessionEvent>,
    #[serde(default)]
    pub open_quests: Vec<Quest>,
    #[serde(default)]
    pub open_leads: Vec<Lead>,
    #[serde(default)]
    pub npcs: Vec<Npc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_profile: Option<CharacterProfile>,
}

impl SessionContext {
    /// A minimal context around a piece of session text. Everything else is
    /// empty or defaulted.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            current_hub_id: None,
            current_location_name: None,
            mode: SessionMode::Default,
            recent_events: Vec::new(),
            open_quests: Vec::new(),
            open_leads: Vec::new(),
            npcs: Vec::new(),
            character_profile: None,
        }
    }

    /// Validates and defaults an inbound request object. Fails only when
    /// `text` is missing, not a string, or blank; every optional structured
    /// field falls back to an empty or neutral value, and malformed entries
    /// inside the collections are dropped rather than failing the request.
    pub fn normalize(value: Value) -> Result<Self, AppError> {
        let text = value
            .get("text")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                AppError::InvalidInput(
                    "expected a context object with a non-empty `text` string".to_string(),
                )
            })?
            .to_string();

        let mode = value
            .get("mode")
            .and_then(|mode| serde_json::from_value(mode.clone()).ok())
            .unwrap_or_default();

        let mut recent_events: Vec<SessionEvent> = lenient_vec(value.get("recentEvents"));
        recent_events.truncate(RECENT_EVENTS_WINDOW);

        Ok(Self {
            text,
            current_hub_id: value
                .get("currentHubId")
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty())
                .map(String::from),
            current_location_name: value
                .get("currentLocationName")
                .and_then(Value::as_str)
                .filter(|name| !name.is_empty())
                .map(String::from),
            mode,
            recent_events,
            open_quests: lenient_vec(value.get("openQuests")),
            open_leads: lenient_vec(value.get("openLeads")),
            npcs: lenient_vec(value.get("npcs")),
            character_profile: value
                .get("characterProfile")
                .and_then(|profile| serde_json::from_value(profile.clone()).ok()),
        })
    }
}
