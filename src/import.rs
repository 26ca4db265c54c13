// Campaign bundle import: structural validation, ID collision detection, and
// merge resolution that rewrites colliding identifiers so an imported bundle
// can live alongside the current state.
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::campaign::{
    lenient_vec, BusinessIdea, Campaign, CharacterProfile, Hub, Lead, Npc, Quest, SessionEvent,
    SessionNote,
};
use crate::error::AppError;
use crate::id::IdGenerator;
use crate::store::CampaignStore;

/// The full exportable/importable snapshot of one campaign's data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignBundle {
    pub campaign: Campaign,
    #[serde(default)]
    pub quests: Vec<Quest>,
    #[serde(default)]
    pub npcs: Vec<Npc>,
    #[serde(default)]
    pub business_ideas: Vec<BusinessIdea>,
    #[serde(default)]
    pub session_notes: Vec<SessionNote>,
    #[serde(default)]
    pub session_events: Vec<SessionEvent>,
    #[serde(default)]
    pub hubs: Vec<Hub>,
    #[serde(default)]
    pub leads: Vec<Lead>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_profile: Option<CharacterProfile>,
    #[serde(default)]
    pub current_location: String,
    #[serde(default)]
    pub export_date: i64,
    #[serde(default)]
    pub version: String,
}

/// How an imported bundle is applied to the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Resolve ID collisions, then add the bundle alongside existing data.
    Merge,
    /// Replace all current state with the bundle verbatim.
    Overwrite,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct ConflictSummary {
    pub quest_conflicts: usize,
    pub npc_conflicts: usize,
    pub hub_conflicts: usize,
    pub lead_conflicts: usize,
    pub character_conflict: bool,
    pub details: Vec<String>,
}

/// Parses an uploaded export file. Malformed JSON is the only hard failure;
/// missing or wrong-typed collections become empty, and legacy exports
/// without a `campaign` object get one synthesized from the export metadata.
pub fn parse_bundle(json: &str, ids: &dyn IdGenerator) -> Result<CampaignBundle, AppError> {
    let value: Value =
        serde_json::from_str(json).map_err(|err| AppError::ImportParse(err.to_string()))?;

    let campaign = match value.get("campaign") {
        Some(campaign) if !campaign.is_null() => serde_json::from_value(campaign.clone())
            .map_err(|err| AppError::ImportParse(format!("invalid `campaign` object: {err}")))?,
        _ => synthesize_legacy_campaign(&value, ids),
    };

    Ok(CampaignBundle {
        campaign,
        quests: lenient_vec(value.get("quests")),
        npcs: lenient_vec(value.get("npcs")),
        business_ideas: lenient_vec(value.get("businessIdeas")),
        session_notes: lenient_vec(value.get("sessionNotes")),
        session_events: lenient_vec(value.get("sessionEvents")),
        hubs: lenient_vec(value.get("hubs")),
        leads: lenient_vec(value.get("leads")),
        character_profile: value
            .get("characterProfile")
            .and_then(|profile| serde_json::from_value(profile.clone()).ok()),
        current_location: value
            .get("currentLocation")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        export_date: value.get("exportDate").and_then(Value::as_i64).unwrap_or_default(),
        version: value
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}

// Exports predating the multi-campaign format carry no campaign object.
fn synthesize_legacy_campaign(value: &Value, ids: &dyn IdGenerator) -> Campaign {
    let export_date = value
        .get("exportDate")
        .and_then(Value::as_i64)
        .unwrap_or_else(|| Utc::now().timestamp_millis());
    let version = value.get("version").and_then(Value::as_str).unwrap_or_default();
    let name = if version == "1.0" || version == "1.1" {
        let date = chrono::DateTime::from_timestamp_millis(export_date)
            .map(|stamp| stamp.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown date".to_string());
        format!("Imported Campaign {date}")
    } else {
        "Imported Campaign".to_string()
    };

    Campaign {
        id: format!("imported-{}", ids.next()),
        name,
        description: Some("Imported from backup".to_string()),
        created_at: export_date,
        updated_at: Utc::now().timestamp_millis(),
    }
}

/// Structural check only. Errors block the import; warnings flag collections
/// that will be treated as empty.
pub fn validate_bundle(value: &Value) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if !value.is_object() {
        errors.push("Import file is not a valid JSON object.".to_string());
        return ValidationReport {
            valid: false,
            errors,
            warnings,
        };
    }

    let has_campaign_id = value
        .get("campaign")
        .and_then(|campaign| campaign.get("id"))
        .and_then(Value::as_str)
        .is_some_and(|id| !id.is_empty());
    if !has_campaign_id {
        errors.push("Missing `campaign` object or `campaign.id`.".to_string());
    }

    for key in ["quests", "npcs", "hubs", "leads"] {
        if !value.get(key).is_some_and(Value::is_array) {
            warnings.push(format!("`{key}` is missing or not an array; treated as empty."));
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Counts imported IDs that already exist in the current state, per
/// collection, with human-readable detail strings for the confirmation UI.
pub fn compute_conflicts(bundle: &CampaignBundle, store: &CampaignStore) -> ConflictSummary {
    let mut details = Vec::new();

    let quest_conflicts = bundle
        .quests
        .iter()
        .filter(|quest| store.quests.iter().any(|existing| existing.id == quest.id))
        .count();
    if quest_conflicts > 0 {
        details.push(format!("{quest_conflicts} quest(s) with colliding IDs"));
    }

    let npc_conflicts = bundle
        .npcs
        .iter()
        .filter(|npc| store.npcs.iter().any(|existing| existing.id == npc.id))
        .count();
    if npc_conflicts > 0 {
        details.push(format!("{npc_conflicts} NPC(s) with colliding IDs"));
    }

    let hub_conflicts = bundle
        .hubs
        .iter()
        .filter(|hub| store.hubs.iter().any(|existing| existing.id == hub.id))
        .count();
    if hub_conflicts > 0 {
        details.push(format!("{hub_conflicts} hub(s) with colliding IDs"));
    }

    let lead_conflicts = bundle
        .leads
        .iter()
        .filter(|lead| store.leads.iter().any(|existing| existing.id == lead.id))
        .count();
    if lead_conflicts > 0 {
        details.push(format!("{lead_conflicts} lead(s) with colliding IDs"));
    }

    let character_conflict = matches!(
        (&bundle.character_profile, &store.character_profile),
        (Some(imported), Some(existing)) if imported.id == existing.id
    );
    if character_conflict {
        details.push("Character profile ID collides with existing profile".to_string());
    }

    ConflictSummary {
        quest_conflicts,
        npc_conflicts,
        hub_conflicts,
        lead_conflicts,
        character_conflict,
        details,
    }
}

/// Rewrites colliding IDs in the bundle so it can be merged next to the
/// current state. The old-to-new mapping is stable across the whole bundle:
/// an ID is rewritten the same way everywhere it appears, non-colliding IDs
/// are kept, the campaign ID rewrite cascades to every entity's campaign
/// linkage, and hub links and related-entity lists follow the mapping too.
pub fn resolve_merge(
    bundle: CampaignBundle,
    store: &CampaignStore,
    ids: &dyn IdGenerator,
) -> CampaignBundle {
    let existing = store.all_ids();
    let mut mapping: HashMap<String, String> = HashMap::new();
    let mut ensure_id = |id: &str| -> String {
        if id.is_empty() {
            return ids.next();
        }
        if let Some(mapped) = mapping.get(id) {
            return mapped.clone();
        }
        let resolved = if existing.contains(id) {
            ids.next()
        } else {
            id.to_string()
        };
        mapping.insert(id.to_string(), resolved.clone());
        resolved
    };

    let campaign_id = ensure_id(&bundle.campaign.id);

    let mut quests: Vec<Quest> = bundle
        .quests
        .into_iter()
        .map(|mut quest| {
            quest.id = ensure_id(&quest.id);
            quest.campaign_id = campaign_id.clone();
            quest
        })
        .collect();
    let npcs: Vec<Npc> = bundle
        .npcs
        .into_iter()
        .map(|mut npc| {
            npc.id = ensure_id(&npc.id);
            npc.campaign_id = campaign_id.clone();
            npc
        })
        .collect();
    let hubs: Vec<Hub> = bundle
        .hubs
        .into_iter()
        .map(|mut hub| {
            hub.id = ensure_id(&hub.id);
            hub.campaign_id = campaign_id.clone();
            hub
        })
        .collect();
    let mut leads: Vec<Lead> = bundle
        .leads
        .into_iter()
        .map(|mut lead| {
            lead.id = ensure_id(&lead.id);
            lead.campaign_id = campaign_id.clone();
            lead
        })
        .collect();
    let mut session_events: Vec<SessionEvent> = bundle
        .session_events
        .into_iter()
        .map(|mut event| {
            event.id = ensure_id(&event.id);
            event.campaign_id = campaign_id.clone();
            event
        })
        .collect();
    let business_ideas: Vec<BusinessIdea> = bundle
        .business_ideas
        .into_iter()
        .map(|mut idea| {
            idea.id = ensure_id(&idea.id);
            idea.campaign_id = campaign_id.clone();
            idea
        })
        .collect();
    let session_notes: Vec<SessionNote> = bundle
        .session_notes
        .into_iter()
        .map(|mut note| {
            note.id = ensure_id(&note.id);
            note
        })
        .collect();
    let character_profile = bundle.character_profile.map(|mut profile| {
        profile.id = ensure_id(&profile.id);
        profile.campaign_id = campaign_id.clone();
        profile
    });

    // Second pass: every ID has been resolved by now, so cross-references can
    // follow the same mapping. References to IDs outside the bundle are left
    // untouched.
    let remap = |id: &str| mapping.get(id).cloned();
    for quest in &mut quests {
        if let Some(hub_ref) = quest.hub_id.as_deref().and_then(remap) {
            quest.hub_id = Some(hub_ref);
        }
    }
    for lead in &mut leads {
        if let Some(hub_ref) = remap(&lead.hub_id) {
            lead.hub_id = hub_ref;
        }
        remap_id_list(&mut lead.related_npc_ids, remap);
        remap_id_list(&mut lead.related_quest_ids, remap);
    }
    for event in &mut session_events {
        if let Some(hub_ref) = event.hub_id.as_deref().and_then(remap) {
            event.hub_id = Some(hub_ref);
        }
        remap_id_list(&mut event.linked_quest_ids, remap);
        remap_id_list(&mut event.linked_lead_ids, remap);
        remap_id_list(&mut event.linked_npc_ids, remap);
    }

    let mut campaign = bundle.campaign;
    campaign.id = campaign_id;

    CampaignBundle {
        campaign,
        quests,
        npcs,
        business_ideas,
        session_notes,
        session_events,
        hubs,
        leads,
        character_profile,
        current_location: bundle.current_location,
        export_date: bundle.export_date,
        version: bundle.version,
    }
}

fn remap_id_list(list: &mut Option<Vec<String>>, remap: impl Fn(&str) -> Option<String>) {
    if let Some(ids) = list {
        for id in ids.iter_mut() {
            if let Some(mapped) = remap(id) {
                *id = mapped;
            }
        }
    }
}

/// Single entry point for both import modes.
pub fn apply_import(
    store: &mut CampaignStore,
    bundle: CampaignBundle,
    mode: ImportMode,
    ids: &dyn IdGenerator,
) {
    match mode {
        ImportMode::Overwrite => store.replace_with(bundle),
        ImportMode::Merge => {
            let resolved = resolve_merge(bundle, store, ids);
            store.merge_in(resolved);
        }
    }
}
