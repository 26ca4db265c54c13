// Campaign export: builds the interchange bundle for one campaign from the
// current state.
use chrono::Utc;

use crate::error::AppError;
use crate::import::CampaignBundle;
use crate::store::CampaignStore;

pub const BUNDLE_VERSION: &str = "1.2";

/// Snapshots one campaign and everything linked to it into a bundle, stamped
/// with the export date and schema version.
pub fn export_campaign(store: &CampaignStore, campaign_id: &str) -> Result<CampaignBundle, AppError> {
    let campaign = store
        .campaigns
        .iter()
        .find(|campaign| campaign.id == campaign_id)
        .cloned()
        .ok_or_else(|| AppError::InvalidInput(format!("unknown campaign id: {campaign_id}")))?;

    Ok(CampaignBundle {
        campaign,
        quests: store
            .quests
            .iter()
            .filter(|quest| quest.campaign_id == campaign_id)
            .cloned()
            .collect(),
        npcs: store
            .npcs
            .iter()
            .filter(|npc| npc.campaign_id == campaign_id)
            .cloned()
            .collect(),
        business_ideas: store
            .business_ideas
            .iter()
            .filter(|idea| idea.campaign_id == campaign_id)
            .cloned()
            .collect(),
        // Session notes carry no campaign linkage; they travel with every export.
        session_notes: store.session_notes.clone(),
        session_events: store
            .session_events
            .iter()
            .filter(|event| event.campaign_id == campaign_id)
            .cloned()
            .collect(),
        hubs: store
            .hubs
            .iter()
            .filter(|hub| hub.campaign_id == campaign_id)
            .cloned()
            .collect(),
        leads: store
            .leads
            .iter()
            .filter(|lead| lead.campaign_id == campaign_id)
            .cloned()
            .collect(),
        character_profile: store
            .character_profile
            .clone()
            .filter(|profile| profile.campaign_id == campaign_id),
        current_location: store.current_location.clone(),
        export_date: Utc::now().timestamp_millis(),
        version: BUNDLE_VERSION.to_string(),
    })
}

/// The bundle as a pretty-printed JSON document, ready to download.
pub fn export_campaign_json(store: &CampaignStore, campaign_id: &str) -> Result<String, AppError> {
    let bundle = export_campaign(store, campaign_id)?;
    Ok(serde_json::to_string_pretty(&bundle)?)
}
