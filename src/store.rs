// Campaign state store: an in-memory snapshot of one user's campaign data
// with plain JSON file persistence. The suggestion pipeline only ever reads a
// snapshot of it; the import resolver merges into or replaces it.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{create_dir_all, File};
use std::path::Path;

use crate::campaign::{
    BusinessIdea, Campaign, CharacterProfile, Hub, Lead, Npc, Quest, SessionEvent, SessionNote,
};
use crate::error::AppError;
use crate::import::CampaignBundle;

pub const DATA_DIR: &str = "./data";

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignStore {
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
    #[serde(default)]
    pub quests: Vec<Quest>,
    #[serde(default)]
    pub npcs: Vec<Npc>,
    #[serde(default)]
    pub hubs: Vec<Hub>,
    #[serde(default)]
    pub leads: Vec<Lead>,
    #[serde(default)]
    pub business_ideas: Vec<BusinessIdea>,
    #[serde(default)]
    pub session_notes: Vec<SessionNote>,
    #[serde(default)]
    pub session_events: Vec<SessionEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_profile: Option<CharacterProfile>,
    #[serde(default)]
    pub current_location: String,
}

impl CampaignStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let file = File::open(path)?;
        let store = serde_json::from_reader(file)?;
        Ok(store)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), AppError> {
        if let Some(parent) = path.as_ref().parent() {
            create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Every ID currently held, across all collections. IDs share one space.
    pub fn all_ids(&self) -> HashSet<String> {
        let mut ids: HashSet<String> = HashSet::new();
        ids.extend(self.campaigns.iter().map(|campaign| campaign.id.clone()));
        ids.extend(self.quests.iter().map(|quest| quest.id.clone()));
        ids.extend(self.npcs.iter().map(|npc| npc.id.clone()));
        ids.extend(self.hubs.iter().map(|hub| hub.id.clone()));
        ids.extend(self.leads.iter().map(|lead| lead.id.clone()));
        ids.extend(self.session_events.iter().map(|event| event.id.clone()));
        ids.extend(self.business_ideas.iter().map(|idea| idea.id.clone()));
        ids.extend(self.session_notes.iter().map(|note| note.id.clone()));
        if let Some(profile) = &self.character_profile {
            ids.insert(profile.id.clone());
        }
        ids
    }

    /// Replaces all current state with the bundle verbatim (overwrite import).
    pub fn replace_with(&mut self, bundle: CampaignBundle) {
        self.campaigns = vec![bundle.campaign];
        self.quests = bundle.quests;
        self.npcs = bundle.npcs;
        self.hubs = bundle.hubs;
        self.leads = bundle.leads;
        self.business_ideas = bundle.business_ideas;
        self.session_notes = bundle.session_notes;
        self.session_events = bundle.session_events;
        self.character_profile = bundle.character_profile;
        self.current_location = bundle.current_location;
    }

    /// Adds a (conflict-resolved) bundle alongside existing data.
    pub fn merge_in(&mut self, bundle: CampaignBundle) {
        self.campaigns.push(bundle.campaign);
        self.quests.extend(bundle.quests);
        self.npcs.extend(bundle.npcs);
        self.hubs.extend(bundle.hubs);
        self.leads.extend(bundle.leads);
        self.business_ideas.extend(bundle.business_ideas);
        self.session_notes.extend(bundle.session_notes);
        self.session_events.extend(bundle.session_events);
        if bundle.character_profile.is_some() {
            self.character_profile = bundle.character_profile;
        }
        if !bundle.current_location.is_empty() {
            self.current_location = bundle.current_location;
        }
    }
}
