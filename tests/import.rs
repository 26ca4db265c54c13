// Import, merge and export behavior against the bundled fixture.
use campaign_copilot::export::{export_campaign, BUNDLE_VERSION};
use campaign_copilot::import::{
    apply_import, compute_conflicts, parse_bundle, resolve_merge, validate_bundle,
};
use campaign_copilot::*;
use serde_json::{json, Value};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};

const FIXTURE_PATH: &str = "tests/fixtures/default-campaign.json";

// Deterministic generator so rewritten IDs are predictable in assertions.
struct SequentialIds(AtomicUsize);

impl SequentialIds {
    fn new() -> Self {
        Self(AtomicUsize::new(1))
    }
}

impl IdGenerator for SequentialIds {
    fn next(&self) -> String {
        format!("fresh-{}", self.0.fetch_add(1, Ordering::Relaxed))
    }
}

fn fixture_bundle() -> CampaignBundle {
    let text = fs::read_to_string(FIXTURE_PATH).expect("Failed to read campaign fixture");
    parse_bundle(&text, &SequentialIds::new()).expect("Fixture should parse")
}

fn existing_quest(id: &str) -> Quest {
    Quest {
        id: id.to_string(),
        campaign_id: "existing-campaign-1".to_string(),
        title: "Existing Quest".to_string(),
        location: "x".to_string(),
        hub_id: None,
        status: EntityStatus::Open,
        description: Some("existing".to_string()),
        created_at: 0,
        updated_at: 0,
    }
}

fn existing_npc(id: &str) -> Npc {
    Npc {
        id: id.to_string(),
        campaign_id: "existing-campaign-1".to_string(),
        name: "Existing NPC".to_string(),
        role: "old".to_string(),
        location: "x".to_string(),
        hub_id: None,
        notes: Some("existing".to_string()),
        created_at: 0,
        updated_at: 0,
    }
}

fn existing_campaign(id: &str) -> Campaign {
    Campaign {
        id: id.to_string(),
        name: "Existing Campaign".to_string(),
        description: None,
        created_at: 0,
        updated_at: 0,
    }
}

#[test]
fn import_flow_against_an_empty_store() {
    let text = fs::read_to_string(FIXTURE_PATH).expect("Failed to read campaign fixture");
    let value: Value = serde_json::from_str(&text).expect("Fixture should be valid JSON");

    let report = validate_bundle(&value);
    assert!(report.valid, "unexpected errors: {:?}", report.errors);
    assert!(report.warnings.is_empty());

    let bundle = fixture_bundle();
    let store = CampaignStore::new();

    let conflicts = compute_conflicts(&bundle, &store);
    assert_eq!(conflicts.quest_conflicts, 0);
    assert_eq!(conflicts.npc_conflicts, 0);
    assert_eq!(conflicts.hub_conflicts, 0);
    assert_eq!(conflicts.lead_conflicts, 0);
    assert!(!conflicts.character_conflict);
    assert!(conflicts.details.is_empty());

    // No collisions means merge resolution is the identity on IDs.
    let before: Vec<String> = bundle.quests.iter().map(|quest| quest.id.clone()).collect();
    let resolved = resolve_merge(bundle, &store, &SequentialIds::new());
    let after: Vec<String> = resolved.quests.iter().map(|quest| quest.id.clone()).collect();
    assert_eq!(before, after);
    assert_eq!(resolved.campaign.id, "default-campaign");
}

#[test]
fn merge_preserves_both_sides_on_collision() {
    let bundle = fixture_bundle();
    let mut store = CampaignStore::new();
    store.campaigns.push(existing_campaign("existing-campaign-1"));
    store
        .quests
        .push(existing_quest("63088d41-f27d-4a81-9b1d-fcdafe43c6b5"));
    store
        .npcs
        .push(existing_npc("b45ccc7c-3894-412d-9108-359f01847ac5"));

    let conflicts = compute_conflicts(&bundle, &store);
    assert_eq!(conflicts.quest_conflicts, 1);
    assert_eq!(conflicts.npc_conflicts, 1);
    assert_eq!(conflicts.details.len(), 2);

    let quests_before = store.quests.len();
    let npcs_before = store.npcs.len();
    let quests_imported = bundle.quests.len();
    let npcs_imported = bundle.npcs.len();

    apply_import(&mut store, bundle, ImportMode::Merge, &SequentialIds::new());

    assert_eq!(store.quests.len(), quests_before + quests_imported);
    assert_eq!(store.npcs.len(), npcs_before + npcs_imported);

    // Every ID is unique after the merge.
    let quest_ids: std::collections::HashSet<&str> =
        store.quests.iter().map(|quest| quest.id.as_str()).collect();
    assert_eq!(quest_ids.len(), store.quests.len());
    let npc_ids: std::collections::HashSet<&str> =
        store.npcs.iter().map(|npc| npc.id.as_str()).collect();
    assert_eq!(npc_ids.len(), store.npcs.len());

    // The colliding quest was renamed, the non-colliding one kept its ID.
    assert!(store.quests.iter().any(|quest| quest.id == "q-maple-dispute"));
    assert!(store.quests.iter().any(|quest| quest.id.starts_with("fresh-")));
}

#[test]
fn campaign_id_collision_cascades_to_every_entity() {
    let bundle = fixture_bundle();
    let mut store = CampaignStore::new();
    store.campaigns.push(existing_campaign("default-campaign"));

    let resolved = resolve_merge(bundle, &store, &SequentialIds::new());

    assert_ne!(resolved.campaign.id, "default-campaign");
    let new_id = resolved.campaign.id.as_str();
    assert!(resolved.quests.iter().all(|quest| quest.campaign_id == new_id));
    assert!(resolved.npcs.iter().all(|npc| npc.campaign_id == new_id));
    assert!(resolved.hubs.iter().all(|hub| hub.campaign_id == new_id));
    assert!(resolved.leads.iter().all(|lead| lead.campaign_id == new_id));
    assert!(resolved
        .session_events
        .iter()
        .all(|event| event.campaign_id == new_id));
    assert!(resolved
        .business_ideas
        .iter()
        .all(|idea| idea.campaign_id == new_id));
    let profile = resolved.character_profile.expect("fixture has a profile");
    assert_eq!(profile.campaign_id, new_id);
}

#[test]
fn id_rewrites_are_stable_within_one_merge() {
    let bundle = fixture_bundle();
    let mut store = CampaignStore::new();
    // Collide with the hub so its rewrite has to cascade consistently.
    store.campaigns.push(existing_campaign("hub-seahaven"));

    let resolved = resolve_merge(bundle, &store, &SequentialIds::new());

    let hub_id = resolved.hubs[0].id.clone();
    assert_ne!(hub_id, "hub-seahaven");
    // Same old ID, same new ID, everywhere it appears: the quests, leads and
    // events that pointed at the hub follow it to its rewritten ID.
    assert!(resolved
        .quests
        .iter()
        .all(|quest| quest.hub_id.as_deref() == Some(hub_id.as_str())));
    assert!(resolved.leads.iter().all(|lead| lead.hub_id == hub_id));
    assert!(resolved
        .session_events
        .iter()
        .all(|event| event.hub_id.as_deref() == Some(hub_id.as_str())));
}

#[test]
fn overwrite_replaces_all_current_state() {
    let bundle = fixture_bundle();
    let mut store = CampaignStore::new();
    store.campaigns.push(existing_campaign("existing-campaign-1"));
    store.quests.push(existing_quest("old-quest"));
    store.current_location = "Somewhere else".to_string();

    apply_import(
        &mut store,
        bundle,
        ImportMode::Overwrite,
        &SequentialIds::new(),
    );

    assert_eq!(store.campaigns.len(), 1);
    assert_eq!(store.campaigns[0].id, "default-campaign");
    assert!(store.quests.iter().all(|quest| quest.id != "old-quest"));
    assert_eq!(store.current_location, "Seahaven");
}

#[test]
fn validation_flags_missing_campaign_and_collections() {
    let report = validate_bundle(&json!({ "quests": [] }));
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("campaign"));
    // quests is present and an array; the other three are missing.
    assert_eq!(report.warnings.len(), 3);

    let report = validate_bundle(&json!({
        "campaign": { "id": "c1", "name": "Test" },
        "quests": "not an array",
        "npcs": [],
        "hubs": [],
        "leads": []
    }));
    assert!(report.valid);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("quests"));

    let report = validate_bundle(&json!("just a string"));
    assert!(!report.valid);
}

#[test]
fn parse_rejects_malformed_json_only() {
    let err = parse_bundle("{ not json", &SequentialIds::new())
        .expect_err("malformed JSON must fail");
    assert!(matches!(err, AppError::ImportParse(_)));

    // Wrong-typed collections survive as empty.
    let bundle = parse_bundle(
        &json!({
            "campaign": { "id": "c1", "name": "Test" },
            "quests": "nope",
            "leads": [{ "id": "l1", "title": "Good lead" }, 42]
        })
        .to_string(),
        &SequentialIds::new(),
    )
    .expect("lenient collections should parse");
    assert!(bundle.quests.is_empty());
    assert_eq!(bundle.leads.len(), 1);
    assert_eq!(bundle.version, "");
}

#[test]
fn legacy_bundles_get_a_synthesized_campaign() {
    let bundle = parse_bundle(
        &json!({
            "quests": [],
            "npcs": [],
            "businessIdeas": [],
            "exportDate": 1763351446982i64,
            "version": "1.1"
        })
        .to_string(),
        &SequentialIds::new(),
    )
    .expect("legacy bundle should parse");

    assert!(bundle.campaign.id.starts_with("imported-"));
    assert!(bundle.campaign.name.starts_with("Imported Campaign"));
    assert_eq!(bundle.campaign.created_at, 1763351446982);
}

#[test]
fn store_round_trips_through_its_save_file() {
    let mut store = CampaignStore::new();
    apply_import(
        &mut store,
        fixture_bundle(),
        ImportMode::Merge,
        &SequentialIds::new(),
    );

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("campaign-store.json");
    store.save_to_file(&path).expect("Failed to save store");

    let reloaded = CampaignStore::load_from_file(&path).expect("Failed to reload store");
    assert_eq!(reloaded.campaigns.len(), store.campaigns.len());
    assert_eq!(reloaded.quests.len(), store.quests.len());
    assert_eq!(reloaded.current_location, store.current_location);
    assert_eq!(reloaded.all_ids(), store.all_ids());
}

#[test]
fn export_filters_by_campaign_and_stamps_the_bundle() {
    let mut store = CampaignStore::new();
    apply_import(
        &mut store,
        fixture_bundle(),
        ImportMode::Merge,
        &SequentialIds::new(),
    );
    // A second campaign whose entities must not leak into the export.
    store.campaigns.push(existing_campaign("other-campaign"));
    store.quests.push(Quest {
        campaign_id: "other-campaign".to_string(),
        ..existing_quest("other-quest")
    });

    let bundle =
        export_campaign(&store, "default-campaign").expect("Fixture campaign should export");

    assert_eq!(bundle.campaign.id, "default-campaign");
    assert_eq!(bundle.version, BUNDLE_VERSION);
    assert!(bundle.export_date > 0);
    assert!(bundle.quests.iter().all(|quest| quest.campaign_id == "default-campaign"));
    assert!(bundle.quests.iter().all(|quest| quest.id != "other-quest"));

    let err = export_campaign(&store, "no-such-campaign").expect_err("unknown campaign");
    assert!(matches!(err, AppError::InvalidInput(_)));
}
