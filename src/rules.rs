// Rule-based next-options engine. Deterministic keyword and priority
// heuristics over the session context; used directly when no AI provider is
// configured and as the terminal fallback when every provider fails.
use crate::campaign::{Lead, NextOption, Npc};
use crate::context::SessionContext;

struct KeywordRule {
    keywords: &'static [&'static str],
    title: &'static str,
    bullets: &'static [&'static str],
}

// Evaluated independently, in table order. Table order is also the tie-break
// for which suggestions surface first.
const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        keywords: &["ship", "sleek sophia", "captain", "crew"],
        title: "Investigate the Ship Situation",
        bullets: &[
            "Talk to the captain about recent events",
            "Check the crew roster and see who's missing",
            "Inspect the ship for any suspicious activity",
            "Set up a night watch if the Sleek Sophia is at anchor",
        ],
    },
    KeywordRule {
        keywords: &["missing", "disappeared", "gone"],
        title: "Follow Up on Missing Persons",
        bullets: &[
            "Ask NPCs about recent disappearances (Guard Captain, Quinn, Vitor)",
            "Check the quest log for related investigations",
            "Gather information from guards or authorities",
            "Look for patterns: time of day, location, who was last seen with them",
        ],
    },
    KeywordRule {
        keywords: &["fishing", "hole", "water", "griff", "naomi"],
        title: "Investigate the Fishing Hole",
        bullets: &[
            "Visit Griff and Naomi to learn more about the dried/fouled fishing hole",
            "Inspect the fishing hole north of town for signs of foul play",
            "Check for tracks, unusual substances, or environmental clues",
            "Ask about who might have access to poison or alchemical substances",
        ],
    },
    KeywordRule {
        keywords: &["mayor", "paranoid"],
        title: "Visit the Mayor",
        bullets: &[
            "Ask about recent disappearances and any reward for evidence",
            "Inquire about dreams or premonitions if the mayor seems troubled",
            "Combine business license talk with mystery investigation",
            "Check the place of worship next to the mayor's residence",
        ],
    },
    KeywordRule {
        keywords: &["storm", "weather"],
        title: "Prepare for the Storm",
        bullets: &[
            "Secure horses and wagon if you have them",
            "Plan watch shifts for the night",
            "Use the bad weather as cover or tension for investigation",
            "Check on the Sleek Sophia and other ships at anchor",
        ],
    },
    KeywordRule {
        keywords: &["business", "venture", "butcher", "exotic"],
        title: "Develop Business Venture",
        bullets: &[
            "Review business ideas in your notes (exotic butchery)",
            "Talk to relevant NPCs about partnerships (hunters, fishmongers, shipwright cooks)",
            "Check what resources or permits you need from the mayor",
            "Consider cold storage and location options",
        ],
    },
    KeywordRule {
        keywords: &["maple", "sap", "tapping", "breth"],
        title: "Follow Up on Maple Tapping",
        bullets: &[
            "Talk to Breth about the maple tapping job tomorrow morning",
            "Investigate the conflict between alchemists and maple tappers",
            "Prepare for the expedition at first light",
            "Consider how this relates to other mysteries in Seahaven",
        ],
    },
];

// NPC roles worth approaching first when suggesting a conversation.
const PRIORITY_ROLES: &[&str] = &["captain", "mayor", "guard"];

/// Generates next options from the session context using rule-based
/// heuristics. Pure and deterministic: the same context always produces the
/// same three options, and the context is never mutated.
///
/// Always returns exactly three options. When the keyword and priority rules
/// produce fewer than three suggestions, the remainder is filled from the
/// default suggestions, in order; when they produce more, the surplus is
/// truncated, never re-ranked. The returned options carry no `source` tag;
/// tagging happens at the caller boundary.
pub fn generate_next_options(ctx: &SessionContext) -> Vec<NextOption> {
    let text = ctx.text.to_lowercase();
    let mut options = Vec::new();

    // Rule 1: keyword-based suggestions.
    for rule in KEYWORD_RULES {
        if rule.keywords.iter().any(|keyword| text.contains(keyword)) {
            options.push(untagged(
                rule.title.to_string(),
                rule.bullets.iter().map(|bullet| (*bullet).to_string()).collect(),
            ));
        }
    }

    // Rule 2: follow up on the most important open lead.
    if let Some(lead) = top_lead(&ctx.open_leads) {
        options.push(untagged(
            format!("Follow Up on Lead: {}", lead.title),
            vec![
                lead.summary.clone(),
                "Review related NPCs and quests for this lead".to_string(),
                "Decide on the best investigative approach".to_string(),
                "Consider who to talk to or where to go next".to_string(),
            ],
        ));
    }

    // Rule 3: follow up on an open quest in the current hub.
    if let Some(hub_id) = &ctx.current_hub_id {
        let hub_quest = ctx.open_quests.iter().find(|quest| {
            (quest.hub_id.as_deref() == Some(hub_id) || quest.hub_id.is_none())
                && quest.status.is_active()
        });
        if let Some(quest) = hub_quest {
            options.push(untagged(
                format!("Follow Up on Quest: {}", quest.title),
                vec![
                    format!("Location: {}", quest.location),
                    quest
                        .description
                        .clone()
                        .unwrap_or_else(|| "Review quest details and objectives".to_string()),
                    "Talk to NPCs related to this quest".to_string(),
                    "Check your notes for any clues or leads".to_string(),
                ],
            ));
        }
    }

    // Rule 4: suggest talking to a key NPC in the current hub, unless the
    // input already is about talking to someone.
    if let Some(hub_id) = &ctx.current_hub_id {
        let hub_npcs: Vec<&Npc> = ctx
            .npcs
            .iter()
            .filter(|npc| npc.hub_id.as_deref() == Some(hub_id))
            .collect();
        if !hub_npcs.is_empty() && !text.contains("talk") && !text.contains("npc") {
            let key_npc = hub_npcs
                .iter()
                .find(|npc| {
                    let role = npc.role.to_lowercase();
                    PRIORITY_ROLES.iter().any(|priority| role.contains(priority))
                })
                .copied()
                .unwrap_or(hub_npcs[0]);
            options.push(untagged(
                format!("Talk to {}", key_npc.name),
                vec![
                    format!("{} - {}", key_npc.role, key_npc.location),
                    key_npc
                        .notes
                        .clone()
                        .unwrap_or_else(|| "Gather information about current events".to_string()),
                    "Ask about recent developments and rumours".to_string(),
                    "See if they have leads on open quests".to_string(),
                ],
            ));
        }
    }

    pad_and_renumber(options, ctx)
}

/// Truncates to three suggestions in accumulation order, fills any remaining
/// slots with default suggestions not already present, and re-IDs the result
/// "1".."3".
pub(crate) fn pad_and_renumber(
    mut options: Vec<NextOption>,
    ctx: &SessionContext,
) -> Vec<NextOption> {
    options.truncate(3);
    if options.len() < 3 {
        for filler in default_suggestions(ctx) {
            if options.len() == 3 {
                break;
            }
            if options.iter().any(|option| option.title == filler.title) {
                continue;
            }
            options.push(filler);
        }
    }
    for (idx, option) in options.iter_mut().enumerate() {
        option.id = (idx + 1).to_string();
    }
    options
}

/// The generic suggestion triad used when nothing specific matches.
fn default_suggestions(ctx: &SessionContext) -> Vec<NextOption> {
    let area = ctx
        .current_location_name
        .as_deref()
        .or(ctx.current_hub_id.as_deref())
        .unwrap_or("the area");
    vec![
        untagged(
            "Investigate Current Location".to_string(),
            vec![
                format!("Explore {area}"),
                "Talk to local NPCs for information".to_string(),
                "Look for clues or interesting locations".to_string(),
                "Check your quest log and leads for things to follow up on".to_string(),
            ],
        ),
        untagged(
            "Review Your Notes".to_string(),
            vec![
                "Check your quest log for open items".to_string(),
                "Review NPC relationships and information".to_string(),
                "Look at open leads and prioritize by importance".to_string(),
                "Update your notes with recent developments".to_string(),
            ],
        ),
        untagged(
            "Ask the DM a Question".to_string(),
            vec![
                "Clarify something about the current situation".to_string(),
                "Ask about environmental details".to_string(),
                "Inquire about character knowledge or history".to_string(),
                "Check if there are any obvious leads you're missing".to_string(),
            ],
        ),
    ]
}

/// The single most important active lead. Works on a defensive copy so the
/// caller's ordering is preserved; the stable sort keeps the earliest-listed
/// lead on top when importance ties.
fn top_lead(leads: &[Lead]) -> Option<&Lead> {
    let mut active: Vec<&Lead> = leads.iter().filter(|lead| lead.status.is_active()).collect();
    active.sort_by(|a, b| b.importance.unwrap_or(0).cmp(&a.importance.unwrap_or(0)));
    active.first().copied()
}

fn untagged(title: String, bullets: Vec<String>) -> NextOption {
    NextOption {
        id: String::new(),
        title,
        bullets,
        source: None,
    }
}
