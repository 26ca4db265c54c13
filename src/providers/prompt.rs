// Prompt construction shared by every chat-completion provider: a system
// message carrying the persona, mode instructions and output schema, and a
// user message carrying the serialized session context.
use crate::campaign::{Lead, SessionMode};
use crate::context::SessionContext;

const EVENT_PREVIEW_CHARS: usize = 80;

pub fn build_system_prompt(ctx: &SessionContext) -> String {
    let mode_instructions = mode_instructions(ctx.mode);

    format!(
        r#"You are Campaign Copilot, an assistant helping a D&D 5e player think clearly about their next move in the current scene.

You are NOT the DM.
You do NOT know secret information, hidden monsters, or the DM's prep beyond what is given in the context.
You never narrate outcomes or reveal "what's really going on behind the scenes".

Your job is to:
- Suggest 3 strong, distinct options for what the player could do next.
- Help them decide:
  - Which lead to follow.
  - Which question to ask the DM or an NPC.
  - Which spell, class feature, or ability might be useful.
  - How to progress their business ventures (e.g. exotic butcher shop) in-character.
- Think in D&D 5e terms: actions, checks, spells, risk, resources, and story beats.

{mode_instructions}

Always:
- Stay grounded in the provided context.
- Treat all unknowns as genuinely unknown - encourage investigating or asking the DM.
- Respect the player's character concept, level, and class when suggesting spells/abilities.
- Keep your tone encouraging, practical, and concise.
- Never take over narrative control: the DM decides what happens, you only suggest.

You answer ONLY in JSON format with this exact structure:
{{
  "options": [
    {{
      "id": "1",
      "title": "Short title of the option",
      "bullets": ["First bullet point", "Second bullet point", "Third bullet point"]
    }},
    {{
      "id": "2",
      "title": "Another option title",
      "bullets": ["Bullet 1", "Bullet 2", "Bullet 3"]
    }},
    {{
      "id": "3",
      "title": "Third option title",
      "bullets": ["Bullet 1", "Bullet 2", "Bullet 3"]
    }}
  ]
}}

Return exactly 3 options. Each option should have a clear title and 2-4 bullet points explaining the idea."#
    )
}

fn mode_instructions(mode: SessionMode) -> &'static str {
    match mode {
        SessionMode::InterrogateNpc => {
            "CURRENT MODE: The player is currently talking to an NPC and wants the best next questions or conversational moves.
Focus on:
- Questions that reveal useful information
- Social tactics (Insight checks, Persuasion, Deception)
- Building rapport or detecting lies
- Following up on hints or inconsistencies"
        }
        SessionMode::InvestigateLead => {
            "CURRENT MODE: The player is following up an investigation lead and wants 3 concrete investigative actions.
Focus on:
- Where to look for evidence
- Who to talk to
- What ability checks might help (Investigation, Perception, Insight)
- Following physical or social clues"
        }
        SessionMode::BusinessPlanning => {
            "CURRENT MODE: The player is thinking about in-world business/commerce/logistics.
Focus on:
- Steps to grow their business venture
- Securing licenses, partnerships, or resources
- Managing risk and logistics
- Balancing business with adventuring"
        }
        SessionMode::CombatSpells => {
            "CURRENT MODE: The player is in a D&D 5e combat scene and wants high-level tactical/spell ideas.
Focus on:
- Positioning and movement
- Spell selection based on situation
- Class features and abilities
- Protecting allies or controlling the battlefield
Do NOT give exact damage numbers; suggest concepts and tactics."
        }
        SessionMode::Default => {
            "CURRENT MODE: General exploration and decision-making.
Focus on balanced options that consider investigation, social interaction, and tactical choices."
        }
    }
}

pub fn build_user_prompt(ctx: &SessionContext) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!("Latest session text: \"{}\"", ctx.text));

    if let Some(location) = &ctx.current_location_name {
        parts.push(format!("Current location: {location}"));
    }

    if !ctx.recent_events.is_empty() {
        parts.push("\nRecent events (for context):".to_string());
        for (idx, event) in ctx.recent_events.iter().take(5).enumerate() {
            parts.push(format!(
                "{}. [{}] {}",
                idx + 1,
                event.mode,
                preview(&event.text)
            ));
        }
    }

    if let Some(profile) = &ctx.character_profile {
        parts.push(format!("\nCharacter: {}", profile.name));
        parts.push(format!("- {}", profile.class_and_level));
        if let Some(race) = &profile.race {
            parts.push(format!("- Race: {race}"));
        }
        if let Some(summary) = &profile.summary {
            parts.push(format!("- Key abilities: {summary}"));
        }
    }

    if !ctx.open_quests.is_empty() {
        parts.push("\nOpen quests:".to_string());
        for quest in ctx.open_quests.iter().take(5) {
            parts.push(format!(
                "- {} ({}) - {}",
                quest.title, quest.status, quest.location
            ));
        }
    }

    if !ctx.open_leads.is_empty() {
        parts.push("\nOpen leads (by importance):".to_string());
        let mut leads: Vec<&Lead> = ctx.open_leads.iter().collect();
        leads.sort_by(|a, b| b.importance.unwrap_or(0).cmp(&a.importance.unwrap_or(0)));
        for lead in leads.iter().take(5) {
            let importance = lead
                .importance
                .map(|value| value.to_string())
                .unwrap_or_else(|| "?".to_string());
            parts.push(format!(
                "- {} (Priority {}): {}",
                lead.title, importance, lead.summary
            ));
        }
    }

    if !ctx.npcs.is_empty() {
        parts.push("\nKey NPCs in area:".to_string());
        for npc in ctx.npcs.iter().take(10) {
            parts.push(format!("- {} ({}) - {}", npc.name, npc.role, npc.location));
        }
    }

    parts.join("\n")
}

fn preview(text: &str) -> String {
    if text.chars().count() > EVENT_PREVIEW_CHARS {
        let truncated: String = text.chars().take(EVENT_PREVIEW_CHARS).collect();
        format!("{truncated}...")
    } else {
        text.to_string()
    }
}
