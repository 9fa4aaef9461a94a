//! Subcommand implementations.

pub mod facilities;
pub mod roster;
pub mod visit;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use gh_core::{Character, CharacterClass, CharacterStatus, Item, ItemKind, Party, SpellId};
use gh_town::{Outcome, OutcomeData, OutcomeKind};

/// The demo party every subcommand works with.
pub fn demo_party(gold: u32) -> Party {
    let mut party = Party::new("The Grey Wolves", gold);

    let aldric = Character::new("Aldric", CharacterClass::Fighter)
        .with_level(6)
        .with_hp(14, 24)
        .with_mp(0, 0);
    party.add_member(aldric).expect("room for Aldric");

    let mut merrin = Character::new("Merrin", CharacterClass::Mage)
        .with_level(5)
        .with_hp(9, 11)
        .with_mp(2, 14);
    merrin.learn_spell(SpellId::new("halito"));
    merrin
        .give_item(Item::unidentified(
            "odd_ring",
            "Ring of Warding",
            ItemKind::Curio,
            800,
        ))
        .expect("room in Merrin's pack");
    party.add_member(merrin).expect("room for Merrin");

    let sera = Character::new("Sera", CharacterClass::Priest)
        .with_level(5)
        .with_hp(13, 16)
        .with_mp(8, 12);
    party.add_member(sera).expect("room for Sera");

    let tam = Character::new("Tam", CharacterClass::Thief)
        .with_level(4)
        .with_hp(0, 14)
        .with_status(CharacterStatus::Dead)
        .with_vitality(7);
    party.add_member(tam).expect("room for Tam");

    party
}

/// Render an outcome for the terminal: colored message line plus any
/// payload table and detail lines.
pub fn render_outcome(outcome: &Outcome) -> String {
    let mut out = match outcome.kind {
        OutcomeKind::Success => outcome.message.green().to_string(),
        OutcomeKind::Error => outcome.message.red().to_string(),
        OutcomeKind::Warning => outcome.message.yellow().to_string(),
        OutcomeKind::Info => outcome.message.clone(),
        OutcomeKind::Confirm => format!(
            "{} {}",
            outcome.message.cyan(),
            "(type 'confirm' to proceed, 'cancel' to step back)".dimmed()
        ),
    };

    if let Some(table) = data_table(outcome.data.as_ref()) {
        out.push('\n');
        out.push_str(&table);
    }
    for e in &outcome.errors {
        out.push_str(&format!("\n  {}", e.red()));
    }
    for w in &outcome.warnings {
        out.push_str(&format!("\n  {}", w.yellow()));
    }
    out
}

/// Render list payloads as tables; scalar payloads need no table.
fn data_table(data: Option<&OutcomeData>) -> Option<String> {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    match data? {
        OutcomeData::Characters(entries) => {
            table.set_header(vec!["Name", "Level", "Status"]);
            for c in entries {
                table.add_row(vec![
                    c.name.clone(),
                    c.level.to_string(),
                    c.status.to_string(),
                ]);
            }
        }
        OutcomeData::Wares(entries) => {
            table.set_header(vec!["Item", "Name", "Price", "Stock"]);
            for w in entries {
                table.add_row(vec![
                    w.item.to_string(),
                    w.name.clone(),
                    w.price.to_string(),
                    w.stock.to_string(),
                ]);
            }
        }
        OutcomeData::Spells(entries) => {
            table.set_header(vec!["Spell", "Name", "Tier", "Tuition"]);
            for s in entries {
                table.add_row(vec![
                    s.spell.to_string(),
                    s.name.clone(),
                    s.tier.to_string(),
                    s.price.to_string(),
                ]);
            }
        }
        OutcomeData::Items(entries) => {
            table.set_header(vec!["Item", "Name", "Carried by"]);
            for i in entries {
                table.add_row(vec![
                    i.item.to_string(),
                    i.name.clone(),
                    i.owner.clone().unwrap_or_else(|| "vault".to_string()),
                ]);
            }
        }
        _ => return None,
    }
    Some(table.to_string())
}
