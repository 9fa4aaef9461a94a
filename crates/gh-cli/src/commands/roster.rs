use comfy_table::{ContentArrangement, Table};

use super::demo_party;

pub fn run() -> Result<(), String> {
    let party = demo_party(1200);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Class", "Level", "HP", "MP", "Status", "Vitality"]);
    for m in &party.members {
        table.add_row(vec![
            m.name.clone(),
            m.class.to_string(),
            m.level.to_string(),
            format!("{}/{}", m.hp, m.max_hp),
            format!("{}/{}", m.mp, m.max_mp),
            m.status.to_string(),
            m.vitality.to_string(),
        ]);
    }

    println!("{}", party.name);
    println!("{table}");
    println!("  {} gold in the purse", party.gold);
    Ok(())
}
