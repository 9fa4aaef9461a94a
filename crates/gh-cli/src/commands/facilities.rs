use std::fs;
use std::path::Path;

use comfy_table::{ContentArrangement, Table};

use gh_town::{FacilityDirectory, FacilityId};

pub fn run(config: Option<&Path>) -> Result<(), String> {
    let directory = match config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            serde_json::from_str::<FacilityDirectory>(&raw)
                .map_err(|e| format!("invalid facility config: {e}"))?
        }
        None => FacilityDirectory::default(),
    };

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Name", "Icon", "Welcome"]);
    for id in FacilityId::ALL {
        let profile = directory.profile(id);
        table.add_row(vec![
            id.to_string(),
            profile.name,
            profile.icon,
            profile.welcome_message,
        ]);
    }

    println!("{table}");
    Ok(())
}
