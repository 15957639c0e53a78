// Example: JSON objects as rows, with nested field paths.
use datagrid::{ColumnDef, ColumnSet, export_csv, lookup_path};
use serde_json::{Value, json};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let rows: Vec<Value> = vec![
        json!({"id": 1, "name": "Ada", "team": {"name": "Core"}, "tags": ["math", "engines"]}),
        json!({"id": 2, "name": "Grace, R.", "team": null, "tags": []}),
    ];

    let columns: ColumnSet<Value> = ColumnSet::new([
        ColumnDef::new("name", "Name"),
        ColumnDef::new("team.name", "Team"),
        ColumnDef::new("tags", "Tags"),
    ])?;

    for row in &rows {
        let team = lookup_path(row, "team.name").map(|v| v.to_text());
        println!("{:?}", team);
    }

    println!("{}", export_csv(&columns.visible(), &rows));
    Ok(())
}
