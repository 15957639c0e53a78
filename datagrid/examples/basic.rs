// Example: windowing a large list, rendering the visible rows and exporting them.
use std::borrow::Cow;

use datagrid::{
    CellValue, ColumnDef, ColumnSet, RenderOptions, Row, RowId, compute_label, compute_window,
    export_csv, render_row,
};

struct Order {
    id: u64,
    customer: String,
    total_cents: i64,
}

impl Row for Order {
    fn id(&self) -> RowId {
        self.id
    }

    fn field(&self, name: &str) -> Option<CellValue<'_>> {
        match name {
            "customer" => Some(CellValue::Text(Cow::Borrowed(&self.customer))),
            "total" => Some(CellValue::Int(self.total_cents)),
            _ => None,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let orders: Vec<Order> = (0..5_000u64)
        .map(|id| Order {
            id,
            customer: format!("customer #{id}"),
            total_cents: (id as i64 * 137) % 100_000,
        })
        .collect();

    let columns = ColumnSet::new([
        ColumnDef::new("customer", "Customer"),
        ColumnDef::new("total", "Total")
            .with_render(|o: &Order| format!("${}.{:02}", o.total_cents / 100, o.total_cents % 100))
            .with_text(|o: &Order| (o.total_cents as f64 / 100.0).to_string()),
    ])?;

    let window = compute_window(orders.len(), 4_800.0, 600.0, 48.0, 5)?;
    println!("total_extent={}", window.total_extent);
    println!("window={:?}", window.indexes());
    if let Some(label) = compute_label(&window, orders.len()) {
        println!("{label}");
    }

    let visible = columns.visible();
    for slot in window.items().take(3) {
        let row = render_row(&orders[slot.index], slot, &visible, RenderOptions::default());
        let cells: Vec<&str> = row.cells.iter().map(|c| c.text.as_str()).collect();
        println!("top={} {:?}", row.top, cells);
    }

    println!("{}", export_csv(&visible, &orders[window.indexes()][..2]));
    Ok(())
}
