// Example: driving a windowed DataTable against an in-memory "server".
use std::borrow::Cow;

use datagrid::{
    CellValue, ColumnDef, ColumnSet, FetchError, Page, PageRequest, RenderMode, Row, RowId,
};
use datagrid_adapter::{Command, DataTable, DataTableOptions, TableView};

#[derive(Clone, Debug)]
struct User {
    id: u64,
    email: String,
}

impl Row for User {
    fn id(&self) -> RowId {
        self.id
    }

    fn field(&self, name: &str) -> Option<CellValue<'_>> {
        match name {
            "email" => Some(CellValue::Text(Cow::Borrowed(&self.email))),
            "id" => Some(CellValue::Int(self.id as i64)),
            _ => None,
        }
    }
}

struct Server {
    users: Vec<User>,
}

impl Server {
    fn fetch(&self, req: &PageRequest) -> Result<Page<User>, FetchError> {
        let filter = req.query.filter.text.to_lowercase();
        let matching: Vec<&User> = self
            .users
            .iter()
            .filter(|u| filter.is_empty() || u.email.contains(&filter))
            .collect();
        let size = req.query.page_size;
        let start = (req.query.page - 1) * size;
        Ok(Page {
            items: matching.iter().skip(start).take(size).map(|u| (*u).clone()).collect(),
            current_page: req.query.page,
            total_pages: matching.len().div_ceil(size),
            total_item_count: matching.len(),
        })
    }

    fn delete(&mut self, id: RowId) -> Result<(), FetchError> {
        self.users.retain(|u| u.id != id);
        Ok(())
    }
}

fn run(table: &mut DataTable<User>, server: &mut Server, mut cmds: Vec<Command>) {
    while let Some(cmd) = cmds.pop() {
        let next = match cmd {
            Command::FetchPage(req) => {
                let result = server.fetch(&req);
                table.page_loaded(req, result)
            }
            Command::Delete(id) => {
                let result = server.delete(id);
                table.delete_finished(id, result)
            }
            Command::Prefetch(id) => {
                println!("prefetch user {id}");
                Vec::new()
            }
        };
        cmds.extend(next);
    }
}

fn print(table: &DataTable<User>) {
    match table.render() {
        TableView::Rows(view) => println!(
            "{} rows rendered, {:?}, has_more={}",
            view.rows.len(),
            view.label,
            view.has_more
        ),
        other => println!("{other:?}"),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = Server {
        users: (1..=1_000u64)
            .map(|id| User {
                id,
                email: format!("user{id}@example.com"),
            })
            .collect(),
    };

    let columns = ColumnSet::new([ColumnDef::new("id", "ID"), ColumnDef::new("email", "Email")])?;
    let options = DataTableOptions::new(RenderMode::Windowed, "users").with_page_size(100);
    let mut table = DataTable::new(options, columns)?;

    let cmds = table.mount();
    run(&mut table, &mut server, cmds);
    print(&table);

    // Scroll near the end of the first page; the next page is requested.
    let cmds = table.on_scroll(90.0 * 48.0, 0);
    run(&mut table, &mut server, cmds);
    print(&table);

    // Filter input is debounced until the clock passes the quiet period.
    table.set_filter_text("user99", 10);
    let cmds = table.tick(400);
    run(&mut table, &mut server, cmds);
    print(&table);

    let cmds = table.on_row_hover(99);
    run(&mut table, &mut server, cmds);

    if let Some(pending) = table.request_delete(99) {
        let cmds = table.confirm_delete(pending);
        run(&mut table, &mut server, cmds);
    }
    print(&table);

    println!("{}", table.export_filename(None));
    println!("{}", table.export_csv());
    table.unmount();
    Ok(())
}
