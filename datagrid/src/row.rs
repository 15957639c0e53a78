use alloc::string::String;
use alloc::vec::Vec;

use crate::{ColumnDef, Row, RowId, WindowItem};

/// Cell text longer than this many characters is truncated for display by default.
pub const DEFAULT_TRUNCATE_AT: usize = 50;

const ELLIPSIS: char = '…';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderOptions {
    /// Maximum displayed characters per cell; `0` disables truncation.
    pub truncate_at: usize,
    /// Whether rows respond to clicks on their body.
    pub row_clickable: bool,
    pub show_actions: bool,
    /// A delete request for this row is in flight.
    pub busy: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            truncate_at: DEFAULT_TRUNCATE_AT,
            row_clickable: false,
            show_actions: true,
            busy: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellFragment {
    pub key: String,
    /// Display text, possibly truncated.
    pub text: String,
    /// The untruncated text, present only when `text` was truncated (shown on hover).
    pub full_text: Option<String>,
    pub width: Option<f64>,
}

/// An absolutely positioned row, ready for a UI layer to draw.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowFragment {
    pub id: RowId,
    pub index: usize,
    pub top: f64,
    pub height: f64,
    pub cells: Vec<CellFragment>,
    pub clickable: bool,
    pub show_actions: bool,
    /// Marked while a delete is in flight; action buttons are disabled.
    pub busy: bool,
}

/// What was clicked inside a row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickTarget {
    Body,
    EditButton,
    DeleteButton,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RowCommand {
    Open(RowId),
    Edit(RowId),
    Delete(RowId),
}

impl RowFragment {
    pub fn actions_enabled(&self) -> bool {
        self.show_actions && !self.busy
    }

    /// Resolves a click to at most one command.
    ///
    /// Action buttons consume their click: a button click never also opens the row.
    pub fn dispatch(&self, target: ClickTarget) -> Option<RowCommand> {
        match target {
            ClickTarget::Body => self.clickable.then_some(RowCommand::Open(self.id)),
            ClickTarget::EditButton => self.actions_enabled().then_some(RowCommand::Edit(self.id)),
            ClickTarget::DeleteButton => {
                self.actions_enabled().then_some(RowCommand::Delete(self.id))
            }
        }
    }
}

/// Renders one item into a positioned row.
///
/// `columns` must be the visible columns in display order (see
/// [`crate::ColumnSet::visible`]). Pure: the result depends only on the arguments.
pub fn render_row<R: Row>(
    row: &R,
    slot: WindowItem,
    columns: &[&ColumnDef<R>],
    opts: RenderOptions,
) -> RowFragment {
    let cells = columns
        .iter()
        .map(|column| {
            // Renderer output is markup; cutting it would break tags.
            let (text, full_text) = match column.render {
                Some(_) => (column.display(row), None),
                None => truncate(column.display(row), opts.truncate_at),
            };
            CellFragment {
                key: column.key.clone(),
                text,
                full_text,
                width: column.width,
            }
        })
        .collect();

    RowFragment {
        id: row.id(),
        index: slot.index,
        top: slot.offset,
        height: slot.size,
        cells,
        clickable: opts.row_clickable,
        show_actions: opts.show_actions,
        busy: opts.busy,
    }
}

fn truncate(text: String, max_chars: usize) -> (String, Option<String>) {
    if max_chars == 0 {
        return (text, None);
    }
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return (text, None);
    };
    let mut short = String::with_capacity(cut + ELLIPSIS.len_utf8());
    short.push_str(text[..cut].trim_end());
    short.push(ELLIPSIS);
    (short, Some(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CellValue, ColumnSet};
    use alloc::borrow::Cow;
    use alloc::format;
    use alloc::vec;

    struct Ticket {
        id: u64,
        title: String,
        status: &'static str,
    }

    impl Row for Ticket {
        fn id(&self) -> RowId {
            self.id
        }

        fn field(&self, name: &str) -> Option<CellValue<'_>> {
            match name {
                "title" => Some(CellValue::Text(Cow::Borrowed(&self.title))),
                "status" => Some(CellValue::Text(Cow::Borrowed(self.status))),
                _ => None,
            }
        }
    }

    fn columns() -> ColumnSet<Ticket> {
        ColumnSet::new(vec![
            ColumnDef::new("title", "Title").with_width(200.0),
            ColumnDef::new("status", "Status")
                .with_render(|t: &Ticket| format!("<b>{}</b>", t.status))
                .with_text(|t: &Ticket| t.status.into()),
            ColumnDef::new("assignee.name", "Assignee"),
        ])
        .unwrap()
    }

    fn slot(index: usize) -> WindowItem {
        WindowItem {
            index,
            offset: index as f64 * 40.0,
            size: 40.0,
        }
    }

    #[test]
    fn renders_positioned_cells() {
        let set = columns();
        let t = Ticket {
            id: 9,
            title: "short".into(),
            status: "open",
        };
        let row = render_row(&t, slot(3), &set.visible(), RenderOptions::default());
        assert_eq!(row.id, 9);
        assert_eq!(row.top, 120.0);
        assert_eq!(row.height, 40.0);
        let texts: Vec<&str> = row.cells.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["short", "<b>open</b>", "-"]);
        assert_eq!(row.cells[0].width, Some(200.0));
        assert!(row.cells.iter().all(|c| c.full_text.is_none()));
    }

    #[test]
    fn truncates_long_text_and_keeps_full_value() {
        let set = columns();
        let long = "ü".repeat(80);
        let t = Ticket {
            id: 1,
            title: long.clone(),
            status: "open",
        };
        let opts = RenderOptions {
            truncate_at: 10,
            ..RenderOptions::default()
        };
        let row = render_row(&t, slot(0), &set.visible(), opts);
        assert_eq!(row.cells[0].text.chars().count(), 11);
        assert!(row.cells[0].text.ends_with('…'));
        assert_eq!(row.cells[0].full_text.as_deref(), Some(long.as_str()));
    }

    #[test]
    fn custom_render_output_is_never_truncated() {
        let set: ColumnSet<Ticket> = ColumnSet::new(vec![
            ColumnDef::new("title", "Title"),
            ColumnDef::new("summary", "Summary")
                .with_render(|t: &Ticket| format!("<b>{}</b>", t.title)),
        ])
        .unwrap();
        let t = Ticket {
            id: 2,
            title: "x".repeat(60),
            status: "open",
        };
        let row = render_row(&t, slot(0), &set.visible(), RenderOptions::default());

        assert_eq!(row.cells[0].text.chars().count(), DEFAULT_TRUNCATE_AT + 1);
        assert_eq!(row.cells[0].full_text.as_deref(), Some(t.title.as_str()));
        assert_eq!(row.cells[1].text, format!("<b>{}</b>", t.title));
        assert_eq!(row.cells[1].full_text, None);
    }

    #[test]
    fn action_buttons_do_not_open_row() {
        let set = columns();
        let t = Ticket {
            id: 5,
            title: "x".into(),
            status: "done",
        };
        let opts = RenderOptions {
            row_clickable: true,
            ..RenderOptions::default()
        };
        let row = render_row(&t, slot(0), &set.visible(), opts);
        assert_eq!(row.dispatch(ClickTarget::Body), Some(RowCommand::Open(5)));
        assert_eq!(row.dispatch(ClickTarget::EditButton), Some(RowCommand::Edit(5)));
        assert_eq!(
            row.dispatch(ClickTarget::DeleteButton),
            Some(RowCommand::Delete(5))
        );

        let busy = render_row(
            &t,
            slot(0),
            &set.visible(),
            RenderOptions {
                busy: true,
                ..opts
            },
        );
        assert!(!busy.actions_enabled());
        assert_eq!(busy.dispatch(ClickTarget::DeleteButton), None);
        assert_eq!(busy.dispatch(ClickTarget::Body), Some(RowCommand::Open(5)));
    }
}
