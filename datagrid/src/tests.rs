use crate::*;

use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        debug_assert!(start < end_exclusive);
        start + (self.next_u64() % (end_exclusive - start) as u64) as usize
    }

    fn gen_f64(&mut self, start: f64, end: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        start + (end - start) * unit
    }
}

#[test]
fn window_range_is_contained_and_ordered() {
    let mut rng = Lcg::new(0x5eed);
    for _ in 0..2_000 {
        let count = rng.gen_range_usize(0, 5_000);
        let row_height = rng.gen_f64(1.0, 120.0);
        let viewport = rng.gen_f64(1.0, 2_000.0);
        let overscan = rng.gen_range_usize(0, 20);
        let offset = rng.gen_f64(0.0, count as f64 * row_height);

        let w = compute_window(count, offset, viewport, row_height, overscan).unwrap();
        if count == 0 {
            assert!(w.is_empty());
            assert_eq!(w.total_extent, 0.0);
            continue;
        }
        assert!(w.start_index <= w.end_index);
        assert!(w.end_index < count);
        assert_eq!(w.total_extent, count as f64 * row_height);

        // Superset of the strictly visible rows, unless clamped at the data boundary.
        let first_visible = ((offset / row_height).floor() as usize).min(count - 1);
        let last_visible = ((offset + viewport) / row_height).ceil() as usize;
        assert!(w.start_index <= first_visible);
        assert!(w.end_index >= last_visible.saturating_sub(1).min(count - 1));
    }
}

#[test]
fn window_is_idempotent() {
    let mut rng = Lcg::new(42);
    for _ in 0..500 {
        let count = rng.gen_range_usize(0, 10_000);
        let offset = rng.gen_f64(0.0, 500_000.0);
        let a = compute_window(count, offset, 600.0, 48.0, 5).unwrap();
        let b = compute_window(count, offset, 600.0, 48.0, 5).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn window_is_monotonic_in_scroll_offset() {
    let mut rng = Lcg::new(7);
    for _ in 0..200 {
        let count = rng.gen_range_usize(1, 3_000);
        let row_height = rng.gen_f64(8.0, 64.0);
        let overscan = rng.gen_range_usize(0, 10);
        let mut offset = 0.0;
        let mut prev = compute_window(count, offset, 480.0, row_height, overscan).unwrap();
        while offset < count as f64 * row_height {
            offset += rng.gen_f64(0.0, 3.0 * row_height);
            let next = compute_window(count, offset, 480.0, row_height, overscan).unwrap();
            assert!(next.start_index >= prev.start_index);
            assert!(next.end_index >= prev.end_index);
            prev = next;
        }
    }
}

#[test]
fn window_items_are_positioned() {
    let w = compute_window(5_000, 4_800.0, 600.0, 48.0, 5).unwrap();
    let mut items = Vec::new();
    w.collect_items(&mut items);
    assert_eq!(items.len(), 24);
    assert_eq!(items[0].index, 95);
    assert_eq!(items[0].offset, 95.0 * 48.0);
    assert_eq!(items[23].index, 118);
    assert_eq!(items[23].end(), 119.0 * 48.0);
    assert!(items.windows(2).all(|p| p[1].offset - p[0].offset == 48.0));

    assert_eq!(w.padding_before(), 95.0 * 48.0);
    assert_eq!(w.padding_after(), (5_000 - 119) as f64 * 48.0);
    assert!(w.contains(100));
    assert!(!w.contains(119));

    let mut n = 0;
    w.for_each_item(|_| n += 1);
    assert_eq!(n, 24);
}

#[test]
fn windowing_cost_does_not_depend_on_list_length() {
    let small = compute_window(100, 0.0, 600.0, 48.0, 5).unwrap();
    let huge = compute_window(usize::MAX / 2, 0.0, 600.0, 48.0, 5).unwrap();
    assert_eq!(small.len(), huge.len());
}

#[test]
fn config_merge_applies_overrides() {
    let c = VirtualizationConfig::merge(VirtualizationOverrides {
        row_height: Some(32.0),
        scroll_threshold_rows: Some(3),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(c.row_height, 32.0);
    assert_eq!(c.scroll_threshold_rows, 3);
    assert_eq!(c.overscan, DEFAULT_OVERSCAN);
    assert_eq!(c.container_height, DEFAULT_CONTAINER_HEIGHT);
    assert!(c.show_scroll_indicator);

    let err = VirtualizationConfig::merge(VirtualizationOverrides {
        row_height: Some(0.0),
        ..Default::default()
    })
    .unwrap_err();
    assert_eq!(err, ConfigError::InvalidRowHeight(0.0));

    assert!(
        VirtualizationConfig::default()
            .with_container_height(-1.0)
            .validate()
            .is_err()
    );
}

#[test]
fn viewport_scroll_to_index() {
    let vp = Viewport::new(100.0, 0.0);
    assert_eq!(vp.scroll_to_index_offset(50, 100, 10.0, Align::Start), 500.0);
    assert_eq!(vp.scroll_to_index_offset(50, 100, 10.0, Align::End), 410.0);
    assert_eq!(vp.scroll_to_index_offset(50, 100, 10.0, Align::Center), 455.0);
    assert_eq!(vp.scroll_to_index_offset(99, 100, 10.0, Align::Start), 900.0);
    assert_eq!(vp.scroll_to_index_offset(5, 100, 10.0, Align::Auto), 0.0);
    assert_eq!(vp.scroll_to_index_offset(20, 100, 10.0, Align::Auto), 110.0);
    assert_eq!(vp.scroll_to_index_offset(3, 0, 10.0, Align::Start), 0.0);

    let clamped = Viewport::new(100.0, 5_000.0).clamp(1_000.0);
    assert_eq!(clamped.scroll_offset, 900.0);
    let w = clamped.window(100, 10.0, 0).unwrap();
    assert_eq!(w.start_index, 90);
    assert_eq!(w.end_index, 99);
}

#[test]
fn label_tracks_window() {
    let w = compute_window(5_000, 149.0 * 48.0, 600.0, 48.0, 0).unwrap();
    assert_eq!(w.start_index, 149);
    assert_eq!(
        compute_label(&w, 5_000).as_deref(),
        Some("rows 150-163 of 5000")
    );
    assert_eq!(compute_label(&w, 0), None);
}

struct Person {
    id: u64,
    name: String,
    note: String,
}

impl Row for Person {
    fn id(&self) -> RowId {
        self.id
    }

    fn field(&self, name: &str) -> Option<CellValue<'_>> {
        match name {
            "name" => Some(CellValue::Text(Cow::Borrowed(&self.name))),
            "note" => Some(CellValue::Text(Cow::Borrowed(&self.note))),
            _ => None,
        }
    }
}

/// Minimal RFC 4180 reader used to check exports.
fn parse_csv(input: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if quoted {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => quoted = false,
                _ => field.push(ch),
            }
            continue;
        }
        match ch {
            '"' => quoted = true,
            ',' => row.push(core::mem::take(&mut field)),
            '\n' => {
                row.push(core::mem::take(&mut field));
                rows.push(core::mem::take(&mut row));
            }
            _ => field.push(ch),
        }
    }
    row.push(field);
    rows.push(row);
    rows
}

#[test]
fn csv_export_round_trips() {
    let columns = ColumnSet::new(vec![
        ColumnDef::new("name", "Full, name"),
        ColumnDef::new("note", "Note")
            .with_render(|p: &Person| alloc::format!("<em>{}</em>", p.note))
            .with_text(|p: &Person| p.note.to_uppercase()),
        ColumnDef::new("missing.path", "Missing"),
        ColumnDef::new("hidden", "Hidden").with_visible(false),
    ])
    .unwrap();
    let people = vec![
        Person {
            id: 1,
            name: "a,b\"c".into(),
            note: "multi\nline".into(),
        },
        Person {
            id: 2,
            name: "plain".into(),
            note: "ok".into(),
        },
    ];

    let csv = export_csv(&columns.visible(), &people);
    assert!(csv.starts_with("\"Full, name\",Note,Missing\n\"a,b\"\"c\""));

    let parsed = parse_csv(&csv);
    assert_eq!(
        parsed,
        vec![
            vec!["Full, name", "Note", "Missing"],
            vec!["a,b\"c", "MULTI\nLINE", "-"],
            vec!["plain", "OK", "-"],
        ]
    );
}

#[test]
fn csv_export_with_no_rows_has_header_only() {
    let columns = ColumnSet::<Person>::new(vec![ColumnDef::new("name", "Name")]).unwrap();
    let csv = export_csv(&columns.visible(), &Vec::<Person>::new());
    assert_eq!(csv, "Name");
}

#[test]
fn view_draft_validation() {
    let known = ["name", "email", "age"];
    let existing = vec![SavedView {
        id: 1,
        entity_type: "users".into(),
        name: "Compact".into(),
        columns: vec!["name".into()],
        is_default: false,
    }];

    assert!(
        ViewDraft::new("Wide", ["name", "email"])
            .validate(&known, &existing, None)
            .is_ok()
    );

    let err = ViewDraft::new("  ", Vec::<String>::new())
        .validate(&known, &existing, None)
        .unwrap_err();
    assert_eq!(err.name.len(), 1);
    assert_eq!(err.columns.len(), 1);

    let err = ViewDraft::new("compact", ["name", "ghost", "name"])
        .validate(&known, &existing, None)
        .unwrap_err();
    assert_eq!(err.name.len(), 1);
    assert_eq!(err.columns.len(), 2);

    // Renaming a view to its own name is fine.
    assert!(
        ViewDraft::new("Compact", ["age"])
            .validate(&known, &existing, Some(1))
            .is_ok()
    );

    let long = "x".repeat(MAX_VIEW_NAME_LEN + 1);
    assert!(
        ViewDraft::new(long, ["age"])
            .validate(&known, &existing, None)
            .is_err()
    );
}

#[test]
fn memory_view_store_crud_and_default() {
    let mut store = MemoryViewStore::new();
    let a = store
        .create("users", ViewDraft::new("A", ["name"]).with_default(true))
        .unwrap();
    let b = store.create("users", ViewDraft::new("B", ["email"])).unwrap();
    let other = store
        .create("orders", ViewDraft::new("A", ["total"]).with_default(true))
        .unwrap();
    assert_ne!(a.id, b.id);
    assert!(a.is_default);

    assert!(matches!(
        store.create("users", ViewDraft::new("a", ["name"])),
        Err(ViewError::Validation(_))
    ));

    store.set_default("users", Some(b.id)).unwrap();
    let users = store.list("users").unwrap();
    assert_eq!(users.iter().filter(|v| v.is_default).count(), 1);
    assert_eq!(store.default_view("users").unwrap().unwrap().id, b.id);
    assert_eq!(store.default_view("orders").unwrap().unwrap().id, other.id);

    assert_eq!(
        store.set_default("users", Some(other.id)),
        Err(ViewError::NotFound(other.id))
    );

    let renamed = store
        .update(a.id, ViewDraft::new("A2", ["name", "email"]))
        .unwrap();
    assert_eq!(renamed.name, "A2");
    assert_eq!(renamed.columns.len(), 2);
    assert!(!renamed.is_default);

    store.delete(b.id).unwrap();
    assert_eq!(store.default_view("users").unwrap(), None);
    assert_eq!(store.delete(b.id), Err(ViewError::NotFound(b.id)));
    assert_eq!(store.list("users").unwrap().len(), 1);

    store.set_default("orders", None).unwrap();
    assert_eq!(store.default_view("orders").unwrap(), None);
}

#[test]
fn applying_a_view_changes_only_visibility() {
    let mut columns = ColumnSet::<Person>::new(vec![
        ColumnDef::new("name", "Name"),
        ColumnDef::new("note", "Note"),
    ])
    .unwrap();
    let view = SavedView {
        id: 3,
        entity_type: "people".into(),
        name: "Notes".into(),
        columns: vec!["note".to_string()],
        is_default: true,
    };
    assert!(columns.apply_visible_keys(&view.columns));
    assert_eq!(columns.visible_keys(), vec!["note"]);
    assert_eq!(columns.keys(), vec!["name", "note"]);
}

#[cfg(feature = "serde")]
#[test]
fn table_state_serializes() {
    let state = reduce(
        TableState::new(RenderMode::Windowed, 50),
        TableAction::SetSort(Some(SortState::desc("created_at"))),
    );
    let json = serde_json::to_string(&state).unwrap();
    let back: TableState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
}
