use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;

use chrono::NaiveDate;

use crate::{ColumnDef, Row};

/// Quotes a CSV field when it contains a comma, double quote or line break; internal quotes are
/// doubled.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if !field.contains([',', '"', '\n', '\r']) {
        return Cow::Borrowed(field);
    }
    let mut out = String::with_capacity(field.len() + 2);
    out.push('"');
    for ch in field.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
    Cow::Owned(out)
}

/// Exports `rows` as CSV text.
///
/// `columns` are the visible columns in display order. The header row holds column labels; each
/// cell holds the column's plain text (its text accessor, or the value at its key). Lines are
/// separated by `\n`, without a trailing newline.
pub fn export_csv<'a, R: Row + 'a>(
    columns: &[&ColumnDef<R>],
    rows: impl IntoIterator<Item = &'a R>,
) -> String {
    let mut out = String::new();
    push_line(&mut out, columns.iter().map(|c| Cow::Borrowed(c.label.as_str())));
    let mut n = 0usize;
    for row in rows {
        out.push('\n');
        push_line(&mut out, columns.iter().map(|c| Cow::Owned(c.plain_text(row))));
        n += 1;
    }
    gdebug!(rows = n, columns = columns.len(), "export_csv");
    out
}

fn push_line<'s>(out: &mut String, fields: impl Iterator<Item = Cow<'s, str>>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(&field));
    }
}

/// The download name for an export: `explicit` when given (with `.csv` appended if missing),
/// otherwise `{base}_export_{YYYY-MM-DD}.csv`.
pub fn export_filename(base: &str, explicit: Option<&str>, date: NaiveDate) -> String {
    match explicit {
        Some(name) if name.ends_with(".csv") => name.into(),
        Some(name) => format!("{name}.csv"),
        None => format!("{base}_export_{date}.csv"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_only_when_needed() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b\"c"), "\"a,b\"\"c\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
        assert_eq!(escape_field(""), "");
    }

    #[test]
    fn filenames() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(
            export_filename("users", None, date),
            "users_export_2026-03-07.csv"
        );
        assert_eq!(export_filename("users", Some("q1"), date), "q1.csv");
        assert_eq!(export_filename("users", Some("q1.csv"), date), "q1.csv");
    }
}
