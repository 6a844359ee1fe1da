use crate::error::Result;
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Markdown table of the first `max_rows` rows.
pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table<T>(title: &str, note: Option<&str>, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("\n{}", title);
    if let Some(n) = note {
        println!("({})", n);
    }
    println!();
    println!("{}\n", render_table(rows, max_rows));
    if rows.len() > max_rows {
        println!("({} of {} rows shown)\n", max_rows, rows.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SearchRow;

    fn row(name: &str) -> SearchRow {
        SearchRow {
            district: "도봉구".into(),
            subdivision: "방학동".into(),
            building_name: name.into(),
            amount: "12,000".into(),
            building_area: "84.97".into(),
            construction_year: "-".into(),
            building_use: "아파트".into(),
        }
    }

    #[test]
    fn writes_csv_with_renamed_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&path, &[row("현대")]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("District,Subdivision,BuildingName,Amount,BuildingArea,ConstructionYear,BuildingUse")
        );
        assert_eq!(lines.next(), Some("도봉구,방학동,현대,\"12,000\",84.97,-,아파트"));
    }

    #[test]
    fn writes_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&path, &[row("a"), row("b")][..]).unwrap();
        let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(v.as_array().map(Vec::len), Some(2));
        assert_eq!(v[1]["BuildingName"], "b");
    }

    #[test]
    fn table_is_truncated_and_handles_empty() {
        let rows = vec![row("a"), row("b"), row("c")];
        let t = render_table(&rows, 2);
        assert!(t.contains("| a"));
        assert!(!t.contains("| c"));
        assert_eq!(render_table::<SearchRow>(&[], 5), "(no rows)");
    }
}
