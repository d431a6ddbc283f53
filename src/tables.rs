// 📋 Table Views - column/row previews of the literal tables
//
// Nested objects become dotted columns (`withSCF.financingCost`), lists are
// joined with "; ". A table that is a single object becomes one row.

use crate::data::DataStore;
use crate::error::{CasebookError, Result};
use crate::exhibit::Exhibit;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    pub fn from_json(name: &str, value: &Value) -> Self {
        let records: Vec<Vec<(String, String)>> = match value {
            Value::Array(items) => items.iter().map(flatten_record).collect(),
            Value::Null => Vec::new(),
            other => vec![flatten_record(other)],
        };

        // Union of columns in first-seen order; optional fields leave gaps
        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for (column, _) in record {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }

        let rows = records
            .into_iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| {
                        record
                            .iter()
                            .find(|(c, _)| c == column)
                            .map(|(_, cell)| cell.clone())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        TableView {
            name: name.to_string(),
            columns,
            rows,
        }
    }

    pub fn from_store(store: &DataStore, name: &str) -> Result<Self> {
        let value = store.table(name)?;
        Ok(TableView::from_json(name, &value))
    }

    /// Views of every table an exhibit binds, in binding order
    pub fn for_exhibit(store: &DataStore, exhibit: Exhibit) -> Result<Vec<TableView>> {
        exhibit
            .tables()
            .iter()
            .map(|name| TableView::from_store(store, name))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| CasebookError::Io(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Write `<name>.csv` into `dir`
    pub fn write_csv(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.csv", self.name));
        std::fs::write(&path, self.to_csv()?)?;
        log::debug!("wrote {} ({} rows)", path.display(), self.len());
        Ok(path)
    }
}

fn flatten_record(value: &Value) -> Vec<(String, String)> {
    let mut cells = Vec::new();
    match value {
        Value::Object(map) => flatten_into(&mut cells, "", map),
        other => cells.push(("value".to_string(), cell_text(other))),
    }
    cells
}

fn flatten_into(cells: &mut Vec<(String, String)>, prefix: &str, map: &Map<String, Value>) {
    for (key, value) in map {
        let column = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            Value::Object(nested) => flatten_into(cells, &column, nested),
            other => cells.push((column, cell_text(other))),
        }
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(cell_text).collect::<Vec<_>>().join("; "),
        other => other.to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_balance_sheet_view() {
        let store = DataStore::new();
        let view = TableView::from_store(&store, "pgBalanceSheetData").unwrap();

        assert_eq!(view.len(), 5);
        assert_eq!(view.columns[0], "year");
        assert_eq!(view.columns[1], "currentAssets");
        assert_eq!(view.rows[0][0], "2011");
        assert_eq!(view.rows[0][2], "138354");
    }

    #[test]
    fn test_nested_objects_become_dotted_columns() {
        let store = DataStore::new();
        let view = TableView::from_store(&store, "fibriaSCFImpactData").unwrap();

        assert_eq!(
            view.columns,
            vec![
                "year",
                "withoutSCF.financingCost",
                "withoutSCF.cashFlow",
                "withSCF.financingCost",
                "withSCF.cashFlow",
            ]
        );
        assert_eq!(view.rows[1][3], "34.02");
    }

    #[test]
    fn test_single_object_is_one_row() {
        let store = DataStore::new();
        let view = TableView::from_store(&store, "scfTableBData").unwrap();

        assert_eq!(view.len(), 1);
        assert!(view.columns.contains(&"libor60Day".to_string()));
    }

    #[test]
    fn test_optional_fields_leave_empty_cells() {
        let value = json!([
            {"title": "Cash retained", "value": "$4.0B"},
            {"title": "Supply-chain stability"}
        ]);
        let view = TableView::from_json("impacts", &value);

        assert_eq!(view.columns, vec!["title", "value"]);
        assert_eq!(view.rows[1], vec!["Supply-chain stability".to_string(), String::new()]);
    }

    #[test]
    fn test_lists_are_joined() {
        let value = json!([{"party": "Local banks", "points": ["a", "b"]}]);
        let view = TableView::from_json("parties", &value);

        assert_eq!(view.rows[0][1], "a; b");
    }

    #[test]
    fn test_csv_output() {
        let store = DataStore::new();
        let csv = TableView::from_store(&store, "historicalLiborData").unwrap().to_csv().unwrap();
        let mut lines = csv.lines();

        assert_eq!(lines.next(), Some("date,libor3m"));
        assert_eq!(lines.next(), Some("2012,0.43"));
        assert_eq!(csv.lines().last(), Some("2015 (Aug),0.3"));
    }

    #[test]
    fn test_write_csv() {
        let dir = TempDir::new().unwrap();
        let store = DataStore::new();
        let view = TableView::from_store(&store, "treasuryYieldsData").unwrap();

        let path = view.write_csv(dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "treasuryYieldsData.csv");

        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("maturity,yield\n1M,0.05\n"));
    }

    #[test]
    fn test_exhibit_views_follow_binding_order() {
        let store = DataStore::new();
        let views = TableView::for_exhibit(&store, Exhibit::Exhibit2).unwrap();
        let names: Vec<&str> = views.iter().map(|v| v.name.as_str()).collect();

        assert_eq!(names, vec!["pgBalanceSheetData", "pgWorkingCapitalData"]);
    }

    #[test]
    fn test_unknown_table() {
        let store = DataStore::new();
        assert!(matches!(
            TableView::from_store(&store, "nope"),
            Err(CasebookError::UnknownTable(_))
        ));
    }
}
