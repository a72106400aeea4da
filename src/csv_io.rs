//! CSV import/export for items, containers, and arrangement snapshots
//! (spec §6 "CSV item import columns" / "CSV container import columns" /
//! "Arrangement export format").
//!
//! Headers are reproduced verbatim, including the upstream container
//! header's `Height(height)` typo — implementers must accept it literally.

use std::collections::HashMap;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};

use crate::model::{Container, Item};

const ITEM_HEADERS: &[&str] = &[
    "Item ID",
    "Name",
    "Width (cm)",
    "Depth (cm)",
    "Height (cm)",
    "Mass (kg)",
    "Priority (1-100)",
    "Expiry Date (ISO Format)",
    "Usage Limit",
    "Preferred Zone",
];

const CONTAINER_HEADERS: &[&str] = &["Container ID", "Zone", "Width(cm)", "Depth(cm)", "Height(height)"];

/// One row that failed to import, 1-indexed against the data rows (the
/// header is not counted).
#[derive(Clone, Debug, PartialEq)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

/// Result of a bulk import: how many rows succeeded, and the per-row
/// errors for the rest (spec §7: "Bulk imports return `(successCount,
/// perRowErrors[])`").
#[derive(Clone, Debug, Default)]
pub struct ImportOutcome {
    pub success_count: usize,
    pub errors: Vec<RowError>,
}

fn header_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn field<'a>(record: &'a StringRecord, index: Option<usize>) -> Option<&'a str> {
    let value = record.get(index?)?;
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// Parses item rows against [`ITEM_HEADERS`]. Each row is validated and
/// constructed independently; a malformed row is recorded in the outcome
/// and does not abort the rest of the batch.
pub fn import_items_csv(data: &str) -> (Vec<Item>, ImportOutcome) {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(data.as_bytes());
    let headers = reader.headers().cloned().unwrap_or_default();
    let index: HashMap<&str, usize> = ITEM_HEADERS
        .iter()
        .filter_map(|&name| header_index(&headers, name).map(|idx| (name, idx)))
        .collect();

    let mut items = Vec::new();
    let mut outcome = ImportOutcome::default();

    for (row_num, record) in reader.records().enumerate() {
        let row = row_num + 1;
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                outcome.errors.push(RowError { row, message: err.to_string() });
                continue;
            }
        };

        match parse_item_row(&record, &index) {
            Ok(item) => {
                items.push(item);
                outcome.success_count += 1;
            }
            Err(message) => outcome.errors.push(RowError { row, message }),
        }
    }

    (items, outcome)
}

fn parse_item_row(record: &StringRecord, index: &HashMap<&str, usize>) -> Result<Item, String> {
    let id = field(record, index.get("Item ID").copied()).ok_or("Item ID is required")?;
    let name = field(record, index.get("Name").copied()).ok_or("Name is required")?;
    let width = parse_required_f64(record, index, "Width (cm)")?;
    let depth = parse_required_f64(record, index, "Depth (cm)")?;
    let height = parse_required_f64(record, index, "Height (cm)")?;
    let mass = parse_required_f64(record, index, "Mass (kg)")?;
    let priority = parse_required_i32(record, index, "Priority (1-100)")?;
    let expiry = match field(record, index.get("Expiry Date (ISO Format)").copied()) {
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|err| format!("Expiry Date (ISO Format) is malformed: {}", err))?,
        ),
        None => None,
    };
    let usage_limit = match field(record, index.get("Usage Limit").copied()) {
        Some(raw) => Some(raw.parse::<u32>().map_err(|err| format!("Usage Limit is malformed: {}", err))?),
        None => None,
    };
    let preferred_zone =
        field(record, index.get("Preferred Zone").copied()).ok_or("Preferred Zone is required")?;

    Item::new(
        id.to_string(),
        name.to_string(),
        (width, depth, height),
        mass,
        priority,
        expiry,
        usage_limit,
        preferred_zone.to_string(),
    )
    .map_err(|err| err.to_string())
}

/// Parses container rows against [`CONTAINER_HEADERS`], including the
/// verbatim `Height(height)` header.
pub fn import_containers_csv(data: &str) -> (Vec<Container>, ImportOutcome) {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(data.as_bytes());
    let headers = reader.headers().cloned().unwrap_or_default();
    let index: HashMap<&str, usize> = CONTAINER_HEADERS
        .iter()
        .filter_map(|&name| header_index(&headers, name).map(|idx| (name, idx)))
        .collect();

    let mut containers = Vec::new();
    let mut outcome = ImportOutcome::default();

    for (row_num, record) in reader.records().enumerate() {
        let row = row_num + 1;
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                outcome.errors.push(RowError { row, message: err.to_string() });
                continue;
            }
        };

        match parse_container_row(&record, &index) {
            Ok(container) => {
                containers.push(container);
                outcome.success_count += 1;
            }
            Err(message) => outcome.errors.push(RowError { row, message }),
        }
    }

    (containers, outcome)
}

fn parse_container_row(record: &StringRecord, index: &HashMap<&str, usize>) -> Result<Container, String> {
    let id = field(record, index.get("Container ID").copied()).ok_or("Container ID is required")?;
    let zone = field(record, index.get("Zone").copied()).ok_or("Zone is required")?;
    let width = parse_required_f64(record, index, "Width(cm)")?;
    let depth = parse_required_f64(record, index, "Depth(cm)")?;
    let height = parse_required_f64(record, index, "Height(height)")?;

    Container::new(id.to_string(), zone.to_string(), (width, depth, height)).map_err(|err| err.to_string())
}

fn parse_required_f64(record: &StringRecord, index: &HashMap<&str, usize>, name: &str) -> Result<f64, String> {
    let raw = field(record, index.get(name).copied()).ok_or_else(|| format!("{} is required", name))?;
    raw.parse::<f64>().map_err(|err| format!("{} is malformed: {}", name, err))
}

fn parse_required_i32(record: &StringRecord, index: &HashMap<&str, usize>, name: &str) -> Result<i32, String> {
    let raw = field(record, index.get(name).copied()).ok_or_else(|| format!("{} is required", name))?;
    raw.parse::<i32>().map_err(|err| format!("{} is malformed: {}", name, err))
}

/// Renders the arrangement export (spec §6 "Arrangement export format").
/// Only placed items are included.
pub fn export_arrangement_csv(items: &[Item]) -> String {
    let mut out = String::from("Item ID,Container ID,Coordinates (W1,D1,H1),(W2,D2,H2)\n");
    for item in items {
        let Some(location) = &item.location else { continue };
        let start = location.placement.start;
        let end = location.placement.end;
        out.push_str(&format!(
            "{},{},({},{},{}),({},{},{})\n",
            item.id, location.container_id, start.0, start.1, start.2, end.0, end.1, end.2
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_items_parses_valid_rows() {
        let data = "Item ID, Name, Width (cm), Depth (cm), Height (cm), Mass (kg), Priority (1-100), Expiry Date (ISO Format), Usage Limit, Preferred Zone\n\
I1,Widget,10,10,10,5,50,,,A\n";
        let (items, outcome) = import_items_csv(data);
        assert_eq!(outcome.success_count, 1);
        assert!(outcome.errors.is_empty());
        assert_eq!(items[0].id, "I1");
        assert_eq!(items[0].expiry, None);
    }

    #[test]
    fn test_import_items_accumulates_per_row_errors() {
        let data = "Item ID, Name, Width (cm), Depth (cm), Height (cm), Mass (kg), Priority (1-100), Expiry Date (ISO Format), Usage Limit, Preferred Zone\n\
I1,Widget,10,10,10,5,50,,,A\n\
I2,Bad,-1,10,10,5,50,,,A\n";
        let (items, outcome) = import_items_csv(data);
        assert_eq!(items.len(), 1);
        assert_eq!(outcome.success_count, 1);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].row, 2);
    }

    #[test]
    fn test_import_containers_accepts_verbatim_height_header() {
        let data = "Container ID,Zone,Width(cm),Depth(cm),Height(height)\nC1,A,100,100,100\n";
        let (containers, outcome) = import_containers_csv(data);
        assert_eq!(outcome.success_count, 1);
        assert_eq!(containers[0].id, "C1");
    }

    #[test]
    fn test_export_arrangement_includes_only_placed_items() {
        let placed = Item::new("I1".into(), "Widget".into(), (10.0, 10.0, 10.0), 5.0, 50, None, None, "A".into())
            .unwrap();
        let mut placed = placed;
        placed.location = Some(crate::model::ItemLocation {
            container_id: "C1".into(),
            placement: crate::model::Placement::from_start_and_extents(
                crate::types::Vec3::zero(),
                crate::types::Vec3::new(10.0, 10.0, 10.0),
            ),
        });
        let unplaced =
            Item::new("I2".into(), "Gadget".into(), (1.0, 1.0, 1.0), 1.0, 50, None, None, "A".into()).unwrap();

        let csv = export_arrangement_csv(&[placed, unplaced]);
        assert!(csv.contains("Item ID,Container ID,Coordinates (W1,D1,H1),(W2,D2,H2)"));
        assert!(csv.contains("I1,C1,(0,0,0),(10,10,10)"));
        assert!(!csv.contains("I2"));
    }
}
