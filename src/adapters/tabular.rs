use crate::domain::model::{LayoutTable, PartList};
use crate::utils::error::{AssemblyError, Result};
use serde::{Deserialize, Serialize};

/// Header row of the plate-map file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutHeaders {
    pub coordinate: String,
    pub part_a: String,
    pub part_b: String,
}

impl Default for LayoutHeaders {
    fn default() -> Self {
        Self {
            coordinate: "Platemap Coordinates".to_string(),
            part_a: "Promoters".to_string(),
            part_b: "3'UTRs".to_string(),
        }
    }
}

/// Reads the two named columns of a parts file. Columns may have different
/// lengths; blank cells are skipped.
pub fn read_part_list(data: &[u8], column_a: &str, column_b: &str) -> Result<PartList> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let index_a = column_index(&headers, column_a)?;
    let index_b = column_index(&headers, column_b)?;

    let mut category_a = Vec::new();
    let mut category_b = Vec::new();

    for record in reader.records() {
        let record = record?;
        if let Some(value) = record.get(index_a).filter(|v| !v.is_empty()) {
            category_a.push(value.to_string());
        }
        if let Some(value) = record.get(index_b).filter(|v| !v.is_empty()) {
            category_b.push(value.to_string());
        }
    }

    tracing::debug!(
        "Read {} '{}' and {} '{}' entries from parts file",
        category_a.len(),
        column_a,
        category_b.len(),
        column_b
    );

    Ok(PartList::new(category_a, category_b))
}

fn column_index(headers: &csv::StringRecord, column: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header.trim_start_matches('\u{feff}') == column)
        .ok_or_else(|| AssemblyError::MissingColumn {
            column: column.to_string(),
        })
}

pub fn write_layout_csv(table: &LayoutTable, headers: &LayoutHeaders) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        headers.coordinate.as_str(),
        headers.part_a.as_str(),
        headers.part_b.as_str(),
    ])?;

    for row in table {
        let well = row.well.to_string();
        writer.write_record([well.as_str(), row.part_a.as_str(), row.part_b.as_str()])?;
    }

    writer
        .into_inner()
        .map_err(|e| AssemblyError::IoError(e.into_error()))
}
