use crate::utils::error::AssemblyError;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Highest row count that still has single-letter row labels.
pub const MAX_PLATE_ROWS: usize = 26;

/// One well address, rendered as `<Row><Column>` (e.g. `A1`, `H12`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WellCoordinate {
    row: char,
    column: u16,
}

impl WellCoordinate {
    pub fn new(row: char, column: u16) -> Self {
        Self { row, column }
    }

    pub fn row(&self) -> char {
        self.row
    }

    pub fn column(&self) -> u16 {
        self.column
    }
}

impl fmt::Display for WellCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.column)
    }
}

impl Serialize for WellCoordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Row and column labels of a plate. Immutable once built; the layout
/// generator and reservoir planner each hold their own copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlateGeometry {
    rows: Vec<char>,
    columns: u16,
}

impl PlateGeometry {
    /// Standard 96-well plate: rows A..H, columns 1..12.
    pub fn standard_96() -> Self {
        Self {
            rows: ('A'..='H').collect(),
            columns: 12,
        }
    }

    /// Row labels start at `A`, so at most `MAX_PLATE_ROWS` rows.
    pub fn new(rows: usize, columns: u16) -> crate::utils::error::Result<Self> {
        if rows == 0 || rows > MAX_PLATE_ROWS {
            return Err(AssemblyError::InvalidConfigValueError {
                field: "plate.rows".to_string(),
                value: rows.to_string(),
                reason: format!("Value must be between 1 and {}", MAX_PLATE_ROWS),
            });
        }
        if columns == 0 {
            return Err(AssemblyError::InvalidConfigValueError {
                field: "plate.columns".to_string(),
                value: columns.to_string(),
                reason: "Plate needs at least one column".to_string(),
            });
        }

        let rows = (b'A'..=b'Z').take(rows).map(char::from).collect();
        Ok(Self { rows, columns })
    }

    pub fn row_labels(&self) -> &[char] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns as usize
    }

    pub fn capacity(&self) -> usize {
        self.row_count() * self.column_count()
    }

    /// The `index`-th address in column-major order (A1, B1, .., H1, A2, ..).
    pub fn coordinate_at(&self, index: usize) -> Option<WellCoordinate> {
        if index >= self.capacity() {
            return None;
        }
        let row = self.rows[index % self.row_count()];
        let column = (index / self.row_count()) as u16 + 1;
        Some(WellCoordinate::new(row, column))
    }

    /// All addresses in column-major order.
    pub fn column_major(&self) -> impl Iterator<Item = WellCoordinate> + '_ {
        (1..=self.columns).flat_map(move |column| {
            self.rows
                .iter()
                .map(move |&row| WellCoordinate::new(row, column))
        })
    }
}

impl Default for PlateGeometry {
    fn default() -> Self {
        Self::standard_96()
    }
}

/// Two ordered part sequences. Blank entries never make it in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartList {
    pub category_a: Vec<String>,
    pub category_b: Vec<String>,
}

impl PartList {
    pub fn new<A, B>(category_a: A, category_b: B) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        B: IntoIterator,
        B::Item: Into<String>,
    {
        Self {
            category_a: non_blank(category_a),
            category_b: non_blank(category_b),
        }
    }

    pub fn counts(&self) -> (usize, usize) {
        (self.category_a.len(), self.category_b.len())
    }
}

fn non_blank<I>(items: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    items
        .into_iter()
        .map(Into::into)
        .filter(|item| !item.trim().is_empty())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombinationRow {
    pub well: WellCoordinate,
    pub part_a: String,
    pub part_b: String,
}

/// Ordered combination rows; row `k` sits at the `k`-th column-major address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LayoutTable {
    rows: Vec<CombinationRow>,
}

impl LayoutTable {
    pub fn new(rows: Vec<CombinationRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[CombinationRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CombinationRow> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a LayoutTable {
    type Item = &'a CombinationRow;
    type IntoIter = std::slice::Iter<'a, CombinationRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Lines of a donor script, each keeping its own line terminator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateText {
    lines: Vec<String>,
}

impl TemplateText {
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parse(text: &str) -> Self {
        Self::from_lines(text.split_inclusive('\n'))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A scalar or tuple value written into the generated script without quoting.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Tuple(Vec<ParamValue>),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Integer(value) => write!(f, "{}", value),
            ParamValue::Float(value) => write!(f, "{:?}", value),
            ParamValue::Text(value) => f.write_str(value),
            ParamValue::Tuple(items) => {
                f.write_str("(")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        ParamValue::Integer(value as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Named parameters in insertion order. Re-inserting a name keeps its
/// original position and replaces the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParameterSet {
    entries: IndexMap<String, ParamValue>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> &mut Self {
        self.entries.insert(name.into(), value.into());
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Preamble, parameter block, blank line, body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedScript {
    lines: Vec<String>,
}

impl GeneratedScript {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn to_text(&self) -> String {
        self.lines.concat()
    }
}

impl fmt::Display for GeneratedScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            f.write_str(line)?;
        }
        Ok(())
    }
}

/// One part's trip from the source reservoir to the destination plate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartTransfer {
    pub part: String,
    pub source: WellCoordinate,
    pub destinations: Vec<WellCoordinate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReservoirPlan {
    pub columns_spanned: usize,
    pub category_a: Vec<PartTransfer>,
    pub category_b: Vec<PartTransfer>,
}

/// What the pipeline reads before any computation happens.
#[derive(Debug, Clone)]
pub struct AssemblyInputs {
    pub parts: PartList,
    pub template: TemplateText,
}

#[derive(Debug, Clone)]
pub struct AssemblyArtifacts {
    pub layout: LayoutTable,
    pub layout_csv: Vec<u8>,
    pub parameters: ParameterSet,
    pub script: GeneratedScript,
    /// `None` when the parts overflow the source plate.
    pub plan: Option<ReservoirPlan>,
    pub summary: RunSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub count_a: usize,
    pub count_b: usize,
    pub total_wells: usize,
    pub plate_capacity: usize,
    pub parameters: ParameterSet,
    pub plan: Option<ReservoirPlan>,
}
