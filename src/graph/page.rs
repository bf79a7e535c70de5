//! Shape-tagged result sets
//!
//! Resource Graph answers a bulk query either as a table (named, typed
//! columns plus row arrays) or as a plain array of records, depending on the
//! requested result format and query shape. Downstream code never branches
//! on raw JSON: pages are parsed into [`ResultSet`] and merged through
//! [`ResultSetBuilder`], which owns one growable buffer per shape.

use serde::Deserialize;
use serde_json::{Map, Value};

/// A named, typed column of a table-shaped result
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type", default)]
    pub col_type: String,
}

impl Column {
    pub fn new(name: &str, col_type: &str) -> Self {
        Self {
            name: name.to_string(),
            col_type: col_type.to_string(),
        }
    }
}

/// One page of backend results, or the accumulation of several pages.
///
/// Within one query's pagination run all pages share a shape class and
/// column set; the builder still reconciles a mismatch by degrading to
/// records rather than dropping data.
#[derive(Debug, Clone)]
pub enum ResultSet {
    /// Ordered rows of named, typed columns
    Table {
        columns: Vec<Column>,
        rows: Vec<Vec<Value>>,
    },
    /// Ordered sequence of heterogeneous JSON records
    Records(Vec<Value>),
}

impl ResultSet {
    /// Fetched-row count, determined by shape
    pub fn count(&self) -> usize {
        match self {
            ResultSet::Table { rows, .. } => rows.len(),
            ResultSet::Records(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Convert to an ordered record sequence. Table rows become objects
    /// keyed by column name; records pass through unchanged.
    pub fn into_records(self) -> Vec<Value> {
        match self {
            ResultSet::Records(records) => records,
            ResultSet::Table { columns, rows } => rows
                .into_iter()
                .map(|row| {
                    let mut obj = Map::new();
                    for (col, cell) in columns.iter().zip(row) {
                        obj.insert(col.name.clone(), cell);
                    }
                    Value::Object(obj)
                })
                .collect(),
        }
    }
}

/// Accumulates successive pages of one query into a single [`ResultSet`].
///
/// `seed` takes the first page, `append` merges each subsequent one, and
/// `finalize` yields the merged set - or `None` when no page ever arrived,
/// which is distinct from a page with zero rows.
#[derive(Debug, Default)]
pub struct ResultSetBuilder {
    acc: Option<ResultSet>,
}

impl ResultSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the accumulator with the first page. The page is an owned,
    /// freshly deserialized value, so the accumulator never aliases a
    /// backend buffer.
    pub fn seed(&mut self, page: ResultSet) {
        debug_assert!(self.acc.is_none(), "seed called on a non-empty builder");
        self.acc = Some(page);
    }

    /// Append a subsequent page. Table onto table with matching columns
    /// extends the row buffer in place; any list-like side (or a column
    /// mismatch) degrades the accumulator to records, concatenated in
    /// arrival order. Rows are never deduplicated.
    pub fn append(&mut self, page: ResultSet) {
        self.acc = Some(match self.acc.take() {
            None => page,
            Some(ResultSet::Table { columns, mut rows }) => match page {
                ResultSet::Table {
                    columns: page_columns,
                    rows: page_rows,
                } if page_columns == columns => {
                    rows.extend(page_rows);
                    ResultSet::Table { columns, rows }
                }
                other => {
                    let mut records = ResultSet::Table { columns, rows }.into_records();
                    records.extend(other.into_records());
                    ResultSet::Records(records)
                }
            },
            Some(ResultSet::Records(mut records)) => {
                records.extend(page.into_records());
                ResultSet::Records(records)
            }
        });
    }

    /// The merged set, or `None` when no page was ever seeded
    pub fn finalize(self) -> Option<ResultSet> {
        self.acc
    }
}
