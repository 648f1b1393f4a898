use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::io::Write;

/// Store identifier as returned by the API. Current responses carry string
/// ids; older accounts still have numeric ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreId {
    Text(String),
    Number(i64),
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreId::Text(s) => f.write_str(s),
            StoreId::Number(n) => write!(f, "{}", n),
        }
    }
}

/// One entry from the `stores` listing: the id plus whatever other attributes
/// the API sent, kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub id: StoreId,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// An ordered collection of flat JSON rows, exportable as CSV.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    rows: Vec<Map<String, Value>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: Map<String, Value>) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in first-seen order across all rows.
    pub fn columns(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut columns: Vec<String> = Vec::new();
        for row in &self.rows {
            for key in row.keys() {
                if seen.insert(key.as_str()) {
                    columns.push(key.clone());
                }
            }
        }
        columns
    }

    /// Write the table as CSV. Rows missing a column get an empty cell;
    /// nested values are serialized as JSON text.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        if self.rows.is_empty() {
            return Ok(());
        }

        let columns = self.columns();

        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&columns)?;

        for row in &self.rows {
            let record: Vec<String> = columns.iter().map(|c| csv_cell(row.get(c))).collect();
            wtr.write_record(&record)?;
        }

        wtr.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

fn csv_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

/// The four related collections produced by the order flattening transform.
/// Child tables carry injected foreign-key columns (`order_id`,
/// `line_item_id`) referencing their parent rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderTables {
    pub orders: Table,
    pub line_items: Table,
    pub applied_taxes: Table,
    pub modifications: Table,
}
