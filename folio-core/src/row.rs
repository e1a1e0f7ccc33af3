use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::cell::CellValue;
use crate::schema::RowSchema;

/// A flat row with exactly one cell per schema column, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRow {
    schema: &'static RowSchema,
    cells: Vec<CellValue>,
}

impl CanonicalRow {
    pub(crate) fn new(schema: &'static RowSchema, cells: Vec<CellValue>) -> Self {
        debug_assert_eq!(schema.len(), cells.len());
        Self { schema, cells }
    }

    pub fn schema(&self) -> &'static RowSchema {
        self.schema
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    pub fn get(&self, label: &str) -> Option<&CellValue> {
        self.schema.position_of(label).map(|i| &self.cells[i])
    }

    /// `(label, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &CellValue)> + '_ {
        self.schema.labels().zip(self.cells.iter())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for CanonicalRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (label, value) in self.iter() {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}
