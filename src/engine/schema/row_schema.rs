use indexmap::IndexMap;

use crate::engine::errors::ConfigurationError;
use crate::engine::schema::row::RowBuilder;
use crate::engine::types::LogicalType;

/// Numeric column eligible for aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureDef {
    /// Decimal places kept when converting to fixed-point minor units
    pub scale: u32,
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRole {
    Attribute,
    Measure(MeasureDef),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub logical_type: LogicalType,
    pub role: ColumnRole,
}

impl ColumnDef {
    pub fn measure(&self) -> Option<&MeasureDef> {
        match &self.role {
            ColumnRole::Measure(m) => Some(m),
            ColumnRole::Attribute => None,
        }
    }
}

/// Ordered declaration of the columns a denormalized row carries.
///
/// Attributes and measures share one positional index space; measures
/// additionally get a dense position of their own, used by accumulators.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSchema {
    columns: IndexMap<String, ColumnDef>,
    measure_columns: Vec<usize>,
}

impl RowSchema {
    pub fn builder() -> RowSchemaBuilder {
        RowSchemaBuilder::default()
    }

    pub fn row(&self) -> RowBuilder<'_> {
        RowBuilder::new(self)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.get_index_of(name)
    }

    pub fn column(&self, index: usize) -> Option<(&str, &ColumnDef)> {
        self.columns
            .get_index(index)
            .map(|(name, def)| (name.as_str(), def))
    }

    pub fn column_by_name(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.get(name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Dense measure position for `name`, or why it has none.
    pub fn measure_position(&self, name: &str) -> Result<usize, ConfigurationError> {
        let index = self
            .column_index(name)
            .ok_or_else(|| ConfigurationError::UnknownMeasure(name.to_string()))?;
        self.measure_columns
            .iter()
            .position(|&c| c == index)
            .ok_or_else(|| ConfigurationError::NotAMeasure(name.to_string()))
    }

    pub fn measure_count(&self) -> usize {
        self.measure_columns.len()
    }

    /// Column index and definition of the measure at dense `position`
    pub fn measure_at(&self, position: usize) -> Option<(usize, &str, &MeasureDef)> {
        let column = *self.measure_columns.get(position)?;
        let (name, def) = self.column(column)?;
        def.measure().map(|m| (column, name, m))
    }
}

#[derive(Debug, Default)]
pub struct RowSchemaBuilder {
    columns: Vec<(String, ColumnDef)>,
}

impl RowSchemaBuilder {
    pub fn attribute(mut self, name: &str, logical_type: LogicalType) -> Self {
        self.columns.push((
            name.to_string(),
            ColumnDef {
                logical_type,
                role: ColumnRole::Attribute,
            },
        ));
        self
    }

    pub fn measure(
        mut self,
        name: &str,
        logical_type: LogicalType,
        scale: u32,
        nullable: bool,
    ) -> Self {
        self.columns.push((
            name.to_string(),
            ColumnDef {
                logical_type,
                role: ColumnRole::Measure(MeasureDef { scale, nullable }),
            },
        ));
        self
    }

    pub fn build(self) -> Result<RowSchema, ConfigurationError> {
        let mut columns = IndexMap::with_capacity(self.columns.len());
        let mut measure_columns = Vec::new();
        for (name, def) in self.columns {
            if columns.contains_key(&name) {
                return Err(ConfigurationError::DuplicateColumn(name));
            }
            if def.measure().is_some() {
                if !def.logical_type.is_numeric() {
                    return Err(ConfigurationError::NonNumericMeasure {
                        name,
                        found: def.logical_type,
                    });
                }
                measure_columns.push(columns.len());
            }
            columns.insert(name, def);
        }
        Ok(RowSchema {
            columns,
            measure_columns,
        })
    }
}
