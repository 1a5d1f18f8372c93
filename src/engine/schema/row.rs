use crate::engine::errors::{ConfigurationError, EngineError, TypeError};
use crate::engine::schema::row_schema::RowSchema;
use crate::engine::types::{LogicalType, ScalarValue};

/// One denormalized input row: fact attributes plus joined dimension attributes.
///
/// Values are positional, aligned with the `RowSchema` that built the row.
/// Measures are also kept pre-converted to fixed-point minor units.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<ScalarValue>,
    scaled: Vec<Option<i64>>,
}

impl Row {
    #[inline]
    pub fn value(&self, column: usize) -> &ScalarValue {
        self.values.get(column).unwrap_or(&ScalarValue::Null)
    }

    #[inline]
    pub fn scaled_measure(&self, position: usize) -> Option<i64> {
        self.scaled.get(position).copied().flatten()
    }

    pub fn values(&self) -> &[ScalarValue] {
        &self.values
    }
}

pub struct RowBuilder<'a> {
    schema: &'a RowSchema,
    values: Vec<ScalarValue>,
    unknown: Option<String>,
}

impl<'a> RowBuilder<'a> {
    pub(crate) fn new(schema: &'a RowSchema) -> Self {
        Self {
            schema,
            values: vec![ScalarValue::Null; schema.len()],
            unknown: None,
        }
    }

    pub fn set(mut self, column: &str, value: impl Into<ScalarValue>) -> Self {
        match self.schema.column_index(column) {
            Some(idx) => self.values[idx] = value.into(),
            None => {
                if self.unknown.is_none() {
                    self.unknown = Some(column.to_string());
                }
            }
        }
        self
    }

    pub fn build(self) -> Result<Row, EngineError> {
        if let Some(name) = self.unknown {
            return Err(ConfigurationError::UnknownAttribute(name).into());
        }

        for (idx, value) in self.values.iter().enumerate() {
            let Some((name, def)) = self.schema.column(idx) else {
                continue;
            };
            let found = value.logical_type();
            let accepted = found == LogicalType::Null
                || found == def.logical_type
                || (def.logical_type == LogicalType::Float && found == LogicalType::Integer);
            if !accepted {
                return Err(TypeError::ColumnType {
                    column: name.to_string(),
                    expected: def.logical_type,
                    found,
                }
                .into());
            }
        }

        let mut scaled = Vec::with_capacity(self.schema.measure_count());
        for position in 0..self.schema.measure_count() {
            let Some((column, name, def)) = self.schema.measure_at(position) else {
                continue;
            };
            let value = &self.values[column];
            if value.is_null() && !def.nullable {
                return Err(TypeError::NullMeasure {
                    measure: name.to_string(),
                }
                .into());
            }
            let minor = value.to_scaled(def.scale);
            if minor.is_none() && !value.is_null() {
                return Err(TypeError::MeasureOutOfRange {
                    measure: name.to_string(),
                    value: value.to_string(),
                }
                .into());
            }
            scaled.push(minor);
        }

        Ok(Row {
            values: self.values,
            scaled,
        })
    }
}
