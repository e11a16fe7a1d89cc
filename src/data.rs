use std::{fmt, str::FromStr, sync::Arc};

use thiserror::Error;

use crate::{DefinitionError, Result};

/// Why a raw argument was rejected by a [`DataType`].
///
/// Every data type reports failures through these two kinds only, which is
/// what keeps the parser independent of the kinds of values it produces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("value must not be empty")]
    Empty,
    #[error("value must be one of {}", DisplayEnumValues(.enum_values))]
    InvalidEnumValue { enum_values: Vec<String> },
}

/// Validates raw arguments and converts them into values.
pub trait DataType: fmt::Debug + fmt::Display + Send + Sync {
    fn parse_str(&self, raw: &str) -> Result<String, DataError>;

    /// Checks a value that did not come from the command line.
    fn validate(&self, value: &str) -> bool;
}

/// Any string, optionally rejecting the empty one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringType {
    accept_empty: bool,
}

impl StringType {
    pub const ACCEPT_EMPTY: StringType = StringType { accept_empty: true };
    pub const REJECT_EMPTY: StringType = StringType { accept_empty: false };

    pub fn new(accept_empty: bool) -> StringType {
        StringType { accept_empty }
    }

    pub fn is_empty_accepted(&self) -> bool {
        self.accept_empty
    }
}

impl DataType for StringType {
    fn parse_str(&self, raw: &str) -> Result<String, DataError> {
        if !self.validate(raw) {
            return Err(DataError::Empty);
        }
        Ok(raw.to_string())
    }

    fn validate(&self, value: &str) -> bool {
        self.accept_empty || !value.is_empty()
    }
}

impl fmt::Display for StringType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("string")
    }
}

/// One of a fixed set of literal values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringEnumType {
    values: Vec<String>,
}

impl StringEnumType {
    pub fn new<I>(values: I) -> Result<StringEnumType>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect::<Vec<String>>();
        if values.is_empty() {
            return Err(DefinitionError::NoEnumValues);
        }
        if let Some(index) = values.iter().position(|it| it.is_empty()) {
            return Err(DefinitionError::EmptyEnumValue { index });
        }
        for (first, a) in values.iter().enumerate() {
            for (second, b) in values.iter().enumerate().skip(first + 1) {
                if a == b {
                    return Err(DefinitionError::DuplicateEnumValue {
                        value: a.clone(),
                        first,
                        second,
                    });
                }
            }
        }
        Ok(StringEnumType { values })
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

impl DataType for StringEnumType {
    fn parse_str(&self, raw: &str) -> Result<String, DataError> {
        if raw.is_empty() {
            return Err(DataError::Empty);
        }
        if !self.validate(raw) {
            return Err(DataError::InvalidEnumValue { enum_values: self.values.clone() });
        }
        Ok(raw.to_string())
    }

    fn validate(&self, value: &str) -> bool {
        self.values.iter().any(|it| it == value)
    }
}

impl fmt::Display for StringEnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enum {{ {} }}", DisplayEnumValues(&self.values))
    }
}

/// `"a", "b", "c"`
pub(crate) struct DisplayEnumValues<'a>(pub(crate) &'a [String]);

impl fmt::Display for DisplayEnumValues<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str("\"")?;
            for c in value.chars() {
                if c == '"' || c == '\\' {
                    f.write_str("\\")?;
                }
                write!(f, "{c}")?;
            }
            f.write_str("\"")?;
        }
        Ok(())
    }
}

/// A value accepted by a data type.
///
/// Two values are equal when they hold the same string and were produced by
/// the same data type instance.
#[derive(Debug, Clone)]
pub struct DataValue {
    data_type: Arc<dyn DataType>,
    value: String,
}

impl DataValue {
    pub fn new(data_type: Arc<dyn DataType>, value: impl Into<String>) -> Result<DataValue> {
        let value = value.into();
        if !data_type.validate(&value) {
            return Err(DefinitionError::InvalidValue { value, data_type: data_type.to_string() });
        }
        Ok(DataValue { data_type, value })
    }

    pub fn parse_str(data_type: &Arc<dyn DataType>, raw: &str) -> Result<DataValue, DataError> {
        let value = data_type.parse_str(raw)?;
        Ok(DataValue { data_type: Arc::clone(data_type), value })
    }

    pub fn data_type(&self) -> &Arc<dyn DataType> {
        &self.data_type
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn parse<T: FromStr>(&self) -> Result<T, T::Err> {
        self.value.parse()
    }
}

impl PartialEq for DataValue {
    fn eq(&self, other: &DataValue) -> bool {
        same_data_type(&self.data_type, &other.data_type) && self.value == other.value
    }
}

impl Eq for DataValue {}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

pub(crate) fn same_data_type(a: &Arc<dyn DataType>, b: &Arc<dyn DataType>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}
