use std::{fmt, ptr, sync::Arc};

use crate::{error::NameKind, DataType, DefinitionError, OptionIdentifier, Result};

/// A positional argument slot.
#[derive(Debug)]
pub struct OperandDefinition {
    name: String,
    data_type: Arc<dyn DataType>,
}

impl OperandDefinition {
    pub fn new(name: impl Into<String>, data_type: impl DataType + 'static) -> Result<OperandDefinition> {
        let name = check_name(NameKind::Operand, name.into())?;
        Ok(OperandDefinition { name, data_type: Arc::new(data_type) })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> &Arc<dyn DataType> {
        &self.data_type
    }
}

/// Definitions compare by identity, two separately built definitions with
/// the same name are different slots.
impl PartialEq for OperandDefinition {
    fn eq(&self, other: &OperandDefinition) -> bool {
        ptr::eq(self, other)
    }
}

impl Eq for OperandDefinition {}

impl fmt::Display for OperandDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.name)
    }
}

/// The value an option takes.
#[derive(Debug)]
pub struct OptionArgumentDefinition {
    name: String,
    data_type: Arc<dyn DataType>,
}

impl OptionArgumentDefinition {
    pub fn new(
        name: impl Into<String>,
        data_type: impl DataType + 'static,
    ) -> Result<OptionArgumentDefinition> {
        let name = check_name(NameKind::OptionArgument, name.into())?;
        Ok(OptionArgumentDefinition { name, data_type: Arc::new(data_type) })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> &Arc<dyn DataType> {
        &self.data_type
    }
}

impl PartialEq for OptionArgumentDefinition {
    fn eq(&self, other: &OptionArgumentDefinition) -> bool {
        ptr::eq(self, other)
    }
}

impl Eq for OptionArgumentDefinition {}

impl fmt::Display for OptionArgumentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.name)
    }
}

fn check_name(kind: NameKind, name: String) -> Result<String> {
    if name.is_empty() {
        return Err(DefinitionError::EmptyName { kind });
    }
    if name.contains(['<', '>']) {
        return Err(DefinitionError::AngleBracketInName { kind, name });
    }
    Ok(name)
}

/// High priority options (`--help`, `--version`) are reported even when the
/// rest of the command line is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionPriority {
    #[default]
    Normal,
    High,
}

#[derive(Debug)]
struct ArgumentSpec {
    definition: OptionArgumentDefinition,
    required: bool,
}

/// An option, spelled with one or more identifiers.
#[derive(Debug)]
pub struct OptionDefinition {
    identifiers: Vec<OptionIdentifier>,
    argument: Option<ArgumentSpec>,
    priority: OptionPriority,
}

impl OptionDefinition {
    /// An option that takes no argument.
    pub fn flag(identifiers: impl IntoIterator<Item = OptionIdentifier>) -> Result<OptionDefinition> {
        OptionDefinition::build(identifiers.into_iter().collect(), None)
    }

    /// An option with an argument.
    ///
    /// A required argument may be given attached (`-Stab`, `--style=tab`) or
    /// as the next command line argument; an optional one only attached.
    pub fn with_argument(
        identifiers: impl IntoIterator<Item = OptionIdentifier>,
        argument: OptionArgumentDefinition,
        required: bool,
    ) -> Result<OptionDefinition> {
        let spec = ArgumentSpec { definition: argument, required };
        OptionDefinition::build(identifiers.into_iter().collect(), Some(spec))
    }

    fn build(identifiers: Vec<OptionIdentifier>, argument: Option<ArgumentSpec>) -> Result<OptionDefinition> {
        if identifiers.is_empty() {
            return Err(DefinitionError::NoIdentifiers);
        }
        for (first, a) in identifiers.iter().enumerate() {
            for (second, b) in identifiers.iter().enumerate().skip(first + 1) {
                if a == b {
                    return Err(DefinitionError::DuplicateIdentifier {
                        identifier: a.clone(),
                        first,
                        second,
                    });
                }
            }
        }
        Ok(OptionDefinition { identifiers, argument, priority: OptionPriority::Normal })
    }

    pub fn with_priority(mut self, priority: OptionPriority) -> OptionDefinition {
        self.priority = priority;
        self
    }

    pub fn high_priority(self) -> OptionDefinition {
        self.with_priority(OptionPriority::High)
    }

    pub fn identifiers(&self) -> &[OptionIdentifier] {
        &self.identifiers
    }

    pub fn has_identifier(&self, identifier: &OptionIdentifier) -> bool {
        self.identifiers.contains(identifier)
    }

    pub fn argument(&self) -> Option<&OptionArgumentDefinition> {
        self.argument.as_ref().map(|it| &it.definition)
    }

    pub fn is_argument_defined(&self) -> bool {
        self.argument.is_some()
    }

    pub fn is_argument_required(&self) -> bool {
        self.argument.as_ref().map_or(false, |it| it.required)
    }

    pub fn priority(&self) -> OptionPriority {
        self.priority
    }

    pub fn is_high_priority(&self) -> bool {
        self.priority == OptionPriority::High
    }
}

impl PartialEq for OptionDefinition {
    fn eq(&self, other: &OptionDefinition) -> bool {
        ptr::eq(self, other)
    }
}

impl Eq for OptionDefinition {}

/// `-S, --style=<style>`, `--color[=<when>]`, `-o<file>`
impl fmt::Display for OptionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, identifier) in self.identifiers.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{identifier}")?;
        }
        if let Some(spec) = &self.argument {
            let attach = if self.identifiers.last().map_or(false, |it| it.is_long()) { "=" } else { "" };
            if spec.required {
                write!(f, "{attach}{}", spec.definition)?;
            } else {
                write!(f, "[{attach}{}]", spec.definition)?;
            }
        }
        Ok(())
    }
}
