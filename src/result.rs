use std::{fmt, slice, sync::Arc};

use thiserror::Error;

use crate::{
    data::DisplayEnumValues, CommandsUsage, DataValue, OperandDefinition, OptionDefinition,
    OptionIdentifier, RegularUsage, Usage,
};

/// The outcome of parsing a command line against a [`Usage`].
pub type ParseResult<'u> = Result<Success<'u>, Failure<'u>>;

/// One occurrence of an option on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionInstance {
    definition: Arc<OptionDefinition>,
    used_identifier: OptionIdentifier,
    argument: Option<DataValue>,
}

impl OptionInstance {
    pub(crate) fn new(
        definition: Arc<OptionDefinition>,
        used_identifier: OptionIdentifier,
        argument: Option<DataValue>,
    ) -> OptionInstance {
        OptionInstance { definition, used_identifier, argument }
    }

    pub fn definition(&self) -> &Arc<OptionDefinition> {
        &self.definition
    }

    pub fn used_identifier(&self) -> &OptionIdentifier {
        &self.used_identifier
    }

    pub fn argument(&self) -> Option<&DataValue> {
        self.argument.as_ref()
    }

    pub fn is(&self, definition: &OptionDefinition) -> bool {
        *self.definition == *definition
    }
}

/// `-R`, `-Stab`, `--style=tab`
impl fmt::Display for OptionInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.used_identifier)?;
        if let Some(argument) = &self.argument {
            if self.used_identifier.is_long() {
                f.write_str("=")?;
            }
            write!(f, "{argument}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperandInstance {
    definition: Arc<OperandDefinition>,
    value: DataValue,
}

impl OperandInstance {
    pub(crate) fn new(definition: Arc<OperandDefinition>, value: DataValue) -> OperandInstance {
        OperandInstance { definition, value }
    }

    pub fn definition(&self) -> &Arc<OperandDefinition> {
        &self.definition
    }

    pub fn value(&self) -> &DataValue {
        &self.value
    }
}

impl fmt::Display for OperandInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Success<'u> {
    Regular(RegularSuccess<'u>),
    Commands(CommandsSuccess<'u>),
}

impl<'u> Success<'u> {
    pub fn command_name_path(&self) -> &[String] {
        match self {
            Success::Regular(it) => it.command_name_path(),
            Success::Commands(it) => it.command_name_path(),
        }
    }

    /// The high priority option that ended parsing, at whatever command level
    /// it was found.
    pub fn high_priority_option(&self) -> Option<&OptionInstance> {
        match self {
            Success::Regular(RegularSuccess::HighPriorityOption { option, .. })
            | Success::Commands(CommandsSuccess::HighPriorityOption { option, .. }) => Some(option),
            Success::Regular(RegularSuccess::Normal { .. }) => None,
            Success::Commands(CommandsSuccess::Normal { command, .. }) => {
                command.result.high_priority_option()
            }
        }
    }

    /// The success of the innermost command.
    pub fn leaf(&self) -> &Success<'u> {
        match self {
            Success::Commands(CommandsSuccess::Normal { command, .. }) => command.result.leaf(),
            _ => self,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegularSuccess<'u> {
    Normal {
        command_name_path: Vec<String>,
        source_usage: &'u RegularUsage,
        options: Vec<OptionInstance>,
        operands: Vec<OperandInstance>,
    },
    HighPriorityOption {
        command_name_path: Vec<String>,
        source_usage: &'u RegularUsage,
        option: OptionInstance,
    },
}

impl<'u> RegularSuccess<'u> {
    pub fn command_name_path(&self) -> &[String] {
        match self {
            RegularSuccess::Normal { command_name_path, .. }
            | RegularSuccess::HighPriorityOption { command_name_path, .. } => command_name_path,
        }
    }

    pub fn source_usage(&self) -> &'u RegularUsage {
        match self {
            RegularSuccess::Normal { source_usage, .. }
            | RegularSuccess::HighPriorityOption { source_usage, .. } => *source_usage,
        }
    }

    /// Every option occurrence, in command line order.
    pub fn options(&self) -> &[OptionInstance] {
        match self {
            RegularSuccess::Normal { options, .. } => options,
            RegularSuccess::HighPriorityOption { option, .. } => slice::from_ref(option),
        }
    }

    pub fn operands(&self) -> &[OperandInstance] {
        match self {
            RegularSuccess::Normal { operands, .. } => operands,
            RegularSuccess::HighPriorityOption { .. } => &[],
        }
    }

    pub fn option(&self, definition: &OptionDefinition) -> Option<&OptionInstance> {
        self.options().iter().find(|it| it.is(definition))
    }

    pub fn options_of<'a>(
        &'a self,
        definition: &'a OptionDefinition,
    ) -> impl Iterator<Item = &'a OptionInstance> + 'a {
        self.options().iter().filter(move |it| it.is(definition))
    }

    pub fn has_option(&self, definition: &OptionDefinition) -> bool {
        self.option(definition).is_some()
    }

    pub fn operand(&self, name: &str) -> Option<&OperandInstance> {
        self.operands().iter().find(|it| it.definition().name() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandsSuccess<'u> {
    Normal {
        command_name_path: Vec<String>,
        source_usage: &'u CommandsUsage,
        pre_command_options: Vec<OptionInstance>,
        command: CommandInvocation<'u>,
    },
    HighPriorityOption {
        command_name_path: Vec<String>,
        source_usage: &'u CommandsUsage,
        option: OptionInstance,
    },
}

impl<'u> CommandsSuccess<'u> {
    pub fn command_name_path(&self) -> &[String] {
        match self {
            CommandsSuccess::Normal { command_name_path, .. }
            | CommandsSuccess::HighPriorityOption { command_name_path, .. } => command_name_path,
        }
    }

    pub fn source_usage(&self) -> &'u CommandsUsage {
        match self {
            CommandsSuccess::Normal { source_usage, .. }
            | CommandsSuccess::HighPriorityOption { source_usage, .. } => *source_usage,
        }
    }

    pub fn pre_command_options(&self) -> &[OptionInstance] {
        match self {
            CommandsSuccess::Normal { pre_command_options, .. } => pre_command_options,
            CommandsSuccess::HighPriorityOption { option, .. } => slice::from_ref(option),
        }
    }

    pub fn command(&self) -> Option<&CommandInvocation<'u>> {
        match self {
            CommandsSuccess::Normal { command, .. } => Some(command),
            CommandsSuccess::HighPriorityOption { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation<'u> {
    pub name: String,
    pub result: Box<Success<'u>>,
}

/// Where in the usage tree a failure happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureContext<'u> {
    pub command_name_path: Vec<String>,
    pub source_usage: &'u Usage,
}

/// `sort: ` for a failure inside the `sort` command.
impl fmt::Display for FailureContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in &self.command_name_path {
            write!(f, "{name}: ")?;
        }
        Ok(())
    }
}

/// An option as it was spelled on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsedOption {
    pub definition: Arc<OptionDefinition>,
    pub identifier: OptionIdentifier,
}

/// The option or operand whose argument was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentSlot {
    Option(UsedOption),
    /// `position` is 1-based and only present when the usage declares more
    /// than one operand.
    Operand { definition: Arc<OperandDefinition>, position: Option<usize> },
}

impl fmt::Display for ArgumentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentSlot::Option(option) => write!(f, "{}: ", option.identifier),
            ArgumentSlot::Operand { definition, .. } => write!(f, "{definition}: "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingArguments {
    OptionArgument(UsedOption),
    /// At least one, in declaration order.
    Operands(Vec<Arc<OperandDefinition>>),
}

impl fmt::Display for MissingArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingArguments::OptionArgument(option) => {
                write!(f, "{}: missing argument", option.identifier)?;
                if let Some(argument) = option.definition.argument() {
                    write!(f, " {argument}")?;
                }
                Ok(())
            }
            MissingArguments::Operands(operands) => {
                f.write_str("missing argument")?;
                if operands.len() > 1 {
                    f.write_str("s")?;
                }
                for operand in operands {
                    write!(f, " {operand}")?;
                }
                Ok(())
            }
        }
    }
}

struct OptionPrefix<'a>(&'a Option<UsedOption>);

impl fmt::Display for OptionPrefix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(option) => write!(f, "{}: ", option.identifier),
            None => Ok(()),
        }
    }
}

/// A command line that does not match the usage.
///
/// `Display` renders a one line diagnostic without the program name, e.g.
/// `sort: --style: missing argument <style>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure<'u> {
    #[error("{context}{missing}")]
    MissingArguments { context: FailureContext<'u>, missing: MissingArguments },

    /// Surplus operands, or an argument given to an option that takes none.
    #[error("{context}{}too many arguments: {count}", OptionPrefix(.option))]
    ExcessiveArguments { context: FailureContext<'u>, option: Option<UsedOption>, count: usize },

    #[error("{context}{identifier}: invalid option")]
    InvalidOption { context: FailureContext<'u>, identifier: OptionIdentifier },

    #[error(
        "{context}{slot}invalid argument {actual_value:?}, expected one of {}",
        DisplayEnumValues(.enum_values)
    )]
    InvalidEnumValue {
        context: FailureContext<'u>,
        slot: ArgumentSlot,
        enum_values: Vec<String>,
        actual_value: String,
    },

    #[error("{context}{command_name}: unknown command")]
    UnknownCommand { context: FailureContext<'u>, command_name: String },

    #[error("{context}{slot}argument must not be empty")]
    EmptyArgument { context: FailureContext<'u>, slot: ArgumentSlot },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    MissingArguments,
    ExcessiveArguments,
    InvalidOption,
    InvalidEnumValue,
    UnknownCommand,
    EmptyArgument,
}

impl<'u> Failure<'u> {
    pub fn kind(&self) -> FailureKind {
        match self {
            Failure::MissingArguments { .. } => FailureKind::MissingArguments,
            Failure::ExcessiveArguments { .. } => FailureKind::ExcessiveArguments,
            Failure::InvalidOption { .. } => FailureKind::InvalidOption,
            Failure::InvalidEnumValue { .. } => FailureKind::InvalidEnumValue,
            Failure::UnknownCommand { .. } => FailureKind::UnknownCommand,
            Failure::EmptyArgument { .. } => FailureKind::EmptyArgument,
        }
    }

    pub fn context(&self) -> &FailureContext<'u> {
        match self {
            Failure::MissingArguments { context, .. }
            | Failure::ExcessiveArguments { context, .. }
            | Failure::InvalidOption { context, .. }
            | Failure::InvalidEnumValue { context, .. }
            | Failure::UnknownCommand { context, .. }
            | Failure::EmptyArgument { context, .. } => context,
        }
    }

    pub fn command_name_path(&self) -> &[String] {
        &self.context().command_name_path
    }
}
