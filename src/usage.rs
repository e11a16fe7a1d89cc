use std::{fmt, sync::Arc};

use crate::{DefinitionError, OperandDefinition, OptionDefinition, OptionIdentifier, Result, StringType};

/// Everything a program (or one of its sub-commands) accepts.
#[derive(Debug, PartialEq, Eq)]
pub enum Usage {
    Regular(RegularUsage),
    Commands(CommandsUsage),
}

impl Usage {
    /// Options accepted at this level: the options of a regular usage, the
    /// pre-command options of a commands usage.
    pub fn options(&self) -> &[Arc<OptionDefinition>] {
        match self {
            Usage::Regular(it) => it.options(),
            Usage::Commands(it) => it.pre_command_options(),
        }
    }

    pub fn find_option(&self, identifier: &OptionIdentifier) -> Option<&Arc<OptionDefinition>> {
        find_option(self.options(), identifier)
    }

    pub fn as_regular(&self) -> Option<&RegularUsage> {
        match self {
            Usage::Regular(it) => Some(it),
            Usage::Commands(_) => None,
        }
    }

    pub fn as_commands(&self) -> Option<&CommandsUsage> {
        match self {
            Usage::Regular(_) => None,
            Usage::Commands(it) => Some(it),
        }
    }
}

impl From<RegularUsage> for Usage {
    fn from(usage: RegularUsage) -> Usage {
        Usage::Regular(usage)
    }
}

impl From<CommandsUsage> for Usage {
    fn from(usage: CommandsUsage) -> Usage {
        Usage::Commands(usage)
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Usage::Regular(it) => fmt::Display::fmt(it, f),
            Usage::Commands(it) => fmt::Display::fmt(it, f),
        }
    }
}

/// Options and operands, in declaration order.
#[derive(Debug, PartialEq, Eq)]
pub struct RegularUsage {
    options: Vec<Arc<OptionDefinition>>,
    operands: Vec<Arc<OperandDefinition>>,
}

impl RegularUsage {
    pub fn new(
        options: Vec<Arc<OptionDefinition>>,
        operands: Vec<Arc<OperandDefinition>>,
    ) -> Result<RegularUsage> {
        check_option_definitions(&options)?;
        Ok(RegularUsage { options, operands })
    }

    pub fn empty() -> RegularUsage {
        RegularUsage { options: Vec::new(), operands: Vec::new() }
    }

    pub fn options(&self) -> &[Arc<OptionDefinition>] {
        &self.options
    }

    pub fn operands(&self) -> &[Arc<OperandDefinition>] {
        &self.operands
    }

    pub fn find_option(&self, identifier: &OptionIdentifier) -> Option<&Arc<OptionDefinition>> {
        find_option(&self.options, identifier)
    }
}

/// `[-h, --help] [-R, --replace] <playlist_file>`
impl fmt::Display for RegularUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = Separator::default();
        for option in &self.options {
            sep.write(f)?;
            write!(f, "[{option}]")?;
        }
        for operand in &self.operands {
            sep.write(f)?;
            write!(f, "{operand}")?;
        }
        Ok(())
    }
}

/// Options accepted before the command name, and one usage per command.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandsUsage {
    pre_command_options: Vec<Arc<OptionDefinition>>,
    commands: Vec<(String, Usage)>,
    command_operand: Arc<OperandDefinition>,
}

impl CommandsUsage {
    pub fn new<I, N, U>(pre_command_options: Vec<Arc<OptionDefinition>>, commands: I) -> Result<CommandsUsage>
    where
        I: IntoIterator<Item = (N, U)>,
        N: Into<String>,
        U: Into<Usage>,
    {
        check_option_definitions(&pre_command_options)?;

        let mut res: Vec<(String, Usage)> = Vec::new();
        for (name, usage) in commands {
            let name = name.into();
            if name.is_empty() {
                return Err(DefinitionError::EmptyCommandName);
            }
            if res.iter().any(|(it, _)| *it == name) {
                return Err(DefinitionError::DuplicateCommandName(name));
            }
            res.push((name, usage.into()));
        }
        if res.is_empty() {
            return Err(DefinitionError::NoCommands);
        }

        let command_operand = Arc::new(OperandDefinition::new("command", StringType::REJECT_EMPTY)?);
        Ok(CommandsUsage { pre_command_options, commands: res, command_operand })
    }

    pub fn pre_command_options(&self) -> &[Arc<OptionDefinition>] {
        &self.pre_command_options
    }

    pub fn commands(&self) -> impl Iterator<Item = (&str, &Usage)> + '_ {
        self.commands.iter().map(|(name, usage)| (name.as_str(), usage))
    }

    pub fn command(&self, name: &str) -> Option<&Usage> {
        self.commands.iter().find(|(it, _)| it == name).map(|(_, usage)| usage)
    }

    pub fn find_option(&self, identifier: &OptionIdentifier) -> Option<&Arc<OptionDefinition>> {
        find_option(&self.pre_command_options, identifier)
    }

    /// The `<command>` slot, reported when no command is given.
    pub fn command_operand(&self) -> &Arc<OperandDefinition> {
        &self.command_operand
    }
}

/// `[-h, --help] (download … | sort …)`
impl fmt::Display for CommandsUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = Separator::default();
        for option in &self.pre_command_options {
            sep.write(f)?;
            write!(f, "[{option}]")?;
        }
        sep.write(f)?;

        let parens = self.commands.len() > 1;
        if parens {
            f.write_str("(")?;
        }
        for (i, (name, usage)) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            f.write_str(name)?;
            let usage = usage.to_string();
            if !usage.is_empty() {
                write!(f, " {usage}")?;
            }
        }
        if parens {
            f.write_str(")")?;
        }
        Ok(())
    }
}

#[derive(Default)]
struct Separator {
    started: bool,
}

impl Separator {
    fn write(&mut self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.started {
            f.write_str(" ")?;
        }
        self.started = true;
        Ok(())
    }
}

fn find_option<'a>(
    options: &'a [Arc<OptionDefinition>],
    identifier: &OptionIdentifier,
) -> Option<&'a Arc<OptionDefinition>> {
    options.iter().find(|it| it.has_identifier(identifier))
}

fn check_option_definitions(options: &[Arc<OptionDefinition>]) -> Result<()> {
    for (first, a) in options.iter().enumerate() {
        for (second, b) in options.iter().enumerate().skip(first + 1) {
            if let Some(identifier) = a.identifiers().iter().find(|it| b.has_identifier(it)) {
                return Err(DefinitionError::DuplicateOptionIdentifier {
                    identifier: identifier.clone(),
                    first,
                    second,
                });
            }
        }
    }
    Ok(())
}
