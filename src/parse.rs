use std::sync::Arc;

use tracing::{debug, trace};

use crate::{
    result::{ArgumentSlot, CommandInvocation, FailureContext, MissingArguments, UsedOption},
    CommandsSuccess, CommandsUsage, DataError, DataType, DataValue, Failure, OperandInstance,
    OptionDefinition, OptionIdentifier, OptionInstance, ParseResult, RegularSuccess, RegularUsage,
    Success, Usage,
};

/// Knobs of a single parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// When `false`, every argument is an operand, as if the command line
    /// started with `--`.
    pub process_options: bool,
}

impl Default for ParseOptions {
    fn default() -> ParseOptions {
        ParseOptions { process_options: true }
    }
}

pub fn parse_args<'u, I>(usage: &'u Usage, args: I) -> ParseResult<'u>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    parse_args_with(usage, args, ParseOptions::default())
}

pub fn parse_args_with<'u, I>(usage: &'u Usage, args: I, options: ParseOptions) -> ParseResult<'u>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let args = args.into_iter().map(Into::into).collect::<Vec<String>>();
    parse_usage(Vec::new(), usage, &args, options.process_options)
}

/// Parses the arguments of the current process, without the program name.
///
/// Arguments that are not valid UTF-8 are converted lossily.
pub fn parse_env_args(usage: &Usage) -> ParseResult<'_> {
    let args = std::env::args_os().skip(1).map(|it| it.to_string_lossy().into_owned());
    parse_args(usage, args)
}

fn parse_usage<'u>(
    command_name_path: Vec<String>,
    usage: &'u Usage,
    args: &[String],
    processing_options: bool,
) -> ParseResult<'u> {
    let level = Level { command_name_path, usage };
    let res = match usage {
        Usage::Regular(regular) => parse_regular(level, regular, args, processing_options),
        Usage::Commands(commands) => parse_commands(level, commands, args, processing_options),
    };
    match &res {
        Ok(success) => debug!(path = ?success.command_name_path(), "parsed"),
        Err(failure) => debug!(path = ?failure.command_name_path(), kind = ?failure.kind(), "rejected"),
    }
    res
}

fn parse_regular<'u>(
    level: Level<'u>,
    usage: &'u RegularUsage,
    args: &[String],
    processing_options: bool,
) -> ParseResult<'u> {
    let mut scanner = Scanner::new(usage.options(), args, processing_options);
    let mut operand_values = Vec::new();
    while let Some(value) = scanner.next_operand() {
        operand_values.push(value);
    }
    let (invalid, outcomes) = level.resolve(scanner.specified);

    if let Some(option) = first_high_priority(&outcomes) {
        return Ok(Success::Regular(RegularSuccess::HighPriorityOption {
            command_name_path: level.command_name_path,
            source_usage: usage,
            option,
        }));
    }

    if let Some(identifier) = invalid.into_iter().next() {
        return Err(Failure::InvalidOption { context: level.context(), identifier });
    }

    let definitions = usage.operands();
    if operand_values.len() < definitions.len() {
        let missing = definitions[operand_values.len()..].to_vec();
        return Err(Failure::MissingArguments {
            context: level.context(),
            missing: MissingArguments::Operands(missing),
        });
    }
    if operand_values.len() > definitions.len() {
        return Err(Failure::ExcessiveArguments {
            context: level.context(),
            option: None,
            count: operand_values.len() - definitions.len(),
        });
    }

    let mut operands = Vec::with_capacity(definitions.len());
    for (i, (definition, value)) in definitions.iter().zip(operand_values).enumerate() {
        let position = if definitions.len() > 1 { Some(i + 1) } else { None };
        let slot = ArgumentSlot::Operand { definition: Arc::clone(definition), position };
        let value = level.check_data(definition.data_type(), value, slot)?;
        operands.push(OperandInstance::new(Arc::clone(definition), value));
    }

    let options = outcomes.into_iter().collect::<Result<Vec<_>, _>>()?;

    Ok(Success::Regular(RegularSuccess::Normal {
        command_name_path: level.command_name_path,
        source_usage: usage,
        options,
        operands,
    }))
}

fn parse_commands<'u>(
    level: Level<'u>,
    usage: &'u CommandsUsage,
    args: &[String],
    processing_options: bool,
) -> ParseResult<'u> {
    let mut scanner = Scanner::new(usage.pre_command_options(), args, processing_options);
    let command_name = scanner.next_operand();
    let rest = &args[scanner.idx..];
    let processing_options = scanner.processing_options;
    let (invalid, outcomes) = level.resolve(scanner.specified);

    if let Some(option) = first_high_priority(&outcomes) {
        return Ok(Success::Commands(CommandsSuccess::HighPriorityOption {
            command_name_path: level.command_name_path,
            source_usage: usage,
            option,
        }));
    }

    if let Some(identifier) = invalid.into_iter().next() {
        return Err(Failure::InvalidOption { context: level.context(), identifier });
    }

    let command_name = match command_name {
        Some(it) => it,
        None => {
            return Err(Failure::MissingArguments {
                context: level.context(),
                missing: MissingArguments::Operands(vec![Arc::clone(usage.command_operand())]),
            })
        }
    };
    if command_name.is_empty() {
        let slot = ArgumentSlot::Operand { definition: Arc::clone(usage.command_operand()), position: None };
        return Err(Failure::EmptyArgument { context: level.context(), slot });
    }
    let command_usage = match usage.command(command_name) {
        Some(it) => it,
        None => {
            return Err(Failure::UnknownCommand {
                context: level.context(),
                command_name: command_name.to_string(),
            })
        }
    };

    let mut command_name_path = level.command_name_path.clone();
    command_name_path.push(command_name.to_string());
    let result = parse_usage(command_name_path, command_usage, rest, processing_options)?;

    // A high priority option of the command wins over broken pre-command options.
    let pre_command_options = if result.high_priority_option().is_some() {
        outcomes.into_iter().filter_map(Result::ok).collect()
    } else {
        outcomes.into_iter().collect::<Result<Vec<_>, _>>()?
    };

    Ok(Success::Commands(CommandsSuccess::Normal {
        command_name_path: level.command_name_path,
        source_usage: usage,
        pre_command_options,
        command: CommandInvocation { name: command_name.to_string(), result: Box::new(result) },
    }))
}

fn first_high_priority(outcomes: &[Result<OptionInstance, Failure<'_>>]) -> Option<OptionInstance> {
    outcomes
        .iter()
        .filter_map(|it| it.as_ref().ok())
        .find(|it| it.definition().is_high_priority())
        .cloned()
}

fn is_option(arg: &str) -> bool {
    arg.len() >= 2 && arg.starts_with('-') && !arg.starts_with("--=")
}

/// An option as found on the command line, before its argument is checked.
struct SpecifiedOption<'a> {
    definition: Option<&'a Arc<OptionDefinition>>,
    used_identifier: OptionIdentifier,
    argument: Option<&'a str>,
}

/// Walks the arguments of one usage level, collecting options until the
/// next operand.
struct Scanner<'a> {
    definitions: &'a [Arc<OptionDefinition>],
    args: &'a [String],
    idx: usize,
    processing_options: bool,
    specified: Vec<SpecifiedOption<'a>>,
}

impl<'a> Scanner<'a> {
    fn new(definitions: &'a [Arc<OptionDefinition>], args: &'a [String], processing_options: bool) -> Self {
        Scanner { definitions, args, idx: 0, processing_options, specified: Vec::new() }
    }

    fn next_operand(&mut self) -> Option<&'a str> {
        while let Some(arg) = self.next_arg() {
            if !(self.processing_options && is_option(arg)) {
                trace!(arg, "operand");
                return Some(arg);
            }
            if arg == "--" {
                trace!("end of options");
                self.processing_options = false;
            } else if let Some(long) = arg.strip_prefix("--") {
                self.long_option(long);
            } else {
                self.short_options(&arg[1..]);
            }
        }
        None
    }

    fn next_arg(&mut self) -> Option<&'a str> {
        let arg = self.args.get(self.idx)?;
        self.idx += 1;
        Some(arg.as_str())
    }

    fn find(&self, identifier: &OptionIdentifier) -> Option<&'a Arc<OptionDefinition>> {
        let definitions = self.definitions;
        definitions.iter().find(|it| it.has_identifier(identifier))
    }

    /// `--word`, `--word=value`
    fn long_option(&mut self, long: &'a str) {
        let (word, mut argument) = match long.split_once('=') {
            Some((word, value)) => (word, Some(value)),
            None => (long, None),
        };
        let used_identifier = OptionIdentifier::long_unchecked(word);
        let definition = self.find(&used_identifier);

        if argument.is_none() && definition.map_or(false, |it| it.is_argument_required()) {
            argument = self.next_arg();
        }

        trace!(option = %used_identifier, defined = definition.is_some(), ?argument, "long option");
        self.specified.push(SpecifiedOption { definition, used_identifier, argument });
    }

    /// `-a`, `-abc`, `-Svalue`
    fn short_options(&mut self, chars: &'a str) {
        for (i, c) in chars.char_indices() {
            let used_identifier = OptionIdentifier::short(c);
            let definition = self.find(&used_identifier);

            let mut argument = None;
            let mut rest_consumed = false;
            if let Some(definition) = definition.filter(|it| it.is_argument_defined()) {
                let attached = &chars[i + c.len_utf8()..];
                if !attached.is_empty() {
                    argument = Some(attached);
                    rest_consumed = true;
                } else if definition.is_argument_required() {
                    argument = self.next_arg();
                }
            }

            trace!(option = %used_identifier, defined = definition.is_some(), ?argument, "short option");
            self.specified.push(SpecifiedOption { definition, used_identifier, argument });
            if rest_consumed {
                break;
            }
        }
    }
}

/// One usage level of the tree being parsed.
struct Level<'u> {
    command_name_path: Vec<String>,
    usage: &'u Usage,
}

impl<'u> Level<'u> {
    fn context(&self) -> FailureContext<'u> {
        FailureContext { command_name_path: self.command_name_path.clone(), source_usage: self.usage }
    }

    /// Splits the specified options into undefined identifiers and, for the
    /// defined ones, instances or failures, both in command line order.
    fn resolve(
        &self,
        specified: Vec<SpecifiedOption<'_>>,
    ) -> (Vec<OptionIdentifier>, Vec<Result<OptionInstance, Failure<'u>>>) {
        let mut invalid = Vec::new();
        let mut outcomes = Vec::new();
        for SpecifiedOption { definition, used_identifier, argument } in specified {
            match definition {
                Some(definition) => {
                    outcomes.push(self.option_instance(definition, used_identifier, argument))
                }
                None => invalid.push(used_identifier),
            }
        }
        (invalid, outcomes)
    }

    fn option_instance(
        &self,
        definition: &Arc<OptionDefinition>,
        used_identifier: OptionIdentifier,
        argument: Option<&str>,
    ) -> Result<OptionInstance, Failure<'u>> {
        let used = || UsedOption { definition: Arc::clone(definition), identifier: used_identifier.clone() };

        let argument_definition = match definition.argument() {
            Some(it) => it,
            None => {
                if argument.is_some() {
                    return Err(Failure::ExcessiveArguments {
                        context: self.context(),
                        option: Some(used()),
                        count: 1,
                    });
                }
                return Ok(OptionInstance::new(Arc::clone(definition), used_identifier, None));
            }
        };

        let argument = match argument {
            Some(it) => it,
            None => {
                if definition.is_argument_required() {
                    return Err(Failure::MissingArguments {
                        context: self.context(),
                        missing: MissingArguments::OptionArgument(used()),
                    });
                }
                return Ok(OptionInstance::new(Arc::clone(definition), used_identifier, None));
            }
        };

        let value = self.check_data(argument_definition.data_type(), argument, ArgumentSlot::Option(used()))?;
        Ok(OptionInstance::new(Arc::clone(definition), used_identifier, Some(value)))
    }

    fn check_data(
        &self,
        data_type: &Arc<dyn DataType>,
        raw: &str,
        slot: ArgumentSlot,
    ) -> Result<DataValue, Failure<'u>> {
        DataValue::parse_str(data_type, raw).map_err(|err| match err {
            DataError::Empty => Failure::EmptyArgument { context: self.context(), slot },
            DataError::InvalidEnumValue { enum_values } => Failure::InvalidEnumValue {
                context: self.context(),
                slot,
                enum_values,
                actual_value: raw.to_string(),
            },
        })
    }
}
