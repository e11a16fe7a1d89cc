use std::fmt;

use thiserror::Error;

use crate::OptionIdentifier;

/// A declaration that violates one of the invariants of the definitions API.
///
/// These are programmer errors: they are reported when a definition or usage
/// is built, never while arguments are parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("long-style option identifier must not be empty")]
    EmptyLongIdentifier,
    #[error("long-style option identifier `{0}` must not contain an equals character ('=')")]
    EqualsInLongIdentifier(String),
    #[error("option identifier `{0}` must start with a dash character ('-')")]
    MissingDash(String),
    #[error("option identifier `{0}` preceded with just one dash must be exactly one character")]
    ShortIdentifierLength(String),

    #[error("at least one option identifier must be given")]
    NoIdentifiers,
    #[error("duplicate {}-style identifier `{identifier:#}` at index {first} and {second}", .identifier.style())]
    DuplicateIdentifier { identifier: OptionIdentifier, first: usize, second: usize },
    #[error(
        "duplicate {}-style identifier `{identifier:#}` of option definitions at index {first} and {second}",
        .identifier.style()
    )]
    DuplicateOptionIdentifier { identifier: OptionIdentifier, first: usize, second: usize },

    #[error("{kind} name must not be empty")]
    EmptyName { kind: NameKind },
    #[error("{kind} name `{name}` must not contain less-than or greater-than characters ('<', '>')")]
    AngleBracketInName { kind: NameKind, name: String },

    #[error("enum values must not be empty")]
    NoEnumValues,
    #[error("enum value at index {index} must not be empty")]
    EmptyEnumValue { index: usize },
    #[error("duplicate enum value {value:?} at index {first} and {second}")]
    DuplicateEnumValue { value: String, first: usize, second: usize },

    #[error("at least one command must be given")]
    NoCommands,
    #[error("command name must not be empty")]
    EmptyCommandName,
    #[error("duplicate command name `{0}`")]
    DuplicateCommandName(String),

    #[error("invalid value {value:?} for data type {data_type}")]
    InvalidValue { value: String, data_type: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Operand,
    OptionArgument,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NameKind::Operand => "operand",
            NameKind::OptionArgument => "option-argument",
        };
        f.write_str(s)
    }
}
