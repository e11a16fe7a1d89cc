//! Declarative command line usages and a parser for POSIX/GNU style
//! arguments.
//!
//! A program describes what it accepts once, as a [`Usage`] tree, and hands
//! the raw arguments to [`parse_args`]. The result is either a typed
//! [`Success`] or a [`Failure`] that says exactly what was wrong with the
//! command line. Parse failures are values, never panics; mistakes in the
//! usage itself are reported as [`DefinitionError`] while it is being built.
//!
//! ```
//! use std::sync::Arc;
//!
//! use argspec::{
//!     opt_ids, OperandDefinition, OptionArgumentDefinition, OptionDefinition, RegularUsage,
//!     StringEnumType, StringType, Usage,
//! };
//!
//! # fn main() -> argspec::Result<()> {
//! let help = Arc::new(OptionDefinition::flag(opt_ids!("-h, --help"))?.high_priority());
//! let style = Arc::new(OptionDefinition::with_argument(
//!     opt_ids!("-S, --style"),
//!     OptionArgumentDefinition::new("style", StringEnumType::new(["compact", "tab"])?)?,
//!     true,
//! )?);
//! let file = Arc::new(OperandDefinition::new("file", StringType::REJECT_EMPTY)?);
//! let usage = Usage::from(RegularUsage::new(vec![help, style.clone()], vec![file])?);
//!
//! let success = argspec::parse_args(&usage, ["--style=tab", "playlist.json"]).unwrap();
//! let argspec::Success::Regular(success) = success else { unreachable!() };
//! assert_eq!(success.option(&style).and_then(|it| it.argument()).map(|it| it.as_str()), Some("tab"));
//! assert_eq!(success.operand("file").map(|it| it.to_string()), Some("playlist.json".to_string()));
//!
//! let failure = argspec::parse_args(&usage, ["--style=tabs", "playlist.json"]).unwrap_err();
//! assert_eq!(
//!     failure.to_string(),
//!     r#"--style: invalid argument "tabs", expected one of "compact", "tab""#,
//! );
//! # Ok(())
//! # }
//! ```

extern crate self as argspec;

mod data;
mod definition;
mod error;
mod identifier;
mod parse;
mod result;
mod usage;

/// Private impl details for macros.
#[doc(hidden)]
pub mod rt;

pub use argspec_macros::{opt_id, opt_ids};

pub use crate::{
    data::{DataError, DataType, DataValue, StringEnumType, StringType},
    definition::{OperandDefinition, OptionArgumentDefinition, OptionDefinition, OptionPriority},
    error::{DefinitionError, NameKind},
    identifier::{OptionIdentifier, OptionStyle},
    parse::{parse_args, parse_args_with, parse_env_args, ParseOptions},
    result::{
        ArgumentSlot, CommandInvocation, CommandsSuccess, Failure, FailureContext, FailureKind,
        MissingArguments, OperandInstance, OptionInstance, ParseResult, RegularSuccess, Success,
        UsedOption,
    },
    usage::{CommandsUsage, RegularUsage, Usage},
};

pub type Result<T, E = DefinitionError> = std::result::Result<T, E>;
