//! A playlist tool front end: parses its command line and reports what it
//! would do.
//!
//! ```text
//! cargo run --example playlist -- sort --style=tab list.json
//! RUST_LOG=argspec=trace cargo run --example playlist -- -R download
//! ```
use std::{process, sync::Arc};

use argspec::{
    opt_ids, CommandsSuccess, CommandsUsage, Failure, FailureKind, OperandDefinition,
    OptionArgumentDefinition, OptionDefinition, RegularSuccess, RegularUsage, StringEnumType,
    StringType, Success, Usage,
};

const PROG: &str = "playlist";

struct Flags {
    help: Arc<OptionDefinition>,
    version: Arc<OptionDefinition>,
    replace: Arc<OptionDefinition>,
    style: Arc<OptionDefinition>,
}

fn usage() -> argspec::Result<(Usage, Flags)> {
    let help = Arc::new(OptionDefinition::flag(opt_ids!("-h, --help"))?.high_priority());
    let version = Arc::new(OptionDefinition::flag(opt_ids!("-V, --version"))?.high_priority());
    let replace = Arc::new(OptionDefinition::flag(opt_ids!("-R, --replace"))?);
    let style = Arc::new(OptionDefinition::with_argument(
        opt_ids!("-S, --style"),
        OptionArgumentDefinition::new("style", StringEnumType::new(["compact", "tab", "spaces:4"])?)?,
        true,
    )?);
    let playlist_file = || OperandDefinition::new("playlist_file", StringType::REJECT_EMPTY).map(Arc::new);

    let download = RegularUsage::new(vec![Arc::clone(&help), Arc::clone(&replace)], vec![playlist_file()?])?;
    let sort = RegularUsage::new(vec![Arc::clone(&help), Arc::clone(&style)], vec![playlist_file()?])?;
    let usage = CommandsUsage::new(
        vec![Arc::clone(&help), Arc::clone(&version)],
        [("download", download), ("sort", sort)],
    )?;

    Ok((usage.into(), Flags { help, version, replace, style }))
}

fn exit_code(failure: &Failure<'_>) -> i32 {
    match failure.kind() {
        FailureKind::MissingArguments => 3,
        FailureKind::ExcessiveArguments => 4,
        FailureKind::InvalidOption => 5,
        FailureKind::InvalidEnumValue => 6,
        FailureKind::UnknownCommand => 8,
        FailureKind::EmptyArgument => 9,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let (usage, flags) = match usage() {
        Ok(it) => it,
        Err(err) => {
            eprintln!("{PROG}: bad usage definition: {err}");
            process::exit(2)
        }
    };

    let success = match argspec::parse_env_args(&usage) {
        Ok(it) => it,
        Err(failure) => {
            eprintln!("{PROG}: {failure}");
            eprintln!("usage: {PROG} {usage}");
            process::exit(exit_code(&failure))
        }
    };

    if let Some(option) = success.high_priority_option() {
        if option.is(&flags.version) {
            println!("{PROG} {}", env!("CARGO_PKG_VERSION"));
        } else if option.is(&flags.help) {
            let mut prefix = PROG.to_string();
            for name in success.leaf().command_name_path() {
                prefix.push(' ');
                prefix.push_str(name);
            }
            match success.leaf() {
                Success::Regular(RegularSuccess::HighPriorityOption { source_usage, .. }) => {
                    println!("usage: {prefix} {source_usage}")
                }
                Success::Commands(CommandsSuccess::HighPriorityOption { source_usage, .. }) => {
                    println!("usage: {prefix} {source_usage}")
                }
                _ => println!("usage: {prefix} {usage}"),
            }
        }
        return;
    }

    let Success::Regular(command) = success.leaf() else { return };
    let file = command.operand("playlist_file").map(|it| it.value().as_str()).unwrap_or_default();
    match command.command_name_path().first().map(String::as_str) {
        Some("download") => {
            let replace = command.has_option(&flags.replace);
            println!("download {file} (replace: {replace})");
        }
        Some("sort") => {
            let style = command
                .options_of(&flags.style)
                .last()
                .and_then(|it| it.argument())
                .map_or("compact", |it| it.as_str());
            println!("sort {file} (style: {style})");
        }
        _ => {}
    }
}
