use std::sync::Arc;

use argspec::{
    opt_ids, OperandDefinition, OptionArgumentDefinition, OptionDefinition, RegularUsage,
    StringEnumType, StringType, Usage,
};

pub struct Smoke {
    pub usage: Usage,
    pub help: Arc<OptionDefinition>,
    pub all: Arc<OptionDefinition>,
    pub style: Arc<OptionDefinition>,
}

/// `[-h, --help] [-V, --version] [-a, --all] [-b] [-S, --style=<style>]
/// [-o, --output=<file>] [-c, --color[=<when>]]` followed by one operand per
/// name in `operands`.
pub fn usage(operands: &[&str]) -> Smoke {
    let help = Arc::new(OptionDefinition::flag(opt_ids!("-h, --help")).unwrap().high_priority());
    let version = Arc::new(OptionDefinition::flag(opt_ids!("-V, --version")).unwrap().high_priority());
    let all = Arc::new(OptionDefinition::flag(opt_ids!("-a, --all")).unwrap());
    let b = Arc::new(OptionDefinition::flag(opt_ids!("-b")).unwrap());
    let style = Arc::new(
        OptionDefinition::with_argument(
            opt_ids!("-S, --style"),
            OptionArgumentDefinition::new("style", StringEnumType::new(["compact", "tab", "spaces:4"]).unwrap())
                .unwrap(),
            true,
        )
        .unwrap(),
    );
    let output = Arc::new(
        OptionDefinition::with_argument(
            opt_ids!("-o, --output"),
            OptionArgumentDefinition::new("file", StringType::REJECT_EMPTY).unwrap(),
            true,
        )
        .unwrap(),
    );
    let color = Arc::new(
        OptionDefinition::with_argument(
            opt_ids!("-c, --color"),
            OptionArgumentDefinition::new("when", StringEnumType::new(["always", "never", "auto"]).unwrap())
                .unwrap(),
            false,
        )
        .unwrap(),
    );

    let operands = operands
        .iter()
        .map(|name| Arc::new(OperandDefinition::new(*name, StringType::REJECT_EMPTY).unwrap()))
        .collect();

    let usage = RegularUsage::new(
        vec![Arc::clone(&help), version, Arc::clone(&all), b, Arc::clone(&style), output, color],
        operands,
    )
    .unwrap();

    Smoke { usage: usage.into(), help, all, style }
}
