mod smoke;

use std::{fmt, sync::Arc};

use argspec::{
    opt_ids, ArgumentSlot, CommandsSuccess, CommandsUsage, Failure, FailureKind, MissingArguments,
    OperandDefinition, OptionArgumentDefinition, OptionDefinition, ParseOptions, ParseResult,
    RegularSuccess, RegularUsage, StringType, Success, Usage,
};
use assert_matches::assert_matches;
use expect_test::{expect, Expect};

fn check(usage: &Usage, args: &str, expect: Expect) {
    let args = args.split_ascii_whitespace().collect::<Vec<_>>();
    check_vec(usage, &args, expect)
}

fn check_vec(usage: &Usage, args: &[&str], expect: Expect) {
    let res = argspec::parse_args(usage, args.iter().copied());
    expect.assert_eq(&render(&res));
}

fn render(res: &ParseResult<'_>) -> String {
    match res {
        Ok(success) => render_success(success),
        Err(failure) => format!("err {:?}: {failure}", failure.kind()),
    }
}

fn render_success(success: &Success<'_>) -> String {
    let path = success.command_name_path().join(" ");
    match success {
        Success::Regular(RegularSuccess::Normal { options, operands, .. }) => {
            format!("ok [{path}] options=[{}] operands=[{}]", join(options), join(operands))
        }
        Success::Regular(RegularSuccess::HighPriorityOption { option, .. })
        | Success::Commands(CommandsSuccess::HighPriorityOption { option, .. }) => {
            format!("high [{path}] {option}")
        }
        Success::Commands(CommandsSuccess::Normal { pre_command_options, command, .. }) => format!(
            "ok [{path}] pre=[{}] {} -> {}",
            join(pre_command_options),
            command.name,
            render_success(&command.result)
        ),
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}

#[test]
fn empty() {
    let usage = Usage::from(RegularUsage::empty());
    check(&usage, "", expect!["ok [] options=[] operands=[]"]);
    check(&usage, "x", expect!["err ExcessiveArguments: too many arguments: 1"]);
}

#[test]
fn flags() {
    let smoke = smoke::usage(&[]);
    check(&smoke.usage, "-a -b", expect!["ok [] options=[-a -b] operands=[]"]);
    check(&smoke.usage, "--all -b --all", expect!["ok [] options=[--all -b --all] operands=[]"]);
    check(&smoke.usage, "--all=yes", expect!["err ExcessiveArguments: --all: too many arguments: 1"]);
}

#[test]
fn bundling() {
    let smoke = smoke::usage(&[]);
    check(&smoke.usage, "-ab", expect!["ok [] options=[-a -b] operands=[]"]);
    check(&smoke.usage, "-aStab", expect!["ok [] options=[-a -Stab] operands=[]"]);
    check(&smoke.usage, "-boa", expect!["ok [] options=[-b -oa] operands=[]"]);
    check(&smoke.usage, "-axb", expect!["err InvalidOption: -x: invalid option"]);

    let bundled = argspec::parse_args(&smoke.usage, ["-ab"]);
    let separate = argspec::parse_args(&smoke.usage, ["-a", "-b"]);
    assert_eq!(bundled, separate);
}

#[test]
fn required_argument() {
    let smoke = smoke::usage(&[]);
    check(&smoke.usage, "--style=tab", expect!["ok [] options=[--style=tab] operands=[]"]);
    check(&smoke.usage, "--style tab", expect!["ok [] options=[--style=tab] operands=[]"]);
    check(&smoke.usage, "-S tab", expect!["ok [] options=[-Stab] operands=[]"]);
    check(&smoke.usage, "-o -a", expect!["ok [] options=[-o-a] operands=[]"]);
    check(&smoke.usage, "--output", expect!["err MissingArguments: --output: missing argument <file>"]);
    check(&smoke.usage, "-a -o", expect!["err MissingArguments: -o: missing argument <file>"]);

    let attached = argspec::parse_args(&smoke.usage, ["--style=tab"]);
    let separate = argspec::parse_args(&smoke.usage, ["--style", "tab"]);
    assert_eq!(attached, separate);
}

#[test]
fn optional_argument() {
    let smoke = smoke::usage(&[]);
    check(&smoke.usage, "-c", expect!["ok [] options=[-c] operands=[]"]);
    check(&smoke.usage, "--color", expect!["ok [] options=[--color] operands=[]"]);
    check(&smoke.usage, "--color=never", expect!["ok [] options=[--color=never] operands=[]"]);
    check(&smoke.usage, "-cnever", expect!["ok [] options=[-cnever] operands=[]"]);
    check(&smoke.usage, "--color never", expect!["err ExcessiveArguments: too many arguments: 1"]);
}

#[test]
fn empty_arguments() {
    let smoke = smoke::usage(&["input"]);
    check_vec(&smoke.usage, &["--output=", "x"], expect!["err EmptyArgument: --output: argument must not be empty"]);
    check_vec(&smoke.usage, &["--style=", "x"], expect!["err EmptyArgument: --style: argument must not be empty"]);
    check_vec(&smoke.usage, &[""], expect!["err EmptyArgument: <input>: argument must not be empty"]);

    let res = argspec::parse_args(&smoke.usage, [""]);
    assert_matches!(
        res,
        Err(Failure::EmptyArgument { slot: ArgumentSlot::Operand { position: None, definition }, .. })
            if definition.name() == "input"
    );

    let smoke = smoke::usage(&["first", "second"]);
    let res = argspec::parse_args(&smoke.usage, ["a", ""]);
    assert_matches!(res, Err(Failure::EmptyArgument { slot: ArgumentSlot::Operand { position: Some(2), .. }, .. }));
}

#[test]
fn enum_values() {
    let smoke = smoke::usage(&[]);
    check(
        &smoke.usage,
        "--style=spaces:4",
        expect!["ok [] options=[--style=spaces:4] operands=[]"],
    );
    check(
        &smoke.usage,
        "--style=spaces:5",
        expect![[r#"err InvalidEnumValue: --style: invalid argument "spaces:5", expected one of "compact", "tab", "spaces:4""#]],
    );

    let res = argspec::parse_args(&smoke.usage, ["-S", "spaces:5"]);
    assert_matches!(res, Err(Failure::InvalidEnumValue { slot: ArgumentSlot::Option(used), enum_values, actual_value, .. }) => {
        assert!(Arc::ptr_eq(&used.definition, &smoke.style));
        assert_eq!(used.identifier.to_string(), "-S");
        assert_eq!(enum_values, ["compact", "tab", "spaces:4"]);
        assert_eq!(actual_value, "spaces:5");
    });

    let res = argspec::parse_args(&smoke.usage, ["--style", "compact"]).unwrap();
    let Success::Regular(success) = res else { panic!("expected a regular success") };
    let style = success.option(&smoke.style).and_then(|it| it.argument()).unwrap();
    assert_eq!(style.as_str(), "compact");
}

#[test]
fn end_of_options() {
    let smoke = smoke::usage(&["first", "second"]);
    check(&smoke.usage, "-- -a -b", expect!["ok [] options=[] operands=[-a -b]"]);
    check(&smoke.usage, "-a -- -b --", expect!["ok [] options=[-a] operands=[-b --]"]);
    check(&smoke.usage, "- -a x", expect!["ok [] options=[-a] operands=[- x]"]);
    check(&smoke.usage, "x --all y", expect!["ok [] options=[--all] operands=[x y]"]);
}

#[test]
fn without_option_processing() {
    let smoke = smoke::usage(&["first", "second"]);
    let res = argspec::parse_args_with(&smoke.usage, ["-a", "--all"], ParseOptions { process_options: false });
    expect!["ok [] options=[] operands=[-a --all]"].assert_eq(&render(&res));
}

#[test]
fn invalid_options() {
    let smoke = smoke::usage(&[]);
    check(&smoke.usage, "--bogus", expect!["err InvalidOption: --bogus: invalid option"]);
    check(&smoke.usage, "--bogus=1", expect!["err InvalidOption: --bogus: invalid option"]);
    check(&smoke.usage, "-y --zzz", expect!["err InvalidOption: -y: invalid option"]);
    check(&smoke.usage, "-ä", expect!["err InvalidOption: -ä: invalid option"]);
    // Reported before surplus operands and broken option arguments.
    check(&smoke.usage, "--style=nope extra --bogus", expect!["err InvalidOption: --bogus: invalid option"]);
}

#[test]
fn high_priority() {
    let smoke = smoke::usage(&["first", "second"]);
    check(&smoke.usage, "--help", expect!["high [] --help"]);
    check(&smoke.usage, "--bogus --help", expect!["high [] --help"]);
    check(&smoke.usage, "-h --output", expect!["high [] -h"]);
    check(&smoke.usage, "--style=nope -V a b c", expect!["high [] -V"]);
    check(&smoke.usage, "-V -h", expect!["high [] -V"]);
    check(&smoke.usage, "-xh", expect!["high [] -h"]);
    check(&smoke.usage, "-- --help", expect!["err MissingArguments: missing argument <second>"]);
    check(&smoke.usage, "--help=x a b", expect!["err ExcessiveArguments: --help: too many arguments: 1"]);

    let res = argspec::parse_args(&smoke.usage, ["-a", "--help"]).unwrap();
    assert!(res.high_priority_option().map_or(false, |it| it.is(&smoke.help)));
    let Success::Regular(success) = res else { panic!("expected a regular success") };
    assert!(!success.has_option(&smoke.all));
    assert_eq!(success.operands().len(), 0);
}

#[test]
fn operand_count() {
    let smoke = smoke::usage(&["first", "second"]);
    check(&smoke.usage, "a b", expect!["ok [] options=[] operands=[a b]"]);
    check(&smoke.usage, "", expect!["err MissingArguments: missing arguments <first> <second>"]);
    check(&smoke.usage, "a", expect!["err MissingArguments: missing argument <second>"]);
    check(&smoke.usage, "a b c d", expect!["err ExcessiveArguments: too many arguments: 2"]);

    let res = argspec::parse_args(&smoke.usage, Vec::<String>::new());
    assert_matches!(res, Err(Failure::MissingArguments { missing: MissingArguments::Operands(missing), .. }) => {
        let names = missing.iter().map(|it| it.name()).collect::<Vec<_>>();
        assert_eq!(names, ["first", "second"]);
    });

    // Operands are checked before options.
    let smoke = smoke::usage(&["input"]);
    check(&smoke.usage, "--output", expect!["err MissingArguments: missing argument <input>"]);
    check(&smoke.usage, "x --output", expect!["err MissingArguments: --output: missing argument <file>"]);
}

#[test]
fn lookups() {
    let smoke = smoke::usage(&["input"]);
    let res = argspec::parse_args(&smoke.usage, ["-a", "in.json", "--all", "--style", "tab"]).unwrap();
    let Success::Regular(success) = res.leaf() else { panic!("expected a regular success") };
    assert!(res.command_name_path().is_empty());
    assert_eq!(success.options_of(&smoke.all).count(), 2);
    assert_eq!(success.option(&smoke.all).map(|it| it.to_string()), Some("-a".to_string()));
    assert_eq!(success.operand("input").map(|it| it.value().as_str()), Some("in.json"));
    assert!(success.operand("output").is_none());
    assert!(std::ptr::eq(success.source_usage(), smoke.usage.as_regular().unwrap()));
}

#[test]
fn deterministic() {
    let smoke = smoke::usage(&["input"]);
    for args in [&["-a", "x"][..], &["--bogus", "-q"][..], &["--style=nope"][..], &["-h", "--"][..]] {
        let first = argspec::parse_args(&smoke.usage, args.iter().copied());
        let second = argspec::parse_args(&smoke.usage, args.iter().copied());
        assert_eq!(first, second);
    }
}

#[test]
fn commands() {
    let usage = playlist::usage();
    check(
        &usage,
        "sort --style=tab file.json",
        expect!["ok [] pre=[] sort -> ok [sort] options=[--style=tab] operands=[file.json]"],
    );
    check(
        &usage,
        "download -R list.json",
        expect!["ok [] pre=[] download -> ok [download] options=[-R] operands=[list.json]"],
    );
    check(&usage, "frobnicate", expect!["err UnknownCommand: frobnicate: unknown command"]);
    check(&usage, "", expect!["err MissingArguments: missing argument <command>"]);
    check_vec(&usage, &[""], expect!["err EmptyArgument: <command>: argument must not be empty"]);
    check(&usage, "--bogus sort x", expect!["err InvalidOption: --bogus: invalid option"]);
    check(&usage, "sort --bogus x", expect!["err InvalidOption: sort: --bogus: invalid option"]);
    check(&usage, "sort -V x", expect!["err InvalidOption: sort: -V: invalid option"]);
    check(&usage, "download", expect!["err MissingArguments: download: missing argument <playlist_file>"]);
    check(&usage, "download a b", expect!["err ExcessiveArguments: download: too many arguments: 1"]);
    check(
        &usage,
        "sort --style=spaces:5 x",
        expect![[r#"err InvalidEnumValue: sort: --style: invalid argument "spaces:5", expected one of "compact", "tab", "spaces:4""#]],
    );
    check(&usage, "-- sort --style", expect!["ok [] pre=[] sort -> ok [sort] options=[] operands=[--style]"]);

    let res = argspec::parse_args(&usage, ["sort", "--style=tab", "file.json"]).unwrap();
    assert_eq!(res.leaf().command_name_path(), ["sort"]);
    assert!(res.high_priority_option().is_none());

    let res = argspec::parse_args(&usage, ["sort", "x", "y"]).unwrap_err();
    assert_eq!(res.command_name_path(), ["sort"]);
    assert_eq!(res.kind(), FailureKind::ExcessiveArguments);
    assert!(std::ptr::eq(res.context().source_usage, usage.as_commands().unwrap().command("sort").unwrap()));
}

#[test]
fn commands_high_priority() {
    let usage = playlist::usage();
    check(&usage, "--version sort", expect!["high [] --version"]);
    check(&usage, "--version frobnicate", expect!["high [] --version"]);
    check(&usage, "-h", expect!["high [] -h"]);
    check(&usage, "download --help", expect!["ok [] pre=[] download -> high [download] --help"]);
    check(&usage, "sort --style=nope -h a b", expect!["ok [] pre=[] sort -> high [sort] -h"]);

    let res = argspec::parse_args(&usage, ["download", "--help"]).unwrap();
    assert_eq!(res.high_priority_option().map(|it| it.to_string()), Some("--help".to_string()));
    assert_eq!(res.leaf().command_name_path(), ["download"]);
}

#[test]
fn pre_command_failures() {
    let config = Arc::new(
        OptionDefinition::with_argument(
            opt_ids!("--config"),
            OptionArgumentDefinition::new("file", StringType::REJECT_EMPTY).unwrap(),
            true,
        )
        .unwrap(),
    );
    let help = Arc::new(OptionDefinition::flag(opt_ids!("-h, --help")).unwrap().high_priority());
    let run = RegularUsage::new(vec![help], vec![]).unwrap();
    let usage = Usage::from(CommandsUsage::new(vec![config], [("run", run)]).unwrap());

    check(&usage, "--config a.toml run", expect!["ok [] pre=[--config=a.toml] run -> ok [run] options=[] operands=[]"]);
    check(&usage, "--config run", expect!["err MissingArguments: missing argument <command>"]);
    check_vec(&usage, &["--config=", "run"], expect!["err EmptyArgument: --config: argument must not be empty"]);
    check_vec(&usage, &["--config=", "run", "--help"], expect!["ok [] pre=[] run -> high [run] --help"]);
    check_vec(&usage, &["--config=", "run", "extra"], expect!["err ExcessiveArguments: run: too many arguments: 1"]);
}

#[test]
fn nested_commands() {
    let name = Arc::new(OperandDefinition::new("name", StringType::REJECT_EMPTY).unwrap());
    let add = RegularUsage::new(vec![], vec![name]).unwrap();
    let remote = CommandsUsage::new(vec![], [("add", add), ("list", RegularUsage::empty())]).unwrap();
    let verbose = Arc::new(OptionDefinition::flag(opt_ids!("-v, --verbose")).unwrap());
    let usage = Usage::from(CommandsUsage::new(vec![verbose], [("remote", remote)]).unwrap());

    check(
        &usage,
        "-v remote add origin",
        expect!["ok [] pre=[-v] remote -> ok [remote] pre=[] add -> ok [remote add] options=[] operands=[origin]"],
    );
    check(&usage, "remote", expect!["err MissingArguments: remote: missing argument <command>"]);
    check(&usage, "remote add", expect!["err MissingArguments: remote: add: missing argument <name>"]);
    check(&usage, "remote -v list", expect!["err InvalidOption: remote: -v: invalid option"]);
    check(&usage, "remote fetch", expect!["err UnknownCommand: remote: fetch: unknown command"]);

    let res = argspec::parse_args(&usage, ["remote", "add", "origin"]).unwrap();
    assert_eq!(res.leaf().command_name_path(), ["remote", "add"]);
}

#[test]
fn synopsis() {
    let usage = playlist::usage();
    expect![[r#"[-h, --help] [-V, --version] (download [-h, --help] [-R, --replace] <playlist_file> | sort [-h, --help] [-S, --style=<style>] <playlist_file>)"#]]
        .assert_eq(&usage.to_string());
}
