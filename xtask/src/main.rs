
use std::{
    process,
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use argspec::{opt_ids, CommandsUsage, OptionDefinition, RegularUsage, Success, Usage};
use xshell::{cmd, Shell};

struct Flags {
    help: Arc<OptionDefinition>,
    no_publish: Arc<OptionDefinition>,
}

fn usage() -> argspec::Result<(Usage, Flags)> {
    let help = Arc::new(OptionDefinition::flag(opt_ids!("-h, --help"))?.high_priority());
    let no_publish = Arc::new(OptionDefinition::flag(opt_ids!("--no-publish"))?);
    let ci = RegularUsage::new(vec![Arc::clone(&help), Arc::clone(&no_publish)], vec![])?;
    let test = RegularUsage::new(vec![Arc::clone(&help)], vec![])?;
    let usage = CommandsUsage::new(vec![Arc::clone(&help)], [("ci", ci), ("test", test)])?;
    Ok((usage.into(), Flags { help, no_publish }))
}

fn main() -> xshell::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let (usage, flags) = match usage() {
        Ok(it) => it,
        Err(err) => {
            eprintln!("xtask: {err}");
            process::exit(2)
        }
    };
    let success = match argspec::parse_env_args(&usage) {
        Ok(it) => it,
        Err(failure) => {
            eprintln!("xtask: {failure}\nusage: xtask {usage}");
            process::exit(1)
        }
    };
    if success.high_priority_option().map_or(false, |it| it.is(&flags.help)) {
        println!("usage: xtask {usage}");
        return Ok(());
    }
    let Success::Regular(command) = success.leaf() else { return Ok(()) };

    let sh = Shell::new()?;
    match command.command_name_path().first().map(String::as_str) {
        Some("ci") => {
            cmd!(sh, "rustup toolchain install stable --no-self-update").run()?;
            let _e = sh.push_env("RUSTUP_TOOLCHAIN", "stable");
            cmd!(sh, "rustc --version").run()?;
            test(&sh)?;
            if !command.has_option(&flags.no_publish) {
                publish(&sh)?;
            }
        }
        Some("test") => test(&sh)?,
        _ => {}
    }
    Ok(())
}

fn test(sh: &Shell) -> xshell::Result<()> {
    {
        let _s = section("BUILD");
        cmd!(sh, "cargo test --workspace --no-run").run()?;
    }
    {
        let _s = section("TEST");
        cmd!(sh, "cargo test --workspace -- --nocapture").run()?;
    }
    Ok(())
}

fn publish(sh: &Shell) -> xshell::Result<()> {
    let _s = section("PUBLISH");

    let pkgid = cmd!(sh, "cargo pkgid -p argspec").read()?;
    let Some((_, version)) = pkgid.rsplit_once('#') else {
        tracing::warn!(%pkgid, "unexpected package id, not publishing");
        return Ok(());
    };
    let tag = format!("v{version}");

    let current_branch = cmd!(sh, "git branch --show-current").read()?;
    let tag_exists = cmd!(sh, "git tag --list").read()?.split_ascii_whitespace().any(|it| it == tag);
    if current_branch != "master" || tag_exists {
        tracing::info!(%current_branch, tag_exists, "skipping publish");
        return Ok(());
    }

    cmd!(sh, "git tag {tag}").run()?;
    cmd!(sh, "cargo publish -p argspec-macros").run()?;
    for _ in 0..100 {
        thread::sleep(Duration::from_secs(3));
        let err_msg = cmd!(sh, "cargo install argspec-macros --version {version} --bin non-existing")
            .ignore_status()
            .read_stderr()?;
        if err_msg.contains("Installing") {
            break;
        }
        tracing::debug!("argspec-macros {version} is not on the index yet");
    }
    cmd!(sh, "cargo publish -p argspec").run()?;
    cmd!(sh, "git push --tags").run()?;
    Ok(())
}

fn section(name: &'static str) -> impl Drop {
    println!("::group::{name}");
    let start = Instant::now();
    defer(move || {
        let elapsed = start.elapsed();
        eprintln!("{name}: {elapsed:.2?}");
        println!("::endgroup::");
    })
}

fn defer<F: FnOnce()>(f: F) -> impl Drop {
    struct D<F: FnOnce()>(Option<F>);
    impl<F: FnOnce()> Drop for D<F> {
        fn drop(&mut self) {
            if let Some(f) = self.0.take() {
                f()
            }
        }
    }
    D(Some(f))
}
