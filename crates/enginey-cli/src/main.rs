//! Command-line front end for YScript project and scene files.
//!
//! Usage:
//!   ysc `<file>` [--tokens] [--ast] [--nodes] [--json] [--config] [--log `<filter>`]
//!
//! With no dump flag the file is only loaded and validated; the exit status
//! reports whether that succeeded.

mod json;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use enginey_project::{LoadOptions, LoggingConfig, Project, init_logging};
use enginey_yscript::{lex_file, print_program};

fn cli() -> Command {
    let flag = |name: &'static str, help: &'static str| {
        Arg::new(name).long(name).help(help).action(ArgAction::SetTrue)
    };
    Command::new("ysc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect and validate EngineY project (.yproj) and scene (.ysc) files")
        .arg_required_else_help(true)
        .arg(Arg::new("file").help("Path to the project or scene file").required(true).index(1))
        .arg(flag("tokens", "Print the token stream"))
        .arg(flag("ast", "Print the parsed syntax tree"))
        .arg(flag("nodes", "Print the built node forest"))
        .arg(flag("json", "Print the node forest and metadata as JSON"))
        .arg(flag("config", "Print the validated project configuration as JSON"))
        .arg(
            Arg::new("log")
                .long("log")
                .value_name("FILTER")
                .help("Log filter, e.g. 'debug' or 'enginey_yscript=trace' (default: RUST_LOG, then info)"),
        )
}

fn main() -> ExitCode {
    let matches = cli().get_matches();

    let logging = match matches.get_one::<String>("log") {
        Some(filter) => LoggingConfig::with_filter(filter.as_str()),
        None => LoggingConfig::default(),
    };
    init_logging(logging);

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let Some(file) = matches.get_one::<String>("file") else {
        anyhow::bail!("no input file");
    };
    let path = Path::new(file);

    if matches.get_flag("tokens") {
        let (_, tokens) = lex_file(path).with_context(|| format!("failed to lex {}", path.display()))?;
        for token in &tokens {
            println!("{token}");
        }
    }

    // Scene files carry nodes only.
    let is_scene = path.extension().is_some_and(|ext| ext == "ysc");
    let options = LoadOptions { skip_config: is_scene, ..Default::default() };
    let project = Project::load(path, options)?;

    if matches.get_flag("ast") {
        print!("{}", print_program(project.program()));
    }
    if matches.get_flag("nodes") {
        print!("{}", project.graph().dump());
    }
    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&json::graph(project.graph()))?);
    }
    if matches.get_flag("config") {
        match project.config() {
            Some(config) => println!("{}", serde_json::to_string_pretty(&json::config(config))?),
            None => log::warn!("{} is a scene file and has no project configuration", path.display()),
        }
    }

    log::info!("{} is valid", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let matches = cli()
            .try_get_matches_from(["ysc", "demo.yproj", "--nodes", "--log", "debug"])
            .unwrap();
        assert_eq!(matches.get_one::<String>("file").map(String::as_str), Some("demo.yproj"));
        assert!(matches.get_flag("nodes"));
        assert!(!matches.get_flag("ast"));
        assert_eq!(matches.get_one::<String>("log").map(String::as_str), Some("debug"));
    }

    #[test]
    fn requires_a_file() {
        assert!(cli().try_get_matches_from(["ysc", "--ast"]).is_err());
    }

    #[test]
    fn run_reports_missing_file() {
        let matches = cli().try_get_matches_from(["ysc", "/no/such/file.yproj"]).unwrap();
        assert!(run(&matches).is_err());
    }
}
