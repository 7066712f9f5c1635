use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{arg, command, value_parser, ArgMatches, Command};

use responsive_patch::{logging, patch_directory, Config, PatchError, Symbols};

fn cli() -> Command {
    command!()
        .arg(
            arg!(--root <DIR> "Project root that contains the HTML directory")
                .value_parser(value_parser!(PathBuf))
                .required(false)
                .default_value("."),
        )
        .arg(
            arg!(-c --config <FILE> "Read settings from this file instead of <root>/responsive-patch.toml")
                .value_parser(value_parser!(PathBuf))
                .required(false),
        )
}

fn main() {
    logging::init();

    if let Err(err) = run(cli().get_matches()) {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run(matches: ArgMatches) -> Result<()> {
    let root = matches
        .get_one::<PathBuf>("root")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));
    let config = Config::load(
        &root,
        matches.get_one::<PathBuf>("config").map(PathBuf::as_path),
    )?;
    let symbols = Symbols::detect();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{} Responsive CSS patch", symbols.banner)?;
    writeln!(out, "======================")?;

    match patch_directory(&root, &config, symbols, &mut out) {
        Ok(report) => {
            write!(out, "{}", report.render(symbols))?;
            Ok(())
        }
        // Nothing was touched; report and leave without a failure status.
        Err(e @ PatchError::MissingInputDir(_)) => {
            writeln!(out, "{} Error: {}", symbols.error, e)?;
            Ok(())
        }
        Err(e) => Err(anyhow::Error::new(e).context("patch run aborted")),
    }
}
