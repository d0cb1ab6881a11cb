// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

const DEFAULT_DB_PATH: &str = "/var/lib/gemlock/gemlock.db";

fn db_path_arg() -> Arg {
    Arg::new("db_path")
        .short('d')
        .long("db-path")
        .value_name("PATH")
        .default_value(DEFAULT_DB_PATH)
        .help("Database path")
}

fn build_cli() -> Command {
    Command::new("gemlock")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Gemlock Contributors")
        .about("Generate a lockdown list of installed gems")
        .subcommand_required(false)
        .subcommand(
            Command::new("init")
                .about("Initialize the specification database")
                .arg(db_path_arg()),
        )
        .subcommand(
            Command::new("import")
                .about("Register installed specifications from a JSON file")
                .arg(Arg::new("file").required(true).help("JSON specification list"))
                .arg(db_path_arg()),
        )
        .subcommand(
            Command::new("lock")
                .about("Generate a lockdown list pinning every dependency of the given gems")
                .arg(
                    Arg::new("gems")
                        .required(true)
                        .num_args(1..)
                        .value_name("GEM_NAME-VERSION")
                        .help("Root gems as NAME-VERSION"),
                )
                .arg(
                    Arg::new("strict")
                        .short('s')
                        .long("strict")
                        .action(ArgAction::SetTrue)
                        .help("Fail if unable to satisfy a dependency"),
                )
                .arg(
                    Arg::new("no_strict")
                        .long("no-strict")
                        .action(ArgAction::SetTrue)
                        .help("Record unsatisfied dependencies as comments (default)"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Write the lockfile here instead of stdout"),
                )
                .arg(db_path_arg()),
        )
        .subcommand(
            Command::new("query")
                .about("List installed specifications")
                .arg(Arg::new("pattern").help("Name pattern (optional)"))
                .arg(db_path_arg()),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "elvish", "fish", "powershell", "zsh"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("Failed to create man directory");

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer).expect("Failed to render man page");

    let man_path = man_dir.join("gemlock.1");
    fs::write(&man_path, buffer).expect("Failed to write man page");
}
