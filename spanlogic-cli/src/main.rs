mod compose;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "spanlogic";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Databio")
        .about("Compose genomic feature sets by overlap and containment of anchor-adjusted spans.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Log more (repeat for trace output)"),
        )
        .subcommand(compose::cli::create_compose_cli())
}

fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(matches.get_count("verbose"));

    match matches.subcommand() {
        //
        // COMPOSE
        //
        Some((compose::cli::COMPOSE_CMD, matches)) => {
            compose::handlers::run_compose(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    fn test_parser_is_consistent() {
        build_parser().debug_assert();
    }

    #[rstest]
    #[case(&[], 0)]
    #[case(&["-v"], 1)]
    #[case(&["-vv"], 2)]
    #[case(&["-v", "--verbose", "-v"], 3)]
    fn test_verbosity_is_counted_after_subcommand(#[case] flags: &[&str], #[case] expected: u8) {
        let mut args = vec![
            consts::BIN_NAME,
            compose::cli::COMPOSE_CMD,
            "-a",
            "a.tsv",
            "-b",
            "b.tsv",
            "-l",
            "locations.tsv",
            "--operation",
            "overlap",
        ];
        args.extend_from_slice(flags);
        let matches = build_parser().try_get_matches_from(args).unwrap();
        assert_eq!(matches.get_count("verbose"), expected);
    }
}
