// Command line options shared by the seeding binaries

use clap::{Arg, ArgMatches};

/// Well-known location of the dashboard database inside its container.
pub const DEFAULT_DB_PATH: &str = "/appdata/db.sqlite";

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub database: String,
    pub boards: Option<String>,
}

fn command(name: &'static str, about: &'static str, with_boards: bool) -> clap::Command {
    let mut cmd = clap::Command::new(name).about(about).arg(
        Arg::new("database")
            .short('d')
            .long("database")
            .value_name("DATABASE")
            .env("BOARDSEED_DB")
            .help("Path to the dashboard SQLite database")
            .default_value(DEFAULT_DB_PATH),
    );

    if with_boards {
        cmd = cmd.arg(
            Arg::new("boards")
                .short('b')
                .long("boards")
                .value_name("BOARDS")
                .env("BOARDSEED_BOARDS")
                .help("Path to a YAML file with board definitions (defaults to the built-in set)"),
        );
    }

    cmd
}

fn from_matches(matches: &ArgMatches, with_boards: bool) -> Options {
    let database = matches
        .get_one::<String>("database")
        .cloned()
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
    let boards = if with_boards {
        matches.get_one::<String>("boards").cloned()
    } else {
        None
    };

    Options { database, boards }
}

impl Options {
    /// Parse the process arguments; clap exits on `--help` or bad input.
    pub fn parse(name: &'static str, about: &'static str, with_boards: bool) -> Self {
        let matches = command(name, about, with_boards).get_matches();
        from_matches(&matches, with_boards)
    }

    pub fn try_parse_from<I, T>(
        name: &'static str,
        with_boards: bool,
        args: I,
    ) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = command(name, "", with_boards).try_get_matches_from(args)?;
        Ok(from_matches(&matches, with_boards))
    }
}
