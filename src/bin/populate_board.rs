use std::process::ExitCode;

use boardseed::config::boards::BoardDefinitions;
use boardseed::config::options::Options;
use boardseed::db;
use boardseed::error::{DbResultExt, SeedError};
use boardseed::logging;
use boardseed::seed::board::{self, BoardSeedReport};

async fn run(opts: &Options) -> Result<BoardSeedReport, SeedError> {
    let definitions = BoardDefinitions::load(opts.boards.as_deref())
        .map_err(|e| SeedError::Config(format!("{:#}", e)))?;

    let mut conn = db::open_db(&opts.database).await.db_err()?;
    let result = board::populate_board(&mut conn, &definitions.homelab).await;
    db::close_db(conn).await;
    result
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    logging::init();
    let opts = Options::parse(
        "populate-board",
        "Populate the primary dashboard board and make it the default home board",
        true,
    );

    match run(&opts).await {
        Ok(report) => {
            if let Some(home) = &report.home_board {
                println!(
                    "Home board set to '{}' for {} users",
                    home.board.name, home.users_assigned
                );
            }
            println!("{}", report.outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
