use std::process::ExitCode;

use boardseed::config::boards::BoardDefinitions;
use boardseed::config::options::Options;
use boardseed::db;
use boardseed::error::{DbResultExt, SeedError};
use boardseed::logging;
use boardseed::seed::infra::{self, InfraOutcome};

async fn run(opts: &Options) -> Result<InfraOutcome, SeedError> {
    let definitions = BoardDefinitions::load(opts.boards.as_deref())
        .map_err(|e| SeedError::Config(format!("{:#}", e)))?;

    let mut conn = db::open_db(&opts.database).await.db_err()?;
    let result = infra::populate_infra_board(&mut conn, &definitions.infrastructure).await;
    db::close_db(conn).await;
    result
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    logging::init();
    let opts = Options::parse(
        "populate-infra-board",
        "Populate the Infrastructure board and grant admin access to it",
        true,
    );

    match run(&opts).await {
        Ok(outcome) => {
            if let InfraOutcome::Populated(summary) = &outcome {
                for line in summary.status_lines() {
                    println!("{}", line);
                }
            }
            println!("{}", outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
