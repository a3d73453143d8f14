use std::process::ExitCode;

use boardseed::config::options::Options;
use boardseed::db;
use boardseed::error::{DbResultExt, SeedError};
use boardseed::logging;
use boardseed::seed::api_key::{self, IssuedApiKey};

async fn run(opts: &Options) -> Result<IssuedApiKey, SeedError> {
    let mut conn = db::open_db(&opts.database).await.db_err()?;
    let result = api_key::issue_api_key(&mut conn).await;
    db::close_db(conn).await;
    result
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    logging::init();
    let opts = Options::parse(
        "create-api-key",
        "Issue an API key for the first dashboard user and print it once",
        false,
    );

    match run(&opts).await {
        Ok(key) => {
            // The only place the secret is ever shown
            println!("{}", key.token());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
