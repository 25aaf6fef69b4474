use std::process::ExitCode;

use clap::Parser;

use exam_practice::{
    config::Config,
    handlers::cli::{self, Cli},
};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli::run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{} ({})", err, err.error_code());
            eprintln!("error: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}
