// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, create an API client and hand
//   both to the submission flow.
// - Returns `anyhow::Result` so any failure along the way terminates the
//   process with a non-zero status and the error chain printed.

use cbigr_cli::{api::ApiClient, cli};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    // Create API client configured by environment variable `CBIGR_API_URL`
    // or default to the CBIGR dev instance. See `api::ApiClient::from_env`.
    let api = ApiClient::from_env()?;

    cli::run(args, api)
}
