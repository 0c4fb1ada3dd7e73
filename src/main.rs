//! deskpack - package a compiled desktop application and assemble its release.

use deskpack::cli;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    let exit_code = cli::run().await;
    process::exit(exit_code);
}
