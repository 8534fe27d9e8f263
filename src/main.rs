// modrelay - chat with a model through a banned-word filter

use modrelay::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("{e:?}");
        std::process::exit(1);
    }
}
