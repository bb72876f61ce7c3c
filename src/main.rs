use clap::Parser;
use inline_colorization::*;

use mindbridge::cli::{self, Cli};

// -- Entrypoint

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    if let Err(e) = cli::run(args).await {
        eprintln!("{color_red}{style_bold}Error:{style_reset}{color_reset} {}", e);
        std::process::exit(e.exit_code());
    }
}
