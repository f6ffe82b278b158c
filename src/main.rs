use clap::Parser;

use getent_query::cli::{self, Cli};
use getent_query::ui::prelude::*;

fn main() {
    let cli = Cli::parse();

    match cli::run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            emit(Level::Error, "getent_query.error", &format!("Error: {e:#}"), None);
            std::process::exit(1);
        }
    }
}
