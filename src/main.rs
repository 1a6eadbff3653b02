use ccks::{commands::Cli, libs::logging};
use dotenv::dotenv;

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    if let Err(e) = logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    Cli::menu()
}
