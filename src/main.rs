use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = routehook::cli::Cli::parse();
    if let Err(e) = routehook::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
