#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> std::process::ExitCode {
    itinerary_agent::cli::run().await
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    std::process::exit(1);
}
