use std::process::ExitCode;
use tracing::info;

fn main() -> ExitCode {
    // Initialize the logging system using tracing subscriber
    tracing_subscriber::fmt::init();

    info!("Starting singledb...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed to connect to database: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> singledb::Result<()> {
    let first = singledb::get_instance()?;
    let second = singledb::get_instance()?;

    println!("Connected to {} (session {})", first.dsn(), first.session_id());
    println!("Opened at {}", first.opened_at().to_rfc3339());
    println!(
        "Second call returned {} handle",
        if std::ptr::eq(first, second) { "the same" } else { "a different" }
    );
    println!("Connection attempts: {}", singledb::shared_holder().attempts());
    Ok(())
}
