use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use libraria::config::Config;
use libraria::services::report_service;
use libraria::storage::RecordStore;
use libraria::Library;

fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "libraria=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    tracing::info!(
        "Starting with data dir {:?} (profile '{}')",
        config.data_dir,
        config.profile
    );

    let library = Library::open(RecordStore::new(&config.data_dir));
    let summary = report_service::collection_summary(&library);

    println!("Library collection summary");
    println!("  Titles:           {}", summary.distinct_titles);
    println!("  Copies owned:     {}", summary.total_copies);
    println!("  Copies available: {}", summary.copies_available);
    println!("  Copies on loan:   {}", summary.copies_on_loan);
    println!(
        "  Loans:            {} total, {} active, {} returned",
        summary.total_loans, summary.active_loans, summary.returned_loans
    );
    println!("  Patrons:          {}", summary.total_patrons);
    for (category, count) in &summary.patrons_by_category {
        if *count > 0 {
            println!("    {}: {}", category, count);
        }
    }
}
