//! Bakecost
//!
//! An MCP server for bakery recipe costing.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use bakecost::catalog::Session;
use bakecost::db::{migrations, Database, SnapshotCache};
use bakecost::mcp::BakecostService;
use bakecost::{build_info, config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("bakecost=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let cache_path = config::cache_path();
    eprintln!("Cache path: {}", cache_path.display());

    // Ensure data directory exists
    if let Some(parent) = cache_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    eprintln!("Opening cache...");
    let database = Database::new(&cache_path)?;
    let cache = SnapshotCache::open(database.clone())?;
    let version = database.with_conn(migrations::get_schema_version)?;
    eprintln!("Cache schema version: {}", version);

    let session = Session::open(cache)?;

    // Create the bakecost service
    let service = BakecostService::new(Some(cache_path), session);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
