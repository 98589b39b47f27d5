/*
 * Responsibility
 * - tokio runtime entrypoint
 * - delegate to app::run() (no logic here)
 */
use anyhow::Result;

use coffeeshop_api::app;

#[tokio::main]
async fn main() -> Result<()> {
    app::run().await
}
