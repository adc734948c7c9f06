//! ctsentry - near-real-time phishing-candidate surveillance over the
//! public Certificate Transparency firehose.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    ctsentry_cli::run().await
}
