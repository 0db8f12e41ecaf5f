//! `tagforge status`: query a running server's health endpoint.

use anyhow::Result;
use serde_json::Value;

pub async fn run(port: u16) -> Result<()> {
    let url = format!("http://localhost:{port}/api/health");
    let client = reqwest::Client::new();

    match client.get(&url).send().await {
        Ok(resp) => {
            let body: Value = resp.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Err(_) => {
            println!("TagForge is not running on port {port}");
        }
    }
    Ok(())
}
