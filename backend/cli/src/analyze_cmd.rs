//! `tagforge analyze <FILE>`: run the tagging pipeline on a local image.

use std::path::Path;

use anyhow::{bail, Context, Result};
use tagforge_config::TagForgeConfig;
use tagforge_core::ImageBlob;
use tagforge_understanding::{select_adapter, Analyzer};
use tracing::info;

use crate::mime::image_mime_type;

pub async fn run(config: &TagForgeConfig, file: &Path) -> Result<()> {
    let Some(mime_type) = image_mime_type(file) else {
        bail!("{} does not look like an image", file.display());
    };

    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    if bytes.len() > config.server.max_upload_bytes {
        bail!(
            "{} is {} bytes, over the {} byte limit",
            file.display(),
            bytes.len(),
            config.server.max_upload_bytes
        );
    }

    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let image = ImageBlob::new(bytes, mime_type, filename);

    let analyzer = Analyzer::new(select_adapter(&config.provider), config.provider.timeout());
    info!(provider = analyzer.provider_name(), size_bytes = image.len(), "Analyzing local image");

    let result = analyzer.analyze(&image, None).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
