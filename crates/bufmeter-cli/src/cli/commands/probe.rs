//! `bufmeter probe <url>` – resolve a resource's total size.

use anyhow::{Context, Result};
use bufmeter_core::size::{HeadProbeResolver, SizeResolver};

pub async fn run_probe(url: &str) -> Result<()> {
    let resolver = HeadProbeResolver::default();
    let size = resolver
        .total_size(url.trim())
        .await
        .with_context(|| format!("probe {url}"))?;
    println!("{size}\t{url}");
    Ok(())
}
