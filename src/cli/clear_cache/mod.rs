//! Clear-cache command - deletes entries from the configured vector store

use clap::Args;
use tracing::info;

use crate::domain::Mode;
use crate::infrastructure::cache_store::create_cache_store;

#[derive(Args, Debug)]
pub struct ClearCacheArgs {
    /// Only delete entries of this mode (analyze or rewrite)
    #[arg(long)]
    pub mode: Option<Mode>,
}

pub async fn run(args: ClearCacheArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let store = create_cache_store(&config.vector_store).await?;

    let before = store.count(args.mode).await?;
    let deleted = store.clear(args.mode).await?;

    let scope = args.mode.map(|m| m.as_str()).unwrap_or("all modes");
    info!(deleted, before, "Cleared cache entries for {}", scope);
    println!("Deleted {} of {} entries ({})", deleted, before, scope);

    Ok(())
}
