pub mod transfers;

pub use transfers::{
    dedup_by_tx, filter_mints, rank_by_mint_count, RankedMint, TransferLog, BLOCK_WINDOW,
    ENS_BASE_REGISTRAR, ENS_REGISTRAR, OPENSEA_EXCHANGE, TRANSFER_EVENT_TOPIC,
};

use crate::providers::LogSource;
use eyre::Result;
use log::info;

/// Scan the most recent block window and rank contracts by mint count.
/// Header or log-query failures are fatal for the run.
pub async fn scan_recent_blocks<S: LogSource>(source: &S) -> Result<Vec<RankedMint>> {
    let to_block = source.latest_block_number().await?;
    let from_block = to_block.saturating_sub(BLOCK_WINDOW);
    info!("Start block: {}   End block: {}", from_block, to_block);

    info!("Querying...");
    let logs = source.transfer_logs(from_block, to_block).await?;
    info!("Log entries to process: {}", logs.len());

    let unique = dedup_by_tx(logs);
    info!("Unique transactions to process: {}", unique.len());

    let mints = filter_mints(unique);
    Ok(rank_by_mint_count(&mints))
}
