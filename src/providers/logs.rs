use crate::scan::{TransferLog, TRANSFER_EVENT_TOPIC};
use alloy::{providers::Provider, rpc::types::Filter};
use async_trait::async_trait;
use eyre::Result;

/// Source of Transfer event logs for a block range
#[async_trait]
pub trait LogSource: Send + Sync {
    async fn latest_block_number(&self) -> Result<u64>;
    async fn transfer_logs(&self, from_block: u64, to_block: u64) -> Result<Vec<TransferLog>>;
}

/// Log source backed by an Ethereum JSON-RPC provider
pub struct RpcLogSource<P> {
    provider: P,
}

impl<P: Provider> RpcLogSource<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: Provider> LogSource for RpcLogSource<P> {
    async fn latest_block_number(&self) -> Result<u64> {
        Ok(self.provider.get_block_number().await?)
    }

    async fn transfer_logs(&self, from_block: u64, to_block: u64) -> Result<Vec<TransferLog>> {
        let filter = Filter::new()
            .from_block(from_block)
            .to_block(to_block)
            .event_signature(TRANSFER_EVENT_TOPIC);

        let logs = self.provider.get_logs(&filter).await?;

        // Pending logs without a transaction hash or block number are unusable
        Ok(logs
            .into_iter()
            .filter_map(|log| {
                let tx_hash = log.transaction_hash?;
                let block_number = log.block_number?;
                Some(TransferLog {
                    address: log.inner.address,
                    topics: log.inner.data.topics().to_vec(),
                    tx_hash,
                    block_number,
                })
            })
            .collect())
    }
}
