use crate::notify::AlertChannel;
use crate::opensea::{Collection, CollectionApi, OpenSeaError};
use crate::scan::{RankedMint, ENS_BASE_REGISTRAR};
use crate::storage::AnnouncedState;
use alloy::primitives::Address;
use log::{error, info};

/// Minimum mint count before a contract qualifies (strictly greater-than)
pub const MINT_THRESHOLD: usize = 100;

/// Decides whether a qualifying contract is worth announcing. ENS domain
/// mints are never called out; a collection with neither an external link
/// nor a Twitter handle carries too little metadata for a meaningful alert.
pub fn should_call_out(collection: &Collection, address: Address, count: usize) -> bool {
    if address == ENS_BASE_REGISTRAR {
        return false;
    }
    info!("Checking for callout {} (count {})", address, count);
    if collection.external_link.is_empty() && collection.collection.twitter_username.is_empty() {
        return false;
    }
    info!("Call out");
    true
}

/// Walks ranked mints, announces qualifying contracts, and records them
pub struct Announcer<M> {
    metadata: M,
    channels: Vec<Box<dyn AlertChannel>>,
}

impl<M: CollectionApi> Announcer<M> {
    pub fn new(metadata: M, channels: Vec<Box<dyn AlertChannel>>) -> Self {
        Self { metadata, channels }
    }

    /// Processes ranked entries in order, one at a time. Contracts at or
    /// under the threshold or already in `state` are skipped. A metadata
    /// fetch failure aborts the remaining candidates for this run; the
    /// caller persists `state` regardless. Channel failures are logged and
    /// never block recording the announcement.
    pub async fn process(
        &self,
        ranked: &[RankedMint],
        state: &mut AnnouncedState,
    ) -> Result<(), OpenSeaError> {
        for mint in ranked {
            if mint.count <= MINT_THRESHOLD {
                continue;
            }
            let address = mint.address.to_string();
            if state.contains(&address) {
                continue;
            }

            let collection = match self.metadata.asset_contract(&address).await {
                Ok(collection) => collection,
                Err(e) => {
                    error!("OpenSea API error on contract {}: {}", address, e);
                    return Err(e);
                }
            };

            if !should_call_out(&collection, mint.address, mint.count) {
                continue;
            }

            info!(
                "Sending alerts. Contract: {} Slug: {} Twitter: {}",
                address, collection.collection.slug, collection.collection.twitter_username
            );
            for channel in &self.channels {
                if let Err(e) = channel.send(&collection, mint.count).await {
                    error!("Failed to send {} alert for {}: {}", channel.name(), address, e);
                }
            }

            state.record(address);
        }
        Ok(())
    }
}
