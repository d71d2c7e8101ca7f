use alloy::primitives::{address, b256, Address, B256};
use std::collections::{HashMap, HashSet};

/// keccak256("Transfer(address,address,uint256)")
pub const TRANSFER_EVENT_TOPIC: B256 =
    b256!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef");

/// OpenSea exchange contract, excluded from mint counting
pub const OPENSEA_EXCHANGE: Address = address!("7Be8076f4EA4A4AD08075C2508e481d6C946D12b");
/// ENS registrar controller, excluded from mint counting
pub const ENS_REGISTRAR: Address = address!("283Af0B28c62C092C9727F1Ee09c02CA627EB7F5");
/// ENS base registrar, excluded from mint counting and from call-outs
pub const ENS_BASE_REGISTRAR: Address = address!("57f1887a8BF19b14fC0dF6Fd9B2acc9Af147eA85");

/// How many recent blocks each scan covers
pub const BLOCK_WINDOW: u64 = 50;

/// One Transfer event log pulled from the chain
#[derive(Debug, Clone)]
pub struct TransferLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub tx_hash: B256,
    pub block_number: u64,
}

/// A contract with its mint count for the scanned window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedMint {
    pub address: Address,
    pub count: usize,
}

/// Collapse logs sharing a transaction hash to one entry each, first occurrence wins
pub fn dedup_by_tx(logs: Vec<TransferLog>) -> Vec<TransferLog> {
    let mut seen = HashSet::new();
    logs.into_iter()
        .filter(|log| seen.insert(log.tx_hash))
        .collect()
}

fn is_excluded(address: Address) -> bool {
    address == OPENSEA_EXCHANGE || address == ENS_REGISTRAR || address == ENS_BASE_REGISTRAR
}

/// Retain only NFT-style mint transfers: Transfer topic, four indexed fields,
/// origin equal to the null address, contract not in the exclusion set.
/// Anything malformed is silently dropped.
pub fn filter_mints(logs: Vec<TransferLog>) -> Vec<TransferLog> {
    logs.into_iter()
        .filter(|log| {
            let Some(&topic0) = log.topics.first() else {
                return false;
            };
            if topic0 != TRANSFER_EVENT_TOPIC {
                return false;
            }
            if log.topics.len() < 4 {
                // ERC-20 transfers carry three topics, skip
                return false;
            }
            if is_excluded(log.address) {
                return false;
            }
            Address::from_word(log.topics[1]) == Address::ZERO
        })
        .collect()
}

/// Count mints per contract and rank most-minted first.
/// Equal counts are ordered by ascending address so runs are deterministic.
pub fn rank_by_mint_count(mints: &[TransferLog]) -> Vec<RankedMint> {
    let mut counts: HashMap<Address, usize> = HashMap::new();
    for mint in mints {
        *counts.entry(mint.address).or_insert(0) += 1;
    }

    let mut ranked: Vec<RankedMint> = counts
        .into_iter()
        .map(|(address, count)| RankedMint { address, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then(a.address.cmp(&b.address)));
    ranked
}
