pub mod announce;
pub mod config;
pub mod notify;
pub mod opensea;
pub mod providers;
pub mod scan;
pub mod storage;

pub use announce::{should_call_out, Announcer, MINT_THRESHOLD};
pub use config::{Config, ConfigError, DiscordConfig, TwitterConfig};
pub use notify::{AlertChannel, DiscordNotifier, TwitterNotifier, ALERT_WINDOW_MINUTES};
pub use opensea::{Collection, CollectionApi, CollectionDetails, OpenSeaClient, OpenSeaError};
pub use providers::{create_http_provider, LogSource, RpcLogSource};
pub use scan::{
    dedup_by_tx, filter_mints, rank_by_mint_count, scan_recent_blocks, RankedMint, TransferLog,
    BLOCK_WINDOW,
};
pub use storage::{
    load_state, save_state, AnnouncedState, BlobStore, FsBlobStore, RETENTION_CAP,
};
