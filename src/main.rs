use eyre::Result;
use log::{error, info};
use mint_alert::{
    create_http_provider, load_state, save_state, scan_recent_blocks, AlertChannel, Announcer,
    Config, DiscordNotifier, FsBlobStore, OpenSeaClient, RpcLogSource, TwitterNotifier,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    // Fetch and rank first; header or log-query failures abort the run
    // before any state is touched.
    let provider = create_http_provider(&config.eth_network_url)?;
    let source = RpcLogSource::new(provider);
    let ranked = scan_recent_blocks(&source).await?;

    let store = FsBlobStore::new(&config.state_dir);
    let mut state = load_state(&store, &config.state_bucket, &config.state_key).await;

    let opensea = OpenSeaClient::new(config.opensea_api_key.clone());
    let channels: Vec<Box<dyn AlertChannel>> = vec![
        Box::new(TwitterNotifier::new(config.twitter.clone())),
        Box::new(DiscordNotifier::new(config.discord.clone())),
    ];
    let announcer = Announcer::new(opensea, channels);

    // A metadata failure aborts the remaining candidates but the state still
    // gets trimmed and persisted below.
    if let Err(e) = announcer.process(&ranked, &mut state).await {
        error!("Announcement loop aborted: {}", e);
    }

    state.trim();
    save_state(&store, &config.state_bucket, &config.state_key, &state).await?;
    info!("End");
    Ok(())
}
