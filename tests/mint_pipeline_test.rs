use alloy::primitives::{Address, B256};
use async_trait::async_trait;
use eyre::Result;
use mint_alert::scan::TRANSFER_EVENT_TOPIC;
use mint_alert::{
    load_state, save_state, scan_recent_blocks, AlertChannel, AnnouncedState, Announcer,
    BlobStore, Collection, CollectionApi, CollectionDetails, DiscordNotifier, LogSource,
    OpenSeaError, TransferLog, TwitterConfig, TwitterNotifier,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const BUCKET: &str = "alerts";
const KEY: &str = "status.json";

fn contract(n: u8) -> Address {
    Address::with_last_byte(n)
}

fn tx_hash(n: u64) -> B256 {
    let mut bytes = [0u8; 32];
    bytes[24..].copy_from_slice(&n.to_be_bytes());
    B256::from(bytes)
}

fn mint_log(address: Address, tx: u64) -> TransferLog {
    TransferLog {
        address,
        topics: vec![
            TRANSFER_EVENT_TOPIC,
            B256::ZERO,
            contract(99).into_word(),
            B256::with_last_byte(1),
        ],
        tx_hash: tx_hash(tx),
        block_number: 990,
    }
}

struct StubLogSource {
    logs: Vec<TransferLog>,
}

#[async_trait]
impl LogSource for StubLogSource {
    async fn latest_block_number(&self) -> Result<u64> {
        Ok(1000)
    }

    async fn transfer_logs(&self, _from_block: u64, _to_block: u64) -> Result<Vec<TransferLog>> {
        Ok(self.logs.clone())
    }
}

#[derive(Default)]
struct MemoryBlobStore {
    blobs: Mutex<HashMap<(String, String), Vec<u8>>>,
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self
            .blobs
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned())
    }

    async fn put(&self, bucket: &str, key: &str, data: Vec<u8>) -> Result<()> {
        self.blobs
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), data);
        Ok(())
    }
}

struct StubApi {
    collections: HashMap<String, Collection>,
    fail: bool,
}

#[async_trait]
impl CollectionApi for StubApi {
    async fn asset_contract(&self, address: &str) -> std::result::Result<Collection, OpenSeaError> {
        if self.fail {
            return Err(OpenSeaError::RateLimited);
        }
        self.collections
            .get(address)
            .cloned()
            .ok_or(OpenSeaError::NotFound)
    }
}

#[derive(Clone, Default)]
struct RecordingChannel {
    sent: Arc<Mutex<Vec<(String, usize)>>>,
}

#[async_trait]
impl AlertChannel for RecordingChannel {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, collection: &Collection, count: usize) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((collection.name.clone(), count));
        Ok(())
    }
}

fn rich_collection(name: &str, slug: &str) -> Collection {
    Collection {
        name: name.to_string(),
        external_link: "https://example.com".to_string(),
        image_url: "https://example.com/img.png".to_string(),
        collection: CollectionDetails {
            slug: slug.to_string(),
            external_url: "https://example.com".to_string(),
            twitter_username: slug.to_string(),
        },
    }
}

#[tokio::test]
async fn scan_announce_and_persist_end_to_end() {
    // 150 mints for A (plus duplicate log entries for already-seen
    // transactions), 50 mints for B
    let a = contract(1);
    let b = contract(2);
    let mut logs = Vec::new();
    for n in 0..150 {
        logs.push(mint_log(a, n));
    }
    for n in 0..10 {
        logs.push(mint_log(a, n));
    }
    for n in 1000..1050 {
        logs.push(mint_log(b, n));
    }
    let source = StubLogSource { logs };

    let ranked = scan_recent_blocks(&source).await.unwrap();
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].address, a);
    assert_eq!(ranked[0].count, 150);
    assert_eq!(ranked[1].count, 50);

    let api = StubApi {
        collections: HashMap::from([(a.to_string(), rich_collection("Alpha", "alpha"))]),
        fail: false,
    };
    let channel = RecordingChannel::default();
    let announcer = Announcer::new(api, vec![Box::new(channel.clone()) as Box<dyn AlertChannel>]);

    let store = MemoryBlobStore::default();
    let mut state = load_state(&store, BUCKET, KEY).await;
    assert!(state.recents.is_empty());

    announcer.process(&ranked, &mut state).await.unwrap();
    state.trim();
    save_state(&store, BUCKET, KEY, &state).await.unwrap();

    assert_eq!(
        channel.sent.lock().unwrap().clone(),
        vec![("Alpha".to_string(), 150)]
    );

    let raw = store.get(BUCKET, KEY).await.unwrap().unwrap();
    let persisted: AnnouncedState = serde_json::from_slice(&raw).unwrap();
    assert_eq!(persisted.recents, vec![a.to_string()]);
}

#[tokio::test]
async fn second_run_does_not_reannounce_persisted_contract() {
    let a = contract(1);
    let store = MemoryBlobStore::default();

    let mut first = AnnouncedState::new();
    first.record(a.to_string());
    save_state(&store, BUCKET, KEY, &first).await.unwrap();

    let source = StubLogSource {
        logs: (0..300).map(|n| mint_log(a, n)).collect(),
    };
    let ranked = scan_recent_blocks(&source).await.unwrap();
    assert_eq!(ranked[0].count, 300);

    let api = StubApi {
        collections: HashMap::from([(a.to_string(), rich_collection("Alpha", "alpha"))]),
        fail: false,
    };
    let channel = RecordingChannel::default();
    let announcer = Announcer::new(api, vec![Box::new(channel.clone()) as Box<dyn AlertChannel>]);

    let mut state = load_state(&store, BUCKET, KEY).await;
    announcer.process(&ranked, &mut state).await.unwrap();

    assert!(channel.sent.lock().unwrap().is_empty());
    assert_eq!(state.recents, vec![a.to_string()]);
}

#[tokio::test]
async fn twitter_only_credentials_still_record_the_contract() {
    let a = contract(1);
    let mut server = mockito::Server::new_async().await;
    let tweet_mock = server
        .mock("POST", "/2/tweets")
        .with_status(201)
        .with_body(r#"{"data": {"id": "42", "text": "..."}}"#)
        .create_async()
        .await;

    let twitter = TwitterNotifier::with_host(
        server.url(),
        Some(TwitterConfig {
            consumer_key: "ck".to_string(),
            consumer_secret: "cs".to_string(),
            access_token: "at".to_string(),
            access_token_secret: "as".to_string(),
        }),
    );
    let discord = DiscordNotifier::new(None);

    let api = StubApi {
        collections: HashMap::from([(a.to_string(), rich_collection("Alpha", "alpha"))]),
        fail: false,
    };
    let announcer = Announcer::new(
        api,
        vec![
            Box::new(twitter) as Box<dyn AlertChannel>,
            Box::new(discord) as Box<dyn AlertChannel>,
        ],
    );

    let mut state = AnnouncedState::new();
    let ranked = vec![mint_alert::RankedMint {
        address: a,
        count: 150,
    }];
    announcer.process(&ranked, &mut state).await.unwrap();

    tweet_mock.assert_async().await;
    assert_eq!(state.recents, vec![a.to_string()]);
}

#[tokio::test]
async fn metadata_failure_still_persists_state() {
    let store = MemoryBlobStore::default();
    let mut seeded = AnnouncedState::new();
    seeded.record("0xold".to_string());
    save_state(&store, BUCKET, KEY, &seeded).await.unwrap();

    let api = StubApi {
        collections: HashMap::new(),
        fail: true,
    };
    let channel = RecordingChannel::default();
    let announcer = Announcer::new(api, vec![Box::new(channel.clone()) as Box<dyn AlertChannel>]);

    let mut state = load_state(&store, BUCKET, KEY).await;
    let ranked = vec![mint_alert::RankedMint {
        address: contract(1),
        count: 150,
    }];
    let result = announcer.process(&ranked, &mut state).await;
    assert!(result.is_err());

    // The run still trims and saves, mirroring the end of an invocation
    state.trim();
    save_state(&store, BUCKET, KEY, &state).await.unwrap();

    let raw = store.get(BUCKET, KEY).await.unwrap().unwrap();
    let persisted: AnnouncedState = serde_json::from_slice(&raw).unwrap();
    assert_eq!(persisted.recents, vec!["0xold".to_string()]);
    assert!(channel.sent.lock().unwrap().is_empty());
}
