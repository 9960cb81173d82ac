//! Layout persistence through the SQLite store, and input rate limiting.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tabula_lib::GridConfig;
use tabula_lib::layout::{ColumnLayout, LayoutManager, LayoutPhase};
use tabula_lib::rate_limit::Debouncer;
use tabula_lib::store::{LayoutStore, SqliteStore};

const COLUMNS: [&str; 4] = ["id", "name", "amount", "created"];

#[tokio::test]
async fn sqlite_round_trip() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());

    let mut first = LayoutManager::new("orders", COLUMNS, store.clone());
    first.load().await;
    first.move_to("created", 0).await;
    first.resize("name", 40).await;

    let raw = store.get_bytes("orders").await.unwrap().unwrap();
    let stored: ColumnLayout = serde_json::from_slice(&raw).unwrap();
    assert_eq!(stored.order, ["created", "id", "name", "amount"]);
    assert_eq!(stored.widths.get("name"), Some(&190));

    let mut second = LayoutManager::new("orders", COLUMNS, store.clone());
    second.load().await;
    assert_eq!(second.layout(), &stored);

    second.reset().await;
    assert_eq!(second.phase(), LayoutPhase::Reset);
    assert!(store.get_bytes("orders").await.unwrap().is_none());
}

#[tokio::test]
async fn resize_never_goes_below_floor() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let config = GridConfig::default().with_min_column_width(60);
    let mut layout = LayoutManager::new("grid", COLUMNS, store).with_config(&config);

    assert_eq!(layout.resize("amount", -10_000).await, Some(60));
    assert_eq!(layout.resize("amount", i32::MIN).await, Some(60));
    assert_eq!(layout.width("amount"), 60);
}

#[tokio::test]
async fn keys_are_independent() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let mut orders = LayoutManager::new("orders", COLUMNS, store.clone());
    let mut invoices = LayoutManager::new("invoices", COLUMNS, store.clone());

    orders.reorder("amount", "id").await;
    invoices.resize("id", 10).await;
    orders.reset().await;

    assert_eq!(store.keys().await.unwrap(), vec!["invoices"]);
}

#[tokio::test(start_paused = true)]
async fn debounce_coalesces_a_burst() {
    let wait = Duration::from_millis(300);
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    let debouncer = Debouncer::new(wait, move |_: u32| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    for i in 0..5 {
        debouncer.call(i);
        tokio::time::sleep(wait / 2).await;
    }
    // last call was wait/2 ago
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    tokio::time::sleep(wait / 2 - Duration::from_millis(1)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}
