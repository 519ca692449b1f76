use std::path::Path;

use quote_ticker::publisher::SnapshotStore;
use quote_ticker::server::{self, AppState};
use quote_ticker::shutdown::{self, ShutdownSignal};
use quote_ticker::watchlist::Watchlist;
use quote_ticker::Container;
use reqwest::StatusCode;
use tokio::net::TcpListener;

async fn start(logo_dir: &Path) -> (String, tokio::sync::watch::Sender<ShutdownSignal>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let base = format!("http://{}", listener.local_addr().expect("addr"));
    let state = AppState {
        snapshots: SnapshotStore::new(),
        container: Container::new(),
        watchlist: Watchlist::default(),
        logo_dir: logo_dir.to_path_buf(),
        page_reload_secs: None,
    };
    let (tx, rx) = shutdown::channel();
    tokio::spawn(server::serve(listener, state, rx));
    (base, tx)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn logos_are_served_from_the_logo_directory_only() {
    let root = tempfile::tempdir().expect("tempdir");
    let logo_dir = root.path().join("logos");
    std::fs::create_dir(&logo_dir).unwrap();
    std::fs::write(logo_dir.join("AAPL.png"), b"apple").unwrap();
    std::fs::write(logo_dir.join(".hidden.png"), b"hidden").unwrap();
    std::fs::write(root.path().join("secret.png"), b"secret").unwrap();

    let (base, stop) = start(&logo_dir).await;
    let client = reqwest::Client::new();

    let found = client
        .get(format!("{base}/logos/AAPL.png"))
        .send()
        .await
        .expect("logo request");
    assert_eq!(found.status(), StatusCode::OK);
    assert_eq!(found.headers()["content-type"], "image/png");
    assert_eq!(&found.bytes().await.expect("body")[..], b"apple");

    for path in [
        "/logos/MSFT.png",
        "/logos/.hidden.png",
        "/logos/..%2Fsecret.png",
        "/logos/..%5Csecret.png",
    ] {
        let response = client
            .get(format!("{base}{path}"))
            .send()
            .await
            .expect("logo request");
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
    }

    stop.send(ShutdownSignal::Graceful).expect("stop");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn blank_symbol_is_rejected() {
    let root = tempfile::tempdir().expect("tempdir");
    let (base, stop) = start(root.path()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/tickers/%20"))
        .send()
        .await
        .expect("add request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let tickers: Vec<String> = client
        .get(format!("{base}/tickers"))
        .send()
        .await
        .expect("list request")
        .json()
        .await
        .expect("list body");
    assert_eq!(tickers.len(), 6);

    stop.send(ShutdownSignal::Graceful).expect("stop");
}
