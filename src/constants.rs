pub const SNAPSHOT_PATH: &str = "/stock_data.json";
pub const CONTAINER_CLASS: &str = "ticker";
pub const REFRESH_INTERVAL_SECS: u64 = 5;
pub const PUBLISH_INTERVAL_SECS: u64 = 30;
pub const SERVER_PORT: u16 = 8000;
pub const SERVER_BIND_ADDR: &str = "127.0.0.1:8000";
pub const FETCH_TIMEOUT_SECS: u64 = 10;
pub const LOGO_DIR: &str = "logos";
pub const LOGO_URL_TEMPLATE: &str = "https://logo.clearbit.com/{domain}";
pub const LOGO_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_TICKERS: [&str; 6] = ["AAPL", "MSFT", "GOOG", "AMZN", "TSLA", "RKLB"];
