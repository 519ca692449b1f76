use std::io;

use thiserror::Error;

/// Why a refresh cycle produced no markup.
#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("body is not valid JSON: {0}")]
    Parse(serde_json::Error),

    #[error("snapshot has the wrong shape: {0}")]
    Shape(serde_json::Error),

    #[error("snapshot read failed: {0}")]
    Io(#[from] io::Error),

    #[error("sink rejected markup: {0}")]
    Sink(String),
}

impl RefreshError {
    /// Split a decode failure into syntax errors and well-formed JSON of the wrong structure.
    pub fn from_decode(err: serde_json::Error) -> Self {
        if err.is_data() {
            RefreshError::Shape(err)
        } else {
            RefreshError::Parse(err)
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RefreshError::Network(_) => "network",
            RefreshError::Status(_) => "status",
            RefreshError::Parse(_) => "parse",
            RefreshError::Shape(_) => "shape",
            RefreshError::Io(_) => "io",
            RefreshError::Sink(_) => "sink",
        }
    }
}

/// Why a company logo could not be cached.
#[derive(Error, Debug)]
pub enum LogoError {
    #[error("logo request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("logo server answered {0}")]
    Status(reqwest::StatusCode),

    #[error("logo could not be saved: {0}")]
    Io(#[from] io::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WatchlistError {
    #[error("symbol must not be empty")]
    Empty,

    #[error("{0} is already tracked")]
    AlreadyTracked(String),

    #[error("{0} is not tracked")]
    NotTracked(String),
}
