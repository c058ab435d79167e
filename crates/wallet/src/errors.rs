use stakectl_types::PublicKeyError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("invalid account path: {0}")]
    InvalidPath(String),

    #[error("invalid wallet name: {0}")]
    InvalidWalletName(String),

    #[error("wallet not found: {0}")]
    WalletNotFound(String),

    #[error("wallet already exists: {0}")]
    WalletExists(String),

    #[error("account {account} not found in wallet {wallet}")]
    AccountNotFound { wallet: String, account: String },

    #[error("account {account} already exists in wallet {wallet}")]
    AccountExists { wallet: String, account: String },

    #[error("invalid account {account}: {reason}")]
    InvalidAccount { account: String, reason: String },

    #[error("invalid public key: {0}")]
    InvalidPublicKey(#[from] PublicKeyError),

    #[error("invalid share {index}: {reason}")]
    InvalidShare { index: usize, reason: String },

    #[error("share {index} duplicates an earlier share")]
    DuplicateShare { index: usize },

    #[error("not enough shares: {threshold} required, {provided} provided")]
    InsufficientShares { threshold: u32, provided: usize },

    #[error("unsupported export version {0}")]
    UnsupportedExportVersion(u32),

    #[error("invalid export: {0}")]
    InvalidExport(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WalletError>;
