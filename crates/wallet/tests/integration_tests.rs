use stakectl_types::{BlsPublicKey, BLS_PUBLIC_KEY_BYTES};
use stakectl_wallet::*;
use std::collections::BTreeMap;
use tempfile::tempdir;

fn key(byte: u8) -> BlsPublicKey {
    BlsPublicKey([byte; BLS_PUBLIC_KEY_BYTES])
}

fn shared_export(name: &str, threshold: u32) -> Vec<u8> {
    let mut wallet = Wallet::new(name, WalletKind::Distributed);
    let participants = BTreeMap::from([
        (1, "node-1:9000".to_string()),
        (2, "node-2:9000".to_string()),
        (3, "node-3:9000".to_string()),
    ]);
    wallet
        .add_account(Account::distributed("Validator", key(1), key(9), 2, participants))
        .unwrap();
    serde_json::to_vec(&SharedExport::new(threshold, wallet)).unwrap()
}

fn shares(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_wallet_lifecycle() {
    let temp_dir = tempdir().unwrap();
    let store = WalletStore::new(temp_dir.path());

    store
        .create_wallet("Main", WalletKind::NonDeterministic)
        .unwrap();
    store
        .create_wallet("Backup", WalletKind::NonDeterministic)
        .unwrap();
    store
        .add_account("Main", Account::new("Validator 1", key(1)))
        .unwrap();
    store
        .add_account("Main", Account::new("Validator 2", key(2)))
        .unwrap();

    // A fresh store over the same directory sees everything.
    let reopened = WalletStore::new(temp_dir.path());
    let names: Vec<_> = reopened
        .list_wallets()
        .unwrap()
        .into_iter()
        .map(|wallet| wallet.config.name)
        .collect();
    assert_eq!(names, vec!["Backup", "Main"]);

    let (wallet, account) = reopened
        .wallet_and_account_from_path("Main/Validator 2")
        .unwrap();
    assert_eq!(wallet.name(), "Main");
    assert_eq!(wallet.accounts.len(), 2);
    assert_eq!(reopened.best_public_key(&account), key(2));
}

#[test]
fn test_path_resolution_errors() {
    let temp_dir = tempdir().unwrap();
    let store = WalletStore::new(temp_dir.path());
    store
        .create_wallet("Main", WalletKind::NonDeterministic)
        .unwrap();

    assert!(matches!(
        store.wallet_and_account_from_path("Main"),
        Err(WalletError::InvalidPath(_))
    ));
    assert!(matches!(
        store.wallet_and_account_from_path("Other/Validator"),
        Err(WalletError::WalletNotFound(name)) if name == "Other"
    ));
    assert!(matches!(
        store.wallet_and_account_from_path("Main/Validator"),
        Err(WalletError::AccountNotFound { .. })
    ));
}

#[test]
fn test_add_account_to_missing_wallet() {
    let temp_dir = tempdir().unwrap();
    let store = WalletStore::new(temp_dir.path());

    let err = store
        .add_account("Nowhere", Account::new("Validator", key(1)))
        .unwrap_err();
    assert!(matches!(err, WalletError::WalletNotFound(_)));
}

#[test]
fn test_invalid_wallet_names() {
    let temp_dir = tempdir().unwrap();
    let store = WalletStore::new(temp_dir.path());

    for name in ["", "a/b"] {
        assert!(matches!(
            store.create_wallet(name, WalletKind::NonDeterministic),
            Err(WalletError::InvalidWalletName(_))
        ));
    }
}

#[test]
fn test_unreadable_wallet_is_skipped() {
    let temp_dir = tempdir().unwrap();
    let store = WalletStore::new(temp_dir.path());
    store
        .create_wallet("Main", WalletKind::NonDeterministic)
        .unwrap();

    let broken = temp_dir.path().join("broken");
    std::fs::create_dir_all(&broken).unwrap();
    std::fs::write(broken.join("wallet.json"), "not json").unwrap();

    let wallets = store.list_wallets().unwrap();
    assert_eq!(wallets.len(), 1);
}

#[test]
fn test_shared_import() {
    let temp_dir = tempdir().unwrap();
    let store = WalletStore::new(temp_dir.path());

    let wallet = store
        .import_shared(&shared_export("Shared", 2), &shares(&["0x01aa", "02bb"]))
        .unwrap();
    assert_eq!(wallet.kind(), WalletKind::Distributed);

    let (_, account) = store
        .wallet_and_account_from_path("Shared/Validator")
        .unwrap();
    assert_eq!(account.best_public_key(), key(9));
    assert_eq!(account.signing_threshold, Some(2));
}

#[test]
fn test_shared_import_twice_fails() {
    let temp_dir = tempdir().unwrap();
    let store = WalletStore::new(temp_dir.path());
    let export = shared_export("Shared", 1);

    store.import_shared(&export, &shares(&["01"])).unwrap();
    let err = store.import_shared(&export, &shares(&["01"])).unwrap_err();

    assert!(matches!(err, WalletError::WalletExists(_)));
}

#[test]
fn test_shared_import_rejects_bad_input() {
    let temp_dir = tempdir().unwrap();
    let store = WalletStore::new(temp_dir.path());

    assert!(matches!(
        store.import_shared(&shared_export("Shared", 3), &shares(&["01", "02"])),
        Err(WalletError::InsufficientShares { threshold: 3, provided: 2 })
    ));
    assert!(matches!(
        store.import_shared(&shared_export("Shared", 2), &shares(&["01", "01"])),
        Err(WalletError::DuplicateShare { index: 1 })
    ));
    assert!(matches!(
        store.import_shared(b"{}", &shares(&["01"])),
        Err(WalletError::SerializationError(_))
    ));

    let mut export: serde_json::Value =
        serde_json::from_slice(&shared_export("Shared", 1)).unwrap();
    export["version"] = serde_json::json!(7);
    assert!(matches!(
        store.import_shared(&serde_json::to_vec(&export).unwrap(), &shares(&["01"])),
        Err(WalletError::UnsupportedExportVersion(7))
    ));

    assert!(store.list_wallets().unwrap().is_empty());
}

#[test]
fn test_shared_import_rejects_duplicate_accounts() {
    let temp_dir = tempdir().unwrap();
    let store = WalletStore::new(temp_dir.path());

    let mut export: serde_json::Value =
        serde_json::from_slice(&shared_export("Shared", 1)).unwrap();
    let accounts = export["wallet"]["accounts"].as_array_mut().unwrap();
    let mut copy = accounts[0].clone();
    copy["uuid"] = serde_json::json!(uuid::Uuid::new_v4());
    accounts.push(copy);

    let err = store
        .import_shared(&serde_json::to_vec(&export).unwrap(), &shares(&["01"]))
        .unwrap_err();
    match err {
        WalletError::AccountExists { wallet, account } => {
            assert_eq!(wallet, "Shared");
            assert_eq!(account, "Validator");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(store.list_wallets().unwrap().is_empty());
}

#[test]
fn test_check_shared_import_writes_nothing() {
    let temp_dir = tempdir().unwrap();
    let store = WalletStore::new(temp_dir.path());

    let wallet = store
        .check_shared_import(&shared_export("Shared", 2), &shares(&["01", "02"]))
        .unwrap();
    assert_eq!(wallet.name(), "Shared");
    assert!(store.list_wallets().unwrap().is_empty());
    assert!(!store.wallet_path(wallet.uuid()).exists());
}
