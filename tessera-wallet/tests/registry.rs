mod common;

use std::collections::HashSet;
use std::sync::Arc;

use common::{memory_registry, registry, FlakyStore, OTHER_MNEMONIC, TEST_MNEMONIC};
use tessera::{Chain, Error, KeyValueStore};
use tessera_wallet::store::{secrets_namespace, wallets_namespace, ADDRESSES_KEY};
use tessera_wallet::MemoryStore;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_add_wallet_yields_distinct_indices() {
    let registry = Arc::new(memory_registry());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move { registry.add_wallet(Chain::Solana).await })
        })
        .collect();

    let mut added = HashSet::new();
    for handle in handles {
        added.insert(handle.await.unwrap().unwrap());
    }
    assert_eq!(added.len(), 16);

    let listed = registry.list_wallets(Chain::Solana).await.unwrap();
    assert_eq!(listed.len(), 16);
    assert_eq!(listed.iter().cloned().collect::<HashSet<_>>(), added);

    // Position in the list is the derivation index.
    let wallet = common::wallet(TEST_MNEMONIC);
    let scheme = registry.scheme(Chain::Solana).unwrap();
    for (i, address) in listed.iter().enumerate() {
        let keypair = scheme
            .derive_keypair(wallet.seed(), u32::try_from(i).unwrap())
            .unwrap();
        assert_eq!(keypair.address(), address);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_chains_do_not_block_each_other() {
    let registry = Arc::new(memory_registry());

    let eth = {
        let registry = Arc::clone(&registry);
        tokio::spawn(async move {
            for _ in 0..5 {
                registry.add_wallet(Chain::Ethereum).await.unwrap();
            }
        })
    };
    let sol = {
        let registry = Arc::clone(&registry);
        tokio::spawn(async move {
            for _ in 0..3 {
                registry.add_wallet(Chain::Solana).await.unwrap();
            }
        })
    };
    eth.await.unwrap();
    sol.await.unwrap();

    assert_eq!(registry.list_wallets(Chain::Ethereum).await.unwrap().len(), 5);
    assert_eq!(registry.list_wallets(Chain::Solana).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_restore_round_trip() {
    let store = Arc::new(MemoryStore::new());

    let first = registry(TEST_MNEMONIC, store.clone());
    let eth_0 = first.add_wallet(Chain::Ethereum).await.unwrap();
    let eth_1 = first.add_wallet(Chain::Ethereum).await.unwrap();
    let sol_0 = first.add_wallet(Chain::Solana).await.unwrap();
    first.select_active(Chain::Ethereum, &eth_0).await.unwrap();

    let second = registry(TEST_MNEMONIC, store);
    assert!(second.list_wallets(Chain::Ethereum).await.unwrap().is_empty());
    second.restore().await.unwrap();

    assert_eq!(
        second.list_wallets(Chain::Ethereum).await.unwrap(),
        vec![eth_0.clone(), eth_1]
    );
    assert_eq!(second.list_wallets(Chain::Solana).await.unwrap(), vec![sol_0.clone()]);
    assert_eq!(second.active(Chain::Ethereum).await.unwrap(), Some(eth_0));
    assert_eq!(second.active(Chain::Solana).await.unwrap(), Some(sol_0));

    // The next index continues after the restored ones.
    let eth_2 = second.add_wallet(Chain::Ethereum).await.unwrap();
    assert_eq!(second.list_wallets(Chain::Ethereum).await.unwrap()[2], eth_2);
}

#[tokio::test]
async fn test_restore_empty_store() {
    let registry = memory_registry();
    registry.restore().await.unwrap();
    for chain in Chain::ALL {
        assert!(registry.list_wallets(chain).await.unwrap().is_empty());
        assert_eq!(registry.active(chain).await.unwrap(), None);
    }
}

#[tokio::test]
async fn test_restore_with_other_mnemonic_is_corrupted() {
    let store = Arc::new(MemoryStore::new());
    registry(TEST_MNEMONIC, store.clone())
        .add_wallet(Chain::Ethereum)
        .await
        .unwrap();

    let other = registry(OTHER_MNEMONIC, store);
    assert_eq!(
        other.restore().await.unwrap_err(),
        Error::StorageCorrupted {
            chain: Chain::Ethereum,
            index: 0,
        }
    );
}

#[tokio::test]
async fn test_restore_rejects_garbage_address_list() {
    let store = Arc::new(MemoryStore::new());
    store
        .put(&wallets_namespace(Chain::Solana), ADDRESSES_KEY, b"not json".to_vec())
        .await
        .unwrap();

    let registry = registry(TEST_MNEMONIC, store);
    assert!(matches!(
        registry.restore().await,
        Err(Error::StorageCorrupted {
            chain: Chain::Solana,
            ..
        })
    ));
}

#[tokio::test]
async fn test_failed_persist_appends_nothing() {
    // The secret write succeeds, the active marker write fails.
    let store = Arc::new(FlakyStore::new(1));
    let registry = registry(TEST_MNEMONIC, store.clone());

    let err = registry.add_wallet(Chain::Ethereum).await.unwrap_err();
    assert_eq!(err, Error::Storage("disk full".into()));
    assert!(registry.list_wallets(Chain::Ethereum).await.unwrap().is_empty());
    assert_eq!(registry.active(Chain::Ethereum).await.unwrap(), None);
    assert_eq!(
        store
            .get(&wallets_namespace(Chain::Ethereum), ADDRESSES_KEY)
            .await
            .unwrap(),
        None
    );
}

#[tokio::test]
async fn test_failed_secret_write_persists_nothing() {
    let store = Arc::new(FlakyStore::new(0));
    let registry = registry(TEST_MNEMONIC, store.clone());

    assert!(registry.add_wallet(Chain::Solana).await.is_err());
    assert_eq!(
        store
            .get(&secrets_namespace(Chain::Solana), "HAgk14JpMQLgt6rVgv7cBQFJWFto5Dqxi472uT3DKpqk")
            .await
            .unwrap(),
        None
    );
    assert_eq!(
        store
            .get(&wallets_namespace(Chain::Solana), ADDRESSES_KEY)
            .await
            .unwrap(),
        None
    );
}

#[tokio::test]
async fn test_active_marker_without_address_list_is_ignored() {
    // Secret and active marker land, the address list write fails.
    let store = Arc::new(FlakyStore::new(2));
    let first = registry(TEST_MNEMONIC, store.clone());
    assert_eq!(
        first.add_wallet(Chain::Ethereum).await.unwrap_err(),
        Error::Storage("disk full".into())
    );
    assert!(first.list_wallets(Chain::Ethereum).await.unwrap().is_empty());
    assert_eq!(
        store
            .get(&wallets_namespace(Chain::Ethereum), ADDRESSES_KEY)
            .await
            .unwrap(),
        None
    );

    let second = registry(TEST_MNEMONIC, store);
    second.restore().await.unwrap();
    assert!(second.list_wallets(Chain::Ethereum).await.unwrap().is_empty());
    assert_eq!(second.active(Chain::Ethereum).await.unwrap(), None);
}

#[tokio::test]
async fn test_failed_restore_leaves_every_chain_untouched() {
    let store = Arc::new(MemoryStore::new());
    let writer = registry(TEST_MNEMONIC, store.clone());
    let eth_0 = writer.add_wallet(Chain::Ethereum).await.unwrap();
    let eth_1 = writer.add_wallet(Chain::Ethereum).await.unwrap();

    let reader = registry(TEST_MNEMONIC, store.clone());
    reader.restore().await.unwrap();
    reader.select_active(Chain::Ethereum, &eth_0).await.unwrap();

    // Storage moves on for Ethereum while the Solana list goes bad.
    writer.add_wallet(Chain::Ethereum).await.unwrap();
    store
        .put(&wallets_namespace(Chain::Solana), ADDRESSES_KEY, b"not json".to_vec())
        .await
        .unwrap();

    assert!(matches!(
        reader.restore().await,
        Err(Error::StorageCorrupted {
            chain: Chain::Solana,
            ..
        })
    ));
    assert_eq!(
        reader.list_wallets(Chain::Ethereum).await.unwrap(),
        vec![eth_0.clone(), eth_1]
    );
    assert_eq!(reader.active(Chain::Ethereum).await.unwrap(), Some(eth_0));
}
