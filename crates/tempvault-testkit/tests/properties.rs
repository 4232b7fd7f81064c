//! Property and fault-injection tests for the vault.

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use tempvault::store::{MemoryStore, Store, StoreError};
use tempvault::{RetentionPeriod, Vault, VaultConfig, VaultError};
use tempvault_testkit::generators::{edit_key, text, VaultParams};
use tempvault_testkit::{block_on, FailingStore, StallingStore, TestFixture};

proptest! {
    #[test]
    fn create_then_read_is_empty_with_exact_expiry(params: VaultParams) {
        let fixture = TestFixture::at(params.created_at);
        let record = block_on(async {
            fixture
                .vault
                .create(&params.access_key, &params.edit_key, params.retention)
                .await
                .unwrap();
            fixture.vault.read(&params.access_key).await.unwrap().unwrap()
        });

        prop_assert_eq!(record.text(), "");
        prop_assert_eq!(record.created_at(), params.created_at);
        prop_assert_eq!(
            record.expires_at(),
            params.created_at + params.retention.duration_ms()
        );
        prop_assert!(record.expires_at() > record.created_at());
    }

    #[test]
    fn read_after_expiry_stays_absent(params: VaultParams, overshoot in 0i64..=86_400_000) {
        let fixture = TestFixture::at(params.created_at);
        let (first, second) = block_on(async {
            let record = fixture
                .vault
                .create(&params.access_key, &params.edit_key, params.retention)
                .await
                .unwrap();
            fixture.clock.set(record.expires_at() + overshoot);

            let first = fixture.vault.read(&params.access_key).await.unwrap();
            let second = fixture.vault.read(&params.access_key).await.unwrap();
            (first, second)
        });

        prop_assert!(first.is_none());
        prop_assert!(second.is_none());
    }

    #[test]
    fn wrong_edit_key_never_mutates(
        params: VaultParams,
        supplied in edit_key(),
        new_text in text(),
    ) {
        prop_assume!(supplied != params.edit_key);

        let fixture = TestFixture::at(params.created_at);
        let (err, record) = block_on(async {
            fixture
                .vault
                .create(&params.access_key, &params.edit_key, params.retention)
                .await
                .unwrap();
            let err = fixture
                .vault
                .update(&params.access_key, &supplied, new_text)
                .await
                .unwrap_err();
            let record = fixture.vault.read(&params.access_key).await.unwrap().unwrap();
            (err, record)
        });

        prop_assert!(matches!(err, VaultError::Unauthorized(_)));
        prop_assert_eq!(record.text(), "");
        prop_assert_eq!(record.revision(), 0);
    }

    #[test]
    fn matching_edit_key_replaces_only_text(params: VaultParams, new_text in text()) {
        let fixture = TestFixture::at(params.created_at);
        let (created, updated) = block_on(async {
            let created = fixture
                .vault
                .create(&params.access_key, &params.edit_key, params.retention)
                .await
                .unwrap();
            fixture.clock.advance(1);
            let updated = fixture
                .vault
                .update(&params.access_key, &params.edit_key, new_text.clone())
                .await
                .unwrap();
            (created, updated)
        });

        prop_assert_eq!(updated.text(), new_text.as_str());
        prop_assert_eq!(updated.access_key(), created.access_key());
        prop_assert_eq!(updated.edit_key(), created.edit_key());
        prop_assert_eq!(updated.created_at(), created.created_at());
        prop_assert_eq!(updated.retention(), created.retention());
        prop_assert_eq!(updated.expires_at(), created.expires_at());
    }

    #[test]
    fn update_on_expired_vault_does_not_mutate(params: VaultParams, new_text in text()) {
        let fixture = TestFixture::at(params.created_at);
        let (err, remaining) = block_on(async {
            let record = fixture
                .vault
                .create(&params.access_key, &params.edit_key, params.retention)
                .await
                .unwrap();
            fixture.clock.set(record.expires_at());

            let err = fixture
                .vault
                .update(&params.access_key, &params.edit_key, new_text)
                .await
                .unwrap_err();
            (err, fixture.vault.store().count().await.unwrap())
        });

        prop_assert!(matches!(err, VaultError::Expired(_) | VaultError::NotFound(_)));
        prop_assert_eq!(remaining, 0);
    }

    #[test]
    fn create_over_live_vault_is_rejected(
        params: VaultParams,
        other_key in edit_key(),
        retention in tempvault_testkit::generators::retention_period(),
    ) {
        let fixture = TestFixture::at(params.created_at);
        let (err, record, original) = block_on(async {
            let original = fixture
                .vault
                .create(&params.access_key, &params.edit_key, params.retention)
                .await
                .unwrap();
            fixture.clock.set(original.expires_at() - 1);

            let err = fixture
                .vault
                .create(&params.access_key, &other_key, retention)
                .await
                .unwrap_err();
            let record = fixture.vault.read(&params.access_key).await.unwrap().unwrap();
            (err, record, original)
        });

        prop_assert!(matches!(err, VaultError::AlreadyExists(_)));
        prop_assert_eq!(record, original);
    }

    #[test]
    fn second_sweep_removes_nothing(
        batch in prop::collection::vec(any::<VaultParams>(), 1..16),
        at in 0i64..=1_209_600_000,
    ) {
        let fixture = TestFixture::at(0);
        let (first, second, live) = block_on(async {
            for params in &batch {
                // Duplicate access keys in the batch are refused; that is fine.
                let _ = fixture
                    .vault
                    .create(&params.access_key, &params.edit_key, params.retention)
                    .await;
            }
            let stored = fixture.vault.store().count().await.unwrap();
            let due = fixture.vault.store().expired_as_of(at).await.unwrap().len();

            fixture.clock.set(at);
            let first = fixture.vault.sweep_expired().await.unwrap();
            let second = fixture.vault.sweep_expired().await.unwrap();
            let live = fixture.vault.store().count().await.unwrap();

            assert_eq!(first, due);
            assert_eq!(live, stored - due);
            (first, second, live)
        });

        prop_assert_eq!(second, 0);
        prop_assert!(first + live <= batch.len());
    }
}

#[tokio::test]
async fn scenario_one_hour_from_epoch() {
    let fixture = TestFixture::at(0);
    let record = fixture
        .vault
        .create_vault("room", "key", "1hour")
        .await
        .unwrap();
    assert_eq!(record.expires_at(), 3_600_000);

    fixture.clock.set(3_599_999);
    assert_eq!(
        fixture.vault.read("room").await.unwrap().unwrap().text(),
        ""
    );

    fixture.clock.set(3_600_001);
    assert!(fixture.vault.read("room").await.unwrap().is_none());
}

#[tokio::test]
async fn scenario_wrong_key_on_abc() {
    let fixture = TestFixture::sqlite_at(0);
    fixture
        .vault
        .create_vault("abc", "secret", "24hours")
        .await
        .unwrap();

    let err = fixture
        .vault
        .update_vault_text("abc", "wrong", "x".into())
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::Unauthorized(_)));

    let record = fixture.vault.fetch_vault("abc").await.unwrap().unwrap();
    assert_eq!(record.text(), "");
}

#[tokio::test]
async fn stalled_store_times_out_as_unavailable() {
    let config = VaultConfig::default().with_storage_timeout(Duration::from_millis(25));
    let fixture = TestFixture::with_config(StallingStore::stalled(), 0, config);

    let err = fixture.vault.read("abc").await.unwrap_err();
    assert!(err.is_retryable());
    assert!(matches!(
        err,
        VaultError::StorageUnavailable(StoreError::Timeout { op: "get", .. })
    ));

    let err = fixture
        .vault
        .create("abc", "secret", RetentionPeriod::OneHour)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        VaultError::StorageUnavailable(StoreError::Timeout { op: "insert", .. })
    ));
}

#[tokio::test]
async fn stall_mid_session_then_recover() {
    let config = VaultConfig::default().with_storage_timeout(Duration::from_millis(25));
    let fixture = TestFixture::with_config(StallingStore::new(), 0, config);

    fixture
        .vault
        .create("abc", "secret", RetentionPeriod::OneHour)
        .await
        .unwrap();

    fixture.vault.store().stall();
    let err = fixture
        .vault
        .update("abc", "secret", "lost".into())
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::StorageUnavailable(_)));

    fixture.vault.store().recover();
    let record = fixture.vault.read("abc").await.unwrap().unwrap();
    assert_eq!(record.text(), "");
}

#[tokio::test]
async fn failing_store_is_not_reported_as_missing() {
    let fixture = TestFixture::with_store(FailingStore, 0);

    let err = fixture.vault.read("abc").await.unwrap_err();
    assert!(matches!(
        err,
        VaultError::StorageUnavailable(StoreError::Unavailable(_))
    ));

    let err = fixture
        .vault
        .update("abc", "secret", "x".into())
        .await
        .unwrap_err();
    assert!(!matches!(err, VaultError::NotFound(_)));
    assert!(err.is_retryable());

    assert!(fixture.vault.sweep_expired().await.unwrap_err().is_retryable());
}

#[tokio::test]
async fn sweeper_survives_failing_store() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let config = VaultConfig::default().with_sweep_interval(Duration::from_millis(5));
    let fixture = TestFixture::with_config(FailingStore, 0, config);

    let sweeper = fixture.vault.spawn_sweeper();
    tokio::time::sleep(Duration::from_millis(40)).await;
    assert!(sweeper.is_running());
    sweeper.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_on_one_key_admit_exactly_one() {
    let fixture = TestFixture::sqlite_at(0);
    let vault = Arc::new(fixture.vault);

    let mut tasks = Vec::new();
    for i in 0..16 {
        let vault = Arc::clone(&vault);
        tasks.push(tokio::spawn(async move {
            vault
                .create("contended", &format!("key-{}", i), RetentionPeriod::OneHour)
                .await
        }));
    }

    let mut created = 0;
    let mut refused = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => created += 1,
            Err(VaultError::AlreadyExists(_)) => refused += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(refused, 15);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_sweeps_count_each_vault_once() {
    let clock = Arc::new(tempvault::ManualClock::new(0));
    let vault = Vault::with_clock(MemoryStore::new(), clock.clone(), VaultConfig::default());
    for i in 0..50 {
        vault
            .create(&format!("v{}", i), "k", RetentionPeriod::OneHour)
            .await
            .unwrap();
    }
    clock.set(3_600_000);

    let a = tokio::spawn({
        let vault = vault.clone();
        async move { vault.sweep_expired().await.unwrap() }
    });
    let b = tokio::spawn({
        let vault = vault.clone();
        async move { vault.sweep_expired().await.unwrap() }
    });

    let total = a.await.unwrap() + b.await.unwrap();
    assert_eq!(total, 50);
    assert_eq!(vault.store().count().await.unwrap(), 0);
}
