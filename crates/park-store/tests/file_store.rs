//! File store behaviour against a real directory.

use park_core::{Amount, PaymentMethod, SpotId, Timestamp};
use park_state::{EntryRequest, ExitRequest, ParkingSessionCoordinator};
use park_store::{
    export_backup, restore_backup, FreshLayout, JsonFileStore, SnapshotStore, StoreError,
};

fn layout() -> FreshLayout {
    FreshLayout {
        spot_count: 10,
        moto_count: 2,
        company_name: "TM Parking".into(),
    }
}

#[test]
fn test_missing_file_loads_fresh_lot() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("lot.json"), layout());
    assert!(!store.exists());
    let doc = store.load().unwrap();
    assert_eq!(doc.spots.len(), 10);
    assert!(!store.exists());
}

#[test]
fn test_save_then_load_returns_same_document() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("nested/lot.json"), layout());
    let doc = store.load().unwrap();
    store.save(&doc).unwrap();
    assert!(store.exists());
    assert!(!dir.path().join("nested/lot.json.tmp").exists());
    assert_eq!(store.load().unwrap(), doc);
}

#[test]
fn test_transition_persists_after_commit() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("lot.json"), layout());
    let coordinator = ParkingSessionCoordinator::new();
    let t0 = Timestamp::from_millis(1_767_225_600_000).unwrap();

    let mut doc = store.load().unwrap();
    let entered = coordinator
        .enter(
            &doc.lot_state(),
            EntryRequest {
                spot_id: SpotId(5),
                plate: "abc1234".into(),
                category: None,
                model: Some("Uno".into()),
                at: t0,
            },
        )
        .unwrap();
    doc.commit(entered.state);
    store.save(&doc).unwrap();

    let mut doc = store.load().unwrap();
    assert!(doc.spots.find(SpotId(5)).unwrap().is_occupied());

    let exited = coordinator
        .exit(
            &doc.lot_state(),
            ExitRequest {
                spot_id: SpotId(5),
                exit_time: Timestamp::from_millis(1_767_225_600_000 + 90 * 60_000).unwrap(),
                amount: "15".parse::<Amount>().unwrap(),
                payment_method: PaymentMethod::Pix,
            },
        )
        .unwrap();
    doc.commit(exited.state);
    store.save(&doc).unwrap();

    let reloaded = store.load().unwrap();
    assert!(!reloaded.spots.find(SpotId(5)).unwrap().is_occupied());
    assert_eq!(reloaded.transactions.len(), 1);
    assert!(reloaded.lot_state().verify().is_ok());
}

#[test]
fn test_corrupt_file_is_an_error_not_a_reset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lot.json");
    std::fs::write(&path, "{ truncated").unwrap();
    let store = JsonFileStore::new(&path, layout());
    assert!(matches!(store.load(), Err(StoreError::Parse(_))));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ truncated");
}

#[test]
fn test_backup_written_to_disk_restores() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("lot.json"), layout());
    let doc = store.load().unwrap();

    let backup_path = dir.path().join("backup.json");
    std::fs::write(&backup_path, export_backup(&doc).unwrap()).unwrap();

    let restored = restore_backup(&std::fs::read_to_string(&backup_path).unwrap()).unwrap();
    store.save(&restored).unwrap();
    assert_eq!(store.load().unwrap(), doc);
}
