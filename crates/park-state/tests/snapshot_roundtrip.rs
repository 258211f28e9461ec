//! Loading, transforming, and saving a stored lot document.

use park_core::{Amount, PaymentMethod, SpotId, Timestamp};
use park_state::{
    EntryRequest, ExitRequest, ParkingSessionCoordinator, Snapshot, TicketStatus,
};
use serde_json::{json, Value};

const T0: i64 = 1_767_225_600_000;

fn legacy_document() -> Value {
    json!({
        "tickets": [
            {
                "id": "tk-1",
                "plate": "ABC1D23",
                "vehicleType": "CAR",
                "model": "Gol",
                "entryTime": T0,
                "status": "ACTIVE",
                "spotId": 6
            },
            {
                "id": "tk-0",
                "plate": "OLD0000",
                "vehicleType": "MOTO",
                "entryTime": T0 - 7_200_000,
                "exitTime": T0 - 3_600_000,
                "status": "PAID",
                "spotId": 1,
                "totalAmount": 5.5,
                "paymentMethod": "PIX"
            }
        ],
        "spots": [
            {"id": 1, "label": "V-1", "type": "MOTO", "isOccupied": false},
            {"id": 6, "label": "V-6", "type": "CAR", "isOccupied": true, "ticketId": "tk-1"},
            {"id": 7, "label": "V-7", "type": "CAR", "isOccupied": false}
        ],
        "customers": [],
        "transactions": [
            {
                "id": "tx-0",
                "type": "INCOME",
                "category": "PARKING",
                "amount": 5.5,
                "description": "Exit plate OLD0000",
                "date": T0 - 3_600_000,
                "paymentMethod": "PIX"
            },
            {
                "id": "tx-s",
                "type": "INCOME",
                "category": "STORE_SALE",
                "amount": 4.5,
                "description": "Water",
                "date": T0 - 4_000_000
            }
        ],
        "products": [{"id": "1", "name": "Water", "price": 4.0, "cost": 1.5, "stock": 50}],
        "users": [{"id": "1", "username": "admin", "role": "ADMIN"}],
        "settings": {
            "rates": {
                "CAR": {"firstHour": 10, "additionalHour": 5, "toleranceMinutes": 0},
                "MOTO": {"firstHour": 5, "additionalHour": 3, "toleranceMinutes": 0},
                "VAN": {"firstHour": 15, "additionalHour": 8, "toleranceMinutes": 0},
                "TRUCK": {"firstHour": 25, "additionalHour": 15, "toleranceMinutes": 0}
            },
            "companyName": "TM Parking",
            "printerWidth": "80mm",
            "darkMode": false
        },
        "license": null,
        "currentUser": {"isLoggedIn": false, "role": "ADMIN", "name": "", "username": ""}
    })
}

#[test]
fn test_legacy_document_loads_and_verifies() {
    let doc = Snapshot::from_value(legacy_document()).unwrap();
    assert_eq!(doc.spots.len(), 3);
    assert_eq!(doc.tickets.len(), 2);
    assert_eq!(doc.transactions.len(), 2);
    assert!(doc.lot_state().verify().is_ok());
}

#[test]
fn test_unchanged_document_saves_identically() {
    let input = legacy_document();
    let doc = Snapshot::from_value(input.clone()).unwrap();
    let output = serde_json::to_value(&doc).unwrap();

    for key in ["spots", "tickets", "products", "users", "license", "currentUser"] {
        assert_eq!(output[key], input[key], "field {key}");
    }
    assert_eq!(output["settings"]["printerWidth"], "80mm");
    assert_eq!(output["transactions"][0], input["transactions"][0]);
    // legacy category spelling normalises on save
    assert_eq!(output["transactions"][1]["category"], "PRODUCT_SALE");
}

#[test]
fn test_exit_on_loaded_document_persists_all_changes() {
    let mut doc = Snapshot::from_value(legacy_document()).unwrap();
    let coordinator = ParkingSessionCoordinator::new();
    let exit_time = Timestamp::from_millis(T0 + 61 * 60_000).unwrap();

    let quote = coordinator
        .quote(&doc.lot_state(), SpotId(6), exit_time)
        .unwrap();
    assert_eq!(quote.suggested.to_string(), "15.00");

    let t = coordinator
        .exit(
            &doc.lot_state(),
            ExitRequest {
                spot_id: SpotId(6),
                exit_time,
                amount: quote.suggested,
                payment_method: PaymentMethod::CreditCard,
            },
        )
        .unwrap();
    doc.commit(t.state);

    let reloaded = Snapshot::from_json(&doc.to_json_pretty().unwrap()).unwrap();
    assert_eq!(reloaded, doc);

    let out = serde_json::to_value(&reloaded).unwrap();
    assert_eq!(out["spots"][1]["isOccupied"], false);
    assert!(out["spots"][1].get("ticketId").is_none());
    assert_eq!(out["tickets"][0]["status"], "PAID");
    assert_eq!(out["tickets"][0]["totalAmount"], 15.0);
    assert_eq!(out["tickets"][0]["paymentMethod"], "CREDIT_CARD");
    assert_eq!(out["transactions"][0]["amount"], 15.0);
    assert_eq!(out["transactions"][0]["description"], "Exit plate ABC1D23");
    assert_eq!(out["products"], legacy_document()["products"]);
}

#[test]
fn test_entry_then_cancel_leaves_no_income() {
    let doc = Snapshot::from_value(legacy_document()).unwrap();
    let coordinator = ParkingSessionCoordinator::new();
    let state = coordinator
        .enter(
            &doc.lot_state(),
            EntryRequest {
                spot_id: SpotId(7),
                plate: "new1a11".into(),
                category: None,
                model: None,
                at: Timestamp::from_millis(T0).unwrap(),
            },
        )
        .unwrap()
        .state;
    let t = coordinator.cancel(&state, SpotId(7)).unwrap();
    assert_eq!(t.outcome.status(), &TicketStatus::Cancelled);
    assert_eq!(t.state.transactions.len(), 2);
    assert!(t.state.verify().is_ok());
}

#[test]
fn test_partial_document_defaults_missing_collections() {
    let doc = Snapshot::from_value(json!({
        "spots": [{"id": 1, "label": "V-1", "type": "CAR", "isOccupied": false}],
        "transactions": []
    }))
    .unwrap();
    assert!(doc.tickets.is_empty());
    assert!(doc.customers.is_empty());
    assert_eq!(doc.settings.rates.len(), 4);
    assert_eq!(doc.settings.company_name, "TM Parking");
}

#[test]
fn test_inconsistent_spot_record_rejected() {
    let err = Snapshot::from_value(json!({
        "spots": [{"id": 1, "label": "V-1", "type": "CAR", "isOccupied": true}],
        "transactions": []
    }));
    assert!(err.is_err());
}

#[test]
fn test_random_spot_id_rejected_with_clear_message() {
    let mut doc = legacy_document();
    doc["spots"][2]["id"] = json!(0.7345162983);
    let err = Snapshot::from_value(doc).unwrap_err();
    assert!(
        err.to_string().contains("spot id 0.7345162983 is not a whole number"),
        "{err}"
    );
}

#[test]
fn test_whole_float_spot_id_loads() {
    let mut doc = legacy_document();
    doc["spots"][2]["id"] = json!(7.0);
    let doc = Snapshot::from_value(doc).unwrap();
    assert!(doc.spots.find(SpotId(7)).is_some());
}

#[test]
fn test_dangling_reference_reported_not_repaired() {
    let doc = Snapshot::from_value(json!({
        "spots": [{"id": 1, "label": "V-1", "type": "CAR", "isOccupied": true, "ticketId": "ghost"}],
        "transactions": []
    }))
    .unwrap();
    let violations = doc.lot_state().verify().unwrap_err();
    assert_eq!(violations.len(), 1);
    assert!(doc.spots.find(SpotId(1)).unwrap().is_occupied());
}

#[test]
fn test_amount_parse_matches_stored_float() {
    let a: Amount = "4.5".parse().unwrap();
    assert_eq!(serde_json::to_value(a).unwrap(), json!(4.5));
}
