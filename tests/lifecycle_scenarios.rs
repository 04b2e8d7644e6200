//! End-to-end lifecycles driven through the invocation entry point.

use chrono::{DateTime, Utc};
use vlm::config::CreatePolicy;
use vlm::core::{LifecycleTable, VehicleStatus};
use vlm::history::{AuditFinding, TimestampFormat};
use vlm::ledger::{HistoryOrder, Ledger, LedgerSnapshot, MemoryLedger};
use vlm::{Contract, ContractError, EngineConfig, Response};

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn start() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

fn json(response: &Response) -> serde_json::Value {
    serde_json::from_slice(response.payload().expect("successful response")).unwrap()
}

/// Drive `CH001` through its whole life.
fn full_lifecycle(contract: &Contract, ledger: &mut MemoryLedger) {
    for (function, values) in [
        ("createCar", &["CH001"][..]),
        ("transferCar", &["CH001", "DealerA"][..]),
        (
            "sellnRegisterCar",
            &["CH001", "Alice", "REG123", "2030-01-01"][..],
        ),
        ("scrapCar", &["CH001"][..]),
    ] {
        let response = contract.invoke(ledger, function, &args(values));
        assert_eq!(response, Response::Success(Vec::new()), "{function}");
    }
}

#[test]
fn vehicle_lives_from_factory_to_scrapyard() {
    let contract = Contract::default();
    let mut ledger = MemoryLedger::new().with_start_time(start());

    contract.invoke(&mut ledger, "createCar", &args(&["CH001"]));
    let response = contract.invoke(&mut ledger, "getCar", &args(&["CH001"]));
    assert_eq!(
        response.payload().unwrap(),
        br#"{"chassisNo":"CH001","owner":"Manufacturer","registrationNo":"","registrationExpiryDae":"","status":"New"}"#
    );

    contract.invoke(&mut ledger, "transferCar", &args(&["CH001", "DealerA"]));
    contract.invoke(
        &mut ledger,
        "sellnRegisterCar",
        &args(&["CH001", "Alice", "REG123", "2030-01-01"]),
    );
    let response = contract.invoke(&mut ledger, "getCar", &args(&["CH001"]));
    assert_eq!(
        response.payload().unwrap(),
        br#"{"chassisNo":"CH001","owner":"Alice","registrationNo":"REG123","registrationExpiryDae":"2030-01-01","status":"Customer"}"#
    );

    contract.invoke(&mut ledger, "scrapCar", &args(&["CH001"]));

    let history = json(&contract.invoke(&mut ledger, "getCarHistory", &args(&["CH001"])));
    let entries = history.as_array().unwrap();
    assert_eq!(entries.len(), 4);

    let statuses: Vec<&str> = entries
        .iter()
        .map(|e| e["Value"]["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, ["New", "Dealer", "Customer", "Scrapped"]);

    let last = &entries[3];
    assert_eq!(last["Value"]["owner"], "Alice");
    assert_eq!(last["Value"]["registrationNo"], "REG123");
    assert_eq!(last["IsDelete"], "false");
    assert_eq!(last["Timestamp"], "2023-11-14 22:13:23 +0000 UTC");
    assert_eq!(entries[0]["Timestamp"], "2023-11-14 22:13:20 +0000 UTC");

    let mut tx_ids: Vec<&str> = entries.iter().map(|e| e["TxId"].as_str().unwrap()).collect();
    tx_ids.sort_unstable();
    tx_ids.dedup();
    assert_eq!(tx_ids.len(), 4);
}

#[test]
fn second_transfer_is_rejected_and_record_kept() {
    let contract = Contract::default();
    let mut ledger = MemoryLedger::new();
    contract.invoke(&mut ledger, "createCar", &args(&["CH001"]));
    contract.invoke(&mut ledger, "transferCar", &args(&["CH001", "DealerA"]));
    let before = contract.invoke(&mut ledger, "getCar", &args(&["CH001"]));

    let response = contract.invoke(&mut ledger, "transferCar", &args(&["CH001", "DealerB"]));

    assert_eq!(
        response.message(),
        Some("cannot transfer vehicle 'CH001' in status Dealer")
    );
    assert_eq!(
        contract.invoke(&mut ledger, "getCar", &args(&["CH001"])),
        before
    );
    assert_eq!(ledger.version_count("CH001"), 2);
}

#[test]
fn scrapped_vehicle_cannot_be_sold() {
    let contract = Contract::default();
    let mut ledger = MemoryLedger::new();
    full_lifecycle(&contract, &mut ledger);

    let response = contract.invoke(
        &mut ledger,
        "sellnRegisterCar",
        &args(&["CH001", "Bob", "REG999", "2035-01-01"]),
    );

    assert!(!response.is_success());
    let current = json(&contract.invoke(&mut ledger, "getCar", &args(&["CH001"])));
    assert_eq!(current["status"], "Scrapped");
    assert_eq!(current["owner"], "Alice");
}

#[test]
fn unknown_vehicle_reads_empty() {
    let contract = Contract::default();
    let mut ledger = MemoryLedger::new();

    let get = contract.invoke(&mut ledger, "getCar", &args(&["CH404"]));
    assert_eq!(get, Response::Success(Vec::new()));

    let history = contract.invoke(&mut ledger, "getCarHistory", &args(&["CH404"]));
    assert_eq!(history, Response::Success(b"[]".to_vec()));
}

#[test]
fn history_follows_ledger_order() {
    let contract = Contract::default();
    let mut ledger = MemoryLedger::new().with_history_order(HistoryOrder::NewestFirst);
    full_lifecycle(&contract, &mut ledger);

    let history = json(&contract.invoke(&mut ledger, "getCarHistory", &args(&["CH001"])));
    let statuses: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["Value"]["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, ["Scrapped", "Customer", "Dealer", "New"]);

    let trail = contract
        .history(&ledger)
        .audit("CH001", HistoryOrder::NewestFirst)
        .unwrap();
    assert_eq!(
        trail.status_path(),
        vec![
            VehicleStatus::New,
            VehicleStatus::Dealer,
            VehicleStatus::Customer,
            VehicleStatus::Scrapped
        ]
    );
}

#[test]
fn deleted_versions_appear_as_tombstones() {
    let contract = Contract::default();
    let mut ledger = MemoryLedger::new();
    contract.invoke(&mut ledger, "createCar", &args(&["CH001"]));
    ledger.del_state("CH001").unwrap();

    let history = json(&contract.invoke(&mut ledger, "getCarHistory", &args(&["CH001"])));
    let tombstone = &history.as_array().unwrap()[1];
    assert_eq!(tombstone["Value"], serde_json::Value::Null);
    assert_eq!(tombstone["IsDelete"], "true");

    let response = contract.invoke(&mut ledger, "scrapCar", &args(&["CH001"]));
    assert_eq!(response.message(), Some("vehicle 'CH001' does not exist"));

    let trail = contract
        .history(&ledger)
        .audit("CH001", HistoryOrder::OldestFirst)
        .unwrap();
    let findings = trail.verify(&LifecycleTable::standard());
    assert!(matches!(findings.as_slice(), [AuditFinding::Deleted { .. }]));
}

#[test]
fn strict_create_refuses_to_reset_a_vehicle() {
    let config = EngineConfig::from_json(r#"{"create_policy": "reject"}"#).unwrap();
    assert_eq!(config.create_policy, CreatePolicy::Reject);
    let contract = Contract::new(config);
    let mut ledger = MemoryLedger::new();
    contract.invoke(&mut ledger, "createCar", &args(&["CH001"]));
    contract.invoke(&mut ledger, "transferCar", &args(&["CH001", "DealerA"]));

    let response = contract.invoke(&mut ledger, "createCar", &args(&["CH001"]));

    assert!(!response.is_success());
    let current = json(&contract.invoke(&mut ledger, "getCar", &args(&["CH001"])));
    assert_eq!(current["status"], "Dealer");
}

#[test]
fn default_create_resets_and_audit_flags_it() {
    let contract = Contract::default();
    let mut ledger = MemoryLedger::new();
    contract.invoke(&mut ledger, "createCar", &args(&["CH001"]));
    contract.invoke(&mut ledger, "transferCar", &args(&["CH001", "DealerA"]));
    contract.invoke(&mut ledger, "createCar", &args(&["CH001"]));

    let trail = contract
        .history(&ledger)
        .audit("CH001", HistoryOrder::OldestFirst)
        .unwrap();
    let findings = trail.verify(contract.table());

    assert_eq!(findings.len(), 1);
    assert!(matches!(
        findings[0],
        AuditFinding::Recreated {
            from: VehicleStatus::Dealer,
            ..
        }
    ));
}

#[test]
fn history_failure_releases_iterator() {
    let contract = Contract::default();
    let mut ledger = MemoryLedger::new();
    full_lifecycle(&contract, &mut ledger);

    ledger.fail_history_at(Some(2));
    let err = contract.history(&ledger).get_history("CH001").unwrap_err();
    assert!(matches!(err, ContractError::HistoryIterator { .. }));
    assert_eq!(ledger.open_iterators(), 0);

    ledger.fail_history_at(None);
    ledger.fail_history_open(true);
    let response = contract.invoke(&mut ledger, "getCarHistory", &args(&["CH001"]));
    assert!(!response.is_success());
    assert_eq!(ledger.open_iterators(), 0);
}

#[test]
fn snapshot_restores_state_and_history() {
    let contract = Contract::builder()
        .timestamp_format(TimestampFormat::EpochSeconds)
        .build()
        .unwrap();
    let mut ledger = MemoryLedger::new().with_start_time(start());
    full_lifecycle(&contract, &mut ledger);
    let history = contract.invoke(&mut ledger, "getCarHistory", &args(&["CH001"]));

    let binary = ledger.snapshot().to_binary().unwrap();
    let mut restored = MemoryLedger::restore(LedgerSnapshot::from_binary(&binary).unwrap()).unwrap();

    assert_eq!(
        contract.invoke(&mut restored, "getCarHistory", &args(&["CH001"])),
        history
    );
    assert_eq!(json(&history)[0]["Timestamp"], "1700000000");
    assert_eq!(
        restored.get_state("CH001").unwrap(),
        ledger.get_state("CH001").unwrap()
    );
}

#[test]
fn audit_reports_corrupt_versions_that_history_refuses() {
    let contract = Contract::default();
    let mut ledger = MemoryLedger::new();
    ledger.put_state("CH001", b"garbage".to_vec()).unwrap();
    contract.invoke(&mut ledger, "createCar", &args(&["CH001"]));

    let response = contract.invoke(&mut ledger, "getCarHistory", &args(&["CH001"]));
    assert!(response
        .message()
        .unwrap()
        .starts_with("stored value for 'CH001' is not a valid record"));

    let trail = contract
        .history(&ledger)
        .audit("CH001", HistoryOrder::OldestFirst)
        .unwrap();
    assert_eq!(trail.status_path(), vec![VehicleStatus::New]);
    assert!(matches!(
        trail.verify(contract.table()).as_slice(),
        [AuditFinding::Unreadable { .. }]
    ));
}
