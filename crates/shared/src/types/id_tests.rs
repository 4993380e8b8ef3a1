use super::*;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn test_ids_are_time_ordered() {
    let first = EntryId::new();
    let second = EntryId::new();
    assert_ne!(first, second);
    assert!(first < second);
    assert_eq!(first.into_inner().get_version_num(), 7);
}

#[test]
fn test_round_trips_through_display() {
    let year = FiscalYearId::new();
    let parsed = FiscalYearId::from_str(&year.to_string()).unwrap();
    assert_eq!(parsed, year);
}

#[test]
fn test_wraps_existing_uuid() {
    let uuid = Uuid::new_v4();
    let company = CompanyId::from_uuid(uuid);
    assert_eq!(company.into_inner(), uuid);
    assert_eq!(company.to_string(), uuid.to_string());
}

#[test]
fn test_rejects_malformed_uuid() {
    assert!(AccountId::from_str("411").is_err());
    assert!(JournalId::from_str("").is_err());
}

#[test]
fn test_serializes_as_bare_uuid() {
    let uuid = Uuid::new_v4();
    let user = UserId::from_uuid(uuid);
    let json = serde_json::to_string(&user).unwrap();
    assert_eq!(json, format!("\"{uuid}\""));
    assert_eq!(serde_json::from_str::<UserId>(&json).unwrap(), user);
}
