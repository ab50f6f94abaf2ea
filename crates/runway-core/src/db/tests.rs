//! Database tests

use rusqlite::params;

use super::*;
use crate::costs::{Cycle, NewOneOffCost, NewRecurringCost, Schedule};

fn ym(year: i32, month: u32) -> YearMonth {
    YearMonth::new(year, month).unwrap()
}

fn setup() -> (Database, i64) {
    let db = Database::in_memory().unwrap();
    let ws = db.create_workspace("Household").unwrap();
    (db, ws)
}

fn new_recurring(name: &str, amount: i64, schedule: Schedule) -> NewRecurringCost {
    NewRecurringCost {
        name: name.to_string(),
        amount,
        from: None,
        to: None,
        schedule,
        is_saving: false,
    }
}

#[test]
fn test_in_memory_db() {
    let db = Database::in_memory().unwrap();
    assert!(db.list_workspaces().unwrap().is_empty());
}

#[test]
fn test_workspace_crud() {
    let (db, ws) = setup();
    assert!(ws > 0);

    let err = db.create_workspace("Household").unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    db.update_checking_balance(ws, 123_45).unwrap();
    db.update_current_amount(ws, 900).unwrap();
    let workspace = db.get_workspace(ws).unwrap();
    assert_eq!(workspace.name, "Household");
    assert_eq!(workspace.checking_balance, 123_45);
    assert_eq!(workspace.current_amount, 900);

    assert!(db.get_workspace(9999).unwrap_err().is_not_found());
    assert!(db.update_checking_balance(9999, 1).unwrap_err().is_not_found());
}

#[test]
fn test_ensure_default_workspace_is_idempotent() {
    let db = Database::in_memory().unwrap();
    let first = db.ensure_default_workspace().unwrap();
    let second = db.ensure_default_workspace().unwrap();
    assert_eq!(first, second);
    assert_eq!(db.list_workspaces().unwrap().len(), 1);
}

#[test]
fn test_recurring_cost_round_trip() {
    let (db, ws) = setup();

    let mut new = new_recurring("Insurance", -450, Schedule::new(Cycle::HalfYearly, 4).unwrap());
    new.from = Some(ym(2023, 1));
    new.is_saving = true;
    let id = db.create_recurring_cost(ws, &new).unwrap();

    let costs = db.load_recurring_costs(ws).unwrap();
    assert_eq!(costs.len(), 1);
    let cost = &costs[0];
    assert_eq!(cost.id, id);
    assert_eq!(cost.due_months(), vec![4, 10]);
    assert_eq!(cost.from, Some(ym(2023, 1)));
    assert_eq!(cost.to, None);
    assert!(cost.is_saving);

    db.delete_recurring_cost(ws, id).unwrap();
    assert!(db.load_recurring_costs(ws).unwrap().is_empty());
    assert!(db.delete_recurring_cost(ws, id).unwrap_err().is_not_found());
}

#[test]
fn test_recurring_cost_requires_workspace() {
    let db = Database::in_memory().unwrap();
    let err = db
        .create_recurring_cost(42, &new_recurring("Rent", -1000, Schedule::monthly()))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_empty_window_bound_decodes_as_open() {
    let (db, ws) = setup();
    let conn = db.conn().unwrap();
    conn.execute(
        "INSERT INTO recurring_costs (workspace_id, name, amount, valid_from, valid_to, cycle, due_month)
         VALUES (?, 'Legacy', -10, '', '2024 6', 'monthly', 1)",
        params![ws],
    )
    .unwrap();

    let costs = db.load_recurring_costs(ws).unwrap();
    assert_eq!(costs[0].from, None);
    assert_eq!(costs[0].to, Some(ym(2024, 6)));
}

#[test]
fn test_corrupt_cycle_is_integrity_error() {
    let (db, ws) = setup();
    let conn = db.conn().unwrap();
    conn.execute(
        "INSERT INTO recurring_costs (workspace_id, name, amount, cycle, due_month)
         VALUES (?, 'Broken', -10, 'fortnightly', 1)",
        params![ws],
    )
    .unwrap();

    let err = db.load_recurring_costs(ws).unwrap_err();
    assert!(matches!(err, Error::Integrity(_)));
}

#[test]
fn test_illegal_seed_is_integrity_error() {
    let (db, ws) = setup();
    let conn = db.conn().unwrap();
    conn.execute(
        "INSERT INTO recurring_costs (workspace_id, name, amount, cycle, due_month)
         VALUES (?, 'Broken', -10, 'quarterly', 5)",
        params![ws],
    )
    .unwrap();

    assert!(matches!(
        db.load_recurring_costs(ws).unwrap_err(),
        Error::Integrity(_)
    ));
}

#[test]
fn test_negative_seed_is_integrity_error() {
    let (db, ws) = setup();
    let conn = db.conn().unwrap();
    conn.execute(
        "INSERT INTO recurring_costs (workspace_id, name, amount, cycle, due_month)
         VALUES (?, 'Broken', -10, 'yearly', -3)",
        params![ws],
    )
    .unwrap();

    assert!(matches!(
        db.load_recurring_costs(ws).unwrap_err(),
        Error::Integrity(_)
    ));
}

#[test]
fn test_one_off_cost_round_trip() {
    let (db, ws) = setup();
    let id = db
        .create_one_off_cost(
            ws,
            &NewOneOffCost {
                name: "Holiday".to_string(),
                amount: -2500,
                due: ym(2024, 8),
                is_saving: false,
            },
        )
        .unwrap();

    let costs = db.load_one_off_costs(ws).unwrap();
    assert_eq!(costs.len(), 1);
    assert_eq!(costs[0].id, id);
    assert_eq!(costs[0].due, ym(2024, 8));

    db.delete_one_off_cost(ws, id).unwrap();
    assert!(db.load_one_off_costs(ws).unwrap().is_empty());
}

#[test]
fn test_wealth_profile_upsert() {
    let (db, ws) = setup();
    assert!(db.get_wealth_profile(ws).unwrap_err().is_not_found());

    let mut profile = WealthProfile::default();
    db.upsert_wealth_profile(ws, &profile).unwrap();
    assert_eq!(db.get_wealth_profile(ws).unwrap(), profile);

    profile.current_wealth = 25_000.5;
    profile.forecast_duration_years = 20;
    db.upsert_wealth_profile(ws, &profile).unwrap();
    assert_eq!(db.get_wealth_profile(ws).unwrap(), profile);
}

#[test]
fn test_inclusion_unique_key() {
    let (db, ws) = setup();
    let cost = db
        .create_recurring_cost(ws, &new_recurring("Rent", -1000, Schedule::monthly()))
        .unwrap();
    let inclusion = PaymentInclusion {
        workspace_id: ws,
        fixed_cost_id: cost,
        month: ym(2024, 5),
        is_paid: false,
        paid_at: None,
    };

    assert!(db.create_inclusion(&inclusion).unwrap());
    assert!(!db.create_inclusion(&inclusion).unwrap());
    assert_eq!(db.count_inclusions(ws, ym(2024, 5)).unwrap(), 1);
    assert_eq!(db.count_inclusions(ws, ym(2024, 6)).unwrap(), 0);
}

#[test]
fn test_inclusion_update_and_delete() {
    let (db, ws) = setup();
    let cost = db
        .create_recurring_cost(ws, &new_recurring("Rent", -1000, Schedule::monthly()))
        .unwrap();
    let month = ym(2024, 5);
    let mut inclusion = PaymentInclusion {
        workspace_id: ws,
        fixed_cost_id: cost,
        month,
        is_paid: false,
        paid_at: None,
    };
    db.create_inclusion(&inclusion).unwrap();

    let stamp = Utc::now();
    inclusion.is_paid = true;
    inclusion.paid_at = Some(stamp);
    db.update_inclusion(&inclusion).unwrap();

    let stored = db.get_inclusion(ws, cost, month).unwrap();
    assert!(stored.is_paid);
    assert_eq!(
        stored.paid_at.map(|t| t.timestamp()),
        Some(stamp.timestamp())
    );

    db.delete_inclusion(ws, cost, month).unwrap();
    assert!(db.get_inclusion(ws, cost, month).unwrap_err().is_not_found());
    assert!(db.delete_inclusion(ws, cost, month).unwrap_err().is_not_found());
}

#[test]
fn test_deleting_cost_drops_its_inclusions() {
    let (db, ws) = setup();
    let cost = db
        .create_recurring_cost(ws, &new_recurring("Gym", -40, Schedule::monthly()))
        .unwrap();
    db.create_inclusion(&PaymentInclusion {
        workspace_id: ws,
        fixed_cost_id: cost,
        month: ym(2024, 5),
        is_paid: false,
        paid_at: None,
    })
    .unwrap();

    db.delete_recurring_cost(ws, cost).unwrap();
    assert_eq!(db.count_inclusions(ws, ym(2024, 5)).unwrap(), 0);
}

#[test]
fn test_pending_one_off_crud() {
    let (db, ws) = setup();
    let month = ym(2024, 5);
    let id = db.create_pending_one_off(ws, "Card bill", -300, month).unwrap();

    let listed = db.list_pending_one_offs(ws, month).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Card bill");
    assert!(db.list_pending_one_offs(ws, month.next()).unwrap().is_empty());

    let mut cost = db.get_pending_one_off(ws, id).unwrap();
    assert_eq!(cost.month, month);
    cost.is_paid = true;
    db.update_pending_one_off(&cost).unwrap();
    assert!(db.get_pending_one_off(ws, id).unwrap().is_paid);

    let other = db.create_workspace("Other").unwrap();
    assert!(db.get_pending_one_off(other, id).unwrap_err().is_not_found());
    assert!(db.delete_pending_one_off(other, id).unwrap_err().is_not_found());

    db.delete_pending_one_off(ws, id).unwrap();
    assert!(db.get_pending_one_off(ws, id).unwrap_err().is_not_found());
}

#[test]
fn test_decode_datetime_formats() {
    let sqlite = decode_datetime("2024-05-01 10:30:00", "test").unwrap();
    assert_eq!(sqlite.to_rfc3339(), "2024-05-01T10:30:00+00:00");

    let rfc = decode_datetime("2024-05-01T10:30:00+00:00", "test").unwrap();
    assert_eq!(rfc, sqlite);

    assert!(matches!(
        decode_datetime("yesterday", "test").unwrap_err(),
        Error::Integrity(_)
    ));
}

#[test]
fn test_corrupt_paid_at_is_integrity_error() {
    let (db, ws) = setup();
    let cost = db
        .create_recurring_cost(ws, &new_recurring("Rent", -1000, Schedule::monthly()))
        .unwrap();
    let conn = db.conn().unwrap();
    conn.execute(
        "INSERT INTO payment_inclusions (workspace_id, fixed_cost_id, month, is_paid, paid_at)
         VALUES (?, ?, '2024 5', 1, 'not a time')",
        params![ws, cost],
    )
    .unwrap();

    let month = ym(2024, 5);
    assert!(matches!(
        db.list_inclusions(ws, month).unwrap_err(),
        Error::Integrity(_)
    ));
    assert!(matches!(
        db.get_inclusion(ws, cost, month).unwrap_err(),
        Error::Integrity(_)
    ));
}

#[test]
fn test_corrupt_created_at_is_integrity_error() {
    let (db, ws) = setup();
    let id = db
        .create_pending_one_off(ws, "Card bill", -300, ym(2024, 5))
        .unwrap();
    let conn = db.conn().unwrap();
    conn.execute(
        "UPDATE pending_one_offs SET created_at = 'garbage' WHERE id = ?",
        params![id],
    )
    .unwrap();

    assert!(matches!(
        db.list_pending_one_offs(ws, ym(2024, 5)).unwrap_err(),
        Error::Integrity(_)
    ));
    assert!(matches!(
        db.get_pending_one_off(ws, id).unwrap_err(),
        Error::Integrity(_)
    ));
}

#[test]
fn test_derive_key_is_stable() {
    let a = derive_key("correct horse").unwrap();
    let b = derive_key("correct horse").unwrap();
    let c = derive_key("battery staple").unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}
