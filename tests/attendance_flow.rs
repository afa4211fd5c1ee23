use attendance_tracker::db::create_tables;
use attendance_tracker::ledger::{
    AttendanceLedger, ClockInRequest, ClockOutRequest, MSG_EMPLOYEE_NOT_FOUND,
    MSG_LOCATION_NOT_AUTHORIZED, utc_day_start,
};
use attendance_tracker::model::attendance::{SessionType, SlotState};
use attendance_tracker::query;
use attendance_tracker::store::{AttendanceStore, SqlStore};
use chrono::{Duration, Utc};
use sqlx::sqlite::SqlitePoolOptions;

const ZONE_LAT: f64 = 37.0;
const ZONE_LON: f64 = -122.0;

async fn test_store() -> SqlStore {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    create_tables(&pool).await.expect("schema");
    SqlStore::new(pool)
}

/// Store with one 200m zone and one registered employee "E1".
async fn seeded_store() -> SqlStore {
    let store = test_store().await;
    let now = Utc::now().naive_utc();
    store
        .insert_zone("Head Office", ZONE_LAT, ZONE_LON, 200.0, now)
        .await
        .expect("zone");
    store
        .insert_employee("E1", "Jane Doe", "jane@company.com", None, now)
        .await
        .expect("employee");
    store
}

fn clock_in_req(employee_id: &str, session: &str) -> ClockInRequest {
    ClockInRequest {
        employee_id: employee_id.into(),
        session_type: session.into(),
        latitude: ZONE_LAT,
        longitude: ZONE_LON,
        face_descriptor: None,
    }
}

fn clock_out_req(employee_id: &str, session: &str) -> ClockOutRequest {
    ClockOutRequest {
        employee_id: employee_id.into(),
        session_type: session.into(),
        latitude: ZONE_LAT,
        longitude: ZONE_LON,
    }
}

#[actix_web::test]
async fn clock_in_then_clock_out_closes_the_slot() {
    let store = seeded_store().await;
    let ledger = AttendanceLedger::new(store);

    let clock_in = ledger.clock_in(&clock_in_req("E1", "morning")).await.unwrap();
    assert!(clock_in.success, "{}", clock_in.message);
    let attendance_id = clock_in.attendance_id.unwrap();

    let clock_out = ledger.clock_out(&clock_out_req("E1", "morning")).await.unwrap();
    assert!(clock_out.success, "{}", clock_out.message);
    assert_eq!(clock_out.attendance_id, Some(attendance_id));
    assert!(clock_out.clock_out_time.unwrap() >= clock_in.clock_in_time.unwrap());

    let status = query::status_for_today(ledger.store(), "E1")
        .await
        .unwrap()
        .expect("employee exists");
    let morning = status.sessions.get(&SessionType::Morning).unwrap();
    assert!(morning.clocked_in);
    assert!(morning.clocked_out);
    assert!(morning.clock_in_time.is_some());
    assert!(morning.clock_out_time.is_some());
}

#[actix_web::test]
async fn second_clock_in_for_same_slot_is_rejected() {
    let store = seeded_store().await;
    let ledger = AttendanceLedger::new(store);

    assert!(ledger.clock_in(&clock_in_req("E1", "morning")).await.unwrap().success);

    let repeat = ledger.clock_in(&clock_in_req("E1", "morning")).await.unwrap();
    assert!(!repeat.success);
    assert_eq!(repeat.message, "Already clocked in for morning session today");
    assert!(repeat.attendance_id.is_none());

    // Closing the session does not free the slot for the day.
    assert!(ledger.clock_out(&clock_out_req("E1", "morning")).await.unwrap().success);
    let after_close = ledger.clock_in(&clock_in_req("E1", "morning")).await.unwrap();
    assert!(!after_close.success);
    assert_eq!(
        after_close.message,
        "Already clocked in for morning session today"
    );
}

#[actix_web::test]
async fn other_sessions_stay_available_the_same_day() {
    let store = seeded_store().await;
    let ledger = AttendanceLedger::new(store);

    assert!(ledger.clock_in(&clock_in_req("E1", "morning")).await.unwrap().success);
    assert!(ledger.clock_out(&clock_out_req("E1", "morning")).await.unwrap().success);

    let lunch = ledger.clock_in(&clock_in_req("E1", "lunch")).await.unwrap();
    assert!(lunch.success, "{}", lunch.message);
}

#[actix_web::test]
async fn clock_out_without_clock_in_is_rejected() {
    let store = seeded_store().await;
    let ledger = AttendanceLedger::new(store);

    let result = ledger.clock_out(&clock_out_req("E1", "evening")).await.unwrap();
    assert!(!result.success);
    assert_eq!(
        result.message,
        "No active clock-in found for evening session today"
    );
}

#[actix_web::test]
async fn second_clock_out_for_same_slot_is_rejected() {
    let store = seeded_store().await;
    let ledger = AttendanceLedger::new(store);

    assert!(ledger.clock_in(&clock_in_req("E1", "morning")).await.unwrap().success);
    assert!(ledger.clock_out(&clock_out_req("E1", "morning")).await.unwrap().success);

    let repeat = ledger.clock_out(&clock_out_req("E1", "morning")).await.unwrap();
    assert!(!repeat.success);
    assert_eq!(
        repeat.message,
        "No active clock-in found for morning session today"
    );
}

#[actix_web::test]
async fn unknown_employee_is_rejected_without_creating_a_record() {
    let store = seeded_store().await;
    let ledger = AttendanceLedger::new(store);

    let clock_in = ledger.clock_in(&clock_in_req("GHOST", "morning")).await.unwrap();
    assert!(!clock_in.success);
    assert_eq!(clock_in.message, MSG_EMPLOYEE_NOT_FOUND);

    let clock_out = ledger.clock_out(&clock_out_req("GHOST", "morning")).await.unwrap();
    assert!(!clock_out.success);
    assert_eq!(clock_out.message, MSG_EMPLOYEE_NOT_FOUND);

    assert!(query::all_records(ledger.store(), 100).await.unwrap().is_empty());
}

#[actix_web::test]
async fn coordinates_outside_every_zone_are_rejected() {
    let store = seeded_store().await;
    let ledger = AttendanceLedger::new(store);

    // ~1.1 km north of the zone center, well past the 200m radius.
    let mut req = clock_in_req("E1", "morning");
    req.latitude = 37.01;
    let result = ledger.clock_in(&req).await.unwrap();
    assert!(!result.success);
    assert_eq!(result.message, MSG_LOCATION_NOT_AUTHORIZED);
}

#[actix_web::test]
async fn no_zones_configured_means_nothing_is_authorized() {
    let store = test_store().await;
    let now = Utc::now().naive_utc();
    store
        .insert_employee("E1", "Jane Doe", "jane@company.com", None, now)
        .await
        .unwrap();
    let ledger = AttendanceLedger::new(store);

    let result = ledger.clock_in(&clock_in_req("E1", "morning")).await.unwrap();
    assert!(!result.success);
    assert_eq!(result.message, MSG_LOCATION_NOT_AUTHORIZED);
}

#[actix_web::test]
async fn clock_in_overwrites_the_stored_face_descriptor() {
    let store = seeded_store().await;
    let ledger = AttendanceLedger::new(store);

    let mut req = clock_in_req("E1", "morning");
    req.face_descriptor = Some("[0.12,0.34,0.56]".into());
    assert!(ledger.clock_in(&req).await.unwrap().success);

    let employee = ledger.store().find_employee("E1").await.unwrap().unwrap();
    assert_eq!(employee.face_descriptor.as_deref(), Some("[0.12,0.34,0.56]"));
}

#[actix_web::test]
async fn status_for_today_defaults_to_four_empty_sessions() {
    let store = seeded_store().await;

    let status = query::status_for_today(&store, "E1")
        .await
        .unwrap()
        .expect("employee exists");

    assert_eq!(status.employee_id, "E1");
    assert_eq!(status.employee_name, "Jane Doe");
    assert_eq!(status.sessions.len(), 4);
    let names: Vec<String> = status.sessions.keys().map(|s| s.to_string()).collect();
    assert_eq!(names, ["morning", "lunch", "afternoon", "evening"]);
    for session in status.sessions.values() {
        assert!(!session.clocked_in);
        assert!(!session.clocked_out);
        assert!(session.clock_in_time.is_none());
        assert!(session.clock_out_time.is_none());
    }
}

#[actix_web::test]
async fn status_for_today_requires_a_known_employee() {
    let store = seeded_store().await;
    assert!(query::status_for_today(&store, "GHOST").await.unwrap().is_none());
}

#[actix_web::test]
async fn history_is_newest_first_and_respects_the_limit() {
    let store = seeded_store().await;
    let ledger = AttendanceLedger::new(store);

    for session in ["morning", "lunch", "afternoon"] {
        assert!(ledger.clock_in(&clock_in_req("E1", session)).await.unwrap().success);
    }

    let full = query::history(ledger.store(), "E1", 50).await.unwrap();
    assert_eq!(full.len(), 3);
    let sessions: Vec<&str> = full.iter().map(|r| r.session_type.as_str()).collect();
    assert_eq!(sessions, ["afternoon", "lunch", "morning"]);

    let capped = query::history(ledger.store(), "E1", 2).await.unwrap();
    assert_eq!(capped.len(), 2);
    assert_eq!(capped[0].session_type, "afternoon");
}

#[actix_web::test]
async fn history_for_unknown_employee_is_empty() {
    let store = seeded_store().await;
    assert!(query::history(&store, "GHOST", 50).await.unwrap().is_empty());
}

#[actix_web::test]
async fn all_records_spans_employees_newest_first() {
    let store = seeded_store().await;
    let now = Utc::now().naive_utc();
    store
        .insert_employee("E2", "John Roe", "john@company.com", None, now)
        .await
        .unwrap();
    let ledger = AttendanceLedger::new(store);

    assert!(ledger.clock_in(&clock_in_req("E1", "morning")).await.unwrap().success);
    assert!(ledger.clock_in(&clock_in_req("E2", "morning")).await.unwrap().success);

    let records = query::all_records(ledger.store(), 100).await.unwrap();
    assert_eq!(records.len(), 2);
    // E2's record was created last.
    assert!(records[0].id > records[1].id);

    let capped = query::all_records(ledger.store(), 1).await.unwrap();
    assert_eq!(capped.len(), 1);
}

#[actix_web::test]
async fn concurrent_clock_ins_for_one_slot_admit_exactly_one() {
    let store = seeded_store().await;
    let ledger_a = AttendanceLedger::new(store.clone());
    let ledger_b = AttendanceLedger::new(store.clone());

    let req_a = clock_in_req("E1", "morning");
    let req_b = clock_in_req("E1", "morning");
    let (a, b) = tokio::join!(ledger_a.clock_in(&req_a), ledger_b.clock_in(&req_b),);
    let (a, b) = (a.unwrap(), b.unwrap());

    assert!(a.success ^ b.success, "exactly one clock-in may win");
    let loser = if a.success { &b } else { &a };
    assert_eq!(loser.message, "Already clocked in for morning session today");

    assert_eq!(query::all_records(&store, 100).await.unwrap().len(), 1);
}

#[actix_web::test]
async fn concurrent_clock_outs_apply_exactly_once() {
    let store = seeded_store().await;
    let ledger_a = AttendanceLedger::new(store.clone());
    let ledger_b = AttendanceLedger::new(store.clone());

    assert!(ledger_a.clock_in(&clock_in_req("E1", "morning")).await.unwrap().success);

    let req_a = clock_out_req("E1", "morning");
    let req_b = clock_out_req("E1", "morning");
    let (a, b) = tokio::join!(ledger_a.clock_out(&req_a), ledger_b.clock_out(&req_b),);
    let (a, b) = (a.unwrap(), b.unwrap());

    assert!(a.success ^ b.success, "exactly one clock-out may apply");
    let records = query::history(&store, "E1", 50).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(SlotState::of(records.first()), SlotState::Closed);
}

// The guarded update is what makes a half-lost clock-out race safe: the
// second writer reaches the same record id but its update must not land.
#[actix_web::test]
async fn close_record_applies_only_once() {
    let store = seeded_store().await;
    let employee = store.find_employee("E1").await.unwrap().unwrap();

    let now = Utc::now().naive_utc();
    let id = store
        .insert_clock_in(employee.id, "morning", now, ZONE_LAT, ZONE_LON, utc_day_start(now))
        .await
        .unwrap()
        .expect("slot was free");

    assert!(store.close_record(id, now, ZONE_LAT, ZONE_LON).await.unwrap());
    assert!(!store.close_record(id, now, ZONE_LAT, ZONE_LON).await.unwrap());
}

#[actix_web::test]
async fn insert_clock_in_is_first_writer_wins() {
    let store = seeded_store().await;
    let employee = store.find_employee("E1").await.unwrap().unwrap();

    let now = Utc::now().naive_utc();
    let day_start = utc_day_start(now);
    let first = store
        .insert_clock_in(employee.id, "morning", now, ZONE_LAT, ZONE_LON, day_start)
        .await
        .unwrap();
    assert!(first.is_some());

    let second = store
        .insert_clock_in(employee.id, "morning", now, ZONE_LAT, ZONE_LON, day_start)
        .await
        .unwrap();
    assert!(second.is_none());
}

// Day-boundary edge: a record left open yesterday is not matched by today's
// clock-out, because the open-record query filters on clock_in_time >= start
// of the clock-out day.
#[actix_web::test]
async fn record_left_open_yesterday_is_not_closed_today() {
    let store = seeded_store().await;
    let employee = store.find_employee("E1").await.unwrap().unwrap();

    let yesterday = Utc::now().naive_utc() - Duration::days(1);
    sqlx::query(
        r#"
        INSERT INTO attendance_records
            (employee_id, session_type, clock_in_time,
             clock_in_latitude, clock_in_longitude, created_at)
        VALUES (?, 'evening', ?, ?, ?, ?)
        "#,
    )
    .bind(employee.id)
    .bind(yesterday)
    .bind(ZONE_LAT)
    .bind(ZONE_LON)
    .bind(yesterday)
    .execute(store.pool())
    .await
    .unwrap();

    let ledger = AttendanceLedger::new(store);
    let result = ledger.clock_out(&clock_out_req("E1", "evening")).await.unwrap();
    assert!(!result.success);
    assert_eq!(
        result.message,
        "No active clock-in found for evening session today"
    );

    // The stale record stays open.
    let records = query::history(ledger.store(), "E1", 50).await.unwrap();
    assert_eq!(SlotState::of(records.first()), SlotState::Open);
}
