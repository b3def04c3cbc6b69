mod common;

use chrono::Duration;
use uuid::Uuid;

use common::*;
use fleet_health::models::{AlertSeverity, AlertType, MaintenanceType};
use fleet_health::repositories::InMemoryStore;

/// Vehículo de 2014 con consumo en caída y cambio de aceite vencido
async fn degraded_vehicle(store: &InMemoryStore) -> Uuid {
    let v = vehicle(Uuid::new_v4(), 2014);
    let id = v.id;
    store.add_vehicle(v).await;

    let steps = [500.0, 500.0, 500.0, 500.0, 500.0, 250.0, 250.0, 250.0, 250.0];
    for record in fill_history(id, 10_000.0, &steps) {
        store.add_fuel_record(record).await;
    }
    store
        .add_maintenance_record(maintenance(id, MaintenanceType::Oil, days_ago(250), Some(1_000)))
        .await;
    id
}

/// Vehículo nuevo, con consumo estable y mantenimiento al día
async fn healthy_vehicle(store: &InMemoryStore) -> Uuid {
    let v = vehicle(Uuid::new_v4(), 2023);
    let id = v.id;
    store.add_vehicle(v).await;

    for record in fill_history(id, 20_000.0, &[480.0; 9]) {
        store.add_fuel_record(record).await;
    }
    store
        .add_maintenance_record(maintenance(id, MaintenanceType::Oil, days_ago(60), Some(20_500)))
        .await;
    id
}

#[tokio::test]
async fn test_healthy_vehicle_creates_no_alerts() {
    let store = InMemoryStore::new();
    healthy_vehicle(&store).await;

    let summary = runner(&store).run_checks_at(now()).await.unwrap();

    assert_eq!(summary.vehicles_checked, 1);
    assert_eq!(summary.alerts_created, 0);
    assert!(store.alerts().await.is_empty());
}

#[tokio::test]
async fn test_degraded_vehicle_alerts() {
    let store = InMemoryStore::new();
    let id = degraded_vehicle(&store).await;

    let summary = runner(&store).run_checks_at(now()).await.unwrap();
    assert_eq!(summary.alerts_created, 4);

    let alerts = store.alerts().await;
    assert!(alerts.iter().all(|a| a.vehicle_id == Some(id)));

    let by_type = |t: AlertType| alerts.iter().find(|a| a.alert_type == t).unwrap();
    assert_eq!(by_type(AlertType::FuelAnomaly).severity, AlertSeverity::Warning);
    assert_eq!(by_type(AlertType::ConsumptionAnomaly).severity, AlertSeverity::Warning);
    assert_eq!(by_type(AlertType::VehicleAge).severity, AlertSeverity::Warning);
    let overdue = by_type(AlertType::MaintenanceOverdue);
    assert_eq!(overdue.severity, AlertSeverity::Critical);
    assert_eq!(overdue.metadata.0["items"][0]["maintenance_type"], "oil");
}

#[tokio::test]
async fn test_second_run_is_fully_suppressed() {
    let store = InMemoryStore::new();
    degraded_vehicle(&store).await;
    healthy_vehicle(&store).await;
    let runner = runner(&store);

    let first = runner.run_checks_at(now()).await.unwrap();
    let second = runner.run_checks_at(now()).await.unwrap();

    assert!(first.alerts_created > 0);
    assert_eq!(second.alerts_created, 0);
    assert_eq!(second.alerts_suppressed, first.alerts_created);
    assert_eq!(store.alerts().await.len(), first.alerts_created);
}

#[tokio::test]
async fn test_cooldowns_expire_per_type() {
    let store = InMemoryStore::new();
    degraded_vehicle(&store).await;
    let runner = runner(&store);

    runner.run_checks_at(now()).await.unwrap();
    let later = runner.run_checks_at(now() + Duration::days(8)).await.unwrap();

    // anomalía corta (7 días) y mantenimiento (7 días) vuelven; consumo (14) y antigüedad (90) no
    assert_eq!(later.alerts_created, 2);
    let alerts = store.alerts().await;
    let count = |t: AlertType| alerts.iter().filter(|a| a.alert_type == t).count();
    assert_eq!(count(AlertType::FuelAnomaly), 2);
    assert_eq!(count(AlertType::MaintenanceOverdue), 2);
    assert_eq!(count(AlertType::ConsumptionAnomaly), 1);
    assert_eq!(count(AlertType::VehicleAge), 1);
}

#[tokio::test]
async fn test_first_maintenance_reminder_is_sent_once() {
    let store = InMemoryStore::new();
    let v = vehicle(Uuid::new_v4(), 2024);
    store.add_vehicle(v).await;
    let runner = runner(&store);

    let first = runner.run_checks_at(now()).await.unwrap();
    let much_later = runner.run_checks_at(now() + Duration::days(120)).await.unwrap();

    assert_eq!(first.alerts_created, 1);
    assert_eq!(much_later.alerts_created, 0);
    let alerts = store.alerts().await;
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].alert_type, AlertType::MaintenanceDue);
    assert_eq!(alerts[0].metadata.0["first_maintenance"], true);
}

#[tokio::test]
async fn test_vehicle_failure_does_not_abort_batch() {
    let store = InMemoryStore::new();
    let broken = degraded_vehicle(&store).await;
    let working = degraded_vehicle(&store).await;
    store.fail_reads_for(broken).await;

    let summary = runner(&store).run_checks_at(now()).await.unwrap();

    assert_eq!(summary.vehicles_checked, 2);
    assert_eq!(summary.vehicles_failed, 1);
    assert_eq!(summary.alerts_created, 4);
    assert!(store.alerts().await.iter().all(|a| a.vehicle_id == Some(working)));
}

#[tokio::test]
async fn test_failed_alert_writes_are_retried_next_run() {
    let store = InMemoryStore::new();
    degraded_vehicle(&store).await;
    let runner = runner(&store);

    store.set_fail_alert_writes(true).await;
    let failed = runner.run_checks_at(now()).await.unwrap();
    assert_eq!(failed.alerts_created, 0);
    assert_eq!(failed.alerts_failed, 4);
    assert_eq!(failed.vehicles_failed, 0);
    assert!(store.alerts().await.is_empty());

    store.set_fail_alert_writes(false).await;
    let retried = runner.run_checks_at(now()).await.unwrap();
    assert_eq!(retried.alerts_created, 4);
}

#[tokio::test]
async fn test_next_due_fields_are_written_back() {
    let store = InMemoryStore::new();
    let v = vehicle(Uuid::new_v4(), 2022);
    let vehicle_id = v.id;
    store.add_vehicle(v).await;

    let mut brakes = maintenance(vehicle_id, MaintenanceType::Brakes, days_ago(100), Some(40_000));
    brakes.service_interval_km = Some(25_000);
    brakes.service_interval_months = Some(18);
    let brakes_id = brakes.id;
    store.add_maintenance_record(brakes).await;

    let battery = maintenance(vehicle_id, MaintenanceType::Battery, days_ago(100), None);
    let battery_id = battery.id;
    store.add_maintenance_record(battery).await;

    let runner = runner(&store);
    let first = runner.run_checks_at(now()).await.unwrap();
    let second = runner.run_checks_at(now()).await.unwrap();

    assert_eq!(first.next_due_updated, 2);
    assert_eq!(second.next_due_updated, 0);

    let brakes = store.maintenance_record(brakes_id).await.unwrap();
    assert_eq!(brakes.next_service_km, Some(65_000));
    assert_eq!(brakes.next_service_date, Some(days_ago(100) + Duration::days(18 * 30)));

    let battery = store.maintenance_record(battery_id).await.unwrap();
    assert_eq!(battery.next_service_km, None);
    assert_eq!(battery.next_service_date, Some(days_ago(100) + Duration::days(36 * 30)));
}
