use crate::helpers::{create_fixture_db, fixture_measurements, get};
use axum::http::StatusCode;
use climate_api::{app, build_app_state, ClimateAccess, ClimateData, DateWindow, Error};
use serde_json::{from_slice, json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::{collections::HashSet, str::FromStr};

async fn fixture_access() -> (tempfile::TempDir, ClimateAccess) {
    let dir = tempfile::tempdir().unwrap();
    let path = create_fixture_db(dir.path(), &fixture_measurements()).await;
    let access = ClimateAccess::new(&path, 2).await.unwrap();
    (dir, access)
}

#[tokio::test]
async fn date_range_spans_all_measurements() {
    let (_dir, access) = fixture_access().await;

    let range = access.date_range().await.unwrap();
    assert_eq!(range.earliest, "2016-08-22");
    assert_eq!(range.latest, "2017-08-23");
    assert!(range.earliest <= range.latest);
    assert_eq!(access.latest_date().await.unwrap(), range.latest);
}

#[tokio::test]
async fn precipitation_window_is_inclusive_and_keeps_nulls() {
    let (_dir, access) = fixture_access().await;

    let latest = access.latest_date().await.unwrap();
    let window = DateWindow::trailing_year(&latest).unwrap();
    let rows = access.precipitation(&window).await.unwrap();

    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|row| window.contains(&row.date)));
    assert!(!rows.iter().any(|row| row.date == "2016-08-22"));
    assert_eq!(
        rows.iter().filter(|row| row.date == "2016-08-23").count(),
        2
    );
    assert!(rows
        .iter()
        .any(|row| row.date == "2016-08-23" && row.prcp.is_none()));
}

#[tokio::test]
async fn temperature_observations_follow_the_same_window() {
    let (_dir, access) = fixture_access().await;

    let window = DateWindow::trailing_year("2017-08-23").unwrap();
    let rows = access.temperature_observations(&window).await.unwrap();

    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|row| window.contains(&row.date)));
    assert!(rows.iter().all(|row| row.tobs.is_some()));
}

#[tokio::test]
async fn stations_are_distinct_and_come_from_measurements() {
    let dir = tempfile::tempdir().unwrap();
    let mut rows = fixture_measurements();
    rows.retain(|row| row.station != "USC00513117");
    let path = create_fixture_db(dir.path(), &rows).await;
    let access = ClimateAccess::new(&path, 2).await.unwrap();

    let stations = access.stations().await.unwrap();
    let unique: HashSet<&String> = stations.iter().collect();

    assert_eq!(unique.len(), stations.len());
    // USC00513117 is in the station table but has no measurements left
    assert_eq!(stations, vec!["USC00519281", "USC00519397"]);
}

#[tokio::test]
async fn stats_between_two_dates_is_inclusive() {
    let (_dir, access) = fixture_access().await;

    let stats = access
        .temperature_stats_between("2017-08-20", "2017-08-23")
        .await
        .unwrap();
    assert_eq!(stats.to_flat(), [Some(12.0), Some(13.0), Some(14.0)]);
}

#[tokio::test]
async fn stats_after_all_data_are_null() {
    let (_dir, access) = fixture_access().await;

    let stats = access.temperature_stats_from("2018-01-01").await.unwrap();
    assert_eq!(stats.to_flat(), [None, None, None]);

    let stats = access
        .temperature_stats_between("2017-08-24", "2017-12-31")
        .await
        .unwrap();
    assert_eq!(stats.to_flat(), [None, None, None]);
}

#[tokio::test]
async fn narrowing_the_range_stays_within_wider_bounds() {
    let (_dir, access) = fixture_access().await;

    let wide = access.temperature_stats_from("2016-08-22").await.unwrap();
    assert_eq!(wide.min, Some(12.0));
    assert_eq!(wide.max, Some(75.0));

    let narrow = access
        .temperature_stats_between("2016-08-22", "2017-01-10")
        .await
        .unwrap();
    assert!(narrow.min.unwrap() >= wide.min.unwrap());
    assert!(narrow.max.unwrap() <= wide.max.unwrap());
    assert_eq!(narrow.to_flat(), [Some(65.0), Some(70.5), Some(75.0)]);
}

#[tokio::test]
async fn empty_measurements_report_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_fixture_db(dir.path(), &[]).await;
    let access = ClimateAccess::new(&path, 1).await.unwrap();

    assert!(matches!(access.date_range().await, Err(Error::NoData)));
    assert!(matches!(access.latest_date().await, Err(Error::NoData)));
    assert!(build_app_state(path, 1).await.is_err());
}

#[tokio::test]
async fn missing_database_file_refuses_to_start() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.sqlite");

    let result = build_app_state(path.to_str().unwrap().to_owned(), 1).await;
    assert!(result.is_err());
    // read-only open never creates the file
    assert!(!path.exists());
}

#[tokio::test]
async fn unexpected_table_layout_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("other.sqlite");
    let path = path.to_str().unwrap().to_owned();

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))
        .unwrap()
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Delete);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::query("CREATE TABLE measurement (station TEXT, day TEXT, rain FLOAT)")
        .execute(&pool)
        .await
        .unwrap();
    pool.close().await;

    assert!(ClimateAccess::new(&path, 1).await.is_err());
}

#[tokio::test]
async fn serves_requests_from_a_real_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_fixture_db(dir.path(), &fixture_measurements()).await;
    let app = app(build_app_state(path, 2).await.unwrap());

    let (status, body) = get(&app, "/api/v1.0/2017-08-20/2017-08-23").await;
    assert_eq!(status, StatusCode::OK);
    let res: Value = from_slice(&body).unwrap();
    assert_eq!(res, json!([12.0, 13.0, 14.0]));

    let (status, body) = get(&app, "/api/v1.0/tobs").await;
    assert_eq!(status, StatusCode::OK);
    let res: Vec<Value> = from_slice(&body).unwrap();
    assert_eq!(res.len(), 10);
    assert!(res.iter().step_by(2).all(Value::is_string));
    assert!(res.iter().skip(1).step_by(2).all(Value::is_number));

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.ends_with("Earliest: 2016-08-22<br>Latest: 2017-08-23"));
}
