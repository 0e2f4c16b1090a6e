//! Integration tests for availability generation and listing.

mod helpers;

use axum::http::StatusCode;
use helpers::TestApp;

#[tokio::test]
async fn test_monday_template_yields_three_slots() {
    let app = TestApp::new().await;
    let (_user, _token, profile_id) = app.setup_instructor("availinstr@test.com").await;

    let monday = TestApp::next_monday();
    let response = app
        .request(
            "GET",
            &format!("/api/instructors/{profile_id}/availability?from={monday}&to={monday}"),
            None,
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let days = response.body["data"].as_array().unwrap();
    assert_eq!(days.len(), 1);

    let slots = days[0]["slots"].as_array().unwrap();
    let labels: Vec<&str> = slots
        .iter()
        .map(|s| s["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["8:00 AM", "9:00 AM", "10:00 AM"]);
    assert!(slots.iter().all(|s| s["is_available"].as_bool().unwrap()));
}

#[tokio::test]
async fn test_regeneration_is_idempotent() {
    let app = TestApp::new().await;
    let (_user, token, profile_id) = app.setup_instructor("regeninstr@test.com").await;

    // Re-submit the identical template.
    let response = app
        .request(
            "PUT",
            "/api/instructors/me",
            Some(serde_json::json!({
                "opening_hours": {
                    "monday": [{"start": "08:00", "end": "11:00"}]
                }
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let monday = TestApp::next_monday();
    let response = app
        .request(
            "GET",
            &format!("/api/instructors/{profile_id}/availability?from={monday}&to={monday}"),
            None,
            None,
        )
        .await;
    let days = response.body["data"].as_array().unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0]["slots"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_regeneration_preserves_live_reservation() {
    let app = TestApp::new().await;
    let (_instr_user, instr_token, profile_id) =
        app.setup_instructor("keepresinstr@test.com").await;

    let learner_user = app.register_user("keepreslearner@test.com", "learner").await;
    let learner_token = app.login("keepreslearner@test.com").await;
    app.set_learner_credits(learner_user, 2).await;

    let monday = TestApp::next_monday();
    let response = app
        .request(
            "POST",
            "/api/bookings",
            Some(serde_json::json!({
                "instructor_id": profile_id,
                "lesson_date": monday,
                "start_time": "9:00 AM",
                "duration_hours": 1
            })),
            Some(&learner_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let booking_id = response.body["data"]["id"].as_str().unwrap().to_string();

    // Shrink the template so Monday no longer opens at all.
    let response = app
        .request(
            "PUT",
            "/api/instructors/me",
            Some(serde_json::json!({
                "opening_hours": {
                    "tuesday": [{"start": "08:00", "end": "10:00"}]
                }
            })),
            Some(&instr_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    // The reserved slot still exists and still points at the booking.
    let (is_available, linked): (bool, Option<uuid::Uuid>) = sqlx::query_as(
        "SELECT ts.is_available, ts.booking_id FROM time_slots ts \
         JOIN availability_days d ON ts.day_id = d.id \
         WHERE d.instructor_id = $1 AND d.date = $2::date AND ts.slot_hour = 9",
    )
    .bind(profile_id)
    .bind(&monday)
    .fetch_one(&app.db_pool)
    .await
    .expect("Reserved slot was dropped by regeneration");

    assert!(!is_available);
    assert_eq!(linked.map(|u| u.to_string()), Some(booking_id));
}

#[tokio::test]
async fn test_window_clamped_to_horizon() {
    let app = TestApp::new().await;
    let (_user, _token, profile_id) = app.setup_instructor("clampinstr@test.com").await;

    // Ask for a year of availability; max_advance_days is 7.
    let response = app
        .request(
            "GET",
            &format!("/api/instructors/{profile_id}/availability?from=2000-01-01&to=2099-12-31"),
            None,
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let days = response.body["data"].as_array().unwrap();
    // At most two Mondays fit inside an 8-day inclusive window.
    assert!(days.len() <= 2);
}
