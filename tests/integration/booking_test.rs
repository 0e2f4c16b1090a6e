//! Integration tests for the booking lifecycle.

mod helpers;

use axum::http::StatusCode;
use helpers::TestApp;

#[tokio::test]
async fn test_zero_credits_rejected_without_payment() {
    let app = TestApp::new().await;
    let (_instr, _token, profile_id) = app.setup_instructor("zcinstr@test.com").await;
    app.register_user("zclearner@test.com", "learner").await;
    let learner_token = app.login("zclearner@test.com").await;

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

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let message = response.body["message"].as_str().unwrap();
    assert!(message.contains("required 1"), "{message}");
    assert!(message.contains("available 0"), "{message}");

    // No booking row was created.
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_booking_with_credits_confirms_and_debits() {
    let app = TestApp::new().await;
    let (_instr, _token, profile_id) = app.setup_instructor("bkinstr@test.com").await;
    let learner_user = app.register_user("bklearner@test.com", "learner").await;
    let learner_token = app.login("bklearner@test.com").await;
    app.set_learner_credits(learner_user, 2).await;

    let monday = TestApp::next_monday();
    let response = app
        .request(
            "POST",
            "/api/bookings",
            Some(serde_json::json!({
                "instructor_id": profile_id,
                "lesson_date": monday,
                "start_time": "09:00",
                "duration_hours": 1,
                "pickup_location": "12 Example St"
            })),
            Some(&learner_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let booking = &response.body["data"];
    assert_eq!(booking["status"], "confirmed");
    assert_eq!(booking["payment_method"], "credits");
    assert_eq!(booking["start_time"], "9:00 AM");

    // Pricing invariant for an $80/h lesson.
    assert_eq!(booking["base_rate"], 80.0);
    assert_eq!(booking["platform_fee"], 8.0);
    assert_eq!(booking["gst"], 8.0);
    assert_eq!(booking["total_amount"], 96.0);
    assert_eq!(booking["instructor_payout"], 72.0);

    assert_eq!(app.learner_credits(learner_user).await, 1);
}

#[tokio::test]
async fn test_same_slot_booked_twice_conflicts() {
    let app = TestApp::new().await;
    let (_instr, _token, profile_id) = app.setup_instructor("dblinstr@test.com").await;
    let learner_user = app.register_user("dbllearner@test.com", "learner").await;
    let learner_token = app.login("dbllearner@test.com").await;
    app.set_learner_credits(learner_user, 2).await;

    let monday = TestApp::next_monday();
    let body = serde_json::json!({
        "instructor_id": profile_id,
        "lesson_date": monday,
        "start_time": "9:00 AM",
        "duration_hours": 1
    });

    let first = app
        .request("POST", "/api/bookings", Some(body.clone()), Some(&learner_token))
        .await;
    assert_eq!(first.status, StatusCode::OK, "{:?}", first.body);

    let second = app
        .request("POST", "/api/bookings", Some(body), Some(&learner_token))
        .await;
    assert_eq!(second.status, StatusCode::CONFLICT, "{:?}", second.body);

    // Exactly one confirmed booking, one credit spent.
    let confirmed: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE status = 'confirmed'")
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert_eq!(confirmed, 1);
    assert_eq!(app.learner_credits(learner_user).await, 1);
}

#[tokio::test]
async fn test_overlapping_interval_rejected() {
    let app = TestApp::new().await;
    let (_instr, _token, profile_id) = app.setup_instructor("ovlinstr@test.com").await;
    let learner_user = app.register_user("ovllearner@test.com", "learner").await;
    let learner_token = app.login("ovllearner@test.com").await;
    app.set_learner_credits(learner_user, 4).await;

    let monday = TestApp::next_monday();
    let first = app
        .request(
            "POST",
            "/api/bookings",
            Some(serde_json::json!({
                "instructor_id": profile_id,
                "lesson_date": monday,
                "start_time": "8:00 AM",
                "duration_hours": 2
            })),
            Some(&learner_token),
        )
        .await;
    assert_eq!(first.status, StatusCode::OK, "{:?}", first.body);

    // [9, 10) intersects the existing [8, 10).
    let overlapping = app
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
    assert_eq!(overlapping.status, StatusCode::CONFLICT);

    // [10, 11) is adjacent, not overlapping.
    let adjacent = app
        .request(
            "POST",
            "/api/bookings",
            Some(serde_json::json!({
                "instructor_id": profile_id,
                "lesson_date": monday,
                "start_time": "10:00 AM",
                "duration_hours": 1
            })),
            Some(&learner_token),
        )
        .await;
    assert_eq!(adjacent.status, StatusCode::OK, "{:?}", adjacent.body);
}

#[tokio::test]
async fn test_cancellation_refunds_and_frees_slot() {
    let app = TestApp::new().await;
    let (_instr, _token, profile_id) = app.setup_instructor("cninstr@test.com").await;
    let learner_user = app.register_user("cnlearner@test.com", "learner").await;
    let learner_token = app.login("cnlearner@test.com").await;
    app.set_learner_credits(learner_user, 1).await;

    let monday = TestApp::next_monday();
    let created = app
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
    assert_eq!(created.status, StatusCode::OK);
    let booking_id = created.body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(app.learner_credits(learner_user).await, 0);

    let cancelled = app
        .request(
            "POST",
            &format!("/api/bookings/{booking_id}/cancel"),
            Some(serde_json::json!({"reason": "Caught the flu"})),
            Some(&learner_token),
        )
        .await;
    assert_eq!(cancelled.status, StatusCode::OK, "{:?}", cancelled.body);
    assert_eq!(cancelled.body["data"]["status"], "cancelled");
    assert_eq!(cancelled.body["data"]["cancelled_by"], "learner");
    assert_eq!(cancelled.body["data"]["payment_status"], "refunded");

    // Credit refunded, slot free again.
    assert_eq!(app.learner_credits(learner_user).await, 1);
    let rebook = app
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
    assert_eq!(rebook.status, StatusCode::OK, "{:?}", rebook.body);
}

#[tokio::test]
async fn test_cancelling_completed_booking_is_rejected() {
    let app = TestApp::new().await;
    let (_instr, instr_token, profile_id) = app.setup_instructor("tcinstr@test.com").await;
    let learner_user = app.register_user("tclearner@test.com", "learner").await;
    let learner_token = app.login("tclearner@test.com").await;
    app.set_learner_credits(learner_user, 1).await;

    let monday = TestApp::next_monday();
    let created = app
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
    let booking_id = created.body["data"]["id"].as_str().unwrap().to_string();

    let completed = app
        .request(
            "POST",
            &format!("/api/bookings/{booking_id}/complete"),
            None,
            Some(&instr_token),
        )
        .await;
    assert_eq!(completed.status, StatusCode::OK, "{:?}", completed.body);

    let cancel_attempt = app
        .request(
            "POST",
            &format!("/api/bookings/{booking_id}/cancel"),
            Some(serde_json::json!({"reason": "Too late"})),
            Some(&learner_token),
        )
        .await;
    assert_eq!(cancel_attempt.status, StatusCode::BAD_REQUEST);
}
