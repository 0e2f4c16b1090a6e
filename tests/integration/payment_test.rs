//! Integration tests for payment reconciliation and the webhook path.

mod helpers;

use axum::http::StatusCode;
use helpers::TestApp;

fn succeeded_package_payload(intent_id: &str, learner_id: uuid::Uuid, credits: i32) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "type": "payment_intent.succeeded",
        "data": {
            "object": {
                "id": intent_id,
                "status": "succeeded",
                "amount": credits as i64 * 7500,
                "currency": "aud",
                "metadata": {
                    "kind": "package_purchase",
                    "credits": credits.to_string(),
                    "learner_id": learner_id.to_string()
                }
            }
        }
    }))
    .unwrap()
}

#[tokio::test]
async fn test_duplicate_webhook_grants_once() {
    let app = TestApp::new().await;
    let learner_user = app.register_user("dupwh@test.com", "learner").await;
    let learner_profile = app.set_learner_credits(learner_user, 0).await;

    let payload = succeeded_package_payload("pi_dup_1", learner_profile, 5);

    let first = app.post_webhook(&payload).await;
    assert_eq!(first.status, StatusCode::OK, "{:?}", first.body);
    assert_eq!(app.learner_credits(learner_user).await, 5);

    // Redelivery of the same event is a no-op.
    let second = app.post_webhook(&payload).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(app.learner_credits(learner_user).await, 5);
}

#[tokio::test]
async fn test_unsigned_webhook_rejected() {
    let app = TestApp::new().await;
    let learner_user = app.register_user("badsig@test.com", "learner").await;
    let learner_profile = app.set_learner_credits(learner_user, 0).await;

    let payload = succeeded_package_payload("pi_badsig", learner_profile, 5);

    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/webhooks/payments")
        .header("Content-Type", "application/json")
        .header("x-payment-signature", "deadbeef")
        .body(axum::body::Body::from(payload))
        .unwrap();

    let response = tower::ServiceExt::oneshot(app.router.clone(), req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.learner_credits(learner_user).await, 0);
}

#[tokio::test]
async fn test_booking_time_verification_grants_and_confirms() {
    let app = TestApp::new().await;
    let (_instr, _token, profile_id) = app.setup_instructor("verifinstr@test.com").await;
    let learner_user = app.register_user("veriflearner@test.com", "learner").await;
    let learner_token = app.login("veriflearner@test.com").await;
    let learner_profile = app.set_learner_credits(learner_user, 0).await;

    // A succeeded package purchase the webhook has not delivered yet.
    let intent_id = app.processor.seed_package_purchase(learner_profile, 5, 37500);

    let monday = TestApp::next_monday();
    let response = app
        .request(
            "POST",
            "/api/bookings",
            Some(serde_json::json!({
                "instructor_id": profile_id,
                "lesson_date": monday,
                "start_time": "9:00 AM",
                "duration_hours": 1,
                "payment_intent_id": intent_id
            })),
            Some(&learner_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["status"], "confirmed");
    assert_eq!(response.body["data"]["payment_method"], "card");

    // 5 granted, 1 debited.
    assert_eq!(app.learner_credits(learner_user).await, 4);
}

#[tokio::test]
async fn test_webhook_then_booking_reference_is_single_grant() {
    let app = TestApp::new().await;
    let (_instr, _token, profile_id) = app.setup_instructor("raceinstr@test.com").await;
    let learner_user = app.register_user("racelearner@test.com", "learner").await;
    let learner_token = app.login("racelearner@test.com").await;
    let learner_profile = app.set_learner_credits(learner_user, 0).await;

    let intent_id = app.processor.seed_package_purchase(learner_profile, 5, 37500);

    // Webhook observes the payment first.
    let payload = succeeded_package_payload(&intent_id, learner_profile, 5);
    app.post_webhook(&payload).await;
    assert_eq!(app.learner_credits(learner_user).await, 5);

    // The booking path then references the same intent: no second grant.
    let monday = TestApp::next_monday();
    let response = app
        .request(
            "POST",
            "/api/bookings",
            Some(serde_json::json!({
                "instructor_id": profile_id,
                "lesson_date": monday,
                "start_time": "10:00 AM",
                "duration_hours": 1,
                "payment_intent_id": intent_id
            })),
            Some(&learner_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    // 5 granted once, 1 debited by the booking.
    assert_eq!(app.learner_credits(learner_user).await, 4);
}
