use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn register_creates_pending_attendee() {
    let app = TestApp::spawn().await;
    let host = app.seed_host("areg").await;
    let id = app.seed_webinar(&host, "Signups Open", 60, 45).await;

    let resp = app
        .client
        .post(app.url(&format!("/api/webinar/{id}/register")))
        .json(&serde_json::json!({ "email": "fan@test.com", "name": "Fan" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 201);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["email"], "fan@test.com");
    assert_eq!(json["name"], "Fan");
    assert_eq!(json["status"], "pending");
    assert!(json["joined_at"].is_null());

    // Registration bumps the denormalized counter
    let resp = app
        .auth_get(&format!("/api/webinar/{id}"), &host.access_token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["attendee_count"], 1);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = TestApp::spawn().await;
    let host = app.seed_host("adup").await;
    let id = app.seed_webinar(&host, "One Seat Each", 60, 45).await;

    let body = serde_json::json!({ "email": "once@test.com" });

    let resp = app
        .client
        .post(app.url(&format!("/api/webinar/{id}/register")))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let resp = app
        .client
        .post(app.url(&format!("/api/webinar/{id}/register")))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);
}

#[tokio::test]
async fn same_email_can_register_for_different_webinars() {
    let app = TestApp::spawn().await;
    let host = app.seed_host("across").await;
    let first = app.seed_webinar(&host, "First", 60, 45).await;
    let second = app.seed_webinar(&host, "Second", 120, 45).await;

    for id in [&first, &second] {
        let resp = app
            .client
            .post(app.url(&format!("/api/webinar/{id}/register")))
            .json(&serde_json::json!({ "email": "both@test.com" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 201);
    }
}

#[tokio::test]
async fn register_for_missing_webinar_is_404() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/api/webinar/000000000000000000000000/register"))
        .json(&serde_json::json!({ "email": "ghost@test.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn join_before_start_is_forbidden() {
    let app = TestApp::spawn().await;
    let host = app.seed_host("aearly").await;
    let id = app.seed_webinar(&host, "Not Yet", 60, 45).await;

    let resp = app
        .client
        .post(app.url(&format!("/api/webinar/{id}/join")))
        .json(&serde_json::json!({ "email": "eager@test.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 403);
    let json: Value = resp.json().await.unwrap();
    assert!(json["message"].as_str().unwrap().contains("upcoming"));
}

#[tokio::test]
async fn join_after_end_is_forbidden() {
    let app = TestApp::spawn().await;
    let host = app.seed_host("alate").await;
    let id = app.seed_webinar(&host, "Too Late", -120, 30).await;

    let resp = app
        .client
        .post(app.url(&format!("/api/webinar/{id}/join")))
        .json(&serde_json::json!({ "email": "late@test.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 403);
    let json: Value = resp.json().await.unwrap();
    assert!(json["message"].as_str().unwrap().contains("ended"));
}

#[tokio::test]
async fn registered_attendee_can_join_while_live() {
    let app = TestApp::spawn().await;
    let host = app.seed_host("ajoin").await;
    let id = app.seed_webinar(&host, "In Session", -5, 60).await;

    let resp = app
        .client
        .post(app.url(&format!("/api/webinar/{id}/register")))
        .json(&serde_json::json!({ "email": "member@test.com", "name": "Member" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let resp = app
        .client
        .post(app.url(&format!("/api/webinar/{id}/join")))
        .json(&serde_json::json!({ "email": "member@test.com" }))
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_success());
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "joined");
    assert!(json["joined_at"].is_string());
    // The registration row was reused, not duplicated
    assert_eq!(json["name"], "Member");
}

#[tokio::test]
async fn walk_in_join_creates_joined_row_directly() {
    let app = TestApp::spawn().await;
    let host = app.seed_host("awalkin").await;
    let id = app.seed_webinar(&host, "Doors Open", -5, 60).await;

    let resp = app
        .client
        .post(app.url(&format!("/api/webinar/{id}/join")))
        .json(&serde_json::json!({ "email": "stranger@test.com", "name": "Stranger" }))
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_success());
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "joined");
    assert_eq!(json["name"], "Stranger");
}

#[tokio::test]
async fn repeat_join_is_idempotent() {
    let app = TestApp::spawn().await;
    let host = app.seed_host("arepeat").await;
    let id = app.seed_webinar(&host, "Flaky Wifi", -5, 60).await;

    let body = serde_json::json!({ "email": "dropper@test.com" });

    let resp = app
        .client
        .post(app.url(&format!("/api/webinar/{id}/join")))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let first: Value = resp.json().await.unwrap();

    let resp = app
        .client
        .post(app.url(&format!("/api/webinar/{id}/join")))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let second: Value = resp.json().await.unwrap();

    // Same row both times
    assert_eq!(first["id"], second["id"]);
    assert_eq!(second["status"], "joined");
}

#[tokio::test]
async fn leave_marks_attendee_left() {
    let app = TestApp::spawn().await;
    let host = app.seed_host("aleave").await;
    let id = app.seed_webinar(&host, "Early Exit", -5, 60).await;

    let body = serde_json::json!({ "email": "quitter@test.com" });

    app.client
        .post(app.url(&format!("/api/webinar/{id}/join")))
        .json(&body)
        .send()
        .await
        .unwrap();

    let resp = app
        .client
        .post(app.url(&format!("/api/webinar/{id}/leave")))
        .json(&body)
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_success());
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["left"], 1);
}

#[tokio::test]
async fn leave_without_prior_join_is_a_noop() {
    let app = TestApp::spawn().await;
    let host = app.seed_host("anoop").await;
    let id = app.seed_webinar(&host, "Empty Room", -5, 60).await;

    let resp = app
        .client
        .post(app.url(&format!("/api/webinar/{id}/leave")))
        .json(&serde_json::json!({ "email": "nobody@test.com" }))
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_success());
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["left"], 0);
}

#[tokio::test]
async fn left_attendee_can_rejoin_while_live() {
    let app = TestApp::spawn().await;
    let host = app.seed_host("arejoin").await;
    let id = app.seed_webinar(&host, "Revolving Door", -5, 60).await;

    let body = serde_json::json!({ "email": "back@test.com" });

    app.client
        .post(app.url(&format!("/api/webinar/{id}/join")))
        .json(&body)
        .send()
        .await
        .unwrap();
    app.client
        .post(app.url(&format!("/api/webinar/{id}/leave")))
        .json(&body)
        .send()
        .await
        .unwrap();

    let resp = app
        .client
        .post(app.url(&format!("/api/webinar/{id}/join")))
        .json(&body)
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_success());
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "joined");
}

#[tokio::test]
async fn host_can_list_the_roster() {
    let app = TestApp::spawn().await;
    let host = app.seed_host("aroster").await;
    let id = app.seed_webinar(&host, "Roll Call", -5, 60).await;

    for i in 0..2 {
        app.client
            .post(app.url(&format!("/api/webinar/{id}/register")))
            .json(&serde_json::json!({ "email": format!("seat{i}@test.com") }))
            .send()
            .await
            .unwrap();
    }
    app.client
        .post(app.url(&format!("/api/webinar/{id}/join")))
        .json(&serde_json::json!({ "email": "seat0@test.com" }))
        .send()
        .await
        .unwrap();

    let resp = app
        .auth_get(&format!("/api/webinar/{id}/attendee"), &host.access_token)
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_success());
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["total"], 2);
    let items = json["items"].as_array().unwrap();
    let joined = items.iter().filter(|a| a["status"] == "joined").count();
    assert_eq!(joined, 1);
}

#[tokio::test]
async fn roster_is_host_only() {
    let app = TestApp::spawn().await;
    let host = app.seed_host("apriv").await;
    let other = app.seed_host("apriv2").await;
    let id = app.seed_webinar(&host, "Private List", 60, 45).await;

    let resp = app
        .auth_get(&format!("/api/webinar/{id}/attendee"), &other.access_token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 404);
}
