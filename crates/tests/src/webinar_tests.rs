use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn create_webinar_defaults_to_scheduled() {
    let app = TestApp::spawn().await;
    let host = app.seed_host("wcreate").await;

    let resp = app
        .auth_post("/api/webinar", &host.access_token)
        .json(&serde_json::json!({
            "title": "Growth Hacking 101",
            "description": "An hour of tactics",
            "scheduled_at": "2030-01-15T18:00:00Z",
            "duration_mins": 60,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 201);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["title"], "Growth Hacking 101");
    assert_eq!(json["status"], "scheduled");
    assert_eq!(json["phase"], "upcoming");
    assert_eq!(json["attendee_count"], 0);
    assert_eq!(json["host_id"], host.id);
}

#[tokio::test]
async fn webinar_in_progress_reports_live_phase() {
    let app = TestApp::spawn().await;
    let host = app.seed_host("wlive").await;

    // Started 5 minutes ago, runs for an hour
    let id = app.seed_webinar(&host, "Live Now", -5, 60).await;

    let resp = app
        .auth_get(&format!("/api/webinar/{id}"), &host.access_token)
        .send()
        .await
        .unwrap();

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["phase"], "live");
    // Stored status flag is untouched by the clock
    assert_eq!(json["status"], "scheduled");
}

#[tokio::test]
async fn past_webinar_reports_ended_phase() {
    let app = TestApp::spawn().await;
    let host = app.seed_host("wended").await;

    // Started two hours ago, ran for 30 minutes
    let id = app.seed_webinar(&host, "Long Over", -120, 30).await;

    let resp = app
        .auth_get(&format!("/api/webinar/{id}"), &host.access_token)
        .send()
        .await
        .unwrap();

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["phase"], "ended");
}

#[tokio::test]
async fn update_webinar_changes_fields() {
    let app = TestApp::spawn().await;
    let host = app.seed_host("wupdate").await;
    let id = app.seed_webinar(&host, "Old Title", 60, 45).await;

    let resp = app
        .auth_put(&format!("/api/webinar/{id}"), &host.access_token)
        .json(&serde_json::json!({
            "title": "New Title",
            "duration_mins": 90,
        }))
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_success());
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["title"], "New Title");
    assert_eq!(json["duration_mins"], 90);
}

#[tokio::test]
async fn go_live_and_end_flip_the_status_flag() {
    let app = TestApp::spawn().await;
    let host = app.seed_host("wstatus").await;
    let id = app.seed_webinar(&host, "Flag Flips", 60, 45).await;

    let resp = app
        .auth_post(&format!("/api/webinar/{id}/go-live"), &host.access_token)
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "live");

    let resp = app
        .auth_post(&format!("/api/webinar/{id}/end"), &host.access_token)
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "ended");
}

#[tokio::test]
async fn foreign_webinar_is_invisible() {
    let app = TestApp::spawn().await;
    let owner = app.seed_host("wowner").await;
    let other = app.seed_host("wother").await;
    let id = app.seed_webinar(&owner, "Private", 60, 45).await;

    let resp = app
        .auth_get(&format!("/api/webinar/{id}"), &other.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    let resp = app
        .auth_delete(&format!("/api/webinar/{id}"), &other.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn public_endpoint_requires_no_auth() {
    let app = TestApp::spawn().await;
    let host = app.seed_host("wpublic").await;
    let id = app.seed_webinar(&host, "Open House", 60, 45).await;

    let resp = app
        .client
        .get(app.url(&format!("/api/webinar/{id}/public")))
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_success());
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["title"], "Open House");
    assert_eq!(json["phase"], "upcoming");
    assert!(json["host_name"].is_string());
    // The public view never leaks the host id
    assert!(json.get("host_id").is_none());
}

#[tokio::test]
async fn delete_cascades_to_attendees_and_leads() {
    let app = TestApp::spawn().await;
    let host = app.seed_host("wcascade").await;
    let id = app.seed_webinar(&host, "Doomed", 60, 45).await;

    // Register an attendee and capture a lead
    let resp = app
        .client
        .post(app.url(&format!("/api/webinar/{id}/register")))
        .json(&serde_json::json!({ "email": "guest@test.com", "name": "Guest" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let resp = app
        .auth_delete(&format!("/api/webinar/{id}"), &host.access_token)
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());

    // Webinar is gone
    let resp = app
        .auth_get(&format!("/api/webinar/{id}"), &host.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    // And so are its attendees and leads
    let attendees = app
        .db
        .collection::<bson::Document>("attendees")
        .count_documents(bson::doc! {})
        .await
        .unwrap();
    assert_eq!(attendees, 0);

    let leads = app
        .db
        .collection::<bson::Document>("leads")
        .count_documents(bson::doc! {})
        .await
        .unwrap();
    assert_eq!(leads, 0);
}

#[tokio::test]
async fn list_returns_only_own_webinars() {
    let app = TestApp::spawn().await;
    let host = app.seed_host("wlist").await;
    let other = app.seed_host("wlist2").await;

    app.seed_webinar(&host, "Mine A", 60, 45).await;
    app.seed_webinar(&host, "Mine B", 120, 45).await;
    app.seed_webinar(&other, "Theirs", 60, 45).await;

    let resp = app
        .auth_get("/api/webinar", &host.access_token)
        .send()
        .await
        .unwrap();

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["total"], 2);
    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|w| w["host_id"] == host.id));
}

#[tokio::test]
async fn zero_pagination_params_are_clamped_not_fatal() {
    let app = TestApp::spawn().await;
    let host = app.seed_host("wpage").await;
    app.seed_webinar(&host, "Only One", 60, 45).await;

    let resp = app
        .auth_get("/api/webinar?page=0&per_page=0", &host.access_token)
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_success());
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["page"], 1);
    assert_eq!(json["per_page"], 1);
    assert_eq!(json["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn notify_dispatches_to_every_registrant() {
    let app = TestApp::spawn().await;
    let host = app.seed_host("wnotify").await;
    let id = app.seed_webinar(&host, "Reminder Blast", 60, 45).await;

    for i in 0..3 {
        let resp = app
            .client
            .post(app.url(&format!("/api/webinar/{id}/register")))
            .json(&serde_json::json!({
                "email": format!("guest{i}@test.com"),
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 201);
    }

    let resp = app
        .auth_post(&format!("/api/webinar/{id}/notify"), &host.access_token)
        .json(&serde_json::json!({ "kind": "reminder" }))
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_success());
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["dispatched"], 3);
}
