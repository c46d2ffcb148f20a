use std::time::Duration;

use nerdhub_client::{ApiSettings, FailureKind, HubApi, ReqwestHubApi};
use nerdhub_core::{UpdateRequest, UserMapping};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ReqwestHubApi {
    ReqwestHubApi::new(ApiSettings::new(server.uri())).expect("valid api root")
}

#[tokio::test]
async fn start_update_sends_ids_and_flags() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Games/start-update"))
        .and(query_param("overrideExisting", "true"))
        .and(query_param("appIdsToUpdate", "440"))
        .and(query_param("appIdsToUpdate", "620"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!(["76561197960287930", "76561197960287931"])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"operationId": "op-17"})))
        .expect(1)
        .mount(&server)
        .await;

    let request = UpdateRequest {
        steam_ids: vec!["76561197960287930".into(), "76561197960287931".into()],
        override_existing: true,
        app_ids: vec![440, 620],
    };
    let operation_id = api_for(&server)
        .start_update(&request)
        .await
        .expect("launch ok");
    assert_eq!(operation_id, "op-17");
}

#[tokio::test]
async fn progress_report_decodes_retry_hint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Games/update-progress/op-17"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "progress": 42,
            "phase": "Fetching",
            "message": "12 of 30 games",
            "retryAfterSeconds": 2.5
        })))
        .mount(&server)
        .await;

    let report = api_for(&server)
        .update_progress("op-17")
        .await
        .expect("progress ok");
    assert_eq!(report.percent(), 42);
    assert_eq!(report.phase, "Fetching");
    assert_eq!(report.retry_after_seconds, Some(2.5));
}

#[tokio::test]
async fn result_keeps_unknown_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Games/update-result/op-17"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "updatedCount": 3,
            "skippedCount": 1,
            "failed": 0,
            "failedAppIds": []
        })))
        .mount(&server)
        .await;

    let result = api_for(&server)
        .update_result("op-17")
        .await
        .expect("result ok");
    assert_eq!((result.updated, result.skipped, result.failed), (3, 1, 0));
    assert!(result.details.contains_key("failedAppIds"));
}

#[tokio::test]
async fn missing_resource_maps_to_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Games/update-progress/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .update_progress("gone")
        .await
        .expect_err("404 is an error");
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
    assert!(err.message.contains("404"), "{}", err.message);
}

#[tokio::test]
async fn malformed_json_maps_to_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/games"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = api_for(&server).games().await.expect_err("not json");
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn games_decode_store_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/games"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "appid": 440,
            "name": "Team Fortress 2",
            "is_free": true,
            "categories": [{"id": 1, "description": "Multi-player"}],
            "ownedBy": ["1", "2"]
        }])))
        .mount(&server)
        .await;

    let games = api_for(&server).games().await.expect("games ok");
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].owner_count(), 2);
    assert!(games[0].has_category("Multi-player"));
    assert_eq!(games[0].price(), 0);
}

#[tokio::test]
async fn usernames_post_the_id_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Games/get-usernames"))
        .and(body_json(json!(["1", "2"])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "1": {"username": "gaben", "nickname": "Gabe"},
            "2": {"username": "robin"}
        })))
        .mount(&server)
        .await;

    let names = api_for(&server)
        .usernames(&["1".to_string(), "2".to_string()])
        .await
        .expect("usernames ok");
    assert_eq!(names["1"].nickname.as_deref(), Some("Gabe"));
    assert_eq!(names["2"].nickname, None);
}

#[tokio::test]
async fn save_mapping_posts_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Games/add-or-update-user-mapping"))
        .and(body_json(json!({
            "steamId": "3",
            "username": "newbie",
            "nickname": null
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server)
        .save_user_mapping(&UserMapping {
            steam_id: "3".into(),
            username: "newbie".into(),
            nickname: None,
        })
        .await
        .expect("save ok");
}

#[tokio::test]
async fn delete_quote_percent_encodes_the_id() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/Quotes/a%20b"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server).delete_quote("a b").await.expect("delete ok");
}

#[tokio::test]
async fn api_root_with_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hub/api/Version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "backendVersion": "v1.2.0",
            "latestBackendGitTag": "v1.3.0"
        })))
        .mount(&server)
        .await;

    let api = ReqwestHubApi::new(ApiSettings::new(format!("{}/hub/", server.uri())))
        .expect("valid api root");
    let version = api.version().await.expect("version ok");
    assert_eq!(version.backend_version.as_deref(), Some("v1.2.0"));
    assert_eq!(version.latest_frontend_git_tag, None);
}

#[tokio::test]
async fn request_timeout_maps_to_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Quotes/daily"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let mut settings = ApiSettings::new(server.uri());
    settings.request_timeout = Some(Duration::from_millis(100));
    let api = ReqwestHubApi::new(settings).expect("valid api root");
    let err = api.daily_quote().await.expect_err("times out");
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[test]
fn invalid_api_root_is_rejected() {
    let err = ReqwestHubApi::new(ApiSettings::new("not a url")).expect_err("invalid");
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
