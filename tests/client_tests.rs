/// Integration tests for the YAPI client against a wiremock server
/// Tests envelope decoding, error classification, and the interface fetch fallbacks
use apihub_sync::remote::{RemoteSource, YapiClient};
use apihub_sync::Error;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";

fn client(server: &MockServer) -> YapiClient {
    YapiClient::with_http_client(&server.uri(), TOKEN, reqwest::Client::new())
}

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "errcode": 0, "errmsg": "成功！", "data": data }))
}

fn interface(id: i64, catid: i64, title: &str) -> Value {
    json!({
        "_id": id, "project_id": 11, "catid": catid,
        "path": format!("/things/{}", id), "title": title, "method": "GET",
        "status": "done", "req_params": [], "req_headers": [], "res_body": "", "desc": "", "up_time": 1700000000
    })
}

async fn mount_categories(server: &MockServer, categories: Value) {
    Mock::given(method("GET"))
        .and(path("/api/interface/getCatMenu"))
        .and(query_param("project_id", "11"))
        .and(query_param("token", TOKEN))
        .respond_with(ok(categories))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_get_project_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/project/get"))
        .and(query_param("project_id", "11"))
        .and(query_param("token", TOKEN))
        .respond_with(ok(json!({ "_id": 11, "name": "Shop", "basepath": "/v1" })))
        .expect(1)
        .mount(&server)
        .await;

    let project = client(&server)
        .get_project(11, &CancellationToken::new())
        .await
        .expect("project should load");
    assert_eq!(project.id, 11);
    assert_eq!(project.name, "Shop");
    assert_eq!(project.base_path, "/v1");
    assert_eq!(client(&server).base_url(), format!("{}/api", server.uri()));
}

#[tokio::test]
async fn test_application_error_is_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/interface/getCatMenu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errcode": 40011, "errmsg": "请登录...", "data": null })))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_categories(11, &CancellationToken::new())
        .await
        .unwrap_err();
    match err {
        Error::RemoteError { code, message } => {
            assert_eq!(code, 40011);
            assert_eq!(message, "请登录...");
        }
        other => panic!("expected RemoteError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_payload_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/project/get"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = client(&server)
        .test_connection(11, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DecodeError(_)), "got {:?}", err);
    assert!(err.is_preflight());
}

#[tokio::test]
async fn test_unreachable_host_is_connection_failed() {
    let client = YapiClient::with_http_client("http://127.0.0.1:1", TOKEN, reqwest::Client::new());
    let err = client
        .get_project(11, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ConnectionFailed(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_interfaces_by_category_swallow_failing_category() {
    let server = MockServer::start().await;
    mount_categories(&server, json!([
        { "_id": 1, "name": "Users", "project_id": 11, "order": 0 },
        { "_id": 2, "name": "Broken", "project_id": 11, "order": 1 },
        { "_id": 3, "name": "Orders", "project_id": 11, "order": 2 }
    ]))
    .await;

    Mock::given(method("GET"))
        .and(path("/api/interface/list_cat"))
        .and(query_param("catid", "1"))
        .respond_with(ok(json!({ "count": 2, "list": [interface(10, 1, "List users"), interface(11, 1, "Get user")] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/interface/list_cat"))
        .and(query_param("catid", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/interface/list_cat"))
        .and(query_param("catid", "3"))
        .respond_with(ok(json!({ "count": 1, "list": [interface(30, 3, "List orders")] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/interface/get_list"))
        .respond_with(ok(json!({ "count": 0, "list": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let interfaces = client(&server)
        .get_interfaces(11, &CancellationToken::new())
        .await
        .expect("best-effort fetch should succeed");
    let titles: Vec<&str> = interfaces.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["List users", "Get user", "List orders"]);
}

#[tokio::test]
async fn test_paginated_fallback_when_categories_yield_nothing() {
    let server = MockServer::start().await;
    mount_categories(&server, json!([{ "_id": 1, "name": "Users", "project_id": 11, "order": 0 }])).await;

    Mock::given(method("GET"))
        .and(path("/api/interface/list_cat"))
        .respond_with(ok(json!({ "count": 0, "list": [] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/interface/get_list"))
        .and(query_param("project_id", "11"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "100"))
        .respond_with(ok(json!({ "count": 3, "list": [interface(1, 1, "a"), interface(2, 1, "b")] })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/interface/get_list"))
        .and(query_param("page", "2"))
        .respond_with(ok(json!({ "count": 3, "list": [interface(3, 1, "c")] })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/interface/get_list"))
        .and(query_param("page", "3"))
        .respond_with(ok(json!({ "count": 3, "list": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let interfaces = client(&server)
        .get_interfaces(11, &CancellationToken::new())
        .await
        .expect("fallback should succeed");
    assert_eq!(interfaces.len(), 3);
}

#[tokio::test]
async fn test_paginated_fallback_stops_on_empty_page() {
    let server = MockServer::start().await;
    mount_categories(&server, json!([])).await;

    Mock::given(method("GET"))
        .and(path("/api/interface/get_list"))
        .and(query_param("page", "1"))
        .respond_with(ok(json!({ "count": 50, "list": [interface(1, 1, "a")] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/interface/get_list"))
        .and(query_param("page", "2"))
        .respond_with(ok(json!({ "count": 50, "list": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let interfaces = client(&server)
        .get_interfaces(11, &CancellationToken::new())
        .await
        .expect("short listing is still a success");
    assert_eq!(interfaces.len(), 1);
}

#[tokio::test]
async fn test_failed_fallback_reports_no_interfaces() {
    let server = MockServer::start().await;
    mount_categories(&server, json!([{ "_id": 1, "name": "Users", "project_id": 11, "order": 0 }])).await;

    Mock::given(method("GET"))
        .and(path("/api/interface/list_cat"))
        .respond_with(ok(json!({ "count": 0, "list": [] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/interface/get_list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errcode": 40022, "errmsg": "no permission" })))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_interfaces(11, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoInterfaces), "got {:?}", err);
}

#[tokio::test]
async fn test_overview_counts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/project/get"))
        .respond_with(ok(json!({ "_id": 11, "name": "Shop" })))
        .mount(&server)
        .await;
    mount_categories(&server, json!([{ "_id": 1, "name": "Users", "project_id": 11, "order": 0 }])).await;
    Mock::given(method("GET"))
        .and(path("/api/interface/list_cat"))
        .respond_with(ok(json!({ "count": 2, "list": [interface(1, 1, "a"), interface(2, 1, "b")] })))
        .mount(&server)
        .await;

    let overview = client(&server)
        .overview(11, &CancellationToken::new())
        .await
        .expect("overview should load");
    assert_eq!(overview.project.name, "Shop");
    assert_eq!(overview.categories.len(), 1);
    assert_eq!(overview.total_interfaces, 2);
}

#[tokio::test]
async fn test_cancelled_token_skips_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/project/get"))
        .respond_with(ok(json!({ "_id": 11, "name": "Shop" })))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = client(&server).get_project(11, &cancel).await.unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}

#[tokio::test]
async fn test_null_fields_do_not_drop_category() {
    let server = MockServer::start().await;
    mount_categories(&server, json!([{ "_id": 1, "name": "Users", "project_id": 11, "order": 0 }])).await;

    let mut sparse = interface(2, 1, "Get user");
    sparse["desc"] = Value::Null;
    sparse["res_body"] = Value::Null;
    Mock::given(method("GET"))
        .and(path("/api/interface/list_cat"))
        .and(query_param("catid", "1"))
        .respond_with(ok(json!({ "count": 2, "list": [interface(1, 1, "List users"), sparse] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/interface/get_list"))
        .respond_with(ok(json!({ "count": 0, "list": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let interfaces = client(&server)
        .get_interfaces(11, &CancellationToken::new())
        .await
        .expect("nullable fields should decode");
    assert_eq!(interfaces.len(), 2, "a null field must not drop the whole category");
    assert_eq!(interfaces[1].desc, "");
}
