use predicates::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn todos_body() -> serde_json::Value {
    serde_json::json!([
        { "userId": 1, "id": 1, "title": "buy milk", "completed": false },
        { "userId": 2, "id": 2, "title": "call the bank", "completed": true },
        { "userId": 1, "id": 3, "title": "water the plants", "completed": false }
    ])
}

fn users_body() -> serde_json::Value {
    serde_json::json!([
        { "id": 1, "name": "Alice", "username": "alice", "email": "alice@example.com" },
        { "id": 2, "name": "Bob", "username": "bob", "email": "bob@example.com" }
    ])
}

async fn mount_collections(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(todos_body()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_body()))
        .mount(server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

fn td_cmd(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("td");
    cmd.env("TD_API_BASE_URL", server.uri());
    cmd.env_remove("TD_OFFLINE");
    cmd.env("TD_CONNECT_TIMEOUT_SECS", "5");
    cmd.env("TD_REQUEST_TIMEOUT_SECS", "5");
    cmd.env("TD_PROBE_TIMEOUT_MILLIS", "500");
    cmd
}

#[tokio::test]
async fn list_renders_rows_with_user_names() {
    let server = MockServer::start().await;
    mount_collections(&server).await;

    let mut cmd = td_cmd(&server);
    cmd.arg("list");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("buy milk by Alice"))
        .stdout(predicate::str::contains("[x] call the bank by Bob"));
}

#[tokio::test]
async fn list_json_prints_the_raw_collection() {
    let server = MockServer::start().await;
    mount_collections(&server).await;

    let mut cmd = td_cmd(&server);
    cmd.args(["list", "--json"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"userId\": 1"))
        .stdout(predicate::str::contains("\"title\": \"buy milk\""));
}

#[tokio::test]
async fn add_posts_and_reports_the_new_id() {
    let server = MockServer::start().await;
    mount_collections(&server).await;
    Mock::given(method("POST"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "userId": 2, "id": 201, "title": "sweep the floor", "completed": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = td_cmd(&server);
    cmd.args(["add", "--user", "Bob", "--title", "sweep the floor"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("created todo 201 for Bob"));
}

#[tokio::test]
async fn add_blank_title_exits_2_without_posting() {
    let server = MockServer::start().await;
    mount_collections(&server).await;
    Mock::given(method("POST"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = td_cmd(&server);
    cmd.args(["add", "--user", "Alice", "--title", "   "]);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("title is empty"));
}

#[tokio::test]
async fn add_unknown_user_exits_2() {
    let server = MockServer::start().await;
    mount_collections(&server).await;
    Mock::given(method("POST"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = td_cmd(&server);
    cmd.args(["add", "--user", "Mallory", "--title", "break in"]);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("user not found: Mallory"));
}

#[tokio::test]
async fn toggle_reports_the_new_state() {
    let server = MockServer::start().await;
    mount_collections(&server).await;
    Mock::given(method("PATCH"))
        .and(path("/todos/1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = td_cmd(&server);
    cmd.args(["toggle", "1"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("todo 1 is now done"));
}

#[tokio::test]
async fn toggle_failure_exits_4_with_the_alert() {
    let server = MockServer::start().await;
    mount_collections(&server).await;
    Mock::given(method("PATCH"))
        .and(path("/todos/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut cmd = td_cmd(&server);
    cmd.args(["toggle", "1"]);
    cmd.assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("check your internet connection"));
}

#[tokio::test]
async fn toggle_offline_exits_3_without_calling() {
    let server = MockServer::start().await;
    mount_collections(&server).await;
    Mock::given(method("PATCH"))
        .and(path("/todos/1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = td_cmd(&server);
    cmd.env("TD_OFFLINE", "1");
    cmd.args(["toggle", "1"]);
    cmd.assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("offline"));
}

#[tokio::test]
async fn toggle_unknown_id_exits_5() {
    let server = MockServer::start().await;
    mount_collections(&server).await;
    Mock::given(method("PATCH"))
        .and(path("/todos/999"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = td_cmd(&server);
    cmd.args(["toggle", "999"]);
    cmd.assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("not_found: todo 999"));
}

#[tokio::test]
async fn rm_deletes_without_loading_the_list() {
    let server = MockServer::start().await;
    // No GET mocks on purpose: rm must not fetch the collections first.
    Mock::given(method("HEAD"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/todos/3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = td_cmd(&server);
    cmd.args(["rm", "3"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("deleted todo 3"));
}

#[tokio::test]
async fn rm_offline_exits_3_without_calling() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/todos/3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = td_cmd(&server);
    cmd.env("TD_OFFLINE", "1");
    cmd.args(["rm", "3"]);
    cmd.assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("cannot delete the task"));
}

#[tokio::test]
async fn load_failure_exits_4_with_the_alert() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_body()))
        .mount(&server)
        .await;

    let mut cmd = td_cmd(&server);
    cmd.arg("list");
    cmd.assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("could not load tasks"))
        .stderr(predicate::str::contains("check your internet connection"));
}

#[test]
fn toggle_rejects_non_numeric_ids() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("td");
    cmd.args(["toggle", "abc"]);
    cmd.assert().failure().code(2);
}
