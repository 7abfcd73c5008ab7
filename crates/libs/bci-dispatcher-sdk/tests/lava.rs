use std::sync::Arc;

use bci_config::{Board, BoardCatalog};
use bci_dispatcher_sdk::{
    DeviceStatus, JobStatus, LavaClient, LavaWriter, Scheduler, Writer, prelude::*,
};
use mockito::{Matcher, Server, ServerGuard};

fn board() -> Board {
    BoardCatalog::from_toml(
        r#"
        [boards.beaglebone]
        device_type = "beaglebone-black"
        arch = "arm"
        dt = "am335x-boneblack"
        rootfs = "rootfs_armv7.cpio.gz"
        test_plan = "boot"
        "#,
    )
    .unwrap()
    .get("beaglebone")
    .unwrap()
    .clone()
}

async fn scheduler() -> (ServerGuard, LavaClient) {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v0.2/system/version/")
        .match_header("authorization", "Token secret")
        .with_status(200)
        .with_body(r#"{"version": "2024.09"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/api/v0.2/system/whoami/")
        .match_header("authorization", "Token secret")
        .with_status(200)
        .with_body(r#"{"user": "ci"}"#)
        .create_async()
        .await;
    let client = LavaClient::connect(&server.url(), "ci", "secret")
        .await
        .unwrap();
    (server, client)
}

fn device(health: &str, state: &str) -> String {
    format!(r#"{{"hostname": "beaglebone-black_01", "health": "{health}", "state": "{state}"}}"#)
}

#[tokio::test]
async fn connect_checks_the_user() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v0.2/system/version/")
        .with_status(200)
        .with_body(r#"{"version": "2024.09"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/api/v0.2/system/whoami/")
        .with_status(200)
        .with_body(r#"{"user": null}"#)
        .create_async()
        .await;

    let result = LavaClient::connect(&server.url(), "ci", "wrong").await;
    assert!(matches!(result, Err(Error::Unavailable(_))));
}

#[tokio::test]
async fn connect_fails_on_unreachable_scheduler() {
    let result = LavaClient::connect("http://127.0.0.1:1", "ci", "secret").await;
    assert!(matches!(result, Err(Error::Connect { .. })));
}

#[tokio::test]
async fn connect_fails_on_rejected_token() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v0.2/system/version/")
        .with_status(401)
        .create_async()
        .await;

    let result = LavaClient::connect(&server.url(), "ci", "secret").await;
    assert!(matches!(result, Err(Error::Connect { .. })));
}

#[tokio::test]
async fn device_and_job_status() {
    let (mut server, client) = scheduler().await;
    server
        .mock("GET", "/api/v0.2/devices/beaglebone-black_01/")
        .with_status(200)
        .with_body(device("Good", "Running"))
        .create_async()
        .await;
    server
        .mock("GET", "/api/v0.2/jobs/42/")
        .with_status(200)
        .with_body(r#"{"id": 42, "state": "Finished", "health": "Incomplete"}"#)
        .create_async()
        .await;

    assert_eq!(
        client.device_status("beaglebone-black_01").await.unwrap(),
        DeviceStatus::Running
    );
    assert_eq!(client.job_status("42").await.unwrap(), JobStatus::Incomplete);
}

#[tokio::test]
async fn submitted_jobs_return_ids() {
    let (mut server, client) = scheduler().await;
    server
        .mock("GET", "/api/v0.2/devices/beaglebone-black_01/")
        .with_status(200)
        .with_body(device("Good", "Idle"))
        .create_async()
        .await;
    let submit = server
        .mock("POST", "/api/v0.2/jobs/")
        .match_header("authorization", "Token secret")
        .match_body(Matcher::Json(serde_json::json!({"definition": "job: text\n"})))
        .with_status(201)
        .with_body(r#"{"message": "job(s) successfully submitted", "job_ids": 1234}"#)
        .create_async()
        .await;

    let writer = LavaWriter::new(Arc::new(client), server.url());
    let ids = writer
        .write(&board(), "beaglebone-black--custom_kernel--boot", "job: text\n")
        .await
        .unwrap();

    assert_eq!(ids, vec!["1234"]);
    assert_eq!(
        writer.job_url(&ids[0]),
        format!("{}/scheduler/job/1234", server.url())
    );
    submit.assert_async().await;
}

#[tokio::test]
async fn multinode_jobs_return_every_id() {
    let (mut server, client) = scheduler().await;
    server
        .mock("GET", "/api/v0.2/devices/beaglebone-black_01/")
        .with_status(200)
        .with_body(device("Unknown", "Reserved"))
        .create_async()
        .await;
    server
        .mock("POST", "/api/v0.2/jobs/")
        .with_status(201)
        .with_body(r#"{"job_ids": [1235, "1235.1"]}"#)
        .create_async()
        .await;

    let ids = LavaWriter::new(Arc::new(client), server.url())
        .write(&board(), "multinode", "job: text\n")
        .await
        .unwrap();
    assert_eq!(ids, vec!["1235", "1235.1"]);
}

#[tokio::test]
async fn offline_device_never_submits() {
    let (mut server, client) = scheduler().await;
    server
        .mock("GET", "/api/v0.2/devices/beaglebone-black_01/")
        .with_status(200)
        .with_body(device("Maintenance", "Idle"))
        .create_async()
        .await;
    let submit = server
        .mock("POST", "/api/v0.2/jobs/")
        .expect(0)
        .create_async()
        .await;

    let result = LavaWriter::new(Arc::new(client), server.url())
        .write(&board(), "beaglebone-black--custom_kernel--boot", "job: text\n")
        .await;

    assert!(matches!(result, Err(Error::Unavailable(_))));
    submit.assert_async().await;
}

#[tokio::test]
async fn unknown_device_is_unavailable() {
    let (mut server, client) = scheduler().await;
    server
        .mock("GET", "/api/v0.2/devices/beaglebone-black_01/")
        .with_status(404)
        .create_async()
        .await;

    let result = LavaWriter::new(Arc::new(client), server.url())
        .write(&board(), "job", "job: text\n")
        .await;
    assert!(matches!(result, Err(Error::Unavailable(_))));
}
