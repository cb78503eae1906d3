//! MinIO backend tests against a real server.
//!
//! Requires Docker for testcontainers: `cargo test -p imgvault-storage -- --ignored`

use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::Client;
use imgvault_core::constants::{MINIO_REGION, OBJECT_CACHE_CONTROL};
use imgvault_core::MinioConfig;
use imgvault_storage::{MinioStorage, Storage};
use std::io::Write;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::minio::MinIO;

const BUCKET: &str = "images";

async fn start_minio() -> (MinioConfig, ContainerAsync<MinIO>) {
    let container = MinIO::default()
        .start()
        .await
        .expect("Failed to start minio container");
    let port = container
        .get_host_port_ipv4(9000)
        .await
        .expect("Failed to resolve minio port");

    let config = MinioConfig {
        endpoint: "127.0.0.1".to_string(),
        port: Some(port),
        use_ssl: false,
        access_key: "minioadmin".to_string(),
        secret_key: "minioadmin".to_string(),
        bucket: BUCKET.to_string(),
        direct_urls: true,
    };
    (config, container)
}

/// Independent client for inspecting what the backend wrote.
async fn admin_client(config: &MinioConfig) -> Client {
    let credentials = Credentials::new(
        &config.access_key,
        &config.secret_key,
        None,
        None,
        "minio-test",
    );
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(aws_config::Region::new(MINIO_REGION))
        .credentials_provider(credentials)
        .load()
        .await;
    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .endpoint_url(config.endpoint_url())
        .force_path_style(true)
        .build();
    Client::from_conf(s3_config)
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_ensure_bucket_creates_public_bucket_once() {
    let (config, _container) = start_minio().await;
    let storage = MinioStorage::new(&config).await.expect("client");
    let admin = admin_client(&config).await;

    storage.ensure_bucket().await.expect("first bootstrap");
    storage.ensure_bucket().await.expect("second bootstrap");

    admin
        .head_bucket()
        .bucket(BUCKET)
        .send()
        .await
        .expect("bucket exists");

    let policy = admin
        .get_bucket_policy()
        .bucket(BUCKET)
        .send()
        .await
        .expect("bucket policy");
    let policy: serde_json::Value =
        serde_json::from_str(policy.policy().expect("policy document")).expect("policy json");
    let statement = &policy["Statement"][0];
    assert_eq!(statement["Effect"], "Allow");
    assert!(statement["Action"].to_string().contains("s3:GetObject"));
    assert!(statement["Resource"]
        .to_string()
        .contains(&format!("arn:aws:s3:::{}/*", BUCKET)));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_put_and_remove_object() {
    let (config, _container) = start_minio().await;
    let storage = MinioStorage::new(&config).await.expect("client");
    let admin = admin_client(&config).await;
    storage.ensure_bucket().await.expect("bootstrap");

    let bytes = vec![0x89u8; 4096];
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(&bytes).expect("write temp file");

    let sent = storage
        .put_object("cat.png", file.path(), "image/png")
        .await
        .expect("put");
    assert_eq!(sent, bytes.len() as u64);

    let head = admin
        .head_object()
        .bucket(BUCKET)
        .key("cat.png")
        .send()
        .await
        .expect("object exists");
    assert_eq!(head.content_type(), Some("image/png"));
    assert_eq!(head.cache_control(), Some(OBJECT_CACHE_CONTROL));
    assert_eq!(head.content_length(), Some(bytes.len() as i64));

    let url = storage.object_url("cat.png").await.expect("url");
    assert_eq!(url, format!("{}/{}/cat.png", config.endpoint_url(), BUCKET));

    storage.remove_object("cat.png").await.expect("remove");
    assert!(admin
        .head_object()
        .bucket(BUCKET)
        .key("cat.png")
        .send()
        .await
        .is_err());

    // Missing keys delete cleanly.
    storage.remove_object("cat.png").await.expect("remove again");
}
