//! Integration tests for the fake-API generator.

use std::fs;
use std::path::Path;

use content_cards::generate::{self, GenerateConfig, ImageApiConfig, IMAGE_REFILL};
use content_cards::GenerateError;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn photos(n: usize) -> Value {
    let entries: Vec<Value> = (0..n)
        .map(|i| json!({ "id": format!("p{i}"), "urls": { "small": format!("https://img.test/{i}.jpg"), "full": "ignored" } }))
        .collect();
    Value::Array(entries)
}

async fn mount_photos(server: &MockServer, calls: u64) {
    Mock::given(method("GET"))
        .and(path("/photos/random"))
        .and(query_param("count", "30"))
        .and(header("authorization", "Client-ID test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(photos(IMAGE_REFILL)))
        .expect(calls)
        .mount(server)
        .await;
}

fn write_seed(dir: &Path, n: usize) -> std::path::PathBuf {
    let seed: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "title": format!("Title {i}"),
                "date": "2021-05-02",
                "description": format!("Description {i}"),
            })
        })
        .collect();
    let path = dir.join("initial-data.json");
    fs::write(&path, serde_json::to_vec(&seed).unwrap()).unwrap();
    path
}

fn config(dir: &TempDir, server: &MockServer, n: usize) -> GenerateConfig {
    GenerateConfig {
        seed: write_seed(dir.path(), n),
        out_dir: dir.path().join("out"),
        batch_size: 10,
        skip_cache: false,
        images: ImageApiConfig {
            base_url: server.uri(),
            access_key: Some("test-key".into()),
            refill: IMAGE_REFILL,
        },
    }
}

fn read_page(path: &Path) -> Vec<Value> {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

#[tokio::test]
async fn writes_paged_files_with_images() {
    let server = MockServer::start().await;
    mount_photos(&server, 1).await;
    let dir = TempDir::new().unwrap();
    let config = config(&dir, &server, 25);

    let report = generate::run(&config).await.unwrap();

    assert_eq!(report.records, 25);
    assert_eq!(report.files.len(), 3);
    assert!(!report.used_cache);
    assert_eq!(report.images_fetched, IMAGE_REFILL);

    let sizes: Vec<usize> = report.files.iter().map(|p| read_page(p).len()).collect();
    assert_eq!(sizes, [10, 10, 5]);

    let first = read_page(&dir.path().join("out/api-1.json"));
    assert_eq!(first[0]["title"], "Title 0");
    assert!(first
        .iter()
        .all(|r| r["image"].as_str().is_some_and(|u| u.starts_with("https://img.test/"))));

    assert!(dir.path().join("initial-data-with-images.json").exists());
}

#[tokio::test]
async fn generated_pages_parse_as_content_pages() {
    let server = MockServer::start().await;
    mount_photos(&server, 1).await;
    let dir = TempDir::new().unwrap();
    let report = generate::run(&config(&dir, &server, 10)).await.unwrap();

    let body = fs::read(&report.files[0]).unwrap();
    let page = content_cards::source::parse_page(&body).unwrap();
    assert_eq!(page.records.len(), 10);
    assert_eq!(page.skipped, 0);
}

#[tokio::test]
async fn pool_refills_only_when_empty() {
    let server = MockServer::start().await;
    mount_photos(&server, 2).await;
    let dir = TempDir::new().unwrap();

    let report = generate::run(&config(&dir, &server, 35)).await.unwrap();

    assert_eq!(report.images_fetched, 2 * IMAGE_REFILL);
    assert_eq!(report.files.len(), 4);
}

#[tokio::test]
async fn cached_images_skip_the_api() {
    let server = MockServer::start().await;
    mount_photos(&server, 1).await;
    let dir = TempDir::new().unwrap();
    let config = config(&dir, &server, 12);

    let first = generate::run(&config).await.unwrap();
    let second = generate::run(&config).await.unwrap();

    assert!(second.used_cache);
    assert_eq!(second.images_fetched, 0);
    assert_eq!(
        read_page(&first.files[0])[0]["image"],
        read_page(&second.files[0])[0]["image"]
    );
}

#[tokio::test]
async fn skip_cache_fetches_again() {
    let server = MockServer::start().await;
    mount_photos(&server, 2).await;
    let dir = TempDir::new().unwrap();
    let mut config = config(&dir, &server, 5);

    generate::run(&config).await.unwrap();
    config.skip_cache = true;
    let report = generate::run(&config).await.unwrap();

    assert!(!report.used_cache);
    assert_eq!(report.images_fetched, IMAGE_REFILL);
}

#[tokio::test]
async fn empty_photo_response_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/photos/random"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let err = generate::run(&config(&dir, &server, 3)).await.unwrap_err();
    assert!(matches!(err, GenerateError::NoImages));
}

#[tokio::test]
async fn rejected_key_is_an_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/photos/random"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let err = generate::run(&config(&dir, &server, 3)).await.unwrap_err();
    assert!(matches!(err, GenerateError::Http(_)));
}

#[tokio::test]
async fn missing_seed_reports_the_path() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let mut config = config(&dir, &server, 1);
    config.seed = dir.path().join("nope.json");

    let err = generate::run(&config).await.unwrap_err();
    assert!(err.to_string().contains("nope.json"));
}
