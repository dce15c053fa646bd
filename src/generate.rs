//! Offline fake-API generation.
//!
//! Takes a seed file (a JSON array of card objects without images), gives
//! every record an `image` URL from a random-photo API, and writes the result
//! as numbered page files `api-1.json`, `api-2.json`, ... that the viewer
//! can serve through [`crate::source::HttpPageSource`].
//!
//! Image lookups are slow and rate limited, so the merged seed is cached next
//! to the seed file (`initial-data.json` → `initial-data-with-images.json`)
//! and reused until `skip_cache` is set.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::GenerateError;

pub const DEFAULT_BATCH_SIZE: u16 = 10;
pub const DEFAULT_IMAGE_API: &str = "https://api.unsplash.com";
/// Photos requested per image API call.
pub const IMAGE_REFILL: usize = 30;

type SeedRecord = Map<String, Value>;

#[derive(Debug, Clone)]
pub struct ImageApiConfig {
    pub base_url: String,
    pub access_key: Option<String>,
    pub refill: usize,
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub seed: PathBuf,
    pub out_dir: PathBuf,
    pub batch_size: usize,
    pub skip_cache: bool,
    pub images: ImageApiConfig,
}

/// What a [`run`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub records: usize,
    /// Image URLs fetched from the API (0 when the cache was used).
    pub images_fetched: usize,
    pub used_cache: bool,
    pub files: Vec<PathBuf>,
}

// ---------------------------------------------------------------------------
// Image pool
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    small: String,
}

/// A stack of random image URLs, refilled from the API only when empty.
#[derive(Debug)]
pub struct ImagePool {
    client: reqwest::Client,
    config: ImageApiConfig,
    cache: Vec<String>,
    fetched: usize,
}

impl ImagePool {
    pub fn new(config: ImageApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            cache: Vec::new(),
            fetched: 0,
        }
    }

    /// Total URLs received from the API so far.
    pub fn fetched(&self) -> usize {
        self.fetched
    }

    pub async fn next_url(&mut self) -> Result<String, GenerateError> {
        if self.cache.is_empty() {
            self.refill().await?;
        }
        self.cache.pop().ok_or(GenerateError::NoImages)
    }

    async fn refill(&mut self) -> Result<(), GenerateError> {
        let key = self
            .config
            .access_key
            .as_deref()
            .ok_or(GenerateError::MissingAccessKey)?;
        let url = format!("{}/photos/random", self.config.base_url.trim_end_matches('/'));

        let photos: Vec<Photo> = self
            .client
            .get(&url)
            .query(&[("count", self.config.refill)])
            .header(reqwest::header::AUTHORIZATION, format!("Client-ID {key}"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        info!(count = photos.len(), "fetched image URLs");
        self.fetched += photos.len();
        self.cache.extend(photos.into_iter().map(|p| p.urls.small));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// Path of the seed-with-images cache for `seed`.
pub fn cache_path(seed: &Path) -> PathBuf {
    let stem = seed
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "seed".into());
    seed.with_file_name(format!("{stem}-with-images.json"))
}

/// Run the whole job: resolve images, then write the page files.
pub async fn run(config: &GenerateConfig) -> Result<GenerateReport, GenerateError> {
    let cache = cache_path(&config.seed);
    let use_cache = !config.skip_cache && cache.exists();

    let (records, images_fetched) = if use_cache {
        info!(path = %cache.display(), "using cached records with images");
        (read_records(&cache)?, 0)
    } else {
        let mut records = read_records(&config.seed)?;
        let mut pool = ImagePool::new(config.images.clone());
        let total = records.len();
        for (done, record) in records.iter_mut().enumerate() {
            let url = pool.next_url().await?;
            record.insert("image".into(), Value::String(url));
            debug!(done = done + 1, total, "image URL assigned");
        }
        let body = serde_json::to_vec(&records)?;
        fs::write(&cache, body).map_err(|e| GenerateError::io(&cache, e))?;
        info!(path = %cache.display(), total, "wrote records with images");
        (records, pool.fetched())
    };

    let files = write_batches(&records, &config.out_dir, config.batch_size)?;
    Ok(GenerateReport {
        records: records.len(),
        images_fetched,
        used_cache: use_cache,
        files,
    })
}

fn read_records(path: &Path) -> Result<Vec<SeedRecord>, GenerateError> {
    let body = fs::read(path).map_err(|e| GenerateError::io(path, e))?;
    Ok(serde_json::from_slice(&body)?)
}

/// Write `records` as `api-1.json`, `api-2.json`, ... of at most
/// `batch_size` records each.  The last file may be short.
pub fn write_batches(
    records: &[SeedRecord],
    out_dir: &Path,
    batch_size: usize,
) -> Result<Vec<PathBuf>, GenerateError> {
    fs::create_dir_all(out_dir).map_err(|e| GenerateError::io(out_dir, e))?;

    let mut files = Vec::new();
    for (index, batch) in records.chunks(batch_size.max(1)).enumerate() {
        let path = out_dir.join(format!("api-{}.json", index + 1));
        let body = serde_json::to_string_pretty(batch)?;
        fs::write(&path, body).map_err(|e| GenerateError::io(&path, e))?;
        info!(path = %path.display(), records = batch.len(), "page file created");
        files.push(path);
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seed(n: usize) -> Vec<SeedRecord> {
        (0..n)
            .map(|i| {
                let Value::Object(map) = json!({ "title": format!("t{i}"), "date": "d" }) else {
                    unreachable!()
                };
                map
            })
            .collect()
    }

    #[test]
    fn cache_path_sits_next_to_the_seed() {
        let path = cache_path(Path::new("fake-api/sources/initial-data.json"));
        assert_eq!(
            path,
            PathBuf::from("fake-api/sources/initial-data-with-images.json")
        );
    }

    #[test]
    fn batches_are_full_except_the_last() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_batches(&seed(23), dir.path(), 10).unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["api-1.json", "api-2.json", "api-3.json"]);

        let sizes: Vec<usize> = files
            .iter()
            .map(|p| {
                let body = fs::read(p).unwrap();
                serde_json::from_slice::<Vec<Value>>(&body).unwrap().len()
            })
            .collect();
        assert_eq!(sizes, [10, 10, 3]);
    }

    #[test]
    fn batches_keep_record_order() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_batches(&seed(12), dir.path(), 5).unwrap();

        let body = fs::read(&files[1]).unwrap();
        let page: Vec<Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(page[0]["title"], "t5");
        assert_eq!(page[4]["title"], "t9");
    }

    #[test]
    fn empty_seed_writes_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_batches(&[], dir.path(), 10).unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn missing_key_fails_only_when_images_are_needed() {
        let mut pool = ImagePool::new(ImageApiConfig {
            base_url: "http://127.0.0.1:9".into(),
            access_key: None,
            refill: IMAGE_REFILL,
        });
        let err = pool.next_url().await.unwrap_err();
        assert!(matches!(err, GenerateError::MissingAccessKey));
    }
}
