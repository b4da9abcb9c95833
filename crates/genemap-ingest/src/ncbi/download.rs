//! Download with retry and progress reporting

use super::{DEFAULT_GENE_INFO_URL, DEFAULT_HISTORY_URL, DEFAULT_TAXON_ID};
use crate::source::open_source;
use futures::StreamExt;
use genemap_common::{GenemapError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone)]
pub struct DownloadConfig {
    pub gene_info_url: String,
    pub history_url: String,
    pub timeout: Duration,
    /// Extra attempts after the first failure
    pub retries: u32,
    /// Delay before retry `n` is `backoff * n`
    pub backoff: Duration,
    /// Narrow the history ledger to this taxon; `None` keeps every species
    pub taxon_id: Option<u32>,
    pub show_progress: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            gene_info_url: DEFAULT_GENE_INFO_URL.to_string(),
            history_url: DEFAULT_HISTORY_URL.to_string(),
            timeout: Duration::from_secs(300),
            retries: 3,
            backoff: Duration::from_secs(2),
            taxon_id: Some(DEFAULT_TAXON_ID),
            show_progress: true,
        }
    }
}

/// Local paths of a completed download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFiles {
    pub gene_info: PathBuf,
    pub history: PathBuf,
}

struct FetchError {
    error: GenemapError,
    retryable: bool,
}

impl FetchError {
    fn transient(error: GenemapError) -> Self {
        Self { error, retryable: true }
    }

    fn fatal(error: GenemapError) -> Self {
        Self { error, retryable: false }
    }
}

pub struct NcbiDownloader {
    client: reqwest::Client,
    config: DownloadConfig,
}

impl NcbiDownloader {
    pub fn new(config: DownloadConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("genemap/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GenemapError::network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// Fetch both source tables into `dir`
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub async fn fetch_all(&self, dir: impl AsRef<Path>) -> Result<DownloadedFiles> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let gene_info = dir.join(file_name_from_url(&self.config.gene_info_url, "gene_info.gz"));
        self.download_file(&self.config.gene_info_url, &gene_info).await?;

        let raw_history = dir.join(file_name_from_url(&self.config.history_url, "gene_history.gz"));
        self.download_file(&self.config.history_url, &raw_history).await?;

        let history = match self.config.taxon_id {
            Some(taxon) => {
                let narrowed = dir.join(format!("gene_history_{taxon}.tsv"));
                let kept = narrow_history(&raw_history, &narrowed, taxon)?;
                std::fs::remove_file(&raw_history)?;
                info!(taxon, rows = kept, "history narrowed to taxon");
                narrowed
            },
            None => raw_history,
        };

        Ok(DownloadedFiles { gene_info, history })
    }

    /// Download `url` to `output`, retrying transient failures. Returns the
    /// number of bytes written.
    pub async fn download_file(&self, url: &str, output: &Path) -> Result<u64> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.download_once(url, output).await {
                Ok(bytes) => {
                    info!(url, bytes, attempt, "download complete");
                    return Ok(bytes);
                },
                Err(failure) if failure.retryable && attempt <= self.config.retries => {
                    let delay = self.config.backoff * attempt;
                    warn!(url, attempt, ?delay, error = %failure.error, "download failed, retrying");
                    tokio::time::sleep(delay).await;
                },
                Err(failure) => return Err(failure.error),
            }
        }
    }

    async fn download_once(&self, url: &str, output: &Path) -> std::result::Result<u64, FetchError> {
        let network = |e: reqwest::Error| GenemapError::network(format!("{url}: {e}"));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transient(network(e)))?;

        let status = response.status();
        if !status.is_success() {
            let error = GenemapError::network(format!("GET {url} returned {status}"));
            return Err(if status.is_server_error() {
                FetchError::transient(error)
            } else {
                FetchError::fatal(error)
            });
        }

        let pb = self.progress_bar(response.content_length(), output);
        let partial = output.with_extension("part");
        let mut file = tokio::fs::File::create(&partial)
            .await
            .map_err(|e| FetchError::fatal(e.into()))?;

        let mut downloaded = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| FetchError::transient(network(e)))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| FetchError::fatal(e.into()))?;
            downloaded += chunk.len() as u64;
            pb.set_position(downloaded);
        }
        file.flush().await.map_err(|e| FetchError::fatal(e.into()))?;
        drop(file);

        tokio::fs::rename(&partial, output)
            .await
            .map_err(|e| FetchError::fatal(e.into()))?;
        pb.finish_and_clear();
        debug!(path = %output.display(), bytes = downloaded, "written");
        Ok(downloaded)
    }

    fn progress_bar(&self, total: Option<u64>, output: &Path) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(total.unwrap_or(0));
        let style = ProgressStyle::default_bar()
            .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb.set_message(format!(
            "Downloading {}",
            output.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
        ));
        pb
    }
}

/// Last path segment of `url`, or `fallback` when there is none
fn file_name_from_url(url: &str, fallback: &str) -> String {
    url.rsplit('/')
        .next()
        .map(|segment| segment.split('?').next().unwrap_or(segment))
        .filter(|segment| !segment.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// Copy the header and every `taxon` row of a (possibly gzipped) history
/// ledger to `dst`. Returns the number of data rows kept.
pub fn narrow_history(src: &Path, dst: &Path, taxon: u32) -> Result<usize> {
    let reader = BufReader::new(open_source(src)?);
    let mut writer = BufWriter::new(File::create(dst)?);
    let prefix = format!("{taxon}\t");
    let mut kept = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if idx == 0 || line.starts_with(&prefix) {
            writeln!(writer, "{line}")?;
            if idx > 0 {
                kept += 1;
            }
        }
    }
    writer.flush()?;
    Ok(kept)
}
