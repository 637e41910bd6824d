//! Producer/consumer download pipeline.
//!
//! One task enumerates beatmapsets onto a bounded queue while another drains
//! it, downloading one archive at a time from the mirror with a fixed pause
//! between attempts.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use indicatif::ProgressBar;
use rand::Rng;
use reqwest::Response;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Semaphore;
use tokio::time::sleep;

use crate::api::Beatmapset;
use crate::download::mirror::MirrorClient;
use crate::download::state::DownloadSummary;
use crate::error::{Error, Result};
use crate::fs::beatmapset_filename;
use crate::output::{create_item_bar, print_success, print_warning};

/// Pause after every mirror request, in milliseconds. The mirror allows
/// roughly five requests per second.
const THROTTLE_MS: std::ops::RangeInclusive<u64> = 300..=350;

/// Receiving half of the download queue.
pub struct QueueReceiver {
    rx: mpsc::Receiver<Beatmapset>,
    enqueued: Arc<AtomicU64>,
}

/// Sending half of the download queue, handed to the producer.
pub struct QueueSender {
    tx: mpsc::Sender<Beatmapset>,
    enqueued: Arc<AtomicU64>,
}

/// Create a queue with room for `expected` beatmapsets.
///
/// With an accurate `expected` the producer never waits on the consumer.
pub fn queue(expected: usize) -> (QueueSender, QueueReceiver) {
    let (tx, rx) = mpsc::channel(expected.clamp(1, Semaphore::MAX_PERMITS));
    let enqueued = Arc::new(AtomicU64::new(0));
    (
        QueueSender {
            tx,
            enqueued: Arc::clone(&enqueued),
        },
        QueueReceiver { rx, enqueued },
    )
}

impl QueueSender {
    /// Enqueue a beatmapset, waiting for room if the queue is full.
    pub async fn push(&self, beatmapset: Beatmapset) -> Result<()> {
        match self.tx.try_send(beatmapset) {
            Ok(()) => {}
            Err(TrySendError::Full(beatmapset)) => {
                tracing::warn!(
                    "Download queue full at {} items, declared counts are probably stale",
                    self.tx.max_capacity()
                );
                self.tx
                    .send(beatmapset)
                    .await
                    .map_err(|_| Error::Pipeline("download queue closed".into()))?;
            }
            Err(TrySendError::Closed(_)) => {
                return Err(Error::Pipeline("download queue closed".into()));
            }
        }

        self.enqueued.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

impl QueueReceiver {
    /// Next beatmapset, or `None` once the producer is done and the queue is empty.
    pub async fn recv(&mut self) -> Option<Beatmapset> {
        self.rx.recv().await
    }

    /// Number of beatmapsets pushed so far. Final once `recv` returned `None`.
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }
}

/// Consumer side: downloads queued beatmapsets into `output_dir`.
pub struct Downloader {
    mirror: MirrorClient,
    output_dir: PathBuf,
    show_progress: bool,
}

impl Downloader {
    pub fn new(mirror: MirrorClient, output_dir: PathBuf) -> Self {
        Self {
            mirror,
            output_dir,
            show_progress: true,
        }
    }

    /// Hide the progress bar (used in tests and quiet runs).
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Drain the queue until the producer is done and every item is handled.
    ///
    /// Mirror failures are counted and skipped. A failure to write to disk
    /// stops the run.
    pub async fn consume(&self, mut rx: QueueReceiver, expected: usize) -> Result<DownloadSummary> {
        let mut summary = DownloadSummary::new(expected as u64);
        let bar = if self.show_progress {
            create_item_bar(summary.total(), "Downloading")
        } else {
            ProgressBar::hidden()
        };

        while let Some(set) = rx.recv().await {
            match self.download_one(&set).await {
                Ok(path) => {
                    summary.record_success();
                    bar.suspend(|| {
                        print_success(&format!(
                            "Downloaded {} ({}/{})",
                            path.file_name()
                                .map(|n| n.to_string_lossy().into_owned())
                                .unwrap_or_else(|| set.id.to_string()),
                            summary.downloaded,
                            summary.total()
                        ))
                    });
                }
                Err(e @ Error::Filesystem { .. }) => {
                    bar.abandon();
                    print_warning(&format!("{} failed, please download manually.", set.id));
                    return Err(e);
                }
                Err(e) => {
                    summary.record_failure(set.id);
                    tracing::warn!("{}", e);
                    bar.suspend(|| {
                        print_warning(&format!("{} failed, please download manually.", set.id))
                    });
                }
            }

            bar.set_length(summary.total());
            bar.set_position(summary.processed());

            let delay_ms = rand::thread_rng().gen_range(THROTTLE_MS);
            sleep(Duration::from_millis(delay_ms)).await;
        }

        bar.finish_and_clear();

        // Declared counts overlap across categories and may be stale; the
        // final total is what was actually queued.
        let enqueued = rx.enqueued();
        if enqueued != summary.expected {
            tracing::info!(
                "{} unique beatmapsets queued, profile declared {}",
                enqueued,
                summary.expected
            );
        }
        summary.expected = enqueued;

        Ok(summary)
    }

    /// Fetch one archive and write it under its sanitized name.
    async fn download_one(&self, set: &Beatmapset) -> Result<PathBuf> {
        let filename = beatmapset_filename(set)?;
        let response = self.mirror.fetch(set.id).await?;
        let path = self.output_dir.join(filename);
        write_response(set.id, response, &path).await?;
        Ok(path)
    }
}

/// Stream a response body to `path`, overwriting any existing file.
async fn write_response(beatmapset_id: u64, response: Response, path: &Path) -> Result<()> {
    let fs_err = |source| Error::Filesystem {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::create(path).await.map_err(fs_err)?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                drop(file);
                // Don't leave a truncated archive behind.
                let _ = tokio::fs::remove_file(path).await;
                return Err(Error::Download(format!(
                    "{}: stream error: {}",
                    beatmapset_id, e
                )));
            }
        };
        file.write_all(&chunk).await.map_err(fs_err)?;
    }

    file.flush().await.map_err(fs_err)?;
    Ok(())
}

/// Run `producer` and the downloader concurrently over a queue sized for
/// `expected` items.
///
/// The producer receives the sending half and must return once everything is
/// enqueued. If it fails, the consumer is cancelled and the error is returned.
pub async fn run_pipeline<F, Fut>(
    downloader: &Downloader,
    expected: usize,
    producer: F,
) -> Result<DownloadSummary>
where
    F: FnOnce(QueueSender) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let (tx, rx) = queue(expected);
    let ((), summary) = tokio::try_join!(producer(tx), downloader.consume(rx, expected))?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Category;
    use crate::collect::test_support::{beatmapset, user, FakeSource};
    use crate::collect::{AggregationResult, Aggregator, PagePolicy};
    use crate::config::Gamemode;
    use crate::output::format_summary;
    use reqwest::Client;
    use tempfile::TempDir;
    use tokio_test::{assert_err, assert_ok};
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn set(id: u64) -> Beatmapset {
        Beatmapset {
            id,
            user_id: 1,
            artist: "Artist".to_string(),
            title: format!("Song {}", id),
        }
    }

    async fn mirror_ok(server: &MockServer) -> MirrorClient {
        Mock::given(method("GET"))
            .and(path_regex(r"^/d/\d+$"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"osz".to_vec()))
            .mount(server)
            .await;
        MirrorClient::new(Client::new(), &format!("{}/d/", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_queue_push_beyond_capacity_waits_for_consumer() {
        let (tx, mut rx) = queue(1);
        assert_ok!(tx.push(set(1)).await);

        let pusher = tokio::spawn(async move {
            assert_ok!(tx.push(set(2)).await);
        });

        assert_eq!(rx.recv().await.unwrap().id, 1);
        assert_eq!(rx.recv().await.unwrap().id, 2);
        pusher.await.unwrap();
        assert!(rx.recv().await.is_none());
        assert_eq!(rx.enqueued(), 2);
    }

    #[tokio::test]
    async fn test_push_to_closed_queue_fails() {
        let (tx, rx) = queue(2);
        drop(rx);
        assert!(matches!(tx.push(set(1)).await, Err(Error::Pipeline(_))));
    }

    #[tokio::test]
    async fn test_pipeline_writes_sanitized_files() {
        let server = MockServer::start().await;
        let mirror = mirror_ok(&server).await;
        let out = TempDir::new().unwrap();
        let downloader = Downloader::new(mirror, out.path().to_path_buf()).without_progress();

        let mut odd = set(5);
        odd.artist = "A<B>C".to_string();
        odd.title = "x:y/z?".to_string();

        let summary = run_pipeline(&downloader, 1, |tx| async move { tx.push(odd).await })
            .await
            .unwrap();

        assert_eq!(summary.downloaded, 1);
        let written = out.path().join("5 ABC - xyz.osz");
        assert_eq!(std::fs::read(written).unwrap(), b"osz");
    }

    #[tokio::test]
    async fn test_write_failure_is_fatal() {
        let server = MockServer::start().await;
        let mirror = mirror_ok(&server).await;
        let out = TempDir::new().unwrap();
        let missing = out.path().join("does-not-exist");
        let downloader = Downloader::new(mirror, missing).without_progress();

        let err = assert_err!(
            run_pipeline(&downloader, 2, |tx| async move {
                tx.push(set(1)).await?;
                tx.push(set(2)).await
            })
            .await
        );

        assert!(matches!(err, Error::Filesystem { .. }));
    }

    #[tokio::test]
    async fn test_producer_error_aborts_pipeline() {
        let server = MockServer::start().await;
        let mirror = mirror_ok(&server).await;
        let out = TempDir::new().unwrap();
        let downloader = Downloader::new(mirror, out.path().to_path_buf()).without_progress();

        let err = run_pipeline(&downloader, 3, |tx| async move {
            tx.push(set(1)).await?;
            Err(Error::Transport("HTTP 500 on users/1/beatmapsets/loved".into()))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test]
    async fn test_stale_overcount_does_not_hang() {
        let server = MockServer::start().await;
        let mirror = mirror_ok(&server).await;
        let out = TempDir::new().unwrap();
        let downloader = Downloader::new(mirror, out.path().to_path_buf()).without_progress();

        // Ten were announced but only two arrive.
        let summary = run_pipeline(&downloader, 10, |tx| async move {
            tx.push(set(1)).await?;
            tx.push(set(2)).await
        })
        .await
        .unwrap();

        assert_eq!(summary.downloaded, 2);
        assert_eq!(summary.total(), 2);
        assert!(summary.is_complete());
    }

    #[tokio::test]
    async fn test_overlapping_categories_report_unique_total() {
        let server = MockServer::start().await;
        let mirror = mirror_ok(&server).await;
        let out = TempDir::new().unwrap();
        let downloader = Downloader::new(mirror, out.path().to_path_buf()).without_progress();

        // Beatmapset 2 is both a favourite and most played.
        let mut profile = user(1, 2);
        profile.beatmap_playcounts_count = 2;
        let source = FakeSource::new()
            .with_user(profile.clone())
            .with_listing(1, Category::Favourite, vec![beatmapset(1, 9), beatmapset(2, 9)])
            .with_listing(1, Category::MostPlayed, vec![beatmapset(2, 9), beatmapset(3, 9)]);
        let aggregator = Aggregator::new(&source, PagePolicy::Declared);
        let aggregator = &aggregator;
        let profile = &profile;

        let categories = [Category::Favourite, Category::MostPlayed];
        let declared: usize = profile.declared_total(&categories);
        assert_eq!(declared, 4);

        let summary = run_pipeline(&downloader, declared, |tx| async move {
            let mut collected = AggregationResult::new();
            for category in categories {
                let added = aggregator
                    .collect_category(
                        profile.id,
                        category,
                        profile.declared_count(category),
                        Gamemode::Osu,
                        &mut collected,
                    )
                    .await?;
                for set in added {
                    tx.push(set).await?;
                }
            }
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(summary.downloaded, 3);
        assert!(summary.failed.is_empty());
        assert!(summary.is_complete());
        assert_eq!(format_summary(&summary), "Downloaded 3/3 beatmapsets");
    }
}
