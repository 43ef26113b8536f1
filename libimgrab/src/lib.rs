//! Fetches a set of web pages, extracts every `<img>` reference and persists
//! the referenced images to a destination directory, reporting progress and
//! honoring cooperative cancellation at page boundaries.

use crate::download::{fetch_page, persist_image};
use crate::link::get_image_links;
use crate::session::Session;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use tokio::sync::mpsc::Sender;
use url::Url;

mod cancel;
mod download;
mod errors;
mod link;
mod session;

pub use cancel::CancelToken;
pub use errors::ImgrabError;
pub use session::Phase;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36";

/// What to download and where to put it. Immutable for the whole run.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// Pages to scan for images, processed in input order.
    pub page_urls: Vec<String>,
    /// Destination directory for the downloaded images.
    pub dest_dir: String,
    /// Optional sub folder created under the destination directory.
    pub folder_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DownloadRule {
    /// Timeout applied to each page and image request.
    pub request_timeout: Duration,
}

impl Default for DownloadRule {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug)]
pub enum Update {
    ProgressUpdate(Progress),
    StatusUpdate(Message),
}

/// Sent after every persisted image.
#[derive(Debug)]
pub struct Progress {
    /// `floor(images_done / images_discovered * 100)`. The denominator grows
    /// as pages are processed, so this can drop when a new page is scanned.
    pub percent: u8,
    pub images_done: u64,
    pub images_discovered: u64,
}

/// Sent on cancellation acknowledgment and on terminal outcomes.
#[derive(Debug)]
pub struct Message {
    pub content: String,
    pub is_error: bool,
}

/// Terminal outcome of a session that did not fail. Cancellation is a normal
/// outcome, reported apart from errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Cancelled,
}

impl Outcome {
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Completed => "Image download completed successfully.",
            Outcome::Cancelled => "Download cancelled.",
        }
    }
}

/// Run one download session to a terminal state. Sequential from its own
/// point of view, callers wanting a live UI spawn it on a background task.
/// Updates arrive on `update_tx` from that task, the caller is responsible
/// for marshaling them onto its own execution context.
#[tracing::instrument(skip(update_tx))]
pub async fn init_download(
    request: &DownloadRequest,
    rule: DownloadRule,
    update_tx: Sender<Update>,
    cancel: CancelToken,
) -> Result<Outcome, ImgrabError> {
    let mut session = Session::new();
    let result = run_session(request, rule, &mut session, &update_tx, &cancel).await;
    match &result {
        Ok(outcome) => {
            session.finish(match outcome {
                Outcome::Completed => Phase::Completed,
                Outcome::Cancelled => Phase::Cancelled,
            });
            send_status(&update_tx, outcome.message(), false).await;
        }
        Err(e) => {
            session.finish(Phase::Failed);
            send_status(&update_tx, e.to_string(), true).await;
        }
    }
    tracing::info!(
        "Session finished as {:?} with {}/{} images",
        session.phase(),
        session.images_done(),
        session.images_discovered()
    );
    result
}

async fn run_session(
    request: &DownloadRequest,
    rule: DownloadRule,
    session: &mut Session,
    update_tx: &Sender<Update>,
    cancel: &CancelToken,
) -> Result<Outcome, ImgrabError> {
    // Every url must be valid before any network or filesystem activity.
    // A single bad url rejects the whole request.
    let page_urls = validate_urls(&request.page_urls)?;

    let mut dest_dir = PathBuf::from(&request.dest_dir);
    if let Some(folder_name) = &request.folder_name {
        dest_dir.push(folder_name);
    }
    if let Err(e) = fs::create_dir_all(&dest_dir).await {
        tracing::error!("Failed to create destination directory\nError : {}", e);
        return Err(ImgrabError::ErrorCreatingDestinationDirectory(e.to_string()));
    }

    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(rule.request_timeout)
        .build()
        .unwrap();

    session.begin();

    for page_url in &page_urls {
        if cancel.is_cancelled() {
            tracing::info!("Cancellation requested, stopping before {}", page_url);
            return Ok(Outcome::Cancelled);
        }

        let html = fetch_page(&client, page_url).await?;
        let image_refs = get_image_links(&html, page_url);
        session.record_discovered(image_refs.len());

        for image_ref in image_refs {
            let file_path = persist_image(&client, &image_ref.resolved, &dest_dir).await?;
            tracing::debug!(
                "Saved {} from page {} @ {}",
                image_ref.raw_src,
                page_url,
                file_path.to_string_lossy()
            );
            if let Some(percent) = session.record_completed() {
                let _ = update_tx
                    .send(Update::ProgressUpdate(Progress {
                        percent,
                        images_done: session.images_done(),
                        images_discovered: session.images_discovered(),
                    }))
                    .await;
            }
        }
    }

    Ok(Outcome::Completed)
}

/// Valid means an absolute url with a non-empty scheme and a host. No scheme
/// allow-list beyond that.
fn validate_urls(raw_urls: &[String]) -> Result<Vec<Url>, ImgrabError> {
    raw_urls
        .iter()
        .map(|raw| match Url::parse(raw) {
            Ok(url) if url.has_host() => Ok(url),
            _ => Err(ImgrabError::InvalidUrl(raw.clone())),
        })
        .collect()
}

async fn send_status(update_tx: &Sender<Update>, content: impl Into<String>, is_error: bool) {
    let _ = update_tx
        .send(Update::StatusUpdate(Message {
            content: content.into(),
            is_error,
        }))
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_without_a_host_are_invalid() {
        let raw = vec![
            "https://example.com/a".to_string(),
            "mailto:someone@example.com".to_string(),
        ];
        assert_eq!(
            validate_urls(&raw),
            Err(ImgrabError::InvalidUrl(
                "mailto:someone@example.com".to_string()
            ))
        );
    }

    #[test]
    fn relative_urls_are_invalid() {
        let raw = vec!["imgs/page.html".to_string()];
        assert!(matches!(
            validate_urls(&raw),
            Err(ImgrabError::InvalidUrl(_))
        ));
    }

    #[test]
    fn valid_urls_parse_in_order() {
        let raw = vec![
            "https://example.com/a".to_string(),
            "http://example.org/b".to_string(),
        ];
        let parsed = validate_urls(&raw).unwrap();
        assert_eq!(parsed[0].as_str(), "https://example.com/a");
        assert_eq!(parsed[1].as_str(), "http://example.org/b");
    }
}
