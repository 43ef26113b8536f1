use crate::errors::ImgrabError;
use chrono::Utc;
use reqwest::Client;
use std::path::{Path, PathBuf};
use url::Url;

/// Fetch one page and return its body as text.
#[tracing::instrument(skip(client))]
pub async fn fetch_page(client: &Client, page_url: &Url) -> Result<String, ImgrabError> {
    let response = match client.get(page_url.as_str()).send().await {
        Err(e) => {
            tracing::error!("Error fetching page {}\nError : {}", page_url, e);
            return Err(ImgrabError::NetworkError {
                url: page_url.to_string(),
                message: e.to_string(),
            });
        }
        Ok(r) => r,
    };
    if !response.status().is_success() {
        tracing::error!(
            "Error status code received : {} |{}|",
            response.status(),
            page_url
        );
        return Err(ImgrabError::ErrorStatusCode {
            status_code: response.status().to_string(),
            url: page_url.to_string(),
        });
    }
    match response.text().await {
        Err(e) => {
            tracing::error!("Error reading page body from {}\nError : {}", page_url, e);
            Err(ImgrabError::NetworkError {
                url: page_url.to_string(),
                message: e.to_string(),
            })
        }
        Ok(body) => Ok(body),
    }
}

/// Fetch one image and write it into `dest_dir`, named from the url's final
/// path segment. An existing file of the same name is overwritten, no
/// collision detection or renaming. Returns the path of the written file.
#[tracing::instrument(skip(client))]
pub async fn persist_image(
    client: &Client,
    image_url: &Url,
    dest_dir: &Path,
) -> Result<PathBuf, ImgrabError> {
    let response = match client.get(image_url.as_str()).send().await {
        Err(e) => {
            tracing::error!("Error downloading image from {}\nError : {}", image_url, e);
            return Err(ImgrabError::NetworkError {
                url: image_url.to_string(),
                message: e.to_string(),
            });
        }
        Ok(r) => r,
    };
    if !response.status().is_success() {
        tracing::error!(
            "Error status code received : {} |{}|",
            response.status(),
            image_url
        );
        return Err(ImgrabError::ErrorStatusCode {
            status_code: response.status().to_string(),
            url: image_url.to_string(),
        });
    }
    let bytes = match response.bytes().await {
        Err(e) => {
            tracing::error!("Error reading image bytes from {}\nError : {}", image_url, e);
            return Err(ImgrabError::NetworkError {
                url: image_url.to_string(),
                message: e.to_string(),
            });
        }
        Ok(b) => b,
    };

    let file_path = dest_dir.join(get_file_name(image_url));
    if let Err(e) = tokio::fs::write(&file_path, &bytes).await {
        tracing::error!(
            "Error writing to destination file {}\nError : {} | {}",
            file_path.to_string_lossy(),
            e,
            e.kind()
        );
        return Err(ImgrabError::FileOperationError {
            file_name: file_path.to_string_lossy().to_string(),
            message: format!("{} | {}", e, e.kind()),
        });
    }
    tracing::debug!(
        "Download completed for {}, file @ {}",
        image_url,
        file_path.to_string_lossy()
    );
    Ok(file_path)
}

/// Derive the file name from the url's final path segment. Query strings are
/// not part of the path, so they never leak into the name.
#[tracing::instrument]
fn get_file_name(image_url: &Url) -> String {
    let file_name = image_url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");
    if file_name.is_empty() {
        tracing::warn!(
            "File name can't be determined, using generic name. {}",
            image_url
        );
        format!("file-{time}", time = Utc::now().time())
    } else {
        file_name.to_string()
    }
}
