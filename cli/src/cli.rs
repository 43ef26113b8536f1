use clap::Parser;
use libimgrab::{init_download, CancelToken, DownloadRequest, DownloadRule, Outcome, Update};
use owo_colors::OwoColorize;
use std::time::Duration;
use tokio::sync::mpsc::channel;
use url::Url;

const MAX_BUFFER_SIZE: usize = 100;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "An image scraping utility",
    long_about = "An image scraping utility for downloading every image referenced by a set of web pages."
)]
pub struct Cli {
    #[arg(
        required = true,
        help = "One or more page urls to scan for images, processed in order."
    )]
    urls: Vec<Url>,
    #[arg(short, long, help = "Destination directory for the downloaded images.")]
    output_directory: String,
    #[arg(
        long,
        help = "Optional folder created under the destination directory."
    )]
    folder_name: Option<String>,
    #[arg(
        default_value = "30",
        help = "Request timeout in seconds for page and image fetches.",
        long
    )]
    timeout: u64,
}

pub async fn download(cli: Cli) -> i32 {
    println!("Initializing download....");
    let (tx, mut rx) = channel::<Update>(MAX_BUFFER_SIZE);
    let cancel_token = CancelToken::new();

    let request = DownloadRequest {
        page_urls: cli.urls.iter().map(|url| url.to_string()).collect(),
        dest_dir: cli.output_directory.clone(),
        folder_name: cli.folder_name.clone(),
    };
    let rule = DownloadRule {
        request_timeout: Duration::from_secs(cli.timeout),
    };

    let worker_token = cancel_token.clone();
    let worker =
        tokio::spawn(async move { init_download(&request, rule, tx, worker_token).await });

    let ctrl_c_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\nCancelling after the current page....");
            ctrl_c_token.cancel();
        }
    });

    while let Some(update) = rx.recv().await {
        match update {
            Update::ProgressUpdate(progress) => {
                println!(
                    "[{:>3}%] {} / {} images",
                    progress.percent, progress.images_done, progress.images_discovered
                );
            }
            Update::StatusUpdate(message) => {
                if message.is_error {
                    eprintln!("{}", message.content.red());
                } else {
                    println!("{}", message.content.green());
                }
            }
        };
    }

    match worker.await {
        Ok(Ok(Outcome::Completed)) => {
            println!("Images saved to {}", cli.output_directory);
            0
        }
        Ok(Ok(Outcome::Cancelled)) => 1,
        Ok(Err(e)) => {
            eprintln!("{}", "Download wasn't able to complete".red());
            eprintln!("{e}");
            1
        }
        Err(e) => {
            eprintln!("Download task panicked : {e}");
            1
        }
    }
}
