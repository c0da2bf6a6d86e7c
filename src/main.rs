//! WW2 Archive: desktop client for the WW2 image and video archive
//!
//! Talks to the archive backend over HTTP; the backend does the scraping,
//! storage and downloads.
//!
//! Usage:
//!   ww2-archive                - Start the GUI
//!   ww2-archive health         - Check the backend
//!   ww2-archive stats          - Show download statistics
//!   ww2-archive categories     - List categories
//!   ww2-archive search <query> - Search images and videos
//!   ww2-archive help           - Show help

mod app;
mod backend;
mod commands;
mod config;
mod error;
mod format;
mod jobs;
mod native;
mod render;
mod session;
mod state;
mod ui;

use std::env;

use app::ArchiveApp;
use backend::{ArchiveApi, BackendClient};
use config::AppConfig;
use iced::{window, Size};
use render::Rendered;
use session::Session;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> iced::Result {
    init_logging();

    let config = AppConfig::load();
    let args: Vec<String> = env::args().collect();

    if args.len() > 1 {
        return handle_cli_command(&args[1], &args[2..], &config);
    }

    start_gui(config)
}

fn init_logging() {
    // try_init: a second initialization is not an error
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn handle_cli_command(cmd: &str, args: &[String], config: &AppConfig) -> iced::Result {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {}", e);
            return Ok(());
        }
    };
    let api = BackendClient::new(&config.api_base);

    match cmd {
        "health" => {
            rt.block_on(async {
                match api.health().await {
                    Ok(health) => match health.version {
                        Some(version) => println!("Backend is {} (v{})", health.status, version),
                        None => println!("Backend is {}", health.status),
                    },
                    Err(e) => eprintln!("Backend unreachable at {}: {}", api.base_url(), e),
                }
            });
            Ok(())
        }
        "stats" => {
            rt.block_on(async {
                match api.stats().await {
                    Ok(stats) => {
                        println!("Downloaded images: {}", stats.total_downloaded);
                        println!("Total size:        {:.1} MB", stats.total_size_mb);
                    }
                    Err(e) => eprintln!("Error: {}", e),
                }
            });
            Ok(())
        }
        "categories" | "cats" => {
            rt.block_on(async {
                match api.categories().await {
                    Ok(categories) => {
                        for c in categories {
                            println!("{} {:<20} {:>6}  {}", c.icon_or_default(), c.slug, c.image_count, c.name);
                        }
                    }
                    Err(e) => eprintln!("Error: {}", e),
                }
            });
            Ok(())
        }
        "search" => {
            let query = args.join(" ");
            if query.trim().is_empty() {
                eprintln!("Usage: ww2-archive search <query>");
                return Ok(());
            }
            rt.block_on(async {
                let mut session = Session::new(config);
                let effects = session.search(&query);
                for notice in session::drive(&mut session, &api, effects).await {
                    eprintln!("{:?}: {}", notice.severity, notice.message);
                }
                print_results(&session);
            });
            Ok(())
        }
        "help" | "--help" | "-h" => {
            println!("WW2 Archive - image and video archive browser\n");
            println!("Usage: ww2-archive [command]\n");
            println!("Commands:");
            println!("  (none)          Start the GUI");
            println!("  health          Check that the backend is reachable");
            println!("  stats           Show download statistics");
            println!("  categories      List categories");
            println!("  search <query>  Search images and videos");
            println!("  help            Show this help message");
            println!("\nBackend: {} (set WW2_ARCHIVE_API to change)", config.api_base);
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", cmd);
            eprintln!("Run 'ww2-archive help' for usage");
            Ok(())
        }
    }
}

fn print_results(session: &Session) {
    let page = session.page();
    println!("{}\n{}\n", page.title, page.subtitle);
    match session.rendered() {
        Rendered::Cards(cards) => {
            for card in cards {
                let kind = if card.is_video() { "video" } else { "image" };
                println!("[{}] {}  {}", kind, card.title, card.meta.join(" · "));
            }
        }
        Rendered::Empty(empty) => println!("{} {}", empty.icon, empty.message),
    }
    if let Some(split) = session.split().filter(|s| s.tabs_visible()) {
        println!(
            "\n\"{}\": {} images, {} videos (showing {:?})",
            split.query(),
            split.image_count(),
            split.video_count(),
            split.active()
        );
    }
}

fn start_gui(config: AppConfig) -> iced::Result {
    tracing::info!("Starting WW2 Archive...");

    iced::application(ArchiveApp::title, ArchiveApp::update, ArchiveApp::view)
        .subscription(ArchiveApp::subscription)
        .theme(ArchiveApp::theme)
        .window(window::Settings {
            size: Size::new(1280.0, 820.0),
            min_size: Some(Size::new(900.0, 600.0)),
            position: window::Position::Centered,
            ..Default::default()
        })
        .antialiasing(true)
        .run_with(move || ArchiveApp::new(config))
}
