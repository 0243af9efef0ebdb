use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use streamverse::flows::{
    actions, AiAssistant, ComplianceInput, GeneratePlaylistInput, IntelligenceInput,
    MusicSuggestionInput,
};
use streamverse::player::PlayerView;
use streamverse::playlist::{AddOutcome, PlaylistStore};
use streamverse::search::VideoSearchClient;
use streamverse::storage::FileStore;
use streamverse::video::{suggested_videos, Video};
use streamverse::Config;

#[derive(Parser)]
#[command(name = "streamverse")]
#[command(version, author = "TigreRoll")]
#[command(about = "Personal video playlist with embedded playback and AI helpers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to streamverse.toml or the environment)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the playlist data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the playlist
    List,
    /// Add a video from its URL
    Add {
        url: String,
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Remove a video by id
    Remove { id: String },
    /// Remove every video
    Clear,
    /// Show the player view for a video
    Select {
        id: String,
        #[arg(long)]
        audio_only: bool,
        /// Print the embeddable HTML instead of a summary
        #[arg(long)]
        html: bool,
    },
    /// Search YouTube
    Search {
        query: String,
        #[arg(short, long)]
        max: Option<u32>,
        /// Add the N-th result (1-based) to the playlist
        #[arg(long)]
        add: Option<usize>,
    },
    /// Suggest copyright-free music for a video
    Music {
        /// Video id; defaults to the current video
        #[arg(long)]
        id: Option<String>,
    },
    /// Copyright-compliance tips for a video
    Compliance {
        #[arg(long)]
        id: Option<String>,
    },
    /// Summarize a video and list key moments
    Summarize {
        #[arg(long)]
        id: Option<String>,
    },
    /// Generate a playlist from a prompt and add it
    Generate { prompt: String },
    /// Show the suggested videos
    Suggestions {
        /// Add all suggestions to the playlist
        #[arg(long)]
        add: bool,
    },
    /// Run the HTTP API
    #[cfg(feature = "api")]
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
        #[arg(long)]
        host: Option<String>,
    },
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(&path.to_string_lossy())?,
        None => Config::load()?,
    };
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = dir.clone();
    }
    Ok(config)
}

fn init_logging(level: &str, verbose: bool) {
    let default = if verbose {
        "streamverse=debug,info".to_string()
    } else {
        format!("streamverse={},warn", level)
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn open_playlist(config: &Config) -> Result<PlaylistStore<FileStore>> {
    let store = FileStore::open(&config.storage.data_dir).await?;
    Ok(PlaylistStore::open(store, config.storage.playlist_key.clone()).await?)
}

fn build_assistant(config: &Config, search: Arc<VideoSearchClient>) -> Option<AiAssistant> {
    match AiAssistant::from_config(&config.llm) {
        Ok(ai) => Some(ai.with_search_tool(search)),
        Err(e) => {
            warn!("AI helpers disabled: {}", e);
            None
        }
    }
}

/// Look up `id`, or fall back to the current video
fn target_video<'a>(playlist: &'a PlaylistStore<FileStore>, id: Option<&str>) -> Result<&'a Video> {
    match id {
        Some(id) => playlist
            .get(id)
            .ok_or_else(|| anyhow!("No video with id {} in the playlist", id)),
        None => playlist
            .current()
            .ok_or_else(|| anyhow!("The playlist is empty")),
    }
}

fn print_video(index: usize, video: &Video, current: bool) {
    let marker = if current { "▶" } else { " " };
    println!(
        "{} {:>3}. [{}] {} ({}:{})",
        marker, index, video.id, video.title, video.platform, video.video_id
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    init_logging(&config.logging.level, cli.verbose);
    config.validate()?;
    debug!("{}", config.summary());

    let search = Arc::new(VideoSearchClient::new(config.search.clone()));

    match cli.command {
        Commands::List => {
            let playlist = open_playlist(&config).await?;
            if playlist.is_empty() {
                println!("📭 Your playlist is empty");
                return Ok(());
            }
            let current = playlist.current().map(|v| v.id.clone());
            for (i, video) in playlist.videos().iter().enumerate() {
                print_video(i + 1, video, current.as_deref() == Some(video.id.as_str()));
            }
        }
        Commands::Add {
            url,
            title,
            description,
            tags,
        } => {
            let video = Video::from_url(&url, &title, description.as_deref(), tags.as_deref())?;
            let mut playlist = open_playlist(&config).await?;
            match playlist.add(video).await? {
                AddOutcome::Added { id } => info!("✅ Added '{}' as {}", title, id),
                AddOutcome::Duplicate { existing_id } => {
                    warn!("Video is already in the playlist as {}", existing_id)
                }
            }
        }
        Commands::Remove { id } => {
            let mut playlist = open_playlist(&config).await?;
            if !playlist.remove(&id).await? {
                return Err(anyhow!("No video with id {} in the playlist", id));
            }
            info!("🗑️ Removed {}", id);
        }
        Commands::Clear => {
            let mut playlist = open_playlist(&config).await?;
            playlist.clear().await?;
            info!("🧹 Playlist cleared");
        }
        Commands::Select {
            id,
            audio_only,
            html,
        } => {
            let mut playlist = open_playlist(&config).await?;
            playlist.select(&id)?;
            let video = target_video(&playlist, Some(&id))?;
            let view = PlayerView::new(video, audio_only);

            if html {
                println!("{}", view.render_html());
            } else {
                println!("▶ {}", video.title);
                if let Some(embed) = &view.embed_url {
                    println!("  embed: {}", embed);
                }
                if let Some(watch) = &view.watch_url {
                    println!("  watch: {}", watch);
                }
                println!("  thumbnail: {}", view.thumbnail_url);
            }
        }
        Commands::Search { query, max, add } => {
            let max = max.unwrap_or_else(|| search.default_max_results());
            let results = search.search(&query, max).await?;
            if results.is_empty() {
                println!("🔍 No videos found for '{}'", query);
                return Ok(());
            }
            for (i, result) in results.iter().enumerate() {
                println!("{:>3}. {} ({})", i + 1, result.title, result.video_id);
            }

            if let Some(n) = add {
                let picked = n
                    .checked_sub(1)
                    .and_then(|i| results.get(i))
                    .ok_or_else(|| anyhow!("Result {} does not exist", n))?;
                let mut playlist = open_playlist(&config).await?;
                let outcome = playlist.add(picked.clone().into_video()).await?;
                if outcome.is_added() {
                    info!("✅ Added '{}'", picked.title);
                } else {
                    warn!("'{}' is already in the playlist", picked.title);
                }
            }
        }
        Commands::Music { id } => {
            let playlist = open_playlist(&config).await?;
            let video = target_video(&playlist, id.as_deref())?;
            let ai = build_assistant(&config, search.clone());
            let input = MusicSuggestionInput {
                video_title: video.title.clone(),
                video_description: video.description.clone(),
            };
            let out = actions::suggest_audio_only_music(ai.as_ref(), &input).await?;
            println!("🎵 {}", out.music_suggestion);
        }
        Commands::Compliance { id } => {
            let playlist = open_playlist(&config).await?;
            let video = target_video(&playlist, id.as_deref())?;
            let ai = build_assistant(&config, search.clone());
            let input = ComplianceInput::new(&video.title, &video.description, &video.tags);
            let out = actions::suggest_compliance(ai.as_ref(), &input).await?;
            for suggestion in out.suggestions {
                println!("• {}", suggestion);
            }
        }
        Commands::Summarize { id } => {
            let playlist = open_playlist(&config).await?;
            let video = target_video(&playlist, id.as_deref())?;
            let ai = build_assistant(&config, search.clone());
            let input = IntelligenceInput {
                video_title: video.title.clone(),
                video_description: video.description.clone(),
            };
            let out = actions::summarize_video(ai.as_ref(), &input).await?;
            println!("{}", out.summary);
            for moment in out.key_moments {
                if moment.timestamp.is_empty() {
                    println!("  - {}", moment.description);
                } else {
                    println!("  - {} {}", moment.timestamp, moment.description);
                }
            }
        }
        Commands::Generate { prompt } => {
            let ai = build_assistant(&config, search.clone());
            let generated =
                actions::generate_playlist(ai.as_ref(), &GeneratePlaylistInput::new(prompt)).await?;
            let mut playlist = open_playlist(&config).await?;
            let added = playlist.add_many(generated.videos.clone()).await?;
            for (i, video) in generated.videos.iter().enumerate() {
                print_video(i + 1, video, false);
            }
            info!("✨ Generated {} videos, {} new", generated.videos.len(), added);
        }
        Commands::Suggestions { add } => {
            let suggestions = suggested_videos();
            for (i, video) in suggestions.iter().enumerate() {
                print_video(i + 1, video, false);
            }
            if add {
                let mut playlist = open_playlist(&config).await?;
                let added = playlist.add_many(suggestions).await?;
                info!("➕ Added {} suggested videos", added);
            }
        }
        #[cfg(feature = "api")]
        Commands::Serve { port, host } => {
            let mut config = config;
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            let server = streamverse::api::ApiServer::new(Arc::new(config)).await?;
            server.start().await?;
        }
    }

    Ok(())
}
