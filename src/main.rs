mod cli;

use tonearm::{config, server};
use tonearm_common::{paths::is_audio_file, SongId};
use tonearm_db::pool::{get_conn, init_pool, DbPool};
use tonearm_db::queries::songs;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn open_database(config: &config::Config, config_path: Option<&Path>) -> Result<DbPool> {
    let db_path = config::database_path(config, config_path);
    let db_path_str = db_path.to_string_lossy();
    tracing::info!("Initializing database at {}", db_path_str);
    Ok(init_pool(&db_path_str)?)
}

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let (mut config, resolved_path) = config::load_config_with_path(config_path)?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config::validate_config(&config)?;

    tracing::info!("Starting Tonearm server");
    tracing::info!(
        chunk_size = config.streaming.chunk_size().get(),
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    let db_pool = open_database(&config, resolved_path.as_deref())?;

    server::start_server(config, db_pool).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "tonearm=trace,tonearm_db=debug,tonearm_common=debug,tower_http=debug".to_string()
        } else {
            "tonearm=info,tonearm_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Add {
            file,
            title,
            album,
            duration,
        } => add_song(&file, title, album, duration, cli.config.as_deref()),
        Commands::List => list_songs(cli.config.as_deref()),
        Commands::Plays { id } => show_plays(&id, cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("tonearm {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn add_song(
    file: &Path,
    title: Option<String>,
    album: Option<String>,
    duration: Option<i64>,
    config_path: Option<&Path>,
) -> Result<()> {
    if !file.is_file() {
        bail!("File not found: {:?}", file);
    }
    if !is_audio_file(file) {
        bail!("Not a supported audio file: {:?}", file);
    }
    if duration.is_some_and(|d| d < 0) {
        bail!("Duration must not be negative");
    }

    let file = file
        .canonicalize()
        .with_context(|| format!("Failed to resolve path: {:?}", file))?;

    let title = match title {
        Some(title) => title,
        None => file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    let (config, resolved_path) = config::load_config_with_path(config_path)?;
    let pool = open_database(&config, resolved_path.as_deref())?;
    let conn = get_conn(&pool)?;

    let song = songs::create_song(
        &conn,
        &title,
        album.as_deref(),
        &file.to_string_lossy(),
        duration,
    )?;

    println!("{}", song.id);
    tracing::info!(song_id = %song.id, title = %song.title, "Registered song");
    Ok(())
}

fn list_songs(config_path: Option<&Path>) -> Result<()> {
    let (config, resolved_path) = config::load_config_with_path(config_path)?;
    let pool = open_database(&config, resolved_path.as_deref())?;
    let conn = get_conn(&pool)?;

    let songs = songs::list_songs(&conn)?;
    if songs.is_empty() {
        println!("No songs registered");
        return Ok(());
    }

    for song in songs {
        println!(
            "{}  {:>6} plays  {}{}",
            song.id,
            song.play_count,
            song.title,
            song.album
                .map(|album| format!(" ({})", album))
                .unwrap_or_default()
        );
    }

    Ok(())
}

fn show_plays(id: &str, config_path: Option<&Path>) -> Result<()> {
    let id: SongId = id
        .parse()
        .with_context(|| format!("Invalid song ID: {}", id))?;

    let (config, resolved_path) = config::load_config_with_path(config_path)?;
    let pool = open_database(&config, resolved_path.as_deref())?;
    let conn = get_conn(&pool)?;

    let play_count = songs::get_play_count(&conn, id)?;
    println!("{}", play_count);
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Auth enabled: {}", config.server.auth.enabled);
            println!("  Chunk size: {}", config.streaming.chunk_size());
            println!(
                "  Default content type: {}",
                config.streaming.default_content_type
            );
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Chunk size: {}", config.streaming.chunk_size());
        }
    }

    Ok(())
}
