//! osu! Beatmap Downloader - CLI entry point.

use std::collections::BTreeSet;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use osu_beatmap_downloader::{
    api::{build_http_client, Category, OsuApi, User},
    cli::{Args, Command, DownloadArgs, RecursiveArgs, SharedArgs},
    collect::{union, AggregationResult, Aggregator, PagePolicy, Walker},
    config::{
        validate_categories, validate_config, validate_credentials, validate_depth,
        validate_user_id, Config, RunMode,
    },
    download::{run_pipeline, DownloadSummary, Downloader, MirrorClient},
    error::{exit_codes, Error, Result},
    fs::resolve_output_dir,
    output::{
        create_spinner, print_banner, print_collection_stats, print_config_summary, print_error,
        print_info, print_success, print_summary, print_warning,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            let code = match e {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::TomlParse(_)
                | Error::TomlSerialize(_) => exit_codes::CONFIG_ERROR,
                ref e if e.is_remote() => exit_codes::API_ERROR,
                Error::Download(_)
                | Error::Pipeline(_)
                | Error::Filesystem { .. }
                | Error::InvalidFilename(_) => exit_codes::DOWNLOAD_ERROR,
                _ => exit_codes::UNEXPECTED_ERROR,
            };
            ExitCode::from(code as u8)
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    let config_path = args.config.clone().unwrap_or_else(Config::default_path);

    let shared = match &args.command {
        Command::GenerateConfig {
            client_id,
            client_secret,
        } => return generate_config(&config_path, *client_id, client_secret),
        command => command
            .shared()
            .ok_or_else(|| Error::Config("Subcommand takes no download options".into()))?,
    };

    let mut config = load_config(&config_path, shared)?;
    match &args.command {
        Command::Download(download) => download.merge_into_config(&mut config),
        _ => shared.merge_into_config(&mut config),
    }

    validate_config(&config)?;
    validate_user_id(shared.user)?;

    let client = build_http_client(&config)?;
    let api = OsuApi::from_config(client.clone(), &config)?;
    let mirror = MirrorClient::new(client, &config.options.mirror_url)?;

    print_info("Connecting to osu!...");
    let user = api.get_user(shared.user).await?;
    print_info(&format!("Found user: {} ({})", user.username, user.id));

    let base = std::env::current_dir()?;
    let output_dir = resolve_output_dir(
        config.options.output_directory.as_deref(),
        &base,
        &user.username,
    )?;

    let policy = if config.options.stop_on_empty_page {
        PagePolicy::StopOnEmpty
    } else {
        PagePolicy::Declared
    };
    let downloader = Downloader::new(mirror, output_dir);

    let outcome = match &args.command {
        Command::Download(download) => {
            download_profile(&api, &config, &downloader, &user, download, policy).await
        }
        Command::RecursiveFavorites(recursive) => {
            download_recursive(&api, &downloader, &user, recursive, policy).await
        }
        Command::GenerateConfig { .. } => {
            Err(Error::Config("generate-config does not download".into()))
        }
    };

    // Keep the token for the next run even if this one failed.
    cache_token(&api, &mut config, &config_path).await;

    let summary = outcome?;
    print_summary(&summary);

    Ok(())
}

/// Write a config file holding the given credentials, keeping other settings.
fn generate_config(path: &Path, client_id: u64, client_secret: &str) -> Result<()> {
    validate_credentials(client_id, client_secret)?;

    let mut config = if path.exists() {
        Config::load(path)?
    } else {
        Config::default()
    };
    config.credentials.client_id = client_id;
    config.credentials.client_secret = client_secret.to_string();
    // A cached token belongs to the previous credentials.
    config.cache = Default::default();

    config.save(path)?;
    print_success(&format!("Configuration written to {}", path.display()));
    Ok(())
}

/// Load the config file, or start from defaults when the CLI or environment
/// supplies credentials.
fn load_config(path: &Path, shared: &SharedArgs) -> Result<Config> {
    if path.exists() {
        return Config::load(path);
    }

    if shared.has_credentials() {
        print_warning(&format!(
            "Configuration file not found: {}",
            path.display()
        ));
        print_info("Using default configuration with CLI credentials");
        return Ok(Config::default());
    }

    // Produces the "run generate-config" error.
    Config::load(path)
}

/// Download selected categories of one profile.
async fn download_profile(
    api: &OsuApi,
    config: &Config,
    downloader: &Downloader,
    user: &User,
    args: &DownloadArgs,
    policy: PagePolicy,
) -> Result<DownloadSummary> {
    let categories: BTreeSet<Category> = args.categories().into_iter().collect();
    let categories: Vec<Category> = categories.into_iter().collect();
    validate_categories(&categories)?;

    print_config_summary(
        &user.username,
        RunMode::Profile,
        &categories,
        downloader.output_dir(),
    );

    let expected = user.declared_total(&categories);
    print_info(&format!("Up to {} beatmapsets to download", expected));

    let gamemode = config.options.gamemode;
    let aggregator = Aggregator::new(api, policy);
    let aggregator = &aggregator;
    let categories = &categories;

    run_pipeline(downloader, expected, |tx| async move {
        let mut collected = AggregationResult::new();
        for &category in categories {
            let added = aggregator
                .collect_category(
                    user.id,
                    category,
                    user.declared_count(category),
                    gamemode,
                    &mut collected,
                )
                .await?;
            for set in added {
                tx.push(set).await?;
            }
        }
        tracing::info!("Collected {} unique beatmapsets", collected.len());
        Ok(())
    })
    .await
}

/// Download favourites of a user and, recursively, of their maps' creators.
async fn download_recursive(
    api: &OsuApi,
    downloader: &Downloader,
    user: &User,
    args: &RecursiveArgs,
    policy: PagePolicy,
) -> Result<DownloadSummary> {
    validate_depth(args.depth)?;

    print_config_summary(
        &user.username,
        RunMode::RecursiveFavourites,
        &[Category::Favourite],
        downloader.output_dir(),
    );

    let spinner = create_spinner(&format!("Walking favourites (depth {})...", args.depth));
    let walker = Walker::new(api, policy);
    let visited = walker.expand(user.clone(), args.depth).await;
    spinner.finish_and_clear();
    let visited = visited?;

    let all = union(&visited);
    print_collection_stats(&visited, all.len());

    let expected = all.len();
    run_pipeline(downloader, expected, |tx| async move {
        for set in all {
            tx.push(set).await?;
        }
        Ok(())
    })
    .await
}

/// Persist the session's token into the config file's cache section.
async fn cache_token(api: &OsuApi, config: &mut Config, path: &Path) {
    let Some(token) = api.session().current_token().await else {
        return;
    };

    if config.cache.access_token.as_deref() == Some(token.access_token.as_str()) {
        return;
    }

    // Don't create a config file holding credentials the user never saved.
    let target = path.exists().then_some(path);
    if let Err(e) = config.update_cache(token.access_token, token.expires_at, target) {
        print_warning(&format!("Failed to cache access token: {}", e));
    }
}
