//! Argument parsing and command dispatch.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use uuid::Uuid;
use wallzee_config::{LogFormatSetting, WallzeeConfig, load_from_lookup};
use wallzee_core::DeviceType;
use wallzee_telemetry::{CommandContextGuard, LogFormat, LoggingConfig, build_sha, init_logging};

use crate::client::{AppContext, CliResult};
use crate::commands::account::{
    handle_login, handle_logout, handle_password, handle_whoami,
};
use crate::commands::browse::{handle_browse, handle_download, handle_featured, handle_stats};
use crate::commands::categories::{
    handle_category_create, handle_category_delete, handle_category_list, handle_category_update,
};
use crate::commands::users::{
    handle_user_demote, handle_user_list, handle_user_promote, handle_user_stats,
};
use crate::commands::wallpapers::{
    handle_wallpaper_delete, handle_wallpaper_feature, handle_wallpaper_list,
    handle_wallpaper_update, handle_wallpaper_upload,
};

/// Parses CLI arguments, executes the requested command, and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let command_name = command_label(&cli.command);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            return err.exit_code();
        }
    };
    let format = match config.logging.format {
        Some(LogFormatSetting::Json) => LogFormat::Json,
        Some(LogFormatSetting::Pretty) => LogFormat::Pretty,
        None => LogFormat::infer(),
    };
    if let Err(err) = init_logging(&LoggingConfig {
        level: &config.logging.level,
        format,
        build_sha: option_env!("WALLZEE_BUILD_SHA").unwrap_or("dev"),
    }) {
        eprintln!("warning: logging disabled: {err}");
    }
    let _span = CommandContextGuard::enter(command_name);
    info!(trace_id = %Uuid::new_v4(), build = build_sha(), "command started");

    let result = dispatch(cli, config).await;
    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

fn load_config(cli: &Cli) -> CliResult<WallzeeConfig> {
    let mut overrides = BTreeMap::new();
    let flags = [
        ("WALLZEE_ENDPOINT", cli.endpoint.clone()),
        ("WALLZEE_PROJECT_ID", cli.project.clone()),
        ("WALLZEE_API_KEY", cli.api_key.clone()),
        (
            "WALLZEE_SESSION_FILE",
            cli.session_file
                .as_ref()
                .map(|path| path.display().to_string()),
        ),
        ("WALLZEE_HTTP_TIMEOUT_SECS", cli.timeout.map(|secs| secs.to_string())),
    ];
    for (key, value) in flags {
        if let Some(value) = value {
            overrides.insert(key, value);
        }
    }
    Ok(load_from_lookup(|key| {
        overrides
            .get(key)
            .cloned()
            .or_else(|| std::env::var(key).ok())
    })?)
}

async fn dispatch(cli: Cli, config: WallzeeConfig) -> CliResult<()> {
    let ctx = AppContext::new(config)?;
    let format = cli.format;

    match cli.command {
        Command::Browse(args) => handle_browse(&ctx, args, format).await,
        Command::Featured(args) => handle_featured(&ctx, args, format).await,
        Command::Download(args) => handle_download(&ctx, args).await,
        Command::Stats => handle_stats(&ctx, format).await,
        Command::Login(args) => handle_login(&ctx, args).await,
        Command::Logout => handle_logout(&ctx).await,
        Command::Whoami => handle_whoami(&ctx, format).await,
        Command::Password(args) => handle_password(&ctx, args).await,
        Command::Wallpaper(command) => match command {
            WallpaperCommand::Upload(args) => handle_wallpaper_upload(&ctx, args, format).await,
            WallpaperCommand::Delete(args) => handle_wallpaper_delete(&ctx, args).await,
            WallpaperCommand::Feature(args) => handle_wallpaper_feature(&ctx, args).await,
            WallpaperCommand::Update(args) => handle_wallpaper_update(&ctx, args, format).await,
            WallpaperCommand::List => handle_wallpaper_list(&ctx, format).await,
        },
        Command::Category(command) => match command {
            CategoryCommand::List => handle_category_list(&ctx, format).await,
            CategoryCommand::Create(args) => handle_category_create(&ctx, args, format).await,
            CategoryCommand::Update(args) => handle_category_update(&ctx, args, format).await,
            CategoryCommand::Delete(args) => handle_category_delete(&ctx, args).await,
        },
        Command::User(command) => match command {
            UserCommand::List => handle_user_list(&ctx, format).await,
            UserCommand::Stats => handle_user_stats(&ctx, format).await,
            UserCommand::Promote(args) => handle_user_promote(&ctx, args).await,
            UserCommand::Demote(args) => handle_user_demote(&ctx, args).await,
        },
    }
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Browse(_) => "browse",
        Command::Featured(_) => "featured",
        Command::Download(_) => "download",
        Command::Stats => "stats",
        Command::Login(_) => "login",
        Command::Logout => "logout",
        Command::Whoami => "whoami",
        Command::Password(_) => "password",
        Command::Wallpaper(_) => "wallpaper",
        Command::Category(_) => "category",
        Command::User(_) => "user",
    }
}

pub(crate) fn parse_device(input: &str) -> Result<DeviceType, String> {
    input.parse::<DeviceType>().map_err(|err| err.to_string())
}

#[derive(Parser)]
#[command(name = "wallzee", about = "Browse and administer the Wallzee wallpaper gallery")]
pub(crate) struct Cli {
    #[arg(long, global = true, env = "WALLZEE_ENDPOINT", help = "API endpoint, e.g. https://cloud.appwrite.io/v1")]
    endpoint: Option<String>,
    #[arg(long, global = true, env = "WALLZEE_PROJECT_ID")]
    project: Option<String>,
    #[arg(long, global = true, env = "WALLZEE_API_KEY", help = "Server key for label changes")]
    api_key: Option<String>,
    #[arg(long, global = true, env = "WALLZEE_SESSION_FILE")]
    session_file: Option<PathBuf>,
    #[arg(long, global = true, env = "WALLZEE_HTTP_TIMEOUT_SECS")]
    timeout: Option<u64>,
    #[arg(
        long = "format",
        alias = "output",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    format: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Page through wallpapers with category and search filters.
    Browse(BrowseArgs),
    /// Show the featured strip for a device type.
    Featured(FeaturedArgs),
    /// Save a wallpaper and count the download.
    Download(DownloadArgs),
    /// Dashboard counters.
    Stats,
    /// Sign in as an admin.
    Login(LoginArgs),
    /// End the stored session.
    Logout,
    /// Show the signed-in account.
    Whoami,
    /// Change the admin password.
    Password(PasswordArgs),
    #[command(subcommand)]
    Wallpaper(WallpaperCommand),
    #[command(subcommand)]
    Category(CategoryCommand),
    #[command(subcommand)]
    User(UserCommand),
}

#[derive(Subcommand)]
pub(crate) enum WallpaperCommand {
    /// Upload an image and create its wallpaper.
    Upload(WallpaperUploadArgs),
    /// Delete a wallpaper and its stored file.
    Delete(WallpaperIdArgs),
    /// Toggle the featured flag.
    Feature(WallpaperFeatureArgs),
    /// Edit title, category, or featured flag.
    Update(WallpaperUpdateArgs),
    /// Newest wallpapers for administration.
    List,
}

#[derive(Subcommand)]
pub(crate) enum CategoryCommand {
    /// Categories with wallpaper counts.
    List,
    Create(CategoryArgs),
    Update(CategoryUpdateArgs),
    /// Delete a category no wallpaper references.
    Delete(CategoryIdArgs),
}

#[derive(Subcommand)]
pub(crate) enum UserCommand {
    List,
    Stats,
    /// Grant the admin label (server key required).
    Promote(UserIdArgs),
    /// Revoke the admin label (server key required).
    Demote(UserIdArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct BrowseArgs {
    #[arg(long, value_parser = parse_device, help = "Restrict to phone or desktop")]
    pub(crate) device: Option<DeviceType>,
    #[arg(long, default_value = "All", help = "Category name, or All")]
    pub(crate) category: String,
    #[arg(long, default_value = "")]
    pub(crate) search: String,
    #[arg(long, default_value_t = 1)]
    pub(crate) page: usize,
    #[arg(long)]
    pub(crate) page_size: Option<usize>,
}

#[derive(Args, Debug)]
pub(crate) struct FeaturedArgs {
    #[arg(long, value_parser = parse_device, default_value = "phone")]
    pub(crate) device: DeviceType,
}

#[derive(Args, Debug)]
pub(crate) struct DownloadArgs {
    #[arg(help = "Wallpaper identifier")]
    pub(crate) id: String,
    #[arg(long, short = 'o', default_value = ".", help = "Directory to save into")]
    pub(crate) out: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct LoginArgs {
    #[arg(long, env = "WALLZEE_EMAIL")]
    pub(crate) email: String,
    #[arg(long, help = "Prompted for when omitted on a terminal")]
    pub(crate) password: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct PasswordArgs {
    #[arg(long)]
    pub(crate) current: Option<String>,
    #[arg(long)]
    pub(crate) new: Option<String>,
    #[arg(long)]
    pub(crate) confirm: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct WallpaperUploadArgs {
    #[arg(help = "Image file to upload")]
    pub(crate) file: PathBuf,
    #[arg(long)]
    pub(crate) title: String,
    #[arg(long, value_parser = parse_device)]
    pub(crate) device: DeviceType,
    #[arg(long)]
    pub(crate) category_id: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct WallpaperIdArgs {
    #[arg(help = "Wallpaper identifier")]
    pub(crate) id: String,
}

#[derive(Args, Debug)]
pub(crate) struct WallpaperFeatureArgs {
    #[arg(help = "Wallpaper identifier")]
    pub(crate) id: String,
    #[arg(long, help = "Remove from the featured strip instead")]
    pub(crate) off: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct WallpaperUpdateArgs {
    #[arg(help = "Wallpaper identifier")]
    pub(crate) id: String,
    #[arg(long)]
    pub(crate) title: Option<String>,
    #[arg(long, conflicts_with = "clear_category")]
    pub(crate) category_id: Option<String>,
    #[arg(long)]
    pub(crate) clear_category: bool,
    #[arg(long)]
    pub(crate) featured: Option<bool>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CategoryArgs {
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) description: Option<String>,
    #[arg(long)]
    pub(crate) icon: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CategoryUpdateArgs {
    #[arg(help = "Category identifier")]
    pub(crate) id: String,
    #[command(flatten)]
    pub(crate) fields: CategoryArgs,
}

#[derive(Args, Debug)]
pub(crate) struct CategoryIdArgs {
    #[arg(help = "Category identifier")]
    pub(crate) id: String,
}

#[derive(Args, Debug)]
pub(crate) struct UserIdArgs {
    #[arg(help = "User identifier")]
    pub(crate) id: String,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}
