use std::io::Write;
use std::path::Path;

use anyhow::anyhow;
use tokio::fs;
use tracing::{info, warn};
use wallzee_api_models::WallpaperPatch;
use wallzee_client::transport::ProgressFn;
use wallzee_client::{UploadFile, UploadProgress, UploadRequest};

use crate::cli::{
    OutputFormat, WallpaperFeatureArgs, WallpaperIdArgs, WallpaperUpdateArgs, WallpaperUploadArgs,
};
use crate::client::{AppContext, CliError, CliResult, classify};
use crate::output::{render_delete, render_wallpaper, render_wallpapers};

pub(crate) async fn handle_wallpaper_upload(
    ctx: &AppContext,
    args: WallpaperUploadArgs,
    format: OutputFormat,
) -> CliResult<()> {
    ctx.require_admin().await?;
    let file = read_upload(&args.file).await?;

    let report: ProgressFn<'_> = &|progress: UploadProgress| {
        let mut stderr = std::io::stderr();
        if write!(stderr, "\ruploading... {}%", progress.percent())
            .and_then(|()| stderr.flush())
            .is_err()
        {
            warn!("progress output unavailable");
        }
    };
    let request = UploadRequest {
        title: args.title,
        device: args.device,
        category_id: args.category_id,
        file: Some(file),
    };
    let result = ctx.wallpapers().upload(request, Some(report)).await;
    eprintln!();
    let record = result.map_err(classify)?;
    info!(id = %record.id, "wallpaper created");
    render_wallpaper(&record, format)
}

async fn read_upload(path: &Path) -> CliResult<UploadFile> {
    let bytes = fs::read(path).await.map_err(|err| {
        CliError::failure(anyhow!(
            "failed to read image file '{}': {err}",
            path.display()
        ))
    })?;
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("wallpaper")
        .to_string();
    Ok(UploadFile::new(name, bytes))
}

pub(crate) async fn handle_wallpaper_delete(
    ctx: &AppContext,
    args: WallpaperIdArgs,
) -> CliResult<()> {
    ctx.require_admin().await?;
    let wallpapers = ctx.wallpapers();
    let record = wallpapers.get(&args.id).await.map_err(classify)?;
    let outcome = wallpapers.delete(&record).await.map_err(classify)?;
    render_delete(&outcome);
    Ok(())
}

pub(crate) async fn handle_wallpaper_feature(
    ctx: &AppContext,
    args: WallpaperFeatureArgs,
) -> CliResult<()> {
    ctx.require_admin().await?;
    let record = ctx
        .wallpapers()
        .set_featured(&args.id, !args.off)
        .await
        .map_err(classify)?;
    if record.featured {
        println!("{} is now featured", record.title);
    } else {
        println!("{} removed from featured", record.title);
    }
    Ok(())
}

pub(crate) async fn handle_wallpaper_update(
    ctx: &AppContext,
    args: WallpaperUpdateArgs,
    format: OutputFormat,
) -> CliResult<()> {
    ctx.require_admin().await?;
    let title = match args.title {
        Some(title) if title.trim().is_empty() => {
            return Err(CliError::validation("Please enter a title"));
        }
        Some(title) => Some(title.trim().to_string()),
        None => None,
    };
    let category_id = if args.clear_category {
        Some(None)
    } else {
        args.category_id.map(Some)
    };
    let patch = WallpaperPatch {
        title,
        category_id,
        featured: args.featured,
        downloads: None,
    };
    let record = ctx
        .wallpapers()
        .update(&args.id, &patch)
        .await
        .map_err(classify)?;
    render_wallpaper(&record, format)
}

pub(crate) async fn handle_wallpaper_list(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    ctx.require_admin().await?;
    let records = ctx.wallpapers().admin_list().await.map_err(classify)?;
    render_wallpapers(&records, format)
}
