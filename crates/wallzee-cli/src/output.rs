//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use serde::Serialize;
use serde_json::json;
use wallzee_client::DeleteOutcome;
use wallzee_core::{
    CategoryRecord, CategorySummary, DashboardStats, Page, PageToken, SessionState, UserProfile,
    UserStats, WallpaperRecord,
};

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

fn wallpaper_header() {
    println!(
        "{:<20} {:<8} {:>9} {:<4} TITLE",
        "ID", "DEVICE", "DOWNLOADS", "FEAT"
    );
}

fn wallpaper_row(record: &WallpaperRecord) {
    println!(
        "{:<20} {:<8} {:>9} {:<4} {}",
        record.id,
        record.device,
        record.downloads,
        if record.featured { "yes" } else { "" },
        record.title
    );
}

pub(crate) fn render_page(
    page: &Page<&WallpaperRecord>,
    tokens: &[PageToken],
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&json!({
            "items": page.items,
            "current": page.current,
            "totalPages": page.total_pages,
        })),
        OutputFormat::Table => {
            if page.items.is_empty() {
                println!("No wallpapers found.");
                return Ok(());
            }
            wallpaper_header();
            for record in &page.items {
                wallpaper_row(record);
            }
            if !tokens.is_empty() {
                println!("pages: {}", format_tokens(tokens, page.current));
            }
            Ok(())
        }
    }
}

pub(crate) fn render_wallpapers(records: &[WallpaperRecord], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(records),
        OutputFormat::Table => {
            if records.is_empty() {
                println!("No wallpapers found.");
                return Ok(());
            }
            wallpaper_header();
            for record in records {
                wallpaper_row(record);
            }
            Ok(())
        }
    }
}

pub(crate) fn render_wallpaper(record: &WallpaperRecord, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(record),
        OutputFormat::Table => {
            println!("id: {}", record.id);
            println!("title: {}", record.title);
            println!("device: {}", record.device);
            if let Some(category) = &record.category_id {
                println!("category: {category}");
            }
            if let Some(file) = &record.image_id {
                println!("file: {file}");
            }
            println!("downloads: {}", record.downloads);
            println!("featured: {}", record.featured);
            println!("created: {}", record.created_at.to_rfc3339());
            Ok(())
        }
    }
}

pub(crate) fn render_delete(outcome: &DeleteOutcome) {
    println!("Wallpaper deleted (id: {})", outcome.id);
    if let Some(file) = &outcome.orphaned_file {
        eprintln!("warning: stored file {file} could not be removed");
    }
}

pub(crate) fn render_categories(summaries: &[CategorySummary], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(summaries),
        OutputFormat::Table => {
            if summaries.is_empty() {
                println!("No categories yet.");
                return Ok(());
            }
            println!("{:<20} {:>6} {:<6} NAME", "ID", "COUNT", "ICON");
            for summary in summaries {
                let category = &summary.category;
                println!(
                    "{:<20} {:>6} {:<6} {}",
                    category.id,
                    summary.wallpaper_count,
                    category.icon.as_deref().unwrap_or("-"),
                    category.name
                );
            }
            Ok(())
        }
    }
}

pub(crate) fn render_category(category: &CategoryRecord, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(category),
        OutputFormat::Table => {
            println!("id: {}", category.id);
            println!("name: {}", category.name);
            if let Some(description) = &category.description {
                println!("description: {description}");
            }
            if let Some(icon) = &category.icon {
                println!("icon: {icon}");
            }
            Ok(())
        }
    }
}

pub(crate) fn render_dashboard(stats: &DashboardStats, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(stats),
        OutputFormat::Table => {
            println!("wallpapers: {}", stats.total);
            println!("  phone: {}", stats.by_device.phone);
            println!("  desktop: {}", stats.by_device.desktop);
            println!("downloads: {}", stats.total_downloads);
            println!("added in the last 30 days: {}", stats.recent);
            Ok(())
        }
    }
}

pub(crate) fn render_users(users: &[UserProfile], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(users),
        OutputFormat::Table => {
            println!("{:<20} {:<5} {:<10} {:<28} NAME", "ID", "ADMIN", "JOINED", "EMAIL");
            for user in users {
                println!(
                    "{:<20} {:<5} {:<10} {:<28} {}",
                    user.id,
                    if user.is_admin { "yes" } else { "" },
                    user.created_at.format("%Y-%m-%d"),
                    user.email,
                    user.name
                );
            }
            Ok(())
        }
    }
}

pub(crate) fn render_user_stats(stats: &UserStats, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(stats),
        OutputFormat::Table => {
            println!("users: {}", stats.total);
            println!("admins: {}", stats.admins);
            println!("joined in the last 30 days: {}", stats.recent);
            Ok(())
        }
    }
}

pub(crate) fn render_session(state: &SessionState, format: OutputFormat) -> CliResult<()> {
    let user = state.user();
    match format {
        OutputFormat::Json => print_json(&json!({ "user": user })),
        OutputFormat::Table => {
            match user {
                Some(user) => {
                    println!("signed in as {} <{}>", user.name, user.email);
                    println!("user: {}", user.user_id);
                    println!("admin: {}", user.is_admin);
                }
                None => println!("not signed in"),
            }
            Ok(())
        }
    }
}

fn format_tokens(tokens: &[PageToken], current: usize) -> String {
    tokens
        .iter()
        .map(|token| match token {
            PageToken::Page(page) if *page == current => format!("[{page}]"),
            PageToken::Page(page) => page.to_string(),
            PageToken::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
