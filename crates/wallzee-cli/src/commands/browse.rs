use chrono::Utc;
use wallzee_client::{DownloadPipeline, FileSink};
use wallzee_core::ListingState;

use crate::cli::{BrowseArgs, DownloadArgs, FeaturedArgs, OutputFormat};
use crate::client::{AppContext, CliResult, classify};
use crate::output::{render_dashboard, render_page, render_wallpapers};

pub(crate) async fn handle_browse(
    ctx: &AppContext,
    args: BrowseArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let page_size = args.page_size.unwrap_or(ctx.config.listing.page_size);
    let mut state = ListingState::new(args.device, page_size);

    let (wallpapers, category_service) = (ctx.wallpapers(), ctx.categories());
    let (records, categories) =
        tokio::join!(wallpapers.list(args.device), category_service.list());
    state.set_records(records.map_err(classify)?);
    state.set_categories(categories.map_err(classify)?);
    state.select_category(&args.category);
    state.set_search(args.search);
    state.go_to(args.page);

    let tokens = if state.show_pagination() {
        state.page_tokens()
    } else {
        Vec::new()
    };
    render_page(&state.visible_page(), &tokens, format)
}

pub(crate) async fn handle_featured(
    ctx: &AppContext,
    args: FeaturedArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let records = ctx
        .wallpapers()
        .featured(args.device)
        .await
        .map_err(classify)?;
    render_wallpapers(&records, format)
}

pub(crate) async fn handle_download(ctx: &AppContext, args: DownloadArgs) -> CliResult<()> {
    let wallpapers = ctx.wallpapers();
    let record = wallpapers.get(&args.id).await.map_err(classify)?;
    let sink = FileSink::new(ctx.backend.http().clone(), args.out);
    let outcome = DownloadPipeline::new(wallpapers, sink)
        .download(&record)
        .await
        .map_err(classify)?;

    println!("{}", outcome.message);
    println!(
        "saved {} ({} bytes)",
        outcome.saved.path.display(),
        outcome.saved.bytes
    );
    if outcome.new_count.is_none() {
        eprintln!("warning: download counter was not updated");
    }
    Ok(())
}

pub(crate) async fn handle_stats(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let stats = ctx
        .wallpapers()
        .dashboard_stats(Utc::now())
        .await
        .map_err(classify)?;
    render_dashboard(&stats, format)
}
