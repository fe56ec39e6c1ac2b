use wallzee_core::stats::category_counts;

use crate::cli::{CategoryArgs, CategoryIdArgs, CategoryUpdateArgs, OutputFormat};
use crate::client::{AppContext, CliResult, classify};
use crate::output::{render_categories, render_category};

pub(crate) async fn handle_category_list(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let wallpapers = ctx.wallpapers().list(None).await.map_err(classify)?;
    let summaries = ctx
        .categories()
        .list_with_counts(&wallpapers)
        .await
        .map_err(classify)?;
    render_categories(&summaries, format)
}

pub(crate) async fn handle_category_create(
    ctx: &AppContext,
    args: CategoryArgs,
    format: OutputFormat,
) -> CliResult<()> {
    ctx.require_admin().await?;
    let category = ctx
        .categories()
        .create(
            &args.name,
            args.description.as_deref(),
            args.icon.as_deref(),
        )
        .await
        .map_err(classify)?;
    render_category(&category, format)
}

pub(crate) async fn handle_category_update(
    ctx: &AppContext,
    args: CategoryUpdateArgs,
    format: OutputFormat,
) -> CliResult<()> {
    ctx.require_admin().await?;
    let fields = args.fields;
    let category = ctx
        .categories()
        .update(
            &args.id,
            &fields.name,
            fields.description.as_deref(),
            fields.icon.as_deref(),
        )
        .await
        .map_err(classify)?;
    render_category(&category, format)
}

pub(crate) async fn handle_category_delete(ctx: &AppContext, args: CategoryIdArgs) -> CliResult<()> {
    ctx.require_admin().await?;
    let (wallpaper_service, categories) = (ctx.wallpapers(), ctx.categories());
    let (wallpapers, known) = tokio::join!(wallpaper_service.list(None), categories.list());
    let counts = category_counts(&known.map_err(classify)?, &wallpapers.map_err(classify)?);
    let in_use = counts
        .iter()
        .find(|summary| summary.category.id == args.id)
        .map_or(0, |summary| summary.wallpaper_count);

    categories
        .delete(&args.id, in_use)
        .await
        .map_err(classify)?;
    println!("Category deleted (id: {})", args.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use httpmock::prelude::*;
    use serde_json::json;
    use wallzee_test_support::fixtures::{
        account_doc, categorized_wallpaper_doc, category_doc, document_list,
    };

    const WALLPAPERS: &str = "/v1/databases/db/collections/wallpapers/documents";
    const CATEGORIES: &str = "/v1/databases/db/collections/categories/documents";

    fn admin_session(server: &MockServer, dir: &std::path::Path) -> anyhow::Result<()> {
        std::fs::write(
            dir.join("session.json"),
            json!({"fallbackCookies": "{\"a_session_proj\":\"tok\"}", "userId": "u1"}).to_string(),
        )?;
        server.mock(|when, then| {
            when.method(GET).path("/v1/account");
            then.status(200)
                .json_body(account_doc("u1", "root@example.com", &["admin"]));
        });
        Ok(())
    }

    fn mock_listing(server: &MockServer) {
        server.mock(|when, then| {
            when.method(GET).path(WALLPAPERS);
            then.status(200).json_body(document_list(vec![
                categorized_wallpaper_doc("w1", "phone", "c1", "2024-01-02T00:00:00Z"),
                categorized_wallpaper_doc("w2", "desktop", "c1", "2024-01-01T00:00:00Z"),
            ]));
        });
        server.mock(|when, then| {
            when.method(GET).path(CATEGORIES);
            then.status(200).json_body(document_list(vec![
                category_doc("c1", "Nature"),
                category_doc("c2", "Space"),
            ]));
        });
    }

    #[tokio::test]
    async fn category_in_use_is_not_deleted() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir()?;
        admin_session(&server, dir.path())?;
        mock_listing(&server);
        let delete = server.mock(|when, then| {
            when.method(DELETE).path(format!("{CATEGORIES}/c1"));
            then.status(204);
        });

        let ctx = crate::client::test_support::context_with(&server, dir.path());
        let err = handle_category_delete(&ctx, CategoryIdArgs { id: "c1".into() })
            .await
            .expect_err("category in use");
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.display_message(), "Cannot delete category with wallpapers");
        delete.assert_hits(0);
        Ok(())
    }

    #[tokio::test]
    async fn unused_category_is_deleted() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir()?;
        admin_session(&server, dir.path())?;
        mock_listing(&server);
        let delete = server.mock(|when, then| {
            when.method(DELETE).path(format!("{CATEGORIES}/c2"));
            then.status(204);
        });

        let ctx = crate::client::test_support::context_with(&server, dir.path());
        handle_category_delete(&ctx, CategoryIdArgs { id: "c2".into() })
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        delete.assert();
        Ok(())
    }

    #[tokio::test]
    async fn list_is_public_and_counts_wallpapers() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir()?;
        mock_listing(&server);
        let account = server.mock(|when, then| {
            when.method(GET).path("/v1/account");
            then.status(401);
        });

        let ctx = crate::client::test_support::context_with(&server, dir.path());
        handle_category_list(&ctx, OutputFormat::Json)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        account.assert_hits(0);
        Ok(())
    }

    #[tokio::test]
    async fn blank_name_is_rejected_locally() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir()?;
        admin_session(&server, dir.path())?;
        let create = server.mock(|when, then| {
            when.method(POST).path(CATEGORIES);
            then.status(201);
        });

        let ctx = crate::client::test_support::context_with(&server, dir.path());
        let args = CategoryArgs {
            name: "  ".into(),
            ..CategoryArgs::default()
        };
        let err = handle_category_create(&ctx, args, OutputFormat::Table)
            .await
            .expect_err("blank name");
        assert_eq!(err.exit_code(), 2);
        create.assert_hits(0);
        Ok(())
    }
}
