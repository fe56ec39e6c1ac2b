use chrono::Utc;
use tracing::warn;

use crate::cli::{OutputFormat, UserIdArgs};
use crate::client::{AppContext, CliResult, classify};
use crate::output::{render_user_stats, render_users};

pub(crate) async fn handle_user_list(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    ctx.require_admin().await?;
    let users = ctx.users().list().await.map_err(classify)?;
    render_users(&users, format)
}

pub(crate) async fn handle_user_stats(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    ctx.require_admin().await?;
    let stats = ctx.users().stats(Utc::now()).await.map_err(classify)?;
    render_user_stats(&stats, format)
}

pub(crate) async fn handle_user_promote(ctx: &AppContext, args: UserIdArgs) -> CliResult<()> {
    ctx.require_admin().await?;
    let labels = ctx.users().promote(&args.id).await.map_err(classify)?;
    println!("{} promoted (labels: {})", args.id, labels.join(", "));
    Ok(())
}

pub(crate) async fn handle_user_demote(ctx: &AppContext, args: UserIdArgs) -> CliResult<()> {
    let admin = ctx.require_admin().await?;
    if admin.user_id == args.id {
        warn!(user = %args.id, "revoking the signed-in account's admin label");
    }
    let labels = ctx.users().demote(&args.id).await.map_err(classify)?;
    let shown = if labels.is_empty() {
        "none".to_string()
    } else {
        labels.join(", ")
    };
    println!("{} demoted (labels: {shown})", args.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use httpmock::prelude::*;
    use serde_json::json;
    use wallzee_client::appwrite::HEADER_KEY;
    use wallzee_test_support::fixtures::{account_doc, document_list, user_doc};

    const USERS: &str = "/v1/databases/db/collections/users/documents";

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

    #[tokio::test]
    async fn list_renders_profiles() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir()?;
        admin_session(&server, dir.path())?;
        let list = server.mock(|when, then| {
            when.method(GET).path(USERS);
            then.status(200).json_body(document_list(vec![
                user_doc("u1", "root@example.com", true, "2024-01-01T00:00:00Z"),
                user_doc("u2", "guest@example.com", false, "2024-01-02T00:00:00Z"),
            ]));
        });

        let ctx = crate::client::test_support::context_with(&server, dir.path());
        handle_user_list(&ctx, OutputFormat::Table)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        list.assert();
        Ok(())
    }

    #[tokio::test]
    async fn promote_without_server_key_is_a_validation_error() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir()?;
        admin_session(&server, dir.path())?;
        let labels = server.mock(|when, then| {
            when.method(GET).path("/v1/users/u2");
            then.status(200).json_body(json!({"$id": "u2", "labels": []}));
        });

        let ctx = crate::client::test_support::context_with(&server, dir.path());
        let err = handle_user_promote(&ctx, UserIdArgs { id: "u2".into() })
            .await
            .expect_err("api key required");
        assert_eq!(err.exit_code(), 2);
        labels.assert_hits(0);
        Ok(())
    }

    #[tokio::test]
    async fn promote_adds_label_and_flags_profile() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir()?;
        admin_session(&server, dir.path())?;
        server.mock(|when, then| {
            when.method(GET)
                .path("/v1/users/u2")
                .header(HEADER_KEY, "server-key");
            then.status(200)
                .json_body(json!({"$id": "u2", "labels": ["beta"]}));
        });
        let update = server.mock(|when, then| {
            when.method(PUT)
                .path("/v1/users/u2/labels")
                .json_body(json!({"labels": ["beta", "admin"]}));
            then.status(200)
                .json_body(json!({"$id": "u2", "labels": ["beta", "admin"]}));
        });
        let profile = server.mock(|when, then| {
            when.method(PATCH)
                .path(format!("{USERS}/u2"))
                .json_body(json!({"data": {"isAdmin": true}}));
            then.status(200).json_body(user_doc(
                "u2",
                "guest@example.com",
                true,
                "2024-01-02T00:00:00Z",
            ));
        });

        let mut config = crate::client::test_support::context_with(&server, dir.path()).config;
        config.backend.api_key = Some("server-key".into());
        let ctx = AppContext::new(config).map_err(|err| anyhow!(err.display_message()))?;
        handle_user_promote(&ctx, UserIdArgs { id: "u2".into() })
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        update.assert();
        profile.assert();
        Ok(())
    }
}
