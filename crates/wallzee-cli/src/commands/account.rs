use anyhow::anyhow;
use chrono::Utc;
use tracing::warn;
use wallzee_client::ClientError;
use wallzee_core::Identity;

use crate::cli::{LoginArgs, OutputFormat, PasswordArgs};
use crate::client::{AppContext, CliError, CliResult, classify, resolve_secret};
use crate::output::render_session;

pub(crate) async fn handle_login(ctx: &AppContext, args: LoginArgs) -> CliResult<()> {
    let password = resolve_secret(args.password, "Password: ", "--password")?;
    let session = ctx
        .session_store()
        .login(args.email.trim(), &password)
        .await
        .map_err(classify)?;
    ctx.persist_session(&session.user_id).await?;

    let identity = Identity {
        id: session.user_id.clone(),
        name: session.name.clone(),
        email: session.email.clone(),
        labels: Vec::new(),
    };
    if let Err(err) = ctx
        .users()
        .create_or_update_profile(&identity, Utc::now())
        .await
    {
        warn!(error = %err, "profile sync skipped");
    }

    println!("Signed in as {} <{}>", session.name, session.email);
    Ok(())
}

pub(crate) async fn handle_logout(ctx: &AppContext) -> CliResult<()> {
    let stored = ctx.restore_session().await?;
    if stored.is_some() {
        ctx.session_store().logout().await;
    }
    ctx.session_file.clear().await.map_err(classify)?;
    println!("Signed out");
    Ok(())
}

pub(crate) async fn handle_whoami(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let state = ctx.resolve_session().await?;
    render_session(&state, format)
}

pub(crate) async fn handle_password(ctx: &AppContext, args: PasswordArgs) -> CliResult<()> {
    ctx.restore_session().await?;
    let store = ctx.session_store();
    if store.initialize().await.user().is_none() {
        return Err(CliError::validation(
            "not signed in; run `wallzee login` first",
        ));
    }

    let current = resolve_secret(args.current, "Current password: ", "--current")?;
    let new = resolve_secret(args.new, "New password: ", "--new")?;
    let confirm = resolve_secret(args.confirm, "Confirm new password: ", "--confirm")?;

    match store.update_password(&current, &new, &confirm).await {
        Ok(()) => {
            println!("Password updated");
            Ok(())
        }
        Err(err @ ClientError::Validation(_)) => Err(classify(err)),
        Err(err) => {
            if let Err(clear) = ctx.session_file.clear().await {
                warn!(error = %clear, "failed to clear session file");
            }
            Err(CliError::failure(anyhow!(
                "{}; you have been signed out",
                err.user_message()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use wallzee_client::appwrite::HEADER_FALLBACK_COOKIES;
    use wallzee_test_support::fixtures::{account_doc, error_body, user_doc};

    const COOKIE: &str = r#"{"a_session_proj":"tok"}"#;

    fn login_args(password: &str) -> LoginArgs {
        LoginArgs {
            email: "root@example.com".into(),
            password: Some(password.into()),
        }
    }

    fn mock_session(server: &MockServer) -> httpmock::Mock<'_> {
        server.mock(|when, then| {
            when.method(POST).path("/v1/account/sessions/email");
            then.status(201)
                .header(HEADER_FALLBACK_COOKIES, COOKIE)
                .json_body(json!({"$id": "s1", "userId": "u1"}));
        })
    }

    #[tokio::test]
    async fn admin_login_persists_session_and_syncs_profile() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir()?;
        let session = mock_session(&server);
        server.mock(|when, then| {
            when.method(GET).path("/v1/account");
            then.status(200)
                .json_body(account_doc("u1", "root@example.com", &["admin"]));
        });
        server.mock(|when, then| {
            when.method(GET)
                .path("/v1/databases/db/collections/users/documents/u1");
            then.status(404)
                .json_body(error_body(404, "document_not_found", "not found"));
        });
        let profile = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/databases/db/collections/users/documents");
            then.status(201).json_body(user_doc(
                "u1",
                "root@example.com",
                false,
                "2024-01-01T00:00:00Z",
            ));
        });

        let ctx = crate::client::test_support::context_with(&server, dir.path());
        handle_login(&ctx, login_args("password1"))
            .await
            .map_err(|err| anyhow!(err.display_message()))?;

        session.assert();
        profile.assert();
        let stored = ctx.session_file.load().await?.expect("session stored");
        assert_eq!(stored.fallback_cookies, COOKIE);
        assert_eq!(stored.user_id.as_deref(), Some("u1"));
        Ok(())
    }

    #[tokio::test]
    async fn non_admin_login_is_refused_without_persisting() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir()?;
        mock_session(&server);
        server.mock(|when, then| {
            when.method(GET).path("/v1/account");
            then.status(200)
                .json_body(account_doc("u1", "root@example.com", &[]));
        });
        let discard = server.mock(|when, then| {
            when.method(DELETE).path("/v1/account/sessions/current");
            then.status(204);
        });

        let ctx = crate::client::test_support::context_with(&server, dir.path());
        let err = handle_login(&ctx, login_args("password1"))
            .await
            .expect_err("non-admin refused");
        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().starts_with("Access Denied"));
        discard.assert();
        assert!(!dir.path().join("session.json").exists());
        Ok(())
    }

    #[tokio::test]
    async fn blank_password_fails_before_any_request() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir()?;
        let session = mock_session(&server);

        let ctx = crate::client::test_support::context_with(&server, dir.path());
        let err = handle_login(&ctx, login_args(""))
            .await
            .expect_err("validation");
        assert_eq!(err.exit_code(), 2);
        session.assert_hits(0);
        Ok(())
    }

    #[tokio::test]
    async fn logout_clears_the_session_file() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir()?;
        let logout = server.mock(|when, then| {
            when.method(DELETE)
                .path("/v1/account/sessions/current")
                .header(HEADER_FALLBACK_COOKIES, COOKIE);
            then.status(204);
        });
        std::fs::write(
            dir.path().join("session.json"),
            json!({"fallbackCookies": COOKIE, "userId": "u1"}).to_string(),
        )?;

        let ctx = crate::client::test_support::context_with(&server, dir.path());
        handle_logout(&ctx)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        logout.assert();
        assert!(!dir.path().join("session.json").exists());
        Ok(())
    }

    #[tokio::test]
    async fn whoami_without_session_reports_anonymous() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir()?;
        let account = server.mock(|when, then| {
            when.method(GET).path("/v1/account");
            then.status(401)
                .json_body(error_body(401, "general_unauthorized_scope", "missing scope"));
        });

        let ctx = crate::client::test_support::context_with(&server, dir.path());
        handle_whoami(&ctx, OutputFormat::Table)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        account.assert();
        Ok(())
    }

    #[tokio::test]
    async fn password_change_requires_a_session() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir()?;
        server.mock(|when, then| {
            when.method(GET).path("/v1/account");
            then.status(401)
                .json_body(error_body(401, "general_unauthorized_scope", "missing scope"));
        });

        let ctx = crate::client::test_support::context_with(&server, dir.path());
        let args = PasswordArgs {
            current: Some("password1".into()),
            new: Some("password2".into()),
            confirm: Some("password2".into()),
        };
        let err = handle_password(&ctx, args).await.expect_err("anonymous");
        assert_eq!(err.exit_code(), 2);
        Ok(())
    }
}
