//! `register-webhook`: subscribes the listener to the board's in-progress list.

use anyhow::{bail, Context};
use processor::{find_in_progress_list, IN_PROGRESS_NAMES};
use relay::{BoardAdmin, Webhook};

use crate::config::Config;
use crate::wiring;

pub const WEBHOOK_DESCRIPTION: &str = "Webhook for In Progress list changes";

#[derive(Debug, clap::Args)]
pub struct WebhookArgs {
    /// Public URL of `POST /webhook`. Defaults to `WEBHOOK_URL`.
    #[arg(long)]
    pub callback_url: Option<String>,

    /// Delete an existing registration for the list and register again.
    #[arg(long)]
    pub replace: bool,
}

/// What [`ensure_webhook`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Kept(Webhook),
    Replaced(Webhook),
    Created(Webhook),
}

pub async fn run(config: &Config, args: WebhookArgs) -> anyhow::Result<()> {
    config.validate_board_admin()?;
    let callback_url = args
        .callback_url
        .or_else(|| config.server.webhook_url.clone())
        .context("No callback URL: pass --callback-url or set WEBHOOK_URL")?;
    let board = wiring::board(config)?;

    match ensure_webhook(board.admin.as_ref(), &callback_url, args.replace).await? {
        Registration::Kept(hook) => {
            println!(
                "✅ Webhook already exists for list {}: {} (use --replace to re-register)",
                hook.model_id, hook.id
            );
        }
        Registration::Replaced(hook) => {
            println!("🔁 Webhook replaced for list {}: {}", hook.model_id, hook.id);
        }
        Registration::Created(hook) => {
            println!("✅ Webhook registered for list {}: {}", hook.model_id, hook.id);
        }
    }
    Ok(())
}

/// Makes sure exactly one webhook watches the in-progress list.
pub async fn ensure_webhook(
    board: &dyn BoardAdmin,
    callback_url: &str,
    replace: bool,
) -> anyhow::Result<Registration> {
    let existing = board.webhooks().await.context("Failed to list webhooks")?;
    let lists = board.board_lists().await.context("Failed to list board lists")?;
    let Some(list) = find_in_progress_list(&lists) else {
        bail!(
            "No in-progress list found on the board (looked for: {})",
            IN_PROGRESS_NAMES.join(", ")
        );
    };
    tracing::info!(list_id = %list.id, list = %list.name, "In-progress list found");

    let current = existing
        .into_iter()
        .find(|hook| hook.model_id == list.id.as_str());
    let replaced = match current {
        Some(hook) if !replace => return Ok(Registration::Kept(hook)),
        Some(hook) => {
            board
                .delete_webhook(&hook.id)
                .await
                .with_context(|| format!("Failed to delete webhook {}", hook.id))?;
            tracing::info!(webhook_id = %hook.id, "Old webhook deleted");
            true
        }
        None => false,
    };

    let hook = board
        .register_webhook(list.id.as_str(), callback_url, WEBHOOK_DESCRIPTION)
        .await
        .context("Failed to register webhook")?;
    tracing::info!(webhook_id = %hook.id, callback_url, "Webhook registered");
    Ok(if replaced {
        Registration::Replaced(hook)
    } else {
        Registration::Created(hook)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fake::FakeAdmin;

    const CALLBACK: &str = "https://relay.example/webhook";

    #[tokio::test]
    async fn registers_on_the_in_progress_list() {
        let board = FakeAdmin::with_lists(&[("L1", "Backlog"), ("L2", "Doing")]);

        let outcome = ensure_webhook(&board, CALLBACK, false).await.expect("registered");

        let Registration::Created(hook) = outcome else {
            panic!("expected a new webhook");
        };
        assert_eq!(hook.model_id, "L2");
        assert_eq!(hook.callback_url, CALLBACK);
        assert_eq!(hook.description.as_deref(), Some(WEBHOOK_DESCRIPTION));
    }

    #[tokio::test]
    async fn existing_webhook_is_kept_without_replace() {
        let board = FakeAdmin::with_lists(&[("L2", "In Progress")]).with_hook("W-old", "L2");

        let outcome = ensure_webhook(&board, CALLBACK, false).await.expect("kept");

        assert!(matches!(outcome, Registration::Kept(ref hook) if hook.id.as_str() == "W-old"));
        assert!(board.deleted.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn replace_deletes_then_registers() {
        let board = FakeAdmin::with_lists(&[("L2", "In Progress")])
            .with_hook("W-other", "L9")
            .with_hook("W-old", "L2");

        let outcome = ensure_webhook(&board, CALLBACK, true).await.expect("replaced");

        assert!(matches!(outcome, Registration::Replaced(ref hook) if hook.model_id == "L2"));
        let deleted = board.deleted.lock().expect("lock").clone();
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].as_str(), "W-old");
        assert_eq!(board.hooks.lock().expect("lock").len(), 2);
    }

    #[tokio::test]
    async fn board_without_in_progress_list_is_an_error() {
        let board = FakeAdmin::with_lists(&[("L1", "Backlog"), ("L3", "Done")]);

        let err = ensure_webhook(&board, CALLBACK, false).await.expect_err("no list");
        assert!(err.to_string().contains("No in-progress list"));
    }
}
