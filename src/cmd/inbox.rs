//! Notifications and the project activity log.

use anyhow::Result;
use chrono::Utc;

use taskboard::ui::icons;
use taskboard::ui::render::{render_activity, render_notifications};
use taskboard::ui::with_spinner;

use super::Ctx;

pub async fn cmd_notifications(ctx: &Ctx, read: Option<String>) -> Result<()> {
    let session = ctx.session()?;

    if let Some(id) = read {
        ctx.gateway
            .mark_notification_read(&session, &id)
            .await
            .map_err(|e| ctx.backend_error(e))?;
        println!("{}Marked {} as read", icons::CHECK, id);
        return Ok(());
    }

    let notifications = with_spinner("Checking notifications...", ctx.gateway.notifications(&session))
        .await
        .map_err(|e| ctx.backend_error(e))?;
    print!("{}", render_notifications(&notifications, Utc::now()));
    Ok(())
}

pub async fn cmd_activity(ctx: &Ctx, project_id: &str) -> Result<()> {
    let session = ctx.session()?;
    let entries = with_spinner("Loading activity...", ctx.gateway.activity(&session, project_id))
        .await
        .map_err(|e| ctx.backend_error(e))?;
    print!("{}", render_activity(&entries, Utc::now()));
    Ok(())
}
