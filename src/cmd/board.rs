//! Board display and moves: `taskboard board`, `taskboard move`.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;

use taskboard::board::{BoardService, SyncOutcome};
use taskboard::gateway::HttpGateway;
use taskboard::ui::render::{outcome_line, render_board};
use taskboard::ui::with_spinner;
use taskboard_common::{Column, TaskId};

use super::Ctx;

async fn load_service(ctx: &Ctx, project_id: &str) -> Result<BoardService<HttpGateway>> {
    let session = ctx.session()?;
    let service = BoardService::new(
        Arc::new(ctx.gateway.clone()),
        project_id,
        session,
        ctx.config.reload_policy(),
    );
    with_spinner("Loading board...", service.load())
        .await
        .map_err(|e| ctx.backend_error(e))?;
    Ok(service)
}

pub async fn cmd_board(ctx: &Ctx, project_id: &str, json: bool) -> Result<()> {
    let service = load_service(ctx, project_id).await?;
    let state = service.state();
    if json {
        println!("{}", serde_json::to_string_pretty(&*state)?);
    } else {
        print!("{}", render_board(&state, Utc::now()));
    }
    Ok(())
}

pub async fn cmd_move(
    ctx: &Ctx,
    project_id: &str,
    task_id: &str,
    column: Column,
    index: Option<usize>,
) -> Result<()> {
    let service = load_service(ctx, project_id).await?;
    let outcome = with_spinner(
        "Moving task...",
        service.move_task(&TaskId::new(task_id), column, index),
    )
    .await?;

    match outcome {
        Some(SyncOutcome::SessionExpired) => {
            ctx.expire_session();
            anyhow::bail!("{}", outcome_line(&SyncOutcome::SessionExpired));
        }
        Some(outcome) => println!("{}", outcome_line(&outcome)),
        None => println!("Reordered within {} (order is not stored on the server)", column),
    }
    println!();
    print!("{}", render_board(&service.state(), Utc::now()));
    Ok(())
}
