//! Task management: `taskboard task`.

use anyhow::Result;
use chrono::Utc;
use console::style;

use taskboard::ui::icons;
use taskboard::ui::render::render_task;
use taskboard_common::validation::TaskForm;
use taskboard_common::{NewTask, Session, Task, TaskId, TaskUpdate};

use super::super::TaskCommands;
use super::{Ctx, confirm, report_invalid};

async fn find_task(ctx: &Ctx, session: &Session, project_id: &str, task_id: &str) -> Result<Task> {
    let tasks = ctx
        .gateway
        .project_tasks(session, project_id)
        .await
        .map_err(|e| ctx.backend_error(e))?;
    tasks
        .into_iter()
        .find(|t| t.id.as_str() == task_id)
        .ok_or_else(|| anyhow::anyhow!("Task {} not found in project {}", task_id, project_id))
}

pub async fn cmd_task(ctx: &Ctx, command: TaskCommands) -> Result<()> {
    let session = ctx.session()?;

    match command {
        TaskCommands::Add {
            project_id,
            name,
            detail,
            due,
        } => {
            let form = TaskForm {
                name,
                detail: detail.unwrap_or_default(),
                due_date: due,
            };
            form.validate().map_err(|e| report_invalid(&e))?;

            let task = NewTask {
                task_name: form.name.trim().to_string(),
                task_detail: form.detail,
                task_due_date: form.due_date,
                task_project_id: project_id,
                task_owner_id: session.member_id.clone(),
            };
            ctx.gateway
                .create_task(&session, &task)
                .await
                .map_err(|e| ctx.backend_error(e))?;
            println!("{}Added {}", icons::CHECK, style(&task.task_name).bold());
        }
        TaskCommands::Show {
            project_id,
            task_id,
        } => {
            let task = find_task(ctx, &session, &project_id, &task_id).await?;
            print!("{}", render_task(&task, Utc::now()));
        }
        TaskCommands::Edit {
            project_id,
            task_id,
            name,
            detail,
            due,
        } => {
            let current = find_task(ctx, &session, &project_id, &task_id).await?;
            let form = TaskForm {
                name: name.unwrap_or(current.name),
                detail: detail.or(current.task_detail).unwrap_or_default(),
                due_date: due.or(current.task_due_date),
            };
            form.validate().map_err(|e| report_invalid(&e))?;

            let update = TaskUpdate {
                task_id: task_id.clone(),
                task_name: form.name.trim().to_string(),
                task_detail: form.detail,
                task_due_date: form.due_date,
            };
            ctx.gateway
                .update_task(&session, &update)
                .await
                .map_err(|e| ctx.backend_error(e))?;
            println!("{}Updated {}", icons::CHECK, task_id);
        }
        TaskCommands::Status { task_id, column } => {
            let status = column.status();
            ctx.gateway
                .set_task_status(&session, &TaskId::new(task_id.clone()), status)
                .await
                .map_err(|e| ctx.backend_error(e))?;
            println!("{}{} is now {}", icons::CHECK, task_id, status.label());
        }
        TaskCommands::Assign { task_id, members } => {
            ctx.gateway
                .add_participants(&session, &TaskId::new(task_id.clone()), &members)
                .await
                .map_err(|e| ctx.backend_error(e))?;
            println!("{}Assigned {} member(s) to {}", icons::CHECK, members.len(), task_id);
        }
        TaskCommands::Unassign { task_id, members } => {
            ctx.gateway
                .remove_participants(&session, &TaskId::new(task_id.clone()), &members)
                .await
                .map_err(|e| ctx.backend_error(e))?;
            println!("{}Removed {} member(s) from {}", icons::CHECK, members.len(), task_id);
        }
        TaskCommands::Delete { task_id, yes } => {
            if !confirm(&format!("Delete task {}?", task_id), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            ctx.gateway
                .delete_task(&session, &TaskId::new(task_id.clone()))
                .await
                .map_err(|e| ctx.backend_error(e))?;
            println!("{}Deleted task {}", icons::CHECK, task_id);
        }
    }

    Ok(())
}
