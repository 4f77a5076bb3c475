//! Project listing and management: `taskboard projects`.

use anyhow::Result;
use console::style;

use taskboard::ui::render::render_projects;
use taskboard::ui::{icons, with_spinner};
use taskboard_common::validation::ProjectForm;
use taskboard_common::{Favour, FavourUpdate, NewProject};

use super::super::ProjectsCommands;
use super::{Ctx, confirm, report_invalid};

pub async fn cmd_projects(ctx: &Ctx, command: Option<ProjectsCommands>) -> Result<()> {
    let session = ctx.session()?;

    match command {
        None | Some(ProjectsCommands::List) => {
            let projects = with_spinner(
                "Loading projects...",
                ctx.gateway.projects(&session, &session.detail.member_email),
            )
            .await
            .map_err(|e| ctx.backend_error(e))?;
            print!("{}", render_projects(&projects));
        }
        Some(ProjectsCommands::Create {
            name,
            description,
            deadline,
            img,
        }) => {
            let form = ProjectForm {
                name,
                description: description.unwrap_or_default(),
                deadline,
            };
            form.validate().map_err(|e| report_invalid(&e))?;

            let project = NewProject {
                project_name: form.name.trim().to_string(),
                project_description: form.description,
                project_deadline: form.deadline.unwrap_or_default(),
                project_owner_id: session.member_id.clone(),
                project_img: img.unwrap_or_default(),
            };
            ctx.gateway
                .create_project(&session, &project)
                .await
                .map_err(|e| ctx.backend_error(e))?;
            println!(
                "{}Created project {}",
                icons::CHECK,
                style(&project.project_name).bold()
            );
        }
        Some(ProjectsCommands::Fav { project_id }) => {
            let projects = ctx
                .gateway
                .projects(&session, &session.detail.member_email)
                .await
                .map_err(|e| ctx.backend_error(e))?;
            let project = projects
                .iter()
                .find(|p| p.project_id == project_id)
                .ok_or_else(|| anyhow::anyhow!("Project {} not found", project_id))?;

            let update = FavourUpdate {
                project_id: project.project_id.clone(),
                project_fav: project.project_fav.toggled(),
            };
            ctx.gateway
                .update_favour(&session, &update)
                .await
                .map_err(|e| ctx.backend_error(e))?;
            match update.project_fav {
                Favour::Favour => println!("{}Starred {}", icons::STAR, project.project_name),
                Favour::Unfavoured => println!("Unstarred {}", project.project_name),
            }
        }
        Some(ProjectsCommands::Delete { project_id, yes }) => {
            if !confirm(&format!("Delete project {}?", project_id), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            ctx.gateway
                .delete_project(&session, &project_id)
                .await
                .map_err(|e| ctx.backend_error(e))?;
            println!("{}Deleted project {}", icons::CHECK, project_id);
        }
    }

    Ok(())
}
