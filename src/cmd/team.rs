//! Project members, meetings and task comments.

use anyhow::Result;
use chrono::Utc;

use taskboard::ui::icons;
use taskboard::ui::render::{render_comments, render_meetings, render_members};
use taskboard::ui::with_spinner;
use taskboard_common::validation::{InviteForm, MeetingForm, validate_comment};
use taskboard_common::{Invite, NewComment, NewMeeting, TaskId};

use super::{Ctx, report_invalid};

pub async fn cmd_members(
    ctx: &Ctx,
    project_id: &str,
    invite: Option<String>,
    role: String,
) -> Result<()> {
    let session = ctx.session()?;

    if let Some(email) = invite {
        let form = InviteForm { email, role };
        form.validate().map_err(|e| report_invalid(&e))?;
        let invite = Invite {
            email: form.email.trim().to_string(),
            role: form.role,
        };
        ctx.gateway
            .invite(&session, project_id, &invite)
            .await
            .map_err(|e| ctx.backend_error(e))?;
        println!("{}Invited {} as {}", icons::CHECK, invite.email, invite.role);
        return Ok(());
    }

    let members = with_spinner("Loading members...", ctx.gateway.project_members(&session, project_id))
        .await
        .map_err(|e| ctx.backend_error(e))?;
    print!("{}", render_members(&members));
    Ok(())
}

pub struct NewMeetingArgs {
    pub topic: String,
    pub location: Option<String>,
    pub date: Option<String>,
}

pub async fn cmd_meetings(ctx: &Ctx, project_id: &str, add: Option<NewMeetingArgs>) -> Result<()> {
    let session = ctx.session()?;

    if let Some(args) = add {
        let form = MeetingForm {
            topic: args.topic,
            location: args.location.unwrap_or_default(),
            date: args.date,
        };
        form.validate().map_err(|e| report_invalid(&e))?;
        let meeting = NewMeeting {
            meeting_topic: form.topic.trim().to_string(),
            meeting_location: form.location,
            meeting_date: form.date,
            meeting_project_id: project_id.to_string(),
        };
        ctx.gateway
            .create_meeting(&session, &meeting)
            .await
            .map_err(|e| ctx.backend_error(e))?;
        println!("{}Scheduled {}", icons::CALENDAR, meeting.meeting_topic);
        return Ok(());
    }

    let meetings = with_spinner("Loading meetings...", ctx.gateway.meetings(&session, project_id))
        .await
        .map_err(|e| ctx.backend_error(e))?;
    print!("{}", render_meetings(&meetings, Utc::now()));
    Ok(())
}

pub async fn cmd_comments(ctx: &Ctx, task_id: &str, add: Option<String>) -> Result<()> {
    let session = ctx.session()?;
    let task_id = TaskId::new(task_id);

    if let Some(text) = add {
        validate_comment(&text).map_err(|e| report_invalid(&e))?;
        let comment = NewComment {
            comment_content: text.trim().to_string(),
            comment_task_id: task_id.to_string(),
            comment_member_id: session.member_id.clone(),
        };
        ctx.gateway
            .create_comment(&session, &comment)
            .await
            .map_err(|e| ctx.backend_error(e))?;
        println!("{}Comment added", icons::COMMENT);
        return Ok(());
    }

    let comments = with_spinner("Loading comments...", ctx.gateway.comments(&session, &task_id))
        .await
        .map_err(|e| ctx.backend_error(e))?;
    print!("{}", render_comments(&comments, Utc::now()));
    Ok(())
}
