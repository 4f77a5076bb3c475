//! Plain-text renderings of backend data for the terminal.
//!
//! Every function returns a `String` so output can be checked in tests;
//! styling comes from `console`, which drops colors when not on a terminal.

use chrono::{DateTime, Utc};
use console::style;

use taskboard_common::time::humanize;
use taskboard_common::{
    ActivityLog, Column, Comment, Favour, Meeting, Member, Notification, Project, Task,
};

use super::icons;
use crate::board::{BoardState, SyncOutcome};

const WRAP_WIDTH: usize = 72;

fn wrapped(text: &str, indent: &str) -> String {
    let options = textwrap::Options::new(WRAP_WIDTH)
        .initial_indent(indent)
        .subsequent_indent(indent);
    textwrap::fill(text, options)
}

fn task_line(index: usize, task: &Task, now: DateTime<Utc>) -> String {
    let mut line = format!(
        "  {:>2}. {} {}",
        index,
        task.name,
        style(format!("({})", task.id)).dim()
    );
    if let Some(due) = task.task_due_date.as_deref() {
        line.push_str(&format!("  {}due {}", icons::CALENDAR, humanize(due, now)));
    }
    if !task.task_participants.is_empty() {
        line.push_str(&format!("  {}{}", icons::PERSON, task.task_participants.len()));
    }
    line
}

/// Columns left to right, each with its tasks in board order. Indices are
/// the ones `taskboard move --index` expects.
pub fn render_board(state: &BoardState, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    for column in Column::ALL {
        let tasks = state.column(column);
        out.push_str(&format!(
            "{}{} {}\n",
            icons::column_icon(column),
            style(column.status().label()).bold(),
            style(format!("[{}]", tasks.len())).dim()
        ));
        if tasks.is_empty() {
            out.push_str(&format!("      {}\n", style("(empty)").dim()));
        }
        for (index, task) in tasks.iter().enumerate() {
            out.push_str(&task_line(index, task, now));
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

pub fn render_task(task: &Task, now: DateTime<Utc>) -> String {
    let mut out = format!(
        "{} {}\n",
        style(&task.name).bold(),
        style(format!("({})", task.id)).dim()
    );
    out.push_str(&format!(
        "  {}{}\n",
        icons::column_icon(task.status.column()),
        task.status.label()
    ));
    if let Some(due) = task.task_due_date.as_deref() {
        out.push_str(&format!("  {}Due {} ({})\n", icons::CALENDAR, due, humanize(due, now)));
    }
    if let Some(detail) = task.task_detail.as_deref().filter(|d| !d.trim().is_empty()) {
        out.push_str(&wrapped(detail, "    "));
        out.push('\n');
    }
    for member in &task.task_participants {
        out.push_str(&format!("  {}{}\n", icons::PERSON, member.detail.display_name()));
    }
    out
}

pub fn render_projects(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects yet. Create one with `taskboard projects create`.\n".to_string();
    }
    let mut out = String::new();
    for project in projects {
        let star = match project.project_fav {
            Favour::Favour => icons::STAR.to_string(),
            Favour::Unfavoured => "   ".to_string(),
        };
        out.push_str(&format!(
            "{}{}{} {}\n",
            star,
            icons::FOLDER,
            style(&project.project_name).bold(),
            style(format!("({})", project.project_id)).dim()
        ));
        if let Some(deadline) = project.project_deadline.as_deref() {
            out.push_str(&format!("      deadline {}\n", deadline));
        }
        if !project.project_description.trim().is_empty() {
            out.push_str(&wrapped(&project.project_description, "      "));
            out.push('\n');
        }
    }
    out
}

pub fn render_members(members: &[Member]) -> String {
    let mut out = String::new();
    for member in members {
        out.push_str(&format!(
            "{}{} {} {}\n",
            icons::PERSON,
            member.detail.display_name(),
            style(format!("<{}>", member.detail.member_email)).dim(),
            style(format!("({})", member.member_id)).dim()
        ));
    }
    out
}

pub fn render_meetings(meetings: &[Meeting], now: DateTime<Utc>) -> String {
    if meetings.is_empty() {
        return "No meetings scheduled.\n".to_string();
    }
    let mut out = String::new();
    for meeting in meetings {
        let when = meeting
            .meeting_date
            .as_deref()
            .map(|d| format!("{} ({})", d, humanize(d, now)))
            .unwrap_or_else(|| "date not set".to_string());
        out.push_str(&format!(
            "{}{}  {}\n",
            icons::CALENDAR,
            style(&meeting.meeting_topic).bold(),
            when
        ));
        if let Some(location) = meeting.meeting_location.as_deref() {
            out.push_str(&format!("    at {}\n", location));
        }
    }
    out
}

pub fn render_comments(comments: &[Comment], now: DateTime<Utc>) -> String {
    if comments.is_empty() {
        return "No comments.\n".to_string();
    }
    let mut out = String::new();
    for comment in comments {
        let author = comment.comment_member_id.as_deref().unwrap_or("unknown");
        let when = comment
            .comment_time
            .as_deref()
            .map(|t| humanize(t, now))
            .unwrap_or_default();
        out.push_str(&format!(
            "{}{} {}\n",
            icons::COMMENT,
            style(author).bold(),
            style(when).dim()
        ));
        out.push_str(&wrapped(&comment.comment_content, "    "));
        out.push('\n');
    }
    out
}

pub fn render_notifications(notifications: &[Notification], now: DateTime<Utc>) -> String {
    let unread = taskboard_common::notification::unread_count(notifications);
    let mut out = format!("{}{} unread\n", icons::BELL, unread);
    for n in notifications {
        let marker = if n.is_unread() {
            style("●").cyan().to_string()
        } else {
            " ".to_string()
        };
        let when = n
            .notification_time
            .as_deref()
            .map(|t| humanize(t, now))
            .unwrap_or_default();
        out.push_str(&format!(
            "{} {} {} {}\n",
            marker,
            n.notification_detail,
            style(when).dim(),
            style(format!("({})", n.notification_id)).dim()
        ));
    }
    out
}

pub fn render_activity(entries: &[ActivityLog], now: DateTime<Utc>) -> String {
    if entries.is_empty() {
        return "No activity recorded.\n".to_string();
    }
    let mut out = String::new();
    for entry in entries {
        let when = entry
            .log_time
            .as_deref()
            .map(|t| humanize(t, now))
            .unwrap_or_default();
        let subject = entry
            .task_name
            .as_deref()
            .map(|t| format!(" \"{}\"", t))
            .unwrap_or_default();
        out.push_str(&format!(
            "{}{} {}{} {}\n",
            icons::CLOCK,
            style(&entry.log_actor).bold(),
            entry.log_action,
            subject,
            style(when).dim()
        ));
    }
    out
}

/// One line describing how a move settled.
pub fn outcome_line(outcome: &SyncOutcome) -> String {
    match outcome {
        SyncOutcome::Confirmed => format!("{}Saved", icons::CHECK),
        SyncOutcome::Reconciled => format!(
            "{}Server rejected the move; board reloaded from the server",
            icons::SYNC
        ),
        SyncOutcome::ReloadDiscarded => format!(
            "{}Server rejected the move; board will be reloaded once pending moves finish",
            icons::SYNC
        ),
        SyncOutcome::ReloadFailed(reason) => format!(
            "{}Move not saved and the board could not be reloaded: {}",
            icons::WARN,
            reason
        ),
        SyncOutcome::SessionExpired => format!(
            "{}Session expired. Run `taskboard login` to sign in again",
            icons::CROSS
        ),
    }
}
