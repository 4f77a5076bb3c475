//! Shared domain types for the taskboard client.
//!
//! Everything here is plain data plus validation: no I/O, no async. The
//! wire shapes follow the backend's camelCase JSON.

pub mod activity;
pub mod comment;
pub mod meeting;
pub mod member;
pub mod notification;
pub mod project;
pub mod task;
pub mod time;
pub mod validation;

pub use activity::ActivityLog;
pub use comment::{Comment, NewComment};
pub use meeting::{Meeting, NewMeeting};
pub use member::{
    ChangePasswordRequest, EditProfileRequest, Invite, LoginRequest, Member, MemberDetail,
    RegisterRequest, Session,
};
pub use notification::{Notification, NotificationKind, NotificationStatus};
pub use project::{Favour, FavourUpdate, NewProject, Project};
pub use task::{Column, MalformedTask, NewTask, Task, TaskId, TaskStatus, TaskUpdate};
pub use validation::ValidationError;
