use serde::{Deserialize, Serialize};

/// Profile fields shared by members and the signed-in session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetail {
    #[serde(default)]
    pub member_email: String,
    #[serde(default)]
    pub member_name: String,
    #[serde(default)]
    pub member_lastname: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub img: Option<String>,
}

impl MemberDetail {
    /// "First Last", or just the first name when no surname is known.
    pub fn display_name(&self) -> String {
        match self.member_lastname.as_deref().filter(|l| !l.is_empty()) {
            Some(last) => format!("{} {}", self.member_name, last),
            None => self.member_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub member_id: String,
    #[serde(default)]
    pub detail: MemberDetail,
}

/// The signed-in user as returned by `POST /login` and kept between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub member_id: String,
    #[serde(default)]
    pub detail: MemberDetail,
}

impl Session {
    /// Value for the `Authorization` header. Tokens that already carry the
    /// scheme are passed through unchanged.
    pub fn bearer(&self) -> String {
        if self.token.starts_with("Bearer ") {
            self.token.clone()
        } else {
            format!("Bearer {}", self.token)
        }
    }

    /// Apply a profile edit confirmed by the backend, keeping the token.
    pub fn with_detail(&self, detail: MemberDetail) -> Self {
        Self {
            token: self.token.clone(),
            member_id: self.member_id.clone(),
            detail,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub surname: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub member_id: String,
    pub current_password: String,
    pub new_password: String,
}

/// Body of `PUT /member/edit-profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditProfileRequest {
    pub member_id: String,
    pub detail: MemberDetail,
}

/// Body of `POST /<projectId>/assign`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invite {
    pub email: String,
    pub role: String,
}
