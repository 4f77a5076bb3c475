use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Favour {
    #[serde(rename = "FAVOUR")]
    Favour,
    #[default]
    #[serde(rename = "UNFAVOURED")]
    Unfavoured,
}

impl Favour {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Favour => "FAVOUR",
            Self::Unfavoured => "UNFAVOURED",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Favour => Self::Unfavoured,
            Self::Unfavoured => Self::Favour,
        }
    }
}

impl fmt::Display for Favour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub project_id: String,
    pub project_name: String,
    #[serde(default)]
    pub project_description: String,
    #[serde(default)]
    pub project_deadline: Option<String>,
    #[serde(default)]
    pub project_fav: Favour,
    pub project_owner_id: String,
    #[serde(default)]
    pub project_img: Option<String>,
}

/// Body of `POST /project/create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub project_name: String,
    pub project_description: String,
    pub project_deadline: String,
    pub project_owner_id: String,
    pub project_img: String,
}

/// Body of `PUT /project/update-favour`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavourUpdate {
    pub project_id: String,
    pub project_fav: Favour,
}
