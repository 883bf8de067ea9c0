use serde::{Deserialize, Serialize};

/// Which viewer a project belongs to, and which storage pipeline its asset
/// goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    Image,
    Model,
}

impl ProjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectKind::Image => "image",
            ProjectKind::Model => "model",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "image" => Some(ProjectKind::Image),
            "model" => Some(ProjectKind::Model),
            _ => None,
        }
    }

    /// Route prefix of the matching viewer page.
    pub fn viewer_path(self) -> &'static str {
        match self {
            ProjectKind::Image => "/image-ar",
            ProjectKind::Model => "/model-ar",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub kind: ProjectKind,
    /// Local filename or public URL of the backing asset.
    pub file_ref: String,
    /// Remote asset key, present only with the object-store backend.
    pub external_id: Option<String>,
}

/// The singleton admin credential (row id = 1).
#[derive(Debug, Clone, PartialEq)]
pub struct AdminCredential {
    pub pin_hash: String,
    pub email: Option<String>,
}
