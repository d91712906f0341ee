//! Reference roles and filename keyword classification.
//!
//! A reference image's role is inferred from keywords in its filename.
//! The keyword table below is shared by the validator and the grouper;
//! editing it changes which files count as having exactly one role for
//! both of them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The part a reference image plays in generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Face,
    Pose,
    Outfit,
    Object,
}

/// Every role, in table order.
pub const ALL_ROLES: [Role; 4] = [Role::Face, Role::Pose, Role::Outfit, Role::Object];

/// Per-role filename keywords, matched as lowercase substrings.
///
/// Includes the Thai variants used by the studio's shooting sheets.
pub const ROLE_KEYWORDS: &[(Role, &[&str])] = &[
    (Role::Face, &["face", "หน้า"]),
    (Role::Pose, &["pose", "ท่า"]),
    (Role::Outfit, &["outfit", "ชุด", "clothing"]),
    (Role::Object, &["object", "prop", "ของ", "item"]),
];

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Face => "FACE",
            Self::Pose => "POSE",
            Self::Outfit => "OUTFIT",
            Self::Object => "OBJECT",
        }
    }

    /// Keywords that tag a filename with this role.
    pub fn keywords(&self) -> &'static [&'static str] {
        ROLE_KEYWORDS
            .iter()
            .find(|(role, _)| role == self)
            .map(|(_, keywords)| *keywords)
            .unwrap_or(&[])
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a filename into every role whose keywords it contains.
///
/// Matching is case-insensitive and has no precedence between roles: a
/// name like `face_pose.png` yields both `FACE` and `POSE`.
pub fn classify(filename: &str) -> BTreeSet<Role> {
    let name = filename.to_lowercase();
    ROLE_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| name.contains(&kw.to_lowercase())))
        .map(|(role, _)| *role)
        .collect()
}

/// Return the single role of a filename, or `None` when it has zero or
/// several.
pub fn single_role(filename: &str) -> Option<Role> {
    let roles = classify(filename);
    if roles.len() == 1 {
        roles.into_iter().next()
    } else {
        None
    }
}
