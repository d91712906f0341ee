//! Partition accepted files into per-role filename lists.

use serde::{Deserialize, Serialize};

use crate::roles::{single_role, Role};
use crate::validation::NamedFile;

/// Filenames per role, each list sorted ascending by byte order.
///
/// The order drives default selection and index-based mapping, so it must
/// depend on filenames only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedFiles {
    pub face: Vec<String>,
    pub pose: Vec<String>,
    pub outfit: Vec<String>,
    pub object: Vec<String>,
}

impl GroupedFiles {
    pub fn get(&self, role: Role) -> &[String] {
        match role {
            Role::Face => &self.face,
            Role::Pose => &self.pose,
            Role::Outfit => &self.outfit,
            Role::Object => &self.object,
        }
    }

    fn get_mut(&mut self, role: Role) -> &mut Vec<String> {
        match role {
            Role::Face => &mut self.face,
            Role::Pose => &mut self.pose,
            Role::Outfit => &mut self.outfit,
            Role::Object => &mut self.object,
        }
    }

    /// Total number of grouped files.
    pub fn len(&self) -> usize {
        self.face.len() + self.pose.len() + self.outfit.len() + self.object.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `filename` is present in any role bucket.
    pub fn contains(&self, filename: &str) -> bool {
        [&self.face, &self.pose, &self.outfit, &self.object]
            .iter()
            .any(|bucket| bucket.iter().any(|f| f == filename))
    }
}

/// Group accepted files by role.
///
/// Files that do not classify to exactly one role are skipped rather than
/// treated as an error; the validator has already reported them.
pub fn group_by_role<F: NamedFile>(accepted: &[F]) -> GroupedFiles {
    let mut grouped = GroupedFiles::default();

    for file in accepted {
        let name = file.file_name();
        if let Some(role) = single_role(name) {
            grouped.get_mut(role).push(name.to_string());
        }
    }

    grouped.face.sort();
    grouped.pose.sort();
    grouped.outfit.sort();
    grouped.object.sort();
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_files;

    #[test]
    fn sorts_each_bucket_by_filename() {
        let grouped = group_by_role(&["b_face.png", "a_face.png"]);
        assert_eq!(grouped.face, vec!["a_face.png", "b_face.png"]);
    }

    #[test]
    fn ordinal_sort_puts_upper_case_first() {
        let grouped = group_by_role(&["outfit_b.png", "Outfit_C.png", "outfit_a.png"]);
        assert_eq!(
            grouped.outfit,
            vec!["Outfit_C.png", "outfit_a.png", "outfit_b.png"]
        );
    }

    #[test]
    fn partitions_into_all_roles() {
        let grouped =
            group_by_role(&["pose2.png", "face.png", "item.png", "pose1.png", "ชุด.png"]);
        assert_eq!(grouped.face, vec!["face.png"]);
        assert_eq!(grouped.pose, vec!["pose1.png", "pose2.png"]);
        assert_eq!(grouped.outfit, vec!["ชุด.png"]);
        assert_eq!(grouped.object, vec!["item.png"]);
        assert_eq!(grouped.len(), 5);
    }

    #[test]
    fn empty_role_buckets_stay_empty() {
        let grouped = group_by_role(&["face.png"]);
        assert!(grouped.pose.is_empty());
        assert!(grouped.get(Role::Object).is_empty());
    }

    #[test]
    fn skips_files_without_exactly_one_role() {
        let grouped = group_by_role(&["face_pose.png", "snapshot.png", "face.png"]);
        assert_eq!(grouped.face, vec!["face.png"]);
        assert!(grouped.pose.is_empty());
        assert_eq!(grouped.len(), 1);
    }

    #[test]
    fn grouping_is_idempotent_over_validated_files() {
        let files = ["outfit_2.png", "face.jpg", "outfit_1.png", "pose.webp", ".DS_Store"];
        let accepted = validate_files(files).accepted;
        assert_eq!(group_by_role(&accepted), group_by_role(&accepted));
    }

    #[test]
    fn contains_checks_every_bucket() {
        let grouped = group_by_role(&["face.png", "prop.png"]);
        assert!(grouped.contains("prop.png"));
        assert!(!grouped.contains("pose.png"));
    }
}
