//! Which grouped references the user has picked for each role.

use serde::{Deserialize, Serialize};

use crate::grouping::GroupedFiles;
use crate::mapping::{pair_by_index, MappingItem};
use crate::roles::Role;

/// How many files a role contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectMode {
    None,
    Single,
    Multiple,
}

/// Picked filenames for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefSelection {
    pub mode: SelectMode,
    pub selected: Vec<String>,
}

impl RefSelection {
    pub fn none() -> Self {
        Self {
            mode: SelectMode::None,
            selected: Vec::new(),
        }
    }

    fn single_from(available: &[String]) -> Self {
        Self {
            mode: SelectMode::Single,
            selected: available.first().cloned().into_iter().collect(),
        }
    }

    /// Default selection for `role` given its sorted files.
    ///
    /// FACE and POSE take the first file, OBJECT takes the first file or
    /// nothing, OUTFIT takes every file.
    pub fn default_for(role: Role, available: &[String]) -> Self {
        match role {
            Role::Face | Role::Pose => Self::single_from(available),
            Role::Object if available.is_empty() => Self::none(),
            Role::Object => Self::single_from(available),
            Role::Outfit => Self {
                mode: SelectMode::Multiple,
                selected: available.to_vec(),
            },
        }
    }

    /// Switch mode, keeping as much of the current selection as fits.
    pub fn with_mode(&self, mode: SelectMode, available: &[String]) -> Self {
        match mode {
            SelectMode::None => Self::none(),
            SelectMode::Single => match self.selected.first() {
                Some(current) => Self {
                    mode,
                    selected: vec![current.clone()],
                },
                None => Self::single_from(available),
            },
            SelectMode::Multiple => Self {
                mode,
                selected: if self.selected.is_empty() {
                    available.to_vec()
                } else {
                    self.selected.clone()
                },
            },
        }
    }

    /// Add `filename` if absent, remove it if present.
    pub fn toggle(&mut self, filename: &str) {
        if let Some(pos) = self.selected.iter().position(|f| f == filename) {
            self.selected.remove(pos);
        } else {
            self.selected.push(filename.to_string());
        }
    }

    /// The one file this selection contributes, if any.
    pub fn primary(&self) -> Option<&str> {
        match self.mode {
            SelectMode::None => None,
            SelectMode::Single | SelectMode::Multiple => self.selected.first().map(String::as_str),
        }
    }

    /// Every file this selection contributes, in order.
    pub fn files(&self) -> &[String] {
        match self.mode {
            SelectMode::None => &[],
            SelectMode::Single => &self.selected[..self.selected.len().min(1)],
            SelectMode::Multiple => &self.selected,
        }
    }
}

/// Selections for all four roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSelections {
    pub face: RefSelection,
    pub pose: RefSelection,
    pub object: RefSelection,
    pub outfit: RefSelection,
}

impl ReferenceSelections {
    /// Default selections for freshly grouped files.
    pub fn defaults(grouped: &GroupedFiles) -> Self {
        Self {
            face: RefSelection::default_for(Role::Face, &grouped.face),
            pose: RefSelection::default_for(Role::Pose, &grouped.pose),
            object: RefSelection::default_for(Role::Object, &grouped.object),
            outfit: RefSelection::default_for(Role::Outfit, &grouped.outfit),
        }
    }

    pub fn selected_outfits(&self) -> &[String] {
        self.outfit.files()
    }

    /// One image per selected outfit, all using the selected pose.
    pub fn pair_outfits_by_index(&self) -> Vec<MappingItem> {
        pair_by_index(self.selected_outfits(), self.pose.primary())
    }
}
