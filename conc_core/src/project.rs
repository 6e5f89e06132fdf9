//! # Project Data Structures
//!
//! The `Project` struct is the root container for a set of sections that
//! share diagram settings. Projects serialize to human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! ├── settings: DiagramSettings (sweep configuration)
//! └── sections: HashMap<Uuid, Section> (validated sections)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use conc_core::project::Project;
//!
//! let project = Project::new("Jane Engineer", "25-042", "ACME Corp");
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("25-042"));
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::diagram::{capacity_diagram, CapacityDiagram, DiagramSettings};
use crate::errors::CalcResult;
use crate::section::Section;

/// Current schema version for project files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
///
/// Sections are stored in a flat UUID-keyed map; JSON sections pass through
/// [`Section`] validation on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, engineer, job info)
    pub meta: ProjectMetadata,

    /// Sweep settings shared by all sections
    #[serde(default)]
    pub settings: DiagramSettings,

    /// All sections, keyed by UUID
    #[serde(default)]
    pub sections: HashMap<Uuid, Section>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Arguments
    ///
    /// * `engineer` - Name of the responsible engineer
    /// * `job_id` - Job/project number (e.g., "25-001")
    /// * `client` - Client name
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>, client: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: DiagramSettings::default(),
            sections: HashMap::new(),
        }
    }

    /// Add a section and return the UUID assigned to it.
    pub fn add_section(&mut self, section: Section) -> Uuid {
        let id = Uuid::new_v4();
        self.sections.insert(id, section);
        self.touch();
        id
    }

    /// Remove a section by UUID.
    pub fn remove_section(&mut self, id: &Uuid) -> Option<Section> {
        let section = self.sections.remove(id);
        if section.is_some() {
            self.touch();
        }
        section
    }

    pub fn get_section(&self, id: &Uuid) -> Option<&Section> {
        self.sections.get(id)
    }

    /// Sections ordered by label, then UUID, for stable reports
    pub fn sorted_sections(&self) -> Vec<(&Uuid, &Section)> {
        let mut sections: Vec<_> = self.sections.iter().collect();
        sections.sort_by(|a, b| a.1.label().cmp(b.1.label()).then(a.0.cmp(b.0)));
        sections
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Capacity diagrams of all sections in [`Project::sorted_sections`] order.
    pub fn diagrams(&self) -> CalcResult<Vec<(Uuid, CapacityDiagram)>> {
        self.sorted_sections()
            .into_iter()
            .map(|(id, section)| Ok((*id, capacity_diagram(section, &self.settings)?)))
            .collect()
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}
