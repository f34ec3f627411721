//! Lecturer-course assignments.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::CourseAssignment;

/// Answers whether a lecturer is assigned to a course.
pub trait CourseDirectory: Send + Sync {
    /// Returns true if `lecturer_id` is assigned to `course_id`.
    fn is_assigned(&self, lecturer_id: u64, course_id: u64) -> bool;
}

/// A fixed set of assignments held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCourseDirectory {
    assignments: HashSet<CourseAssignment>,
}

impl InMemoryCourseDirectory {
    /// Creates a directory from the given assignments.
    pub fn new(assignments: impl IntoIterator<Item = CourseAssignment>) -> Self {
        Self {
            assignments: assignments.into_iter().collect(),
        }
    }

    /// Loads assignments from a YAML list of `{lecturer_id, course_id}`.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let assignments: Vec<CourseAssignment> =
            serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
                path: path_str,
                message: e.to_string(),
            })?;

        Ok(Self::new(assignments))
    }

    /// Number of assignments held.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Returns true if there are no assignments.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

impl CourseDirectory for InMemoryCourseDirectory {
    fn is_assigned(&self, lecturer_id: u64, course_id: u64) -> bool {
        self.assignments.contains(&CourseAssignment {
            lecturer_id,
            course_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_lookup() {
        let directory = InMemoryCourseDirectory::new([CourseAssignment {
            lecturer_id: 2,
            course_id: 10,
        }]);

        assert!(directory.is_assigned(2, 10));
        assert!(!directory.is_assigned(2, 11));
        assert!(!directory.is_assigned(3, 10));
    }

    #[test]
    fn test_missing_file_is_config_not_found() {
        let result = InMemoryCourseDirectory::from_yaml_file("/nonexistent/assignments.yaml");
        assert!(matches!(result, Err(EngineError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_duplicates_collapse() {
        let assignment = CourseAssignment {
            lecturer_id: 2,
            course_id: 10,
        };
        let directory = InMemoryCourseDirectory::new([assignment, assignment]);
        assert_eq!(directory.len(), 1);
    }
}
