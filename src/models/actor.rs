//! Actors and the lecturer-course relation used for scope checks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A closed set of roles. Adding a role forces every permission match to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Casual academic being paid.
    Tutor,
    /// Course lecturer; scoped to assigned courses.
    Lecturer,
    /// HR / administrator; unscoped.
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Tutor => "TUTOR",
            Role::Lecturer => "LECTURER",
            Role::Admin => "ADMIN",
        };
        f.write_str(name)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TUTOR" => Ok(Role::Tutor),
            "LECTURER" => Ok(Role::Lecturer),
            "ADMIN" | "HR" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// The authenticated caller of a single request.
///
/// Supplied per request by the identity service; never read from global state.
///
/// # Example
///
/// ```
/// use timesheet_engine::models::{Principal, Role};
///
/// let lecturer = Principal::new(2, Role::Lecturer);
/// assert!(!lecturer.is_admin());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    /// User id.
    pub id: u64,
    /// The role the user is acting in.
    pub role: Role,
}

impl Principal {
    /// Creates a principal.
    pub fn new(id: u64, role: Role) -> Self {
        Self { id, role }
    }

    /// Returns true for administrators.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A lecturer's assignment to a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseAssignment {
    /// The lecturer.
    pub lecturer_id: u64,
    /// The course they are assigned to.
    pub course_id: u64,
}
