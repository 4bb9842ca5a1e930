use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A student as served by `/api/students` and `/api/preference`
///
/// Students are identified by `student_number`; two values with the same
/// number refer to the same student even if other fields differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub student_number: u32,
    pub name: String,
    /// Set by the server when this student has also picked the current user
    #[serde(default, skip_serializing_if = "is_false")]
    pub reciprocal: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Student {
    pub fn new(student_number: u32, name: impl Into<String>) -> Self {
        Self {
            student_number,
            name: name.into(),
            reciprocal: false,
            email: None,
        }
    }

    /// Mark the student as reciprocal (builder style, mostly for tests and fixtures)
    pub fn with_reciprocal(mut self, reciprocal: bool) -> Self {
        self.reciprocal = reciprocal;
        self
    }

    pub fn is_same(&self, other: &Student) -> bool {
        self.student_number == other.student_number
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Compare two optional selections by student identity. Two empty selections are equal.
pub fn same_selection(a: Option<&Student>, b: Option<&Student>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.is_same(b),
        _ => false,
    }
}

/// The logged in user as served by `/api/user`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub username: String,
    /// Absent for staff accounts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student: Option<Student>,
}

impl CurrentUser {
    pub fn is_student(&self) -> bool {
        self.student.is_some()
    }
}

/// A confirmed preference change, kept locally in the order the server confirmed them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceChange {
    pub preference_for: Option<Student>,
    pub at: DateTime<Utc>,
}

impl PreferenceChange {
    pub fn now(preference_for: Option<Student>) -> Self {
        Self {
            preference_for,
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_reciprocal_defaults_to_false() {
        let student: Student =
            serde_json::from_str(r#"{"student_number": 2, "name": "Bart Gelens"}"#).unwrap();
        assert!(!student.reciprocal);
        assert_eq!(student.email, None);
    }

    #[test]
    fn test_student_ignores_unknown_fields() {
        let student: Student = serde_json::from_str(
            r#"{"student_number": 3, "name": "Bõb van der PUTTEN", "reciprocal": true, "sheet": "IN01"}"#,
        )
        .unwrap();
        assert_eq!(student.student_number, 3);
        assert!(student.reciprocal);
    }

    #[test]
    fn test_same_selection() {
        let ann = Student::new(1, "Ann");
        let ann_echo = Student::new(1, "Ann").with_reciprocal(true);
        let bo = Student::new(2, "Bo");

        assert!(same_selection(None, None));
        assert!(same_selection(Some(&ann), Some(&ann_echo)));
        assert!(!same_selection(Some(&ann), Some(&bo)));
        assert!(!same_selection(Some(&ann), None));
        assert!(!same_selection(None, Some(&bo)));
    }

    #[test]
    fn test_staff_user_has_no_student() {
        let user: CurrentUser = serde_json::from_str(r#"{"username": "agehring"}"#).unwrap();
        assert!(!user.is_student());
    }
}
