use serde::{Deserialize, Serialize};

use crate::models::domain::Student;

/// Body of `POST /api/preference`
///
/// `NoPreference` goes over the wire as a bare JSON `null`,
/// `Selected` as `{"student_number": n}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferenceWrite {
    Selected { student_number: u32 },
    NoPreference,
}

impl From<Option<&Student>> for PreferenceWrite {
    fn from(selection: Option<&Student>) -> Self {
        match selection {
            Some(student) => PreferenceWrite::Selected {
                student_number: student.student_number,
            },
            None => PreferenceWrite::NoPreference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_preference_is_bare_null() {
        let body = serde_json::to_string(&PreferenceWrite::NoPreference).unwrap();
        assert_eq!(body, "null");
    }

    #[test]
    fn test_selected_carries_only_student_number() {
        let ann = Student::new(1, "Ann").with_reciprocal(true);
        let body = serde_json::to_value(PreferenceWrite::from(Some(&ann))).unwrap();
        assert_eq!(body, serde_json::json!({ "student_number": 1 }));
    }
}
