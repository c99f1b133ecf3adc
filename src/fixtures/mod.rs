//! # Sample Payloads
//!
//! The user, course, and progress snapshot the suite submits. Field names are
//! serialized in the camelCase the target API expects.

use serde::Serialize;

pub const DEFAULT_USER_NAME: &str = "John Doe";
pub const DEFAULT_USER_EMAIL: &str = "john.doe@example.com";
pub const DEFAULT_USER_PASSWORD: &str = "securepass123";
pub const DEFAULT_COURSE_ID: &str = "revops";
pub const DEFAULT_COURSE_NAME: &str = "Professional Certificate in Revenue Operations";

/// Body of `POST /api/auth/signup`.
#[derive(Debug, Clone, Serialize)]
pub struct TestUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/enroll`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCourse {
    pub course_id: String,
    pub course_name: String,
}

/// Progress snapshot written by `PUT /api/progress`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub completed_modules: u32,
    pub current_module: String,
    pub completed_lessons: Vec<String>,
    pub score: u32,
}

/// Body of `PUT /api/progress`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate<'a> {
    pub course_id: &'a str,
    pub progress: &'a ProgressSnapshot,
}

#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    pub user: TestUser,
    pub course: TestCourse,
    pub progress: ProgressSnapshot,
}

impl Fixtures {
    pub fn progress_update(&self) -> ProgressUpdate<'_> {
        ProgressUpdate {
            course_id: &self.course.course_id,
            progress: &self.progress,
        }
    }
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            name: DEFAULT_USER_NAME.into(),
            email: DEFAULT_USER_EMAIL.into(),
            password: DEFAULT_USER_PASSWORD.into(),
        }
    }
}

impl Default for TestCourse {
    fn default() -> Self {
        Self {
            course_id: DEFAULT_COURSE_ID.into(),
            course_name: DEFAULT_COURSE_NAME.into(),
        }
    }
}

impl Default for ProgressSnapshot {
    fn default() -> Self {
        Self {
            completed_modules: 1,
            current_module: "module-2".into(),
            completed_lessons: vec!["lesson-1-1".into(), "lesson-1-2".into()],
            score: 85,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn course_serializes_camel_case() {
        let body = serde_json::to_value(TestCourse::default()).unwrap();
        assert_eq!(
            body,
            json!({
                "courseId": "revops",
                "courseName": "Professional Certificate in Revenue Operations"
            })
        );
    }

    #[test]
    fn progress_update_nests_snapshot() {
        let fixtures = Fixtures::default();
        let body = serde_json::to_value(fixtures.progress_update()).unwrap();
        assert_eq!(
            body,
            json!({
                "courseId": "revops",
                "progress": {
                    "completedModules": 1,
                    "currentModule": "module-2",
                    "completedLessons": ["lesson-1-1", "lesson-1-2"],
                    "score": 85
                }
            })
        );
    }
}
