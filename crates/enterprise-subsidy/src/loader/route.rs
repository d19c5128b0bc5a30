use serde::{Deserialize, Serialize};

/// Route-derived inputs for a course page navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRoute {
    pub enterprise_slug: String,
    pub course_key: String,
    pub pathname: String,
    #[serde(default)]
    pub course_run_key: Option<String>,
}

impl CourseRoute {
    pub fn new(enterprise_slug: impl Into<String>, course_key: impl Into<String>) -> Self {
        let enterprise_slug = enterprise_slug.into();
        let course_key = course_key.into();
        let pathname = format!("/{enterprise_slug}/course/{course_key}");
        Self {
            enterprise_slug,
            course_key,
            pathname,
            course_run_key: None,
        }
    }

    pub fn with_pathname(mut self, pathname: impl Into<String>) -> Self {
        self.pathname = pathname.into();
        self
    }

    /// Apply the raw `course_run_key` query parameter.
    pub fn with_course_run_key_param(mut self, raw: Option<&str>) -> Self {
        self.course_run_key = raw
            .map(restore_plus_signs)
            .filter(|key| !key.is_empty());
        self
    }

    pub fn dashboard_path(&self) -> String {
        format!("/{}", self.enterprise_slug)
    }

    pub fn course_type_path(&self, path_slug: &str) -> String {
        format!(
            "/{}/{}/course/{}",
            self.enterprise_slug, path_slug, self.course_key
        )
    }
}

/// Course-run keys contain literal `+`, which form decoding turns into spaces.
pub fn restore_plus_signs(raw: &str) -> String {
    raw.replace(' ', "+")
}
