use super::domain::{Course, CourseRun, CourseRunAvailability};

pub const EXECUTIVE_EDUCATION_COURSE_TYPE: &str = "executive-education-2u";

/// Per-course-type presentation and pricing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseTypeConfig {
    pub course_type: &'static str,
    pub path_slug: Option<&'static str>,
    pub uses_entitlement_list_price: bool,
}

const COURSE_TYPE_CONFIGS: &[CourseTypeConfig] = &[CourseTypeConfig {
    course_type: EXECUTIVE_EDUCATION_COURSE_TYPE,
    path_slug: Some("executive-education-2u"),
    uses_entitlement_list_price: true,
}];

impl CourseTypeConfig {
    pub fn for_course_type(course_type: &str) -> Option<&'static CourseTypeConfig> {
        COURSE_TYPE_CONFIGS
            .iter()
            .find(|config| config.course_type == course_type)
    }
}

impl CourseRun {
    /// Marketable, enrollable, and not archived.
    pub fn is_available(&self) -> bool {
        self.is_marketable
            && self.is_enrollable
            && self.availability != Some(CourseRunAvailability::Archived)
    }
}

impl Course {
    pub fn type_config(&self) -> Option<&'static CourseTypeConfig> {
        CourseTypeConfig::for_course_type(&self.course_type)
    }

    pub fn available_course_runs(&self) -> Vec<&CourseRun> {
        self.course_runs
            .iter()
            .filter(|run| run.is_available())
            .collect()
    }

    /// The advertised run when known, otherwise the first available run.
    pub fn active_course_run(&self) -> Option<&CourseRun> {
        let advertised = self.advertised_course_run_uuid.as_deref().and_then(|uuid| {
            self.course_runs
                .iter()
                .find(|run| run.uuid.as_deref() == Some(uuid))
        });

        advertised.or_else(|| self.course_runs.iter().find(|run| run.is_available()))
    }

    /// List price used to evaluate subsidies that carry a balance.
    pub fn price(&self) -> Option<f64> {
        if self
            .type_config()
            .is_some_and(|config| config.uses_entitlement_list_price)
        {
            return self
                .entitlements
                .first()
                .map(|entitlement| entitlement.price)
                .filter(|price| *price > 0.0);
        }

        let run = self.active_course_run()?;
        run.first_enrollable_paid_seat_price
            .or(run.fixed_price_usd)
            .filter(|price| *price > 0.0)
    }
}
