use serde::{Deserialize, Serialize};

use super::domain::{AssignmentState, LearnerContentAssignment, RedeemablePolicies};

/// Summary of the allocated assignments that target a course or its runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseAssignments {
    pub allocated_course_run_assignment_keys: Vec<String>,
    pub has_assigned_course_runs: bool,
    pub has_multiple_assigned_course_runs: bool,
    pub is_course_assigned: bool,
}

impl CourseAssignments {
    /// The single assigned run key, if exactly one run is assigned.
    pub fn sole_course_run_key(&self) -> Option<&str> {
        match self.allocated_course_run_assignment_keys.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }
}

/// Matches allocated learner-credit assignments against a course key.
pub struct AssignmentResolver;

impl AssignmentResolver {
    pub fn resolve(course_key: &str, policies: &RedeemablePolicies) -> CourseAssignments {
        let mut run_keys = Vec::new();
        let mut is_course_assigned = false;

        for assignment in policies
            .assignments()
            .filter(|assignment| assignment.state == AssignmentState::Allocated)
        {
            if is_course_run_match(assignment, course_key) {
                is_course_assigned = true;
                run_keys.push(assignment.content_key.clone());
            } else if assignment.content_key == course_key {
                is_course_assigned = true;
            }
        }

        CourseAssignments {
            has_assigned_course_runs: !run_keys.is_empty(),
            has_multiple_assigned_course_runs: run_keys.len() > 1,
            allocated_course_run_assignment_keys: run_keys,
            is_course_assigned,
        }
    }
}

fn is_course_run_match(assignment: &LearnerContentAssignment, course_key: &str) -> bool {
    assignment.is_assigned_course_run
        && assignment.parent_content_key.as_deref() == Some(course_key)
}
