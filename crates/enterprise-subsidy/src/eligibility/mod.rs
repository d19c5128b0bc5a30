//! Subsidy eligibility resolution for enterprise course enrollment.
//!
//! Everything in this module is a pure function of its inputs: records are
//! borrowed snapshots and no state survives between calls.

pub mod assignments;
pub mod course;
pub mod decision;
pub mod domain;
pub mod offers;
pub mod reasons;
pub mod subsidy;

#[cfg(test)]
mod tests;

pub use assignments::{AssignmentResolver, CourseAssignments};
pub use course::CourseTypeConfig;
pub use decision::{CourseEligibilityInputs, CourseEnrollmentDecision};
pub use offers::{EnterpriseOfferRanker, RankedOffer};
pub use reasons::{
    CtaClass, DisabledEnrollmentContext, DisabledEnrollmentReason,
    DisabledEnrollmentReasonResolver, DisabledEnrollmentReasonType,
    MissingSubsidyAccessPolicyReason, ReasonAction, ReasonLinks,
};
pub use subsidy::{
    ApplicableSubsidy, DiscountType, LearnerSubsidies, RedemptionEligibility, SubsidyCandidates,
    SubsidyType,
};
