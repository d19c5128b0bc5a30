mod codes;
mod cta;
mod resolver;

pub use codes::DisabledEnrollmentReasonType;
pub use cta::{CtaClass, ReasonAction, ReasonLinks};
pub use resolver::{
    DisabledEnrollmentContext, DisabledEnrollmentReason, DisabledEnrollmentReasonResolver,
    MissingSubsidyAccessPolicyReason,
};
