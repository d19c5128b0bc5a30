use serde::{Deserialize, Serialize};

use super::codes::DisabledEnrollmentReasonType;
use crate::eligibility::domain::EnterpriseAdminUser;

/// Support links rendered next to a disabled-enrollment message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonLinks {
    pub limits_learn_more_url: String,
    pub deactivation_learn_more_url: String,
}

/// Call-to-action family for a reason code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CtaClass {
    LimitsInfoLink,
    DeactivationInfoLink,
    ContactAdminLink,
    None,
}

impl CtaClass {
    pub fn for_reason(reason: DisabledEnrollmentReasonType) -> Self {
        use DisabledEnrollmentReasonType as R;
        match reason {
            R::LearnerMaxSpendReached | R::LearnerMaxEnrollmentsReached => Self::LimitsInfoLink,
            R::SubscriptionDeactivated => Self::DeactivationInfoLink,
            R::NoSubsidy
            | R::ContentNotInCatalog
            | R::SubscriptionLicenseNotAssigned
            | R::SubscriptionExpired
            | R::CouponCodeNotAssigned
            | R::CouponCodesExpired
            | R::EnterpriseOfferExpired
            | R::PolicyNotActive
            | R::NotEnoughValueInSubsidy => Self::ContactAdminLink,
            R::NoSubsidyNoAdmins
            | R::SubscriptionLicenseNotAssignedNoAdmins
            | R::SubscriptionExpiredNoAdmins
            | R::CouponCodeNotAssignedNoAdmins
            | R::CouponCodesExpiredNoAdmins
            | R::MissingSubsidyAccessPolicy
            | R::LearnerNotInEnterprise => Self::None,
        }
    }
}

/// Concrete link behind a call-to-action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReasonAction {
    LearnMore { label: String, href: String },
    ContactAdmin { label: String, href: String },
}

pub(crate) fn resolve_action(
    class: CtaClass,
    links: &ReasonLinks,
    contact_email: Option<&str>,
    admins: &[EnterpriseAdminUser],
) -> Option<ReasonAction> {
    match class {
        CtaClass::LimitsInfoLink => Some(ReasonAction::LearnMore {
            label: "Learn about limits".to_string(),
            href: links.limits_learn_more_url.clone(),
        }),
        CtaClass::DeactivationInfoLink => Some(ReasonAction::LearnMore {
            label: "Learn about deactivation".to_string(),
            href: links.deactivation_learn_more_url.clone(),
        }),
        CtaClass::ContactAdminLink => {
            contact_mailto(contact_email, admins).map(|href| ReasonAction::ContactAdmin {
                label: "Contact administrator".to_string(),
                href,
            })
        }
        CtaClass::None => None,
    }
}

fn contact_mailto(contact_email: Option<&str>, admins: &[EnterpriseAdminUser]) -> Option<String> {
    if let Some(email) = contact_email.filter(|email| !email.trim().is_empty()) {
        return Some(format!("mailto:{email}"));
    }

    if admins.is_empty() {
        return None;
    }

    let recipients = admins
        .iter()
        .map(|admin| admin.email.as_str())
        .collect::<Vec<_>>()
        .join(",");
    Some(format!("mailto:{recipients}"))
}
