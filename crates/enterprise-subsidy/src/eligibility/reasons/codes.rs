use serde::{Deserialize, Serialize};

/// Machine-readable explanation for why enrollment is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisabledEnrollmentReasonType {
    NoSubsidy,
    NoSubsidyNoAdmins,
    ContentNotInCatalog,
    SubscriptionLicenseNotAssigned,
    SubscriptionLicenseNotAssignedNoAdmins,
    SubscriptionExpired,
    SubscriptionExpiredNoAdmins,
    SubscriptionDeactivated,
    CouponCodeNotAssigned,
    CouponCodeNotAssignedNoAdmins,
    CouponCodesExpired,
    CouponCodesExpiredNoAdmins,
    EnterpriseOfferExpired,
    MissingSubsidyAccessPolicy,
    PolicyNotActive,
    LearnerNotInEnterprise,
    NotEnoughValueInSubsidy,
    LearnerMaxSpendReached,
    LearnerMaxEnrollmentsReached,
}

impl DisabledEnrollmentReasonType {
    pub const ALL: [DisabledEnrollmentReasonType; 19] = [
        Self::NoSubsidy,
        Self::NoSubsidyNoAdmins,
        Self::ContentNotInCatalog,
        Self::SubscriptionLicenseNotAssigned,
        Self::SubscriptionLicenseNotAssignedNoAdmins,
        Self::SubscriptionExpired,
        Self::SubscriptionExpiredNoAdmins,
        Self::SubscriptionDeactivated,
        Self::CouponCodeNotAssigned,
        Self::CouponCodeNotAssignedNoAdmins,
        Self::CouponCodesExpired,
        Self::CouponCodesExpiredNoAdmins,
        Self::EnterpriseOfferExpired,
        Self::MissingSubsidyAccessPolicy,
        Self::PolicyNotActive,
        Self::LearnerNotInEnterprise,
        Self::NotEnoughValueInSubsidy,
        Self::LearnerMaxSpendReached,
        Self::LearnerMaxEnrollmentsReached,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            Self::NoSubsidy => "NO_SUBSIDY",
            Self::NoSubsidyNoAdmins => "NO_SUBSIDY_NO_ADMINS",
            Self::ContentNotInCatalog => "CONTENT_NOT_IN_CATALOG",
            Self::SubscriptionLicenseNotAssigned => "SUBSCRIPTION_LICENSE_NOT_ASSIGNED",
            Self::SubscriptionLicenseNotAssignedNoAdmins => {
                "SUBSCRIPTION_LICENSE_NOT_ASSIGNED_NO_ADMINS"
            }
            Self::SubscriptionExpired => "SUBSCRIPTION_EXPIRED",
            Self::SubscriptionExpiredNoAdmins => "SUBSCRIPTION_EXPIRED_NO_ADMINS",
            Self::SubscriptionDeactivated => "SUBSCRIPTION_DEACTIVATED",
            Self::CouponCodeNotAssigned => "COUPON_CODE_NOT_ASSIGNED",
            Self::CouponCodeNotAssignedNoAdmins => "COUPON_CODE_NOT_ASSIGNED_NO_ADMINS",
            Self::CouponCodesExpired => "COUPON_CODES_EXPIRED",
            Self::CouponCodesExpiredNoAdmins => "COUPON_CODES_EXPIRED_NO_ADMINS",
            Self::EnterpriseOfferExpired => "ENTERPRISE_OFFER_EXPIRED",
            Self::MissingSubsidyAccessPolicy => "MISSING_SUBSIDY_ACCESS_POLICY",
            Self::PolicyNotActive => "POLICY_NOT_ACTIVE",
            Self::LearnerNotInEnterprise => "LEARNER_NOT_IN_ENTERPRISE",
            Self::NotEnoughValueInSubsidy => "NOT_ENOUGH_VALUE_IN_SUBSIDY",
            Self::LearnerMaxSpendReached => "LEARNER_MAX_SPEND_REACHED",
            Self::LearnerMaxEnrollmentsReached => "LEARNER_MAX_ENROLLMENTS_REACHED",
        }
    }

    /// Parse a reason code as reported by the policy-evaluation service.
    pub fn from_code(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|reason| reason.code() == normalized)
    }

    /// Pick the admin-aware or the `_NO_ADMINS` variant of a reason.
    pub(crate) fn for_admins(has_admins: bool, with_admins: Self, without_admins: Self) -> Self {
        if has_admins {
            with_admins
        } else {
            without_admins
        }
    }

    pub const fn default_user_message(self) -> &'static str {
        match self {
            Self::NoSubsidy => "You don't have access to this course because your organization hasn't provided you with funding. Reach out to your administrator for access.",
            Self::NoSubsidyNoAdmins => "You don't have access to this course because your organization hasn't provided you with funding.",
            Self::ContentNotInCatalog => "This course is not available in your organization's catalog. Reach out to your administrator for access.",
            Self::SubscriptionLicenseNotAssigned => "You don't have access to this course because you haven't been assigned a subscription license. Reach out to your administrator for access.",
            Self::SubscriptionLicenseNotAssignedNoAdmins => "You don't have access to this course because you haven't been assigned a subscription license.",
            Self::SubscriptionExpired => "Your organization's subscription has expired. Reach out to your administrator for access.",
            Self::SubscriptionExpiredNoAdmins => "Your organization's subscription has expired.",
            Self::SubscriptionDeactivated => "Your subscription license has been deactivated.",
            Self::CouponCodeNotAssigned => "You don't have access to this course because you haven't been assigned a coupon code. Reach out to your administrator for access.",
            Self::CouponCodeNotAssignedNoAdmins => "You don't have access to this course because you haven't been assigned a coupon code.",
            Self::CouponCodesExpired => "Your organization's codes have expired. Reach out to your administrator for access.",
            Self::CouponCodesExpiredNoAdmins => "Your organization's codes have expired.",
            Self::EnterpriseOfferExpired => "Your organization's learning budget has expired. Reach out to your administrator for access.",
            Self::MissingSubsidyAccessPolicy => "You don't have access to this course through your organization's learning budget.",
            Self::PolicyNotActive => "Your organization's learning budget is not active. Reach out to your administrator for access.",
            Self::LearnerNotInEnterprise => "You are no longer a member of this organization.",
            Self::NotEnoughValueInSubsidy => "Your organization doesn't have enough funds remaining to cover this course. Reach out to your administrator for access.",
            Self::LearnerMaxSpendReached => "You've reached your personal spend limit for your organization's learning budget.",
            Self::LearnerMaxEnrollmentsReached => "You've reached the enrollment limit for your organization's learning budget.",
        }
    }
}

impl std::fmt::Display for DisabledEnrollmentReasonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
