use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::codes::DisabledEnrollmentReasonType;
use super::cta::{resolve_action, CtaClass, ReasonAction, ReasonLinks};
use crate::eligibility::domain::{
    CouponCodeOverview, CustomerAgreement, EnterpriseAdminUser, EnterpriseOffer, LicenseStatus,
    SubscriptionLicense,
};
use crate::eligibility::offers::offers_for_catalogs;

/// Reason reported by the policy-evaluation service, passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingSubsidyAccessPolicyReason {
    pub reason: DisabledEnrollmentReasonType,
    pub user_message: Option<String>,
    pub enterprise_administrators: Vec<EnterpriseAdminUser>,
}

/// Everything the resolver needs, passed explicitly for a single resolution.
#[derive(Debug, Clone, Copy)]
pub struct DisabledEnrollmentContext<'a> {
    pub enterprise_admin_users: &'a [EnterpriseAdminUser],
    pub contact_email: Option<&'a str>,
    pub catalogs_with_course: &'a [String],
    pub coupon_overviews: &'a [CouponCodeOverview],
    pub customer_agreement: Option<&'a CustomerAgreement>,
    pub subscription_license: Option<&'a SubscriptionLicense>,
    pub contains_content_items: bool,
    pub missing_subsidy_access_policy_reason: Option<&'a MissingSubsidyAccessPolicyReason>,
    pub enterprise_offers: &'a [EnterpriseOffer],
    pub today: NaiveDate,
}

impl DisabledEnrollmentContext<'_> {
    fn has_admins(&self) -> bool {
        !self.enterprise_admin_users.is_empty()
    }

    fn catalog_matches(&self, catalog: &str) -> bool {
        self.catalogs_with_course
            .iter()
            .any(|candidate| candidate == catalog)
    }
}

/// Reason, message, and call-to-action surfaced when enrollment is disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisabledEnrollmentReason {
    pub reason: DisabledEnrollmentReasonType,
    pub user_message: String,
    pub cta_class: CtaClass,
    pub action: Option<ReasonAction>,
}

/// Chooses the single best explanation for a learner who cannot enroll.
#[derive(Debug, Clone)]
pub struct DisabledEnrollmentReasonResolver {
    links: ReasonLinks,
}

impl DisabledEnrollmentReasonResolver {
    pub fn new(links: ReasonLinks) -> Self {
        Self { links }
    }

    pub fn resolve(&self, ctx: &DisabledEnrollmentContext<'_>) -> DisabledEnrollmentReason {
        let (reason, explicit_message) = select_reason(ctx);
        let user_message = explicit_message
            .unwrap_or_else(|| reason.default_user_message().to_string());
        let cta_class = CtaClass::for_reason(reason);
        let action = resolve_action(
            cta_class,
            &self.links,
            ctx.contact_email,
            ctx.enterprise_admin_users,
        );

        DisabledEnrollmentReason {
            reason,
            user_message,
            cta_class,
            action,
        }
    }
}

fn select_reason(ctx: &DisabledEnrollmentContext<'_>) -> (DisabledEnrollmentReasonType, Option<String>) {
    if !ctx.contains_content_items {
        return (DisabledEnrollmentReasonType::ContentNotInCatalog, None);
    }

    if let Some(reason) = subscription_reason(ctx) {
        return (reason, None);
    }

    if let Some(reason) = coupon_reason(ctx) {
        return (reason, None);
    }

    if let Some(missing) = ctx.missing_subsidy_access_policy_reason {
        return (missing.reason, missing.user_message.clone());
    }

    if let Some(reason) = enterprise_offer_reason(ctx) {
        return (reason, None);
    }

    let fallback = DisabledEnrollmentReasonType::for_admins(
        ctx.has_admins(),
        DisabledEnrollmentReasonType::NoSubsidy,
        DisabledEnrollmentReasonType::NoSubsidyNoAdmins,
    );
    (fallback, None)
}

fn subscription_reason(
    ctx: &DisabledEnrollmentContext<'_>,
) -> Option<DisabledEnrollmentReasonType> {
    use DisabledEnrollmentReasonType as R;

    let has_applicable_plan = ctx.customer_agreement.is_some_and(|agreement| {
        agreement
            .available_subscription_catalogs
            .iter()
            .any(|catalog| ctx.catalog_matches(catalog))
    });
    if !has_applicable_plan {
        return None;
    }

    let has_admins = ctx.has_admins();
    let license = match ctx.subscription_license.filter(|license| {
        ctx.catalog_matches(&license.subscription_plan.enterprise_catalog_uuid)
    }) {
        Some(license) => license,
        None => {
            return Some(R::for_admins(
                has_admins,
                R::SubscriptionLicenseNotAssigned,
                R::SubscriptionLicenseNotAssignedNoAdmins,
            ))
        }
    };

    if !license.subscription_plan.is_current {
        return Some(R::for_admins(
            has_admins,
            R::SubscriptionExpired,
            R::SubscriptionExpiredNoAdmins,
        ));
    }

    if license.status == LicenseStatus::Revoked {
        return Some(R::SubscriptionDeactivated);
    }

    None
}

fn coupon_reason(
    ctx: &DisabledEnrollmentContext<'_>,
) -> Option<DisabledEnrollmentReasonType> {
    use DisabledEnrollmentReasonType as R;

    let applicable: Vec<&CouponCodeOverview> = ctx
        .coupon_overviews
        .iter()
        .filter(|coupon| ctx.catalog_matches(&coupon.enterprise_catalog_uuid))
        .collect();
    if applicable.is_empty() {
        return None;
    }

    let has_admins = ctx.has_admins();
    let current: Vec<&CouponCodeOverview> = applicable
        .iter()
        .copied()
        .filter(|coupon| coupon.is_current_on(ctx.today))
        .collect();
    if current.is_empty() {
        return Some(R::for_admins(
            has_admins,
            R::CouponCodesExpired,
            R::CouponCodesExpiredNoAdmins,
        ));
    }

    // Exhausted coupons and coupons with unassigned codes both report
    // COUPON_CODE_NOT_ASSIGNED. The learner holds no code either way.
    let all_exhausted = current.iter().all(|coupon| coupon.num_unassigned == 0);
    let any_unassigned = current.iter().any(|coupon| coupon.num_unassigned > 0);
    if all_exhausted || any_unassigned {
        return Some(R::for_admins(
            has_admins,
            R::CouponCodeNotAssigned,
            R::CouponCodeNotAssignedNoAdmins,
        ));
    }

    None
}

fn enterprise_offer_reason(
    ctx: &DisabledEnrollmentContext<'_>,
) -> Option<DisabledEnrollmentReasonType> {
    let applicable = offers_for_catalogs(ctx.enterprise_offers, ctx.catalogs_with_course);
    if applicable.is_empty() {
        return None;
    }

    if applicable.iter().all(|offer| !offer.is_current()) {
        return Some(DisabledEnrollmentReasonType::EnterpriseOfferExpired);
    }

    None
}
