use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    CanRedeemResult, ContainsContentItems, CouponCodesSnapshot, Course, EnterpriseCustomer,
    EnterpriseOffer, SubscriptionsSnapshot,
};
use super::reasons::{
    DisabledEnrollmentContext, DisabledEnrollmentReason, DisabledEnrollmentReasonResolver,
};
use super::subsidy::{
    applicable_coupon_code, applicable_enterprise_offer, applicable_subscription_license,
    ApplicableSubsidy, RedemptionEligibility, SubsidyCandidates,
};

/// Records read back for a course page once the loader has proceeded.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseEligibilityInputs {
    pub enterprise: EnterpriseCustomer,
    pub course: Course,
    pub course_run_key: Option<String>,
    pub subscriptions: SubscriptionsSnapshot,
    pub coupon_codes: CouponCodesSnapshot,
    pub enterprise_offers: Vec<EnterpriseOffer>,
    pub can_redeem: Vec<CanRedeemResult>,
    pub contains_content_items: ContainsContentItems,
}

/// Either the subsidy that funds enrollment or the reason enrollment is disabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseEnrollmentDecision {
    pub course_key: String,
    pub course_run_key: Option<String>,
    pub course_price: Option<f64>,
    pub catalogs_with_course: Vec<String>,
    pub has_successful_redemption: bool,
    pub applicable_subsidy: Option<ApplicableSubsidy>,
    pub disabled_reason: Option<DisabledEnrollmentReason>,
}

impl CourseEnrollmentDecision {
    pub fn evaluate(
        inputs: &CourseEligibilityInputs,
        resolver: &DisabledEnrollmentReasonResolver,
        today: NaiveDate,
    ) -> Self {
        let catalogs = &inputs.contains_content_items.catalog_list;
        let course_price = inputs.course.price();
        let redemption = RedemptionEligibility::from_results(&inputs.can_redeem);

        let candidates = SubsidyCandidates {
            subscription_license: applicable_subscription_license(
                inputs.subscriptions.subscription_license.as_ref(),
                catalogs,
            ),
            learner_credit_policy: redemption.redeemable_policy.as_ref(),
            coupon_code: applicable_coupon_code(&inputs.coupon_codes.coupon_codes, catalogs, today),
            enterprise_offer: applicable_enterprise_offer(
                &inputs.enterprise_offers,
                catalogs,
                course_price,
            ),
        };
        let applicable_subsidy = candidates.select();

        let disabled_reason = if applicable_subsidy.is_some() {
            None
        } else {
            let admins = match &redemption.missing_reason {
                Some(missing) if !missing.enterprise_administrators.is_empty() => {
                    missing.enterprise_administrators.as_slice()
                }
                _ => inputs.enterprise.admin_users.as_slice(),
            };
            let ctx = DisabledEnrollmentContext {
                enterprise_admin_users: admins,
                contact_email: inputs.enterprise.contact_email.as_deref(),
                catalogs_with_course: catalogs,
                coupon_overviews: &inputs.coupon_codes.coupons_overview,
                customer_agreement: inputs.subscriptions.customer_agreement.as_ref(),
                subscription_license: inputs.subscriptions.subscription_license.as_ref(),
                contains_content_items: inputs.contains_content_items.contains_content_items,
                missing_subsidy_access_policy_reason: redemption.missing_reason.as_ref(),
                enterprise_offers: &inputs.enterprise_offers,
                today,
            };
            Some(resolver.resolve(&ctx))
        };

        Self {
            course_key: inputs.course.key.clone(),
            course_run_key: inputs.course_run_key.clone(),
            course_price,
            catalogs_with_course: catalogs.clone(),
            has_successful_redemption: redemption.has_successful_redemption,
            applicable_subsidy,
            disabled_reason,
        }
    }
}
