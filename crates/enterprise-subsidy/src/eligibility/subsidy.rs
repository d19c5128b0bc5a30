use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    CanRedeemResult, CouponCode, CouponCodesSnapshot, CouponUsageType, EnterpriseOffer,
    LearnerCreditPolicy, LicenseStatus, PolicyType, RedeemablePolicies, SubscriptionLicense,
    SubscriptionsSnapshot, SubsidyRequest, SubsidyRequestState,
};
use super::offers::EnterpriseOfferRanker;
use super::reasons::{DisabledEnrollmentReasonType, MissingSubsidyAccessPolicyReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubsidyType {
    License,
    LearnerCredit,
    CouponCode,
    EnterpriseOffer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percentage,
    Absolute,
}

/// The subsidy that will fund an enrollment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicableSubsidy {
    pub subsidy_type: SubsidyType,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub source_id: Option<String>,
    pub expiration_date: Option<NaiveDate>,
}

/// Per-mechanism subsidies that could fund the course; at most one is applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubsidyCandidates<'a> {
    pub subscription_license: Option<&'a SubscriptionLicense>,
    pub learner_credit_policy: Option<&'a LearnerCreditPolicy>,
    pub coupon_code: Option<&'a CouponCode>,
    pub enterprise_offer: Option<&'a EnterpriseOffer>,
}

impl SubsidyCandidates<'_> {
    /// License, then learner credit, then coupon code, then enterprise offer.
    pub fn select(&self) -> Option<ApplicableSubsidy> {
        if let Some(license) = self.subscription_license {
            return Some(ApplicableSubsidy {
                subsidy_type: SubsidyType::License,
                discount_type: DiscountType::Percentage,
                discount_value: 100.0,
                source_id: Some(license.uuid.clone()),
                expiration_date: license.subscription_plan.expiration_date,
            });
        }

        if let Some(policy) = self.learner_credit_policy {
            return Some(ApplicableSubsidy {
                subsidy_type: SubsidyType::LearnerCredit,
                discount_type: DiscountType::Percentage,
                discount_value: 100.0,
                source_id: Some(policy.uuid.clone()),
                expiration_date: None,
            });
        }

        if let Some(code) = self.coupon_code {
            let discount_type = match code.usage_type {
                CouponUsageType::Percentage => DiscountType::Percentage,
                CouponUsageType::Absolute => DiscountType::Absolute,
            };
            return Some(ApplicableSubsidy {
                subsidy_type: SubsidyType::CouponCode,
                discount_type,
                discount_value: code.benefit_value,
                source_id: Some(code.code.clone()),
                expiration_date: Some(code.coupon_end_date),
            });
        }

        self.enterprise_offer.map(|offer| ApplicableSubsidy {
            subsidy_type: SubsidyType::EnterpriseOffer,
            discount_type: DiscountType::Percentage,
            discount_value: 100.0,
            source_id: offer.id.clone(),
            expiration_date: None,
        })
    }
}

fn contains(catalogs: &[String], catalog: &str) -> bool {
    catalogs.iter().any(|candidate| candidate == catalog)
}

pub fn applicable_subscription_license<'a>(
    license: Option<&'a SubscriptionLicense>,
    catalogs_with_course: &[String],
) -> Option<&'a SubscriptionLicense> {
    license.filter(|license| {
        license.status == LicenseStatus::Activated
            && license.subscription_plan.is_current
            && contains(
                catalogs_with_course,
                &license.subscription_plan.enterprise_catalog_uuid,
            )
    })
}

pub fn applicable_coupon_code<'a>(
    coupon_codes: &'a [CouponCode],
    catalogs_with_course: &[String],
    today: NaiveDate,
) -> Option<&'a CouponCode> {
    coupon_codes.iter().find(|code| {
        contains(catalogs_with_course, &code.catalog)
            && code.coupon_start_date <= today
            && today <= code.coupon_end_date
    })
}

/// The top-ranked offer, applied only when it can actually pay for the course.
pub fn applicable_enterprise_offer<'a>(
    offers: &'a [EnterpriseOffer],
    catalogs_with_course: &[String],
    course_price: Option<f64>,
) -> Option<&'a EnterpriseOffer> {
    EnterpriseOfferRanker::ranked(offers, catalogs_with_course, course_price)
        .into_iter()
        .next()
        .filter(|ranked| ranked.redeemable)
        .map(|ranked| ranked.offer)
}

/// Interpretation of the can-redeem response for a course's runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedemptionEligibility {
    pub redeemable_policy: Option<LearnerCreditPolicy>,
    pub has_successful_redemption: bool,
    pub missing_reason: Option<MissingSubsidyAccessPolicyReason>,
}

impl RedemptionEligibility {
    pub fn from_results(results: &[CanRedeemResult]) -> Self {
        let has_successful_redemption = results
            .iter()
            .any(|result| result.has_successful_redemption);

        let redeemable_policy = results
            .iter()
            .filter(|result| result.can_redeem)
            .find_map(|result| result.redeemable_subsidy_access_policy.clone());

        let missing_reason = if redeemable_policy.is_some() {
            None
        } else {
            results
                .iter()
                .find_map(|result| result.reasons.first())
                .map(|reason| MissingSubsidyAccessPolicyReason {
                    reason: DisabledEnrollmentReasonType::from_code(&reason.reason)
                        .unwrap_or(DisabledEnrollmentReasonType::MissingSubsidyAccessPolicy),
                    user_message: reason.user_message.clone(),
                    enterprise_administrators: reason.enterprise_administrators.clone(),
                })
        };

        Self {
            redeemable_policy,
            has_successful_redemption,
            missing_reason,
        }
    }
}

/// Subsidy bundle fetched for the learner, as read back from the cache.
#[derive(Debug, Clone, Copy)]
pub struct LearnerSubsidies<'a> {
    pub subscriptions: &'a SubscriptionsSnapshot,
    pub license_requests: &'a [SubsidyRequest],
    pub coupon_codes: &'a CouponCodesSnapshot,
    pub coupon_code_requests: &'a [SubsidyRequest],
    pub enterprise_offers: &'a [EnterpriseOffer],
    pub policies: &'a RedeemablePolicies,
}

impl LearnerSubsidies<'_> {
    fn active_license(&self) -> Option<&SubscriptionLicense> {
        self.subscriptions
            .subscription_license
            .as_ref()
            .filter(|license| {
                license.status == LicenseStatus::Activated && license.subscription_plan.is_current
            })
    }

    fn current_offers(&self) -> impl Iterator<Item = &EnterpriseOffer> {
        self.enterprise_offers.iter().filter(|offer| offer.is_current())
    }

    /// Learners whose only funding is content assignments.
    pub fn is_assignment_only(&self) -> bool {
        let has_assignments = self.policies.has_allocated_or_accepted_assignments();
        let has_license_or_request =
            self.active_license().is_some() || has_open_request(self.license_requests);
        let has_codes_or_request = !self.coupon_codes.coupon_codes.is_empty()
            || has_open_request(self.coupon_code_requests);
        let has_current_offers = self.current_offers().next().is_some();
        let has_auto_applied_credit = self.policies.redeemable_policies.iter().any(|policy| {
            policy.is_redeemable && policy.policy_type != PolicyType::AssignedLearnerCredit
        });

        has_assignments
            && !has_license_or_request
            && !has_codes_or_request
            && !has_current_offers
            && !has_auto_applied_credit
    }

    /// Catalogs the learner can search, deduplicated in first-seen order.
    pub fn search_catalogs(&self) -> Vec<String> {
        let mut catalogs: Vec<String> = Vec::new();
        let mut push = |catalog: &str| {
            if !catalogs.iter().any(|existing| existing == catalog) {
                catalogs.push(catalog.to_string());
            }
        };

        if let Some(license) = self.active_license() {
            push(&license.subscription_plan.enterprise_catalog_uuid);
        }
        for code in &self.coupon_codes.coupon_codes {
            push(&code.catalog);
        }
        for offer in self.current_offers() {
            push(&offer.enterprise_catalog_uuid);
        }
        for policy in self
            .policies
            .redeemable_policies
            .iter()
            .filter(|policy| policy.is_redeemable)
        {
            if let Some(catalog) = policy.catalog_uuid.as_deref() {
                push(catalog);
            }
        }

        catalogs
    }
}

fn has_open_request(requests: &[SubsidyRequest]) -> bool {
    requests.iter().any(|request| {
        matches!(
            request.state,
            SubsidyRequestState::Requested | SubsidyRequestState::Pending
        )
    })
}
