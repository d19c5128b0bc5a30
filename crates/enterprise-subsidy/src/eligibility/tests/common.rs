use chrono::NaiveDate;

use crate::eligibility::domain::{
    AssignmentState, CouponCode, CouponCodeOverview, CouponUsageType, Course, CourseRun,
    CourseRunAvailability, CustomerAgreement, EnterpriseAdminUser, EnterpriseCustomer,
    EnterpriseOffer, LearnerContentAssignment, LearnerCreditPolicy, LicenseStatus, PolicyType,
    RedeemablePolicies, SubscriptionLicense, SubscriptionPlan,
};
use crate::eligibility::reasons::{
    DisabledEnrollmentContext, DisabledEnrollmentReasonResolver, ReasonLinks,
};

pub(super) const COURSE_KEY: &str = "edX+DemoX";
pub(super) const RUN_KEY: &str = "course-v1:edX+DemoX+Demo";
pub(super) const CATALOG: &str = "catalog-a";
pub(super) const OTHER_CATALOG: &str = "catalog-b";

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 15).expect("valid date")
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn links() -> ReasonLinks {
    ReasonLinks {
        limits_learn_more_url: "https://support.example.com/limits".to_string(),
        deactivation_learn_more_url: "https://support.example.com/deactivation".to_string(),
    }
}

pub(super) fn resolver() -> DisabledEnrollmentReasonResolver {
    DisabledEnrollmentReasonResolver::new(links())
}

pub(super) fn admins() -> Vec<EnterpriseAdminUser> {
    vec![
        EnterpriseAdminUser {
            email: "admin@example.com".to_string(),
            lms_user_id: Some(11),
        },
        EnterpriseAdminUser {
            email: "ops@example.com".to_string(),
            lms_user_id: None,
        },
    ]
}

pub(super) fn catalogs() -> Vec<String> {
    vec![CATALOG.to_string()]
}

/// Context with content in catalog and no subsidy records of any kind.
pub(super) fn base_context<'a>(
    admin_users: &'a [EnterpriseAdminUser],
    catalogs_with_course: &'a [String],
) -> DisabledEnrollmentContext<'a> {
    DisabledEnrollmentContext {
        enterprise_admin_users: admin_users,
        contact_email: None,
        catalogs_with_course,
        coupon_overviews: &[],
        customer_agreement: None,
        subscription_license: None,
        contains_content_items: true,
        missing_subsidy_access_policy_reason: None,
        enterprise_offers: &[],
        today: today(),
    }
}

pub(super) fn enterprise(admin_users: Vec<EnterpriseAdminUser>) -> EnterpriseCustomer {
    EnterpriseCustomer {
        uuid: "ent-uuid".to_string(),
        slug: "test-enterprise".to_string(),
        name: "Test Enterprise".to_string(),
        contact_email: None,
        admin_users,
    }
}

pub(super) fn agreement(catalog: &str) -> CustomerAgreement {
    CustomerAgreement {
        available_subscription_catalogs: vec![catalog.to_string()],
    }
}

pub(super) fn license(catalog: &str, is_current: bool, status: LicenseStatus) -> SubscriptionLicense {
    SubscriptionLicense {
        uuid: "license-uuid".to_string(),
        status,
        subscription_plan: SubscriptionPlan {
            uuid: "plan-uuid".to_string(),
            is_current,
            enterprise_catalog_uuid: catalog.to_string(),
            expiration_date: Some(date(2025, 1, 1)),
        },
    }
}

pub(super) fn coupon_overview(
    catalog: &str,
    start: NaiveDate,
    end: NaiveDate,
    num_unassigned: u32,
) -> CouponCodeOverview {
    CouponCodeOverview {
        enterprise_catalog_uuid: catalog.to_string(),
        start_date: start,
        end_date: end,
        num_unassigned,
    }
}

pub(super) fn coupon_code(code: &str, catalog: &str, start: NaiveDate, end: NaiveDate) -> CouponCode {
    CouponCode {
        code: code.to_string(),
        catalog: catalog.to_string(),
        coupon_start_date: start,
        coupon_end_date: end,
        usage_type: CouponUsageType::Percentage,
        benefit_value: 100.0,
    }
}

pub(super) fn offer(id: &str, catalog: &str) -> EnterpriseOffer {
    EnterpriseOffer {
        id: Some(id.to_string()),
        enterprise_catalog_uuid: catalog.to_string(),
        is_current: Some(true),
        remaining_balance: None,
        remaining_balance_for_user: None,
        remaining_applications: None,
        remaining_applications_for_user: None,
    }
}

pub(super) fn offer_with_balance(id: &str, balance: f64) -> EnterpriseOffer {
    EnterpriseOffer {
        remaining_balance: Some(balance),
        ..offer(id, CATALOG)
    }
}

pub(super) fn assignment(
    content_key: &str,
    parent_content_key: Option<&str>,
    state: AssignmentState,
) -> LearnerContentAssignment {
    LearnerContentAssignment {
        uuid: format!("assignment-{content_key}"),
        content_key: content_key.to_string(),
        parent_content_key: parent_content_key.map(str::to_string),
        is_assigned_course_run: parent_content_key.is_some(),
        state,
    }
}

pub(super) fn policy(
    policy_type: PolicyType,
    is_redeemable: bool,
    assignments: Vec<LearnerContentAssignment>,
) -> LearnerCreditPolicy {
    LearnerCreditPolicy {
        uuid: "policy-uuid".to_string(),
        policy_type,
        is_redeemable,
        catalog_uuid: Some(CATALOG.to_string()),
        learner_content_assignments: assignments,
    }
}

pub(super) fn policies(assignments: Vec<LearnerContentAssignment>) -> RedeemablePolicies {
    RedeemablePolicies {
        redeemable_policies: vec![policy(PolicyType::AssignedLearnerCredit, true, assignments)],
    }
}

pub(super) fn run(key: &str, uuid: &str, seat_price: Option<f64>) -> CourseRun {
    CourseRun {
        key: key.to_string(),
        uuid: Some(uuid.to_string()),
        parent_course_key: Some(COURSE_KEY.to_string()),
        is_enrollable: true,
        is_marketable: true,
        availability: Some(CourseRunAvailability::Current),
        start: Some(date(2024, 6, 1)),
        fixed_price_usd: None,
        first_enrollable_paid_seat_price: seat_price,
    }
}

pub(super) fn course(runs: Vec<CourseRun>) -> Course {
    Course {
        key: COURSE_KEY.to_string(),
        title: "Demo Course".to_string(),
        course_type: "verified-audit".to_string(),
        course_runs: runs,
        advertised_course_run_uuid: None,
        entitlements: Vec::new(),
    }
}
