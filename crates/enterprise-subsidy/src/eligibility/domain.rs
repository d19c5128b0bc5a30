use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Enterprise customer resolved from the route slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseCustomer {
    pub uuid: String,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub admin_users: Vec<EnterpriseAdminUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseAdminUser {
    pub email: String,
    #[serde(default)]
    pub lms_user_id: Option<u64>,
}

/// Learner identity handed to the loader by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub user_id: u64,
    pub username: String,
    pub email: String,
}

/// Immutable course metadata snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub key: String,
    #[serde(default)]
    pub title: String,
    pub course_type: String,
    #[serde(default)]
    pub course_runs: Vec<CourseRun>,
    #[serde(default)]
    pub advertised_course_run_uuid: Option<String>,
    #[serde(default)]
    pub entitlements: Vec<CourseEntitlementPrice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseEntitlementPrice {
    pub mode: String,
    pub price: f64,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRun {
    pub key: String,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub parent_course_key: Option<String>,
    #[serde(default)]
    pub is_enrollable: bool,
    #[serde(default)]
    pub is_marketable: bool,
    #[serde(default)]
    pub availability: Option<CourseRunAvailability>,
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub fixed_price_usd: Option<f64>,
    #[serde(default)]
    pub first_enrollable_paid_seat_price: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseRunAvailability {
    Current,
    #[serde(rename = "Starting Soon")]
    StartingSoon,
    Upcoming,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseStatus {
    Activated,
    Assigned,
    Revoked,
    Unassigned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    pub uuid: String,
    pub is_current: bool,
    pub enterprise_catalog_uuid: String,
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionLicense {
    pub uuid: String,
    pub status: LicenseStatus,
    pub subscription_plan: SubscriptionPlan,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAgreement {
    #[serde(default)]
    pub available_subscription_catalogs: Vec<String>,
}

/// Subscription records for the learner within one enterprise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionsSnapshot {
    #[serde(default)]
    pub customer_agreement: Option<CustomerAgreement>,
    #[serde(default)]
    pub subscription_license: Option<SubscriptionLicense>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponCodeOverview {
    pub enterprise_catalog_uuid: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub num_unassigned: u32,
}

impl CouponCodeOverview {
    /// Whether `today` falls inside the inclusive validity window.
    pub fn is_current_on(&self, today: NaiveDate) -> bool {
        self.start_date <= today && today <= self.end_date
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponCode {
    pub code: String,
    pub catalog: String,
    pub coupon_start_date: NaiveDate,
    pub coupon_end_date: NaiveDate,
    #[serde(default)]
    pub usage_type: CouponUsageType,
    #[serde(default = "full_benefit")]
    pub benefit_value: f64,
}

fn full_benefit() -> f64 {
    100.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponUsageType {
    #[default]
    Percentage,
    Absolute,
}

/// Coupon overviews visible to the enterprise plus the learner's assigned codes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponCodesSnapshot {
    #[serde(default)]
    pub coupons_overview: Vec<CouponCodeOverview>,
    #[serde(default)]
    pub coupon_codes: Vec<CouponCode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseOffer {
    #[serde(default)]
    pub id: Option<String>,
    pub enterprise_catalog_uuid: String,
    #[serde(default)]
    pub is_current: Option<bool>,
    #[serde(default)]
    pub remaining_balance: Option<f64>,
    #[serde(default)]
    pub remaining_balance_for_user: Option<f64>,
    #[serde(default)]
    pub remaining_applications: Option<u32>,
    #[serde(default)]
    pub remaining_applications_for_user: Option<u32>,
}

impl EnterpriseOffer {
    /// An absent `isCurrent` flag counts as current.
    pub fn is_current(&self) -> bool {
        self.is_current.unwrap_or(true)
    }

    /// Balance bound used for ranking, preferring the per-learner value.
    pub fn effective_balance(&self) -> Option<f64> {
        self.remaining_balance_for_user.or(self.remaining_balance)
    }

    /// Application bound used for ranking, preferring the per-learner value.
    pub fn effective_applications(&self) -> Option<u32> {
        self.remaining_applications_for_user
            .or(self.remaining_applications)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyType {
    PerLearnerSpendCredit,
    PerLearnerEnrollmentCredit,
    AssignedLearnerCredit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentState {
    Allocated,
    Accepted,
    Cancelled,
    Expired,
    Errored,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerContentAssignment {
    pub uuid: String,
    pub content_key: String,
    #[serde(default)]
    pub parent_content_key: Option<String>,
    #[serde(default)]
    pub is_assigned_course_run: bool,
    pub state: AssignmentState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerCreditPolicy {
    pub uuid: String,
    pub policy_type: PolicyType,
    #[serde(default)]
    pub is_redeemable: bool,
    #[serde(default)]
    pub catalog_uuid: Option<String>,
    #[serde(default)]
    pub learner_content_assignments: Vec<LearnerContentAssignment>,
}

/// Learner-credit policies returned by the redeemable-policies endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemablePolicies {
    #[serde(default)]
    pub redeemable_policies: Vec<LearnerCreditPolicy>,
}

impl RedeemablePolicies {
    pub fn assignments(&self) -> impl Iterator<Item = &LearnerContentAssignment> {
        self.redeemable_policies
            .iter()
            .flat_map(|policy| policy.learner_content_assignments.iter())
    }

    pub fn has_allocated_or_accepted_assignments(&self) -> bool {
        self.assignments().any(|assignment| {
            matches!(
                assignment.state,
                AssignmentState::Allocated | AssignmentState::Accepted
            )
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubsidyRequestState {
    Requested,
    Pending,
    Approved,
    Declined,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsidyRequest {
    pub uuid: String,
    pub state: SubsidyRequestState,
    #[serde(default)]
    pub course_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseAndRequestConfiguration {
    #[serde(default)]
    pub subsidy_requests_enabled: bool,
    #[serde(default)]
    pub subsidy_type: Option<String>,
}

/// Response of the enterprise catalog contains-content-items check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainsContentItems {
    pub contains_content_items: bool,
    #[serde(default)]
    pub catalog_list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseEnrollment {
    pub course_run_id: String,
    #[serde(default)]
    pub is_enrollment_active: bool,
    #[serde(default)]
    pub is_revoked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entitlement {
    pub course_uuid: String,
    pub mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseReviews {
    pub course_key: String,
    #[serde(default)]
    pub reviews_count: u32,
    #[serde(default)]
    pub avg_course_rating: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecommendations {
    #[serde(default)]
    pub all_recommendations: Vec<String>,
    #[serde(default)]
    pub same_partner_recommendations: Vec<String>,
}

/// Reason record attached to a failed can-redeem check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanRedeemReason {
    pub reason: String,
    #[serde(default)]
    pub user_message: Option<String>,
    #[serde(default)]
    pub enterprise_administrators: Vec<EnterpriseAdminUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanRedeemResult {
    pub content_key: String,
    pub can_redeem: bool,
    #[serde(default)]
    pub redeemable_subsidy_access_policy: Option<LearnerCreditPolicy>,
    #[serde(default)]
    pub has_successful_redemption: bool,
    #[serde(default)]
    pub reasons: Vec<CanRedeemReason>,
}
