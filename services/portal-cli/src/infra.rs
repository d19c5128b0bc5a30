use async_trait::async_trait;
use chrono::NaiveDate;
use enterprise_subsidy::eligibility::domain::{
    AuthenticatedUser, BrowseAndRequestConfiguration, CanRedeemResult, ContainsContentItems,
    CouponCodesSnapshot, Course, CourseEnrollment, CourseRecommendations, CourseReviews,
    EnterpriseCustomer, EnterpriseOffer, Entitlement, RedeemablePolicies, SubscriptionsSnapshot,
    SubsidyRequest,
};
use enterprise_subsidy::error::AppError;
use enterprise_subsidy::loader::{DataSourceError, EnterpriseDataSource};
use serde::Deserialize;
use std::path::Path;

/// Recorded responses for every query a course page issues.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct Scenario {
    pub(crate) user: Option<AuthenticatedUser>,
    pub(crate) enterprise: Option<EnterpriseCustomer>,
    pub(crate) redeemable_policies: RedeemablePolicies,
    pub(crate) subscriptions: SubscriptionsSnapshot,
    pub(crate) enterprise_offers: Vec<EnterpriseOffer>,
    pub(crate) coupon_codes: CouponCodesSnapshot,
    pub(crate) license_requests: Vec<SubsidyRequest>,
    pub(crate) coupon_code_requests: Vec<SubsidyRequest>,
    pub(crate) browse_and_request_configuration: Option<BrowseAndRequestConfiguration>,
    pub(crate) courses: Vec<Course>,
    pub(crate) can_redeem: Vec<CanRedeemResult>,
    pub(crate) contains_content_items: ContainsContentItems,
    pub(crate) enrollments: Vec<CourseEnrollment>,
    pub(crate) entitlements: Vec<Entitlement>,
    pub(crate) reviews: Vec<CourseReviews>,
    pub(crate) recommendations: CourseRecommendations,
}

pub(crate) fn load_scenario(path: &Path) -> Result<Scenario, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Serves a [`Scenario`] through the loader's data source seam.
pub(crate) struct ScenarioDataSource {
    scenario: Scenario,
}

impl ScenarioDataSource {
    pub(crate) fn new(scenario: Scenario) -> Self {
        Self { scenario }
    }

    fn enterprise_uuid_matches(&self, enterprise_uuid: &str) -> bool {
        self.scenario
            .enterprise
            .as_ref()
            .is_some_and(|enterprise| enterprise.uuid == enterprise_uuid)
    }

    fn for_enterprise<T: Clone + Default>(&self, enterprise_uuid: &str, value: &T) -> T {
        if self.enterprise_uuid_matches(enterprise_uuid) {
            value.clone()
        } else {
            T::default()
        }
    }
}

#[async_trait]
impl EnterpriseDataSource for ScenarioDataSource {
    async fn enterprise_customer(
        &self,
        slug: &str,
    ) -> Result<Option<EnterpriseCustomer>, DataSourceError> {
        Ok(self
            .scenario
            .enterprise
            .clone()
            .filter(|enterprise| enterprise.slug == slug))
    }

    async fn redeemable_policies(
        &self,
        enterprise_uuid: &str,
        _user_id: u64,
    ) -> Result<RedeemablePolicies, DataSourceError> {
        Ok(self.for_enterprise(enterprise_uuid, &self.scenario.redeemable_policies))
    }

    async fn subscriptions(
        &self,
        enterprise_uuid: &str,
    ) -> Result<SubscriptionsSnapshot, DataSourceError> {
        Ok(self.for_enterprise(enterprise_uuid, &self.scenario.subscriptions))
    }

    async fn enterprise_offers(
        &self,
        enterprise_uuid: &str,
    ) -> Result<Vec<EnterpriseOffer>, DataSourceError> {
        Ok(self.for_enterprise(enterprise_uuid, &self.scenario.enterprise_offers))
    }

    async fn coupon_codes(
        &self,
        enterprise_uuid: &str,
    ) -> Result<CouponCodesSnapshot, DataSourceError> {
        Ok(self.for_enterprise(enterprise_uuid, &self.scenario.coupon_codes))
    }

    async fn license_requests(
        &self,
        enterprise_uuid: &str,
        _user_email: &str,
    ) -> Result<Vec<SubsidyRequest>, DataSourceError> {
        Ok(self.for_enterprise(enterprise_uuid, &self.scenario.license_requests))
    }

    async fn coupon_code_requests(
        &self,
        enterprise_uuid: &str,
        _user_email: &str,
    ) -> Result<Vec<SubsidyRequest>, DataSourceError> {
        Ok(self.for_enterprise(enterprise_uuid, &self.scenario.coupon_code_requests))
    }

    async fn browse_and_request_configuration(
        &self,
        enterprise_uuid: &str,
    ) -> Result<Option<BrowseAndRequestConfiguration>, DataSourceError> {
        Ok(self.for_enterprise(
            enterprise_uuid,
            &self.scenario.browse_and_request_configuration,
        ))
    }

    async fn course_metadata(
        &self,
        course_key: &str,
        _course_run_key: Option<&str>,
    ) -> Result<Option<Course>, DataSourceError> {
        Ok(self
            .scenario
            .courses
            .iter()
            .find(|course| course.key == course_key)
            .cloned())
    }

    async fn can_redeem(
        &self,
        enterprise_uuid: &str,
        course_run_keys: &[String],
    ) -> Result<Vec<CanRedeemResult>, DataSourceError> {
        if !self.enterprise_uuid_matches(enterprise_uuid) {
            return Ok(Vec::new());
        }
        Ok(self
            .scenario
            .can_redeem
            .iter()
            .filter(|result| course_run_keys.contains(&result.content_key))
            .cloned()
            .collect())
    }

    async fn enterprise_course_enrollments(
        &self,
        enterprise_uuid: &str,
    ) -> Result<Vec<CourseEnrollment>, DataSourceError> {
        Ok(self.for_enterprise(enterprise_uuid, &self.scenario.enrollments))
    }

    async fn entitlements(&self, _user_id: u64) -> Result<Vec<Entitlement>, DataSourceError> {
        Ok(self.scenario.entitlements.clone())
    }

    async fn contains_content_items(
        &self,
        enterprise_uuid: &str,
        _course_key: &str,
    ) -> Result<ContainsContentItems, DataSourceError> {
        Ok(self.for_enterprise(enterprise_uuid, &self.scenario.contains_content_items))
    }

    async fn course_reviews(
        &self,
        course_key: &str,
    ) -> Result<Option<CourseReviews>, DataSourceError> {
        Ok(self
            .scenario
            .reviews
            .iter()
            .find(|reviews| reviews.course_key == course_key)
            .cloned())
    }

    async fn course_recommendations(
        &self,
        enterprise_uuid: &str,
        _course_key: &str,
        _search_catalogs: &[String],
    ) -> Result<CourseRecommendations, DataSourceError> {
        Ok(self.for_enterprise(enterprise_uuid, &self.scenario.recommendations))
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
