use async_trait::async_trait;

use crate::eligibility::domain::{
    BrowseAndRequestConfiguration, CanRedeemResult, ContainsContentItems, CouponCodesSnapshot,
    Course, CourseEnrollment, CourseRecommendations, CourseReviews, EnterpriseCustomer,
    EnterpriseOffer, Entitlement, RedeemablePolicies, SubscriptionsSnapshot, SubsidyRequest,
};

/// Failure reported by the host application's data access layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataSourceError {
    #[error("{resource} request failed: {message}")]
    Request {
        resource: &'static str,
        message: String,
    },
    #[error("data source unavailable: {0}")]
    Unavailable(String),
    #[error("cached value for {key} has an unexpected type")]
    CacheTypeMismatch { key: String },
}

/// Producers behind every query the course loader issues.
///
/// Implementations own transport, authentication, and timeouts. Records are
/// returned already normalized.
#[async_trait]
pub trait EnterpriseDataSource: Send + Sync {
    async fn enterprise_customer(
        &self,
        slug: &str,
    ) -> Result<Option<EnterpriseCustomer>, DataSourceError>;

    async fn redeemable_policies(
        &self,
        enterprise_uuid: &str,
        user_id: u64,
    ) -> Result<RedeemablePolicies, DataSourceError>;

    async fn subscriptions(
        &self,
        enterprise_uuid: &str,
    ) -> Result<SubscriptionsSnapshot, DataSourceError>;

    async fn enterprise_offers(
        &self,
        enterprise_uuid: &str,
    ) -> Result<Vec<EnterpriseOffer>, DataSourceError>;

    async fn coupon_codes(
        &self,
        enterprise_uuid: &str,
    ) -> Result<CouponCodesSnapshot, DataSourceError>;

    async fn license_requests(
        &self,
        enterprise_uuid: &str,
        user_email: &str,
    ) -> Result<Vec<SubsidyRequest>, DataSourceError>;

    async fn coupon_code_requests(
        &self,
        enterprise_uuid: &str,
        user_email: &str,
    ) -> Result<Vec<SubsidyRequest>, DataSourceError>;

    async fn browse_and_request_configuration(
        &self,
        enterprise_uuid: &str,
    ) -> Result<Option<BrowseAndRequestConfiguration>, DataSourceError>;

    async fn course_metadata(
        &self,
        course_key: &str,
        course_run_key: Option<&str>,
    ) -> Result<Option<Course>, DataSourceError>;

    async fn can_redeem(
        &self,
        enterprise_uuid: &str,
        course_run_keys: &[String],
    ) -> Result<Vec<CanRedeemResult>, DataSourceError>;

    async fn enterprise_course_enrollments(
        &self,
        enterprise_uuid: &str,
    ) -> Result<Vec<CourseEnrollment>, DataSourceError>;

    async fn entitlements(&self, user_id: u64) -> Result<Vec<Entitlement>, DataSourceError>;

    async fn contains_content_items(
        &self,
        enterprise_uuid: &str,
        course_key: &str,
    ) -> Result<ContainsContentItems, DataSourceError>;

    async fn course_reviews(
        &self,
        course_key: &str,
    ) -> Result<Option<CourseReviews>, DataSourceError>;

    async fn course_recommendations(
        &self,
        enterprise_uuid: &str,
        course_key: &str,
        search_catalogs: &[String],
    ) -> Result<CourseRecommendations, DataSourceError>;
}
