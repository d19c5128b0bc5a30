use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Barrier;

use crate::eligibility::domain::{
    AssignmentState, AuthenticatedUser, BrowseAndRequestConfiguration, CanRedeemResult,
    ContainsContentItems, CouponCodesSnapshot, Course, CourseEnrollment, CourseRecommendations,
    CourseReviews, CourseRun, CourseRunAvailability, EnterpriseAdminUser, EnterpriseCustomer,
    EnterpriseOffer, Entitlement, LearnerContentAssignment, LearnerCreditPolicy, PolicyType,
    RedeemablePolicies, SubscriptionsSnapshot, SubsidyRequest,
};
use crate::loader::{CourseLoader, DataSourceError, EnterpriseDataSource, QueryCache};

pub(super) const SLUG: &str = "test-enterprise";
pub(super) const ENTERPRISE_UUID: &str = "ent-uuid";
pub(super) const COURSE_KEY: &str = "edX+DemoX";
pub(super) const RUN_KEY: &str = "course-v1:edX+DemoX+Demo";
pub(super) const CATALOG: &str = "catalog-a";

/// In-memory data source that records every fetch it serves.
pub(super) struct FakeDataSource {
    pub(super) enterprise: Option<EnterpriseCustomer>,
    pub(super) policies: RedeemablePolicies,
    pub(super) subscriptions: SubscriptionsSnapshot,
    pub(super) offers: Vec<EnterpriseOffer>,
    pub(super) coupon_codes: CouponCodesSnapshot,
    pub(super) license_requests: Vec<SubsidyRequest>,
    pub(super) coupon_code_requests: Vec<SubsidyRequest>,
    pub(super) course: Option<Course>,
    pub(super) can_redeem: Vec<CanRedeemResult>,
    pub(super) contains_content_items: ContainsContentItems,
    pub(super) failing: Option<&'static str>,
    pub(super) bundle_barrier: Option<Arc<Barrier>>,
    pub(super) calls: Mutex<Vec<&'static str>>,
    pub(super) metadata_run_keys: Mutex<Vec<Option<String>>>,
    pub(super) can_redeem_keys: Mutex<Vec<Vec<String>>>,
    pub(super) recommendation_catalogs: Mutex<Vec<Vec<String>>>,
}

impl Default for FakeDataSource {
    fn default() -> Self {
        Self {
            enterprise: Some(enterprise()),
            policies: RedeemablePolicies::default(),
            subscriptions: SubscriptionsSnapshot::default(),
            offers: Vec::new(),
            coupon_codes: CouponCodesSnapshot::default(),
            license_requests: Vec::new(),
            coupon_code_requests: Vec::new(),
            course: Some(course("verified-audit")),
            can_redeem: Vec::new(),
            contains_content_items: ContainsContentItems {
                contains_content_items: true,
                catalog_list: vec![CATALOG.to_string()],
            },
            failing: None,
            bundle_barrier: None,
            calls: Mutex::new(Vec::new()),
            metadata_run_keys: Mutex::new(Vec::new()),
            can_redeem_keys: Mutex::new(Vec::new()),
            recommendation_catalogs: Mutex::new(Vec::new()),
        }
    }
}

impl FakeDataSource {
    pub(super) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("calls mutex").clone()
    }

    pub(super) fn called(&self, resource: &str) -> bool {
        self.calls().iter().any(|call| *call == resource)
    }

    pub(super) fn call_count(&self, resource: &str) -> usize {
        self.calls().iter().filter(|call| **call == resource).count()
    }

    pub(super) fn metadata_run_keys(&self) -> Vec<Option<String>> {
        self.metadata_run_keys.lock().expect("metadata mutex").clone()
    }

    pub(super) fn can_redeem_keys(&self) -> Vec<Vec<String>> {
        self.can_redeem_keys.lock().expect("can redeem mutex").clone()
    }

    pub(super) fn recommendation_catalogs(&self) -> Vec<Vec<String>> {
        self.recommendation_catalogs
            .lock()
            .expect("recommendations mutex")
            .clone()
    }

    fn record(&self, resource: &'static str) -> Result<(), DataSourceError> {
        self.calls.lock().expect("calls mutex").push(resource);
        if self.failing == Some(resource) {
            return Err(DataSourceError::Request {
                resource,
                message: "503 Service Unavailable".to_string(),
            });
        }
        Ok(())
    }

    async fn bundle_fetch(&self, resource: &'static str) -> Result<(), DataSourceError> {
        self.record(resource)?;
        if let Some(barrier) = &self.bundle_barrier {
            barrier.wait().await;
        }
        Ok(())
    }
}

#[async_trait]
impl EnterpriseDataSource for FakeDataSource {
    async fn enterprise_customer(
        &self,
        _slug: &str,
    ) -> Result<Option<EnterpriseCustomer>, DataSourceError> {
        self.record("enterprise_customer")?;
        Ok(self.enterprise.clone())
    }

    async fn redeemable_policies(
        &self,
        _enterprise_uuid: &str,
        _user_id: u64,
    ) -> Result<RedeemablePolicies, DataSourceError> {
        self.bundle_fetch("redeemable_policies").await?;
        Ok(self.policies.clone())
    }

    async fn subscriptions(
        &self,
        _enterprise_uuid: &str,
    ) -> Result<SubscriptionsSnapshot, DataSourceError> {
        self.bundle_fetch("subscriptions").await?;
        Ok(self.subscriptions.clone())
    }

    async fn enterprise_offers(
        &self,
        _enterprise_uuid: &str,
    ) -> Result<Vec<EnterpriseOffer>, DataSourceError> {
        self.bundle_fetch("enterprise_offers").await?;
        Ok(self.offers.clone())
    }

    async fn coupon_codes(
        &self,
        _enterprise_uuid: &str,
    ) -> Result<CouponCodesSnapshot, DataSourceError> {
        self.bundle_fetch("coupon_codes").await?;
        Ok(self.coupon_codes.clone())
    }

    async fn license_requests(
        &self,
        _enterprise_uuid: &str,
        _user_email: &str,
    ) -> Result<Vec<SubsidyRequest>, DataSourceError> {
        self.bundle_fetch("license_requests").await?;
        Ok(self.license_requests.clone())
    }

    async fn coupon_code_requests(
        &self,
        _enterprise_uuid: &str,
        _user_email: &str,
    ) -> Result<Vec<SubsidyRequest>, DataSourceError> {
        self.bundle_fetch("coupon_code_requests").await?;
        Ok(self.coupon_code_requests.clone())
    }

    async fn browse_and_request_configuration(
        &self,
        _enterprise_uuid: &str,
    ) -> Result<Option<BrowseAndRequestConfiguration>, DataSourceError> {
        self.bundle_fetch("browse_and_request_configuration").await?;
        Ok(None)
    }

    async fn course_metadata(
        &self,
        _course_key: &str,
        course_run_key: Option<&str>,
    ) -> Result<Option<Course>, DataSourceError> {
        self.record("course_metadata")?;
        self.metadata_run_keys
            .lock()
            .expect("metadata mutex")
            .push(course_run_key.map(str::to_string));
        Ok(self.course.clone())
    }

    async fn can_redeem(
        &self,
        _enterprise_uuid: &str,
        course_run_keys: &[String],
    ) -> Result<Vec<CanRedeemResult>, DataSourceError> {
        self.record("can_redeem")?;
        self.can_redeem_keys
            .lock()
            .expect("can redeem mutex")
            .push(course_run_keys.to_vec());
        Ok(self.can_redeem.clone())
    }

    async fn enterprise_course_enrollments(
        &self,
        _enterprise_uuid: &str,
    ) -> Result<Vec<CourseEnrollment>, DataSourceError> {
        self.record("enterprise_course_enrollments")?;
        Ok(Vec::new())
    }

    async fn entitlements(&self, _user_id: u64) -> Result<Vec<Entitlement>, DataSourceError> {
        self.record("entitlements")?;
        Ok(Vec::new())
    }

    async fn contains_content_items(
        &self,
        _enterprise_uuid: &str,
        _course_key: &str,
    ) -> Result<ContainsContentItems, DataSourceError> {
        self.record("contains_content_items")?;
        Ok(self.contains_content_items.clone())
    }

    async fn course_reviews(
        &self,
        _course_key: &str,
    ) -> Result<Option<CourseReviews>, DataSourceError> {
        self.record("course_reviews")?;
        Ok(None)
    }

    async fn course_recommendations(
        &self,
        _enterprise_uuid: &str,
        _course_key: &str,
        search_catalogs: &[String],
    ) -> Result<CourseRecommendations, DataSourceError> {
        self.record("course_recommendations")?;
        self.recommendation_catalogs
            .lock()
            .expect("recommendations mutex")
            .push(search_catalogs.to_vec());
        Ok(CourseRecommendations::default())
    }
}

pub(super) fn loader(source: &Arc<FakeDataSource>) -> CourseLoader {
    let source: Arc<dyn EnterpriseDataSource> = source.clone();
    CourseLoader::new(source, Arc::new(QueryCache::default()))
}

pub(super) fn loader_with_stale_window(
    source: &Arc<FakeDataSource>,
    stale_after: Duration,
) -> CourseLoader {
    let source: Arc<dyn EnterpriseDataSource> = source.clone();
    CourseLoader::new(source, Arc::new(QueryCache::new(Some(stale_after))))
}

pub(super) fn user() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: 42,
        username: "learner".to_string(),
        email: "learner@example.com".to_string(),
    }
}

pub(super) fn enterprise() -> EnterpriseCustomer {
    EnterpriseCustomer {
        uuid: ENTERPRISE_UUID.to_string(),
        slug: SLUG.to_string(),
        name: "Test Enterprise".to_string(),
        contact_email: None,
        admin_users: vec![EnterpriseAdminUser {
            email: "admin@example.com".to_string(),
            lms_user_id: Some(7),
        }],
    }
}

pub(super) fn course(course_type: &str) -> Course {
    Course {
        key: COURSE_KEY.to_string(),
        title: "Demo Course".to_string(),
        course_type: course_type.to_string(),
        course_runs: vec![CourseRun {
            key: RUN_KEY.to_string(),
            uuid: Some("run-uuid".to_string()),
            parent_course_key: Some(COURSE_KEY.to_string()),
            is_enrollable: true,
            is_marketable: true,
            availability: Some(CourseRunAvailability::Current),
            start: None,
            fixed_price_usd: None,
            first_enrollable_paid_seat_price: Some(149.0),
        }],
        advertised_course_run_uuid: None,
        entitlements: Vec::new(),
    }
}

pub(super) fn assigned_policies(assignments: Vec<LearnerContentAssignment>) -> RedeemablePolicies {
    RedeemablePolicies {
        redeemable_policies: vec![LearnerCreditPolicy {
            uuid: "assigned-policy".to_string(),
            policy_type: PolicyType::AssignedLearnerCredit,
            is_redeemable: true,
            catalog_uuid: Some(CATALOG.to_string()),
            learner_content_assignments: assignments,
        }],
    }
}

pub(super) fn allocated(content_key: &str, parent_content_key: Option<&str>) -> LearnerContentAssignment {
    LearnerContentAssignment {
        uuid: format!("assignment-{content_key}"),
        content_key: content_key.to_string(),
        parent_content_key: parent_content_key.map(str::to_string),
        is_assigned_course_run: parent_content_key.is_some(),
        state: AssignmentState::Allocated,
    }
}
