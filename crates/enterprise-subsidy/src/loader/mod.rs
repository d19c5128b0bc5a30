//! Course page loader: fetch orchestration and redirect decisions.
//!
//! The loader declares every query as a node in a [`TaskGraph`] and lets the
//! scheduler fire nodes once their dependencies resolved. Values travel
//! through the [`QueryCache`]: every query is ensured by its own node and
//! downstream nodes peek the resolved value instead of fetching again.

pub mod cache;
pub mod graph;
pub mod route;
pub mod source;

#[cfg(test)]
mod tests;

use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::eligibility::domain::{
    AuthenticatedUser, BrowseAndRequestConfiguration, CanRedeemResult, ContainsContentItems,
    CouponCodesSnapshot, Course, CourseEnrollment, CourseRecommendations, CourseReviews,
    EnterpriseCustomer, EnterpriseOffer, Entitlement, RedeemablePolicies, SubscriptionsSnapshot,
    SubsidyRequest,
};
use crate::eligibility::{AssignmentResolver, CourseEligibilityInputs, LearnerSubsidies};

pub use cache::{QueryCache, QueryKey};
pub use graph::{GraphError, GraphRun, TaskGraph, TaskStep};
pub use route::{restore_plus_signs, CourseRoute};
pub use source::{DataSourceError, EnterpriseDataSource};

/// Terminal result of one course page navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoaderOutcome {
    Empty,
    Redirect { url: String },
    Proceed(LoadedCourse),
}

/// Identifies the cached records a proceeding page reads back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedCourse {
    pub enterprise: EnterpriseCustomer,
    pub user: AuthenticatedUser,
    pub course_key: String,
    pub course_run_key: Option<String>,
}

impl LoadedCourse {
    fn key(&self, make: impl FnOnce(String) -> QueryKey) -> QueryKey {
        make(self.enterprise.uuid.clone())
    }

    /// Read every record the enrollment decision needs without fetching.
    pub fn eligibility_inputs(
        &self,
        cache: &QueryCache,
    ) -> Result<CourseEligibilityInputs, LoaderError> {
        let course = cache
            .peek::<Option<Course>>(&QueryKey::CourseMetadata {
                course_key: self.course_key.clone(),
                course_run_key: self.course_run_key.clone(),
            })
            .flatten()
            .ok_or(LoaderError::NotCached("course metadata"))?;

        let can_redeem = cache
            .peek::<Vec<CanRedeemResult>>(&self.key(|enterprise_uuid| QueryKey::CanRedeem {
                enterprise_uuid,
                course_run_keys: redemption_run_keys(&course, self.course_run_key.as_deref()),
            }))
            .unwrap_or_default();

        Ok(CourseEligibilityInputs {
            subscriptions: cache
                .peek(&self.key(|enterprise_uuid| QueryKey::Subscriptions { enterprise_uuid }))
                .ok_or(LoaderError::NotCached("subscriptions"))?,
            coupon_codes: cache
                .peek(&self.key(|enterprise_uuid| QueryKey::CouponCodes { enterprise_uuid }))
                .ok_or(LoaderError::NotCached("coupon codes"))?,
            enterprise_offers: cache
                .peek(&self.key(|enterprise_uuid| QueryKey::EnterpriseOffers { enterprise_uuid }))
                .ok_or(LoaderError::NotCached("enterprise offers"))?,
            contains_content_items: cache
                .peek(&self.key(|enterprise_uuid| QueryKey::ContainsContentItems {
                    enterprise_uuid,
                    course_key: self.course_key.clone(),
                }))
                .ok_or(LoaderError::NotCached("contains content items"))?,
            enterprise: self.enterprise.clone(),
            course,
            course_run_key: self.course_run_key.clone(),
            can_redeem,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error(transparent)]
    DataSource(#[from] DataSourceError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("enterprise customer '{0}' is not available to dependent tasks")]
    EnterpriseUnavailable(String),
    #[error("{0} is not in the query cache")]
    NotCached(&'static str),
}

/// Nodes of the course page task graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoaderTask {
    EnterpriseCustomer,
    RedeemablePolicies,
    Subscriptions,
    EnterpriseOffers,
    CouponCodes,
    LicenseRequests,
    CouponCodeRequests,
    BrowseAndRequestConfiguration,
    ResolveCourseRun,
    CourseMetadata,
    CanRedeem,
    CourseEnrollments,
    Entitlements,
    ContainsContentItems,
    CourseReviews,
    AssignmentGate,
    CourseRecommendations,
    Finalize,
}

const SUBSIDY_BUNDLE: [LoaderTask; 7] = [
    LoaderTask::RedeemablePolicies,
    LoaderTask::Subscriptions,
    LoaderTask::EnterpriseOffers,
    LoaderTask::CouponCodes,
    LoaderTask::LicenseRequests,
    LoaderTask::CouponCodeRequests,
    LoaderTask::BrowseAndRequestConfiguration,
];

/// Orchestrates the queries behind a course page and decides its outcome.
pub struct CourseLoader {
    source: Arc<dyn EnterpriseDataSource>,
    cache: Arc<QueryCache>,
}

impl CourseLoader {
    pub fn new(source: Arc<dyn EnterpriseDataSource>, cache: Arc<QueryCache>) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub async fn load(
        &self,
        user: Option<&AuthenticatedUser>,
        route: &CourseRoute,
    ) -> Result<LoaderOutcome, LoaderError> {
        let Some(user) = user else {
            info!(course_key = %route.course_key, "unauthenticated navigation, skipping course loader");
            return Ok(LoaderOutcome::Empty);
        };

        let session = LoadSession {
            source: &self.source,
            cache: &self.cache,
            user,
            route,
            enterprise: OnceLock::new(),
            course_run_key: OnceLock::new(),
            search_catalogs: OnceLock::new(),
        };
        let session = &session;

        let graph = TaskGraph::new()
            .task(LoaderTask::EnterpriseCustomer, &[], move || {
                session.resolve_enterprise()
            })
            .task(LoaderTask::RedeemablePolicies, &[LoaderTask::EnterpriseCustomer], move || {
                session.continue_after(session.redeemable_policies())
            })
            .task(LoaderTask::Subscriptions, &[LoaderTask::EnterpriseCustomer], move || {
                session.continue_after(session.subscriptions())
            })
            .task(LoaderTask::EnterpriseOffers, &[LoaderTask::EnterpriseCustomer], move || {
                session.continue_after(session.enterprise_offers())
            })
            .task(LoaderTask::CouponCodes, &[LoaderTask::EnterpriseCustomer], move || {
                session.continue_after(session.coupon_codes())
            })
            .task(LoaderTask::LicenseRequests, &[LoaderTask::EnterpriseCustomer], move || {
                session.continue_after(session.license_requests())
            })
            .task(LoaderTask::CouponCodeRequests, &[LoaderTask::EnterpriseCustomer], move || {
                session.continue_after(session.coupon_code_requests())
            })
            .task(
                LoaderTask::BrowseAndRequestConfiguration,
                &[LoaderTask::EnterpriseCustomer],
                move || session.continue_after(session.browse_and_request_configuration()),
            )
            .task(LoaderTask::ResolveCourseRun, &[LoaderTask::RedeemablePolicies], move || {
                session.resolve_course_run()
            })
            .task(LoaderTask::CourseMetadata, &[LoaderTask::ResolveCourseRun], move || {
                session.continue_after(session.course_metadata())
            })
            .task(LoaderTask::CanRedeem, &[LoaderTask::CourseMetadata], move || {
                session.check_redemption()
            })
            .task(LoaderTask::CourseEnrollments, &[LoaderTask::EnterpriseCustomer], move || {
                session.continue_after(session.course_enrollments())
            })
            .task(LoaderTask::Entitlements, &[LoaderTask::EnterpriseCustomer], move || {
                session.continue_after(session.entitlements())
            })
            .task(LoaderTask::ContainsContentItems, &[LoaderTask::EnterpriseCustomer], move || {
                session.continue_after(session.contains_content_items())
            })
            .task(LoaderTask::CourseReviews, &[LoaderTask::EnterpriseCustomer], move || {
                session.continue_after(session.course_reviews())
            })
            .task(LoaderTask::AssignmentGate, &SUBSIDY_BUNDLE, move || {
                session.assignment_gate()
            })
            .task(LoaderTask::CourseRecommendations, &[LoaderTask::AssignmentGate], move || {
                session.continue_after(session.course_recommendations())
            })
            .task(
                LoaderTask::Finalize,
                &[
                    LoaderTask::CourseMetadata,
                    LoaderTask::CanRedeem,
                    LoaderTask::CourseEnrollments,
                    LoaderTask::Entitlements,
                    LoaderTask::ContainsContentItems,
                    LoaderTask::CourseReviews,
                    LoaderTask::CourseRecommendations,
                ],
                move || session.finalize(),
            );

        match graph.run().await? {
            GraphRun::Halted { task, halt, .. } => {
                info!(?task, outcome = ?halt, course_key = %route.course_key, "course loader halted");
                Ok(halt)
            }
            GraphRun::Completed { .. } => {
                let loaded = LoadedCourse {
                    enterprise: session.enterprise()?.clone(),
                    user: user.clone(),
                    course_key: route.course_key.clone(),
                    course_run_key: session.resolved_course_run_key(),
                };
                info!(course_key = %loaded.course_key, course_run_key = ?loaded.course_run_key, "course loader proceeding");
                Ok(LoaderOutcome::Proceed(loaded))
            }
        }
    }
}

type Step = Result<TaskStep<LoaderOutcome>, LoaderError>;

/// Per-navigation state shared by the graph's tasks.
///
/// Each query is ensured once, by its own node. Downstream nodes read the
/// resolved value back with [`QueryCache::peek`], so one navigation decides
/// from a single snapshot even when the cache's stale window elapses mid-run.
struct LoadSession<'s> {
    source: &'s Arc<dyn EnterpriseDataSource>,
    cache: &'s QueryCache,
    user: &'s AuthenticatedUser,
    route: &'s CourseRoute,
    enterprise: OnceLock<EnterpriseCustomer>,
    course_run_key: OnceLock<Option<String>>,
    search_catalogs: OnceLock<Vec<String>>,
}

impl LoadSession<'_> {
    async fn continue_after<T>(
        &self,
        fetch: impl std::future::Future<Output = Result<T, LoaderError>>,
    ) -> Step {
        fetch.await?;
        Ok(TaskStep::Continue)
    }

    fn resolved_course_run_key(&self) -> Option<String> {
        self.course_run_key
            .get()
            .cloned()
            .flatten()
            .or_else(|| self.route.course_run_key.clone())
    }

    fn enterprise(&self) -> Result<&EnterpriseCustomer, LoaderError> {
        self.enterprise
            .get()
            .ok_or_else(|| LoaderError::EnterpriseUnavailable(self.route.enterprise_slug.clone()))
    }

    fn enterprise_uuid(&self) -> Result<String, LoaderError> {
        Ok(self.enterprise()?.uuid.clone())
    }

    /// Read a record an upstream node already resolved in this navigation.
    fn recall<T: Clone + 'static>(
        &self,
        key: &QueryKey,
        what: &'static str,
    ) -> Result<T, LoaderError> {
        self.cache.peek(key).ok_or(LoaderError::NotCached(what))
    }

    fn redeemable_policies_key(&self) -> Result<QueryKey, LoaderError> {
        Ok(QueryKey::RedeemablePolicies {
            enterprise_uuid: self.enterprise_uuid()?,
            user_id: self.user.user_id,
        })
    }

    fn subscriptions_key(&self) -> Result<QueryKey, LoaderError> {
        Ok(QueryKey::Subscriptions {
            enterprise_uuid: self.enterprise_uuid()?,
        })
    }

    fn enterprise_offers_key(&self) -> Result<QueryKey, LoaderError> {
        Ok(QueryKey::EnterpriseOffers {
            enterprise_uuid: self.enterprise_uuid()?,
        })
    }

    fn coupon_codes_key(&self) -> Result<QueryKey, LoaderError> {
        Ok(QueryKey::CouponCodes {
            enterprise_uuid: self.enterprise_uuid()?,
        })
    }

    fn license_requests_key(&self) -> Result<QueryKey, LoaderError> {
        Ok(QueryKey::LicenseRequests {
            enterprise_uuid: self.enterprise_uuid()?,
            user_email: self.user.email.clone(),
        })
    }

    fn coupon_code_requests_key(&self) -> Result<QueryKey, LoaderError> {
        Ok(QueryKey::CouponCodeRequests {
            enterprise_uuid: self.enterprise_uuid()?,
            user_email: self.user.email.clone(),
        })
    }

    fn course_metadata_key(&self) -> QueryKey {
        QueryKey::CourseMetadata {
            course_key: self.route.course_key.clone(),
            course_run_key: self.resolved_course_run_key(),
        }
    }

    async fn enterprise_customer(&self) -> Result<Option<EnterpriseCustomer>, LoaderError> {
        let source = Arc::clone(self.source);
        let slug = self.route.enterprise_slug.clone();
        let key = QueryKey::EnterpriseCustomer { slug: slug.clone() };
        Ok(self
            .cache
            .ensure(key, async move { source.enterprise_customer(&slug).await })
            .await?)
    }

    async fn redeemable_policies(&self) -> Result<RedeemablePolicies, LoaderError> {
        let enterprise_uuid = self.enterprise_uuid()?;
        let source = Arc::clone(self.source);
        let user_id = self.user.user_id;
        Ok(self
            .cache
            .ensure(self.redeemable_policies_key()?, async move {
                source.redeemable_policies(&enterprise_uuid, user_id).await
            })
            .await?)
    }

    async fn subscriptions(&self) -> Result<SubscriptionsSnapshot, LoaderError> {
        let enterprise_uuid = self.enterprise_uuid()?;
        let source = Arc::clone(self.source);
        Ok(self
            .cache
            .ensure(self.subscriptions_key()?, async move {
                source.subscriptions(&enterprise_uuid).await
            })
            .await?)
    }

    async fn enterprise_offers(&self) -> Result<Vec<EnterpriseOffer>, LoaderError> {
        let enterprise_uuid = self.enterprise_uuid()?;
        let source = Arc::clone(self.source);
        Ok(self
            .cache
            .ensure(self.enterprise_offers_key()?, async move {
                source.enterprise_offers(&enterprise_uuid).await
            })
            .await?)
    }

    async fn coupon_codes(&self) -> Result<CouponCodesSnapshot, LoaderError> {
        let enterprise_uuid = self.enterprise_uuid()?;
        let source = Arc::clone(self.source);
        Ok(self
            .cache
            .ensure(self.coupon_codes_key()?, async move {
                source.coupon_codes(&enterprise_uuid).await
            })
            .await?)
    }

    async fn license_requests(&self) -> Result<Vec<SubsidyRequest>, LoaderError> {
        let enterprise_uuid = self.enterprise_uuid()?;
        let source = Arc::clone(self.source);
        let user_email = self.user.email.clone();
        Ok(self
            .cache
            .ensure(self.license_requests_key()?, async move {
                source.license_requests(&enterprise_uuid, &user_email).await
            })
            .await?)
    }

    async fn coupon_code_requests(&self) -> Result<Vec<SubsidyRequest>, LoaderError> {
        let enterprise_uuid = self.enterprise_uuid()?;
        let source = Arc::clone(self.source);
        let user_email = self.user.email.clone();
        Ok(self
            .cache
            .ensure(self.coupon_code_requests_key()?, async move {
                source
                    .coupon_code_requests(&enterprise_uuid, &user_email)
                    .await
            })
            .await?)
    }

    async fn browse_and_request_configuration(
        &self,
    ) -> Result<Option<BrowseAndRequestConfiguration>, LoaderError> {
        let enterprise_uuid = self.enterprise_uuid()?;
        let source = Arc::clone(self.source);
        let key = QueryKey::BrowseAndRequestConfiguration {
            enterprise_uuid: enterprise_uuid.clone(),
        };
        Ok(self
            .cache
            .ensure(key, async move {
                source
                    .browse_and_request_configuration(&enterprise_uuid)
                    .await
            })
            .await?)
    }

    async fn course_metadata(&self) -> Result<Option<Course>, LoaderError> {
        let source = Arc::clone(self.source);
        let course_key = self.route.course_key.clone();
        let course_run_key = self.resolved_course_run_key();
        Ok(self
            .cache
            .ensure(self.course_metadata_key(), async move {
                source
                    .course_metadata(&course_key, course_run_key.as_deref())
                    .await
            })
            .await?)
    }

    async fn course_enrollments(&self) -> Result<Vec<CourseEnrollment>, LoaderError> {
        let enterprise_uuid = self.enterprise_uuid()?;
        let source = Arc::clone(self.source);
        let key = QueryKey::EnterpriseCourseEnrollments {
            enterprise_uuid: enterprise_uuid.clone(),
        };
        Ok(self
            .cache
            .ensure(key, async move {
                source.enterprise_course_enrollments(&enterprise_uuid).await
            })
            .await?)
    }

    async fn entitlements(&self) -> Result<Vec<Entitlement>, LoaderError> {
        let source = Arc::clone(self.source);
        let user_id = self.user.user_id;
        let key = QueryKey::Entitlements { user_id };
        Ok(self
            .cache
            .ensure(key, async move { source.entitlements(user_id).await })
            .await?)
    }

    async fn contains_content_items(&self) -> Result<ContainsContentItems, LoaderError> {
        let enterprise_uuid = self.enterprise_uuid()?;
        let source = Arc::clone(self.source);
        let course_key = self.route.course_key.clone();
        let key = QueryKey::ContainsContentItems {
            enterprise_uuid: enterprise_uuid.clone(),
            course_key: course_key.clone(),
        };
        Ok(self
            .cache
            .ensure(key, async move {
                source
                    .contains_content_items(&enterprise_uuid, &course_key)
                    .await
            })
            .await?)
    }

    async fn course_reviews(&self) -> Result<Option<CourseReviews>, LoaderError> {
        let source = Arc::clone(self.source);
        let course_key = self.route.course_key.clone();
        let key = QueryKey::CourseReviews {
            course_key: course_key.clone(),
        };
        Ok(self
            .cache
            .ensure(key, async move { source.course_reviews(&course_key).await })
            .await?)
    }

    async fn course_recommendations(&self) -> Result<CourseRecommendations, LoaderError> {
        let enterprise_uuid = self.enterprise_uuid()?;
        let source = Arc::clone(self.source);
        let course_key = self.route.course_key.clone();
        let search_catalogs = self.search_catalogs.get().cloned().unwrap_or_default();
        let key = QueryKey::CourseRecommendations {
            enterprise_uuid: enterprise_uuid.clone(),
            course_key: course_key.clone(),
            search_catalogs: search_catalogs.clone(),
        };
        Ok(self
            .cache
            .ensure(key, async move {
                source
                    .course_recommendations(&enterprise_uuid, &course_key, &search_catalogs)
                    .await
            })
            .await?)
    }

    async fn resolve_enterprise(&self) -> Step {
        match self.enterprise_customer().await? {
            Some(enterprise) => {
                let _ = self.enterprise.set(enterprise);
                Ok(TaskStep::Continue)
            }
            None => {
                info!(slug = %self.route.enterprise_slug, "enterprise customer not found");
                Ok(TaskStep::Halt(LoaderOutcome::Empty))
            }
        }
    }

    /// Pin the run key from assignments when the route did not name one.
    async fn resolve_course_run(&self) -> Step {
        let policies: RedeemablePolicies =
            self.recall(&self.redeemable_policies_key()?, "redeemable policies")?;
        let assignments = AssignmentResolver::resolve(&self.route.course_key, &policies);

        let pinned = match &self.route.course_run_key {
            Some(explicit) => Some(explicit.clone()),
            None => assignments.sole_course_run_key().map(str::to_string),
        };
        if assignments.has_multiple_assigned_course_runs && self.route.course_run_key.is_none() {
            debug!(
                runs = ?assignments.allocated_course_run_assignment_keys,
                "multiple assigned course runs, leaving course run unpinned"
            );
        }

        let _ = self.course_run_key.set(pinned);
        Ok(TaskStep::Continue)
    }

    /// Only chained when course metadata resolved to a course.
    async fn check_redemption(&self) -> Step {
        let metadata: Option<Course> =
            self.recall(&self.course_metadata_key(), "course metadata")?;
        let Some(course) = metadata else {
            debug!(course_key = %self.route.course_key, "no course metadata, skipping can-redeem");
            return Ok(TaskStep::Continue);
        };

        let enterprise_uuid = self.enterprise_uuid()?;
        let source = Arc::clone(self.source);
        let course_run_keys =
            redemption_run_keys(&course, self.resolved_course_run_key().as_deref());
        let key = QueryKey::CanRedeem {
            enterprise_uuid: enterprise_uuid.clone(),
            course_run_keys: course_run_keys.clone(),
        };
        self.cache
            .ensure(key, async move {
                source.can_redeem(&enterprise_uuid, &course_run_keys).await
            })
            .await?;
        Ok(TaskStep::Continue)
    }

    /// Redirect assignment-only learners away from courses they were not assigned.
    async fn assignment_gate(&self) -> Step {
        let policies: RedeemablePolicies =
            self.recall(&self.redeemable_policies_key()?, "redeemable policies")?;
        let subscriptions: SubscriptionsSnapshot =
            self.recall(&self.subscriptions_key()?, "subscriptions")?;
        let offers: Vec<EnterpriseOffer> =
            self.recall(&self.enterprise_offers_key()?, "enterprise offers")?;
        let coupon_codes: CouponCodesSnapshot =
            self.recall(&self.coupon_codes_key()?, "coupon codes")?;
        let license_requests: Vec<SubsidyRequest> =
            self.recall(&self.license_requests_key()?, "license requests")?;
        let coupon_code_requests: Vec<SubsidyRequest> =
            self.recall(&self.coupon_code_requests_key()?, "coupon code requests")?;

        let subsidies = LearnerSubsidies {
            subscriptions: &subscriptions,
            license_requests: &license_requests,
            coupon_codes: &coupon_codes,
            coupon_code_requests: &coupon_code_requests,
            enterprise_offers: &offers,
            policies: &policies,
        };

        let is_course_assigned =
            AssignmentResolver::resolve(&self.route.course_key, &policies).is_course_assigned;
        if subsidies.is_assignment_only() && !is_course_assigned {
            info!(course_key = %self.route.course_key, "assignment-only learner not assigned to course");
            return Ok(TaskStep::Halt(LoaderOutcome::Redirect {
                url: self.route.dashboard_path(),
            }));
        }

        let _ = self.search_catalogs.set(subsidies.search_catalogs());
        Ok(TaskStep::Continue)
    }

    async fn finalize(&self) -> Step {
        let metadata: Option<Course> =
            self.recall(&self.course_metadata_key(), "course metadata")?;
        let Some(course) = metadata else {
            return Ok(TaskStep::Halt(LoaderOutcome::Empty));
        };

        if let Some(path_slug) = course.type_config().and_then(|config| config.path_slug) {
            if !self.route.pathname.contains(path_slug) {
                return Ok(TaskStep::Halt(LoaderOutcome::Redirect {
                    url: self.route.course_type_path(path_slug),
                }));
            }
        }

        Ok(TaskStep::Continue)
    }
}

/// Runs whose redemption eligibility is checked: the available runs plus a pinned one.
pub(crate) fn redemption_run_keys(course: &Course, pinned: Option<&str>) -> Vec<String> {
    let mut keys: Vec<String> = course
        .available_course_runs()
        .into_iter()
        .map(|run| run.key.clone())
        .collect();
    if let Some(pinned) = pinned {
        if !keys.iter().any(|key| key == pinned) {
            keys.push(pinned.to_string());
        }
    }
    keys
}
