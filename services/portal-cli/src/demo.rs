use crate::infra::{parse_date, Scenario};
use crate::resolve::{render_report, resolve_course_page};
use chrono::{Local, NaiveDate};
use clap::Args;
use enterprise_subsidy::config::AppConfig;
use enterprise_subsidy::eligibility::domain::{
    AssignmentState, AuthenticatedUser, ContainsContentItems, CouponCodeOverview,
    CouponCodesSnapshot, Course, CourseRun, CourseRunAvailability, CustomerAgreement,
    EnterpriseAdminUser, EnterpriseCustomer, EnterpriseOffer, LearnerContentAssignment,
    LearnerCreditPolicy, LicenseStatus, PolicyType, RedeemablePolicies, SubscriptionLicense,
    SubscriptionPlan, SubscriptionsSnapshot,
};
use enterprise_subsidy::error::AppError;
use enterprise_subsidy::loader::CourseRoute;
use enterprise_subsidy::telemetry;
use tracing::info;

pub(crate) const DEMO_SLUG: &str = "acme-learning";
pub(crate) const DEMO_COURSE_KEY: &str = "edX+DemoX";
const DEMO_RUN_KEY: &str = "course-v1:edX+DemoX+Demo";
const DEMO_CATALOG: &str = "acme-catalog";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print each report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    info!(environment = ?config.environment, %today, "running subsidy demo");
    println!("Enterprise subsidy demo ({today})");
    let scenarios: [(&str, Scenario, CourseRoute); 4] = [
        (
            "Licensed learner",
            licensed_scenario(),
            CourseRoute::new(DEMO_SLUG, DEMO_COURSE_KEY),
        ),
        (
            "Assignment-only learner browsing an unassigned course",
            assignment_only_scenario(),
            CourseRoute::new(DEMO_SLUG, DEMO_COURSE_KEY),
        ),
        (
            "Learner whose organization's codes are all assigned",
            exhausted_coupon_scenario(today),
            CourseRoute::new(DEMO_SLUG, DEMO_COURSE_KEY),
        ),
        (
            "Learner with an offer that cannot cover the course",
            low_balance_offer_scenario(),
            CourseRoute::new(DEMO_SLUG, DEMO_COURSE_KEY)
                .with_course_run_key_param(Some("course-v1:edX DemoX Demo")),
        ),
    ];

    for (title, scenario, route) in scenarios {
        println!("\n{title}");
        let report = resolve_course_page(scenario, &route, today, &config).await?;
        render_report(&route, &report, args.json)?;
    }

    Ok(())
}

fn learner() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: 3141,
        username: "ada".to_string(),
        email: "ada@acme.example".to_string(),
    }
}

fn enterprise() -> EnterpriseCustomer {
    EnterpriseCustomer {
        uuid: "acme-uuid".to_string(),
        slug: DEMO_SLUG.to_string(),
        name: "Acme Learning".to_string(),
        contact_email: None,
        admin_users: vec![EnterpriseAdminUser {
            email: "learning-admin@acme.example".to_string(),
            lms_user_id: Some(7),
        }],
    }
}

fn demo_course() -> Course {
    Course {
        key: DEMO_COURSE_KEY.to_string(),
        title: "Demonstration Course".to_string(),
        course_type: "verified-audit".to_string(),
        course_runs: vec![CourseRun {
            key: DEMO_RUN_KEY.to_string(),
            uuid: Some("demo-run".to_string()),
            parent_course_key: Some(DEMO_COURSE_KEY.to_string()),
            is_enrollable: true,
            is_marketable: true,
            availability: Some(CourseRunAvailability::Current),
            start: None,
            fixed_price_usd: None,
            first_enrollable_paid_seat_price: Some(199.0),
        }],
        advertised_course_run_uuid: Some("demo-run".to_string()),
        entitlements: Vec::new(),
    }
}

fn base_scenario() -> Scenario {
    Scenario {
        user: Some(learner()),
        enterprise: Some(enterprise()),
        courses: vec![demo_course()],
        contains_content_items: ContainsContentItems {
            contains_content_items: true,
            catalog_list: vec![DEMO_CATALOG.to_string()],
        },
        ..Scenario::default()
    }
}

pub(crate) fn licensed_scenario() -> Scenario {
    Scenario {
        subscriptions: SubscriptionsSnapshot {
            customer_agreement: Some(CustomerAgreement {
                available_subscription_catalogs: vec![DEMO_CATALOG.to_string()],
            }),
            subscription_license: Some(SubscriptionLicense {
                uuid: "acme-license".to_string(),
                status: LicenseStatus::Activated,
                subscription_plan: SubscriptionPlan {
                    uuid: "acme-plan".to_string(),
                    is_current: true,
                    enterprise_catalog_uuid: DEMO_CATALOG.to_string(),
                    expiration_date: None,
                },
            }),
        },
        ..base_scenario()
    }
}

pub(crate) fn assignment_only_scenario() -> Scenario {
    Scenario {
        redeemable_policies: RedeemablePolicies {
            redeemable_policies: vec![LearnerCreditPolicy {
                uuid: "acme-assignments".to_string(),
                policy_type: PolicyType::AssignedLearnerCredit,
                is_redeemable: true,
                catalog_uuid: Some(DEMO_CATALOG.to_string()),
                learner_content_assignments: vec![LearnerContentAssignment {
                    uuid: "assignment-1".to_string(),
                    content_key: "edX+OtherX".to_string(),
                    parent_content_key: None,
                    is_assigned_course_run: false,
                    state: AssignmentState::Allocated,
                }],
            }],
        },
        ..base_scenario()
    }
}

fn exhausted_coupon_scenario(today: NaiveDate) -> Scenario {
    Scenario {
        coupon_codes: CouponCodesSnapshot {
            coupons_overview: vec![CouponCodeOverview {
                enterprise_catalog_uuid: DEMO_CATALOG.to_string(),
                start_date: today - chrono::Duration::days(30),
                end_date: today + chrono::Duration::days(180),
                num_unassigned: 0,
            }],
            coupon_codes: Vec::new(),
        },
        ..base_scenario()
    }
}

fn low_balance_offer_scenario() -> Scenario {
    Scenario {
        enterprise_offers: vec![EnterpriseOffer {
            id: Some("acme-offer".to_string()),
            enterprise_catalog_uuid: DEMO_CATALOG.to_string(),
            is_current: Some(true),
            remaining_balance: Some(50.0),
            remaining_balance_for_user: None,
            remaining_applications: None,
            remaining_applications_for_user: None,
        }],
        ..base_scenario()
    }
}
