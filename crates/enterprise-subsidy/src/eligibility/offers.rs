use std::cmp::Ordering;

use super::domain::EnterpriseOffer;

/// Offer paired with its redeemability for a specific course price.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedOffer<'a> {
    pub offer: &'a EnterpriseOffer,
    pub redeemable: bool,
}

/// Filters enterprise offers to the course catalogs and ranks them by redeemability.
pub struct EnterpriseOfferRanker;

impl EnterpriseOfferRanker {
    /// Best offer for the course, or `None` when there is no price or no catalog match.
    pub fn rank<'a>(
        offers: &'a [EnterpriseOffer],
        catalogs_with_course: &[String],
        course_price: Option<f64>,
    ) -> Option<&'a EnterpriseOffer> {
        Self::ranked(offers, catalogs_with_course, course_price)
            .into_iter()
            .next()
            .map(|ranked| ranked.offer)
    }

    /// Every catalog-matching offer, redeemable ones first in rank order.
    pub fn ranked<'a>(
        offers: &'a [EnterpriseOffer],
        catalogs_with_course: &[String],
        course_price: Option<f64>,
    ) -> Vec<RankedOffer<'a>> {
        let price = match course_price {
            Some(price) if price > 0.0 => price,
            _ => return Vec::new(),
        };

        let mut ranked: Vec<RankedOffer<'a>> = offers_for_catalogs(offers, catalogs_with_course)
            .into_iter()
            .map(|offer| RankedOffer {
                offer,
                redeemable: is_offer_redeemable(offer, price),
            })
            .collect();

        // `sort_by` is stable, so ties keep their input order.
        ranked.sort_by(compare_ranked);
        ranked
    }
}

pub(crate) fn offers_for_catalogs<'a>(
    offers: &'a [EnterpriseOffer],
    catalogs_with_course: &[String],
) -> Vec<&'a EnterpriseOffer> {
    offers
        .iter()
        .filter(|offer| {
            catalogs_with_course
                .iter()
                .any(|catalog| catalog == &offer.enterprise_catalog_uuid)
        })
        .collect()
}

pub fn is_offer_redeemable(offer: &EnterpriseOffer, course_price: f64) -> bool {
    if offer.is_current == Some(false) {
        return false;
    }

    let balance_ok = |bound: Option<f64>| bound.map_or(true, |balance| balance >= course_price);
    let applications_ok = |bound: Option<u32>| bound.map_or(true, |remaining| remaining > 0);

    balance_ok(offer.remaining_balance)
        && balance_ok(offer.remaining_balance_for_user)
        && applications_ok(offer.remaining_applications)
        && applications_ok(offer.remaining_applications_for_user)
}

fn compare_ranked(a: &RankedOffer<'_>, b: &RankedOffer<'_>) -> Ordering {
    match (a.redeemable, b.redeemable) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
        (true, true) => compare_redeemable(a.offer, b.offer),
    }
}

fn compare_redeemable(a: &EnterpriseOffer, b: &EnterpriseOffer) -> Ordering {
    compare_bound(a.effective_balance(), b.effective_balance(), f64::total_cmp).then_with(|| {
        compare_bound(
            a.effective_applications(),
            b.effective_applications(),
            |x: &u32, y: &u32| x.cmp(y),
        )
    })
}

/// Unlimited (absent) bounds rank first; otherwise the lower remaining amount wins.
fn compare_bound<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => cmp(&x, &y),
    }
}
