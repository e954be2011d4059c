//! Built-in badge schemes for the roles that earn badges.

use crate::models::{BadgeScoreError, MetricTarget, Result, Role, Tier, TierCatalog};
use super::BadgeScheme;

pub const SERVICES_RENDERED: &str = "servicesRendered";
pub const COMPANY_REVENUE_NGN: &str = "companyRevenueNgn";
pub const AVERAGE_RATING: &str = "averageRating";
pub const VIEWINGS_HOSTED: &str = "viewingsHosted";
pub const INSPECTIONS_COMPLETED: &str = "inspectionsCompleted";
pub const CONVERSION_RATE: &str = "conversionRate";

/// Metric names a role's built-in scheme scores, in display order.
pub fn metric_names(role: Role) -> &'static [&'static str] {
    match role {
        Role::Handyman => &[SERVICES_RENDERED, COMPANY_REVENUE_NGN, AVERAGE_RATING],
        Role::Homerunner => &[VIEWINGS_HOSTED, INSPECTIONS_COMPLETED, CONVERSION_RATE, AVERAGE_RATING],
        _ => &[],
    }
}

impl BadgeScheme {
    pub fn for_role(role: Role) -> Result<Self> {
        match role {
            Role::Handyman => handyman(),
            Role::Homerunner => homerunner(),
            other => Err(BadgeScoreError::NoBadgeScheme(other)),
        }
    }
}

pub fn handyman() -> Result<BadgeScheme> {
    let targets = vec![
        MetricTarget::new(SERVICES_RENDERED, "Services rendered", vec![50.0, 150.0, 300.0])?,
        MetricTarget::new(
            COMPANY_REVENUE_NGN,
            "Revenue generated",
            vec![500_000.0, 2_000_000.0, 5_000_000.0],
        )?
        .with_unit("NGN"),
        MetricTarget::new(AVERAGE_RATING, "Average rating", vec![4.5, 4.7, 4.85])?.with_unit("/5"),
    ];

    let catalog = TierCatalog::new(vec![
        Tier::new("bronze", "Bronze", 0)
            .with_class("badge-bronze")
            .with_description("Verified handyman building a track record.")
            .with_requirements(&["Complete your profile", "Deliver your first jobs"]),
        Tier::new("silver", "Silver", 3)
            .with_class("badge-silver")
            .with_description("Reliable pro with steady bookings.")
            .with_requirements(&["50+ services rendered", "NGN 500,000+ revenue", "4.5+ average rating"]),
        Tier::new("gold", "Gold", 6)
            .with_class("badge-gold")
            .with_description("Top-rated pro trusted by repeat clients.")
            .with_requirements(&["150+ services rendered", "NGN 2,000,000+ revenue", "4.7+ average rating"]),
        Tier::new("platinum", "Platinum", 8)
            .with_class("badge-platinum")
            .with_description("Elite pro at the top of the marketplace.")
            .with_requirements(&["300+ services rendered", "NGN 5,000,000+ revenue", "4.85+ average rating"]),
    ])?;

    BadgeScheme::new(targets, catalog)
}

pub fn homerunner() -> Result<BadgeScheme> {
    let targets = vec![
        MetricTarget::new(VIEWINGS_HOSTED, "Viewings hosted", vec![20.0, 60.0, 150.0])?,
        MetricTarget::new(INSPECTIONS_COMPLETED, "Inspections completed", vec![10.0, 40.0, 100.0])?,
        MetricTarget::new(CONVERSION_RATE, "Conversion rate", vec![10.0, 20.0, 35.0])?.with_unit("%"),
        MetricTarget::new(AVERAGE_RATING, "Average rating", vec![4.5, 4.7, 4.85])?.with_unit("/5"),
    ];

    let catalog = TierCatalog::new(vec![
        Tier::new("bronze", "Bronze", 0)
            .with_class("badge-bronze")
            .with_description("New homerunner getting to know the neighbourhood.")
            .with_requirements(&["Complete your profile", "Host your first viewings"]),
        Tier::new("silver", "Silver", 4)
            .with_class("badge-silver")
            .with_description("Dependable runner landlords can book with confidence.")
            .with_requirements(&["20+ viewings hosted", "10+ inspections completed", "10%+ conversion rate"]),
        Tier::new("gold", "Gold", 8)
            .with_class("badge-gold")
            .with_description("High-converting runner with excellent reviews.")
            .with_requirements(&["60+ viewings hosted", "40+ inspections completed", "20%+ conversion rate", "4.7+ average rating"]),
        Tier::new("platinum", "Platinum", 11)
            .with_class("badge-platinum")
            .with_description("The marketplace's most trusted homerunners.")
            .with_requirements(&["150+ viewings hosted", "100+ inspections completed", "35%+ conversion rate", "4.85+ average rating"]),
    ])?;

    BadgeScheme::new(targets, catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HandymanMetrics, HomerunnerMetrics, MetricSet};

    #[test]
    fn test_handyman_mid_career_is_gold() {
        let metrics: MetricSet = HandymanMetrics {
            services_rendered: 160,
            company_revenue_ngn: 2_100_000.0,
            average_rating: 4.72,
        }
        .into();
        let result = handyman().unwrap().calculate(&metrics).unwrap();

        for entry in &result.progress {
            assert_eq!(entry.points, 2, "{}", entry.metric);
        }
        assert_eq!(result.score, 6);
        assert_eq!(result.total_possible, 9);
        assert_eq!(result.label, "Gold");
        assert_eq!(result.class, "badge-gold");
        let next = result.next_tier.unwrap();
        assert_eq!(next.label, "Platinum");
        assert_eq!(next.min_score, 8);
    }

    #[test]
    fn test_handyman_newcomer_is_bronze() {
        let metrics = MetricSet::new()
            .with(SERVICES_RENDERED, 10.0)
            .with(COMPANY_REVENUE_NGN, 100_000.0)
            .with(AVERAGE_RATING, 4.0);
        let result = handyman().unwrap().calculate(&metrics).unwrap();

        assert_eq!(result.score, 0);
        assert_eq!(result.label, "Bronze");
        let next = result.next_tier.as_ref().unwrap();
        assert_eq!(next.label, "Silver");
        assert_eq!(next.min_score, 3);

        let services = result.progress_for(SERVICES_RENDERED).unwrap();
        assert_eq!(services.target, Some(50.0));
        assert!(!services.met);
        assert_eq!(services.unit, None);
    }

    #[test]
    fn test_homerunner_maxed_out() {
        let metrics: MetricSet = HomerunnerMetrics {
            viewings_hosted: 200,
            inspections_completed: 100,
            conversion_rate: 40.0,
            average_rating: 4.9,
        }
        .into();
        let result = homerunner().unwrap().calculate(&metrics).unwrap();

        assert_eq!(result.score, 12);
        assert_eq!(result.total_possible, 12);
        assert_eq!(result.label, "Platinum");
        assert!(result.is_max_tier());
        assert!(result.progress.iter().all(|p| p.met && p.target.is_none()));
    }

    #[test]
    fn test_metric_names_match_schemes() {
        for role in [Role::Handyman, Role::Homerunner] {
            let scheme = BadgeScheme::for_role(role).unwrap();
            let names: Vec<&str> = scheme.targets().iter().map(|t| t.metric.as_str()).collect();
            assert_eq!(names, metric_names(role));
        }
        assert!(metric_names(Role::Tenant).is_empty());
    }

    #[test]
    fn test_for_role() {
        assert!(BadgeScheme::for_role(Role::Handyman).is_ok());
        assert_eq!(BadgeScheme::for_role(Role::Homerunner).unwrap().targets().len(), 4);
        assert!(matches!(
            BadgeScheme::for_role(Role::Tenant),
            Err(BadgeScoreError::NoBadgeScheme(Role::Tenant))
        ));
    }
}
