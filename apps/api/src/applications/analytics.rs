use serde::Serialize;

use crate::applications::status::ApplicationStatus;
use crate::models::application::JobApplicationRow;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusBreakdown {
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationAnalytics {
    pub total: usize,
    pub applied: StatusBreakdown,
    pub interview: StatusBreakdown,
    pub offer: StatusBreakdown,
    pub rejected: StatusBreakdown,
}

/// Counts applications per status. Percentages are of the total and are all
/// zero when there are no applications.
pub fn compute_analytics(applications: &[JobApplicationRow]) -> ApplicationAnalytics {
    let total = applications.len();
    let breakdown = |status: ApplicationStatus| {
        let count = applications
            .iter()
            .filter(|a| a.status == status.as_str())
            .count();
        let percentage = if total == 0 {
            0.0
        } else {
            count as f64 / total as f64 * 100.0
        };
        StatusBreakdown { count, percentage }
    };

    ApplicationAnalytics {
        total,
        applied: breakdown(ApplicationStatus::Applied),
        interview: breakdown(ApplicationStatus::Interview),
        offer: breakdown(ApplicationStatus::Offer),
        rejected: breakdown(ApplicationStatus::Rejected),
    }
}
