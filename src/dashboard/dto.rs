use serde::Serialize;

use crate::dashboard::repo::{ActivityRow, EnrollmentRow, PurchaseRow};

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub active_courses: usize,
    pub completed_courses: usize,
    pub total_purchases: usize,
}

impl DashboardStats {
    pub fn derive(enrollments: &[EnrollmentRow], purchases: &[PurchaseRow]) -> Self {
        Self {
            active_courses: enrollments.len(),
            completed_courses: enrollments.iter().filter(|e| e.completed).count(),
            total_purchases: purchases.len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub enrollments: Vec<EnrollmentRow>,
    pub purchases: Vec<PurchaseRow>,
    pub activity: Vec<ActivityRow>,
}
