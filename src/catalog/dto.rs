use serde::{Deserialize, Serialize};

use crate::catalog::repo::{CategoryRow, CourseRow, LessonRow};

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    6
}

/// Course detail page payload: the course plus its ordered lessons.
#[derive(Debug, Serialize)]
pub struct CourseDetails {
    #[serde(flatten)]
    pub course: CourseRow,
    pub lessons: Vec<LessonRow>,
}

/// Category page payload: the category plus its published courses.
#[derive(Debug, Serialize)]
pub struct CategoryDetails {
    #[serde(flatten)]
    pub category: CategoryRow,
    pub courses: Vec<CourseRow>,
}
