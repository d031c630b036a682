use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::remote::table::TableClient;

/// Instructor fields embedded in course reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructorRef {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Course row as the catalog reads it, with embedded instructor and
/// category resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRow {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub students_count: i64,
    #[serde(default)]
    pub duration_hours: Option<f64>,
    #[serde(default)]
    pub level: Option<String>,
    pub is_published: bool,
    #[serde(default)]
    pub instructors: Option<InstructorRef>,
    #[serde(default)]
    pub categories: Option<CategoryRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonRow {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub order_index: i32,
}

const COURSE_CARD_SELECT: &str = "*,instructors(id,name,avatar_url),categories(id,name,slug)";
const COURSE_DETAIL_SELECT: &str = "*,instructors(id,name,bio,avatar_url),categories(id,name,slug)";

/// Most popular published courses.
pub async fn featured_courses(tables: &TableClient, limit: u32) -> anyhow::Result<Vec<CourseRow>> {
    tables
        .from("courses")
        .select(COURSE_CARD_SELECT)
        .eq("is_published", true)
        .order_desc("students_count")
        .limit(limit)
        .fetch()
        .await
}

pub async fn course_by_id(tables: &TableClient, id: Uuid) -> anyhow::Result<Option<CourseRow>> {
    tables
        .from("courses")
        .select(COURSE_DETAIL_SELECT)
        .eq("id", id)
        .fetch_one()
        .await
}

pub async fn lessons_for_course(
    tables: &TableClient,
    course_id: Uuid,
) -> anyhow::Result<Vec<LessonRow>> {
    tables
        .from("lessons")
        .eq("course_id", course_id)
        .order_asc("order_index")
        .fetch()
        .await
}

pub async fn all_categories(tables: &TableClient) -> anyhow::Result<Vec<CategoryRow>> {
    tables.from("categories").order_asc("name").fetch().await
}

pub async fn category_by_slug(
    tables: &TableClient,
    slug: &str,
) -> anyhow::Result<Option<CategoryRow>> {
    tables.from("categories").eq("slug", slug).fetch_one().await
}

pub async fn published_courses_in_category(
    tables: &TableClient,
    category_id: Uuid,
) -> anyhow::Result<Vec<CourseRow>> {
    tables
        .from("courses")
        .select(COURSE_CARD_SELECT)
        .eq("category_id", category_id)
        .eq("is_published", true)
        .order_desc("students_count")
        .fetch()
        .await
}
