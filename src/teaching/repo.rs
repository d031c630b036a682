use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::remote::table::TableClient;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseTeachingRow {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub students_count: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Video,
    Pdf,
    Document,
    Link,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialRow {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub material_type: MaterialKind,
    pub file_url: String,
    #[serde(default)]
    pub is_preview: bool,
    #[serde(default)]
    pub order_index: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewMaterial {
    pub course_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub material_type: MaterialKind,
    pub file_url: String,
    pub is_preview: bool,
    pub created_by: Uuid,
}

pub async fn all_courses(tables: &TableClient) -> anyhow::Result<Vec<CourseTeachingRow>> {
    tables
        .from("courses")
        .select("id,title,students_count,created_at")
        .order_desc("created_at")
        .fetch()
        .await
}

pub async fn materials_for_course(
    tables: &TableClient,
    course_id: Uuid,
) -> anyhow::Result<Vec<MaterialRow>> {
    tables
        .from("course_materials")
        .eq("course_id", course_id)
        .order_asc("order_index")
        .fetch()
        .await
}

pub async fn insert_material(tables: &TableClient, material: &NewMaterial) -> anyhow::Result<()> {
    tables.insert("course_materials", material).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_kind_round_trips_lowercase() {
        assert_eq!(serde_json::to_string(&MaterialKind::Pdf).unwrap(), "\"pdf\"");
        let kind: MaterialKind = serde_json::from_str("\"video\"").unwrap();
        assert_eq!(kind, MaterialKind::Video);
    }

    #[test]
    fn new_material_serializes_creator() {
        let creator = Uuid::new_v4();
        let material = NewMaterial {
            course_id: Uuid::new_v4(),
            title: "Intro".into(),
            description: None,
            material_type: MaterialKind::Link,
            file_url: "https://example.com/intro".into(),
            is_preview: true,
            created_by: creator,
        };
        let json = serde_json::to_value(&material).unwrap();
        assert_eq!(json["material_type"], "link");
        assert_eq!(json["created_by"], creator.to_string());
    }
}
