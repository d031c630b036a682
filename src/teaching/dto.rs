use serde::Deserialize;

use crate::teaching::repo::MaterialKind;

#[derive(Debug, Deserialize)]
pub struct NewMaterialRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub material_type: MaterialKind,
    #[serde(default)]
    pub file_url: String,
    #[serde(default)]
    pub is_preview: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_for_optional_fields() {
        let req: NewMaterialRequest =
            serde_json::from_str(r#"{"title":"Intro","material_type":"video","file_url":"u"}"#)
                .unwrap();
        assert!(!req.is_preview);
        assert!(req.description.is_none());
    }

    #[test]
    fn unknown_material_type_is_rejected() {
        assert!(serde_json::from_str::<NewMaterialRequest>(
            r#"{"title":"Intro","material_type":"audio","file_url":"u"}"#
        )
        .is_err());
    }
}
