use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailRequest {
    #[serde(default)]
    pub script_title: Option<String>,
    #[serde(default)]
    pub scene_visual: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailResponse {
    pub image_url: String,
}
