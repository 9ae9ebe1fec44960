use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Link as stored by a remote backend. Fields are passed through as the backend sent them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    #[serde(rename = "ID", default)]
    pub id: Value,
    #[serde(rename = "URL", default)]
    pub url: Value,
    #[serde(rename = "Title", default)]
    pub title: Value,
    #[serde(rename = "Points", default)]
    pub points: Value,
}

#[derive(Debug, Deserialize)]
pub struct LinkList {
    #[serde(rename = "Links", default)]
    pub links: Vec<Link>,
}

/// Link with its display position.
#[derive(Debug, Serialize)]
pub struct RankedLink {
    pub rank: usize,
    pub id: Value,
    pub url: Value,
    pub title: Value,
    pub points: Value,
}

#[derive(Debug, Serialize)]
pub struct NewLink<'a> {
    #[serde(rename = "ID")]
    pub id: u16,
    #[serde(rename = "URL")]
    pub url: &'a str,
    #[serde(rename = "Title")]
    pub title: &'a str,
}

#[derive(Debug, Serialize)]
pub struct VoteRequest {
    #[serde(rename = "ID")]
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct PostLinkForm {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct VoteForm {
    #[serde(default)]
    pub id: String,
}
