//! Boundary value objects exchanged with the surrounding CRUD layer.
//!
//! Address and date fields arrive pre-formatted; the engine never parses
//! them, it only falls back to a placeholder when they are blank.

use serde::{Deserialize, Serialize};

/// Template variant. Exactly four template assets exist, one per
/// (orientation, side) combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Front,
    Back,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
        }
    }
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Front => "front",
            Side::Back => "back",
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Template asset filename for a variant, e.g. `landscape-front.png`.
pub fn template_filename(orientation: Orientation, side: Side) -> String {
    format!("{orientation}-{side}.png")
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentRecord {
    pub id: String,
    pub name: String,
    pub sequence_no: Option<String>,
    pub roll_no: Option<String>,
    pub class_name: String,
    pub section: String,
    /// Pre-formatted by the caller, e.g. "14 Mar 2012".
    pub date_of_birth: String,
    pub blood_group: String,
    /// Pre-formatted single string, commas and all.
    pub address: String,
    pub phone: String,
    /// Local path, URL or data URI.
    pub photo: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchoolInfo {
    pub name: String,
    pub address: String,
    /// Local path, URL or data URI.
    pub logo: Option<String>,
    pub phone: String,
    pub email: String,
}

/// One student's rendered output within a batch.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub student_id: String,
    pub sequence_id: String,
    #[serde(skip)]
    pub front: Vec<u8>,
    #[serde(skip)]
    pub back: Option<Vec<u8>>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationFailure {
    pub student_id: String,
    pub student_name: String,
    pub error: String,
}

/// A batch never aborts wholesale: every student lands on one of these lists.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub successes: Vec<GenerationResult>,
    pub failures: Vec<GenerationFailure>,
}
