// src/types/presentation.rs
//! Template-facing view of a resume. Key names are the template contract.

use serde::Serialize;

use super::resume::{EducationEntry, InterestEntry, SkillSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PresentationRecord {
    pub name: String,
    pub title: String,
    pub titles: Vec<String>,
    pub punchline: String,
    pub summary: String,
    pub email: String,
    pub location: String,
    pub phone: String,
    pub experience: Vec<PresentationExperience>,
    pub social: Vec<SocialLink>,
    pub education: Vec<EducationEntry>,
    pub skills: SkillSet,
    pub interests: Vec<InterestEntry>,
    pub references: String,
    pub last_updated: String,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PresentationExperience {
    pub role: String,
    pub company: String,
    pub location: String,
    pub period: String,
    pub bullets: Vec<String>,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SocialLink {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "URL")]
    pub url: String,
}
