// src/types/resume.rs
//! Resume document model and the adapter from the accepted on-disk schemas

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Literal used in a period's `to` block for a position that is still held
pub const OPEN_ENDED_MARKER: &str = "-";

// ===== On-disk schema =====
//
// One permissive mirror of every document variant seen in the wild: the
// headline may be `title`, `titles` or `punchline`, experiences may use the
// `_short` names, and contact links are an open set.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawResume {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub title: Option<String>,
    pub titles: Option<OneOrMany>,
    pub punchline: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub contact: RawContact,
    #[serde(deserialize_with = "null_as_default")]
    pub profile: String,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<EducationEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: SkillSet,
    #[serde(deserialize_with = "null_as_default")]
    pub experience: Vec<RawExperience>,
    #[serde(deserialize_with = "null_as_default")]
    pub interests: Vec<InterestEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub references: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_updated: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawContact {
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    /// Every other key is a named link (website, linkedin, github, ...)
    #[serde(flatten)]
    pub links: BTreeMap<String, Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawExperience {
    pub company: Option<String>,
    pub company_short: Option<String>,
    pub url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    pub title: Option<String>,
    pub title_short: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub period: RawPeriod,
    #[serde(deserialize_with = "null_as_default")]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPeriod {
    #[serde(deserialize_with = "null_as_default")]
    pub from: MonthYear,
    #[serde(deserialize_with = "null_as_default")]
    pub to: MonthYear,
}

/// `titles` is written either as a list or as a single string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

// ===== Canonical model =====

#[derive(Debug, Clone, PartialEq)]
pub struct ResumeDocument {
    pub name: String,
    pub headline: Headline,
    pub contact: ContactInfo,
    pub profile: String,
    pub education: Vec<EducationEntry>,
    pub skills: SkillSet,
    pub experience: Vec<ExperienceEntry>,
    pub interests: Vec<InterestEntry>,
    pub references: String,
    pub last_updated: String,
}

/// Whichever headline fields the document variant provides
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Headline {
    pub title: Option<String>,
    pub titles: Vec<String>,
    pub punchline: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactInfo {
    pub location: String,
    pub phone: String,
    pub email: String,
    pub links: Vec<NamedLink>,
}

impl ContactInfo {
    /// URL of the link stored under `key`, if present and non-empty
    pub fn link(&self, key: &str) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.key.eq_ignore_ascii_case(key))
            .map(|l| l.url.as_str())
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedLink {
    pub key: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct EducationEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct SkillSet {
    #[serde(default, deserialize_with = "null_as_default")]
    pub platform: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deployment: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub programming: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub observability: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    #[serde(rename(serialize = "CICD"))]
    pub cicd: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub services: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceEntry {
    pub company: String,
    pub url: Option<String>,
    pub location: String,
    pub title: String,
    pub period: Period,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Period {
    pub from: MonthYear,
    pub to: PeriodEnd,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MonthYear {
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub month: String,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub year: String,
}

impl MonthYear {
    pub fn new(month: &str, year: &str) -> Self {
        Self {
            month: month.to_string(),
            year: year.to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.month.trim().is_empty() && self.year.trim().is_empty()
    }

    /// Non-empty parts joined by a single space ("Jan 2020", "2020", "")
    pub fn display(&self) -> String {
        [self.month.trim(), self.year.trim()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// End of an experience period
#[derive(Debug, Clone, PartialEq)]
pub enum PeriodEnd {
    /// Marked with `-`: the position is current
    Open,
    /// Both fields left empty
    Unspecified,
    Until(MonthYear),
}

impl PeriodEnd {
    pub fn classify(to: MonthYear) -> Self {
        if to.month.trim() == OPEN_ENDED_MARKER || to.year.trim() == OPEN_ENDED_MARKER {
            PeriodEnd::Open
        } else if to.is_blank() {
            PeriodEnd::Unspecified
        } else {
            PeriodEnd::Until(to)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct InterestEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

// ===== Normalization =====

impl ResumeDocument {
    /// Fold any accepted on-disk variant into the canonical model
    pub fn from_raw(raw: RawResume) -> Self {
        let headline = Headline {
            title: non_empty(raw.title),
            titles: raw
                .titles
                .map(OneOrMany::into_vec)
                .unwrap_or_default()
                .into_iter()
                .filter(|t| !t.trim().is_empty())
                .collect(),
            punchline: non_empty(raw.punchline),
        };

        let contact = ContactInfo {
            location: raw.contact.location,
            phone: raw.contact.phone,
            email: raw.contact.email,
            links: raw
                .contact
                .links
                .into_iter()
                .map(|(key, url)| NamedLink {
                    key,
                    url: url.unwrap_or_default().trim().to_string(),
                })
                .collect(),
        };

        Self {
            name: raw.name,
            headline,
            contact,
            profile: raw.profile,
            education: raw.education,
            skills: raw.skills,
            experience: raw
                .experience
                .into_iter()
                .map(ExperienceEntry::from_raw)
                .collect(),
            interests: raw.interests,
            references: raw.references,
            last_updated: raw.last_updated,
        }
    }
}

impl ExperienceEntry {
    fn from_raw(raw: RawExperience) -> Self {
        Self {
            company: non_empty(raw.company)
                .or_else(|| non_empty(raw.company_short))
                .unwrap_or_default(),
            url: non_empty(raw.url),
            location: raw.location,
            title: non_empty(raw.title)
                .or_else(|| non_empty(raw.title_short))
                .unwrap_or_default(),
            period: Period {
                from: raw.period.from,
                to: PeriodEnd::classify(raw.period.to),
            },
            achievements: raw.achievements,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ===== Serde helpers =====

/// Treat an explicit `null` (a bare `key:` in YAML) like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
}

/// Months and years are free text, but `year: 2020` arrives as a number
fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Text(s)) => s,
        Some(Scalar::Int(i)) => i.to_string(),
        Some(Scalar::Float(f)) => f.to_string(),
        None => String::new(),
    })
}
