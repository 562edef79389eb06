// src/shaper.rs
//! Maps a parsed resume onto the flat record the page template expects.
//!
//! Shaping is pure: the current year and every presentation policy come in
//! through arguments, so the same document always yields the same record.

use tracing::debug;

use crate::types::{
    ContactInfo, ExperienceEntry, Period, PeriodEnd, PresentationExperience, PresentationRecord,
    ResumeDocument, SocialLink,
};

/// Display order for the well-known contact links
pub const DEFAULT_SOCIAL_ORDER: [&str; 4] = ["github", "twitter", "linkedin", "website"];

/// Where an experience block's link comes from when the entry has no `url`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkFallback {
    /// Leave the link empty
    None,
    /// Use the contact link stored under this key
    Contact(String),
}

impl Default for LinkFallback {
    fn default() -> Self {
        LinkFallback::Contact("linkedin".to_string())
    }
}

impl LinkFallback {
    /// Parse a config/CLI value: `none` (or empty) disables the fallback
    pub fn from_setting(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "" | "none" | "off" => LinkFallback::None,
            key => LinkFallback::Contact(key.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeOptions {
    pub link_fallback: LinkFallback,
    pub social_order: Vec<String>,
}

impl Default for ShapeOptions {
    fn default() -> Self {
        Self {
            link_fallback: LinkFallback::default(),
            social_order: DEFAULT_SOCIAL_ORDER.iter().map(|s| s.to_string()).collect(),
        }
    }
}

pub fn shape(doc: &ResumeDocument, year: i32, options: &ShapeOptions) -> PresentationRecord {
    let title = headline_title(doc);
    let titles = if doc.headline.titles.is_empty() && !title.is_empty() {
        vec![title.clone()]
    } else {
        doc.headline.titles.clone()
    };

    let experience: Vec<PresentationExperience> = doc
        .experience
        .iter()
        .map(|entry| shape_experience(entry, &doc.contact, &options.link_fallback))
        .collect();

    let social = social_links(&doc.contact, &options.social_order);
    debug!(
        experiences = experience.len(),
        social = social.len(),
        "Shaped resume for {}",
        doc.name
    );

    PresentationRecord {
        name: doc.name.clone(),
        title,
        titles,
        punchline: doc.headline.punchline.clone().unwrap_or_default(),
        summary: doc.profile.clone(),
        email: doc.contact.email.clone(),
        location: doc.contact.location.clone(),
        phone: doc.contact.phone.clone(),
        experience,
        social,
        education: doc.education.clone(),
        skills: doc.skills.clone(),
        interests: doc.interests.clone(),
        references: doc.references.clone(),
        last_updated: doc.last_updated.clone(),
        year,
    }
}

/// Explicit `title`, else the most recent role, else empty
fn headline_title(doc: &ResumeDocument) -> String {
    doc.headline
        .title
        .clone()
        .or_else(|| {
            doc.experience
                .first()
                .map(|e| e.title.clone())
                .filter(|t| !t.is_empty())
        })
        .unwrap_or_default()
}

fn shape_experience(
    entry: &ExperienceEntry,
    contact: &ContactInfo,
    fallback: &LinkFallback,
) -> PresentationExperience {
    let link = match (&entry.url, fallback) {
        (Some(url), _) => url.clone(),
        (None, LinkFallback::Contact(key)) => contact.link(key).unwrap_or_default().to_string(),
        (None, LinkFallback::None) => String::new(),
    };

    PresentationExperience {
        role: entry.title.clone(),
        company: entry.company.clone(),
        location: entry.location.clone(),
        period: format_period(&entry.period),
        bullets: entry.achievements.clone(),
        link,
    }
}

/// "Jan 2020 to Dec 2022", "Jan 2020 to Present", or just "Jan 2020" when
/// no end was given. A blank start leaves only the end.
pub fn format_period(period: &Period) -> String {
    let from = period.from.display();
    let to = match &period.to {
        PeriodEnd::Open => "Present".to_string(),
        PeriodEnd::Until(to) => to.display(),
        PeriodEnd::Unspecified => String::new(),
    };
    match (from.is_empty(), to.is_empty()) {
        (false, false) => format!("{} to {}", from, to),
        (false, true) => from,
        (true, _) => to,
    }
}

fn social_links(contact: &ContactInfo, order: &[String]) -> Vec<SocialLink> {
    let mut links: Vec<SocialLink> = order
        .iter()
        .filter_map(|key| {
            contact.link(key).map(|url| SocialLink {
                name: link_label(key),
                url: url.to_string(),
            })
        })
        .collect();

    for extra in &contact.links {
        if extra.url.is_empty() || order.iter().any(|k| k.eq_ignore_ascii_case(&extra.key)) {
            continue;
        }
        links.push(SocialLink {
            name: link_label(&extra.key),
            url: extra.url.clone(),
        });
    }

    links
}

fn link_label(key: &str) -> String {
    match key.to_lowercase().as_str() {
        "github" => "GitHub".to_string(),
        "twitter" => "Twitter".to_string(),
        "linkedin" => "LinkedIn".to_string(),
        "website" => "Website".to_string(),
        _ => {
            let mut chars = key.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Headline, MonthYear, NamedLink};

    fn contact(links: &[(&str, &str)]) -> ContactInfo {
        ContactInfo {
            email: "jane@example.com".to_string(),
            links: links
                .iter()
                .map(|(k, v)| NamedLink {
                    key: k.to_string(),
                    url: v.to_string(),
                })
                .collect(),
            ..Default::default()
        }
    }

    fn entry(title: &str, to: PeriodEnd, url: Option<&str>) -> ExperienceEntry {
        ExperienceEntry {
            company: "Acme".to_string(),
            url: url.map(str::to_string),
            location: "Remote".to_string(),
            title: title.to_string(),
            period: Period {
                from: MonthYear::new("Jan", "2021"),
                to,
            },
            achievements: vec!["Shipped it".to_string(), "Kept it up".to_string()],
        }
    }

    fn document(experience: Vec<ExperienceEntry>) -> ResumeDocument {
        ResumeDocument {
            name: "Jane Doe".to_string(),
            headline: Headline::default(),
            contact: contact(&[("linkedin", "https://linkedin.com/in/jane")]),
            profile: "Builds platforms.".to_string(),
            education: Vec::new(),
            skills: Default::default(),
            experience,
            interests: Vec::new(),
            references: String::new(),
            last_updated: String::new(),
        }
    }

    #[test]
    fn test_format_period() {
        let open = Period {
            from: MonthYear::new("Jan", "2020"),
            to: PeriodEnd::classify(MonthYear::new("-", "-")),
        };
        assert_eq!(format_period(&open), "Jan 2020 to Present");

        let closed = Period {
            from: MonthYear::new("Jan", "2020"),
            to: PeriodEnd::classify(MonthYear::new("Dec", "2022")),
        };
        assert_eq!(format_period(&closed), "Jan 2020 to Dec 2022");
    }

    #[test]
    fn test_format_period_empty_end_is_not_present() {
        let period = Period {
            from: MonthYear::new("Jan", "2020"),
            to: PeriodEnd::classify(MonthYear::new("", "")),
        };
        assert_eq!(format_period(&period), "Jan 2020");

        let year_only = Period {
            from: MonthYear::new("Jan", "2020"),
            to: PeriodEnd::classify(MonthYear::new("", "2022")),
        };
        assert_eq!(format_period(&year_only), "Jan 2020 to 2022");
    }

    #[test]
    fn test_format_period_blank_start() {
        let blank = MonthYear::new("", "");
        let open = Period {
            from: blank.clone(),
            to: PeriodEnd::Open,
        };
        assert_eq!(format_period(&open), "Present");

        let closed = Period {
            from: blank.clone(),
            to: PeriodEnd::Until(MonthYear::new("Dec", "2022")),
        };
        assert_eq!(format_period(&closed), "Dec 2022");

        let nothing = Period {
            from: blank,
            to: PeriodEnd::Unspecified,
        };
        assert_eq!(format_period(&nothing), "");
    }

    #[test]
    fn test_experience_blocks_preserve_length_and_order() {
        let doc = document(vec![
            entry("Engineer", PeriodEnd::Open, None),
            entry("Intern", PeriodEnd::Until(MonthYear::new("Dec", "2020")), None),
        ]);
        let record = shape(&doc, 2024, &ShapeOptions::default());

        assert_eq!(record.experience.len(), 2);
        assert_eq!(record.experience[0].role, "Engineer");
        assert_eq!(record.experience[0].period, "Jan 2021 to Present");
        assert_eq!(record.experience[1].period, "Jan 2021 to Dec 2020");
        assert_eq!(record.experience[0].bullets, vec!["Shipped it", "Kept it up"]);
        assert_eq!(record.year, 2024);
        assert_eq!(record.summary, "Builds platforms.");
    }

    #[test]
    fn test_empty_experience_does_not_panic() {
        let doc = document(Vec::new());
        let record = shape(&doc, 2024, &ShapeOptions::default());
        assert_eq!(record.title, "");
        assert!(record.titles.is_empty());
        assert!(record.experience.is_empty());
    }

    #[test]
    fn test_title_derivation() {
        let mut doc = document(vec![entry("Engineer", PeriodEnd::Open, None)]);
        assert_eq!(shape(&doc, 2024, &ShapeOptions::default()).title, "Engineer");
        assert_eq!(
            shape(&doc, 2024, &ShapeOptions::default()).titles,
            vec!["Engineer"]
        );

        doc.headline.title = Some("Staff Engineer".to_string());
        assert_eq!(shape(&doc, 2024, &ShapeOptions::default()).title, "Staff Engineer");

        doc.headline.titles = vec!["SRE".to_string(), "Platform".to_string()];
        assert_eq!(
            shape(&doc, 2024, &ShapeOptions::default()).titles,
            vec!["SRE", "Platform"]
        );
    }

    #[test]
    fn test_link_policy() {
        let doc = document(vec![
            entry("Engineer", PeriodEnd::Open, Some("https://acme.example")),
            entry("Intern", PeriodEnd::Open, None),
        ]);

        let record = shape(&doc, 2024, &ShapeOptions::default());
        assert_eq!(record.experience[0].link, "https://acme.example");
        assert_eq!(record.experience[1].link, "https://linkedin.com/in/jane");

        let options = ShapeOptions {
            link_fallback: LinkFallback::None,
            ..Default::default()
        };
        let record = shape(&doc, 2024, &options);
        assert_eq!(record.experience[0].link, "https://acme.example");
        assert_eq!(record.experience[1].link, "");

        let options = ShapeOptions {
            link_fallback: LinkFallback::from_setting("website"),
            ..Default::default()
        };
        assert_eq!(shape(&doc, 2024, &options).experience[1].link, "");
    }

    #[test]
    fn test_link_fallback_from_setting() {
        assert_eq!(LinkFallback::from_setting("none"), LinkFallback::None);
        assert_eq!(LinkFallback::from_setting(""), LinkFallback::None);
        assert_eq!(
            LinkFallback::from_setting("LinkedIn"),
            LinkFallback::Contact("linkedin".to_string())
        );
    }

    #[test]
    fn test_social_links_order_and_omission() {
        let mut doc = document(Vec::new());
        doc.contact = contact(&[
            ("linkedin", "https://linkedin.com/in/jane"),
            ("mastodon", "https://hachyderm.io/@jane"),
            ("twitter", ""),
            ("website", "https://jane.dev"),
            ("github", "https://github.com/jane"),
        ]);

        let record = shape(&doc, 2024, &ShapeOptions::default());
        let names: Vec<&str> = record.social.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["GitHub", "LinkedIn", "Website", "Mastodon"]);
        assert!(record.social.iter().all(|s| !s.url.is_empty()));
    }

    #[test]
    fn test_no_links_yields_no_social() {
        let mut doc = document(Vec::new());
        doc.contact = contact(&[]);
        let record = shape(&doc, 2024, &ShapeOptions::default());
        assert!(record.social.is_empty());
    }

    #[test]
    fn test_shape_is_idempotent() {
        let doc = document(vec![entry("Engineer", PeriodEnd::Open, None)]);
        let options = ShapeOptions::default();
        assert_eq!(shape(&doc, 2024, &options), shape(&doc, 2024, &options));
    }
}
