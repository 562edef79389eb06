// src/types/mod.rs
pub mod presentation;
pub mod resume;

pub use presentation::{PresentationExperience, PresentationRecord, SocialLink};
pub use resume::{
    ContactInfo, EducationEntry, ExperienceEntry, Headline, InterestEntry, MonthYear, NamedLink,
    Period, PeriodEnd, RawResume, ResumeDocument, SkillSet,
};
