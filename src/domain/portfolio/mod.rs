pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Education, Experience, Project, Skill, SkillGroup};
pub use errors::PortfolioError;
pub use value_objects::{Locale, LocalizedText, Period, PeriodDate};
