//! Closed vocabularies used to classify site content.

use serde::{Deserialize, Serialize};

/// Error returned when a stored or submitted key is not part of a catalog.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {catalog} key: {key}")]
pub struct CatalogError {
    /// Which catalog was being parsed.
    pub catalog: &'static str,
    /// The rejected key.
    pub key: String,
}

/// Area of expertise a service or portfolio project belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expertise {
    WebApps,
    EnterpriseSaas,
    MobileApps,
    Geoscience,
    SchoolMgmt,
    Crm,
}

impl Expertise {
    /// Every expertise, in the order they are offered in filters.
    pub const ALL: [Self; 6] = [
        Self::WebApps,
        Self::EnterpriseSaas,
        Self::MobileApps,
        Self::Geoscience,
        Self::SchoolMgmt,
        Self::Crm,
    ];

    /// Stored key, also used in `?type=` and `?expertise=` query strings.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::WebApps => "web_apps",
            Self::EnterpriseSaas => "enterprise_saas",
            Self::MobileApps => "mobile_apps",
            Self::Geoscience => "geoscience",
            Self::SchoolMgmt => "school_mgmt",
            Self::Crm => "crm",
        }
    }

    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::WebApps => "Web Applications",
            Self::EnterpriseSaas => "Learning Management System",
            Self::MobileApps => "Mobile Applications",
            Self::Geoscience => "Geoscience Platforms",
            Self::SchoolMgmt => "School Management Systems",
            Self::Crm => "CRM Solutions",
        }
    }
}

impl std::fmt::Display for Expertise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Expertise {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.key() == s)
            .ok_or_else(|| CatalogError {
                catalog: "expertise",
                key: s.to_owned(),
            })
    }
}

/// Category of a blog post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlogCategory {
    News,
    Tech,
    CaseStudy,
    Tutorial,
}

impl BlogCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 4] = [Self::News, Self::Tech, Self::CaseStudy, Self::Tutorial];

    /// Stored key, also used in the `?category=` query string.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::News => "news",
            Self::Tech => "tech",
            Self::CaseStudy => "case_study",
            Self::Tutorial => "tutorial",
        }
    }

    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::News => "Company News",
            Self::Tech => "Technology Updates",
            Self::CaseStudy => "Case Studies",
            Self::Tutorial => "Tutorials",
        }
    }
}

impl std::fmt::Display for BlogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for BlogCategory {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| CatalogError {
                catalog: "blog category",
                key: s.to_owned(),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_expertise_keys_round_trip_through_from_str() {
        for expertise in Expertise::ALL {
            assert_eq!(expertise.key().parse::<Expertise>().unwrap(), expertise);
        }
    }

    #[test]
    fn test_enterprise_saas_label() {
        assert_eq!(
            Expertise::EnterpriseSaas.label(),
            "Learning Management System"
        );
    }

    #[test]
    fn test_unknown_keys() {
        let err = "blockchain".parse::<Expertise>().unwrap_err();
        assert_eq!(err.to_string(), "unknown expertise key: blockchain");
        assert!("gossip".parse::<BlogCategory>().is_err());
    }

    #[test]
    fn test_serde_matches_keys() {
        let json = serde_json::to_string(&BlogCategory::CaseStudy).unwrap();
        assert_eq!(json, "\"case_study\"");
    }
}
