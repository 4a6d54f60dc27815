//! Fixed dictionaries used by classification
//!
//! The word lists are immutable and built once per [`Lexicon`]. Lookups are
//! case-sensitive exact matches, except organization suffixes which match
//! anywhere inside the text.

use std::collections::HashSet;

const TECHNOLOGY_TERMS: &[&str] = &[
    // Protocols
    "HTTP", "HTTPS", "FTP", "SSH", "TCP", "UDP", "IP", "DNS",
    // Formats
    "JSON", "XML", "YAML", "CSV", "HTML", "CSS", "Markdown",
    // Databases
    "SQL", "NoSQL", "PostgreSQL", "MySQL", "MongoDB", "Redis", "Elasticsearch",
    // API styles
    "REST", "GraphQL", "gRPC", "SOAP",
    // Languages
    "Go", "Python", "JavaScript", "TypeScript", "Rust", "Java", "C", "Ruby",
    // Frameworks
    "React", "Angular", "Vue", "Django", "Flask", "Express", "Rails",
    // Infrastructure
    "Docker", "Kubernetes", "AWS", "Azure", "GCP", "CI", "CD",
    // General
    "API", "SDK", "CLI", "GUI", "IDE", "URL", "URI", "UUID",
];

const PERSON_INDICATORS: &[&str] = &[
    "Dr", "Mr", "Mrs", "Ms", "Miss", "Prof", "Professor", "Sir", "Dame", "Lord", "Lady",
    "Captain", "Major", "Developer", "Engineer", "Manager", "Director", "President", "CEO",
    "Designer", "Analyst", "Administrator", "User", "Client", "Customer",
];

const PLACE_INDICATORS: &[&str] = &[
    "City", "Country", "State", "Region", "District", "Province", "Territory", "Street",
    "Avenue", "Road", "Lane", "Building", "Office", "Campus", "Server", "Database",
    "Repository",
];

const ORGANIZATION_SUFFIXES: &[&str] = &[
    "Inc", "Corp", "LLC", "Ltd", "Company", "Corporation", "Organization", "Foundation",
    "Institute", "Agency", "Department", "Division", "Team",
];

/// Dictionaries of technology terms, person and place indicators, and
/// organization suffixes
#[derive(Debug, Clone)]
pub struct Lexicon {
    technology: HashSet<&'static str>,
    person: HashSet<&'static str>,
    place: HashSet<&'static str>,
    organization_suffixes: &'static [&'static str],
}

impl Lexicon {
    /// Build the built-in dictionaries
    pub fn new() -> Self {
        Self {
            technology: TECHNOLOGY_TERMS.iter().copied().collect(),
            person: PERSON_INDICATORS.iter().copied().collect(),
            place: PLACE_INDICATORS.iter().copied().collect(),
            organization_suffixes: ORGANIZATION_SUFFIXES,
        }
    }

    /// Exact match against the technology terms
    pub fn is_technology(&self, text: &str) -> bool {
        self.technology.contains(text)
    }

    /// Exact match against the person indicators
    pub fn is_person_indicator(&self, text: &str) -> bool {
        self.person.contains(text)
    }

    /// Exact match against the place indicators
    pub fn is_place_indicator(&self, text: &str) -> bool {
        self.place.contains(text)
    }

    /// True when any organization suffix occurs inside `text`
    pub fn has_organization_suffix(&self, text: &str) -> bool {
        self.organization_suffixes
            .iter()
            .any(|suffix| text.contains(suffix))
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups_are_case_sensitive() {
        let lexicon = Lexicon::new();
        assert!(lexicon.is_technology("HTTP"));
        assert!(!lexicon.is_technology("http"));
        assert!(lexicon.is_person_indicator("Dr"));
        assert!(!lexicon.is_person_indicator("dr"));
        assert!(lexicon.is_place_indicator("Server"));
    }

    #[test]
    fn test_organization_suffix_is_substring_match() {
        let lexicon = Lexicon::new();
        assert!(lexicon.has_organization_suffix("AcmeCorp"));
        assert!(lexicon.has_organization_suffix("Platform Team"));
        assert!(!lexicon.has_organization_suffix("Widget"));
    }
}
