use marquee_common::Kind;

/// One landing section: a fixed topic query over one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionConfig {
    pub id: String,
    pub title: String,
    pub query: String,
    pub kind: Kind,
}

impl SectionConfig {
    pub fn new(id: &str, title: &str, query: &str, kind: Kind) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            query: query.to_string(),
            kind,
        }
    }

    /// Shown when the section's topic produced nothing displayable.
    pub fn empty_message(&self) -> String {
        let noun = match self.kind {
            Kind::Series => "series",
            Kind::Movie | Kind::Other => "movies",
        };
        format!("No {noun} found for \"{}\"", self.query)
    }
}

/// The landing page, top to bottom. The first entry loads on mount.
pub fn default_sections() -> Vec<SectionConfig> {
    vec![
        SectionConfig::new("action", "Action & Adventure", "action", Kind::Movie),
        SectionConfig::new("comedy", "Comedy", "comedy", Kind::Movie),
        SectionConfig::new("animation", "Animated Series", "animated series", Kind::Series),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sections_have_unique_ids() {
        let sections = default_sections();
        let mut ids: Vec<&str> = sections.iter().map(|s| s.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), sections.len());
        assert_eq!(sections[0].id, "action");
    }

    #[test]
    fn empty_message_names_kind_and_query() {
        let movie = SectionConfig::new("comedy", "Comedy", "comedy", Kind::Movie);
        assert_eq!(movie.empty_message(), "No movies found for \"comedy\"");
    }
}
