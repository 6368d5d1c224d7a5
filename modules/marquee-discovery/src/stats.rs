/// Counters from one discovery flow.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiscoveryStats {
    pub terms_planned: u32,
    pub pages_fetched: u32,
    pub pages_empty: u32,
    pub pages_failed: u32,
    pub short_pages: u32,
    pub items_collected: u32,
    pub items_deduplicated: u32,
    pub items_rejected: u32,
    pub details_enriched: u32,
    pub details_degraded: u32,
    pub items_filtered: u32,
    pub items_presented: u32,
}

impl std::fmt::Display for DiscoveryStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Discovery Run Complete ===")?;
        writeln!(f, "Terms planned:      {}", self.terms_planned)?;
        writeln!(f, "Pages fetched:      {}", self.pages_fetched)?;
        writeln!(f, "Pages empty:        {}", self.pages_empty)?;
        writeln!(f, "Pages failed:       {}", self.pages_failed)?;
        writeln!(f, "Short pages:        {}", self.short_pages)?;
        writeln!(f, "Items collected:    {}", self.items_collected)?;
        writeln!(f, "Items deduped:      {}", self.items_deduplicated)?;
        writeln!(f, "Items rejected:     {}", self.items_rejected)?;
        let details = (self.details_enriched + self.details_degraded).max(1);
        writeln!(
            f,
            "Details enriched:   {} ({:.0}%)",
            self.details_enriched,
            self.details_enriched as f64 / details as f64 * 100.0
        )?;
        writeln!(f, "Details degraded:   {}", self.details_degraded)?;
        writeln!(f, "Items filtered:     {}", self.items_filtered)?;
        writeln!(f, "Items presented:    {}", self.items_presented)?;
        Ok(())
    }
}
