//! Fixed sector catalog and sector filtering.
//!
//! The feed tracks six budget sectors. The set is deterministic; only the
//! magnitudes drawn for each sector are random. Each sector carries a fixed
//! per-hour magnitude band so generated values stay plausible relative to one
//! another.

use serde::{Deserialize, Serialize};

/// One of the six fixed budget sectors tracked by the feed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Education,
    Healthcare,
    Infrastructure,
    PublicSafety,
    SocialServices,
    Environment,
}

impl Sector {
    /// Every sector, in display order.
    pub const ALL: [Sector; 6] = [
        Sector::Education,
        Sector::Healthcare,
        Sector::Infrastructure,
        Sector::PublicSafety,
        Sector::SocialServices,
        Sector::Environment,
    ];

    /// Per-hour magnitude band for this sector: `[min, max)`.
    pub fn band(self) -> (u64, u64) {
        match self {
            Self::Education => (150, 250),
            Self::Healthcare => (120, 200),
            Self::Infrastructure => (90, 150),
            Self::PublicSafety => (60, 100),
            Self::SocialServices => (40, 70),
            Self::Environment => (30, 50),
        }
    }

    /// Display name, also accepted (case-insensitively) by [`Sector::parse`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Education => "Education",
            Self::Healthcare => "Healthcare",
            Self::Infrastructure => "Infrastructure",
            Self::PublicSafety => "Public Safety",
            Self::SocialServices => "Social Services",
            Self::Environment => "Environment",
        }
    }

    /// Parse a sector from its display name, case-insensitively.
    /// Underscores are treated as spaces so wire keys like `public_safety`
    /// resolve too.
    pub fn parse(s: &str) -> Option<Sector> {
        let normalized = s.trim().replace('_', " ");
        Sector::ALL
            .into_iter()
            .find(|sector| sector.name().eq_ignore_ascii_case(&normalized))
    }
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed sector filter.
///
/// `"all"` is the sentinel selecting everything; an unknown key selects
/// nothing (never an error).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorFilter {
    All,
    One(Sector),
    Unmatched,
}

impl SectorFilter {
    /// Parse a filter key. Case-insensitive for both the sentinel and the
    /// sector names.
    pub fn parse(s: &str) -> SectorFilter {
        if s.trim().eq_ignore_ascii_case("all") {
            return SectorFilter::All;
        }
        match Sector::parse(s) {
            Some(sector) => SectorFilter::One(sector),
            None => SectorFilter::Unmatched,
        }
    }

    /// Whether `sector` passes this filter.
    pub fn matches(self, sector: Sector) -> bool {
        match self {
            SectorFilter::All => true,
            SectorFilter::One(wanted) => wanted == sector,
            SectorFilter::Unmatched => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lists_six_distinct_sectors() {
        assert_eq!(Sector::ALL.len(), 6);
        for (i, a) in Sector::ALL.iter().enumerate() {
            for b in &Sector::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn bands_are_nonempty_and_ordered_by_magnitude() {
        for sector in Sector::ALL {
            let (lo, hi) = sector.band();
            assert!(lo < hi, "{sector} band empty");
        }
        // Education is the highest-magnitude sector, environment the lowest.
        assert_eq!(Sector::Education.band().0, 150);
        assert_eq!(Sector::Environment.band(), (30, 50));
    }

    #[test]
    fn parse_accepts_display_names_case_insensitively() {
        assert_eq!(Sector::parse("Education"), Some(Sector::Education));
        assert_eq!(Sector::parse("healthcare"), Some(Sector::Healthcare));
        assert_eq!(Sector::parse("PUBLIC SAFETY"), Some(Sector::PublicSafety));
        assert_eq!(Sector::parse("public_safety"), Some(Sector::PublicSafety));
        assert_eq!(Sector::parse("  environment "), Some(Sector::Environment));
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert_eq!(Sector::parse("defense"), None);
        assert_eq!(Sector::parse(""), None);
        assert_eq!(Sector::parse("all"), None);
    }

    #[test]
    fn filter_all_sentinel_matches_everything() {
        let filter = SectorFilter::parse("all");
        assert_eq!(filter, SectorFilter::All);
        for sector in Sector::ALL {
            assert!(filter.matches(sector));
        }
    }

    #[test]
    fn filter_known_sector_matches_only_itself() {
        let filter = SectorFilter::parse("environment");
        assert!(filter.matches(Sector::Environment));
        assert!(!filter.matches(Sector::Education));
    }

    #[test]
    fn filter_unknown_key_matches_nothing() {
        let filter = SectorFilter::parse("railways");
        assert_eq!(filter, SectorFilter::Unmatched);
        for sector in Sector::ALL {
            assert!(!filter.matches(sector));
        }
    }

    #[test]
    fn serde_names_are_snake_case() {
        let json = serde_json::to_string(&Sector::PublicSafety).unwrap();
        assert_eq!(json, "\"public_safety\"");
        let back: Sector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Sector::PublicSafety);
    }
}
