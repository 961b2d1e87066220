//! Property-suite helpers shared by the builder and codec suites.

use adventure_core::Catalog;
use adventure_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;
use test_strategy::Arbitrary;

/// Builds a proptest configuration from the shared CI profile.
#[must_use]
pub fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Catalog shapes the builder properties run against.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
pub enum CatalogShape {
    /// The ten built-in rooms.
    #[weight(3)]
    Default,
    /// Exactly as many rooms as a graph needs.
    #[weight(1)]
    Exact,
    /// A larger custom pool.
    #[weight(1)]
    Wide,
}

impl CatalogShape {
    /// Materialises the catalog.
    #[must_use]
    pub fn catalog(self) -> Catalog {
        let size = match self {
            Self::Default => return Catalog::default(),
            Self::Exact => 7,
            Self::Wide => 16,
        };
        Catalog::new((0..size).map(|index| (format!("Room{index}"), format!("room_{index}"))))
            .expect("generated catalog is valid")
    }
}
