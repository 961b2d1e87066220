//! Record-set construction shared by the codec and session suites.

use adventure_core::Record;

/// Converts `(label, text)` pairs into records.
pub fn records<L, T>(pairs: impl IntoIterator<Item = (L, T)>) -> Vec<Record>
where
    L: Into<String>,
    T: Into<String>,
{
    pairs
        .into_iter()
        .map(|(label, text)| Record::new(label, text))
        .collect()
}
