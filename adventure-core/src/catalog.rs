//! The pool of candidate rooms the builder draws from.

use std::collections::HashSet;

use crate::{error::BuildError, graph::GRAPH_SIZE};

const DEFAULT_ROOMS: [(&str, &str); 10] = [
    ("Hills", "Hills_Room"),
    ("Beach", "Beach_Room"),
    ("Lake", "Lake_Room"),
    ("Field", "Field_Room"),
    ("Desert", "Desert_Room"),
    ("Jungle", "Jungle_Room"),
    ("Ocean", "Ocean_Room"),
    ("Marsh", "Marsh_Room"),
    ("Arctic", "Arctic_Room"),
    ("Forest", "Forest_Room"),
];

/// One candidate room: its display name and the label its record is stored
/// under.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CatalogEntry {
    name: String,
    label: String,
}

impl CatalogEntry {
    /// Room name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Fixed, ordered list of candidate rooms with unique names and labels.
///
/// # Examples
/// ```
/// use adventure_core::Catalog;
///
/// let catalog = Catalog::default();
/// assert_eq!(catalog.len(), 10);
/// assert_eq!(catalog.entries()[0].name(), "Hills");
///
/// let custom = Catalog::new([
///     ("Attic", "attic"), ("Cellar", "cellar"), ("Hall", "hall"),
///     ("Study", "study"), ("Pantry", "pantry"), ("Porch", "porch"),
///     ("Vault", "vault"),
/// ])
/// .expect("seven distinct rooms are enough");
/// assert_eq!(custom.len(), 7);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Validates and wraps caller-supplied `(name, label)` pairs.
    ///
    /// # Errors
    /// Returns [`BuildError::CatalogTooSmall`] for fewer than
    /// [`GRAPH_SIZE`] entries, [`BuildError::InvalidRoomName`] or
    /// [`BuildError::InvalidRecordLabel`] for values the record store cannot
    /// hold, and [`BuildError::DuplicateCatalogName`] or
    /// [`BuildError::DuplicateCatalogLabel`] for repeats.
    pub fn new<N, L>(entries: impl IntoIterator<Item = (N, L)>) -> Result<Self, BuildError>
    where
        N: Into<String>,
        L: Into<String>,
    {
        let entries: Vec<CatalogEntry> = entries
            .into_iter()
            .map(|(name, label)| CatalogEntry {
                name: name.into(),
                label: label.into(),
            })
            .collect();
        validate(&entries)?;
        Ok(Self { entries })
    }

    /// Number of candidate rooms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the catalog is empty. Validated catalogs never are.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Candidate rooms in catalog order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Entry at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            entries: DEFAULT_ROOMS
                .iter()
                .map(|(name, label)| CatalogEntry {
                    name: (*name).to_owned(),
                    label: (*label).to_owned(),
                })
                .collect(),
        }
    }
}

fn validate(entries: &[CatalogEntry]) -> Result<(), BuildError> {
    if entries.len() < GRAPH_SIZE {
        return Err(BuildError::CatalogTooSmall {
            entries: entries.len(),
            required: GRAPH_SIZE,
        });
    }

    let mut names = HashSet::with_capacity(entries.len());
    let mut labels = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !is_valid_room_name(&entry.name) {
            return Err(BuildError::InvalidRoomName {
                name: entry.name.clone(),
            });
        }
        if !is_valid_label(&entry.label) {
            return Err(BuildError::InvalidRecordLabel {
                label: entry.label.clone(),
            });
        }
        if !names.insert(entry.name.as_str()) {
            return Err(BuildError::DuplicateCatalogName {
                name: entry.name.clone(),
            });
        }
        if !labels.insert(entry.label.as_str()) {
            return Err(BuildError::DuplicateCatalogLabel {
                label: entry.label.clone(),
            });
        }
    }
    Ok(())
}

/// Room names are single whitespace-free tokens; the record format and the
/// interactive prompt both split on whitespace.
pub(crate) fn is_valid_room_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(char::is_whitespace)
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label != "."
        && label != ".."
        && !label.chars().any(|c| c == '/' || c == '\\' || c == '\0')
}
