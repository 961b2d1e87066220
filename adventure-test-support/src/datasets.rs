//! Canned room datasets in the on-disk record format.
//!
//! The seven-room dataset is a circulant graph (every room links to the rooms
//! one and three steps away around the ring), so every room has degree four
//! and the neighbour relation is symmetric. `Hills` is the start room and
//! `Jungle` the end room; they are two moves apart (`Hills` → `Desert` →
//! `Jungle`).

/// `(record label, record text)` pairs for a valid seven-room dataset.
pub const SEVEN_ROOMS: [(&str, &str); 7] = [
    (
        "Hills_Room",
        "ROOM NAME: Hills\n\
         CONNECTION 1: Beach\n\
         CONNECTION 2: Ocean\n\
         CONNECTION 3: Field\n\
         CONNECTION 4: Desert\n\
         ROOM TYPE: START_ROOM\n",
    ),
    (
        "Beach_Room",
        "ROOM NAME: Beach\n\
         CONNECTION 1: Lake\n\
         CONNECTION 2: Hills\n\
         CONNECTION 3: Desert\n\
         CONNECTION 4: Jungle\n\
         ROOM TYPE: MID_ROOM\n",
    ),
    (
        "Lake_Room",
        "ROOM NAME: Lake\n\
         CONNECTION 1: Field\n\
         CONNECTION 2: Beach\n\
         CONNECTION 3: Jungle\n\
         CONNECTION 4: Ocean\n\
         ROOM TYPE: MID_ROOM\n",
    ),
    (
        "Field_Room",
        "ROOM NAME: Field\n\
         CONNECTION 1: Desert\n\
         CONNECTION 2: Lake\n\
         CONNECTION 3: Ocean\n\
         CONNECTION 4: Hills\n\
         ROOM TYPE: MID_ROOM\n",
    ),
    (
        "Desert_Room",
        "ROOM NAME: Desert\n\
         CONNECTION 1: Jungle\n\
         CONNECTION 2: Field\n\
         CONNECTION 3: Hills\n\
         CONNECTION 4: Beach\n\
         ROOM TYPE: MID_ROOM\n",
    ),
    (
        "Jungle_Room",
        "ROOM NAME: Jungle\n\
         CONNECTION 1: Ocean\n\
         CONNECTION 2: Desert\n\
         CONNECTION 3: Beach\n\
         CONNECTION 4: Lake\n\
         ROOM TYPE: END_ROOM\n",
    ),
    (
        "Ocean_Room",
        "ROOM NAME: Ocean\n\
         CONNECTION 1: Hills\n\
         CONNECTION 2: Jungle\n\
         CONNECTION 3: Lake\n\
         CONNECTION 4: Field\n\
         ROOM TYPE: MID_ROOM\n",
    ),
];

/// Name of the start room in [`SEVEN_ROOMS`].
pub const SEVEN_ROOMS_START: &str = "Hills";
/// Name of the end room in [`SEVEN_ROOMS`].
pub const SEVEN_ROOMS_END: &str = "Jungle";

/// Returns a copy of [`SEVEN_ROOMS`] with `edit` applied to the text of the
/// record labelled `label`.
///
/// # Examples
/// ```
/// use adventure_test_support::datasets::with_record_edited;
///
/// let edited = with_record_edited("Lake_Room", |text| text.replace("MID_ROOM", "SIDE_ROOM"));
/// assert!(edited.iter().any(|(_, text)| text.contains("SIDE_ROOM")));
/// ```
#[must_use]
pub fn with_record_edited(
    label: &str,
    edit: impl Fn(&str) -> String,
) -> Vec<(&'static str, String)> {
    SEVEN_ROOMS
        .iter()
        .map(|(record_label, text)| {
            let body = if *record_label == label {
                edit(text)
            } else {
                (*text).to_owned()
            };
            (*record_label, body)
        })
        .collect()
}
