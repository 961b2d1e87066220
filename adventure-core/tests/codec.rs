//! Record codec tests against canned datasets and generated graphs.

mod common;
mod records;

use adventure_core::{
    Catalog, DecodeError, DecodeErrorCode, GraphBuilder, MalformedReason, Role, decode, encode,
};
use adventure_test_support::datasets::{
    SEVEN_ROOMS, SEVEN_ROOMS_END, SEVEN_ROOMS_START, with_record_edited,
};
use common::{CatalogShape, suite_proptest_config};
use proptest::prelude::*;
use records::records;
use rstest::rstest;

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn decode_inverts_encode(seed in any::<u64>(), shape in any::<CatalogShape>()) {
        let graph = GraphBuilder::new()
            .with_rng_seed(seed)
            .build(&shape.catalog())
            .expect("build must succeed");
        let encoded = encode(&graph);
        let decoded = decode(&encoded).expect("encoded graph decodes");
        prop_assert!(decoded.structurally_eq(&graph));
        prop_assert_eq!(encode(&decoded), encoded);
    }
}

#[rstest]
fn seven_room_dataset_decodes() {
    let graph = decode(&records(SEVEN_ROOMS)).expect("dataset is valid");
    graph.invariants().check_all().expect("dataset satisfies invariants");
    let start = graph.rooms_with_role(Role::Start).next().expect("start room");
    let end = graph.rooms_with_role(Role::End).next().expect("end room");
    assert_eq!(start.name(), SEVEN_ROOMS_START);
    assert_eq!(end.name(), SEVEN_ROOMS_END);
    assert_eq!(start.label(), "Hills_Room");
}

#[rstest]
fn encoded_text_matches_dataset_verbatim() {
    let source = records(SEVEN_ROOMS);
    let graph = decode(&source).expect("dataset is valid");
    assert_eq!(encode(&graph), source);
}

#[rstest]
fn unknown_role_token_is_malformed() {
    let edited = with_record_edited("Lake_Room", |text| text.replace("MID_ROOM", "SIDE_ROOM"));
    let err = decode(&records(edited)).expect_err("SIDE_ROOM is not a role");
    assert_eq!(err.code(), DecodeErrorCode::MalformedRecord);
    assert_eq!(
        err,
        DecodeError::MalformedRecord {
            record: "Lake_Room".into(),
            line: Some(6),
            reason: MalformedReason::UnknownRole {
                token: "SIDE_ROOM".into(),
            },
        }
    );
}

#[rstest]
fn unknown_neighbour_is_unresolved() {
    let edited = with_record_edited("Beach_Room", |text| text.replace("Jungle", "Volcano"));
    let err = decode(&records(edited)).expect_err("Volcano is not a room");
    assert_eq!(
        err,
        DecodeError::UnresolvedConnection {
            room: "Beach".into(),
            target: "Volcano".into(),
        }
    );
}

#[rstest]
#[case::name_line("ROOM NAME: Field\n", MalformedReason::MissingName)]
#[case::type_line("ROOM TYPE: MID_ROOM\n", MalformedReason::MissingRole)]
fn missing_field_is_malformed(#[case] removed: &str, #[case] expected: MalformedReason) {
    let edited = with_record_edited("Field_Room", |text| text.replace(removed, ""));
    match decode(&records(edited)).expect_err("field removed") {
        DecodeError::MalformedRecord { record, reason, .. } => {
            assert_eq!(record, "Field_Room");
            assert_eq!(reason, expected);
        }
        other => panic!("expected malformed record, got {other:?}"),
    }
}

#[rstest]
fn second_end_room_breaks_cardinality() {
    let edited = with_record_edited("Ocean_Room", |text| text.replace("MID_ROOM", "END_ROOM"));
    assert_eq!(
        decode(&records(edited)).expect_err("two end rooms"),
        DecodeError::RoleCardinality { starts: 1, ends: 2 }
    );
}

#[rstest]
fn windows_line_endings_decode() {
    let edited: Vec<(String, String)> = SEVEN_ROOMS
        .iter()
        .map(|(label, text)| ((*label).to_owned(), text.replace('\n', "\r\n")))
        .collect();
    let crlf = decode(&records(edited)).expect("CRLF dataset decodes");
    let lf = decode(&records(SEVEN_ROOMS)).expect("LF dataset decodes");
    assert!(crlf.structurally_eq(&lf));
}

#[rstest]
fn built_graph_records_use_catalog_labels() {
    let catalog = Catalog::default();
    let graph = GraphBuilder::new()
        .with_rng_seed(8)
        .build(&catalog)
        .expect("build must succeed");
    for record in encode(&graph) {
        let name = record
            .text()
            .lines()
            .next()
            .and_then(|line| line.strip_prefix("ROOM NAME: "))
            .expect("first line names the room");
        assert_eq!(record.label(), format!("{name}_Room"));
    }
}
