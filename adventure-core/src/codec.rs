//! Text record format for persisted rooms.
//!
//! Every room is stored as one record:
//!
//! ```text
//! ROOM NAME: <name>
//! CONNECTION 1: <neighbour>
//! CONNECTION k: <neighbour>
//! ROOM TYPE: <START_ROOM|MID_ROOM|END_ROOM>
//! ```
//!
//! Decoding runs in two passes. The first creates every room from its name
//! and type lines; the second resolves connection lines against those names.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::{
    catalog::is_valid_room_name,
    error::{DecodeError, MalformedReason},
    graph::{Graph, LinkRejection, MAX_DEGREE, Node, Role},
};

const NAME_TAG: &str = "ROOM NAME:";
const CONNECTION_TAG: &str = "CONNECTION";
const TYPE_TAG: &str = "ROOM TYPE:";

/// One persisted room: the label it is stored under and its text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    label: String,
    text: String,
}

impl Record {
    /// Wraps `text` stored under `label`.
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }

    /// Storage label, used as the file name by the dataset store.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Record body.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Encodes every room of `graph` in graph order.
///
/// # Examples
/// ```
/// use adventure_core::{Catalog, GraphBuilder, decode, encode};
///
/// let graph = GraphBuilder::new().with_rng_seed(4).build(&Catalog::default())?;
/// let records = encode(&graph);
/// assert_eq!(records.len(), graph.len());
/// assert!(records[0].text().starts_with("ROOM NAME: "));
/// assert!(decode(&records)?.structurally_eq(&graph));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[must_use]
pub fn encode(graph: &Graph) -> Vec<Record> {
    graph
        .nodes()
        .iter()
        .map(|node| Record::new(node.label(), encode_node(node)))
        .collect()
}

/// Renders the record text for a single room. Connections are numbered from
/// one in the order they were made.
#[must_use]
pub fn encode_node(node: &Node) -> String {
    let mut text = format!("{NAME_TAG} {}\n", node.name());
    for (index, neighbour) in node.neighbours().iter().enumerate() {
        text.push_str(&format!("{CONNECTION_TAG} {}: {neighbour}\n", index + 1));
    }
    text.push_str(&format!("{TYPE_TAG} {}\n", node.role().token()));
    text
}

/// Rebuilds a graph from `records`.
///
/// Rooms keep the order of `records` and take their label from the record.
/// Degree lower bounds and link symmetry are not re-checked; callers wanting
/// those guarantees can run [`Graph::invariants`].
///
/// # Errors
/// Returns [`DecodeError::MalformedRecord`] when a record cannot be parsed,
/// [`DecodeError::DuplicateRoomName`] when two records share a name,
/// [`DecodeError::UnresolvedConnection`], [`DecodeError::SelfConnection`],
/// [`DecodeError::DuplicateConnection`] or
/// [`DecodeError::TooManyConnections`] for bad connection lists, and
/// [`DecodeError::RoleCardinality`] unless exactly one start and one end room
/// are present.
#[instrument(name = "codec.decode", err, skip(records), fields(records = records.len()))]
pub fn decode(records: &[Record]) -> Result<Graph, DecodeError> {
    let parsed = records
        .iter()
        .map(parse_record)
        .collect::<Result<Vec<_>, _>>()?;

    let mut graph = Graph::default();
    for (record, room) in records.iter().zip(&parsed) {
        graph
            .insert(Node::new(room.name.as_str(), record.label(), room.role))
            .map_err(|rejected| DecodeError::DuplicateRoomName {
                name: rejected.name().to_owned(),
            })?;
    }

    let known: HashSet<String> = parsed.iter().map(|room| room.name.clone()).collect();
    for (index, room) in parsed.iter().enumerate() {
        resolve_connections(&mut graph, index, room, &known)?;
    }

    let starts = graph.rooms_with_role(Role::Start).count();
    let ends = graph.rooms_with_role(Role::End).count();
    if starts != 1 || ends != 1 {
        return Err(DecodeError::RoleCardinality { starts, ends });
    }

    debug!(rooms = graph.len(), edges = graph.edge_count(), "records decoded");
    Ok(graph)
}

/// Fields extracted from one record during the first pass.
#[derive(Debug)]
struct ParsedRoom {
    name: String,
    role: Role,
    connections: Vec<String>,
}

fn resolve_connections(
    graph: &mut Graph,
    index: usize,
    room: &ParsedRoom,
    known: &HashSet<String>,
) -> Result<(), DecodeError> {
    if room.connections.len() > MAX_DEGREE {
        return Err(DecodeError::TooManyConnections {
            room: room.name.clone(),
            count: room.connections.len(),
            max: MAX_DEGREE,
        });
    }
    for target in &room.connections {
        if !known.contains(target) {
            return Err(DecodeError::UnresolvedConnection {
                room: room.name.clone(),
                target: target.clone(),
            });
        }
        let Some(node) = graph.node_at_mut(index) else {
            continue;
        };
        node.push_neighbour(target)
            .map_err(|rejection| match rejection {
                LinkRejection::SelfLink => DecodeError::SelfConnection {
                    room: room.name.clone(),
                },
                LinkRejection::Full => DecodeError::TooManyConnections {
                    room: room.name.clone(),
                    count: room.connections.len(),
                    max: MAX_DEGREE,
                },
                LinkRejection::AlreadyLinked | LinkRejection::MissingRoom => {
                    DecodeError::DuplicateConnection {
                        room: room.name.clone(),
                        target: target.clone(),
                    }
                }
            })?;
    }
    Ok(())
}

/// Parses one record, enforcing the name, connections, type field order.
fn parse_record(record: &Record) -> Result<ParsedRoom, DecodeError> {
    let malformed = |line: Option<usize>, reason: MalformedReason| DecodeError::MalformedRecord {
        record: record.label().to_owned(),
        line,
        reason,
    };

    let mut name: Option<String> = None;
    let mut role: Option<Role> = None;
    let mut connections = Vec::new();

    for (offset, raw) in record.text().lines().enumerate() {
        let number = Some(offset + 1);
        let line = raw.trim_end_matches('\r').trim();
        if line.is_empty() {
            continue;
        }

        if let Some(value) = line.strip_prefix(NAME_TAG) {
            if name.is_some() {
                return Err(malformed(number, MalformedReason::DuplicateField { field: NAME_TAG }));
            }
            name = Some(parse_name(value).map_err(|reason| malformed(number, reason))?);
        } else if let Some(rest) = line.strip_prefix(CONNECTION_TAG) {
            if name.is_none() {
                return Err(malformed(number, MalformedReason::MissingName));
            }
            if role.is_some() {
                return Err(malformed(
                    number,
                    MalformedReason::OutOfOrder {
                        field: CONNECTION_TAG,
                    },
                ));
            }
            let target = parse_connection(rest, connections.len() + 1)
                .map_err(|reason| malformed(number, reason))?;
            connections.push(target);
        } else if let Some(value) = line.strip_prefix(TYPE_TAG) {
            if name.is_none() {
                return Err(malformed(number, MalformedReason::MissingName));
            }
            if role.is_some() {
                return Err(malformed(number, MalformedReason::DuplicateField { field: TYPE_TAG }));
            }
            let token = value.trim();
            role = Some(Role::from_token(token).ok_or_else(|| {
                malformed(
                    number,
                    MalformedReason::UnknownRole {
                        token: token.to_owned(),
                    },
                )
            })?);
        } else {
            return Err(malformed(
                number,
                MalformedReason::UnexpectedLine {
                    content: line.to_owned(),
                },
            ));
        }
    }

    let name = name.ok_or_else(|| malformed(None, MalformedReason::MissingName))?;
    let role = role.ok_or_else(|| malformed(None, MalformedReason::MissingRole))?;
    Ok(ParsedRoom {
        name,
        role,
        connections,
    })
}

fn parse_name(value: &str) -> Result<String, MalformedReason> {
    let value = value.trim();
    if is_valid_room_name(value) {
        Ok(value.to_owned())
    } else {
        Err(MalformedReason::InvalidName {
            value: value.to_owned(),
        })
    }
}

/// Parses the part of a connection line after the tag, e.g. ` 2: Lake`.
fn parse_connection(rest: &str, expected: usize) -> Result<String, MalformedReason> {
    let index_error = |found: &str| MalformedReason::ConnectionIndex {
        expected,
        found: found.to_owned(),
    };
    let Some((index, value)) = rest.split_once(':') else {
        return Err(index_error(rest.trim()));
    };
    let index = index.trim();
    if index.parse::<usize>().ok() != Some(expected) {
        return Err(index_error(index));
    }
    parse_name(value)
}
