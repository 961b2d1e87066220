//! Adventure core library: random room graphs, their text records, and the
//! traversal engine that plays them.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod catalog;
mod codec;
mod error;
mod graph;
mod session;

pub use crate::{
    builder::{BuildStats, GraphBuilder},
    catalog::{Catalog, CatalogEntry},
    codec::{Record, decode, encode, encode_node},
    error::{
        BuildError, BuildErrorCode, DecodeError, DecodeErrorCode, DrawStage, MalformedReason,
        SessionError, SessionErrorCode,
    },
    graph::{
        GRAPH_SIZE, Graph, GraphInvariant, GraphInvariantChecker, GraphInvariantViolation,
        MAX_DEGREE, MIN_DEGREE, Node, Role,
    },
    session::{Location, MoveOutcome, Session, SessionState},
};
