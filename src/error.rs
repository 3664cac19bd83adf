//! Error types for graph assembly, compilation, and rendering.

use std::fmt;
use std::path::PathBuf;

use itertools::Itertools;

use crate::node::NodeId;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Everything that can go wrong while building or running a graph.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The connection graph contains a cycle; nothing was compiled.
    #[error(transparent)]
    Cycle(#[from] CycleError),

    /// A node was constructed with parameters that make it meaningless.
    #[error("invalid {node} configuration: {reason}")]
    InvalidConfiguration { node: &'static str, reason: String },

    /// A raw sample file whose length is not a whole number of `f32`s.
    #[error("truncated sample data{}: {len} bytes is not a multiple of 4", display_path(.path))]
    TruncatedFile { path: Option<PathBuf>, len: usize },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The audio sink failed; rendering stops rather than feeding a dead device.
    #[error("audio sink failed: {0}")]
    Sink(#[from] SinkError),

    /// A port index that the node does not have.
    #[error("{node:?} has no {direction} port {port}")]
    NoSuchPort {
        node: NodeId,
        port: usize,
        direction: PortDirection,
    },

    /// A node id handed out by a different graph.
    #[error("{0:?} does not belong to this graph")]
    ForeignNode(NodeId),

    /// A tick was aborted by a sink failure; the program needs a restart.
    #[error("render program halted after a sink failure; finish() it before rendering again")]
    Halted,
}

impl Error {
    pub(crate) fn invalid(node: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            node,
            reason: reason.into(),
        }
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" in {}", p.display()),
        None => String::new(),
    }
}

/// Raised when no node becomes ready during a full compiler pass.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("graph has cycles among nodes [{}]", join_ids(.unresolved))]
pub struct CycleError {
    /// Nodes still pending when the compiler gave up, in insertion order.
    pub unresolved: Vec<NodeId>,
}

fn join_ids(ids: &[NodeId]) -> String {
    ids.iter().map(|id| id.index()).join(", ")
}

/// Failures reported across the audio sink boundary.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("no audio output device available")]
    Unavailable,

    #[error("audio stream error: {0}")]
    Stream(String),

    /// The sample queue has no free slot.
    #[error("sample queue is full")]
    Full,

    /// `feed_sample` after `deinit`, or before `init`.
    #[error("sink is not open")]
    Closed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortDirection {
    Input,
    Output,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortDirection::Input => f.write_str("input"),
            PortDirection::Output => f.write_str("output"),
        }
    }
}
