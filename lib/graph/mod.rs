//! Graph-based intermediate representation of diagrams in the ZX-calculus.
//!
//! A [`ZXDiagram`] is an undirected multigraph whose vertices are labeled by
//! [`Generator`]s and whose wires carry [`WireProperties`]. Self-loops and
//! parallel wires are allowed, and generators may be *directed*, in which case
//! each incident wire names the port it attaches to. Generators and wires are
//! additionally tagged with a [`QuantumType`] to distinguish ordinary wires
//! from the doubled wires of the CPM construction.
//!
//! Diagrams are mutated in place by [`rules`], which are composed into larger
//! procedures with [`Rewrite`][rules::Rewrite]. Local regions of a diagram can
//! be cut out and replaced through [`Subdiagram`].

use thiserror::Error;

/// Errors for fallible operations on diagrams.
///
/// All of these indicate a malformed diagram or invalid caller input. Rewrite
/// rules never return them.
#[derive(Debug, Error)]
pub enum ZXError {
    /// Returned when a generator factory is called with a type belonging to
    /// another family of generators.
    #[error("cannot construct generator of type {0:?}: {1}")]
    InvalidGenerator(ZXType, &'static str),

    /// Returned when a vertex does not exist under a given ID.
    #[error("missing vertex {0}")]
    MissingVertex(VertId),

    /// Returned when a wire does not exist under a given ID.
    #[error("missing wire {0}")]
    MissingWire(WireId),

    /// Returned when no wire between two vertices matches a query.
    #[error("no matching wire between {0} and {1}")]
    NoWireBetween(VertId, VertId),

    /// Returned when a wire does not have a given vertex at either end.
    #[error("wire {0} is not incident on vertex {1}")]
    NotIncident(WireId, VertId),

    /// Returned when a port query on a vertex does not match exactly one
    /// wire.
    #[error("vertex {0} has {2} wires at port {1:?}; expected exactly one")]
    WireAtPort(VertId, Option<usize>, usize),

    /// Returned when a boundary vertex does not have exactly one incident
    /// wire.
    #[error("boundary vertex {0} has degree {1}")]
    BoundaryDegree(VertId, usize),

    /// Returned when a boundary-typed vertex is not listed exactly once in the
    /// boundary of its diagram.
    #[error("boundary vertex {0} is listed {1} times in the diagram boundary")]
    BoundaryListing(VertId, usize),

    /// Returned when the boundary list contains a vertex that is not
    /// boundary-typed.
    #[error("vertex {0} is in the diagram boundary but is not a boundary")]
    NotBoundary(VertId),

    /// Returned when a wire names a port that its endpoint does not have, or
    /// names a port on an undirected generator.
    #[error("wire {0} uses invalid port {2:?} on vertex {1}")]
    InvalidPort(WireId, VertId, Option<usize>),

    /// Returned when a port of a directed generator has no incident wire.
    #[error("port {1} of vertex {0} is not connected")]
    MissingPort(VertId, usize),

    /// Returned when a port of a directed generator has more than one incident
    /// wire.
    #[error("port {1} of vertex {0} is connected more than once")]
    DuplicatePort(VertId, usize),

    /// Returned when a wire's quantum type is not accepted by an endpoint.
    #[error("wire {0} is not a valid edge for vertex {1}")]
    InvalidEdge(WireId, VertId),

    /// Returned when the nested diagram of a box fails a validity check.
    #[error("in nested diagram of box {0}: {1}")]
    NestedDiagram(VertId, Box<ZXError>),

    /// Returned when a subdiagram lists the same wire end twice.
    #[error("subdiagram cut lists wire {0} at its {1:?} end more than once")]
    CutDuplicate(WireId, WireEnd),

    /// Returned when a subdiagram cut end does not lie on a vertex inside the
    /// region.
    #[error("subdiagram cut end of wire {0} at its {1:?} end is outside the region")]
    CutOutside(WireId, WireEnd),

    /// Returned when a subdiagram region contains a boundary vertex.
    #[error("subdiagram region contains boundary vertex {0}")]
    CutBoundaryInside(VertId),

    /// Returned when a wire leaves a subdiagram region without being cut.
    #[error("subdiagram region is not closed: wire {1} leaves vertex {0}")]
    CutNotClosed(VertId, WireId),

    /// Returned when a wire with both ends inside a subdiagram region is cut
    /// at only one of its ends.
    #[error("wire {0} is interior to the subdiagram but cut at one end only")]
    CutPartial(WireId),

    /// Returned when a replacement diagram's boundary does not match the cut
    /// it is substituted into.
    #[error("cannot substitute a diagram with {0} boundaries into a cut of size {1}")]
    SubstituteSize(usize, usize),

    /// Returned when the quantum type of a replacement boundary does not
    /// match its cut wire.
    #[error("quantum type mismatch at substitution boundary {0}")]
    SubstituteQType(usize),

    /// Returned when an operation requiring an MBQC diagram is called on
    /// something else.
    #[error("diagram is not in MBQC form")]
    NotMBQC,

    /// Returned when a vertex required to carry a numerical parameter is
    /// symbolic.
    #[error("vertex {0} has a symbolic parameter")]
    Symbolic(VertId),

    /// Returned when a diagram contains a generator that cannot be contracted
    /// into a tensor.
    #[error("cannot contract generator {0}")]
    Uncontractable(String),

    /// Returned when a diagram is too large to contract by brute force.
    #[error("contraction over {0} wire variables is too large")]
    ContractionTooLarge(usize),

    /// Returned when a flow fails verification or cannot be found.
    #[error("flow error at vertex {0:?}: {1}")]
    Flow(Option<VertId>, &'static str),

    /// Error in rendering a graph with `tabbycat`.
    #[error("graphviz error: {0}")]
    GraphvizError(String),

    /// I/O error when writing a diagram to a file.
    #[error("{0}")]
    IOError(#[from] std::io::Error),
}
pub type ZXResult<T> = Result<T, ZXError>;

/// Distinguishes ordinary wires and generators from those of the doubled,
/// completely positive map semantics.
///
/// A `Quantum` wire denotes a pair of `Classical` wires (the wire and its
/// conjugate).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QuantumType {
    Quantum,
    Classical,
}

impl QuantumType {
    pub(crate) fn prefix(self) -> &'static str {
        match self {
            Self::Quantum => "Q",
            Self::Classical => "C",
        }
    }
}

pub mod generator;
pub use generator::*;

pub mod wire;
pub use wire::*;

pub(crate) mod diagram;
pub use diagram::*;

pub(crate) mod expansions;

pub mod subdiagram;
pub use subdiagram::Subdiagram;

pub(crate) mod contract;

pub(crate) mod graphviz;

pub mod rules;

pub mod flow;
pub use flow::Flow;
