//! Wire data.

use crate::graph::QuantumType;

/// The kind of a wire.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ZXWireType {
    /// An identity wire.
    Basic,
    /// A wire carrying a Hadamard operator.
    H,
}

impl ZXWireType {
    /// Return `Basic` for `H` and vice versa.
    pub fn toggled(self) -> Self {
        match self {
            Self::Basic => Self::H,
            Self::H => Self::Basic,
        }
    }

    /// Return `true` if `self` is `H`.
    pub fn is_h(self) -> bool { self == Self::H }

    // compose two wire types in series
    pub(crate) fn then(self, other: Self) -> Self {
        if self.is_h() ^ other.is_h() { Self::H } else { Self::Basic }
    }
}

/// Names one of the two ends of a wire.
///
/// Wires are semantically undirected; the distinction only serves to
/// associate a port with each end.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WireEnd {
    Source,
    Target,
}

impl WireEnd {
    /// Return the opposite end.
    pub fn flip(self) -> Self {
        match self {
            Self::Source => Self::Target,
            Self::Target => Self::Source,
        }
    }
}

/// Data attached to each wire.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WireProperties {
    pub wire_type: ZXWireType,
    pub qtype: QuantumType,
    /// Port at the source end, if the source is a directed generator.
    pub source_port: Option<usize>,
    /// Port at the target end, if the target is a directed generator.
    pub target_port: Option<usize>,
}

impl WireProperties {
    /// Create a new set of properties for a wire between undirected
    /// generators.
    pub fn new(wire_type: ZXWireType, qtype: QuantumType) -> Self {
        Self { wire_type, qtype, source_port: None, target_port: None }
    }

    /// Create a new set of properties with ports.
    pub fn with_ports(
        wire_type: ZXWireType,
        qtype: QuantumType,
        source_port: Option<usize>,
        target_port: Option<usize>,
    ) -> Self
    {
        Self { wire_type, qtype, source_port, target_port }
    }

    /// Return the port at a particular end.
    pub fn port(&self, end: WireEnd) -> Option<usize> {
        match end {
            WireEnd::Source => self.source_port,
            WireEnd::Target => self.target_port,
        }
    }

    /// Return a copy of `self` with source and target ports swapped.
    pub fn reversed(&self) -> Self {
        Self {
            wire_type: self.wire_type,
            qtype: self.qtype,
            source_port: self.target_port,
            target_port: self.source_port,
        }
    }
}
