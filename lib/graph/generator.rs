//! Generators labeling the vertices of a diagram.
//!
//! Generators are immutable values falling into a closed set of families:
//! - *boundaries* (`Input`, `Output`, `Open`), marking where a diagram meets
//!   the outside world;
//! - *phased* generators (`ZSpider`, `XSpider`, `Hbox`, and the MBQC planes
//!   `XY`, `XZ`, `YZ`), carrying an [`Expr`] parameter;
//! - *Clifford* generators (`PX`, `PY`, `PZ`), MBQC Pauli measurements
//!   carrying a single boolean;
//! - *directed* generators (`Triangle`, `ZXBox`), whose incident wires must
//!   name the port they attach to.
//!
//! Boundary, phased, and Clifford generators are undirected and their wires
//! carry no ports.

use std::collections::BTreeSet;
use std::sync::Arc;
use crate::{
    expr::{ Expr, Symbol, SymbolMap },
    graph::{ QuantumType, ZXDiagram, ZXError, ZXResult },
};
use QuantumType::*;

/// Type of a generator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ZXType {
    Input,
    Output,
    Open,
    ZSpider,
    XSpider,
    Hbox,
    XY,
    XZ,
    YZ,
    PX,
    PY,
    PZ,
    Triangle,
    ZXBox,
}

impl ZXType {
    /// Return `true` for `Input`, `Output`, and `Open`.
    pub fn is_boundary(self) -> bool {
        matches!(self, Self::Input | Self::Output | Self::Open)
    }

    /// Return `true` for undirected, non-boundary generators.
    pub fn is_basic_gen(self) -> bool {
        self.is_phase() || self.is_clifford_gen()
    }

    /// Return `true` for `ZSpider` and `XSpider`.
    pub fn is_spider(self) -> bool {
        matches!(self, Self::ZSpider | Self::XSpider)
    }

    /// Return `true` for types that carry an [`Expr`] parameter.
    pub fn is_phase(self) -> bool {
        matches!(
            self,
            Self::ZSpider | Self::XSpider | Self::Hbox
                | Self::XY | Self::XZ | Self::YZ
        )
    }

    /// Return `true` for types that carry a boolean parameter.
    pub fn is_clifford_gen(self) -> bool {
        matches!(self, Self::PX | Self::PY | Self::PZ)
    }

    /// Return `true` for types whose wires must name ports.
    pub fn is_directed(self) -> bool {
        matches!(self, Self::Triangle | Self::ZXBox)
    }

    /// Return `true` for MBQC measurement types.
    pub fn is_mbqc(self) -> bool {
        matches!(
            self,
            Self::XY | Self::XZ | Self::YZ | Self::PX | Self::PY | Self::PZ
        )
    }

    fn label(self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::Output => "Output",
            Self::Open => "Open",
            Self::ZSpider => "Z",
            Self::XSpider => "X",
            Self::Hbox => "H",
            Self::XY => "XY",
            Self::XZ => "XZ",
            Self::YZ => "YZ",
            Self::PX => "PX",
            Self::PY => "PY",
            Self::PZ => "PZ",
            Self::Triangle => "Tri",
            Self::ZXBox => "Box",
        }
    }
}

#[derive(Clone, Debug)]
enum GenData {
    Boundary { ty: ZXType, qtype: QuantumType },
    Phased { ty: ZXType, param: Expr, qtype: QuantumType },
    Clifford { ty: ZXType, param: bool, qtype: QuantumType },
    Triangle { qtype: QuantumType },
    Box { diagram: Arc<ZXDiagram> },
}

/// A vertex label.
///
/// Construction through [`new`][Self::new], [`new_phased`][Self::new_phased],
/// and [`new_clifford`][Self::new_clifford] checks that the requested type
/// belongs to the family targeted by each factory.
///
/// Equality between generators is *structural*: type, quantum type, and
/// parameter must all match. Boxes are never equal to anything, including
/// themselves, since true equality would require graph isomorphism.
#[derive(Clone, Debug)]
pub struct Generator {
    data: GenData,
}

impl PartialEq for Generator {
    fn eq(&self, other: &Self) -> bool { self.structurally_equal(other) }
}

impl Generator {
    /// Create a generator with default parameter from its type and quantum
    /// type.
    ///
    /// Phased generators are given parameter 0 (−1 for `Hbox`) and Clifford
    /// generators are given `false`. Fails for `ZXBox`, which must be created
    /// through [`new_box`][Self::new_box].
    pub fn new(ty: ZXType, qtype: QuantumType) -> ZXResult<Self> {
        let data =
            match ty {
                ZXType::Input | ZXType::Output | ZXType::Open
                    => GenData::Boundary { ty, qtype },
                ZXType::Hbox
                    => GenData::Phased { ty, param: Expr::from(-1), qtype },
                ZXType::ZSpider | ZXType::XSpider
                    | ZXType::XY | ZXType::XZ | ZXType::YZ
                    => GenData::Phased { ty, param: Expr::from(0), qtype },
                ZXType::PX | ZXType::PY | ZXType::PZ
                    => GenData::Clifford { ty, param: false, qtype },
                ZXType::Triangle
                    => GenData::Triangle { qtype },
                ZXType::ZXBox
                    => {
                        return Err(ZXError::InvalidGenerator(
                            ty, "boxes require a nested diagram"));
                    },
            };
        Ok(Self { data })
    }

    /// Create a phased generator.
    pub fn new_phased(ty: ZXType, param: Expr, qtype: QuantumType)
        -> ZXResult<Self>
    {
        ty.is_phase().then_some(())
            .ok_or(ZXError::InvalidGenerator(ty, "not a phased type"))?;
        Ok(Self { data: GenData::Phased { ty, param, qtype } })
    }

    /// Create a boolean-parameterized Clifford generator.
    pub fn new_clifford(ty: ZXType, param: bool, qtype: QuantumType)
        -> ZXResult<Self>
    {
        ty.is_clifford_gen().then_some(())
            .ok_or(ZXError::InvalidGenerator(ty, "not a Clifford type"))?;
        Ok(Self { data: GenData::Clifford { ty, param, qtype } })
    }

    /// Create a box wrapping a nested diagram.
    ///
    /// The box has one port per boundary vertex of `diagram`, in boundary
    /// order.
    pub fn new_box(diagram: ZXDiagram) -> Self {
        Self { data: GenData::Box { diagram: Arc::new(diagram) } }
    }

    pub(crate) fn from_shared_box(diagram: Arc<ZXDiagram>) -> Self {
        Self { data: GenData::Box { diagram } }
    }

    /// Create a Z-spider.
    pub fn z_spider(param: Expr, qtype: QuantumType) -> Self {
        Self { data: GenData::Phased { ty: ZXType::ZSpider, param, qtype } }
    }

    /// Create an X-spider.
    pub fn x_spider(param: Expr, qtype: QuantumType) -> Self {
        Self { data: GenData::Phased { ty: ZXType::XSpider, param, qtype } }
    }

    /// Create an H-box.
    pub fn hbox(param: Expr, qtype: QuantumType) -> Self {
        Self { data: GenData::Phased { ty: ZXType::Hbox, param, qtype } }
    }

    /// Create a triangle.
    pub fn triangle(qtype: QuantumType) -> Self {
        Self { data: GenData::Triangle { qtype } }
    }

    /// Create an `Input` boundary.
    pub fn input(qtype: QuantumType) -> Self {
        Self { data: GenData::Boundary { ty: ZXType::Input, qtype } }
    }

    /// Create an `Output` boundary.
    pub fn output(qtype: QuantumType) -> Self {
        Self { data: GenData::Boundary { ty: ZXType::Output, qtype } }
    }

    /// Create an `Open` boundary.
    pub fn open(qtype: QuantumType) -> Self {
        Self { data: GenData::Boundary { ty: ZXType::Open, qtype } }
    }

    // for callers that already know `ty` is phased
    pub(crate) fn phased(ty: ZXType, param: Expr, qtype: QuantumType) -> Self {
        debug_assert!(ty.is_phase());
        Self { data: GenData::Phased { ty, param, qtype } }
    }

    // for callers that already know `ty` is a Clifford type
    pub(crate) fn clifford(ty: ZXType, param: bool, qtype: QuantumType)
        -> Self
    {
        debug_assert!(ty.is_clifford_gen());
        Self { data: GenData::Clifford { ty, param, qtype } }
    }

    /// Return the type of `self`.
    pub fn ty(&self) -> ZXType {
        match &self.data {
            GenData::Boundary { ty, .. } => *ty,
            GenData::Phased { ty, .. } => *ty,
            GenData::Clifford { ty, .. } => *ty,
            GenData::Triangle { .. } => ZXType::Triangle,
            GenData::Box { .. } => ZXType::ZXBox,
        }
    }

    /// Return the quantum type of `self`.
    ///
    /// Boxes have no uniform quantum type and return `None`; see
    /// [`signature`][Self::signature].
    pub fn qtype(&self) -> Option<QuantumType> {
        match &self.data {
            GenData::Boundary { qtype, .. } => Some(*qtype),
            GenData::Phased { qtype, .. } => Some(*qtype),
            GenData::Clifford { qtype, .. } => Some(*qtype),
            GenData::Triangle { qtype } => Some(*qtype),
            GenData::Box { .. } => None,
        }
    }

    /// Return the parameter of a phased generator.
    pub fn param(&self) -> Option<&Expr> {
        match &self.data {
            GenData::Phased { param, .. } => Some(param),
            _ => None,
        }
    }

    /// Return the parameter of a Clifford generator.
    pub fn clifford_param(&self) -> Option<bool> {
        match &self.data {
            GenData::Clifford { param, .. } => Some(*param),
            _ => None,
        }
    }

    /// Return the nested diagram of a box.
    pub fn diagram(&self) -> Option<&Arc<ZXDiagram>> {
        match &self.data {
            GenData::Box { diagram } => Some(diagram),
            _ => None,
        }
    }

    /// Return the number of ports of a directed generator.
    pub fn n_ports(&self) -> Option<usize> {
        match &self.data {
            GenData::Triangle { .. } => Some(2),
            GenData::Box { diagram } => Some(diagram.boundary_len()),
            _ => None,
        }
    }

    /// Return the quantum type of each port of a directed generator.
    pub fn signature(&self) -> Option<Vec<QuantumType>> {
        match &self.data {
            GenData::Triangle { qtype } => Some(vec![*qtype, *qtype]),
            GenData::Box { diagram } => Some(diagram.boundary_qtypes()),
            _ => None,
        }
    }

    /// Return `true` if a wire of quantum type `qtype` attached at `port` is
    /// permitted.
    ///
    /// Undirected generators accept only unported wires; a `Classical` one
    /// accepts wires of either quantum type, while a `Quantum` one accepts only
    /// `Quantum` wires. Boundaries accept only their own quantum type. Directed
    /// generators require an in-range port whose quantum type matches.
    pub fn valid_edge(&self, port: Option<usize>, qtype: QuantumType) -> bool {
        match &self.data {
            GenData::Boundary { qtype: q, .. }
                => port.is_none() && qtype == *q,
            GenData::Phased { qtype: q, .. } | GenData::Clifford { qtype: q, .. }
                => port.is_none() && (qtype == *q || *q == Classical),
            GenData::Triangle { qtype: q }
                => port.is_some_and(|p| p < 2) && qtype == *q,
            GenData::Box { diagram }
                => port.and_then(|p| diagram.boundary_qtypes().get(p).copied())
                    .is_some_and(|q| q == qtype),
        }
    }

    /// Return the set of free symbols in the parameter of `self`, recursing
    /// into nested diagrams.
    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        match &self.data {
            GenData::Phased { param, .. } => param.free_symbols(),
            GenData::Box { diagram } => diagram.free_symbols(),
            _ => BTreeSet::new(),
        }
    }

    /// Substitute values for symbols, returning `None` if nothing would
    /// change.
    pub fn symbol_substitution(&self, map: &SymbolMap) -> Option<Self> {
        match &self.data {
            GenData::Phased { ty, param, qtype } => {
                let new = param.subs(map);
                (new != *param).then(|| {
                    Self {
                        data: GenData::Phased {
                            ty: *ty, param: new, qtype: *qtype }
                    }
                })
            },
            GenData::Box { diagram } => {
                let touched =
                    diagram.free_symbols().iter().any(|s| map.contains_key(s));
                touched.then(|| {
                    let mut inner = (**diagram).clone();
                    inner.symbol_substitution(map);
                    Self::new_box(inner)
                })
            },
            _ => None,
        }
    }

    /// Return `true` if `self` and `other` have the same type, quantum type,
    /// and parameter.
    ///
    /// Always `false` if either is a box.
    pub fn structurally_equal(&self, other: &Self) -> bool {
        match (&self.data, &other.data) {
            (
                GenData::Boundary { ty: t1, qtype: q1 },
                GenData::Boundary { ty: t2, qtype: q2 },
            ) => t1 == t2 && q1 == q2,
            (
                GenData::Phased { ty: t1, param: p1, qtype: q1 },
                GenData::Phased { ty: t2, param: p2, qtype: q2 },
            ) => t1 == t2 && q1 == q2 && p1 == p2,
            (
                GenData::Clifford { ty: t1, param: p1, qtype: q1 },
                GenData::Clifford { ty: t2, param: p2, qtype: q2 },
            ) => t1 == t2 && q1 == q2 && p1 == p2,
            (
                GenData::Triangle { qtype: q1 },
                GenData::Triangle { qtype: q2 },
            ) => q1 == q2,
            _ => false,
        }
    }

    /// Return a short label for diagnostics and visualization, e.g.
    /// `"Q-Z(1/2)"`.
    pub fn name(&self) -> String {
        match &self.data {
            GenData::Boundary { ty, qtype }
                => format!("{}-{}", qtype.prefix(), ty.label()),
            GenData::Phased { ty, param, qtype }
                => format!("{}-{}({})", qtype.prefix(), ty.label(), param),
            GenData::Clifford { ty, param, qtype }
                => format!("{}-{}({})", qtype.prefix(), ty.label(), param),
            GenData::Triangle { qtype }
                => format!("{}-Tri", qtype.prefix()),
            GenData::Box { .. }
                => "Box".to_string(),
        }
    }

    // copy of `self` with a different quantum type; boxes are returned as-is
    pub(crate) fn with_qtype(&self, qtype: QuantumType) -> Self {
        let data =
            match &self.data {
                GenData::Boundary { ty, .. }
                    => GenData::Boundary { ty: *ty, qtype },
                GenData::Phased { ty, param, .. }
                    => GenData::Phased { ty: *ty, param: param.clone(), qtype },
                GenData::Clifford { ty, param, .. }
                    => GenData::Clifford { ty: *ty, param: *param, qtype },
                GenData::Triangle { .. }
                    => GenData::Triangle { qtype },
                GenData::Box { diagram }
                    => GenData::Box { diagram: diagram.clone() },
            };
        Self { data }
    }

    // copy of a phased generator with a new parameter and the same type
    pub(crate) fn with_param(&self, param: Expr) -> Option<Self> {
        match &self.data {
            GenData::Phased { ty, qtype, .. }
                => Some(Self {
                    data: GenData::Phased { ty: *ty, param, qtype: *qtype }
                }),
            _ => None,
        }
    }
}
