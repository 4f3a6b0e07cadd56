//! Rewrite rules for diagram simplification.
//!
//! Every rule is a total function on a [`ZXDiagram`] that mutates it in place
//! and reports whether anything changed. A single application is exhaustive:
//! the whole diagram is scanned and every match found during the pass is
//! rewritten. Rules never fail; a diagram that passes
//! [`check_validity`][ZXDiagram::check_validity] before a rule passes it
//! afterward.
//!
//! Individual rules are named by the [`Rule`] master list. They are composed
//! into larger procedures with [`Rewrite`], which is applied through
//! [`ZXDiagram::simplify`].
//!
//! Phases are in half-turns. The scalar is tracked exactly by the four axioms
//! ([`Rule::RedToGreen`], [`Rule::SpiderFusion`], [`Rule::SelfLoopRemoval`],
//! [`Rule::ParallelHRemoval`]) and by the decompositions and boundary
//! normalizations. Local complementation, pivoting, and the MBQC rewrites
//! preserve the denoted map only up to a non-zero scalar, which is not
//! tracked.
//!
//! # Example
//! ```
//! use num_traits::Zero;
//! use zx_rewrite::{ expr::Expr, graph::* };
//! use zx_rewrite::graph::rules::Rewrite;
//!
//! let mut dg = ZXDiagram::with_boundary(1, 1, 0, 0);
//! let i = dg.boundary(Some(ZXType::Input), None)[0];
//! let o = dg.boundary(Some(ZXType::Output), None)[0];
//! let a = dg.add_vertex(Generator::z_spider(Expr::ratio(1, 4), QuantumType::Quantum));
//! let b = dg.add_vertex(Generator::x_spider(Expr::zero(), QuantumType::Quantum));
//! dg.add_wire(i, a, ZXWireType::Basic, QuantumType::Quantum).unwrap();
//! dg.add_wire(a, b, ZXWireType::H, QuantumType::Quantum).unwrap();
//! dg.add_wire(b, o, ZXWireType::Basic, QuantumType::Quantum).unwrap();
//!
//! assert!(dg.simplify(&Rewrite::to_graphlike_form()));
//! assert!(dg.is_graphlike());
//! assert!(dg.check_validity().is_ok());
//! ```

use tracing::{ debug, error };
use crate::{
    expr::Expr,
    graph::{ QuantumType, VertId, ZXDiagram, ZXResult, ZXType },
};

pub(crate) mod axioms;
pub(crate) mod decompositions;
pub(crate) mod graphlike;
pub(crate) mod simplification;
pub(crate) mod mbqc;

pub(crate) const LOG_TARGET: &str = "zx_rewrite::rules";

/// Master list of individual rewrite rules.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Relabel every X-spider as a Z-spider, toggling the type of every wire
    /// with an odd number of ends on X-spiders.
    RedToGreen,
    /// Merge adjacent spiders of the same color joined by a Basic wire, or of
    /// opposite colors joined by a Hadamard wire.
    SpiderFusion,
    /// Remove self-loops on spiders, adding a π phase for every odd number of
    /// effectively-Hadamard loops.
    SelfLoopRemoval,
    /// Remove pairs of effectively-Hadamard parallel wires between two
    /// spiders (the Hopf rule).
    ParallelHRemoval,
    /// Replace every box with its nested diagram, one level at a time until
    /// none remain.
    DecomposeBoxes,
    /// Replace every Hadamard wire with an H-box of parameter –1.
    BasicWires,
    /// Rewrite MBQC generators and binary/nullary H-boxes into Z- and
    /// X-spiders, Hadamard wires, and the scalar.
    RebaseToZX,
    /// Relabel every `Quantum` Z-spider of a graph-like diagram as an MBQC
    /// measurement with the same meaning.
    RebaseToMBQC,
    /// Insert an identity spider on every boundary wire that is Hadamard or
    /// joins two boundaries.
    IOExtension,
    /// Insert identity chains so that no two boundaries share a spider.
    SeparateBoundaries,
    /// Remove interior proper-Clifford spiders by local complementation.
    RemoveInteriorCliffords,
    /// Remove adjacent pairs of interior Pauli spiders by pivoting.
    RemoveInteriorPaulis,
    /// Extend boundary-adjacent Pauli spiders away from the boundary so they
    /// can be pivoted out.
    ExtendAtBoundaryPaulis,
    /// Pivot interior Pauli spiders against a non-Pauli neighbour after
    /// moving that neighbour's phase onto a new phase gadget.
    GadgetiseInteriorPaulis,
    /// Merge phase gadgets acting on the same set of spiders.
    MergeGadgets,
    /// Ensure that every output of an MBQC diagram is adjacent to a `PX(false)`
    /// vertex.
    ExtendForPXOutputs,
    /// Absorb degree-1 MBQC vertices into the measurement of their neighbour.
    InternaliseGadgets,
}

impl Rule {
    fn apply_inner(self, dg: &mut ZXDiagram) -> ZXResult<bool> {
        match self {
            Self::RedToGreen => axioms::red_to_green(dg),
            Self::SpiderFusion => axioms::spider_fusion(dg),
            Self::SelfLoopRemoval => axioms::self_loop_removal(dg),
            Self::ParallelHRemoval => axioms::parallel_h_removal(dg),
            Self::DecomposeBoxes => decompositions::decompose_boxes(dg),
            Self::BasicWires => decompositions::basic_wires(dg),
            Self::RebaseToZX => decompositions::rebase_to_zx(dg),
            Self::RebaseToMBQC => decompositions::rebase_to_mbqc(dg),
            Self::IOExtension => graphlike::io_extension(dg),
            Self::SeparateBoundaries => graphlike::separate_boundaries(dg),
            Self::RemoveInteriorCliffords
                => simplification::remove_interior_cliffords(dg),
            Self::RemoveInteriorPaulis
                => simplification::remove_interior_paulis(dg),
            Self::ExtendAtBoundaryPaulis
                => simplification::extend_at_boundary_paulis(dg),
            Self::GadgetiseInteriorPaulis
                => simplification::gadgetise_interior_paulis(dg),
            Self::MergeGadgets => simplification::merge_gadgets(dg),
            Self::ExtendForPXOutputs => mbqc::extend_for_px_outputs(dg),
            Self::InternaliseGadgets => mbqc::internalise_gadgets(dg),
        }
    }

    /// Apply the rule to a diagram, returning `true` if anything changed.
    ///
    /// Malformed diagrams (e.g. dangling handles left by manual edits) are
    /// not rewritten; the failure is logged and `false` is returned.
    pub fn apply(self, dg: &mut ZXDiagram) -> bool {
        match self.apply_inner(dg) {
            Ok(true) => {
                debug!(target: LOG_TARGET, rule = ?self, "rewrite applied");
                true
            },
            Ok(false) => false,
            Err(err) => {
                error!(target: LOG_TARGET, rule = ?self, %err, "rewrite aborted");
                false
            },
        }
    }
}

/// A measure of diagram size used by [`Rewrite::RepeatWithMetric`].
pub type Metric = fn(&ZXDiagram) -> usize;

/// A composite rewrite procedure.
#[derive(Clone, Debug)]
pub enum Rewrite {
    /// A single rule.
    Rule(Rule),
    /// Apply each rewrite once, in order. Succeeds if any of them does.
    Sequence(Vec<Rewrite>),
    /// Apply a rewrite until it makes no change. Succeeds if the first
    /// application does.
    Repeat(Box<Rewrite>),
    /// Apply a rewrite to a copy of the diagram, keeping the copy only if
    /// the metric strictly decreases; repeat until a copy is rejected.
    /// Succeeds if any copy is kept.
    RepeatWithMetric(Box<Rewrite>, Metric),
    /// Alternate a condition and a body, stopping once the condition makes
    /// no change. Succeeds if the condition ever does.
    RepeatWhile(Box<Rewrite>, Box<Rewrite>),
}

impl From<Rule> for Rewrite {
    fn from(rule: Rule) -> Self { Self::Rule(rule) }
}

impl Rewrite {
    /// Apply the rewrite, returning `true` if anything changed.
    pub fn apply(&self, dg: &mut ZXDiagram) -> bool {
        match self {
            Self::Rule(rule) => rule.apply(dg),
            Self::Sequence(rws) => {
                rws.iter().fold(false, |acc, rw| rw.apply(dg) || acc)
            },
            Self::Repeat(rw) => {
                let mut success = false;
                while rw.apply(dg) { success = true; }
                success
            },
            Self::RepeatWithMetric(rw, metric) => {
                let mut success = false;
                let mut current = metric(dg);
                loop {
                    let mut copy = dg.clone();
                    if !rw.apply(&mut copy) { break; }
                    let new = metric(&copy);
                    if new >= current { break; }
                    *dg = copy;
                    current = new;
                    success = true;
                }
                success
            },
            Self::RepeatWhile(cond, body) => {
                let mut success = false;
                while cond.apply(dg) {
                    success = true;
                    body.apply(dg);
                }
                success
            },
        }
    }

    /// Create a [`Sequence`][Self::Sequence].
    pub fn sequence<I>(rws: I) -> Self
    where I: IntoIterator<Item = Rewrite>
    {
        Self::Sequence(rws.into_iter().collect())
    }

    /// Create a [`Repeat`][Self::Repeat].
    pub fn repeat(rw: Rewrite) -> Self { Self::Repeat(Box::new(rw)) }

    /// Create a [`RepeatWithMetric`][Self::RepeatWithMetric].
    pub fn repeat_with_metric(rw: Rewrite, metric: Metric) -> Self {
        Self::RepeatWithMetric(Box::new(rw), metric)
    }

    /// Create a [`RepeatWhile`][Self::RepeatWhile].
    pub fn repeat_while(cond: Rewrite, body: Rewrite) -> Self {
        Self::RepeatWhile(Box::new(cond), Box::new(body))
    }

    pub fn red_to_green() -> Self { Rule::RedToGreen.into() }

    pub fn spider_fusion() -> Self { Rule::SpiderFusion.into() }

    pub fn self_loop_removal() -> Self { Rule::SelfLoopRemoval.into() }

    pub fn parallel_h_removal() -> Self { Rule::ParallelHRemoval.into() }

    pub fn decompose_boxes() -> Self { Rule::DecomposeBoxes.into() }

    pub fn basic_wires() -> Self { Rule::BasicWires.into() }

    pub fn rebase_to_zx() -> Self { Rule::RebaseToZX.into() }

    pub fn rebase_to_mbqc() -> Self { Rule::RebaseToMBQC.into() }

    pub fn io_extension() -> Self { Rule::IOExtension.into() }

    pub fn separate_boundaries() -> Self { Rule::SeparateBoundaries.into() }

    pub fn remove_interior_cliffords() -> Self {
        Rule::RemoveInteriorCliffords.into()
    }

    pub fn remove_interior_paulis() -> Self {
        Rule::RemoveInteriorPaulis.into()
    }

    pub fn extend_at_boundary_paulis() -> Self {
        Rule::ExtendAtBoundaryPaulis.into()
    }

    pub fn gadgetise_interior_paulis() -> Self {
        Rule::GadgetiseInteriorPaulis.into()
    }

    pub fn merge_gadgets() -> Self { Rule::MergeGadgets.into() }

    pub fn extend_for_px_outputs() -> Self { Rule::ExtendForPXOutputs.into() }

    pub fn internalise_gadgets() -> Self { Rule::InternaliseGadgets.into() }

    /// Bring a diagram into graph-like form: Z-spiders only, Hadamard wires
    /// between spiders, Basic wires at the boundary, and every boundary on
    /// its own spider.
    ///
    /// Generators without a ZX decomposition (e.g. triangles and general
    /// H-boxes) are left in place, in which case the result is not
    /// graph-like.
    pub fn to_graphlike_form() -> Self {
        Self::sequence([
            Self::decompose_boxes(),
            Self::rebase_to_zx(),
            Self::red_to_green(),
            Self::repeat(Self::sequence([
                Self::spider_fusion(),
                Self::self_loop_removal(),
                Self::parallel_h_removal(),
            ])),
            Self::io_extension(),
            Self::separate_boundaries(),
        ])
    }

    /// Simplify a graph-like diagram by removing interior Clifford spiders
    /// and merging phase gadgets.
    ///
    /// Each round is kept only if it strictly decreases
    /// [`graphlike_metric`], so the procedure always terminates.
    pub fn reduce_graphlike_form() -> Self {
        Self::repeat_with_metric(
            Self::sequence([
                Self::repeat(Self::remove_interior_cliffords()),
                Self::repeat(Self::remove_interior_paulis()),
                Self::extend_at_boundary_paulis(),
                Self::repeat(Self::remove_interior_paulis()),
                Self::gadgetise_interior_paulis(),
                Self::merge_gadgets(),
            ]),
            graphlike_metric,
        )
    }

    /// Bring a diagram into MBQC form.
    pub fn to_mbqc_diag() -> Self {
        Self::sequence([
            Self::to_graphlike_form(),
            Self::reduce_graphlike_form(),
            Self::rebase_to_mbqc(),
            Self::extend_for_px_outputs(),
            Self::repeat(Self::internalise_gadgets()),
        ])
    }
}

/// Number of vertices plus twice the number of interior Clifford spiders that
/// are not the axis of a phase gadget.
pub fn graphlike_metric(dg: &ZXDiagram) -> usize {
    let cliffords =
        dg.vertices()
        .filter(|(v, g)| {
            g.ty() == ZXType::ZSpider
                && g.param().and_then(|p| p.clifford_multiple()).is_some()
                && is_interior(dg, *v)
                && !simplification::is_gadget_axis(dg, *v)
        })
        .count();
    dg.n_vertices() + 2 * cliffords
}

impl ZXDiagram {
    /// Apply a rewrite to `self`, returning `true` if anything changed.
    #[tracing::instrument(target = "zx_rewrite::rules", skip_all)]
    pub fn simplify(&mut self, rw: &Rewrite) -> bool { rw.apply(self) }
}

// `true` if every neighbour of `v` is a Z-spider
pub(crate) fn is_interior(dg: &ZXDiagram, v: VertId) -> bool {
    dg.neighbours(v)
        .is_ok_and(|ns| {
            ns.iter().all(|n| dg.zxtype(*n).is_ok_and(|t| t == ZXType::ZSpider))
        })
}

// add `phase` to the parameter of a phased vertex, reducing modulo 2
pub(crate) fn add_phase(dg: &mut ZXDiagram, v: VertId, phase: &Expr)
    -> ZXResult<()>
{
    let gen = dg.generator(v)?;
    if let Some(new) =
        gen.param().and_then(|p| gen.with_param((p + phase).reduce_phase()))
    {
        dg.set_generator(v, new)?;
    }
    Ok(())
}

// quantum type of a vertex, treating boxes as `Quantum`
pub(crate) fn qtype_of(dg: &ZXDiagram, v: VertId) -> ZXResult<QuantumType> {
    dg.qtype(v).map(|q| q.unwrap_or(QuantumType::Quantum))
}

#[cfg(test)]
mod test {
    use super::*;
    use num_traits::Zero;
    use crate::graph::{ Generator, ZXWireType };
    use QuantumType::*;

    fn chain() -> anyhow::Result<ZXDiagram> {
        // Input - Z(1/4) - Z(1/4) - Z(1/4) - Output
        let mut dg = ZXDiagram::with_boundary(1, 1, 0, 0);
        let (i, o) = (dg.boundary[0], dg.boundary[1]);
        let mut prev = i;
        for _ in 0..3 {
            let z = dg.add_vertex(Generator::z_spider(Expr::ratio(1, 4), Quantum));
            dg.add_wire(prev, z, ZXWireType::Basic, Quantum)?;
            prev = z;
        }
        dg.add_wire(prev, o, ZXWireType::Basic, Quantum)?;
        Ok(dg)
    }

    #[test]
    fn sequence_is_or() -> anyhow::Result<()> {
        let mut dg = chain()?;
        let rw = Rewrite::sequence([Rewrite::red_to_green(), Rewrite::spider_fusion()]);
        assert!(rw.apply(&mut dg));
        assert!(!Rewrite::sequence([Rewrite::red_to_green()]).apply(&mut dg));
        assert!(!Rewrite::Sequence(Vec::new()).apply(&mut dg));
        Ok(())
    }

    #[test]
    fn repeat_reaches_fixpoint() -> anyhow::Result<()> {
        let mut dg = chain()?;
        assert!(dg.simplify(&Rewrite::repeat(Rewrite::spider_fusion())));
        assert_eq!(dg.count_vertices(ZXType::ZSpider), 1);
        assert!(!dg.simplify(&Rewrite::spider_fusion()));
        assert!(!dg.simplify(&Rewrite::repeat(Rewrite::spider_fusion())));
        Ok(())
    }

    #[test]
    fn repeat_while_runs_body() -> anyhow::Result<()> {
        let mut dg = chain()?;
        let x = dg.add_vertex(Generator::x_spider(Expr::zero(), Quantum));
        let z = dg.add_vertex(Generator::z_spider(Expr::zero(), Quantum));
        dg.add_wire(x, z, ZXWireType::Basic, Quantum)?;
        let rw =
            Rewrite::repeat_while(
                Rewrite::red_to_green(),
                Rewrite::repeat(Rewrite::spider_fusion()),
            );
        assert!(dg.simplify(&rw));
        assert_eq!(dg.count_vertices(ZXType::XSpider), 0);
        assert_eq!(dg.count_vertices(ZXType::ZSpider), 3);
        assert!(!dg.simplify(&rw));
        Ok(())
    }

    #[test]
    fn metric_rejects_growth() -> anyhow::Result<()> {
        let mut dg = chain()?;
        let n = dg.n_vertices();
        // io_extension never fires here, and basic_wires has no Hadamard
        // wires to work on
        let grow = Rewrite::sequence([Rewrite::io_extension(), Rewrite::basic_wires()]);
        assert!(!dg.simplify(&Rewrite::repeat_with_metric(grow, |d| d.n_vertices())));
        assert_eq!(dg.n_vertices(), n);

        // removing a self-loop changes the diagram but not the vertex count,
        // so it is rejected
        let z = dg.boundary.iter()
            .find_map(|b| dg.neighbours(*b).ok().and_then(|ns| ns.first().copied()))
            .unwrap();
        dg.add_wire(z, z, ZXWireType::H, Quantum)?;
        let relabel = Rewrite::self_loop_removal();
        assert!(!dg.simplify(&Rewrite::repeat_with_metric(relabel, |d| d.n_vertices())));
        assert_eq!(dg.n_wires(), 5);

        let shrink = Rewrite::spider_fusion();
        assert!(dg.simplify(&Rewrite::repeat_with_metric(shrink, |d| d.n_vertices())));
        assert_eq!(dg.count_vertices(ZXType::ZSpider), 1);
        Ok(())
    }

    #[test]
    fn pipeline_to_graphlike() -> anyhow::Result<()> {
        let mut dg = chain()?;
        assert!(dg.simplify(&Rewrite::to_graphlike_form()));
        assert!(dg.is_graphlike());
        assert!(dg.check_validity().is_ok());
        // the fused spider plus an identity chain separating the output
        assert_eq!(dg.count_vertices(ZXType::ZSpider), 3);
        assert!(
            dg.vertices()
                .any(|(_, g)| g.param() == Some(&Expr::ratio(3, 4)))
        );
        assert!(!dg.simplify(&Rewrite::to_graphlike_form()));
        Ok(())
    }
}
