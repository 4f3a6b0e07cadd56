//! Graph-theoretic simplification of graph-like diagrams: local
//! complementation, pivoting, and phase-gadget manipulation.
//!
//! All rules here require a graph-like diagram and do nothing otherwise. They
//! preserve the denoted map up to a non-zero scalar, which is not tracked.

use std::collections::VecDeque;
use itertools::Itertools;
use num_traits::{ One, Zero };
use rustc_hash::{ FxHashMap, FxHashSet };
use tracing::trace;
use crate::{
    expr::Expr,
    graph::{
        Generator,
        QuantumType,
        VertId,
        ZXDiagram,
        ZXResult,
        ZXType,
        ZXWireType,
    },
};
use super::{ LOG_TARGET, add_phase, qtype_of };
use QuantumType::*;

// insertion-ordered work list without duplicates
struct Candidates {
    queue: VecDeque<VertId>,
    queued: FxHashSet<VertId>,
}

impl Candidates {
    fn all(dg: &ZXDiagram) -> Self {
        let queue: VecDeque<VertId> = dg.vertices().map(|(v, _)| v).collect();
        let queued: FxHashSet<VertId> = queue.iter().copied().collect();
        Self { queue, queued }
    }

    fn push(&mut self, v: VertId) {
        if self.queued.insert(v) { self.queue.push_back(v); }
    }

    fn pop(&mut self) -> Option<VertId> {
        let v = self.queue.pop_front()?;
        self.queued.remove(&v);
        Some(v)
    }
}

// `true` if every neighbour of `v` is a Z-spider other than `v` itself, and
// `Classical` if `v` is
fn can_complement(dg: &ZXDiagram, v: VertId) -> ZXResult<bool> {
    let vq = dg.qtype(v)?;
    for n in dg.neighbours(v)?.into_iter() {
        let g = dg.generator(n)?;
        if n == v
            || g.ty() != ZXType::ZSpider
            || (vq == Some(Classical) && g.qtype() == Some(Quantum))
        {
            return Ok(false);
        }
    }
    Ok(true)
}

// toggle the Hadamard wire between `a` and `b`, unless that would put a
// doubled wire between two classical spiders
fn complement(dg: &mut ZXDiagram, a: VertId, b: VertId, qtype: QuantumType)
    -> ZXResult<()>
{
    if qtype == Quantum
        && qtype_of(dg, a)? == Classical
        && qtype_of(dg, b)? == Classical
    {
        return Ok(());
    }
    match dg.wire_between(a, b)? {
        Some(w) => { dg.remove_wire(w)?; },
        None => { dg.add_wire(a, b, ZXWireType::H, qtype)?; },
    }
    Ok(())
}

fn complement_sets(
    dg: &mut ZXDiagram,
    sa: &[VertId],
    sb: &[VertId],
    qtype: QuantumType,
) -> ZXResult<()>
{
    for (a, b) in sa.iter().copied().cartesian_product(sb.iter().copied()) {
        complement(dg, a, b, qtype)?;
    }
    Ok(())
}

fn phase_of(dg: &ZXDiagram, v: VertId) -> ZXResult<Expr> {
    Ok(dg.generator(v)?.param().cloned().unwrap_or_else(Expr::zero))
}

pub(crate) fn remove_interior_cliffords(dg: &mut ZXDiagram) -> ZXResult<bool> {
    if !dg.is_graphlike() { return Ok(false); }
    let mut success = false;
    let mut candidates = Candidates::all(dg);
    while let Some(v) = candidates.pop() {
        if !dg.is_proper_clifford_spider(v) || !can_complement(dg, v)? {
            continue;
        }
        let vq = qtype_of(dg, v)?;
        let neg_phase = -phase_of(dg, v)?;
        let ns = dg.neighbours(v)?;
        for (a, b) in ns.iter().copied().tuple_combinations() {
            complement(dg, a, b, vq)?;
        }
        for n in ns.into_iter() {
            // a classical neighbour picks up both +α and -α
            if vq == Quantum && qtype_of(dg, n)? == Classical { continue; }
            add_phase(dg, n, &neg_phase)?;
            candidates.push(n);
        }
        dg.remove_vertex(v)?;
        trace!(target: LOG_TARGET, %v, "local complementation");
        success = true;
    }
    Ok(success)
}

// pivot about the wire between interior Pauli spiders `v` and `u`, removing
// both
fn pivot(dg: &mut ZXDiagram, v: VertId, u: VertId) -> ZXResult<()> {
    let vq = qtype_of(dg, v)?;
    let v_ns = dg.neighbours(v)?;
    let u_ns = dg.neighbours(u)?;
    let v_set: FxHashSet<VertId> =
        v_ns.iter().copied().filter(|n| *n != u).collect();
    let joint: Vec<VertId> =
        u_ns.iter().copied().filter(|n| v_set.contains(n)).collect();
    let excl_u: Vec<VertId> =
        u_ns.iter().copied()
        .filter(|n| *n != v && !v_set.contains(n))
        .collect();
    let excl_v: Vec<VertId> =
        v_ns.iter().copied()
        .filter(|n| *n != u && !joint.contains(n))
        .collect();

    let pv = phase_of(dg, v)?;
    let pu = phase_of(dg, u)?;
    let p_joint = &pv + &pu + Expr::one();
    for n in joint.iter() { add_phase(dg, *n, &p_joint)?; }
    for n in excl_u.iter() { add_phase(dg, *n, &pv)?; }
    for n in excl_v.iter() { add_phase(dg, *n, &pu)?; }

    complement_sets(dg, &joint, &excl_u, vq)?;
    complement_sets(dg, &joint, &excl_v, vq)?;
    complement_sets(dg, &excl_u, &excl_v, vq)?;
    dg.remove_vertex(u)?;
    dg.remove_vertex(v)?;
    trace!(target: LOG_TARGET, %v, %u, "pivot");
    Ok(())
}

pub(crate) fn remove_interior_paulis(dg: &mut ZXDiagram) -> ZXResult<bool> {
    if !dg.is_graphlike() { return Ok(false); }
    let mut success = false;
    let mut candidates = Candidates::all(dg);
    while let Some(v) = candidates.pop() {
        if !dg.is_pauli_spider(v) || !can_complement(dg, v)? { continue; }
        let mut partner: Option<VertId> = None;
        for n in dg.neighbours(v)?.into_iter() {
            if dg.is_pauli_spider(n) && can_complement(dg, n)? {
                partner = Some(n);
                break;
            }
        }
        let Some(u) = partner else { continue; };
        pivot(dg, v, u)?;
        success = true;
    }
    Ok(success)
}

pub(crate) fn extend_at_boundary_paulis(dg: &mut ZXDiagram) -> ZXResult<bool> {
    if !dg.is_graphlike() { return Ok(false); }
    let mut success = false;
    for b in dg.boundary(None, None).into_iter() {
        let Some(bw) = dg.adj_wires(b)?.first().copied() else { continue; };
        let u = dg.other_end(bw, b)?;
        if !dg.is_pauli_spider(u) { continue; }
        let mut has_interior_pauli = false;
        for w in dg.neighbours(u)?.into_iter() {
            if !dg.is_pauli_spider(w) { continue; }
            let mut interior = true;
            for wn in dg.neighbours(w)?.into_iter() {
                if dg.zxtype(wn)?.is_boundary() {
                    interior = false;
                    break;
                }
            }
            if interior {
                has_interior_pauli = true;
                break;
            }
        }
        if !has_interior_pauli { continue; }

        // move the boundary two identities away from `u`
        let u_gen = dg.generator(u)?.clone();
        let q = u_gen.qtype().unwrap_or(Quantum);
        let bq = dg.wire_props(bw)?.qtype;
        let z1 = dg.add_vertex(Generator::z_spider(Expr::zero(), q));
        let z2 = dg.add_vertex(u_gen);
        dg.add_wire(u, z1, ZXWireType::H, q)?;
        dg.add_wire(z1, z2, ZXWireType::H, q)?;
        dg.add_wire(z2, b, ZXWireType::Basic, bq)?;
        dg.remove_wire(bw)?;
        dg.set_generator(u, Generator::z_spider(Expr::zero(), q))?;
        trace!(target: LOG_TARGET, %b, %u, "extend boundary Pauli");
        success = true;
    }
    Ok(success)
}

// the leaf of a phase gadget whose axis is `v`
fn gadget_leaf(dg: &ZXDiagram, v: VertId) -> Option<VertId> {
    if dg.zxtype(v).ok()? != ZXType::ZSpider || !dg.is_pauli_spider(v) {
        return None;
    }
    let ns = dg.neighbours(v).ok()?;
    if ns.len() < 2 { return None; }
    let leaves: Vec<VertId> =
        ns.into_iter()
        .filter(|n| {
            *n != v
                && dg.zxtype(*n).is_ok_and(|ty| ty == ZXType::ZSpider)
                && dg.degree(*n).is_ok_and(|d| d == 1)
        })
        .collect();
    (leaves.len() == 1).then(|| leaves[0])
}

/// Return `true` if `v` is the axis of a phase gadget: a Pauli Z-spider of
/// degree at least 2 with exactly one neighbour that is a degree-1 Z-spider.
pub(crate) fn is_gadget_axis(dg: &ZXDiagram, v: VertId) -> bool {
    gadget_leaf(dg, v).is_some()
}

pub(crate) fn gadgetise_interior_paulis(dg: &mut ZXDiagram) -> ZXResult<bool> {
    if !dg.is_graphlike() { return Ok(false); }
    let mut success = false;
    let verts: Vec<VertId> = dg.vertices().map(|(v, _)| v).collect();
    for v in verts.into_iter() {
        if !dg.is_pauli_spider(v)
            || is_gadget_axis(dg, v)
            || !can_complement(dg, v)?
        {
            continue;
        }
        let mut partner: Option<VertId> = None;
        for n in dg.neighbours(v)?.into_iter() {
            if !dg.is_pauli_spider(n)
                && dg.degree(n)? > 1
                && can_complement(dg, n)?
            {
                partner = Some(n);
                break;
            }
        }
        let Some(u) = partner else { continue; };

        // unfuse the phase of `u` onto a new gadget, leaving `u` Pauli
        let uq = qtype_of(dg, u)?;
        let pu = phase_of(dg, u)?;
        let axis = dg.add_vertex(Generator::z_spider(Expr::zero(), uq));
        let leaf = dg.add_vertex(Generator::z_spider(pu, uq));
        dg.add_wire(u, axis, ZXWireType::H, uq)?;
        dg.add_wire(axis, leaf, ZXWireType::H, uq)?;
        dg.set_generator(u, Generator::z_spider(Expr::zero(), uq))?;
        trace!(target: LOG_TARGET, %u, %axis, %leaf, "gadgetise");
        pivot(dg, v, u)?;
        success = true;
    }
    Ok(success)
}

// gadget phase as seen through the axis
fn effective_phase(dg: &ZXDiagram, axis: VertId, leaf: VertId)
    -> ZXResult<Expr>
{
    let ph = phase_of(dg, leaf)?;
    if phase_of(dg, axis)?.clifford_multiple() == Some(2) {
        Ok(-ph)
    } else {
        Ok(ph)
    }
}

type GadgetKey = (Vec<VertId>, Option<QuantumType>, Option<QuantumType>);

pub(crate) fn merge_gadgets(dg: &mut ZXDiagram) -> ZXResult<bool> {
    if !dg.is_graphlike() { return Ok(false); }
    let mut success = false;
    let mut gadgets: FxHashMap<GadgetKey, (VertId, VertId)> =
        FxHashMap::default();
    let verts: Vec<VertId> = dg.vertices().map(|(v, _)| v).collect();
    for a in verts.into_iter() {
        let Some(leaf) = gadget_leaf(dg, a) else { continue; };
        let targets: Vec<VertId> =
            dg.neighbours(a)?.into_iter()
            .filter(|n| *n != leaf)
            .sorted()
            .collect();
        let key: GadgetKey = (targets, dg.qtype(a)?, dg.qtype(leaf)?);
        let Some((a0, leaf0)) = gadgets.get(&key).copied() else {
            gadgets.insert(key, (a, leaf));
            continue;
        };
        let phase =
            (effective_phase(dg, a0, leaf0)? + effective_phase(dg, a, leaf)?)
            .reduce_phase();
        let aq = qtype_of(dg, a0)?;
        let lq = qtype_of(dg, leaf0)?;
        dg.set_generator(a0, Generator::z_spider(Expr::zero(), aq))?;
        dg.set_generator(leaf0, Generator::z_spider(phase, lq))?;
        dg.remove_vertex(leaf)?;
        dg.remove_vertex(a)?;
        trace!(target: LOG_TARGET, %a0, %a, "merge gadgets");
        success = true;
    }
    Ok(success)
}
