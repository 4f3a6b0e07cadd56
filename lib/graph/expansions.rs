//! Whole-diagram expansions into the classical (doubled) picture.

use std::sync::Arc;
use num_traits::Zero;
use rustc_hash::FxHashMap;
use crate::{
    expr::Expr,
    graph::{
        Generator,
        QuantumType,
        VertId,
        WireProperties,
        ZXDiagram,
        ZXResult,
        ZXType,
        ZXWireType,
    },
};
use QuantumType::*;

// where the copies of an original vertex live in the doubled diagram
#[derive(Copy, Clone, Debug)]
enum Copies {
    // classical vertices, copied once
    Single(VertId),
    // quantum vertices, split into an original and a conjugate
    Pair(VertId, VertId),
    // boxes, whose quantum ports are split into adjacent classical ports
    Box(VertId),
}

// the conjugate half of a quantum generator's doubling
fn conjugate_gen(gen: &Generator) -> Generator {
    let classical = gen.with_qtype(Classical);
    match gen.ty() {
        ZXType::ZSpider | ZXType::XSpider | ZXType::XY | ZXType::YZ => {
            gen.param()
                .and_then(|p| classical.with_param(-p))
                .unwrap_or(classical)
        },
        ZXType::Hbox => {
            gen.param()
                .and_then(|p| classical.with_param(p.conj()))
                .unwrap_or(classical)
        },
        ZXType::PY => {
            gen.clifford_param()
                .map(|b| Generator::clifford(ZXType::PY, !b, Classical))
                .unwrap_or(classical)
        },
        _ => classical,
    }
}

// doubled port index of `port` on a box with signature `sig`
fn box_port(sig: &[QuantumType], port: usize) -> usize {
    sig.iter().take(port)
        .map(|q| if *q == Quantum { 2 } else { 1 })
        .sum()
}

impl ZXDiagram {
    /// Return the CPM doubling of `self`, a diagram containing only
    /// `Classical` generators and wires.
    ///
    /// Each `Quantum` vertex is split into an original and a conjugate copy,
    /// the latter with negated phase (conjugated parameter for H-boxes,
    /// flipped parameter for `PY`). Each `Quantum` wire becomes two
    /// `Classical` wires, one between originals and one between conjugates
    /// (or both to the same vertex if an end is already `Classical`). Box
    /// generators are doubled recursively, with quantum port *p* becoming two
    /// adjacent classical ports. The boundary lists each original boundary
    /// followed by its conjugate, if any. The scalar is carried over
    /// unchanged, since it is already expressed in doubled form.
    pub fn to_doubled_diagram(&self) -> ZXResult<ZXDiagram> {
        let mut doubled = ZXDiagram::new();
        let mut copies: FxHashMap<VertId, Copies> = FxHashMap::default();
        let mut sigs: FxHashMap<VertId, Vec<QuantumType>> = FxHashMap::default();

        for (v, gen) in self.vertices() {
            let c =
                if let Some(inner) = gen.diagram() {
                    sigs.insert(v, inner.boundary_qtypes());
                    let inner2 = inner.to_doubled_diagram()?;
                    Copies::Box(doubled.add_vertex_unlisted(
                        Generator::from_shared_box(Arc::new(inner2))))
                } else if gen.qtype() == Some(Quantum) {
                    let orig =
                        doubled.add_vertex_unlisted(gen.with_qtype(Classical));
                    let conj = doubled.add_vertex_unlisted(conjugate_gen(gen));
                    Copies::Pair(orig, conj)
                } else {
                    Copies::Single(doubled.add_vertex_unlisted(gen.clone()))
                };
            copies.insert(v, c);
        }

        // original and conjugate attachment points of a wire end
        let ends = |v: VertId, port: Option<usize>| {
            match copies.get(&v) {
                Some(Copies::Single(u)) => Some(((*u, port), (*u, port))),
                Some(Copies::Pair(u, u_c)) => Some(((*u, port), (*u_c, port))),
                Some(Copies::Box(u)) => {
                    let p = port.map(|p| box_port(&sigs[&v], p));
                    Some(((*u, p), (*u, p.map(|p| p + 1))))
                },
                None => None,
            }
        };
        for (_, s, t, props) in self.wires() {
            let (Some((s_orig, s_conj)), Some((t_orig, t_conj))) =
                (ends(s, props.source_port), ends(t, props.target_port))
                else { continue; };
            doubled.add_wire_props(
                s_orig.0,
                t_orig.0,
                WireProperties::with_ports(
                    props.wire_type, Classical, s_orig.1, t_orig.1),
            )?;
            if props.qtype == Quantum {
                doubled.add_wire_props(
                    s_conj.0,
                    t_conj.0,
                    WireProperties::with_ports(
                        props.wire_type, Classical, s_conj.1, t_conj.1),
                )?;
            }
        }

        let mut boundary: Vec<VertId> = Vec::new();
        for b in self.boundary.iter() {
            match copies.get(b) {
                Some(Copies::Pair(orig, conj)) => {
                    boundary.push(*orig);
                    boundary.push(*conj);
                },
                Some(Copies::Single(orig)) => { boundary.push(*orig); },
                _ => { },
            }
        }
        doubled.set_boundary(boundary);
        doubled.scalar = self.scalar.clone();
        Ok(doubled)
    }

    /// Return a copy of `self` in which every `Classical` boundary is promoted
    /// to `Quantum`.
    ///
    /// Each classical boundary vertex becomes a `Classical` Z-spider of phase
    /// 0, attached by a `Quantum` Basic wire to a new `Quantum` boundary that
    /// takes its place in the boundary order.
    pub fn to_quantum_embedding(&self) -> ZXResult<ZXDiagram> {
        let mut embedding = self.clone();
        let mut boundary: Vec<VertId> = Vec::with_capacity(self.boundary.len());
        for b in self.boundary.iter().copied() {
            let gen = embedding.generator(b)?;
            if gen.qtype() == Some(Classical) {
                let new_b = embedding.add_vertex_unlisted(gen.with_qtype(Quantum));
                embedding.set_generator(
                    b, Generator::z_spider(Expr::zero(), Classical))?;
                embedding.add_wire(new_b, b, ZXWireType::Basic, Quantum)?;
                boundary.push(new_b);
            } else {
                boundary.push(b);
            }
        }
        embedding.set_boundary(boundary);
        Ok(embedding)
    }
}
