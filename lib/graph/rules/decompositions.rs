//! Rewrites that trade one generator family for another: box expansion,
//! Hadamard wires to H-boxes, and rebasing between the ZX and MBQC
//! generators.

use num_traits::{ One, Zero };
use tracing::trace;
use crate::{
    expr::Expr,
    graph::{
        Generator,
        QuantumType,
        Subdiagram,
        VertId,
        WireId,
        WireProperties,
        ZXDiagram,
        ZXResult,
        ZXType,
        ZXWireType,
    },
};
use super::LOG_TARGET;
use QuantumType::*;

pub(crate) fn decompose_boxes(dg: &mut ZXDiagram) -> ZXResult<bool> {
    let mut success = false;
    loop {
        let boxes: Vec<VertId> =
            dg.vertices()
            .filter(|(_, g)| g.ty() == ZXType::ZXBox)
            .map(|(v, _)| v)
            .collect();
        if boxes.is_empty() { break; }
        for v in boxes.into_iter() {
            let Some(inner) = dg.generator(v)?.diagram().cloned()
                else { continue; };
            let cut =
                (0..inner.boundary_len())
                .map(|p| dg.end_at_port(v, Some(p)))
                .collect::<ZXResult<Vec<_>>>()?;
            let sub = Subdiagram::new(cut, [v]);
            dg.substitute(&inner, &sub)?;
            trace!(target: LOG_TARGET, %v, "expand box");
            success = true;
        }
    }
    Ok(success)
}

// scalar gained by splitting off a factor of √2 on a wire of a given type
fn sqrt2_for(qtype: QuantumType) -> Expr {
    match qtype {
        Classical => Expr::sqrt2(),
        Quantum => Expr::from(2),
    }
}

fn inv_sqrt2_for(qtype: QuantumType) -> Expr {
    match qtype {
        Classical => Expr::inv_sqrt2(),
        Quantum => Expr::ratio(1, 2),
    }
}

pub(crate) fn basic_wires(dg: &mut ZXDiagram) -> ZXResult<bool> {
    let h_wires: Vec<(WireId, VertId, VertId, WireProperties)> =
        dg.wires()
        .filter(|(_, _, _, props)| props.wire_type == ZXWireType::H)
        .map(|(w, s, t, props)| (w, s, t, props.clone()))
        .collect();
    if h_wires.is_empty() { return Ok(false); }
    for (w, s, t, props) in h_wires.into_iter() {
        dg.remove_wire(w)?;
        let h = dg.add_vertex(Generator::hbox(-Expr::one(), props.qtype));
        dg.add_wire_props(
            s,
            h,
            WireProperties::with_ports(
                ZXWireType::Basic, props.qtype, props.source_port, None),
        )?;
        dg.add_wire_props(
            h,
            t,
            WireProperties::with_ports(
                ZXWireType::Basic, props.qtype, None, props.target_port),
        )?;
        dg.multiply_scalar(&inv_sqrt2_for(props.qtype));
    }
    Ok(true)
}

// replace an MBQC vertex with a Z-spider, attaching an X-spider leaf if the
// measurement has a component out of the XY plane
fn rebase_mbqc_vertex(dg: &mut ZXDiagram, v: VertId) -> ZXResult<()> {
    let gen = dg.generator(v)?;
    let q = gen.qtype().unwrap_or(Quantum);
    let half = Expr::ratio(1, 2);
    let pauli = |b: bool| if b { Expr::one() } else { Expr::zero() };
    let (z_phase, leaf): (Expr, Option<Expr>) =
        match (gen.ty(), gen.param(), gen.clifford_param()) {
            (ZXType::XY, Some(a), _) => ((-a).reduce_phase(), None),
            (ZXType::XZ, Some(a), _) => (half, Some(a.clone())),
            (ZXType::YZ, Some(a), _) => (Expr::zero(), Some(a.clone())),
            (ZXType::PX, _, Some(b)) => (pauli(b), None),
            (ZXType::PY, _, Some(b)) => {
                (if b { half } else { Expr::ratio(3, 2) }, None)
            },
            (ZXType::PZ, _, Some(b)) => (Expr::zero(), Some(pauli(b))),
            _ => { return Ok(()); },
        };
    dg.set_generator(v, Generator::z_spider(z_phase, q))?;
    if let Some(a) = leaf {
        let x = dg.add_vertex(Generator::x_spider(a, q));
        dg.add_wire(v, x, ZXWireType::Basic, q)?;
    }
    Ok(())
}

// try to rebase an H-box; returns `false` if it is left in place
fn rebase_hbox(dg: &mut ZXDiagram, v: VertId) -> ZXResult<bool> {
    let gen = dg.generator(v)?;
    let (Some(a), Some(q)) = (gen.param().cloned(), gen.qtype())
        else { return Ok(false); };
    let ends = dg.ends_at(v)?;
    match ends.len() {
        0 => {
            let factor = if q == Classical { a.clone() } else { &a * a.conj() };
            dg.remove_vertex(v)?;
            dg.multiply_scalar(&factor);
            Ok(true)
        },
        2 if a == -Expr::one() => {
            let (w1, e1) = ends[0];
            let (w2, e2) = ends[1];
            if w1 == w2 {
                // the trace of a Hadamard vanishes
                dg.remove_vertex(v)?;
                dg.multiply_scalar(&Expr::zero());
                return Ok(true);
            }
            let p1 = dg.wire_props(w1)?.clone();
            let p2 = dg.wire_props(w2)?.clone();
            if p1.qtype != q || p2.qtype != q { return Ok(false); }
            let n1 = dg.vertex_at_end(w1, e1.flip())?;
            let n2 = dg.vertex_at_end(w2, e2.flip())?;
            let props =
                WireProperties::with_ports(
                    ZXWireType::H.then(p1.wire_type).then(p2.wire_type),
                    q,
                    p1.port(e1.flip()),
                    p2.port(e2.flip()),
                );
            dg.remove_vertex(v)?;
            dg.add_wire_props(n1, n2, props)?;
            dg.multiply_scalar(&sqrt2_for(q));
            Ok(true)
        },
        _ => Ok(false),
    }
}

pub(crate) fn rebase_to_zx(dg: &mut ZXDiagram) -> ZXResult<bool> {
    let mut success = false;
    let verts: Vec<(VertId, ZXType)> =
        dg.vertices().map(|(v, g)| (v, g.ty())).collect();
    for (v, ty) in verts.into_iter() {
        if ty.is_mbqc() {
            rebase_mbqc_vertex(dg, v)?;
            trace!(target: LOG_TARGET, %v, ?ty, "rebase to ZX");
            success = true;
        } else if ty == ZXType::Hbox && rebase_hbox(dg, v)? {
            trace!(target: LOG_TARGET, %v, "rebase H-box");
            success = true;
        }
    }
    Ok(success)
}

pub(crate) fn rebase_to_mbqc(dg: &mut ZXDiagram) -> ZXResult<bool> {
    if !dg.is_graphlike() { return Ok(false); }
    let zs: Vec<VertId> =
        dg.vertices()
        .filter(|(_, g)| {
            g.ty() == ZXType::ZSpider && g.qtype() == Some(Quantum)
        })
        .map(|(v, _)| v)
        .collect();
    if zs.is_empty() { return Ok(false); }
    for v in zs.into_iter() {
        let Some(alpha) = dg.generator(v)?.param().cloned() else { continue; };
        let new =
            match alpha.clifford_multiple() {
                Some(0) => Generator::clifford(ZXType::PX, false, Quantum),
                Some(2) => Generator::clifford(ZXType::PX, true, Quantum),
                Some(1) => Generator::clifford(ZXType::PY, true, Quantum),
                Some(3) => Generator::clifford(ZXType::PY, false, Quantum),
                _ => Generator::phased(ZXType::XY, (-alpha).reduce_phase(), Quantum),
            };
        dg.set_generator(v, new)?;
    }
    Ok(true)
}
