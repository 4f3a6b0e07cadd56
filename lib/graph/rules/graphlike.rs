//! Boundary normalizations completing the graph-like form.
//!
//! Both rules insert phase-0 Z-spiders (identities) and track the scalar
//! exactly.

use num_traits::Zero;
use rustc_hash::FxHashSet;
use tracing::trace;
use crate::{
    expr::Expr,
    graph::{
        Generator,
        VertId,
        WireId,
        WireProperties,
        ZXDiagram,
        ZXResult,
        ZXWireType,
    },
};
use super::LOG_TARGET;

// the wire on a boundary vertex and the vertex at its other end
fn boundary_wire(dg: &ZXDiagram, b: VertId) -> ZXResult<Option<(WireId, VertId)>> {
    let Some(w) = dg.adj_wires(b)?.first().copied() else { return Ok(None); };
    let u = dg.other_end(w, b)?;
    Ok(Some((w, u)))
}

// replace the boundary wire `bw` from `b` to `u` by a path through `chain`,
// a list of wire types, joined by new identity spiders; the last type is
// composed with that of `bw`
fn insert_chain(
    dg: &mut ZXDiagram,
    b: VertId,
    bw: WireId,
    u: VertId,
    chain: &[ZXWireType],
) -> ZXResult<()>
{
    let props = dg.wire_props(bw)?.clone();
    let u_port = props.port(dg.end_of(bw, u)?);
    dg.remove_wire(bw)?;
    let mut prev = b;
    let mut prev_type = ZXWireType::Basic;
    for wt in chain.iter().copied() {
        let z = dg.add_vertex(Generator::z_spider(Expr::zero(), props.qtype));
        dg.add_wire(prev, z, prev_type, props.qtype)?;
        prev = z;
        prev_type = wt;
    }
    dg.add_wire_props(
        prev,
        u,
        WireProperties::with_ports(
            prev_type.then(props.wire_type), props.qtype, None, u_port),
    )?;
    Ok(())
}

pub(crate) fn io_extension(dg: &mut ZXDiagram) -> ZXResult<bool> {
    let mut success = false;
    for b in dg.boundary(None, None).into_iter() {
        let Some((bw, u)) = boundary_wire(dg, b)? else { continue; };
        let is_h = dg.wire_props(bw)?.wire_type == ZXWireType::H;
        if !is_h && !dg.zxtype(u)?.is_boundary() { continue; }
        insert_chain(dg, b, bw, u, &[ZXWireType::Basic])?;
        trace!(target: LOG_TARGET, %b, "extend boundary");
        success = true;
    }
    Ok(success)
}

pub(crate) fn separate_boundaries(dg: &mut ZXDiagram) -> ZXResult<bool> {
    let mut success = false;
    let mut claimed: FxHashSet<VertId> = FxHashSet::default();
    for b in dg.boundary(None, None).into_iter() {
        let Some((bw, u)) = boundary_wire(dg, b)? else { continue; };
        if dg.zxtype(u)?.is_boundary() { continue; }
        if claimed.insert(u) { continue; }
        insert_chain(dg, b, bw, u, &[ZXWireType::H, ZXWireType::H])?;
        trace!(target: LOG_TARGET, %b, %u, "separate boundary");
        success = true;
    }
    Ok(success)
}
