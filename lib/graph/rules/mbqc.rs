//! Normalization of MBQC diagrams prior to flow identification.

use num_traits::{ One, Zero };
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
use super::LOG_TARGET;
use QuantumType::*;

fn px_false() -> Generator { Generator::clifford(ZXType::PX, false, Quantum) }

pub(crate) fn extend_for_px_outputs(dg: &mut ZXDiagram) -> ZXResult<bool> {
    if !dg.is_mbqc() { return Ok(false); }
    let mut success = false;
    for o in dg.boundary(Some(ZXType::Output), None).into_iter() {
        let Some(ow) = dg.adj_wires(o)?.first().copied() else { continue; };
        let u = dg.other_end(ow, o)?;
        let ugen = dg.generator(u)?;
        if ugen.ty().is_boundary() || *ugen == px_false() { continue; }
        let p1 = dg.add_vertex(px_false());
        let p2 = dg.add_vertex(px_false());
        dg.add_wire(u, p1, ZXWireType::H, Quantum)?;
        dg.add_wire(p1, p2, ZXWireType::H, Quantum)?;
        dg.add_wire(p2, o, ZXWireType::Basic, Quantum)?;
        dg.remove_wire(ow)?;
        trace!(target: LOG_TARGET, %o, %u, "extend output");
        success = true;
    }
    Ok(success)
}

fn pauli_angle(b: bool) -> Expr { if b { Expr::one() } else { Expr::zero() } }

// ±π/2, the angle of a PY measurement
fn y_angle(b: bool) -> Expr {
    if b { Expr::ratio(1, 2) } else { Expr::ratio(-1, 2) }
}

fn plane(ty: ZXType, angle: Expr) -> Generator {
    Generator::phased(ty, angle.reduce_phase(), Quantum)
}

// measurement of an axis after absorbing a degree-1 leaf, if the pair can be
// internalised
fn absorb(axis: &Generator, leaf: &Generator) -> Option<Generator> {
    use ZXType::*;
    let half = Expr::ratio(1, 2);
    match axis.ty() {
        XY => {
            let a = axis.param()?;
            match (leaf.ty(), leaf.param(), leaf.clifford_param()) {
                (YZ, Some(b), _) => Some(plane(XY, a - b)),
                (PZ, _, Some(c)) => Some(plane(XY, a - pauli_angle(c))),
                (PX, _, Some(c)) => Some(Generator::clifford(PZ, c, Quantum)),
                (PY, _, Some(c)) => Some(plane(XY, a + y_angle(c))),
                _ => None,
            }
        },
        PX => {
            let b = axis.clifford_param()?;
            match (leaf.ty(), leaf.param(), leaf.clifford_param()) {
                (XY, Some(beta), _) => {
                    Some(plane(YZ, if b { beta.clone() } else { -beta }))
                },
                (PX, _, Some(c)) => Some(Generator::clifford(PZ, c, Quantum)),
                (PY, _, Some(c)) => {
                    Some(plane(YZ, if b { -y_angle(c) } else { y_angle(c) }))
                },
                (YZ, Some(beta), _) => {
                    Some(plane(XY, -(pauli_angle(b) + beta)))
                },
                (PZ, _, Some(c)) => Some(Generator::clifford(PX, b ^ c, Quantum)),
                (XZ, Some(beta), _) => {
                    Some(plane(XZ, if b { beta - half } else { half - beta }))
                },
                _ => None,
            }
        },
        PY => {
            let b = axis.clifford_param()?;
            let p = y_angle(b);
            let signed = |x: Expr| if b { -x } else { x };
            match (leaf.ty(), leaf.param(), leaf.clifford_param()) {
                (XY, Some(beta), _) => Some(plane(XZ, signed(beta.clone()))),
                (PX, _, Some(c)) => Some(plane(XZ, -signed(pauli_angle(c)))),
                (PY, _, Some(c)) => Some(plane(XZ, -signed(y_angle(c)))),
                (YZ, Some(beta), _) => Some(plane(XY, -(p + beta))),
                (PZ, _, Some(c)) => Some(Generator::clifford(PY, b ^ c, Quantum)),
                (XZ, Some(beta), _) => {
                    Some(plane(YZ, if b { beta - half } else { half - beta }))
                },
                _ => None,
            }
        },
        _ => None,
    }
}

pub(crate) fn internalise_gadgets(dg: &mut ZXDiagram) -> ZXResult<bool> {
    if !dg.is_mbqc() { return Ok(false); }
    let mut success = false;
    let verts: Vec<VertId> = dg.vertices().map(|(v, _)| v).collect();
    for leaf in verts.into_iter() {
        let Ok(leaf_gen) = dg.generator(leaf) else { continue; };
        if !leaf_gen.ty().is_mbqc() || dg.degree(leaf)? != 1 { continue; }
        let Some(axis) = dg.neighbours(leaf)?.first().copied() else { continue; };
        let axis_gen = dg.generator(axis)?;
        if !axis_gen.ty().is_mbqc() { continue; }
        // outputs must stay on their PX(false) neighbours
        let mut at_boundary = false;
        for n in dg.neighbours(axis)?.into_iter() {
            if dg.zxtype(n)?.is_boundary() {
                at_boundary = true;
                break;
            }
        }
        if at_boundary { continue; }
        let Some(new) = absorb(axis_gen, leaf_gen) else { continue; };
        dg.remove_vertex(leaf)?;
        dg.set_generator(axis, new)?;
        trace!(target: LOG_TARGET, %axis, %leaf, "internalise gadget");
        success = true;
    }
    Ok(success)
}

#[cfg(test)]
mod test {
    use super::*;
    use ZXWireType::*;

    #[test]
    fn px_outputs() -> anyhow::Result<()> {
        let mut dg = ZXDiagram::with_boundary(1, 2, 0, 0);
        let b = dg.boundary.clone();
        let a = dg.add_vertex(plane(ZXType::XY, Expr::ratio(1, 4)));
        let c = dg.add_vertex(px_false());
        let d = dg.add_vertex(plane(ZXType::XY, Expr::ratio(1, 2)));
        dg.add_wire(b[0], a, Basic, Quantum)?;
        dg.add_wire(a, c, H, Quantum)?;
        dg.add_wire(a, d, H, Quantum)?;
        dg.add_wire(c, b[1], Basic, Quantum)?;
        dg.add_wire(d, b[2], Basic, Quantum)?;
        assert!(dg.is_mbqc());
        assert!(extend_for_px_outputs(&mut dg)?);
        assert_eq!(dg.n_vertices(), 8);
        assert!(dg.is_mbqc());
        assert!(dg.check_validity().is_ok());
        for o in dg.boundary(Some(ZXType::Output), None).into_iter() {
            let u = dg.neighbours(o)?[0];
            assert_eq!(dg.generator(u)?, &px_false());
        }
        assert!(!extend_for_px_outputs(&mut dg)?);
        Ok(())
    }

    // Input - PX(false) - axis - PX(false) - Output, with `leaf` hanging off
    // the axis
    fn gadget(axis: Generator, leaf: Generator)
        -> anyhow::Result<(ZXDiagram, VertId)>
    {
        let mut dg = ZXDiagram::with_boundary(1, 1, 0, 0);
        let (i, o) = (dg.boundary[0], dg.boundary[1]);
        let k = dg.add_vertex(px_false());
        let a = dg.add_vertex(axis);
        let l = dg.add_vertex(leaf);
        let m = dg.add_vertex(px_false());
        dg.add_wire(i, k, Basic, Quantum)?;
        dg.add_wire(k, a, H, Quantum)?;
        dg.add_wire(a, l, H, Quantum)?;
        dg.add_wire(a, m, H, Quantum)?;
        dg.add_wire(m, o, Basic, Quantum)?;
        Ok((dg, a))
    }

    #[test]
    fn internalise_grid() -> anyhow::Result<()> {
        let axes = [
            plane(ZXType::XY, Expr::ratio(1, 4)),
            Generator::clifford(ZXType::PX, true, Quantum),
            Generator::clifford(ZXType::PY, false, Quantum),
        ];
        let leaves = [
            plane(ZXType::XY, Expr::ratio(1, 8)),
            plane(ZXType::XZ, Expr::ratio(1, 8)),
            plane(ZXType::YZ, Expr::ratio(1, 8)),
            Generator::clifford(ZXType::PX, true, Quantum),
            Generator::clifford(ZXType::PY, true, Quantum),
            Generator::clifford(ZXType::PZ, true, Quantum),
        ];
        for axis in axes.iter() {
            for leaf in leaves.iter() {
                let (mut dg, a) = gadget(axis.clone(), leaf.clone())?;
                let fixed =
                    axis.ty() == ZXType::XY
                    && matches!(leaf.ty(), ZXType::XY | ZXType::XZ);
                assert_eq!(internalise_gadgets(&mut dg)?, !fixed);
                assert_eq!(dg.n_vertices(), if fixed { 6 } else { 5 });
                assert!(dg.generator(a)?.ty().is_mbqc());
                assert!(dg.is_mbqc());
            }
        }
        Ok(())
    }

    #[test]
    fn internalise_values() -> anyhow::Result<()> {
        let cases = [
            (
                plane(ZXType::XY, Expr::ratio(1, 4)),
                plane(ZXType::YZ, Expr::ratio(1, 8)),
                plane(ZXType::XY, Expr::ratio(1, 8)),
            ),
            (
                Generator::clifford(ZXType::PX, true, Quantum),
                Generator::clifford(ZXType::PZ, false, Quantum),
                Generator::clifford(ZXType::PX, true, Quantum),
            ),
            (
                Generator::clifford(ZXType::PY, false, Quantum),
                plane(ZXType::YZ, Expr::ratio(1, 4)),
                plane(ZXType::XY, Expr::ratio(1, 4)),
            ),
            (
                Generator::clifford(ZXType::PX, false, Quantum),
                plane(ZXType::XY, Expr::ratio(1, 4)),
                plane(ZXType::YZ, Expr::ratio(7, 4)),
            ),
        ];
        for (axis, leaf, expected) in cases.into_iter() {
            let (mut dg, a) = gadget(axis, leaf)?;
            assert!(internalise_gadgets(&mut dg)?);
            assert_eq!(dg.generator(a)?, &expected);
        }

        // an axis next to a boundary is left alone
        let mut dg = ZXDiagram::with_boundary(1, 0, 0, 0);
        let i = dg.boundary[0];
        let a = dg.add_vertex(Generator::clifford(ZXType::PX, false, Quantum));
        let l = dg.add_vertex(Generator::clifford(ZXType::PZ, true, Quantum));
        let m = dg.add_vertex(plane(ZXType::XY, Expr::ratio(1, 4)));
        dg.add_wire(i, a, Basic, Quantum)?;
        dg.add_wire(a, l, H, Quantum)?;
        dg.add_wire(a, m, H, Quantum)?;
        assert!(!internalise_gadgets(&mut dg)?);
        Ok(())
    }
}
