//! The axiomatic rewrites of the calculus: color change, spider fusion, and
//! the removal of self-loops and parallel Hadamard wires.
//!
//! All four track the global scalar exactly.

use std::collections::VecDeque;
use num_traits::One;
use rustc_hash::{ FxHashMap, FxHashSet };
use tracing::trace;
use crate::{
    expr::Expr,
    graph::{
        Generator,
        QuantumType,
        VertId,
        WireEnd,
        WireId,
        ZXDiagram,
        ZXResult,
        ZXType,
        ZXWireType,
    },
};
use super::LOG_TARGET;
use QuantumType::*;

fn spiders(dg: &ZXDiagram) -> Vec<VertId> {
    dg.vertices()
        .filter(|(_, g)| g.ty().is_spider())
        .map(|(v, _)| v)
        .collect()
}

pub(crate) fn red_to_green(dg: &mut ZXDiagram) -> ZXResult<bool> {
    let xs: FxHashSet<VertId> =
        dg.vertices()
        .filter(|(_, g)| g.ty() == ZXType::XSpider)
        .map(|(v, _)| v)
        .collect();
    if xs.is_empty() { return Ok(false); }

    // a wire with both ends on X-spiders picks up two Hadamards, which cancel
    let toggle: Vec<WireId> =
        dg.wires()
        .filter(|(_, s, t, _)| xs.contains(s) != xs.contains(t))
        .map(|(w, ..)| w)
        .collect();
    for w in toggle.into_iter() {
        let wire_type = dg.wire_props(w)?.wire_type;
        dg.set_wire_type(w, wire_type.toggled())?;
    }
    for x in xs.into_iter() {
        let gen = dg.generator(x)?;
        let (Some(param), Some(q)) = (gen.param(), gen.qtype()) else { continue; };
        let z = Generator::z_spider(param.clone(), q);
        dg.set_generator(x, z)?;
    }
    Ok(true)
}

pub(crate) fn spider_fusion(dg: &mut ZXDiagram) -> ZXResult<bool> {
    let mut success = false;
    // fused vertices are kept in place until the end so that stale wires can
    // still be recognized
    let mut bin: FxHashSet<VertId> = FxHashSet::default();
    for v in spiders(dg).into_iter() {
        if bin.contains(&v) { continue; }
        let mut queue: VecDeque<WireId> = dg.adj_wires(v)?.into();
        while let Some(w) = queue.pop_front() {
            let u = dg.other_end(w, v)?;
            if u == v || bin.contains(&u) { continue; }
            let vgen = dg.generator(v)?;
            let ugen = dg.generator(u)?;
            if !ugen.ty().is_spider() { continue; }
            let same_color = ugen.ty() == vgen.ty();
            let wire_type = dg.wire_props(w)?.wire_type;
            if (wire_type == ZXWireType::Basic) != same_color { continue; }

            let (Some(pv), Some(pu)) = (vgen.param(), ugen.param())
                else { continue; };
            let phase = (pv + pu).reduce_phase();
            let q =
                if vgen.qtype() == Some(Classical)
                    || ugen.qtype() == Some(Classical)
                {
                    Classical
                } else {
                    Quantum
                };
            let fused = Generator::phased(vgen.ty(), phase, q);
            trace!(target: LOG_TARGET, %u, %v, "fuse");

            for uw in dg.adj_wires(u)?.into_iter() {
                let u_end = dg.end_of(uw, u)?;
                let mut other = dg.other_end(uw, u)?;
                let mut props = dg.wire_props(uw)?.clone();
                if !same_color { props.wire_type = props.wire_type.toggled(); }
                // wires into `v` become identities and vanish
                if other == v && props.wire_type == ZXWireType::Basic {
                    continue;
                }
                if other == u { other = v; }
                let new_w =
                    match u_end {
                        WireEnd::Source => dg.add_wire_props(v, other, props)?,
                        WireEnd::Target => dg.add_wire_props(other, v, props)?,
                    };
                queue.push_back(new_w);
            }
            dg.set_generator(v, fused)?;
            bin.insert(u);
            success = true;
        }
    }
    for u in bin.into_iter() { dg.remove_vertex(u)?; }
    Ok(success)
}

pub(crate) fn self_loop_removal(dg: &mut ZXDiagram) -> ZXResult<bool> {
    let mut success = false;
    for v in spiders(dg).into_iter() {
        let loops: Vec<WireId> =
            dg.adj_wires(v)?.into_iter()
            .filter(|w| dg.other_end(*w, v).is_ok_and(|u| u == v))
            .collect();
        if loops.is_empty() { continue; }
        let vq = dg.qtype(v)?;
        let mut n_pis: usize = 0;
        let mut scalar = Expr::one();
        for w in loops.into_iter() {
            let props = dg.remove_wire(w)?;
            if props.wire_type != ZXWireType::H { continue; }
            // a quantum loop on a classical spider has two π phases
            if vq == Some(Quantum) || props.qtype == Classical { n_pis += 1; }
            scalar =
                scalar
                * if props.qtype == Classical {
                    Expr::inv_sqrt2()
                } else {
                    Expr::ratio(1, 2)
                };
        }
        if n_pis % 2 == 1 { super::add_phase(dg, v, &Expr::one())?; }
        dg.multiply_scalar(&scalar);
        trace!(target: LOG_TARGET, %v, n_pis, "remove self-loops");
        success = true;
    }
    Ok(success)
}

// `true` if `w` acts as a Hadamard between two spiders of the given types
fn effectively_h(vtype: ZXType, utype: ZXType, wire_type: ZXWireType) -> bool {
    (wire_type == ZXWireType::H) == (vtype == utype)
}

pub(crate) fn parallel_h_removal(dg: &mut ZXDiagram) -> ZXResult<bool> {
    let mut success = false;
    let mut done: FxHashSet<VertId> = FxHashSet::default();
    for v in spiders(dg).into_iter() {
        done.insert(v);
        let vgen = dg.generator(v)?;
        let vtype = vgen.ty();
        let vq = vgen.qtype();
        // one unpaired wire per neighbour and wire quantum type
        let mut unpaired: FxHashMap<(VertId, QuantumType), WireId> =
            FxHashMap::default();
        for w in dg.adj_wires(v)?.into_iter() {
            let u = dg.other_end(w, v)?;
            if done.contains(&u) { continue; }
            let ugen = dg.generator(u)?;
            if !ugen.ty().is_spider() { continue; }
            let props = dg.wire_props(w)?;
            if !effectively_h(vtype, ugen.ty(), props.wire_type) { continue; }
            let wq = props.qtype;

            // a quantum wire between classical spiders is already a pair
            if wq == Quantum
                && vq == Some(Classical)
                && ugen.qtype() == Some(Classical)
            {
                dg.remove_wire(w)?;
                dg.multiply_scalar(&Expr::ratio(1, 2));
                trace!(target: LOG_TARGET, %v, %u, "remove doubled wire");
                success = true;
                continue;
            }
            if let Some(w0) = unpaired.remove(&(u, wq)) {
                dg.remove_wire(w0)?;
                dg.remove_wire(w)?;
                let factor =
                    if wq == Classical {
                        Expr::ratio(1, 2)
                    } else {
                        Expr::ratio(1, 4)
                    };
                dg.multiply_scalar(&factor);
                trace!(target: LOG_TARGET, %v, %u, "remove wire pair");
                success = true;
            } else {
                unpaired.insert((u, wq), w);
            }
        }
    }
    Ok(success)
}

#[cfg(test)]
mod test {
    use num_traits::Zero;
    use rand::{ Rng, SeedableRng, rngs::StdRng };
    use crate::graph::contract::{ doubled_close, tensors_close };
    use super::*;
    use ZXWireType::*;

    fn close(a: &ZXDiagram, b: &ZXDiagram) -> anyhow::Result<bool> {
        Ok(tensors_close(&a.contract()?, &b.contract()?, 1e-9))
    }

    #[test]
    fn fusion_adds_phases() -> anyhow::Result<()> {
        let mut dg = ZXDiagram::with_boundary(1, 1, 0, 0);
        let (i, o) = (dg.boundary[0], dg.boundary[1]);
        let a = dg.add_vertex(Generator::z_spider(Expr::ratio(3, 4), Quantum));
        let b = dg.add_vertex(Generator::z_spider(Expr::ratio(1, 2), Quantum));
        dg.add_wire(i, a, Basic, Quantum)?;
        dg.add_wire(a, b, Basic, Quantum)?;
        dg.add_wire(b, o, Basic, Quantum)?;
        assert!(spider_fusion(&mut dg)?);
        assert_eq!(dg.count_vertices(ZXType::ZSpider), 1);
        assert_eq!(dg.n_wires(), 2);
        let z = dg.vertices()
            .find(|(_, g)| g.ty() == ZXType::ZSpider)
            .map(|(v, _)| v)
            .unwrap();
        assert_eq!(dg.generator(z)?.param(), Some(&Expr::ratio(5, 4)));
        assert!(dg.check_validity().is_ok());
        assert!(!spider_fusion(&mut dg)?);
        Ok(())
    }

    #[test]
    fn fusion_across_hadamard() -> anyhow::Result<()> {
        // Z - H - X fuses into a single Z, with the X's other wires toggled
        let mut dg = ZXDiagram::with_boundary(0, 0, 2, 2);
        let b = dg.boundary.clone();
        let z = dg.add_vertex(Generator::z_spider(Expr::ratio(1, 4), Classical));
        let x = dg.add_vertex(Generator::x_spider(Expr::ratio(1, 2), Classical));
        dg.add_wire(b[0], z, Basic, Classical)?;
        dg.add_wire(b[1], x, Basic, Classical)?;
        dg.add_wire(z, x, H, Classical)?;
        dg.add_wire(z, b[2], Basic, Classical)?;
        dg.add_wire(x, b[3], H, Classical)?;
        let before = dg.clone();
        assert!(spider_fusion(&mut dg)?);
        assert_eq!(dg.n_vertices(), 5);
        assert_eq!(dg.count_wires(H), 1);
        assert_eq!(dg.generator(z)?.param(), Some(&Expr::ratio(3, 4)));
        assert!(close(&before, &dg)?);
        Ok(())
    }

    #[test]
    fn red_to_green_preserves_tensor() -> anyhow::Result<()> {
        let mut dg = ZXDiagram::with_boundary(0, 0, 1, 1);
        let (i, o) = (dg.boundary[0], dg.boundary[1]);
        let x = dg.add_vertex(Generator::x_spider(Expr::ratio(1, 2), Classical));
        let y = dg.add_vertex(Generator::x_spider(Expr::ratio(1, 4), Classical));
        let z = dg.add_vertex(Generator::z_spider(Expr::ratio(1, 4), Classical));
        dg.add_wire(i, x, Basic, Classical)?;
        dg.add_wire(x, y, Basic, Classical)?;
        dg.add_wire(y, z, Basic, Classical)?;
        dg.add_wire(z, o, Basic, Classical)?;
        dg.add_wire(x, x, H, Classical)?;
        let before = dg.clone();
        assert!(red_to_green(&mut dg)?);
        assert_eq!(dg.count_vertices(ZXType::XSpider), 0);
        // boundary and X-Z wires toggle; the loop and X-X wire do not
        assert_eq!(dg.count_wires(H), 3);
        assert!(close(&before, &dg)?);
        assert!(!red_to_green(&mut dg)?);
        Ok(())
    }

    #[test]
    fn self_loop_scalars() -> anyhow::Result<()> {
        for (wt, expected_phase) in [(H, Expr::ratio(3, 2)), (Basic, Expr::ratio(1, 2))] {
            let mut dg = ZXDiagram::with_boundary(0, 0, 1, 0);
            let i = dg.boundary[0];
            let z = dg.add_vertex(Generator::z_spider(Expr::ratio(1, 2), Classical));
            dg.add_wire(i, z, Basic, Classical)?;
            dg.add_wire(z, z, wt, Classical)?;
            let before = dg.clone();
            assert!(self_loop_removal(&mut dg)?);
            assert_eq!(dg.n_wires(), 1);
            assert_eq!(dg.generator(z)?.param(), Some(&expected_phase));
            assert!(close(&before, &dg)?);
        }

        // a quantum Hadamard loop on a classical spider adds no phase
        let mut dg = ZXDiagram::new();
        let z = dg.add_vertex(Generator::z_spider(Expr::zero(), Classical));
        dg.add_wire(z, z, H, Quantum)?;
        assert!(self_loop_removal(&mut dg)?);
        assert_eq!(dg.generator(z)?.param(), Some(&Expr::zero()));
        assert_eq!(dg.scalar(), &Expr::ratio(1, 2));
        Ok(())
    }

    #[test]
    fn hopf_scalars() -> anyhow::Result<()> {
        // Z = X joined by three Basic wires leaves one
        let mut dg = ZXDiagram::with_boundary(0, 0, 1, 1);
        let (i, o) = (dg.boundary[0], dg.boundary[1]);
        let z = dg.add_vertex(Generator::z_spider(Expr::zero(), Classical));
        let x = dg.add_vertex(Generator::x_spider(Expr::ratio(1, 4), Classical));
        dg.add_wire(i, z, Basic, Classical)?;
        dg.add_wire(x, o, Basic, Classical)?;
        for _ in 0..3 { dg.add_wire(z, x, Basic, Classical)?; }
        let before = dg.clone();
        assert!(parallel_h_removal(&mut dg)?);
        assert_eq!(dg.wires_between(z, x)?.len(), 1);
        assert_eq!(dg.scalar(), &Expr::ratio(1, 2));
        assert!(close(&before, &dg)?);
        assert!(!parallel_h_removal(&mut dg)?);

        // same-color Basic wires are not affected
        let mut dg = ZXDiagram::new();
        let a = dg.add_vertex(Generator::z_spider(Expr::zero(), Quantum));
        let b = dg.add_vertex(Generator::z_spider(Expr::zero(), Quantum));
        dg.add_wire(a, b, Basic, Quantum)?;
        dg.add_wire(a, b, Basic, Quantum)?;
        assert!(!parallel_h_removal(&mut dg)?);

        // quantum pairs cost a quarter, and a lone quantum wire between
        // classical spiders is a pair on its own
        dg.add_wire(a, b, H, Quantum)?;
        dg.add_wire(a, b, H, Quantum)?;
        let c = dg.add_vertex(Generator::z_spider(Expr::zero(), Classical));
        let d = dg.add_vertex(Generator::z_spider(Expr::zero(), Classical));
        dg.add_wire(c, d, H, Quantum)?;
        assert!(parallel_h_removal(&mut dg)?);
        assert_eq!(dg.n_wires(), 2);
        assert_eq!(dg.scalar(), &Expr::ratio(1, 8));
        Ok(())
    }

    #[test]
    fn quantum_self_loops() -> anyhow::Result<()> {
        let mut dg = ZXDiagram::with_boundary(1, 1, 0, 0);
        let (i, o) = (dg.boundary[0], dg.boundary[1]);
        let z = dg.add_vertex(Generator::z_spider(Expr::ratio(1, 2), Quantum));
        dg.add_wire(i, z, Basic, Quantum)?;
        dg.add_wire(z, o, Basic, Quantum)?;
        dg.add_wire(z, z, H, Quantum)?;
        dg.add_wire(z, z, Basic, Quantum)?;
        let before = dg.clone();
        assert!(self_loop_removal(&mut dg)?);
        assert_eq!(dg.scalar(), &Expr::ratio(1, 2));
        assert!(doubled_close(&before, &dg, 1e-9)?);

        // quantum Hadamard loop on a classical spider
        let mut dg = ZXDiagram::with_boundary(0, 0, 1, 1);
        let (i, o) = (dg.boundary[0], dg.boundary[1]);
        let c = dg.add_vertex(Generator::z_spider(Expr::ratio(1, 4), Classical));
        dg.add_wire(i, c, Basic, Classical)?;
        dg.add_wire(c, o, Basic, Classical)?;
        dg.add_wire(c, c, H, Quantum)?;
        let before = dg.clone();
        assert!(self_loop_removal(&mut dg)?);
        assert!(doubled_close(&before, &dg, 1e-9)?);
        Ok(())
    }

    #[test]
    fn quantum_hopf() -> anyhow::Result<()> {
        let mut dg = ZXDiagram::with_boundary(1, 1, 0, 0);
        let (i, o) = (dg.boundary[0], dg.boundary[1]);
        let a = dg.add_vertex(Generator::z_spider(Expr::zero(), Quantum));
        let b = dg.add_vertex(Generator::z_spider(Expr::ratio(1, 4), Quantum));
        dg.add_wire(i, a, Basic, Quantum)?;
        dg.add_wire(b, o, Basic, Quantum)?;
        dg.add_wire(a, b, H, Quantum)?;
        dg.add_wire(a, b, H, Quantum)?;
        let before = dg.clone();
        assert!(parallel_h_removal(&mut dg)?);
        assert_eq!(dg.scalar(), &Expr::ratio(1, 4));
        assert_eq!(dg.n_wires(), 2);
        assert!(doubled_close(&before, &dg, 1e-9)?);

        // a lone quantum wire between classical spiders doubles into a pair
        let mut dg = ZXDiagram::with_boundary(0, 0, 1, 1);
        let (i, o) = (dg.boundary[0], dg.boundary[1]);
        let c = dg.add_vertex(Generator::z_spider(Expr::ratio(1, 2), Classical));
        let d = dg.add_vertex(Generator::z_spider(Expr::zero(), Classical));
        dg.add_wire(i, c, Basic, Classical)?;
        dg.add_wire(d, o, Basic, Classical)?;
        dg.add_wire(c, d, H, Quantum)?;
        let before = dg.clone();
        assert!(parallel_h_removal(&mut dg)?);
        assert_eq!(dg.scalar(), &Expr::ratio(1, 2));
        assert!(doubled_close(&before, &dg, 1e-9)?);
        Ok(())
    }

    #[test]
    fn quantum_color_change_and_fusion() -> anyhow::Result<()> {
        let mut dg = ZXDiagram::with_boundary(1, 1, 0, 0);
        let (i, o) = (dg.boundary[0], dg.boundary[1]);
        let x1 = dg.add_vertex(Generator::x_spider(Expr::ratio(1, 4), Quantum));
        let z = dg.add_vertex(Generator::z_spider(Expr::ratio(1, 2), Quantum));
        let x2 = dg.add_vertex(Generator::x_spider(Expr::zero(), Quantum));
        dg.add_wire(i, x1, Basic, Quantum)?;
        dg.add_wire(x1, z, H, Quantum)?;
        dg.add_wire(z, x2, Basic, Quantum)?;
        dg.add_wire(x2, o, Basic, Quantum)?;
        let before = dg.clone();
        assert!(red_to_green(&mut dg)?);
        assert_eq!(dg.count_vertices(ZXType::XSpider), 0);
        assert!(doubled_close(&before, &dg, 1e-9)?);
        while spider_fusion(&mut dg)? { }
        assert!(dg.count_vertices(ZXType::ZSpider) < 3);
        assert!(dg.check_validity().is_ok());
        assert!(doubled_close(&before, &dg, 1e-9)?);
        Ok(())
    }

    // random classical diagram of Z- and X-spiders on two boundaries
    fn random_diagram(rng: &mut StdRng) -> anyhow::Result<ZXDiagram> {
        let mut dg = ZXDiagram::with_boundary(0, 0, 1, 1);
        let (i, o) = (dg.boundary[0], dg.boundary[1]);
        let n = rng.gen_range(2..5_usize);
        let spiders: Vec<VertId> =
            (0..n)
            .map(|_| {
                let ph = Expr::ratio(rng.gen_range(0..8), 4);
                if rng.gen::<bool>() {
                    dg.add_vertex(Generator::z_spider(ph, Classical))
                } else {
                    dg.add_vertex(Generator::x_spider(ph, Classical))
                }
            })
            .collect();
        dg.add_wire(i, spiders[0], Basic, Classical)?;
        dg.add_wire(spiders[n - 1], o, Basic, Classical)?;
        for k in 0..n - 1 {
            dg.add_wire(spiders[k], spiders[k + 1], Basic, Classical)?;
        }
        for _ in 0..rng.gen_range(0..4_usize) {
            let a = spiders[rng.gen_range(0..n)];
            let b = spiders[rng.gen_range(0..n)];
            let wt = if rng.gen::<bool>() { H } else { Basic };
            dg.add_wire(a, b, wt, Classical)?;
        }
        Ok(dg)
    }

    #[test]
    fn closure_preserves_tensor() -> anyhow::Result<()> {
        let mut rng = StdRng::seed_from_u64(10546);
        for _ in 0..20 {
            let mut dg = random_diagram(&mut rng)?;
            let before = dg.clone();
            while spider_fusion(&mut dg)?
                | self_loop_removal(&mut dg)?
                | parallel_h_removal(&mut dg)?
            { }
            assert!(dg.check_validity().is_ok());
            assert!(close(&before, &dg)?);
            for (v, _) in dg.vertices() {
                if !dg.zxtype(v)?.is_spider() { continue; }
                assert!(dg.wires_between(v, v)?.is_empty());
            }
        }
        Ok(())
    }
}
