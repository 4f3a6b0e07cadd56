//! Cutting closed regions out of a diagram and substituting replacements.
//!
//! A [`Subdiagram`] describes a region of a host diagram: a set of interior
//! vertices plus an ordered list of cut wire ends, each lying on an interior
//! vertex. The region is *closed* when every wire leaving it is cut. A wire
//! with both ends inside the region may also be cut, provided both of its ends
//! are; this is how a self-loop is split into two boundary points.
//!
//! ```
//! # use zx_rewrite::expr::Expr;
//! # use zx_rewrite::graph::*;
//! # use QuantumType::Quantum;
//! # fn main() -> ZXResult<()> {
//! // a spider with a self-loop, cut at both ends of the loop
//! let mut dg = ZXDiagram::new();
//! let z = dg.add_vertex(Generator::z_spider(Expr::from(0), Quantum));
//! let w = dg.add_wire(z, z, ZXWireType::Basic, Quantum)?;
//! let sub = Subdiagram::new(
//!     vec![(w, WireEnd::Source), (w, WireEnd::Target)], [z]);
//! sub.check_validity(&dg)?;
//!
//! // replace it with an identity wire, closing the loop
//! let mut id = ZXDiagram::new();
//! let a = id.add_vertex(Generator::open(Quantum));
//! let b = id.add_vertex(Generator::open(Quantum));
//! id.add_wire(a, b, ZXWireType::Basic, Quantum)?;
//! dg.substitute(&id, &sub)?;
//! assert_eq!(dg.n_vertices(), 0);
//! assert_eq!(dg.scalar(), &Expr::from(4));
//! # Ok(())
//! # }
//! ```

use num_traits::Zero;
use rustc_hash::{ FxHashMap, FxHashSet };
use crate::{
    expr::Expr,
    graph::{
        Generator,
        QuantumType,
        VertId,
        WireEnd,
        WireId,
        WireProperties,
        ZXDiagram,
        ZXError,
        ZXResult,
        ZXWireType,
    },
};
use ZXError::*;

/// A closed region of a diagram.
///
/// This is plain data holding IDs into some host diagram; it is only
/// meaningful for the host it was built from, and only until the host is next
/// edited.
#[derive(Clone, Debug, Default)]
pub struct Subdiagram {
    /// Cut wire ends, in the order matched against a replacement's boundary.
    pub boundary: Vec<(WireId, WireEnd)>,
    /// Interior vertices.
    pub verts: FxHashSet<VertId>,
}

impl Subdiagram {
    /// Create a new region.
    pub fn new<I>(boundary: Vec<(WireId, WireEnd)>, verts: I) -> Self
    where I: IntoIterator<Item = VertId>
    {
        Self { boundary, verts: verts.into_iter().collect() }
    }

    // interior vertices in a deterministic order
    fn sorted_verts(&self) -> Vec<VertId> {
        let mut verts: Vec<VertId> = self.verts.iter().copied().collect();
        verts.sort();
        verts
    }

    /// Check that `self` describes a closed region of `diag`.
    ///
    /// Fails if a cut end is listed twice or lies outside the region, if a
    /// boundary vertex is inside the region, if a wire leaves the region
    /// uncut, or if a wire with both ends inside is cut at only one of them.
    pub fn check_validity(&self, diag: &ZXDiagram) -> ZXResult<()> {
        let mut cut: FxHashSet<(WireId, WireEnd)> = FxHashSet::default();
        for (w, end) in self.boundary.iter().copied() {
            cut.insert((w, end)).then_some(())
                .ok_or(CutDuplicate(w, end))?;
            let v = diag.vertex_at_end(w, end)?;
            self.verts.contains(&v).then_some(())
                .ok_or(CutOutside(w, end))?;
        }
        for v in self.sorted_verts().into_iter() {
            (!diag.zxtype(v)?.is_boundary()).then_some(())
                .ok_or(CutBoundaryInside(v))?;
            for (w, end) in diag.ends_at(v)?.into_iter() {
                let other = diag.vertex_at_end(w, end.flip())?;
                let cut_here = cut.contains(&(w, end));
                if self.verts.contains(&other) {
                    (cut_here == cut.contains(&(w, end.flip()))).then_some(())
                        .ok_or(CutPartial(w))?;
                } else {
                    cut_here.then_some(()).ok_or(CutNotClosed(v, w))?;
                }
            }
        }
        Ok(())
    }

    /// Extract the region as a standalone diagram.
    ///
    /// The new diagram has one `Open` boundary per cut end, in cut order, each
    /// with the quantum type of its cut wire. Boundary wires are always Basic;
    /// a Hadamard on a cut wire is attributed to the outside of the region.
    pub fn to_diagram(&self, diag: &ZXDiagram) -> ZXResult<ZXDiagram> {
        self.check_validity(diag)?;
        let mut out = ZXDiagram::new();
        let mut map: FxHashMap<VertId, VertId> = FxHashMap::default();
        let verts = self.sorted_verts();
        for v in verts.iter().copied() {
            map.insert(v, out.add_vertex(diag.generator(v)?.clone()));
        }
        let cut: FxHashSet<(WireId, WireEnd)> =
            self.boundary.iter().copied().collect();
        for (w, end) in self.boundary.iter().copied() {
            let props = diag.wire_props(w)?;
            let b = out.add_vertex(Generator::open(props.qtype));
            let inner = map[&diag.vertex_at_end(w, end)?];
            out.add_wire_props(
                b,
                inner,
                WireProperties::with_ports(
                    ZXWireType::Basic, props.qtype, None, props.port(end)),
            )?;
        }
        // each uncut interior wire is added once, from its source end
        for v in verts.into_iter() {
            for (w, end) in diag.ends_at(v)?.into_iter() {
                if end != WireEnd::Source || cut.contains(&(w, end)) {
                    continue;
                }
                let t = diag.target(w)?;
                out.add_wire_props(
                    map[&v], map[&t], diag.wire_props(w)?.clone())?;
            }
        }
        Ok(out)
    }
}

impl ZXDiagram {
    // the single wire on a freshly inserted boundary vertex, along with the
    // vertex and port at its far end
    fn boundary_link(&self, b: VertId)
        -> ZXResult<(WireProperties, VertId, Option<usize>)>
    {
        let ends = self.ends_at(b)?;
        (ends.len() == 1).then_some(())
            .ok_or(ZXError::BoundaryDegree(b, ends.len()))?;
        let (w, end) = ends[0];
        let props = self.wire_props(w)?.clone();
        let adj = self.vertex_at_end(w, end.flip())?;
        let port = props.port(end.flip());
        Ok((props, adj, port))
    }

    /// Replace the region described by `sub` with a copy of `to_insert`.
    ///
    /// The boundary vertices of `to_insert` are matched positionally with the
    /// cut ends of `sub`, and must agree with them in number and quantum type.
    /// Hadamards compose along each reconnected wire. When both ends of a cut
    /// wire are matched to boundaries that `to_insert` connects directly, the
    /// wire is closed into a loop and removed, multiplying the scalar by 4
    /// (`Quantum`) or 2 (`Classical`), or by 0 if the loop carries an odd
    /// number of Hadamards. The scalar of `to_insert` is multiplied in.
    pub fn substitute(&mut self, to_insert: &ZXDiagram, sub: &Subdiagram)
        -> ZXResult<()>
    {
        sub.check_validity(self)?;
        (to_insert.boundary.len() == sub.boundary.len()).then_some(())
            .ok_or(SubstituteSize(to_insert.boundary.len(), sub.boundary.len()))?;
        for (i, ((w, _), b)) in
            sub.boundary.iter().zip(to_insert.boundary.iter()).enumerate()
        {
            let q = to_insert.generator(*b)?.qtype();
            (q == Some(self.wire_props(*w)?.qtype)).then_some(())
                .ok_or(SubstituteQType(i))?;
        }

        let map = self.copy_graph(to_insert, false);
        let new_bounds: Vec<VertId> =
            to_insert.boundary.iter()
            .map(|b| map.get(b).copied().ok_or(MissingVertex(*b)))
            .collect::<ZXResult<_>>()?;

        let mut paired: FxHashSet<usize> = FxHashSet::default();
        for (i, (w, end)) in sub.boundary.iter().copied().enumerate() {
            if paired.contains(&i) { continue; }
            let nb = new_bounds[i];
            let wprops = self.wire_props(w)?.clone();
            let outside = self.vertex_at_end(w, end.flip())?;
            let (nprops, adj, adj_port) = self.boundary_link(nb)?;

            if sub.verts.contains(&outside) {
                // both ends of `w` are cut; handle them together
                let j =
                    sub.boundary.iter()
                    .position(|c| *c == (w, end.flip()))
                    .ok_or(CutPartial(w))?;
                paired.insert(j);
                let nb2 = new_bounds[j];
                if adj == nb2 {
                    let parity = wprops.wire_type.then(nprops.wire_type);
                    let factor =
                        if parity.is_h() {
                            Expr::zero()
                        } else if wprops.qtype == QuantumType::Quantum {
                            Expr::from(4)
                        } else {
                            Expr::from(2)
                        };
                    self.multiply_scalar(&factor);
                } else {
                    let (nprops2, adj2, adj2_port) = self.boundary_link(nb2)?;
                    let wire_type =
                        wprops.wire_type
                        .then(nprops.wire_type)
                        .then(nprops2.wire_type);
                    self.add_wire_props(
                        adj,
                        adj2,
                        WireProperties::with_ports(
                            wire_type, wprops.qtype, adj_port, adj2_port),
                    )?;
                }
                self.remove_vertex(nb)?;
                self.remove_vertex(nb2)?;
            } else {
                let wire_type = wprops.wire_type.then(nprops.wire_type);
                let outside_port = wprops.port(end.flip());
                self.remove_wire(w)?;
                let props =
                    match end {
                        WireEnd::Target => WireProperties::with_ports(
                            wire_type, wprops.qtype, outside_port, adj_port),
                        WireEnd::Source => WireProperties::with_ports(
                            wire_type, wprops.qtype, adj_port, outside_port),
                    };
                match end {
                    WireEnd::Target => self.add_wire_props(outside, adj, props)?,
                    WireEnd::Source => self.add_wire_props(adj, outside, props)?,
                };
                self.remove_vertex(nb)?;
            }
        }
        for v in sub.sorted_verts().into_iter() { self.remove_vertex(v)?; }
        self.multiply_scalar(&to_insert.scalar);
        Ok(())
    }
}
