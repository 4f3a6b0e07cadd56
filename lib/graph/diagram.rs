use std::collections::BTreeSet;
use std::fmt;
use num_traits::One;
use rustc_hash::{ FxHashMap, FxHashSet };
use crate::{
    expr::{ Expr, Symbol, SymbolMap },
    graph::{
        Generator,
        QuantumType,
        WireEnd,
        WireProperties,
        ZXError,
        ZXResult,
        ZXType,
        ZXWireType,
    },
};
use ZXError::*;

/// Identifies a vertex in a diagram.
///
/// IDs are generational: once a vertex is removed, its ID is never valid again
/// for the same diagram even if the underlying storage is reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertId {
    idx: usize,
    gen: u32,
}

impl VertId {
    /// Return the storage index of the vertex.
    pub fn index(&self) -> usize { self.idx }
}

impl fmt::Display for VertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.idx)
    }
}

/// Identifies a wire in a diagram.
///
/// See [`VertId`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WireId {
    idx: usize,
    gen: u32,
}

impl WireId {
    /// Return the storage index of the wire.
    pub fn index(&self) -> usize { self.idx }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.idx)
    }
}

/// Controls whether [`ZXDiagram::remove_wire_between`] may match a wire in
/// the reverse orientation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WireSearch {
    Directed,
    Undirected,
}

#[derive(Clone, Debug)]
struct Slot<T> {
    gen: u32,
    data: Option<T>,
}

#[derive(Clone, Debug)]
struct VertData {
    gen: Generator,
    // self-loops are listed once
    wires: Vec<WireId>,
}

#[derive(Clone, Debug)]
struct WireData {
    source: VertId,
    target: VertId,
    props: WireProperties,
}

/// A diagram in the ZX-calculus.
///
/// Vertices and wires live in arenas addressed by generational IDs. Parallel
/// wires and self-loops are permitted. Boundary-typed vertices are listed in
/// an ordered boundary whose order gives the diagram's interface; the global
/// scalar (1 by default) is tracked exactly.
///
/// Edits are not checked as they are made; call
/// [`check_validity`][Self::check_validity] after a batch of edits.
#[derive(Clone, Debug)]
pub struct ZXDiagram {
    verts: Vec<Slot<VertData>>,
    free_verts: Vec<usize>,
    vert_count: usize,
    wires: Vec<Slot<WireData>>,
    free_wires: Vec<usize>,
    wire_count: usize,
    pub(crate) boundary: Vec<VertId>,
    pub(crate) scalar: Expr,
}

impl Default for ZXDiagram {
    fn default() -> Self { Self::new() }
}

impl ZXDiagram {
    /// Create a new, empty diagram.
    pub fn new() -> Self {
        Self {
            verts: Vec::new(),
            free_verts: Vec::new(),
            vert_count: 0,
            wires: Vec::new(),
            free_wires: Vec::new(),
            wire_count: 0,
            boundary: Vec::new(),
            scalar: Expr::one(),
        }
    }

    /// Create a new diagram populated only by boundary vertices.
    ///
    /// Boundary order is quantum inputs, classical inputs, quantum outputs,
    /// then classical outputs.
    pub fn with_boundary(
        inputs: usize,
        outputs: usize,
        classical_inputs: usize,
        classical_outputs: usize,
    ) -> Self
    {
        let mut dg = Self::new();
        (0..inputs).for_each(|_| {
            dg.add_vertex(Generator::input(QuantumType::Quantum)); });
        (0..classical_inputs).for_each(|_| {
            dg.add_vertex(Generator::input(QuantumType::Classical)); });
        (0..outputs).for_each(|_| {
            dg.add_vertex(Generator::output(QuantumType::Quantum)); });
        (0..classical_outputs).for_each(|_| {
            dg.add_vertex(Generator::output(QuantumType::Classical)); });
        dg
    }

    fn vert(&self, v: VertId) -> ZXResult<&VertData> {
        self.verts.get(v.idx)
            .filter(|slot| slot.gen == v.gen)
            .and_then(|slot| slot.data.as_ref())
            .ok_or(MissingVertex(v))
    }

    fn vert_mut(&mut self, v: VertId) -> ZXResult<&mut VertData> {
        self.verts.get_mut(v.idx)
            .filter(|slot| slot.gen == v.gen)
            .and_then(|slot| slot.data.as_mut())
            .ok_or(MissingVertex(v))
    }

    fn wire(&self, w: WireId) -> ZXResult<&WireData> {
        self.wires.get(w.idx)
            .filter(|slot| slot.gen == w.gen)
            .and_then(|slot| slot.data.as_ref())
            .ok_or(MissingWire(w))
    }

    fn wire_mut(&mut self, w: WireId) -> ZXResult<&mut WireData> {
        self.wires.get_mut(w.idx)
            .filter(|slot| slot.gen == w.gen)
            .and_then(|slot| slot.data.as_mut())
            .ok_or(MissingWire(w))
    }

    fn fresh_vert(&mut self, data: VertData) -> VertId {
        self.vert_count += 1;
        if let Some(idx) = self.free_verts.pop() {
            let slot = &mut self.verts[idx];
            slot.gen += 1;
            slot.data = Some(data);
            VertId { idx, gen: slot.gen }
        } else {
            self.verts.push(Slot { gen: 0, data: Some(data) });
            VertId { idx: self.verts.len() - 1, gen: 0 }
        }
    }

    fn fresh_wire(&mut self, data: WireData) -> WireId {
        self.wire_count += 1;
        if let Some(idx) = self.free_wires.pop() {
            let slot = &mut self.wires[idx];
            slot.gen += 1;
            slot.data = Some(data);
            WireId { idx, gen: slot.gen }
        } else {
            self.wires.push(Slot { gen: 0, data: Some(data) });
            WireId { idx: self.wires.len() - 1, gen: 0 }
        }
    }

    /// Return the global scalar on the diagram.
    pub fn scalar(&self) -> &Expr { &self.scalar }

    /// Multiply the global scalar by a factor.
    pub fn multiply_scalar(&mut self, factor: &Expr) {
        self.scalar *= factor;
    }

    /// Return the number of vertices.
    pub fn n_vertices(&self) -> usize { self.vert_count }

    /// Return the number of wires.
    pub fn n_wires(&self) -> usize { self.wire_count }

    /// Return the number of vertices of a given type.
    pub fn count_vertices(&self, ty: ZXType) -> usize {
        self.vertices().filter(|(_, g)| g.ty() == ty).count()
    }

    /// Return the number of vertices of a given type and quantum type.
    pub fn count_vertices_q(&self, ty: ZXType, qtype: QuantumType) -> usize {
        self.vertices()
            .filter(|(_, g)| g.ty() == ty && g.qtype() == Some(qtype))
            .count()
    }

    /// Return the number of wires of a given type.
    pub fn count_wires(&self, wire_type: ZXWireType) -> usize {
        self.wires().filter(|(_, _, _, p)| p.wire_type == wire_type).count()
    }

    /// Return the boundary vertices, optionally restricted to a type and/or a
    /// quantum type, in boundary order.
    pub fn boundary(&self, ty: Option<ZXType>, qtype: Option<QuantumType>)
        -> Vec<VertId>
    {
        self.boundary.iter()
            .copied()
            .filter(|b| {
                self.generator(*b)
                    .map(|g| {
                        ty.map_or(true, |t| g.ty() == t)
                            && qtype.map_or(true, |q| g.qtype() == Some(q))
                    })
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Return the number of boundary vertices.
    pub fn boundary_len(&self) -> usize { self.boundary.len() }

    /// Return the quantum type of each boundary vertex, in boundary order.
    pub fn boundary_qtypes(&self) -> Vec<QuantumType> {
        self.boundary.iter()
            .filter_map(|b| self.generator(*b).ok().and_then(|g| g.qtype()))
            .collect()
    }

    pub(crate) fn set_boundary(&mut self, boundary: Vec<VertId>) {
        self.boundary = boundary;
    }

    /// Add a vertex and return its ID.
    ///
    /// Boundary-typed vertices are appended to the boundary.
    pub fn add_vertex(&mut self, gen: Generator) -> VertId {
        let is_boundary = gen.ty().is_boundary();
        let v = self.fresh_vert(VertData { gen, wires: Vec::new() });
        if is_boundary { self.boundary.push(v); }
        v
    }

    // like `add_vertex`, but never touching the boundary list
    pub(crate) fn add_vertex_unlisted(&mut self, gen: Generator) -> VertId {
        self.fresh_vert(VertData { gen, wires: Vec::new() })
    }

    /// Add an unported wire between two vertices.
    ///
    /// Fails only if either vertex does not exist; no validity checks are
    /// performed.
    pub fn add_wire(
        &mut self,
        a: VertId,
        b: VertId,
        wire_type: ZXWireType,
        qtype: QuantumType,
    ) -> ZXResult<WireId>
    {
        self.add_wire_props(a, b, WireProperties::new(wire_type, qtype))
    }

    /// Add a wire with arbitrary properties between two vertices, with `a` as
    /// its source.
    pub fn add_wire_props(&mut self, a: VertId, b: VertId, props: WireProperties)
        -> ZXResult<WireId>
    {
        self.vert(a)?;
        self.vert(b)?;
        let w = self.fresh_wire(WireData { source: a, target: b, props });
        self.vert_mut(a)?.wires.push(w);
        if a != b { self.vert_mut(b)?.wires.push(w); }
        Ok(w)
    }

    /// Remove a vertex and all its incident wires, returning its generator.
    pub fn remove_vertex(&mut self, v: VertId) -> ZXResult<Generator> {
        let data =
            self.verts.get_mut(v.idx)
            .filter(|slot| slot.gen == v.gen)
            .and_then(|slot| slot.data.take())
            .ok_or(MissingVertex(v))?;
        self.free_verts.push(v.idx);
        self.vert_count -= 1;
        for w in data.wires.into_iter() { self.remove_wire(w)?; }
        self.boundary.retain(|b| *b != v);
        Ok(data.gen)
    }

    /// Remove a wire, returning its properties.
    pub fn remove_wire(&mut self, w: WireId) -> ZXResult<WireProperties> {
        let data =
            self.wires.get_mut(w.idx)
            .filter(|slot| slot.gen == w.gen)
            .and_then(|slot| slot.data.take())
            .ok_or(MissingWire(w))?;
        self.free_wires.push(w.idx);
        self.wire_count -= 1;
        for v in [data.source, data.target] {
            if let Ok(vd) = self.vert_mut(v) { vd.wires.retain(|x| *x != w); }
        }
        Ok(data.props)
    }

    /// Remove one wire from `a` to `b` whose properties equal `props`.
    ///
    /// With [`WireSearch::Undirected`], a wire from `b` to `a` with the ports
    /// of `props` swapped also matches.
    pub fn remove_wire_between(
        &mut self,
        a: VertId,
        b: VertId,
        props: &WireProperties,
        search: WireSearch,
    ) -> ZXResult<()>
    {
        let find = |s: VertId, t: VertId, p: &WireProperties| {
            self.vert(s).ok()?.wires.iter().copied()
                .find(|w| {
                    self.wire(*w)
                        .is_ok_and(|d| {
                            d.source == s && d.target == t && d.props == *p
                        })
                })
        };
        let found =
            match find(a, b, props) {
                Some(w) => Some(w),
                None if search == WireSearch::Undirected
                    => find(b, a, &props.reversed()),
                None => None,
            };
        let w = found.ok_or(NoWireBetween(a, b))?;
        self.remove_wire(w)?;
        Ok(())
    }

    /// Return the generator of a vertex.
    pub fn generator(&self, v: VertId) -> ZXResult<&Generator> {
        self.vert(v).map(|vd| &vd.gen)
    }

    /// Replace the generator of a vertex.
    pub fn set_generator(&mut self, v: VertId, gen: Generator) -> ZXResult<()> {
        self.vert_mut(v)?.gen = gen;
        Ok(())
    }

    /// Return the type of a vertex.
    pub fn zxtype(&self, v: VertId) -> ZXResult<ZXType> {
        self.generator(v).map(|g| g.ty())
    }

    /// Return the quantum type of a vertex.
    pub fn qtype(&self, v: VertId) -> ZXResult<Option<QuantumType>> {
        self.generator(v).map(|g| g.qtype())
    }

    /// Return the properties of a wire.
    pub fn wire_props(&self, w: WireId) -> ZXResult<&WireProperties> {
        self.wire(w).map(|d| &d.props)
    }

    /// Replace the properties of a wire.
    pub fn set_wire_props(&mut self, w: WireId, props: WireProperties)
        -> ZXResult<()>
    {
        self.wire_mut(w)?.props = props;
        Ok(())
    }

    /// Set the type of a wire.
    pub fn set_wire_type(&mut self, w: WireId, wire_type: ZXWireType)
        -> ZXResult<()>
    {
        self.wire_mut(w)?.props.wire_type = wire_type;
        Ok(())
    }

    /// Set the quantum type of a wire.
    pub fn set_wire_qtype(&mut self, w: WireId, qtype: QuantumType)
        -> ZXResult<()>
    {
        self.wire_mut(w)?.props.qtype = qtype;
        Ok(())
    }

    /// Return the source vertex of a wire.
    pub fn source(&self, w: WireId) -> ZXResult<VertId> {
        self.wire(w).map(|d| d.source)
    }

    /// Return the target vertex of a wire.
    pub fn target(&self, w: WireId) -> ZXResult<VertId> {
        self.wire(w).map(|d| d.target)
    }

    /// Return the vertex at a particular end of a wire.
    pub fn vertex_at_end(&self, w: WireId, end: WireEnd) -> ZXResult<VertId> {
        self.wire(w)
            .map(|d| match end {
                WireEnd::Source => d.source,
                WireEnd::Target => d.target,
            })
    }

    /// Return the end of `w` opposite to `v`.
    pub fn other_end(&self, w: WireId, v: VertId) -> ZXResult<VertId> {
        let d = self.wire(w)?;
        if d.source == v {
            Ok(d.target)
        } else if d.target == v {
            Ok(d.source)
        } else {
            Err(NotIncident(w, v))
        }
    }

    /// Return which end of `w` lies at `v`.
    ///
    /// Self-loops report [`WireEnd::Source`].
    pub fn end_of(&self, w: WireId, v: VertId) -> ZXResult<WireEnd> {
        let d = self.wire(w)?;
        if d.source == v {
            Ok(WireEnd::Source)
        } else if d.target == v {
            Ok(WireEnd::Target)
        } else {
            Err(NotIncident(w, v))
        }
    }

    /// Return the number of wire ends incident on a vertex.
    ///
    /// Self-loops count twice.
    pub fn degree(&self, v: VertId) -> ZXResult<usize> {
        self.ends_at(v).map(|ends| ends.len())
    }

    /// Return the wires incident on a vertex.
    ///
    /// Self-loops are listed once.
    pub fn adj_wires(&self, v: VertId) -> ZXResult<Vec<WireId>> {
        self.vert(v).map(|vd| vd.wires.clone())
    }

    // every wire end incident on `v`; self-loops appear once per end
    pub(crate) fn ends_at(&self, v: VertId)
        -> ZXResult<Vec<(WireId, WireEnd)>>
    {
        let mut ends: Vec<(WireId, WireEnd)> = Vec::new();
        for w in self.vert(v)?.wires.iter().copied() {
            let d = self.wire(w)?;
            if d.source == v { ends.push((w, WireEnd::Source)); }
            if d.target == v { ends.push((w, WireEnd::Target)); }
        }
        Ok(ends)
    }

    /// Return the neighbours of a vertex, deduplicated, in the order they are
    /// first seen.
    ///
    /// A vertex with a self-loop is its own neighbour.
    pub fn neighbours(&self, v: VertId) -> ZXResult<Vec<VertId>> {
        let mut seen: FxHashSet<VertId> = FxHashSet::default();
        let mut nbs: Vec<VertId> = Vec::new();
        for w in self.vert(v)?.wires.iter().copied() {
            let u = self.other_end(w, v)?;
            if seen.insert(u) { nbs.push(u); }
        }
        Ok(nbs)
    }

    /// Return all wires between two vertices.
    pub fn wires_between(&self, a: VertId, b: VertId) -> ZXResult<Vec<WireId>> {
        self.vert(b)?;
        let mut found: Vec<WireId> = Vec::new();
        for w in self.vert(a)?.wires.iter().copied() {
            if self.other_end(w, a)? == b { found.push(w); }
        }
        Ok(found)
    }

    /// Return the first wire found between two vertices, if any.
    pub fn wire_between(&self, a: VertId, b: VertId)
        -> ZXResult<Option<WireId>>
    {
        self.wires_between(a, b).map(|ws| ws.first().copied())
    }

    // the unique wire end at `v` naming `port`
    pub(crate) fn end_at_port(&self, v: VertId, port: Option<usize>)
        -> ZXResult<(WireId, WireEnd)>
    {
        let mut found: Vec<(WireId, WireEnd)> = Vec::new();
        for (w, end) in self.ends_at(v)?.into_iter() {
            if self.wire(w)?.props.port(end) == port { found.push((w, end)); }
        }
        match found.len() {
            1 => Ok(found[0]),
            n => Err(WireAtPort(v, port, n)),
        }
    }

    /// Return the unique wire attached to `v` at `port`.
    ///
    /// For undirected generators, pass `None`; this only succeeds if the
    /// vertex has exactly one incident wire.
    pub fn wire_at_port(&self, v: VertId, port: Option<usize>)
        -> ZXResult<WireId>
    {
        self.end_at_port(v, port).map(|(w, _)| w)
    }

    /// Return `true` if `v` is a Z- or X-spider whose phase is a multiple of
    /// π.
    pub fn is_pauli_spider(&self, v: VertId) -> bool {
        self.generator(v)
            .is_ok_and(|g| {
                g.ty().is_spider() && g.param().is_some_and(|p| p.is_pauli())
            })
    }

    /// Return `true` if `v` is a Z- or X-spider whose phase is an odd multiple
    /// of π/2.
    pub fn is_proper_clifford_spider(&self, v: VertId) -> bool {
        self.generator(v)
            .is_ok_and(|g| {
                g.ty().is_spider()
                    && g.param().is_some_and(|p| p.is_proper_clifford())
            })
    }

    /// Return all free symbols in the scalar and in every generator.
    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut symbols = self.scalar.free_symbols();
        self.vertices()
            .for_each(|(_, g)| { symbols.extend(g.free_symbols()); });
        symbols
    }

    /// Return `true` if the diagram contains any free symbols.
    pub fn is_symbolic(&self) -> bool { !self.free_symbols().is_empty() }

    /// Substitute values for symbols in the scalar and every generator.
    ///
    /// Never changes the topology of the diagram.
    pub fn symbol_substitution(&mut self, map: &SymbolMap) {
        self.scalar = self.scalar.subs(map);
        for slot in self.verts.iter_mut() {
            if let Some(vd) = slot.data.as_mut() {
                if let Some(new) = vd.gen.symbol_substitution(map) {
                    vd.gen = new;
                }
            }
        }
    }

    /// Return an iterator over all vertices, visited in storage order.
    ///
    /// The iterator item type is `(`[`VertId`]`, &`[`Generator`]`)`.
    pub fn vertices(&self) -> Vertices<'_> {
        Vertices { len: self.vert_count, iter: self.verts.iter().enumerate() }
    }

    /// Return an iterator over all wires, visited in storage order.
    ///
    /// The iterator item type is `(`[`WireId`]`, `[`VertId`]`, `[`VertId`]`,
    /// &`[`WireProperties`]`)`, with source before target.
    pub fn wires(&self) -> Wires<'_> {
        Wires { len: self.wire_count, iter: self.wires.iter().enumerate() }
    }

    /// Check the structural invariants of the diagram, failing on the first
    /// violation found.
    ///
    /// - Every boundary-typed vertex has degree 1 and is listed exactly once
    ///   in the boundary, and every listed vertex is boundary-typed.
    /// - Every port of a directed generator has exactly one wire, and
    ///   undirected generators have no ported wires.
    /// - Both endpoints of every wire accept it through
    ///   [`Generator::valid_edge`].
    /// - The nested diagrams of all boxes are themselves valid.
    pub fn check_validity(&self) -> ZXResult<()> {
        for (v, g) in self.vertices() {
            let ends = self.ends_at(v)?;
            if g.ty().is_boundary() {
                (ends.len() == 1).then_some(())
                    .ok_or(BoundaryDegree(v, ends.len()))?;
                let listed = self.boundary.iter().filter(|b| **b == v).count();
                (listed == 1).then_some(())
                    .ok_or(BoundaryListing(v, listed))?;
            }
            if let Some(n) = g.n_ports() {
                let mut seen = vec![false; n];
                for (w, end) in ends.iter().copied() {
                    let port = self.wire(w)?.props.port(end);
                    match port {
                        Some(p) if p < n => {
                            (!seen[p]).then_some(())
                                .ok_or(DuplicatePort(v, p))?;
                            seen[p] = true;
                        },
                        _ => { return Err(InvalidPort(w, v, port)); },
                    }
                }
                if let Some(p) = seen.iter().position(|s| !s) {
                    return Err(MissingPort(v, p));
                }
            } else {
                for (w, end) in ends.iter().copied() {
                    let port = self.wire(w)?.props.port(end);
                    port.is_none().then_some(())
                        .ok_or(InvalidPort(w, v, port))?;
                }
            }
            for (w, end) in ends.iter().copied() {
                let props = &self.wire(w)?.props;
                g.valid_edge(props.port(end), props.qtype).then_some(())
                    .ok_or(InvalidEdge(w, v))?;
            }
            if let Some(inner) = g.diagram() {
                inner.check_validity()
                    .map_err(|e| NestedDiagram(v, Box::new(e)))?;
            }
        }
        for b in self.boundary.iter().copied() {
            self.generator(b)?.ty().is_boundary().then_some(())
                .ok_or(NotBoundary(b))?;
        }
        Ok(())
    }

    // `true` if every wire is Basic exactly when it touches a boundary
    fn boundary_wires_basic(&self) -> bool {
        self.wires()
            .all(|(_, s, t, props)| {
                let touches_boundary =
                    [s, t].into_iter()
                    .any(|v| self.zxtype(v).is_ok_and(|ty| ty.is_boundary()));
                (props.wire_type == ZXWireType::Basic) == touches_boundary
            })
    }

    /// Return `true` if the diagram contains only Z-spiders and boundaries,
    /// with Basic wires exactly at the boundary and Hadamard wires elsewhere.
    pub fn is_graphlike(&self) -> bool {
        self.vertices()
            .all(|(_, g)| g.ty() == ZXType::ZSpider || g.ty().is_boundary())
            && self.boundary_wires_basic()
    }

    /// Return `true` if the diagram contains only MBQC generators and
    /// boundaries, with Basic wires exactly at the boundary, Hadamard wires
    /// elsewhere, and every wire `Quantum`.
    pub fn is_mbqc(&self) -> bool {
        self.vertices()
            .all(|(_, g)| g.ty().is_mbqc() || g.ty().is_boundary())
            && self.wires()
                .all(|(_, _, _, props)| props.qtype == QuantumType::Quantum)
            && self.boundary_wires_basic()
    }

    /// Copy every vertex and wire of `other` into `self`, returning the map
    /// from IDs in `other` to the new IDs in `self`.
    ///
    /// If `merge_boundaries` is `true`, the copies of `other`'s boundary
    /// vertices are appended to the boundary of `self` in `other`'s order;
    /// otherwise they are left unlisted. The scalar of `self` is unchanged.
    pub fn copy_graph(&mut self, other: &ZXDiagram, merge_boundaries: bool)
        -> FxHashMap<VertId, VertId>
    {
        let mut map: FxHashMap<VertId, VertId> = FxHashMap::default();
        for (v, g) in other.vertices() {
            map.insert(v, self.add_vertex_unlisted(g.clone()));
        }
        for (_, s, t, props) in other.wires() {
            if let (Some(&a), Some(&b)) = (map.get(&s), map.get(&t)) {
                let w = self.fresh_wire(
                    WireData { source: a, target: b, props: props.clone() });
                if let Ok(vd) = self.vert_mut(a) { vd.wires.push(w); }
                if a != b {
                    if let Ok(vd) = self.vert_mut(b) { vd.wires.push(w); }
                }
            }
        }
        if merge_boundaries {
            self.boundary.extend(
                other.boundary.iter().filter_map(|b| map.get(b).copied()));
        }
        map
    }
}

/// Iterator over all vertices in a diagram, visited in storage order.
///
/// The iterator item type is `(`[`VertId`]`, &`[`Generator`]`)`.
#[derive(Clone, Debug)]
pub struct Vertices<'a> {
    len: usize,
    iter: std::iter::Enumerate<std::slice::Iter<'a, Slot<VertData>>>,
}

impl<'a> Iterator for Vertices<'a> {
    type Item = (VertId, &'a Generator);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.find_map(|(idx, slot)| {
            slot.data.as_ref()
                .map(|vd| {
                    self.len = self.len.saturating_sub(1);
                    (VertId { idx, gen: slot.gen }, &vd.gen)
                })
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.len, Some(self.len)) }
}

impl<'a> ExactSizeIterator for Vertices<'a> {
    fn len(&self) -> usize { self.len }
}

impl<'a> std::iter::FusedIterator for Vertices<'a> { }

/// Iterator over all wires in a diagram, visited in storage order.
///
/// The iterator item type is `(`[`WireId`]`, `[`VertId`]`, `[`VertId`]`,
/// &`[`WireProperties`]`)`.
#[derive(Clone, Debug)]
pub struct Wires<'a> {
    len: usize,
    iter: std::iter::Enumerate<std::slice::Iter<'a, Slot<WireData>>>,
}

impl<'a> Iterator for Wires<'a> {
    type Item = (WireId, VertId, VertId, &'a WireProperties);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.find_map(|(idx, slot)| {
            slot.data.as_ref()
                .map(|d| {
                    self.len = self.len.saturating_sub(1);
                    (WireId { idx, gen: slot.gen }, d.source, d.target, &d.props)
                })
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.len, Some(self.len)) }
}

impl<'a> ExactSizeIterator for Wires<'a> {
    fn len(&self) -> usize { self.len }
}

impl<'a> std::iter::FusedIterator for Wires<'a> { }

#[cfg(test)]
mod test {
    use num_traits::Zero;
    use super::*;
    use QuantumType::*;
    use ZXWireType::*;

    fn z() -> Generator { Generator::z_spider(Expr::zero(), Quantum) }

    #[test]
    fn build_and_query() -> anyhow::Result<()> {
        let mut dg = ZXDiagram::with_boundary(1, 1, 0, 0);
        let [i, o]: [VertId; 2] =
            dg.boundary(None, None).try_into().map_err(|_| anyhow::anyhow!("boundary"))?;
        assert_eq!(dg.boundary(Some(ZXType::Input), None), vec![i]);
        assert_eq!(dg.boundary(Some(ZXType::Output), Some(Quantum)), vec![o]);
        assert!(dg.boundary(None, Some(Classical)).is_empty());

        let a = dg.add_vertex(z());
        let b = dg.add_vertex(Generator::x_spider(Expr::ratio(1, 2), Quantum));
        let w0 = dg.add_wire(i, a, Basic, Quantum)?;
        let w1 = dg.add_wire(a, b, H, Quantum)?;
        let w2 = dg.add_wire(a, b, Basic, Quantum)?;
        let w3 = dg.add_wire(b, b, H, Quantum)?;
        dg.add_wire(b, o, Basic, Quantum)?;

        assert_eq!(dg.n_vertices(), 4);
        assert_eq!(dg.n_wires(), 5);
        assert_eq!(dg.count_wires(H), 2);
        assert_eq!(dg.count_vertices(ZXType::ZSpider), 1);
        assert_eq!(dg.count_vertices_q(ZXType::XSpider, Classical), 0);
        assert_eq!(dg.degree(a)?, 3);
        assert_eq!(dg.degree(b)?, 5);
        assert_eq!(dg.neighbours(a)?, vec![i, b]);
        assert_eq!(dg.neighbours(b)?, vec![a, b, o]);
        assert_eq!(dg.adj_wires(b)?.len(), 4);
        assert_eq!(dg.wires_between(a, b)?, vec![w1, w2]);
        assert_eq!(dg.wire_between(b, a)?, Some(w1));
        assert_eq!(dg.wire_between(i, o)?, None);
        assert_eq!(dg.other_end(w0, i)?, a);
        assert_eq!(dg.end_of(w0, a)?, WireEnd::Target);
        assert_eq!(dg.end_of(w3, b)?, WireEnd::Source);
        assert_eq!(dg.wire_at_port(i, None)?, w0);
        assert!(dg.wire_at_port(a, None).is_err());
        assert!(dg.check_validity().is_ok());
        Ok(())
    }

    #[test]
    fn stale_handles() -> anyhow::Result<()> {
        let mut dg = ZXDiagram::new();
        let a = dg.add_vertex(z());
        let b = dg.add_vertex(z());
        let w = dg.add_wire(a, b, Basic, Quantum)?;
        dg.remove_vertex(a)?;
        assert_eq!(dg.n_vertices(), 1);
        assert_eq!(dg.n_wires(), 0);
        assert!(matches!(dg.generator(a), Err(ZXError::MissingVertex(_))));
        assert!(matches!(dg.wire_props(w), Err(ZXError::MissingWire(_))));
        assert!(dg.adj_wires(b)?.is_empty());
        // slot reuse must not revive the old handle
        let c = dg.add_vertex(z());
        assert_eq!(c.index(), a.index());
        assert_ne!(c, a);
        assert!(dg.generator(a).is_err());
        assert!(dg.remove_vertex(a).is_err());
        Ok(())
    }

    #[test]
    fn remove_between() -> anyhow::Result<()> {
        let mut dg = ZXDiagram::new();
        let a = dg.add_vertex(Generator::triangle(Quantum));
        let b = dg.add_vertex(z());
        let props = WireProperties::with_ports(Basic, Quantum, Some(1), None);
        dg.add_wire_props(a, b, props.clone())?;
        let rev = props.reversed();
        assert!(dg.remove_wire_between(b, a, &rev, WireSearch::Directed).is_err());
        dg.remove_wire_between(b, a, &rev, WireSearch::Undirected)?;
        assert_eq!(dg.n_wires(), 0);
        Ok(())
    }

    #[test]
    fn validity() -> anyhow::Result<()> {
        // boundary degree
        let mut dg = ZXDiagram::with_boundary(1, 0, 0, 0);
        assert!(matches!(dg.check_validity(), Err(ZXError::BoundaryDegree(_, 0))));
        let i = dg.boundary[0];
        let t = dg.add_vertex(Generator::triangle(Quantum));
        dg.add_wire_props(
            i, t, WireProperties::with_ports(Basic, Quantum, None, Some(0)))?;
        assert!(matches!(dg.check_validity(), Err(ZXError::MissingPort(_, 1))));
        let s = dg.add_vertex(z());
        let w = dg.add_wire_props(
            t, s, WireProperties::with_ports(Basic, Quantum, Some(1), None))?;
        assert!(dg.check_validity().is_ok());
        let w2 = dg.add_wire_props(
            t, s, WireProperties::with_ports(Basic, Quantum, Some(1), None))?;
        assert!(matches!(dg.check_validity(), Err(ZXError::DuplicatePort(_, 1))));
        dg.remove_wire(w2)?;
        let w3 = dg.add_wire(s, s, Basic, Quantum)?;
        assert!(dg.check_validity().is_ok());
        dg.set_wire_qtype(w3, Classical)?;
        assert!(matches!(dg.check_validity(), Err(ZXError::InvalidEdge(..))));
        dg.remove_wire(w3)?;
        dg.set_wire_props(w, WireProperties::with_ports(Basic, Quantum, Some(1), Some(0)))?;
        assert!(matches!(dg.check_validity(), Err(ZXError::InvalidPort(..))));
        Ok(())
    }

    #[test]
    fn nested_validity() -> anyhow::Result<()> {
        let inner = ZXDiagram::with_boundary(1, 0, 0, 0);
        let mut dg = ZXDiagram::new();
        dg.add_vertex(Generator::new_box(inner));
        // box with one port left unconnected
        assert!(matches!(dg.check_validity(), Err(ZXError::MissingPort(_, 0))));
        let mut dg = ZXDiagram::new();
        let mut inner = ZXDiagram::new();
        inner.add_vertex(Generator::input(Quantum));
        inner.boundary.clear();
        dg.add_vertex(Generator::new_box(inner));
        assert!(matches!(dg.check_validity(), Err(ZXError::NestedDiagram(..))));
        Ok(())
    }

    #[test]
    fn predicates() -> anyhow::Result<()> {
        let mut dg = ZXDiagram::with_boundary(1, 1, 0, 0);
        let (i, o) = (dg.boundary[0], dg.boundary[1]);
        let a = dg.add_vertex(z());
        let b = dg.add_vertex(Generator::z_spider(Expr::ratio(1, 2), Quantum));
        dg.add_wire(i, a, Basic, Quantum)?;
        let w = dg.add_wire(a, b, H, Quantum)?;
        dg.add_wire(b, o, Basic, Quantum)?;
        assert!(dg.is_graphlike());
        assert!(!dg.is_mbqc());
        assert!(dg.is_pauli_spider(a));
        assert!(dg.is_proper_clifford_spider(b));
        assert!(!dg.is_pauli_spider(b));
        dg.set_wire_type(w, Basic)?;
        assert!(!dg.is_graphlike());
        dg.set_wire_type(w, H)?;
        dg.set_generator(a, Generator::new(ZXType::PX, Quantum)?)?;
        dg.set_generator(b, Generator::new(ZXType::XY, Quantum)?)?;
        assert!(dg.is_mbqc());
        assert!(!dg.is_graphlike());
        Ok(())
    }

    #[test]
    fn copy_and_substitute_symbols() -> anyhow::Result<()> {
        let mut src = ZXDiagram::with_boundary(1, 0, 0, 0);
        let s = src.add_vertex(Generator::z_spider(Expr::symbol("a"), Quantum));
        src.add_wire(src.boundary[0], s, Basic, Quantum)?;
        src.multiply_scalar(&Expr::symbol("b"));

        let mut dst = ZXDiagram::new();
        let map = dst.copy_graph(&src, false);
        assert_eq!(map.len(), 2);
        assert_eq!(dst.n_wires(), 1);
        assert!(dst.boundary(None, None).is_empty());
        dst.copy_graph(&src, true);
        assert_eq!(dst.boundary(None, None).len(), 1);
        assert_eq!(dst.n_vertices(), 4);

        assert_eq!(src.free_symbols().len(), 2);
        let mut map = SymbolMap::default();
        map.insert(Symbol::new("a"), Expr::ratio(1, 4));
        map.insert(Symbol::new("b"), Expr::from(2));
        src.symbol_substitution(&map);
        assert!(!src.is_symbolic());
        assert_eq!(src.scalar(), &Expr::from(2));
        assert_eq!(src.generator(s)?.param(), Some(&Expr::ratio(1, 4)));
        assert_eq!(src.n_wires(), 1);
        Ok(())
    }
}
