//! Measurement-correction structure of diagrams in MBQC form.
//!
//! A [`Flow`] assigns to each measured vertex `u` a *correction set* `c(u)`
//! and a *depth* `d(u)`. Firing the stabilizers of `c(u)` applies X to every
//! vertex of `c(u)` and Z to every vertex of its odd neighbourhood, and must
//! leave every vertex measured before `u` undisturbed. Outputs sit at depth 0
//! and larger depths are measured earlier.
//!
//! Only diagrams satisfying [`ZXDiagram::is_mbqc`] are accepted.

use ndarray::{ self as nd, s };
use rustc_hash::{ FxHashMap, FxHashSet };
use tracing::trace;
use crate::graph::{ VertId, ZXDiagram, ZXError, ZXResult, ZXType };
use ZXType::*;

const LOG_TARGET: &str = "zx_rewrite::flow";

/// Correction sets and a partial order on the vertices of an MBQC diagram.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Flow {
    c: FxHashMap<VertId, Vec<VertId>>,
    d: FxHashMap<VertId, usize>,
}

// the vertices adjacent to the boundaries of type `ty`
fn boundary_neighbours(dg: &ZXDiagram, ty: ZXType)
    -> ZXResult<FxHashSet<VertId>>
{
    let mut acc: FxHashSet<VertId> = FxHashSet::default();
    for b in dg.boundary(Some(ty), None).into_iter() {
        let n = dg.neighbours(b)?.first().copied()
            .ok_or(ZXError::BoundaryDegree(b, 0))?;
        acc.insert(n);
    }
    Ok(acc)
}

// elements occurring an odd number of times, in order of first occurrence
fn odd_occurrences<I>(items: I) -> Vec<VertId>
where I: IntoIterator<Item = VertId>
{
    let mut order: Vec<VertId> = Vec::new();
    let mut count: FxHashMap<VertId, usize> = FxHashMap::default();
    for v in items.into_iter() {
        let k = count.entry(v).or_insert(0);
        if *k == 0 { order.push(v); }
        *k += 1;
    }
    order.into_iter().filter(|v| count[v] % 2 == 1).collect()
}

// reduced row echelon form over GF(2), choosing pivots only among the first
// `n_piv` columns but applying row operations to all of them; returns the
// pivot column of each row
fn gauss_jordan(mat: &mut nd::Array2<bool>, n_piv: usize) -> Vec<Option<usize>> {
    let (n_rows, n_cols) = mat.dim();
    let mut pivots: Vec<Option<usize>> = vec![None; n_rows];
    let mut r: usize = 0;
    for col in 0..n_piv.min(n_cols) {
        if r == n_rows { break; }
        let Some(p) = (r..n_rows).find(|i| mat[[*i, col]]) else { continue; };
        if p != r {
            for j in 0..n_cols { mat.swap([p, j], [r, j]); }
        }
        for i in 0..n_rows {
            if i == r || !mat[[i, col]] { continue; }
            for j in col..n_cols {
                let x = mat[[r, j]];
                mat[[i, j]] ^= x;
            }
        }
        pivots[r] = Some(col);
        r += 1;
    }
    pivots
}

// adjacency of `correctors` into the `preserve` rows followed by the `ys`
// rows; a Y vertex also sees itself when it is a corrector
fn corrector_matrix(
    dg: &ZXDiagram,
    correctors: &[VertId],
    preserve: &FxHashMap<VertId, usize>,
    ys: &FxHashMap<VertId, usize>,
    extra_cols: usize,
) -> ZXResult<nd::Array2<bool>>
{
    let n_pres = preserve.len();
    let mut mat: nd::Array2<bool>
        = nd::Array2::from_elem(
            (n_pres + ys.len(), correctors.len() + extra_cols), false);
    for (col, v) in correctors.iter().enumerate() {
        for n in dg.neighbours(*v)?.into_iter() {
            if let Some(row) = preserve.get(&n) {
                mat[[*row, col]] = true;
            } else if let Some(row) = ys.get(&n) {
                mat[[n_pres + *row, col]] = true;
            }
        }
        if let Some(row) = ys.get(v) { mat[[n_pres + *row, col]] = true; }
    }
    Ok(mat)
}

impl Flow {
    /// Create a new flow from correction sets and depths.
    pub fn new(
        c: FxHashMap<VertId, Vec<VertId>>,
        d: FxHashMap<VertId, usize>,
    ) -> Self
    {
        Self { c, d }
    }

    /// Return the correction set of a vertex.
    pub fn c(&self, v: VertId) -> ZXResult<&[VertId]> {
        self.c.get(&v)
            .map(|c| c.as_slice())
            .ok_or(ZXError::Flow(Some(v), "no correction set"))
    }

    /// Return the depth of a vertex.
    pub fn d(&self, v: VertId) -> ZXResult<usize> {
        self.d.get(&v).copied()
            .ok_or(ZXError::Flow(Some(v), "no depth"))
    }

    /// Return the vertices adjacent to an odd number of members of `c(v)`,
    /// ignoring outputs.
    pub fn odd(&self, v: VertId, dg: &ZXDiagram) -> ZXResult<Vec<VertId>> {
        let mut nbs: Vec<VertId> = Vec::new();
        for u in self.c(v)?.iter() {
            for n in dg.neighbours(*u)?.into_iter() {
                if dg.zxtype(n)? != Output { nbs.push(n); }
            }
        }
        Ok(odd_occurrences(nbs))
    }

    /// Check that `self` is a valid Pauli flow for `dg`, failing on the first
    /// violated condition.
    ///
    /// For every measured vertex `u` not adjacent to an output:
    /// - no vertex in the past of `u` receives an X correction unless it is
    ///   measured in the X or Y basis, and a Y vertex receiving only one of X
    ///   or Z is forbidden;
    /// - likewise for Z corrections with the Y and Z bases;
    /// - `u` itself is corrected as its measurement plane requires.
    pub fn verify(&self, dg: &ZXDiagram) -> ZXResult<()> {
        if !dg.is_mbqc() { return Err(ZXError::NotMBQC); }
        let outputs = boundary_neighbours(dg, Output)?;
        for (u, gen) in dg.vertices() {
            let ty = gen.ty();
            if ty.is_boundary() || outputs.contains(&u) { continue; }
            let uc = self.c(u)?;
            let uodd = self.odd(u, dg)?;
            let du = self.d(u)?;
            for v in uc.iter().copied() {
                let vt = dg.zxtype(v)?;
                if v == u || vt.is_boundary() { continue; }
                let past = du <= self.d(v)?;
                if past && !matches!(vt, PX | PY) {
                    return Err(ZXError::Flow(
                        Some(u), "a vertex in the past receives an X correction"));
                }
                if past && vt == PY && !uodd.contains(&v) {
                    return Err(ZXError::Flow(
                        Some(u), "a past Y vertex receives an X correction"));
                }
            }
            for v in uodd.iter().copied() {
                let vt = dg.zxtype(v)?;
                if v == u || vt.is_boundary() { continue; }
                let past = du <= self.d(v)?;
                if past && !matches!(vt, PY | PZ) {
                    return Err(ZXError::Flow(
                        Some(u), "a vertex in the past receives a Z correction"));
                }
                if past && vt == PY && !uc.contains(&v) {
                    return Err(ZXError::Flow(
                        Some(u), "a past Y vertex receives a Z correction"));
                }
            }
            let self_x = uc.contains(&u);
            let self_z = uodd.contains(&u);
            let (ok, msg) = match ty {
                XY => (!self_x && self_z, "XY vertex must be corrected with a Z"),
                XZ => (self_x && self_z, "XZ vertex must be corrected with a Y"),
                YZ => (self_x && !self_z, "YZ vertex must be corrected with an X"),
                PX => (self_z, "PX vertex must be corrected with a Y or Z"),
                PY => (self_x != self_z, "PY vertex must be corrected with an X or Z"),
                PZ => (self_x, "PZ vertex must be corrected with an X or Y"),
                _ => (false, "vertex is not an MBQC measurement"),
            };
            if !ok { return Err(ZXError::Flow(Some(u), msg)); }
        }
        Ok(())
    }

    /// Rewrite the correction sets so that each one only disturbs vertices
    /// already measured in a compatible basis.
    ///
    /// Vertices are processed in order of increasing depth, each correction
    /// set being multiplied by the (already focussed) correction sets of the
    /// members it would otherwise disturb.
    pub fn focus(&mut self, dg: &ZXDiagram) -> ZXResult<()> {
        if !dg.is_mbqc() { return Err(ZXError::NotMBQC); }
        let outputs = boundary_neighbours(dg, Output)?;
        let mut order: Vec<(usize, VertId)>
            = self.d.iter().map(|(v, d)| (*d, *v)).collect();
        order.sort();
        for (_, u) in order.into_iter() {
            if outputs.contains(&u) { continue; }
            let uc: Vec<VertId> = self.c(u)?.to_vec();
            let uodd = self.odd(u, dg)?;
            let mut acc: Vec<VertId> = uc.clone();
            for v in uc.iter().copied() {
                if v == u { continue; }
                let vt = dg.zxtype(v)?;
                if vt.is_boundary() { continue; }
                if !matches!(vt, XY | PX | PY)
                    || (vt == PY && !uodd.contains(&v))
                {
                    acc.extend(self.c(v)?.iter().copied());
                }
            }
            for v in uodd.iter().copied() {
                if v == u { continue; }
                let vt = dg.zxtype(v)?;
                if vt.is_boundary() { continue; }
                if (!outputs.contains(&v) && !matches!(vt, XZ | YZ | PY | PZ))
                    || (vt == PY && !uc.contains(&v))
                {
                    acc.extend(self.c(v)?.iter().copied());
                }
            }
            self.c.insert(u, odd_occurrences(acc));
        }
        Ok(())
    }

    /// Find a causal flow, in which every correction set is a single vertex.
    ///
    /// Fails if a measured vertex not adjacent to an output lies outside the
    /// XY plane, or if no causal flow exists.
    pub fn identify_causal_flow(dg: &ZXDiagram) -> ZXResult<Self> {
        if !dg.is_mbqc() { return Err(ZXError::NotMBQC); }
        let inputs = boundary_neighbours(dg, Input)?;
        let outputs = boundary_neighbours(dg, Output)?;
        for (v, gen) in dg.vertices() {
            let ty = gen.ty();
            if !ty.is_boundary() && !outputs.contains(&v) && ty != XY {
                return Err(ZXError::Flow(
                    Some(v), "causal flow requires XY measurements"));
            }
        }

        let mut fl = Self::default();
        let mut solved: FxHashSet<VertId> = FxHashSet::default();
        // number of unsolved neighbours, for solved vertices only
        let mut past: FxHashMap<VertId, usize> = FxHashMap::default();
        let mut correctors: Vec<VertId> = Vec::new();
        for o in dg.boundary(Some(Output), None).into_iter() {
            let n = dg.neighbours(o)?.first().copied()
                .ok_or(ZXError::BoundaryDegree(o, 0))?;
            past.insert(n, dg.degree(n)? - 1);
            solved.insert(o);
            solved.insert(n);
            fl.c.insert(n, Vec::new());
            fl.d.insert(n, 0);
            if !inputs.contains(&n) && !correctors.contains(&n) {
                correctors.push(n);
            }
        }

        let mut depth: usize = 1;
        while !correctors.is_empty() {
            let mut new_correctors: Vec<VertId> = Vec::new();
            for v in correctors.into_iter() {
                let unsolved: Vec<VertId>
                    = dg.neighbours(v)?.into_iter()
                    .filter(|n| !solved.contains(n))
                    .collect();
                let &[u] = unsolved.as_slice() else { continue; };
                fl.c.insert(u, vec![v]);
                fl.d.insert(u, depth);
                solved.insert(u);
                trace!(target: LOG_TARGET, %u, %v, depth, "causal correction");

                let mut n_unsolved: usize = 0;
                let mut is_input = false;
                for un in dg.neighbours(u)?.into_iter() {
                    if dg.zxtype(un)? == Input {
                        is_input = true;
                        solved.insert(un);
                        continue;
                    }
                    if !solved.contains(&un) { n_unsolved += 1; }
                    if let Some(k) = past.get_mut(&un) {
                        if *k > 0 {
                            *k -= 1;
                            if *k == 1 && !new_correctors.contains(&un) {
                                new_correctors.push(un);
                            }
                        }
                    }
                }
                if !is_input {
                    past.insert(u, n_unsolved);
                    if n_unsolved == 1 && !new_correctors.contains(&u) {
                        new_correctors.push(u);
                    }
                }
            }
            correctors = new_correctors;
            depth += 1;
        }

        for (v, gen) in dg.vertices() {
            if !gen.ty().is_boundary() && !solved.contains(&v) {
                return Err(ZXError::Flow(Some(v), "no causal flow"));
            }
        }
        Ok(fl)
    }

    /// Find a Pauli flow of maximal delayedness.
    ///
    /// Each round solves, for every unsolved vertex at once, the linear system
    /// over GF(2) whose unknowns are the already-solved correctors; vertices
    /// solved in round `k` get depth `k`.
    pub fn identify_pauli_flow(dg: &ZXDiagram) -> ZXResult<Self> {
        if !dg.is_mbqc() { return Err(ZXError::NotMBQC); }
        let inputs = Self::checked_inputs(dg)?;

        let mut fl = Self::default();
        let mut solved: FxHashSet<VertId> = FxHashSet::default();
        let mut correctors: Vec<VertId> = Vec::new();
        for (v, gen) in dg.vertices() {
            match gen.ty() {
                Output => {
                    let n = dg.neighbours(v)?.first().copied()
                        .ok_or(ZXError::BoundaryDegree(v, 0))?;
                    solved.insert(v);
                    if dg.zxtype(n)? != Input {
                        solved.insert(n);
                        fl.c.insert(n, Vec::new());
                        fl.d.insert(n, 0);
                    }
                },
                PX | PY if !inputs.contains(&v) => { correctors.push(v); },
                _ => { },
            }
        }

        let mut depth: usize = 1;
        loop {
            let mut to_solve: Vec<VertId> = Vec::new();
            let mut preserve: FxHashMap<VertId, usize> = FxHashMap::default();
            let mut ys: FxHashMap<VertId, usize> = FxHashMap::default();
            for (v, gen) in dg.vertices() {
                let ty = gen.ty();
                if solved.contains(&v) || ty == Input { continue; }
                to_solve.push(v);
                match ty {
                    PY => { ys.insert(v, ys.len()); },
                    PZ => { },
                    _ => { preserve.insert(v, preserve.len()); },
                }
            }
            let new = Self::solve_correctors(
                dg, &correctors, &preserve, &to_solve, &ys)?;
            trace!(
                target: LOG_TARGET,
                depth,
                unsolved = to_solve.len(),
                solved = new.len(),
                "pauli flow round",
            );
            if new.is_empty() { break; }
            for (v, cv) in new.into_iter() {
                fl.c.insert(v, cv);
                fl.d.insert(v, depth);
                solved.insert(v);
                if !inputs.contains(&v) { correctors.push(v); }
            }
            depth += 1;
        }

        for (v, gen) in dg.vertices() {
            if gen.ty() != Input && !solved.contains(&v) {
                return Err(ZXError::Flow(Some(v), "no Pauli flow"));
            }
        }
        Ok(fl)
    }

    // neighbours of inputs, which must be correctable
    fn checked_inputs(dg: &ZXDiagram) -> ZXResult<FxHashSet<VertId>> {
        let inputs = boundary_neighbours(dg, Input)?;
        for v in inputs.iter().copied() {
            if matches!(dg.zxtype(v)?, XZ | YZ | PY) {
                return Err(ZXError::Flow(
                    Some(v), "inputs measured in XZ, YZ, or Y are uncorrectable"));
            }
        }
        Ok(inputs)
    }

    // correction sets for the members of `to_solve` expressible through
    // `correctors`
    fn solve_correctors(
        dg: &ZXDiagram,
        correctors: &[VertId],
        preserve: &FxHashMap<VertId, usize>,
        to_solve: &[VertId],
        ys: &FxHashMap<VertId, usize>,
    ) -> ZXResult<Vec<(VertId, Vec<VertId>)>>
    {
        let n_cor = correctors.len();
        let n_pres = preserve.len();
        let mut mat = corrector_matrix(dg, correctors, preserve, ys, to_solve.len())?;
        for (i, v) in to_solve.iter().copied().enumerate() {
            let col = n_cor + i;
            let ty = dg.zxtype(v)?;
            if matches!(ty, XY | PX | XZ) {
                let row = preserve.get(&v)
                    .ok_or(ZXError::Flow(Some(v), "unpreserved vertex"))?;
                mat[[*row, col]] = true;
            }
            match ty {
                XY | PX => { },
                XZ | YZ | PZ => {
                    for n in dg.neighbours(v)?.into_iter() {
                        if let Some(row) = preserve.get(&n) {
                            mat[[*row, col]] = true;
                        } else if let Some(row) = ys.get(&n) {
                            mat[[n_pres + *row, col]] = true;
                        }
                    }
                },
                PY => {
                    let row = ys.get(&v)
                        .ok_or(ZXError::Flow(Some(v), "unpreserved vertex"))?;
                    mat[[n_pres + *row, col]] = true;
                },
                _ => {
                    return Err(ZXError::Flow(Some(v), "non-MBQC vertex"));
                },
            }
        }

        let pivots = gauss_jordan(&mut mat, n_cor);
        let mut solved: Vec<(VertId, Vec<VertId>)> = Vec::new();
        'to_solve: for (i, v) in to_solve.iter().copied().enumerate() {
            let mut cv: Vec<VertId> = Vec::new();
            let rhs = mat.slice(s![.., n_cor + i]);
            for (row, b) in rhs.iter().enumerate() {
                if !*b { continue; }
                let Some(p) = pivots[row] else { continue 'to_solve; };
                cv.push(correctors[p]);
            }
            if matches!(dg.zxtype(v)?, XZ | YZ | PZ) { cv.push(v); }
            solved.push((v, cv));
        }
        Ok(solved)
    }

    /// Return a basis of the focussed sets of `dg`: sets of correctors whose
    /// combined correction disturbs no measured vertex.
    ///
    /// Each set is sorted.
    pub fn identify_focussed_sets(dg: &ZXDiagram) -> ZXResult<Vec<Vec<VertId>>> {
        if !dg.is_mbqc() { return Err(ZXError::NotMBQC); }
        let inputs = Self::checked_inputs(dg)?;
        let outputs = boundary_neighbours(dg, Output)?;

        let mut correctors: Vec<VertId> = Vec::new();
        let mut preserve: FxHashMap<VertId, usize> = FxHashMap::default();
        let mut ys: FxHashMap<VertId, usize> = FxHashMap::default();
        for (v, gen) in dg.vertices() {
            match gen.ty() {
                XY => { preserve.insert(v, preserve.len()); },
                // unmeasured outputs also carry PX
                PX if !outputs.contains(&v) => {
                    preserve.insert(v, preserve.len());
                },
                PX => { },
                PY => { ys.insert(v, ys.len()); },
                _ => { continue; },
            }
            if !inputs.contains(&v) { correctors.push(v); }
        }

        let mut mat = corrector_matrix(dg, &correctors, &preserve, &ys, 0)?;
        let pivots = gauss_jordan(&mut mat, correctors.len());
        let pivot_cols: FxHashSet<usize> = pivots.iter().flatten().copied().collect();
        let mut focussed: Vec<Vec<VertId>> = Vec::new();
        for (col, v) in correctors.iter().copied().enumerate() {
            if pivot_cols.contains(&col) { continue; }
            let mut fset: Vec<VertId> = vec![v];
            for (row, b) in mat.slice(s![.., col]).iter().enumerate() {
                if !*b { continue; }
                if let Some(p) = pivots[row] { fset.push(correctors[p]); }
            }
            fset.sort();
            focussed.push(fset);
        }
        focussed.sort();
        Ok(focussed)
    }
}

#[cfg(test)]
mod test {
    use crate::{
        expr::Expr,
        graph::{ Generator, QuantumType::Quantum, ZXWireType::* },
    };
    use super::*;

    fn xy(num: i64, den: i64) -> Generator {
        Generator::phased(XY, Expr::ratio(num, den), Quantum)
    }

    fn px() -> Generator { Generator::clifford(PX, false, Quantum) }

    // Input - v1 - v2 - v3 - Output, with v3 in PX
    fn chain() -> anyhow::Result<(ZXDiagram, [VertId; 3])> {
        let mut dg = ZXDiagram::with_boundary(1, 1, 0, 0);
        let (i, o) = (dg.boundary[0], dg.boundary[1]);
        let v1 = dg.add_vertex(xy(1, 4));
        let v2 = dg.add_vertex(xy(1, 8));
        let v3 = dg.add_vertex(px());
        dg.add_wire(i, v1, Basic, Quantum)?;
        dg.add_wire(v1, v2, H, Quantum)?;
        dg.add_wire(v2, v3, H, Quantum)?;
        dg.add_wire(v3, o, Basic, Quantum)?;
        Ok((dg, [v1, v2, v3]))
    }

    #[test]
    fn causal_chain() -> anyhow::Result<()> {
        let (dg, [v1, v2, v3]) = chain()?;
        let fl = Flow::identify_causal_flow(&dg)?;
        assert_eq!(fl.c(v1)?, &[v2]);
        assert_eq!(fl.c(v2)?, &[v3]);
        assert!(fl.c(v3)?.is_empty());
        assert_eq!((fl.d(v1)?, fl.d(v2)?, fl.d(v3)?), (2, 1, 0));
        assert_eq!(fl.odd(v1, &dg)?, vec![v1, v3]);
        assert!(fl.verify(&dg).is_ok());
        Ok(())
    }

    #[test]
    fn pauli_chain() -> anyhow::Result<()> {
        let (dg, [v1, v2, v3]) = chain()?;
        let fl = Flow::identify_pauli_flow(&dg)?;
        assert_eq!(fl.c(v1)?, &[v2]);
        assert_eq!(fl.c(v2)?, &[v3]);
        assert_eq!((fl.d(v1)?, fl.d(v2)?, fl.d(v3)?), (2, 1, 0));
        assert!(fl.verify(&dg).is_ok());
        Ok(())
    }

    #[test]
    fn pauli_plane_corrections() -> anyhow::Result<()> {
        // Input - a(XY) - o(PX) - Output, with a YZ leaf b on o
        let mut dg = ZXDiagram::with_boundary(1, 1, 0, 0);
        let (i, out) = (dg.boundary[0], dg.boundary[1]);
        let a = dg.add_vertex(xy(1, 4));
        let o = dg.add_vertex(px());
        let b = dg.add_vertex(Generator::phased(YZ, Expr::ratio(1, 8), Quantum));
        dg.add_wire(i, a, Basic, Quantum)?;
        dg.add_wire(a, o, H, Quantum)?;
        dg.add_wire(o, b, H, Quantum)?;
        dg.add_wire(o, out, Basic, Quantum)?;
        let fl = Flow::identify_pauli_flow(&dg)?;
        assert_eq!(fl.c(b)?, &[b]);
        assert_eq!(fl.c(a)?, &[o]);
        assert_eq!((fl.d(a)?, fl.d(b)?, fl.d(o)?), (2, 1, 0));
        assert!(fl.verify(&dg).is_ok());
        assert!(Flow::identify_causal_flow(&dg).is_err());
        Ok(())
    }

    #[test]
    fn no_flow() -> anyhow::Result<()> {
        // two inputs funnelled into a single output
        let mut dg = ZXDiagram::with_boundary(2, 1, 0, 0);
        let b = dg.boundary.clone();
        let a = dg.add_vertex(xy(1, 4));
        let c = dg.add_vertex(xy(1, 2));
        let o = dg.add_vertex(px());
        dg.add_wire(b[0], a, Basic, Quantum)?;
        dg.add_wire(b[1], c, Basic, Quantum)?;
        dg.add_wire(a, o, H, Quantum)?;
        dg.add_wire(c, o, H, Quantum)?;
        dg.add_wire(o, b[2], Basic, Quantum)?;
        assert!(Flow::identify_causal_flow(&dg).is_err());
        assert!(Flow::identify_pauli_flow(&dg).is_err());
        Ok(())
    }

    #[test]
    fn requires_mbqc() -> anyhow::Result<()> {
        let mut dg = ZXDiagram::with_boundary(1, 1, 0, 0);
        let (i, o) = (dg.boundary[0], dg.boundary[1]);
        let z = dg.add_vertex(Generator::z_spider(Expr::ratio(1, 4), Quantum));
        dg.add_wire(i, z, Basic, Quantum)?;
        dg.add_wire(z, o, Basic, Quantum)?;
        assert!(matches!(Flow::identify_causal_flow(&dg), Err(ZXError::NotMBQC)));
        assert!(matches!(Flow::identify_pauli_flow(&dg), Err(ZXError::NotMBQC)));
        assert!(matches!(Flow::default().verify(&dg), Err(ZXError::NotMBQC)));
        Ok(())
    }

    #[test]
    fn verify_rejects() -> anyhow::Result<()> {
        let (dg, [v1, v2, v3]) = chain()?;
        let d: FxHashMap<VertId, usize>
            = [(v1, 2), (v2, 1), (v3, 0)].into_iter().collect();

        let c: FxHashMap<VertId, Vec<VertId>>
            = [(v1, vec![]), (v2, vec![v3]), (v3, vec![])].into_iter().collect();
        let fl = Flow::new(c, d.clone());
        assert!(matches!(fl.verify(&dg), Err(ZXError::Flow(Some(v), _)) if v == v1));

        // v2 would be corrected after it is measured
        let c: FxHashMap<VertId, Vec<VertId>>
            = [(v1, vec![v2]), (v2, vec![v3]), (v3, vec![])].into_iter().collect();
        let d_bad: FxHashMap<VertId, usize>
            = [(v1, 1), (v2, 1), (v3, 0)].into_iter().collect();
        assert!(Flow::new(c.clone(), d_bad).verify(&dg).is_err());
        assert!(Flow::new(c, d).verify(&dg).is_ok());
        Ok(())
    }

    #[test]
    fn focussing() -> anyhow::Result<()> {
        let (dg, [v1, v2, v3]) = chain()?;
        let c: FxHashMap<VertId, Vec<VertId>>
            = [(v1, vec![v2, v3]), (v2, vec![v3]), (v3, vec![])]
            .into_iter().collect();
        let d: FxHashMap<VertId, usize>
            = [(v1, 2), (v2, 1), (v3, 0)].into_iter().collect();
        let mut fl = Flow::new(c, d);
        assert!(fl.verify(&dg).is_ok());
        fl.focus(&dg)?;
        assert_eq!(fl.c(v1)?, &[v2]);
        assert_eq!(fl.c(v2)?, &[v3]);
        assert!(fl.verify(&dg).is_ok());
        Ok(())
    }

    #[test]
    fn focussed_sets() -> anyhow::Result<()> {
        let (dg, _) = chain()?;
        assert!(Flow::identify_focussed_sets(&dg)?.is_empty());

        // one input fanned out to two outputs
        let mut dg = ZXDiagram::with_boundary(1, 2, 0, 0);
        let b = dg.boundary.clone();
        let a = dg.add_vertex(xy(1, 4));
        let o1 = dg.add_vertex(px());
        let o2 = dg.add_vertex(px());
        dg.add_wire(b[0], a, Basic, Quantum)?;
        dg.add_wire(a, o1, H, Quantum)?;
        dg.add_wire(a, o2, H, Quantum)?;
        dg.add_wire(o1, b[1], Basic, Quantum)?;
        dg.add_wire(o2, b[2], Basic, Quantum)?;
        let mut expected = vec![o1, o2];
        expected.sort();
        assert_eq!(Flow::identify_focussed_sets(&dg)?, vec![expected]);
        Ok(())
    }
}
