//! Brute-force evaluation of small diagrams as tensors.
//!
//! Every Basic wire carries one bit variable and every Hadamard wire one
//! variable per end, linked by the factor (-1)<sup>*ab*</sup>/√2. Each
//! generator contributes a function of the bits on its incident wire ends;
//! the tensor is the sum over all assignments. The cost is exponential in the
//! number of variables, so this is only suitable for checking small diagrams.

use std::f64::consts::{ FRAC_1_SQRT_2, PI };
use ndarray::{ ArrayD, IxDyn };
use num_complex::Complex64 as C64;
use rustc_hash::FxHashMap;
use crate::{
    c,
    graph::{ VertId, WireEnd, WireId, ZXDiagram, ZXError, ZXResult, ZXType, ZXWireType },
};

/// Maximum number of bit variables over which [`ZXDiagram::contract`] will
/// sum.
pub const MAX_VARS: usize = 24;

#[derive(Clone, Debug)]
enum Factor {
    Z(C64),
    X(C64),
    H(C64),
    Boundary,
}

impl Factor {
    fn eval(&self, bits: &[bool]) -> C64 {
        match self {
            Self::Z(ph) => {
                match bits.first() {
                    None => c!(1.0) + ph,
                    Some(b0) if bits.iter().all(|b| b == b0) => {
                        if *b0 { *ph } else { c!(1.0) }
                    },
                    _ => c!(0.0),
                }
            },
            Self::X(ph) => {
                let parity = bits.iter().filter(|b| **b).count() % 2 == 1;
                let norm = FRAC_1_SQRT_2.powi(bits.len() as i32);
                if parity {
                    (c!(1.0) - ph) * norm
                } else {
                    (c!(1.0) + ph) * norm
                }
            },
            Self::H(a) => {
                if bits.iter().all(|b| *b) { *a } else { c!(1.0) }
            },
            Self::Boundary => c!(1.0),
        }
    }
}

// e^{iπα} for a numerical phase α
fn phase_factor(v: VertId, ph: Option<&crate::expr::Expr>) -> ZXResult<C64> {
    let alpha =
        ph.and_then(|p| p.to_complex64()).ok_or(ZXError::Symbolic(v))?;
    Ok((c!(i PI) * alpha).exp())
}

impl ZXDiagram {
    /// Contract `self` into the tensor it denotes when read as a single
    /// (undoubled) tensor network, multiplied by the global scalar.
    ///
    /// The result has one axis of length 2 per boundary vertex, in boundary
    /// order. Only boundaries, Z- and X-spiders, and H-boxes are supported,
    /// and all parameters must be numerical.
    pub fn contract(&self) -> ZXResult<ArrayD<C64>> {
        // variables for each wire end
        let mut n_vars: usize = 0;
        let mut wire_vars: FxHashMap<WireId, (usize, usize)> =
            FxHashMap::default();
        let mut h_pairs: Vec<(usize, usize)> = Vec::new();
        for (w, _, _, props) in self.wires() {
            match props.wire_type {
                ZXWireType::Basic => {
                    wire_vars.insert(w, (n_vars, n_vars));
                    n_vars += 1;
                },
                ZXWireType::H => {
                    wire_vars.insert(w, (n_vars, n_vars + 1));
                    h_pairs.push((n_vars, n_vars + 1));
                    n_vars += 2;
                },
            }
        }
        if n_vars > MAX_VARS { return Err(ZXError::ContractionTooLarge(n_vars)); }

        let mut factors: Vec<(Factor, Vec<usize>)> = Vec::new();
        for (v, gen) in self.vertices() {
            let factor =
                match gen.ty() {
                    ZXType::ZSpider => Factor::Z(phase_factor(v, gen.param())?),
                    ZXType::XSpider => Factor::X(phase_factor(v, gen.param())?),
                    ZXType::Hbox => {
                        let a =
                            gen.param()
                            .and_then(|p| p.to_complex64())
                            .ok_or(ZXError::Symbolic(v))?;
                        Factor::H(a)
                    },
                    ty if ty.is_boundary() => Factor::Boundary,
                    _ => { return Err(ZXError::Uncontractable(gen.name())); },
                };
            let legs: Vec<usize> =
                self.ends_at(v)?.into_iter()
                .map(|(w, end)| {
                    let (s, t) = wire_vars[&w];
                    match end {
                        WireEnd::Source => s,
                        WireEnd::Target => t,
                    }
                })
                .collect();
            factors.push((factor, legs));
        }
        let scalar =
            self.scalar.to_complex64()
            .ok_or_else(|| ZXError::Uncontractable("symbolic scalar".to_string()))?;

        let outputs: Vec<usize> =
            self.boundary.iter()
            .map(|b| {
                let (w, end) =
                    self.ends_at(*b)?.first().copied()
                    .ok_or(ZXError::BoundaryDegree(*b, 0))?;
                let (s, t) = wire_vars[&w];
                Ok(if end == WireEnd::Source { s } else { t })
            })
            .collect::<ZXResult<Vec<usize>>>()?;

        let mut tensor: ArrayD<C64> =
            ArrayD::zeros(IxDyn(&vec![2; outputs.len()]));
        let mut bits: Vec<bool> = vec![false; n_vars];
        let mut leg_bits: Vec<bool> = Vec::new();
        let mut idx: Vec<usize> = vec![0; outputs.len()];
        for assignment in 0_u64..(1 << n_vars) {
            bits.iter_mut().enumerate()
                .for_each(|(k, b)| { *b = assignment >> k & 1 == 1; });
            let mut amp = c!(1.0);
            for (a, b) in h_pairs.iter() {
                amp *= if bits[*a] && bits[*b] { -FRAC_1_SQRT_2 } else { FRAC_1_SQRT_2 };
            }
            for (factor, legs) in factors.iter() {
                if amp == c!(0.0) { break; }
                leg_bits.clear();
                leg_bits.extend(legs.iter().map(|k| bits[*k]));
                amp *= factor.eval(&leg_bits);
            }
            if amp == c!(0.0) { continue; }
            idx.iter_mut().zip(outputs.iter())
                .for_each(|(i, k)| { *i = bits[*k] as usize; });
            tensor[IxDyn(&idx)] += amp;
        }
        Ok(tensor.mapv(|a| a * scalar))
    }
}

/// Return `true` if two tensors agree elementwise to within `eps`.
pub(crate) fn tensors_close(a: &ArrayD<C64>, b: &ArrayD<C64>, eps: f64) -> bool {
    a.shape() == b.shape()
        && a.iter().zip(b.iter()).all(|(x, y)| (x - y).norm() < eps)
}

/// Return `true` if two tensors agree elementwise to within `eps` after
/// rescaling by a non-zero complex factor.
pub(crate) fn tensors_proportional(a: &ArrayD<C64>, b: &ArrayD<C64>, eps: f64)
    -> bool
{
    if a.shape() != b.shape() { return false; }
    let pivot =
        a.iter().zip(b.iter())
        .max_by(|(x, _), (y, _)| x.norm().total_cmp(&y.norm()));
    match pivot {
        None => true,
        Some((x, _)) if x.norm() < eps => b.iter().all(|z| z.norm() < eps),
        Some((_, y)) if y.norm() < eps => false,
        Some((x, y)) => {
            let r = y / x;
            a.iter().zip(b.iter()).all(|(p, q)| (p * r - q).norm() < eps)
        },
    }
}

// compare two diagrams through the contraction of their CPM doublings, the
// only way to check `Quantum` scalars
#[cfg(test)]
pub(crate) fn doubled_close(a: &ZXDiagram, b: &ZXDiagram, eps: f64)
    -> ZXResult<bool>
{
    Ok(tensors_close(
        &a.to_doubled_diagram()?.contract()?,
        &b.to_doubled_diagram()?.contract()?,
        eps,
    ))
}
