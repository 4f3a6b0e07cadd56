//! Exact symbolic expressions used for spider phases and diagram scalars.
//!
//! An [`Expr`] is an element of the ring ℚ(*i*)\[√2\]\[*x*₁, *x*₂, ...\]: a
//! finite sum of terms, each a complex-rational coefficient multiplying a
//! monomial in free real-valued [`Symbol`]s and at most one factor of √2. The
//! representation is canonical (no zero coefficients, √2·√2 folded into the
//! coefficient), so structural equality coincides with value equality.
//!
//! Phases are measured in half-turns: a spider with phase *α* carries
//! e<sup>*iπα*</sup>.
//!
//! ```
//! # use zx_rewrite::expr::Expr;
//! let a = Expr::symbol("a");
//! let b = Expr::ratio(1, 2);
//! assert_eq!(&a + &b - &a, b);
//! assert_eq!(Expr::sqrt2() * Expr::sqrt2(), Expr::from(2));
//! ```

use std::collections::{ BTreeMap, BTreeSet, btree_map::Entry };
use std::fmt;
use num_complex::{ Complex, Complex64 as C64 };
use num_rational::Rational64 as R64;
use num_traits::{ One, Zero };
use rustc_hash::FxHashMap;

/// Complex-rational coefficient of a single term.
pub type Coeff = Complex<R64>;

/// A named, real-valued free parameter.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(String);

impl Symbol {
    /// Create a new symbol.
    pub fn new(name: &str) -> Self { Self(name.to_string()) }

    /// Return the name of the symbol.
    pub fn name(&self) -> &str { &self.0 }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self { Self::new(name) }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Assignment of values to symbols, as used by [`Expr::subs`].
pub type SymbolMap = FxHashMap<Symbol, Expr>;

#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Monomial {
    root2: bool,
    powers: BTreeMap<Symbol, u32>,
}

impl Monomial {
    fn is_unit(&self) -> bool { !self.root2 && self.powers.is_empty() }

    // product of two monomials, along with the integer factor left over from
    // √2·√2
    fn mul(&self, rhs: &Self) -> (Self, i64) {
        let mut powers = self.powers.clone();
        for (s, p) in rhs.powers.iter() {
            *powers.entry(s.clone()).or_insert(0) += p;
        }
        let fac = if self.root2 && rhs.root2 { 2 } else { 1 };
        (Self { root2: self.root2 ^ rhs.root2, powers }, fac)
    }
}

// reduce a rational number into [0, 2)
fn rem2(r: R64) -> R64 {
    let two = R64::from_integer(2);
    r - (r / two).floor() * two
}

fn r2f(r: R64) -> f64 { *r.numer() as f64 / *r.denom() as f64 }

/// An exact symbolic complex number.
///
/// See the [module-level documentation][self] for details.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Expr {
    terms: BTreeMap<Monomial, Coeff>,
}

impl Expr {
    fn add_term(&mut self, m: Monomial, c: Coeff) {
        if c.is_zero() { return; }
        match self.terms.entry(m) {
            Entry::Vacant(e) => { e.insert(c); },
            Entry::Occupied(mut e) => {
                let s = *e.get() + c;
                if s.is_zero() { e.remove(); } else { *e.get_mut() = s; }
            },
        }
    }

    /// Create a constant expression.
    pub fn constant(c: Coeff) -> Self {
        let mut out = Self::default();
        out.add_term(Monomial::default(), c);
        out
    }

    /// Create the real rational constant `numer / denom`.
    ///
    /// *Panics if `denom` is zero.*
    pub fn ratio(numer: i64, denom: i64) -> Self {
        Self::constant(Coeff::new(R64::new(numer, denom), R64::zero()))
    }

    /// The imaginary unit.
    pub fn i() -> Self { Self::constant(Coeff::new(R64::zero(), R64::one())) }

    /// √2.
    pub fn sqrt2() -> Self {
        let mut out = Self::default();
        out.add_term(
            Monomial { root2: true, powers: BTreeMap::new() }, Coeff::one());
        out
    }

    /// 1/√2.
    pub fn inv_sqrt2() -> Self { Self::sqrt2() * Self::ratio(1, 2) }

    /// A single free symbol.
    pub fn symbol(name: &str) -> Self { Symbol::new(name).into() }

    /// Return `true` if `self` contains no free symbols.
    pub fn is_numeric(&self) -> bool {
        self.terms.keys().all(|m| m.powers.is_empty())
    }

    /// Return `true` if `self` contains at least one free symbol.
    pub fn is_symbolic(&self) -> bool { !self.is_numeric() }

    /// Return the set of all symbols appearing in `self`.
    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        self.terms.keys()
            .flat_map(|m| m.powers.keys().cloned())
            .collect()
    }

    /// Replace symbols by the expressions they are mapped to.
    ///
    /// Symbols not present in `map` are left untouched.
    pub fn subs(&self, map: &SymbolMap) -> Self {
        let mut out = Self::zero();
        for (m, c) in self.terms.iter() {
            let mut term = Self::constant(*c);
            if m.root2 { term *= Self::sqrt2(); }
            for (s, p) in m.powers.iter() {
                let base: Self =
                    map.get(s).cloned().unwrap_or_else(|| s.clone().into());
                for _ in 0..*p { term *= &base; }
            }
            out += term;
        }
        out
    }

    /// Return the complex conjugate of `self`, taking all symbols to be real.
    pub fn conj(&self) -> Self {
        Self {
            terms: self.terms.iter()
                .map(|(m, c)| (m.clone(), c.conj()))
                .collect(),
        }
    }

    /// Evaluate to a floating-point complex number if `self` has no free
    /// symbols.
    pub fn to_complex64(&self) -> Option<C64> {
        self.is_numeric().then(|| {
            self.terms.iter()
                .map(|(m, c)| {
                    let z = C64::new(r2f(c.re), r2f(c.im));
                    if m.root2 { z * std::f64::consts::SQRT_2 } else { z }
                })
                .sum()
        })
    }

    /// Return the value of `self` if it is a complex-rational constant.
    pub fn as_constant(&self) -> Option<Coeff> {
        match self.terms.len() {
            0 => Some(Coeff::zero()),
            1 => self.terms.iter().next()
                .and_then(|(m, c)| m.is_unit().then_some(*c)),
            _ => None,
        }
    }

    /// Return the value of `self` if it is a real rational constant.
    pub fn as_real_rational(&self) -> Option<R64> {
        self.as_constant()
            .and_then(|c| c.im.is_zero().then_some(c.re))
    }

    /// Interpreting `self` as a phase in half-turns, return `k` in `0..4` if
    /// `self` ≡ *k*/2 modulo 2.
    pub fn clifford_multiple(&self) -> Option<u8> {
        let r = self.as_real_rational()? * R64::from_integer(2);
        r.is_integer().then(|| r.to_integer().rem_euclid(4) as u8)
    }

    /// Return `true` if `self` is a phase of 0 or π.
    pub fn is_pauli(&self) -> bool {
        matches!(self.clifford_multiple(), Some(0) | Some(2))
    }

    /// Return `true` if `self` is a phase of ±π/2.
    pub fn is_proper_clifford(&self) -> bool {
        matches!(self.clifford_multiple(), Some(1) | Some(3))
    }

    /// Return a copy of `self` with the real part of its constant term
    /// reduced into `[0, 2)`.
    pub fn reduce_phase(&self) -> Self {
        let mut out = self.clone();
        if let Some(c) = out.terms.get_mut(&Monomial::default()) {
            c.re = rem2(c.re);
        }
        out.terms.retain(|_, c| !c.is_zero());
        out
    }

    fn add_ref(&self, rhs: &Self) -> Self {
        let mut out = self.clone();
        for (m, c) in rhs.terms.iter() { out.add_term(m.clone(), *c); }
        out
    }

    fn mul_ref(&self, rhs: &Self) -> Self {
        let mut out = Self::default();
        for (ma, ca) in self.terms.iter() {
            for (mb, cb) in rhs.terms.iter() {
                let (m, fac) = ma.mul(mb);
                out.add_term(m, *ca * *cb * R64::from_integer(fac));
            }
        }
        out
    }

    fn neg_ref(&self) -> Self {
        Self {
            terms: self.terms.iter()
                .map(|(m, c)| (m.clone(), -*c))
                .collect(),
        }
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self { Self::ratio(n, 1) }
}

impl From<R64> for Expr {
    fn from(r: R64) -> Self { Self::constant(Coeff::new(r, R64::zero())) }
}

impl From<Coeff> for Expr {
    fn from(c: Coeff) -> Self { Self::constant(c) }
}

impl From<Symbol> for Expr {
    fn from(s: Symbol) -> Self {
        let mut out = Self::default();
        let powers: BTreeMap<Symbol, u32> = [(s, 1)].into_iter().collect();
        out.add_term(Monomial { root2: false, powers }, Coeff::one());
        out
    }
}

impl Zero for Expr {
    fn zero() -> Self { Self::default() }

    fn is_zero(&self) -> bool { self.terms.is_empty() }
}

impl One for Expr {
    fn one() -> Self { Self::constant(Coeff::one()) }
}

impl std::ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Self::Output { self.neg_ref() }
}

impl std::ops::Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Self::Output { self.neg_ref() }
}

macro_rules! impl_binop_expr {
    (
        $trait:ident,
        $fun:ident,
        $trait_assign:ident,
        $fun_assign:ident,
        |$a:ident, $b:ident| $body:expr
    ) => {
        impl std::ops::$trait<&Expr> for &Expr {
            type Output = Expr;

            fn $fun(self, rhs: &Expr) -> Self::Output {
                let $a = self;
                let $b = rhs;
                $body
            }
        }

        impl std::ops::$trait<Expr> for &Expr {
            type Output = Expr;

            fn $fun(self, rhs: Expr) -> Self::Output {
                std::ops::$trait::$fun(self, &rhs)
            }
        }

        impl std::ops::$trait<&Expr> for Expr {
            type Output = Expr;

            fn $fun(self, rhs: &Expr) -> Self::Output {
                std::ops::$trait::$fun(&self, rhs)
            }
        }

        impl std::ops::$trait<Expr> for Expr {
            type Output = Expr;

            fn $fun(self, rhs: Expr) -> Self::Output {
                std::ops::$trait::$fun(&self, &rhs)
            }
        }

        impl std::ops::$trait_assign<&Expr> for Expr {
            fn $fun_assign(&mut self, rhs: &Expr) {
                *self = std::ops::$trait::$fun(&*self, rhs);
            }
        }

        impl std::ops::$trait_assign<Expr> for Expr {
            fn $fun_assign(&mut self, rhs: Expr) {
                *self = std::ops::$trait::$fun(&*self, &rhs);
            }
        }
    }
}
impl_binop_expr!(Add, add, AddAssign, add_assign, |a, b| a.add_ref(b));
impl_binop_expr!(Sub, sub, SubAssign, sub_assign, |a, b| a.add_ref(&b.neg_ref()));
impl_binop_expr!(Mul, mul, MulAssign, mul_assign, |a, b| a.mul_ref(b));

impl std::iter::Sum for Expr {
    fn sum<I>(iter: I) -> Self
    where I: Iterator<Item = Self>
    {
        iter.fold(Self::zero(), |acc, x| acc + x)
    }
}

impl std::iter::Product for Expr {
    fn product<I>(iter: I) -> Self
    where I: Iterator<Item = Self>
    {
        iter.fold(Self::one(), |acc, x| acc * x)
    }
}

fn fmt_coeff(c: &Coeff) -> String {
    if c.im.is_zero() {
        format!("{}", c.re)
    } else if c.re.is_zero() {
        if c.im.is_one() { "i".to_string() } else { format!("{}i", c.im) }
    } else {
        format!("({} + {}i)", c.re, c.im)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() { return write!(f, "0"); }
        for (k, (m, c)) in self.terms.iter().enumerate() {
            if k > 0 { write!(f, " + ")?; }
            let mut factors: Vec<String> = Vec::new();
            if m.root2 { factors.push("√2".to_string()); }
            for (s, p) in m.powers.iter() {
                if *p == 1 {
                    factors.push(s.to_string());
                } else {
                    factors.push(format!("{}^{}", s, p));
                }
            }
            if factors.is_empty() {
                write!(f, "{}", fmt_coeff(c))?;
            } else if c.is_one() {
                write!(f, "{}", factors.join("*"))?;
            } else {
                write!(f, "{}*{}", fmt_coeff(c), factors.join("*"))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ring_ops() {
        let a = Expr::symbol("a");
        let b = Expr::symbol("b");
        assert_eq!(&a + &b, &b + &a);
        assert_eq!(&a * &b, &b * &a);
        assert_eq!(&a - &a, Expr::zero());
        assert_eq!((&a + &b) * (&a - &b), &a * &a - &b * &b);
        assert_eq!(-(-a.clone()), a);
        assert_eq!(Expr::ratio(1, 3) + Expr::ratio(2, 3), Expr::one());
        assert_eq!(Expr::i() * Expr::i(), Expr::from(-1));
    }

    #[test]
    fn root2() {
        assert_eq!(Expr::sqrt2() * Expr::sqrt2(), Expr::from(2));
        assert_eq!(Expr::inv_sqrt2() * Expr::sqrt2(), Expr::one());
        assert_eq!(
            Expr::inv_sqrt2() * Expr::inv_sqrt2(),
            Expr::ratio(1, 2),
        );
        assert!(Expr::sqrt2().as_constant().is_none());
        let z = Expr::sqrt2().to_complex64().unwrap();
        assert!((z.re - std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn substitution() {
        let a = Symbol::new("a");
        let e = Expr::symbol("a") * Expr::symbol("a") + Expr::symbol("b");
        let mut map = SymbolMap::default();
        map.insert(a.clone(), Expr::ratio(1, 2));
        let s = e.subs(&map);
        assert_eq!(s, Expr::ratio(1, 4) + Expr::symbol("b"));
        assert_eq!(
            s.free_symbols().into_iter().collect::<Vec<_>>(),
            vec![Symbol::new("b")],
        );
        assert!(e.free_symbols().contains(&a));
        assert!(s.is_symbolic());
        assert!(!Expr::ratio(1, 2).is_symbolic());
    }

    #[test]
    fn conjugate() {
        let e = Expr::i() * Expr::symbol("x") + Expr::ratio(1, 2);
        assert_eq!(e.conj(), Expr::ratio(1, 2) - Expr::i() * Expr::symbol("x"));
        assert_eq!(Expr::sqrt2().conj(), Expr::sqrt2());
    }

    #[test]
    fn phases() {
        assert_eq!(Expr::zero().clifford_multiple(), Some(0));
        assert_eq!(Expr::ratio(1, 2).clifford_multiple(), Some(1));
        assert_eq!(Expr::ratio(-1, 2).clifford_multiple(), Some(3));
        assert_eq!(Expr::ratio(3, 1).clifford_multiple(), Some(2));
        assert_eq!(Expr::ratio(1, 4).clifford_multiple(), None);
        assert_eq!(Expr::symbol("a").clifford_multiple(), None);
        assert!(Expr::one().is_pauli());
        assert!(Expr::ratio(3, 2).is_proper_clifford());
        assert!(!Expr::ratio(3, 2).is_pauli());
        assert_eq!(Expr::ratio(5, 2).reduce_phase(), Expr::ratio(1, 2));
        assert_eq!(Expr::ratio(-1, 2).reduce_phase(), Expr::ratio(3, 2));
        assert_eq!(Expr::from(2).reduce_phase(), Expr::zero());
        assert_eq!(
            (Expr::symbol("a") + Expr::from(3)).reduce_phase(),
            Expr::symbol("a") + Expr::one(),
        );
    }

    #[test]
    fn display() {
        assert_eq!(Expr::zero().to_string(), "0");
        assert_eq!(Expr::ratio(1, 2).to_string(), "1/2");
        assert_eq!(Expr::i().to_string(), "i");
        assert_eq!(Expr::sqrt2().to_string(), "√2");
        assert_eq!((Expr::symbol("a") * Expr::from(2)).to_string(), "2*a");
    }
}
