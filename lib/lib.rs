#![allow(dead_code, non_snake_case, non_upper_case_globals)]

//! A typed graph intermediate representation for the [ZX-calculus][wiki] and
//! a semantics-preserving rewrite engine over it.
//!
//! - [`expr`] provides exact, possibly symbolic, expressions used for
//! generator phases and diagram scalars.
//! - [`graph`] implements diagrams as undirected multigraphs of typed
//! generators with an ordered boundary, local substitution of subdiagrams,
//! a library of rewrite rules with combinators to build larger procedures from
//! them, and analysis of measurement flow on diagrams in MBQC form.
//!
//! Diagrams may mix ordinary (`Classical`) wires and generators with the
//! doubled (`Quantum`) ones of the CPM construction, allowing mixed-state
//! processes to be expressed and rewritten alongside pure ones.
//!
//! [wiki]: https://en.wikipedia.org/wiki/ZX-calculus
//!
//! # See also
//! - [PyZX](https://github.com/Quantomatic/pyzx): a Python implementation of
//! the ZX-calculus and its rewrite rules.
//! - [QuiZX](https://github.com/Quantomatic/quizx/tree/master): a Rust
//! implementation of the above.
//!
//! # Further reading
//! - J. van de Wetering, "ZX-calculus for the working quantum computer
//! scientist." [arXiv:2012.13966](https://arxiv.org/abs/2012.13966)
//! - R. Duncan, A. Kissinger, S. Perdrix, J. van de Wetering, "Graph-theoretic
//! simplification of quantum circuits with the ZX-calculus."
//! [arXiv:1902.03178](https://arxiv.org/abs/1902.03178)
//! - W. Simmons, "Relating measurement patterns to circuits via Pauli flow."
//! [arXiv:2109.05654](https://arxiv.org/abs/2109.05654)
//!

pub mod expr;
pub mod graph;
pub(crate) mod vizdefs;

pub extern crate num_complex;
/// Handy macro to create `num_complex::Complex64`s from more natural and
/// succinct syntax.
///
/// ```
/// use std::f64::consts::PI;
/// use num_complex::Complex64;
/// use zx_rewrite::c;
///
/// assert_eq!( c!(i (-1.0)),    Complex64::new(0.0, -1.0)      );
/// assert_eq!( c!(e PI),        Complex64::cis(PI)             );
/// assert_eq!( c!(1.0),         Complex64::new(1.0, 0.0)       );
/// assert_eq!( c!(1.0 + i 1.0), Complex64::new(1.0, 1.0)       );
/// assert_eq!( c!(1.0 - 1.0 i), Complex64::new(1.0, -1.0)      );
/// assert_eq!( c!(1.0, e PI),   Complex64::from_polar(1.0, PI) );
/// ```
#[macro_export]
macro_rules! c {
    ( i $im:expr )
        => { $crate::num_complex::Complex64::new(0.0, $im) };
    ( e $ph:expr )
        => { $crate::num_complex::Complex64::cis($ph) };
    ( $re:expr )
        => { $crate::num_complex::Complex64::new($re, 0.0) };
    ( $re:literal + i $im:literal )
        => { $crate::num_complex::Complex64::new($re, $im) };
    ( $re:literal - i $im:literal )
        => { $crate::num_complex::Complex64::new($re, -$im) };
    ( $re:literal + $im:literal i )
        => { $crate::num_complex::Complex64::new($re, $im) };
    ( $re:literal - $im:literal i )
        => { $crate::num_complex::Complex64::new($re, -$im) };
    ( $r:expr, e $ph:expr )
        => { $crate::num_complex::Complex64::from_polar($r, $ph) };
    ( $re:expr, $im:expr )
        => { $crate::num_complex::Complex64::new($re, $im) };
}
