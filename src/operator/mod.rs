// src/operator/mod.rs

//! Defines the `Operator`: a weighted sum of Pauli strings plus an identity
//! offset, held both as its symbolic decomposition and as a dense matrix.
//!
//! Circuit-construction code consumes the decomposition (`terms()` and
//! `offset()`); spectral analysis consumes the dense view (`matrix()`). Both
//! views always describe the same operator because the dense matrix is only
//! ever produced from the decomposition.

use crate::core::{Pauli, PauliString, QcondError, Result};
use crate::validation::{check_hermitian, condition_number, hermitian_deviation, spectral_range};
use nalgebra::DMatrix;
use num_complex::Complex;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single weighted tensor term `coefficient * P_0 ⊗ … ⊗ P_{N-1}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    /// Real weight of the term.
    pub coefficient: f64,
    /// The tensor product the weight multiplies.
    pub string: PauliString,
}

impl Term {
    /// Creates a new weighted term.
    pub fn new(coefficient: f64, string: PauliString) -> Self {
        Self { coefficient, string }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.coefficient >= 0.0 {
            write!(f, "+{:.4} {}", self.coefficient, self.string)
        } else {
            write!(f, "{:.4} {}", self.coefficient, self.string)
        }
    }
}

/// Selects which scalar of an operator a search varies.
///
/// In a problem file this is written `tunable = "offset"` or
/// `tunable = { term = 1 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tunable {
    /// The coefficient of the term at this index.
    Term(usize),
    /// The identity offset.
    Offset,
}

impl fmt::Display for Tunable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tunable::Term(index) => write!(f, "term[{}]", index),
            Tunable::Offset => write!(f, "offset"),
        }
    }
}

/// A Hermitian operator `Σ c_i T_i + offset * I` on `N` qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    num_qubits: usize,
    terms: Vec<Term>,
    offset: f64,
    /// Dense `2^N x 2^N` view, computed once from `terms` and `offset`.
    matrix: DMatrix<Complex<f64>>,
}

impl Operator {
    /// Validates a decomposition and assembles its dense matrix.
    ///
    /// All structural checks run before any matrix is allocated.
    fn assemble(num_qubits: usize, terms: Vec<Term>, offset: f64) -> Result<Self> {
        let dim = dimension(num_qubits)?;
        for (index, term) in terms.iter().enumerate() {
            if term.string.len() != num_qubits {
                return Err(QcondError::configuration(format!(
                    "Term {} ({}) has {} factors but the operator acts on {} qubits",
                    index,
                    term.string,
                    term.string.len(),
                    num_qubits
                )));
            }
            if !term.coefficient.is_finite() {
                return Err(QcondError::configuration(format!(
                    "Term {} has non-finite coefficient {}",
                    index, term.coefficient
                )));
            }
        }
        if !offset.is_finite() {
            return Err(QcondError::configuration(format!("Identity offset {} is not finite", offset)));
        }

        let matrix = dense_sum(dim, &terms, offset);
        check_hermitian(&matrix, None)?;

        tracing::debug!(num_qubits, num_terms = terms.len(), offset, "assembled operator");
        Ok(Self { num_qubits, terms, offset, matrix })
    }

    /// Number of qubits `N`.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Matrix dimension `2^N`.
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Symbolic view: the weighted terms in insertion order.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Symbolic view: the identity offset coefficient.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Dense view.
    pub fn matrix(&self) -> &DMatrix<Complex<f64>> {
        &self.matrix
    }

    /// Rebuilds the dense matrix from the symbolic view alone.
    pub fn to_dense(&self) -> DMatrix<Complex<f64>> {
        dense_sum(self.dim(), &self.terms, self.offset)
    }

    /// Current value of the selected coefficient.
    pub fn coefficient(&self, tunable: Tunable) -> Result<f64> {
        match tunable {
            Tunable::Offset => Ok(self.offset),
            Tunable::Term(index) => self.terms.get(index).map(|t| t.coefficient).ok_or_else(|| {
                QcondError::configuration(format!(
                    "Tunable term index {} is out of range ({} terms)",
                    index,
                    self.terms.len()
                ))
            }),
        }
    }

    /// Builds a fresh operator with one coefficient replaced.
    ///
    /// The dense matrix is recomputed from scratch; nothing is updated incrementally.
    pub fn with_coefficient(&self, tunable: Tunable, value: f64) -> Result<Self> {
        // Validates the index before cloning.
        self.coefficient(tunable)?;
        let mut terms = self.terms.clone();
        let mut offset = self.offset;
        match tunable {
            Tunable::Offset => offset = value,
            Tunable::Term(index) => terms[index].coefficient = value,
        }
        Self::assemble(self.num_qubits, terms, offset)
    }

    /// Ratio of largest to smallest singular value of the dense view.
    pub fn condition_number(&self) -> f64 {
        condition_number(&self.matrix)
    }

    /// Returns `true` if the dense view equals its conjugate transpose within `tolerance`.
    pub fn is_hermitian(&self, tolerance: f64) -> bool {
        hermitian_deviation(&self.matrix) <= tolerance
    }

    /// Smallest and largest eigenvalue.
    pub fn spectral_range(&self) -> (f64, f64) {
        spectral_range(&self.matrix)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "qcond::Operator[{} terms on {} qubits]", self.terms.len(), self.num_qubits)?;
        for term in &self.terms {
            writeln!(f, "  {}", term)?;
        }
        let identity = PauliString::identity(self.num_qubits);
        write!(f, "  {}", Term::new(self.offset, identity))
    }
}

/// `2^N`, refusing qubit counts whose dense matrix cannot be indexed.
fn dimension(num_qubits: usize) -> Result<usize> {
    if num_qubits == 0 {
        return Err(QcondError::configuration("Qubit count must be at least 1"));
    }
    let dim = u32::try_from(num_qubits)
        .ok()
        .and_then(|n| 1usize.checked_shl(n))
        .filter(|dim| dim.checked_mul(*dim).is_some())
        .ok_or_else(|| {
            QcondError::configuration(format!(
                "{} qubits overflow the dense matrix dimension",
                num_qubits
            ))
        })?;
    Ok(dim)
}

/// `Σ c_i T_i + offset * I`. Shared by the builder and `Operator::to_dense`
/// so both views produce bit-identical matrices.
fn dense_sum(dim: usize, terms: &[Term], offset: f64) -> DMatrix<Complex<f64>> {
    let mut matrix = DMatrix::from_element(dim, dim, Complex::zero());
    for term in terms {
        let weight = Complex::new(term.coefficient, 0.0);
        matrix += term.string.to_dense().map(|z| z * weight);
    }
    for k in 0..dim {
        matrix[(k, k)] += Complex::new(offset, 0.0);
    }
    matrix
}

//-------------------------------------------------------------------------
// Operator Builder
//-------------------------------------------------------------------------

/// Chained construction of an `Operator`.
///
/// Validation is deferred to `build`, so a malformed term surfaces as a
/// single `QcondError::Configuration` there.
pub struct OperatorBuilder {
    num_qubits: usize,
    terms: Vec<Term>,
    offset: f64,
    // First error raised while adding a term, reported by `build`.
    pending_error: Option<QcondError>,
}

impl OperatorBuilder {
    /// Starts an empty operator on `num_qubits` qubits with zero offset.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            terms: Vec::new(),
            offset: 0.0,
            pending_error: None,
        }
    }

    /// Adds `coefficient * string`.
    pub fn add_term(mut self, coefficient: f64, string: PauliString) -> Self {
        self.terms.push(Term::new(coefficient, string));
        self
    }

    /// Adds several weighted terms.
    pub fn add_terms<I>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = Term>,
    {
        self.terms.extend(terms);
        self
    }

    /// Adds a term that is the identity except at the listed sites.
    pub fn add_local(mut self, coefficient: f64, sites: &[(usize, Pauli)]) -> Self {
        match PauliString::local(self.num_qubits, sites) {
            Ok(string) => self.terms.push(Term::new(coefficient, string)),
            Err(e) => {
                if self.pending_error.is_none() {
                    self.pending_error = Some(e);
                }
            }
        }
        self
    }

    /// Sets the identity offset coefficient.
    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Validates the configuration and assembles the operator.
    ///
    /// # Errors
    /// * `QcondError::Configuration` for a zero or oversized qubit count, a term
    ///   whose factor count differs from `N`, a bad local site, or a
    ///   non-finite coefficient.
    /// * `QcondError::NonHermitian` if the assembled matrix fails the check.
    pub fn build(self) -> Result<Operator> {
        if let Some(e) = self.pending_error {
            return Err(e);
        }
        Operator::assemble(self.num_qubits, self.terms, self.offset)
    }
}
