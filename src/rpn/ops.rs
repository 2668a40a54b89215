//! Operation identifiers.
//!
//! Every stack-mutating function key maps to one [`Operation`]. The
//! dispatcher in [`crate::rpn::Calculator::apply`] matches on it
//! exhaustively.

use serde::{Serialize, Deserialize};
use std::fmt;

/// Operands an operation consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Reads X, writes X.
    Unary,
    /// Reads Y and X, pops, writes X.
    Binary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    // Binary
    Add,
    Sub,
    Mul,
    Div,
    /// Y^X
    Pow,
    /// X^(1/Y)
    NthRoot,
    /// ln Y / ln X
    LogXY,

    // Unary
    Sqrt,
    Reciprocal,
    Square,
    Cube,
    Cbrt,
    Log10,
    Ln,
    Exp,
    Exp10,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Factorial,
}

impl Operation {
    /// Every operation, binary ones first.
    pub const ALL: [Operation; 29] = [
        Operation::Add,
        Operation::Sub,
        Operation::Mul,
        Operation::Div,
        Operation::Pow,
        Operation::NthRoot,
        Operation::LogXY,
        Operation::Sqrt,
        Operation::Reciprocal,
        Operation::Square,
        Operation::Cube,
        Operation::Cbrt,
        Operation::Log10,
        Operation::Ln,
        Operation::Exp,
        Operation::Exp10,
        Operation::Sin,
        Operation::Cos,
        Operation::Tan,
        Operation::Asin,
        Operation::Acos,
        Operation::Atan,
        Operation::Sinh,
        Operation::Cosh,
        Operation::Tanh,
        Operation::Asinh,
        Operation::Acosh,
        Operation::Atanh,
        Operation::Factorial,
    ];

    pub fn arity(self) -> Arity {
        match self {
            Operation::Add
            | Operation::Sub
            | Operation::Mul
            | Operation::Div
            | Operation::Pow
            | Operation::NthRoot
            | Operation::LogXY => Arity::Binary,
            _ => Arity::Unary,
        }
    }

    /// Short mnemonic, as used in keystroke scripts.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Sub => "-",
            Operation::Mul => "*",
            Operation::Div => "/",
            Operation::Pow => "pow",
            Operation::NthRoot => "root",
            Operation::LogXY => "logxy",
            Operation::Sqrt => "sqrt",
            Operation::Reciprocal => "inv",
            Operation::Square => "sq",
            Operation::Cube => "cube",
            Operation::Cbrt => "cbrt",
            Operation::Log10 => "log",
            Operation::Ln => "ln",
            Operation::Exp => "exp",
            Operation::Exp10 => "exp10",
            Operation::Sin => "sin",
            Operation::Cos => "cos",
            Operation::Tan => "tan",
            Operation::Asin => "asin",
            Operation::Acos => "acos",
            Operation::Atan => "atan",
            Operation::Sinh => "sinh",
            Operation::Cosh => "cosh",
            Operation::Tanh => "tanh",
            Operation::Asinh => "asinh",
            Operation::Acosh => "acosh",
            Operation::Atanh => "atanh",
            Operation::Factorial => "fact",
        }
    }

    /// Inverse of [`Operation::name`].
    pub fn from_name(name: &str) -> Option<Operation> {
        Self::ALL.iter().copied().find(|op| op.name() == name)
    }

    /// The hyperbolic counterpart of a circular trig operation; any other
    /// operation maps to itself.
    pub fn hyperbolic(self) -> Operation {
        match self {
            Operation::Sin => Operation::Sinh,
            Operation::Cos => Operation::Cosh,
            Operation::Tan => Operation::Tanh,
            Operation::Asin => Operation::Asinh,
            Operation::Acos => Operation::Acosh,
            Operation::Atan => Operation::Atanh,
            other => other,
        }
    }

    /// sin/cos/tan, which convert their input from the angle unit.
    #[inline]
    pub fn takes_angle(self) -> bool {
        matches!(self, Operation::Sin | Operation::Cos | Operation::Tan)
    }

    /// asin/acos/atan, which convert their output to the angle unit.
    #[inline]
    pub fn yields_angle(self) -> bool {
        matches!(self, Operation::Asin | Operation::Acos | Operation::Atan)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_name(op.name()), Some(op));
        }
        assert_eq!(Operation::from_name("nope"), None);
    }

    #[test]
    fn test_arity() {
        let binary = Operation::ALL.iter().filter(|op| op.arity() == Arity::Binary).count();
        assert_eq!(binary, 7);
        assert_eq!(Operation::LogXY.arity(), Arity::Binary);
        assert_eq!(Operation::Factorial.arity(), Arity::Unary);
    }

    #[test]
    fn test_hyperbolic_mapping() {
        assert_eq!(Operation::Sin.hyperbolic(), Operation::Sinh);
        assert_eq!(Operation::Atan.hyperbolic(), Operation::Atanh);
        assert_eq!(Operation::Add.hyperbolic(), Operation::Add);
        assert_eq!(Operation::Sinh.hyperbolic(), Operation::Sinh);
    }

    #[test]
    fn test_angle_classes() {
        assert!(Operation::Cos.takes_angle());
        assert!(!Operation::Cosh.takes_angle());
        assert!(Operation::Acos.yields_angle());
        assert!(!Operation::Sin.yields_angle());
    }
}
