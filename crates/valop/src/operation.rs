//! Keys for the standard operation table.
//!
//! Callers may pass an [`Operation`] anywhere an operation name is accepted
//! instead of spelling the string out.

use std::fmt;
use std::str::FromStr;

use crate::error::DispatchError;
use crate::shape::ResultShape;
use crate::types::{OtherType1, OtherType2, OtherType3, OtherType4, ValOperationPaged};

/// The standard operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ValOperations,
    OtherOperation1,
    OtherOperation2,
    OtherOperation3,
    OtherOperation4,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::ValOperations,
        Operation::OtherOperation1,
        Operation::OtherOperation2,
        Operation::OtherOperation3,
        Operation::OtherOperation4,
    ];

    /// Registry key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ValOperations => "ValOperations",
            Operation::OtherOperation1 => "OtherOperation1",
            Operation::OtherOperation2 => "OtherOperation2",
            Operation::OtherOperation3 => "OtherOperation3",
            Operation::OtherOperation4 => "OtherOperation4",
        }
    }

    /// Request target relative to the base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Operation::ValOperations => "api/valoperation/valoperationssheach",
            Operation::OtherOperation1 => "api/valoperation/otherpath1",
            Operation::OtherOperation2 => "api/valoperation/otherpath2",
            Operation::OtherOperation3 => "api/valoperation/otherpath3",
            Operation::OtherOperation4 => "api/valoperation/otherpath4",
        }
    }

    pub fn shape(&self) -> ResultShape {
        match self {
            Operation::ValOperations => ResultShape::of::<ValOperationPaged>(),
            Operation::OtherOperation1 => ResultShape::of::<OtherType1>(),
            Operation::OtherOperation2 => ResultShape::of::<OtherType2>(),
            Operation::OtherOperation3 => ResultShape::of::<OtherType3>(),
            Operation::OtherOperation4 => ResultShape::of::<OtherType4>(),
        }
    }
}

impl AsRef<str> for Operation {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = DispatchError;

    /// Exact, case-sensitive match on the registry key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| DispatchError::UnknownOperation { name: s.to_string() })
    }
}
