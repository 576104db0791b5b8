//! Expression IR node types.
//!
//! Nodes arrive as compiled JSON keyed by an `expr` discriminant and are
//! never mutated after decoding. [`IndexMap`] is used wherever the IR carries
//! a keyed collection so that source order is preserved.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::IrError;
use crate::value::Value;

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression node. Uses `Box` for recursive variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "expr", rename_all = "lowercase")]
pub enum Expr {
    // ── Values ──
    /// A literal, returned verbatim (including `null`).
    Lit {
        #[serde(default)]
        value: Value,
    },
    /// Named value from the reactive store, with optional dot path.
    State {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    /// Direct read of a lexical local.
    Local { name: String },
    /// Dotted name resolved against locals, then host globals.
    Var {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    /// Route parameter, query value or path.
    Route {
        name: String,
        #[serde(default)]
        source: RouteSource,
    },
    /// Imported value, with optional dot path.
    Import {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    /// Imported collection; same rule as `import`.
    Data {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    /// Host element reference.
    Ref { name: String },
    /// Component slot placeholder; substituted at compile time.
    Param {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },

    // ── Operators ──
    Bin {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Not { operand: Box<Expr> },
    Cond {
        #[serde(rename = "if")]
        condition: Box<Expr>,
        then: Box<Expr>,
        #[serde(rename = "else", default, skip_serializing_if = "Option::is_none")]
        otherwise: Option<Box<Expr>>,
    },

    // ── Access ──
    /// Dot-path traversal of an evaluated base.
    Get { base: Box<Expr>, path: String },
    /// Dynamic `base[key]`.
    Index { base: Box<Expr>, key: Box<Expr> },

    // ── Composition ──
    Style {
        name: String,
        #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
        variants: IndexMap<String, Expr>,
    },
    Concat { items: Vec<Expr> },
    Validity {
        #[serde(rename = "ref")]
        ref_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        property: Option<String>,
    },
    /// Method or global function call; `target: null` selects a global.
    Call {
        #[serde(default)]
        target: Option<Box<Expr>>,
        method: String,
        #[serde(default)]
        args: Vec<Expr>,
    },
    /// Callback for higher-order array methods; inert on its own.
    Lambda {
        param: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<String>,
        body: Box<Expr>,
    },
    Array { elements: Vec<Expr> },
    Obj { props: IndexMap<String, Expr> },

    /// Any `expr` tag this version does not know.
    #[serde(other)]
    Unknown,
}

impl Expr {
    /// Decode a node from compiled JSON text.
    pub fn from_json(source: &str) -> Result<Expr, IrError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Decode a node from an already-parsed JSON document.
    pub fn from_value(value: serde_json::Value) -> Result<Expr, IrError> {
        Ok(serde_json::from_value(value)?)
    }

    /// The `expr` discriminant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Lit { .. } => "lit",
            Expr::State { .. } => "state",
            Expr::Local { .. } => "local",
            Expr::Var { .. } => "var",
            Expr::Route { .. } => "route",
            Expr::Import { .. } => "import",
            Expr::Data { .. } => "data",
            Expr::Ref { .. } => "ref",
            Expr::Param { .. } => "param",
            Expr::Bin { .. } => "bin",
            Expr::Not { .. } => "not",
            Expr::Cond { .. } => "cond",
            Expr::Get { .. } => "get",
            Expr::Index { .. } => "index",
            Expr::Style { .. } => "style",
            Expr::Concat { .. } => "concat",
            Expr::Validity { .. } => "validity",
            Expr::Call { .. } => "call",
            Expr::Lambda { .. } => "lambda",
            Expr::Array { .. } => "array",
            Expr::Obj { .. } => "obj",
            Expr::Unknown => "unknown",
        }
    }

    // ── Constructors ─────────────────────────────────────────────────────

    pub fn lit(value: impl Into<Value>) -> Self {
        Expr::Lit {
            value: value.into(),
        }
    }

    pub fn null() -> Self {
        Expr::Lit { value: Value::Null }
    }

    pub fn state(name: impl Into<String>) -> Self {
        Expr::State {
            name: name.into(),
            path: None,
        }
    }

    pub fn local(name: impl Into<String>) -> Self {
        Expr::Local { name: name.into() }
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var {
            name: name.into(),
            path: None,
        }
    }

    pub fn bin(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::Bin {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn not(operand: Expr) -> Self {
        Expr::Not {
            operand: Box::new(operand),
        }
    }

    pub fn cond(condition: Expr, then: Expr, otherwise: Option<Expr>) -> Self {
        Expr::Cond {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: otherwise.map(Box::new),
        }
    }

    pub fn get(base: Expr, path: impl Into<String>) -> Self {
        Expr::Get {
            base: Box::new(base),
            path: path.into(),
        }
    }

    pub fn index(base: Expr, key: Expr) -> Self {
        Expr::Index {
            base: Box::new(base),
            key: Box::new(key),
        }
    }

    pub fn call(target: Option<Expr>, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            target: target.map(Box::new),
            method: method.into(),
            args,
        }
    }

    pub fn lambda(param: impl Into<String>, body: Expr) -> Self {
        Expr::Lambda {
            param: param.into(),
            index: None,
            body: Box::new(body),
        }
    }
}

// ── Binary Operators ──────────────────────────────────────────────────────────

/// Binary operators, spelled in the IR by their host-language symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum BinOp {
    // Logical
    And,
    Or,
    // Comparison
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    /// A symbol this version does not know; evaluates to `undefined`.
    Unknown,
}

impl BinOp {
    /// Parse an IR operator symbol.
    pub fn parse(symbol: &str) -> BinOp {
        match symbol {
            "&&" => BinOp::And,
            "||" => BinOp::Or,
            "==" | "===" => BinOp::Eq,
            "!=" | "!==" => BinOp::NotEq,
            "<" => BinOp::Less,
            "<=" => BinOp::LessEq,
            ">" => BinOp::Greater,
            ">=" => BinOp::GreaterEq,
            "+" => BinOp::Add,
            "-" => BinOp::Sub,
            "*" => BinOp::Mul,
            "/" => BinOp::Div,
            "%" => BinOp::Mod,
            _ => BinOp::Unknown,
        }
    }

    /// Returns the operator symbol.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Less => "<",
            BinOp::LessEq => "<=",
            BinOp::Greater => ">",
            BinOp::GreaterEq => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Unknown => "?",
        }
    }
}

impl From<String> for BinOp {
    fn from(symbol: String) -> Self {
        BinOp::parse(&symbol)
    }
}

impl From<BinOp> for &'static str {
    fn from(op: BinOp) -> Self {
        op.as_str()
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Route source ──────────────────────────────────────────────────────────────

/// Which part of the current route a `route` node reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteSource {
    #[default]
    Param,
    Query,
    Path,
}
