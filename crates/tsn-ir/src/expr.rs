//! The expression family of the IR.

use crate::types::{IrType, Parameter};
use serde::{Deserialize, Serialize};
use tsn_common::span::{Span, Spanned};

/// A literal value, shared between literal expressions and literal types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Boolean(bool),
    Number(f64),
    String(String),
}

impl LiteralValue {
    /// True if this is a number with no fractional part.
    pub fn is_integer_number(&self) -> bool {
        matches!(self, LiteralValue::Number(n) if n.fract() == 0.0 && n.is_finite())
    }
}

impl std::fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralValue::Boolean(b) => write!(f, "{b}"),
            LiteralValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            LiteralValue::String(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "%")]
    Rem,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Neq,
    #[serde(rename = "===")]
    StrictEq,
    #[serde(rename = "!==")]
    StrictNeq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "&")]
    BitAnd,
    #[serde(rename = "|")]
    BitOr,
    #[serde(rename = "^")]
    BitXor,
    #[serde(rename = "<<")]
    Shl,
    #[serde(rename = ">>")]
    Shr,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "instanceof")]
    InstanceOf,
}

impl BinaryOp {
    /// The C# operator token, for the operators that map one-to-one.
    /// `in`/`instanceof` and the strict equality pair are lowered structurally.
    pub const fn cs_token(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq | BinaryOp::StrictEq => "==",
            BinaryOp::Neq | BinaryOp::StrictNeq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::In => "in",
            BinaryOp::InstanceOf => "is",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "||")]
    Or,
    #[serde(rename = "??")]
    NullishCoalescing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    #[serde(rename = "-")]
    Neg,
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "!")]
    Not,
    #[serde(rename = "~")]
    BitNot,
    #[serde(rename = "typeof")]
    TypeOf,
    #[serde(rename = "void")]
    Void,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateOp {
    #[serde(rename = "++")]
    Increment,
    #[serde(rename = "--")]
    Decrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
    #[serde(rename = "=")]
    Assign,
    #[serde(rename = "+=")]
    AddAssign,
    #[serde(rename = "-=")]
    SubAssign,
    #[serde(rename = "*=")]
    MulAssign,
    #[serde(rename = "/=")]
    DivAssign,
}

impl AssignOp {
    pub const fn cs_token(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
            AssignOp::MulAssign => "*=",
            AssignOp::DivAssign => "/=",
        }
    }
}

/// A property in an object literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectProperty {
    pub name: String,
    pub value: IrExpr,
}

/// The closed expression family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum IrExpr {
    #[serde(rename = "literal")]
    Literal {
        value: LiteralValue,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "nullLiteral")]
    Null {
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "undefinedLiteral")]
    Undefined {
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "identifier")]
    Identifier {
        name: String,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "binaryExpression")]
    Binary {
        operator: BinaryOp,
        left: Box<IrExpr>,
        right: Box<IrExpr>,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "logicalExpression")]
    Logical {
        operator: LogicalOp,
        left: Box<IrExpr>,
        right: Box<IrExpr>,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "unaryExpression")]
    Unary {
        operator: UnaryOp,
        operand: Box<IrExpr>,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "updateExpression")]
    Update {
        operator: UpdateOp,
        #[serde(default)]
        prefix: bool,
        operand: Box<IrExpr>,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "assignmentExpression")]
    Assignment {
        operator: AssignOp,
        target: Box<IrExpr>,
        value: Box<IrExpr>,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "conditionalExpression")]
    Conditional {
        condition: Box<IrExpr>,
        consequent: Box<IrExpr>,
        alternate: Box<IrExpr>,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "callExpression", rename_all = "camelCase")]
    Call {
        callee: Box<IrExpr>,
        #[serde(default)]
        type_arguments: Vec<IrType>,
        #[serde(default)]
        arguments: Vec<IrExpr>,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "newExpression", rename_all = "camelCase")]
    New {
        callee: String,
        #[serde(default)]
        type_arguments: Vec<IrType>,
        #[serde(default)]
        arguments: Vec<IrExpr>,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "memberExpression")]
    Member {
        object: Box<IrExpr>,
        property: String,
        #[serde(default)]
        optional: bool,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "indexExpression")]
    Index {
        object: Box<IrExpr>,
        index: Box<IrExpr>,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "arrayExpression")]
    Array {
        #[serde(default)]
        elements: Vec<IrExpr>,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "objectExpression")]
    Object {
        #[serde(default)]
        properties: Vec<ObjectProperty>,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "arrowFunction", rename_all = "camelCase")]
    Arrow {
        #[serde(default)]
        parameters: Vec<Parameter>,
        #[serde(default)]
        return_type: Option<IrType>,
        /// An arrow body is either a single expression or a block.
        body: Box<ArrowBody>,
        #[serde(default)]
        is_async: bool,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "functionExpression", rename_all = "camelCase")]
    Function {
        #[serde(default)]
        parameters: Vec<Parameter>,
        #[serde(default)]
        return_type: Option<IrType>,
        body: Vec<crate::stmt::IrStmt>,
        #[serde(default)]
        is_async: bool,
        #[serde(default)]
        is_generator: bool,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "templateLiteral")]
    Template {
        /// `quasis.len() == expressions.len() + 1`, interleaved.
        quasis: Vec<String>,
        #[serde(default)]
        expressions: Vec<IrExpr>,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "spreadElement")]
    Spread {
        argument: Box<IrExpr>,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "castExpression")]
    Cast {
        expression: Box<IrExpr>,
        #[serde(rename = "type")]
        ty: IrType,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "awaitExpression")]
    Await {
        argument: Box<IrExpr>,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "yieldExpression")]
    Yield {
        #[serde(default)]
        argument: Option<Box<IrExpr>>,
        #[serde(default)]
        delegate: bool,
        #[serde(default)]
        span: Span,
    },
}

/// Body of an arrow function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArrowBody {
    Expression(IrExpr),
    Block(Vec<crate::stmt::IrStmt>),
}

impl IrExpr {
    /// Shorthand for a plain identifier.
    pub fn ident(name: impl Into<String>) -> Self {
        IrExpr::Identifier {
            name: name.into(),
            span: Span::default(),
        }
    }

    /// Shorthand for a number literal.
    pub fn number(n: f64) -> Self {
        IrExpr::Literal {
            value: LiteralValue::Number(n),
            span: Span::default(),
        }
    }

    /// Shorthand for a string literal.
    pub fn string(s: impl Into<String>) -> Self {
        IrExpr::Literal {
            value: LiteralValue::String(s.into()),
            span: Span::default(),
        }
    }
}

impl Spanned for IrExpr {
    fn span(&self) -> Span {
        match self {
            IrExpr::Literal { span, .. }
            | IrExpr::Null { span }
            | IrExpr::Undefined { span }
            | IrExpr::Identifier { span, .. }
            | IrExpr::Binary { span, .. }
            | IrExpr::Logical { span, .. }
            | IrExpr::Unary { span, .. }
            | IrExpr::Update { span, .. }
            | IrExpr::Assignment { span, .. }
            | IrExpr::Conditional { span, .. }
            | IrExpr::Call { span, .. }
            | IrExpr::New { span, .. }
            | IrExpr::Member { span, .. }
            | IrExpr::Index { span, .. }
            | IrExpr::Array { span, .. }
            | IrExpr::Object { span, .. }
            | IrExpr::Arrow { span, .. }
            | IrExpr::Function { span, .. }
            | IrExpr::Template { span, .. }
            | IrExpr::Spread { span, .. }
            | IrExpr::Cast { span, .. }
            | IrExpr::Await { span, .. }
            | IrExpr::Yield { span, .. } => *span,
        }
    }
}
