//! The statement family of the IR, including declarations.
//!
//! Declarations referenced from types (classes, interfaces, aliases) are also
//! stored in the program context's flat registry keyed by name, so in-IR
//! references never hold pointers into other modules.

use crate::expr::{IrExpr, LiteralValue};
use crate::types::{IrType, ObjectMember, Parameter, TypeParameter};
use serde::{Deserialize, Serialize};
use tsn_common::span::{Span, Spanned};

/// `extends Base<Args>` / `implements Iface<Args>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeritageClause {
    pub name: String,
    #[serde(default)]
    pub type_arguments: Vec<IrType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDecl {
    pub name: String,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameter>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub return_type: IrType,
    /// Absent for ambient declarations.
    #[serde(default)]
    pub body: Option<Vec<IrStmt>>,
    #[serde(default)]
    pub is_async: bool,
    #[serde(default)]
    pub is_generator: bool,
    #[serde(default)]
    pub is_exported: bool,
    #[serde(default)]
    pub span: Span,
}

/// A field of a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyMember {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: IrType,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub initializer: Option<IrExpr>,
    #[serde(default)]
    pub span: Span,
}

/// A method of a class (constructors use `name == "constructor"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodMember {
    pub name: String,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameter>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub return_type: IrType,
    #[serde(default)]
    pub body: Option<Vec<IrStmt>>,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_async: bool,
    #[serde(default)]
    pub is_generator: bool,
    #[serde(default)]
    pub span: Span,
}

impl MethodMember {
    pub fn is_constructor(&self) -> bool {
        self.name == "constructor"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ClassMember {
    #[serde(rename = "property")]
    Property(PropertyMember),
    #[serde(rename = "method")]
    Method(MethodMember),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDecl {
    pub name: String,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameter>,
    #[serde(default)]
    pub extends: Option<HeritageClause>,
    #[serde(default)]
    pub implements: Vec<HeritageClause>,
    #[serde(default)]
    pub members: Vec<ClassMember>,
    #[serde(default)]
    pub is_exported: bool,
    /// Marks the type for ahead-of-time JSON (de)serialisation support.
    #[serde(default)]
    pub json_aot: bool,
    #[serde(default)]
    pub span: Span,
}

impl ClassDecl {
    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }

    pub fn constructor(&self) -> Option<&MethodMember> {
        self.members.iter().find_map(|m| match m {
            ClassMember::Method(method) if method.is_constructor() => Some(method),
            _ => None,
        })
    }
}

/// Interface members are property-shaped; methods are properties of function
/// type, matching how object types model callables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceMember {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: IrType,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub readonly: bool,
}

impl From<InterfaceMember> for ObjectMember {
    fn from(m: InterfaceMember) -> Self {
        ObjectMember {
            name: m.name,
            ty: m.ty,
            optional: m.optional,
            readonly: m.readonly,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceDecl {
    pub name: String,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameter>,
    #[serde(default)]
    pub extends: Vec<HeritageClause>,
    #[serde(default)]
    pub members: Vec<InterfaceMember>,
    #[serde(default)]
    pub is_exported: bool,
    #[serde(default)]
    pub json_aot: bool,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumMember {
    pub name: String,
    #[serde(default)]
    pub value: Option<LiteralValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDecl {
    pub name: String,
    #[serde(default)]
    pub members: Vec<EnumMember>,
    #[serde(default)]
    pub is_exported: bool,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeAliasDecl {
    pub name: String,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameter>,
    #[serde(rename = "type")]
    pub ty: IrType,
    #[serde(default)]
    pub is_exported: bool,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDeclarator {
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: Option<IrType>,
    #[serde(default)]
    pub initializer: Option<IrExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDecl {
    #[serde(default)]
    pub declarations: Vec<VariableDeclarator>,
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub is_exported: bool,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchCase {
    /// `None` is the `default` clause.
    #[serde(default)]
    pub test: Option<IrExpr>,
    #[serde(default)]
    pub statements: Vec<IrStmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchClause {
    #[serde(default)]
    pub binding: Option<String>,
    #[serde(default)]
    pub body: Vec<IrStmt>,
}

/// The closed statement family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum IrStmt {
    #[serde(rename = "functionDeclaration")]
    Function(FunctionDecl),
    #[serde(rename = "classDeclaration")]
    Class(ClassDecl),
    #[serde(rename = "interfaceDeclaration")]
    Interface(InterfaceDecl),
    #[serde(rename = "enumDeclaration")]
    Enum(EnumDecl),
    #[serde(rename = "typeAliasDeclaration")]
    TypeAlias(TypeAliasDecl),
    #[serde(rename = "variableStatement")]
    Variable(VariableDecl),

    #[serde(rename = "block")]
    Block {
        #[serde(default)]
        statements: Vec<IrStmt>,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "ifStatement", rename_all = "camelCase")]
    If {
        condition: IrExpr,
        then_branch: Box<IrStmt>,
        #[serde(default)]
        else_branch: Option<Box<IrStmt>>,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "whileStatement")]
    While {
        condition: IrExpr,
        body: Box<IrStmt>,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "doWhileStatement")]
    DoWhile {
        body: Box<IrStmt>,
        condition: IrExpr,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "forStatement")]
    For {
        #[serde(default)]
        init: Option<Box<IrStmt>>,
        #[serde(default)]
        condition: Option<IrExpr>,
        #[serde(default)]
        update: Option<IrExpr>,
        body: Box<IrStmt>,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "forOfStatement")]
    ForOf {
        binding: String,
        iterable: IrExpr,
        body: Box<IrStmt>,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "switchStatement")]
    Switch {
        discriminant: IrExpr,
        #[serde(default)]
        cases: Vec<SwitchCase>,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "tryStatement")]
    Try {
        block: Vec<IrStmt>,
        #[serde(default)]
        catch: Option<CatchClause>,
        #[serde(default)]
        finally: Option<Vec<IrStmt>>,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "throwStatement")]
    Throw {
        argument: IrExpr,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "returnStatement")]
    Return {
        #[serde(default)]
        argument: Option<IrExpr>,
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "breakStatement")]
    Break {
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "continueStatement")]
    Continue {
        #[serde(default)]
        span: Span,
    },

    #[serde(rename = "expressionStatement")]
    Expression {
        expression: IrExpr,
        #[serde(default)]
        span: Span,
    },
}

impl IrStmt {
    /// True for declarations; false for executable statements. Module-level
    /// executable statements are what the emitter wraps into `Main`.
    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            IrStmt::Function(_)
                | IrStmt::Class(_)
                | IrStmt::Interface(_)
                | IrStmt::Enum(_)
                | IrStmt::TypeAlias(_)
                | IrStmt::Variable(_)
        )
    }

    /// The declared name, for declarations that introduce exactly one.
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            IrStmt::Function(f) => Some(&f.name),
            IrStmt::Class(c) => Some(&c.name),
            IrStmt::Interface(i) => Some(&i.name),
            IrStmt::Enum(e) => Some(&e.name),
            IrStmt::TypeAlias(a) => Some(&a.name),
            _ => None,
        }
    }

    /// Whether this declaration is exported from its module.
    pub fn is_exported(&self) -> bool {
        match self {
            IrStmt::Function(f) => f.is_exported,
            IrStmt::Class(c) => c.is_exported,
            IrStmt::Interface(i) => i.is_exported,
            IrStmt::Enum(e) => e.is_exported,
            IrStmt::TypeAlias(a) => a.is_exported,
            IrStmt::Variable(v) => v.is_exported,
            _ => false,
        }
    }
}

impl Spanned for IrStmt {
    fn span(&self) -> Span {
        match self {
            IrStmt::Function(f) => f.span,
            IrStmt::Class(c) => c.span,
            IrStmt::Interface(i) => i.span,
            IrStmt::Enum(e) => e.span,
            IrStmt::TypeAlias(a) => a.span,
            IrStmt::Variable(v) => v.span,
            IrStmt::Block { span, .. }
            | IrStmt::If { span, .. }
            | IrStmt::While { span, .. }
            | IrStmt::DoWhile { span, .. }
            | IrStmt::For { span, .. }
            | IrStmt::ForOf { span, .. }
            | IrStmt::Switch { span, .. }
            | IrStmt::Try { span, .. }
            | IrStmt::Throw { span, .. }
            | IrStmt::Return { span, .. }
            | IrStmt::Break { span }
            | IrStmt::Continue { span }
            | IrStmt::Expression { span, .. } => *span,
        }
    }
}

#[cfg(test)]
#[path = "tests/stmt.rs"]
mod tests;
