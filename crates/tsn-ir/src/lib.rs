//! Typed intermediate representation for the tsn transpiler.
//!
//! The IR is three closed discriminated families (types, statements,
//! expressions) plus the module wrapper the front end ships per source file.
//! Every family is handled exhaustively downstream; adding a kind means
//! touching every `match` over that family, which is intentional.
//!
//! The whole IR round-trips through serde: the parser collaborator hands the
//! core `.ir.json` documents, and the core never re-parses source text.

pub mod expr;
pub mod module;
pub mod stmt;
pub mod type_key;
pub mod types;

pub use expr::{
    AssignOp, BinaryOp, IrExpr, LiteralValue, LogicalOp, ObjectProperty, UnaryOp, UpdateOp,
};
pub use module::{ImportBinding, ImportedName, IrModule};
pub use stmt::{
    CatchClause, ClassDecl, ClassMember, EnumDecl, EnumMember, FunctionDecl, HeritageClause,
    InterfaceDecl, InterfaceMember, IrStmt, MethodMember, PropertyMember, SwitchCase,
    TypeAliasDecl, VariableDecl, VariableDeclarator,
};
pub use type_key::type_key;
pub use types::{
    ArrayOrigin, IndexSignature, IrType, ObjectMember, Parameter, PrimitiveName, TypeParameter,
};
