//! Syntax tree consumed by the resolver and the interpreter.
//!
//! Nodes own their names (`Ident`) instead of borrowing tokens so a parsed
//! program, and every closure created from it, can outlive the source text.
//! Nodes that the resolver binds (`Variable`, `Assign`, `This`, `Super`) carry
//! an [`ExprId`]; the distance table is keyed by it.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Identity of a resolvable expression node, unique for the whole process so
/// trees parsed by separate REPL lines never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(usize);

impl ExprId {
    pub fn fresh() -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(0);

        ExprId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A name as written in the source, with the line it appeared on.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub lexeme: String,
    pub line: usize,
}

impl Ident {
    pub fn new<S: Into<String>>(lexeme: S, line: usize) -> Self {
        Self {
            lexeme: lexeme.into(),
            line,
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lexeme)
    }
}

/// A **literal constant** that appears directly in the source code.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Number(f64),
    Str(String),
    True,
    False,
    Nil,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`
    Negate,
    /// `!x`
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Plus,
    Minus,
    Star,
    Slash,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Equal,
    NotEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// A reference to a variable by name.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableRef {
    pub id: ExprId,
    pub name: Ident,
}

impl VariableRef {
    pub fn new(name: Ident) -> Self {
        Self {
            id: ExprId::fresh(),
            name,
        }
    }
}

/// Every kind of *expression* in Lox.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(LiteralValue),

    /// Parenthesised sub‑expression.
    Grouping(Box<Expr>),

    Unary {
        operator: UnaryOp,
        /// Line of the operator, for runtime errors.
        line: usize,
        right: Box<Expr>,
    },

    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        line: usize,
        right: Box<Expr>,
    },

    /// Short‑circuiting `and` / `or`.
    Logical {
        left: Box<Expr>,
        operator: LogicalOp,
        right: Box<Expr>,
    },

    Variable(VariableRef),

    Assign {
        id: ExprId,
        name: Ident,
        value: Box<Expr>,
    },

    Call {
        callee: Box<Expr>,
        /// Line of the closing `)`.
        paren_line: usize,
        arguments: Vec<Expr>,
    },

    /// `object.name`
    Get { object: Box<Expr>, name: Ident },

    /// `object.name = value`
    Set {
        object: Box<Expr>,
        name: Ident,
        value: Box<Expr>,
    },

    This { id: ExprId, keyword: Ident },

    /// `super.method`
    Super {
        id: ExprId,
        keyword: Ident,
        method: Ident,
    },
}

/// `fun name(params) { body }`, shared by every function value and bound
/// method created from it.
#[derive(Debug, PartialEq)]
pub struct FunctionDecl {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Vec<Stmt>,
}

/// Every kind of *statement* in Lox.  `for` loops are desugared by the
/// parser into `Block` + `While`.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expression(Expr),

    Print(Expr),

    Var {
        name: Ident,
        initializer: Option<Expr>,
    },

    Block(Vec<Stmt>),

    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    While {
        condition: Expr,
        body: Box<Stmt>,
    },

    Function(Rc<FunctionDecl>),

    Return {
        keyword: Ident,
        value: Option<Expr>,
    },

    Class {
        name: Ident,
        superclass: Option<VariableRef>,
        methods: Vec<Rc<FunctionDecl>>,
    },
}
