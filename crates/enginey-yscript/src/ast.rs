use crate::printer::TreePrinter;
use crate::token::Token;

// ── Expr ──────────────────────────────────────────────────────────────────

/// Expression nodes. Every variant owns its sub-expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `true`, `1.0`, `"text"`, `'c'`
    Literal(Token),
    /// `position: { 0.0, 1.0, 0.0 }`
    Property { kind: Token, values: Vec<Expr> },
    /// `object::name`
    Access { object: Box<Expr>, name: Token },
    /// `a && b`, `a || b`
    Logical { left: Box<Expr>, op: Token, right: Box<Expr> },
    /// `-x`, `!x`
    Unary { op: Token, right: Box<Expr> },
    Binary { left: Box<Expr>, op: Token, right: Box<Expr> },
    Call { callee: Box<Expr>, args: Vec<Expr> },
    Grouping(Box<Expr>),
    Var(Token),
    Assign { name: Token, value: Box<Expr> },
}

impl Expr {
    /// The token used to locate this expression in diagnostics.
    pub fn primary_token(&self) -> &Token {
        match self {
            Expr::Literal(token) | Expr::Var(token) => token,
            Expr::Property { kind, .. } => kind,
            Expr::Access { object, .. } => object.primary_token(),
            Expr::Logical { op, .. } | Expr::Unary { op, .. } | Expr::Binary { op, .. } => op,
            Expr::Call { callee, .. } => callee.primary_token(),
            Expr::Grouping(inner) => inner.primary_token(),
            Expr::Assign { name, .. } => name,
        }
    }

    /// Debug rendering of this expression and its children.
    pub fn print(&self) -> String {
        let mut printer = TreePrinter::new();
        printer.expr(self);
        printer.finish()
    }
}

// ── Stmt ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// `!node<name>(...) { ... }`
    NodeMethod,
    /// `fn name(...) { ... }`
    Function,
    /// `main(...) { ... }`
    EntryPoint,
}

impl FunctionKind {
    pub fn describe(self) -> &'static str {
        match self {
            FunctionKind::NodeMethod => "node-method",
            FunctionKind::Function => "function",
            FunctionKind::EntryPoint => "entry-point",
        }
    }
}

/// Statement nodes. Anonymous declarations (`_`) carry an `EmptyValue`
/// name token with empty text.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    /// `project Name { author: "..."; version: "..."; }`
    Project { name: Token, metadata: Vec<Expr> },
    /// `window Name { title: "..."; }`
    Window { name: Token, description: Vec<Expr> },
    /// `resources { shaders: "..."; }`
    Resources { keyword: Token, properties: Vec<Expr> },
    /// `scenes { "main.ysc", "level.ysc" }`
    SceneList { keyword: Token, scenes: Vec<Expr> },
    /// `node<Type> name { ... }` or `node<Type> name;`
    NodeDecl { kind: Token, name: Token, body: Option<Box<Stmt>> },
    Function {
        kind: FunctionKind,
        /// The node a method is attached to.
        target: Option<Token>,
        name: Token,
        params: Vec<Token>,
        body: Box<Stmt>,
    },
    /// `float speed = 1.0;`
    VarDecl { ty: Token, name: Token, initializer: Option<Expr> },
    NodeBody(Vec<Stmt>),
    Block(Vec<Stmt>),
}

impl Stmt {
    /// Debug rendering of this statement and its children.
    pub fn print(&self) -> String {
        let mut printer = TreePrinter::new();
        printer.stmt(self);
        printer.finish()
    }
}

/// The ordered top-level statements of one source file.
pub type Program = Vec<Stmt>;
