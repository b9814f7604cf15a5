use crate::ast::{Expr, Stmt};
use crate::token::Token;

/// Indented, line-per-node rendering of an AST, for diagnostics.
///
/// ```text
/// NodeDecl <Entity> foo
///   NodeBody
///     Expr
///       Property position
///         Literal 0.0
/// ```
pub struct TreePrinter {
    out: String,
    depth: usize,
}

impl TreePrinter {
    pub fn new() -> Self {
        Self { out: String::new(), depth: 0 }
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }

    pub fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(expr) => {
                self.line("Expr");
                self.nested(|p| p.expr(expr));
            }
            Stmt::Project { name, metadata } => {
                self.line(&format!("Project {}", display_name(name)));
                self.nested(|p| metadata.iter().for_each(|e| p.expr(e)));
            }
            Stmt::Window { name, description } => {
                self.line(&format!("Window {}", display_name(name)));
                self.nested(|p| description.iter().for_each(|e| p.expr(e)));
            }
            Stmt::Resources { properties, .. } => {
                self.line("Resources");
                self.nested(|p| properties.iter().for_each(|e| p.expr(e)));
            }
            Stmt::SceneList { scenes, .. } => {
                self.line("SceneList");
                self.nested(|p| scenes.iter().for_each(|e| p.expr(e)));
            }
            Stmt::NodeDecl { kind, name, body } => {
                self.line(&format!("NodeDecl <{}> {}", kind.text, display_name(name)));
                if let Some(body) = body {
                    self.nested(|p| p.stmt(body));
                }
            }
            Stmt::Function { kind, target, name, params, body } => {
                let params: Vec<&str> = params.iter().map(|t| t.text.as_str()).collect();
                let header = match target {
                    Some(target) => format!("{} {}<{}>({})", kind.describe(), target.text, name.text, params.join(", ")),
                    None => format!("{} {}({})", kind.describe(), name.text, params.join(", ")),
                };
                self.line(&header);
                self.nested(|p| p.stmt(body));
            }
            Stmt::VarDecl { ty, name, initializer } => {
                self.line(&format!("VarDecl {} {}", ty.text, name.text));
                if let Some(init) = initializer {
                    self.nested(|p| p.expr(init));
                }
            }
            Stmt::NodeBody(stmts) => {
                self.line("NodeBody");
                self.nested(|p| stmts.iter().for_each(|s| p.stmt(s)));
            }
            Stmt::Block(stmts) => {
                self.line("Block");
                self.nested(|p| stmts.iter().for_each(|s| p.stmt(s)));
            }
        }
    }

    pub fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(token) => self.line(&format!("Literal {}", token.text)),
            Expr::Property { kind, values } => {
                self.line(&format!("Property {}", kind.text));
                self.nested(|p| values.iter().for_each(|v| p.expr(v)));
            }
            Expr::Access { object, name } => {
                self.line(&format!("Access ::{}", name.text));
                self.nested(|p| p.expr(object));
            }
            Expr::Logical { left, op, right } => {
                self.line(&format!("Logical {}", op.text));
                self.nested(|p| {
                    p.expr(left);
                    p.expr(right);
                });
            }
            Expr::Unary { op, right } => {
                self.line(&format!("Unary {}", op.text));
                self.nested(|p| p.expr(right));
            }
            Expr::Binary { left, op, right } => {
                self.line(&format!("Binary {}", op.text));
                self.nested(|p| {
                    p.expr(left);
                    p.expr(right);
                });
            }
            Expr::Call { callee, args } => {
                self.line(&format!("Call ({} args)", args.len()));
                self.nested(|p| {
                    p.expr(callee);
                    args.iter().for_each(|a| p.expr(a));
                });
            }
            Expr::Grouping(inner) => {
                self.line("Grouping");
                self.nested(|p| p.expr(inner));
            }
            Expr::Var(name) => self.line(&format!("Var {}", name.text)),
            Expr::Assign { name, value } => {
                self.line(&format!("Assign {}", name.text));
                self.nested(|p| p.expr(value));
            }
        }
    }
}

impl Default for TreePrinter {
    fn default() -> Self {
        Self::new()
    }
}

fn display_name(name: &Token) -> &str {
    if name.text.is_empty() { "_" } else { &name.text }
}

/// Render a whole program, one top-level statement after another.
pub fn print_program(program: &[Stmt]) -> String {
    let mut printer = TreePrinter::new();
    for stmt in program {
        printer.stmt(stmt);
    }
    printer.finish()
}
