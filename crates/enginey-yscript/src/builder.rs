use crate::ast::{Expr, Stmt};
use crate::error::BuildError;
use crate::node::{Literal, NodeGraph, NodeId, NodeType, Property, PropertyType};
use crate::token::{Token, TokenKind};

type BuildResult<T> = Result<T, BuildError>;

/// The node being described and the properties collected for it so far.
struct Scope<'a> {
    node: NodeId,
    properties: Vec<Property<'a>>,
}

// ── NodeBuilder ───────────────────────────────────────────────────────────

/// Converts a parsed program into a [`NodeGraph`] and project metadata.
///
/// The graph borrows string values and node ids from the program. The first
/// error aborts the build and the partial graph is dropped.
#[derive(Default)]
pub struct NodeBuilder<'a> {
    graph: NodeGraph<'a>,
}

impl<'a> NodeBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(mut self, program: &'a [Stmt]) -> BuildResult<NodeGraph<'a>> {
        for stmt in program {
            self.statement(stmt, None)?;
        }
        log::debug!("built {} node(s), {} root(s)", self.graph.len(), self.graph.root_ids().len());
        Ok(self.graph)
    }

    fn statement(&mut self, stmt: &'a Stmt, mut scope: Option<&mut Scope<'a>>) -> BuildResult<()> {
        match stmt {
            Stmt::Expr(expr) => self.expression_statement(expr, scope)?,
            Stmt::Project { name, metadata } => {
                let properties = collect_properties(metadata)?;
                let meta = self.graph.metadata_mut();
                meta.project_name = &name.text;
                meta.properties = properties;
            }
            Stmt::Window { name, description } => {
                // Evaluated for type errors only; window settings are not
                // carried on the raw metadata.
                let properties = collect_properties(description)?;
                log::debug!(
                    "window '{}': {} propert(ies) evaluated and discarded",
                    name.text,
                    properties.len()
                );
            }
            Stmt::Resources { properties, .. } => {
                let properties = collect_properties(properties)?;
                self.graph.metadata_mut().resource_properties = properties;
            }
            Stmt::SceneList { scenes, .. } => {
                for scene in scenes {
                    let value = evaluate(scene)?;
                    self.graph.metadata_mut().scene_list.push(value);
                }
            }
            Stmt::NodeDecl { kind, name, body } => {
                self.node_declaration(kind, name, body.as_deref(), scope)?
            }
            Stmt::NodeBody(stmts) => {
                for stmt in stmts {
                    self.statement(stmt, scope.as_deref_mut())?;
                }
            }
            Stmt::Function { name, .. } => log::trace!("skipping function '{}'", name.text),
            Stmt::VarDecl { name, .. } => log::trace!("skipping variable '{}'", name.text),
            Stmt::Block(_) => log::trace!("skipping block"),
        }
        Ok(())
    }

    fn expression_statement(&mut self, expr: &'a Expr, scope: Option<&mut Scope<'a>>) -> BuildResult<()> {
        match expr {
            Expr::Property { kind, values } => {
                let property = property(kind, values)?;
                match scope {
                    Some(scope) => scope.properties.push(property),
                    None => log::warn!(
                        "[{} , {}] property '{}' outside of any node is ignored",
                        kind.line,
                        kind.col,
                        property.kind
                    ),
                }
            }
            other => {
                if let Some(kind) = nested_property(other) {
                    return Err(BuildError::at(
                        kind,
                        format!("Property '{}' must be declared as a statement of its own", kind.text),
                    ));
                }
                if is_constant(other) {
                    // Still type-checked so `-"x";` is rejected.
                    evaluate(other)?;
                } else {
                    let at = other.primary_token();
                    log::trace!("skipping script expression at [{} , {}]", at.line, at.col);
                }
            }
        }
        Ok(())
    }

    fn node_declaration(
        &mut self,
        kind: &'a Token,
        name: &'a Token,
        body: Option<&'a Stmt>,
        parent: Option<&mut Scope<'a>>,
    ) -> BuildResult<()> {
        let node_type = NodeType::from_token(kind.kind)
            .ok_or_else(|| BuildError::at(kind, format!("Invalid node type '{}'", kind.text)))?;
        let id = self.graph.alloc(node_type, &name.text);

        let mut scope = Scope { node: id, properties: Vec::new() };
        if let Some(body) = body {
            self.statement(body, Some(&mut scope))?;
        }
        self.graph.node_mut(id).properties = scope.properties;

        match parent {
            Some(parent) => {
                self.graph.node_mut(id).parent = Some(parent.node);
                self.graph.node_mut(parent.node).children.push(id);
            }
            None => self.graph.roots.push(id),
        }
        Ok(())
    }
}

// ── Evaluation ────────────────────────────────────────────────────────────

fn collect_properties<'a>(exprs: &'a [Expr]) -> BuildResult<Vec<Property<'a>>> {
    let mut properties = Vec::with_capacity(exprs.len());
    for expr in exprs {
        match expr {
            Expr::Property { kind, values } => properties.push(property(kind, values)?),
            other => {
                let at = other.primary_token();
                return Err(BuildError::at(at, "Expected property declaration"));
            }
        }
    }
    Ok(properties)
}

fn property<'a>(kind: &'a Token, values: &'a [Expr]) -> BuildResult<Property<'a>> {
    let property_type = PropertyType::from_token(kind.kind)
        .ok_or_else(|| BuildError::at(kind, format!("Invalid property type '{}'", kind.text)))?;
    let values = values.iter().map(evaluate).collect::<BuildResult<Vec<_>>>()?;

    if let Some(first) = values.first() {
        let class = first.value_class();
        if values.iter().any(|v| v.value_class() != class) {
            return Err(BuildError::at(kind, "Property value list contains incompatible types"));
        }
    }
    Ok(Property { kind: property_type, values })
}

fn evaluate(expr: &Expr) -> BuildResult<Literal<'_>> {
    match expr {
        Expr::Literal(token) => literal(token),
        Expr::Unary { op, right } => {
            let value = evaluate(right)?;
            match (op.kind, value) {
                (TokenKind::Minus, Literal::Float(v)) => Ok(Literal::Float(-v)),
                (TokenKind::Minus, _) => Err(BuildError::at(op, "Unary expression must have a numeric literal")),
                (TokenKind::Bang, Literal::Boolean(b)) => Ok(Literal::Boolean(!b)),
                (TokenKind::Bang, _) => Err(BuildError::at(op, "Unary expression must have a boolean literal")),
                _ => Err(BuildError::at(op, "Invalid unary operator")),
            }
        }
        Expr::Grouping(inner) => evaluate(inner),
        other => Err(BuildError::at(other.primary_token(), "Property value must be a literal")),
    }
}

/// True when `expr` is built from literals, unary operators and groupings only.
fn is_constant(expr: &Expr) -> bool {
    match expr {
        Expr::Literal(_) => true,
        Expr::Unary { right, .. } => is_constant(right),
        Expr::Grouping(inner) => is_constant(inner),
        _ => false,
    }
}

/// The key token of the first property found inside a larger expression.
fn nested_property(expr: &Expr) -> Option<&Token> {
    match expr {
        Expr::Property { kind, .. } => Some(kind),
        Expr::Literal(_) | Expr::Var(_) => None,
        Expr::Access { object, .. } => nested_property(object),
        Expr::Logical { left, right, .. } | Expr::Binary { left, right, .. } => {
            nested_property(left).or_else(|| nested_property(right))
        }
        Expr::Unary { right, .. } => nested_property(right),
        Expr::Grouping(inner) => nested_property(inner),
        Expr::Call { callee, args } => nested_property(callee).or_else(|| args.iter().find_map(nested_property)),
        Expr::Assign { value, .. } => nested_property(value),
    }
}

fn literal(token: &Token) -> BuildResult<Literal<'_>> {
    match token.kind {
        TokenKind::True => Ok(Literal::Boolean(true)),
        TokenKind::False => Ok(Literal::Boolean(false)),
        TokenKind::Float => token
            .text
            .parse::<f64>()
            .map(Literal::Float)
            .map_err(|e| BuildError::at(token, format!("Invalid float literal '{}': {e}", token.text))),
        TokenKind::String | TokenKind::Character => Ok(Literal::String(&token.text)),
        _ => Err(BuildError::at(token, "Invalid literal type")),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
