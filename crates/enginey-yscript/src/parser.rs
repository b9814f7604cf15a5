use crate::ast::{Expr, FunctionKind, Program, Stmt};
use crate::error::ParseError;
use crate::token::{Token, TokenKind};

type ParseResult<T> = Result<T, ParseError>;

const MAX_ARGUMENTS: usize = 255;

/// Deepest combined nesting of blocks, groupings, calls and prefix operators.
const MAX_DEPTH: usize = 64;

// ── Parser ────────────────────────────────────────────────────────────────

/// Recursive-descent parser over a lexed token stream.
///
/// A failed declaration is logged, recorded, and skipped; parsing resumes at
/// the next statement boundary. Any failure marks the whole parse as failed,
/// and the returned program is then for diagnostics only.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    eof: Token,
    aborted: bool,
    errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let eof = tokens
            .last()
            .map(|t| Token::new(TokenKind::EndOfFile, t.line, t.col, ""))
            .unwrap_or_else(|| Token::new(TokenKind::EndOfFile, 0, 0, ""));
        Self { tokens, pos: 0, depth: 0, eof, aborted: false, errors: Vec::new() }
    }

    /// Parse every top-level declaration of the file.
    ///
    /// Returns an empty program when the stream does not begin with the
    /// start-of-file marker.
    pub fn parse(&mut self) -> Program {
        let missing_start = match self.tokens.first() {
            None => Some(ParseError::new("Expected start of file, token stream is empty", 0, 0)),
            Some(first) if first.kind != TokenKind::StartOfFile => {
                Some(ParseError::at(first, "Expected start of file"))
            }
            Some(_) => None,
        };
        if let Some(err) = missing_start {
            self.fail(err);
            return Vec::new();
        }

        self.pos = 1;
        let mut program = Vec::new();
        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                program.push(stmt);
            }
        }
        program
    }

    pub fn parse_failed(&self) -> bool {
        self.aborted
    }

    /// Every error recorded so far, in the order they were raised.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    // ── Token cursor ──────────────────────────────────────────────────────

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn peek_ahead(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).unwrap_or(&self.eof)
    }

    fn previous(&self) -> &Token {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .unwrap_or(&self.eof)
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len() || self.peek().kind == TokenKind::EndOfFile
    }

    fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.previous().clone()
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn match_kind(&mut self, kinds: &[TokenKind]) -> bool {
        if kinds.iter().any(|&k| self.check(k)) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_if(&mut self, pred: fn(TokenKind) -> bool) -> bool {
        if !self.is_at_end() && pred(self.peek().kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind, msg: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_here(msg))
        }
    }

    fn error_here(&self, msg: impl Into<String>) -> ParseError {
        ParseError::at(self.peek(), msg)
    }

    /// Run one level of recursive descent, failing at the current token
    /// once [`MAX_DEPTH`] levels are open.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error_here("Maximum nesting depth exceeded"));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    // ── Error recovery ────────────────────────────────────────────────────

    fn fail(&mut self, err: ParseError) {
        log::error!("{err}");
        self.aborted = true;
        self.errors.push(err);
    }

    /// Skip past the offending token, then up to and including the next `;`.
    fn synchronize(&mut self) {
        self.advance();
        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }
            self.advance();
        }
    }

    // ── Declarations ──────────────────────────────────────────────────────

    fn declaration(&mut self) -> Option<Stmt> {
        match self.try_declaration() {
            Ok(stmt) => Some(stmt),
            Err(err) => {
                self.fail(err);
                self.synchronize();
                None
            }
        }
    }

    fn try_declaration(&mut self) -> ParseResult<Stmt> {
        use TokenKind::*;

        if self.match_kind(&[Project]) {
            return self.project_declaration();
        }
        if self.match_kind(&[Window]) {
            return self.window_declaration();
        }
        // `resources: "..."` on its own is a property, not a block
        if self.check(Resources) && self.peek_ahead(1).kind == OpenBrace {
            self.advance();
            return self.resources_declaration();
        }
        if self.match_kind(&[Scenes]) {
            return self.scene_list();
        }
        if self.match_kind(&[Node]) {
            return self.node_declaration();
        }
        if self.match_kind(&[Bang]) {
            return self.function_declaration(FunctionKind::NodeMethod);
        }
        if self.match_kind(&[Fn]) {
            return self.function_declaration(FunctionKind::Function);
        }
        if self.match_kind(&[Main]) {
            return self.entry_point_declaration();
        }
        if self.match_if(TokenKind::is_value_type) {
            return self.var_declaration();
        }
        self.statement()
    }

    /// Identifier, or `_` for an anonymous declaration.
    fn declaration_name(&mut self, what: &str) -> ParseResult<Token> {
        if self.match_kind(&[TokenKind::Identifier]) {
            Ok(self.previous().clone())
        } else if self.match_kind(&[TokenKind::Underscore]) {
            Ok(Token::anonymous(self.previous()))
        } else {
            Err(self.error_here(format!(
                "Expected {what} identifier or '_' to leave {what} anonymous"
            )))
        }
    }

    /// `{ property ;? ... }` or a bare `;`.
    fn property_block(&mut self, what: &str) -> ParseResult<Vec<Expr>> {
        if self.match_kind(&[TokenKind::OpenBrace]) {
            let mut items = Vec::new();
            while !self.check(TokenKind::CloseBrace) && !self.is_at_end() {
                items.push(self.expression()?);
                self.match_kind(&[TokenKind::Semicolon]);
            }
            self.consume(TokenKind::CloseBrace, &format!("Expected '}}' to close {what} block"))?;
            Ok(items)
        } else if self.match_kind(&[TokenKind::Semicolon]) {
            Ok(Vec::new())
        } else {
            Err(self.error_here(format!("Expected {what} block or ';' to close {what} declaration")))
        }
    }

    fn project_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.declaration_name("project")?;
        let metadata = self.property_block("project metadata")?;
        Ok(Stmt::Project { name, metadata })
    }

    fn window_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.declaration_name("window")?;
        let description = self.property_block("window description")?;
        Ok(Stmt::Window { name, description })
    }

    fn resources_declaration(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();
        let properties = self.property_block("resources")?;
        Ok(Stmt::Resources { keyword, properties })
    }

    fn scene_list(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();
        self.consume(TokenKind::OpenBrace, "Expected '{' to open scene list")?;
        let mut scenes = Vec::new();
        while !self.check(TokenKind::CloseBrace) && !self.is_at_end() {
            scenes.push(self.unary()?);
            self.match_kind(&[TokenKind::Comma]);
        }
        self.consume(TokenKind::CloseBrace, "Expected '}' to close scene list")?;
        self.match_kind(&[TokenKind::Semicolon]);
        Ok(Stmt::SceneList { keyword, scenes })
    }

    fn node_declaration(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LessThan, "Expected '<' to define node type")?;
        if !self.match_if(TokenKind::is_node_type) {
            return Err(self.error_here(format!("Expected node type keyword found '{}'", self.peek().text)));
        }
        let kind = self.previous().clone();
        self.consume(TokenKind::GreaterThan, "Expected '>' to close node type definition")?;

        let name = if self.match_kind(&[TokenKind::Identifier]) {
            self.previous().clone()
        } else {
            if !kind.kind.permits_anonymous() {
                return Err(self.error_here(format!("Node type {} requires identifier", kind.text)));
            }
            let underscore = self.consume(
                TokenKind::Underscore,
                "To leave a node anonymous use '_' in place of the identifier",
            )?;
            Token::anonymous(&underscore)
        };

        let body = if self.match_kind(&[TokenKind::OpenBrace]) {
            Some(Box::new(self.node_block()?))
        } else if self.match_kind(&[TokenKind::Semicolon]) {
            None
        } else {
            return Err(self.error_here("Expected node description or ';' to close node declaration"));
        };

        Ok(Stmt::NodeDecl { kind, name, body })
    }

    fn entry_point_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.previous().clone();
        self.finish_function(FunctionKind::EntryPoint, None, name)
    }

    fn function_declaration(&mut self, kind: FunctionKind) -> ParseResult<Stmt> {
        match kind {
            FunctionKind::NodeMethod => {
                let target = self.consume(TokenKind::Identifier, "Expected node identifier after '!'")?;
                self.consume(TokenKind::LessThan, "Expected '<' to name the node method")?;
                let name = self.consume(
                    TokenKind::Identifier,
                    "Expected method identifier after node identifier",
                )?;
                self.consume(TokenKind::GreaterThan, "Expected '>' to close attached method identifier")?;
                self.finish_function(kind, Some(target), name)
            }
            _ => {
                let name = self.consume(TokenKind::Identifier, "Expected function identifier after 'fn'")?;
                self.finish_function(kind, None, name)
            }
        }
    }

    fn finish_function(&mut self, kind: FunctionKind, target: Option<Token>, name: Token) -> ParseResult<Stmt> {
        use TokenKind::*;

        self.consume(OpenParen, "Expected '(' to open function parameter list")?;
        let mut params = Vec::new();
        if !self.check(CloseParen) {
            loop {
                if params.len() >= MAX_ARGUMENTS {
                    return Err(self.error_here("Cannot have more than 255 parameters"));
                }
                if !self.match_kind(&[Identifier, Float, String, Character]) {
                    return Err(self.error_here("Expected parameter in function declaration"));
                }
                params.push(self.previous().clone());
                if !self.match_kind(&[Comma]) {
                    break;
                }
            }
        }
        self.consume(CloseParen, "Expected ')' to close function parameter list")?;
        self.consume(OpenBrace, &format!("Expected '{{' to open {} body", kind.describe()))?;
        let body = Box::new(self.block()?);

        Ok(Stmt::Function { kind, target, name, params, body })
    }

    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let ty = self.previous().clone();
        let name = self.consume(TokenKind::Identifier, "Expected variable name after type")?;
        let initializer = if self.match_kind(&[TokenKind::Equals]) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenKind::Semicolon, "Expected ';' to close variable declaration")?;
        Ok(Stmt::VarDecl { ty, name, initializer })
    }

    // ── Statements ────────────────────────────────────────────────────────

    fn statement(&mut self) -> ParseResult<Stmt> {
        self.expression_statement()
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expected ';' to close expression statement")?;
        Ok(Stmt::Expr(expr))
    }

    /// Declarations up to (not including) the closing `}`. Failed items are
    /// recorded and skipped.
    fn declarations_until_close(&mut self) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        while !self.check(TokenKind::CloseBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                stmts.push(stmt);
            }
        }
        stmts
    }

    fn node_block(&mut self) -> ParseResult<Stmt> {
        let description = self.nested(|p| Ok(p.declarations_until_close()))?;
        self.consume(TokenKind::CloseBrace, "Expected '}' to close node block")?;
        Ok(Stmt::NodeBody(description))
    }

    fn block(&mut self) -> ParseResult<Stmt> {
        let statements = self.nested(|p| Ok(p.declarations_until_close()))?;
        self.consume(TokenKind::CloseBrace, "Expected '}' to close block")?;
        Ok(Stmt::Block(statements))
    }

    // ── Expressions ───────────────────────────────────────────────────────

    fn expression(&mut self) -> ParseResult<Expr> {
        self.nested(Self::assignment)
    }

    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.operator_assignment()?;
        if self.match_kind(&[TokenKind::Equals]) {
            let equals = self.previous().clone();
            let value = self.nested(Self::assignment)?;
            return match expr {
                Expr::Var(name) => Ok(Expr::Assign { name, value: Box::new(value) }),
                _ => Err(ParseError::at(&equals, "Invalid assignment target")),
            };
        }
        Ok(expr)
    }

    /// `x += y` becomes `x = x + y`.
    fn operator_assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.logical_or()?;
        let Some(op_kind) = self.peek().kind.compound_operator() else {
            return Ok(expr);
        };
        let compound = self.advance();
        let op = Token::new(op_kind, compound.line, compound.col, compound.text.trim_end_matches('='));
        let value = self.nested(Self::operator_assignment)?;

        match expr {
            Expr::Var(name) => Ok(Expr::Assign {
                name: name.clone(),
                value: Box::new(Expr::Binary {
                    left: Box::new(Expr::Var(name)),
                    op,
                    right: Box::new(value),
                }),
            }),
            _ => Err(ParseError::at(&compound, "Invalid assignment target")),
        }
    }

    fn left_assoc(
        &mut self,
        ops: &[TokenKind],
        operand: fn(&mut Self) -> ParseResult<Expr>,
        combine: fn(Box<Expr>, Token, Box<Expr>) -> Expr,
    ) -> ParseResult<Expr> {
        let mut expr = operand(self)?;
        while self.match_kind(ops) {
            let op = self.previous().clone();
            let right = operand(self)?;
            expr = combine(Box::new(expr), op, Box::new(right));
        }
        Ok(expr)
    }

    fn logical_or(&mut self) -> ParseResult<Expr> {
        self.left_assoc(&[TokenKind::OrOr], Self::logical_and, logical)
    }

    fn logical_and(&mut self) -> ParseResult<Expr> {
        self.left_assoc(&[TokenKind::AndAnd], Self::equality, logical)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        self.left_assoc(&[TokenKind::EqualsEquals, TokenKind::BangEquals], Self::comparison, binary)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        use TokenKind::*;
        self.left_assoc(&[LessThan, GreaterThan, LessThanEquals, GreaterThanEquals], Self::term, binary)
    }

    fn term(&mut self) -> ParseResult<Expr> {
        self.left_assoc(&[TokenKind::Plus, TokenKind::Minus], Self::factor, binary)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        use TokenKind::*;
        self.left_assoc(&[Star, Slash, Percent], Self::unary, binary)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if self.match_kind(&[TokenKind::Minus, TokenKind::Bang]) {
            let op = self.previous().clone();
            let right = self.nested(Self::unary)?;
            return Ok(Expr::Unary { op, right: Box::new(right) });
        }
        self.call()
    }

    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;
        loop {
            if self.match_kind(&[TokenKind::OpenParen]) {
                expr = self.finish_call(expr)?;
            } else if self.match_kind(&[TokenKind::ColonColon]) {
                if !(self.match_kind(&[TokenKind::Identifier]) || self.match_if(TokenKind::is_property)) {
                    return Err(self.error_here("Expected property or variable name after '::'"));
                }
                let name = self.previous().clone();
                expr = Expr::Access { object: Box::new(expr), name };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut args = Vec::new();
        if !self.check(TokenKind::CloseParen) {
            loop {
                if args.len() >= MAX_ARGUMENTS {
                    return Err(self.error_here("Cannot have more than 255 arguments"));
                }
                args.push(self.expression()?);
                if !self.match_kind(&[TokenKind::Comma]) {
                    break;
                }
            }
        }
        self.consume(TokenKind::CloseParen, "Expected ')' to close function call")?;
        Ok(Expr::Call { callee: Box::new(callee), args })
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        use TokenKind::*;

        if self.match_if(TokenKind::is_property) {
            return self.property();
        }
        if self.match_kind(&[True, False, Float, String, Character]) {
            return Ok(Expr::Literal(self.previous().clone()));
        }
        if self.match_kind(&[Identifier]) {
            return Ok(Expr::Var(self.previous().clone()));
        }
        if self.match_kind(&[OpenParen]) {
            let expr = self.expression()?;
            self.consume(CloseParen, "Expected ')' to close expression")?;
            return Ok(Expr::Grouping(Box::new(expr)));
        }
        Err(self.error_here("Expected primary expression"))
    }

    /// `key: literal`, `key: variable`, `key: -literal`, or
    /// `key: { v1, v2 ... }` with optional commas between items.
    fn property(&mut self) -> ParseResult<Expr> {
        use TokenKind::*;

        let kind = self.previous().clone();
        self.consume(Colon, "Expected ':' after property type, cannot leave property uninitialized")?;

        let mut values = Vec::new();
        if self.match_kind(&[String, Character, Float, True, False]) {
            values.push(Expr::Literal(self.previous().clone()));
        } else if self.match_kind(&[Identifier]) {
            values.push(Expr::Var(self.previous().clone()));
        } else if self.check(Minus) || self.check(Bang) {
            values.push(self.unary()?);
        } else if self.match_kind(&[OpenBrace]) {
            while !self.check(CloseBrace) && !self.is_at_end() {
                values.push(self.unary()?);
                self.match_kind(&[Comma]);
            }
            self.consume(CloseBrace, "Expected '}' to close property value list")?;
        } else {
            return Err(self.error_here("Expected property value"));
        }

        self.match_kind(&[Comma]);

        if values.is_empty() {
            return Err(ParseError::at(&kind, "Expected at least one property value"));
        }
        Ok(Expr::Property { kind, values })
    }
}

fn logical(left: Box<Expr>, op: Token, right: Box<Expr>) -> Expr {
    Expr::Logical { left, op, right }
}

fn binary(left: Box<Expr>, op: Token, right: Box<Expr>) -> Expr {
    Expr::Binary { left, op, right }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parser_for(src: &str) -> (Program, Parser) {
        let tokens = Lexer::new(src).tokenize().unwrap();
        let mut parser = Parser::new(tokens);
        let program = parser.parse();
        (program, parser)
    }

    fn ok(src: &str) -> Program {
        let (program, parser) = parser_for(src);
        assert!(!parser.parse_failed(), "unexpected errors: {:?}", parser.errors());
        program
    }

    fn failed(src: &str) -> (Program, Parser) {
        let (program, parser) = parser_for(src);
        assert!(parser.parse_failed());
        (program, parser)
    }

    fn single_expr(src: &str) -> Expr {
        match ok(src).remove(0) {
            Stmt::Expr(expr) => expr,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    // ── Top level ─────────────────────────────────────────────────────────

    #[test]
    fn one_statement_per_declaration() {
        let program = ok(r#"
            project MyGame { author: "Jane"; }
            window primary { title: "Game"; }
            node<Entity> a;
            node<Entity> b { node<Transform> _; }
            fn helper() { }
        "#);
        assert_eq!(program.len(), 5);
    }

    #[test]
    fn empty_file() {
        assert!(ok("").is_empty());
    }

    // ── Nesting limit ─────────────────────────────────────────────────────

    fn nesting_error(src: &str) -> ParseError {
        let (_, parser) = failed(src);
        match parser.errors().iter().find(|e| e.message.contains("Maximum nesting depth exceeded")) {
            Some(err) => err.clone(),
            None => panic!("no nesting error in {:?}", parser.errors()),
        }
    }

    #[test]
    fn deep_grouping_is_rejected() {
        let depth = 10_000;
        let src = format!("{}1.0{};", "(".repeat(depth), ")".repeat(depth));
        let (program, parser) = failed(&src);
        assert!(program.is_empty());
        assert_eq!(parser.errors().len(), 1);
        assert_eq!(parser.errors()[0].message, "Maximum nesting depth exceeded");
        assert_eq!(parser.errors()[0].line, 1);
    }

    #[test]
    fn deep_prefix_and_assignment_chains_are_rejected() {
        nesting_error(&format!("{}1.0;", "- ".repeat(10_000)));
        nesting_error(&format!("{}1.0;", "a = ".repeat(10_000)));
        nesting_error(&format!("{}1.0;", "a += ".repeat(10_000)));
        nesting_error(&format!("f({}1.0{});", "g(".repeat(10_000), ")".repeat(10_000)));
    }

    #[test]
    fn deep_node_nesting_is_rejected() {
        let depth = 1_000;
        let src = format!("{}{}", "node<Entity> a { ".repeat(depth), "}".repeat(depth));
        nesting_error(&src);
    }

    #[test]
    fn moderate_nesting_parses() {
        let src = format!("{}1.0{};", "(".repeat(40), ")".repeat(40));
        assert!(matches!(single_expr(&src), Expr::Grouping(_)));

        let src = format!("{}{}", "node<Entity> a { ".repeat(20), "}".repeat(20));
        assert_eq!(ok(&src).len(), 1);
    }

    #[test]
    fn missing_start_of_file_fails_fast() {
        let tokens = vec![
            Token::new(TokenKind::Node, 1, 1, "node"),
            Token::new(TokenKind::EndOfFile, 1, 5, ""),
        ];
        let mut parser = Parser::new(tokens);
        assert!(parser.parse().is_empty());
        assert!(parser.parse_failed());
    }

    #[test]
    fn empty_token_stream_fails_fast() {
        let mut parser = Parser::new(Vec::new());
        assert!(parser.parse().is_empty());
        assert!(parser.parse_failed());
    }

    // ── Project / window / resources / scenes ─────────────────────────────

    #[test]
    fn project_metadata_block() {
        let program = ok(r#"project MyGame { author: "Jane"; version: "1.0.0"; }"#);
        let Stmt::Project { name, metadata } = &program[0] else { panic!("not a project") };
        assert_eq!(name.text, "MyGame");
        assert_eq!(metadata.len(), 2);
    }

    #[test]
    fn anonymous_project_without_block() {
        let program = ok("project _;");
        let Stmt::Project { name, metadata } = &program[0] else { panic!("not a project") };
        assert_eq!(name.kind, TokenKind::EmptyValue);
        assert!(metadata.is_empty());
    }

    #[test]
    fn resources_block_versus_property() {
        let program = ok(r#"
            resources { shaders: "shaders"; textures: "textures"; }
            node<Entity> e { }
        "#);
        assert!(matches!(&program[0], Stmt::Resources { properties, .. } if properties.len() == 2));

        let program = ok(r#"project p { resources: "res"; }"#);
        assert!(matches!(&program[0], Stmt::Project { metadata, .. } if metadata.len() == 1));
    }

    #[test]
    fn scene_list() {
        let program = ok(r#"scenes { "main.ysc", "level.ysc" "credits.ysc" }"#);
        let Stmt::SceneList { scenes, .. } = &program[0] else { panic!("not a scene list") };
        assert_eq!(scenes.len(), 3);
    }

    #[test]
    fn err_project_without_name() {
        let (_, parser) = failed("project { }");
        assert!(parser.errors()[0].message.contains("project identifier"));
    }

    // ── Nodes ─────────────────────────────────────────────────────────────

    #[test]
    fn nested_nodes() {
        let program = ok(r#"
            node<Entity> foo {
                node<Transform> _ {
                    position: { 0.0 , 0.0 , 0.0 };
                }
            }
        "#);
        let Stmt::NodeDecl { kind, name, body: Some(body) } = &program[0] else { panic!("not a node") };
        assert_eq!(kind.kind, TokenKind::Entity);
        assert_eq!(name.text, "foo");
        let Stmt::NodeBody(items) = body.as_ref() else { panic!("not a body") };
        let Stmt::NodeDecl { name: inner, .. } = &items[0] else { panic!("not a node") };
        assert_eq!(inner.kind, TokenKind::EmptyValue);
        assert!(inner.text.is_empty());
    }

    #[test]
    fn node_without_body() {
        let program = ok("node<Camera> main_camera;");
        assert!(matches!(&program[0], Stmt::NodeDecl { body: None, .. }));
    }

    #[test]
    fn err_anonymous_entity_points_at_underscore() {
        let (_, parser) = failed("node<Entity> _;");
        let err = &parser.errors()[0];
        assert_eq!((err.line, err.col), (1, 14));
        assert!(err.message.contains("requires identifier"));
        ok("node<Entity> foo;");
    }

    #[test]
    fn err_unknown_node_type() {
        let (_, parser) = failed("node<Widget> w;");
        assert!(parser.errors()[0].message.contains("Widget"));
    }

    #[test]
    fn err_node_missing_terminator() {
        failed("node<Entity> e node<Entity> f;");
    }

    // ── Recovery ──────────────────────────────────────────────────────────

    #[test]
    fn recovery_keeps_later_declarations() {
        let (program, parser) = failed("node<Entity> _; node<Entity> a; node<Entity> b;");
        assert_eq!(parser.errors().len(), 1);
        assert_eq!(program.len(), 2);
        let names: Vec<&str> = program
            .iter()
            .map(|s| match s {
                Stmt::NodeDecl { name, .. } => name.text.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn recovery_inside_node_block() {
        let (program, parser) = failed("node<Entity> a { node<Entity> _; position: 1.0; }");
        assert_eq!(parser.errors().len(), 1);
        let Stmt::NodeDecl { body: Some(body), .. } = &program[0] else { panic!("not a node") };
        assert!(matches!(body.as_ref(), Stmt::NodeBody(items) if items.len() == 1));
    }

    #[test]
    fn errors_accumulate() {
        let (_, parser) = failed("node<Entity> _; 1.0 node<Entity> b; node<Camera> _;");
        assert_eq!(parser.errors().len(), 3);
    }

    // ── Functions and variables ───────────────────────────────────────────

    #[test]
    fn node_method() {
        let program = ok("!player<jump>(amount, 2.0) { amount = 1.0; }");
        let Stmt::Function { kind, target, name, params, .. } = &program[0] else { panic!("not a function") };
        assert_eq!(*kind, FunctionKind::NodeMethod);
        assert_eq!(target.as_ref().map(|t| t.text.as_str()), Some("player"));
        assert_eq!(name.text, "jump");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn free_function_and_entry_point() {
        let program = ok("fn update(dt) { } main() { update(0.1); }");
        assert!(matches!(&program[0], Stmt::Function { kind: FunctionKind::Function, .. }));
        assert!(matches!(&program[1], Stmt::Function { kind: FunctionKind::EntryPoint, .. }));
    }

    #[test]
    fn err_method_without_name() {
        failed("!player(x) { }");
    }

    #[test]
    fn var_declaration() {
        let program = ok("float velocity = 2.5; bool debug;");
        assert!(matches!(&program[0], Stmt::VarDecl { initializer: Some(_), .. }));
        assert!(matches!(&program[1], Stmt::VarDecl { initializer: None, .. }));
    }

    // ── Expressions ───────────────────────────────────────────────────────

    #[test]
    fn precedence_factor_over_term() {
        let Expr::Binary { op, right, .. } = single_expr("a + b * c;") else { panic!("not binary") };
        assert_eq!(op.kind, TokenKind::Plus);
        assert!(matches!(right.as_ref(), Expr::Binary { op, .. } if op.kind == TokenKind::Star));
    }

    #[test]
    fn logical_binds_looser_than_equality() {
        let Expr::Logical { op, left, .. } = single_expr("a == b || c;") else { panic!("not logical") };
        assert_eq!(op.kind, TokenKind::OrOr);
        assert!(matches!(left.as_ref(), Expr::Binary { .. }));
    }

    #[test]
    fn assignment_is_right_associative() {
        let Expr::Assign { name, value } = single_expr("a = b = 1.0;") else { panic!("not assign") };
        assert_eq!(name.text, "a");
        assert!(matches!(value.as_ref(), Expr::Assign { .. }));
    }

    #[test]
    fn compound_assignment_desugars() {
        let Expr::Assign { name, value } = single_expr("velocity += 2.0;") else { panic!("not assign") };
        assert_eq!(name.text, "velocity");
        let Expr::Binary { left, op, .. } = value.as_ref() else { panic!("not binary") };
        assert_eq!(op.kind, TokenKind::Plus);
        assert_eq!(op.text, "+");
        assert!(matches!(left.as_ref(), Expr::Var(t) if t.text == "velocity"));
    }

    #[test]
    fn err_invalid_assignment_target() {
        let (_, parser) = failed("1.0 = a;");
        assert!(parser.errors()[0].message.contains("Invalid assignment target"));
        failed("(a) += 1.0;");
    }

    #[test]
    fn call_and_access_chain() {
        let Expr::Call { callee, args } = single_expr("player::position::scale(1.0, 2.0);") else {
            panic!("not a call")
        };
        assert_eq!(args.len(), 2);
        assert!(matches!(callee.as_ref(), Expr::Access { name, .. } if name.text == "scale"));
    }

    #[test]
    fn grouping() {
        assert!(matches!(single_expr("(a);"), Expr::Grouping(_)));
    }

    #[test]
    fn err_missing_semicolon() {
        failed("a + b");
    }

    // ── Properties ────────────────────────────────────────────────────────

    #[test]
    fn property_forms() {
        let Expr::Property { values, .. } = single_expr(r#"mesh: "cube";"#) else { panic!() };
        assert_eq!(values.len(), 1);
        let Expr::Property { values, .. } = single_expr("speed: base_speed;") else { panic!() };
        assert!(matches!(values[0], Expr::Var(_)));
        let Expr::Property { values, .. } = single_expr("speed: -1.0;") else { panic!() };
        assert!(matches!(values[0], Expr::Unary { .. }));
        let Expr::Property { values, .. } = single_expr("fullscreen: true;") else { panic!() };
        assert!(matches!(values[0], Expr::Literal(_)));
    }

    #[test]
    fn property_list_commas_are_optional() {
        let Expr::Property { values, .. } = single_expr("color: { 1.0 0.5, -0.25 };") else { panic!() };
        assert_eq!(values.len(), 3);
        assert!(matches!(values[2], Expr::Unary { .. }));
    }

    #[test]
    fn err_property_without_colon() {
        let (_, parser) = failed("position { 1.0 };");
        assert!(parser.errors()[0].message.contains("':'"));
    }

    #[test]
    fn err_empty_property_list() {
        let (_, parser) = failed("position: { };");
        assert!(parser.errors()[0].message.contains("at least one"));
    }
}
