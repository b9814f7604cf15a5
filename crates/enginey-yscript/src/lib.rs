//! Lexer, parser, AST, and node builder for **YScript**, the EngineY project
//! and scene description language (`.yproj`, `.ysc`).
//!
//! The crate only depends on the `log` facade, so editors and tooling can
//! read project files without linking the engine.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`token`] | `Token`, `TokenKind` |
//! | [`lexer`] | `Lexer`, `lex_file` |
//! | [`error`] | `LexError`, `ParseError`, `BuildError`, `Error` |
//! | [`ast`] | `Expr`, `Stmt`, `Program` |
//! | [`printer`] | `TreePrinter`, `print_program` |
//! | [`parser`] | `Parser` with per-declaration error recovery |
//! | [`node`] | `NodeGraph`, `Node`, `Property`, `Literal`, `RawProjectMetadata` |
//! | [`builder`] | `NodeBuilder` |
//!
//! # Quick start
//!
//! ```rust
//! use enginey_yscript::{NodeBuilder, NodeType, parse_str};
//!
//! let src = r#"
//!     project MyGame { author: "Jane"; }
//!     node<Entity> player {
//!         node<Transform> _ { position: { 0.0, 1.0, 0.0 }; }
//!     }
//! "#;
//!
//! let program = parse_str(src).unwrap();
//! let graph = NodeBuilder::new().build(&program).unwrap();
//! assert_eq!(graph.metadata().project_name, "MyGame");
//! assert_eq!(graph.roots().next().unwrap().kind, NodeType::Entity);
//! ```

pub mod ast;
pub mod builder;
pub mod error;
pub mod lexer;
pub mod node;
pub mod parser;
pub mod printer;
pub mod token;

pub use ast::{Expr, FunctionKind, Program, Stmt};
pub use builder::NodeBuilder;
pub use error::{BuildError, Error, LexError, ParseError};
pub use lexer::{Lexer, lex_file};
pub use node::{Literal, Node, NodeGraph, NodeId, NodeType, Property, PropertyType, RawProjectMetadata, ValueClass};
pub use parser::Parser;
pub use printer::print_program;
pub use token::{Token, TokenKind};

/// Lex and parse a source string.
///
/// Fails on the first lexical error, or with every collected parse error when
/// any declaration failed to parse.
pub fn parse_str(src: &str) -> Result<Program, Error> {
    let tokens = Lexer::new(src).tokenize()?;
    let mut parser = Parser::new(tokens);
    let program = parser.parse();
    if parser.parse_failed() {
        return Err(Error::Parse(parser.errors().to_vec()));
    }
    Ok(program)
}

#[cfg(test)]
mod parse_tests {
    use super::*;

    fn ok(src: &str) -> Program { parse_str(src).unwrap() }
    fn err(src: &str) -> Error { parse_str(src).unwrap_err() }

    #[test] fn statement_per_declaration() {
        let program = ok(r#"
            project MyGame { author: "Jane"; }
            node<Entity> a { node<Transform> _ { scale: { 1.0, 1.0, 1.0 }; } }
            node<Camera> cam;
        "#);
        assert_eq!(program.len(), 3);
    }

    #[test] fn project_metadata_in_order() {
        let program = ok(r#"
            project MyGame {
              author: "Jane";
              version: "1.0.0";
            }
        "#);
        let graph = NodeBuilder::new().build(&program).unwrap();
        let meta = graph.metadata();
        assert_eq!(meta.project_name, "MyGame");
        assert_eq!(
            meta.properties,
            [
                Property { kind: PropertyType::Author, values: vec![Literal::String("Jane")] },
                Property { kind: PropertyType::Version, values: vec![Literal::String("1.0.0")] },
            ]
        );
    }

    #[test] fn entity_with_anonymous_transform() {
        let program = ok(r#"
            node<Entity> foo {
              node<Transform> _ {
                position: { 0.0 , 0.0 , 0.0 };
              }
            }
        "#);
        let graph = NodeBuilder::new().build(&program).unwrap();
        assert_eq!(graph.root_ids().len(), 1);
        let root_id = graph.root_ids()[0];
        let root = &graph[root_id];
        assert_eq!((root.kind, root.id), (NodeType::Entity, "foo"));
        assert_eq!(root.children.len(), 1);

        let child = &graph[root.children[0]];
        assert_eq!((child.kind, child.id), (NodeType::Transform, ""));
        assert_eq!(child.parent, Some(root_id));
        assert_eq!(
            child.properties,
            [Property { kind: PropertyType::Position, values: vec![Literal::Float(0.0); 3] }]
        );
    }

    #[test] fn anonymous_entity_is_rejected_at_underscore() {
        let Error::Parse(errors) = err("node<Entity> _;") else { panic!("expected parse error") };
        assert_eq!((errors[0].line, errors[0].col), (1, 14));
        ok("node<Entity> foo;");
    }

    #[test] fn mixed_property_list_fails_at_property() {
        let program = ok("node<Entity> e {\n  flags: { true, \"x\" };\n}");
        let err = NodeBuilder::new().build(&program).unwrap_err();
        assert_eq!((err.line, err.col), (2, 3));
    }

    #[test] fn negated_string_fails() {
        let program = ok(r#"node<Entity> e { mesh: -"x"; }"#);
        let err = NodeBuilder::new().build(&program).unwrap_err();
        assert!(err.message.contains("numeric literal"));
    }

    #[test] fn recovery_returns_valid_declarations() {
        let tokens = Lexer::new("node<Entity> ; node<Entity> a; node<Camera> b;").tokenize().unwrap();
        let mut parser = Parser::new(tokens);
        let program = parser.parse();
        assert!(parser.parse_failed());
        assert_eq!(program.len(), 2);
    }

    #[test] fn project_node_type_fails_in_builder() {
        let program = ok("node<project> p;");
        let err = NodeBuilder::new().build(&program).unwrap_err();
        assert!(err.message.contains("Invalid node type"));
    }

    #[test] fn parse_error_lists_every_failure() {
        let message = err("node<Entity> _; node<Camera> _;").to_string();
        assert!(message.starts_with("parse failed with 2 error(s)"));
        assert!(message.contains("yscript parser error at [1 , 14]"));
    }

    #[test] fn lex_error_surfaces() {
        assert!(matches!(err(r#"project p { author: "Jane; }"#), Error::Lex(_)));
    }
}
