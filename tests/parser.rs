#[cfg(test)]
mod parser_tests {
    use pretty_assertions::assert_eq;

    use rox::ast::{BinaryOp, Expr, LiteralValue, LogicalOp, Stmt};
    use rox::parser::Parser;
    use rox::scanner::Scanner;

    fn parse(source: &str) -> Vec<Stmt> {
        let (tokens, errors) = Scanner::new(source).scan_all();
        assert!(errors.is_empty(), "lex errors: {:?}", errors);

        match Parser::new(&tokens).parse() {
            Ok(statements) => statements,
            Err(errors) => panic!("parse errors: {:?}", errors),
        }
    }

    fn parse_errors(source: &str) -> Vec<String> {
        let (tokens, _) = Scanner::new(source).scan_all();

        match Parser::new(&tokens).parse() {
            Ok(_) => panic!("expected parse errors for {:?}", source),
            Err(errors) => errors.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn precedence_binds_factor_tighter_than_term() {
        let statements = parse("1 + 2 * 3;");

        let Stmt::Expression(Expr::Binary {
            left,
            operator,
            right,
            ..
        }) = &statements[0]
        else {
            panic!("expected binary expression, got {:?}", statements[0]);
        };

        assert_eq!(*operator, BinaryOp::Plus);
        assert_eq!(**left, Expr::Literal(LiteralValue::Number(1.0)));
        assert!(matches!(
            **right,
            Expr::Binary {
                operator: BinaryOp::Star,
                ..
            }
        ));
    }

    #[test]
    fn or_binds_looser_than_and() {
        let statements = parse("a or b and c;");

        let Stmt::Expression(Expr::Logical {
            operator, right, ..
        }) = &statements[0]
        else {
            panic!("expected logical expression");
        };

        assert_eq!(*operator, LogicalOp::Or);
        assert!(matches!(
            **right,
            Expr::Logical {
                operator: LogicalOp::And,
                ..
            }
        ));
    }

    #[test]
    fn for_loop_is_desugared_into_block_and_while() {
        let statements = parse("for (var i = 0; i < 3; i = i + 1) print i;");
        assert_eq!(statements.len(), 1);

        let Stmt::Block(outer) = &statements[0] else {
            panic!("expected outer block, got {:?}", statements[0]);
        };

        assert_eq!(outer.len(), 2);
        assert!(matches!(outer[0], Stmt::Var { ref name, .. } if name.lexeme == "i"));

        let Stmt::While { body, .. } = &outer[1] else {
            panic!("expected while loop");
        };

        let Stmt::Block(inner) = body.as_ref() else {
            panic!("expected body block");
        };

        assert!(matches!(inner[0], Stmt::Print(_)));
        assert!(matches!(inner[1], Stmt::Expression(Expr::Assign { .. })));
    }

    #[test]
    fn for_loop_without_clauses_loops_on_true() {
        let statements = parse("for (;;) print 1;");

        let Stmt::While { condition, body } = &statements[0] else {
            panic!("expected bare while loop, got {:?}", statements[0]);
        };

        assert_eq!(*condition, Expr::Literal(LiteralValue::True));
        assert!(matches!(**body, Stmt::Print(_)));
    }

    #[test]
    fn class_declaration_with_superclass() {
        let statements = parse("class B < A { init(x) { this.x = x; } get() { return super.get(); } }");

        let Stmt::Class {
            name,
            superclass,
            methods,
        } = &statements[0]
        else {
            panic!("expected class");
        };

        assert_eq!(name.lexeme, "B");
        assert_eq!(
            superclass.as_ref().map(|s| s.name.lexeme.as_str()),
            Some("A")
        );

        let names: Vec<&str> = methods.iter().map(|m| m.name.lexeme.as_str()).collect();
        assert_eq!(names, vec!["init", "get"]);
        assert_eq!(methods[0].params.len(), 1);
    }

    #[test]
    fn property_assignment_becomes_set() {
        let statements = parse("a.b.c = 1;");

        let Stmt::Expression(Expr::Set { object, name, .. }) = &statements[0] else {
            panic!("expected set expression");
        };

        assert_eq!(name.lexeme, "c");
        assert!(matches!(**object, Expr::Get { ref name, .. } if name.lexeme == "b"));
    }

    #[test]
    fn invalid_assignment_target() {
        assert_eq!(
            parse_errors("a + b = c;"),
            vec!["[line 1] Error at '=': Invalid assignment target."]
        );
    }

    #[test]
    fn errors_are_collected_across_statements() {
        let errors = parse_errors("var = 1;\nprint 2;\nprint (3;\nvar ok = 4;");

        assert_eq!(
            errors,
            vec![
                "[line 1] Error at '=': Expect variable name.",
                "[line 3] Error at ';': Expect ')' after expression.",
            ]
        );
    }

    #[test]
    fn missing_expression_at_end() {
        assert_eq!(
            parse_errors("print"),
            vec!["[line 1] Error at end: Expect expression."]
        );
    }

    #[test]
    fn super_requires_method_name() {
        assert_eq!(
            parse_errors("print super;"),
            vec!["[line 1] Error at ';': Expect '.' after 'super'."]
        );
    }

    #[test]
    fn too_many_arguments_is_reported() {
        let arguments = vec!["1"; 256].join(", ");
        let errors = parse_errors(&format!("f({});", arguments));

        assert_eq!(
            errors,
            vec!["[line 1] Error at '1': Can't have more than 255 arguments."]
        );
    }
}
