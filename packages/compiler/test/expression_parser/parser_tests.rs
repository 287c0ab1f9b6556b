/**
 * Parser Tests
 *
 * Test suite for binding, action, interpolation and template binding
 * parsing. Expressions are checked by unparsing the resulting AST.
 */

#[cfg(test)]
mod tests {
    use view_compiler::expression_parser::{LiteralValue, Parser, TemplateBinding, AST};

    fn parse_action(text: &str) -> String {
        Parser::new().parse_action(text, "location").unwrap().ast.to_string()
    }

    fn parse_binding(text: &str) -> String {
        Parser::new().parse_binding(text, "location").unwrap().ast.to_string()
    }

    fn action_error(text: &str) -> String {
        Parser::new().parse_action(text, "location").unwrap_err().to_string()
    }

    fn binding_error(text: &str) -> String {
        Parser::new().parse_binding(text, "location").unwrap_err().to_string()
    }

    fn template_bindings(text: &str) -> Vec<TemplateBinding> {
        Parser::new().parse_template_bindings(text, "location").unwrap()
    }

    fn keys(bindings: &[TemplateBinding]) -> Vec<&str> {
        bindings.iter().map(|b| b.key.as_str()).collect()
    }

    mod parse_action {
        use super::*;

        #[test]
        fn should_parse_numbers() {
            assert_eq!(parse_action("1"), "1");
        }

        #[test]
        fn should_parse_strings() {
            assert_eq!(parse_action("'a'"), "\"a\"");
        }

        #[test]
        fn should_parse_null_and_booleans() {
            assert_eq!(parse_action("null"), "null");
            assert_eq!(parse_action("true"), "true");
        }

        #[test]
        fn should_parse_unary_not() {
            assert_eq!(parse_action("!true"), "!true");
            assert_eq!(parse_action("!!true"), "!!true");
        }

        #[test]
        fn should_parse_multiplicative_and_additive_expressions() {
            assert_eq!(parse_action("3*4/2%5"), "3 * 4 / 2 % 5");
            assert_eq!(parse_action("3 + 6 - 2"), "3 + 6 - 2");
        }

        #[test]
        fn should_respect_operator_precedence() {
            let ast = Parser::new().parse_action("1 + 2 * 3", "location").unwrap().ast;
            match ast {
                AST::Binary { operation, right, .. } => {
                    assert_eq!(operation, "+");
                    assert!(matches!(*right, AST::Binary { ref operation, .. } if operation == "*"));
                }
                other => panic!("Expected a binary expression, got {:?}", other),
            }
        }

        #[test]
        fn should_parse_relational_equality_and_logical_expressions() {
            assert_eq!(parse_action("2 < 3"), "2 < 3");
            assert_eq!(parse_action("2 === 3"), "2 === 3");
            assert_eq!(parse_action("true && false || true"), "true && false || true");
        }

        #[test]
        fn should_parse_grouped_expressions() {
            let ast = Parser::new().parse_action("(1 + 2) * 3", "location").unwrap().ast;
            assert!(matches!(ast, AST::Binary { ref operation, .. } if operation == "*"));
        }

        #[test]
        fn should_parse_ternary_expressions() {
            assert_eq!(parse_action("7 == 3 + 4 ? 10 : 20"), "7 == 3 + 4 ? 10 : 20");
        }

        #[test]
        fn should_parse_literal_arrays_and_maps() {
            assert_eq!(parse_action("[1, 2]"), "[1, 2]");
            assert_eq!(parse_action("{a: 1, 'b': 2}"), "{a: 1, b: 2}");
            assert_eq!(parse_action("{}"), "{}");
        }

        #[test]
        fn should_parse_member_access() {
            assert_eq!(parse_action("a.b"), "a.b");
            assert_eq!(parse_action("a?.b"), "a?.b");
            assert_eq!(parse_action("a[1]"), "a[1]");
        }

        #[test]
        fn should_parse_method_calls() {
            assert_eq!(parse_action("fn()"), "fn()");
            assert_eq!(parse_action("add(1, 2)"), "add(1, 2)");
            assert_eq!(parse_action("a.add(1)"), "a.add(1)");
            assert_eq!(parse_action("a?.add(1)"), "a?.add(1)");
        }

        #[test]
        fn should_parse_function_calls() {
            assert_eq!(parse_action("fn()(1, 2)"), "fn()(1, 2)");
        }

        #[test]
        fn should_parse_assignments() {
            assert_eq!(parse_action("a = 12"), "a = 12");
            assert_eq!(parse_action("a.a.a = 123"), "a.a.a = 123");
            assert_eq!(parse_action("a[0] = 200"), "a[0] = 200");
        }

        #[test]
        fn should_parse_chains() {
            assert_eq!(parse_action("1;2"), "1; 2");
            assert_eq!(parse_action("a = 1; b()"), "a = 1; b()");
        }

        #[test]
        fn should_report_non_assignable_targets() {
            assert!(action_error("1 = 2").contains("Expression 1 is not assignable"));
        }

        #[test]
        fn should_report_safe_navigation_in_assignments() {
            assert!(action_error("a?.a = 1").contains("The '?.' operator cannot be used in the assignment"));
        }

        #[test]
        fn should_report_pipes_in_actions() {
            assert!(action_error("x|blah").contains("Cannot have a pipe in an action expression"));
        }

        #[test]
        fn should_report_unexpected_tokens() {
            assert!(action_error("a b").contains("Unexpected token 'b'"));
        }

        #[test]
        fn should_include_the_location_in_errors() {
            assert_eq!(
                action_error("x|blah"),
                "Parser Error: Cannot have a pipe in an action expression at column 3 in [x|blah] in location"
            );
        }
    }

    mod parse_binding {
        use super::*;

        #[test]
        fn should_parse_pipes() {
            assert_eq!(parse_binding("a | b"), "(a | b)");
            assert_eq!(parse_binding("a | b:c"), "(a | b:c)");
            assert_eq!(parse_binding("a | b:(c | d)"), "(a | b:(c | d))");
        }

        #[test]
        fn should_keep_the_source() {
            let ast = Parser::new().parse_binding("a.b", "location").unwrap();
            assert_eq!(ast.source, "a.b");
            assert_eq!(ast.location, "location");
        }

        #[test]
        fn should_parse_the_empty_expression() {
            let ast = Parser::new().parse_binding("", "location").unwrap();
            assert_eq!(ast.ast, AST::EmptyExpr);
        }

        #[test]
        fn should_report_chains() {
            assert!(binding_error("1;2").contains("Binding expression cannot contain chained expression"));
        }

        #[test]
        fn should_report_assignments() {
            assert!(binding_error("a = 2").contains("Binding expression cannot contain assignments"));
        }

        #[test]
        fn should_report_incomplete_conditionals() {
            assert!(binding_error("a ? b").contains("Conditional expression requires all 3 expressions"));
        }
    }

    mod parse_template_bindings {
        use super::*;

        #[test]
        fn should_parse_a_key_without_a_value() {
            let bindings = template_bindings("a");
            assert_eq!(keys(&bindings), vec!["a"]);
            assert!(bindings[0].expression.is_none());
        }

        #[test]
        fn should_camel_case_dashed_keys() {
            let bindings = template_bindings("ng-if cond");
            assert_eq!(keys(&bindings), vec!["ngIf"]);
            assert_eq!(bindings[0].expression.as_ref().unwrap().source, "cond");
        }

        #[test]
        fn should_parse_multiple_keys() {
            let bindings = template_bindings("a 1, b 2");
            assert_eq!(keys(&bindings), vec!["a", "aB"]);
        }

        #[test]
        fn should_detect_variables_with_var_and_hash() {
            let bindings = template_bindings("ng-for #item of items");
            assert_eq!(keys(&bindings), vec!["ngFor", "item", "ngForOf"]);
            assert!(!bindings[0].key_is_var);
            assert!(bindings[1].key_is_var);
            assert_eq!(bindings[1].name.as_deref(), Some("$implicit"));
            assert_eq!(bindings[2].expression.as_ref().unwrap().source, "items");

            let bindings = template_bindings("var i=index");
            assert!(bindings[0].key_is_var);
            assert_eq!(bindings[0].key, "i");
            assert_eq!(bindings[0].name.as_deref(), Some("index"));
        }

        #[test]
        fn should_allow_pipes_in_expressions() {
            let bindings = template_bindings("key value | pipe");
            assert_eq!(bindings[0].expression.as_ref().unwrap().source, "value | pipe");
        }
    }

    mod parse_interpolation {
        use super::*;

        #[test]
        fn should_return_none_for_plain_text() {
            assert!(Parser::new().parse_interpolation("nothing", "location").unwrap().is_none());
        }

        #[test]
        fn should_parse_interpolations() {
            let ast = Parser::new()
                .parse_interpolation("{{a}} and {{b.c}}!", "location")
                .unwrap()
                .unwrap();
            match &ast.ast {
                AST::Interpolation { strings, expressions } => {
                    assert_eq!(strings, &vec!["".to_string(), " and ".to_string(), "!".to_string()]);
                    assert_eq!(expressions.len(), 2);
                }
                other => panic!("Expected an interpolation, got {:?}", other),
            }
            assert_eq!(ast.ast.to_string(), "{{a}} and {{b.c}}!");
        }

        #[test]
        fn should_report_blank_expressions() {
            let err = Parser::new().parse_interpolation("{{}}", "location").unwrap_err();
            assert!(err.to_string().contains("Blank expressions are not allowed in interpolated strings"));
        }
    }

    mod wrap_literal_primitive {
        use super::*;

        #[test]
        fn should_wrap_a_string_as_a_literal() {
            let ast = Parser::new().wrap_literal_primitive("foo", "location");
            assert_eq!(ast.ast, AST::LiteralPrimitive(LiteralValue::String("foo".to_string())));
            assert_eq!(ast.source, "foo");
        }
    }
}
