/**
 * Proto Record Builder Spec
 *
 * Lowering of binding expressions into proto records.
 */
use std::rc::Rc;
use view_compiler::change_detection::{
    BindingRecord, DirectiveIndex, DirectiveRecord, FuncOrValue, LifecycleEvent, LifecycleHooks,
    ProtoRecord, ProtoRecordBuilder, RecordType,
};
use view_compiler::error::CompilerError;
use view_compiler::expression_parser::{Parser, AST};

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(input: &str) -> AST {
        Parser::new().parse_binding(input, "test").unwrap().ast
    }

    fn action(input: &str) -> AST {
        Parser::new().parse_action(input, "test").unwrap().ast
    }

    fn build(ast: AST, variables: &[&str]) -> Vec<ProtoRecord> {
        let variables: Vec<String> = variables.iter().map(|v| v.to_string()).collect();
        let mut builder = ProtoRecordBuilder::new();
        builder
            .add(Rc::new(BindingRecord::element_property(0, "prop", ast)), &variables, 0)
            .unwrap();
        builder.into_records()
    }

    fn directive(element_index: usize, directive_index: usize) -> Rc<DirectiveRecord> {
        Rc::new(DirectiveRecord::new(
            DirectiveIndex::new(element_index, directive_index),
            LifecycleHooks::DO_CHECK,
        ))
    }

    mod property_reads {
        use super::*;

        #[test]
        fn should_create_a_record_per_read() {
            let rs = build(binding("a.b"), &[]);

            assert_eq!(rs.len(), 2);
            assert_eq!(rs[0].mode, RecordType::PropertyRead);
            assert_eq!(rs[0].name, "a");
            assert_eq!(rs[0].context_index, 0);
            assert_eq!(rs[1].name, "b");
            assert_eq!(rs[1].context_index, 1);
            assert_eq!(rs[1].func_or_value, FuncOrValue::Accessor("b".to_string()));
        }

        #[test]
        fn should_mark_the_last_record() {
            let rs = build(binding("a.b"), &[]);

            assert!(!rs[0].last_in_binding);
            assert!(rs[1].last_in_binding);
            assert!(rs[1].last_in_directive);
        }

        #[test]
        fn should_read_locals_as_local_records() {
            let rs = build(binding("item.name"), &["item"]);

            assert_eq!(rs[0].mode, RecordType::Local);
            assert_eq!(rs[1].mode, RecordType::PropertyRead);
        }

        #[test]
        fn should_use_safe_records_for_safe_navigation() {
            let rs = build(binding("a?.b"), &[]);
            assert_eq!(rs[1].mode, RecordType::SafeProperty);
        }
    }

    mod pure_functions {
        use super::*;

        #[test]
        fn should_mark_arguments_of_binary_operations() {
            let rs = build(binding("a + b"), &[]);

            assert_eq!(rs.len(), 3);
            assert_eq!(rs[2].mode, RecordType::PrimitiveOp);
            assert_eq!(rs[2].name, "operation_add");
            assert_eq!(rs[2].args.as_slice(), &[1, 2]);
            assert!(rs[0].argument_to_pure_function);
            assert!(rs[1].argument_to_pure_function);
            assert!(!rs[2].argument_to_pure_function);
        }

        #[test]
        fn should_name_collection_literals_by_shape() {
            let rs = build(binding("[a, b]"), &[]);
            assert_eq!(rs[2].mode, RecordType::CollectionLiteral);
            assert_eq!(rs[2].name, "arrayFn2");

            let rs = build(binding("{x: a}"), &[]);
            assert_eq!(rs[1].name, "mapFn([x])");
        }

        #[test]
        fn should_mark_pipe_inputs() {
            let rs = build(binding("a | date:b"), &[]);

            assert_eq!(rs.len(), 3);
            assert_eq!(rs[2].mode, RecordType::Pipe);
            assert_eq!(rs[2].name, "date");
            assert_eq!(rs[2].context_index, 1);
            assert_eq!(rs[2].args.as_slice(), &[2]);
            assert!(rs[0].argument_to_pure_function);
            assert!(rs[1].argument_to_pure_function);
        }

        #[test]
        fn should_keep_interpolation_strings() {
            let ast = Parser::new()
                .parse_interpolation("{{a}} and {{b}}", "test")
                .unwrap()
                .unwrap()
                .ast;
            let rs = build(ast, &[]);

            assert_eq!(rs[2].mode, RecordType::Interpolate);
            assert_eq!(rs[2].args.as_slice(), &[1, 2]);
            assert_eq!(rs[2].fixed_args, vec!["", " and ", ""]);
        }
    }

    mod calls {
        use super::*;

        #[test]
        fn should_invoke_methods_on_the_context() {
            let rs = build(binding("save(a)"), &[]);

            assert_eq!(rs.len(), 2);
            assert_eq!(rs[1].mode, RecordType::InvokeMethod);
            assert_eq!(rs[1].args.as_slice(), &[1]);
        }

        #[test]
        fn should_invoke_local_closures() {
            let rs = build(binding("fn(1)"), &["fn"]);

            assert_eq!(rs.len(), 3);
            assert_eq!(rs[0].mode, RecordType::Const);
            assert_eq!(rs[1].mode, RecordType::Local);
            assert_eq!(rs[2].mode, RecordType::InvokeClosure);
            assert_eq!(rs[2].context_index, 2);
        }
    }

    mod actions {
        use super::*;

        #[test]
        fn should_reject_assignments_to_locals() {
            let mut builder = ProtoRecordBuilder::new();
            let result = builder.add(
                Rc::new(BindingRecord::element_property(0, "prop", action("item = 1"))),
                &["item".to_string()],
                0,
            );

            assert_eq!(
                result,
                Err(CompilerError::VariableReassignment {
                    name: "item".to_string()
                })
            );
        }

        #[test]
        fn should_write_to_context_properties() {
            let rs = build(action("value = 1"), &[]);
            assert_eq!(rs.last().unwrap().mode, RecordType::PropertyWrite);
        }
    }

    mod directives {
        use super::*;

        #[test]
        fn should_add_lifecycle_records() {
            let dir = directive(0, 0);
            let mut builder = ProtoRecordBuilder::new();
            builder
                .add(
                    Rc::new(BindingRecord::directive_lifecycle(dir, LifecycleEvent::DoCheck)),
                    &[],
                    0,
                )
                .unwrap();
            let rs = builder.records();

            assert_eq!(rs.len(), 1);
            assert_eq!(rs[0].mode, RecordType::DirectiveLifecycle);
            assert_eq!(rs[0].name, "doCheck");
            assert_eq!(rs[0].directive_index, Some(DirectiveIndex::new(0, 0)));
            assert!(rs[0].is_lifecycle_record());
        }

        #[test]
        fn should_read_host_properties_from_the_directive() {
            let dir = directive(1, 2);
            let mut builder = ProtoRecordBuilder::new();
            builder
                .add(Rc::new(BindingRecord::host_property(dir, "title", binding("name"))), &[], 0)
                .unwrap();
            let rs = builder.records();

            assert_eq!(rs[0].context_index, 0);
            assert_eq!(rs[0].directive_index, Some(DirectiveIndex::new(1, 2)));
        }

        #[test]
        fn should_clear_last_in_directive_for_earlier_bindings_of_the_same_directive() {
            let dir = directive(0, 0);
            let other = directive(0, 1);
            let mut builder = ProtoRecordBuilder::new();
            builder
                .add(Rc::new(BindingRecord::directive_property(dir.clone(), "a", binding("a"))), &[], 0)
                .unwrap();
            builder
                .add(Rc::new(BindingRecord::directive_property(dir, "b", binding("b"))), &[], 1)
                .unwrap();
            builder
                .add(Rc::new(BindingRecord::directive_property(other, "c", binding("c"))), &[], 2)
                .unwrap();
            let rs = builder.records();

            assert!(!rs[0].last_in_directive);
            assert!(rs[1].last_in_directive);
            assert!(rs[2].last_in_directive);
            assert_eq!(rs[1].property_binding_index, 1);
        }
    }
}
