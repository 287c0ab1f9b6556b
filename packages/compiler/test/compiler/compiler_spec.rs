/**
 * Compiler Spec
 *
 * Component compilation: caching, sharing of in-flight compilations,
 * nested and recursive components, host views and error reporting.
 */
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use view_compiler::compiler::{DirectiveValue, MetadataRegistry, Type, ViewMetadata};
use view_compiler::render::{
    DefaultRenderCompiler, DirectiveMetadata, LocalBoxFuture, MergeTree, ProtoViewDto,
    RenderCompiler, RenderProtoViewMergeMapping, StaticTemplateLoader, ViewDefinition, ViewType,
};
use view_compiler::{Compiler, CompilerConfig, CompilerError, Result};

/// Render compiler counting the templates it compiles. Yields before each
/// compilation (once, or as often as set per component) so concurrent
/// requests interleave.
struct CountingRenderCompiler {
    inner: DefaultRenderCompiler,
    compiled: Cell<usize>,
    hosts_compiled: Cell<usize>,
    yields: RefCell<HashMap<String, usize>>,
}

impl RenderCompiler for CountingRenderCompiler {
    fn compile(&self, view: ViewDefinition) -> LocalBoxFuture<'_, Result<ProtoViewDto>> {
        Box::pin(async move {
            self.compiled.set(self.compiled.get() + 1);
            let yields = self.yields.borrow().get(&view.component_id).copied().unwrap_or(1);
            for _ in 0..yields {
                tokio::task::yield_now().await;
            }
            self.inner.compile(view).await
        })
    }

    fn compile_host(&self, directive: DirectiveMetadata) -> LocalBoxFuture<'_, Result<ProtoViewDto>> {
        Box::pin(async move {
            self.hosts_compiled.set(self.hosts_compiled.get() + 1);
            tokio::task::yield_now().await;
            self.inner.compile_host(directive).await
        })
    }

    fn merge_proto_views_recursively(
        &self,
        tree: MergeTree,
    ) -> LocalBoxFuture<'_, Result<Vec<RenderProtoViewMergeMapping>>> {
        self.inner.merge_proto_views_recursively(tree)
    }
}

struct Fixture {
    registry: Rc<MetadataRegistry>,
    loader: Rc<StaticTemplateLoader>,
    render: Rc<CountingRenderCompiler>,
    compiler: Compiler,
}

impl Fixture {
    fn new() -> Self {
        Fixture::with_config(CompilerConfig::default())
    }

    fn with_config(config: CompilerConfig) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let registry = Rc::new(MetadataRegistry::new());
        let loader = Rc::new(StaticTemplateLoader::new());
        let render = Rc::new(CountingRenderCompiler {
            inner: DefaultRenderCompiler::new(loader.clone(), &config),
            compiled: Cell::new(0),
            hosts_compiled: Cell::new(0),
            yields: RefCell::new(HashMap::new()),
        });
        let compiler = Compiler::with_registry(registry.clone(), render.clone(), &config);
        Fixture {
            registry,
            loader,
            render,
            compiler,
        }
    }

    fn component(&self, name: &str, selector: &str, view: ViewMetadata) {
        self.registry.register_component(name, metadata(selector), view);
    }

    fn compiled_templates(&self) -> usize {
        self.render.compiled.get()
    }

    /// Make the template compilation of `name` yield `count` times.
    fn delay(&self, name: &str, count: usize) {
        self.render.yields.borrow_mut().insert(name.to_string(), count);
    }
}

fn metadata(selector: &str) -> DirectiveMetadata {
    DirectiveMetadata {
        selector: Some(selector.to_string()),
        ..DirectiveMetadata::default()
    }
}

fn view(template: &str, directives: &[&str]) -> ViewMetadata {
    ViewMetadata::with_template(template).directives(directives.iter().map(|&d| d.into()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod compile {
        use super::*;

        #[tokio::test]
        async fn should_compile_a_component() {
            let f = Fixture::new();
            f.component("Cmp", "cmp", view("<div>{{greeting}}</div>", &[]));

            let proto_view = f.compiler.compile("Cmp").await.unwrap();

            assert_eq!(proto_view.view_type, ViewType::Component);
            assert_eq!(proto_view.element_binders.len(), 1);
            assert!(proto_view.is_merged());
            assert_eq!(proto_view.proto_change_detector.id, "cmp_component_0");
            assert!(!proto_view.proto_change_detector.records.is_empty());
        }

        #[tokio::test]
        async fn should_cache_compiled_components() {
            let f = Fixture::new();
            f.component("Cmp", "cmp", view("<b></b>", &[]));

            let first = f.compiler.compile("Cmp").await.unwrap();
            let second = f.compiler.compile("Cmp").await.unwrap();

            assert!(Rc::ptr_eq(&first, &second));
            assert_eq!(f.compiled_templates(), 1);
            assert!(Rc::ptr_eq(&f.compiler.cache().get(&Type::new("Cmp")).unwrap(), &first));
        }

        #[tokio::test]
        async fn should_recompile_after_the_cache_is_cleared() {
            let f = Fixture::new();
            f.component("Cmp", "cmp", view("<b></b>", &[]));

            let first = f.compiler.compile("Cmp").await.unwrap();
            f.compiler.clear_cache();
            let second = f.compiler.compile("Cmp").await.unwrap();

            assert!(!Rc::ptr_eq(&first, &second));
            assert_eq!(f.compiled_templates(), 2);
        }

        #[tokio::test]
        async fn should_share_concurrent_compilations() {
            let f = Fixture::new();
            f.component("Cmp", "cmp", view("<b></b>", &[]));

            let (first, second) = tokio::join!(f.compiler.compile("Cmp"), f.compiler.compile("Cmp"));

            assert!(Rc::ptr_eq(&first.unwrap(), &second.unwrap()));
            assert_eq!(f.compiled_templates(), 1);
        }

        #[tokio::test]
        async fn should_load_templates_relative_to_the_component_url() {
            let f = Fixture::with_config(CompilerConfig {
                app_root_url: Some("http://app.com/".to_string()),
                ..CompilerConfig::default()
            });
            f.component("Cmp", "cmp", ViewMetadata::with_template_url("cmp.html"));
            f.registry.set_component_url("Cmp", "cmp/cmp.ts");
            f.loader.add("http://app.com/cmp/cmp.html", "<p [title]=\"t\"></p>");

            let proto_view = f.compiler.compile("Cmp").await.unwrap();

            assert_eq!(proto_view.element_binders.len(), 1);
        }

        #[tokio::test]
        async fn should_resolve_forward_refs() {
            let f = Fixture::new();
            f.component("Cmp", "cmp", view("<b></b>", &[]));

            let proto_view = f
                .compiler
                .compile(DirectiveValue::forward_ref(|| "Cmp".into()))
                .await
                .unwrap();

            assert_eq!(proto_view.view_type, ViewType::Component);
        }
    }

    mod nested_components {
        use super::*;

        #[tokio::test]
        async fn should_compile_and_merge_nested_components() {
            let f = Fixture::new();
            f.component("Parent", "parent", view("<child></child>", &["Child"]));
            f.component("Child", "child", view("<b>{{x}}</b>", &[]));

            let parent = f.compiler.compile("Parent").await.unwrap();

            let child = f.compiler.cache().get(&Type::new("Child")).unwrap();
            let nested = parent.element_binders[0].nested_proto_view().unwrap();
            assert!(Rc::ptr_eq(nested, &child));
            assert!(child.is_merged());

            let mapping = parent.merge_mapping().unwrap();
            assert_eq!(mapping.host_element_indices_by_view_index, vec![None, Some(1)]);
            assert_eq!(mapping.nested_view_count_by_view_index, vec![1, 0]);
            assert_eq!(mapping.render_element_indices.len(), 4);
        }

        #[tokio::test]
        async fn should_compile_components_used_in_embedded_views() {
            let f = Fixture::new();
            f.component("Parent", "parent", view("<child *ng-if=\"show\"></child>", &["Child"]));
            f.component("Child", "child", view("<b></b>", &[]));

            let parent = f.compiler.compile("Parent").await.unwrap();

            let embedded = parent.element_binders[0].nested_proto_view().unwrap();
            assert_eq!(embedded.view_type, ViewType::Embedded);
            assert!(embedded.is_merged());
            assert!(embedded.element_binders[0].has_static_component());
        }

        #[tokio::test]
        async fn should_compile_a_shared_child_once() {
            let f = Fixture::new();
            f.component("Parent", "parent", view("<child></child><child></child>", &["Child"]));
            f.component("Child", "child", view("<b></b>", &[]));

            let parent = f.compiler.compile("Parent").await.unwrap();

            assert_eq!(f.compiled_templates(), 2);
            let first = parent.element_binders[0].nested_proto_view().unwrap();
            let second = parent.element_binders[1].nested_proto_view().unwrap();
            assert!(Rc::ptr_eq(first, second));
            assert_eq!(parent.merge_mapping().unwrap().host_element_indices_by_view_index.len(), 3);
        }

        #[tokio::test]
        async fn should_support_recursion_through_embedded_views() {
            let f = Fixture::new();
            f.component("Tree", "tree", view("<b></b><tree *ng-if=\"expanded\"></tree>", &["Tree"]));

            let tree = f.compiler.compile("Tree").await.unwrap();

            assert!(tree.is_merged());
            let embedded = tree.element_binders[0].nested_proto_view().unwrap();
            assert!(Rc::ptr_eq(embedded.element_binders[0].nested_proto_view().unwrap(), &tree));
            assert!(embedded.is_merged());
        }

        #[tokio::test]
        async fn should_wait_for_nested_components_compiled_by_another_request() {
            let f = Fixture::new();
            f.component("A", "a-cmp", view("<b-cmp></b-cmp>", &["B"]));
            f.component("B", "b-cmp", view("<c-cmp></c-cmp>", &["C"]));
            f.component("C", "c-cmp", view("<i></i>", &[]));
            f.delay("A", 3);
            f.delay("B", 0);
            f.delay("C", 6);

            let (a, b) = tokio::join!(f.compiler.compile("A"), f.compiler.compile("B"));

            let a = a.unwrap();
            let b = b.unwrap();
            assert!(a.is_merged());
            assert!(b.is_merged());
            assert!(Rc::ptr_eq(a.element_binders[0].nested_proto_view().unwrap(), &b));
            assert_eq!(f.compiled_templates(), 3);
        }

        #[tokio::test]
        async fn should_join_a_compilation_that_is_still_merging() {
            let f = Fixture::new();
            f.component("Parent", "parent", view("<child></child>", &["Child"]));
            f.component("Child", "child", view("<b></b>", &[]));
            f.delay("Parent", 0);
            f.delay("Child", 4);

            let first = f.compiler.compile("Parent");
            let second = async {
                tokio::task::yield_now().await;
                f.compiler.compile("Parent").await
            };
            let (first, second) = tokio::join!(first, second);

            let second = second.unwrap();
            assert!(second.is_merged());
            assert!(Rc::ptr_eq(&first.unwrap(), &second));
            assert_eq!(f.compiled_templates(), 2);
        }

        #[tokio::test]
        async fn should_support_recursion_across_concurrent_requests() {
            let f = Fixture::new();
            f.component("Parent", "parent", view("<child></child>", &["Child"]));
            f.component("Child", "child", view("<parent *ng-if=\"open\"></parent>", &["Parent"]));
            f.delay("Child", 2);

            let (parent, child) = tokio::join!(f.compiler.compile("Parent"), f.compiler.compile("Child"));

            let parent = parent.unwrap();
            let child = child.unwrap();
            assert!(parent.is_merged());
            assert!(child.is_merged());
            let embedded = child.element_binders[0].nested_proto_view().unwrap();
            assert!(embedded.is_merged());
            assert!(Rc::ptr_eq(embedded.element_binders[0].nested_proto_view().unwrap(), &parent));
        }

        #[tokio::test]
        async fn should_reject_unconditional_cycles() {
            let f = Fixture::new();
            f.component("Loop", "loop", view("<loop></loop>", &["Loop"]));

            let err = f.compiler.compile("Loop").await.unwrap_err();

            assert_eq!(err.to_string(), "Unconditional component cycle in Loop");
            assert!(f.compiler.cache().get(&Type::new("Loop")).is_none());
        }
    }

    mod host_views {
        use super::*;

        #[tokio::test]
        async fn should_compile_a_host_view() {
            let f = Fixture::new();
            f.component("Cmp", "my-cmp", view("<b></b>", &[]));

            let host = f.compiler.compile_in_host("Cmp").await.unwrap();

            let host_view = host.proto_view();
            assert_eq!(host_view.view_type, ViewType::Host);
            assert!(host_view.is_merged());
            let component = host_view.element_binders[0].nested_proto_view().unwrap();
            assert!(Rc::ptr_eq(component, &f.compiler.cache().get(&Type::new("Cmp")).unwrap()));
        }

        #[tokio::test]
        async fn should_cache_host_views() {
            let f = Fixture::new();
            f.component("Cmp", "my-cmp", view("<b></b>", &[]));

            let first = f.compiler.compile_in_host("Cmp").await.unwrap();
            let second = f.compiler.compile_in_host("Cmp").await.unwrap();

            assert_eq!(first, second);
            assert!(f.compiler.cache().get_host(&Type::new("Cmp")).is_some());
        }

        #[tokio::test]
        async fn should_share_concurrent_host_compilations() {
            let f = Fixture::new();
            f.component("Cmp", "my-cmp", view("<b></b>", &[]));
            f.delay("Cmp", 3);

            let (first, second) = tokio::join!(f.compiler.compile_in_host("Cmp"), f.compiler.compile_in_host("Cmp"));

            let (first, second) = (first.unwrap(), second.unwrap());
            assert_eq!(first, second);
            assert!(second.proto_view().is_merged());
            assert_eq!(f.render.hosts_compiled.get(), 1);
        }
    }

    mod errors {
        use super::*;

        #[tokio::test]
        async fn should_reject_directives_that_are_not_components() {
            let f = Fixture::new();
            f.registry.register_directive("Dir", metadata("[dir]"));

            let err = f.compiler.compile("Dir").await.unwrap_err();

            assert_eq!(err.to_string(), "Could not load 'Dir' because it is not a component.");
        }

        #[tokio::test]
        async fn should_report_unknown_components() {
            let f = Fixture::new();

            let err = f.compiler.compile("Unknown").await.unwrap_err();

            assert_eq!(err.to_string(), "No Directive annotation found on Unknown");
        }

        #[tokio::test]
        async fn should_report_invalid_directive_values() {
            let f = Fixture::new();
            f.component(
                "Cmp",
                "cmp",
                ViewMetadata::with_template("<b></b>").directives(vec![DirectiveValue::Invalid("42".to_string())]),
            );

            let err = f.compiler.compile("Cmp").await.unwrap_err();

            assert_eq!(
                err,
                CompilerError::InvalidDirective {
                    value: "42".to_string(),
                    component: "Cmp".to_string(),
                }
            );
            assert_eq!(
                err.to_string(),
                "Unexpected directive value '42' on the View of component 'Cmp'"
            );
        }

        #[tokio::test]
        async fn should_invalidate_the_cache_when_a_nested_component_fails() {
            let f = Fixture::new();
            f.component("Parent", "parent", view("<child></child>", &["Child"]));
            f.component("Child", "child", ViewMetadata::with_template_url("child.html"));

            let err = f.compiler.compile("Parent").await.unwrap_err();

            assert!(matches!(err, CompilerError::TemplateLoad { .. }));
            assert!(f.compiler.cache().get(&Type::new("Parent")).is_none());
            assert!(f.compiler.cache().get(&Type::new("Child")).is_none());
        }

        #[tokio::test]
        async fn should_retry_after_a_failed_compilation() {
            let f = Fixture::new();
            f.component("Cmp", "cmp", ViewMetadata::with_template_url("/cmp.html"));

            assert!(f.compiler.compile("Cmp").await.is_err());
            f.loader.add("/cmp.html", "<b></b>");

            assert!(f.compiler.compile("Cmp").await.is_ok());
            assert_eq!(f.compiled_templates(), 2);
        }

        #[tokio::test]
        async fn should_report_template_errors_in_host_compilation() {
            let f = Fixture::new();
            f.component("Cmp", "my-cmp", view("<div></span>", &[]));

            let err = f.compiler.compile_in_host("Cmp").await.unwrap_err();

            assert!(matches!(err, CompilerError::TemplateParse { .. }));
            assert!(f.compiler.cache().get_host(&Type::new("Cmp")).is_none());
        }
    }
}
