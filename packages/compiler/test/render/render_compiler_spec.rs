/**
 * Render Compiler Spec
 *
 * Template loading, compilation into render proto views, host views and
 * merging of nested views.
 */
use std::rc::Rc;
use view_compiler::render::{
    DefaultRenderCompiler, DirectiveMetadata, DirectiveType, MergeChild, MergeTree, RenderCompiler,
    StaticTemplateLoader, ViewDefinition, ViewType,
};
use view_compiler::{CompilerConfig, CompilerError};

fn compiler(loader: StaticTemplateLoader) -> DefaultRenderCompiler {
    DefaultRenderCompiler::new(Rc::new(loader), &CompilerConfig::default())
}

fn inline_view(id: &str, template: &str, directives: Vec<DirectiveMetadata>) -> ViewDefinition {
    ViewDefinition {
        component_id: id.to_string(),
        template: Some(template.to_string()),
        directives,
        ..ViewDefinition::default()
    }
}

fn component(id: &str, selector: &str) -> DirectiveMetadata {
    DirectiveMetadata {
        id: id.to_string(),
        selector: Some(selector.to_string()),
        directive_type: DirectiveType::Component,
        ..DirectiveMetadata::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod compile {
        use super::*;

        #[tokio::test]
        async fn should_compile_inline_templates() {
            let compiler = compiler(StaticTemplateLoader::new());

            let dto = compiler
                .compile(inline_view("Cmp", "<div>{{greeting}}</div><span></span>", vec![]))
                .await
                .unwrap();

            assert_eq!(dto.view_type, ViewType::Component);
            assert_eq!(dto.element_count, 3);
            assert_eq!(dto.element_binders.len(), 1);
            assert_eq!(dto.element_binders[0].element_index, 1);
            assert_eq!(dto.element_binders[0].text_bindings[0].source, "{{greeting}}");
        }

        #[tokio::test]
        async fn should_load_templates_by_url() {
            let loader = StaticTemplateLoader::new().with_template("/cmp.html", "<p [title]=\"t\"></p>");
            let compiler = compiler(loader);
            let view = ViewDefinition {
                component_id: "Cmp".to_string(),
                template_abs_url: Some("/cmp.html".to_string()),
                ..ViewDefinition::default()
            };

            let dto = compiler.compile(view).await.unwrap();

            assert_eq!(dto.element_binders[0].property_bindings["title"].source, "t");
        }

        #[tokio::test]
        async fn should_prefer_inline_templates_over_urls() {
            let compiler = compiler(StaticTemplateLoader::new());
            let view = ViewDefinition {
                template_abs_url: Some("/missing.html".to_string()),
                ..inline_view("Cmp", "<b></b>", vec![])
            };

            assert!(compiler.compile(view).await.is_ok());
        }

        #[tokio::test]
        async fn should_report_templates_that_cannot_be_loaded() {
            let compiler = compiler(StaticTemplateLoader::new());
            let view = ViewDefinition {
                component_id: "Cmp".to_string(),
                template_abs_url: Some("/missing.html".to_string()),
                ..ViewDefinition::default()
            };

            let err = compiler.compile(view).await.unwrap_err();

            assert_eq!(err.to_string(), "Failed to load /missing.html: not found");
        }

        #[tokio::test]
        async fn should_require_a_template() {
            let compiler = compiler(StaticTemplateLoader::new());
            let view = ViewDefinition {
                component_id: "Cmp".to_string(),
                ..ViewDefinition::default()
            };

            let err = compiler.compile(view).await.unwrap_err();

            assert_eq!(
                err,
                CompilerError::MissingTemplate {
                    component: "Cmp".to_string()
                }
            );
        }

        #[tokio::test]
        async fn should_report_template_parse_errors() {
            let compiler = compiler(StaticTemplateLoader::new());

            let err = compiler
                .compile(inline_view("Cmp", "<div></span>", vec![]))
                .await
                .unwrap_err();

            assert!(matches!(err, CompilerError::TemplateParse { .. }));
            assert!(err.to_string().starts_with("Template parse errors:"));
        }

        #[tokio::test]
        async fn should_mark_component_elements() {
            let compiler = compiler(StaticTemplateLoader::new());

            let dto = compiler
                .compile(inline_view("Cmp", "<child></child>", vec![component("Child", "child")]))
                .await
                .unwrap();

            assert_eq!(dto.element_binders[0].component_directive, Some(0));
            assert!(dto.element_binders[0].nested_proto_view.is_none());
        }

        #[tokio::test]
        async fn should_register_every_view() {
            let compiler = compiler(StaticTemplateLoader::new());

            let dto = compiler
                .compile(inline_view("Cmp", "<template><template></template></template>", vec![]))
                .await
                .unwrap();

            assert_eq!(compiler.view_count(), 3);
            let nested = dto.element_binders[0].nested_proto_view.as_ref().unwrap();
            assert_ne!(nested.render, dto.render);
        }
    }

    mod compile_host {
        use super::*;

        #[tokio::test]
        async fn should_create_a_host_view_for_the_selector() {
            let compiler = compiler(StaticTemplateLoader::new());

            let dto = compiler.compile_host(component("Cmp", "my-cmp")).await.unwrap();

            assert_eq!(dto.view_type, ViewType::Host);
            assert_eq!(dto.element_count, 2);
            assert_eq!(dto.element_binders.len(), 1);
            assert_eq!(dto.element_binders[0].element_index, 1);
            assert_eq!(dto.element_binders[0].component_directive, Some(0));
            assert_eq!(dto.element_binders[0].read_attributes.len(), 0);
        }

        #[tokio::test]
        async fn should_carry_selector_attributes() {
            let compiler = compiler(StaticTemplateLoader::new());

            let dto = compiler.compile_host(component("Cmp", "[my-attr=x]")).await.unwrap();

            assert_eq!(
                dto.element_binders[0].read_attributes.get("my-attr").map(String::as_str),
                Some("x")
            );
        }

        #[tokio::test]
        async fn should_reject_invalid_selectors() {
            let compiler = compiler(StaticTemplateLoader::new());

            let err = compiler
                .compile_host(component("Cmp", ":not(:not(a))"))
                .await
                .unwrap_err();

            assert!(matches!(err, CompilerError::InvalidSelector { .. }));
        }
    }

    mod merge {
        use super::*;

        #[tokio::test]
        async fn should_merge_component_views_into_the_host() {
            let compiler = compiler(StaticTemplateLoader::new());
            let parent = compiler
                .compile(inline_view("Parent", "<p></p><child></child>", vec![component("Child", "child")]))
                .await
                .unwrap();
            let child = compiler.compile(inline_view("Child", "<b></b>", vec![])).await.unwrap();

            let child_mapping = compiler
                .merge_proto_views_recursively(MergeTree::new(child.render))
                .await
                .unwrap()
                .remove(0);
            let mut tree = MergeTree::new(parent.render);
            tree.children.push(MergeChild::Component(child_mapping.merged_proto_view_ref));
            let mappings = compiler.merge_proto_views_recursively(tree).await.unwrap();

            assert_eq!(mappings.len(), 1);
            assert_eq!(mappings[0].view_count(), 2);
            assert_eq!(mappings[0].mapped_element_indices, vec![0, 1, 2, 3, 4]);
            assert_eq!(mappings[0].host_element_indices_by_view_index, vec![None, Some(2)]);
            assert_eq!(mappings[0].nested_view_count_by_view_index, vec![1, 0]);
            assert_eq!(mappings[0].fragment_count, 1);
        }

        #[tokio::test]
        async fn should_merge_embedded_views_separately() {
            let compiler = compiler(StaticTemplateLoader::new());
            let dto = compiler
                .compile(inline_view("Cmp", "<template><i></i></template>", vec![]))
                .await
                .unwrap();
            let nested = dto.element_binders[0].nested_proto_view.as_ref().unwrap();

            let mut tree = MergeTree::new(dto.render);
            tree.children.push(MergeChild::Embedded(MergeTree::new(nested.render)));
            let mappings = compiler.merge_proto_views_recursively(tree).await.unwrap();

            assert_eq!(mappings.len(), 2);
            assert_eq!(mappings[0].mapped_element_indices, vec![0, 1]);
            assert_eq!(mappings[1].mapped_element_indices, vec![0, 1]);
        }

        #[tokio::test]
        async fn should_reject_unknown_views() {
            let compiler = compiler(StaticTemplateLoader::new());

            let err = compiler
                .merge_proto_views_recursively(MergeTree::new(view_compiler::render::RenderProtoViewRef(42)))
                .await
                .unwrap_err();

            assert_eq!(err, CompilerError::UnknownRenderProtoView(42));
        }

        #[tokio::test]
        async fn should_reject_merging_a_merged_view_again() {
            let compiler = compiler(StaticTemplateLoader::new());
            let dto = compiler.compile(inline_view("Cmp", "<b></b>", vec![])).await.unwrap();
            let mapping = compiler
                .merge_proto_views_recursively(MergeTree::new(dto.render))
                .await
                .unwrap()
                .remove(0);

            let err = compiler
                .merge_proto_views_recursively(MergeTree::new(mapping.merged_proto_view_ref))
                .await
                .unwrap_err();

            assert!(matches!(err, CompilerError::InvalidMergeTree { .. }));
        }
    }
}
