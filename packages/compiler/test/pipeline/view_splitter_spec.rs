/**
 * View Splitter Spec
 *
 * Splitting of `<template>` elements and template attributes into anchors
 * and nested view roots.
 */
use view_compiler::ml_parser::{Element, HtmlParser};
use view_compiler::template::pipeline::{CompileElement, CompilePipeline, ViewSplitter};

fn el(html: &str) -> Element {
    let nodes = HtmlParser::new().parse_strict(html, "test").unwrap();
    let element = nodes.iter().find_map(|n| n.as_element()).unwrap();
    (**element).clone()
}

fn split(html: &str) -> Vec<CompileElement> {
    CompilePipeline::new(vec![Box::new(ViewSplitter::new())])
        .process_element_tree(el(html))
        .unwrap()
}

fn names(results: &[CompileElement]) -> Vec<String> {
    results.iter().map(|r| r.element.name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_mark_the_root_element_as_view_root() {
        let results = split("<div><span></span></div>");
        assert!(results[0].is_view_root);
        assert!(!results[1].is_view_root);
    }

    mod template_elements {
        use super::*;

        #[test]
        fn should_move_the_content_into_a_new_view_root() {
            let results = split(r#"<div><template if="true"><span></span></template></div>"#);

            assert_eq!(names(&results), vec!["div", "template", "template", "span"]);
            let anchor = &results[1];
            assert!(anchor.is_template_anchor);
            assert!(!anchor.is_view_root);
            assert!(anchor.element.children.is_empty());
            assert_eq!(anchor.element.get_attribute("if"), Some("true"));

            let view_root = &results[2];
            assert!(view_root.is_view_root);
            assert_eq!(view_root.element.children.len(), 1);
            assert!(!results[3].is_view_root);
        }

        #[test]
        fn should_split_nested_templates() {
            let results = split("<div><template><template><a></a></template></template></div>");

            assert_eq!(names(&results), vec!["div", "template", "template", "template", "template", "a"]);
            assert!(results[1].is_template_anchor);
            assert!(results[2].is_view_root);
            assert!(results[3].is_template_anchor);
            assert!(results[4].is_view_root);
        }
    }

    mod template_attributes {
        use super::*;

        #[test]
        fn should_replace_the_element_with_an_anchor() {
            let results = split(r#"<div><span *ng-if="cond" class="a"></span></div>"#);

            assert_eq!(names(&results), vec!["div", "template", "span"]);
            let anchor = &results[1];
            assert!(anchor.is_template_anchor);
            assert_eq!(anchor.attrs.get("ng-if").map(String::as_str), Some("cond"));
            assert_eq!(anchor.property_bindings["ngIf"].source, "cond");
            assert!(!anchor.attrs.contains_key("class"));

            let view_root = &results[2];
            assert!(view_root.is_view_root);
            assert!(!view_root.element.has_attribute("*ng-if"));
            assert_eq!(view_root.element.get_attribute("class"), Some("a"));
        }

        #[test]
        fn should_support_the_template_attribute() {
            let results = split(r#"<div><span template="ng-if cond"></span></div>"#);

            let anchor = &results[1];
            assert!(anchor.is_template_anchor);
            assert_eq!(anchor.property_bindings["ngIf"].source, "cond");
            assert!(!results[2].element.has_attribute("template"));
        }

        #[test]
        fn should_bind_variables_on_the_anchor() {
            let results = split(r##"<div><li *ng-for="#item of items; var i=index"></li></div>"##);
            let anchor = &results[1];

            assert_eq!(anchor.attrs.get("ng-for").map(String::as_str), Some(""));
            assert_eq!(anchor.attrs.get("item").map(String::as_str), Some("$implicit"));
            assert_eq!(anchor.attrs.get("ng-for-of").map(String::as_str), Some("items"));
            assert_eq!(anchor.variable_bindings.get("item").map(String::as_str), Some("$implicit"));
            assert_eq!(anchor.variable_bindings.get("i").map(String::as_str), Some("index"));
            assert_eq!(anchor.property_bindings["ngForOf"].source, "items");
        }

        #[test]
        fn should_keep_the_children_in_the_nested_view() {
            let results = split(r#"<div><ul *ng-if="show"><li></li></ul></div>"#);

            assert_eq!(names(&results), vec!["div", "template", "ul", "li"]);
            assert!(!results[3].is_view_root);
        }

        #[test]
        fn should_not_split_the_root_element() {
            let results = split(r#"<div *ng-if="cond"></div>"#);

            assert_eq!(results.len(), 1);
            assert!(results[0].is_view_root);
            assert!(!results[0].is_template_anchor);
        }
    }
}
