//! Default Render Compiler
//!
//! Parses component templates, runs them through the compile pipeline and
//! keeps the resulting views in a [`RenderViewStore`].

use super::api::{
    DirectiveMetadata, LocalBoxFuture, MergeTree, ProtoViewDto, RenderCompiler,
    RenderProtoViewMergeMapping, ViewDefinition, ViewType,
};
use super::template_loader::TemplateLoader;
use super::view_store::RenderViewStore;
use crate::config::CompilerConfig;
use crate::directive_matching::CssSelector;
use crate::error::{CompilerError, Result};
use crate::ml_parser::{Attribute, Element, HtmlParser, Node};
use crate::template::pipeline::{default_steps, CompilePipeline};
use log::debug;
use std::cell::RefCell;
use std::rc::Rc;

/// Name of the synthetic element wrapping the nodes of a template
const TEMPLATE_ROOT: &str = "template";

pub struct DefaultRenderCompiler {
    loader: Rc<dyn TemplateLoader>,
    html_parser: HtmlParser,
    store: RefCell<RenderViewStore>,
}

impl DefaultRenderCompiler {
    pub fn new(loader: Rc<dyn TemplateLoader>, config: &CompilerConfig) -> Self {
        DefaultRenderCompiler {
            loader,
            html_parser: HtmlParser::new().with_preserve_whitespaces(config.preserve_whitespaces),
            store: RefCell::new(RenderViewStore::new()),
        }
    }

    /// Number of render views handed out so far, merged ones included.
    pub fn view_count(&self) -> usize {
        self.store.borrow().len()
    }

    fn compile_template(
        &self,
        source: &str,
        url: &str,
        directives: &[DirectiveMetadata],
    ) -> Result<ProtoViewDto> {
        let nodes = self.html_parser.parse_strict(source, url)?;
        self.compile_element_tree(Element::new(TEMPLATE_ROOT, Vec::new(), nodes), directives, ViewType::Component)
    }

    fn compile_element_tree(
        &self,
        root: Element,
        directives: &[DirectiveMetadata],
        view_type: ViewType,
    ) -> Result<ProtoViewDto> {
        let pipeline = CompilePipeline::new(default_steps(directives, view_type)?);
        let results = pipeline.process_element_tree(root)?;
        let proto_view = results
            .first()
            .and_then(|root| root.inherited_proto_view.clone())
            .ok_or_else(|| CompilerError::InvalidMergeTree {
                message: "template produced no proto view".to_string(),
            })?;

        let mut store = self.store.borrow_mut();
        let dto = proto_view.borrow().build(&mut |dto| store.register_compiled(dto));
        Ok(dto)
    }
}

/// The element a host view creates for `selector`: the element name of the
/// selector (or `div`) carrying its attributes and classes.
fn host_element(selector: Option<&CssSelector>) -> Element {
    let Some(selector) = selector else {
        return Element::new("div", Vec::new(), Vec::new());
    };
    let name = selector.element.as_deref().unwrap_or("div");
    let mut attrs: Vec<Attribute> = selector
        .attrs
        .iter()
        .map(|(name, value)| Attribute::new(name.as_str(), value.as_str()))
        .collect();
    if !selector.class_names.is_empty() {
        attrs.push(Attribute::new("class", selector.class_names.join(" ")));
    }
    Element::new(name, attrs, Vec::new())
}

impl RenderCompiler for DefaultRenderCompiler {
    fn compile(&self, view: ViewDefinition) -> LocalBoxFuture<'_, Result<ProtoViewDto>> {
        Box::pin(async move {
            let (source, url) = match (&view.template, &view.template_abs_url) {
                (Some(template), url) => (
                    template.clone(),
                    url.clone().unwrap_or_else(|| view.component_id.clone()),
                ),
                (None, Some(url)) => (self.loader.load(url).await?, url.clone()),
                (None, None) => {
                    return Err(CompilerError::MissingTemplate {
                        component: view.component_id.clone(),
                    })
                }
            };
            debug!("Compiling template of {} from {}", view.component_id, url);
            self.compile_template(&source, &url, &view.directives)
        })
    }

    fn compile_host(&self, directive: DirectiveMetadata) -> LocalBoxFuture<'_, Result<ProtoViewDto>> {
        Box::pin(async move {
            let selectors = match &directive.selector {
                Some(selector) => CssSelector::parse(selector)?,
                None => Vec::new(),
            };
            let element = host_element(selectors.first());
            debug!("Compiling host view <{}> of {}", element.name, directive.id);
            let root = Element::new(TEMPLATE_ROOT, Vec::new(), vec![Node::Element(Rc::new(element))]);
            self.compile_element_tree(root, std::slice::from_ref(&directive), ViewType::Host)
        })
    }

    fn merge_proto_views_recursively(
        &self,
        tree: MergeTree,
    ) -> LocalBoxFuture<'_, Result<Vec<RenderProtoViewMergeMapping>>> {
        Box::pin(async move { self.store.borrow_mut().merge(&tree) })
    }
}
