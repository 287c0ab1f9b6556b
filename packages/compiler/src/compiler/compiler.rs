//! Compiler
//!
//! Compiles components into app proto views. Completed views are cached and
//! concurrent requests for a component that is still compiling share one
//! compilation. A component stays in flight until its view is merged; only
//! compilations it is waiting on see its unmerged view. A component may use
//! itself through an embedded view; such views are merged once every
//! component they host has been merged.

use super::cache::CompilerCache;
use super::component_url_mapper::ComponentUrlMapper;
use super::directive_binding::{DirectiveBinding, DirectiveValue, Type};
use super::directive_resolver::DirectiveResolver;
use super::metadata_registry::MetadataRegistry;
use super::proto_view_factory::ProtoViewFactory;
use super::view::{AppProtoView, ProtoViewRef};
use super::view_resolver::{ViewMetadata, ViewResolver};
use crate::config::CompilerConfig;
use crate::error::{CompilerError, Result};
use crate::render::api::{LocalBoxFuture, MergeChild, MergeTree, RenderCompiler, ViewDefinition};
use crate::url_resolver::UrlResolver;
use indexmap::IndexMap;
use log::{debug, trace};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use tokio::sync::OnceCell;

type CompileResult = Result<Rc<AppProtoView>>;

/// A component compilation whose inputs have been resolved
struct CompileJob {
    component: Type,
    binding: DirectiveBinding,
    directives: Vec<DirectiveBinding>,
    view: ViewDefinition,
}

/// In-flight compilation, shared by every requester of the component
struct PendingCompile {
    job: CompileJob,
    /// Unmerged view, set once the template is compiled
    view: RefCell<Option<Rc<AppProtoView>>>,
    /// Components whose compilation this one waits for
    awaiting: RefCell<Vec<Type>>,
    result: OnceCell<CompileResult>,
}

/// In-flight host view compilation
struct PendingHost {
    binding: DirectiveBinding,
    result: OnceCell<CompileResult>,
}

enum Compilation {
    Ready(Rc<AppProtoView>),
    Pending(LocalBoxFuture<'static, CompileResult>),
}

#[derive(Clone)]
pub struct Compiler {
    inner: Rc<CompilerInner>,
}

struct CompilerInner {
    directive_resolver: Rc<dyn DirectiveResolver>,
    view_resolver: Rc<dyn ViewResolver>,
    component_url_mapper: Rc<dyn ComponentUrlMapper>,
    render: Rc<dyn RenderCompiler>,
    url_resolver: UrlResolver,
    app_url: Option<String>,
    proto_view_factory: ProtoViewFactory,
    cache: CompilerCache,
    compiling: RefCell<HashMap<Type, Rc<PendingCompile>>>,
    compiling_hosts: RefCell<HashMap<Type, Rc<PendingHost>>>,
    unmerged_cyclic_embedded_proto_views: RefCell<Vec<Rc<AppProtoView>>>,
}

impl Compiler {
    pub fn new(
        directive_resolver: Rc<dyn DirectiveResolver>,
        view_resolver: Rc<dyn ViewResolver>,
        component_url_mapper: Rc<dyn ComponentUrlMapper>,
        render: Rc<dyn RenderCompiler>,
        config: &CompilerConfig,
    ) -> Self {
        Compiler {
            inner: Rc::new(CompilerInner {
                directive_resolver,
                view_resolver,
                component_url_mapper,
                render,
                url_resolver: UrlResolver::new(),
                app_url: config.app_root_url.clone(),
                proto_view_factory: ProtoViewFactory::new(config),
                cache: CompilerCache::new(),
                compiling: RefCell::new(HashMap::new()),
                compiling_hosts: RefCell::new(HashMap::new()),
                unmerged_cyclic_embedded_proto_views: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Compiler reading all metadata from `registry`.
    pub fn with_registry(
        registry: Rc<MetadataRegistry>,
        render: Rc<dyn RenderCompiler>,
        config: &CompilerConfig,
    ) -> Self {
        Compiler::new(registry.clone(), registry.clone(), registry, render, config)
    }

    pub fn cache(&self) -> &CompilerCache {
        &self.inner.cache
    }

    pub fn clear_cache(&self) {
        self.inner.cache.clear();
    }

    /// Compile the host view of a component, and the component itself.
    pub fn compile_in_host(
        &self,
        component: impl Into<DirectiveValue>,
    ) -> LocalBoxFuture<'static, Result<ProtoViewRef>> {
        let inner = self.inner.clone();
        let component = component.into();
        Box::pin(async move {
            let result = inner.clone().compile_in_host(component).await;
            if result.is_err() {
                inner.unmerged_cyclic_embedded_proto_views.borrow_mut().clear();
            }
            result
        })
    }

    /// Compile the view of a component. The compilation is registered
    /// before the returned future is first polled.
    pub fn compile(&self, component: impl Into<DirectiveValue>) -> LocalBoxFuture<'static, CompileResult> {
        let inner = self.inner.clone();
        let started = inner
            .bind_directive(&component.into())
            .and_then(|binding| {
                assert_type_is_component(&binding)?;
                inner.clone().compile_component(binding, None)
            });
        Box::pin(async move {
            let result = match started {
                Ok(Compilation::Ready(view)) => Ok(view),
                Ok(Compilation::Pending(future)) => future.await,
                Err(err) => Err(err),
            };
            let result = match result {
                Ok(view) => inner.clone().merge_cyclic_embedded_proto_views().await.map(|_| view),
                Err(err) => Err(err),
            };
            if result.is_err() {
                inner.unmerged_cyclic_embedded_proto_views.borrow_mut().clear();
            }
            result
        })
    }
}

fn assert_type_is_component(binding: &DirectiveBinding) -> Result<()> {
    if binding.is_component() {
        Ok(())
    } else {
        Err(CompilerError::NotAComponent {
            name: binding.key.to_string(),
        })
    }
}

impl CompilerInner {
    async fn compile_in_host(self: Rc<Self>, component: DirectiveValue) -> Result<ProtoViewRef> {
        let component_type = component
            .resolve_forward_ref()
            .token()
            .cloned()
            .ok_or_else(|| CompilerError::NotAComponent {
                name: component.to_string(),
            })?;

        let in_flight = self.compiling_hosts.borrow().get(&component_type).cloned();
        let host = match (in_flight, self.cache.get_host(&component_type)) {
            (Some(pending), _) => {
                trace!("Joining the host compilation of {}", component_type);
                self.clone().await_host(pending).await?
            }
            (None, Some(host)) => {
                trace!("Host view of {} is cached", component_type);
                host
            }
            (None, None) => {
                let binding = self.bind_directive(&component)?;
                assert_type_is_component(&binding)?;
                let pending = Rc::new(PendingHost {
                    binding,
                    result: OnceCell::new(),
                });
                self.compiling_hosts
                    .borrow_mut()
                    .insert(component_type, pending.clone());
                self.clone().await_host(pending).await?
            }
        };
        self.merge_cyclic_embedded_proto_views().await?;
        Ok(ProtoViewRef::new(host))
    }

    async fn await_host(self: Rc<Self>, pending: Rc<PendingHost>) -> CompileResult {
        let job = pending.clone();
        pending
            .result
            .get_or_init(move || self.run_host(job))
            .await
            .clone()
    }

    fn run_host(self: Rc<Self>, pending: Rc<PendingHost>) -> LocalBoxFuture<'static, CompileResult> {
        Box::pin(async move {
            let component_type = pending.binding.key.clone();
            let result = self.clone().compile_host(pending.binding.clone()).await;
            self.compiling_hosts.borrow_mut().remove(&component_type);
            result
        })
    }

    async fn compile_host(self: Rc<Self>, binding: DirectiveBinding) -> CompileResult {
        let component_type = binding.key.clone();
        debug!("Compiling host view of {}", component_type);
        let render = self.render.compile_host(binding.metadata.clone()).await?;
        let host = self.proto_view_factory.create_app_proto_views(
            &binding,
            &render,
            std::slice::from_ref(&binding),
        )?;
        self.cache.set_host(component_type.clone(), host.clone());

        let result = self
            .clone()
            .compile_nested_proto_views(host, component_type.clone(), None)
            .await;
        if result.is_err() {
            self.cache.invalidate_host(&component_type);
        }
        result
    }

    fn bind_directive(&self, value: &DirectiveValue) -> Result<DirectiveBinding> {
        match value.resolve_forward_ref() {
            DirectiveValue::Type(ty) => {
                let metadata = self.directive_resolver.resolve(&ty)?;
                Ok(DirectiveBinding::new(ty, metadata))
            }
            DirectiveValue::Binding(binding) => {
                let class = binding.to_class.as_ref().unwrap_or(&binding.token);
                let metadata = self.directive_resolver.resolve(class)?;
                Ok(DirectiveBinding::new(binding.token, metadata))
            }
            other => Err(CompilerError::NotAComponent {
                name: other.to_string(),
            }),
        }
    }

    /// Start compiling `binding`, or join the compilation already running.
    /// `requester` is the in-flight component whose view uses `binding`.
    /// Errors in resolving the view and its directives are returned
    /// immediately.
    fn compile_component(
        self: Rc<Self>,
        binding: DirectiveBinding,
        requester: Option<&Type>,
    ) -> Result<Compilation> {
        let component = binding.key.clone();
        let in_flight = self.compiling.borrow().get(&component).cloned();
        if let Some(pending) = in_flight {
            // Waiting would never finish when `component` already waits on
            // the requester; recursion gets the unmerged view.
            if let Some(requester) = requester.filter(|r| self.is_awaiting(&component, r)) {
                if let Some(view) = pending.view.borrow().clone() {
                    trace!("{} uses the unmerged view of {}", requester, component);
                    return Ok(Compilation::Ready(view));
                }
            }
            trace!("Joining the compilation of {}", component);
            self.add_dependency(requester, &component);
            return Ok(Compilation::Pending(self.await_compile(pending)));
        }

        if let Some(view) = self.cache.get(&component) {
            trace!("{} is cached", component);
            return Ok(Compilation::Ready(view));
        }

        let job = self.prepare(component.clone(), binding)?;
        let pending = Rc::new(PendingCompile {
            job,
            view: RefCell::new(None),
            awaiting: RefCell::new(Vec::new()),
            result: OnceCell::new(),
        });
        self.compiling
            .borrow_mut()
            .insert(component.clone(), pending.clone());
        self.add_dependency(requester, &component);
        Ok(Compilation::Pending(self.await_compile(pending)))
    }

    /// Whether the compilation of `from` waits, directly or transitively,
    /// for `target`. A component always waits for itself.
    fn is_awaiting(&self, from: &Type, target: &Type) -> bool {
        let compiling = self.compiling.borrow();
        let mut seen = HashSet::new();
        let mut stack = vec![from.clone()];
        while let Some(component) = stack.pop() {
            if &component == target {
                return true;
            }
            if !seen.insert(component.clone()) {
                continue;
            }
            if let Some(pending) = compiling.get(&component) {
                stack.extend(pending.awaiting.borrow().iter().cloned());
            }
        }
        false
    }

    fn add_dependency(&self, requester: Option<&Type>, component: &Type) {
        let pending = requester.and_then(|r| self.compiling.borrow().get(r).cloned());
        if let Some(pending) = pending {
            pending.awaiting.borrow_mut().push(component.clone());
        }
    }

    fn prepare(&self, component: Type, binding: DirectiveBinding) -> Result<CompileJob> {
        let view = self.view_resolver.resolve(&component)?;

        let mut flattened = Vec::new();
        flatten_directives(&view.directives, &mut flattened);
        if let Some(invalid) = flattened
            .iter()
            .find(|d| !matches!(d, DirectiveValue::Type(_) | DirectiveValue::Binding(_)))
        {
            return Err(CompilerError::InvalidDirective {
                value: invalid.to_string(),
                component: component.to_string(),
            });
        }

        let bound = flattened
            .iter()
            .map(|directive| self.bind_directive(directive))
            .collect::<Result<Vec<_>>>()?;
        let directives = remove_duplicated_directives(bound);
        let view = self.build_render_template(&component, &view, &directives);
        Ok(CompileJob {
            component,
            binding,
            directives,
            view,
        })
    }

    fn build_render_template(
        &self,
        component: &Type,
        view: &ViewMetadata,
        directives: &[DirectiveBinding],
    ) -> ViewDefinition {
        let component_url = self.url_resolver.resolve(
            self.app_url.as_deref(),
            &self.component_url_mapper.get_url(component),
        );
        let template_abs_url = match (&view.template_url, &view.template) {
            (Some(url), _) => Some(self.url_resolver.resolve(Some(&component_url), url)),
            (None, Some(_)) => Some(component_url.clone()),
            (None, None) => None,
        };
        let style_abs_urls = view
            .style_urls
            .iter()
            .map(|url| self.url_resolver.resolve(Some(&component_url), url))
            .collect();

        ViewDefinition {
            component_id: component.to_string(),
            template_abs_url,
            template: view.template.clone(),
            style_abs_urls,
            styles: view.styles.clone(),
            directives: directives.iter().map(|d| d.metadata.clone()).collect(),
        }
    }

    fn await_compile(self: Rc<Self>, pending: Rc<PendingCompile>) -> LocalBoxFuture<'static, CompileResult> {
        Box::pin(async move {
            let job = pending.clone();
            pending.result.get_or_init(move || self.run(job)).await.clone()
        })
    }

    fn run(self: Rc<Self>, pending: Rc<PendingCompile>) -> LocalBoxFuture<'static, CompileResult> {
        Box::pin(async move {
            let component = pending.job.component.clone();
            debug!("Compiling {}", component);
            let result = match self.create_proto_view(&pending.job).await {
                Ok(view) => {
                    *pending.view.borrow_mut() = Some(view.clone());
                    self.cache.set(component.clone(), view.clone());
                    let merged = self
                        .clone()
                        .compile_nested_proto_views(view, component.clone(), Some(component.clone()))
                        .await;
                    if merged.is_err() {
                        self.cache.invalidate(&component);
                    }
                    merged
                }
                Err(err) => Err(err),
            };
            self.compiling.borrow_mut().remove(&component);
            result
        })
    }

    async fn create_proto_view(&self, job: &CompileJob) -> CompileResult {
        let render = self.render.compile(job.view.clone()).await?;
        self.proto_view_factory
            .create_app_proto_views(&job.binding, &render, &job.directives)
    }

    /// Compile the components used by `view` and merge it. `owner` is the
    /// in-flight component `view` belongs to; host views have none.
    fn compile_nested_proto_views(
        self: Rc<Self>,
        view: Rc<AppProtoView>,
        component: Type,
        owner: Option<Type>,
    ) -> LocalBoxFuture<'static, CompileResult> {
        Box::pin(async move {
            let mut binders = Vec::new();
            collect_component_element_binders(&view, &mut binders);

            let mut waiting = Vec::new();
            for (binder_view, index) in binders {
                let binder = &binder_view.element_binders[index];
                let Some(nested_component) = binder.component_directive.clone() else {
                    continue;
                };
                match self.clone().compile_component(nested_component, owner.as_ref())? {
                    Compilation::Ready(nested) => binder.set_nested_proto_view(nested),
                    Compilation::Pending(future) => waiting.push((binder_view.clone(), index, future)),
                }
            }
            for (owner, index, future) in waiting {
                let nested = future.await?;
                owner.element_binders[index].set_nested_proto_view(nested);
            }

            let mut targets = Vec::new();
            let tree = self
                .collect_merge_render_proto_views(&view, &mut targets)
                .ok_or_else(|| CompilerError::UnconditionalCycle {
                    component: component.to_string(),
                })?;
            self.merge_proto_views(targets, tree).await?;
            Ok(view)
        })
    }

    /// Merge tree of `view` and its embedded views. Returns `None` when a
    /// hosted component has not been merged yet; the view is then queued
    /// for a later merge.
    fn collect_merge_render_proto_views(
        &self,
        view: &Rc<AppProtoView>,
        targets: &mut Vec<Rc<AppProtoView>>,
    ) -> Option<MergeTree> {
        targets.push(view.clone());
        let mut tree = MergeTree::new(view.render);
        for binder in &view.element_binders {
            if binder.has_static_component() {
                match binder.nested_proto_view().and_then(|nested| nested.merge_mapping()) {
                    Some(mapping) => tree
                        .children
                        .push(MergeChild::Component(mapping.render_proto_view_ref)),
                    None => {
                        trace!("Deferring the merge of view {}", view.render);
                        self.unmerged_cyclic_embedded_proto_views
                            .borrow_mut()
                            .push(view.clone());
                        return None;
                    }
                }
            } else if let Some(nested) = binder.nested_proto_view() {
                let mark = targets.len();
                match self.collect_merge_render_proto_views(nested, targets) {
                    Some(subtree) => tree.children.push(MergeChild::Embedded(subtree)),
                    None => {
                        targets.truncate(mark);
                        tree.children.push(MergeChild::Unresolved);
                    }
                }
            }
        }
        Some(tree)
    }

    async fn merge_proto_views(&self, targets: Vec<Rc<AppProtoView>>, tree: MergeTree) -> Result<()> {
        let mappings = self.render.merge_proto_views_recursively(tree).await?;
        for (target, mapping) in targets.iter().zip(mappings) {
            target.set_merge_mapping(mapping.into());
        }
        Ok(())
    }

    async fn merge_cyclic_embedded_proto_views(self: Rc<Self>) -> Result<()> {
        let deferred = std::mem::take(&mut *self.unmerged_cyclic_embedded_proto_views.borrow_mut());
        for view in deferred {
            if view.is_merged() {
                continue;
            }
            // Hosted components may still be compiling for another request.
            for binder in &view.element_binders {
                let Some(hosted) = &binder.component_directive else {
                    continue;
                };
                if binder.nested_proto_view().is_some_and(|nested| nested.is_merged()) {
                    continue;
                }
                let in_flight = self.compiling.borrow().get(&hosted.key).cloned();
                if let Some(pending) = in_flight {
                    trace!("Waiting for {} to merge view {}", hosted.key, view.render);
                    self.clone().await_compile(pending).await?;
                }
            }
            let mut tree = MergeTree::new(view.render);
            for binder in &view.element_binders {
                if binder.has_static_component() {
                    let mapping = binder
                        .nested_proto_view()
                        .and_then(|nested| nested.merge_mapping())
                        .ok_or_else(|| CompilerError::UnconditionalCycle {
                            component: binder
                                .component_directive
                                .as_ref()
                                .map(|d| d.key.to_string())
                                .unwrap_or_default(),
                        })?;
                    tree.children
                        .push(MergeChild::Component(mapping.render_proto_view_ref));
                } else if binder.has_embedded_proto_view() {
                    tree.children.push(MergeChild::Unresolved);
                }
            }
            debug!("Merging deferred view {}", view.render);
            self.merge_proto_views(vec![view.clone()], tree).await?;
        }
        Ok(())
    }
}

/// Binders hosting a component in `view` and its embedded views.
fn collect_component_element_binders(
    view: &Rc<AppProtoView>,
    out: &mut Vec<(Rc<AppProtoView>, usize)>,
) {
    for (index, binder) in view.element_binders.iter().enumerate() {
        if binder.has_static_component() {
            out.push((view.clone(), index));
        } else if let Some(nested) = binder.nested_proto_view() {
            collect_component_element_binders(nested, out);
        }
    }
}

fn flatten_directives(values: &[DirectiveValue], out: &mut Vec<DirectiveValue>) {
    for value in values {
        match value.resolve_forward_ref() {
            DirectiveValue::List(items) => flatten_directives(&items, out),
            resolved => out.push(resolved),
        }
    }
}

/// Keeps the first position of each key and the last binding for it.
fn remove_duplicated_directives(directives: Vec<DirectiveBinding>) -> Vec<DirectiveBinding> {
    let mut by_key = IndexMap::new();
    for directive in directives {
        by_key.insert(directive.key.clone(), directive);
    }
    by_key.into_values().collect()
}
