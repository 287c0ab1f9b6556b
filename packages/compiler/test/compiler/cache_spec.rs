/**
 * Compiler Cache Spec
 */
use indexmap::IndexMap;
use std::rc::Rc;
use view_compiler::change_detection::ChangeDetectionStrategy;
use view_compiler::compiler::{AppProtoView, CompilerCache, ProtoChangeDetector, Type};
use view_compiler::render::{RenderProtoViewRef, ViewType};

fn proto_view(render: usize) -> Rc<AppProtoView> {
    Rc::new(AppProtoView::new(
        ViewType::Component,
        RenderProtoViewRef(render),
        Vec::new(),
        IndexMap::new(),
        ProtoChangeDetector {
            id: format!("view_{}", render),
            strategy: ChangeDetectionStrategy::Default,
            records: Vec::new(),
            directive_records: Vec::new(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_start_empty() {
        let cache = CompilerCache::new();
        assert!(cache.is_empty());
        assert!(cache.get(&Type::new("A")).is_none());
    }

    #[test]
    fn should_return_the_stored_view() {
        let cache = CompilerCache::new();
        let view = proto_view(1);
        cache.set(Type::new("A"), view.clone());

        assert!(Rc::ptr_eq(&cache.get(&Type::new("A")).unwrap(), &view));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn should_replace_views_of_the_same_component() {
        let cache = CompilerCache::new();
        cache.set(Type::new("A"), proto_view(1));
        let replacement = proto_view(2);
        cache.set(Type::new("A"), replacement.clone());

        assert!(Rc::ptr_eq(&cache.get(&Type::new("A")).unwrap(), &replacement));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn should_keep_host_views_apart() {
        let cache = CompilerCache::new();
        let component = proto_view(1);
        let host = proto_view(2);
        cache.set(Type::new("A"), component.clone());
        cache.set_host(Type::new("A"), host.clone());

        assert!(Rc::ptr_eq(&cache.get(&Type::new("A")).unwrap(), &component));
        assert!(Rc::ptr_eq(&cache.get_host(&Type::new("A")).unwrap(), &host));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn should_invalidate_single_entries() {
        let cache = CompilerCache::new();
        cache.set(Type::new("A"), proto_view(1));
        cache.set(Type::new("B"), proto_view(2));
        cache.set_host(Type::new("A"), proto_view(3));

        cache.invalidate(&Type::new("A"));

        assert!(cache.get(&Type::new("A")).is_none());
        assert!(cache.get(&Type::new("B")).is_some());
        assert!(cache.get_host(&Type::new("A")).is_some());

        cache.invalidate_host(&Type::new("A"));
        assert!(cache.get_host(&Type::new("A")).is_none());
    }

    #[test]
    fn should_clear_all_views() {
        let cache = CompilerCache::new();
        cache.set(Type::new("A"), proto_view(1));
        cache.set_host(Type::new("A"), proto_view(2));

        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.get_host(&Type::new("A")).is_none());
    }
}
