//! Component URL Mapper

use super::directive_binding::Type;

/// Base URL of a component, used to resolve its template and style URLs
pub trait ComponentUrlMapper {
    fn get_url(&self, component: &Type) -> String;
}

/// Maps every component to `./`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultComponentUrlMapper;

impl ComponentUrlMapper for DefaultComponentUrlMapper {
    fn get_url(&self, _component: &Type) -> String {
        "./".to_string()
    }
}
