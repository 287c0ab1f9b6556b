//! Compile Step

use super::compile_control::CompileControl;
use super::compile_element::CompileElement;
use crate::error::Result;

/// One annotation pass of the compile pipeline. Steps run in order on every
/// element; `parent` has already been processed by all steps.
pub trait CompileStep {
    fn process(
        &self,
        parent: Option<&CompileElement>,
        current: &mut CompileElement,
        control: &mut CompileControl,
    ) -> Result<()>;
}
