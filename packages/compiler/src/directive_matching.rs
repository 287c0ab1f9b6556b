use once_cell::sync::Lazy;
/**
 * Directive Matching - CSS Selector Matching
 *
 * Parses directive selectors and matches them against template elements.
 */
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::error::{CompilerError, Result};
use crate::ml_parser::Element;

/// Regex for parsing CSS selectors
static SELECTOR_REGEXP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\:not\()|(([\.\#]?)[-\w]+)|(?:\[([-.\w*]+)(?:=(?:"([^"]*)"|'([^']*)'|([^\]]*)))?\])|(\))|(\s*,\s*)"#).unwrap()
});

/// Match groups in the selector regex
#[derive(Debug, Clone, Copy)]
enum SelectorRegexp {
    Not = 1,
    Tag = 2,
    Prefix = 3,
    Attribute = 4,
    AttributeValueDouble = 5,
    AttributeValueSingle = 6,
    AttributeValueUnquoted = 7,
    NotEnd = 8,
    Separator = 9,
}

/// CSS Selector representation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CssSelector {
    pub element: Option<String>,
    pub class_names: Vec<String>,
    /// Attribute name/value pairs; an empty value matches any value
    pub attrs: Vec<(String, String)>,
    pub not_selectors: Vec<CssSelector>,
}

impl CssSelector {
    pub fn new() -> Self {
        CssSelector::default()
    }

    /// Parse a selector list such as `my-cmp, [my-dir]:not(.off)`.
    pub fn parse(selector: &str) -> Result<Vec<CssSelector>> {
        let invalid = |message: &str| CompilerError::InvalidSelector {
            selector: selector.to_string(),
            message: message.to_string(),
        };

        let mut results = Vec::new();
        let mut current = CssSelector::new();
        let mut in_not = false;

        for cap in SELECTOR_REGEXP.captures_iter(selector) {
            if cap.get(SelectorRegexp::Not as usize).is_some() {
                if in_not {
                    return Err(invalid("Nesting :not is not allowed in a selector"));
                }
                in_not = true;
                current.not_selectors.push(CssSelector::new());
            }

            let target = if in_not && !current.not_selectors.is_empty() {
                let last = current.not_selectors.len() - 1;
                &mut current.not_selectors[last]
            } else {
                &mut current
            };

            if let Some(tag) = cap.get(SelectorRegexp::Tag as usize) {
                let tag = tag.as_str();
                match cap.get(SelectorRegexp::Prefix as usize).map(|m| m.as_str()) {
                    Some("#") => target.add_attribute("id", &tag[1..]),
                    Some(".") => target.add_class_name(&tag[1..]),
                    _ => target.set_element(tag),
                }
            }

            if let Some(attr) = cap.get(SelectorRegexp::Attribute as usize) {
                let value = [
                    SelectorRegexp::AttributeValueDouble,
                    SelectorRegexp::AttributeValueSingle,
                    SelectorRegexp::AttributeValueUnquoted,
                ]
                .iter()
                .find_map(|group| cap.get(*group as usize))
                .map(|m| m.as_str())
                .unwrap_or("");
                target.add_attribute(attr.as_str(), value);
            }

            if cap.get(SelectorRegexp::NotEnd as usize).is_some() {
                in_not = false;
            }

            if cap.get(SelectorRegexp::Separator as usize).is_some() {
                if in_not {
                    return Err(invalid("Multiple selectors in :not are not supported"));
                }
                Self::add_result(&mut results, std::mem::take(&mut current));
            }
        }

        Self::add_result(&mut results, current);
        Ok(results)
    }

    fn add_result(results: &mut Vec<CssSelector>, mut selector: CssSelector) {
        if !selector.not_selectors.is_empty()
            && selector.element.is_none()
            && selector.class_names.is_empty()
            && selector.attrs.is_empty()
        {
            selector.element = Some("*".to_string());
        }
        results.push(selector);
    }

    /// Selector describing a concrete template element: its tag, every
    /// attribute and each entry of its `class` attribute.
    pub fn for_element(element: &Element) -> CssSelector {
        Self::for_element_with_attrs(
            &element.name,
            element.attrs.iter().map(|a| (a.name.as_str(), a.value.as_str())),
        )
    }

    pub fn for_element_with_attrs<'a>(
        name: &str,
        attrs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> CssSelector {
        let mut selector = CssSelector::new();
        selector.set_element(name);
        for (attr_name, value) in attrs {
            if attr_name.eq_ignore_ascii_case("class") {
                for class_name in value.split_whitespace() {
                    selector.add_class_name(class_name);
                }
            }
            selector.add_attribute(attr_name, value);
        }
        selector
    }

    pub fn has_element_selector(&self) -> bool {
        matches!(self.element.as_deref(), Some(element) if element != "*")
    }

    pub fn set_element(&mut self, element: &str) {
        self.element = Some(element.to_lowercase());
    }

    pub fn add_attribute(&mut self, name: &str, value: &str) {
        self.attrs.push((name.to_lowercase(), value.to_lowercase()));
    }

    pub fn add_class_name(&mut self, name: &str) {
        self.class_names.push(name.to_lowercase());
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether `self` (a concrete element) is selected by `pattern`.
    pub fn is_selected_by(&self, pattern: &CssSelector) -> bool {
        if let Some(pattern_element) = pattern.element.as_deref() {
            if pattern_element != "*" && self.element.as_deref() != Some(pattern_element) {
                return false;
            }
        }

        if !pattern
            .class_names
            .iter()
            .all(|class_name| self.class_names.contains(class_name))
        {
            return false;
        }

        let attrs_match = pattern.attrs.iter().all(|(name, value)| {
            self.attrs
                .iter()
                .any(|(own_name, own_value)| own_name == name && (value.is_empty() || own_value == value))
        });
        if !attrs_match {
            return false;
        }

        !pattern
            .not_selectors
            .iter()
            .any(|not_selector| self.is_selected_by(not_selector))
    }
}

impl std::fmt::Display for CssSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.element.as_deref().unwrap_or(""))?;

        for class_name in &self.class_names {
            write!(f, ".{}", class_name)?;
        }

        for (name, value) in &self.attrs {
            if value.is_empty() {
                write!(f, "[{}]", name)?;
            } else {
                write!(f, "[{}={}]", name, value)?;
            }
        }

        for not_selector in &self.not_selectors {
            write!(f, ":not({})", not_selector)?;
        }

        Ok(())
    }
}

/// Selector Matcher - matches element selectors against registered
/// directive selectors.
///
/// Candidates are found through element, class and attribute indexes and
/// reported once each, in registration order.
pub struct SelectorMatcher<T> {
    selectables: Vec<(CssSelector, T)>,
    element_map: HashMap<String, Vec<usize>>,
    class_map: HashMap<String, Vec<usize>>,
    attr_map: HashMap<String, Vec<usize>>,
    universal: Vec<usize>,
}

impl<T> SelectorMatcher<T> {
    pub fn new() -> Self {
        SelectorMatcher {
            selectables: Vec::new(),
            element_map: HashMap::new(),
            class_map: HashMap::new(),
            attr_map: HashMap::new(),
            universal: Vec::new(),
        }
    }

    pub fn add_selectables(&mut self, selectors: Vec<CssSelector>, data: T)
    where
        T: Clone,
    {
        for selector in selectors {
            self.add_selectable(selector, data.clone());
        }
    }

    pub fn add_selectable(&mut self, selector: CssSelector, data: T) {
        let id = self.selectables.len();

        match selector.element.as_deref() {
            Some(element) if element != "*" => {
                self.element_map.entry(element.to_string()).or_default().push(id)
            }
            _ if selector.class_names.is_empty() && selector.attrs.is_empty() => {
                self.universal.push(id)
            }
            _ => {}
        }
        for class_name in &selector.class_names {
            self.class_map.entry(class_name.clone()).or_default().push(id);
        }
        for (name, _) in &selector.attrs {
            self.attr_map.entry(name.clone()).or_default().push(id);
        }

        self.selectables.push((selector, data));
    }

    /// Report every registered selector that selects `element`. Returns
    /// whether anything matched.
    pub fn match_selector<F>(&self, element: &CssSelector, mut callback: F) -> bool
    where
        F: FnMut(&CssSelector, &T),
    {
        let mut candidates = BTreeSet::new();
        candidates.extend(self.universal.iter().copied());
        if let Some(ids) = element.element.as_ref().and_then(|e| self.element_map.get(e)) {
            candidates.extend(ids.iter().copied());
        }
        for class_name in &element.class_names {
            if let Some(ids) = self.class_map.get(class_name) {
                candidates.extend(ids.iter().copied());
            }
        }
        for (name, _) in &element.attrs {
            if let Some(ids) = self.attr_map.get(name) {
                candidates.extend(ids.iter().copied());
            }
        }

        let mut matched = false;
        for id in candidates {
            let (selector, data) = &self.selectables[id];
            if element.is_selected_by(selector) {
                callback(selector, data);
                matched = true;
            }
        }
        matched
    }
}

impl<T> Default for SelectorMatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}
