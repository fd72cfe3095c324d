//! Directive Matching
//!
//! CSS selector parsing, used to build the element a host component
//! instantiates its component on.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static SELECTOR_REGEXP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\:not\()|(([\.\#]?)[-\w]+)|(?:\[([-.\w*\\$]+)(?:=(?:"([^"]*)"|'([^']*)'|([^\]]*)))?\])|(\))|(\s*,\s*)"#)
        .unwrap()
});

/// Match groups of `SELECTOR_REGEXP`.
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

/// Elements rendered without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CssSelector {
    pub element: Option<String>,
    pub class_names: Vec<String>,
    /// Attributes stored in pairs: [name, value, name, value, ...]
    pub attrs: Vec<String>,
    pub not_selectors: Vec<CssSelector>,
}

impl CssSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a selector list such as `a-comp, [a-attr]`.
    pub fn parse(selector: &str) -> Result<Vec<CssSelector>, String> {
        let mut results = Vec::new();
        let mut css_selector = CssSelector::new();
        let mut in_not = false;

        for cap in SELECTOR_REGEXP.captures_iter(selector) {
            if cap.get(SelectorRegexp::Not as usize).is_some() {
                if in_not {
                    return Err("Nesting :not in a selector is not allowed".to_string());
                }
                in_not = true;
                css_selector.not_selectors.push(CssSelector::new());
            }

            let current = if in_not && !css_selector.not_selectors.is_empty() {
                let last = css_selector.not_selectors.len() - 1;
                &mut css_selector.not_selectors[last]
            } else {
                &mut css_selector
            };

            if let Some(tag_match) = cap.get(SelectorRegexp::Tag as usize) {
                let tag = tag_match.as_str();
                match cap.get(SelectorRegexp::Prefix as usize).map(|m| m.as_str()) {
                    Some("#") => current.add_attribute("id", &tag[1..]),
                    Some(".") => current.add_class_name(&tag[1..]),
                    _ => current.set_element(tag),
                }
            }

            if let Some(attr_match) = cap.get(SelectorRegexp::Attribute as usize) {
                let value = [
                    SelectorRegexp::AttributeValueDouble,
                    SelectorRegexp::AttributeValueSingle,
                    SelectorRegexp::AttributeValueUnquoted,
                ]
                .iter()
                .find_map(|group| cap.get(*group as usize))
                .map(|m| m.as_str())
                .unwrap_or("");
                current.add_attribute(&Self::unescape_attribute(attr_match.as_str())?, value);
            }

            if cap.get(SelectorRegexp::NotEnd as usize).is_some() {
                in_not = false;
            }

            if cap.get(SelectorRegexp::Separator as usize).is_some() {
                if in_not {
                    return Err("Multiple selectors in :not are not supported".to_string());
                }
                Self::add_result(&mut results, std::mem::take(&mut css_selector));
            }
        }

        Self::add_result(&mut results, css_selector);
        Ok(results)
    }

    fn add_result(results: &mut Vec<CssSelector>, mut css_sel: CssSelector) {
        if !css_sel.not_selectors.is_empty()
            && css_sel.element.is_none()
            && css_sel.class_names.is_empty()
            && css_sel.attrs.is_empty()
        {
            css_sel.element = Some("*".to_string());
        }
        results.push(css_sel);
    }

    /// Unescape `\$` sequences of an attribute selector.
    fn unescape_attribute(attr: &str) -> Result<String, String> {
        let mut result = String::new();
        let mut escaping = false;

        for ch in attr.chars() {
            if ch == '\\' {
                escaping = true;
                continue;
            }
            if ch == '$' && !escaping {
                return Err(format!(
                    "Error in attribute selector \"{}\". Unescaped \"$\" is not supported. Please escape with \"\\$\".",
                    attr
                ));
            }
            escaping = false;
            result.push(ch);
        }

        Ok(result)
    }

    pub fn has_element_selector(&self) -> bool {
        matches!(self.element.as_deref(), Some(e) if e != "*")
    }

    pub fn set_element(&mut self, element: &str) {
        self.element = Some(element.to_string());
    }

    pub fn add_attribute(&mut self, name: &str, value: &str) {
        self.attrs.push(name.to_string());
        self.attrs.push(value.to_lowercase());
    }

    pub fn add_class_name(&mut self, name: &str) {
        self.class_names.push(name.to_lowercase());
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .chunks(2)
            .find(|pair| pair[0] == name)
            .map(|pair| pair[1].as_str())
    }

    /// Markup of an element this selector matches, e.g. `<div class="a" b></div>`.
    ///
    /// The element defaults to `div`; void elements are self-closed.
    pub fn get_matching_element_template(&self) -> String {
        let tag_name = match self.element.as_deref() {
            Some(e) if e != "*" => e,
            _ => "div",
        };
        let class_attr = if self.class_names.is_empty() {
            String::new()
        } else {
            format!(" class=\"{}\"", self.class_names.join(" "))
        };
        let attrs: String = self
            .attrs
            .chunks(2)
            .map(|pair| {
                if pair[1].is_empty() {
                    format!(" {}", pair[0])
                } else {
                    format!(" {}=\"{}\"", pair[0], escape_attribute_value(&pair[1]))
                }
            })
            .collect();

        if VOID_ELEMENTS.contains(&tag_name) {
            format!("<{}{}{}/>", tag_name, class_attr, attrs)
        } else {
            format!("<{0}{1}{2}></{0}>", tag_name, class_attr, attrs)
        }
    }
}

/// Escape a value for a double-quoted HTML attribute.
fn escape_attribute_value(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

impl fmt::Display for CssSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.element.as_deref().unwrap_or(""))?;

        for class_name in &self.class_names {
            write!(f, ".{}", class_name)?;
        }

        for pair in self.attrs.chunks(2) {
            let name = pair[0].replace('$', "\\$");
            if pair[1].is_empty() {
                write!(f, "[{}]", name)?;
            } else {
                write!(f, "[{}={}]", name, pair[1])?;
            }
        }

        for not_selector in &self.not_selectors {
            write!(f, ":not({})", not_selector)?;
        }

        Ok(())
    }
}
