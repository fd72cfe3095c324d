use angular_offline_compiler::compile_metadata::create_host_component_meta;
use angular_offline_compiler::directive_matching::CssSelector;
use angular_offline_compiler::{CompileDirectiveMetadata, CompileTemplateMetadata, CompileTypeMetadata};

// Helper to get a selector for given properties
fn get_selector_for(tag: Option<&str>, attrs: Vec<(&str, &str)>, classes: Option<&str>) -> CssSelector {
    let mut selector = CssSelector::new();
    if let Some(t) = tag {
        selector.set_element(t);
    }
    for (name, value) in attrs {
        selector.add_attribute(name, value);
    }
    if let Some(c) = classes {
        for c_name in c.split_whitespace() {
            selector.add_class_name(c_name);
        }
    }
    selector
}

fn host_template(selector: &str) -> String {
    let comp = CompileDirectiveMetadata::component(
        CompileTypeMetadata::new("SomeComp", "app/some.ts"),
        selector,
        CompileTemplateMetadata::inline(""),
    );
    create_host_component_meta(&comp)
        .unwrap()
        .template_text()
        .to_string()
}

#[test]
fn should_build_templates_from_constructed_selectors() {
    let selector = get_selector_for(Some("a"), vec![("href", "#"), ("target", "")], Some("Nav Item"));
    assert_eq!(
        selector.get_matching_element_template(),
        "<a class=\"nav item\" href=\"#\" target></a>"
    );
    assert!(selector.has_element_selector());
    assert!(!get_selector_for(None, vec![("x", "")], None).has_element_selector());
}

#[test]
fn should_keep_element_name_case() {
    assert_eq!(host_template("someTag"), "<someTag></someTag>");
}

#[test]
fn should_synthesize_host_elements_for_attribute_and_class_selectors() {
    assert_eq!(host_template("[some-attr]"), "<div some-attr></div>");
    assert_eq!(host_template(".some-class"), "<div class=\"some-class\"></div>");
    assert_eq!(host_template("[a=B].c"), "<div class=\"c\" a=\"b\"></div>");
}

#[test]
fn should_escape_quotes_in_host_attribute_values() {
    assert_eq!(host_template("[title='say \"hi\"']"), "<div title=\"say &quot;hi&quot;\"></div>");
}

#[test]
fn should_self_close_void_host_elements() {
    assert_eq!(host_template("input[some-input]"), "<input some-input/>");
    assert_eq!(host_template("img"), "<img/>");
}

#[test]
fn should_only_use_the_first_of_several_selectors() {
    assert_eq!(host_template("some-el, [some-attr]"), "<some-el></some-el>");
}

#[test]
fn should_ignore_not_selectors_when_synthesizing_hosts() {
    assert_eq!(host_template("button:not(.disabled)"), "<button></button>");
}
