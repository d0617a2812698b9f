//! Declarative tag rules from configuration, applied as a transform.

use crate::config::TagRule;
use crate::hooks::{HookId, DEFAULT_PRIORITY};
use crate::html::TagProcessor;

use super::enhancer::Enhancer;

/// Name under which configured rules are registered.
pub const RULES_TRANSFORM: &str = "config-rules";

/// Apply `rules` to `html`, in order.
pub fn apply_rules(html: &str, rules: &[TagRule]) -> String {
    let mut document = html.to_string();
    for rule in rules {
        let mut processor = TagProcessor::new(document);
        let mut matched = 0usize;
        while processor.next_tag_named(&rule.tag) {
            matched += 1;
            for (name, value) in &rule.set_attribute {
                processor.set_attribute(name, value);
            }
            if let Some(text) = &rule.set_text {
                processor.set_modifiable_text(text);
            }
        }
        tracing::debug!(tag = %rule.tag, matched, "Applied tag rule");
        document = processor.into_html();
    }
    document
}

/// Register `rules` as a transform. Does nothing when `rules` is empty.
pub fn install_rules(enhancer: &Enhancer, rules: Vec<TagRule>) -> Option<HookId> {
    if rules.is_empty() {
        return None;
    }
    Some(enhancer.add_filter(RULES_TRANSFORM, DEFAULT_PRIORITY, move |html| {
        Ok(apply_rules(html, &rules))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn rule(tag: &str, attrs: &[(&str, &str)], text: Option<&str>) -> TagRule {
        TagRule {
            tag: tag.to_string(),
            set_attribute: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
            set_text: text.map(String::from),
        }
    }

    #[test]
    fn translates_document() {
        let html = "<html lang=\"en\"><head><title>Greeting</title></head><body><h1>Hello World!</h1></body></html>";
        let rules = vec![
            rule("html", &[("lang", "es")], None),
            rule("title", &[], Some("Saludo")),
            rule("h1", &[], Some("¡Hola, mundo!")),
        ];

        assert_eq!(
            apply_rules(html, &rules),
            "<html lang=\"es\"><head><title>Saludo</title></head><body><h1>¡Hola, mundo!</h1></body></html>"
        );
    }

    #[test]
    fn rule_applies_to_every_match() {
        let out = apply_rules("<p>a</p><p>b</p>", &[rule("P", &[("class", "x")], None)]);
        assert_eq!(out, "<p class=\"x\">a</p><p class=\"x\">b</p>");
    }

    #[test]
    fn empty_rules_install_nothing() {
        let enhancer = Enhancer::new();
        assert!(install_rules(&enhancer, Vec::new()).is_none());
        assert!(!enhancer.should_buffer());
    }

    #[test]
    fn installed_rules_run_on_finalize() {
        let enhancer = Enhancer::new();
        install_rules(&enhancer, vec![rule("title", &[], Some("New"))]);
        assert!(enhancer.has_transform(RULES_TRANSFORM));
        assert_eq!(
            enhancer.finalize("<title>Old</title>").unwrap(),
            "<title>New</title>"
        );
    }
}
