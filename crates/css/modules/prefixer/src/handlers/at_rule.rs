use crate::pass::Pass;
use css_syntax::NodeId;

/// `@keyframes` and `@viewport`: copies named `@-webkit-keyframes` and so on.
pub struct AtRuleHandler {
    pub name: String,
    pub prefixes: Vec<String>,
}

impl AtRuleHandler {
    fn add(pass: &mut Pass<'_>, rule: NodeId, prefix: &str) {
        let Some(at_rule) = pass.sheet.at_rule(rule) else {
            return;
        };
        let prefixed = format!("{prefix}{}", at_rule.name);
        let params = at_rule.params.clone();
        let Some(parent) = pass.sheet.parent(rule) else {
            return;
        };
        let already = pass.sheet.children(parent).into_iter().any(|sibling| {
            pass.sheet
                .at_rule(sibling)
                .is_some_and(|other| other.name == prefixed && other.params == params)
        });
        if already {
            return;
        }
        pass.sheet.clone_before(rule, |node| {
            if let Some(copy) = node.as_at_rule_mut() {
                copy.name = prefixed;
            }
        });
    }

    pub fn process(&self, pass: &mut Pass<'_>, rule: NodeId) {
        let parent = pass.parent_prefix(rule);
        for prefix in &self.prefixes {
            if parent.as_deref().is_none_or(|scope| scope == prefix) {
                Self::add(pass, rule, prefix);
            }
        }
    }
}
