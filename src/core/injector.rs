use crate::domain::model::{GeneratedScript, ParameterSet, TemplateText};
use crate::utils::error::{AssemblyError, Result};

pub const DEFAULT_DEFINITION_PREFIX: &str = "def";

/// Splices `name = value` assignments into a donor script right before its
/// first function definition. Matching is on the literal start of the line;
/// indentation is not stripped, so nested definitions never split the text.
#[derive(Debug, Clone)]
pub struct TemplateParameterInjector {
    definition_prefixes: Vec<String>,
}

impl Default for TemplateParameterInjector {
    fn default() -> Self {
        Self {
            definition_prefixes: vec![DEFAULT_DEFINITION_PREFIX.to_string()],
        }
    }
}

impl TemplateParameterInjector {
    pub fn new<I>(definition_prefixes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            definition_prefixes: definition_prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn definition_prefixes(&self) -> &[String] {
        &self.definition_prefixes
    }

    /// Index of the first line that opens a definition.
    pub fn split_point(&self, template: &TemplateText) -> Result<usize> {
        template
            .lines()
            .iter()
            .position(|line| {
                self.definition_prefixes
                    .iter()
                    .any(|prefix| line.starts_with(prefix.as_str()))
            })
            .ok_or_else(|| AssemblyError::MalformedTemplate {
                prefixes: self.definition_prefixes.join(", "),
            })
    }

    pub fn inject(&self, template: &TemplateText, parameters: &ParameterSet) -> Result<GeneratedScript> {
        let split = self.split_point(template)?;
        let (preamble, body) = template.lines().split_at(split);

        let mut lines = Vec::with_capacity(template.len() + parameters.len() + 1);
        lines.extend(preamble.iter().cloned());
        lines.extend(
            parameters
                .iter()
                .map(|(name, value)| format!("{} = {}\n", name, value)),
        );
        lines.push("\n".to_string());
        lines.extend(body.iter().cloned());

        tracing::debug!(
            "Injected {} parameter(s) at line {} of a {}-line template",
            parameters.len(),
            split + 1,
            template.len()
        );

        Ok(GeneratedScript::new(lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ParamValue;
    use proptest::prelude::*;

    fn sample_template() -> TemplateText {
        TemplateText::from_lines(["x=1\n", "def run():\n", "  pass\n"])
    }

    #[test]
    fn test_inserts_before_first_definition() {
        let injector = TemplateParameterInjector::default();
        let params = ParameterSet::new().with("a", 5i64).with("b", "hi");

        let script = injector.inject(&sample_template(), &params).unwrap();
        assert_eq!(
            script.lines(),
            &["x=1\n", "a = 5\n", "b = hi\n", "\n", "def run():\n", "  pass\n"]
        );
    }

    #[test]
    fn test_only_first_definition_splits() {
        let injector = TemplateParameterInjector::default();
        let template = TemplateText::parse(
            "from opentrons import protocol_api\n\ndef helper():\n    pass\n\ndef run(protocol):\n    helper()\n",
        );
        let params = ParameterSet::new().with(
            "prom_utr",
            ParamValue::Tuple(vec![3usize.into(), 5usize.into()]),
        );

        let script = injector.inject(&template, &params).unwrap();
        assert_eq!(
            script.to_text(),
            "from opentrons import protocol_api\n\nprom_utr = (3, 5)\n\ndef helper():\n    pass\n\ndef run(protocol):\n    helper()\n"
        );
    }

    #[test]
    fn test_indented_definition_is_not_a_split_point() {
        let injector = TemplateParameterInjector::default();
        let template = TemplateText::from_lines(["class A:\n", "    def m(self):\n", "        pass\n"]);

        let err = injector.inject(&template, &ParameterSet::new()).unwrap_err();
        assert!(matches!(err, AssemblyError::MalformedTemplate { .. }));
    }

    #[test]
    fn test_definition_on_first_line_has_empty_preamble() {
        let injector = TemplateParameterInjector::default();
        let template = TemplateText::from_lines(["def run():\n", "  pass\n"]);
        let params = ParameterSet::new().with("n", 1i64);

        let script = injector.inject(&template, &params).unwrap();
        assert_eq!(script.lines(), &["n = 1\n", "\n", "def run():\n", "  pass\n"]);
    }

    #[test]
    fn test_empty_template_is_malformed() {
        let injector = TemplateParameterInjector::default();
        assert!(injector
            .inject(&TemplateText::default(), &ParameterSet::new())
            .is_err());
    }

    #[test]
    fn test_custom_prefixes() {
        let injector = TemplateParameterInjector::new(["async def", "def"]);
        let template = TemplateText::from_lines(["import asyncio\n", "async def main():\n", "    pass\n"]);

        assert_eq!(injector.split_point(&template).unwrap(), 1);
    }

    #[test]
    fn test_output_length_and_preservation() {
        let injector = TemplateParameterInjector::default();
        let template = TemplateText::parse("a\nb\nc\ndef f():\n  1\n  2\n");
        let params = ParameterSet::new().with("x", 1i64).with("y", 2i64).with("z", 3i64);

        let script = injector.inject(&template, &params).unwrap();
        assert_eq!(script.len(), 3 + params.len() + 1 + 3);
        assert_eq!(&script.lines()[..3], &template.lines()[..3]);
        assert_eq!(&script.lines()[7..], &template.lines()[3..]);

        let again = injector.inject(&template, &params).unwrap();
        assert_eq!(script.to_text(), again.to_text());
    }

    proptest! {
        #[test]
        fn prop_injection_keeps_preamble_and_body(
            preamble in prop::collection::vec("#[a-z =]{0,12}\n", 0..6),
            body_tail in prop::collection::vec("[ a-z():]{0,12}\n", 0..6),
            params in prop::collection::btree_map("[a-z_][a-z0-9_]{0,6}", any::<i64>(), 1..5),
        ) {
            let mut body = vec!["def run(protocol):\n".to_string()];
            body.extend(body_tail);
            let template = TemplateText::from_lines(preamble.iter().chain(body.iter()).cloned());

            let mut parameters = ParameterSet::new();
            for (name, value) in &params {
                parameters.insert(name.clone(), *value);
            }

            let injector = TemplateParameterInjector::default();
            let script = injector.inject(&template, &parameters).unwrap();
            let lines = script.lines();

            prop_assert_eq!(lines.len(), preamble.len() + params.len() + 1 + body.len());
            prop_assert_eq!(&lines[..preamble.len()], &preamble[..]);
            prop_assert_eq!(&lines[lines.len() - body.len()..], &body[..]);
            prop_assert_eq!(lines[preamble.len() + params.len()].as_str(), "\n");

            for (offset, (name, value)) in params.iter().enumerate() {
                prop_assert_eq!(&lines[preamble.len() + offset], &format!("{} = {}\n", name, value));
            }
        }
    }
}
