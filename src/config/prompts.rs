//! Prompt templates for Utdrag.
//!
//! Prompts can be customized by placing TOML files in the custom prompts
//! directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    /// Prompts for episode format/topic classification.
    pub classify: ClassifyPrompts,
    /// Prompts for relevance ranking.
    pub rank: RankPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompts for the format/topic classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyPrompts {
    pub system: String,
    pub user: String,
}

impl Default for ClassifyPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are an assistant specialized in reading an excerpt of a podcast transcript and determining what topic the episode covers and what kind of episode it is. You return your analysis as a JSON object."#.to_string(),

            user: r#"Return a JSON object with two keys. Under the key "type", return "solo" if there is a single speaker, "interview" if a host is questioning one or more guests, or "talk" if it is a lecture or conference talk. Under the key "topic", return the topic of the podcast episode in at most 5 words.

Please ignore segment markers and timestamps. Here is the excerpt from the transcript:

{{excerpt}}"#.to_string(),
        }
    }
}

/// Prompts for the relevance-ranking oracle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankPrompts {
    pub system: String,
    pub user: String,
}

impl Default for RankPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are an assistant that selects transcript segments containing statements of especially high relevance to a given question."#.to_string(),

            user: r#"Identify groups of at least 3 and at most 11 contiguous, numerically consecutive segments that contain a statement extremely relevant to the topic "{{topic}}" of this podcast. The segments must not contain self-promotion, references to websites, or similar filler. If the episode type is "interview", only pick answers given by the guest; if the type is "solo", consider all content. The episode type is: {{format}}.

Return only the segment numbers, separated by commas without spaces. If you find no further segments, return 0.

Here is the transcript:

{{block}}"#.to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom
    /// directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let classify_path = custom_path.join("classify.toml");
            if classify_path.exists() {
                let content = std::fs::read_to_string(&classify_path)?;
                prompts.classify = toml::from_str(&content)?;
            }

            let rank_path = custom_path.join("rank.toml");
            if rank_path.exists() {
                let content = std::fs::read_to_string(&rank_path)?;
                prompts.rank = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom
    /// config variables. Provided variables take precedence.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(!prompts.classify.system.is_empty());
        assert!(prompts.rank.user.contains("{{topic}}"));
        assert!(prompts.rank.user.contains("{{block}}"));
        assert!(prompts.classify.user.contains("{{excerpt}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Topic is {{topic}}, type is {{format}}.";
        let mut vars = std::collections::HashMap::new();
        vars.insert("topic".to_string(), "sourdough".to_string());
        vars.insert("format".to_string(), "solo".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Topic is sourdough, type is solo.");
    }

    #[test]
    fn test_custom_variables_are_overridden_by_call_vars() {
        let mut prompts = Prompts::default();
        prompts
            .variables
            .insert("topic".to_string(), "from-config".to_string());

        let mut vars = std::collections::HashMap::new();
        vars.insert("topic".to_string(), "from-call".to_string());

        let result = prompts.render_with_custom("{{topic}}", &vars);
        assert_eq!(result, "from-call");
    }
}
