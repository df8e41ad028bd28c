use std::collections::BTreeMap;
use std::fmt::Write;

use serde_json::Value;

/// Question closing every goal check prompt.
pub const GOAL_CHECK_QUESTION: &str =
    "Has the goal been achieved? Respond with only \"YES\" or \"NO\".";

const NO_HISTORY: &str = "No previous actions";

const RESPONSE_FORMAT: &str = r#"Based on the goal and the current state, decide the next action.
Respond in JSON format:
{
    "reasoning": "Why this action was chosen",
    "tool_name": "tool_name",
    "parameters": {"param1": "value1"},
    "expected_outcome": "What should happen next"
}"#;

/// Prompt asking the planner for the next action.
pub fn planning_prompt(
    goal: &str,
    observation: &str,
    history: &[String],
    tools: &BTreeMap<String, String>,
) -> String {
    let mut prompt = String::from("You are an autonomous agent that automates a web browser.\n\n");
    let _ = writeln!(prompt, "GOAL: {goal}\n");
    let _ = writeln!(prompt, "CURRENT STATE:\n{observation}\n");

    prompt.push_str("HISTORY:\n");
    if history.is_empty() {
        prompt.push_str(NO_HISTORY);
    } else {
        prompt.push_str(&history.join("\n"));
    }
    prompt.push_str("\n\nAVAILABLE TOOLS:\n");
    for (index, (name, description)) in tools.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {name} - {description}", index + 1);
    }
    prompt.push('\n');
    prompt.push_str(RESPONSE_FORMAT);
    prompt.push('\n');
    prompt
}

/// Yes/no completion query over the observation taken this iteration.
pub fn goal_check_prompt(goal: &str, observation: &str) -> String {
    format!("Goal: {goal}\n\nCurrent State:\n{observation}\n\n{GOAL_CHECK_QUESTION}\n")
}

/// Framing line for structured context handed to a provider.
pub fn render_context(context: &Value) -> String {
    let pretty = serde_json::to_string_pretty(context).unwrap_or_else(|_| context.to_string());
    format!("Context: {pretty}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tools() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("navigate".to_string(), "Navigate to a URL".to_string()),
            ("wait".to_string(), "Wait".to_string()),
        ])
    }

    #[test]
    fn planning_prompt_lists_goal_history_and_tools() {
        let history = vec!["opened home".to_string(), "read page".to_string()];
        let prompt = planning_prompt("find docs", "Current URL: about:blank", &history, &tools());

        assert!(prompt.contains("GOAL: find docs"));
        assert!(prompt.contains("CURRENT STATE:\nCurrent URL: about:blank"));
        assert!(prompt.contains("HISTORY:\nopened home\nread page"));
        assert!(prompt.contains("1. navigate - Navigate to a URL"));
        assert!(prompt.contains("2. wait - Wait"));
        assert!(prompt.contains("\"tool_name\""));
    }

    #[test]
    fn empty_history_is_called_out() {
        let prompt = planning_prompt("g", "s", &[], &tools());
        assert!(prompt.contains("HISTORY:\nNo previous actions"));
    }

    #[test]
    fn goal_check_ends_with_question() {
        let prompt = goal_check_prompt("open docs", "Page Title: Docs");
        assert!(prompt.starts_with("Goal: open docs\n\nCurrent State:\nPage Title: Docs"));
        assert!(prompt.trim_end().ends_with(GOAL_CHECK_QUESTION));
    }

    #[test]
    fn context_is_pretty_printed() {
        let rendered = render_context(&json!({"step": 1}));
        assert_eq!(rendered, "Context: {\n  \"step\": 1\n}");
    }
}
