//! Demo prompts.

use async_trait::async_trait;
use hellomcp_server::PromptHandler;
use hellomcp_types::{Arguments, McpResult, Prompt, PromptArgument, PromptResult};

/// Position used when none is given.
pub const DEFAULT_POSITION: &str = "Software Engineer";
/// Company used when none is given.
pub const DEFAULT_COMPANY: &str = "the company";
/// Interviewee used when none is given.
pub const DEFAULT_INTERVIEWEE: &str = "the candidate";

/// Mock job interview conversation.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterviewPrompt;

impl InterviewPrompt {
    /// Descriptor advertised in `prompts/list`.
    pub fn descriptor() -> Prompt {
        Prompt::new("interview", "Conduct a job interview")
            .with_argument(PromptArgument::optional(
                "position",
                "Job position being interviewed for",
            ))
            .with_argument(PromptArgument::optional("company", "Company name"))
            .with_argument(PromptArgument::optional(
                "interviewee",
                "Name of the person being interviewed",
            ))
    }

    /// Render with the given values.
    pub fn render(position: &str, company: &str, interviewee: &str) -> PromptResult {
        PromptResult::new(format!("Interview for the {position} position at {company}"))
            .add_user(format!(
                "You are interviewing {interviewee} for the {position} position at {company}. \
                 Start with a short introduction."
            ))
            .add_assistant(format!(
                "Hello {interviewee}, welcome to {company}. Thanks for coming in to talk \
                 about the {position} role. Could you start by telling me about yourself?"
            ))
            .add_user(format!(
                "Continue the interview with {interviewee}. Ask a question that tests \
                 what a {position} at {company} needs to know."
            ))
    }
}

#[async_trait]
impl PromptHandler for InterviewPrompt {
    async fn get(&self, arguments: Arguments) -> McpResult<PromptResult> {
        Ok(Self::render(
            &arguments.string_or("position", DEFAULT_POSITION),
            &arguments.string_or("company", DEFAULT_COMPANY),
            &arguments.string_or("interviewee", DEFAULT_INTERVIEWEE),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hellomcp_types::Role;
    use proptest::prelude::*;

    #[tokio::test]
    async fn test_defaults() {
        let result = InterviewPrompt.get(Arguments::new()).await.unwrap();
        assert_eq!(
            result.description,
            "Interview for the Software Engineer position at the company"
        );
        assert_eq!(result.len(), 3);
        for message in &result.messages {
            assert!(message.text().unwrap().contains("the candidate"));
        }
    }

    #[test]
    fn test_turn_roles() {
        let roles: Vec<Role> = InterviewPrompt::render("a", "b", "c")
            .messages
            .into_iter()
            .map(|m| m.role)
            .collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
    }

    proptest! {
        #[test]
        fn every_turn_mentions_every_value(
            position in "[A-Za-z ]{1,20}",
            company in "[A-Za-z]{1,20}",
            interviewee in "[A-Za-z]{1,20}",
        ) {
            let result = InterviewPrompt::render(&position, &company, &interviewee);
            prop_assert!(result.description.contains(&position));
            prop_assert!(result.description.contains(&company));
            for message in &result.messages {
                let text = message.text().unwrap();
                prop_assert!(text.contains(&position));
                prop_assert!(text.contains(&company));
                prop_assert!(text.contains(&interviewee));
            }
        }
    }
}
