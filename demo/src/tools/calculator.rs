//! `calculator` tool.

use std::sync::Arc;

use async_trait::async_trait;
use hellomcp_server::{ToolError, ToolHandler};
use hellomcp_types::{Arguments, PropertySchema, Tool, ToolInputSchema, ToolResult};

/// Evaluates arithmetic expressions.
pub trait Evaluator: Send + Sync {
    /// Evaluate `expression`, returning the formatted result.
    fn evaluate(&self, expression: &str) -> Result<String, ToolError>;
}

/// Stand-in evaluator with no arithmetic backend. Answers every
/// non-empty expression with the same value.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderEvaluator;

impl Evaluator for PlaceholderEvaluator {
    fn evaluate(&self, expression: &str) -> Result<String, ToolError> {
        if expression.trim().is_empty() {
            return Err(ToolError::failed("Expression is empty"));
        }
        Ok("42".to_string())
    }
}

/// Evaluates a mathematical expression.
pub struct CalculatorTool {
    evaluator: Arc<dyn Evaluator>,
}

impl CalculatorTool {
    /// Tool backed by `evaluator`.
    pub fn new(evaluator: Arc<dyn Evaluator>) -> Self {
        Self { evaluator }
    }

    /// Descriptor advertised in `tools/list`.
    pub fn descriptor() -> Tool {
        Tool::new("calculator", "Perform calculations").with_schema(
            ToolInputSchema::object().required_property(
                "expression",
                PropertySchema::string("Mathematical expression to evaluate"),
            ),
        )
    }
}

#[async_trait]
impl ToolHandler for CalculatorTool {
    async fn call(&self, arguments: Arguments) -> Result<ToolResult, ToolError> {
        let expression = arguments.require_str("expression")?;
        let value = self.evaluator.evaluate(expression)?;
        Ok(ToolResult::text(value))
    }
}

impl std::fmt::Debug for CalculatorTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalculatorTool").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl Evaluator for Echo {
        fn evaluate(&self, expression: &str) -> Result<String, ToolError> {
            Ok(format!("= {expression}"))
        }
    }

    #[tokio::test]
    async fn test_delegates_to_evaluator() {
        let tool = CalculatorTool::new(Arc::new(Echo));
        let result = tool
            .call(Arguments::new().with("expression", "2 + 2"))
            .await
            .unwrap();
        assert_eq!(result.first_text(), Some("= 2 + 2"));
    }

    #[tokio::test]
    async fn test_wrong_argument_type() {
        let tool = CalculatorTool::new(Arc::new(PlaceholderEvaluator));
        let err = tool
            .call(Arguments::new().with("expression", 4.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Argument(_)));
    }

    #[test]
    fn test_placeholder_rejects_blank_input() {
        assert!(PlaceholderEvaluator.evaluate("   ").is_err());
        assert_eq!(PlaceholderEvaluator.evaluate("6 * 7").unwrap(), "42");
    }

    #[test]
    fn test_descriptor_requires_expression() {
        assert_eq!(CalculatorTool::descriptor().required_arguments(), ["expression"]);
    }
}
