use crate::compiler_frontend::commands::command_nodes::Command;
use crate::compiler_frontend::expressions::expression_nodes::ExpressionNode;

/// One method per command variant.
/// Code generators implement this to lower each command without matching on the enum themselves.
pub trait CommandVisitor {
    type Output;

    fn visit_conditional_start(&mut self, variable: &str, expected_truth: bool) -> Self::Output;
    fn visit_conditional_end(&mut self) -> Self::Output;

    fn visit_variable_binding_start(
        &mut self,
        variable: &str,
        expression: &ExpressionNode,
    ) -> Self::Output;
    fn visit_variable_binding_end(&mut self) -> Self::Output;
    fn visit_variable_binding_global(
        &mut self,
        variable: &str,
        expression: &ExpressionNode,
    ) -> Self::Output;

    fn visit_loop_start(
        &mut self,
        list_variable: &str,
        item_variable: &str,
        index_variable: &str,
    ) -> Self::Output;
    fn visit_loop_end(&mut self) -> Self::Output;

    fn visit_procedure_start(&mut self, name: &str, parameters: &[String]) -> Self::Output;
    fn visit_procedure_end(&mut self) -> Self::Output;
    fn visit_procedure_call(
        &mut self,
        template_variable: &str,
        arguments_variable: &str,
    ) -> Self::Output;

    fn visit_output_variable(&mut self, variable: &str) -> Self::Output;
    fn visit_out_text(&mut self, text: &str) -> Self::Output;
}

impl Command {
    pub fn accept<V: CommandVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Command::ConditionalStart {
                variable,
                expected_truth,
            } => visitor.visit_conditional_start(variable, *expected_truth),
            Command::ConditionalEnd => visitor.visit_conditional_end(),
            Command::VariableBindingStart {
                variable,
                expression,
            } => visitor.visit_variable_binding_start(variable, expression),
            Command::VariableBindingEnd => visitor.visit_variable_binding_end(),
            Command::VariableBindingGlobal {
                variable,
                expression,
            } => visitor.visit_variable_binding_global(variable, expression),
            Command::LoopStart {
                list_variable,
                item_variable,
                index_variable,
            } => visitor.visit_loop_start(list_variable, item_variable, index_variable),
            Command::LoopEnd => visitor.visit_loop_end(),
            Command::ProcedureStart { name, parameters } => {
                visitor.visit_procedure_start(name, parameters)
            }
            Command::ProcedureEnd => visitor.visit_procedure_end(),
            Command::ProcedureCall {
                template_variable,
                arguments_variable,
            } => visitor.visit_procedure_call(template_variable, arguments_variable),
            Command::OutputVariable { variable } => visitor.visit_output_variable(variable),
            Command::OutText { text } => visitor.visit_out_text(text),
        }
    }
}
