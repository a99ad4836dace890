use crate::compiler_frontend::commands::command_nodes::Command;
use crate::compiler_frontend::commands::command_stream::CommandStream;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::optimizers::stream_transformer::StreamTransformer;

/// Merges runs of adjacent `OutText` commands into one write
pub struct CoalescingWrites;

impl StreamTransformer for CoalescingWrites {
    fn name(&self) -> &'static str {
        "coalescing_writes"
    }

    fn transform(&self, input: &[Command], output: &mut CommandStream) -> Result<(), CompilerError> {
        let mut pending_text = String::new();

        for command in input {
            if let Command::OutText { text } = command {
                pending_text.push_str(text);
                continue;
            }

            if !pending_text.is_empty() {
                output.write(Command::text(std::mem::take(&mut pending_text)))?;
            }
            output.write(command.to_owned())?;
        }

        if !pending_text.is_empty() {
            output.write(Command::text(pending_text))?;
        }

        Ok(())
    }
}
