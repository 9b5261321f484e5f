//! Nested markup serializer.
//!
//! Blocks carry no parent pointers; nesting is recovered from the sequence
//! of indent levels with a stack of open elements. A block closes every
//! open element whose level is greater than or equal to its own, then opens
//! its own element one step deeper than whatever is left on the stack.
//!
//! Levels that skip a step (1 -> 3) are not rejected: such a block simply
//! nests one level below the nearest open ancestor.

use crate::block::Block;

/// One indentation unit.
const INDENT: &str = "  ";

/// Render `blocks` as nested markup.
///
/// Lines are joined with `\n` and there is no trailing newline. An empty
/// slice renders as an empty string.
pub fn render<'a, I>(blocks: I) -> String
where
    I: IntoIterator<Item = &'a Block>,
{
    let mut lines: Vec<String> = Vec::new();
    let mut stack: Vec<(String, u8)> = Vec::new();

    for block in blocks {
        let level = block.level.get();

        while stack.last().is_some_and(|(_, open)| *open >= level) {
            close_top(&mut stack, &mut lines);
        }

        let element = block.element_name();
        let indent = INDENT.repeat(stack.len());
        lines.push(format!("{indent}<{element}>"));

        let content = block.content.trim();
        if !content.is_empty() {
            for line in content.lines() {
                lines.push(format!("{indent}{INDENT}{line}"));
            }
        }

        stack.push((element, level));
    }

    while !stack.is_empty() {
        close_top(&mut stack, &mut lines);
    }

    lines.join("\n")
}

fn close_top(stack: &mut Vec<(String, u8)>, lines: &mut Vec<String>) {
    if let Some((element, _)) = stack.pop() {
        lines.push(format!("{}</{element}>", INDENT.repeat(stack.len())));
    }
}
