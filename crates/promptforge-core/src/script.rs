//! Prompt scripts for batch rendering.
//!
//! A script is plain text where every line starting with `/` is a command
//! and every other line is content for the block most recently created:
//!
//! ```text
//! /role
//! You are a careful reviewer.
//! /task
//! Review the diff below.
//! //focus
//! Error handling.
//! ```
//!
//! A content line that must start with a slash is written with a leading
//! backslash (`\/etc/hosts`).

/// One unit of a parsed script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A command-bar line, trimmed.
    Command(String),
    /// Consecutive content lines joined with `\n`, trailing blank lines dropped.
    Content(String),
}

/// Split script text into steps.
pub fn parse(text: &str) -> Vec<Step> {
    let mut steps = Vec::new();
    let mut pending: Vec<&str> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('/') {
            flush(&mut pending, &mut steps);
            steps.push(Step::Command(trimmed.trim_end().to_string()));
        } else if trimmed.starts_with("\\/") {
            pending.push(&trimmed[1..]);
        } else {
            pending.push(line);
        }
    }
    flush(&mut pending, &mut steps);
    steps
}

fn flush(pending: &mut Vec<&str>, steps: &mut Vec<Step>) {
    while pending.last().is_some_and(|l| l.trim().is_empty()) {
        pending.pop();
    }
    while pending.first().is_some_and(|l| l.trim().is_empty()) {
        pending.remove(0);
    }
    if !pending.is_empty() {
        steps.push(Step::Content(pending.join("\n")));
    }
    pending.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_and_content_alternate() {
        let steps = parse("/role\nYou are X.\nBe brief.\n\n/task\n  Do Y\n");
        assert_eq!(
            steps,
            vec![
                Step::Command("/role".into()),
                Step::Content("You are X.\nBe brief.".into()),
                Step::Command("/task".into()),
                Step::Content("  Do Y".into()),
            ]
        );
    }

    #[test]
    fn indented_commands_are_recognised() {
        let steps = parse("/task\n   //step  \nread");
        assert_eq!(
            steps,
            vec![
                Step::Command("/task".into()),
                Step::Command("//step".into()),
                Step::Content("read".into()),
            ]
        );
    }

    #[test]
    fn blank_lines_inside_content_are_kept() {
        let steps = parse("/examples\none\n\ntwo");
        assert_eq!(steps[1], Step::Content("one\n\ntwo".into()));
    }

    #[test]
    fn escaped_slash_is_content() {
        let steps = parse("/context\n\\/etc/hosts is read-only");
        assert_eq!(steps[1], Step::Content("/etc/hosts is read-only".into()));
    }

    #[test]
    fn empty_script_has_no_steps() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n  \n").is_empty());
    }
}
