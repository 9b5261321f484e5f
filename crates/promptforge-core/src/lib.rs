//! Core model for promptforge: prompt blocks, the slash-command
//! interpreter, the nested markup serializer, and the LLM bridge used by
//! `/forge`.

pub mod block;
pub mod command;
pub mod keywords;
pub mod llm;
pub mod markup;
pub mod script;
pub mod session;

pub use block::{Block, ColorFamily, IndentLevel};
pub use command::Command;
pub use keywords::Keyword;
pub use session::{Outcome, Session};
