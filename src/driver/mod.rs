//! Interactive front end for the GA core.
//!
//! These are thin collaborators: a line-oriented [`Command`] parser, an
//! arithmetic [`Expression`] compiler that turns `f: (x, y) -> ...` into a
//! [`CostFunction`](crate::ga::CostFunction), the [`Session`] that owns
//! state between commands, and a [`Table`] for display. None of the
//! operator semantics live here.

mod command;
mod expr;
mod session;
mod table;

pub use command::{Command, DEFAULT_GENERATIONS};
pub use expr::{ExprError, Expression, MAX_NESTING, MAX_TOKENS};
pub use session::{Outcome, Session};
pub use table::{Table, DEFAULT_MAX_ROWS};
