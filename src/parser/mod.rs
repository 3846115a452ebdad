// View selection DSL parser

pub mod ast;
pub mod lexer;
pub mod pipeline;
pub mod view;

// Public API re-exports
pub use ast::ViewState;
pub use pipeline::{parse_view_list, parse_views};
