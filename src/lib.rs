pub mod aggs;
pub mod emit;
pub mod literal;
pub mod params;
pub mod query;
pub mod script;
pub mod translate;

#[cfg(feature = "cli")]
pub mod cli;

pub use aggs::{translate_agg_node, AggKind};
pub use emit::Emitter;
pub use query::{translate_query_node, ClauseKind};
pub use translate::{translate, TranslateError};
