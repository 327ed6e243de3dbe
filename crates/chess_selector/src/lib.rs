pub mod ai;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod filter;
pub mod forced;
pub mod opening_book;
pub mod search;

pub use ai::{Anarchy, Decision, MoveSelector, SelectionResult};
pub use config::{FilterRules, ForbiddenLanding, SelectorConfig, TimeBudget};
pub use error::{EvaluationError, SearchError, SelectionError};
pub use evaluation::{evaluate_position, Evaluator, MaterialEvaluator, Score};
pub use opening_book::OpeningBook;
pub use search::{search_best_move, ScoredMove};
