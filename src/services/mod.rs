pub mod catalog;
pub mod comparison;
pub mod orders;
pub mod recent_searches;
pub mod search_engine;
pub mod search_session;
pub mod session_store;

pub use catalog::{filter_options, suggestions, ActorCatalog, CandidateSource};
pub use comparison::{ComparisonSelection, SelectionChange, MAX_COMPARE};
pub use recent_searches::RecentSearches;
pub use search_engine::search;
pub use search_session::{SearchSession, SessionView};
pub use session_store::{SessionCleanupTask, SessionStore};
