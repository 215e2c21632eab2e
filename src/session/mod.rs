// Session component exports
pub mod console;
pub mod search;

pub use console::{ConsoleError, QueryBackend, QueryConsole};
pub use search::{
    CandidateSource, SearchHandle, SearchOrchestrator, SearchResultSet, SearchSnapshot,
    SearchStatus,
};
