pub mod session;
pub mod topic;

pub use session::StudySession;
pub use topic::TopicTotals;
