// Associative tree construction and its background-worker protocol

pub mod builder;
pub mod worker;

pub use builder::{NodeTag, ProgressSink, TreeNode, UNDEFINED_LABEL, build_forest};
pub use worker::{TreeRequest, TreeResponse, TreeWorker, TreeWorkerError};
