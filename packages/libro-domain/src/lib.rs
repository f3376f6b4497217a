pub mod snippet;
pub mod tokens;
pub mod topic;
