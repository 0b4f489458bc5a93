pub mod arxiv;
pub mod github;
pub mod news;
