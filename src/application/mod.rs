pub mod dispatcher;
pub mod outcome;
pub mod pipeline;
pub mod retry;
pub mod service;
