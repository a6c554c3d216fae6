pub mod middleware;
pub mod rate_limit;
pub mod shutdown;
