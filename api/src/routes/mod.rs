pub mod key_status;
pub mod ping;
pub mod solve;
pub mod solve_batch;
