pub mod solve_batch_response;
pub mod solve_batch_route;
