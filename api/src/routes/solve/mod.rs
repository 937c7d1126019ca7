pub mod solve_request;
pub mod solve_route;
