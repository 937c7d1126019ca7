pub mod ping_route;
