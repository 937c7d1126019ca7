pub mod key_status_route;
