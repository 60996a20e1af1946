pub mod logs_route;
pub mod update_kb_request;
pub mod update_kb_route;
