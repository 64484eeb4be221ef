pub mod approve_request_command;
pub mod create_request_command;
pub mod delete_request_command;
pub mod receive_request_command;
pub mod reject_request_command;
