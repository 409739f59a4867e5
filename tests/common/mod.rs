pub mod timestamp_server;
