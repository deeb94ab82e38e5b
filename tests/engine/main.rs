//! Integration tests for the engine against a mock HTTP server and
//! scripted in-process transports.


mod cache_persistence;
mod construction;
mod generate;
mod retry;
