//! Runtime compatibility tests

mod current_thread;
