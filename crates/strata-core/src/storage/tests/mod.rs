mod config_tests;
mod local_tests;
