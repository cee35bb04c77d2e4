mod config;
mod resolve;
mod scan;
