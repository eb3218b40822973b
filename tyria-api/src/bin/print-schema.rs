//! GraphQL Schema Printer
//!
//! Prints the gateway's GraphQL SDL to stdout. Needs no upstream.
//!
//! Usage:
//!   cargo run -p tyria-api --bin print-schema > schema.graphql

use tyria_api::schema_builder;

fn main() {
    println!("{}", schema_builder().finish().sdl());
}
