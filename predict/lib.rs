#![deny(unused_variables)]
#![deny(dead_code)]
#![deny(unused_imports)]
#![deny(clippy::no_effect_underscore_binding)]

//! Form-driven screening for Parkinson's, kidney and liver disease.
//!
//! Each disease is a flow: raw form entries are validated against a declared
//! schema, turned into an ordered feature vector, handed to a pre-trained
//! classifier and mapped to a verdict. The classifiers are loaded once from
//! TOML artifacts and are read-only afterwards.

pub mod config;
pub mod dispatch;
pub mod flow;
pub mod model;
pub mod registry;
pub mod schema;
pub mod validate;
pub mod verdict;

#[path = "../web/mod.rs"]
pub mod web;
