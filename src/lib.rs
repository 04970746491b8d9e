// error_chain macro can recurse deeply
#![recursion_limit = "1024"]

#[macro_use]
extern crate error_chain;
#[macro_use(lazy_static)]
extern crate lazy_static;

pub mod analysis;
pub mod annotation;
pub mod args;
pub mod assemble;
pub mod cas;
pub mod classify;
pub mod commands;
pub mod config;
pub mod constants;
pub mod errors;
pub mod guide;
pub mod haplotype;
pub mod index;
pub mod iupac;
pub mod output;
pub mod pam;
pub mod progress;
pub mod reference;
pub mod regions;
pub mod table;
pub mod variant;
