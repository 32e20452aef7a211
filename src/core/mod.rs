// src/core/mod.rs

pub mod arglist;
