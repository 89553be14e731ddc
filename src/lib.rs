//! Unithrift - Campus Secondhand Marketplace Payment Core
//!
//! This crate implements the payment lifecycle for a campus marketplace:
//! purchase initiation, Midtrans webhook reconciliation, and payment
//! status polling.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
