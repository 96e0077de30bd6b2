//! Integration tests for Layer 1: Schema
//!
//! Tests for the schema builder, inheritance policies, and schema documents.

mod document;
