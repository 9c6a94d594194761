//! Safe FFI bindings to liblzma (XZ Utils).
//!
//! This crate provides safe, idiomatic Rust wrappers around the liblzma C library for LZMA/XZ
//! compression and decompression. It offers a high-level, RAII-based API that automatically
//! manages resources and provides comprehensive error handling.
