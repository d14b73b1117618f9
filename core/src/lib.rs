// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Core components for signing API requests.
//!
//! This crate provides the service-agnostic building blocks used by the
//! awssign signers. Nothing in here knows about a specific signing protocol;
//! it only offers the pieces every protocol needs.
//!
//! ## Overview
//!
//! - [`SigningRequest`]: an owned, normalized view of a request (method, path,
//!   query pairs and headers) that canonicalization works on.
//! - [`SignableBody`] and [`Body`]: request bodies that can be buffered and
//!   read again after their payload has been hashed.
//! - [`Env`]: environment access for configuration, with [`OsEnv`] for the
//!   process and [`StaticEnv`] for tests.
//! - [`Error`]: the error type shared by all signers.
//!
//! ## Example
//!
//! ```
//! use awssign_core::SigningRequest;
//!
//! let req = http::Request::get("https://example.com/a%20b?b=2&a=1")
//!     .header("X-Custom-Header", "  foo   bar  ")
//!     .body(())
//!     .unwrap();
//!
//! let signing = SigningRequest::build(req.method(), req.uri(), req.headers()).unwrap();
//! assert_eq!(signing.path, b"/a b");
//! assert_eq!(signing.headers["x-custom-header"], b"foo bar");
//! assert_eq!(signing.headers["host"], b"example.com");
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time formatting utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod body;
pub use body::Body;
pub use body::SignableBody;
mod env;
pub use env::Env;
pub use env::OsEnv;
pub use env::StaticEnv;
mod error;
pub use error::Error;
pub use error::ErrorKind;
pub use error::Result;
mod request;
pub use request::SigningRequest;
