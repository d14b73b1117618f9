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

use std::fmt::{Debug, Formatter};
use std::io;
use std::io::Cursor;
use std::io::Read;

use bytes::Bytes;

/// SignableBody is a request body whose payload can be hashed by a signer.
///
/// Signers hash the whole payload, so a streaming body must be buffered in
/// memory first. After `buffer` returns, the body still holds exactly the same
/// content and can be read again from the start.
pub trait SignableBody {
    /// Buffer the whole body in place and return its content.
    ///
    /// Returns `Ok(None)` if the request has no body at all.
    fn buffer(&mut self) -> io::Result<Option<&[u8]>>;
}

impl SignableBody for () {
    fn buffer(&mut self) -> io::Result<Option<&[u8]>> {
        Ok(None)
    }
}

impl SignableBody for Bytes {
    fn buffer(&mut self) -> io::Result<Option<&[u8]>> {
        Ok(Some(&self[..]))
    }
}

impl SignableBody for Vec<u8> {
    fn buffer(&mut self) -> io::Result<Option<&[u8]>> {
        Ok(Some(self.as_slice()))
    }
}

impl SignableBody for String {
    fn buffer(&mut self) -> io::Result<Option<&[u8]>> {
        Ok(Some(self.as_bytes()))
    }
}

impl SignableBody for &str {
    fn buffer(&mut self) -> io::Result<Option<&[u8]>> {
        Ok(Some(self.as_bytes()))
    }
}

impl SignableBody for &[u8] {
    fn buffer(&mut self) -> io::Result<Option<&[u8]>> {
        Ok(Some(self))
    }
}

impl<B: SignableBody> SignableBody for Option<B> {
    fn buffer(&mut self) -> io::Result<Option<&[u8]>> {
        match self {
            Some(body) => body.buffer(),
            None => Ok(None),
        }
    }
}

/// Body is a request body that may still be a stream.
///
/// Use [`Body::from_reader`] for payloads produced by an [`io::Read`]. Once the
/// body has been buffered (for example by signing the request), it holds the
/// bytes and [`Body::reader`] can be called any number of times.
///
/// A stream is read only once. If reading fails, the bytes read so far are
/// dropped and the body stays a drained `Reader`, so the caller has to build
/// a new body before signing again.
#[derive(Default)]
pub enum Body {
    /// No body.
    #[default]
    Empty,
    /// A body fully held in memory.
    Bytes(Bytes),
    /// A body that has not been read yet.
    Reader(Box<dyn Read + Send>),
}

impl Body {
    /// Create a body from a reader.
    pub fn from_reader(r: impl Read + Send + 'static) -> Self {
        Body::Reader(Box::new(r))
    }

    /// Get the buffered content.
    ///
    /// Returns `None` for an empty body or a reader that has not been buffered.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Body::Bytes(bs) => Some(bs),
            _ => None,
        }
    }

    /// Create a reader over the buffered content, positioned at the start.
    ///
    /// Returns `None` if the body is still an unread stream.
    pub fn reader(&self) -> Option<Cursor<Bytes>> {
        match self {
            Body::Empty => Some(Cursor::new(Bytes::new())),
            Body::Bytes(bs) => Some(Cursor::new(bs.clone())),
            Body::Reader(_) => None,
        }
    }

    /// Consume the body and return its content, reading the stream if needed.
    pub fn into_bytes(mut self) -> io::Result<Bytes> {
        self.buffer()?;
        match self {
            Body::Bytes(bs) => Ok(bs),
            _ => Ok(Bytes::new()),
        }
    }
}

impl SignableBody for Body {
    fn buffer(&mut self) -> io::Result<Option<&[u8]>> {
        if let Body::Reader(r) = self {
            let mut buf = Vec::new();
            r.read_to_end(&mut buf)?;
            // Drop the drained reader, only the bytes survive.
            *self = Body::Bytes(Bytes::from(buf));
        }

        Ok(self.as_bytes().map(|bs| bs.as_ref()))
    }
}

impl Debug for Body {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Body::Empty => f.write_str("Body::Empty"),
            Body::Bytes(bs) => write!(f, "Body::Bytes({} bytes)", bs.len()),
            Body::Reader(_) => f.write_str("Body::Reader"),
        }
    }
}

impl From<Bytes> for Body {
    fn from(bs: Bytes) -> Self {
        Body::Bytes(bs)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bs: Vec<u8>) -> Self {
        Body::Bytes(Bytes::from(bs))
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::Bytes(Bytes::from(s))
    }
}

impl From<&'static str> for Body {
    fn from(s: &'static str) -> Self {
        Body::Bytes(Bytes::from_static(s.as_bytes()))
    }
}
