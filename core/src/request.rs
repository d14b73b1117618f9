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

use std::collections::BTreeMap;

use http::header;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;
use http::Uri;
use log::warn;
use percent_encoding::percent_decode;
use percent_encoding::percent_decode_str;

use crate::{Error, Result};

/// Signing context for request.
///
/// SigningRequest is an owned, normalized view of an HTTP request. Building it
/// never touches the original request, so a signer can compute everything it
/// needs first and apply the results only once nothing can fail anymore.
#[derive(Debug, Clone)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// Host used for signing, `host[:port]`.
    pub host: String,
    /// HTTP path, percent decoded.
    ///
    /// Decoding is lenient: malformed escapes are kept as they are.
    pub path: Vec<u8>,
    /// HTTP query parameters, decoded, in their original order.
    pub query: Vec<(String, String)>,
    /// Lower-cased header names mapped to their normalized values.
    ///
    /// Values are raw bytes since a header value may carry opaque bytes that
    /// are not utf-8. Always contains `host`.
    pub headers: BTreeMap<String, Vec<u8>>,
}

impl SigningRequest {
    /// Build a signing context from request components.
    ///
    /// The `authorization` header is skipped since it carries the signature
    /// itself.
    pub fn build(method: &Method, uri: &Uri, headers: &HeaderMap) -> Result<Self> {
        let host = match headers.get(header::HOST) {
            Some(v) => Self::header_value_normalize(v),
            None => Self::uri_host_port(uri)
                .ok_or_else(|| {
                    Error::request_invalid("request without host is invalid for signing")
                })?
                .into_bytes(),
        };

        let mut canonical_headers = BTreeMap::new();
        for name in headers.keys() {
            if name == header::AUTHORIZATION {
                continue;
            }

            let values = headers
                .get_all(name)
                .iter()
                .map(Self::header_value_normalize)
                .collect::<Vec<_>>();
            canonical_headers.insert(name.as_str().to_string(), values.join(&b','));
        }
        canonical_headers.insert(header::HOST.as_str().to_string(), host.clone());

        Ok(SigningRequest {
            method: method.clone(),
            host: String::from_utf8_lossy(&host).into_owned(),
            path: percent_decode_str(uri.path()).collect(),
            query: uri.query().map(Self::query_parse).unwrap_or_default(),
            headers: canonical_headers,
        })
    }

    /// Extract `host[:port]` from the uri authority, userinfo excluded.
    fn uri_host_port(uri: &Uri) -> Option<String> {
        let host = uri.host().filter(|v| !v.is_empty())?;
        match uri.port() {
            Some(port) => Some(format!("{host}:{}", port.as_str())),
            None => Some(host.to_string()),
        }
    }

    /// Parse a raw query string into decoded pairs.
    ///
    /// Pairs are split on `&`, a pair without `=` has an empty value and `+`
    /// decodes to a space. A pair with a malformed percent escape, or that
    /// decodes to invalid utf-8, is dropped.
    pub fn query_parse(query: &str) -> Vec<(String, String)> {
        query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .filter_map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                match (Self::query_unescape(k), Self::query_unescape(v)) {
                    (Some(k), Some(v)) => Some((k, v)),
                    _ => {
                        warn!("query pair {pair:?} is malformed, skipped for signing");
                        None
                    }
                }
            })
            .collect()
    }

    /// Strictly decode a `application/x-www-form-urlencoded` component.
    fn query_unescape(s: &str) -> Option<String> {
        let bs = s.as_bytes();
        let mut idx = 0;
        while idx < bs.len() {
            if bs[idx] == b'%' {
                let escape = bs.get(idx + 1..idx + 3)?;
                if !escape.iter().all(u8::is_ascii_hexdigit) {
                    return None;
                }
                idx += 3;
            } else {
                idx += 1;
            }
        }

        let plus_decoded = s.replace('+', " ");
        percent_decode(plus_decoded.as_bytes())
            .decode_utf8()
            .ok()
            .map(|v| v.into_owned())
    }

    /// Normalize header value.
    ///
    /// Leading and trailing whitespace is trimmed and every inner run of
    /// whitespace collapses into a single space. Other bytes are kept as they
    /// are, including opaque non-ascii ones.
    pub fn header_value_normalize(v: &HeaderValue) -> Vec<u8> {
        Self::bytes_normalize(v.as_bytes())
    }

    fn bytes_normalize(bs: &[u8]) -> Vec<u8> {
        let mut normalized = Vec::with_capacity(bs.len());
        for word in bs
            .split(u8::is_ascii_whitespace)
            .filter(|word| !word.is_empty())
        {
            if !normalized.is_empty() {
                normalized.push(b' ');
            }
            normalized.extend_from_slice(word);
        }
        normalized
    }

    /// Get header names as sorted vector.
    pub fn header_name_to_vec_sorted(&self) -> Vec<&str> {
        // BTreeMap keeps keys sorted already.
        self.headers.keys().map(|k| k.as_str()).collect()
    }

    /// Insert a header that will be part of the signature.
    ///
    /// The value is normalized the same way request headers are.
    pub fn header_insert(&mut self, name: &str, value: &str) {
        self.headers.insert(
            name.to_ascii_lowercase(),
            Self::bytes_normalize(value.as_bytes()),
        );
    }

    /// Convert sorted headers to canonical bytes.
    ///
    /// ```shell
    /// {a: b, c: d} => "a:b\nc:d\n"
    /// ```
    pub fn header_to_bytes(&self) -> Vec<u8> {
        let mut bs = Vec::with_capacity(256);
        for (k, v) in self.headers.iter() {
            bs.extend_from_slice(k.as_bytes());
            bs.push(b':');
            bs.extend_from_slice(v);
            bs.push(b'\n');
        }
        bs
    }
}
