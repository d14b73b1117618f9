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

use crate::constants::{AWS_DEFAULT_REGION, AWS_REGION, DEFAULT_REGION};
use awssign_core::Env;

/// Config for the aws v4 signer.
///
/// Values set explicitly always win over values read from the environment.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// `region` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_REGION`]
    /// - env value: [`AWS_DEFAULT_REGION`]
    pub region: Option<String>,
    /// `service` is the signing name of the target service, like `ec2` or `s3`.
    pub service: Option<String>,
}

impl Config {
    /// Load config from env.
    pub fn from_env(mut self, env: &impl Env) -> Self {
        if self.region.is_none() {
            self.region = [AWS_REGION, AWS_DEFAULT_REGION]
                .into_iter()
                .filter_map(|key| env.var(key))
                .find(|v| !v.is_empty());
        }

        self
    }

    /// Set the region.
    pub fn with_region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    /// Set the service.
    pub fn with_service(mut self, service: &str) -> Self {
        self.service = Some(service.to_string());
        self
    }

    /// Region to sign for, falls back to `us-east-1`.
    pub fn region_or_default(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }
}
