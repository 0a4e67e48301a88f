//! Transport-neutral request/reply descriptors.
//!
//! Both the HTTP routes and the Lambda proxy adapter normalize their input
//! into a [`ResourceRequest`] and render the resulting [`Reply`].

use core::str::FromStr;
use std::collections::BTreeMap;

use crate::id::ResourceId;

/// Methods the resource handler understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl core::fmt::Display for Method {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned for any method outside [`Method`]; transports answer 405.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("method not allowed: {0}")]
pub struct UnsupportedMethod(pub String);

impl FromStr for Method {
    type Err = UnsupportedMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            _ => Err(UnsupportedMethod(s.to_string())),
        }
    }
}

/// Normalized inbound request against one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRequest {
    pub method: Method,
    pub id: Option<ResourceId>,
    pub query: BTreeMap<String, String>,
    /// Parsed JSON body; `None` when the request carried no body.
    pub body: Option<serde_json::Value>,
}

impl ResourceRequest {
    pub fn new(method: Method, id: Option<ResourceId>) -> Self {
        Self {
            method,
            id,
            query: BTreeMap::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: BTreeMap<String, String>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Option<serde_json::Value>) -> Self {
        self.body = body;
        self
    }
}

/// Success status of a reply. Failures travel as `DomainError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStatus {
    Ok,
    Created,
}

impl ReplyStatus {
    pub fn code(&self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
        }
    }
}

/// Normalized outbound reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: ReplyStatus,
    pub body: serde_json::Value,
}

impl Reply {
    pub fn ok(body: serde_json::Value) -> Self {
        Self {
            status: ReplyStatus::Ok,
            body,
        }
    }

    pub fn created(body: serde_json::Value) -> Self {
        Self {
            status: ReplyStatus::Created,
            body,
        }
    }
}
