//! Wallet RPC calls and their decoded replies

use super::TransportError;
use crate::wallet::{Address, Amount};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// RPC methods used by the wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcMethod {
    GetBalance,
    SendToAddress,
    ListTransactions,
}

impl RpcMethod {
    pub fn name(&self) -> &'static str {
        match self {
            RpcMethod::GetBalance => "getbalance",
            RpcMethod::SendToAddress => "sendtoaddress",
            RpcMethod::ListTransactions => "listtransactions",
        }
    }
}

/// A method plus its ordered parameters
#[derive(Debug, Clone, PartialEq)]
pub struct RpcCall {
    method: RpcMethod,
    params: Vec<Value>,
}

impl RpcCall {
    /// `getbalance [address]`
    pub fn get_balance(address: &Address) -> Self {
        Self {
            method: RpcMethod::GetBalance,
            params: vec![json!(address.as_str())],
        }
    }

    /// `sendtoaddress [receiver, amount, signature]`
    pub fn send_to_address(receiver: &str, amount: Amount, signature: &str) -> Self {
        Self {
            method: RpcMethod::SendToAddress,
            params: vec![json!(receiver), json!(amount.value()), json!(signature)],
        }
    }

    /// `listtransactions ["*", count]`
    pub fn list_transactions(count: usize) -> Self {
        Self {
            method: RpcMethod::ListTransactions,
            params: vec![json!("*"), json!(count)],
        }
    }

    pub fn method(&self) -> RpcMethod {
        self.method
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn into_parts(self) -> (RpcMethod, Vec<Value>) {
        (self.method, self.params)
    }
}

/// Node verdict on a `sendtoaddress` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendReceipt {
    pub accepted: bool,
    /// Present when the node answers with a transaction id
    pub txid: Option<String>,
}

impl SendReceipt {
    /// Judge a raw reply by truthiness: `true`, a non-empty string, a non-zero
    /// number or a non-empty collection accept; anything else rejects.
    pub fn from_reply(result: &Value) -> Self {
        let accepted = match result {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
        };
        let txid = match result {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        };
        Self { accepted, txid }
    }
}

/// One entry of `listtransactions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(alias = "id")]
    pub txid: String,
    pub amount: f64,
    pub confirmations: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<DateTime<Utc>>,
}

/// A bounded, single-pass page of transaction history
#[derive(Debug)]
pub struct HistoryPage {
    records: std::vec::IntoIter<TransactionRecord>,
}

impl HistoryPage {
    /// Keep at most `limit` records, in node order
    pub fn new(mut records: Vec<TransactionRecord>, limit: usize) -> Self {
        records.truncate(limit);
        Self {
            records: records.into_iter(),
        }
    }
}

impl Iterator for HistoryPage {
    type Item = TransactionRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.records.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

impl ExactSizeIterator for HistoryPage {}

/// Decoded result of a wallet RPC call
#[derive(Debug, Clone, PartialEq)]
pub enum RpcReply {
    Balance(f64),
    SendAck(SendReceipt),
    HistoryPage(Vec<TransactionRecord>),
}

impl RpcReply {
    /// Validate a raw result against the shape `method` is expected to return
    pub fn decode(method: RpcMethod, result: Value) -> Result<Self, TransportError> {
        let malformed = |result: &Value| TransportError::Malformed {
            method: method.name().to_string(),
            body: result.to_string(),
        };

        match method {
            RpcMethod::GetBalance => result
                .as_f64()
                .map(RpcReply::Balance)
                .ok_or_else(|| malformed(&result)),
            RpcMethod::SendToAddress => Ok(RpcReply::SendAck(SendReceipt::from_reply(&result))),
            RpcMethod::ListTransactions => serde_json::from_value(result.clone())
                .map(RpcReply::HistoryPage)
                .map_err(|_| malformed(&result)),
        }
    }
}
