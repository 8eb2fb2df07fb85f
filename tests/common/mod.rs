//! Shared utilities for integration testing: a scriptable JSON-RPC node.
//!
//! `eth_call` is answered by a per-node handler. The methods a signing
//! provider needs before broadcasting (chain id, nonce, gas, fees) get fixed
//! answers, and every `eth_sendRawTransaction` is rejected since there is no
//! chain behind the node.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use alloy::hex;
use alloy::primitives::{address, keccak256, Address, U256};
use alloy::sol_types::{SolCall, SolValue};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use key_manager_client::blockchain::contracts::{IKeyManager, IERC20};
use key_manager_client::ClientConfig;

pub const CONTRACT: &str = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512";
pub const TOKEN: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
pub const HOLDER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// How the mock node answers one request.
#[allow(dead_code)]
pub enum Reply {
    /// ABI-encoded return data.
    Data(Vec<u8>),
    /// JSON-RPC error object (e.g. execution reverted).
    RpcError(String),
    /// Bare HTTP error status.
    Status(u16),
    /// Arbitrary JSON result.
    Value(Value),
}

/// Requests observed by one node.
#[derive(Default)]
struct Seen {
    /// Selector of every `eth_call`.
    selectors: Vec<[u8; 4]>,
    /// Every JSON-RPC method, in arrival order.
    methods: Vec<String>,
    /// Calldata of every `eth_estimateGas`.
    estimated: Vec<Vec<u8>>,
}

/// Handle to a running mock node.
pub struct MockRpc {
    pub url: String,
    seen: Arc<Mutex<Seen>>,
}

#[allow(dead_code)]
impl MockRpc {
    /// Number of `eth_call`s received for a function selector.
    pub fn count(&self, selector: [u8; 4]) -> usize {
        self.seen
            .lock()
            .unwrap()
            .selectors
            .iter()
            .filter(|s| **s == selector)
            .count()
    }

    /// Number of `eth_call`s received in total.
    pub fn total(&self) -> usize {
        self.seen.lock().unwrap().selectors.len()
    }

    /// Number of requests received for a JSON-RPC method.
    pub fn method_count(&self, method: &str) -> usize {
        self.seen
            .lock()
            .unwrap()
            .methods
            .iter()
            .filter(|m| *m == method)
            .count()
    }

    /// Calldata of every transaction the node was asked to estimate.
    pub fn estimated_calldata(&self) -> Vec<Vec<u8>> {
        self.seen.lock().unwrap().estimated.clone()
    }
}

/// Start a JSON-RPC node on an ephemeral port that answers `eth_call` with
/// `handler(calldata)`.
pub async fn start_mock_rpc<F>(handler: F) -> MockRpc
where
    F: Fn(&[u8]) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Seen::default()));
    let handler = Arc::new(handler);

    let log = seen.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let handler = handler.clone();
                    let log = log.clone();
                    tokio::spawn(async move {
                        serve_one(socket, handler.as_ref(), &log).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockRpc {
        url: format!("http://{}", addr),
        seen,
    }
}

/// URL of a port nothing listens on.
#[allow(dead_code)]
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

async fn serve_one<F>(mut socket: TcpStream, handler: &F, seen: &Mutex<Seen>)
where
    F: Fn(&[u8]) -> Reply,
{
    let Some(body) = read_request(&mut socket).await else {
        return;
    };
    let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let method = request["method"].as_str().unwrap_or_default().to_string();
    seen.lock().unwrap().methods.push(method.clone());

    let reply = match method.as_str() {
        "eth_call" => {
            let calldata = request_calldata(&request);
            if calldata.len() >= 4 {
                let mut selector = [0u8; 4];
                selector.copy_from_slice(&calldata[..4]);
                seen.lock().unwrap().selectors.push(selector);
            }
            handler(&calldata)
        }
        "eth_estimateGas" => {
            seen.lock().unwrap().estimated.push(request_calldata(&request));
            Reply::Value(json!("0x30d40"))
        }
        other => chain_reply(other),
    };

    let (status, payload) = match reply {
        Reply::Value(result) => (
            "200 OK",
            json!({"jsonrpc": "2.0", "id": id, "result": result}).to_string(),
        ),
        Reply::Data(data) => (
            "200 OK",
            json!({"jsonrpc": "2.0", "id": id, "result": hex::encode_prefixed(data)}).to_string(),
        ),
        Reply::RpcError(message) => (
            "200 OK",
            json!({"jsonrpc": "2.0", "id": id, "error": {"code": 3, "message": message}})
                .to_string(),
        ),
        Reply::Status(503) => ("503 Service Unavailable", "unavailable".to_string()),
        Reply::Status(_) => ("500 Internal Server Error", "error".to_string()),
    };

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        payload.len(),
        payload
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

fn request_calldata(request: &Value) -> Vec<u8> {
    let params = &request["params"][0];
    let input = params
        .get("input")
        .or_else(|| params.get("data"))
        .and_then(Value::as_str)
        .unwrap_or("0x");
    hex::decode(input).unwrap_or_default()
}

/// Fixed answers for the methods a signing provider calls before it
/// broadcasts.
fn chain_reply(method: &str) -> Reply {
    match method {
        "eth_chainId" => Reply::Value(json!("0x7a69")),
        "eth_blockNumber" => Reply::Value(json!("0x10")),
        "eth_getTransactionCount" => Reply::Value(json!("0x0")),
        "eth_gasPrice" | "eth_maxPriorityFeePerGas" => Reply::Value(json!("0x3b9aca00")),
        "eth_feeHistory" => Reply::Value(json!({
            "oldestBlock": "0x10",
            "baseFeePerGas": ["0x3b9aca00", "0x3b9aca00"],
            "gasUsedRatio": [0.5],
            "reward": [["0x3b9aca00"]]
        })),
        "eth_sendRawTransaction" => {
            Reply::RpcError("insufficient funds for gas * price + value".to_string())
        }
        other => Reply::RpcError(format!("method {} not supported", other)),
    }
}

async fn read_request(socket: &mut TcpStream) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    Some(buf[body_start..body_start + content_length].to_vec())
}

/// A node backed by a small deployed key manager:
/// - token `TKN` with 6 decimals
/// - tier price 5, no active tiers, zero tiers counted
/// - the key hashed from `"abc"` exists with 1.5 TKN remaining
/// - `HOLDER` owns 2.5 TKN, everyone else nothing
#[allow(dead_code)]
pub fn deployed_contract(calldata: &[u8]) -> Reply {
    let known_key = keccak256("abc");
    let (selector, args) = calldata.split_at(4);

    let data = if selector == IKeyManager::erc20Call::SELECTOR {
        TOKEN.abi_encode()
    } else if selector == IERC20::symbolCall::SELECTOR {
        ("TKN".to_string(),).abi_encode_params()
    } else if selector == IERC20::decimalsCall::SELECTOR {
        U256::from(6u64).abi_encode()
    } else if selector == IKeyManager::tierPriceCall::SELECTOR {
        U256::from(5u64).abi_encode()
    } else if selector == IKeyManager::isTierActiveCall::SELECTOR {
        false.abi_encode()
    } else if selector == IKeyManager::numTiersCall::SELECTOR {
        U256::ZERO.abi_encode()
    } else if selector == IKeyManager::keyExistsCall::SELECTOR {
        (args == known_key.as_slice()).abi_encode()
    } else if selector == IKeyManager::remainingBalanceCall::SELECTOR {
        if args == known_key.as_slice() {
            U256::from(1_500_000u64).abi_encode()
        } else {
            U256::ZERO.abi_encode()
        }
    } else if selector == IERC20::balanceOfCall::SELECTOR {
        if args == HOLDER.abi_encode().as_slice() {
            U256::from(2_500_000u64).abi_encode()
        } else {
            U256::ZERO.abi_encode()
        }
    } else {
        return Reply::RpcError("execution reverted".to_string());
    };
    Reply::Data(data)
}

/// Always answers with an HTTP 503.
#[allow(dead_code)]
pub fn unavailable(_calldata: &[u8]) -> Reply {
    Reply::Status(503)
}

/// Session config pointing at `urls` in order.
pub fn config_for(urls: &[&str]) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.contract.address = CONTRACT.to_string();
    config.rpc.urls = urls.iter().map(|u| u.to_string()).collect();
    config.rpc.attempt_timeout_secs = 5;
    config
}

/// Anvil's first development key; signs for `HOLDER`.
#[allow(dead_code)]
pub const SIGNER_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
