//! In-memory compiler and chain, and a stub JSON-RPC node, used by the unit tests.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use alloy_core::{
    json_abi::JsonAbi,
    primitives::{Address, B256, Bytes, TxHash, TxKind, U256, keccak256},
};
use alloy_sol_types::{SolCall, SolEvent, SolValue};
use alloy_transport::TransportErrorKind;
use serde_json::{Value, json};
use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
};
use url::Url;

use crate::{
    chain::{ChainClient, TransactionReceipt, TransactionRequest},
    compiler::{CompiledArtifact, SolidityCompiler},
    counter::ICounter,
    error::{CompilationError, DeploymentError},
    source::ContractSource,
};

/// A counter artifact with the real ABI and placeholder bytecode.
pub(crate) fn counter_artifact() -> CompiledArtifact {
    let abi: JsonAbi = serde_json::from_value(json!([
        {
            "type": "function",
            "name": "getCount",
            "inputs": [],
            "outputs": [{"name": "", "type": "uint256", "internalType": "uint256"}],
            "stateMutability": "view"
        },
        {
            "type": "function",
            "name": "increment",
            "inputs": [],
            "outputs": [],
            "stateMutability": "nonpayable"
        },
        {
            "type": "event",
            "name": "CountIncremented",
            "inputs": [{"name": "newCount", "type": "uint256", "indexed": false, "internalType": "uint256"}],
            "anonymous": false
        }
    ]))
    .expect("counter ABI should parse");

    CompiledArtifact {
        abi,
        bytecode: Bytes::from_static(&[0x60, 0x80, 0x60, 0x40, 0x52]),
    }
}

/// A compiler returning a fixed outcome.
pub(crate) struct MockCompiler {
    artifact: Option<CompiledArtifact>,
    calls: AtomicUsize,
}

impl MockCompiler {
    pub(crate) fn succeeding(artifact: CompiledArtifact) -> Self {
        Self {
            artifact: Some(artifact),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            artifact: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SolidityCompiler for MockCompiler {
    fn compile(&self, source: &ContractSource) -> Result<CompiledArtifact, CompilationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.artifact.clone().ok_or_else(|| {
            CompilationError::Diagnostics(vec![format!(
                "ParserError: Expected ';' but got '}}'\n --> {}:9:5:",
                source.file_name
            )])
        })
    }
}

/// Build a receipt the way a node returns it.
fn receipt(
    tx_hash: TxHash,
    from: Address,
    to: Option<Address>,
    contract_address: Option<Address>,
    block_number: u64,
    success: bool,
    logs: Vec<Value>,
) -> TransactionReceipt {
    serde_json::from_value(json!({
        "type": "0x2",
        "status": if success { "0x1" } else { "0x0" },
        "cumulativeGasUsed": "0x5208",
        "logs": logs,
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "transactionHash": tx_hash,
        "transactionIndex": "0x0",
        "blockHash": B256::repeat_byte(0xbb),
        "blockNumber": format!("{block_number:#x}"),
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "from": from,
        "to": to,
        "contractAddress": contract_address,
    }))
    .expect("receipt should deserialize")
}

#[derive(Default)]
struct ChainState {
    nonce: u64,
    submitted: Vec<TransactionRequest>,
    receipts: HashMap<TxHash, TransactionReceipt>,
    counters: HashMap<Address, U256>,
}

/// A chain that mines every accepted transaction immediately and runs the
/// counter contract natively.
pub(crate) struct MockChain {
    signer: Address,
    reject: bool,
    revert: bool,
    mine: bool,
    state: Mutex<ChainState>,
}

impl MockChain {
    pub(crate) fn new() -> Self {
        Self {
            signer: Address::repeat_byte(0xf3),
            reject: false,
            revert: false,
            mine: true,
            state: Mutex::new(ChainState::default()),
        }
    }

    /// Reject every submission as a node without funds would.
    pub(crate) fn rejecting(mut self) -> Self {
        self.reject = true;
        self
    }

    /// Mine every transaction with a failed status.
    pub(crate) fn reverting(mut self) -> Self {
        self.revert = true;
        self
    }

    /// Accept transactions but never mine them.
    pub(crate) fn never_mined(mut self) -> Self {
        self.mine = false;
        self
    }

    pub(crate) fn submitted(&self) -> Vec<TransactionRequest> {
        self.state.lock().unwrap().submitted.clone()
    }

    fn execute(
        &self,
        state: &mut ChainState,
        tx_hash: TxHash,
        request: &TransactionRequest,
        nonce: u64,
    ) -> TransactionReceipt {
        let block_number = nonce + 1;
        let input = request.input.input().cloned().unwrap_or_default();

        match request.to.unwrap_or(TxKind::Create) {
            TxKind::Create => {
                let address = self.signer.create(nonce);
                state.counters.insert(address, U256::ZERO);
                receipt(tx_hash, self.signer, None, Some(address), block_number, true, vec![])
            }
            TxKind::Call(to) => {
                let mut logs = Vec::new();
                if input.starts_with(&ICounter::incrementCall::SELECTOR) {
                    if let Some(count) = state.counters.get_mut(&to) {
                        *count += U256::from(1);
                        let event = ICounter::CountIncremented { newCount: *count };
                        logs.push(json!({
                            "address": to,
                            "topics": [ICounter::CountIncremented::SIGNATURE_HASH],
                            "data": Bytes::from(event.encode_data()),
                            "blockNumber": format!("{block_number:#x}"),
                            "transactionHash": tx_hash,
                            "transactionIndex": "0x0",
                            "logIndex": "0x0",
                            "removed": false
                        }));
                    }
                }
                receipt(tx_hash, self.signer, Some(to), None, block_number, true, logs)
            }
        }
    }
}

impl ChainClient for MockChain {
    fn signer_address(&self) -> Address {
        self.signer
    }

    async fn submit(&self, request: TransactionRequest) -> Result<TxHash, DeploymentError> {
        if self.reject {
            return Err(DeploymentError::Rpc {
                method: "eth_sendRawTransaction",
                source: TransportErrorKind::custom_str("insufficient funds for gas * price + value"),
            });
        }

        let mut state = self.state.lock().unwrap();
        let nonce = state.nonce;
        state.nonce += 1;
        state.submitted.push(request.clone());

        let tx_hash = keccak256(nonce.to_be_bytes());
        if self.mine {
            let receipt = if self.revert {
                receipt(tx_hash, self.signer, None, None, nonce + 1, false, vec![])
            } else {
                self.execute(&mut state, tx_hash, &request, nonce)
            };
            state.receipts.insert(tx_hash, receipt);
        }

        Ok(tx_hash)
    }

    async fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
        timeout: Option<Duration>,
    ) -> Result<TransactionReceipt, DeploymentError> {
        let mined = self.state.lock().unwrap().receipts.get(&tx_hash).cloned();
        match (mined, timeout) {
            (Some(receipt), _) => Ok(receipt),
            (None, Some(limit)) => {
                tokio::time::sleep(limit).await;
                Err(DeploymentError::ConfirmationTimeout(tx_hash, limit))
            }
            (None, None) => std::future::pending().await,
        }
    }

    async fn call(&self, request: TransactionRequest) -> Result<Bytes, DeploymentError> {
        let to = request.to.and_then(|kind| kind.to().copied());
        let input = request.input.input().cloned().unwrap_or_default();
        let count = to.and_then(|to| self.state.lock().unwrap().counters.get(&to).copied());

        match count {
            Some(count) if input.starts_with(&ICounter::getCountCall::SELECTOR) => {
                Ok(Bytes::from(count.abi_encode()))
            }
            _ => Ok(Bytes::new()),
        }
    }
}

/// Answers one JSON-RPC method: a result, or an error code and message.
pub(crate) type RpcHandler = fn(&str, &Value) -> Result<Value, (i64, String)>;

/// A minimal HTTP JSON-RPC node on a local port, answering through a handler.
pub(crate) struct StubNode {
    url: Url,
    calls: Arc<Mutex<Vec<(String, Value)>>>,
}

impl StubNode {
    pub(crate) async fn start(handler: RpcHandler) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub node");
        let port = listener.local_addr().expect("Failed to read local address").port();
        let calls = Arc::new(Mutex::new(Vec::new()));

        let recorded = calls.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve_connection(stream, handler, recorded.clone()));
            }
        });

        Self {
            url: Url::parse(&format!("http://127.0.0.1:{port}")).expect("stub url should parse"),
            calls,
        }
    }

    pub(crate) fn url(&self) -> Url {
        self.url.clone()
    }

    /// Params of every request for `method`, in arrival order.
    pub(crate) fn params_of(&self, method: &str) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, params)| params.clone())
            .collect()
    }
}

async fn serve_connection(
    stream: TcpStream,
    handler: RpcHandler,
    calls: Arc<Mutex<Vec<(String, Value)>>>,
) {
    let (read, mut write) = stream.into_split();
    let mut reader = BufReader::new(read);

    loop {
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            match reader.read_line(&mut line).await {
                Ok(0) | Err(_) => return,
                Ok(_) => {}
            }
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
        }

        let mut body = vec![0; content_length];
        if reader.read_exact(&mut body).await.is_err() {
            return;
        }

        let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        let response = match request {
            Value::Array(batch) => Value::Array(
                batch
                    .iter()
                    .map(|request| respond(request, handler, &calls))
                    .collect(),
            ),
            single => respond(&single, handler, &calls),
        };

        let payload = response.to_string();
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n",
            payload.len()
        );
        if write.write_all(head.as_bytes()).await.is_err()
            || write.write_all(payload.as_bytes()).await.is_err()
        {
            return;
        }
    }
}

fn respond(request: &Value, handler: RpcHandler, calls: &Mutex<Vec<(String, Value)>>) -> Value {
    let method = request["method"].as_str().unwrap_or_default();
    let params = request.get("params").cloned().unwrap_or(Value::Null);
    let id = request.get("id").cloned().unwrap_or(Value::Null);

    calls.lock().unwrap().push((method.to_string(), params.clone()));

    match handler(method, &params) {
        Ok(result) => json!({"jsonrpc": "2.0", "id": id, "result": result}),
        Err((code, message)) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {"code": code, "message": message}
        }),
    }
}
