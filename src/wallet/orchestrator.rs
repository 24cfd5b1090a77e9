//! Wallet orchestrator
//!
//! Combines the [`Identity`] with a [`Transport`] to check balances, send
//! funds and list history. Every operation is a single attempt: failures are
//! returned to the caller as typed errors and never retried.

use crate::config::{Network, NetworkPresets, TransportConfig};
use crate::rpc::{
    HistoryPage, JsonRpcClient, RpcCall, RpcMethod, RpcReply, SendReceipt, Transport,
    TransportError,
};
use crate::wallet::{Address, Amount, ExportedKeys, Identity};
use crate::{Error, Result};
use tracing::{info, warn};

/// Default page size for [`Wallet::fetch_history`]
pub const DEFAULT_HISTORY_COUNT: usize = 10;

/// One identity, one transport, one endpoint
pub struct Wallet<T: Transport = JsonRpcClient> {
    identity: Identity,
    transport: T,
    transport_config: TransportConfig,
    networks: NetworkPresets,
    network: Option<Network>,
}

impl<T: Transport> Wallet<T> {
    /// Create a wallet with no key loaded
    pub fn new(transport: T, transport_config: TransportConfig, networks: NetworkPresets) -> Self {
        Self {
            identity: Identity::new(),
            transport,
            transport_config,
            networks,
            network: None,
        }
    }

    /// Use an existing identity
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = identity;
        self
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_config(&self) -> &TransportConfig {
        &self.transport_config
    }

    /// Current RPC endpoint
    pub fn endpoint(&self) -> &str {
        self.transport_config.url()
    }

    /// Preset network in use, `None` while on the configured endpoint
    pub fn network(&self) -> Option<Network> {
        self.network
    }

    /// Generate a new keypair, replacing the current one
    pub fn create_wallet(&mut self) -> Result<Address> {
        self.identity.create();
        let address = self.identity.derive_address()?;
        info!(address = %address, "Wallet created");
        Ok(address)
    }

    /// Load a PEM private key; on error the current key stays in place
    pub fn import_wallet(&mut self, pem_text: &str) -> Result<Address> {
        if let Err(e) = self.identity.import(pem_text) {
            warn!(error = %e, "Wallet import failed");
            return Err(e);
        }
        let address = self.identity.derive_address()?;
        info!(address = %address, "Wallet imported");
        Ok(address)
    }

    pub fn export_keys(&self) -> Result<ExportedKeys> {
        self.identity.export()
    }

    pub fn address(&self) -> Result<Address> {
        self.identity.derive_address()
    }

    /// `getbalance` for this wallet's address
    pub async fn check_balance(&self) -> Result<f64> {
        let address = self.identity.derive_address()?;
        let reply = self
            .transport
            .request(&self.transport_config, RpcCall::get_balance(&address))
            .await?;

        match reply {
            RpcReply::Balance(balance) => {
                info!(address = %address, balance, "Balance fetched");
                Ok(balance)
            }
            other => Err(unexpected_reply(RpcMethod::GetBalance, &other)),
        }
    }

    /// Sign `amount` and submit `sendtoaddress`
    ///
    /// A rejection by the node is returned as a receipt with
    /// `accepted == false`, not as an error.
    pub async fn send(&self, receiver: &str, amount: Amount) -> Result<SendReceipt> {
        let sender = self.identity.derive_address()?;
        let signature = self.identity.sign_amount(amount)?;

        info!(sender = %sender, receiver, amount = %amount, "Sending transaction");

        let reply = self
            .transport
            .request(
                &self.transport_config,
                RpcCall::send_to_address(receiver, amount, &signature),
            )
            .await?;

        match reply {
            RpcReply::SendAck(receipt) => {
                if receipt.accepted {
                    info!(txid = ?receipt.txid, "Transaction accepted");
                } else {
                    warn!(receiver, amount = %amount, "Transaction rejected by node");
                }
                Ok(receipt)
            }
            other => Err(unexpected_reply(RpcMethod::SendToAddress, &other)),
        }
    }

    /// `listtransactions "*" count`, fresh on every call
    pub async fn fetch_history(&self, count: usize) -> Result<HistoryPage> {
        let reply = self
            .transport
            .request(&self.transport_config, RpcCall::list_transactions(count))
            .await?;

        match reply {
            RpcReply::HistoryPage(records) => {
                info!(count = records.len(), "Transaction history fetched");
                Ok(HistoryPage::new(records, count))
            }
            other => Err(unexpected_reply(RpcMethod::ListTransactions, &other)),
        }
    }

    /// Point the transport at a preset network
    ///
    /// No call is made. Unknown targets are rejected with
    /// [`Error::InvalidChoice`] and leave the endpoint as it was.
    pub fn switch_network(&mut self, target: &str) -> Result<Network> {
        let network: Network = target.parse()?;
        self.transport_config
            .set_url(self.networks.url(network))?;
        self.network = Some(network);
        info!(network = %network, url = self.endpoint(), "Switched network");
        Ok(network)
    }
}

fn unexpected_reply(method: RpcMethod, reply: &RpcReply) -> Error {
    TransportError::Malformed {
        method: method.name().to_string(),
        body: format!("{:?}", reply),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::mock::MockTransport;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    const LOCAL: &str = "http://localhost:38332";

    fn wallet(transport: MockTransport) -> Wallet<MockTransport> {
        let config = TransportConfig::new(LOCAL, "user", "pass").unwrap();
        Wallet::new(transport, config, NetworkPresets::default())
    }

    fn amount(value: f64) -> Amount {
        Amount::new(value).unwrap()
    }

    #[tokio::test]
    async fn operations_without_key_fail_before_any_call() {
        let wallet = wallet(MockTransport::new());

        assert!(matches!(wallet.check_balance().await, Err(Error::NoKeyLoaded)));
        assert!(matches!(
            wallet.send("bob", amount(1.0)).await,
            Err(Error::NoKeyLoaded)
        ));
        assert!(matches!(wallet.address(), Err(Error::NoKeyLoaded)));
        assert!(matches!(wallet.export_keys(), Err(Error::NoKeyLoaded)));
        assert!(wallet.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn check_balance_queries_own_address() {
        let mut wallet = wallet(MockTransport::new().reply(json!(42.5)));
        let address = wallet.create_wallet().unwrap();

        let balance = assert_ok!(wallet.check_balance().await);
        assert_eq!(balance, 42.5);

        let calls = wallet.transport().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "getbalance");
        assert_eq!(calls[0].params, vec![json!(address.as_str())]);
        assert_eq!(calls[0].url, LOCAL);
    }

    #[tokio::test]
    async fn check_balance_propagates_transport_error() {
        let mut wallet = wallet(MockTransport::new().fail(TransportError::Status {
            status: 401,
            body: "Unauthorized".to_string(),
        }));
        wallet.create_wallet().unwrap();

        let err = assert_err!(wallet.check_balance().await);
        assert!(matches!(err, Error::Transport(TransportError::Status { status: 401, .. })));
        assert!(err.to_string().contains("Unauthorized"));
    }

    #[tokio::test]
    async fn send_signs_amount_and_reports_acceptance() {
        let mut wallet = wallet(MockTransport::new().reply(json!("txid-1")));
        wallet.create_wallet().unwrap();

        let receipt = wallet.send("receiver-address", amount(10.0)).await.unwrap();
        assert!(receipt.accepted);
        assert_eq!(receipt.txid.as_deref(), Some("txid-1"));

        let calls = wallet.transport().calls();
        assert_eq!(calls[0].method, "sendtoaddress");
        assert_eq!(calls[0].params[0], json!("receiver-address"));
        assert_eq!(calls[0].params[1], json!(10.0));

        let signature = calls[0].params[2].as_str().unwrap();
        assert!(wallet.identity().verify_amount(amount(10.0), signature).unwrap());
        assert!(!wallet.identity().verify_amount(amount(11.0), signature).unwrap());
    }

    #[tokio::test]
    async fn falsy_send_reply_is_failed_send_and_state_is_unchanged() {
        let mut wallet = wallet(MockTransport::new().reply(json!(false)));
        let before = wallet.create_wallet().unwrap();

        let receipt = wallet.send("abc", amount(10.0)).await.unwrap();
        assert!(!receipt.accepted);
        assert_eq!(receipt.txid, None);

        assert_eq!(wallet.address().unwrap(), before);
        assert_eq!(wallet.endpoint(), LOCAL);
    }

    #[tokio::test]
    async fn send_is_not_retried_on_error() {
        let mut wallet = wallet(
            MockTransport::new()
                .fail(TransportError::Rpc {
                    code: -6,
                    message: "Insufficient funds".to_string(),
                })
                .reply(json!(true)),
        );
        wallet.create_wallet().unwrap();

        assert!(wallet.send("abc", amount(1.0)).await.is_err());
        assert_eq!(wallet.transport().calls().len(), 1);
    }

    #[tokio::test]
    async fn fetch_history_is_bounded_and_fresh_each_call() {
        let page = json!([
            {"txid": "a", "amount": 1.0, "confirmations": 6},
            {"txid": "b", "amount": 2.0, "confirmations": 1},
            {"txid": "c", "amount": 3.0, "confirmations": 0}
        ]);
        let wallet = wallet(
            MockTransport::new()
                .reply(page.clone())
                .reply(json!([])),
        );

        let history: Vec<_> = wallet.fetch_history(2).await.unwrap().collect();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].txid, "a");
        assert_eq!(history[1].confirmations, 1);

        let second = wallet.fetch_history(2).await.unwrap();
        assert_eq!(second.count(), 0);

        let calls = wallet.transport().calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].method, "listtransactions");
        assert_eq!(calls[0].params, vec![json!("*"), json!(2)]);
    }

    #[tokio::test]
    async fn switch_network_changes_endpoint_only() {
        let mut wallet = wallet(MockTransport::new().reply(json!(0.0)));
        let address = wallet.create_wallet().unwrap();
        assert!(!wallet.identity().sign_amount(amount(1.5)).unwrap().is_empty());

        let network = wallet.switch_network("testnet").unwrap();
        assert_eq!(network, Network::Testnet);
        assert_eq!(wallet.network(), Some(Network::Testnet));
        assert_eq!(wallet.endpoint(), "http://testnet.rpc.url");
        assert_eq!(wallet.address().unwrap(), address);
        assert!(wallet.transport().calls().is_empty());

        wallet.check_balance().await.unwrap();
        assert_eq!(wallet.transport().calls()[0].url, "http://testnet.rpc.url");
    }

    #[test]
    fn unknown_network_is_rejected_without_change() {
        let mut wallet = wallet(MockTransport::new());
        let err = wallet.switch_network("moonnet").unwrap_err();
        assert!(matches!(err, Error::InvalidChoice(_)));
        assert_eq!(wallet.endpoint(), LOCAL);
        assert_eq!(wallet.network(), None);
    }

    #[test]
    fn failed_import_keeps_wallet_address() {
        let mut wallet = wallet(MockTransport::new());
        let before = wallet.create_wallet().unwrap();

        assert!(matches!(
            wallet.import_wallet("not a pem"),
            Err(Error::KeyFormat(_))
        ));
        assert_eq!(wallet.address().unwrap(), before);
    }
}
