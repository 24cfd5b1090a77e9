//! Interactive terminal menu
//!
//! Reads choices line by line and prints results. Operation errors are
//! printed and the loop continues; only I/O errors on the terminal itself
//! end the session early.

use crate::config::Network;
use crate::rpc::Transport;
use crate::wallet::{Amount, Wallet, DEFAULT_HISTORY_COUNT};
use crate::Result;
use secrecy::ExposeSecret;
use std::io::{BufRead, Write};

const PEM_BEGIN_MARKER: &str = "-----BEGIN";
const PEM_END_MARKER: &str = "-----END";

pub struct Menu<R, W> {
    input: R,
    output: W,
    history_count: usize,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            history_count: DEFAULT_HISTORY_COUNT,
        }
    }

    pub fn with_history_count(mut self, count: usize) -> Self {
        self.history_count = count;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until the user exits or input ends
    pub async fn run<T: Transport>(&mut self, wallet: &mut Wallet<T>) -> Result<()> {
        loop {
            writeln!(self.output, "\nFuture (FTR) Wallet Menu:")?;
            writeln!(self.output, "1. Create New Wallet")?;
            writeln!(self.output, "2. Import Wallet")?;
            writeln!(self.output, "3. Check Balance")?;
            writeln!(self.output, "4. Send Transaction")?;
            writeln!(self.output, "5. Show Keys")?;
            writeln!(self.output, "6. Fetch Transaction History")?;
            writeln!(self.output, "7. Switch Network")?;
            writeln!(self.output, "8. Exit")?;

            let Some(choice) = self.prompt("Enter your choice: ")? else {
                break;
            };

            match choice.as_str() {
                "1" => self.create(wallet)?,
                "2" => self.import(wallet)?,
                "3" => self.check_balance(wallet).await?,
                "4" => self.send(wallet).await?,
                "5" => self.show_keys(wallet)?,
                "6" => self.history(wallet).await?,
                "7" => self.switch_network(wallet)?,
                "8" => {
                    writeln!(self.output, "Exiting wallet. Goodbye!")?;
                    break;
                }
                _ => writeln!(self.output, "Invalid choice. Please try again.")?,
            }
        }
        Ok(())
    }

    fn create<T: Transport>(&mut self, wallet: &mut Wallet<T>) -> Result<()> {
        match wallet.create_wallet() {
            Ok(_) => {
                writeln!(self.output, "Wallet Created!")?;
                self.show_keys(wallet)
            }
            Err(e) => {
                writeln!(self.output, "Error creating wallet: {}", e)?;
                Ok(())
            }
        }
    }

    fn import<T: Transport>(&mut self, wallet: &mut Wallet<T>) -> Result<()> {
        writeln!(self.output, "Enter your private key (PEM format):")?;
        let pem = self.read_pem()?;
        match wallet.import_wallet(&pem) {
            Ok(_) => {
                writeln!(self.output, "Wallet Imported Successfully!")?;
                self.show_keys(wallet)
            }
            Err(e) => {
                writeln!(self.output, "Error importing wallet: {}", e)?;
                Ok(())
            }
        }
    }

    fn show_keys<T: Transport>(&mut self, wallet: &Wallet<T>) -> Result<()> {
        let exported = wallet
            .export_keys()
            .and_then(|keys| wallet.address().map(|address| (keys, address)));
        let (keys, address) = match exported {
            Ok(pair) => pair,
            Err(e) => {
                writeln!(self.output, "Error showing keys: {}", e)?;
                return Ok(());
            }
        };
        writeln!(self.output, "Private Key (keep this secret!):")?;
        write!(self.output, "{}", keys.private_pem.expose_secret())?;
        writeln!(self.output, "Public Key:")?;
        write!(self.output, "{}", keys.public_pem)?;
        writeln!(self.output, "Address: {}", address)?;
        Ok(())
    }

    async fn check_balance<T: Transport>(&mut self, wallet: &Wallet<T>) -> Result<()> {
        match wallet.check_balance().await {
            Ok(balance) => writeln!(self.output, "Your balance: {} FTR", balance)?,
            Err(e) => writeln!(self.output, "Error checking balance: {}", e)?,
        }
        Ok(())
    }

    async fn send<T: Transport>(&mut self, wallet: &Wallet<T>) -> Result<()> {
        let Some(receiver) = self.prompt("Enter receiver's address: ")? else {
            return Ok(());
        };
        let Some(amount_text) = self.prompt("Enter amount to send: ")? else {
            return Ok(());
        };

        let amount: Amount = match amount_text.parse() {
            Ok(amount) => amount,
            Err(e) => {
                writeln!(self.output, "Error sending transaction: {}", e)?;
                return Ok(());
            }
        };

        match wallet.send(&receiver, amount).await {
            Ok(receipt) if receipt.accepted => match receipt.txid {
                Some(txid) => writeln!(self.output, "Transaction sent successfully! ({})", txid)?,
                None => writeln!(self.output, "Transaction sent successfully!")?,
            },
            Ok(_) => writeln!(self.output, "Transaction failed.")?,
            Err(e) => writeln!(self.output, "Error sending transaction: {}", e)?,
        }
        Ok(())
    }

    async fn history<T: Transport>(&mut self, wallet: &Wallet<T>) -> Result<()> {
        match wallet.fetch_history(self.history_count).await {
            Ok(page) => {
                let records: Vec<_> = page.collect();
                if records.is_empty() {
                    writeln!(self.output, "No transactions found.")?;
                }
                for tx in records {
                    writeln!(
                        self.output,
                        "Transaction ID: {}, Amount: {}, Confirmations: {}",
                        tx.txid, tx.amount, tx.confirmations
                    )?;
                }
            }
            Err(e) => writeln!(self.output, "Error fetching transactions: {}", e)?,
        }
        Ok(())
    }

    fn switch_network<T: Transport>(&mut self, wallet: &mut Wallet<T>) -> Result<()> {
        writeln!(self.output, "1. Connect to {}", Network::Mainnet)?;
        writeln!(self.output, "2. Connect to {}", Network::Testnet)?;
        let Some(choice) = self.prompt("Enter your choice: ")? else {
            return Ok(());
        };
        match wallet.switch_network(&choice) {
            Ok(network) => writeln!(
                self.output,
                "Connected to {} ({})",
                network,
                wallet.endpoint()
            )?,
            Err(e) => writeln!(self.output, "{}", e)?,
        }
        Ok(())
    }

    /// Print `prompt` and read one trimmed line; `None` at end of input
    fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Read a PEM block up to and including its END line
    fn read_pem(&mut self) -> Result<String> {
        let mut pem = String::new();
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            let trimmed = line.trim();
            if trimmed.is_empty() && pem.is_empty() {
                continue;
            }
            pem.push_str(trimmed);
            pem.push('\n');
            // A first line that is not a BEGIN line cannot start a block
            if trimmed.starts_with(PEM_END_MARKER) || !pem.starts_with(PEM_BEGIN_MARKER) {
                break;
            }
        }
        Ok(pem)
    }
}
