//! The send flow: fetch parameters, build, sign, submit, poll.
//!
//! Each step is a separate call so the caller stays in charge of retries.
//! Nothing here resubmits a signed transaction or rebuilds after a
//! rejection; a stale-params rejection is reported so the caller can start a
//! new attempt with fresh parameters.

use std::sync::Arc;
use std::time::Duration;

use tessera::{
    Broadcaster, Chain, Error, FeeParams, NetworkParams, NetworkParamsSource, RejectReason,
    Result, SendAttempt, SendState, SubmitOutcome,
};
use tracing::{debug, info, warn};

use crate::config::WalletConfig;
use crate::registry::KeypairRegistry;

/// Fee policy applied on top of network estimates.
///
/// Ethereum: gas price from the network, gas limit fixed by config.
/// Solana: the configured flat fee, no network estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeePolicy {
    /// Gas limit for Ethereum transfers.
    pub gas_limit: u64,
    /// Lamports per signature for Solana transfers.
    pub lamports_per_signature: u64,
}

impl From<&WalletConfig> for FeePolicy {
    fn from(config: &WalletConfig) -> Self {
        Self {
            gas_limit: config.ethereum.gas_limit,
            lamports_per_signature: config.solana.lamports_per_signature,
        }
    }
}

/// Drives send attempts through the registry and network collaborators.
pub struct SendFlow {
    registry: Arc<KeypairRegistry>,
    params: Arc<dyn NetworkParamsSource>,
    broadcaster: Arc<dyn Broadcaster>,
    fees: FeePolicy,
    submit_timeout: Duration,
}

impl SendFlow {
    /// Wire a flow from its collaborators.
    #[must_use]
    pub fn new(
        registry: Arc<KeypairRegistry>,
        params: Arc<dyn NetworkParamsSource>,
        broadcaster: Arc<dyn Broadcaster>,
        config: &WalletConfig,
    ) -> Self {
        Self {
            registry,
            params,
            broadcaster,
            fees: FeePolicy::from(config),
            submit_timeout: config.submit_timeout(),
        }
    }

    /// The registry this flow signs with.
    #[must_use]
    pub fn registry(&self) -> &Arc<KeypairRegistry> {
        &self.registry
    }

    /// Fetch fresh network parameters for `sender` on `chain`.
    ///
    /// # Errors
    ///
    /// Returns collaborator errors, or [`Error::InvalidNetworkParams`] if the
    /// collaborator answered for another chain.
    pub async fn fetch_params(&self, chain: Chain, sender: &str) -> Result<NetworkParams> {
        let freshness = self.params.fetch_freshness(chain, sender).await?;
        let fee = match chain {
            Chain::Ethereum => match self.params.fetch_fee_estimate(chain).await? {
                FeeParams::Evm { gas_price, .. } => FeeParams::Evm {
                    gas_price,
                    gas_limit: self.fees.gas_limit,
                },
                FeeParams::Svm { .. } => {
                    return Err(Error::InvalidNetworkParams(
                        "fee estimate for ethereum has the wrong shape".into(),
                    ))
                }
            },
            Chain::Solana => FeeParams::Svm {
                lamports_per_signature: self.fees.lamports_per_signature,
            },
        };

        let params = NetworkParams::new(freshness, fee);
        if params.chain() != Some(chain) {
            return Err(Error::InvalidNetworkParams(format!(
                "freshness token is not for {chain}"
            )));
        }
        Ok(params)
    }

    /// Build an attempt to send `amount` (display units) from the active
    /// wallet of `chain` to `recipient`.
    ///
    /// The recipient and amount are validated before any network call.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`], [`Error::InvalidAmount`],
    /// [`Error::UnknownWallet`] if no wallet is active, or collaborator errors.
    pub async fn prepare(&self, chain: Chain, recipient: &str, amount: &str) -> Result<SendAttempt> {
        let scheme = self.registry.scheme(chain)?;
        if !scheme.is_valid_address(recipient) {
            return Err(Error::InvalidAddress {
                chain,
                address: recipient.to_string(),
            });
        }
        let minor = chain.denomination().to_minor_units(amount)?;
        let sender = self
            .registry
            .active(chain)
            .await?
            .ok_or_else(|| Error::UnknownWallet {
                chain,
                address: String::new(),
            })?;

        let params = self.fetch_params(chain, &sender).await?;
        let unsigned = scheme.build_transfer(&sender, recipient, minor, &params)?;
        debug!(
            %chain,
            %sender,
            %recipient,
            amount = %chain.denomination().format(minor),
            max_fee = %chain.denomination().format(params.fee.max_fee()),
            "prepared transfer"
        );
        Ok(SendAttempt::new(unsigned))
    }

    /// `Built -> Signed`, with the chain's active keypair.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTransition`] if the attempt is not in `Built`, or
    /// signing errors from the registry.
    pub async fn sign(&self, attempt: &mut SendAttempt) -> Result<()> {
        ensure_state(attempt, SendState::Built, SendState::Signed)?;
        let signed = self.registry.sign(attempt.unsigned()).await?;
        attempt.mark_signed(signed)
    }

    /// Hand a signed attempt to the broadcaster once.
    ///
    /// Returns the new state: `Submitted` or `TimedOut`. A rejection moves
    /// the attempt to `Rejected` and is returned as
    /// [`Error::StaleNetworkParams`] or [`Error::BroadcastRejected`].
    ///
    /// # Errors
    ///
    /// See above; collaborator errors leave the attempt in `Signed`.
    pub async fn submit(&self, attempt: &mut SendAttempt) -> Result<SendState> {
        ensure_state(attempt, SendState::Signed, SendState::Submitted)?;
        let chain = attempt.unsigned().chain();
        let Some(signed) = attempt.signed() else {
            return Err(Error::InvalidTransition {
                from: attempt.state(),
                to: SendState::Submitted,
            });
        };

        let outcome =
            tokio::time::timeout(self.submit_timeout, self.broadcaster.submit(chain, signed)).await;

        match outcome {
            Err(_) => {
                warn!(
                    %chain,
                    reference = ?attempt.reference(),
                    "submission timed out, outcome unknown"
                );
                attempt.mark_timed_out()?;
            }
            Ok(result) => match result? {
                SubmitOutcome::Accepted { reference } => {
                    info!(%chain, %reference, "transaction submitted");
                    attempt.mark_submitted(reference)?;
                }
                SubmitOutcome::Rejected(RejectReason::StaleParams(reason)) => {
                    warn!(%chain, %reason, "rejected with stale network parameters");
                    attempt.mark_rejected(reason.clone())?;
                    return Err(Error::StaleNetworkParams { chain, reason });
                }
                SubmitOutcome::Rejected(RejectReason::Other(reason)) => {
                    warn!(%chain, %reason, "transaction rejected");
                    attempt.mark_rejected(reason.clone())?;
                    return Err(Error::BroadcastRejected(reason));
                }
            },
        }
        Ok(attempt.state())
    }

    /// Query the network for a submitted or timed-out attempt.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTransition`] if the attempt was never handed to the
    /// broadcaster or is already final, or collaborator errors.
    pub async fn poll(&self, attempt: &mut SendAttempt) -> Result<SendState> {
        let state = attempt.state();
        if !matches!(state, SendState::Submitted | SendState::TimedOut) {
            return Err(Error::InvalidTransition {
                from: state,
                to: SendState::Confirmed,
            });
        }
        let chain = attempt.unsigned().chain();
        let reference = attempt
            .reference()
            .map(str::to_string)
            .ok_or(Error::InvalidTransition {
                from: state,
                to: SendState::Confirmed,
            })?;

        let status = self.broadcaster.poll_status(chain, &reference).await?;
        let next = attempt.record_status(status)?;
        if next != state {
            info!(%chain, %reference, from = %state, to = %next, "send state changed");
        }
        Ok(next)
    }
}

impl core::fmt::Debug for SendFlow {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SendFlow")
            .field("registry", &self.registry)
            .field("fees", &self.fees)
            .field("submit_timeout", &self.submit_timeout)
            .finish_non_exhaustive()
    }
}

fn ensure_state(attempt: &SendAttempt, expected: SendState, to: SendState) -> Result<()> {
    if attempt.state() == expected {
        Ok(())
    } else {
        Err(Error::InvalidTransition {
            from: attempt.state(),
            to,
        })
    }
}
