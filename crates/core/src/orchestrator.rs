use crate::format::format_amount;
use crate::metrics::Metrics;
use crate::progress::{ProgressError, StageProgress};
use crate::types::*;
use launchpad_providers::{BackendError, LaunchBackend, MintRequest, TokenInfo};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

pub const DEFAULT_EXPLORER_URL: &str = "https://testnet.sonicscan.org/address/";

const EVENT_CAPACITY: usize = 64;

const UNFAVORABLE_MESSAGE: &str = "I've analyzed the current market conditions, and unfortunately, the sentiment doesn't appear favorable for your token launch at this time. Consider refining your token concept or trying again when market conditions improve.";
const FAVORABLE_MESSAGE: &str = "The market sentiment analysis looks favorable! ✅ I've analyzed current conditions and your token concept has potential. Let's move forward with deployment.";
const ANNOUNCED_MESSAGE: &str = "Social announcement successful! ✅ Your token launch has been shared on Twitter to start building community awareness.";
const FAILURE_MESSAGE: &str = "I encountered an issue while processing your request. This could be due to network connectivity or server problems. Please try again or check your connection.";

/// Half of the stated initial supply is minted up front, rounded down.
pub fn mint_amount(initial_supply: u64) -> u64 {
    initial_supply / 2
}

pub fn announcement(token: &TokenInfo, contract_address: &str) -> String {
    format!(
        "I'm excited to announce the launch of my new token ${}! Check it out on the Sonic testnet: {} #Blockchain #Crypto",
        token.symbol, contract_address
    )
}

#[derive(Debug, Error)]
enum RunError {
    #[error("{stage} failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: BackendError,
    },
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error("Launch was reset")]
    Superseded,
}

enum Flow {
    Completed(LaunchResult),
    Aborted,
}

#[derive(Default)]
struct LaunchState {
    /// Bumped by every reset so in-flight runs can tell their updates are stale.
    generation: u64,
    progress: StageProgress,
    token_info: Option<TokenInfo>,
    contract_address: Option<String>,
    result: Option<LaunchResult>,
    log: ConversationLog,
}

struct SingleFlight<'a>(&'a AtomicBool);

impl<'a> SingleFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SingleFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives a token launch through analysis, deployment, minting and the
/// social announcement, one remote call at a time.
///
/// At most one launch runs per orchestrator. Progress is published as
/// [`LaunchEvent`]s and can be read at any point through [`snapshot`].
///
/// [`snapshot`]: LaunchOrchestrator::snapshot
pub struct LaunchOrchestrator {
    backend: Arc<dyn LaunchBackend>,
    explorer_url: String,
    state: Mutex<LaunchState>,
    in_progress: AtomicBool,
    events: broadcast::Sender<LaunchEvent>,
    metrics: Arc<Metrics>,
}

impl LaunchOrchestrator {
    pub fn new(backend: Arc<dyn LaunchBackend>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            backend,
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            state: Mutex::new(LaunchState::default()),
            in_progress: AtomicBool::new(false),
            events,
            metrics: Metrics::new(),
        }
    }

    pub fn with_explorer_url(mut self, explorer_url: impl Into<String>) -> Self {
        self.explorer_url = explorer_url.into();
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LaunchEvent> {
        self.events.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> LaunchSnapshot {
        let state = self.state.lock();
        LaunchSnapshot {
            current_stage: state.progress.current(),
            completed_stages: state.progress.completed().to_vec(),
            token_info: state.token_info.clone(),
            contract_address: state.contract_address.clone(),
            result: state.result.clone(),
            messages: state.log.to_vec(),
            in_progress: self.is_running(),
        }
    }

    /// Clears the conversation and all launch state. Safe to call at any
    /// time; a run still in flight stops at its next step.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.generation = state.generation.wrapping_add(1);
        state.progress.clear();
        state.token_info = None;
        state.contract_address = None;
        state.result = None;
        state.log.clear();
        self.emit(LaunchEvent::Reset);
        info!("Launch state reset");
    }

    pub async fn run_launch(&self, prompt: &str) -> LaunchOutcome {
        if prompt.trim().is_empty() {
            self.metrics.inc_launches_rejected();
            debug!("Ignoring empty launch prompt");
            return LaunchOutcome::Rejected(RejectReason::EmptyPrompt);
        }

        let Some(_flight) = SingleFlight::acquire(&self.in_progress) else {
            self.metrics.inc_launches_rejected();
            warn!("Launch already in progress, rejecting prompt");
            return LaunchOutcome::Rejected(RejectReason::AlreadyRunning);
        };

        self.metrics.inc_launches_started();
        info!("Starting token launch");

        let generation = {
            let mut state = self.state.lock();
            let message = ChatMessage::user(prompt);
            state.log.push(message.clone());
            self.emit(LaunchEvent::Message(message));
            state.generation
        };

        match self.drive(generation, prompt).await {
            Ok(Flow::Completed(result)) => {
                self.metrics.inc_launches_succeeded();
                info!(
                    "Launch of ${} completed at {}",
                    result.symbol, result.contract_address
                );
                LaunchOutcome::Succeeded(result)
            }
            Ok(Flow::Aborted) => {
                self.metrics.inc_launches_aborted();
                info!("Sentiment unfavorable, launch aborted");
                LaunchOutcome::Aborted
            }
            Err(RunError::Superseded) => {
                info!("Launch reset while in flight, remaining stages dropped");
                LaunchOutcome::Superseded
            }
            Err(error) => self.fail(generation, error),
        }
    }

    async fn drive(&self, generation: u64, prompt: &str) -> Result<Flow, RunError> {
        self.update(generation, |state| {
            state.progress.clear();
            state.token_info = None;
            state.contract_address = None;
            state.result = None;
            Ok(())
        })?;

        self.begin(generation, Stage::Analyze)?;
        let (sentiment, token_info) = tokio::join!(
            self.call(Stage::Analyze, self.backend.analyze_sentiment(prompt)),
            self.call(Stage::Analyze, self.backend.extract_token_info(prompt)),
        );
        let favorable = sentiment?;
        let token = token_info?;
        debug!(
            "Token info: {} (${}), initial supply {}",
            token.name, token.symbol, token.initial_supply
        );

        self.update(generation, |state| {
            state.token_info = Some(token.clone());
            self.emit(LaunchEvent::TokenInfo(token.clone()));
            Ok(())
        })?;

        if !favorable {
            self.update(generation, |state| {
                state.progress.halt();
                self.push_bot(state, UNFAVORABLE_MESSAGE.to_string());
                self.emit(LaunchEvent::Aborted);
                Ok(())
            })?;
            return Ok(Flow::Aborted);
        }
        self.finish_stage(generation, FAVORABLE_MESSAGE.to_string())?;

        self.begin(generation, Stage::Deploy)?;
        let address = self
            .call(Stage::Deploy, self.backend.deploy_contract(&token))
            .await?;
        self.update(generation, |state| {
            state.contract_address = Some(address.clone());
            Ok(())
        })?;
        self.finish_stage(
            generation,
            format!(
                "Smart contract successfully deployed! ✅ Your {} token contract is now live on the blockchain with the address: {}",
                token.name, address
            ),
        )?;

        self.begin(generation, Stage::Mint)?;
        let amount = mint_amount(token.initial_supply);
        let request = MintRequest {
            contract_address: address.clone(),
            to: token.owner.clone(),
            amount,
        };
        self.call(Stage::Mint, self.backend.mint_tokens(&request))
            .await?;
        self.finish_stage(
            generation,
            format!(
                "Initial token supply minted! ✅ {} {} tokens have been minted and sent to your wallet.",
                format_amount(amount),
                token.symbol
            ),
        )?;

        self.begin(generation, Stage::Tweet)?;
        let content = announcement(&token, &address);
        let receipt = self
            .call(Stage::Tweet, self.backend.post_announcement(&content))
            .await?;
        self.finish_stage(generation, ANNOUNCED_MESSAGE.to_string())?;

        let result = LaunchResult {
            name: token.name.clone(),
            symbol: token.symbol.clone(),
            contract_address: address.clone(),
            minted_amount: amount,
            tweet_confirmation: receipt,
            explorer_url: format!("{}{}", self.explorer_url, address),
        };
        self.update(generation, |state| {
            state.result = Some(result.clone());
            self.emit(LaunchEvent::Succeeded(result.clone()));
            Ok(())
        })?;

        Ok(Flow::Completed(result))
    }

    fn fail(&self, generation: u64, error: RunError) -> LaunchOutcome {
        let failed_stage = match &error {
            RunError::Stage { stage, .. } => Some(*stage),
            _ => None,
        };

        let applied = self.update(generation, |state| {
            let halted = state.progress.halt();
            let stage = failed_stage
                .or(halted)
                .or_else(|| state.progress.next_stage())
                .unwrap_or(Stage::Analyze);
            self.push_bot(state, FAILURE_MESSAGE.to_string());
            self.emit(LaunchEvent::Failed(stage));
            Ok(stage)
        });

        match applied {
            Ok(stage) => {
                self.metrics.inc_launches_failed();
                warn!("Launch failed at {}: {}", stage, error);
                LaunchOutcome::Failed {
                    stage,
                    error: error.to_string(),
                }
            }
            Err(_) => LaunchOutcome::Superseded,
        }
    }

    async fn call<T, F>(&self, stage: Stage, request: F) -> Result<T, RunError>
    where
        F: Future<Output = Result<T, BackendError>>,
    {
        self.metrics.inc_backend_calls();
        request.await.map_err(|source| {
            self.metrics.inc_backend_failures();
            RunError::Stage { stage, source }
        })
    }

    fn begin(&self, generation: u64, stage: Stage) -> Result<(), RunError> {
        self.update(generation, |state| {
            state.progress.begin(stage)?;
            self.emit(LaunchEvent::StageStarted(stage));
            Ok(())
        })?;
        info!("Stage started: {}", stage.title());
        Ok(())
    }

    fn finish_stage(&self, generation: u64, message: String) -> Result<(), RunError> {
        let stage = self.update(generation, |state| {
            let stage = state.progress.complete()?;
            self.emit(LaunchEvent::StageCompleted(stage));
            self.push_bot(state, message);
            Ok(stage)
        })?;
        info!("Stage completed: {}", stage.title());
        Ok(())
    }

    fn push_bot(&self, state: &mut LaunchState, content: String) {
        let message = ChatMessage::bot(content);
        state.log.push(message.clone());
        self.emit(LaunchEvent::Message(message));
    }

    /// Applies `f` under the state lock unless a reset happened since
    /// `generation` was taken.
    fn update<R>(
        &self,
        generation: u64,
        f: impl FnOnce(&mut LaunchState) -> Result<R, RunError>,
    ) -> Result<R, RunError> {
        let mut state = self.state.lock();
        if state.generation != generation {
            return Err(RunError::Superseded);
        }
        f(&mut state)
    }

    fn emit(&self, event: LaunchEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(symbol: &str, initial_supply: u64) -> TokenInfo {
        TokenInfo {
            name: "Rocket".to_string(),
            symbol: symbol.to_string(),
            initial_supply,
            max_supply: None,
            owner: "0xOwner".to_string(),
        }
    }

    #[test]
    fn test_mint_amount_is_half_rounded_down() {
        assert_eq!(mint_amount(100_000), 50_000);
        assert_eq!(mint_amount(3), 1);
        assert_eq!(mint_amount(1), 0);
        assert_eq!(mint_amount(0), 0);
    }

    #[test]
    fn test_announcement_embeds_symbol_and_address() {
        let text = announcement(&token("RKT", 10), "0xABC");
        assert!(text.contains("$RKT!"));
        assert!(text.contains("0xABC"));
        assert!(text.ends_with("#Blockchain #Crypto"));
    }

    #[test]
    fn test_single_flight_guard_releases_on_drop() {
        let flag = AtomicBool::new(false);
        let guard = SingleFlight::acquire(&flag).unwrap();
        assert!(SingleFlight::acquire(&flag).is_none());
        drop(guard);
        assert!(SingleFlight::acquire(&flag).is_some());
    }
}
