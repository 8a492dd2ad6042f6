//! The iced application: screen routing, bridge traffic, and the simulated
//! ledger all meet here.

use std::sync::Arc;
use std::time::{Duration, Instant};

use iced::widget::{button, column, container, row, text};
use iced::{
    executor, theme, time, Alignment, Application, Command, Element, Length, Subscription, Theme,
};
use tracing::{info, warn};

use crate::config::{AppConfig, AppTheme};
use crate::oracle::OracleProvider;
use crate::position::{interaction_status, OnChainPosition, SimulatedLedger};
use crate::rpc::{BridgeRpcClient, SessionInfo, TxOutcome};

use super::commands::{self, SubmitError};
use super::components::{error_banner, toast_stack, RequestFailure, Toast, ToastSlot, ToastTray};
use super::error_map;
use super::messages::Message;
use super::screens::{
    ActionKind, ModalContext, ModalEvent, ModalState, OverviewState, PolledState, WelcomeState,
    ANIMATION_TICK, SUCCESS_LINGER,
};
use super::telemetry::UiTelemetry;

const SIMULATED_ADDRESS: &str = "0x0000000000000000000000000000000000c0ffee";
const SIMULATED_LATENCY: Duration = Duration::from_millis(600);

/// How the app reaches the chain. Simulated runs never construct a client,
/// so they cannot accidentally send bridge traffic.
pub enum Runtime {
    Live {
        client: Arc<BridgeRpcClient>,
        oracle: Arc<OracleProvider>,
    },
    Simulated,
}

pub struct AppFlags {
    pub config: AppConfig,
    pub runtime: Runtime,
}

pub struct MiniApp {
    config: AppConfig,
    runtime: Runtime,
    session: PolledState<SessionInfo>,
    position: PolledState<OnChainPosition>,
    ledger: SimulatedLedger,
    welcome: WelcomeState,
    overview: OverviewState,
    modal: Option<ModalState>,
    toasts: ToastTray,
    switching_chain: bool,
}

impl Application for MiniApp {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = AppFlags;

    fn new(flags: AppFlags) -> (Self, Command<Message>) {
        let mut app = MiniApp {
            config: flags.config,
            runtime: flags.runtime,
            session: PolledState::default(),
            position: PolledState::default(),
            ledger: SimulatedLedger::default(),
            welcome: WelcomeState::default(),
            overview: OverviewState::default(),
            modal: None,
            toasts: ToastTray::default(),
            switching_chain: false,
        };
        let command = match &app.runtime {
            Runtime::Live { .. } => {
                app.session.begin_refresh();
                app.fetch_session()
            }
            Runtime::Simulated => {
                app.seed_simulated();
                Command::none()
            }
        };
        (app, command)
    }

    fn title(&self) -> String {
        match self.runtime {
            Runtime::Live { .. } => format!("ChUSD · {}", self.config.network.chain_name),
            Runtime::Simulated => "ChUSD (simulated)".to_string(),
        }
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::PollTick | Message::RefreshRequested => self.refresh(),
            Message::AnimationTick => {
                self.welcome.tick();
                self.toasts.prune(Instant::now());
                Command::none()
            }
            Message::SessionFetched(outcome) => self.on_session(outcome),
            Message::PositionFetched(outcome) => {
                let outcome =
                    outcome.map_err(|error| error_map::describe_call_error(&error).into());
                self.position.resolve(outcome);
                Command::none()
            }
            Message::DepositModalRequested => {
                self.modal = Some(ModalState::deposit_only(
                    &self.config.gui.default_deposit_amount,
                ));
                Command::none()
            }
            Message::ActionsModalRequested => {
                self.modal = Some(ModalState::actions(&self.config.gui.default_deposit_amount));
                Command::none()
            }
            Message::Modal(event) => self.on_modal_event(event),
            Message::SubmitFinished(ticket, outcome) => self.on_submit_finished(ticket, outcome),
            Message::AutoCloseElapsed(ticket) => {
                if self
                    .modal
                    .as_ref()
                    .is_some_and(|modal| modal.should_auto_close(ticket))
                {
                    self.modal = None;
                }
                Command::none()
            }
            Message::PreviewFetched(ticket, outcome) => {
                if let Some(modal) = &mut self.modal {
                    modal.resolve_preview(
                        ticket,
                        outcome.map_err(|error| error_map::describe_call_error(&error).into()),
                    );
                }
                Command::none()
            }
            Message::SwitchChainRequested => self.switch_chain(),
            Message::SwitchChainFinished(outcome) => self.on_switch_chain_finished(outcome),
            Message::MoodChanged(mood) => {
                self.overview.set_mood(mood);
                Command::none()
            }
            Message::ToastDismissed(slot) => {
                self.toasts.dismiss(slot);
                Command::none()
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let chain_ok = self.chain_ok();
        let connected = self.connected_address();

        let screen: Element<'_, Message> = if let Some(modal) = &self.modal {
            modal
                .view(ModalContext {
                    position: self.position.value(),
                    chain_ok,
                    chain_name: &self.config.network.chain_name,
                    show_preview: matches!(self.runtime, Runtime::Live { .. }),
                })
                .map(Message::Modal)
        } else if let Some(position) = self
            .position
            .value()
            .filter(|position| position.has_interacted())
        {
            let address = connected.clone().unwrap_or_default();
            self.overview.view(position, &address, chain_ok)
        } else {
            self.welcome.view(connected.is_some() && chain_ok)
        };

        let mut layers = column![].spacing(12).padding(16);
        if !self.toasts.is_empty() {
            layers = layers.push(toast_stack(self.toasts.as_slice(), Message::ToastDismissed));
        }
        if !chain_ok && self.modal.is_none() {
            layers = layers.push(network_banner(
                &self.config.network.chain_name,
                self.switching_chain,
            ));
        }
        if let Some(failure) = self.session.error().or_else(|| self.position.error()) {
            layers = layers.push(error_banner(failure, Some(Message::RefreshRequested)));
        }
        layers = layers.push(screen);

        container(layers)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let mut subs = Vec::new();
        if matches!(self.runtime, Runtime::Live { .. }) {
            subs.push(time::every(self.config.gui.poll_interval()).map(|_| Message::PollTick));
        }
        let animating = self.modal.is_none() && !self.has_interacted();
        if animating || !self.toasts.is_empty() {
            subs.push(time::every(ANIMATION_TICK).map(|_| Message::AnimationTick));
        }
        Subscription::batch(subs)
    }

    fn theme(&self) -> Theme {
        match self.config.gui.theme {
            AppTheme::Dark => Theme::Dark,
            AppTheme::Light | AppTheme::System => Theme::Light,
        }
    }
}

impl MiniApp {
    fn seed_simulated(&mut self) {
        self.session.set_value(SessionInfo {
            address: Some(SIMULATED_ADDRESS.to_string()),
            chain_id: Some(self.config.network.required_chain_id),
        });
        self.position.set_value(self.ledger.snapshot());
        info!("running in simulated mode; no bridge traffic will be sent");
    }

    fn has_interacted(&self) -> bool {
        interaction_status(self.position.value())
    }

    fn chain_ok(&self) -> bool {
        match &self.runtime {
            Runtime::Simulated => true,
            // an unknown chain (no wallet) is handled by the connect gate,
            // not the network banner
            Runtime::Live { .. } => self
                .session
                .value()
                .and_then(|session| session.chain_id)
                .map(|chain_id| chain_id == self.config.network.required_chain_id)
                .unwrap_or(true),
        }
    }

    fn connected_address(&self) -> Option<String> {
        self.session
            .value()
            .and_then(|session| session.address.clone())
    }

    fn refresh(&mut self) -> Command<Message> {
        let Runtime::Live { .. } = self.runtime else {
            return Command::none();
        };
        if self.session.begin_refresh() {
            self.fetch_session()
        } else {
            Command::none()
        }
    }

    fn fetch_session(&self) -> Command<Message> {
        match &self.runtime {
            Runtime::Live { client, .. } => {
                let client = Arc::clone(client);
                commands::rpc(
                    "wallet_sessionInfo",
                    async move { client.session_info().await },
                    Message::SessionFetched,
                )
            }
            Runtime::Simulated => Command::none(),
        }
    }

    fn fetch_position(&self, address: String) -> Command<Message> {
        match &self.runtime {
            Runtime::Live { client, .. } => {
                let client = Arc::clone(client);
                commands::rpc(
                    "position_refresh",
                    async move { client.read_position(&address).await },
                    Message::PositionFetched,
                )
            }
            Runtime::Simulated => Command::none(),
        }
    }

    fn on_session(
        &mut self,
        outcome: Result<SessionInfo, commands::RpcCallError>,
    ) -> Command<Message> {
        match outcome {
            Ok(session) => {
                let previous = self.connected_address();
                let address = session.address.clone();
                self.session.resolve(Ok(session));
                match address {
                    Some(address) => {
                        let mut follow_ups = Vec::new();
                        // the estimate is per address, so a swap invalidates
                        // both the snapshot and any preview in flight
                        if previous.as_deref() != Some(address.as_str()) {
                            self.position.clear();
                            if let Some(modal) = &mut self.modal {
                                modal.clear_preview();
                            }
                            follow_ups.push(self.refresh_preview());
                        }
                        if self.position.begin_refresh() {
                            follow_ups.push(self.fetch_position(address));
                        }
                        Command::batch(follow_ups)
                    }
                    None => {
                        self.position.clear();
                        if let Some(modal) = &mut self.modal {
                            modal.clear_preview();
                        }
                        Command::none()
                    }
                }
            }
            Err(error) => {
                warn!(%error, "session refresh failed");
                self.session
                    .resolve(Err(error_map::describe_call_error(&error).into()));
                Command::none()
            }
        }
    }

    fn on_modal_event(&mut self, event: ModalEvent) -> Command<Message> {
        match event {
            ModalEvent::ClosePressed => {
                if self.modal.as_ref().is_some_and(ModalState::can_close) {
                    self.modal = None;
                }
                Command::none()
            }
            ModalEvent::TabSelected(kind) => {
                let switched = self
                    .modal
                    .as_mut()
                    .is_some_and(|modal| modal.select_tab(kind));
                if switched {
                    self.refresh_preview()
                } else {
                    Command::none()
                }
            }
            ModalEvent::AmountChanged(raw) => {
                let edited = self
                    .modal
                    .as_mut()
                    .is_some_and(|modal| modal.input_amount(raw));
                if edited {
                    self.refresh_preview()
                } else {
                    Command::none()
                }
            }
            ModalEvent::SubmitPressed => self.on_submit_pressed(),
            ModalEvent::SwitchChainPressed => self.switch_chain(),
        }
    }

    /// Requests a fresh mintable estimate for the modal's current amount.
    /// No-op in simulated mode, without a connected wallet, for kinds that
    /// show no estimate, or while the input does not parse.
    fn refresh_preview(&mut self) -> Command<Message> {
        let client = match &self.runtime {
            Runtime::Live { client, .. } => Arc::clone(client),
            Runtime::Simulated => return Command::none(),
        };
        let address = self.connected_address();
        let Some(modal) = &mut self.modal else {
            return Command::none();
        };
        if !modal.kind().previews_mintable() {
            return Command::none();
        }
        let Some(address) = address else {
            return Command::none();
        };
        let Ok(amount_wei) = modal.parsed_amount() else {
            return Command::none();
        };
        let ticket = modal.begin_preview();
        Command::perform(
            commands::call_with_timeout(
                "manager_calculateMintableTokensForUser",
                commands::DEFAULT_RPC_TIMEOUT,
                async move { client.mintable_for(&address, amount_wei).await },
            ),
            move |outcome| Message::PreviewFetched(ticket, outcome),
        )
    }

    fn on_submit_pressed(&mut self) -> Command<Message> {
        let chain_ok = self.chain_ok();
        let position = self.position.value().copied();
        let Some(modal) = &mut self.modal else {
            return Command::none();
        };
        let Some((kind, amount_wei, ticket)) = modal.begin_submit(position.as_ref(), chain_ok)
        else {
            return Command::none();
        };
        self.toasts
            .push(Toast::loading(kind.toast_slot(), kind.pending_text()));
        info!(action = kind.metric_label(), amount_wei, "submitting transaction");

        match &self.runtime {
            Runtime::Live { client, oracle } => {
                let client = Arc::clone(client);
                let oracle = Arc::clone(oracle);
                let needs_payload = kind.requires_payload();
                let future = async move {
                    let payload = if needs_payload {
                        let generated = oracle.generate().await;
                        UiTelemetry::global().record_oracle_fetch(generated.is_ok());
                        match generated {
                            Ok(payload) => Some(payload.to_hex()),
                            Err(error) => return Err(SubmitError::Oracle(error)),
                        }
                    } else {
                        None
                    };
                    let call = kind.build_call(amount_wei, payload);
                    let method = call.method();
                    commands::call_with_timeout(method, commands::DEFAULT_RPC_TIMEOUT, async move {
                        client.submit(&call).await
                    })
                    .await
                    .map_err(SubmitError::Call)
                };
                Command::perform(future, move |outcome| {
                    Message::SubmitFinished(ticket, outcome)
                })
            }
            Runtime::Simulated => {
                let tx_hash = format!("0x{ticket:064x}");
                Command::perform(
                    async move {
                        tokio::time::sleep(SIMULATED_LATENCY).await;
                        Ok::<_, SubmitError>(TxOutcome { tx_hash })
                    },
                    move |outcome| Message::SubmitFinished(ticket, outcome),
                )
            }
        }
    }

    fn on_submit_finished(
        &mut self,
        ticket: u64,
        outcome: Result<TxOutcome, SubmitError>,
    ) -> Command<Message> {
        let (kind, submitted_wei, applied) = {
            let Some(modal) = &mut self.modal else {
                return Command::none();
            };
            let kind = modal.kind();
            let submitted_wei = modal.parsed_amount().ok();
            let applied = match &outcome {
                Ok(_) => modal.complete(ticket, Ok(())),
                Err(error) => {
                    modal.complete(ticket, Err(error_map::describe_submit_error(error).into()))
                }
            };
            (kind, submitted_wei, applied)
        };
        if !applied {
            warn!(ticket, "dropping stale submission result");
            return Command::none();
        }

        match outcome {
            Ok(tx) => {
                info!(
                    action = kind.metric_label(),
                    tx_hash = %tx.tx_hash,
                    "transaction confirmed",
                );
                UiTelemetry::global().record_transaction(kind.metric_label(), "succeeded");
                self.toasts
                    .push(Toast::success(kind.toast_slot(), kind.success_text()));

                let mut follow_ups = vec![Command::perform(
                    async { tokio::time::sleep(SUCCESS_LINGER).await },
                    move |_| Message::AutoCloseElapsed(ticket),
                )];
                match self.runtime {
                    Runtime::Simulated => {
                        if let Some(wei) = submitted_wei {
                            self.apply_simulated(kind, wei);
                        }
                    }
                    Runtime::Live { .. } => {
                        if let Some(address) = self.connected_address() {
                            if self.position.begin_refresh() {
                                follow_ups.push(self.fetch_position(address));
                            }
                        }
                    }
                }
                Command::batch(follow_ups)
            }
            Err(error) => {
                warn!(action = kind.metric_label(), %error, "transaction failed");
                UiTelemetry::global().record_transaction(kind.metric_label(), "failed");
                let description = error_map::describe_submit_error(&error);
                self.toasts
                    .push(Toast::error(kind.toast_slot(), description.headline));
                Command::none()
            }
        }
    }

    /// Mirrors a confirmed simulated call onto the demo ledger so the
    /// interaction status is derived from the same position math as live
    /// mode.
    fn apply_simulated(&mut self, kind: ActionKind, wei: u128) {
        match kind {
            ActionKind::Deposit => self.ledger.deposit(wei),
            ActionKind::Withdraw => self.ledger.withdraw(wei),
            ActionKind::Mint => self.ledger.mint(wei),
            ActionKind::Burn => self.ledger.burn(wei),
            ActionKind::BurnAndWithdraw => self.ledger.burn_and_withdraw(wei),
            ActionKind::DepositAndMint => self.ledger.deposit_and_mint(wei),
        }
        self.position.set_value(self.ledger.snapshot());
    }

    fn switch_chain(&mut self) -> Command<Message> {
        if self.switching_chain {
            return Command::none();
        }
        let Runtime::Live { client, .. } = &self.runtime else {
            return Command::none();
        };
        let client = Arc::clone(client);
        let chain_id = self.config.network.required_chain_id;
        self.switching_chain = true;
        info!(chain_id, "requesting wallet chain switch");
        commands::rpc(
            "wallet_switchChain",
            async move { client.switch_chain(chain_id).await },
            Message::SwitchChainFinished,
        )
    }

    fn on_switch_chain_finished(
        &mut self,
        outcome: Result<SessionInfo, commands::RpcCallError>,
    ) -> Command<Message> {
        self.switching_chain = false;
        match outcome {
            Ok(session) => {
                info!(chain_id = ?session.chain_id, "wallet switched chains");
                let address = session.address.clone();
                self.session.resolve(Ok(session));
                // balances are chain specific, so reread them right away
                if let Some(address) = address {
                    if self.position.begin_refresh() {
                        return self.fetch_position(address);
                    }
                }
                Command::none()
            }
            Err(error) => {
                warn!(%error, "chain switch failed");
                let failure: RequestFailure = error_map::describe_call_error(&error).into();
                self.toasts
                    .push(Toast::error(ToastSlot::Network, failure.summary));
                Command::none()
            }
        }
    }
}

fn network_banner(chain_name: &str, switching: bool) -> Element<'_, Message> {
    let label = if switching { "Switching…" } else { "Switch network" };
    container(
        row![
            text(format!(
                "This app runs on {chain_name}. Your wallet is connected to a different network."
            ))
            .size(14)
            .width(Length::Fill),
            button(text(label).size(14))
                .style(theme::Button::Secondary)
                .on_press_maybe((!switching).then_some(Message::SwitchChainRequested)),
        ]
        .spacing(12)
        .align_items(Alignment::Center),
    )
    .padding([8, 12])
    .width(Length::Fill)
    .style(theme::Container::Box)
    .into()
}
