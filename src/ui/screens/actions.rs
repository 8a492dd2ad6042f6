//! The transaction modal and its submission state machine.
//!
//! One modal serves both entry points: the first-deposit dialog exposes only
//! the deposit, the returning-user dialog the two combined manager calls.
//! Submissions are ticketed; completions and timers that arrive for an older
//! ticket are dropped, which keeps a single transaction in flight per modal
//! and makes reopened dialogs immune to stale messages.

use std::time::Duration;

use iced::widget::{button, column, row, text, text_input};
use iced::{theme, Alignment, Element, Length};

use crate::amount::{format_wei, parse_eth_amount, require_positive, AmountError};
use crate::position::OnChainPosition;
use crate::rpc::ManagerCall;
use crate::ui::components::{error_banner, form_row, modal_card, RequestFailure, ToastSlot};

use super::RequestState;

/// How long a successful submission lingers before the modal closes itself.
pub const SUCCESS_LINGER: Duration = Duration::from_millis(1_500);

const DEPOSIT_TABS: &[ActionKind] = &[ActionKind::Deposit];
const ACTION_TABS: &[ActionKind] = &[ActionKind::BurnAndWithdraw, ActionKind::DepositAndMint];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Deposit,
    Withdraw,
    Mint,
    Burn,
    BurnAndWithdraw,
    DepositAndMint,
}

impl ActionKind {
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Deposit => "Deposit",
            ActionKind::Withdraw => "Withdraw",
            ActionKind::Mint => "Mint",
            ActionKind::Burn => "Burn",
            ActionKind::BurnAndWithdraw => "Burn & Withdraw",
            ActionKind::DepositAndMint => "Deposit & Mint",
        }
    }

    pub fn metric_label(self) -> &'static str {
        match self {
            ActionKind::Deposit => "deposit",
            ActionKind::Withdraw => "withdraw",
            ActionKind::Mint => "mint",
            ActionKind::Burn => "burn",
            ActionKind::BurnAndWithdraw => "burn_and_withdraw",
            ActionKind::DepositAndMint => "deposit_and_mint",
        }
    }

    /// Calls the manager verifies against a price attestation.
    pub fn requires_payload(self) -> bool {
        matches!(
            self,
            ActionKind::Mint | ActionKind::BurnAndWithdraw | ActionKind::DepositAndMint
        )
    }

    /// Kinds whose modal estimates the mintable ChUSD for the entered amount.
    pub fn previews_mintable(self) -> bool {
        matches!(self, ActionKind::Deposit | ActionKind::DepositAndMint)
    }

    /// Whether the entered amount leaves the wallet as native ETH.
    fn spends_eth(self) -> bool {
        matches!(self, ActionKind::Deposit | ActionKind::DepositAndMint)
    }

    pub fn toast_slot(self) -> ToastSlot {
        match self {
            ActionKind::Deposit => ToastSlot::Deposit,
            _ => ToastSlot::Action,
        }
    }

    pub fn pending_text(self) -> &'static str {
        if self.requires_payload() {
            "Preparing transaction with live price data..."
        } else {
            match self {
                ActionKind::Deposit => "Processing deposit...",
                ActionKind::Withdraw => "Processing withdrawal...",
                _ => "Processing transaction...",
            }
        }
    }

    pub fn success_text(self) -> &'static str {
        if self.requires_payload() {
            "Transaction with live price data successful!"
        } else {
            match self {
                ActionKind::Deposit => "Deposit successful!",
                ActionKind::Withdraw => "Withdrawal successful!",
                _ => "Transaction successful!",
            }
        }
    }

    pub fn build_call(self, amount_wei: u128, oracle_payload: Option<String>) -> ManagerCall {
        let payload = oracle_payload.unwrap_or_default();
        match self {
            ActionKind::Deposit => ManagerCall::Deposit {
                value_wei: amount_wei,
            },
            ActionKind::Withdraw => ManagerCall::Withdraw { amount_wei },
            ActionKind::Mint => ManagerCall::Mint {
                amount_wei,
                oracle_payload: payload,
            },
            ActionKind::Burn => ManagerCall::Burn { amount_wei },
            ActionKind::BurnAndWithdraw => ManagerCall::BurnAndWithdraw {
                amount_wei,
                oracle_payload: payload,
            },
            ActionKind::DepositAndMint => ManagerCall::DepositAndMint {
                value_wei: amount_wei,
                oracle_payload: payload,
            },
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum ActionPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(RequestFailure),
}

#[derive(Clone, Debug)]
pub enum ModalEvent {
    TabSelected(ActionKind),
    AmountChanged(String),
    SubmitPressed,
    ClosePressed,
    SwitchChainPressed,
}

/// View-time inputs the modal needs from the surrounding app.
pub struct ModalContext<'a> {
    pub position: Option<&'a OnChainPosition>,
    pub chain_ok: bool,
    pub chain_name: &'a str,
    pub show_preview: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModalState {
    tabs: &'static [ActionKind],
    kind: ActionKind,
    amount: String,
    default_amount: String,
    phase: ActionPhase,
    preview: RequestState<String>,
    ticket: u64,
    preview_ticket: u64,
}

impl ModalState {
    pub fn deposit_only(default_amount: &str) -> Self {
        Self::new(DEPOSIT_TABS, default_amount)
    }

    pub fn actions(default_amount: &str) -> Self {
        Self::new(ACTION_TABS, default_amount)
    }

    fn new(tabs: &'static [ActionKind], default_amount: &str) -> Self {
        Self {
            tabs,
            kind: tabs[0],
            amount: default_amount.to_string(),
            default_amount: default_amount.to_string(),
            phase: ActionPhase::Idle,
            preview: RequestState::Idle,
            ticket: 0,
            preview_ticket: 0,
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn phase(&self) -> &ActionPhase {
        &self.phase
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, ActionPhase::Submitting)
    }

    pub fn can_close(&self) -> bool {
        !self.is_submitting()
    }

    pub fn select_tab(&mut self, kind: ActionKind) -> bool {
        if self.is_submitting() || !self.tabs.contains(&kind) || kind == self.kind {
            return false;
        }
        self.kind = kind;
        self.phase = ActionPhase::Idle;
        self.preview.reset();
        true
    }

    /// Stores the edited amount. Returns `true` when the mintable preview
    /// should be refreshed for the new value.
    pub fn input_amount(&mut self, raw: String) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.amount = raw;
        if matches!(self.phase, ActionPhase::Failed(_) | ActionPhase::Succeeded) {
            self.phase = ActionPhase::Idle;
        }
        let fetch = self.kind.previews_mintable() && self.parsed_amount().is_ok();
        if !fetch {
            self.preview.reset();
        }
        fetch
    }

    pub fn parsed_amount(&self) -> Result<u128, AmountError> {
        parse_eth_amount(&self.amount)
    }

    /// Synchronous gate run before any submission. `None` means the current
    /// input may be submitted.
    pub fn validation_error(
        &self,
        position: Option<&OnChainPosition>,
        chain_ok: bool,
    ) -> Option<String> {
        let amount_wei = match self.parsed_amount().and_then(require_positive) {
            Ok(wei) => wei,
            Err(AmountError::Empty) => return Some("Enter an amount.".to_string()),
            Err(AmountError::Zero) => return Some("Enter an amount above zero.".to_string()),
            Err(AmountError::TooPrecise(_)) => {
                return Some("Use at most 18 decimal places.".to_string())
            }
            Err(_) => return Some("Enter a valid amount.".to_string()),
        };
        let Some(position) = position else {
            return Some("Connect a wallet first.".to_string());
        };
        if !chain_ok {
            return Some("The wallet is on the wrong network.".to_string());
        }
        let (available, asset) = if self.kind.spends_eth() {
            (position.eth_wei, "ETH")
        } else {
            match self.kind {
                ActionKind::Burn | ActionKind::BurnAndWithdraw => (position.token_wei, "ChUSD"),
                ActionKind::Withdraw => (position.deposited_wei, "deposited ETH"),
                // the manager enforces the mint ceiling on chain
                _ => return None,
            }
        };
        if amount_wei > available {
            return Some(format!("Amount exceeds your {asset} balance."));
        }
        None
    }

    pub fn can_submit(&self, position: Option<&OnChainPosition>, chain_ok: bool) -> bool {
        !self.is_submitting() && self.validation_error(position, chain_ok).is_none()
    }

    /// Moves into `Submitting`. Returns the action, the parsed amount, and
    /// the ticket guarding this attempt, or `None` when the gate fails or a
    /// submission is already running.
    pub fn begin_submit(
        &mut self,
        position: Option<&OnChainPosition>,
        chain_ok: bool,
    ) -> Option<(ActionKind, u128, u64)> {
        if !self.can_submit(position, chain_ok) {
            return None;
        }
        let amount_wei = self.parsed_amount().ok()?;
        self.ticket += 1;
        self.phase = ActionPhase::Submitting;
        Some((self.kind, amount_wei, self.ticket))
    }

    /// Applies a ticketed completion. Stale completions return `false` and
    /// leave the state untouched.
    pub fn complete(&mut self, ticket: u64, outcome: Result<(), RequestFailure>) -> bool {
        if ticket != self.ticket || !self.is_submitting() {
            return false;
        }
        match outcome {
            Ok(()) => {
                self.phase = ActionPhase::Succeeded;
                self.amount = self.default_amount.clone();
                self.preview.reset();
            }
            Err(failure) => self.phase = ActionPhase::Failed(failure),
        }
        true
    }

    /// Whether the success linger timer for `ticket` should close the modal.
    pub fn should_auto_close(&self, ticket: u64) -> bool {
        ticket == self.ticket && matches!(self.phase, ActionPhase::Succeeded)
    }

    pub fn begin_preview(&mut self) -> u64 {
        self.preview_ticket += 1;
        self.preview.set_loading();
        self.preview_ticket
    }

    /// Drops the current estimate and invalidates any fetch in flight.
    pub fn clear_preview(&mut self) {
        self.preview_ticket += 1;
        self.preview.reset();
    }

    pub fn resolve_preview(&mut self, ticket: u64, outcome: Result<u128, RequestFailure>) -> bool {
        if ticket != self.preview_ticket {
            return false;
        }
        match outcome {
            Ok(wei) => self.preview.set_success(format_wei(wei, 2)),
            Err(failure) => self.preview.set_failure(failure),
        }
        true
    }

    pub fn view<'a>(&'a self, ctx: ModalContext<'a>) -> Element<'a, ModalEvent> {
        let mut body = column![].spacing(12);

        if self.tabs.len() > 1 {
            let mut tabs = row![].spacing(8);
            for kind in self.tabs {
                let style = if *kind == self.kind {
                    theme::Button::Primary
                } else {
                    theme::Button::Secondary
                };
                let mut tab = button(text(kind.label()).size(14)).style(style);
                if !self.is_submitting() {
                    tab = tab.on_press(ModalEvent::TabSelected(*kind));
                }
                tabs = tabs.push(tab);
            }
            body = body.push(tabs);
        }

        let mut input = text_input("0.0", &self.amount).width(Length::Fill);
        if !self.is_submitting() {
            input = input.on_input(ModalEvent::AmountChanged);
        }
        body = body.push(form_row("Amount (ETH)", input));

        if ctx.show_preview && self.kind.previews_mintable() {
            let line: Element<'a, ModalEvent> = match &self.preview {
                RequestState::Idle => {
                    text("Enter an amount to estimate mintable ChUSD.").size(12).into()
                }
                RequestState::Loading => text("Estimating mintable ChUSD…").size(12).into(),
                RequestState::Success(rendered) => {
                    text(format!("≈ {rendered} ChUSD mintable")).size(12).into()
                }
                RequestState::Failure(failure) => text(&failure.summary).size(12).into(),
            };
            body = body.push(line);
        }

        match &self.phase {
            ActionPhase::Submitting => {
                body = body.push(text("Waiting for the wallet…").size(14));
            }
            ActionPhase::Succeeded => {
                body = body.push(text(self.kind.success_text()).size(14));
            }
            ActionPhase::Failed(failure) => {
                body = body.push(error_banner(failure, None));
            }
            ActionPhase::Idle => {
                if let Some(reason) = self.validation_error(ctx.position, ctx.chain_ok) {
                    body = body.push(text(reason).size(12));
                }
            }
        }

        if !ctx.chain_ok {
            body = body.push(
                row![
                    text(format!("Wrong network. Switch to {}.", ctx.chain_name))
                        .size(12)
                        .width(Length::Fill),
                    button(text("Switch").size(14))
                        .style(theme::Button::Secondary)
                        .on_press(ModalEvent::SwitchChainPressed),
                ]
                .spacing(8)
                .align_items(Alignment::Center),
            );
        }

        let submit_label = if self.is_submitting() {
            "Submitting…"
        } else {
            self.kind.label()
        };
        let mut submit = button(text(submit_label))
            .style(theme::Button::Primary)
            .width(Length::Fill);
        if self.can_submit(ctx.position, ctx.chain_ok) {
            submit = submit.on_press(ModalEvent::SubmitPressed);
        }
        body = body.push(submit);

        let title = if self.tabs.len() > 1 {
            "Manage position"
        } else {
            "Deposit ETH"
        };
        let on_close = self.can_close().then_some(ModalEvent::ClosePressed);
        modal_card(title, on_close, body.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::WEI_PER_ETH;

    fn sample_position() -> OnChainPosition {
        OnChainPosition {
            eth_wei: WEI_PER_ETH,
            token_wei: WEI_PER_ETH / 2,
            deposited_wei: WEI_PER_ETH / 4,
            minted_wei: WEI_PER_ETH / 2,
        }
    }

    #[test]
    fn only_one_submission_runs_at_a_time() {
        let position = sample_position();
        let mut modal = ModalState::deposit_only("0.1");

        let first = modal.begin_submit(Some(&position), true);
        assert!(first.is_some());
        assert!(modal.is_submitting());
        assert!(modal.begin_submit(Some(&position), true).is_none());
    }

    #[test]
    fn malformed_amounts_never_reach_submission() {
        let position = sample_position();
        for raw in ["", "-0.1", "1.2.3", "abc", "0x10", "1e18", "."] {
            let mut modal = ModalState::deposit_only("0.1");
            modal.input_amount(raw.to_string());
            assert!(
                modal.validation_error(Some(&position), true).is_some(),
                "{raw:?} must not validate"
            );
            assert!(modal.begin_submit(Some(&position), true).is_none());
        }
    }

    #[test]
    fn zero_and_excessive_amounts_are_blocked() {
        let position = sample_position();
        let mut modal = ModalState::deposit_only("0.1");

        modal.input_amount("0".to_string());
        assert!(modal.begin_submit(Some(&position), true).is_none());

        modal.input_amount("1.5".to_string());
        let reason = modal.validation_error(Some(&position), true).expect("over balance");
        assert!(reason.contains("ETH"));
        assert!(modal.begin_submit(Some(&position), true).is_none());
    }

    #[test]
    fn burn_and_withdraw_is_capped_by_token_balance() {
        let position = sample_position();
        let mut modal = ModalState::actions("0.1");
        assert_eq!(modal.kind(), ActionKind::BurnAndWithdraw);

        modal.input_amount("0.6".to_string());
        let reason = modal.validation_error(Some(&position), true).expect("over balance");
        assert!(reason.contains("ChUSD"));

        modal.input_amount("0.5".to_string());
        assert!(modal.validation_error(Some(&position), true).is_none());
    }

    #[test]
    fn disconnected_or_wrong_chain_blocks_submission() {
        let position = sample_position();
        let mut modal = ModalState::deposit_only("0.1");

        assert!(modal.begin_submit(None, true).is_none());
        assert!(modal.begin_submit(Some(&position), false).is_none());
        assert!(modal.begin_submit(Some(&position), true).is_some());
    }

    #[test]
    fn failure_keeps_the_entered_amount() {
        let position = sample_position();
        let mut modal = ModalState::deposit_only("0.1");
        modal.input_amount("0.2".to_string());

        let (_, _, ticket) = modal.begin_submit(Some(&position), true).expect("submit");
        assert!(modal.complete(ticket, Err(RequestFailure::new("rejected", None))));
        assert!(matches!(modal.phase(), ActionPhase::Failed(_)));
        assert_eq!(modal.amount(), "0.2");

        // editing clears the failure and allows another attempt
        modal.input_amount("0.3".to_string());
        assert!(matches!(modal.phase(), ActionPhase::Idle));
        assert!(modal.begin_submit(Some(&position), true).is_some());
    }

    #[test]
    fn success_resets_amount_and_arms_auto_close() {
        let position = sample_position();
        let mut modal = ModalState::deposit_only("0.1");
        modal.input_amount("0.2".to_string());

        let (_, _, ticket) = modal.begin_submit(Some(&position), true).expect("submit");
        assert!(modal.complete(ticket, Ok(())));
        assert!(matches!(modal.phase(), ActionPhase::Succeeded));
        assert_eq!(modal.amount(), "0.1");
        assert!(modal.should_auto_close(ticket));
        assert!(!modal.should_auto_close(ticket + 1));
    }

    #[test]
    fn stale_completions_are_dropped() {
        let position = sample_position();
        let mut modal = ModalState::deposit_only("0.1");

        let (_, _, first) = modal.begin_submit(Some(&position), true).expect("submit");
        assert!(modal.complete(first, Err(RequestFailure::new("nope", None))));

        modal.input_amount("0.2".to_string());
        let (_, _, second) = modal.begin_submit(Some(&position), true).expect("resubmit");
        assert_ne!(first, second);

        // a late message for the first attempt must not touch the second
        assert!(!modal.complete(first, Ok(())));
        assert!(modal.is_submitting());
    }

    #[test]
    fn editing_during_success_linger_cancels_auto_close() {
        let position = sample_position();
        let mut modal = ModalState::deposit_only("0.1");

        let (_, _, ticket) = modal.begin_submit(Some(&position), true).expect("submit");
        assert!(modal.complete(ticket, Ok(())));
        modal.input_amount("0.4".to_string());
        assert!(!modal.should_auto_close(ticket));
    }

    #[test]
    fn tabs_lock_while_submitting() {
        let position = sample_position();
        let mut modal = ModalState::actions("0.1");

        assert!(modal.select_tab(ActionKind::DepositAndMint));
        assert_eq!(modal.kind(), ActionKind::DepositAndMint);
        // kinds outside this modal are rejected
        assert!(!modal.select_tab(ActionKind::Mint));

        modal.begin_submit(Some(&position), true).expect("submit");
        assert!(!modal.select_tab(ActionKind::BurnAndWithdraw));
        assert!(!modal.input_amount("9".to_string()));
        assert!(!modal.can_close());
    }

    #[test]
    fn preview_results_honor_their_ticket() {
        let mut modal = ModalState::actions("0.1");
        modal.select_tab(ActionKind::DepositAndMint);

        assert!(modal.input_amount("0.1".to_string()));
        let stale = modal.begin_preview();
        assert!(modal.input_amount("0.2".to_string()));
        let fresh = modal.begin_preview();

        assert!(!modal.resolve_preview(stale, Ok(100)));
        assert!(modal.resolve_preview(fresh, Ok(250_000_000_000_000_000)));
        assert_eq!(
            modal.preview.as_success().map(String::as_str),
            Some("0.25")
        );

        // clearing invalidates whatever is still in flight
        let doomed = modal.begin_preview();
        modal.clear_preview();
        assert!(!modal.resolve_preview(doomed, Ok(1)));
        assert!(matches!(modal.preview, RequestState::Idle));
    }

    #[test]
    fn deposit_entry_points_estimate_mintable_tokens() {
        let mut modal = ModalState::deposit_only("0.1");
        assert!(modal.input_amount("0.2".to_string()));

        modal.input_amount("garbage".to_string());
        assert!(matches!(modal.preview, RequestState::Idle));

        assert!(ActionKind::Deposit.previews_mintable());
        assert!(ActionKind::DepositAndMint.previews_mintable());
        assert!(!ActionKind::BurnAndWithdraw.previews_mintable());
    }

    #[test]
    fn payload_kinds_build_calls_with_the_payload() {
        let call = ActionKind::DepositAndMint.build_call(7, Some("beef".to_string()));
        assert_eq!(
            call,
            ManagerCall::DepositAndMint {
                value_wei: 7,
                oracle_payload: "beef".to_string(),
            }
        );
        let call = ActionKind::Deposit.build_call(7, None);
        assert_eq!(call, ManagerCall::Deposit { value_wei: 7 });
        assert!(!ActionKind::Deposit.requires_payload());
        assert!(ActionKind::Mint.requires_payload());
        assert!(ActionKind::BurnAndWithdraw.requires_payload());
    }
}
