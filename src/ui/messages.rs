//! Messages driving the update loop.

use crate::position::OnChainPosition;
use crate::rpc::{SessionInfo, TxOutcome};

use super::commands::{RpcCallError, SubmitError};
use super::components::ToastSlot;
use super::screens::ModalEvent;

#[derive(Clone, Debug)]
pub enum Message {
    /// Periodic refresh of session and balances.
    PollTick,
    /// Drives the mascot frames and toast expiry.
    AnimationTick,
    /// Manual refresh from an error banner.
    RefreshRequested,
    SessionFetched(Result<SessionInfo, RpcCallError>),
    PositionFetched(Result<OnChainPosition, RpcCallError>),
    DepositModalRequested,
    ActionsModalRequested,
    Modal(ModalEvent),
    /// Ticketed completion of a submission flow.
    SubmitFinished(u64, Result<TxOutcome, SubmitError>),
    /// Fires after the success linger delay to close the modal.
    AutoCloseElapsed(u64),
    PreviewFetched(u64, Result<u128, RpcCallError>),
    SwitchChainRequested,
    SwitchChainFinished(Result<SessionInfo, RpcCallError>),
    MoodChanged(u8),
    ToastDismissed(ToastSlot),
}
