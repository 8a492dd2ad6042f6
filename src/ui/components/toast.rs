//! Transient notifications rendered as a stack above the active screen.
//!
//! Each flow owns a slot; pushing a toast into an occupied slot replaces
//! the previous one in place, so a loading notice turns into its success or
//! error without stacking up.

use std::time::{Duration, Instant};

use iced::widget::{button, column, container, row, text};
use iced::{theme, Alignment, Element, Length};

const SUCCESS_TTL: Duration = Duration::from_secs(4);
const ERROR_TTL: Duration = Duration::from_secs(6);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Loading,
    Success,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToastSlot {
    Deposit,
    Action,
    Network,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub slot: ToastSlot,
    pub kind: ToastKind,
    pub message: String,
    pub expires: Option<Instant>,
}

impl Toast {
    pub fn loading(slot: ToastSlot, message: impl Into<String>) -> Self {
        Self {
            slot,
            kind: ToastKind::Loading,
            message: message.into(),
            expires: None,
        }
    }

    pub fn success(slot: ToastSlot, message: impl Into<String>) -> Self {
        Self {
            slot,
            kind: ToastKind::Success,
            message: message.into(),
            expires: Some(Instant::now() + SUCCESS_TTL),
        }
    }

    pub fn error(slot: ToastSlot, message: impl Into<String>) -> Self {
        Self {
            slot,
            kind: ToastKind::Error,
            message: message.into(),
            expires: Some(Instant::now() + ERROR_TTL),
        }
    }
}

/// Owns the visible toasts in display order.
#[derive(Debug, Default)]
pub struct ToastTray {
    toasts: Vec<Toast>,
}

impl ToastTray {
    pub fn push(&mut self, toast: Toast) {
        match self.toasts.iter_mut().find(|entry| entry.slot == toast.slot) {
            Some(entry) => *entry = toast,
            None => self.toasts.push(toast),
        }
    }

    pub fn dismiss(&mut self, slot: ToastSlot) {
        self.toasts.retain(|toast| toast.slot != slot);
    }

    pub fn prune(&mut self, now: Instant) {
        self.toasts
            .retain(|toast| toast.expires.map(|at| at > now).unwrap_or(true));
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn as_slice(&self) -> &[Toast] {
        &self.toasts
    }
}

pub fn toast_stack<'a, Message: Clone + 'a>(
    toasts: &'a [Toast],
    on_dismiss: fn(ToastSlot) -> Message,
) -> Element<'a, Message> {
    let mut stack = column![].spacing(8);
    for toast in toasts {
        let marker = match toast.kind {
            ToastKind::Loading => "…",
            ToastKind::Success => "✓",
            ToastKind::Error => "!",
        };
        let line = row![
            text(marker).width(Length::Fixed(18.0)),
            text(&toast.message).width(Length::Fill),
            button(text("×").size(14))
                .style(theme::Button::Text)
                .on_press(on_dismiss(toast.slot)),
        ]
        .spacing(8)
        .align_items(Alignment::Center);
        stack = stack.push(
            container(line)
                .padding([8, 12])
                .width(Length::Fill)
                .style(theme::Container::Box),
        );
    }
    stack.into()
}
