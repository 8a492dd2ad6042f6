//! First-visit screen: a looping mascot and, after a short beat, the prompt
//! to make the first deposit.

use std::time::Duration;

use iced::widget::{button, column, container, text};
use iced::{theme, Alignment, Element, Length};

use crate::ui::messages::Message;

/// Cadence of [`Message::AnimationTick`] while this screen is visible.
pub const ANIMATION_TICK: Duration = Duration::from_millis(150);

/// How long the mascot loops alone before the deposit prompt appears.
pub const PROMPT_DELAY: Duration = Duration::from_secs(3);

const PROMPT_TICKS: u32 = (PROMPT_DELAY.as_millis() / ANIMATION_TICK.as_millis()) as u32;

const FRAMES: &[&str] = &["(oo)", "(oo)~", "(OO)", "(oo)~"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WelcomeState {
    frame: usize,
    ticks: u32,
}

impl WelcomeState {
    pub fn tick(&mut self) {
        self.frame = (self.frame + 1) % FRAMES.len();
        self.ticks = self.ticks.saturating_add(1);
    }

    pub fn frame(&self) -> &'static str {
        FRAMES[self.frame]
    }

    pub fn prompt_visible(&self) -> bool {
        self.ticks >= PROMPT_TICKS
    }

    pub fn view(&self, deposit_enabled: bool) -> Element<'_, Message> {
        let mut content = column![
            text(self.frame()).size(64),
            text("ChUSD").size(28),
            text("Your chill collateralized piggy bank.").size(14),
        ]
        .spacing(12)
        .align_items(Alignment::Center);

        if self.prompt_visible() {
            content = content.push(
                text("Ready to start saving? Make your first deposit.").size(16),
            );
            content = content.push(
                button(text("Deposit ETH"))
                    .style(theme::Button::Primary)
                    .on_press_maybe(deposit_enabled.then_some(Message::DepositModalRequested)),
            );
            if !deposit_enabled {
                content = content.push(text("Connect a wallet to begin.").size(12));
            }
        }

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x()
            .center_y()
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_cycle_and_wrap() {
        let mut state = WelcomeState::default();
        let first = state.frame();
        for _ in 0..FRAMES.len() {
            state.tick();
        }
        assert_eq!(state.frame(), first);
    }

    #[test]
    fn prompt_appears_after_the_delay() {
        let mut state = WelcomeState::default();
        assert!(!state.prompt_visible());
        for _ in 0..PROMPT_TICKS - 1 {
            state.tick();
        }
        assert!(!state.prompt_visible());
        state.tick();
        assert!(state.prompt_visible());
    }
}
